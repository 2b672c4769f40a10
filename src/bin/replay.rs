//! Replays recorded detections through the incident engine.
//!
//! Input is JSON lines, one `Frame` per line. Output is one JSON object per
//! classified frame on stdout.

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde_derive::Serialize;
use tracing::{info, warn};

use cityguard::{Assessment, Config, Frame, IncidentEngine, IncidentKind, DEFAULT_SOURCE};

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay recorded detections through the incident engine", long_about = None)]
struct Args {
    /// JSON-lines file with one frame of detections per line
    #[arg(short, long)]
    input: PathBuf,

    /// YAML config overriding the default thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print a frame only when its stream's incident label changes
    #[arg(long)]
    only_changes: bool,
}

/// Remembers the last label seen on every stream.
#[derive(Default)]
struct LabelChanges {
    last: HashMap<String, IncidentKind>,
}

impl LabelChanges {
    /// Returns `true` for the first frame of a stream and whenever its
    /// label differs from the previous frame's.
    fn observe(&mut self, source: &str, kind: IncidentKind) -> bool {
        self.last.insert(source.to_string(), kind) != Some(kind)
    }
}

#[derive(Serialize)]
struct Line<'a> {
    frame: usize,
    source: &'a str,
    #[serde(flatten)]
    assessment: Assessment,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cityguard=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::default(),
    };

    let reader = BufReader::new(
        File::open(&args.input)
            .with_context(|| format!("opening {}", args.input.display()))?,
    );

    let mut engine = IncidentEngine::new(config.classifier);
    let mut changes = LabelChanges::default();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut frames = 0;

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: Frame = match serde_json::from_str(&line) {
            Ok(frame) => frame,
            Err(err) => {
                warn!(line = idx + 1, %err, "skipping malformed frame");
                continue;
            }
        };

        let source = frame.source.as_deref().unwrap_or(DEFAULT_SOURCE);
        let assessment = Assessment::from(engine.classify_frame(&frame));
        frames += 1;

        let changed = changes.observe(source, assessment.record.incident_type);

        if args.only_changes && !changed {
            continue;
        }

        let record = Line {
            frame: idx,
            source,
            assessment,
        };
        serde_json::to_writer(&mut out, &record)?;
        writeln!(out)?;
    }

    info!(frames, streams = engine.sources().count(), "replay finished");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_changes_are_tracked_per_stream() {
        let mut changes = LabelChanges::default();

        assert!(changes.observe("north", IncidentKind::Normal));
        assert!(!changes.observe("north", IncidentKind::Normal));
        assert!(changes.observe("south", IncidentKind::Normal));
        assert!(changes.observe("north", IncidentKind::Fire));
        assert!(!changes.observe("south", IncidentKind::Normal));
        assert!(changes.observe("north", IncidentKind::Normal));
    }
}
