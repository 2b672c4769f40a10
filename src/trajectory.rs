//! Per-track center history used to spot vehicles that stopped moving.
//!
//! Histories are keyed by the tracker-assigned identifier and hold a bounded
//! number of recent centers each. The number of identifiers is only bounded
//! by the [`EvictionPolicy`]; the default [`RetainAll`] never forgets one, so
//! very long sessions should opt into [`EvictUnseen`].

use std::collections::HashMap;
use std::fmt;

use nalgebra as na;
use tracing::debug;

use crate::circular_queue::CircularQueue;
use crate::geometry;

pub const DEFAULT_HISTORY_LEN: usize = 15;

#[derive(Debug, Clone)]
pub struct TrackHistory {
    points: CircularQueue<na::Point2<f32>>,
    last_seen: u64,
}

impl TrackHistory {
    fn new(capacity: usize, frame: u64) -> Self {
        Self {
            points: CircularQueue::with_capacity(capacity),
            last_seen: frame,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[inline]
    pub fn last_seen(&self) -> u64 {
        self.last_seen
    }

    /// Oldest to newest.
    #[inline]
    pub fn points(&self) -> impl Iterator<Item = &na::Point2<f32>> {
        self.points.iter()
    }

    /// Straight-line distance between the oldest and newest recorded centers.
    pub fn displacement(&self) -> Option<f32> {
        let first = self.points.oldest()?;
        let last = self.points.newest()?;

        Some(geometry::displacement(first, last))
    }
}

/// Decides when an identifier that stopped reappearing may be forgotten.
pub trait EvictionPolicy: fmt::Debug + Send {
    fn should_evict(&self, last_seen: u64, now: u64) -> bool;
}

/// Never forgets an identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct RetainAll;

impl EvictionPolicy for RetainAll {
    #[inline]
    fn should_evict(&self, _last_seen: u64, _now: u64) -> bool {
        false
    }
}

/// Forgets identifiers not updated during the last `frames` frames.
#[derive(Debug, Clone, Copy)]
pub struct EvictUnseen {
    pub frames: u64,
}

impl EvictionPolicy for EvictUnseen {
    #[inline]
    fn should_evict(&self, last_seen: u64, now: u64) -> bool {
        now.saturating_sub(last_seen) > self.frames
    }
}

#[derive(Debug)]
pub struct TrajectoryStore {
    capacity: usize,
    frame: u64,
    histories: HashMap<u32, TrackHistory>,
    policy: Box<dyn EvictionPolicy>,
}

impl TrajectoryStore {
    pub fn new(capacity: usize) -> Self {
        Self::with_policy(capacity, Box::new(RetainAll))
    }

    pub fn with_policy(capacity: usize, policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            capacity,
            frame: 0,
            histories: HashMap::new(),
            policy,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Starts a new frame for the eviction clock.
    #[inline]
    pub fn advance_frame(&mut self) {
        self.frame += 1;
    }

    pub fn record(&mut self, track_id: u32, center: na::Point2<f32>) {
        let (capacity, frame) = (self.capacity, self.frame);
        let history = self
            .histories
            .entry(track_id)
            .or_insert_with(|| TrackHistory::new(capacity, frame));

        history.points.push(center);
        history.last_seen = frame;
    }

    #[inline]
    pub fn get(&self, track_id: u32) -> Option<&TrackHistory> {
        self.histories.get(&track_id)
    }

    /// Recorded centers for `track_id`, oldest first; empty when never seen.
    pub fn history_of(&self, track_id: u32) -> Vec<na::Point2<f32>> {
        self.histories
            .get(&track_id)
            .map(|h| h.points().copied().collect())
            .unwrap_or_default()
    }

    /// Applies the eviction policy, returning how many identifiers were dropped.
    pub fn prune(&mut self) -> usize {
        let now = self.frame;
        let before = self.histories.len();
        let policy = &self.policy;

        self.histories
            .retain(|_, history| !policy.should_evict(history.last_seen, now));

        let evicted = before - self.histories.len();
        if evicted > 0 {
            debug!(evicted, frame = now, "dropped stale track histories");
        }

        evicted
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.histories.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.histories.is_empty()
    }

    pub fn clear(&mut self) {
        self.histories.clear();
        self.frame = 0;
    }
}

impl Default for TrajectoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LEN)
    }
}
