use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config Error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Detection backend failed: {0}")]
    Backend(String),

    #[error("Report generation failed: {0}")]
    Report(String),

    #[error("Classifier lock poisoned")]
    Poisoned,
}
