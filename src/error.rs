use crate::models::Stage;
use reqwest::StatusCode;
use std::path::PathBuf;
use thiserror::Error;

/// Non-200 answer from the processing server
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{stage} stage failed with HTTP {status}")]
pub struct NetworkError {
    pub stage: Stage,
    pub status: StatusCode,
}

impl NetworkError {
    pub fn new(stage: Stage, status: StatusCode) -> Self {
        Self { stage, status }
    }

    /// Status code with its reason phrase, e.g. "500 Internal Server Error"
    pub fn description(&self) -> String {
        self.status.to_string()
    }
}

#[derive(Error, Debug)]
pub enum TriggerError {
    #[error("Upload directory {} unavailable: {source}", .path.display())]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Transport error during {stage} stage: {source}")]
    Transport {
        stage: Stage,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid WPS endpoint '{url}': {reason}")]
    InvalidEndpoint { url: String, reason: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("Failed to encode {stage} request: {reason}")]
    Encode { stage: Stage, reason: String },
}
