pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

pub use crate::config::{StagePolicy, TriggerConfig};
pub use crate::error::{NetworkError, TriggerError};
pub use crate::services::worker::UploadPoller;
