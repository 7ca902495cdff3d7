use crate::error::{NetworkError, TriggerError};
use bytes::Bytes;
use std::fmt;

/// One of the two remote operations run against the processing server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Parse,
    Process,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Parse => "parse",
            Stage::Process => "process",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named literal input of a WPS Execute request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageInput {
    pub name: &'static str,
    pub value: i64,
}

/// Fixed request of one stage: the WPS process identifier and its inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageRequest {
    pub stage: Stage,
    pub identifier: &'static str,
    pub inputs: &'static [StageInput],
}

pub const PARSE_REQUEST: StageRequest = StageRequest {
    stage: Stage::Parse,
    identifier: "groovy:nc_parse",
    inputs: &[StageInput {
        name: "processFileLimit",
        value: 20,
    }],
};

pub const PROCESS_REQUEST: StageRequest = StageRequest {
    stage: Stage::Process,
    identifier: "groovy:nc_process",
    inputs: &[
        StageInput {
            name: "locationPrecisionFilter",
            value: 20,
        },
        StageInput {
            name: "processTracksLimit",
            value: 20,
        },
    ],
};

/// Stages in the order they run within a cycle
pub const STAGE_SEQUENCE: [StageRequest; 2] = [PARSE_REQUEST, PROCESS_REQUEST];

/// A stage request with its XML body, encoded once at startup
#[derive(Debug, Clone)]
pub struct StagePayload {
    pub request: StageRequest,
    pub body: String,
}

impl StagePayload {
    pub fn stage(&self) -> Stage {
        self.request.stage
    }
}

/// Qualifying file names found by a single directory scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingUploadSet {
    pub files: Vec<String>,
}

impl PendingUploadSet {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Result of a single stage request that reached the server
#[derive(Debug, Clone)]
pub enum StageOutcome {
    /// HTTP 200; the body is kept as-is and never interpreted
    Success(Bytes),
    /// Any other status code
    Failure(NetworkError),
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success(_))
    }
}

/// What happened to one stage during a cycle
#[derive(Debug)]
pub enum StageStatus {
    Completed(StageOutcome),
    /// The request never produced a status code (connection refused, timeout...)
    Errored(TriggerError),
    /// Not attempted because an earlier stage failed under `StopOnFailure`
    Skipped,
}

impl StageStatus {
    pub fn is_success(&self) -> bool {
        matches!(self, StageStatus::Completed(outcome) if outcome.is_success())
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, StageStatus::Skipped)
    }
}

#[derive(Debug)]
pub struct StageReport {
    pub stage: Stage,
    pub status: StageStatus,
}

/// Summary of one trigger cycle
#[derive(Debug)]
pub enum CycleReport {
    /// No qualifying file, nothing was sent
    Idle,
    /// The watched directory could not be listed
    ScanFailed(TriggerError),
    Triggered {
        pending: usize,
        stages: Vec<StageReport>,
    },
}

impl CycleReport {
    /// Number of stage requests that were actually sent
    pub fn requests_sent(&self) -> usize {
        match self {
            CycleReport::Triggered { stages, .. } => {
                stages.iter().filter(|s| !s.status.is_skipped()).count()
            }
            _ => 0,
        }
    }
}
