use crate::config::StagePolicy;
use crate::error::TriggerError;
use crate::models::{STAGE_SEQUENCE, StageOutcome, StagePayload, StageReport, StageStatus};
use crate::services::wps_client::ProcessingClient;
use crate::utils::wps_xml;
use std::sync::Arc;

/// Runs the parse then process stages against the processing server
pub struct TriggerSequencer {
    client: Arc<dyn ProcessingClient>,
    stages: Vec<StagePayload>,
    policy: StagePolicy,
}

impl TriggerSequencer {
    /// Encodes every stage body up front; they are reused unchanged for each cycle.
    pub fn new(
        client: Arc<dyn ProcessingClient>,
        policy: StagePolicy,
    ) -> Result<Self, TriggerError> {
        let stages = STAGE_SEQUENCE
            .iter()
            .copied()
            .map(wps_xml::prepare)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            client,
            stages,
            policy,
        })
    }

    pub fn stages(&self) -> &[StagePayload] {
        &self.stages
    }

    /// Trigger every stage in order, one request each
    pub async fn run(&self) -> Vec<StageReport> {
        let mut reports = Vec::with_capacity(self.stages.len());
        let mut failed = false;

        for payload in &self.stages {
            let stage = payload.stage();

            if failed && self.policy == StagePolicy::StopOnFailure {
                tracing::warn!("⏭️  Skipping {} stage after earlier failure", stage);
                reports.push(StageReport {
                    stage,
                    status: StageStatus::Skipped,
                });
                continue;
            }

            let status = match self.client.trigger_stage(payload).await {
                Ok(StageOutcome::Success(body)) => {
                    tracing::info!("✅ {} stage completed ({} bytes)", stage, body.len());
                    tracing::debug!("{} stage response: {}", stage, String::from_utf8_lossy(&body));
                    StageStatus::Completed(StageOutcome::Success(body))
                }
                Ok(StageOutcome::Failure(err)) => {
                    tracing::warn!("⚠️  Network error: {}", err);
                    failed = true;
                    StageStatus::Completed(StageOutcome::Failure(err))
                }
                Err(e) => {
                    tracing::error!("❌ Unexpected error: {}", e);
                    failed = true;
                    StageStatus::Errored(e)
                }
            };

            reports.push(StageReport { stage, status });
        }

        reports
    }
}
