use crate::config::TriggerConfig;
use crate::error::TriggerError;
use crate::models::{CycleReport, StageStatus};
use crate::services::scanner;
use crate::services::sequencer::TriggerSequencer;
use crate::services::wps_client::ProcessingClient;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::sleep;

/// Polls the upload directory and triggers the WPS stages when archives show up
pub struct UploadPoller {
    config: TriggerConfig,
    sequencer: TriggerSequencer,
    shutdown: watch::Receiver<bool>,
}

impl UploadPoller {
    pub fn new(
        config: TriggerConfig,
        client: Arc<dyn ProcessingClient>,
        shutdown: watch::Receiver<bool>,
    ) -> Result<Self, TriggerError> {
        let sequencer = TriggerSequencer::new(client, config.stage_policy)?;
        Ok(Self {
            config,
            sequencer,
            shutdown,
        })
    }

    /// Run cycles until shutdown is signalled. Returns the number of cycles run.
    pub async fn run(mut self) -> u64 {
        tracing::info!(
            "🚀 Upload poller started: watching {} for *{} every {:?}",
            self.config.watch_dir.display(),
            self.config.suffix,
            self.config.poll_interval
        );

        let mut cycles = 0;
        loop {
            if *self.shutdown.borrow() {
                break;
            }

            self.poll_once().await;
            cycles += 1;

            tokio::select! {
                changed = self.shutdown.changed() => {
                    // Sender dropped: treat as shutdown
                    if changed.is_err() {
                        break;
                    }
                }
                _ = sleep(self.config.poll_interval) => {}
            }
        }

        tracing::info!("🛑 Upload poller shutting down after {} cycle(s)", cycles);
        cycles
    }

    /// One trigger cycle: scan, and run the stages if anything is pending.
    ///
    /// Never fails: scan and stage errors are logged and carried in the report.
    pub async fn poll_once(&self) -> CycleReport {
        let pending = match scanner::scan(&self.config.watch_dir, &self.config.suffix) {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!("❌ {}", e);
                return CycleReport::ScanFailed(e);
            }
        };

        if pending.is_empty() {
            return CycleReport::Idle;
        }

        tracing::info!("📦 Found {} file(s), running WPS calls", pending.len());
        let stages = self.sequencer.run().await;

        let succeeded = stages.iter().filter(|s| s.status.is_success()).count();
        let skipped = stages
            .iter()
            .filter(|s| matches!(s.status, StageStatus::Skipped))
            .count();
        tracing::info!(
            "🏁 End of calls: {}/{} stage(s) succeeded, {} skipped",
            succeeded,
            stages.len(),
            skipped
        );

        CycleReport::Triggered {
            pending: pending.len(),
            stages,
        }
    }
}
