//! Structured run logging.
//!
//! Every lifecycle event of a summary run carries the run ID and variant
//! as fields, so one run can be followed through interleaved server logs.

use tracing::{error, info, warn, Span};
use trim_models::{RunId, SummaryVariant};

/// Run logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
    variant: SummaryVariant,
}

impl RunLogger {
    pub fn new(run_id: &RunId, variant: SummaryVariant) -> Self {
        Self {
            run_id: run_id.to_string(),
            variant,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            variant = %self.variant,
            "Run started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            variant = %self.variant,
            "Run progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            run_id = %self.run_id,
            variant = %self.variant,
            "Run warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            run_id = %self.run_id,
            variant = %self.variant,
            "Run error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            run_id = %self.run_id,
            variant = %self.variant,
            "Run completed: {}", message
        );
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn variant(&self) -> SummaryVariant {
        self.variant
    }

    /// Span that wraps the whole run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "run",
            run_id = %self.run_id,
            variant = %self.variant
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_logger_creation() {
        let run_id = RunId::from("run-42");
        let logger = RunLogger::new(&run_id, SummaryVariant::Scene);

        assert_eq!(logger.run_id(), "run-42");
        assert_eq!(logger.variant(), SummaryVariant::Scene);
    }
}
