//! Production implementations of the core ports.

use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::models::QuestionId;
use crate::traits::{Clock, IdGenerator, ImportEvent, ImportObserver};

/// Today's date in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

/// Time-ordered UUID v7 ids, unique even across repeated imports of one file.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV7Generator;

impl IdGenerator for UuidV7Generator {
    fn next_id(&self) -> QuestionId {
        QuestionId::new(Uuid::now_v7().to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ImportObserver for NoopObserver {
    fn on_event(&self, _event: &ImportEvent) {}
}

/// Forwards import diagnostics to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_event(&self, event: &ImportEvent) {
        match event {
            ImportEvent::StrategyMissed { strategy } => {
                tracing::trace!(strategy, "extraction strategy found nothing");
            }
            ImportEvent::StrategyMatched { strategy, records } => {
                tracing::debug!(strategy, records, "extraction strategy matched");
            }
            ImportEvent::RecordConverted { index, id } => {
                tracing::trace!(index, id = %id, "record converted");
            }
            ImportEvent::RecordSkipped { index, reason } => {
                tracing::debug!(index, ?reason, "record skipped");
            }
            ImportEvent::Finished { converted, inspected } => {
                tracing::info!(converted, inspected, "import normalized");
            }
        }
    }
}
