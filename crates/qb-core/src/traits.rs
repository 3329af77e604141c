//! # Core Traits (Ports)
//!
//! The board and the importer depend on these instead of the wall clock,
//! a concrete id scheme or a global logger.

use chrono::NaiveDate;

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::models::QuestionId;

/// Source of "today" for question and answer dates.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Mints identifiers that are unique within one board.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> QuestionId;
}

/// Why the normalizer dropped a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No text type marker, body field or title field
    NotConvertible,
    /// Convertible, but title and body are both empty
    Empty,
}

/// Diagnostic events emitted while normalizing an import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportEvent {
    StrategyMissed { strategy: &'static str },
    StrategyMatched { strategy: &'static str, records: usize },
    RecordConverted { index: usize, id: QuestionId },
    RecordSkipped { index: usize, reason: SkipReason },
    Finished { converted: usize, inspected: usize },
}

/// Receives import diagnostics. Injected into the normalizer; the default drops them.
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait ImportObserver: Send + Sync {
    fn on_event(&self, event: &ImportEvent);
}

impl<T: ImportObserver + ?Sized> ImportObserver for std::sync::Arc<T> {
    fn on_event(&self, event: &ImportEvent) {
        (**self).on_event(event)
    }
}
