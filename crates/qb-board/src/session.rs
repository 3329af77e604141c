//! # Import Session
//!
//! One import at a time: `Select → Processing → Preview`, reset on cancel,
//! on failure, and after the preview is committed to the board.

use qb_core::{AppError, Question, Result};
use qb_import::Normalizer;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ImportStep {
    #[default]
    Select,
    Processing { file_name: String },
    Preview { file_name: String, records: Vec<Question> },
}

#[derive(Debug, Default)]
pub struct ImportSession {
    step: ImportStep,
}

impl ImportSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> &ImportStep {
        &self.step
    }

    /// Claims the session for `file_name`. Fails while another import is open.
    pub fn begin(&mut self, file_name: impl Into<String>) -> Result<()> {
        if self.step != ImportStep::Select {
            return Err(AppError::Conflict("an import is already in progress".to_string()));
        }
        self.step = ImportStep::Processing { file_name: file_name.into() };
        Ok(())
    }

    /// Normalizes the file contents read for the current import.
    ///
    /// Success moves the session to `Preview`; any error resets it to `Select`.
    pub fn complete(&mut self, raw: &str, normalizer: &Normalizer) -> Result<&[Question]> {
        let file_name = match &self.step {
            ImportStep::Processing { file_name } => file_name.clone(),
            _ => return Err(AppError::Conflict("no import is being processed".to_string())),
        };
        self.step = ImportStep::Select;

        match normalizer.import_str(raw) {
            Ok(records) => {
                tracing::info!(file = %file_name, records = records.len(), "import ready for preview");
                self.step = ImportStep::Preview { file_name, records };
                Ok(self.preview().unwrap_or_default())
            }
            Err(e) => {
                tracing::warn!(file = %file_name, error = %e, "import failed");
                Err(e.into())
            }
        }
    }

    pub fn preview(&self) -> Option<&[Question]> {
        match &self.step {
            ImportStep::Preview { records, .. } => Some(records),
            _ => None,
        }
    }

    /// Abandons the import from any step, discarding its records.
    pub fn cancel(&mut self) {
        self.step = ImportStep::Select;
    }

    /// Hands over the previewed records and resets the session.
    pub(crate) fn take_preview(&mut self) -> Option<Vec<Question>> {
        match std::mem::take(&mut self.step) {
            ImportStep::Preview { records, .. } => Some(records),
            other => {
                self.step = other;
                None
            }
        }
    }
}
