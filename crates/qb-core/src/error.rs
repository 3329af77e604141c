//! # AppError
//!
//! Centralized error handling for the Q&A board.
//! `ImportError` covers a failed import attempt; `AppError` covers board operations
//! and wraps import failures when they surface through the board.

use std::fmt;

use thiserror::Error;

/// Account details found in an export that contained no posts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountSummary {
    pub blog_names: Vec<String>,
    pub registration_time: Option<String>,
    pub last_post_time: Option<String>,
}

impl fmt::Display for AccountSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.blog_names.is_empty() {
            parts.push(format!("blogs: {}", self.blog_names.join(", ")));
        }
        if let Some(registered) = &self.registration_time {
            parts.push(format!("registered: {}", registered));
        }
        match &self.last_post_time {
            Some(last) => parts.push(format!("last post: {}", last)),
            None => parts.push("no post history".to_string()),
        }
        f.write_str(&parts.join("; "))
    }
}

/// Terminal failures of one import attempt. None of them touch the board.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The input is not valid JSON
    #[error("could not parse import file: {0}")]
    Parse(#[from] serde_json::Error),

    /// No post collection could be located anywhere in the document
    #[error("no post collection found; available keys: [{}]", .keys.join(", "))]
    StructureNotFound { keys: Vec<String> },

    /// An account export was recognised but holds no posts
    #[error("no post data found in this account export ({0})")]
    NoAccountPosts(AccountSummary),

    /// The export points at an external download instead of carrying posts
    #[error("post data must be downloaded separately from {0}")]
    ExternalLink(String),

    /// A collection was found but none of its records could be converted
    #[error("no importable content among {inspected} records")]
    NoContent { inspected: usize },
}

/// The primary error type for all board operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Question)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty form field, unknown category)
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Operation not allowed in the current state (e.g., import already running)
    #[error("conflict: {0}")]
    Conflict(String),

    /// An import attempt failed
    #[error("import failed: {0}")]
    Import(#[from] ImportError),

    /// Export serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for board logic.
pub type Result<T> = std::result::Result<T, AppError>;
