//! # qb-board
//!
//! Board state: the question list with its add/answer/import/filter/export
//! operations, plus the import session that stages a dump before it is merged.

pub mod board;
pub mod seed;
pub mod session;

pub use board::{filter_questions, Board, EXPORT_FILE_NAME};
pub use seed::sample_questions;
pub use session::{ImportSession, ImportStep};
