//! # qb-import
//!
//! Import normalizer for social-platform export dumps.
//! A dump of unknown shape goes through an ordered table of extraction
//! strategies (`strategies`), then each located record is mapped into a
//! `Question` (`normalizer`). Board exports are recognised and returned as-is.

pub mod category;
pub mod dates;
pub mod lookup;
pub mod normalizer;
pub mod reconstruct;
pub mod strategies;
pub mod text;

pub use normalizer::{NormalizeOptions, Normalizer};
pub use strategies::{Strategy, ROOT_STRATEGIES, WRAPPER_STRATEGIES};
