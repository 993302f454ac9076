// src/lib.rs

//! Reclassify and normalize ground-truth refactoring descriptions mined from
//! git history.
//!
//! A commit's descriptions are classified by kind, Move Class assertions that
//! amount to a whole package being renamed are collapsed into one Rename
//! Package (using the folder layout before and after the commit), generic
//! type noise is stripped, and repeated descriptions are merged.

pub mod aggregate;
pub mod analyzer;
pub mod batch;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod names;
pub mod normalize;
pub mod reclassify;
pub mod sink;
pub mod snapshot;

pub use error::{CurateError, Result};
pub use model::RefactoringKind;
