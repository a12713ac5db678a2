//! Utility functions

pub mod search;
pub mod validation;

pub use search::{filter_matches, filter_tasks};
pub use validation::{validate_language, validate_match_name, validate_solution};
