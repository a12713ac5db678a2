//! Input validation utilities
//!
//! Everything here runs before any request is built, so a failure never reaches the network.

use std::borrow::Cow;

use validator::ValidationError;

use crate::constants;

/// Validate a solution before submission
pub fn validate_solution(solution: &str) -> Result<(), &'static str> {
    if solution.trim().is_empty() {
        return Err("Solution cannot be empty");
    }
    Ok(())
}

/// Validate and sanitize a match name
pub fn validate_match_name(name: &str) -> Result<String, &'static str> {
    let sanitized = sanitize_string(name);
    if sanitized.is_empty() {
        return Err("Match name cannot be empty");
    }
    if sanitized.chars().count() > 100 {
        return Err("Match name must be at most 100 characters");
    }
    Ok(sanitized)
}

/// Validate programming language
pub fn validate_language(language: &str) -> Result<(), &'static str> {
    if constants::languages::ALL.contains(&language) {
        Ok(())
    } else {
        Err("Unsupported programming language")
    }
}

/// `validator` adapter for [`validate_language`]
pub fn validate_language_field(language: &str) -> Result<(), ValidationError> {
    validate_language(language).map_err(|msg| {
        let mut err = ValidationError::new("language");
        err.message = Some(Cow::Borrowed(msg));
        err
    })
}

/// Sanitize string input (remove control characters, trim whitespace)
pub fn sanitize_string(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect::<String>()
        .trim()
        .to_string()
}
