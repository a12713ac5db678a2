//! Application-wide constants
//!
//! This module contains all constant values used throughout the client core.
//! Constants are grouped by their purpose for better organization.

// =============================================================================
// API DEFAULTS
// =============================================================================

/// Default base URL of the battle server
pub const DEFAULT_API_BASE: &str = "http://localhost:3309";

/// Default log filter for the watcher binary
pub const DEFAULT_LOG_FILTER: &str = "codeduel=info";

// =============================================================================
// POLLING DEFAULTS
// =============================================================================

/// Default period of the match-directory refresh, in seconds
pub const DEFAULT_MATCH_POLL_INTERVAL_SECS: u64 = 5;

// =============================================================================
// IDENTITY DEFAULTS
// =============================================================================

/// Default location of the locally persisted fallback identity
pub const DEFAULT_IDENTITY_FILE: &str = ".codeduel_identity";

// =============================================================================
// ELIGIBILITY
// =============================================================================

/// Minimum elo required to create tasks and matches
pub const MIN_CREATION_ELO: i32 = 1000;

// =============================================================================
// TASK SETTINGS
// =============================================================================

/// Lowest task difficulty
pub const MIN_DIFFICULTY: i32 = 1;

/// Highest task difficulty
pub const MAX_DIFFICULTY: i32 = 5;

/// Maximum task title length
pub const MAX_TASK_TITLE_LENGTH: u64 = 100;

/// Supported task languages
pub mod languages {
    pub const PYTHON: &str = "python";
    pub const JAVASCRIPT: &str = "js";
    pub const C: &str = "c";
    pub const CPP: &str = "cpp";
    pub const RUST: &str = "rust";
    pub const GO: &str = "go";

    /// All supported language identifiers
    pub const ALL: &[&str] = &[PYTHON, JAVASCRIPT, C, CPP, RUST, GO];
}

// =============================================================================
// ENDPOINTS
// =============================================================================

/// Server endpoint paths (relative to the API base)
pub mod paths {
    pub const COMPETITIONS: &str = "/api/competitions";
    pub const CREATE_COMPETITION: &str = "/api/competitions/create";
    pub const TASKS: &str = "/api/tasks";
    pub const CREATE_TASK: &str = "/api/create_task";
    pub const LEADERBOARD: &str = "/api/leaderboard";

    pub fn competition(match_id: i64) -> String {
        format!("{COMPETITIONS}/{match_id}")
    }

    pub fn join_competition(match_id: i64, tg_id: i64) -> String {
        format!("{COMPETITIONS}/join/{match_id}/{tg_id}")
    }

    pub fn leave_competition(match_id: i64, tg_id: i64) -> String {
        format!("{COMPETITIONS}/leave/{match_id}/player/{tg_id}")
    }

    pub fn task(task_id: i64) -> String {
        format!("/api/task/{task_id}")
    }

    pub fn submit_practice(task_id: i64, user_id: i64) -> String {
        format!("/api/task/{task_id}/user/{user_id}/post")
    }

    pub fn submit_competition(task_id: i64, user_id: i64, match_id: i64) -> String {
        format!("/api/task/{task_id}/user/{user_id}/post_competition/{match_id}")
    }

    pub fn correct_solutions(tg_id: i64, task_id: i64) -> String {
        format!("/api/solutions/correct/{tg_id}/{task_id}")
    }

    pub fn profile(tg_id: i64) -> String {
        format!("/api/profile/{tg_id}")
    }

    pub fn extended_profile(tg_id: i64) -> String {
        format!("/api/profile/{tg_id}/extended")
    }

    pub fn create_tests(user_id: i64) -> String {
        format!("/api/create_tests/{user_id}")
    }
}

// =============================================================================
// CONFLICT CODES
// =============================================================================

/// Machine-readable codes the server attaches to join/leave conflicts
pub mod conflict_codes {
    pub const SLOT_FILLED: &str = "slot_filled";
    pub const MATCH_INACTIVE: &str = "match_inactive";
    pub const ALREADY_JOINED: &str = "already_joined";

    pub const ALL: &[&str] = &[SLOT_FILLED, MATCH_INACTIVE, ALREADY_JOINED];
}
