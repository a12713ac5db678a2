//! Task model

use serde::{Deserialize, Serialize};

use crate::constants::{MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Task as served by the battle server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub difficulty: i32,
    pub language: String,
    /// Language-tagged source text; only the detail endpoint carries it
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Check the difficulty invariant
    pub fn has_valid_difficulty(&self) -> bool {
        (MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty)
    }

    /// Case-insensitive substring match over title and description.
    /// `needle` must already be lowercase.
    pub fn matches_term(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.description.to_lowercase().contains(needle)
    }
}

/// Moderation status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Approved,
    Rejected,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Inclusive difficulty window used by task listings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DifficultyRange {
    min: i32,
    max: i32,
}

impl DifficultyRange {
    /// Build a range, clamping both ends into the supported bounds
    pub fn new(min: i32, max: i32) -> Self {
        let min = min.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        let max = max.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, difficulty: i32) -> bool {
        (self.min..=self.max).contains(&difficulty)
    }
}

impl Default for DifficultyRange {
    fn default() -> Self {
        Self {
            min: MIN_DIFFICULTY,
            max: MAX_DIFFICULTY,
        }
    }
}
