//! Match model
//!
//! A match is a head-to-head battle between two players on one task. Player ids are
//! external (tg) ids. The server owns these records; the client only holds copies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Match as served by the battle server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    pub task_id: i64,
    pub player1_id: i64,
    #[serde(default)]
    pub player2_id: Option<i64>,
    pub is_active: bool,
    #[serde(default)]
    pub winner_id: Option<i64>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
}

impl Match {
    /// Check if the user occupies either slot
    pub fn involves(&self, tg_id: i64) -> bool {
        self.player1_id == tg_id || self.player2_id == Some(tg_id)
    }

    /// Active and waiting for a second player
    pub fn is_open(&self) -> bool {
        self.is_active && self.player2_id.is_none()
    }

    /// Active with both slots taken
    pub fn is_full(&self) -> bool {
        self.is_active && self.player2_id.is_some()
    }

    /// Phase of this match as seen in a single observation
    pub fn phase(&self) -> MatchPhase {
        if !self.is_active {
            MatchPhase::Closed
        } else if self.player2_id.is_some() {
            MatchPhase::Full
        } else {
            MatchPhase::Open
        }
    }

    /// Name for display, falling back to the id
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Match #{}", self.id),
        }
    }
}

/// Match lifecycle phase from the perspective of one observing client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchPhase {
    /// Created, waiting for a second player
    Open,
    /// Both players present and active
    Full,
    /// Terminal for this match id
    Closed,
}

impl std::fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Full => write!(f, "full"),
            Self::Closed => write!(f, "closed"),
        }
    }
}

/// Whether a user can join a given match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinAvailability {
    /// The user created this match
    Creator,
    /// Second slot is taken (or the match is no longer active)
    Full,
    /// The user already has an active match
    AlreadyInMatch,
    Joinable,
}

impl JoinAvailability {
    pub fn can_join(&self) -> bool {
        matches!(self, Self::Joinable)
    }
}
