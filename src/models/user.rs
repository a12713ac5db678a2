//! User profile model

use serde::{Deserialize, Serialize};

use super::{Match, Task};
use crate::constants::MIN_CREATION_ELO;

/// Profile as served by the battle server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Internal id, used by submission endpoints
    pub id: i64,
    /// External identity supplied by the host
    pub tg_id: i64,
    pub elo: i32,
    #[serde(rename = "solved", default)]
    pub solved_count: i32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar_path: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Date or timestamp, as the server formats it
    #[serde(default)]
    pub join_date: Option<String>,
}

impl UserProfile {
    /// Elo still missing before creation unlocks
    pub fn elo_shortfall(&self) -> i32 {
        (MIN_CREATION_ELO - self.elo).max(0)
    }
}

/// Profile with solved tasks and battle history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProfile {
    pub user: UserProfile,
    #[serde(default)]
    pub solved_tasks: Vec<Task>,
    #[serde(default)]
    pub matches: Option<Vec<Match>>,
    #[serde(default)]
    pub battle_wins: Option<i32>,
}
