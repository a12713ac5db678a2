//! Request DTOs sent to the battle server

use serde::Serialize;
use validator::Validate;

use crate::constants::MAX_TASK_TITLE_LENGTH;

/// Create match request
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CreateMatchRequest {
    pub task_id: i64,

    /// Creator, by external id
    pub player1_id: i64,

    pub is_active: bool,

    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Solution submission body (practice and match endpoints share it)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmitSolutionRequest {
    /// Internal user id
    pub user_id: i64,
    pub task_id: i64,
    pub solution: String,
}

/// Create task request
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(length(min = 1, max = MAX_TASK_TITLE_LENGTH))]
    pub title: String,

    #[validate(length(min = 1))]
    pub description: String,

    #[validate(range(min = 1, max = 5))]
    pub difficulty: i32,

    #[validate(custom(function = "crate::utils::validation::validate_language_field"))]
    pub language: String,

    /// Reference solution the hidden tests are generated from
    #[validate(length(min = 1))]
    pub code: String,

    pub tg_id: i64,
}

/// Test generation request; input/output are left empty for server-side generation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateTestsRequest {
    pub task_id: i64,
    pub input: String,
    pub output: String,
}

impl GenerateTestsRequest {
    pub fn for_task(task_id: i64) -> Self {
        Self {
            task_id,
            input: String::new(),
            output: String::new(),
        }
    }
}
