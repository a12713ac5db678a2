//! Battle server API
//!
//! [`ArenaApi`] has one method per server endpoint. Components only talk to the server
//! through this trait, so tests can swap in an in-memory arena or a mock.

mod http;
pub mod request;

pub use http::HttpArenaApi;
pub use request::*;

use async_trait::async_trait;

use crate::error::ClientResult;
use crate::models::{
    ExtendedProfile, Match, PeerSolution, SubmissionResult, Task, UserProfile,
};

/// Request/response contract of the battle server
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ArenaApi: Send + Sync {
    /// GET /api/competitions
    async fn list_matches(&self) -> ClientResult<Vec<Match>>;

    /// GET /api/tasks
    async fn list_tasks(&self, min_difficulty: i32, max_difficulty: i32)
    -> ClientResult<Vec<Task>>;

    async fn get_task(&self, task_id: i64) -> ClientResult<Task>;

    async fn get_match(&self, match_id: i64) -> ClientResult<Match>;

    async fn create_match(&self, request: &CreateMatchRequest) -> ClientResult<Match>;

    async fn join_match(&self, match_id: i64, tg_id: i64) -> ClientResult<Match>;

    async fn leave_match(&self, match_id: i64, tg_id: i64) -> ClientResult<()>;

    /// Standalone practice submission
    async fn submit_practice(
        &self,
        task_id: i64,
        user_id: i64,
        request: &SubmitSolutionRequest,
    ) -> ClientResult<SubmissionResult>;

    /// Match-bound submission; the server resolves the opponent and match completion
    async fn submit_competition(
        &self,
        task_id: i64,
        user_id: i64,
        match_id: i64,
        request: &SubmitSolutionRequest,
    ) -> ClientResult<SubmissionResult>;

    async fn correct_solutions(&self, tg_id: i64, task_id: i64)
    -> ClientResult<Vec<PeerSolution>>;

    async fn get_profile(&self, tg_id: i64) -> ClientResult<UserProfile>;

    async fn get_extended_profile(&self, tg_id: i64) -> ClientResult<ExtendedProfile>;

    async fn leaderboard(&self) -> ClientResult<Vec<UserProfile>>;

    async fn create_task(&self, request: &CreateTaskRequest) -> ClientResult<Task>;

    /// POST /api/create_tests/{user_id}; the response body is ignored
    async fn request_test_generation(
        &self,
        user_id: i64,
        request: &GenerateTestsRequest,
    ) -> ClientResult<()>;
}
