//! reqwest-backed implementation of [`ArenaApi`]

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::{
    ArenaApi, CreateMatchRequest, CreateTaskRequest, GenerateTestsRequest, SubmitSolutionRequest,
};
use crate::config::ApiConfig;
use crate::constants::paths;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    ExtendedProfile, Match, PeerSolution, SubmissionResult, Task, UserProfile,
};

/// HTTP client for the battle server
#[derive(Debug, Clone)]
pub struct HttpArenaApi {
    client: Client,
    base_url: String,
}

impl HttpArenaApi {
    /// Create a client; no timeout is set unless configured
    pub fn new(config: &ApiConfig) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and return the body of a 2xx response
    async fn send(&self, request: RequestBuilder) -> ClientResult<Vec<u8>> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            tracing::debug!("Server answered {}", status);
            return Err(ClientError::from_status(status.as_u16(), &body));
        }

        Ok(body.to_vec())
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let body = self.send(request).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl ArenaApi for HttpArenaApi {
    async fn list_matches(&self) -> ClientResult<Vec<Match>> {
        self.fetch(self.client.get(self.url(paths::COMPETITIONS)))
            .await
    }

    async fn list_tasks(
        &self,
        min_difficulty: i32,
        max_difficulty: i32,
    ) -> ClientResult<Vec<Task>> {
        let url = format!(
            "{}?min_difficulty={}&max_difficulty={}",
            self.url(paths::TASKS),
            min_difficulty,
            max_difficulty
        );
        self.fetch(self.client.get(url)).await
    }

    async fn get_task(&self, task_id: i64) -> ClientResult<Task> {
        self.fetch(self.client.get(self.url(&paths::task(task_id))))
            .await
    }

    async fn get_match(&self, match_id: i64) -> ClientResult<Match> {
        self.fetch(self.client.get(self.url(&paths::competition(match_id))))
            .await
    }

    async fn create_match(&self, request: &CreateMatchRequest) -> ClientResult<Match> {
        self.fetch(
            self.client
                .post(self.url(paths::CREATE_COMPETITION))
                .json(request),
        )
        .await
    }

    async fn join_match(&self, match_id: i64, tg_id: i64) -> ClientResult<Match> {
        self.fetch(
            self.client
                .post(self.url(&paths::join_competition(match_id, tg_id))),
        )
        .await
    }

    async fn leave_match(&self, match_id: i64, tg_id: i64) -> ClientResult<()> {
        self.send(
            self.client
                .post(self.url(&paths::leave_competition(match_id, tg_id))),
        )
        .await
        .map(|_| ())
    }

    async fn submit_practice(
        &self,
        task_id: i64,
        user_id: i64,
        request: &SubmitSolutionRequest,
    ) -> ClientResult<SubmissionResult> {
        self.fetch(
            self.client
                .post(self.url(&paths::submit_practice(task_id, user_id)))
                .json(request),
        )
        .await
    }

    async fn submit_competition(
        &self,
        task_id: i64,
        user_id: i64,
        match_id: i64,
        request: &SubmitSolutionRequest,
    ) -> ClientResult<SubmissionResult> {
        self.fetch(
            self.client
                .post(self.url(&paths::submit_competition(task_id, user_id, match_id)))
                .json(request),
        )
        .await
    }

    async fn correct_solutions(
        &self,
        tg_id: i64,
        task_id: i64,
    ) -> ClientResult<Vec<PeerSolution>> {
        self.fetch(
            self.client
                .get(self.url(&paths::correct_solutions(tg_id, task_id))),
        )
        .await
    }

    async fn get_profile(&self, tg_id: i64) -> ClientResult<UserProfile> {
        self.fetch(self.client.get(self.url(&paths::profile(tg_id))))
            .await
    }

    async fn get_extended_profile(&self, tg_id: i64) -> ClientResult<ExtendedProfile> {
        self.fetch(self.client.get(self.url(&paths::extended_profile(tg_id))))
            .await
    }

    async fn leaderboard(&self) -> ClientResult<Vec<UserProfile>> {
        self.fetch(self.client.get(self.url(paths::LEADERBOARD)))
            .await
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> ClientResult<Task> {
        self.fetch(self.client.post(self.url(paths::CREATE_TASK)).json(request))
            .await
    }

    async fn request_test_generation(
        &self,
        user_id: i64,
        request: &GenerateTestsRequest,
    ) -> ClientResult<()> {
        self.send(
            self.client
                .post(self.url(&paths::create_tests(user_id)))
                .json(request),
        )
        .await
        .map(|_| ())
    }
}
