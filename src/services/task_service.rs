//! Task service

use std::sync::Arc;

use validator::Validate;

use super::directory_service::MatchDirectory;
use super::eligibility_service::EligibilityGate;
use crate::api::{ArenaApi, CreateTaskRequest, GenerateTestsRequest};
use crate::constants::{MIN_DIFFICULTY, languages};
use crate::error::ClientResult;
use crate::models::Task;
use crate::session::SessionContext;

/// Task creation form state; kept populated until a creation succeeds
#[derive(Debug, Clone, PartialEq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub difficulty: i32,
    pub language: String,
    /// Reference solution
    pub code: String,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            difficulty: MIN_DIFFICULTY,
            language: languages::PYTHON.to_string(),
            code: String::new(),
        }
    }
}

impl TaskForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn to_request(&self, tg_id: i64) -> CreateTaskRequest {
        CreateTaskRequest {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            difficulty: self.difficulty,
            language: self.language.clone(),
            code: self.code.clone(),
            tg_id,
        }
    }
}

/// Task detail and task creation
pub struct TaskService {
    api: Arc<dyn ArenaApi>,
    session: Arc<SessionContext>,
    directory: Arc<MatchDirectory>,
}

impl TaskService {
    pub fn new(
        api: Arc<dyn ArenaApi>,
        session: Arc<SessionContext>,
        directory: Arc<MatchDirectory>,
    ) -> Self {
        Self {
            api,
            session,
            directory,
        }
    }

    /// Task with its solution template
    pub async fn task_detail(&self, task_id: i64) -> ClientResult<Task> {
        self.api.get_task(task_id).await
    }

    /// Create a task and request generation of its hidden tests.
    ///
    /// The eligibility gate and form validation both run before any request is sent.
    /// Test generation is fire-and-forget; its failure is logged and never reported.
    pub async fn create_task(&self, form: &mut TaskForm) -> ClientResult<Task> {
        let profile = self.session.require_profile().await?;
        EligibilityGate::ensure_can_create(&profile)?;

        let request = form.to_request(self.session.tg_id());
        request.validate()?;

        let task = self.api.create_task(&request).await?;
        tracing::info!("Created task {} ({})", task.id, task.title);
        self.directory.append_task(task.clone()).await;

        let api = self.api.clone();
        let user_id = profile.id;
        let generate = GenerateTestsRequest::for_task(task.id);
        tokio::spawn(async move {
            match api.request_test_generation(user_id, &generate).await {
                Ok(()) => tracing::debug!("Test generation requested for task {}", generate.task_id),
                Err(e) => tracing::warn!(
                    "Test generation for task {} failed: {}",
                    generate.task_id,
                    e
                ),
            }
        });

        form.clear();
        Ok(task)
    }
}
