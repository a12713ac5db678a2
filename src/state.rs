//! Session state management
//!
//! This module wires the components of one client session together. Every component
//! receives the same explicit [`SessionContext`] instead of reading identity ad hoc.

use std::sync::Arc;

use crate::api::ArenaApi;
use crate::config::Config;
use crate::services::{
    DirectoryPoller, LifecycleEvents, MatchDirectory, MatchLifecycle, PollerHandle,
    SubmissionCoordinator, TaskService,
};
use crate::session::SessionContext;

/// Shared session state
#[derive(Clone)]
pub struct ArenaState {
    inner: Arc<ArenaStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct ArenaStateInner {
    api: Arc<dyn ArenaApi>,

    session: Arc<SessionContext>,

    directory: Arc<MatchDirectory>,

    lifecycle: Arc<MatchLifecycle>,

    /// Submission state of the current task-solving session
    submissions: SubmissionCoordinator,

    tasks: TaskService,

    config: Config,
}

impl ArenaState {
    /// Create the session state; the returned receiver carries lifecycle events
    pub fn new(
        api: Arc<dyn ArenaApi>,
        session: Arc<SessionContext>,
        config: Config,
    ) -> (Self, LifecycleEvents) {
        let directory = Arc::new(MatchDirectory::new(api.clone()));
        let (lifecycle, events) =
            MatchLifecycle::new(api.clone(), directory.clone(), session.clone());
        let submissions = SubmissionCoordinator::new(api.clone(), session.clone());
        let tasks = TaskService::new(api.clone(), session.clone(), directory.clone());

        let state = Self {
            inner: Arc::new(ArenaStateInner {
                api,
                session,
                directory,
                lifecycle: Arc::new(lifecycle),
                submissions,
                tasks,
                config,
            }),
        };
        (state, events)
    }

    /// Start match polling for as long as the returned handle lives
    pub fn mount(&self) -> PollerHandle {
        DirectoryPoller::start(
            self.inner.lifecycle.clone(),
            self.inner.directory.clone(),
            self.inner.config.polling.match_interval,
        )
    }

    pub fn api(&self) -> &dyn ArenaApi {
        self.inner.api.as_ref()
    }

    pub fn session(&self) -> &SessionContext {
        &self.inner.session
    }

    pub fn directory(&self) -> &MatchDirectory {
        &self.inner.directory
    }

    pub fn lifecycle(&self) -> &MatchLifecycle {
        &self.inner.lifecycle
    }

    pub fn submissions(&self) -> &SubmissionCoordinator {
        &self.inner.submissions
    }

    pub fn tasks(&self) -> &TaskService {
        &self.inner.tasks
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
