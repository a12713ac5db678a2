//! Submission coordinator
//!
//! Exchanges solution text for graded verdicts. A fully passed verdict triggers exactly
//! one peer-solution fetch; anything else leaves peer solutions untouched.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::RwLock;

use crate::api::{ArenaApi, SubmitSolutionRequest};
use crate::error::{ClientError, ClientResult};
use crate::models::{PeerSolution, SubmissionResult};
use crate::session::SessionContext;
use crate::utils::validation::validate_solution;

/// What happened to peer solutions after a verdict
#[derive(Debug, Clone)]
pub enum PeerFetch {
    /// The verdict was not a full pass
    NotTriggered,
    Fetched(Vec<PeerSolution>),
    /// The verdict stands; only the follow-up fetch failed
    Failed(ClientError),
}

/// Verdict plus the outcome of the automatic peer fetch
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub result: SubmissionResult,
    pub peers: PeerFetch,
}

/// Clears the busy flag when the submission request finishes, however it finishes
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submission state for one task-solving session
pub struct SubmissionCoordinator {
    api: Arc<dyn ArenaApi>,
    session: Arc<SessionContext>,
    busy: AtomicBool,
    last_result: RwLock<Option<SubmissionResult>>,
    peer_cache: RwLock<HashMap<i64, Vec<PeerSolution>>>,
}

impl SubmissionCoordinator {
    pub fn new(api: Arc<dyn ArenaApi>, session: Arc<SessionContext>) -> Self {
        Self {
            api,
            session,
            busy: AtomicBool::new(false),
            last_result: RwLock::new(None),
            peer_cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Submit a solution for grading.
    ///
    /// `user_id` is the internal profile id. With a `match_id` the match-bound endpoint
    /// is used so the server can resolve the opponent and match completion.
    pub async fn submit(
        &self,
        task_id: i64,
        user_id: i64,
        solution: &str,
        match_id: Option<i64>,
    ) -> ClientResult<SubmissionOutcome> {
        validate_solution(solution).map_err(|msg| ClientError::Validation(msg.to_string()))?;

        let guard = BusyGuard::acquire(&self.busy).ok_or_else(|| {
            ClientError::Validation("A submission is already being graded".to_string())
        })?;

        let request = SubmitSolutionRequest {
            user_id,
            task_id,
            solution: solution.to_string(),
        };
        let result = match match_id {
            Some(match_id) => {
                tracing::info!("Submitting task {} in match {}", task_id, match_id);
                self.api
                    .submit_competition(task_id, user_id, match_id, &request)
                    .await?
            }
            None => {
                tracing::info!("Submitting task {} for practice", task_id);
                self.api.submit_practice(task_id, user_id, &request).await?
            }
        };
        drop(guard);

        if !result.is_consistent() {
            return Err(ClientError::Decode(format!(
                "verdict reports {} of {} passed with {} results",
                result.passed,
                result.total,
                result.results.len()
            )));
        }

        tracing::info!("Task {} graded: {}/{} passed", task_id, result.passed, result.total);
        *self.last_result.write().await = Some(result.clone());

        let peers = if result.is_full_pass() {
            self.refresh_profile().await;
            match self.fetch_peer_solutions(self.session.tg_id(), task_id).await {
                Ok(solutions) => PeerFetch::Fetched(solutions),
                Err(e) => {
                    tracing::warn!("Peer solutions for task {} unavailable: {}", task_id, e);
                    PeerFetch::Failed(e)
                }
            }
        } else {
            PeerFetch::NotTriggered
        };

        Ok(SubmissionOutcome { result, peers })
    }

    /// Elo and solved count may have moved after a full pass
    async fn refresh_profile(&self) {
        match self.api.get_profile(self.session.tg_id()).await {
            Ok(profile) => self.session.set_profile(profile).await,
            Err(e) => tracing::warn!("Profile refresh failed: {}", e),
        }
    }

    /// Fetch accepted solutions of other users and cache them for the task
    pub async fn fetch_peer_solutions(
        &self,
        requester_tg_id: i64,
        task_id: i64,
    ) -> ClientResult<Vec<PeerSolution>> {
        let solutions = self.api.correct_solutions(requester_tg_id, task_id).await?;
        tracing::debug!("Fetched {} peer solutions for task {}", solutions.len(), task_id);
        self.peer_cache
            .write()
            .await
            .insert(task_id, solutions.clone());
        Ok(solutions)
    }

    /// Cached peer solutions; never hits the network
    pub async fn peer_solutions(&self, task_id: i64) -> Option<Vec<PeerSolution>> {
        self.peer_cache.read().await.get(&task_id).cloned()
    }

    pub async fn last_result(&self) -> Option<SubmissionResult> {
        self.last_result.read().await.clone()
    }

    /// Forget results and cached peer solutions when the task-solving session ends
    pub async fn reset(&self) {
        *self.last_result.write().await = None;
        self.peer_cache.write().await.clear();
    }
}
