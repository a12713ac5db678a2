//! In-memory battle server for tests

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Notify, oneshot};

use crate::api::{
    ArenaApi, CreateMatchRequest, CreateTaskRequest, GenerateTestsRequest, SubmitSolutionRequest,
};
use crate::constants::conflict_codes;
use crate::error::{ClientError, ClientResult};
use crate::models::{
    ExtendedProfile, Match, PeerSolution, SubmissionResult, Task, UserProfile,
};

pub fn sample_match(id: i64, player1_id: i64, player2_id: Option<i64>) -> Match {
    Match {
        id,
        name: Some(format!("Duel {id}")),
        task_id: 5,
        player1_id,
        player2_id,
        is_active: true,
        winner_id: None,
        start_time: None,
        end_time: None,
    }
}

pub fn sample_task(id: i64, title: &str, difficulty: i32) -> Task {
    Task {
        id,
        title: title.to_string(),
        description: format!("Solve {title}"),
        difficulty,
        language: "python".to_string(),
        code: None,
        author_id: None,
        status: None,
    }
}

/// Profile with internal id 9
pub fn sample_profile(tg_id: i64, elo: i32) -> UserProfile {
    UserProfile {
        id: 9,
        tg_id,
        elo,
        solved_count: 0,
        name: None,
        avatar_path: None,
        bio: None,
        join_date: None,
    }
}

fn conflict(code: &str, detail: &str) -> ClientError {
    let body = serde_json::json!({ "detail": detail, "code": code }).to_string();
    ClientError::from_status(409, body.as_bytes())
}

fn not_found(detail: &str) -> ClientError {
    let body = serde_json::json!({ "detail": detail }).to_string();
    ClientError::from_status(404, body.as_bytes())
}

struct Hold {
    entered: Arc<Notify>,
    release: oneshot::Receiver<()>,
}

impl Hold {
    fn new() -> (Self, Arc<Notify>, oneshot::Sender<()>) {
        let entered = Arc::new(Notify::new());
        let (tx, release) = oneshot::channel();
        let hold = Self {
            entered: entered.clone(),
            release,
        };
        (hold, entered, tx)
    }

    async fn wait(self) {
        self.entered.notify_one();
        let _ = self.release.await;
    }
}

#[derive(Default)]
struct ArenaData {
    matches: BTreeMap<i64, Match>,
    tasks: BTreeMap<i64, Task>,
    profiles: HashMap<i64, UserProfile>,
    verdicts: VecDeque<SubmissionResult>,
    listing_error: Option<ClientError>,
    leave_error: Option<ClientError>,
    listing_hold: Option<Hold>,
    submission_hold: Option<Hold>,
    generation_requests: Vec<(i64, i64)>,
    next_id: i64,
}

/// Arbitrates joins and leaves the way the battle server does and counts calls
#[derive(Default)]
pub struct FakeArena {
    data: Mutex<ArenaData>,
    list_match_calls: AtomicUsize,
    list_task_calls: AtomicUsize,
    create_match_calls: AtomicUsize,
    submission_calls: AtomicUsize,
}

impl FakeArena {
    pub fn new() -> Self {
        let arena = Self::default();
        arena.data.lock().unwrap().next_id = 100;
        arena
    }

    pub fn put_match(&self, m: Match) {
        self.data.lock().unwrap().matches.insert(m.id, m);
    }

    pub fn remove_match(&self, id: i64) {
        self.data.lock().unwrap().matches.remove(&id);
    }

    pub fn put_task(&self, task: Task) {
        self.data.lock().unwrap().tasks.insert(task.id, task);
    }

    pub fn put_profile(&self, profile: UserProfile) {
        self.data
            .lock()
            .unwrap()
            .profiles
            .insert(profile.tg_id, profile);
    }

    pub fn queue_verdict(&self, verdict: SubmissionResult) {
        self.data.lock().unwrap().verdicts.push_back(verdict);
    }

    /// Every following listing (matches and tasks) fails with `err`
    pub fn fail_listings(&self, err: ClientError) {
        self.data.lock().unwrap().listing_error = Some(err);
    }

    pub fn fail_leaves(&self, err: ClientError) {
        self.data.lock().unwrap().leave_error = Some(err);
    }

    /// Park the next match listing after it has read its data, until released
    pub fn hold_next_listing(&self) -> (Arc<Notify>, oneshot::Sender<()>) {
        let (hold, entered, release) = Hold::new();
        self.data.lock().unwrap().listing_hold = Some(hold);
        (entered, release)
    }

    /// Park the next submission before it is graded, until released
    pub fn hold_next_submission(&self) -> (Arc<Notify>, oneshot::Sender<()>) {
        let (hold, entered, release) = Hold::new();
        self.data.lock().unwrap().submission_hold = Some(hold);
        (entered, release)
    }

    pub fn list_match_calls(&self) -> usize {
        self.list_match_calls.load(Ordering::SeqCst)
    }

    pub fn list_task_calls(&self) -> usize {
        self.list_task_calls.load(Ordering::SeqCst)
    }

    pub fn create_match_calls(&self) -> usize {
        self.create_match_calls.load(Ordering::SeqCst)
    }

    pub fn submission_calls(&self) -> usize {
        self.submission_calls.load(Ordering::SeqCst)
    }

    /// `(user_id, task_id)` of every test generation request
    pub fn test_generation_requests(&self) -> Vec<(i64, i64)> {
        self.data.lock().unwrap().generation_requests.clone()
    }

    async fn grade(&self) -> ClientResult<SubmissionResult> {
        self.submission_calls.fetch_add(1, Ordering::SeqCst);
        let hold = self.data.lock().unwrap().submission_hold.take();
        if let Some(hold) = hold {
            hold.wait().await;
        }
        self.data
            .lock()
            .unwrap()
            .verdicts
            .pop_front()
            .ok_or(ClientError::Http {
                status: 500,
                detail: Some("judge unavailable".to_string()),
            })
    }
}

#[async_trait]
impl ArenaApi for FakeArena {
    async fn list_matches(&self) -> ClientResult<Vec<Match>> {
        self.list_match_calls.fetch_add(1, Ordering::SeqCst);
        let (listing, hold) = {
            let mut data = self.data.lock().unwrap();
            let listing = match &data.listing_error {
                Some(err) => Err(err.clone()),
                None => Ok(data
                    .matches
                    .values()
                    .filter(|m| m.is_active)
                    .cloned()
                    .collect()),
            };
            (listing, data.listing_hold.take())
        };
        if let Some(hold) = hold {
            hold.wait().await;
        }
        listing
    }

    async fn list_tasks(&self, min_difficulty: i32, max_difficulty: i32) -> ClientResult<Vec<Task>> {
        self.list_task_calls.fetch_add(1, Ordering::SeqCst);
        let data = self.data.lock().unwrap();
        if let Some(err) = &data.listing_error {
            return Err(err.clone());
        }
        Ok(data
            .tasks
            .values()
            .filter(|t| t.difficulty >= min_difficulty && t.difficulty <= max_difficulty)
            .cloned()
            .collect())
    }

    async fn get_task(&self, task_id: i64) -> ClientResult<Task> {
        let data = self.data.lock().unwrap();
        data.tasks
            .get(&task_id)
            .cloned()
            .ok_or_else(|| not_found("Task not found"))
    }

    async fn get_match(&self, match_id: i64) -> ClientResult<Match> {
        let data = self.data.lock().unwrap();
        data.matches
            .get(&match_id)
            .cloned()
            .ok_or_else(|| not_found("Competition not found"))
    }

    async fn create_match(&self, request: &CreateMatchRequest) -> ClientResult<Match> {
        self.create_match_calls.fetch_add(1, Ordering::SeqCst);
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let created = Match {
            id: data.next_id,
            name: Some(request.name.clone()),
            task_id: request.task_id,
            player1_id: request.player1_id,
            player2_id: None,
            is_active: request.is_active,
            winner_id: None,
            start_time: None,
            end_time: None,
        };
        data.matches.insert(created.id, created.clone());
        Ok(created)
    }

    async fn join_match(&self, match_id: i64, tg_id: i64) -> ClientResult<Match> {
        let mut data = self.data.lock().unwrap();
        let Some(m) = data.matches.get_mut(&match_id) else {
            return Err(not_found("Competition not found"));
        };
        if !m.is_active {
            return Err(conflict(conflict_codes::MATCH_INACTIVE, "Match is no longer active"));
        }
        if m.player1_id == tg_id || m.player2_id == Some(tg_id) {
            return Err(conflict(conflict_codes::ALREADY_JOINED, "Already participating"));
        }
        if m.player2_id.is_some() {
            return Err(conflict(conflict_codes::SLOT_FILLED, "Match is already full"));
        }
        m.player2_id = Some(tg_id);
        Ok(m.clone())
    }

    async fn leave_match(&self, match_id: i64, tg_id: i64) -> ClientResult<()> {
        let mut data = self.data.lock().unwrap();
        if let Some(err) = &data.leave_error {
            return Err(err.clone());
        }
        let Some(m) = data.matches.get_mut(&match_id).filter(|m| m.is_active) else {
            return Err(not_found("Competition not found"));
        };
        if m.player1_id == tg_id {
            m.is_active = false;
        } else if m.player2_id == Some(tg_id) {
            m.player2_id = None;
        } else {
            return Err(not_found("Player is not in this competition"));
        }
        Ok(())
    }

    async fn submit_practice(
        &self,
        _task_id: i64,
        _user_id: i64,
        _request: &SubmitSolutionRequest,
    ) -> ClientResult<SubmissionResult> {
        self.grade().await
    }

    async fn submit_competition(
        &self,
        _task_id: i64,
        _user_id: i64,
        _match_id: i64,
        _request: &SubmitSolutionRequest,
    ) -> ClientResult<SubmissionResult> {
        self.grade().await
    }

    async fn correct_solutions(&self, _tg_id: i64, _task_id: i64) -> ClientResult<Vec<PeerSolution>> {
        Ok(Vec::new())
    }

    async fn get_profile(&self, tg_id: i64) -> ClientResult<UserProfile> {
        let data = self.data.lock().unwrap();
        data.profiles
            .get(&tg_id)
            .cloned()
            .ok_or_else(|| not_found("User not found"))
    }

    async fn get_extended_profile(&self, tg_id: i64) -> ClientResult<ExtendedProfile> {
        let user = self.get_profile(tg_id).await?;
        Ok(ExtendedProfile {
            user,
            solved_tasks: Vec::new(),
            matches: None,
            battle_wins: None,
        })
    }

    async fn leaderboard(&self) -> ClientResult<Vec<UserProfile>> {
        Ok(self.data.lock().unwrap().profiles.values().cloned().collect())
    }

    async fn create_task(&self, request: &CreateTaskRequest) -> ClientResult<Task> {
        let mut data = self.data.lock().unwrap();
        data.next_id += 1;
        let task = Task {
            id: data.next_id,
            title: request.title.clone(),
            description: request.description.clone(),
            difficulty: request.difficulty,
            language: request.language.clone(),
            code: Some(request.code.clone()),
            author_id: Some(request.tg_id),
            status: None,
        };
        data.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn request_test_generation(
        &self,
        user_id: i64,
        request: &GenerateTestsRequest,
    ) -> ClientResult<()> {
        self.data
            .lock()
            .unwrap()
            .generation_requests
            .push((user_id, request.task_id));
        Ok(())
    }
}
