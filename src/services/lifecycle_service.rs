//! Match lifecycle
//!
//! Create/join/leave plus the client-side reconciliation of the caller's matches against
//! the directory. Each match the caller takes part in is tracked through
//! `Open -> Full -> Closed`; `Closed` is terminal for that id. Transitions are derived by
//! comparing consecutive applied snapshots and surfaced as [`LifecycleEvent`]s.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use validator::Validate;

use super::directory_service::{DirectorySnapshot, MatchDirectory, RefreshOutcome};
use super::eligibility_service::EligibilityGate;
use crate::api::{ArenaApi, CreateMatchRequest};
use crate::error::{ClientError, ClientResult};
use crate::models::{JoinAvailability, Match, MatchPhase};
use crate::session::SessionContext;
use crate::utils::validation::validate_match_name;

/// Receiving end of the lifecycle event stream
pub type LifecycleEvents = mpsc::UnboundedReceiver<LifecycleEvent>;

/// Events consumed by the surrounding UI
#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    /// One-shot navigation into the shared session of a match that became full
    EnterSession { match_id: i64 },
    ActiveMatchChanged { match_id: Option<i64> },
    Notice(Notice),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// Transient user-visible notification
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(err: &ClientError) -> Self {
        Self::new(NoticeLevel::Error, err.user_message())
    }
}

/// Result of a leave request; leaving never fails the caller
#[derive(Debug, Clone)]
pub enum LeaveOutcome {
    Left,
    /// The caller was no longer in the match (or it was removed)
    AlreadyGone,
    Failed(ClientError),
}

/// Match creation form state; kept populated until a creation succeeds
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateMatchForm {
    pub selected_task_id: Option<i64>,
    pub name: String,
}

impl CreateMatchForm {
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// The first active match the user takes part in
pub fn active_match_for<'a>(
    tg_id: i64,
    matches: impl IntoIterator<Item = &'a Match>,
) -> Option<&'a Match> {
    matches
        .into_iter()
        .find(|m| m.is_active && m.involves(tg_id))
}

#[derive(Debug, Default)]
struct Tracking {
    phases: HashMap<i64, MatchPhase>,
    announced: HashSet<i64>,
    active: Option<Match>,
    last_seq: u64,
}

impl Tracking {
    fn is_closed(&self, match_id: i64) -> bool {
        self.phases.get(&match_id) == Some(&MatchPhase::Closed)
    }
}

/// Create/join/leave and "which match am I in" for one session
pub struct MatchLifecycle {
    api: Arc<dyn ArenaApi>,
    directory: Arc<MatchDirectory>,
    session: Arc<SessionContext>,
    events: mpsc::UnboundedSender<LifecycleEvent>,
    tracking: Mutex<Tracking>,
}

impl MatchLifecycle {
    pub fn new(
        api: Arc<dyn ArenaApi>,
        directory: Arc<MatchDirectory>,
        session: Arc<SessionContext>,
    ) -> (Self, LifecycleEvents) {
        let (events, rx) = mpsc::unbounded_channel();
        let lifecycle = Self {
            api,
            directory,
            session,
            events,
            tracking: Mutex::new(Tracking::default()),
        };
        (lifecycle, rx)
    }

    pub fn directory(&self) -> &Arc<MatchDirectory> {
        &self.directory
    }

    fn emit(&self, event: LifecycleEvent) {
        if self.events.send(event).is_err() {
            tracing::debug!("Lifecycle event dropped, no receiver");
        }
    }

    /// Surface a transient notification
    pub fn notify(&self, notice: Notice) {
        self.emit(LifecycleEvent::Notice(notice));
    }

    /// Current locally derived active match
    pub async fn active_match(&self) -> Option<Match> {
        self.tracking.lock().await.active.clone()
    }

    /// Last tracked phase of a match the caller takes part in
    pub async fn phase_of(&self, match_id: i64) -> Option<MatchPhase> {
        self.tracking.lock().await.phases.get(&match_id).copied()
    }

    /// Refresh the directory, then derive state from the latest applied view
    pub async fn reconcile(&self) -> RefreshOutcome {
        let outcome = self.directory.refresh().await;
        if let RefreshOutcome::Degraded(e) = &outcome {
            self.notify(Notice::warning(format!(
                "Could not refresh matches: {}",
                e.user_message()
            )));
        }
        self.observe(&self.directory.snapshot()).await;
        outcome
    }

    /// Derive phases, the active match pointer and one-shot events from a snapshot.
    /// Degraded and already-observed older snapshots are ignored.
    pub async fn observe(&self, snapshot: &DirectorySnapshot) {
        if snapshot.degraded {
            return;
        }

        let me = self.session.tg_id();
        let mut tracking = self.tracking.lock().await;
        if snapshot.seq < tracking.last_seq {
            tracing::debug!("Ignoring snapshot #{} older than #{}", snapshot.seq, tracking.last_seq);
            return;
        }
        tracking.last_seq = snapshot.seq;

        let mut entered = Vec::new();
        let mut seen = HashSet::new();

        for m in snapshot.matches.iter().filter(|m| m.involves(me)) {
            seen.insert(m.id);
            let previous = tracking.phases.get(&m.id).copied();
            let next = match (previous, m.phase()) {
                (Some(MatchPhase::Closed), _) => MatchPhase::Closed,
                (Some(MatchPhase::Full), MatchPhase::Open) => MatchPhase::Closed,
                (_, observed) => observed,
            };

            if previous != Some(next) {
                tracing::info!("Match {} is now {}", m.id, next);
            }
            tracking.phases.insert(m.id, next);

            if next == MatchPhase::Full && tracking.announced.insert(m.id) {
                entered.push(m.id);
            }
        }

        for (id, phase) in tracking.phases.iter_mut() {
            if *phase != MatchPhase::Closed && !seen.contains(id) {
                tracing::info!("Match {} left the listing, closing it", id);
                *phase = MatchPhase::Closed;
            }
        }

        let active = active_match_for(
            me,
            snapshot.matches.iter().filter(|m| !tracking.is_closed(m.id)),
        )
        .cloned();
        let changed = tracking.active.as_ref().map(|m| m.id) != active.as_ref().map(|m| m.id);
        let active_id = active.as_ref().map(|m| m.id);
        tracking.active = active;
        drop(tracking);

        if changed {
            self.emit(LifecycleEvent::ActiveMatchChanged { match_id: active_id });
        }
        for match_id in entered {
            tracing::info!("Entering shared session of match {}", match_id);
            self.emit(LifecycleEvent::EnterSession { match_id });
        }
    }

    /// How the join control for `m` should behave for the caller
    pub async fn join_availability(&self, m: &Match) -> JoinAvailability {
        if m.player1_id == self.session.tg_id() {
            JoinAvailability::Creator
        } else if !m.is_open() {
            JoinAvailability::Full
        } else if self.active_match().await.is_some() {
            JoinAvailability::AlreadyInMatch
        } else {
            JoinAvailability::Joinable
        }
    }

    /// Create a match; the caller stays in the open state until a second player joins
    pub async fn create_match(
        &self,
        task_id: Option<i64>,
        creator_id: i64,
        name: &str,
    ) -> ClientResult<Match> {
        let result = self.try_create_match(task_id, creator_id, name).await;
        match &result {
            Ok(created) => self.notify(Notice::success(format!(
                "{} created, waiting for an opponent",
                created.display_name()
            ))),
            Err(e) => self.notify(Notice::error(e)),
        }
        result
    }

    async fn try_create_match(
        &self,
        task_id: Option<i64>,
        creator_id: i64,
        name: &str,
    ) -> ClientResult<Match> {
        if creator_id != self.session.tg_id() {
            return Err(ClientError::Validation(
                "Matches can only be created by the signed-in user".to_string(),
            ));
        }
        let task_id =
            task_id.ok_or_else(|| ClientError::Validation("Select a task first".to_string()))?;
        let name =
            validate_match_name(name).map_err(|msg| ClientError::Validation(msg.to_string()))?;

        let profile = self.session.require_profile().await?;
        EligibilityGate::ensure_can_create(&profile)?;

        let request = CreateMatchRequest {
            task_id,
            player1_id: creator_id,
            is_active: true,
            name,
        };
        request.validate()?;

        let created = self.api.create_match(&request).await?;
        tracing::info!("Created match {} on task {}", created.id, task_id);

        self.directory.insert_local(created.clone());
        self.observe(&self.directory.snapshot()).await;
        Ok(created)
    }

    /// Create a match from the form, clearing it only on success
    pub async fn create_match_from_form(&self, form: &mut CreateMatchForm) -> ClientResult<Match> {
        let created = self
            .create_match(form.selected_task_id, self.session.tg_id(), &form.name)
            .await?;
        form.clear();
        Ok(created)
    }

    /// Claim the second slot of a match. The server arbitrates; a conflict forces an
    /// immediate re-poll so the view is reconciled before a retry.
    pub async fn join_match(&self, match_id: i64, user_id: i64) -> ClientResult<Match> {
        if user_id != self.session.tg_id() {
            let err = ClientError::Validation(
                "Matches can only be joined by the signed-in user".to_string(),
            );
            self.notify(Notice::error(&err));
            return Err(err);
        }

        match self
            .api
            .join_match(match_id, user_id)
            .await
            .map_err(classify_join_error)
        {
            Ok(joined) => {
                tracing::info!("Joined match {}", match_id);
                self.directory.insert_local(joined.clone());
                self.observe(&self.directory.snapshot()).await;
                Ok(joined)
            }
            Err(e) => {
                tracing::warn!("Join of match {} rejected: {}", match_id, e);
                self.notify(Notice::error(&e));
                if e.is_conflict() {
                    self.reconcile().await;
                }
                Err(e)
            }
        }
    }

    /// Leave a match. Idempotent: the match is closed locally and the active pointer
    /// is cleared before the server is asked, whatever the server answers.
    pub async fn leave_match(&self, match_id: i64, user_id: i64) -> LeaveOutcome {
        let cleared = {
            let mut tracking = self.tracking.lock().await;
            tracking.phases.insert(match_id, MatchPhase::Closed);
            let cleared = tracking.active.as_ref().is_some_and(|m| m.id == match_id);
            if cleared {
                tracking.active = None;
            }
            cleared
        };
        if cleared {
            self.emit(LifecycleEvent::ActiveMatchChanged { match_id: None });
        }

        if user_id != self.session.tg_id() {
            return LeaveOutcome::Failed(ClientError::Validation(
                "Matches can only be left by the signed-in user".to_string(),
            ));
        }

        match self.api.leave_match(match_id, user_id).await {
            Ok(()) => {
                tracing::info!("Left match {}", match_id);
                self.notify(Notice::info("You left the match"));
                self.reconcile().await;
                LeaveOutcome::Left
            }
            Err(e) if e.is_conflict() || e.status() == Some(404) => {
                tracing::debug!("Match {} already left: {}", match_id, e);
                self.reconcile().await;
                LeaveOutcome::AlreadyGone
            }
            Err(e) => {
                tracing::warn!("Leaving match {} failed: {}", match_id, e);
                self.notify(Notice::error(&e));
                LeaveOutcome::Failed(e)
            }
        }
    }
}

/// The server answers a lost join race with 404 (no free slot) or 400 (already in)
fn classify_join_error(err: ClientError) -> ClientError {
    match err {
        ClientError::Http {
            status: 400 | 404,
            detail,
        } => ClientError::StateConflict(
            detail.unwrap_or_else(|| "This match can no longer be joined".to_string()),
        ),
        other => other,
    }
}
