//! Match directory
//!
//! Read/cache layer over the match and task listings. Every refresh takes a sequence
//! number when it is issued and a response is applied only if nothing newer has been
//! applied since, so a slow poll can never overwrite a fresher view.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, watch};

use crate::api::ArenaApi;
use crate::error::{ClientError, ClientResult};
use crate::models::{DifficultyRange, Match, Task};
use crate::utils::search;

/// One applied view of the match listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectorySnapshot {
    /// Sequence number of the poll (or local insertion) that produced this view
    pub seq: u64,
    pub matches: Vec<Match>,
    /// The listing failed or was malformed and was replaced by an empty set
    pub degraded: bool,
    pub fetched_at: Option<DateTime<Utc>>,
}

/// A listing that never fails the caller
#[derive(Debug, Clone)]
pub struct Listing<T> {
    pub items: Vec<T>,
    /// Why the listing degraded to an empty set, if it did
    pub error: Option<ClientError>,
}

impl<T> Listing<T> {
    fn from_result(result: ClientResult<Vec<T>>, what: &str) -> Self {
        match result {
            Ok(items) => Self { items, error: None },
            Err(e) => {
                tracing::warn!("Listing {} degraded to empty: {}", what, e);
                Self {
                    items: Vec::new(),
                    error: Some(e),
                }
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one directory refresh
#[derive(Debug, Clone)]
pub enum RefreshOutcome {
    Applied,
    /// A newer poll or a local insertion was applied while this one was in flight
    Stale,
    Degraded(ClientError),
}

/// Periodically refreshed, advisory copy of the server's matches and tasks
pub struct MatchDirectory {
    api: Arc<dyn ArenaApi>,
    next_seq: AtomicU64,
    snapshot_tx: watch::Sender<Arc<DirectorySnapshot>>,
    tasks: RwLock<Vec<Task>>,
}

impl MatchDirectory {
    pub fn new(api: Arc<dyn ArenaApi>) -> Self {
        let (snapshot_tx, _) = watch::channel(Arc::new(DirectorySnapshot::default()));
        Self {
            api,
            next_seq: AtomicU64::new(0),
            snapshot_tx,
            tasks: RwLock::new(Vec::new()),
        }
    }

    fn issue_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// GET the match listing, degrading to an empty set on any failure
    pub async fn list_matches(&self) -> Listing<Match> {
        Listing::from_result(self.api.list_matches().await, "matches")
    }

    /// GET the task listing for a difficulty window, degrading to an empty set on any failure.
    /// Tasks outside the difficulty bounds are dropped.
    pub async fn list_tasks(&self, range: DifficultyRange) -> Listing<Task> {
        let mut listing = Listing::from_result(
            self.api.list_tasks(range.min(), range.max()).await,
            "tasks",
        );
        let before = listing.items.len();
        listing.items.retain(Task::has_valid_difficulty);
        if listing.items.len() != before {
            tracing::debug!(
                "Dropped {} tasks with out-of-range difficulty",
                before - listing.items.len()
            );
        }
        listing
    }

    /// Poll the match listing and publish it unless a newer view was applied meanwhile.
    /// The published set fully replaces the previous one.
    pub async fn refresh(&self) -> RefreshOutcome {
        let seq = self.issue_seq();
        let listing = self.list_matches().await;
        let degraded = listing.error.clone();

        let snapshot = DirectorySnapshot {
            seq,
            matches: listing.items,
            degraded: degraded.is_some(),
            fetched_at: Some(Utc::now()),
        };

        if !self.publish(snapshot) {
            tracing::debug!("Dropping stale match listing #{}", seq);
            return RefreshOutcome::Stale;
        }

        match degraded {
            Some(e) => RefreshOutcome::Degraded(e),
            None => RefreshOutcome::Applied,
        }
    }

    fn publish(&self, snapshot: DirectorySnapshot) -> bool {
        self.snapshot_tx.send_if_modified(|current| {
            if snapshot.seq <= current.seq {
                return false;
            }
            *current = Arc::new(snapshot);
            true
        })
    }

    /// Add (or replace) a match the caller just created or joined.
    ///
    /// Takes a fresh sequence number, so every poll issued before this call is discarded
    /// when it resolves.
    pub fn insert_local(&self, m: Match) {
        let seq = self.issue_seq();
        let current = self.snapshot();

        let mut matches: Vec<Match> = current
            .matches
            .iter()
            .filter(|existing| existing.id != m.id)
            .cloned()
            .collect();
        tracing::debug!("Inserting match {} locally as #{}", m.id, seq);
        matches.push(m);

        self.publish(DirectorySnapshot {
            seq,
            matches,
            degraded: false,
            fetched_at: current.fetched_at,
        });
    }

    /// Latest applied view
    pub fn snapshot(&self) -> Arc<DirectorySnapshot> {
        self.snapshot_tx.borrow().clone()
    }

    /// Receiver notified whenever a new view is applied
    pub fn subscribe(&self) -> watch::Receiver<Arc<DirectorySnapshot>> {
        self.snapshot_tx.subscribe()
    }

    /// Match detail for the shared session view
    pub async fn get_match(&self, match_id: i64) -> ClientResult<Match> {
        self.api.get_match(match_id).await
    }

    /// One-shot task listing fetch; replaces the cached task list
    pub async fn load_tasks(&self, range: DifficultyRange) -> Listing<Task> {
        let listing = self.list_tasks(range).await;
        *self.tasks.write().await = listing.items.clone();
        tracing::debug!("Cached {} tasks", listing.items.len());
        listing
    }

    /// Cached tasks
    pub async fn tasks(&self) -> Vec<Task> {
        self.tasks.read().await.clone()
    }

    /// Append a task the caller just created
    pub async fn append_task(&self, task: Task) {
        let mut tasks = self.tasks.write().await;
        tasks.retain(|existing| existing.id != task.id);
        tasks.push(task);
    }

    pub async fn tasks_in_range(&self, range: DifficultyRange) -> Vec<Task> {
        self.tasks
            .read()
            .await
            .iter()
            .filter(|task| range.contains(task.difficulty))
            .cloned()
            .collect()
    }

    pub async fn filter_tasks(&self, term: &str) -> Vec<Task> {
        let tasks = self.tasks.read().await;
        search::filter_tasks(&tasks, term).into_iter().cloned().collect()
    }

    /// Search the latest match view by task title or match id
    pub async fn filter_matches(&self, term: &str) -> Vec<Match> {
        let snapshot = self.snapshot();
        let tasks = self.tasks.read().await;
        search::filter_matches(&snapshot.matches, &tasks, term)
            .into_iter()
            .cloned()
            .collect()
    }
}
