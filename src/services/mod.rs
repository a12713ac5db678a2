//! Session services

pub mod directory_service;
pub mod eligibility_service;
pub mod lifecycle_service;
pub mod poller;
pub mod profile_service;
pub mod submission_service;
pub mod task_service;

pub use directory_service::{DirectorySnapshot, Listing, MatchDirectory, RefreshOutcome};
pub use eligibility_service::{EligibilityGate, can_create};
pub use lifecycle_service::{
    CreateMatchForm, LeaveOutcome, LifecycleEvent, LifecycleEvents, MatchLifecycle, Notice,
    NoticeLevel, active_match_for,
};
pub use poller::{DirectoryPoller, PollerHandle};
pub use profile_service::ProfileService;
pub use submission_service::{PeerFetch, SubmissionCoordinator, SubmissionOutcome};
pub use task_service::{TaskForm, TaskService};
