//! CodeDuel - Match Lifecycle and Submission Client
//!
//! This library is the client-side core of the CodeDuel battle platform: players
//! discover open coding matches, claim a slot, get routed into a shared session once a
//! match is full, and submit solutions that an external judge grades against hidden tests.
//!
//! # Features
//!
//! - Periodically refreshed match directory with stale-response protection
//! - Server-arbitrated create/join/leave with one-shot "enter session" events
//! - Practice and match-bound submissions with peer solution retrieval
//! - Elo-based creation eligibility
//!
//! # Architecture
//!
//! The client follows a layered architecture:
//! - **API**: the battle server contract ([`api::ArenaApi`]) and its HTTP implementation
//! - **Services**: directory, lifecycle, submissions, tasks, profiles
//! - **Models**: server-owned records held as advisory copies

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod state;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::Config;
pub use error::{ClientError, ClientResult};
pub use state::ArenaState;
