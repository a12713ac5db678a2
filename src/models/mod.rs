//! Domain models
//!
//! Client-side copies of the records owned by the battle server.

pub mod competition;
pub mod submission;
pub mod task;
pub mod user;

pub use competition::*;
pub use submission::*;
pub use task::*;
pub use user::*;
