//! Creation eligibility
//!
//! Advisory only: the server may still reject a creation, which then surfaces as an
//! ordinary HTTP error.

use crate::constants::MIN_CREATION_ELO;
use crate::error::{ClientError, ClientResult};
use crate::models::UserProfile;

/// Whether the profile may create tasks and matches
pub fn can_create(profile: &UserProfile) -> bool {
    profile.elo >= MIN_CREATION_ELO
}

/// Gate evaluated before any creation request is built
pub struct EligibilityGate;

impl EligibilityGate {
    /// Fail with a validation error when the profile is below the elo threshold
    pub fn ensure_can_create(profile: &UserProfile) -> ClientResult<()> {
        if can_create(profile) {
            return Ok(());
        }
        Err(ClientError::Validation(format!(
            "Not enough elo to create: minimum {}, yours is {}",
            MIN_CREATION_ELO, profile.elo
        )))
    }
}
