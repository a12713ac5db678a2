//! Profile service
//!
//! Read-only access to profiles and the leaderboard.

use crate::api::ArenaApi;
use crate::error::ClientResult;
use crate::models::{ExtendedProfile, UserProfile};
use crate::session::SessionContext;

/// Profile lookups
pub struct ProfileService;

impl ProfileService {
    /// Get a profile by external id
    pub async fn profile(api: &dyn ArenaApi, tg_id: i64) -> ClientResult<UserProfile> {
        api.get_profile(tg_id).await
    }

    /// Get a profile with solved tasks and battle history
    pub async fn extended_profile(api: &dyn ArenaApi, tg_id: i64) -> ClientResult<ExtendedProfile> {
        api.get_extended_profile(tg_id).await
    }

    /// Top players, highest elo first
    pub async fn leaderboard(api: &dyn ArenaApi) -> ClientResult<Vec<UserProfile>> {
        let mut players = api.leaderboard().await?;
        players.sort_by(|a, b| b.elo.cmp(&a.elo));
        Ok(players)
    }

    /// Resolve the session profile from the session identity
    pub async fn load_session_profile(
        api: &dyn ArenaApi,
        session: &SessionContext,
    ) -> ClientResult<UserProfile> {
        let profile = api.get_profile(session.tg_id()).await?;
        tracing::info!(
            "Loaded profile {} (elo {}, {} solved)",
            profile.tg_id,
            profile.elo,
            profile.solved_count
        );
        session.set_profile(profile.clone()).await;
        Ok(profile)
    }
}
