//! CodeDuel - Session Watcher
//!
//! Headless client: resolves the caller identity, polls the match directory and logs
//! lifecycle events until interrupted.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use codeduel::{
    ArenaState, Config,
    api::HttpArenaApi,
    config::LogFormat,
    services::{LifecycleEvent, NoticeLevel, ProfileService},
    session::{Identity, IdentityStore, SessionContext},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Initialize tracing
    let json = config.log_format == LogFormat::Json;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.rust_log.clone().into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_target(true)))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("Starting CodeDuel session watcher...");

    let store = IdentityStore::new(config.identity.fallback_path.clone());
    let identity = Identity::resolve(config.identity.host_tg_id, &store).await?;
    tracing::info!("Watching as {}", identity.tg_id);

    let api = Arc::new(HttpArenaApi::new(&config.api)?);
    tracing::info!("Using battle server at {}", api.base_url());

    let session = Arc::new(SessionContext::new(identity));
    if let Err(e) = ProfileService::load_session_profile(api.as_ref(), &session).await {
        tracing::warn!("Profile unavailable, creation stays disabled: {}", e);
    }

    let (state, mut events) = ArenaState::new(api, session, config);
    let poller = state.mount();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(LifecycleEvent::EnterSession { match_id }) => {
                    let name = match state.directory().get_match(match_id).await {
                        Ok(m) => m.display_name(),
                        Err(_) => format!("Match #{}", match_id),
                    };
                    tracing::info!("{} is full, entering the shared session", name);
                }
                Some(LifecycleEvent::ActiveMatchChanged { match_id: Some(id) }) => {
                    tracing::info!("Active match is now {}", id);
                }
                Some(LifecycleEvent::ActiveMatchChanged { match_id: None }) => {
                    tracing::info!("No active match");
                }
                Some(LifecycleEvent::Notice(notice)) => match notice.level {
                    NoticeLevel::Error | NoticeLevel::Warning => tracing::warn!("{}", notice.message),
                    NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{}", notice.message),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                break;
            }
        }
    }

    poller.stop().await;

    Ok(())
}
