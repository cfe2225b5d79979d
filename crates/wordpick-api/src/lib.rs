//! JSON REST API for wordpick.
//!
//! Exposes an axum [`Router`] backed by any [`wordpick_core::store::WordStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", wordpick_api::api_router(state))
//! ```

pub mod auth;
pub mod bulk;
pub mod error;
pub mod health;
pub mod leaderboard;
pub mod picks;
pub mod sessions;
pub mod videos;
pub mod words;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use wordpick_core::{pick::PickPolicy, store::WordStore};

pub use auth::AdminAuth;
pub use error::ApiError;
pub use videos::{VideoConfig, VideoSource};

/// Read-only settings shared by every handler.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  pub pick_policy: PickPolicy,
  /// When set, catalog writes require these Basic credentials.
  pub admin:       Option<AdminAuth>,
  pub videos:      VideoSource,
}

/// Shared state threaded through all API handlers.
#[derive(Clone)]
pub struct ApiState<S> {
  pub store:    Arc<S>,
  pub settings: Arc<ApiSettings>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, settings: ApiSettings) -> Self {
    Self { store, settings: Arc::new(settings) }
  }
}

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: WordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    // Sessions and picks
    .route("/session", post(sessions::touch::<S>))
    .route("/pick", post(picks::create::<S>))
    .route("/stats", get(picks::stats::<S>))
    // Aggregates
    .route("/leaderboard", get(leaderboard::handler::<S>))
    .route("/wordwall", get(leaderboard::wall::<S>))
    // Catalog
    .route("/words/search", get(words::search::<S>))
    .route("/words/suggest", get(words::suggest::<S>))
    .route("/words/bulk", get(bulk::export::<S>).post(bulk::ingest::<S>))
    // Misc
    .route("/videos", get(videos::list::<S>))
    .route("/youtube", get(videos::list::<S>))
    .route("/dbcheck", get(health::dbcheck::<S>))
    .with_state(state)
}
