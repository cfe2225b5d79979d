//! HTTP server assembly for wordpick.
//!
//! Loads [`ServerConfig`], turns it into [`ApiSettings`], and mounts the JSON
//! API under `/api` behind an HTTP tracing layer.

use std::path::{Path, PathBuf};

use axum::Router;
use config::{Config, ConfigError, Environment, File, Source};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use wordpick_api::{AdminAuth, ApiSettings, ApiState, VideoConfig, VideoSource, api_router};
use wordpick_core::{pick::PickPolicy, store::WordStore};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Prefix for environment overrides, e.g. `WORDPICK_PORT=9000`.
pub const ENV_PREFIX: &str = "WORDPICK";

/// Runtime server configuration, deserialised from `config.toml` and
/// `WORDPICK_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:                String,
  pub port:                u16,
  pub store_path:          PathBuf,
  pub pick_policy:         PickPolicy,
  pub admin_username:      Option<String>,
  /// PHC string produced by `--hash-password`.
  pub admin_password_hash: Option<String>,
  pub youtube_api_key:     Option<String>,
  pub youtube_channel_id:  Option<String>,
  pub youtube_playlist_id: Option<String>,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:                "127.0.0.1".to_string(),
      port:                8080,
      store_path:          PathBuf::from("wordpick.db"),
      pick_policy:         PickPolicy::default(),
      admin_username:      None,
      admin_password_hash: None,
      youtube_api_key:     None,
      youtube_channel_id:  None,
      youtube_playlist_id: None,
    }
  }
}

impl ServerConfig {
  /// Read the TOML file at `path` (skipped when absent) overlaid by
  /// `WORDPICK_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_source(File::from(path).required(false))
  }

  fn from_source<T>(file: T) -> Result<Self, ConfigError>
  where
    T: Source + Send + Sync + 'static,
  {
    Config::builder()
      .add_source(file)
      .add_source(Environment::with_prefix(ENV_PREFIX))
      .build()?
      .try_deserialize()
  }

  /// `store_path` with a leading `~` component replaced by `$HOME`.
  pub fn store_location(&self) -> PathBuf {
    match (self.store_path.strip_prefix("~"), std::env::var_os("HOME")) {
      (Ok(rest), Some(home)) => PathBuf::from(home).join(rest),
      _ => self.store_path.clone(),
    }
  }

  /// Admin credentials, only when both the username and hash are set.
  pub fn admin(&self) -> Option<AdminAuth> {
    let username = self.admin_username.as_deref().map(str::trim).filter(|u| !u.is_empty())?;
    let password_hash = self
      .admin_password_hash
      .as_deref()
      .map(str::trim)
      .filter(|h| !h.is_empty())?;
    Some(AdminAuth {
      username:      username.to_owned(),
      password_hash: password_hash.to_owned(),
    })
  }

  pub fn video_config(&self) -> VideoConfig {
    VideoConfig {
      api_key: self.youtube_api_key.clone(),
      channel_id: self.youtube_channel_id.clone(),
      playlist_id: self.youtube_playlist_id.clone(),
      ..VideoConfig::default()
    }
  }

  /// Handler settings derived from this config.
  pub fn api_settings(&self) -> Result<ApiSettings, reqwest::Error> {
    Ok(ApiSettings {
      pick_policy: self.pick_policy,
      admin:       self.admin(),
      videos:      VideoSource::new(self.video_config())?,
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application: the API nested under `/api` with request
/// tracing.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: WordStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}
