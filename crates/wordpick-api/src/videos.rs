//! Latest-videos listing backed by the YouTube Data API.
//!
//! A playlist id is used directly; a channel id is first resolved to the
//! channel's uploads playlist. Responses are mapped to [`Video`] values and
//! sorted newest first.

use std::time::Duration;

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use wordpick_core::store::WordStore;

use crate::{ApiState, error::ApiError};

pub const DEFAULT_API_BASE: &str = "https://www.googleapis.com/youtube/v3";
/// Items requested per playlist page.
pub const PAGE_SIZE: u32 = 50;
const TIMEOUT: Duration = Duration::from_secs(30);

// ─── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct VideoConfig {
  pub api_key:     Option<String>,
  pub channel_id:  Option<String>,
  pub playlist_id: Option<String>,
  #[serde(default = "default_api_base")]
  pub api_base:    String,
}

fn default_api_base() -> String { DEFAULT_API_BASE.to_owned() }

impl Default for VideoConfig {
  fn default() -> Self {
    Self {
      api_key:     None,
      channel_id:  None,
      playlist_id: None,
      api_base:    default_api_base(),
    }
  }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
  value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

// ─── Errors ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum VideoError {
  #[error("{0}")]
  NotConfigured(&'static str),

  #[error("{0}")]
  Upstream(String),
}

impl From<VideoError> for ApiError {
  fn from(e: VideoError) -> Self {
    match e {
      VideoError::NotConfigured(m) => ApiError::NotConfigured(m.to_owned()),
      VideoError::Upstream(m) => ApiError::Upstream(m),
    }
  }
}

// ─── Wire types ───────────────────────────────────────────────────────────────

/// One listed video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
  pub id:           String,
  pub title:        String,
  pub thumb:        Option<String>,
  pub published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Page<T> {
  #[serde(default)]
  items: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
  content_details: Option<ChannelDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelDetails {
  related_playlists: Option<RelatedPlaylists>,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
  uploads: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItem {
  content_details: Option<ItemDetails>,
  snippet:         Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDetails {
  video_id:           Option<String>,
  video_published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
  title:        Option<String>,
  published_at: Option<String>,
  thumbnails:   Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
  medium:  Option<Thumbnail>,
  default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
  url: String,
}

fn published(video: &Video) -> Option<DateTime<Utc>> {
  video
    .published_at
    .as_deref()
    .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    .map(|dt| dt.with_timezone(&Utc))
}

/// Map a playlist page to videos, dropping items without an id, newest first.
fn videos_from_page(page: Page<PlaylistItem>) -> Vec<Video> {
  let mut videos: Vec<Video> = page
    .items
    .into_iter()
    .filter_map(|item| {
      let details = item.content_details?;
      let id = details.video_id.filter(|id| !id.is_empty())?;
      let snippet = item.snippet;
      let title = snippet
        .as_ref()
        .and_then(|s| s.title.clone())
        .unwrap_or_default();
      let thumb = snippet.as_ref().and_then(|s| s.thumbnails.as_ref()).and_then(|t| {
        t.medium
          .as_ref()
          .or(t.default.as_ref())
          .map(|thumb| thumb.url.clone())
      });
      let published_at = details
        .video_published_at
        .or_else(|| snippet.and_then(|s| s.published_at));
      Some(Video { id, title, thumb, published_at })
    })
    .collect();

  // None sorts last.
  videos.sort_by(|a, b| published(b).cmp(&published(a)));
  videos
}

// ─── Client ───────────────────────────────────────────────────────────────────

/// Configured video API client.
#[derive(Debug, Clone)]
pub struct VideoSource {
  config: VideoConfig,
  client: reqwest::Client,
}

impl VideoSource {
  pub fn new(config: VideoConfig) -> Result<Self, reqwest::Error> {
    let client = reqwest::Client::builder().timeout(TIMEOUT).build()?;
    Ok(Self { config, client })
  }

  /// The most recent uploads for the configured playlist or channel.
  pub async fn latest(&self) -> Result<Vec<Video>, VideoError> {
    let key = non_blank(&self.config.api_key)
      .ok_or(VideoError::NotConfigured("Missing YouTube API key"))?;

    let playlist = match (
      non_blank(&self.config.playlist_id),
      non_blank(&self.config.channel_id),
    ) {
      (Some(playlist), _) => playlist.to_owned(),
      (None, Some(channel)) => self.uploads_playlist(key, channel).await?,
      (None, None) => {
        return Err(VideoError::NotConfigured(
          "Set a YouTube channel id (UC…) or playlist id (UU…/PL…)",
        ));
      }
    };

    let page_size = PAGE_SIZE.to_string();
    let page: Page<PlaylistItem> = self
      .fetch("playlistItems", &[
        ("part", "contentDetails,snippet"),
        ("maxResults", page_size.as_str()),
        ("playlistId", playlist.as_str()),
        ("key", key),
      ])
      .await?;
    Ok(videos_from_page(page))
  }

  async fn uploads_playlist(&self, key: &str, channel: &str) -> Result<String, VideoError> {
    let page: Page<ChannelItem> = self
      .fetch("channels", &[("part", "contentDetails"), ("id", channel), ("key", key)])
      .await?;
    page
      .items
      .into_iter()
      .next()
      .and_then(|c| c.content_details)
      .and_then(|d| d.related_playlists)
      .and_then(|r| r.uploads)
      .ok_or(VideoError::NotConfigured(
        "Could not resolve the channel's uploads playlist. Check the channel id.",
      ))
  }

  async fn fetch<T>(&self, resource: &str, query: &[(&str, &str)]) -> Result<T, VideoError>
  where
    T: serde::de::DeserializeOwned,
  {
    let url = format!("{}/{resource}", self.config.api_base.trim_end_matches('/'));
    let resp = self
      .client
      .get(&url)
      .query(query)
      .send()
      .await
      .map_err(|e| VideoError::Upstream(format!("video API request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
      let text = resp.text().await.unwrap_or_default();
      return Err(VideoError::Upstream(format!("YouTube API error: {status} {text}")));
    }

    resp
      .json()
      .await
      .map_err(|e| VideoError::Upstream(format!("unreadable video API response: {e}")))
  }
}

// ─── Handler ──────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct VideoList {
  pub videos: Vec<Video>,
}

/// `GET /videos` (also served as `/youtube`)
pub async fn list<S>(State(state): State<ApiState<S>>) -> Result<Json<VideoList>, ApiError>
where
  S: WordStore,
  S::Error: std::error::Error + Send + Sync + 'static,
{
  let videos = state.settings.videos.latest().await?;
  Ok(Json(VideoList { videos }))
}
