//! Async HTTP client wrapping the wordpick JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response, header};
use serde::{Deserialize, Serialize};
use wordpick_core::{
  ingest::{BulkOutcome, DryRunReport},
  leaderboard::{LeaderboardRow, Period},
  word::WordEntry,
};

/// Connection settings for the wordpick API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub username: String,
  pub password: String,
}

/// Result of a bulk upload: written, or only validated.
#[derive(Debug)]
pub enum Upload {
  Written(BulkOutcome),
  Checked(DryRunReport),
}

#[derive(Debug, Deserialize)]
pub struct Leaderboard {
  pub period: Period,
  pub rows:   Vec<LeaderboardRow>,
}

#[derive(Deserialize)]
struct Export {
  rows: Vec<WordEntry>,
}

#[derive(Serialize)]
struct RowsBody<'a> {
  rows: &'a [WordEntry],
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the wordpick JSON REST API.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    if self.config.username.is_empty() {
      req
    } else {
      req.basic_auth(&self.config.username, Some(&self.config.password))
    }
  }

  /// Turn a non-2xx response into an error carrying the server's message.
  async fn ensure_success(what: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
      .map(|body| body.error)
      .unwrap_or(text);
    Err(anyhow!("{what} → {status}: {message}"))
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  /// `POST /api/words/bulk` with a JSON `{"rows":[...]}` body.
  pub async fn upload_rows(&self, rows: &[WordEntry], dry_run: bool) -> Result<Upload> {
    let req = self
      .auth(self.client.post(self.url("/words/bulk")))
      .json(&RowsBody { rows });
    self.send_upload(req, dry_run).await
  }

  /// `POST /api/words/bulk` with a `text/csv` body.
  pub async fn upload_csv(&self, csv: String, dry_run: bool) -> Result<Upload> {
    let req = self
      .auth(self.client.post(self.url("/words/bulk")))
      .header(header::CONTENT_TYPE, "text/csv")
      .body(csv);
    self.send_upload(req, dry_run).await
  }

  async fn send_upload(&self, req: reqwest::RequestBuilder, dry_run: bool) -> Result<Upload> {
    let req = if dry_run { req.query(&[("dry", "1")]) } else { req };
    let resp = req.send().await.context("POST /words/bulk failed")?;
    let resp = Self::ensure_success("POST /words/bulk", resp).await?;

    if dry_run {
      let report = resp.json().await.context("deserialising dry-run report")?;
      Ok(Upload::Checked(report))
    } else {
      let outcome = resp.json().await.context("deserialising upload outcome")?;
      Ok(Upload::Written(outcome))
    }
  }

  /// `GET /api/words/bulk[?lang=<code>]`
  pub async fn export_words(&self, lang: Option<&str>) -> Result<Vec<WordEntry>> {
    let mut req = self.auth(self.client.get(self.url("/words/bulk")));
    if let Some(lang) = lang {
      req = req.query(&[("lang", lang)]);
    }
    let resp = req.send().await.context("GET /words/bulk failed")?;
    let resp = Self::ensure_success("GET /words/bulk", resp).await?;
    let export: Export = resp.json().await.context("deserialising catalog export")?;
    Ok(export.rows)
  }

  /// `GET /api/words/bulk?format=csv[&lang=<code>]`
  pub async fn export_csv(&self, lang: Option<&str>) -> Result<String> {
    let mut req = self
      .auth(self.client.get(self.url("/words/bulk")))
      .query(&[("format", "csv")]);
    if let Some(lang) = lang {
      req = req.query(&[("lang", lang)]);
    }
    let resp = req.send().await.context("GET /words/bulk?format=csv failed")?;
    let resp = Self::ensure_success("GET /words/bulk?format=csv", resp).await?;
    resp.text().await.context("reading CSV export")
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  /// `GET /api/leaderboard?period=<period>`
  pub async fn leaderboard(&self, period: Period) -> Result<Leaderboard> {
    let resp = self
      .auth(self.client.get(self.url("/leaderboard")))
      .query(&[("period", period.key())])
      .send()
      .await
      .context("GET /leaderboard failed")?;
    let resp = Self::ensure_success("GET /leaderboard", resp).await?;
    resp.json().await.context("deserialising leaderboard")
  }
}
