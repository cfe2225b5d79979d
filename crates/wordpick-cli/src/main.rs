//! `wordpick`: maintenance commands for a running wordpick server.
//!
//! # Usage
//!
//! ```text
//! wordpick --url http://localhost:8080 seed
//! wordpick export-exclude --lang en
//! wordpick train words.csv --dry-run
//! wordpick --config ~/.config/wordpick/config.toml leaderboard --period week
//! ```

mod client;
mod seed;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client::{ApiClient, ApiConfig, Upload};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use wordpick_core::{
  ingest::{DryRunReport, normalize_rows},
  leaderboard::Period,
};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "wordpick", about = "Maintenance commands for the wordpick catalog")]
struct Args {
  /// Path to a TOML config file (url, username, password).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the wordpick server (default: http://localhost:8080).
  #[arg(long, env = "WORDPICK_URL")]
  url: Option<String>,

  /// Admin username for catalog uploads.
  #[arg(long, env = "WORDPICK_USER")]
  user: Option<String>,

  /// Admin password (plaintext).
  #[arg(long, env = "WORDPICK_PASSWORD")]
  password: Option<String>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Upsert the starter word set.
  Seed,
  /// Print every known word, comma-joined, for prompt exclusion lists.
  ExportExclude {
    #[arg(long, default_value = "en")]
    lang: String,
  },
  /// Print the catalog as JSON or CSV.
  Export {
    #[arg(long)]
    lang:   Option<String>,
    #[arg(long, value_enum, default_value_t = Format::Csv)]
    format: Format,
  },
  /// Print a starter CSV with the expected columns.
  Template,
  /// Upload a CSV file of word metadata.
  Train {
    file:    PathBuf,
    /// Validate and report duplicates without writing.
    #[arg(long)]
    dry_run: bool,
  },
  /// Show the most-picked words.
  Leaderboard {
    /// today, week or all.
    #[arg(long, default_value = "today")]
    period: String,
  },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
  Json,
  Csv,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  url:      String,
  #[serde(default)]
  username: String,
  #[serde(default)]
  password: String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_writer(std::io::stderr)
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let api_config = ApiConfig {
    base_url: args
      .url
      .or_else(|| (!file_cfg.url.is_empty()).then(|| file_cfg.url.clone()))
      .unwrap_or_else(|| "http://localhost:8080".to_string()),
    username: args
      .user
      .or_else(|| (!file_cfg.username.is_empty()).then(|| file_cfg.username.clone()))
      .unwrap_or_default(),
    password: args
      .password
      .or_else(|| (!file_cfg.password.is_empty()).then(|| file_cfg.password.clone()))
      .unwrap_or_default(),
  };

  let client = ApiClient::new(api_config)?;
  match args.command {
    Command::Template => print!("{}", wordpick_csv::TEMPLATE),
    Command::Seed => {
      let upload = client.upload_rows(&seed::seed_words(), false).await?;
      report(&upload);
    }
    Command::ExportExclude { lang } => {
      let words = client.export_words(Some(lang.as_str())).await?;
      let list: Vec<String> = words.into_iter().map(|w| w.word).collect();
      println!("{}", list.join(","));
    }
    Command::Export { lang, format } => match format {
      Format::Csv => print!("{}", client.export_csv(lang.as_deref()).await?),
      Format::Json => {
        let words = client.export_words(lang.as_deref()).await?;
        println!("{}", serde_json::to_string_pretty(&words)?);
      }
    },
    Command::Train { file, dry_run } => {
      let csv = std::fs::read_to_string(&file)
        .with_context(|| format!("reading {}", file.display()))?;
      // Fail fast on files the server would reject anyway.
      let rows = wordpick_csv::parse_rows(&csv)
        .with_context(|| format!("parsing {}", file.display()))?;
      let entries = normalize_rows(&rows).context("no usable rows")?;
      tracing::info!(rows = rows.len(), valid = entries.len(), "uploading {}", file.display());

      let upload = client.upload_csv(csv, dry_run).await?;
      report(&upload);
    }
    Command::Leaderboard { period } => {
      let board = client.leaderboard(Period::resolve(Some(period.as_str()))).await?;
      println!("Leaderboard ({})", board.period.key());
      for (rank, row) in board.rows.iter().enumerate() {
        println!("{:>3}. {:<24} {}", rank + 1, row.word, row.picks);
      }
    }
  }

  Ok(())
}

fn report(upload: &Upload) {
  match upload {
    Upload::Written(outcome) => println!(
      "inserted {}, updated {}, total {}",
      outcome.inserted, outcome.updated, outcome.total
    ),
    Upload::Checked(DryRunReport { counts, dup_near }) => {
      println!(
        "dry run: {} rows, {} new, {} exact duplicates, {} near duplicates",
        counts.total, counts.new, counts.dup_exact, counts.dup_near
      );
      for near in dup_near {
        println!("  {} ~ {}", near.word, near.existing);
      }
    }
  }
}
