//! [`SqliteStore`]: the SQLite implementation of [`WordStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, functions::FunctionFlags};
use uuid::Uuid;

use wordpick_core::{
  ingest::{BulkOutcome, UpsertStatus},
  leaderboard::{LeaderboardRow, WordTotal},
  mood::MoodFilter,
  pick::{NewPick, Pick, PickSummary, RecordOutcome},
  store::{StoreHealth, WordStore},
  word::WordEntry,
};

use crate::{
  Result,
  encode::{
    EncodedWord, RawPickSummary, RawWord, RawWordTotal, encode_dt, encode_list,
    encode_uuid,
  },
  schema::SCHEMA,
};

const UPSERT_WORD: &str = "
INSERT INTO word_bank (word, lang, valence, energy, types, domains, tags, synonyms, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
ON CONFLICT (word) DO UPDATE SET
  lang       = excluded.lang,
  valence    = excluded.valence,
  energy     = excluded.energy,
  types      = excluded.types,
  domains    = excluded.domains,
  tags       = excluded.tags,
  synonyms   = excluded.synonyms,
  updated_at = excluded.updated_at";

/// Register `fold_case(text)`, a Unicode lowercase. SQLite's `lower()` and
/// `LIKE` fold ASCII only.
fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "fold_case",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let text: Option<String> = ctx.get(0)?;
      Ok(text.map(|t| t.to_lowercase()))
    },
  )
}

/// Escape `LIKE` wildcards so `needle` matches literally.
fn like_pattern(needle: &str) -> String {
  let mut escaped = String::with_capacity(needle.len() + 2);
  escaped.push('%');
  for c in needle.chars() {
    if matches!(c, '\\' | '%' | '_') {
      escaped.push('\\');
    }
    escaped.push(c);
  }
  escaped.push('%');
  escaped
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A wordpick store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert a fully-built [`Pick`] (and its session, if new) in one
  /// transaction, honouring `locked_since`.
  pub(crate) async fn write_pick(
    &self,
    pick: Pick,
    locked_since: Option<DateTime<Utc>>,
  ) -> Result<RecordOutcome> {
    let pick_id_str    = encode_uuid(pick.pick_id);
    let session_id     = pick.session_id.clone();
    let word           = pick.word.clone();
    let mood           = pick.mood;
    let note           = pick.note.clone();
    let tags_str       = pick.tags.as_deref().map(encode_list).transpose()?;
    let created_at_str = encode_dt(pick.created_at);
    let locked_str     = locked_since.map(encode_dt);

    let written = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO player_session (id, created_at) VALUES (?1, ?2)
           ON CONFLICT (id) DO NOTHING",
          rusqlite::params![session_id, created_at_str],
        )?;

        if let Some(since) = locked_str {
          let already: bool = tx.query_row(
            "SELECT EXISTS (
               SELECT 1 FROM pick WHERE session_id = ?1 AND created_at >= ?2
             )",
            rusqlite::params![session_id, since],
            |row| row.get(0),
          )?;
          if already {
            return Ok(false);
          }
        }

        tx.execute(
          "INSERT INTO pick (pick_id, session_id, word, mood, note, tags, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            pick_id_str,
            session_id,
            word,
            mood,
            note,
            tags_str,
            created_at_str,
          ],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    Ok(if written {
      RecordOutcome::Recorded(pick)
    } else {
      RecordOutcome::DailyLimitReached
    })
  }
}

// ─── WordStore impl ──────────────────────────────────────────────────────────

impl WordStore for SqliteStore {
  type Error = crate::Error;

  // ── Sessions and picks ────────────────────────────────────────────────────

  async fn touch_session(&self, session_id: String) -> Result<()> {
    let at_str = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO player_session (id, created_at) VALUES (?1, ?2)
           ON CONFLICT (id) DO NOTHING",
          rusqlite::params![session_id, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn record_pick(
    &self,
    input: NewPick,
    locked_since: Option<DateTime<Utc>>,
  ) -> Result<RecordOutcome> {
    let pick = Pick {
      pick_id:    Uuid::new_v4(),
      session_id: input.session_id,
      word:       input.word,
      mood:       input.mood,
      note:       input.note,
      tags:       input.tags,
      created_at: Utc::now(),
    };
    self.write_pick(pick, locked_since).await
  }

  async fn count_picks(&self, session_id: String) -> Result<u64> {
    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM pick WHERE session_id = ?1",
          rusqlite::params![session_id],
          |row| row.get(0),
        )?)
      })
      .await?;
    Ok(count.max(0) as u64)
  }

  async fn recent_picks(&self, session_id: String, limit: u32) -> Result<Vec<PickSummary>> {
    let raws: Vec<RawPickSummary> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word, created_at FROM pick
           WHERE session_id = ?1
           ORDER BY created_at DESC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![session_id, i64::from(limit)], |row| {
            Ok(RawPickSummary {
              word:       row.get(0)?,
              created_at: row.get(1)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPickSummary::into_summary).collect()
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn leaderboard(
    &self,
    since: Option<DateTime<Utc>>,
    limit: u32,
  ) -> Result<Vec<LeaderboardRow>> {
    let since_str = since.map(encode_dt);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word, COUNT(*) AS picks FROM pick
           WHERE ?1 IS NULL OR created_at >= ?1
           GROUP BY word
           ORDER BY picks DESC, word ASC
           LIMIT ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![since_str, i64::from(limit)], |row| {
            let picks: i64 = row.get(1)?;
            Ok(LeaderboardRow {
              word:  row.get(0)?,
              picks: picks.max(0) as u64,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn word_totals(&self, limit: u32) -> Result<Vec<WordTotal>> {
    let raws: Vec<RawWordTotal> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word, COUNT(*) AS total, MAX(created_at) AS last_seen FROM pick
           GROUP BY word
           ORDER BY total DESC, last_seen DESC
           LIMIT ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![i64::from(limit)], |row| {
            Ok(RawWordTotal {
              word:      row.get(0)?,
              total:     row.get(1)?,
              last_seen: row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWordTotal::into_total).collect()
  }

  // ── Catalog ───────────────────────────────────────────────────────────────

  async fn search_words(&self, needle: String, limit: u32) -> Result<Vec<String>> {
    let pattern = like_pattern(&needle.to_lowercase());

    let words = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word FROM word_bank
           WHERE fold_case(word) LIKE ?1 ESCAPE '\\'
           ORDER BY word ASC
           LIMIT ?2",
        )?;
        let words = stmt
          .query_map(rusqlite::params![pattern, i64::from(limit)], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(words)
      })
      .await?;

    Ok(words)
  }

  async fn suggest_words(&self, filter: MoodFilter, limit: u32) -> Result<Vec<String>> {
    let tags_json = serde_json::to_string(filter.tags_any)?;

    let words = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT w.word FROM word_bank w
           WHERE w.valence >= ?1
             AND w.energy BETWEEN ?2 AND ?3
             AND (?4 = '[]' OR EXISTS (
               SELECT 1 FROM json_each(w.tags) t
               WHERE t.value IN (SELECT value FROM json_each(?4))
             ))
           ORDER BY random()
           LIMIT ?5",
        )?;
        let words = stmt
          .query_map(
            rusqlite::params![
              filter.valence_min,
              filter.energy_min,
              filter.energy_max,
              tags_json,
              i64::from(limit),
            ],
            |row| row.get(0),
          )?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(words)
      })
      .await?;

    Ok(words)
  }

  async fn upsert_words(&self, entries: Vec<WordEntry>) -> Result<BulkOutcome> {
    let encoded = entries
      .into_iter()
      .map(EncodedWord::from_entry)
      .collect::<Result<Vec<_>>>()?;
    let at_str = encode_dt(Utc::now());

    // One transaction for the batch: a failing row rolls back every row.
    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut outcome = BulkOutcome::default();
        for w in &encoded {
          let existed = tx
            .query_row(
              "SELECT 1 FROM word_bank WHERE word = ?1",
              rusqlite::params![w.word],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);

          tx.execute(
            UPSERT_WORD,
            rusqlite::params![
              w.word, w.lang, w.valence, w.energy, w.types, w.domains, w.tags,
              w.synonyms, at_str,
            ],
          )?;

          outcome.record(if existed {
            UpsertStatus::Updated
          } else {
            UpsertStatus::Inserted
          });
        }
        tx.commit()?;
        Ok(outcome)
      })
      .await?;

    Ok(outcome)
  }

  async fn existing_words(&self, candidates: Vec<String>) -> Result<Vec<String>> {
    let lowered: Vec<String> = candidates.iter().map(|c| c.to_lowercase()).collect();
    let lowered_json = serde_json::to_string(&lowered)?;

    let words = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word FROM word_bank
           WHERE fold_case(word) IN (SELECT value FROM json_each(?1))
           ORDER BY word ASC",
        )?;
        let words = stmt
          .query_map(rusqlite::params![lowered_json], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(words)
      })
      .await?;

    Ok(words)
  }

  async fn list_words(&self, lang: Option<String>) -> Result<Vec<WordEntry>> {
    let raws: Vec<RawWord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT word, lang, valence, energy, types, domains, tags, synonyms
           FROM word_bank
           WHERE ?1 IS NULL OR lang = ?1
           ORDER BY fold_case(word), word",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![lang], |row| {
            Ok(RawWord {
              word:     row.get(0)?,
              lang:     row.get(1)?,
              valence:  row.get(2)?,
              energy:   row.get(3)?,
              types:    row.get(4)?,
              domains:  row.get(5)?,
              tags:     row.get(6)?,
              synonyms: row.get(7)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawWord::into_entry).collect()
  }

  // ── Health ────────────────────────────────────────────────────────────────

  async fn health(&self) -> Result<StoreHealth> {
    let health = self
      .conn
      .call(|conn| {
        let (now, version): (String, String) = conn.query_row(
          "SELECT strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), sqlite_version()",
          [],
          |row| Ok((row.get(0)?, row.get(1)?)),
        )?;
        let file: String = conn.query_row(
          "SELECT file FROM pragma_database_list WHERE name = 'main'",
          [],
          |row| row.get(0),
        )?;
        let db = if file.is_empty() { ":memory:".to_owned() } else { file };
        Ok(StoreHealth { now, db, version })
      })
      .await?;
    Ok(health)
  }
}
