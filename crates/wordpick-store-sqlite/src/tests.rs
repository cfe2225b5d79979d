//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::{Duration, Local, Utc};
use uuid::Uuid;
use wordpick_core::{
  leaderboard::Period,
  mood::MoodState,
  pick::{NewPick, Pick, RecordOutcome, SessionStats},
  store::WordStore,
  word::WordEntry,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn pick(session: &str, word: &str) -> NewPick { NewPick::new(session, word).unwrap() }

async fn record(s: &SqliteStore, session: &str, word: &str) -> Pick {
  match s.record_pick(pick(session, word), None).await.unwrap() {
    RecordOutcome::Recorded(p) => p,
    RecordOutcome::DailyLimitReached => panic!("unexpected daily limit"),
  }
}

/// A pick stamped `days_ago` whole days before now.
async fn record_backdated(s: &SqliteStore, session: &str, word: &str, days_ago: i64) {
  let backdated = Pick {
    pick_id:    Uuid::new_v4(),
    session_id: session.to_owned(),
    word:       word.to_owned(),
    mood:       None,
    note:       None,
    tags:       None,
    created_at: Utc::now() - Duration::days(days_ago),
  };
  s.write_pick(backdated, None).await.unwrap();
}

fn seed_words() -> Vec<WordEntry> {
  vec![
    WordEntry::new("Calm").with_levels(1, 1).with_tags(["soothe", "ground"]),
    WordEntry::new("Focus").with_levels(1, 2).with_tags(["focus"]),
    WordEntry::new("Gratitude").with_levels(2, 2).with_tags(["lift", "reframe"]),
    WordEntry::new("Courage").with_levels(2, 4).with_tags(["elevate", "stretch"]),
    WordEntry::new("Momentum").with_levels(2, 4).with_tags(["elevate", "build"]),
    WordEntry::new("Nourish").with_levels(2, 2).with_tags(["soothe", "care"]),
    WordEntry::new("Gloom").with_levels(-1, 1).with_tags(["soothe"]),
  ]
}

// ─── Sessions and picks ──────────────────────────────────────────────────────

#[tokio::test]
async fn touch_session_is_idempotent() {
  let s = store().await;
  s.touch_session("abc".into()).await.unwrap();
  s.touch_session("abc".into()).await.unwrap();
  assert_eq!(s.count_picks("abc".into()).await.unwrap(), 0);
}

#[tokio::test]
async fn record_pick_creates_the_session() {
  let s = store().await;
  let mut input = pick("fresh-session", "Calm");
  input.mood = Some(4);
  input.note = Some("long week".into());
  input.tags = Some(vec!["soothe".into()]);

  let outcome = s.record_pick(input, None).await.unwrap();
  let RecordOutcome::Recorded(stored) = outcome else {
    panic!("expected a recorded pick");
  };
  assert_eq!(stored.session_id, "fresh-session");
  assert_eq!(stored.mood, Some(4));
  assert_eq!(s.count_picks("fresh-session".into()).await.unwrap(), 1);
}

#[tokio::test]
async fn unlimited_picks_per_day_by_default() {
  let s = store().await;
  record(&s, "abc", "Calm").await;
  record(&s, "abc", "Focus").await;
  assert_eq!(s.count_picks("abc".into()).await.unwrap(), 2);
}

#[tokio::test]
async fn locked_window_refuses_a_second_pick() {
  let s = store().await;
  let since = Period::Today.since(&Local::now());

  let first = s.record_pick(pick("abc", "Calm"), since).await.unwrap();
  assert!(matches!(first, RecordOutcome::Recorded(_)));

  let second = s.record_pick(pick("abc", "Focus"), since).await.unwrap();
  assert_eq!(second, RecordOutcome::DailyLimitReached);
  assert_eq!(s.count_picks("abc".into()).await.unwrap(), 1);

  // Other sessions are unaffected.
  let other = s.record_pick(pick("xyz", "Focus"), since).await.unwrap();
  assert!(matches!(other, RecordOutcome::Recorded(_)));
}

#[tokio::test]
async fn recent_picks_are_newest_first_and_limited() {
  let s = store().await;
  record_backdated(&s, "abc", "Old", 3).await;
  record_backdated(&s, "abc", "Middle", 1).await;
  record(&s, "abc", "New").await;

  let recent = s.recent_picks("abc".into(), 2).await.unwrap();
  let words: Vec<_> = recent.iter().map(|p| p.word.as_str()).collect();
  assert_eq!(words, ["New", "Middle"]);
}

#[tokio::test]
async fn streak_over_three_days() {
  let s = store().await;
  record(&s, "abc", "Calm").await;
  record_backdated(&s, "abc", "Focus", 1).await;
  record_backdated(&s, "abc", "Play", 2).await;

  let total = s.count_picks("abc".into()).await.unwrap();
  let recent = s.recent_picks("abc".into(), 50).await.unwrap();
  let stats = SessionStats::from_history(total, recent, &Local::now());
  assert_eq!(stats.total, 3);
  assert_eq!(stats.streak, 3);
  assert_eq!(stats.last_pick.unwrap().word, "Calm");
}

#[tokio::test]
async fn streak_is_zero_without_a_pick_today() {
  let s = store().await;
  record_backdated(&s, "abc", "Focus", 1).await;
  record_backdated(&s, "abc", "Play", 2).await;

  let recent = s.recent_picks("abc".into(), 50).await.unwrap();
  let stats = SessionStats::from_history(2, recent, &Local::now());
  assert_eq!(stats.streak, 0);
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn leaderboard_ranks_today_by_count() {
  let s = store().await;
  for session in ["a", "b", "c"] {
    record(&s, session, "Focus").await;
  }
  record(&s, "d", "Calm").await;

  let rows = s
    .leaderboard(Period::Today.since(&Local::now()), 10)
    .await
    .unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!((rows[0].word.as_str(), rows[0].picks), ("Focus", 3));
  assert_eq!((rows[1].word.as_str(), rows[1].picks), ("Calm", 1));
}

#[tokio::test]
async fn leaderboard_windows() {
  let s = store().await;
  record(&s, "a", "Calm").await;
  record_backdated(&s, "a", "Focus", 3).await;
  record_backdated(&s, "a", "Play", 30).await;

  let now = Local::now();
  let week = s.leaderboard(Period::Week.since(&now), 10).await.unwrap();
  let all = s.leaderboard(Period::All.since(&now), 10).await.unwrap();
  assert_eq!(week.len(), 2);
  assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn leaderboard_ties_break_alphabetically() {
  let s = store().await;
  record(&s, "a", "Zest").await;
  record(&s, "a", "Awe").await;

  let rows = s.leaderboard(None, 10).await.unwrap();
  assert_eq!(rows[0].word, "Awe");
  assert_eq!(rows[1].word, "Zest");
}

#[tokio::test]
async fn word_totals_rank_by_total() {
  let s = store().await;
  record(&s, "a", "Calm").await;
  record(&s, "b", "Focus").await;
  record(&s, "c", "Focus").await;

  let totals = s.word_totals(100).await.unwrap();
  assert_eq!(totals[0].word, "Focus");
  assert_eq!(totals[0].total, 2);
  assert_eq!(totals[1].total, 1);
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_classifies_insert_then_update() {
  let s = store().await;
  let entry = WordEntry::new("Calm").with_levels(1, 1);

  let first = s.upsert_words(vec![entry.clone()]).await.unwrap();
  assert_eq!((first.inserted, first.updated, first.total), (1, 0, 1));

  let second = s.upsert_words(vec![entry]).await.unwrap();
  assert_eq!((second.inserted, second.updated, second.total), (0, 1, 1));
}

#[tokio::test]
async fn upsert_overwrites_metadata() {
  let s = store().await;
  s.upsert_words(vec![WordEntry::new("Calm").with_levels(1, 1)])
    .await
    .unwrap();

  let mut changed = WordEntry::new("Calm").with_levels(2, 2).with_tags(["ground"]);
  changed.lang = "fr".into();
  changed.synonyms = vec!["Steady".into()];
  s.upsert_words(vec![changed.clone()]).await.unwrap();

  let words = s.list_words(None).await.unwrap();
  assert_eq!(words, vec![changed]);
}

#[tokio::test]
async fn upsert_failure_rolls_back_the_batch() {
  let s = store().await;
  let result = s
    .upsert_words(vec![WordEntry::new("Good"), WordEntry::new("Bad").with_levels(9, 9)])
    .await;
  assert!(result.is_err());
  assert!(s.list_words(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
  let s = store().await;
  s.upsert_words(seed_words()).await.unwrap();

  let found = s.search_words("OU".into(), 25).await.unwrap();
  assert_eq!(found, vec!["Courage", "Nourish"]);

  let limited = s.search_words("o".into(), 2).await.unwrap();
  assert_eq!(limited.len(), 2);

  let literal = s.search_words("%".into(), 25).await.unwrap();
  assert!(literal.is_empty());
}

#[tokio::test]
async fn suggestions_respect_mood_bounds() {
  let s = store().await;
  let seed = seed_words();
  s.upsert_words(seed.clone()).await.unwrap();

  for state in MoodState::ALL {
    let filter = state.filter();
    let words = s.suggest_words(filter, 24).await.unwrap();
    for word in &words {
      let entry = seed.iter().find(|e| &e.word == word).unwrap();
      assert!(filter.matches(entry), "{word} does not fit {state:?}");
    }
  }
}

#[tokio::test]
async fn sad_suggestions_are_the_soothing_words() {
  let s = store().await;
  s.upsert_words(seed_words()).await.unwrap();

  let words: HashSet<String> = s
    .suggest_words(MoodState::Sad.filter(), 12)
    .await
    .unwrap()
    .into_iter()
    .collect();
  // Nourish has energy 2 and the "care" tag; Gloom has negative valence.
  assert_eq!(words, HashSet::from(["Calm".to_owned(), "Nourish".to_owned()]));

  let one = s.suggest_words(MoodState::Sad.filter(), 1).await.unwrap();
  assert_eq!(one.len(), 1);
}

#[tokio::test]
async fn existing_words_match_ignoring_case() {
  let s = store().await;
  s.upsert_words(seed_words()).await.unwrap();

  let found = s
    .existing_words(vec!["calm".into(), "FOCUS".into(), "Play".into()])
    .await
    .unwrap();
  assert_eq!(found, vec!["Calm", "Focus"]);
}

#[tokio::test]
async fn case_folding_covers_non_ascii_words() {
  let s = store().await;
  let mut ete = WordEntry::new("Été");
  ete.lang = "fr".into();
  let mut omur = WordEntry::new("Ömür");
  omur.lang = "tr".into();
  s.upsert_words(vec![omur, ete, WordEntry::new("Zest")])
    .await
    .unwrap();

  assert_eq!(s.search_words("été".into(), 25).await.unwrap(), vec!["Été"]);
  assert_eq!(s.search_words("ÖMÜR".into(), 25).await.unwrap(), vec!["Ömür"]);
  assert_eq!(s.search_words("MÜ".into(), 25).await.unwrap(), vec!["Ömür"]);

  let found = s
    .existing_words(vec!["été".into(), "ömür".into()])
    .await
    .unwrap();
  assert_eq!(found, vec!["Été", "Ömür"]);

  let order: Vec<String> = s
    .list_words(None)
    .await
    .unwrap()
    .into_iter()
    .map(|w| w.word)
    .collect();
  // Folded byte order: "zest" < "été" < "ömür".
  assert_eq!(order, ["Zest", "Été", "Ömür"]);
}

#[tokio::test]
async fn list_words_filters_by_language() {
  let s = store().await;
  let mut french = WordEntry::new("Calme");
  french.lang = "fr".into();
  s.upsert_words(vec![WordEntry::new("calm"), french, WordEntry::new("Bold")])
    .await
    .unwrap();

  let all: Vec<String> = s
    .list_words(None)
    .await
    .unwrap()
    .into_iter()
    .map(|w| w.word)
    .collect();
  assert_eq!(all, ["Bold", "calm", "Calme"]);

  let fr = s.list_words(Some("fr".into())).await.unwrap();
  assert_eq!(fr.len(), 1);
  assert_eq!(fr[0].word, "Calme");
}

#[tokio::test]
async fn health_reports_in_memory_db() {
  let s = store().await;
  let health = s.health().await.unwrap();
  assert_eq!(health.db, ":memory:");
  assert!(!health.version.is_empty());
  assert!(health.now.ends_with('Z'));
}
