//! Router-level tests driving the API with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{HeaderMap, Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use serde_json::{Value, json};
use tower::ServiceExt;
use wordpick_core::{
  pick::{DAILY_LIMIT_MESSAGE, PickPolicy},
  store::WordStore,
};
use wordpick_store_sqlite::SqliteStore;

use crate::{AdminAuth, ApiSettings, ApiState, VideoConfig, VideoSource, api_router, auth};

// ─── Harness ──────────────────────────────────────────────────────────────────

fn settings() -> ApiSettings {
  ApiSettings {
    pick_policy: PickPolicy::Unlimited,
    admin:       None,
    videos:      VideoSource::new(VideoConfig::default()).unwrap(),
  }
}

async fn app_with(settings: ApiSettings) -> (Router, SqliteStore) {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let router = api_router(ApiState::new(Arc::new(store.clone()), settings));
  (router, store)
}

async fn app() -> (Router, SqliteStore) { app_with(settings()).await }

async fn send_full(app: &Router, req: Request<Body>) -> (StatusCode, HeaderMap, String) {
  let resp = app.clone().oneshot(req).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
  let (status, _, body) = send_full(app, req).await;
  (status, serde_json::from_str(&body).unwrap_or(Value::Null))
}

fn get(uri: &str) -> Request<Body> {
  Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(body.to_string()))
    .unwrap()
}

fn post_csv(uri: &str, body: &str) -> Request<Body> {
  Request::builder()
    .method("POST")
    .uri(uri)
    .header(header::CONTENT_TYPE, "text/csv")
    .body(Body::from(body.to_owned()))
    .unwrap()
}

async fn pick(app: &Router, session: &str, word: &str) -> (StatusCode, Value) {
  send(app, post_json("/pick", json!({ "sessionId": session, "word": word }))).await
}

fn seed_rows() -> Value {
  json!({ "rows": [
    { "word": "Calm", "valence": 1, "energy": 1, "tags": "soothe|ground" },
    { "word": "Focus", "valence": 1, "energy": 2, "tags": ["focus"] },
    { "word": "Courage", "valence": 2, "energy": 4, "tags": "elevate; stretch" },
    { "word": "Nourish", "valence": 2, "energy": 2, "tags": "soothe,care" },
    { "word": "Celebrate", "valence": 2, "energy": 5, "tags": "celebrate|joy" },
  ]})
}

// ─── Sessions and picks ──────────────────────────────────────────────────────

#[tokio::test]
async fn session_touch() {
  let (app, _) = app().await;
  let (status, body) = send(&app, post_json("/session", json!({ "sessionId": "abc" }))).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "ok": true }));

  let (status, body) = send(&app, post_json("/session", json!({ "sessionId": "  " }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Missing sessionId");
}

#[tokio::test]
async fn pick_without_required_fields_persists_nothing() {
  let (app, store) = app().await;

  let (status, body) = send(&app, post_json("/pick", json!({ "word": "Calm" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "sessionId is required");

  let (status, body) = send(&app, post_json("/pick", json!({ "sessionId": "abc" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "word is required");

  assert_eq!(store.count_picks("abc".into()).await.unwrap(), 0);
  assert!(store.leaderboard(None, 10).await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
  let (app, _) = app().await;
  let req = Request::builder()
    .method("POST")
    .uri("/pick")
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from("{not json"))
    .unwrap();
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn pick_then_stats() {
  let (app, _) = app().await;
  let req = post_json(
    "/pick",
    json!({ "sessionId": "abc", "word": " Calm ", "mood": 4, "note": "hi", "tags": ["soothe"] }),
  );
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);
  assert!(body["id"].as_str().is_some_and(|id| id.len() == 36));

  let (status, stats) = send(&app, get("/stats?sessionId=abc")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stats["total"], 1);
  assert_eq!(stats["streak"], 1);
  assert_eq!(stats["lastPick"]["word"], "Calm");
}

#[tokio::test]
async fn pick_accepts_a_numeric_string_mood() {
  let (app, _) = app().await;
  let req = post_json("/pick", json!({ "sessionId": "abc", "word": "Calm", "mood": "3" }));
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);

  let req = post_json("/pick", json!({ "sessionId": "abc", "word": "Calm", "mood": "high" }));
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "mood must be a number");
}

#[tokio::test]
async fn stats_for_an_unknown_session_are_empty() {
  let (app, _) = app().await;
  let (status, stats) = send(&app, get("/stats?sessionId=nobody")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(stats["total"], 0);
  assert_eq!(stats["streak"], 0);
  assert!(stats["lastPick"].is_null());
}

#[tokio::test]
async fn stats_require_a_session() {
  let (app, _) = app().await;
  let (status, _) = send(&app, get("/stats")).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn one_per_day_policy_refuses_a_second_pick() {
  let (app, store) = app_with(ApiSettings {
    pick_policy: PickPolicy::OnePerDay,
    ..settings()
  })
  .await;

  let (status, _) = pick(&app, "abc", "Calm").await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = pick(&app, "abc", "Focus").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], DAILY_LIMIT_MESSAGE);
  assert_eq!(store.count_picks("abc".into()).await.unwrap(), 1);
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn leaderboard_ranks_todays_picks() {
  let (app, _) = app().await;
  for session in ["a", "b", "c"] {
    pick(&app, session, "Focus").await;
  }
  pick(&app, "d", "Calm").await;

  let (status, body) = send(&app, get("/leaderboard")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({
      "period": "today",
      "rows": [{ "word": "Focus", "picks": 3 }, { "word": "Calm", "picks": 1 }],
    })
  );

  let (_, body) = send(&app, get("/leaderboard?period=WEEK")).await;
  assert_eq!(body["period"], "week");
  let (_, body) = send(&app, get("/leaderboard?period=forever")).await;
  assert_eq!(body["period"], "today");
}

#[tokio::test]
async fn wordwall_weights_and_highlight() {
  let (app, _) = app().await;
  pick(&app, "a", "Focus").await;
  pick(&app, "b", "Focus").await;
  pick(&app, "c", "Calm").await;

  let (status, body) = send(&app, get("/wordwall?highlight=focus")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body["words"],
    json!([
      { "word": "Focus", "weight": 4, "isHighlight": true },
      { "word": "Calm", "weight": 2, "isHighlight": false },
    ])
  );
}

// ─── Catalog ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn bulk_insert_then_update() {
  let (app, _) = app().await;
  let rows = json!({ "rows": [{ "word": "Calm", "valence": 9, "energy": "0" }] });

  let (status, body) = send(&app, post_json("/words/bulk", rows.clone())).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!({ "ok": true, "inserted": 1, "updated": 0, "total": 1 }));

  let (_, body) = send(&app, post_json("/words/bulk", rows)).await;
  assert_eq!(body, json!({ "ok": true, "inserted": 0, "updated": 1, "total": 1 }));

  let (_, export) = send(&app, get("/words/bulk")).await;
  assert_eq!(export["rows"][0]["valence"], 2);
  assert_eq!(export["rows"][0]["energy"], 1);
}

#[tokio::test]
async fn bulk_rejects_empty_and_invalid_batches() {
  let (app, _) = app().await;

  let (status, body) = send(&app, post_json("/words/bulk", json!({ "rows": [] }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "rows[] required");

  let (status, body) = send(&app, post_json("/words/bulk", json!({}))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "rows[] required");

  let rows = json!({ "rows": [{ "word": "  " }, { "tags": "calm" }] });
  let (status, body) = send(&app, post_json("/words/bulk", rows)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "no valid rows");
}

#[tokio::test]
async fn bulk_accepts_csv_bodies() {
  let (app, store) = app().await;
  let csv = "word,valence,energy,tags,lang\nCalm,1,1,\"soothe, ground\",en\nFocus,1,2,focus,\n";

  let (status, body) = send(&app, post_csv("/words/bulk", csv)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["inserted"], 2);

  let words = store.list_words(None).await.unwrap();
  assert_eq!(words[0].tags, ["soothe", "ground"]);
  assert_eq!(words[1].lang, "en");
}

#[tokio::test]
async fn dry_run_reports_duplicates_without_writing() {
  let (app, store) = app().await;
  send(&app, post_json("/words/bulk", json!({ "rows": [{ "word": "Calm" }] }))).await;

  let rows = json!({ "rows": [{ "word": "Calm" }, { "word": "calm" }, { "word": "Zest" }] });
  let (status, body) = send(&app, post_json("/words/bulk?dry=1", rows)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({
      "ok": true,
      "counts": { "total": 3, "new": 1, "dupExact": 1, "dupNear": 1 },
      "dupNear": [{ "word": "calm", "existing": "Calm" }],
    })
  );
  assert_eq!(store.list_words(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn dry_run_folds_non_ascii_case() {
  let (app, store) = app().await;
  send(&app, post_json("/words/bulk", json!({ "rows": [{ "word": "Été", "lang": "fr" }] }))).await;

  let rows = json!({ "rows": [{ "word": "Été" }, { "word": "été" }] });
  let (status, body) = send(&app, post_json("/words/bulk?dry=1", rows)).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(
    body,
    json!({
      "ok": true,
      "counts": { "total": 2, "new": 0, "dupExact": 1, "dupNear": 1 },
      "dupNear": [{ "word": "été", "existing": "Été" }],
    })
  );
  assert_eq!(store.list_words(None).await.unwrap().len(), 1);

  let (_, body) = send(&app, get("/words/search?q=%C3%89T")).await;
  assert_eq!(body, json!({ "words": ["Été"] }));
}

#[tokio::test]
async fn export_as_csv() {
  let (app, _) = app().await;
  send(&app, post_json("/words/bulk", seed_rows())).await;

  let (status, headers, body) = send_full(&app, get("/words/bulk?format=csv")).await;
  assert_eq!(status, StatusCode::OK);
  assert!(
    headers[header::CONTENT_TYPE]
      .to_str()
      .unwrap()
      .starts_with("text/csv")
  );
  let mut lines = body.lines();
  assert_eq!(lines.next(), Some("word,valence,energy,tags,domains,types,synonyms,lang"));
  assert_eq!(lines.next(), Some("Calm,1,1,soothe|ground,,,,en"));
}

#[tokio::test]
async fn search_matches_substrings() {
  let (app, _) = app().await;
  send(&app, post_json("/words/bulk", seed_rows())).await;

  let (_, body) = send(&app, get("/words/search?q=OUR")).await;
  assert_eq!(body, json!({ "words": ["Courage", "Nourish"] }));

  let (_, body) = send(&app, get("/words/search?q=%20%20")).await;
  assert_eq!(body, json!({ "words": [] }));
}

#[tokio::test]
async fn suggest_echoes_the_resolved_state() {
  let (app, _) = app().await;
  send(&app, post_json("/words/bulk", seed_rows())).await;

  let (_, body) = send(&app, get("/words/suggest?state=HAPPY_MORE&n=50")).await;
  assert_eq!(body["state"], "happy_more");
  let words = body["words"].as_array().unwrap();
  assert_eq!(words.len(), 2);
  assert!(words.iter().all(|w| *w == "Courage" || *w == "Celebrate"));

  let (_, body) = send(&app, get("/words/suggest?state=happy_more&n=1.9")).await;
  assert_eq!(body["words"].as_array().unwrap().len(), 1);

  let (_, body) = send(&app, get("/words/suggest?state=unknown")).await;
  assert_eq!(body["state"], "sad");
  let words = body["words"].as_array().unwrap();
  assert!(words.iter().all(|w| *w == "Calm" || *w == "Nourish"));
}

// ─── Admin gate ──────────────────────────────────────────────────────────────

fn admin_settings(password: &str) -> ApiSettings {
  let hash = auth::hash_password(password).unwrap();
  ApiSettings {
    admin: Some(AdminAuth { username: "admin".into(), password_hash: hash }),
    ..settings()
  }
}

#[tokio::test]
async fn bulk_upload_requires_credentials_when_configured() {
  let (app, _) = app_with(admin_settings("secret")).await;

  let (status, headers, _) = send_full(&app, post_json("/words/bulk", seed_rows())).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(headers.contains_key(header::WWW_AUTHENTICATE));

  let mut req = post_json("/words/bulk", seed_rows());
  let creds = B64.encode("admin:secret");
  req
    .headers_mut()
    .insert(header::AUTHORIZATION, format!("Basic {creds}").parse().unwrap());
  let (status, body) = send(&app, req).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["inserted"], 5);

  // Export stays open.
  let (status, _) = send(&app, get("/words/bulk")).await;
  assert_eq!(status, StatusCode::OK);
}

// ─── Misc ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn videos_without_configuration_are_a_bad_request() {
  let (app, _) = app().await;
  for uri in ["/videos", "/youtube"] {
    let (status, body) = send(&app, get(uri)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
  }
}

#[tokio::test]
async fn dbcheck_reports_the_database() {
  let (app, _) = app().await;
  let (status, body) = send(&app, get("/dbcheck")).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["ok"], true);
  assert_eq!(body["db"], ":memory:");
  assert!(body["now"].is_string());
  assert!(body["version"].is_string());
}
