//! Core types and trait definitions for the wordpick service.
//!
//! This crate is deliberately free of HTTP and database dependencies. It
//! owns the business rules: the mood table, bulk-row normalization, streak
//! arithmetic, leaderboard windows and the [`store::WordStore`] abstraction
//! every backend implements.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod ingest;
pub mod leaderboard;
pub mod mood;
pub mod pick;
pub mod store;
pub mod streak;
pub mod word;

pub use error::{Error, Result};
