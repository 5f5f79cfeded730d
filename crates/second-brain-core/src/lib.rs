//! # Second Brain Core
//!
//! Runtime-agnostic logic for Second Brain: the journal atomizer, keyword
//! tagger, content fingerprinting, delta selection, the store and source
//! traits, and the sync engine that ties them together.
//!
//! This crate contains no tokio, sqlx, process spawning or HTTP code. The
//! `second-brain` application crate supplies the concrete SQLite store and
//! GitHub sources.

pub mod atomize;
pub mod delta;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod source;
pub mod store;
pub mod sync;
pub mod tagger;
