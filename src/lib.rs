//! # Second Brain
//!
//! Turns free-form journal issues into deduplicated, PARA-classified
//! "atomic thoughts" stored in SQLite, ingesting only the journals that are
//! newer than what the store already holds.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌──────────────┐
//! │ JournalSource│──▶│  Atomizer          │──▶│ ThoughtStore │
//! │ gh CLI / API │   │  Tagger + Checksum │   │ SQLite       │
//! └──────────────┘   └────────────────────┘   └──────┬───────┘
//!        ▲                                           │
//!        └──────────── watermark (latest date) ◀─────┘
//! ```
//!
//! The parsing, tagging, dedup and sync logic lives in
//! [`second_brain_core`]; this crate provides configuration, the SQLite
//! store, the GitHub sources, and the `brain` CLI.
//!
//! ## Quick Start
//!
//! ```bash
//! brain init                        # create database
//! brain sync --repo me/journal      # ingest new journal issues
//! brain stats                       # PARA breakdown
//! brain atomize ./2026-02-16.md     # preview a local entry
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`connector_gh`] | `gh` CLI journal source |
//! | [`connector_github`] | GitHub REST journal source |
//! | [`ingest`] | `brain sync` wiring and report |
//! | [`sqlite_store`] | SQLite `ThoughtStore` |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |

pub mod config;
pub mod connector_gh;
pub mod connector_github;
pub mod db;
pub mod ingest;
pub mod migrate;
pub mod preview;
pub mod sources;
pub mod sqlite_store;
pub mod stats;
