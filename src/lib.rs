//! # scry
//!
//! A local-first codebase memory engine. `scry` incrementally indexes a
//! source tree into content-addressed chunks, answers lexical queries
//! over them, and answers questions with cited evidence or an explicit
//! refusal.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────┐   ┌───────────────┐
//! │  Enumerator  │──▶│ Incremental      │──▶│ SQLite store  │
//! │ walk+ignore  │   │ indexer          │   │ files/chunks/ │
//! └──────────────┘   │ hash→chunk→terms │   │ terms         │
//!                    └──────────────────┘   └──────┬────────┘
//!                                                  │
//!                          ┌───────────────────────┤
//!                          ▼                       ▼
//!                    ┌──────────┐          ┌───────────────┐
//!                    │  search  │─────────▶│ ask: ranking  │
//!                    │ (lexical)│          │ + refusal     │
//!                    └──────────┘          └───────────────┘
//! ```
//!
//! The pure parts (models, chunking, content addressing, the inverted
//! index, search, and the ranking pipeline) live in `scry-core`; this
//! crate adds the filesystem, SQLite, configuration, and CLI.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | `.scry.toml` parsing and validation |
//! | [`workspace`] | `.scry/` layout |
//! | [`ignore`] | Exclusion patterns |
//! | [`scan`] | File enumeration |
//! | [`db`] | Database connection |
//! | [`migrate`] | Schema migrations |
//! | [`sqlite_store`] | SQLite [`Store`](scry_core::store::Store) backend |
//! | [`indexer`] | Incremental indexing run |
//! | [`progress`] | Indexing progress reporting |
//! | [`exit`] | Exit codes |

pub mod ask;
pub mod config;
pub mod db;
pub mod exit;
pub mod ignore;
pub mod index_cmd;
pub mod indexer;
pub mod migrate;
pub mod progress;
pub mod scan;
pub mod search;
pub mod sqlite_store;
pub mod stats;
pub mod workspace;

pub use scry_core;
