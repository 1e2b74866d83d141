//! # Scry Core
//!
//! Shared logic for scry: data models, content addressing, chunking,
//! the inverted index builder, the store abstraction, lexical search,
//! and the evidence ranking pipeline behind `scry ask`.
//!
//! This crate performs no filesystem or database I/O. Callers hand it
//! file contents and a [`store::Store`] implementation; the `scry`
//! application crate supplies the SQLite backend, the file enumerator,
//! and the CLI.

pub mod ask;
pub mod chunk;
pub mod digest;
pub mod lexical;
pub mod models;
pub mod search;
pub mod store;
