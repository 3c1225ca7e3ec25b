//! # Storage Module
//!
//! Durable key-value persistence for the tracker.
//!
//! - **traits**: the `KeyValueStorage` abstraction (a string-to-string map)
//! - **db**: SQLite-backed implementation with a byte quota
//! - **record_store**: JSON record collections layered on any `KeyValueStorage`
//!
//! Every collection is stored as one JSON array under a fixed key and is
//! rewritten in full on each mutation. There is a single writer; concurrent
//! writers on the same key overwrite each other.

pub mod db;
pub mod record_store;
pub mod traits;

pub use db::DbConnection;
pub use record_store::{generate_id, Collection, CollectionState, Record, RecordStore};
pub use traits::KeyValueStorage;
