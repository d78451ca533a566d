//! # trend-store
//!
//! Durable key-value persistence for the topic normalization engine.
//!
//! Collections are string-keyed maps persisted as human-readable JSON, one
//! file per collection inside a single state directory. Saves replace the
//! file atomically (temp file + rename), so a crash mid-write leaves the
//! previous contents intact. Loads favor availability: a missing or corrupt
//! file comes back as an empty collection, while real I/O failures
//! (permissions, disk) propagate.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::JsonStore;
