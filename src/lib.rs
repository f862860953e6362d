//! Core library surface for the Admission Board TUI: a countdown-driven
//! admission schedule with favorites and a searchable seats-per-subject
//! table with bookmarks.
//!
//! The `bin` target only wires configuration, logging and the terminal
//! together; everything it needs is re-exported here so tests and other
//! tooling can drive the same pieces.
pub mod catalog;
pub mod config;
pub mod engine;
pub mod models;
pub mod preferences;
pub mod store;
pub mod ui;

/// Catalog loading and lookup.
pub use catalog::{CatalogError, SeatTable};

/// The domain types other layers manipulate.
pub use models::{AdmissionScheduleItem, Catalog, Department, Subject};

pub use preferences::{PreferenceSet, Preferences, Toggle};
pub use store::{KeyValueStore, MemoryStore, SqliteStore};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
