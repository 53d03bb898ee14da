//! Local persistence: one JSON document holding every collection

pub mod autosave;
pub mod document;
pub mod gateway;

pub use autosave::spawn_autosave;
pub use document::{Document, Preferences, Stats};
pub use gateway::{AutoConfirm, Confirm, StorageGateway};
