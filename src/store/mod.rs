//! Durable state: the audit database and the settings document

pub mod records;
pub mod settings;

pub use records::{RecordStore, StoredRecord};
pub use settings::{RunSettings, SettingsStore};
