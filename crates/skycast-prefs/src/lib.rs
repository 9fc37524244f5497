//! Persisted user preferences for Skycast
//!
//! A single JSON document on disk plus one change stream per setting.
//! The store is the source of truth: consumers mirror state from the
//! streams rather than updating optimistically.

pub mod store;

pub use store::{PreferencesStore, PrefsError};
