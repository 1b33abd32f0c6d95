//! # GetUFit Session Store
//!
//! Persistence for the one record the whole client shares: the result of the
//! last successful onboarding submission.
//!
//! The store is a single fixed slot. Writes fully replace the previous
//! record; there are no merge semantics, no versioning, and no expiry. An
//! absent record is an explicit, non-retryable signal that consumers must
//! treat as "onboard first".
//!
//! Storage layout:
//!
//! ```text
//! <base_path>/
//! └── session.json      # last onboarding response, stored whole
//! ```

pub mod error;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use store::{FileSessionStore, SessionStore};

/// Default data directory (`~/.getufit`)
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::home_dir()
        .map(|p| p.join(".getufit"))
        .unwrap_or_else(|| std::path::PathBuf::from("./getufit_data"))
}
