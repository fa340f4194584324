//! Local persistence for plant sensor entities and credentials.
//!
//! This crate stores two JSON snapshots in a data directory:
//!
//! - `credentials.json` — the account session (id, email, password,
//!   bearer tokens)
//! - `entities.json` — the derived sensor entities, keyed by entity id
//!
//! Both are written with a temp-file-then-rename scheme so restarts
//! never observe a half-written snapshot. Missing files read back as
//! "nothing persisted yet", never as errors.
//!
//! # Example
//!
//! ```no_run
//! use plantsync_store::Store;
//!
//! let store = Store::open_default()?;
//! let entities = store.load_entities()?;
//! println!("{} entities persisted", entities.len());
//! # Ok::<(), plantsync_store::Error>(())
//! ```

mod error;
mod models;
mod store;

pub use error::{Error, Result};
pub use models::{EntitySnapshot, StoredAttributes, StoredEntity};
pub use store::Store;

/// Default data directory following platform conventions.
///
/// - Linux: `~/.local/share/plantsync`
/// - macOS: `~/Library/Application Support/plantsync`
/// - Windows: `C:\Users\<user>\AppData\Local\plantsync`
pub fn default_data_dir() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("plantsync")
}
