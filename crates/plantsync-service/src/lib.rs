//! Background synchronization service for plant sensors.
//!
//! This crate wires the sync engine to the outside world:
//! - Loads persisted entities and publishes them to the host before any
//!   network activity, so the system is usable offline
//! - Runs reconciliation passes on a fixed schedule, gated on a
//!   reachability probe
//! - Reacts to host connect/subscribe events without blocking on the
//!   network
//! - Persists the session and entity snapshot after every pass that
//!   changed them
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/plantsync/config.toml`:
//!
//! ```toml
//! [api]
//! base_url = "https://web.fyta.de/api"
//! request_timeout_secs = 10
//! probe_timeout_secs = 5
//!
//! [sync]
//! interval_secs = 900
//! retry_attempts = 3
//! retry_base_delay_secs = 1
//!
//! [storage]
//! dir = "~/.local/share/plantsync"
//! ```

pub mod config;
pub mod host;
pub mod orchestrator;
pub mod scheduler;
pub mod state;

pub use config::{ApiConfig, Config, ConfigError, StorageConfig, SyncConfig};
pub use host::{AttributeUpdate, EntityRegistry, HostBridge, HostEvent};
pub use orchestrator::{Orchestrator, PassResult};
pub use scheduler::Scheduler;
pub use state::{AppState, SyncStats};
