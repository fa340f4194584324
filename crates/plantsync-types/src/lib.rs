//! Wire and domain types for the plantsync synchronization engine.
//!
//! This crate defines the three layers of data the engine moves between:
//!
//! - **Remote payloads** ([`RemotePlant`] and friends) — the JSON shapes
//!   returned by the plant telemetry API. Ephemeral, fetched per poll
//!   cycle, never persisted directly.
//! - **Measurement status** ([`MeasurementStatus`]) — the 0–5 severity
//!   scale the API attaches to each measurement, with its stable text
//!   labels.
//! - **Entities** ([`Entity`], [`EntitySet`]) — the durable, user-visible
//!   sensor records derived from remote plants. Entity identities are
//!   deterministic (`temp-<plant id>` / `moist-<plant id>`) so the same
//!   plant always maps to the same entities across restarts.
//!
//! No I/O happens here; the sync engine in `plantsync-core` drives these
//! types.

pub mod entity;
pub mod plant;
pub mod session;
pub mod status;

pub use entity::{
    Entity, EntityKind, EntitySet, MoistureEntity, TemperatureEntity, moisture_entity_id,
    temperature_entity_id,
};
pub use plant::{
    AuthResponse, Measurement, MeasurementValues, Measurements, PlantId, PlantList, PlantWrapper,
    RemotePlant, SensorInfo, WireValue,
};
pub use session::Session;
pub use status::MeasurementStatus;
