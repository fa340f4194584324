//! Remote API payload types.
//!
//! These are the JSON shapes returned by the telemetry service. They are
//! deliberately tolerant: the API mixes numbers and strings for plant ids
//! and measurement values, and omits whole sub-objects when a plant has
//! no sensor, so almost everything is optional with defaults.
//!
//! Remote payloads are ephemeral — fetched each poll cycle and used only
//! to derive entity updates, never persisted.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Response body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// Bearer token for subsequent calls.
    pub access_token: String,
    /// Refresh token (stored but unused; expiry is discovered reactively).
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// Response body of `GET /user-plant`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlantList {
    /// All plants on the account, with or without sensors.
    #[serde(default)]
    pub plants: Vec<RemotePlant>,
}

/// Response body of `GET /user-plant/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlantWrapper {
    /// The requested plant with full measurement detail.
    pub plant: RemotePlant,
}

/// A plant as reported by the remote API.
///
/// The list endpoint returns summaries (id, names, sensor presence); the
/// detail endpoint additionally fills in `measurements` and the sensor's
/// battery state.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemotePlant {
    /// Remote plant id. The API is inconsistent about the JSON type.
    #[serde(default)]
    pub id: Option<PlantId>,
    /// User-chosen display name.
    #[serde(default)]
    pub nickname: Option<String>,
    /// Botanical name.
    #[serde(default)]
    pub scientific_name: Option<String>,
    /// Hardware sensor attached to this plant, if any.
    #[serde(default)]
    pub sensor: Option<SensorInfo>,
    /// Measurement detail (detail endpoint only).
    #[serde(default)]
    pub measurements: Option<Measurements>,
}

impl RemotePlant {
    /// Whether a hardware sensor is attached to this plant.
    #[must_use]
    pub fn has_sensor(&self) -> bool {
        self.sensor.as_ref().is_some_and(|s| s.has_sensor)
    }

    /// Whether the attached sensor reports a low battery.
    #[must_use]
    pub fn battery_low(&self) -> bool {
        self.sensor.as_ref().is_some_and(|s| s.is_battery_low)
    }

    /// Display name, falling back to `"Plant <id>"`.
    #[must_use]
    pub fn display_nickname(&self) -> String {
        match self.nickname.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => match &self.id {
                Some(id) => format!("Plant {id}"),
                None => "Plant".to_string(),
            },
        }
    }

    /// Scientific name, falling back to `"Unknown"`.
    #[must_use]
    pub fn display_scientific_name(&self) -> String {
        match self.scientific_name.as_deref() {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => "Unknown".to_string(),
        }
    }
}

/// Sensor hardware state attached to a plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SensorInfo {
    /// Whether the plant has a hardware sensor at all.
    #[serde(default)]
    pub has_sensor: bool,
    /// Whether the sensor battery is low.
    #[serde(default)]
    pub is_battery_low: bool,
}

/// The measurement kinds the detail endpoint reports.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Measurements {
    #[serde(default)]
    pub temperature: Option<Measurement>,
    #[serde(default)]
    pub moisture: Option<Measurement>,
}

/// One measurement: a status code plus the raw values behind it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Measurement {
    /// Raw status code (0 = no data, 1–5 = severity scale).
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub values: Option<MeasurementValues>,
}

impl Measurement {
    /// Raw status code, treating an absent status as "no data".
    #[must_use]
    pub fn status_code(&self) -> i64 {
        self.status.unwrap_or(0)
    }

    /// The current reading rendered as a string, if present.
    #[must_use]
    pub fn current_value(&self) -> Option<String> {
        self.values
            .as_ref()
            .and_then(|v| v.current.as_ref())
            .map(WireValue::to_string)
    }
}

/// Raw values of a measurement.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MeasurementValues {
    #[serde(default)]
    pub current: Option<WireValue>,
}

/// A JSON value the API serves either as a string or as a number.
///
/// Readings like `"21.5"` and `21.5` must compare and render identically,
/// so everything is normalized to its string form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Text(String),
    Number(serde_json::Number),
}

impl fmt::Display for WireValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Remote plant id, served as either a JSON number or string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PlantId {
    Number(i64),
    Text(String),
}

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plant_list_deserializes() {
        let json = r#"{"plants":[
            {"id": 7, "nickname": "Fern", "scientific_name": "Nephrolepis",
             "sensor": {"has_sensor": true}},
            {"id": "8", "nickname": "Cactus"}
        ]}"#;
        let list: PlantList = serde_json::from_str(json).unwrap();
        assert_eq!(list.plants.len(), 2);
        assert!(list.plants[0].has_sensor());
        assert!(!list.plants[1].has_sensor());
        assert_eq!(list.plants[0].id.as_ref().unwrap().to_string(), "7");
        assert_eq!(list.plants[1].id.as_ref().unwrap().to_string(), "8");
    }

    #[test]
    fn test_measurement_value_number_and_string_normalize() {
        let m: Measurement =
            serde_json::from_str(r#"{"status": 3, "values": {"current": "21.5"}}"#).unwrap();
        assert_eq!(m.current_value().as_deref(), Some("21.5"));

        let m: Measurement =
            serde_json::from_str(r#"{"status": 3, "values": {"current": 21.5}}"#).unwrap();
        assert_eq!(m.current_value().as_deref(), Some("21.5"));
    }

    #[test]
    fn test_missing_status_is_no_data() {
        let m: Measurement = serde_json::from_str(r#"{"values": {}}"#).unwrap();
        assert_eq!(m.status_code(), 0);
        assert_eq!(m.current_value(), None);
    }

    #[test]
    fn test_detail_wrapper() {
        let json = r#"{"plant": {"id": 7, "sensor": {"has_sensor": true, "is_battery_low": true},
            "measurements": {"moisture": {"status": 1, "values": {"current": "0"}}}}}"#;
        let detail: PlantWrapper = serde_json::from_str(json).unwrap();
        assert!(detail.plant.battery_low());
        let moisture = detail.plant.measurements.unwrap().moisture.unwrap();
        assert_eq!(moisture.status_code(), 1);
        assert_eq!(moisture.current_value().as_deref(), Some("0"));
    }

    #[test]
    fn test_display_name_fallbacks() {
        let plant = RemotePlant {
            id: Some(PlantId::Number(7)),
            ..Default::default()
        };
        assert_eq!(plant.display_nickname(), "Plant 7");
        assert_eq!(plant.display_scientific_name(), "Unknown");
    }

    #[test]
    fn test_auth_response() {
        let json = r#"{"access_token": "abc", "refresh_token": "def", "expires_in": 3600}"#;
        let auth: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(auth.access_token, "abc");
        assert_eq!(auth.expires_in, Some(3600));
    }
}
