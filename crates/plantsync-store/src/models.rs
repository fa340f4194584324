//! Serialized forms of the persisted snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use plantsync_types::{Entity, MoistureEntity, TemperatureEntity};

/// Attribute payload of a stored entity.
///
/// Temperature entities carry both a numeric `value` and a `status`
/// label; moisture entities fold the label into `value` and omit
/// `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredAttributes {
    /// Published attribute value.
    pub value: String,
    /// Qualitative status label, present for temperature entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// One entity as written to the entities snapshot.
///
/// The snapshot file is a mapping from entity id to this shape, so the
/// id itself lives in the map key rather than in the record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredEntity {
    /// Kind tag, `"temperature"` or `"moisture"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Id of the remote plant the entity was derived from.
    pub plant_id: String,
    /// Plant nickname.
    pub nickname: String,
    /// Botanical name.
    pub scientific_name: String,
    /// Published attributes.
    pub attributes: StoredAttributes,
}

impl StoredEntity {
    /// Serialize a live entity.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Self {
        match entity {
            Entity::Temperature(e) => Self {
                kind: "temperature".to_string(),
                plant_id: e.plant_id.clone(),
                nickname: e.nickname.clone(),
                scientific_name: e.scientific_name.clone(),
                attributes: StoredAttributes {
                    value: e.value.clone(),
                    status: Some(e.status_text.clone()),
                },
            },
            Entity::Moisture(e) => Self {
                kind: "moisture".to_string(),
                plant_id: e.plant_id.clone(),
                nickname: e.nickname.clone(),
                scientific_name: e.scientific_name.clone(),
                attributes: StoredAttributes {
                    value: e.value.clone(),
                    status: None,
                },
            },
        }
    }

    /// Rehydrate a live entity, or `None` for an unrecognized kind tag.
    #[must_use]
    pub fn into_entity(self, id: &str) -> Option<Entity> {
        match self.kind.as_str() {
            "temperature" => Some(Entity::Temperature(TemperatureEntity {
                id: id.to_string(),
                plant_id: self.plant_id,
                nickname: self.nickname,
                scientific_name: self.scientific_name,
                value: self.attributes.value,
                status_text: self.attributes.status.unwrap_or_else(|| "Unknown".to_string()),
            })),
            "moisture" => Some(Entity::Moisture(MoistureEntity {
                id: id.to_string(),
                plant_id: self.plant_id,
                nickname: self.nickname,
                scientific_name: self.scientific_name,
                value: self.attributes.value,
            })),
            _ => None,
        }
    }
}

/// The on-disk entities snapshot: entity id to stored record.
pub type EntitySnapshot = BTreeMap<String, StoredEntity>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temperature_roundtrip() {
        let mut temp = TemperatureEntity::new("7", "Fern", "Nephrolepis exaltata");
        temp.value = "21.5".to_string();
        temp.status_text = "Perfect".to_string();
        let entity = Entity::Temperature(temp);

        let stored = StoredEntity::from_entity(&entity);
        assert_eq!(stored.kind, "temperature");
        assert_eq!(stored.attributes.status.as_deref(), Some("Perfect"));

        let back = stored.into_entity("temp-7").unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_moisture_omits_status() {
        let mut moist = MoistureEntity::new("7", "Fern", "Nephrolepis exaltata");
        moist.value = "Too Low".to_string();
        let entity = Entity::Moisture(moist);

        let stored = StoredEntity::from_entity(&entity);
        let json = serde_json::to_value(&stored).unwrap();
        assert!(json["attributes"].get("status").is_none());
        assert_eq!(json["type"], "moisture");
        assert_eq!(json["attributes"]["value"], "Too Low");

        let back = stored.into_entity("moist-7").unwrap();
        assert_eq!(back, entity);
    }

    #[test]
    fn test_unrecognized_kind_is_dropped() {
        let stored = StoredEntity {
            kind: "humidity".to_string(),
            plant_id: "7".to_string(),
            nickname: "Fern".to_string(),
            scientific_name: "Unknown".to_string(),
            attributes: StoredAttributes {
                value: "50".to_string(),
                status: None,
            },
        };
        assert!(stored.into_entity("hum-7").is_none());
    }
}
