//! Durable sensor entities derived from remote plants.
//!
//! Each plant-with-sensor yields up to two entities: a temperature sensor
//! and a moisture sensor. Entity ids are derived deterministically from
//! the plant id so repeated reconciliation passes upsert the same
//! identities instead of creating duplicates.
//!
//! Entities are never deleted automatically — a plant disappearing from
//! the remote list leaves its entities stale but present.

use std::collections::BTreeMap;

/// Entity id for the temperature sensor of a plant.
#[must_use]
pub fn temperature_entity_id(plant_id: &str) -> String {
    format!("temp-{plant_id}")
}

/// Entity id for the moisture sensor of a plant.
#[must_use]
pub fn moisture_entity_id(plant_id: &str) -> String {
    format!("moist-{plant_id}")
}

/// Kind tag of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Temperature,
    Moisture,
}

impl EntityKind {
    /// Wire name used in the persisted snapshot (`"temperature"` / `"moisture"`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Moisture => "moisture",
        }
    }
}

/// A temperature sensor entity.
///
/// `value` is the numeric reading rendered as a string (`"21.5"`), with
/// `"0"` standing in when the sensor has no data; `status_text` carries
/// the qualitative label (`"Perfect"`, `"Too High"`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureEntity {
    pub id: String,
    pub plant_id: String,
    pub nickname: String,
    pub scientific_name: String,
    pub value: String,
    pub status_text: String,
}

impl TemperatureEntity {
    /// Create a temperature entity with default attribute values.
    #[must_use]
    pub fn new(plant_id: &str, nickname: &str, scientific_name: &str) -> Self {
        Self {
            id: temperature_entity_id(plant_id),
            plant_id: plant_id.to_string(),
            nickname: nickname.to_string(),
            scientific_name: scientific_name.to_string(),
            value: "0".to_string(),
            status_text: "Unknown".to_string(),
        }
    }

    /// Host-facing display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} Temperature", self.nickname)
    }
}

/// A moisture sensor entity.
///
/// `value` is always a status string (`"Perfect"`, `"No Data"`, ...),
/// never numeric, optionally decorated with a battery warning.
#[derive(Debug, Clone, PartialEq)]
pub struct MoistureEntity {
    pub id: String,
    pub plant_id: String,
    pub nickname: String,
    pub scientific_name: String,
    pub value: String,
}

impl MoistureEntity {
    /// Create a moisture entity with default attribute values.
    #[must_use]
    pub fn new(plant_id: &str, nickname: &str, scientific_name: &str) -> Self {
        Self {
            id: moisture_entity_id(plant_id),
            plant_id: plant_id.to_string(),
            nickname: nickname.to_string(),
            scientific_name: scientific_name.to_string(),
            value: "Unknown".to_string(),
        }
    }

    /// Host-facing display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} Moisture", self.nickname)
    }
}

/// A durable, externally addressable sensor record.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    Temperature(TemperatureEntity),
    Moisture(MoistureEntity),
}

impl Entity {
    /// Stable entity id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Temperature(e) => &e.id,
            Self::Moisture(e) => &e.id,
        }
    }

    /// Kind tag.
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Temperature(_) => EntityKind::Temperature,
            Self::Moisture(_) => EntityKind::Moisture,
        }
    }

    /// Id of the remote plant this entity was derived from.
    #[must_use]
    pub fn plant_id(&self) -> &str {
        match self {
            Self::Temperature(e) => &e.plant_id,
            Self::Moisture(e) => &e.plant_id,
        }
    }

    /// Plant nickname.
    #[must_use]
    pub fn nickname(&self) -> &str {
        match self {
            Self::Temperature(e) => &e.nickname,
            Self::Moisture(e) => &e.nickname,
        }
    }

    /// Botanical name.
    #[must_use]
    pub fn scientific_name(&self) -> &str {
        match self {
            Self::Temperature(e) => &e.scientific_name,
            Self::Moisture(e) => &e.scientific_name,
        }
    }

    /// Host-facing display name.
    #[must_use]
    pub fn display_name(&self) -> String {
        match self {
            Self::Temperature(e) => e.display_name(),
            Self::Moisture(e) => e.display_name(),
        }
    }

    /// Current attribute value as published to the host.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Temperature(e) => &e.value,
            Self::Moisture(e) => &e.value,
        }
    }

    /// Display unit for the host boundary, if any.
    #[must_use]
    pub fn unit(&self) -> Option<&'static str> {
        match self {
            Self::Temperature(_) => Some("°C"),
            Self::Moisture(_) => None,
        }
    }
}

/// The single source of truth for derived entities, keyed by entity id.
///
/// Owned exclusively by the reconciler; the persistence bridge and the
/// host-facing publish step only read it. Backed by a `BTreeMap` so
/// iteration order and serialized snapshots are deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntitySet {
    entities: BTreeMap<String, Entity>,
}

impl EntitySet {
    /// Create an empty entity set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an entity by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.entities.contains_key(id)
    }

    /// Insert or replace an entity, keyed by its own id.
    pub fn insert(&mut self, entity: Entity) -> Option<Entity> {
        self.entities.insert(entity.id().to_string(), entity)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Iterate entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// All entity ids in order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.entities.keys().cloned().collect()
    }
}

impl FromIterator<Entity> for EntitySet {
    fn from_iter<I: IntoIterator<Item = Entity>>(iter: I) -> Self {
        let mut set = Self::new();
        for entity in iter {
            set.insert(entity);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_ids_are_deterministic() {
        assert_eq!(temperature_entity_id("7"), "temp-7");
        assert_eq!(moisture_entity_id("7"), "moist-7");

        let a = TemperatureEntity::new("7", "Fern", "Nephrolepis");
        let b = TemperatureEntity::new("7", "Renamed", "Nephrolepis");
        assert_eq!(a.id, b.id);
    }

    #[test]
    fn test_display_names() {
        let temp = TemperatureEntity::new("7", "Fern", "Nephrolepis");
        assert_eq!(temp.display_name(), "Fern Temperature");
        let moist = MoistureEntity::new("7", "Fern", "Nephrolepis");
        assert_eq!(moist.display_name(), "Fern Moisture");
    }

    #[test]
    fn test_defaults_before_first_reading() {
        let temp = TemperatureEntity::new("7", "Fern", "Nephrolepis");
        assert_eq!(temp.value, "0");
        assert_eq!(temp.status_text, "Unknown");
        let moist = MoistureEntity::new("7", "Fern", "Nephrolepis");
        assert_eq!(moist.value, "Unknown");
    }

    #[test]
    fn test_entity_set_upsert_keeps_identity() {
        let mut set = EntitySet::new();
        let mut temp = TemperatureEntity::new("7", "Fern", "Nephrolepis");
        set.insert(Entity::Temperature(temp.clone()));
        assert!(set.contains("temp-7"));
        assert_eq!(set.len(), 1);

        temp.value = "21.5".to_string();
        set.insert(Entity::Temperature(temp));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get("temp-7").unwrap().value(), "21.5");
    }

    #[test]
    fn test_unit_per_kind() {
        let temp = Entity::Temperature(TemperatureEntity::new("1", "A", "B"));
        let moist = Entity::Moisture(MoistureEntity::new("1", "A", "B"));
        assert_eq!(temp.unit(), Some("°C"));
        assert_eq!(moist.unit(), None);
    }

    #[test]
    fn test_iteration_is_id_ordered() {
        let set: EntitySet = [
            Entity::Moisture(MoistureEntity::new("2", "B", "x")),
            Entity::Temperature(TemperatureEntity::new("1", "A", "x")),
        ]
        .into_iter()
        .collect();
        let ids = set.ids();
        assert_eq!(ids, vec!["moist-2".to_string(), "temp-1".to_string()]);
    }
}
