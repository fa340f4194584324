//! Entity reconciliation: merging remote plant data into the entity set.
//!
//! The reconciler is the single writer of the [`EntitySet`]. Each pass
//! walks the fetched plants in API order (the order carries no meaning
//! and is not relied upon), derives display values, and upserts the
//! temperature and moisture entities for every plant with a sensor.
//!
//! Per-item errors — a plant without an id, a malformed measurement —
//! skip that plant and continue; one bad record never aborts a pass.
//! Entities are never deleted: a plant absent from a later poll leaves
//! its entities stale but present.

use tracing::{debug, warn};

use plantsync_types::{
    Entity, EntitySet, Measurement, MeasurementStatus, MoistureEntity, RemotePlant,
    TemperatureEntity, moisture_entity_id, temperature_entity_id,
};

/// What one reconciliation pass did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileOutcome {
    /// Entities created this pass.
    pub created: usize,
    /// Entities whose attributes actually changed this pass.
    pub updated: usize,
    /// Plants skipped (no sensor, no id).
    pub skipped: usize,
    /// Ids of entities created or changed, in processing order.
    pub changed_ids: Vec<String>,
}

impl ReconcileOutcome {
    /// Whether any entity was created or changed.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.changed_ids.is_empty()
    }
}

/// Owner and single writer of the entity set.
#[derive(Debug, Default)]
pub struct Reconciler {
    entities: EntitySet,
}

impl Reconciler {
    /// Start with an empty entity set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously persisted entity set.
    #[must_use]
    pub fn with_entities(entities: EntitySet) -> Self {
        Self { entities }
    }

    /// The current entity set.
    #[must_use]
    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    /// Merge a batch of detail-level plant payloads into the entity set.
    pub fn reconcile(&mut self, plants: &[RemotePlant]) -> ReconcileOutcome {
        let mut outcome = ReconcileOutcome::default();

        for plant in plants {
            if !plant.has_sensor() {
                debug!("plant {} has no sensor, skipping", plant.display_nickname());
                outcome.skipped += 1;
                continue;
            }
            let Some(id) = &plant.id else {
                warn!("plant {} has no id, skipping", plant.display_nickname());
                outcome.skipped += 1;
                continue;
            };
            self.apply_plant(&id.to_string(), plant, &mut outcome);
        }

        debug!(
            "reconciled {} plants: {} created, {} updated, {} skipped",
            plants.len(),
            outcome.created,
            outcome.updated,
            outcome.skipped
        );
        outcome
    }

    fn apply_plant(&mut self, plant_id: &str, plant: &RemotePlant, outcome: &mut ReconcileOutcome) {
        let battery_low = plant.battery_low();
        if battery_low {
            warn!("plant {} reports a low battery", plant.display_nickname());
        }

        let Some(measurements) = &plant.measurements else {
            return;
        };
        if let Some(temperature) = &measurements.temperature {
            self.apply_temperature(plant_id, plant, temperature, outcome);
        }
        if let Some(moisture) = &measurements.moisture {
            self.apply_moisture(plant_id, plant, moisture, battery_low, outcome);
        }
    }

    fn apply_temperature(
        &mut self,
        plant_id: &str,
        plant: &RemotePlant,
        measurement: &Measurement,
        outcome: &mut ReconcileOutcome,
    ) {
        let status = MeasurementStatus::from_code(measurement.status_code());
        let entity_id = temperature_entity_id(plant_id);

        let mut entity = match self.entities.get(&entity_id) {
            Some(Entity::Temperature(existing)) => existing.clone(),
            _ => TemperatureEntity::new(
                plant_id,
                &plant.display_nickname(),
                &plant.display_scientific_name(),
            ),
        };
        let existed = self.entities.contains(&entity_id);
        let before = entity.clone();

        if !status.has_data() {
            entity.value = "0".to_string();
        } else if let Some(current) = measurement.current_value() {
            entity.value = current;
        }
        entity.status_text = status.label().to_string();

        self.commit(existed, before != entity, Entity::Temperature(entity), outcome);
    }

    fn apply_moisture(
        &mut self,
        plant_id: &str,
        plant: &RemotePlant,
        measurement: &Measurement,
        battery_low: bool,
        outcome: &mut ReconcileOutcome,
    ) {
        let code = measurement.status_code();
        let entity_id = moisture_entity_id(plant_id);

        let mut entity = match self.entities.get(&entity_id) {
            Some(Entity::Moisture(existing)) => existing.clone(),
            _ => MoistureEntity::new(
                plant_id,
                &plant.display_nickname(),
                &plant.display_scientific_name(),
            ),
        };
        let existed = self.entities.contains(&entity_id);
        let before = entity.clone();

        // A raw zero reading with status 1 is otherwise ambiguous with
        // "no data", so it gets the literal too-low label.
        let base = if code == 0 {
            "No Data".to_string()
        } else if code == 1 && measurement.current_value().as_deref() == Some("0") {
            "Too Low".to_string()
        } else {
            MeasurementStatus::from_code(code).label().to_string()
        };
        // Recomputed from the base value every pass, so the decoration
        // never stacks.
        entity.value = if battery_low {
            format!("{base} (Battery Low)")
        } else {
            base
        };

        self.commit(existed, before != entity, Entity::Moisture(entity), outcome);
    }

    fn commit(
        &mut self,
        existed: bool,
        differs: bool,
        entity: Entity,
        outcome: &mut ReconcileOutcome,
    ) {
        if !existed {
            outcome.created += 1;
            outcome.changed_ids.push(entity.id().to_string());
            self.entities.insert(entity);
        } else if differs {
            outcome.updated += 1;
            outcome.changed_ids.push(entity.id().to_string());
            self.entities.insert(entity);
        }
    }
}
