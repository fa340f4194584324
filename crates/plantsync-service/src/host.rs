//! Host protocol boundary.
//!
//! The host integration (the controller that surfaces entities to end
//! users) is an external collaborator. This module defines the trait the
//! sync side talks through, the events the host can raise, and an
//! in-memory registry implementation used by the binary and by tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use plantsync_types::Entity;

/// Attribute payload pushed to the host for one entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeUpdate {
    /// Entity availability state, `"ON"` once a value is published.
    pub state: &'static str,
    /// Current attribute value.
    pub value: String,
    /// Display unit, if the entity has one.
    pub unit: Option<&'static str>,
}

impl AttributeUpdate {
    /// Build the publishable attributes of an entity from its cached state.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            state: "ON",
            value: entity.value().to_string(),
            unit: entity.unit(),
        }
    }
}

/// Events raised by the host integration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// The host (re)connected and expects fresh data.
    Connect,
    /// The host went away; nothing to push until it returns.
    Disconnect,
    /// The host subscribed to these entity ids and wants their current
    /// values immediately.
    Subscribe(Vec<String>),
}

/// The surface the sync side drives on the host.
#[async_trait]
pub trait HostBridge: Send + Sync {
    /// Advertise a new entity to the host.
    async fn add(&self, entity: &Entity);

    /// Whether the host already knows this entity id.
    async fn contains(&self, id: &str) -> bool;

    /// Push updated attributes for a known entity.
    async fn update_attributes(&self, id: &str, update: AttributeUpdate);
}

/// An entity as the host registry sees it.
#[derive(Debug, Clone)]
pub struct RegisteredEntity {
    /// Host-facing display name.
    pub display_name: String,
    /// Last pushed attributes, if any.
    pub attributes: Option<AttributeUpdate>,
}

/// In-memory [`HostBridge`] implementation.
#[derive(Default)]
pub struct EntityRegistry {
    entities: Mutex<BTreeMap<String, RegisteredEntity>>,
}

impl EntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of all registered entities, in order.
    pub async fn ids(&self) -> Vec<String> {
        self.entities.lock().await.keys().cloned().collect()
    }

    /// Last attributes pushed for an entity, if any.
    pub async fn attributes_of(&self, id: &str) -> Option<AttributeUpdate> {
        self.entities
            .lock()
            .await
            .get(id)
            .and_then(|e| e.attributes.clone())
    }

    /// Display name the entity was registered with.
    pub async fn display_name_of(&self, id: &str) -> Option<String> {
        self.entities
            .lock()
            .await
            .get(id)
            .map(|e| e.display_name.clone())
    }
}

#[async_trait]
impl HostBridge for EntityRegistry {
    async fn add(&self, entity: &Entity) {
        debug!("registering entity {}", entity.id());
        self.entities.lock().await.insert(
            entity.id().to_string(),
            RegisteredEntity {
                display_name: entity.display_name(),
                attributes: None,
            },
        );
    }

    async fn contains(&self, id: &str) -> bool {
        self.entities.lock().await.contains_key(id)
    }

    async fn update_attributes(&self, id: &str, update: AttributeUpdate) {
        let mut entities = self.entities.lock().await;
        if let Some(entity) = entities.get_mut(id) {
            entity.attributes = Some(update);
        } else {
            debug!("dropping attribute update for unknown entity {id}");
        }
    }
}
