//! Event system infrastructure for Daylist.
//!
//! This crate provides the event plumbing that decouples domain mutations
//! from infrastructure side effects (SSE fan-out today, possibly an external
//! bus later).
//!
//! # Architecture
//!
//! - **DomainEvent**: one variant per mutation kind (create, update, delete,
//!   reorder), tagged with the [`EntityKind`] that changed
//! - **EventHandler**: trait implemented by infrastructure handlers
//! - **EventPublisher**: publishes events to registered handlers in order
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON
//! values.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = Uuid;

/// Which domain entity a change event refers to. Used purely as a routing
/// tag on events; independent of the database schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Task,
    Section,
    Folder,
    SmartFolder,
}

/// Domain events that represent business-level changes in the system,
/// emitted after a mutation has been persisted successfully.
///
/// `owner_id` identifies the user whose connected clients should be
/// notified. `origin_client_id` identifies the stream that issued the
/// mutation; the fan-out layer suppresses the echo back to it, since the
/// originator already holds the authoritative state from its own mutation
/// response.
///
/// Entity data is carried as `serde_json::Value` to avoid dependencies on
/// the entity crate.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// A new entity was inserted. `entity` is the complete serialized row.
    Created {
        kind: EntityKind,
        owner_id: Id,
        entity: Value,
        origin_client_id: Option<String>,
    },
    /// An existing entity was modified. `entity` carries all current field
    /// values so receivers can replace their cached copy wholesale.
    Updated {
        kind: EntityKind,
        owner_id: Id,
        entity: Value,
        origin_client_id: Option<String>,
    },
    /// An entity was removed. Only the id is carried since the row no
    /// longer exists.
    Deleted {
        kind: EntityKind,
        owner_id: Id,
        entity_id: Id,
        origin_client_id: Option<String>,
    },
    /// A batch of entities was re-ranked atomically. `ranks` is the full
    /// `[{id, position}]` list so receivers overwrite their local ordering
    /// rather than apply a delta.
    Reordered {
        kind: EntityKind,
        owner_id: Id,
        ranks: Value,
        origin_client_id: Option<String>,
    },
}

impl DomainEvent {
    /// The user whose connected clients this event targets.
    pub fn owner_id(&self) -> Id {
        match self {
            DomainEvent::Created { owner_id, .. }
            | DomainEvent::Updated { owner_id, .. }
            | DomainEvent::Deleted { owner_id, .. }
            | DomainEvent::Reordered { owner_id, .. } => *owner_id,
        }
    }

    /// The client id of the stream that originated the mutation, if the
    /// request carried one.
    pub fn origin_client_id(&self) -> Option<&str> {
        match self {
            DomainEvent::Created {
                origin_client_id, ..
            }
            | DomainEvent::Updated {
                origin_client_id, ..
            }
            | DomainEvent::Deleted {
                origin_client_id, ..
            }
            | DomainEvent::Reordered {
                origin_client_id, ..
            } => origin_client_id.as_deref(),
        }
    }
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional
    /// handler. Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers. Handlers run
    /// sequentially; a misbehaving handler never surfaces an error to the
    /// publishing mutation.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventHandler for CountingHandler {
        async fn handle(&self, _event: &DomainEvent) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn task_created(origin: Option<&str>) -> DomainEvent {
        DomainEvent::Created {
            kind: EntityKind::Task,
            owner_id: Id::new_v4(),
            entity: json!({"title": "water the plants"}),
            origin_client_id: origin.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn publish_invokes_every_registered_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(CountingHandler {
                calls: calls.clone(),
            }))
            .with_handler(Arc::new(CountingHandler {
                calls: calls.clone(),
            }));

        publisher.publish(task_created(Some("tab-1"))).await;

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn publish_with_no_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();
        publisher.publish(task_created(None)).await;
    }

    #[test]
    fn origin_client_id_is_exposed_for_every_variant() {
        let owner_id = Id::new_v4();
        let events = vec![
            task_created(Some("a1")),
            DomainEvent::Deleted {
                kind: EntityKind::Folder,
                owner_id,
                entity_id: Id::new_v4(),
                origin_client_id: Some("a1".to_owned()),
            },
            DomainEvent::Reordered {
                kind: EntityKind::Section,
                owner_id,
                ranks: json!([{"id": "s1", "position": 0}]),
                origin_client_id: Some("a1".to_owned()),
            },
        ];

        for event in events {
            assert_eq!(event.origin_client_id(), Some("a1"));
        }
    }

    #[test]
    fn entity_kind_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&EntityKind::SmartFolder).unwrap(),
            "\"smart_folder\""
        );
    }
}
