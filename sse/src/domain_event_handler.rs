use crate::connection::ClientId;
use crate::message::ChangeAction;
use crate::Manager;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;
use serde_json::json;
use std::sync::Arc;

/// Handles domain events by converting them to SSE messages and broadcasting
/// them to the owning user's other connected clients.
///
/// The domain layer decides what changed and who owns it; this handler only
/// routes. The originating client is excluded from delivery — it already has
/// the authoritative state from its own mutation response.
pub struct SseDomainEventHandler {
    manager: Arc<Manager>,
}

impl SseDomainEventHandler {
    pub fn new(manager: Arc<Manager>) -> Self {
        Self { manager }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        let user_id = event.owner_id().to_string();
        let origin = event
            .origin_client_id()
            .and_then(ClientId::from_client_supplied);

        match event {
            DomainEvent::Created { kind, entity, .. } => {
                debug!("Routing {kind:?} create to user {user_id}");
                self.manager.broadcast(
                    &user_id,
                    *kind,
                    ChangeAction::Create,
                    entity.clone(),
                    origin.as_ref(),
                );
            }
            DomainEvent::Updated { kind, entity, .. } => {
                debug!("Routing {kind:?} update to user {user_id}");
                self.manager.broadcast(
                    &user_id,
                    *kind,
                    ChangeAction::Update,
                    entity.clone(),
                    origin.as_ref(),
                );
            }
            DomainEvent::Deleted {
                kind, entity_id, ..
            } => {
                debug!("Routing {kind:?} delete to user {user_id}");
                self.manager.broadcast(
                    &user_id,
                    *kind,
                    ChangeAction::Delete,
                    json!({ "id": entity_id }),
                    origin.as_ref(),
                );
            }
            DomainEvent::Reordered { kind, ranks, .. } => {
                debug!("Routing {kind:?} reorder to user {user_id}");
                self.manager.broadcast(
                    &user_id,
                    *kind,
                    ChangeAction::Reorder,
                    ranks.clone(),
                    origin.as_ref(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use events::{EntityKind, EventPublisher, Id};
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn published_events_reach_the_owners_other_clients_only() {
        let manager = Arc::new(Manager::new());
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(SseDomainEventHandler::new(manager.clone())));

        let owner = Id::new_v4();
        let (origin_tx, mut origin_rx) = mpsc::unbounded_channel();
        let (peer_tx, mut peer_rx) = mpsc::unbounded_channel();
        let origin_id =
            manager.register_client(owner.to_string(), Some("a1"), origin_tx);
        manager.register_client(owner.to_string(), Some("b1"), peer_tx);

        // Drain connected handshakes.
        let _ = origin_rx.try_recv();
        let _ = peer_rx.try_recv();

        publisher
            .publish(DomainEvent::Deleted {
                kind: EntityKind::Task,
                owner_id: owner,
                entity_id: Id::new_v4(),
                origin_client_id: Some(origin_id.as_str().to_owned()),
            })
            .await;

        assert!(origin_rx.try_recv().is_err());
        assert!(peer_rx.try_recv().is_ok());
    }
}
