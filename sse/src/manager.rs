use crate::connection::{ClientId, ClientRegistry, EventSender, UserId};
use crate::message::{ChangeAction, Event as WireEvent};
use events::EntityKind;
use log::*;
use serde_json::Value;
use std::sync::Arc;

/// Broadcast dispatcher over the [`ClientRegistry`].
///
/// One instance per process, created at startup and handed to the web layer
/// through application state. Tests construct their own isolated instances.
pub struct Manager {
    registry: Arc<ClientRegistry>,
}

impl Manager {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(ClientRegistry::new()),
        }
    }

    /// Register a stream's sender and return the effective client id: the
    /// sanitized client-supplied value if usable, otherwise a generated one.
    /// The `connected` handshake carrying that id is pushed into the channel
    /// immediately, before any broadcast can reach this subscriber.
    pub fn register_client(
        &self,
        user_id: UserId,
        requested_client_id: Option<&str>,
        sender: EventSender,
    ) -> ClientId {
        let client_id = requested_client_id
            .and_then(ClientId::from_client_supplied)
            .unwrap_or_else(ClientId::generate);

        // Queued before the registry insert so no concurrent broadcast can
        // precede the handshake in this subscriber's stream.
        let connected = WireEvent::Connected {
            client_id: client_id.as_str().to_owned(),
        };
        if let Some(event) = Self::serialize(&connected) {
            // A failure here means the stream died before its first write;
            // the registry self-heals on the next broadcast either way.
            let _ = sender.send(Ok(event));
        }

        self.registry
            .register(user_id.clone(), client_id.clone(), sender);
        info!(
            "Registered event stream client {client_id} for user {user_id} \
             ({} active)",
            self.registry.client_count(&user_id)
        );

        client_id
    }

    /// Remove a subscriber. Safe to call more than once per connection.
    pub fn unregister_client(&self, user_id: &str, client_id: &ClientId) {
        debug!("Unregistering event stream client {client_id} for user {user_id}");
        self.registry.unregister(user_id, client_id);
    }

    /// Deliver a change message to every subscriber of `user_id` except the
    /// originating client. Best-effort and fire-and-forget: failures are
    /// handled inside the registry and never reach the caller.
    pub fn broadcast(
        &self,
        user_id: &str,
        kind: EntityKind,
        action: ChangeAction,
        payload: Value,
        origin: Option<&ClientId>,
    ) {
        let message = WireEvent::change(kind, action, payload);

        let Some(event) = Self::serialize(&message) else {
            return;
        };

        debug!(
            "Broadcasting {} {:?} to user {user_id} (origin: {:?})",
            message.type_name(),
            action,
            origin.map(ClientId::as_str)
        );
        self.registry.send_to_user_except(user_id, origin, event);
    }

    fn serialize(message: &WireEvent) -> Option<axum::response::sse::Event> {
        match serde_json::to_string(message) {
            Ok(json) => Some(axum::response::sse::Event::default().data(json)),
            Err(e) => {
                error!("Failed to serialize SSE event: {e}");
                None
            }
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc;

    type Rx = mpsc::UnboundedReceiver<Result<axum::response::sse::Event, std::convert::Infallible>>;

    fn connect(manager: &Manager, user: &str, requested: Option<&str>) -> (ClientId, Rx) {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = manager.register_client(user.to_owned(), requested, tx);
        (id, rx)
    }

    fn recv_count(rx: &mut Rx) -> usize {
        let mut n = 0;
        while rx.try_recv().is_ok() {
            n += 1;
        }
        n
    }

    #[test]
    fn registration_replies_with_the_requested_client_id() {
        let manager = Manager::new();
        let (id, mut rx) = connect(&manager, "u1", Some("a1"));

        assert_eq!(id.as_str(), "a1");
        // The connected handshake is the first and only message so far.
        assert_eq!(recv_count(&mut rx), 1);
    }

    #[test]
    fn blank_requested_ids_fall_back_to_generated_ones() {
        let manager = Manager::new();
        let (id, _rx) = connect(&manager, "u1", Some("  "));

        assert!(!id.as_str().is_empty());
        assert_ne!(id.as_str(), "  ");
    }

    #[test]
    fn broadcast_reaches_other_tabs_but_not_the_origin() {
        let manager = Manager::new();
        let (origin_id, mut origin_rx) = connect(&manager, "u1", Some("a1"));
        let (_peer_id, mut peer_rx) = connect(&manager, "u1", Some("b1"));
        let (_other_user, mut other_rx) = connect(&manager, "u2", Some("c1"));

        // Drain the connected handshakes.
        recv_count(&mut origin_rx);
        recv_count(&mut peer_rx);
        recv_count(&mut other_rx);

        manager.broadcast(
            "u1",
            EntityKind::Task,
            ChangeAction::Reorder,
            json!([{"id": "t1", "position": 0}, {"id": "t2", "position": 1}]),
            Some(&origin_id),
        );

        assert_eq!(recv_count(&mut origin_rx), 0);
        assert_eq!(recv_count(&mut peer_rx), 1);
        assert_eq!(recv_count(&mut other_rx), 0);
    }

    #[test]
    fn broadcast_without_subscribers_does_not_error() {
        let manager = Manager::new();
        manager.broadcast(
            "nobody",
            EntityKind::Folder,
            ChangeAction::Delete,
            json!({"id": "f1"}),
            None,
        );
    }
}
