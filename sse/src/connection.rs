use axum::response::sse::Event;
use dashmap::DashMap;
use log::*;
use std::collections::HashMap;
use std::convert::Infallible;
use tokio::sync::mpsc::UnboundedSender;

// Type alias for user IDs (web layer converts domain::Id to String)
pub type UserId = String;

/// Delivery capability for one open stream: events pushed into this channel
/// are written to the subscriber's SSE response by the stream handler.
pub type EventSender = UnboundedSender<Result<Event, Infallible>>;

/// Identifier of one subscriber tab/session. Clients may supply their own id
/// when opening a stream; otherwise the server generates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Server-generated id for streams that did not supply one.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Wraps a client-supplied id. Returns `None` for empty/whitespace
    /// values so malformed keys never reach the registry.
    pub fn from_client_supplied(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Registry of live subscribers, keyed `user_id -> client_id -> sender`.
///
/// Invariants:
/// - at most one live sender per `(user_id, client_id)` pair; a later
///   registration for the same key silently replaces the former
/// - unregistering an absent key is a no-op, so a connection may be cleaned
///   up twice (stream drop guard plus a failed-send sweep) without harm
pub struct ClientRegistry {
    clients: DashMap<UserId, HashMap<ClientId, EventSender>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }

    /// Register a sender under the composite key, replacing any existing
    /// sender for that exact key (last-register-wins).
    pub fn register(&self, user_id: UserId, client_id: ClientId, sender: EventSender) {
        self.clients
            .entry(user_id)
            .or_default()
            .insert(client_id, sender);
    }

    /// Remove the entry if present. Idempotent; empty per-user maps are
    /// dropped so dead user keys do not accumulate over the process lifetime.
    pub fn unregister(&self, user_id: &str, client_id: &ClientId) {
        if let Some(mut entry) = self.clients.get_mut(user_id) {
            entry.remove(client_id);

            if entry.is_empty() {
                drop(entry); // Release lock before removal
                self.clients.remove(user_id);
            }
        }
    }

    /// Snapshot of the `(client_id, sender)` pairs registered for a user.
    /// Cloned under the shard lock, so concurrent register/unregister calls
    /// never leave the caller holding a stale pointer.
    pub fn senders_for(&self, user_id: &str) -> Vec<(ClientId, EventSender)> {
        self.clients
            .get(user_id)
            .map(|entry| {
                entry
                    .iter()
                    .map(|(client_id, sender)| (client_id.clone(), sender.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of live subscribers for a user. Mostly useful for logging and
    /// tests.
    pub fn client_count(&self, user_id: &str) -> usize {
        self.clients
            .get(user_id)
            .map(|entry| entry.len())
            .unwrap_or(0)
    }

    /// Deliver `event` to every subscriber of `user_id` except `origin`.
    ///
    /// Delivery is best-effort: a failed send means the receiving half is
    /// gone, so the subscriber is unregistered (self-heal) and the fan-out
    /// continues with the remaining subscribers. Never returns an error to
    /// the caller.
    pub fn send_to_user_except(&self, user_id: &str, origin: Option<&ClientId>, event: Event) {
        let mut dead: Vec<ClientId> = Vec::new();

        for (client_id, sender) in self.senders_for(user_id) {
            if Some(&client_id) == origin {
                continue;
            }

            if sender.send(Ok(event.clone())).is_err() {
                warn!(
                    "Dropping dead subscriber {client_id} for user {user_id} after failed send"
                );
                dead.push(client_id);
            }
        }

        for client_id in &dead {
            self.unregister(user_id, client_id);
        }
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn channel() -> (EventSender, mpsc::UnboundedReceiver<Result<Event, Infallible>>) {
        mpsc::unbounded_channel()
    }

    fn cid(s: &str) -> ClientId {
        ClientId::from_client_supplied(s).unwrap()
    }

    #[test]
    fn register_then_list_returns_registered_clients() {
        let registry = ClientRegistry::new();
        let (tx_a, _rx_a) = channel();
        let (tx_b, _rx_b) = channel();

        registry.register("u1".into(), cid("a1"), tx_a);
        registry.register("u1".into(), cid("b1"), tx_b);

        let mut ids: Vec<String> = registry
            .senders_for("u1")
            .into_iter()
            .map(|(id, _)| id.as_str().to_owned())
            .collect();
        ids.sort();

        assert_eq!(ids, vec!["a1", "b1"]);
        assert!(registry.senders_for("u2").is_empty());
    }

    #[test]
    fn re_registering_the_same_key_replaces_the_sender() {
        let registry = ClientRegistry::new();
        let (tx_old, mut rx_old) = channel();
        let (tx_new, mut rx_new) = channel();

        registry.register("u1".into(), cid("a1"), tx_old);
        registry.register("u1".into(), cid("a1"), tx_new);

        assert_eq!(registry.client_count("u1"), 1);

        registry.send_to_user_except("u1", None, Event::default().data("x"));

        assert!(rx_new.try_recv().is_ok());
        // The replaced sender's channel is closed from the registry's side
        // and must not have received the event.
        assert!(rx_old.try_recv().is_err());
    }

    #[test]
    fn unregister_is_idempotent_and_scoped_to_the_key() {
        let registry = ClientRegistry::new();
        let (tx_a, _rx_a) = channel();
        let (tx_b, _rx_b) = channel();

        registry.register("u1".into(), cid("a1"), tx_a);
        registry.register("u1".into(), cid("b1"), tx_b);

        registry.unregister("u1", &cid("a1"));
        registry.unregister("u1", &cid("a1"));
        registry.unregister("u1", &cid("missing"));
        registry.unregister("nobody", &cid("a1"));

        assert_eq!(registry.client_count("u1"), 1);
    }

    #[test]
    fn fan_out_skips_the_origin_client() {
        let registry = ClientRegistry::new();
        let (tx_a, mut rx_a) = channel();
        let (tx_b, mut rx_b) = channel();

        registry.register("u1".into(), cid("a1"), tx_a);
        registry.register("u1".into(), cid("b1"), tx_b);

        registry.send_to_user_except("u1", Some(&cid("a1")), Event::default().data("reorder"));

        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn fan_out_with_no_subscribers_is_a_no_op() {
        let registry = ClientRegistry::new();
        registry.send_to_user_except("u1", None, Event::default().data("x"));
    }

    #[test]
    fn failed_send_unregisters_only_the_dead_subscriber() {
        let registry = ClientRegistry::new();
        let (tx_dead, rx_dead) = channel();
        let (tx_live, mut rx_live) = channel();

        registry.register("u1".into(), cid("dead"), tx_dead);
        registry.register("u1".into(), cid("live"), tx_live);

        // Simulate an aborted connection: the receiving half is gone.
        drop(rx_dead);

        registry.send_to_user_except("u1", None, Event::default().data("x"));

        // The live subscriber still received the event, the dead one was
        // swept out of the registry.
        assert!(rx_live.try_recv().is_ok());
        assert_eq!(registry.client_count("u1"), 1);
        assert_eq!(
            registry.senders_for("u1")[0].0.as_str(),
            "live"
        );
    }

    #[test]
    fn client_supplied_ids_are_sanitized() {
        assert!(ClientId::from_client_supplied("").is_none());
        assert!(ClientId::from_client_supplied("   ").is_none());
        assert_eq!(
            ClientId::from_client_supplied(" tab-7 ").unwrap().as_str(),
            "tab-7"
        );
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(ClientId::generate(), ClientId::generate());
    }
}
