use events::EntityKind;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Mutation kind carried on every change message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeAction {
    Create,
    Update,
    Delete,
    Reorder,
}

/// Wire-level SSE message. Serialized as the `data:` JSON of one message;
/// the `type` tag is the entity kind (or `connected` for the handshake), so
/// clients route on `{"type": ..., "action": ..., "payload": ...}`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// First message on every stream. Echoes the effective client id so the
    /// client can tag its own subsequent mutations with it.
    #[serde(rename = "connected")]
    Connected {
        #[serde(rename = "clientId")]
        client_id: String,
    },

    #[serde(rename = "task")]
    Task { action: ChangeAction, payload: Value },

    #[serde(rename = "section")]
    Section { action: ChangeAction, payload: Value },

    #[serde(rename = "folder")]
    Folder { action: ChangeAction, payload: Value },

    #[serde(rename = "smart_folder")]
    SmartFolder { action: ChangeAction, payload: Value },
}

impl Event {
    /// Builds the change message for an entity kind + action pair.
    pub fn change(kind: EntityKind, action: ChangeAction, payload: Value) -> Self {
        match kind {
            EntityKind::Task => Event::Task { action, payload },
            EntityKind::Section => Event::Section { action, payload },
            EntityKind::Folder => Event::Folder { action, payload },
            EntityKind::SmartFolder => Event::SmartFolder { action, payload },
        }
    }

    /// Routing tag as it appears on the wire. Used for logging and by the
    /// test client when matching received messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Connected { .. } => "connected",
            Event::Task { .. } => "task",
            Event::Section { .. } => "section",
            Event::Folder { .. } => "folder",
            Event::SmartFolder { .. } => "smart_folder",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn connected_message_matches_the_wire_contract() {
        let event = Event::Connected {
            client_id: "a1".into(),
        };

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "connected", "clientId": "a1"})
        );
    }

    #[test]
    fn change_messages_tag_entity_and_action() {
        let event = Event::change(
            EntityKind::Task,
            ChangeAction::Reorder,
            json!([{"id": "t1", "position": 0}]),
        );

        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({
                "type": "task",
                "action": "reorder",
                "payload": [{"id": "t1", "position": 0}],
            })
        );
        assert_eq!(event.type_name(), "task");
    }
}
