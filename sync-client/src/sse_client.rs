use anyhow::Result;
use eventsource_client::{self as es, Client};
use futures_util::stream::StreamExt;
use log::*;
use serde::Deserialize;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Mutation kind carried on every change message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Update,
    Delete,
    Reorder,
}

/// One parsed message from the event stream, mirroring the server's wire
/// format: a `connected` handshake or a per-entity change.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StreamEvent {
    #[serde(rename = "connected")]
    Connected {
        #[serde(rename = "clientId")]
        client_id: String,
    },

    #[serde(rename = "task")]
    Task { action: Action, payload: Value },

    #[serde(rename = "section")]
    Section { action: Action, payload: Value },

    #[serde(rename = "folder")]
    Folder { action: Action, payload: Value },

    #[serde(rename = "smart_folder")]
    SmartFolder { action: Action, payload: Value },
}

impl StreamEvent {
    pub fn type_name(&self) -> &'static str {
        match self {
            StreamEvent::Connected { .. } => "connected",
            StreamEvent::Task { .. } => "task",
            StreamEvent::Section { .. } => "section",
            StreamEvent::Folder { .. } => "folder",
            StreamEvent::SmartFolder { .. } => "smart_folder",
        }
    }
}

/// One open event stream. The effective client id is captured from the
/// `connected` handshake during `establish`; tag mutations with it so this
/// connection is excluded from its own echo.
pub struct Connection {
    pub user_label: String,
    client_id: String,
    event_rx: mpsc::UnboundedReceiver<StreamEvent>,
    _handle: tokio::task::JoinHandle<()>,
}

impl Connection {
    /// Opens the stream and waits for the `connected` handshake.
    ///
    /// `requested_client_id` is optional; pass the previous id on reconnect
    /// so echo suppression spans the tab's whole lifetime.
    pub async fn establish(
        base_url: &str,
        token: &str,
        requested_client_id: Option<String>,
        user_label: String,
    ) -> Result<Self> {
        // A locally generated id doubles as the request default so the tab
        // knows its identity even if the handshake message is lost.
        let requested = requested_client_id.unwrap_or_else(|| Uuid::new_v4().to_string());
        let url = format!("{}/events?token={}&clientId={}", base_url, token, requested);
        let (tx, mut rx) = mpsc::unbounded_channel();

        let client = es::ClientBuilder::for_url(&url)?.build();

        let label = user_label.clone();
        let handle = tokio::spawn(async move {
            let mut stream = client.stream();

            loop {
                match stream.next().await {
                    Some(Ok(es::SSE::Event(event))) => {
                        match serde_json::from_str::<StreamEvent>(&event.data) {
                            Ok(stream_event) => {
                                if tx.send(stream_event).is_err() {
                                    debug!("Event receiver dropped for {}", label);
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Unparseable stream message for {}: {}", label, e);
                            }
                        }
                    }
                    Some(Ok(es::SSE::Comment(_))) => {
                        // Ignore comments (heartbeats)
                    }
                    Some(Err(e)) => {
                        warn!("Event stream error for {}: {}", label, e);
                    }
                    None => {
                        debug!("Event stream ended for {}", label);
                        break;
                    }
                }
            }
        });

        // The connected handshake is the server's first data message.
        let client_id = loop {
            match tokio::time::timeout(Duration::from_secs(10), rx.recv()).await {
                Ok(Some(StreamEvent::Connected { client_id })) => break client_id,
                Ok(Some(other)) => {
                    warn!(
                        "Expected connected handshake for {}, got {}",
                        user_label,
                        other.type_name()
                    );
                }
                Ok(None) => anyhow::bail!("Stream closed before the connected handshake"),
                Err(_) => anyhow::bail!("Timed out waiting for the connected handshake"),
            }
        };

        debug!("{} connected with client id {}", user_label, client_id);

        Ok(Self {
            user_label,
            client_id,
            event_rx: rx,
            _handle: handle,
        })
    }

    /// The effective client id echoed by the server.
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Waits for the next event of the given wire type, discarding others.
    pub async fn wait_for_event(&mut self, type_name: &str, timeout: Duration) -> Result<StreamEvent> {
        let deadline = Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                anyhow::bail!("Timeout waiting for event: {}", type_name);
            }

            match tokio::time::timeout(remaining, self.event_rx.recv()).await {
                Ok(Some(event)) if event.type_name() == type_name => {
                    return Ok(event);
                }
                Ok(Some(_)) => {
                    // Wrong event type, keep waiting
                    continue;
                }
                Ok(None) => {
                    anyhow::bail!("Event stream connection closed");
                }
                Err(_) => {
                    anyhow::bail!("Timeout waiting for event: {}", type_name);
                }
            }
        }
    }

    /// Asserts that no event of the given type arrives within the window.
    /// Used to verify echo suppression from the originating tab's side.
    pub async fn expect_silence(&mut self, type_name: &str, window: Duration) -> Result<()> {
        match tokio::time::timeout(window, async {
            loop {
                match self.event_rx.recv().await {
                    Some(event) if event.type_name() == type_name => break Some(event),
                    Some(_) => continue,
                    None => break None,
                }
            }
        })
        .await
        {
            Ok(Some(event)) => {
                anyhow::bail!(
                    "Expected silence but received a {} event: {:?}",
                    type_name,
                    event
                )
            }
            // Stream closed counts as silence.
            Ok(None) => Ok(()),
            Err(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_the_connected_handshake() {
        let event: StreamEvent =
            serde_json::from_str(r#"{"type":"connected","clientId":"a1"}"#).unwrap();

        match event {
            StreamEvent::Connected { client_id } => assert_eq!(client_id, "a1"),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn parses_a_reorder_change_message() {
        let event: StreamEvent = serde_json::from_value(json!({
            "type": "task",
            "action": "reorder",
            "payload": [{"id": "6b9c2f70-9d60-4a3c-8f68-1f2f3e4a5b6c", "position": 0}],
        }))
        .unwrap();

        match event {
            StreamEvent::Task { action, payload } => {
                assert_eq!(action, Action::Reorder);
                assert!(payload.is_array());
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
