use crate::extractors::authenticated_user::AuthenticatedUser;
use crate::AppState;
use async_stream::stream;
use axum::extract::{Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use log::*;
use serde::Deserialize;
use sse::connection::ClientId;
use sse::Manager;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Deserialize)]
pub(crate) struct StreamParams {
    /// Client-chosen id for this tab. Reusing an id across reconnects keeps
    /// echo suppression working over the tab's whole lifetime; omitted ids
    /// get a generated one, echoed back in the `connected` message.
    #[serde(rename = "clientId", alias = "client_id")]
    pub(crate) client_id: Option<String>,
}

/// Unregisters the subscriber when the response stream is dropped, which is
/// how axum surfaces both client aborts and failed writes. Unregistration is
/// idempotent, so overlapping cleanup with the registry's failed-send sweep
/// is safe.
struct StreamGuard {
    manager: Arc<Manager>,
    user_id: String,
    client_id: ClientId,
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        debug!(
            "Event stream closed for user {}, cleaning up client {}",
            self.user_id, self.client_id
        );
        self.manager
            .unregister_client(&self.user_id, &self.client_id);
    }
}

/// Establishes the long-lived event stream for one tab of an authenticated
/// user. The first data message is the `connected` handshake carrying the
/// effective client id; afterwards the stream forwards whatever the
/// broadcast dispatcher routes to this subscriber, with heartbeat comments
/// keeping intermediaries from timing the connection out.
pub(crate) async fn event_stream(
    AuthenticatedUser(user_id): AuthenticatedUser,
    Query(params): Query<StreamParams>,
    State(app_state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    debug!("Establishing event stream for user {user_id}");

    let (tx, mut rx) = mpsc::unbounded_channel();

    // Registration also queues the `connected` handshake into tx.
    let client_id =
        app_state
            .sse_manager
            .register_client(user_id.to_string(), params.client_id.as_deref(), tx);

    let guard = StreamGuard {
        manager: app_state.sse_manager.clone(),
        user_id: user_id.to_string(),
        client_id,
    };

    let stream = stream! {
        // Owned by the generator: dropped (and thus unregistered) exactly
        // when axum drops the response body.
        let _guard = guard;

        while let Some(event) = rx.recv().await {
            yield event;
        }
    };

    let heartbeat = Duration::from_secs(app_state.config.sse_heartbeat_interval_seconds);

    Sse::new(stream).keep_alive(KeepAlive::new().interval(heartbeat).text("heartbeat"))
}
