//! HTTP layer: routing, controllers, extractors and the event-stream
//! endpoint. Everything below this crate speaks domain types; everything
//! above it speaks JSON.

use axum::http::{
    header::{AUTHORIZATION, CONTENT_TYPE},
    HeaderName, HeaderValue, Method,
};
use log::*;
use tower_http::cors::CorsLayer;

pub(crate) mod controller;
pub(crate) mod error;
pub(crate) mod extractors;
pub(crate) mod params;
pub(crate) mod router;
pub(crate) mod stream;

pub use error::{Error, Result};
pub(crate) use service::AppState;

/// Request header carrying the origin client id of a mutation, used to
/// suppress the echo back to the issuing stream.
pub(crate) static X_CLIENT_ID: HeaderName = HeaderName::from_static("x-client-id");

/// Binds the listener and serves the API until the process is stopped.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let host = app_state
        .config
        .interface
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let port = app_state.config.port;
    let listen_address = format!("{host}:{port}");

    let allowed_origins: Vec<HeaderValue> = app_state
        .config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparseable CORS origin {origin:?}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            X_CLIENT_ID.clone(),
            HeaderName::from_static("x-version"),
        ])
        .allow_origin(allowed_origins);

    let router = router::define_routes(app_state).layer(cors);

    info!("Server starting... listening on {listen_address}");

    let listener = tokio::net::TcpListener::bind(&listen_address).await?;
    axum::serve(listener, router).await
}
