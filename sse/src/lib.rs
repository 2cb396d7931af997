//! Server-Sent Events (SSE) infrastructure for real-time task board sync.
//!
//! This crate keeps every open browser tab of a user in step with the
//! others: after a mutation persists, the change is pushed to all of the
//! user's *other* connected clients so they patch their caches without a
//! refetch.
//!
//! # Architecture
//!
//! - **Composite subscriber keys**: the registry maps
//!   `user_id -> client_id -> sender`. A client id identifies one tab; the
//!   id is echoed back on connect so the tab can tag its own mutations and
//!   be excluded from its own echo.
//! - **Last-register-wins**: re-registering a `(user, client)` pair replaces
//!   the previous sender; unregistering an absent pair is a no-op.
//! - **Best-effort, self-healing delivery**: a failed send unregisters that
//!   subscriber and the fan-out continues. Errors never propagate to the
//!   mutation that triggered the broadcast.
//! - **Ephemeral messages**: nothing is persisted or replayed. A client that
//!   was offline reconciles by refetching when it reconnects.
//!
//! # Message flow
//!
//! 1. Frontend opens `GET /events` (bearer token, optional `clientId`)
//! 2. Web layer registers the connection and the client receives
//!    `{"type":"connected","clientId":...}` as its first message
//! 3. A mutation handler persists a change and publishes a
//!    [`events::DomainEvent`] tagged with the request's origin client id
//! 4. [`SseDomainEventHandler`] converts it to a wire message and
//!    [`Manager::broadcast`] delivers it to the owner's other clients
//!
//! # Modules
//!
//! - `connection`: [`connection::ClientRegistry`] and the id/sender types
//! - `manager`: high-level registration and broadcast entry points
//! - `message`: wire-level event and action types
//! - `domain_event_handler`: bridges the event publisher to the manager

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use domain_event_handler::SseDomainEventHandler;
pub use manager::Manager;
