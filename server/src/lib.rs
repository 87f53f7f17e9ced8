//! Listkeeper Server - Todo API and live-update hub.
//!
//! This crate provides the server component of Listkeeper, responsible for:
//! - Exposing the todo collection over an HTTP API
//! - Broadcasting every mutation to connected WebSocket subscribers
//! - Serving the browser client's static assets
//!
//! # Architecture
//!
//! Route handlers translate requests into [`listkeeper_store::TodoStore`]
//! operations and publish the resulting change through the
//! [`broadcast::ChangeBroadcaster`]. Subscribers receive every event
//! verbatim; there is no per-subscriber filtering and no replay of missed
//! events, so a late joiner starts from a fresh `GET /todos`.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod routes;
