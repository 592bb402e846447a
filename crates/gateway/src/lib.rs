//! Intake gateway server crate.
//!
//! Wires the session store, tenant directory, completion backend, and
//! effectors into an axum application exposing the chat HTTP endpoint and
//! the streaming WebSocket endpoint.

pub mod api;
pub mod bootstrap;
pub mod runtime;
pub mod state;
pub mod tenants;
