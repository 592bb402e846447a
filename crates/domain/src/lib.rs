//! Shared domain types for the intake gateway.
//!
//! Everything that crosses a crate boundary lives here: the [`lead::Lead`]
//! record built up during a conversation, per-tenant intake policy
//! ([`tenant::TenantConfig`]), the provider-agnostic chat message and tool
//! types, the shared error enum, and the TOML configuration tree.

pub mod config;
pub mod error;
pub mod lead;
pub mod tenant;
pub mod tool;
