//! Per-session conversation and lead state for the intake gateway.
//!
//! The [`SessionStore`] is the exclusive owner of all live
//! [`SessionState`] instances. Sessions are created lazily, live in memory
//! for the process lifetime, and are evicted only by the idle sweep.

pub mod store;

pub use store::{SessionState, SessionStore, TranscriptLine};
