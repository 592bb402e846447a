//! Tool-side effects for the intake gateway.
//!
//! - `normalize`: best-effort contact-field cleanup applied during capture
//! - `effector`: the CRM export / scheduling seams, with deterministic
//!   stubs standing in for real third-party integrations

pub mod effector;
pub mod normalize;

pub use effector::{BookingSlot, CrmExporter, ExportReceipt, Scheduler, StubCrmExporter, StubScheduler};
pub use normalize::{normalize_email, normalize_phone};
