//! External-effect seams for the tool dispatcher.
//!
//! `export_to_crm` and `calendly` are contract-only boundaries in this
//! core: the traits define what a production CRM/scheduling client must
//! provide, and the stub implementations synthesize deterministic results
//! without talking to anything.

use ig_domain::error::Result;
use ig_domain::lead::Lead;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CRM export
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub export_id: String,
}

/// Exports a captured lead to a tenant's CRM.
///
/// Re-invocation against a real CRM would re-export; callers are
/// responsible for not invoking it redundantly within a turn.
#[async_trait::async_trait]
pub trait CrmExporter: Send + Sync {
    async fn export_lead(
        &self,
        provider: &str,
        session_id: &str,
        lead: &Lead,
    ) -> Result<ExportReceipt>;
}

/// Stub exporter: synthesizes the export id as a pure function of provider
/// and session, so repeated calls yield the same receipt.
pub struct StubCrmExporter;

#[async_trait::async_trait]
impl CrmExporter for StubCrmExporter {
    async fn export_lead(
        &self,
        provider: &str,
        session_id: &str,
        _lead: &Lead,
    ) -> Result<ExportReceipt> {
        let export_id = format!("{provider}_{session_id}_001");
        tracing::debug!(provider, session_id, export_id = %export_id, "stub CRM export");
        Ok(ExportReceipt { export_id })
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scheduling
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Clone)]
pub struct BookingSlot {
    pub booking_url: String,
    pub status: String,
}

/// Books (or links to) a consultation slot.
#[async_trait::async_trait]
pub trait Scheduler: Send + Sync {
    async fn booking_link(
        &self,
        session_id: &str,
        desired_date: Option<&str>,
        desired_time: Option<&str>,
    ) -> Result<BookingSlot>;
}

/// Stub scheduler: returns a fixed booking URL with a placeholder status.
pub struct StubScheduler {
    booking_url: String,
}

impl Default for StubScheduler {
    fn default() -> Self {
        Self {
            booking_url: "https://calendly.com/firm/consult".into(),
        }
    }
}

#[async_trait::async_trait]
impl Scheduler for StubScheduler {
    async fn booking_link(
        &self,
        session_id: &str,
        desired_date: Option<&str>,
        desired_time: Option<&str>,
    ) -> Result<BookingSlot> {
        tracing::debug!(session_id, ?desired_date, ?desired_time, "stub scheduling request");
        Ok(BookingSlot {
            booking_url: self.booking_url.clone(),
            status: "placeholder".into(),
        })
    }
}
