use std::sync::Arc;

use ig_domain::config::Config;
use ig_providers::CompletionBackend;
use ig_sessions::SessionStore;
use ig_tools::{CrmExporter, Scheduler};

use crate::tenants::TenantDirectory;

/// Shared application state passed to all API handlers.
///
/// The session store is the only mutable shared resource; everything else
/// is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: Arc<SessionStore>,
    pub tenants: Arc<TenantDirectory>,
    pub backend: Arc<dyn CompletionBackend>,
    pub crm: Arc<dyn CrmExporter>,
    pub scheduler: Arc<dyn Scheduler>,
}
