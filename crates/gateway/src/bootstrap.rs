//! AppState construction and background tasks.

use std::sync::Arc;

use ig_domain::config::Config;
use ig_domain::error::Result;
use ig_providers::OpenAiBackend;
use ig_sessions::SessionStore;
use ig_tools::{StubCrmExporter, StubScheduler};

use crate::state::AppState;
use crate::tenants::TenantDirectory;

/// Build the shared application state from a loaded configuration.
pub fn build_app_state(config: Arc<Config>) -> Result<AppState> {
    let backend = Arc::new(OpenAiBackend::from_config(&config.llm)?);
    let sessions = Arc::new(SessionStore::new(config.sessions.default_language.clone()));
    let tenants = Arc::new(TenantDirectory::new(&config.tenants));

    tracing::info!(
        tenants = tenants.len(),
        model = %config.llm.model,
        "application state built"
    );

    Ok(AppState {
        config,
        sessions,
        tenants,
        backend,
        crm: Arc::new(StubCrmExporter),
        scheduler: Arc::new(StubScheduler::default()),
    })
}

/// Spawn the idle-session sweep loop.
pub fn spawn_background_tasks(state: &AppState) {
    let sessions = Arc::clone(&state.sessions);
    let max_idle = chrono::Duration::seconds(state.config.sessions.max_idle_secs as i64);
    let interval = std::time::Duration::from_secs(state.config.sessions.sweep_interval_secs);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so startup stays quiet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let evicted = sessions.prune_idle(max_idle);
            tracing::debug!(evicted, live = sessions.len(), "session sweep complete");
        }
    });
}
