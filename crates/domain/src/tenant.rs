//! Per-tenant intake policy and the field requirement resolver.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lead::Lead;

/// Case-type key used when a lead has no case type yet, and the fallback
/// entry consulted when a case type has no requirement list of its own.
pub const DEFAULT_CASE_KEY: &str = "default";

/// Static per-tenant policy. Read-only at runtime; supplied by the gateway
/// configuration with a baked-in demo tenant as fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub allowed_case_types: Vec<String>,
    /// Case-type key (or `"default"`) → ordered required field names.
    #[serde(default)]
    pub required_fields_by_case: HashMap<String, Vec<String>>,
}

impl TenantConfig {
    /// The built-in demo tenant, used whenever a tenant id is unknown.
    pub fn demo() -> Self {
        Self {
            id: "dev".into(),
            name: "Demo Firm".into(),
            languages: vec!["en".into()],
            allowed_case_types: vec![
                "personal_injury".into(),
                "family".into(),
                "criminal".into(),
                "immigration".into(),
                "bankruptcy".into(),
                "real_estate".into(),
                "wills_trusts".into(),
            ],
            required_fields_by_case: HashMap::from([
                (
                    DEFAULT_CASE_KEY.into(),
                    vec!["first_name".into(), "phone".into(), "case_type".into()],
                ),
                (
                    "personal_injury".into(),
                    vec!["first_name".into(), "phone".into(), "incident_date".into()],
                ),
            ]),
        }
    }
}

/// Compute which required fields are still unset for `lead` under `tenant`'s
/// policy, in the tenant's declared order.
///
/// `incident_date` is not tracked on the lead and is always reported
/// missing — a deliberate placeholder until intake captures dates.
/// Required field names this core does not recognize are logged and
/// skipped rather than reported forever unfillable.
pub fn missing_fields(tenant: &TenantConfig, lead: &Lead) -> Vec<String> {
    let case_key = lead
        .case_type
        .as_deref()
        .filter(|c| !c.is_empty())
        .unwrap_or(DEFAULT_CASE_KEY);

    let required = tenant
        .required_fields_by_case
        .get(case_key)
        .or_else(|| tenant.required_fields_by_case.get(DEFAULT_CASE_KEY));

    let Some(required) = required else {
        return Vec::new();
    };

    let mut missing = Vec::new();
    for field in required {
        let absent = match field.as_str() {
            "first_name" => is_unset(&lead.first_name),
            "phone" => is_unset(&lead.phone),
            "case_type" => is_unset(&lead.case_type),
            "incident_date" => true,
            other => {
                tracing::warn!(tenant = %tenant.id, field = %other, "unrecognized required field, skipping");
                continue;
            }
        };
        if absent {
            missing.push(field.clone());
        }
    }
    missing
}

/// Missing iff never captured or captured as the empty string (leads seeded
/// over HTTP can carry empty strings).
fn is_unset(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}
