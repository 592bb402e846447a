//! Tool catalog and dispatch.
//!
//! Builds the tool definitions exposed to the completion backend and maps
//! each requested tool call to its effect on session state. Argument
//! payloads are validated against per-tool serde structs at the dispatch
//! boundary; a payload that does not match the declared schema fails the
//! turn with a decode error.

use serde::Deserialize;
use serde_json::Value;

use ig_domain::error::{Error, Result};
use ig_domain::lead::Lead;
use ig_domain::tenant::missing_fields;
use ig_domain::tool::ToolDefinition;
use ig_tools::{normalize_email, normalize_phone};

use crate::state::AppState;

/// CRM provider used when the model does not name one.
const DEFAULT_CRM_PROVIDER: &str = "lawmatics";

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Tool definitions
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// The static tool-schema catalog sent with every model call.
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "capture_contact_info".into(),
            description: "Persist structured fields gathered from the caller.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "first_name": { "type": "string" },
                    "last_name":  { "type": "string" },
                    "email":      { "type": "string" },
                    "phone":      { "type": "string" },
                    "language":   { "type": "string" },
                    "case_type":  { "type": "string" },
                    "notes":      { "type": "string" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "get_missing_fields".into(),
            description: "Return which fields are still required for this tenant/case.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "case_type": { "type": "string" }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "export_to_crm".into(),
            description: "Export the current lead to the tenant CRM and return an export id.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "provider": { "type": "string", "default": DEFAULT_CRM_PROVIDER }
                },
                "additionalProperties": false
            }),
        },
        ToolDefinition {
            name: "calendly".into(),
            description: "Offer a consultation booking link for the caller.".into(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "desired_date": { "type": "string" },
                    "desired_time": { "type": "string" }
                },
                "additionalProperties": false
            }),
        },
    ]
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Dispatch
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Execute one tool call against session state and return its JSON result.
///
/// Every dispatch stamps the session's tenant id, so a session is always
/// attributed to the tenant it last spoke through.
pub async fn dispatch_tool(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
    tool_name: &str,
    arguments: &Value,
) -> Result<Value> {
    state
        .sessions
        .update(session_id, |s| s.tenant_id = tenant_id.to_owned());

    tracing::debug!(tool = tool_name, session_id, tenant_id, "dispatching tool");

    match tool_name {
        "capture_contact_info" => dispatch_capture(state, session_id, arguments),
        "get_missing_fields" => dispatch_missing_fields(state, tenant_id, session_id, arguments),
        "export_to_crm" => dispatch_export(state, session_id, arguments).await,
        "calendly" => dispatch_calendly(state, session_id, arguments).await,
        other => Err(Error::UnknownTool(other.to_owned())),
    }
}

fn decode_args<'de, T: Deserialize<'de>>(tool: &str, arguments: &'de Value) -> Result<T> {
    T::deserialize(arguments).map_err(|e| Error::Decode(format!("{tool}: {e}")))
}

// ── capture_contact_info ───────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CaptureArgs {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    language: Option<String>,
    case_type: Option<String>,
    notes: Option<String>,
}

fn dispatch_capture(state: &AppState, session_id: &str, arguments: &Value) -> Result<Value> {
    let args: CaptureArgs = decode_args("capture_contact_info", arguments)?;

    let lead = state.sessions.update(session_id, |s| {
        let lead = &mut s.lead;
        Lead::assign(&mut lead.first_name, args.first_name);
        Lead::assign(&mut lead.last_name, args.last_name);
        Lead::assign(&mut lead.email, args.email.map(|e| normalize_email(&e)));
        Lead::assign(&mut lead.phone, args.phone.map(|p| normalize_phone(&p)));
        Lead::assign(&mut lead.language, args.language);
        Lead::assign(&mut lead.case_type, args.case_type);
        Lead::assign(&mut lead.notes, args.notes);
        lead.clone()
    });

    Ok(serde_json::json!({ "ok": true, "lead": lead }))
}

// ── get_missing_fields ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MissingFieldsArgs {
    case_type: Option<String>,
}

fn dispatch_missing_fields(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
    arguments: &Value,
) -> Result<Value> {
    let args: MissingFieldsArgs = decode_args("get_missing_fields", arguments)?;

    // A case type offered with the query is adopted when the lead has none
    // yet — a deliberate convenience so the model need not issue a separate
    // capture call first.
    let lead = state.sessions.update(session_id, |s| {
        if let Some(case_type) = args.case_type.filter(|c| !c.is_empty()) {
            if s.lead.case_type.as_deref().map_or(true, str::is_empty) {
                s.lead.case_type = Some(case_type);
            }
        }
        s.lead.clone()
    });

    let tenant = state.tenants.resolve(tenant_id);
    let missing = missing_fields(&tenant, &lead);

    Ok(serde_json::json!({ "missing": missing }))
}

// ── export_to_crm ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExportArgs {
    provider: Option<String>,
}

async fn dispatch_export(state: &AppState, session_id: &str, arguments: &Value) -> Result<Value> {
    let args: ExportArgs = decode_args("export_to_crm", arguments)?;
    let provider = args
        .provider
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| DEFAULT_CRM_PROVIDER.to_owned());

    let lead = state.sessions.snapshot(session_id).lead;
    let receipt = state.crm.export_lead(&provider, session_id, &lead).await?;

    state.sessions.update(session_id, |s| {
        s.export_id = Some(receipt.export_id.clone());
    });

    Ok(serde_json::json!({ "export_id": receipt.export_id }))
}

// ── calendly ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CalendlyArgs {
    desired_date: Option<String>,
    desired_time: Option<String>,
}

async fn dispatch_calendly(state: &AppState, session_id: &str, arguments: &Value) -> Result<Value> {
    let args: CalendlyArgs = decode_args("calendly", arguments)?;

    let slot = state
        .scheduler
        .booking_link(
            session_id,
            args.desired_date.as_deref(),
            args.desired_time.as_deref(),
        )
        .await?;

    Ok(serde_json::json!({
        "booking_url": slot.booking_url,
        "status": slot.status,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::test_support::scripted_state;

    #[tokio::test]
    async fn capture_is_idempotent_and_normalizes() {
        let state = scripted_state(vec![]);
        let args = serde_json::json!({
            "first_name": "Jane",
            "email": "Jane Doe AT example DOT com",
            "phone": "(555) 123 4567",
        });

        let first = dispatch_tool(&state, "dev", "s1", "capture_contact_info", &args)
            .await
            .unwrap();
        let second = dispatch_tool(&state, "dev", "s1", "capture_contact_info", &args)
            .await
            .unwrap();
        assert_eq!(first, second);

        let lead = state.sessions.snapshot("s1").lead;
        assert_eq!(lead.first_name.as_deref(), Some("Jane"));
        assert_eq!(lead.email.as_deref(), Some("janedoe@example.com"));
        assert_eq!(lead.phone.as_deref(), Some("5551234567"));
    }

    #[tokio::test]
    async fn capture_ignores_empty_strings() {
        let state = scripted_state(vec![]);
        let seed = serde_json::json!({ "first_name": "Jane" });
        dispatch_tool(&state, "dev", "s1", "capture_contact_info", &seed)
            .await
            .unwrap();

        let blank = serde_json::json!({ "first_name": "", "notes": "" });
        dispatch_tool(&state, "dev", "s1", "capture_contact_info", &blank)
            .await
            .unwrap();

        let lead = state.sessions.snapshot("s1").lead;
        assert_eq!(lead.first_name.as_deref(), Some("Jane"));
        assert!(lead.notes.is_none());
    }

    #[tokio::test]
    async fn capture_rejects_schema_violations() {
        let state = scripted_state(vec![]);
        let wrong_type = serde_json::json!({ "first_name": 42 });
        let err = dispatch_tool(&state, "dev", "s1", "capture_contact_info", &wrong_type)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));

        let extra_field = serde_json::json!({ "first_name": "Jane", "ssn": "000-00-0000" });
        let err = dispatch_tool(&state, "dev", "s1", "capture_contact_info", &extra_field)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[tokio::test]
    async fn missing_fields_adopts_offered_case_type_once() {
        let state = scripted_state(vec![]);
        let result = dispatch_tool(
            &state,
            "dev",
            "s1",
            "get_missing_fields",
            &serde_json::json!({ "case_type": "personal_injury" }),
        )
        .await
        .unwrap();
        assert_eq!(
            result["missing"],
            serde_json::json!(["first_name", "phone", "incident_date"])
        );
        assert_eq!(
            state.sessions.snapshot("s1").lead.case_type.as_deref(),
            Some("personal_injury")
        );

        // A different case type offered later does not overwrite.
        dispatch_tool(
            &state,
            "dev",
            "s1",
            "get_missing_fields",
            &serde_json::json!({ "case_type": "family" }),
        )
        .await
        .unwrap();
        assert_eq!(
            state.sessions.snapshot("s1").lead.case_type.as_deref(),
            Some("personal_injury")
        );
    }

    #[tokio::test]
    async fn export_is_deterministic_and_stored() {
        let state = scripted_state(vec![]);
        let args = serde_json::json!({ "provider": "lawmatics" });

        let first = dispatch_tool(&state, "dev", "s1", "export_to_crm", &args)
            .await
            .unwrap();
        let second = dispatch_tool(&state, "dev", "s1", "export_to_crm", &args)
            .await
            .unwrap();

        assert_eq!(first["export_id"], "lawmatics_s1_001");
        assert_eq!(first, second);
        assert_eq!(
            state.sessions.snapshot("s1").export_id.as_deref(),
            Some("lawmatics_s1_001")
        );
    }

    #[tokio::test]
    async fn export_defaults_provider() {
        let state = scripted_state(vec![]);
        let result = dispatch_tool(&state, "dev", "s1", "export_to_crm", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(result["export_id"], "lawmatics_s1_001");
    }

    #[tokio::test]
    async fn unknown_tool_is_an_error() {
        let state = scripted_state(vec![]);
        let err = dispatch_tool(&state, "dev", "s1", "warp_drive", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnknownTool(name) if name == "warp_drive"));
    }

    #[tokio::test]
    async fn dispatch_stamps_tenant_id() {
        let state = scripted_state(vec![]);
        dispatch_tool(&state, "acme", "s1", "calendly", &serde_json::json!({}))
            .await
            .unwrap();
        assert_eq!(state.sessions.snapshot("s1").tenant_id, "acme");
    }
}
