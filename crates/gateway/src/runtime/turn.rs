//! Completion orchestrator — the model ↔ tool round-trip loop for one turn.
//!
//! Each round submits the full transcript plus the tool catalog. A response
//! with no tool calls ends the turn with the model's text; otherwise the
//! requested tools run in issued order, their results are appended to the
//! transcript, and the loop resubmits. The first decode or dispatch failure
//! aborts the turn with no partial recovery.
//!
//! Two hard limits guard against a misbehaving model: a round ceiling and a
//! wall-clock deadline for the whole turn.

use std::time::Duration;

use ig_domain::error::{Error, Result};
use ig_domain::tool::Message;
use ig_providers::ChatRequest;

use crate::state::AppState;

use super::tools;

/// Run the orchestrator for one seeded transcript, returning the final
/// assistant text.
pub async fn run_turn(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
    transcript: Vec<Message>,
) -> Result<String> {
    let deadline_secs = state.config.orchestrator.turn_timeout_secs;
    let loop_fut = drive_tool_loop(state, tenant_id, session_id, transcript);

    match tokio::time::timeout(Duration::from_secs(deadline_secs), loop_fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(session_id, deadline_secs, "turn deadline exceeded");
            Err(Error::TurnDeadlineExceeded { secs: deadline_secs })
        }
    }
}

async fn drive_tool_loop(
    state: &AppState,
    tenant_id: &str,
    session_id: &str,
    mut messages: Vec<Message>,
) -> Result<String> {
    let tool_defs = tools::tool_definitions();
    let max_rounds = state.config.orchestrator.max_tool_rounds;

    for round in 0..max_rounds {
        let req = ChatRequest {
            messages: messages.clone(),
            tools: tool_defs.clone(),
            temperature: Some(state.config.llm.temperature),
        };

        let resp = state.backend.complete(&req).await?;

        if resp.tool_calls.is_empty() {
            tracing::debug!(session_id, round, "turn complete");
            return Ok(resp.content);
        }

        tracing::debug!(
            session_id,
            round,
            tool_calls = resp.tool_calls.len(),
            "executing requested tools"
        );

        messages.push(Message::assistant_with_tools(
            resp.content.clone(),
            resp.tool_calls.clone(),
        ));

        // Issued order matters: a capture preceding a requirements query in
        // the same batch must be visible to that query.
        for tc in &resp.tool_calls {
            let result =
                tools::dispatch_tool(state, tenant_id, session_id, &tc.tool_name, &tc.arguments)
                    .await?;
            messages.push(Message::tool_result(
                &tc.call_id,
                &tc.tool_name,
                result.to_string(),
            ));
        }
    }

    tracing::warn!(session_id, max_rounds, "tool round ceiling reached");
    Err(Error::RoundLimitExceeded { rounds: max_rounds })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ig_domain::error::Error;
    use ig_domain::tool::ToolCall;

    use crate::runtime::test_support::{
        scripted_state, state_with_backend, text_response, tool_call_response, ScriptedBackend,
    };
    use crate::runtime::{handle_turn, TurnOutcome};

    fn capture_call(args: serde_json::Value) -> ToolCall {
        ToolCall {
            call_id: "call_1".into(),
            tool_name: "capture_contact_info".into(),
            arguments: args,
        }
    }

    #[tokio::test]
    async fn plain_answer_needs_one_round() {
        let state = scripted_state(vec![text_response("How can I help?")]);
        let TurnOutcome { reply, lead } = handle_turn(&state, "dev", "s1", "hello")
            .await
            .unwrap();
        assert_eq!(reply, "How can I help?");
        assert_eq!(lead.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn one_capture_round_trip_returns_post_capture_lead() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            tool_call_response(vec![capture_call(
                serde_json::json!({ "first_name": "Jane" }),
            )]),
            text_response("Got it, Jane."),
        ]));
        let state = state_with_backend(Arc::clone(&backend));

        let outcome = handle_turn(&state, "dev", "s1", "I'm Jane").await.unwrap();
        assert_eq!(outcome.reply, "Got it, Jane.");
        assert_eq!(outcome.lead.first_name.as_deref(), Some("Jane"));

        // First request: system + developer + user. Second adds the
        // assistant tool-call message and one tool result.
        assert_eq!(*backend.seen_transcript_lens.lock(), vec![3, 5]);
    }

    #[tokio::test]
    async fn end_to_end_intake_scenario() {
        let state = scripted_state(vec![
            tool_call_response(vec![capture_call(serde_json::json!({
                "first_name": "Jane",
                "phone": "555-1234",
                "case_type": "personal_injury",
            }))]),
            text_response("Thanks Jane"),
        ]);

        let outcome = handle_turn(
            &state,
            "dev",
            "s1",
            "My name is Jane, phone 555-1234, this is a personal injury case",
        )
        .await
        .unwrap();

        assert_eq!(outcome.reply, "Thanks Jane");
        assert_eq!(outcome.lead.first_name.as_deref(), Some("Jane"));
        assert_eq!(outcome.lead.phone.as_deref(), Some("555-1234"));
        assert_eq!(outcome.lead.case_type.as_deref(), Some("personal_injury"));
        assert_eq!(outcome.lead.language.as_deref(), Some("en"));
    }

    #[tokio::test]
    async fn unknown_tool_fails_turn_and_leaves_lead_untouched() {
        let state = scripted_state(vec![tool_call_response(vec![ToolCall {
            call_id: "call_1".into(),
            tool_name: "summon_partner".into(),
            arguments: serde_json::json!({}),
        }])]);

        let before = state.sessions.snapshot("s1").lead;
        let err = handle_turn(&state, "dev", "s1", "hello").await.unwrap_err();
        assert!(matches!(err, Error::UnknownTool(name) if name == "summon_partner"));
        assert_eq!(state.sessions.snapshot("s1").lead, before);
    }

    #[tokio::test]
    async fn decode_failure_aborts_without_partial_recovery() {
        // Two calls in one batch: the first has bad arguments, so the
        // second must never run.
        let state = scripted_state(vec![tool_call_response(vec![
            capture_call(serde_json::json!({ "first_name": 7 })),
            ToolCall {
                call_id: "call_2".into(),
                tool_name: "export_to_crm".into(),
                arguments: serde_json::json!({}),
            },
        ])]);

        let err = handle_turn(&state, "dev", "s1", "hello").await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
        assert!(state.sessions.snapshot("s1").export_id.is_none());
    }

    #[tokio::test]
    async fn round_ceiling_fails_with_limit_error() {
        // A backend that requests tools forever.
        let rounds = ig_domain::config::Config::default()
            .orchestrator
            .max_tool_rounds;
        let script = (0..rounds + 1)
            .map(|_| tool_call_response(vec![capture_call(serde_json::json!({}))]))
            .collect();
        let state = scripted_state(script);

        let err = handle_turn(&state, "dev", "s1", "hello").await.unwrap_err();
        assert!(matches!(err, Error::RoundLimitExceeded { .. }));
    }

    #[tokio::test]
    async fn transcript_is_fresh_each_turn_but_lead_persists() {
        let backend = Arc::new(ScriptedBackend::new(vec![
            tool_call_response(vec![capture_call(
                serde_json::json!({ "first_name": "Jane" }),
            )]),
            text_response("Hi Jane."),
            text_response("Welcome back."),
        ]));
        let state = state_with_backend(Arc::clone(&backend));

        handle_turn(&state, "dev", "s1", "I'm Jane").await.unwrap();
        let second = handle_turn(&state, "dev", "s1", "Still there?")
            .await
            .unwrap();

        // Second turn re-seeds from scratch: 3 messages again, no replay.
        assert_eq!(*backend.seen_transcript_lens.lock(), vec![3, 5, 3]);
        // But the lead carried over.
        assert_eq!(second.lead.first_name.as_deref(), Some("Jane"));
        // And history recorded both turns.
        assert_eq!(state.sessions.snapshot("s1").history.len(), 4);
    }
}
