//! Reasoning-cycle tools: setup, hypotheses and decisions

use crate::protocol::ToolDefinition;
use serde_json::json;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "tenet_init",
            "Create the .tenet project layout and open the first reasoning cycle",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDefinition::new(
            "tenet_status",
            "Report the current phase, active role, threshold, last reconciled commit and tier counts",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDefinition::new(
            "tenet_record_context",
            "Record the bounded context (vocabulary and invariants) for this project",
            json!({
                "type": "object",
                "properties": {
                    "vocabulary": {"type": "string", "description": "Domain terms and their meaning"},
                    "invariants": {"type": "string", "description": "Constraints that must always hold"}
                },
                "required": ["vocabulary", "invariants"]
            }),
        ),
        ToolDefinition::new(
            "tenet_actualize",
            "Reconcile with git: record HEAD and report files changed since the last reconciliation",
            json!({"type": "object", "properties": {}}),
        ),
        ToolDefinition::new(
            "tenet_propose",
            "Propose a new hypothesis at L0",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string", "description": "Short title; the identifier is derived from it"},
                    "content": {"type": "string", "description": "The hypothesis itself"},
                    "scope": {"type": "string", "description": "Where the hypothesis claims to hold"},
                    "kind": {"type": "string", "enum": ["system", "episteme"]},
                    "rationale": {"type": "string", "description": "Why it is worth considering"}
                },
                "required": ["title", "content", "kind"]
            }),
        ),
        ToolDefinition::new(
            "tenet_loopback",
            "Invalidate a hypothesis and propose its refined replacement at L0",
            json!({
                "type": "object",
                "properties": {
                    "parent_id": {"type": "string", "description": "Hypothesis being invalidated"},
                    "insight": {"type": "string", "description": "What was learned"},
                    "new_title": {"type": "string"},
                    "new_content": {"type": "string"},
                    "scope": {"type": "string"}
                },
                "required": ["parent_id", "insight", "new_title", "new_content"]
            }),
        ),
        ToolDefinition::new(
            "tenet_decide",
            "Write a decision record for a winning hypothesis and close the cycle",
            json!({
                "type": "object",
                "properties": {
                    "title": {"type": "string"},
                    "winner_id": {"type": "string", "description": "Winning hypothesis"},
                    "context": {"type": "string", "description": "Problem context"},
                    "decision": {"type": "string"},
                    "rationale": {"type": "string"},
                    "consequences": {"type": "string"},
                    "characteristics": {"type": "string", "description": "Characteristic space of the compared options"}
                },
                "required": ["title", "winner_id", "context", "decision", "rationale", "consequences"]
            }),
        ),
        ToolDefinition::new(
            "tenet_link",
            "Declare one artifact a component of another, with a congruence level",
            json!({
                "type": "object",
                "properties": {
                    "component_id": {"type": "string"},
                    "composite_id": {"type": "string"},
                    "congruence": {"type": "integer", "minimum": 0, "maximum": 3, "default": 3}
                },
                "required": ["component_id", "composite_id"]
            }),
        ),
    ]
}
