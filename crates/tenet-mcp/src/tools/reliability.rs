//! Reliability tools

use crate::protocol::ToolDefinition;
use serde_json::json;

pub(super) fn definitions() -> Vec<ToolDefinition> {
    let by_id = json!({
        "type": "object",
        "properties": {"artifact_id": {"type": "string"}},
        "required": ["artifact_id"]
    });

    vec![
        ToolDefinition::new(
            "tenet_calculate_reliability",
            "Compute and cache the reliability score of an artifact, with contributing factors",
            by_id.clone(),
        ),
        ToolDefinition::new(
            "tenet_audit_tree",
            "Render the reliability computation of an artifact as an indented tree",
            by_id,
        ),
        ToolDefinition::new(
            "tenet_decay",
            "Recompute the reliability of every artifact, accounting for expired evidence",
            json!({"type": "object", "properties": {}}),
        ),
    ]
}
