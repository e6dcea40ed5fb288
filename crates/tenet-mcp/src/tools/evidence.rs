//! Evidence tools

use crate::protocol::ToolDefinition;
use serde_json::json;

const VERDICT: &[&str] = &["PASS", "FAIL", "REFINE"];

pub(super) fn definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition::new(
            "tenet_verify",
            "Record logical verification of an L0 hypothesis; PASS promotes it to L1",
            json!({
                "type": "object",
                "properties": {
                    "hypothesis_id": {"type": "string"},
                    "checks": {"type": "string", "description": "Checks performed"},
                    "verdict": {"type": "string", "enum": VERDICT}
                },
                "required": ["hypothesis_id", "checks", "verdict"]
            }),
        ),
        ToolDefinition::new(
            "tenet_test",
            "Record empirical validation of a verified hypothesis; PASS promotes it to L2",
            json!({
                "type": "object",
                "properties": {
                    "hypothesis_id": {"type": "string"},
                    "test_type": {"type": "string", "description": "Kind of test (defaults to test_result)"},
                    "result": {"type": "string", "description": "Observed result"},
                    "verdict": {"type": "string", "enum": VERDICT}
                },
                "required": ["hypothesis_id", "test_type", "result", "verdict"]
            }),
        ),
        ToolDefinition::new(
            "tenet_audit",
            "Record the risks identified for a validated (L2) hypothesis",
            json!({
                "type": "object",
                "properties": {
                    "hypothesis_id": {"type": "string"},
                    "risks": {"type": "string"}
                },
                "required": ["hypothesis_id", "risks"]
            }),
        ),
        ToolDefinition::new(
            "tenet_add_evidence",
            "Attach evidence to an artifact in the current phase",
            json!({
                "type": "object",
                "properties": {
                    "target_id": {"type": "string"},
                    "evidence_type": {"type": "string"},
                    "content": {"type": "string"},
                    "verdict": {"type": "string", "enum": VERDICT},
                    "assurance_level": {"type": "string", "enum": ["L0", "L1", "L2"]},
                    "carrier_ref": {"type": "string", "description": "Where the evidence lives (file, URL, CI run)"},
                    "valid_until": {"type": "string", "description": "RFC3339 or YYYY-MM-DD"}
                },
                "required": ["target_id", "evidence_type", "content", "verdict", "assurance_level"]
            }),
        ),
        ToolDefinition::new(
            "tenet_check_evidence",
            "List the evidence recorded against an artifact",
            json!({
                "type": "object",
                "properties": {"target_id": {"type": "string"}},
                "required": ["target_id"]
            }),
        ),
        ToolDefinition::new(
            "tenet_waive",
            "Treat one evidence record as passing until a deadline",
            json!({
                "type": "object",
                "properties": {
                    "evidence_id": {"type": "string"},
                    "waived_by": {"type": "string"},
                    "until": {"type": "string", "description": "RFC3339 or YYYY-MM-DD, in the future"},
                    "rationale": {"type": "string"}
                },
                "required": ["evidence_id", "waived_by", "until", "rationale"]
            }),
        ),
    ]
}
