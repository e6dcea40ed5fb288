//! MCP tool catalogue
//!
//! Every tool maps onto exactly one engine [`Command`]; the tool name is the
//! command name with a `tenet_` prefix and the arguments are the command's
//! fields.

mod evidence;
mod reliability;
mod workflow;

use crate::error::McpError;
use crate::protocol::ToolDefinition;
use serde_json::{Map, Value};
use tenet_engine::Command;

/// Prefix shared by all tool names
pub const TOOL_PREFIX: &str = "tenet_";

/// All tool definitions, for `tools/list`
pub fn definitions() -> Vec<ToolDefinition> {
    let mut tools = workflow::definitions();
    tools.extend(evidence::definitions());
    tools.extend(reliability::definitions());
    tools
}

/// Turn a `tools/call` into a command
pub fn parse_call(name: &str, arguments: Value) -> Result<Command, McpError> {
    let command = name
        .strip_prefix(TOOL_PREFIX)
        .filter(|c| definitions().iter().any(|d| d.name == name) && !c.is_empty())
        .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;

    let mut fields = match arguments {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(McpError::InvalidRequest(format!(
                "arguments must be an object, got {}",
                other
            )))
        }
    };
    fields.insert("command".to_string(), Value::String(command.to_string()));

    serde_json::from_value(Value::Object(fields))
        .map_err(|e| McpError::InvalidRequest(format!("invalid arguments for {}: {}", name, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_every_tool_names_a_command() {
        let tools = definitions();
        assert_eq!(tools.len(), 17);

        for tool in &tools {
            assert!(tool.name.starts_with(TOOL_PREFIX));
            assert_eq!(tool.input_schema["type"], "object");
        }
    }

    #[test]
    fn test_parse_propose() {
        let cmd = parse_call(
            "tenet_propose",
            json!({"title": "Cache", "content": "Keep it hot", "kind": "system"}),
        )
        .unwrap();

        match cmd {
            Command::Propose { title, scope, .. } => {
                assert_eq!(title, "Cache");
                assert!(scope.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_unit_commands_without_arguments() {
        assert_eq!(parse_call("tenet_status", Value::Null).unwrap(), Command::Status);
        assert_eq!(parse_call("tenet_decay", json!({})).unwrap(), Command::Decay);
    }

    #[test]
    fn test_unknown_tool() {
        let err = parse_call("tenet_teleport", json!({})).unwrap_err();
        assert!(matches!(err, McpError::ToolNotFound(_)));

        let err = parse_call("status", json!({})).unwrap_err();
        assert!(matches!(err, McpError::ToolNotFound(_)));
    }

    #[test]
    fn test_bad_arguments_are_invalid_params() {
        let err = parse_call("tenet_verify", json!({"hypothesis_id": "x"})).unwrap_err();
        assert!(matches!(err, McpError::InvalidRequest(_)));
        assert_eq!(err.error_code(), -32602);
        assert!(err.to_string().contains("tenet_verify"));

        let err = parse_call("tenet_link", json!({"component_id": "a", "composite_id": "b", "congruence": "high"}))
            .unwrap_err();
        assert_eq!(err.error_code(), -32602);
    }

    #[test]
    fn test_non_object_arguments() {
        let err = parse_call("tenet_status", json!([1, 2])).unwrap_err();
        assert!(matches!(err, McpError::InvalidRequest(_)));
    }
}
