//! The `extract_task_details` function schema and its argument shape.

use serde::Deserialize;
use serde_json::{Value, json};

pub const EXTRACT_TASK_FUNCTION: &str = "extract_task_details";

/// Tool definition for the structured extraction call. The strict schema
/// forbids additional properties so the arguments either parse into
/// [`ExtractTaskArgs`] or the response is rejected.
pub fn extract_task_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": EXTRACT_TASK_FUNCTION,
            "description": "Extracts a task and UTC datetime from natural language prompts.",
            "strict": true,
            "parameters": {
                "type": "object",
                "properties": {
                    "title": {
                        "type": ["string", "null"],
                        "description": "The main task (no \"remind me\" or \"set an alarm\" etc)."
                    },
                    "dateTime": {
                        "type": ["string", "null"],
                        "description": "Datetime in ISO 8601 UTC format. Based on user timezone."
                    },
                    "error": {
                        "type": ["string", "null"],
                        "description": "A brief error message when the input is vague, incomplete, or unprocessable."
                    }
                },
                "required": ["title", "dateTime", "error"],
                "additionalProperties": false
            }
        }
    })
}

/// Forced tool choice — the model must invoke the extraction function.
pub fn extract_task_tool_choice() -> Value {
    json!({
        "type": "function",
        "function": { "name": EXTRACT_TASK_FUNCTION }
    })
}

/// Parsed arguments of the structured call. Exactly one of
/// {title+dateTime, error} is expected to be populated.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractTaskArgs {
    pub title: Option<String>,
    #[serde(rename = "dateTime")]
    pub date_time: Option<String>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_schema_is_strict() {
        let tool = extract_task_tool();
        assert_eq!(tool["function"]["name"], EXTRACT_TASK_FUNCTION);
        assert_eq!(
            tool["function"]["parameters"]["additionalProperties"],
            Value::Bool(false)
        );
    }

    #[test]
    fn args_parse_with_nulls() {
        let args: ExtractTaskArgs =
            serde_json::from_str(r#"{"title":null,"dateTime":null,"error":"too vague"}"#).unwrap();
        assert!(args.title.is_none());
        assert!(args.date_time.is_none());
        assert_eq!(args.error.as_deref(), Some("too vague"));
    }
}
