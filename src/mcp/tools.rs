// src/mcp/tools.rs

use lazy_static::lazy_static;
use serde::Serialize;
use serde_json::{json, Value};

pub const VALIDATE_USD_CODE: &str = "validate_usd_code";
pub const GENERATE_USD_CODE: &str = "generate_usd_code";

/// A tool as advertised through `tools/list`.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

lazy_static! {
    /// Built on first use and never modified afterwards.
    pub static ref TOOL_DESCRIPTORS: Vec<ToolDescriptor> = vec![
        ToolDescriptor {
            name: VALIDATE_USD_CODE,
            description: "Validate USD Python code using NVIDIA NIM",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "code": {
                        "type": "string",
                        "description": "USD Python code to validate"
                    },
                    "context": {
                        "type": "string",
                        "description": "Optional context about what the code does"
                    }
                },
                "required": ["code"]
            }),
        },
        ToolDescriptor {
            name: GENERATE_USD_CODE,
            description: "Generate USD Python code using NVIDIA NIM",
            input_schema: json!({
                "type": "object",
                "properties": {
                    "prompt": {
                        "type": "string",
                        "description": "Description of code to generate"
                    },
                    "context": {
                        "type": "string",
                        "description": "Optional context about the project or requirements"
                    }
                },
                "required": ["prompt"]
            }),
        },
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_tools_are_advertised_with_required_keys() {
        let [validate, generate] = TOOL_DESCRIPTORS.as_slice() else {
            panic!("expected exactly two tools");
        };
        assert_eq!(validate.name, VALIDATE_USD_CODE);
        assert_eq!(validate.input_schema["required"], json!(["code"]));

        assert_eq!(generate.name, GENERATE_USD_CODE);
        assert_eq!(generate.input_schema["required"], json!(["prompt"]));
    }

    #[test]
    fn descriptors_serialize_with_camel_case_schema_key() {
        let value = serde_json::to_value(&*TOOL_DESCRIPTORS).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert!(value[0].get("inputSchema").is_some());
        assert!(value[0].get("input_schema").is_none());
    }
}
