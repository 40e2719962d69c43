// src/completion/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// --- Chat payloads ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Body of `POST <endpoint>`.
#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub top_p: f32,
    /// NIM routing hint for the USD model family.
    pub expert_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub message: ChoiceMessage,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice, or `None` when the API returned no choices.
    /// A choice with `null` content yields an empty string.
    pub fn first_content(&self) -> Option<String> {
        self.choices
            .first()
            .map(|choice| choice.message.content.clone().unwrap_or_default())
    }
}

// --- Validation report ---

/// Review verdict produced by `validate_usd_code`.
///
/// Keys the model adds beyond the five known ones are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    #[serde(default)]
    pub valid: bool,
    #[serde(default, deserialize_with = "string_list")]
    pub errors: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub warnings: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub suggestions: Vec<String>,
    #[serde(default, deserialize_with = "text")]
    pub assessment: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ValidationReport {
    /// Interprets completion text. Anything that is not a JSON object becomes
    /// a passing report whose assessment is the raw text.
    pub fn from_completion(text: &str) -> Self {
        match serde_json::from_str::<Value>(text) {
            Ok(object @ Value::Object(_)) => {
                serde_json::from_value(object).unwrap_or_else(|_| Self::permissive(text))
            }
            _ => Self::permissive(text),
        }
    }

    pub fn permissive(assessment: impl Into<String>) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
            assessment: assessment.into(),
            extra: Map::new(),
        }
    }

    /// Report used when the API answered without any choices.
    pub fn unavailable() -> Self {
        Self {
            valid: false,
            errors: vec!["Failed to get validation response".to_string()],
            warnings: Vec::new(),
            suggestions: Vec::new(),
            assessment: "Unable to validate code".to_string(),
            extra: Map::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.valid && self.errors.is_empty()
    }
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => items.into_iter().map(value_text).collect(),
        other => vec![value_text(other)],
    })
}

fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => String::new(),
        other => value_text(other),
    })
}

fn value_text(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn plain_text_falls_back_to_permissive_report() {
        let report = ValidationReport::from_completion("looks fine");
        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "valid": true,
                "errors": [],
                "warnings": [],
                "suggestions": [],
                "assessment": "looks fine"
            })
        );
    }

    #[test]
    fn json_arrays_and_scalars_are_not_reports() {
        assert_eq!(ValidationReport::from_completion("[1, 2]").assessment, "[1, 2]");
        assert_eq!(ValidationReport::from_completion("42").assessment, "42");
    }

    #[test]
    fn model_json_is_parsed_leniently() {
        let text = r#"{
            "valid": false,
            "errors": ["Missing Save()", {"line": 3, "msg": "bad prim path"}],
            "warnings": "prefer UsdGeom.Xform",
            "suggestions": null,
            "assessment": "Needs work",
            "score": 4
        }"#;
        let report = ValidationReport::from_completion(text);
        assert!(!report.valid);
        assert_eq!(report.errors[0], "Missing Save()");
        assert!(report.errors[1].contains("bad prim path"));
        assert_eq!(report.warnings, vec!["prefer UsdGeom.Xform".to_string()]);
        assert!(report.suggestions.is_empty());
        assert_eq!(report.assessment, "Needs work");
        assert_eq!(report.extra.get("score"), Some(&json!(4)));
        assert!(!report.passed());
    }

    #[test]
    fn missing_keys_default() {
        let report = ValidationReport::from_completion(r#"{"valid": true}"#);
        assert!(report.passed());
        assert_eq!(report.assessment, "");
    }

    #[test]
    fn first_content_distinguishes_no_choices_from_null_content() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.first_content(), None);

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert_eq!(null.first_content(), Some(String::new()));

        let missing: ChatCompletionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(missing.first_content(), None);
    }

    #[test]
    fn request_omits_unset_max_tokens() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hi")];
        let body = ChatCompletionRequest {
            model: "m",
            messages: &messages,
            temperature: 0.5,
            top_p: 1.0,
            expert_type: "auto",
            max_tokens: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0], json!({"role": "system", "content": "sys"}));
        assert_eq!(value["expert_type"], "auto");
        assert!(value.get("max_tokens").is_none());
    }
}
