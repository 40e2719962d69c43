// src/completion/prompts.rs

use crate::completion::models::ChatMessage;

pub const VALIDATION_SYSTEM_PROMPT: &str =
    "You are a USD code validation expert. Always respond with valid JSON.";

pub const GENERATION_SYSTEM_PROMPT: &str =
    "You are a USD (Universal Scene Description) code generation expert.
Generate clean, well-commented USD Python code following best practices:
- Use proper pxr imports
- Include error handling
- Add helpful comments for USD concepts
- Follow PEP 8 style guidelines
- Use pathlib for file operations
";

/// Messages for a review of `code`, asking for a JSON verdict.
pub fn validation_messages(code: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let context_line = context
        .map(|c| format!("Context: {}", c))
        .unwrap_or_default();

    let prompt = format!(
        "You are a USD (Universal Scene Description) code expert.
Review the following USD code and provide validation feedback.

Code to validate:
```python
{code}
```

{context_line}

Please provide:
1. Syntax errors (if any)
2. USD API usage issues
3. Best practice violations
4. Suggestions for improvement
5. Overall assessment (valid/invalid with explanation)

Format your response as JSON with keys: valid, errors, warnings, suggestions, assessment.
"
    );

    vec![
        ChatMessage::system(VALIDATION_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ]
}

/// Messages asking for new code; context, when given, leads the user turn.
pub fn generation_messages(prompt: &str, context: Option<&str>) -> Vec<ChatMessage> {
    let user_prompt = match context {
        Some(context) => format!("Context: {}\n\n{}", context, prompt),
        None => prompt.to_string(),
    };

    vec![
        ChatMessage::system(GENERATION_SYSTEM_PROMPT),
        ChatMessage::user(user_prompt),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::models::Role;

    #[test]
    fn validation_prompt_embeds_code_and_context() {
        let messages =
            validation_messages("stage = Usd.Stage.CreateNew('a.usd')", Some("makes a stage"));
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[0].content, VALIDATION_SYSTEM_PROMPT);
        assert_eq!(messages[1].role, Role::User);
        assert!(messages[1]
            .content
            .contains("```python\nstage = Usd.Stage.CreateNew('a.usd')\n```"));
        assert!(messages[1].content.contains("\nContext: makes a stage\n"));
        assert!(messages[1]
            .content
            .contains("keys: valid, errors, warnings, suggestions, assessment"));
    }

    #[test]
    fn validation_prompt_without_context_has_no_context_line() {
        let messages = validation_messages("x = 1", None);
        assert!(!messages[1].content.contains("Context:"));
    }

    #[test]
    fn generation_prompt_prefixes_context() {
        let messages = generation_messages("Make a cube", Some("robot cell"));
        assert_eq!(messages[0].content, GENERATION_SYSTEM_PROMPT);
        assert_eq!(messages[1].content, "Context: robot cell\n\nMake a cube");

        let bare = generation_messages("Make a cube", None);
        assert_eq!(bare[1].content, "Make a cube");
    }
}
