use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::prompts::{
    DEFAULT_CLARIFYING_EXAMPLES, DEFAULT_CLARIFYING_QUESTION, GENERIC_CLARIFYING_QUESTION,
};

/// Prompts with fewer non-whitespace characters than this are never sent.
pub const MIN_PROMPT_CHARS: usize = 5;

static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("code fence regex is valid")
});

/// Whether a prompt is specific enough to style from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptValidation {
    Valid,
    /// `question` is never empty.
    NeedsClarification {
        question: String,
        examples: Vec<String>,
    },
}

impl PromptValidation {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, PromptValidation::Valid)
    }

    pub(crate) fn default_clarification() -> Self {
        PromptValidation::NeedsClarification {
            question: DEFAULT_CLARIFYING_QUESTION.to_string(),
            examples: DEFAULT_CLARIFYING_EXAMPLES
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

#[must_use]
pub fn is_too_short(prompt: &str) -> bool {
    prompt.chars().filter(|c| !c.is_whitespace()).count() < MIN_PROMPT_CHARS
}

#[derive(Deserialize)]
struct ClarificationReply {
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    examples: Option<Vec<String>>,
}

/// Interprets the model's validation reply.
///
/// `YES` (any case) means valid. Otherwise the reply is read as JSON, with or
/// without a code fence. JSON missing its fields gives a generic question;
/// a reply that is not JSON at all becomes the question itself.
#[must_use]
pub fn parse_validation_reply(reply: &str) -> PromptValidation {
    let reply = reply.trim();
    if reply.eq_ignore_ascii_case("YES") {
        return PromptValidation::Valid;
    }

    let json = CODE_FENCE
        .captures(reply)
        .and_then(|c| c.get(1))
        .map_or(reply, |m| m.as_str());

    let question = match serde_json::from_str::<ClarificationReply>(json) {
        Ok(ClarificationReply {
            question: Some(question),
            examples: Some(examples),
        }) if !question.trim().is_empty() => {
            return PromptValidation::NeedsClarification { question, examples };
        }
        Ok(_) => GENERIC_CLARIFYING_QUESTION.to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "validation reply is not JSON, using it as the question");
            if reply.is_empty() {
                GENERIC_CLARIFYING_QUESTION.to_string()
            } else {
                reply.to_string()
            }
        }
    };
    PromptValidation::NeedsClarification {
        question,
        examples: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_prompts_count_non_whitespace_only() {
        assert!(is_too_short(""));
        assert!(is_too_short("  a b c d  "));
        assert!(is_too_short("옷"));
        assert!(!is_too_short("dress"));
        assert!(!is_too_short("a b c d e"));
    }

    #[test]
    fn yes_is_valid_in_any_case() {
        assert_eq!(parse_validation_reply("YES"), PromptValidation::Valid);
        assert_eq!(parse_validation_reply("  yes\n"), PromptValidation::Valid);
    }

    #[test]
    fn fenced_json_is_parsed() {
        let reply = "```json\n{\"question\": \"What is the occasion?\", \"examples\": [\"Date\", \"Wedding\", \"Home\"]}\n```";
        assert_eq!(
            parse_validation_reply(reply),
            PromptValidation::NeedsClarification {
                question: "What is the occasion?".to_string(),
                examples: vec!["Date".to_string(), "Wedding".to_string(), "Home".to_string()],
            }
        );
    }

    #[test]
    fn bare_json_is_parsed() {
        let reply = r#"{"question": "Which season?", "examples": ["Summer"]}"#;
        let PromptValidation::NeedsClarification { question, examples } =
            parse_validation_reply(reply)
        else {
            panic!("expected clarification");
        };
        assert_eq!(question, "Which season?");
        assert_eq!(examples, vec!["Summer".to_string()]);
    }

    #[test]
    fn json_without_fields_gets_generic_question() {
        assert_eq!(
            parse_validation_reply(r#"{"answer": "no"}"#),
            PromptValidation::NeedsClarification {
                question: GENERIC_CLARIFYING_QUESTION.to_string(),
                examples: Vec::new(),
            }
        );
    }

    #[test]
    fn plain_text_becomes_the_question() {
        assert_eq!(
            parse_validation_reply("What kind of event is it for?"),
            PromptValidation::NeedsClarification {
                question: "What kind of event is it for?".to_string(),
                examples: Vec::new(),
            }
        );
    }

    #[test]
    fn default_clarification_has_three_examples() {
        let PromptValidation::NeedsClarification { question, examples } =
            PromptValidation::default_clarification()
        else {
            panic!("expected clarification");
        };
        assert!(!question.is_empty());
        assert_eq!(examples.len(), 3);
    }
}
