//! Ask-user-question tool — suspend the loop until the host collects
//! answers from the user.

use anvil_core::error::ToolError;
use anvil_core::hooks::{Question, QuestionHost, QuestionOption};
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::sync::Arc;

const MAX_QUESTIONS: usize = 4;
const MAX_HEADER_CHARS: usize = 12;

pub struct AskUserQuestionTool {
    host: Option<Arc<dyn QuestionHost>>,
}

impl AskUserQuestionTool {
    pub fn new(host: Option<Arc<dyn QuestionHost>>) -> Self {
        Self { host }
    }

    /// Validate and convert the raw question array.
    fn parse_questions(raw: &[serde_json::Value]) -> Result<Vec<Question>, String> {
        let mut questions = Vec::with_capacity(raw.len());

        for (i, q) in raw.iter().enumerate() {
            let question_text = q["question"].as_str().unwrap_or_default();
            let header = q["header"].as_str().unwrap_or_default();
            if question_text.is_empty() || header.is_empty() {
                return Err(format!(
                    "Error: Question {} missing 'question' or 'header' field",
                    i + 1
                ));
            }

            if header.chars().count() > MAX_HEADER_CHARS {
                return Err(format!(
                    "Error: Question {} header '{}' exceeds {} characters",
                    i + 1,
                    header,
                    MAX_HEADER_CHARS
                ));
            }

            let options = q["options"].as_array().cloned().unwrap_or_default();
            if options.len() < 2 || options.len() > 4 {
                return Err(format!(
                    "Error: Question {} must have 2-4 options, got {}",
                    i + 1,
                    options.len()
                ));
            }

            let mut parsed_options = Vec::with_capacity(options.len());
            for (j, opt) in options.iter().enumerate() {
                let (Some(label), Some(description)) =
                    (opt["label"].as_str(), opt["description"].as_str())
                else {
                    return Err(format!(
                        "Error: Question {}, option {} missing 'label' or 'description'",
                        i + 1,
                        j + 1
                    ));
                };
                parsed_options.push(QuestionOption {
                    label: label.to_string(),
                    description: description.to_string(),
                });
            }

            questions.push(Question {
                question: question_text.to_string(),
                header: header.to_string(),
                options: parsed_options,
                multi_select: q["multiSelect"].as_bool().unwrap_or(false),
            });
        }

        Ok(questions)
    }
}

#[async_trait]
impl Tool for AskUserQuestionTool {
    fn name(&self) -> &str {
        "ask_user_question"
    }

    fn description(&self) -> &str {
        "Use this tool when you need to ask the user questions during execution. This allows you to:\n\
         1. Gather user preferences or requirements\n\
         2. Clarify ambiguous instructions\n\
         3. Get decisions on implementation choices as you work\n\
         4. Offer choices to the user about what direction to take.\n\n\
         Usage notes:\n\
         - Users will always be able to select \"Other\" to provide custom text input\n\
         - Use multiSelect: true to allow multiple answers to be selected for a question\n\
         - Each question should have 2-4 options\n\
         - Ask 1-4 questions at a time\n\
         - Keep question text clear and specific"
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "description": "Questions to ask the user (1-4 questions)",
                    "minItems": 1,
                    "maxItems": 4,
                    "items": {
                        "type": "object",
                        "properties": {
                            "question": {
                                "type": "string",
                                "description": "The complete question to ask the user. Should be clear, specific, and end with a question mark."
                            },
                            "header": {
                                "type": "string",
                                "description": "Very short label displayed as a chip/tag (max 12 chars). Examples: 'Auth method', 'Library', 'Approach'."
                            },
                            "options": {
                                "type": "array",
                                "description": "The available choices for this question. Must have 2-4 options. There should be no 'Other' option, that will be provided automatically.",
                                "minItems": 2,
                                "maxItems": 4,
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "label": {
                                            "type": "string",
                                            "description": "The display text for this option that the user will see and select. Should be concise (1-5 words)."
                                        },
                                        "description": {
                                            "type": "string",
                                            "description": "Explanation of what this option means or what will happen if chosen."
                                        }
                                    },
                                    "required": ["label", "description"]
                                }
                            },
                            "multiSelect": {
                                "type": "boolean",
                                "description": "Set to true to allow the user to select multiple options instead of just one."
                            }
                        },
                        "required": ["question", "header", "options", "multiSelect"]
                    }
                }
            },
            "required": ["questions"]
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        None
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let raw = arguments["questions"].as_array().cloned().unwrap_or_default();
        if raw.is_empty() || raw.len() > MAX_QUESTIONS {
            return Ok("Error: Must provide 1-4 questions".into());
        }

        let questions = match Self::parse_questions(&raw) {
            Ok(questions) => questions,
            Err(message) => return Ok(message),
        };

        let Some(host) = &self.host else {
            return Ok("Error: Question tool not properly initialized (no callback provided)".into());
        };

        match host.ask(&questions).await {
            Ok(answers) if answers.is_empty() => Ok("Error: No answers received from user".into()),
            Ok(answers) => {
                let mut response = String::from("User's answers:");
                for (i, question) in questions.iter().enumerate() {
                    let answer = answers
                        .get(&format!("question_{i}"))
                        .map(String::as_str)
                        .unwrap_or("No answer provided");
                    response.push_str(&format!("\n{}: {}", question.header, answer));
                }
                Ok(response)
            }
            Err(e) => Ok(format!("Error asking questions: {e}")),
        }
    }
}
