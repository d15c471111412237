//! Host hook interfaces.
//!
//! The agent loop and the interactive tools never talk to a terminal or
//! a store directly — they notify the host through these traits. Every
//! hook is optional: components hold `Option<Arc<dyn …>>` and skip the
//! notification when nothing is wired.
//!
//! One trait per concern, one method per event, so argument shapes are
//! enforced at compile time rather than by convention.

use crate::message::{Message, ToolCallRequest};
use crate::subagent::SubagentKind;
use crate::tool::ToolResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// A host callback failed or was never wired.
///
/// Interactive tools convert this into in-band error text; it never
/// escapes a tool boundary.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HookError(pub String);

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Receives the full history snapshot after every completed turn.
///
/// This is the sole persistence hook — the agent itself stores nothing.
pub trait ConversationListener: Send + Sync {
    fn on_update(&self, history: &[Message]);
}

/// Notified around every tool batch: once before execution with
/// `results = None`, once after with the collected results.
#[async_trait]
pub trait ToolCallListener: Send + Sync {
    async fn on_tool_calls(&self, calls: &[ToolCallRequest], results: Option<&[ToolResult]>);
}

/// A lifecycle event from a running subagent, tagged with its kind so
/// the host can nest the display under the dispatching call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubagentEvent {
    /// A subagent was spawned.
    Started {
        kind: SubagentKind,
        prompt_preview: String,
    },

    /// The subagent called tools (relayed pre- and post-execution,
    /// mirroring [`ToolCallListener`]).
    ToolActivity {
        kind: SubagentKind,
        calls: Vec<ToolCallRequest>,
        results: Option<Vec<ToolResult>>,
    },

    /// The subagent finished and returned a result.
    Completed {
        kind: SubagentKind,
        result_preview: String,
    },

    /// The subagent failed; the same text is returned to the model.
    Failed { kind: SubagentKind, message: String },
}

/// Observes subagent lifecycle events from the task tool.
#[async_trait]
pub trait SubagentListener: Send + Sync {
    async fn on_event(&self, event: SubagentEvent);
}

/// One question presented to the user by the ask tool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// The complete question text.
    pub question: String,
    /// Very short label displayed as a chip/tag (max 12 chars).
    pub header: String,
    /// The available choices (2–4).
    pub options: Vec<QuestionOption>,
    /// Whether multiple options may be selected.
    pub multi_select: bool,
}

/// A single selectable option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionOption {
    pub label: String,
    pub description: String,
}

/// Presents questions to the user and blocks until answers arrive.
///
/// The returned map is keyed `question_{i}` by question index.
#[async_trait]
pub trait QuestionHost: Send + Sync {
    async fn ask(&self, questions: &[Question]) -> Result<HashMap<String, String>, HookError>;
}

/// Drives the plan-mode approval flow.
#[async_trait]
pub trait PlanModeHost: Send + Sync {
    /// Ask the user whether to enter plan mode.
    async fn approve_enter(&self) -> Result<bool, HookError>;

    /// Narrate the transition out of plan mode; the returned text is the
    /// exit tool's result.
    async fn on_exit(&self) -> Result<String, HookError>;
}

/// Executes a slash command against host-owned state and returns its
/// textual output.
#[async_trait]
pub trait SlashCommandHost: Send + Sync {
    async fn run(&self, command: &str) -> Result<String, HookError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subagent_event_serialization() {
        let event = SubagentEvent::Started {
            kind: SubagentKind::Explore,
            prompt_preview: "Find all auth files".into(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"started""#));
        assert!(json.contains(r#""kind":"explore""#));
    }

    #[test]
    fn subagent_event_deserialization() {
        let json = r#"{"type":"failed","kind":"plan","message":"boom"}"#;
        let event: SubagentEvent = serde_json::from_str(json).unwrap();
        match event {
            SubagentEvent::Failed { kind, message } => {
                assert_eq!(kind, SubagentKind::Plan);
                assert_eq!(message, "boom");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn question_roundtrip() {
        let q = Question {
            question: "Which library should we use?".into(),
            header: "Library".into(),
            options: vec![
                QuestionOption {
                    label: "red".into(),
                    description: "the red one".into(),
                },
                QuestionOption {
                    label: "blue".into(),
                    description: "the blue one".into(),
                },
            ],
            multi_select: false,
        };
        let json = serde_json::to_string(&q).unwrap();
        let back: Question = serde_json::from_str(&json).unwrap();
        assert_eq!(back.options.len(), 2);
        assert_eq!(back.header, "Library");
    }
}
