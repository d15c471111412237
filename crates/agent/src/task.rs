//! Task dispatch tool — delegate a task to a freshly-built subagent.
//!
//! Registered only on top-level agents. The subagent runs to completion
//! inside this tool call; its lifecycle is relayed to the host as
//! [`SubagentEvent`]s.

use crate::subagent::SubagentFactory;
use anvil_core::error::{Error, ToolError};
use anvil_core::hooks::{SubagentEvent, SubagentListener, ToolCallListener};
use anvil_core::message::ToolCallRequest;
use anvil_core::permissions::Permission;
use anvil_core::provider::ProviderFactory;
use anvil_core::subagent::SubagentKind;
use anvil_core::tool::{Tool, ToolResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Characters of prompt/result shown in lifecycle event previews.
const PREVIEW_CHARS: usize = 120;

pub struct TaskTool {
    provider_factory: Arc<dyn ProviderFactory>,
    subagent_factory: SubagentFactory,
    /// Set when this tool somehow ends up constructed for a subagent
    /// context — defense in depth next to the factory invariant.
    is_subagent: bool,
    listener: Option<Arc<dyn SubagentListener>>,
}

impl TaskTool {
    pub fn new(
        provider_factory: Arc<dyn ProviderFactory>,
        workspace_root: impl Into<PathBuf>,
        is_subagent: bool,
        listener: Option<Arc<dyn SubagentListener>>,
    ) -> Self {
        Self {
            provider_factory,
            subagent_factory: SubagentFactory::new(workspace_root),
            is_subagent,
            listener,
        }
    }

    async fn emit(&self, event: SubagentEvent) {
        if let Some(listener) = &self.listener {
            listener.on_event(event).await;
        }
    }

    /// Build and drive the subagent. Failures here become the `Failed`
    /// event plus returned text — never a raised error.
    async fn run_subagent(
        &self,
        kind: SubagentKind,
        task_prompt: &str,
        model_override: Option<&str>,
    ) -> Result<String, Error> {
        let (provider, model) = self.provider_factory.create(model_override)?;

        let relay: Option<Arc<dyn ToolCallListener>> = self
            .listener
            .clone()
            .map(|listener| Arc::new(SubagentRelay { kind, listener }) as Arc<dyn ToolCallListener>);

        let (mut subagent, max_iterations) =
            self.subagent_factory.create(provider, model, kind, relay);

        // The subagent sees only the task prompt, never parent history.
        subagent.chat(task_prompt, max_iterations).await
    }
}

#[async_trait]
impl Tool for TaskTool {
    fn name(&self) -> &str {
        "task"
    }

    fn description(&self) -> &str {
        "Spawn a specialized subagent to handle complex tasks requiring focused expertise.\n\n\
         Available subagent types:\n\
         - 'explore': Fast codebase exploration with read-only tools (read, bash ls/find/git)\n\
         - 'plan': Architecture and implementation planning with full tool access\n\n\
         The subagent receives ONLY the task_prompt - no conversation history is shared.\n\
         You control what context to provide via the prompt."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "task_prompt": {
                    "type": "string",
                    "description": "The task description and any context needed. Be explicit - no conversation history is shared."
                },
                "subagent_type": {
                    "type": "string",
                    "enum": ["explore", "plan"],
                    "description": "Type of subagent: 'explore' for read-only exploration, 'plan' for planning"
                },
                "model": {
                    "type": "string",
                    "description": "Optional: Override model for subagent (uses parent's model by default)"
                }
            },
            "required": ["task_prompt", "subagent_type"]
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        None
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let task_prompt = arguments["task_prompt"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'task_prompt' argument".into()))?;
        let subagent_type = arguments["subagent_type"].as_str().ok_or_else(|| {
            ToolError::InvalidArguments("Missing 'subagent_type' argument".into())
        })?;
        let model_override = arguments["model"].as_str();

        if self.is_subagent {
            return Ok(
                "Error: Subagents cannot spawn additional subagents. Please complete this task directly."
                    .into(),
            );
        }

        let Ok(kind) = subagent_type.parse::<SubagentKind>() else {
            return Ok(format!(
                "Error: Invalid subagent_type '{subagent_type}'. Must be 'explore' or 'plan'."
            ));
        };

        info!(kind = %kind, "Dispatching task to subagent");
        self.emit(SubagentEvent::Started {
            kind,
            prompt_preview: preview(task_prompt),
        })
        .await;

        match self.run_subagent(kind, task_prompt, model_override).await {
            Ok(result) => {
                self.emit(SubagentEvent::Completed {
                    kind,
                    result_preview: preview(&result),
                })
                .await;
                Ok(result)
            }
            Err(e) => {
                let message = format!("Error executing {kind} subagent: {e}");
                self.emit(SubagentEvent::Failed {
                    kind,
                    message: message.clone(),
                })
                .await;
                Ok(message)
            }
        }
    }
}

/// Forwards the subagent's tool-call notifications to the parent's
/// subagent listener, tagged with the kind for display nesting.
struct SubagentRelay {
    kind: SubagentKind,
    listener: Arc<dyn SubagentListener>,
}

#[async_trait]
impl ToolCallListener for SubagentRelay {
    async fn on_tool_calls(&self, calls: &[ToolCallRequest], results: Option<&[ToolResult]>) {
        self.listener
            .on_event(SubagentEvent::ToolActivity {
                kind: self.kind,
                calls: calls.to_vec(),
                results: results.map(<[ToolResult]>::to_vec),
            })
            .await;
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
        out.push('…');
        out
    }
}
