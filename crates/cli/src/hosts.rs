//! Host hook implementations for the terminal.
//!
//! These are the line-oriented counterparts of the hook traits in
//! `anvil_core::hooks`: questions and plan-mode approval read from
//! stdin, tool activity echoes to stdout, and every completed turn is
//! saved under `.anvil/conversations/`.

use anvil_config::WorkspaceConfig;
use anvil_core::hooks::{
    ConversationListener, HookError, PlanModeHost, Question, QuestionHost, SlashCommandHost,
    SubagentEvent, SubagentListener, ToolCallListener,
};
use anvil_core::message::{Message, ToolCallRequest};
use anvil_core::tool::ToolResult;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Read one trimmed line from stdin without blocking the runtime.
async fn read_line() -> Result<String, HookError> {
    tokio::task::spawn_blocking(|| {
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .map(|_| line.trim().to_string())
    })
    .await
    .map_err(|e| HookError::new(e.to_string()))?
    .map_err(|e| HookError::new(e.to_string()))
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.replace('\n', " ")
    } else {
        let mut out: String = text.chars().take(max_chars).collect();
        out = out.replace('\n', " ");
        out.push('…');
        out
    }
}

// --- Conversation persistence ---

/// Saves the conversation after every completed turn.
pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    /// A store writing to a fresh timestamped file in the workspace's
    /// conversations directory.
    pub fn new(config: &WorkspaceConfig) -> Self {
        let filename = format!(
            "conversation-{}.json",
            chrono::Utc::now().format("%Y%m%d-%H%M%S")
        );
        Self {
            path: config.conversations_dir().join(filename),
        }
    }
}

impl ConversationListener for ConversationStore {
    fn on_update(&self, history: &[Message]) {
        let result = serde_json::to_string_pretty(history)
            .map_err(std::io::Error::other)
            .and_then(|json| std::fs::write(&self.path, json));
        if let Err(e) = result {
            warn!(path = %self.path.display(), "Could not save conversation: {e}");
        }
    }
}

// --- Tool echo ---

/// Prints tool activity as it happens.
pub struct ToolEcho;

#[async_trait]
impl ToolCallListener for ToolEcho {
    async fn on_tool_calls(&self, calls: &[ToolCallRequest], results: Option<&[ToolResult]>) {
        match results {
            None => {
                for call in calls {
                    println!("  → {}({})", call.name, truncate(&call.arguments, 60));
                }
            }
            Some(results) => {
                for result in results {
                    let mark = if result.is_error { "✗" } else { "✓" };
                    println!(
                        "  {mark} {}: {}",
                        result.tool_name,
                        truncate(&result.content, 100)
                    );
                }
            }
        }
    }
}

/// Prints subagent lifecycle events, nested under the dispatching call.
pub struct SubagentEcho;

#[async_trait]
impl SubagentListener for SubagentEcho {
    async fn on_event(&self, event: SubagentEvent) {
        match event {
            SubagentEvent::Started {
                kind,
                prompt_preview,
            } => println!("  ⚙ [{kind}] started: {}", truncate(&prompt_preview, 80)),
            SubagentEvent::ToolActivity {
                kind,
                calls,
                results,
            } => match results {
                None => {
                    for call in &calls {
                        println!("    [{kind}] → {}", call.name);
                    }
                }
                Some(results) => {
                    for result in &results {
                        let mark = if result.is_error { "✗" } else { "✓" };
                        println!(
                            "    [{kind}] {mark} {}: {}",
                            result.tool_name,
                            truncate(&result.content, 80)
                        );
                    }
                }
            },
            SubagentEvent::Completed {
                kind,
                result_preview,
            } => println!("  ⚙ [{kind}] complete: {}", truncate(&result_preview, 80)),
            SubagentEvent::Failed { kind, message } => {
                println!("  ⚙ [{kind}] failed: {}", truncate(&message, 80));
            }
        }
    }
}

// --- Interactive hosts ---

/// Presents questions on stdout and collects answers from stdin.
///
/// Numeric answers are resolved to the matching option label before
/// being returned, so the formatted summary shows the label.
pub struct StdinQuestionHost;

#[async_trait]
impl QuestionHost for StdinQuestionHost {
    async fn ask(&self, questions: &[Question]) -> Result<HashMap<String, String>, HookError> {
        let mut answers = HashMap::new();

        for (i, q) in questions.iter().enumerate() {
            println!("\n[{}]", q.header);
            println!("{}", q.question);
            for (j, opt) in q.options.iter().enumerate() {
                println!("  {}. {} — {}", j + 1, opt.label, opt.description);
            }
            if q.multi_select {
                println!("(Select one or more, comma-separated, or type a custom answer)");
            } else {
                println!("(Select a number or type a custom answer)");
            }
            print!("{} ▸ ", q.header);
            use std::io::Write;
            std::io::stdout().flush().ok();

            let mut answer = read_line().await?;

            // "2" → second option's label
            if let Ok(n) = answer.parse::<usize>() {
                if n >= 1 && n <= q.options.len() {
                    answer = q.options[n - 1].label.clone();
                }
            }
            if answer.is_empty() {
                answer = "No answer provided".into();
            }

            answers.insert(format!("question_{i}"), answer);
        }

        Ok(answers)
    }
}

/// Plan-mode approval over stdin.
pub struct StdinPlanModeHost;

#[async_trait]
impl PlanModeHost for StdinPlanModeHost {
    async fn approve_enter(&self) -> Result<bool, HookError> {
        println!("\nThe assistant wants to enter plan mode: thorough exploration");
        println!("and design before implementation. Approve? (yes/no)");
        print!("Plan mode ▸ ");
        use std::io::Write;
        std::io::stdout().flush().ok();

        let answer = read_line().await?;
        Ok(matches!(
            answer.to_lowercase().as_str(),
            "yes" | "y" | "1" | "true"
        ))
    }

    async fn on_exit(&self) -> Result<String, HookError> {
        println!("\nPlan mode exited. Transitioning to implementation.");
        Ok("Plan mode exited successfully. Ready to implement.".into())
    }
}

// --- Slash commands ---

/// Executes slash commands against workspace settings.
///
/// Shared between typed REPL input and the `slash_command` tool so both
/// paths behave identically.
pub struct CommandHandler {
    config: Arc<WorkspaceConfig>,
    model: Mutex<String>,
}

impl CommandHandler {
    pub fn new(config: Arc<WorkspaceConfig>, model: String) -> Self {
        Self {
            config,
            model: Mutex::new(model),
        }
    }

    pub fn help_text() -> &'static str {
        "Available commands:\n\
         /help              Show this help\n\
         /model [name]      Show or change the model (applies next session)\n\
         /permissions       Show tool permission grants\n\
         /clear             Clear conversation history\n\
         /exit, /quit       Leave the session"
    }

    fn permissions_text(&self) -> Result<String, HookError> {
        let settings = self
            .config
            .load_settings()
            .map_err(|e| HookError::new(e.to_string()))?;
        let perms = settings.permissions;
        let flag = |on: bool| if on { "enabled" } else { "disabled" };
        Ok(format!(
            "Tool permissions:\n\
             file_operations: {}\n\
             shell_commands:  {}\n\
             network_access:  {}",
            flag(perms.allow_file_operations),
            flag(perms.allow_shell_commands),
            flag(perms.allow_network_access)
        ))
    }
}

#[async_trait]
impl SlashCommandHost for CommandHandler {
    async fn run(&self, command: &str) -> Result<String, HookError> {
        let mut parts = command.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let arg = parts.next();

        match (name, arg) {
            ("/help", _) => Ok(Self::help_text().to_string()),
            ("/model", None) => Ok(format!("Current model: {}", self.model.lock().unwrap())),
            ("/model", Some(model)) => {
                self.config
                    .update_model(model)
                    .map_err(|e| HookError::new(e.to_string()))?;
                *self.model.lock().unwrap() = model.to_string();
                Ok(format!(
                    "Model set to {model}. The change applies to the next session."
                ))
            }
            ("/permissions", _) => self.permissions_text(),
            _ => Err(HookError::new(format!("Unknown command: {name}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_config::WorkspaceSettings;

    fn handler() -> (tempfile::TempDir, CommandHandler) {
        let dir = tempfile::tempdir().unwrap();
        let config = Arc::new(WorkspaceConfig::new(dir.path()));
        config.initialize_workspace().unwrap();
        config
            .save_settings(&mut WorkspaceSettings::default())
            .unwrap();
        let handler = CommandHandler::new(config, "gpt-4o-mini".into());
        (dir, handler)
    }

    #[tokio::test]
    async fn help_lists_commands() {
        let (_dir, handler) = handler();
        let out = handler.run("/help").await.unwrap();
        assert!(out.contains("/model"));
        assert!(out.contains("/permissions"));
    }

    #[tokio::test]
    async fn model_show_and_set() {
        let (_dir, handler) = handler();
        let out = handler.run("/model").await.unwrap();
        assert!(out.contains("gpt-4o-mini"));

        let out = handler.run("/model gpt-4o").await.unwrap();
        assert!(out.contains("Model set to gpt-4o"));

        let out = handler.run("/model").await.unwrap();
        assert!(out.contains("gpt-4o"));
    }

    #[tokio::test]
    async fn permissions_reflect_settings() {
        let (_dir, handler) = handler();
        let out = handler.run("/permissions").await.unwrap();
        assert!(out.contains("file_operations: disabled"));
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let (_dir, handler) = handler();
        assert!(handler.run("/frobnicate").await.is_err());
    }

    #[test]
    fn conversation_store_writes_history() {
        let dir = tempfile::tempdir().unwrap();
        let config = WorkspaceConfig::new(dir.path());
        config.initialize_workspace().unwrap();

        let store = ConversationStore::new(&config);
        store.on_update(&[Message::user("hello"), Message::assistant("hi")]);

        let saved: Vec<serde_json::Value> = std::fs::read_dir(config.conversations_dir())
            .unwrap()
            .map(|entry| {
                serde_json::from_str::<Vec<serde_json::Value>>(
                    &std::fs::read_to_string(entry.unwrap().path()).unwrap(),
                )
                .unwrap()
            })
            .next()
            .unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0]["role"], "user");
    }

    #[test]
    fn truncate_flattens_newlines() {
        assert_eq!(truncate("a\nb", 10), "a b");
        let long = "x".repeat(200);
        assert!(truncate(&long, 50).ends_with('…'));
    }
}
