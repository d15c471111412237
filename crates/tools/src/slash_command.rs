//! Slash-command tool — programmatic execution of host-owned commands.

use anvil_core::error::ToolError;
use anvil_core::hooks::SlashCommandHost;
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::sync::Arc;

pub struct SlashCommandTool {
    host: Option<Arc<dyn SlashCommandHost>>,
}

impl SlashCommandTool {
    pub fn new(host: Option<Arc<dyn SlashCommandHost>>) -> Self {
        Self { host }
    }
}

#[async_trait]
impl Tool for SlashCommandTool {
    fn name(&self) -> &str {
        "slash_command"
    }

    fn description(&self) -> &str {
        "Execute a slash command within the main conversation.\n\n\
         Usage:\n\
         - `command` (required): The slash command to execute, including any arguments\n\
         - Example: `command: \"/model gpt-4o\"`\n\n\
         Only use this tool for commands that appear in the available commands list. \
         Commands execute against host-owned state (settings, model switch, etc.) and \
         their textual output is returned verbatim."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The slash command to execute with its arguments, e.g., \"/model gpt-4o\""
                }
            },
            "required": ["command"],
            "additionalProperties": false
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        None
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let command = arguments["command"].as_str().unwrap_or_default();

        if command.is_empty() {
            return Ok("Error: Command cannot be empty".into());
        }
        if !command.starts_with('/') {
            return Ok(format!(
                "Error: Slash commands must start with '/'. Did you mean '/{command}'?"
            ));
        }

        let Some(host) = &self.host else {
            return Ok(
                "Error: SlashCommand tool not properly initialized (no command handler provided)"
                    .into(),
            );
        };

        match host.run(command).await {
            Ok(output) if output.is_empty() => {
                Ok("Command executed successfully (no output)".into())
            }
            Ok(output) => Ok(output),
            Err(e) => Ok(format!("Error executing command '{command}': {e}")),
        }
    }
}
