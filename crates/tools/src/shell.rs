//! Bash tool — execute shell commands in the workspace directory.

use anvil_core::error::ToolError;
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Execute shell commands with a timeout.
///
/// Subagent profiles construct this with a shorter timeout; the root
/// agent uses the default.
pub struct BashTool {
    workspace_root: PathBuf,
    timeout: Duration,
}

impl BashTool {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl Tool for BashTool {
    fn name(&self) -> &str {
        "bash"
    }

    fn description(&self) -> &str {
        "Execute a bash command in the workspace directory. Returns both stdout and stderr. Use for running scripts, checking file listings, or executing system commands."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The bash command to execute"
                }
            },
            "required": ["command"]
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        Some(Permission::ShellCommands)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let command = arguments["command"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'command' argument".into()))?;

        debug!(command = %command, "Executing shell command");

        let child = Command::new("sh")
            .args(["-c", command])
            .current_dir(&self.workspace_root)
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Ok(format!("Error executing command: {e}")),
            Err(_) => {
                warn!(command = %command, timeout_secs = self.timeout.as_secs(), "Command timed out");
                return Ok(format!(
                    "Error: Command timed out after {} seconds",
                    self.timeout.as_secs()
                ));
            }
        };

        let mut parts = Vec::new();

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            parts.push(format!("STDOUT:\n{stdout}"));
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            parts.push(format!("STDERR:\n{stderr}"));
        }

        let code = output.status.code().unwrap_or(-1);
        let status = if output.status.success() {
            format!("\nExit code: {code} (success)")
        } else {
            warn!(command = %command, exit_code = code, "Command failed");
            format!("\nExit code: {code} (failed)")
        };

        if parts.is_empty() {
            Ok(format!("Command executed successfully (no output){status}"))
        } else {
            Ok(format!("{}{status}", parts.join("\n\n")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> BashTool {
        BashTool::new(std::env::temp_dir())
    }

    #[test]
    fn tool_definition() {
        let tool = tool();
        assert_eq!(tool.name(), "bash");
        assert_eq!(tool.required_permission(), Some(Permission::ShellCommands));
    }

    #[tokio::test]
    async fn execute_echo() {
        let out = tool()
            .execute(serde_json::json!({"command": "echo hello"}))
            .await
            .unwrap();
        assert!(out.contains("STDOUT:\nhello"));
        assert!(out.contains("Exit code: 0 (success)"));
    }

    #[tokio::test]
    async fn stderr_is_captured() {
        let out = tool()
            .execute(serde_json::json!({"command": "echo oops >&2"}))
            .await
            .unwrap();
        assert!(out.contains("STDERR:\noops"));
    }

    #[tokio::test]
    async fn nonzero_exit_reported_as_failed() {
        let out = tool()
            .execute(serde_json::json!({"command": "exit 3"}))
            .await
            .unwrap();
        assert!(out.contains("Exit code: 3 (failed)"));
    }

    #[tokio::test]
    async fn no_output_message() {
        let out = tool()
            .execute(serde_json::json!({"command": "true"}))
            .await
            .unwrap();
        assert!(out.contains("Command executed successfully (no output)"));
    }

    #[tokio::test]
    async fn timeout_is_reported() {
        let tool = BashTool::new(std::env::temp_dir()).with_timeout(Duration::from_millis(100));
        let out = tool
            .execute(serde_json::json!({"command": "sleep 5"}))
            .await
            .unwrap();
        assert!(out.contains("timed out"));
    }

    #[tokio::test]
    async fn runs_in_workspace_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();

        let tool = BashTool::new(dir.path().canonicalize().unwrap());
        let out = tool
            .execute(serde_json::json!({"command": "ls"}))
            .await
            .unwrap();
        assert!(out.contains("marker.txt"));
    }

    #[tokio::test]
    async fn missing_command_is_invalid() {
        let result = tool().execute(serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
