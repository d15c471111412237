//! File read tool — read file contents with workspace containment.

use crate::paths::{display_relative, resolve_in_workspace};
use anvil_core::error::ToolError;
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Read a file inside the workspace.
///
/// Keeps a log of every path successfully read so the edit tool can
/// enforce read-before-edit.
pub struct ReadTool {
    workspace_root: PathBuf,
    read_log: Mutex<HashSet<PathBuf>>,
}

impl ReadTool {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            read_log: Mutex::new(HashSet::new()),
        }
    }

    /// Whether this tool has successfully read the given resolved path.
    pub fn has_read(&self, path: &Path) -> bool {
        self.read_log.lock().unwrap().contains(path)
    }

    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

#[async_trait]
impl Tool for ReadTool {
    fn name(&self) -> &str {
        "read"
    }

    fn description(&self) -> &str {
        "Read the contents of a file at the specified path. Use this to examine files in the workspace before making changes or to understand the codebase structure."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to read (relative to workspace root or absolute)"
                }
            },
            "required": ["file_path"]
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        Some(Permission::FileOperations)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let file_path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'file_path' argument".into()))?;

        let resolved = match resolve_in_workspace(&self.workspace_root, file_path) {
            Ok(path) => path,
            Err(reason) => return Ok(format!("Error: {reason}")),
        };

        if !resolved.exists() {
            return Ok(format!("Error: File not found: {file_path}"));
        }
        if !resolved.is_file() {
            return Ok(format!("Error: Path is not a file: {file_path}"));
        }

        match tokio::fs::read_to_string(&resolved).await {
            Ok(content) => {
                self.read_log.lock().unwrap().insert(resolved.clone());

                let line_count = content.lines().count();
                let char_count = content.chars().count();
                Ok(format!(
                    "File: {}\nLines: {} | Characters: {}\n\n{}",
                    display_relative(&self.workspace_root, &resolved),
                    line_count,
                    char_count,
                    content
                ))
            }
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => Ok(format!(
                "Error: File is not a text file or uses unsupported encoding: {file_path}"
            )),
            Err(e) => Ok(format!("Error reading file: {e}")),
        }
    }
}
