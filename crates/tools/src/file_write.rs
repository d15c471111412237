//! File write tool — create or overwrite files inside the workspace.

use crate::paths::{display_relative, resolve_in_workspace};
use anvil_core::error::ToolError;
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::path::PathBuf;

pub struct WriteTool {
    workspace_root: PathBuf,
}

impl WriteTool {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }
}

#[async_trait]
impl Tool for WriteTool {
    fn name(&self) -> &str {
        "write"
    }

    fn description(&self) -> &str {
        "Write or overwrite a file with the specified content. Creates parent directories if needed. Use this to create new files or modify existing ones."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to write (relative to workspace root or absolute)"
                },
                "content": {
                    "type": "string",
                    "description": "The complete content to write to the file"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        Some(Permission::FileOperations)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let file_path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'file_path' argument".into()))?;
        let content = arguments["content"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'content' argument".into()))?;

        let resolved = match resolve_in_workspace(&self.workspace_root, file_path) {
            Ok(path) => path,
            Err(reason) => return Ok(format!("Error: {reason}")),
        };

        if let Some(parent) = resolved.parent() {
            if let Err(e) = tokio::fs::create_dir_all(parent).await {
                return Ok(format!("Error writing file: {e}"));
            }
        }

        match tokio::fs::write(&resolved, content).await {
            Ok(()) => {
                let line_count = content.lines().count();
                let char_count = content.chars().count();
                Ok(format!(
                    "Successfully wrote to {}\nLines: {} | Characters: {}",
                    display_relative(&self.workspace_root, &resolved),
                    line_count,
                    char_count
                ))
            }
            Err(e) => Ok(format!("Error writing file: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    #[tokio::test]
    async fn write_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteTool::new(root(&dir));

        let out = tool
            .execute(serde_json::json!({
                "file_path": "notes.md",
                "content": "line one\nline two"
            }))
            .await
            .unwrap();

        assert!(out.contains("Successfully wrote to notes.md"));
        assert!(out.contains("Lines: 2"));
        let written = std::fs::read_to_string(dir.path().join("notes.md")).unwrap();
        assert_eq!(written, "line one\nline two");
    }

    #[tokio::test]
    async fn write_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteTool::new(root(&dir));

        tool.execute(serde_json::json!({
            "file_path": "deep/nested/dir/file.txt",
            "content": "x"
        }))
        .await
        .unwrap();

        assert!(dir.path().join("deep/nested/dir/file.txt").is_file());
    }

    #[tokio::test]
    async fn write_overwrites_existing() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "old").unwrap();
        let tool = WriteTool::new(root(&dir));

        tool.execute(serde_json::json!({"file_path": "f.txt", "content": "new"}))
            .await
            .unwrap();

        assert_eq!(std::fs::read_to_string(dir.path().join("f.txt")).unwrap(), "new");
    }

    #[tokio::test]
    async fn write_outside_workspace_blocked() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteTool::new(root(&dir));

        let out = tool
            .execute(serde_json::json!({
                "file_path": "../escape.txt",
                "content": "nope"
            }))
            .await
            .unwrap();

        assert!(out.contains("outside workspace root"));
    }

    #[tokio::test]
    async fn missing_content_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let tool = WriteTool::new(root(&dir));
        let result = tool
            .execute(serde_json::json!({"file_path": "f.txt"}))
            .await;
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
