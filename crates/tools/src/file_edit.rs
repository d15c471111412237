//! File edit tool — exact string replacement with a read-before-edit gate.

use crate::file_read::ReadTool;
use crate::paths::resolve_in_workspace;
use anvil_core::error::ToolError;
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::sync::Arc;

/// Perform exact string replacements in files.
///
/// Shares the [`ReadTool`]'s read log: a file must have been read in this
/// session before it can be edited.
pub struct EditTool {
    read_tool: Arc<ReadTool>,
}

impl EditTool {
    pub fn new(read_tool: Arc<ReadTool>) -> Self {
        Self { read_tool }
    }
}

#[async_trait]
impl Tool for EditTool {
    fn name(&self) -> &str {
        "edit"
    }

    fn description(&self) -> &str {
        "Performs exact string replacements in files.\n\n\
         Usage:\n\
         - You must use the `read` tool at least once in the conversation before editing. This tool will error if you attempt an edit without reading the file.\n\
         - ALWAYS prefer editing existing files in the codebase. NEVER write new files unless explicitly required.\n\
         - The edit will FAIL if `old_string` is not unique in the file. Either provide a larger string with more surrounding context to make it unique or use `replace_all` to change every instance of `old_string`.\n\
         - Use `replace_all` for replacing and renaming strings across the file."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "The path to the file to modify"
                },
                "old_string": {
                    "type": "string",
                    "description": "The text to replace"
                },
                "new_string": {
                    "type": "string",
                    "description": "The text to replace it with (must be different from old_string)"
                },
                "replace_all": {
                    "type": "boolean",
                    "description": "Replace all occurrences of old_string (default false)",
                    "default": false
                }
            },
            "required": ["file_path", "old_string", "new_string"]
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        Some(Permission::FileOperations)
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<String, ToolError> {
        let file_path = arguments["file_path"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'file_path' argument".into()))?;
        let old_string = arguments["old_string"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'old_string' argument".into()))?;
        let new_string = arguments["new_string"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'new_string' argument".into()))?;
        let replace_all = arguments["replace_all"].as_bool().unwrap_or(false);

        if old_string == new_string {
            return Ok("Error: old_string and new_string must be different".into());
        }

        let resolved = match resolve_in_workspace(self.read_tool.workspace_root(), file_path) {
            Ok(path) => path,
            Err(reason) => return Ok(format!("Error: {reason}")),
        };

        if !self.read_tool.has_read(&resolved) {
            return Ok(format!(
                "Error: You must use the `read` tool to read {file_path} before editing it"
            ));
        }

        if !resolved.exists() {
            return Ok(format!("Error: File not found: {file_path}"));
        }
        if !resolved.is_file() {
            return Ok(format!("Error: Path is not a file: {file_path}"));
        }

        let content = match tokio::fs::read_to_string(&resolved).await {
            Ok(content) => content,
            Err(e) => return Ok(format!("Error editing {file_path}: {e}")),
        };

        let occurrences = content.matches(old_string).count();
        if occurrences == 0 {
            return Ok(format!("Error: old_string not found in {file_path}"));
        }

        let (new_content, replacement_msg) = if replace_all {
            (
                content.replace(old_string, new_string),
                format!("Replaced {occurrences} occurrence(s)"),
            )
        } else {
            if occurrences > 1 {
                return Ok(format!(
                    "Error: old_string is not unique in {file_path} (found {occurrences} occurrences). \
                     Either provide a larger string with more surrounding context to make it unique \
                     or use `replace_all=true` to change every instance."
                ));
            }
            (
                content.replacen(old_string, new_string, 1),
                "Replaced 1 occurrence".to_string(),
            )
        };

        match tokio::fs::write(&resolved, new_content).await {
            Ok(()) => Ok(format!("Successfully edited {file_path}. {replacement_msg}.")),
            Err(e) => Ok(format!("Error editing {file_path}: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn root(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().canonicalize().unwrap()
    }

    async fn read_first(read_tool: &ReadTool, path: &str) {
        read_tool
            .execute(serde_json::json!({"file_path": path}))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn edit_after_read() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.rs"), "fn main() { old(); }").unwrap();

        let read_tool = Arc::new(ReadTool::new(root(&dir)));
        read_first(&read_tool, "main.rs").await;

        let tool = EditTool::new(read_tool);
        let out = tool
            .execute(serde_json::json!({
                "file_path": "main.rs",
                "old_string": "old()",
                "new_string": "new()"
            }))
            .await
            .unwrap();

        assert!(out.contains("Successfully edited"));
        assert!(out.contains("Replaced 1 occurrence"));
        let content = std::fs::read_to_string(dir.path().join("main.rs")).unwrap();
        assert_eq!(content, "fn main() { new(); }");
    }

    #[tokio::test]
    async fn edit_without_read_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("main.rs"), "content").unwrap();

        let tool = EditTool::new(Arc::new(ReadTool::new(root(&dir))));
        let out = tool
            .execute(serde_json::json!({
                "file_path": "main.rs",
                "old_string": "content",
                "new_string": "other"
            }))
            .await
            .unwrap();

        assert!(out.contains("must use the `read` tool"));
        // File untouched
        assert_eq!(
            std::fs::read_to_string(dir.path().join("main.rs")).unwrap(),
            "content"
        );
    }

    #[tokio::test]
    async fn non_unique_old_string_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "foo foo foo").unwrap();

        let read_tool = Arc::new(ReadTool::new(root(&dir)));
        read_first(&read_tool, "f.txt").await;

        let tool = EditTool::new(read_tool);
        let out = tool
            .execute(serde_json::json!({
                "file_path": "f.txt",
                "old_string": "foo",
                "new_string": "bar"
            }))
            .await
            .unwrap();

        assert!(out.contains("not unique"));
        assert!(out.contains("3 occurrences"));
    }

    #[tokio::test]
    async fn replace_all_replaces_every_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "foo foo foo").unwrap();

        let read_tool = Arc::new(ReadTool::new(root(&dir)));
        read_first(&read_tool, "f.txt").await;

        let tool = EditTool::new(read_tool);
        let out = tool
            .execute(serde_json::json!({
                "file_path": "f.txt",
                "old_string": "foo",
                "new_string": "bar",
                "replace_all": true
            }))
            .await
            .unwrap();

        assert!(out.contains("Replaced 3 occurrence(s)"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("f.txt")).unwrap(),
            "bar bar bar"
        );
    }

    #[tokio::test]
    async fn identical_strings_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let tool = EditTool::new(Arc::new(ReadTool::new(root(&dir))));
        let out = tool
            .execute(serde_json::json!({
                "file_path": "f.txt",
                "old_string": "same",
                "new_string": "same"
            }))
            .await
            .unwrap();
        assert!(out.contains("must be different"));
    }

    #[tokio::test]
    async fn old_string_not_found() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("f.txt"), "something").unwrap();

        let read_tool = Arc::new(ReadTool::new(root(&dir)));
        read_first(&read_tool, "f.txt").await;

        let tool = EditTool::new(read_tool);
        let out = tool
            .execute(serde_json::json!({
                "file_path": "f.txt",
                "old_string": "absent",
                "new_string": "present"
            }))
            .await
            .unwrap();
        assert!(out.contains("old_string not found"));
    }
}
