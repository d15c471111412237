//! Tool executor — permission-checked, concurrent dispatch of tool calls.
//!
//! Every failure mode of a single call (unknown tool, permission denied,
//! malformed arguments, capability failure) is materialized as an error
//! `ToolResult`; the batch operation itself never fails, so the agent
//! loop always continues.

use crate::message::ToolCallRequest;
use crate::permissions::PermissionSet;
use crate::tool::{ToolRegistry, ToolResult};
use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, warn};

/// Dispatches tool calls against a registry under a permission set.
///
/// The permission set is host-owned: it may be swapped between turns via
/// [`set_permissions`](Self::set_permissions) but is read-only for the
/// duration of a dispatch.
pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    permissions: PermissionSet,
}

impl ToolExecutor {
    pub fn new(registry: Arc<ToolRegistry>, permissions: PermissionSet) -> Self {
        Self {
            registry,
            permissions,
        }
    }

    pub fn registry(&self) -> &Arc<ToolRegistry> {
        &self.registry
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }

    /// Replace the active permission set. Takes effect on the next
    /// dispatch.
    pub fn set_permissions(&mut self, permissions: PermissionSet) {
        self.permissions = permissions;
    }

    /// Execute a single tool call. Never fails — every error becomes a
    /// `ToolResult` with `is_error` set.
    pub async fn dispatch(&self, call: &ToolCallRequest) -> ToolResult {
        let Some(tool) = self.registry.get(&call.name) else {
            return ToolResult::error(
                &call.id,
                &call.name,
                format!("Error: Unknown tool '{}'", call.name),
            );
        };

        if let Some(permission) = tool.required_permission() {
            if !self.permissions.grants(permission) {
                warn!(tool = %call.name, permission = %permission, "Tool dispatch denied");
                return ToolResult::error(
                    &call.id,
                    &call.name,
                    format!(
                        "Error: Permission denied. This tool requires '{permission}' to be enabled in workspace settings."
                    ),
                );
            }
        }

        let arguments: serde_json::Value = match serde_json::from_str(&call.arguments) {
            Ok(value) => value,
            Err(e) => {
                return ToolResult::error(
                    &call.id,
                    &call.name,
                    format!("Error: Invalid JSON arguments: {e}"),
                );
            }
        };

        let start = std::time::Instant::now();
        let result = tool.execute(arguments).await;
        debug!(
            tool = %call.name,
            duration_ms = start.elapsed().as_millis() as u64,
            success = result.is_ok(),
            "Tool dispatched"
        );

        match result {
            Ok(content) => ToolResult::ok(&call.id, &call.name, content),
            Err(e) => ToolResult::error(
                &call.id,
                &call.name,
                format!("Error executing tool: {e}"),
            ),
        }
    }

    /// Execute a batch of tool calls concurrently.
    ///
    /// Dispatch fans out; results are collected in the original call
    /// order regardless of completion order, preserving the
    /// tool_call_id-matching invariant when they are appended to history.
    pub async fn dispatch_batch(&self, calls: &[ToolCallRequest]) -> Vec<ToolResult> {
        join_all(calls.iter().map(|call| self.dispatch(call))).await
    }
}
