//! Error types for the Anvil domain.
//!
//! Uses `thiserror` for ergonomic error definitions. The taxonomy follows
//! the propagation policy: provider and configuration failures surface to
//! the caller, tool dispatch failures never do — they are converted to
//! in-band error results by the executor.

use thiserror::Error;

/// The top-level error type for all Anvil operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool errors ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Stream interrupted: {0}")]
    StreamInterrupted(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures local to a single tool invocation.
///
/// These never reach `AgentLoop` callers: the executor catches every
/// variant and materializes it as a `ToolResult` with `is_error` set.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool '{0}'")]
    NotFound(String),

    #[error("Permission denied. This tool requires '{permission}' to be enabled in workspace settings.")]
    PermissionDenied { tool_name: String, permission: String },

    #[error("Invalid JSON arguments: {0}")]
    InvalidArguments(String),

    #[error("Tool execution failed: {tool_name} — {reason}")]
    ExecutionFailed { tool_name: String, reason: String },

    #[error("Tool timed out: {tool_name} after {timeout_secs}s")]
    Timeout { tool_name: String, timeout_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::ApiError {
            status_code: 429,
            message: "Too many requests".into(),
        });
        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[test]
    fn tool_error_displays_correctly() {
        let err = Error::Tool(ToolError::PermissionDenied {
            tool_name: "bash".into(),
            permission: "allow_shell_commands".into(),
        });
        assert!(err.to_string().contains("allow_shell_commands"));
    }

    #[test]
    fn config_shorthand() {
        let err = Error::config("unknown subagent kind 'wizard'");
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("wizard"));
    }
}
