//! # Anvil Core
//!
//! Domain types, traits, and error definitions for the Anvil coding
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem is defined as a trait here. Implementations live in
//! their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod error;
pub mod executor;
pub mod hooks;
pub mod message;
pub mod permissions;
pub mod provider;
pub mod subagent;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use executor::ToolExecutor;
pub use hooks::{
    ConversationListener, HookError, PlanModeHost, Question, QuestionHost, QuestionOption,
    SlashCommandHost, SubagentEvent, SubagentListener, ToolCallListener,
};
pub use message::{Conversation, ConversationId, Message, Role, ToolCallRequest};
pub use permissions::{Permission, PermissionSet};
pub use provider::{
    Provider, ProviderFactory, ProviderRequest, ProviderResponse, StreamChunk, ToolDefinition,
    Usage,
};
pub use subagent::{SubagentKind, SubagentSpec};
pub use tool::{Tool, ToolRegistry, ToolResult};
