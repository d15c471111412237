//! Built-in tools for Anvil agents.
//!
//! Two families:
//! - **Workspace tools** (`read`, `write`, `edit`, `bash`) act on the
//!   filesystem and shell, scoped to a workspace root and gated by
//!   [`anvil_core::Permission`] flags.
//! - **Interactive tools** (`ask_user_question`, `enter_plan_mode`,
//!   `exit_plan_mode`, `slash_command`) act on nothing directly — they
//!   suspend the agent loop until a host hook supplies an answer.
//!
//! Registries are assembled per agent: the CLI wires the full set for the
//! root agent, the subagent factory picks restricted subsets.

pub mod ask;
pub mod file_edit;
pub mod file_read;
pub mod file_write;
pub mod paths;
pub mod plan_mode;
pub mod shell;
pub mod slash_command;

pub use ask::AskUserQuestionTool;
pub use file_edit::EditTool;
pub use file_read::ReadTool;
pub use file_write::WriteTool;
pub use plan_mode::{EnterPlanModeTool, ExitPlanModeTool, PlanMode};
pub use shell::BashTool;
pub use slash_command::SlashCommandTool;
