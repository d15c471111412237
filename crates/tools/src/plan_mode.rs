//! Plan-mode tools — the enter/exit workflow state transition.
//!
//! Plan-mode state is an explicit handle owned by the session, not a
//! global flag: the session creates one [`PlanMode`] and clones it into
//! both tools (and the host), so multiple sessions never cross-talk.

use anvil_core::error::ToolError;
use anvil_core::hooks::PlanModeHost;
use anvil_core::permissions::Permission;
use anvil_core::tool::Tool;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::info;

/// Shared plan-mode state for one session.
#[derive(Clone, Default)]
pub struct PlanMode {
    active: Arc<AtomicBool>,
}

impl PlanMode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    fn activate(&self) {
        self.active.store(true, Ordering::SeqCst);
    }

    fn deactivate(&self) {
        self.active.store(false, Ordering::SeqCst);
    }
}

const ENTER_NARRATION: &str = "Plan mode activated. You are now in planning mode.\n\n\
Next steps:\n\
1. Explore the codebase thoroughly using read and bash tools\n\
2. Understand existing patterns and architecture\n\
3. Design your implementation approach\n\
4. Use ask_user_question if you need clarification on approaches\n\
5. When ready, present your plan and wait for user approval\n\
6. Use exit_plan_mode when planning is complete and you're ready to implement";

const DECLINE_NOTICE: &str = "Plan mode request denied by user. Proceeding with direct implementation.\n\
Continue with the task without entering plan mode.";

/// Request a transition into plan mode, gated on user approval.
pub struct EnterPlanModeTool {
    state: PlanMode,
    host: Option<Arc<dyn PlanModeHost>>,
}

impl EnterPlanModeTool {
    pub fn new(state: PlanMode, host: Option<Arc<dyn PlanModeHost>>) -> Self {
        Self { state, host }
    }
}

#[async_trait]
impl Tool for EnterPlanModeTool {
    fn name(&self) -> &str {
        "enter_plan_mode"
    }

    fn description(&self) -> &str {
        "Use this tool when you encounter a complex task that requires careful planning and exploration before implementation. It transitions you into plan mode where you can thoroughly explore the codebase and design an implementation approach.\n\n\
         Use it when the task has multiple valid approaches with trade-offs, requires significant architectural decisions, touches many files or systems, or needs exploration before the full scope is clear.\n\n\
         Do NOT use it for simple, straightforward tasks with an obvious implementation, small bug fixes, or research-only tasks (use the task tool with an explore agent instead).\n\n\
         This tool REQUIRES user approval — they must consent to entering plan mode. If unsure whether to use it, err on the side of starting implementation."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        None
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        let Some(host) = &self.host else {
            return Ok(
                "Error: EnterPlanMode tool not properly initialized (no callback provided)".into(),
            );
        };

        match host.approve_enter().await {
            Ok(true) => {
                self.state.activate();
                info!("Plan mode entered");
                Ok(ENTER_NARRATION.into())
            }
            Ok(false) => Ok(DECLINE_NOTICE.into()),
            Err(e) => Ok(format!("Error requesting plan mode: {e}")),
        }
    }
}

/// Leave plan mode and transition to implementation.
pub struct ExitPlanModeTool {
    state: PlanMode,
    host: Option<Arc<dyn PlanModeHost>>,
}

impl ExitPlanModeTool {
    pub fn new(state: PlanMode, host: Option<Arc<dyn PlanModeHost>>) -> Self {
        Self { state, host }
    }
}

#[async_trait]
impl Tool for ExitPlanModeTool {
    fn name(&self) -> &str {
        "exit_plan_mode"
    }

    fn description(&self) -> &str {
        "Use this tool when you are in plan mode and have finished planning and are ready for user approval. You should have already presented your implementation plan in the conversation; this signals that you're done planning and ready to transition to implementation.\n\n\
         Only use it when the task requires planning the implementation steps of a task that requires writing code. For research tasks — gathering information, searching or reading files, understanding the codebase — do NOT use this tool.\n\n\
         Before calling it, resolve any ambiguity in the plan with ask_user_question and update the plan based on the answers."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {},
            "additionalProperties": false
        })
    }

    fn required_permission(&self) -> Option<Permission> {
        None
    }

    async fn execute(&self, _arguments: serde_json::Value) -> Result<String, ToolError> {
        if !self.state.is_active() {
            return Ok("Warning: Not currently in plan mode".into());
        }

        let Some(host) = &self.host else {
            return Ok(
                "Error: ExitPlanMode tool not properly initialized (no callback provided)".into(),
            );
        };

        match host.on_exit().await {
            Ok(narration) => {
                self.state.deactivate();
                info!("Plan mode exited");
                Ok(narration)
            }
            Err(e) => Ok(format!("Error exiting plan mode: {e}")),
        }
    }
}
