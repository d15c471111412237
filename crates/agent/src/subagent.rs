//! Subagent factory — fully wired, restricted agents per kind.
//!
//! Recursion safety is structural: nothing in this module can register a
//! task tool, so an agent built here is incapable of spawning further
//! subagents regardless of runtime state.

use crate::loop_runner::AgentLoop;
use crate::prompts;
use anvil_core::hooks::ToolCallListener;
use anvil_core::provider::Provider;
use anvil_core::subagent::{SubagentKind, SubagentSpec};
use anvil_core::tool::ToolRegistry;
use anvil_tools::{BashTool, EditTool, ReadTool, WriteTool};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Shell timeout for explore subagents — exploration commands should be
/// quick listings, not builds.
const EXPLORE_BASH_TIMEOUT: Duration = Duration::from_secs(10);

/// Builds pre-configured subagents with a restricted tool subset, fixed
/// permissions, and an iteration cap.
pub struct SubagentFactory {
    workspace_root: PathBuf,
}

impl SubagentFactory {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
        }
    }

    /// Create a subagent of the given kind, returning the agent and its
    /// iteration cap.
    ///
    /// The subagent gets a fresh conversation — the parent's history is
    /// never shared. Unknown kinds are rejected earlier, when the kind
    /// string is parsed into [`SubagentKind`].
    pub fn create(
        &self,
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        kind: SubagentKind,
        tool_call_listener: Option<Arc<dyn ToolCallListener>>,
    ) -> (AgentLoop, u32) {
        let spec = SubagentSpec::for_kind(kind);
        let registry = match kind {
            SubagentKind::Explore => self.explore_registry(),
            SubagentKind::Plan => self.plan_registry(),
        };

        debug!(kind = %kind, tools = ?registry.names(), "Building subagent");

        let mut agent = AgentLoop::new(provider, model, prompts::for_kind(kind))
            .with_tools(Arc::new(registry), spec.permissions)
            .as_subagent();

        if let Some(listener) = tool_call_listener {
            agent = agent.with_tool_call_listener(listener);
        }

        (agent, spec.max_iterations)
    }

    /// Read-only toolset: read plus a short-timeout bash.
    fn explore_registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(ReadTool::new(&self.workspace_root)));
        registry.register(Arc::new(
            BashTool::new(&self.workspace_root).with_timeout(EXPLORE_BASH_TIMEOUT),
        ));
        registry
    }

    /// Full editing toolset — but never the task tool.
    fn plan_registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();
        let read_tool = Arc::new(ReadTool::new(&self.workspace_root));
        registry.register(read_tool.clone());
        registry.register(Arc::new(WriteTool::new(&self.workspace_root)));
        registry.register(Arc::new(BashTool::new(&self.workspace_root)));
        registry.register(Arc::new(EditTool::new(read_tool)));
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::SequentialMockProvider;
    use anvil_core::error::Error;

    fn factory() -> SubagentFactory {
        SubagentFactory::new(std::env::temp_dir())
    }

    fn provider() -> Arc<SequentialMockProvider> {
        Arc::new(SequentialMockProvider::single_text("done"))
    }

    #[test]
    fn explore_gets_read_only_tools() {
        let (agent, max_iterations) =
            factory().create(provider(), "mock-model", SubagentKind::Explore, None);
        assert!(agent.is_subagent());
        assert_eq!(max_iterations, 5);
    }

    #[test]
    fn plan_gets_editing_tools_and_more_room() {
        let (agent, max_iterations) =
            factory().create(provider(), "mock-model", SubagentKind::Plan, None);
        assert!(agent.is_subagent());
        assert_eq!(max_iterations, 15);
    }

    #[test]
    fn no_kind_ever_gets_the_task_tool() {
        let factory = factory();
        let explore = factory.explore_registry();
        let plan = factory.plan_registry();

        assert_eq!(explore.names(), vec!["read", "bash"]);
        assert_eq!(plan.names(), vec!["read", "write", "bash", "edit"]);
        assert!(!explore.contains("task"));
        assert!(!plan.contains("task"));
    }

    #[test]
    fn unknown_kind_fails_at_parse_time() {
        let err = "refactor".parse::<SubagentKind>().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[tokio::test]
    async fn subagent_starts_with_empty_history() {
        let (mut agent, cap) =
            factory().create(provider(), "mock-model", SubagentKind::Explore, None);
        assert!(agent.history().is_empty());

        let result = agent.chat("look around", cap).await.unwrap();
        assert_eq!(result, "done");
        // Only the task prompt and the answer — no parent context.
        assert_eq!(agent.history().len(), 2);
    }
}
