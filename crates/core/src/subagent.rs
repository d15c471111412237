//! Subagent kinds and their fixed execution profiles.

use crate::error::Error;
use crate::permissions::PermissionSet;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The kinds of subagent the task tool can spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubagentKind {
    /// Fast, read-only codebase exploration.
    Explore,
    /// Architecture and implementation planning with editing tools.
    Plan,
}

impl SubagentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Explore => "explore",
            Self::Plan => "plan",
        }
    }
}

impl std::fmt::Display for SubagentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubagentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "explore" => Ok(Self::Explore),
            "plan" => Ok(Self::Plan),
            other => Err(Error::config(format!("Unknown subagent kind: {other}"))),
        }
    }
}

/// The execution profile for one subagent kind.
///
/// Created fresh per task dispatch; never persisted or reused. The tool
/// subset itself is assembled by the factory — it is not data, because
/// the whole point is that a subagent's registry is built without the
/// task tool.
#[derive(Debug, Clone)]
pub struct SubagentSpec {
    pub kind: SubagentKind,
    pub permissions: PermissionSet,
    pub max_iterations: u32,
}

impl SubagentSpec {
    /// The fixed profile for a kind.
    pub fn for_kind(kind: SubagentKind) -> Self {
        match kind {
            // Bounded exploration: few iterations, read-only toolset.
            SubagentKind::Explore => Self {
                kind,
                permissions: PermissionSet::workspace_only(),
                max_iterations: 5,
            },
            // Thorough design work gets more room.
            SubagentKind::Plan => Self {
                kind,
                permissions: PermissionSet::workspace_only(),
                max_iterations: 15,
            },
        }
    }
}
