//! Tool permission flags.
//!
//! A `PermissionSet` is owned by the host (persisted in workspace
//! settings) and handed to the executor. It may be swapped between turns
//! but is read-only during a single dispatch.

use serde::{Deserialize, Serialize};

/// A capability a tool may require before it is dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    FileOperations,
    ShellCommands,
    NetworkAccess,
}

impl Permission {
    /// The settings-file flag name for this permission.
    pub fn flag_name(&self) -> &'static str {
        match self {
            Self::FileOperations => "allow_file_operations",
            Self::ShellCommands => "allow_shell_commands",
            Self::NetworkAccess => "allow_network_access",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.flag_name())
    }
}

/// Three independent grants, all off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(default)]
    pub allow_file_operations: bool,
    #[serde(default)]
    pub allow_shell_commands: bool,
    #[serde(default)]
    pub allow_network_access: bool,
}

impl PermissionSet {
    /// Nothing granted.
    pub fn none() -> Self {
        Self::default()
    }

    /// Everything granted.
    pub fn all() -> Self {
        Self {
            allow_file_operations: true,
            allow_shell_commands: true,
            allow_network_access: true,
        }
    }

    /// File and shell access, network off — the subagent profile.
    pub fn workspace_only() -> Self {
        Self {
            allow_file_operations: true,
            allow_shell_commands: true,
            allow_network_access: false,
        }
    }

    /// Whether the given permission is granted.
    pub fn grants(&self, permission: Permission) -> bool {
        match permission {
            Permission::FileOperations => self.allow_file_operations,
            Permission::ShellCommands => self.allow_shell_commands,
            Permission::NetworkAccess => self.allow_network_access,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grants_nothing() {
        let perms = PermissionSet::default();
        assert!(!perms.grants(Permission::FileOperations));
        assert!(!perms.grants(Permission::ShellCommands));
        assert!(!perms.grants(Permission::NetworkAccess));
    }

    #[test]
    fn workspace_only_excludes_network() {
        let perms = PermissionSet::workspace_only();
        assert!(perms.grants(Permission::FileOperations));
        assert!(perms.grants(Permission::ShellCommands));
        assert!(!perms.grants(Permission::NetworkAccess));
    }

    #[test]
    fn flag_names_match_settings_fields() {
        assert_eq!(Permission::ShellCommands.flag_name(), "allow_shell_commands");
        assert_eq!(Permission::FileOperations.flag_name(), "allow_file_operations");
    }

    #[test]
    fn serde_roundtrip() {
        let perms = PermissionSet {
            allow_file_operations: true,
            allow_shell_commands: false,
            allow_network_access: false,
        };
        let json = serde_json::to_string(&perms).unwrap();
        let back: PermissionSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, perms);
    }

    #[test]
    fn missing_fields_default_to_false() {
        let perms: PermissionSet = serde_json::from_str(r#"{"allow_file_operations":true}"#).unwrap();
        assert!(perms.allow_file_operations);
        assert!(!perms.allow_shell_commands);
    }
}
