//! `anvil onboard` — Initialize the workspace.

use anvil_config::{WorkspaceConfig, WorkspaceSettings};

pub async fn run() -> anyhow::Result<()> {
    let config = WorkspaceConfig::current_dir()?;

    let created = config.initialize_workspace()?;
    if !created && config.settings_path().exists() {
        println!("Workspace already initialized.");
        println!("  settings: {}", config.settings_path().display());
        return Ok(());
    }

    let mut settings = WorkspaceSettings::default();
    config.save_settings(&mut settings)?;

    println!("Workspace initialized.");
    println!("  settings:      {}", config.settings_path().display());
    println!("  conversations: {}", config.conversations_dir().display());
    println!("  model:         {}", settings.model);
    println!();
    println!("Tool permissions start disabled. Edit settings.json to enable");
    println!("file_operations / shell_commands, then run `anvil chat`.");
    Ok(())
}
