//! `anvil status` — Show workspace settings.

use anvil_config::WorkspaceConfig;

pub async fn run() -> anyhow::Result<()> {
    let config = WorkspaceConfig::current_dir()?;
    let settings = config.load_settings().map_err(|e| {
        anyhow::anyhow!("{e}. Run `anvil onboard` to initialize this workspace.")
    })?;

    let flag = |on: bool| if on { "enabled" } else { "disabled" };
    println!("Workspace: {}", config.workspace_dir().display());
    println!("Model:     {}", settings.model);
    println!("Permissions:");
    println!("  file_operations: {}", flag(settings.permissions.allow_file_operations));
    println!("  shell_commands:  {}", flag(settings.permissions.allow_shell_commands));
    println!("  network_access:  {}", flag(settings.permissions.allow_network_access));
    println!("Created:   {}", settings.created_at.format("%Y-%m-%d %H:%M UTC"));
    println!("Updated:   {}", settings.last_updated.format("%Y-%m-%d %H:%M UTC"));
    Ok(())
}
