//! `anvil chat` — Interactive or single-message chat mode.

use crate::hosts::{
    CommandHandler, ConversationStore, StdinPlanModeHost, StdinQuestionHost, SubagentEcho,
    ToolEcho,
};
use anvil_agent::{AgentLoop, TaskTool};
use anvil_config::{ConfigError, WorkspaceConfig, WorkspaceSettings};
use anvil_core::hooks::SlashCommandHost;
use anvil_core::tool::ToolRegistry;
use anvil_providers::{OpenAiCompatFactory, OpenAiCompatProvider};
use anvil_tools::{
    AskUserQuestionTool, BashTool, EditTool, EnterPlanModeTool, ExitPlanModeTool, PlanMode,
    ReadTool, SlashCommandTool, WriteTool,
};
use std::path::PathBuf;
use std::sync::Arc;

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// Provider calls per turn before the loop soft-stops.
const MAX_ITERATIONS: u32 = 10;

pub async fn run(message: Option<String>) -> anyhow::Result<()> {
    let config = Arc::new(WorkspaceConfig::current_dir()?);

    // First run in this directory: create .anvil/ with defaults.
    config.initialize_workspace()?;
    let settings = match config.load_settings() {
        Ok(settings) => settings,
        Err(ConfigError::NotFound(_)) => {
            let mut settings = WorkspaceSettings::default();
            config.save_settings(&mut settings)?;
            settings
        }
        Err(e) => return Err(e.into()),
    };

    let Ok(api_key) = std::env::var("OPENAI_API_KEY") else {
        eprintln!();
        eprintln!("  ERROR: No API key configured!");
        eprintln!();
        eprintln!("  Set the environment variable:");
        eprintln!("    export OPENAI_API_KEY='sk-...'");
        eprintln!();
        anyhow::bail!("No API key found. See above for setup instructions.");
    };

    let workspace_root = config
        .workspace_dir()
        .canonicalize()
        .unwrap_or_else(|_| config.workspace_dir().to_path_buf());

    let provider = Arc::new(OpenAiCompatProvider::new(
        "openai",
        OPENAI_BASE_URL,
        &api_key,
    )?);

    let command_handler = Arc::new(CommandHandler::new(config.clone(), settings.model.clone()));
    let registry = build_registry(
        &workspace_root,
        &api_key,
        &settings.model,
        command_handler.clone(),
    );

    let mut agent = AgentLoop::new(
        provider,
        &settings.model,
        anvil_agent::prompts::SYSTEM_PROMPT_BASE,
    )
    .with_tools(Arc::new(registry), settings.permissions)
    .with_conversation_listener(Arc::new(ConversationStore::new(&config)))
    .with_tool_call_listener(Arc::new(ToolEcho));

    match message {
        Some(message) => {
            let response = agent.chat(&message, MAX_ITERATIONS).await?;
            println!("{response}");
            Ok(())
        }
        None => repl(&mut agent, command_handler).await,
    }
}

/// The root agent's full toolset: workspace tools, interactive tools,
/// and task dispatch. Subagents get restricted subsets of this via the
/// factory — never the task tool.
fn build_registry(
    workspace_root: &PathBuf,
    api_key: &str,
    model: &str,
    command_handler: Arc<CommandHandler>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    let read_tool = Arc::new(ReadTool::new(workspace_root));
    registry.register(read_tool.clone());
    registry.register(Arc::new(WriteTool::new(workspace_root)));
    registry.register(Arc::new(EditTool::new(read_tool)));
    registry.register(Arc::new(BashTool::new(workspace_root)));

    registry.register(Arc::new(AskUserQuestionTool::new(Some(Arc::new(
        StdinQuestionHost,
    )))));

    let plan_mode = PlanMode::new();
    let plan_host = Arc::new(StdinPlanModeHost);
    registry.register(Arc::new(EnterPlanModeTool::new(
        plan_mode.clone(),
        Some(plan_host.clone()),
    )));
    registry.register(Arc::new(ExitPlanModeTool::new(plan_mode, Some(plan_host))));

    registry.register(Arc::new(SlashCommandTool::new(Some(command_handler))));

    let provider_factory = Arc::new(OpenAiCompatFactory::new(
        "openai",
        OPENAI_BASE_URL,
        api_key,
        model,
    ));
    registry.register(Arc::new(TaskTool::new(
        provider_factory,
        workspace_root,
        false,
        Some(Arc::new(SubagentEcho)),
    )));

    registry
}

async fn repl(agent: &mut AgentLoop, command_handler: Arc<CommandHandler>) -> anyhow::Result<()> {
    println!("Anvil — type a message, /help for commands, /exit to leave.");

    loop {
        print!("\n> ");
        use std::io::Write;
        std::io::stdout().flush()?;

        let line = tokio::task::spawn_blocking(|| {
            let mut line = String::new();
            std::io::stdin().read_line(&mut line).map(|n| (n, line))
        })
        .await??;

        // EOF ends the session like /exit.
        let (bytes_read, line) = line;
        if bytes_read == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(command) = line.strip_prefix('/') {
            match command.split_whitespace().next().unwrap_or_default() {
                "exit" | "quit" => break,
                "clear" => {
                    agent.clear_history();
                    println!("Conversation history cleared.");
                }
                _ => match command_handler.run(line).await {
                    Ok(output) => println!("{output}"),
                    Err(e) => println!("{e}\n{}", CommandHandler::help_text()),
                },
            }
            continue;
        }

        match agent.chat(line, MAX_ITERATIONS).await {
            Ok(response) => println!("\n{response}"),
            Err(e) => eprintln!("Error: {e}"),
        }
    }

    println!("Goodbye.");
    Ok(())
}
