use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use uuid::Uuid;

use crate::allocator::{allocate, plan_name};
use crate::config::{
    CliOverrides, Config, Settings, config_path, load_config, resolve, save_config,
};
use crate::models::PROMPT_FILE;
use crate::render::render;
use crate::session::{
    LaunchOptions, SessionMode, continue_session, find_latest_session, find_session, launch,
    save_chat, session_info,
};
use crate::telemetry::init_logging;
use crate::utils::{Environment, format_path_with_tilde};

#[derive(Parser)]
#[command(name = "newprompt")]
#[command(version = "0.1.0")]
#[command(about = "Create prompt history directories for Claude Code sessions", long_about = None)]
pub struct Cli {
    /// Base directory for prompt history
    #[arg(long, global = true, value_name = "DIR")]
    pub history_dir: Option<PathBuf>,

    /// Directory the assistant writes session logs into
    #[arg(long, global = true, value_name = "DIR")]
    pub projects_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new prompt directory
    New {
        /// Keywords describing the prompt topic
        #[arg(required = true)]
        keywords: Vec<String>,

        /// Override the auto-detected sequence number
        #[arg(long)]
        seq: Option<u32>,

        /// Launch Claude Code after creating the directory
        #[arg(long, conflicts_with = "no_launch")]
        launch: bool,

        /// Do not launch, even if the config says to always launch
        #[arg(long)]
        no_launch: bool,

        /// Print what would be created without creating it
        #[arg(long)]
        dry_run: bool,
    },
    /// Copy chat history for a session into a prompt directory
    SaveChat { session_id: Uuid, prompt_dir: PathBuf },
    /// Render a chat history JSONL file as Markdown
    Render {
        jsonl: PathBuf,

        /// Write to a file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Resume a session by directory name, session id, or keyword
    Resume { query: String },
    /// Add the next prompt file to a session directory
    Continue {
        /// Session directory (defaults to the running or latest session)
        #[arg(long, value_name = "DIR")]
        session_dir: Option<PathBuf>,

        /// Prompt text; a blank template is written when omitted
        #[arg(long, default_value = "")]
        text: String,
    },
    /// Show the prompts and plans of a session directory
    Info {
        /// Session directory (defaults to the running or latest session)
        #[arg(long, value_name = "DIR")]
        session_dir: Option<PathBuf>,
    },
    /// Show or change persisted settings
    Config {
        #[arg(long, value_name = "BOOL")]
        always_launch: Option<bool>,

        #[arg(long, value_name = "BOOL")]
        skip_permissions: Option<bool>,

        #[arg(long, value_name = "DIR")]
        default_history_dir: Option<PathBuf>,

        #[arg(long, value_name = "COMMAND")]
        claude_command: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let Some(command) = &cli.command else {
        println!("Use --help for usage information");
        return Ok(());
    };

    let env = Environment::capture()?;
    let overrides = CliOverrides {
        history_dir: cli.history_dir.clone(),
        projects_dir: cli.projects_dir.clone(),
        config: cli.config.clone(),
    };
    let config_file = config_path(&overrides, &env)?;
    let config = load_config(&config_file)?;

    // Resolved on demand; `render` and `config` must work without a resolvable HOME
    let settings = || resolve(&overrides, &env, &config, &config_file);

    match command {
        Commands::New { keywords, seq, launch, no_launch, dry_run } => {
            let settings = settings()?;
            let should_launch = *launch || (settings.always_launch && !*no_launch);
            new_prompt(&settings, keywords, *seq, should_launch, *dry_run)
        }
        Commands::SaveChat { session_id, prompt_dir } => {
            let settings = settings()?;
            let saved = save_chat(&session_id.to_string(), prompt_dir, &settings.projects_dir)?;
            print_saved(&saved.jsonl_path, &saved.markdown_path, saved.bytes);
            Ok(())
        }
        Commands::Render { jsonl, output } => render_file(jsonl, output.as_deref()),
        Commands::Resume { query } => resume(&settings()?, query),
        Commands::Continue { session_dir, text } => {
            let dir = target_session(&settings()?, session_dir.as_deref())?;
            let prompt = continue_session(&dir, text)?;
            let name = dir.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            println!("Continuation prompt created: {}", prompt.prompt_path.display());
            println!("Plan saves to: {}", prompt.plan_path.display());
            println!();
            println!("This is prompt #{} in session: {}", prompt.index, name);
            Ok(())
        }
        Commands::Info { session_dir } => {
            let dir = target_session(&settings()?, session_dir.as_deref())?;
            let info = session_info(&dir)?;
            println!("Session: {}", info.name);
            println!("Directory: {}", format_path_with_tilde(&info.dir, env.home.as_deref()));
            println!("Prompts ({}): {}", info.prompts.len(), info.prompts.join(", "));
            println!("Plans ({}): {}", info.plans.len(), info.plans.join(", "));
            println!("Next prompt index: {}", info.next_prompt_index);
            Ok(())
        }
        Commands::Config {
            always_launch,
            skip_permissions,
            default_history_dir,
            claude_command,
        } => {
            let update = ConfigUpdate {
                always_launch: *always_launch,
                skip_permissions: *skip_permissions,
                history_dir: default_history_dir.clone(),
                claude_command: claude_command.clone(),
            };
            configure(&config_file, config.clone(), update)
        }
    }
}

fn new_prompt(
    settings: &Settings,
    keywords: &[String],
    seq: Option<u32>,
    should_launch: bool,
    dry_run: bool,
) -> Result<()> {
    let today = Local::now().date_naive();

    if dry_run {
        let name = plan_name(&settings.history_dir, today, seq, keywords)?;
        let dir = settings.history_dir.join(name.to_string());
        println!("Would create: {}", dir.display());
        println!("Would write:  {}", dir.join(PROMPT_FILE).display());
        return Ok(());
    }

    let session_id = should_launch.then(Uuid::new_v4);
    let dir = allocate(&settings.history_dir, today, seq, keywords, session_id)?;
    let prompt_path = dir.prompt_path();

    println!("Created: {}", dir.path.display());
    println!("Prompt:  {}", prompt_path.display());
    println!();
    println!("Edit your prompt:");
    println!("  vim {}", prompt_path.display());

    if let Some(session_id) = session_id {
        println!();
        run_session(settings, &dir.path, &session_id.to_string(), SessionMode::New)?;
    }

    Ok(())
}

fn resume(settings: &Settings, query: &str) -> Result<()> {
    let Some(found) = find_session(query, &settings.history_dir)? else {
        bail!("No session found matching '{}' in {}", query, settings.history_dir.display());
    };

    println!("Resuming session {} ({})", found.session_id, found.dir.display());
    run_session(settings, &found.dir, &found.session_id, SessionMode::Resume)
}

fn run_session(settings: &Settings, dir: &Path, session_id: &str, mode: SessionMode) -> Result<()> {
    let options = LaunchOptions {
        command: settings.claude_command.clone(),
        skip_permissions: settings.skip_permissions,
        projects_dir: settings.projects_dir.clone(),
        marker_path: Some(settings.marker_path.clone()),
    };

    println!("Launching Claude Code with session ID: {}", session_id);
    println!("Prompt directory: {}", dir.display());
    println!("After the session, run: newprompt save-chat {} {}", session_id, dir.display());
    println!();

    let outcome = launch(dir, session_id, mode, &options)?;

    match outcome.saved {
        Some(saved) => print_saved(&saved.jsonl_path, &saved.markdown_path, saved.bytes),
        None => {
            println!();
            println!("Note: Chat history file not found. You can manually save it later:");
            println!("  newprompt save-chat {} {}", session_id, dir.display());
        }
    }

    Ok(())
}

fn render_file(jsonl: &Path, output: Option<&Path>) -> Result<()> {
    let markdown = render(jsonl)?;
    match output {
        Some(path) => {
            fs::write(path, markdown)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Markdown chat history: {}", path.display());
        }
        None => print!("{}", markdown),
    }
    Ok(())
}

/// The explicit session directory, or the running/latest one
fn target_session(settings: &Settings, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(dir) = explicit {
        return Ok(dir.to_path_buf());
    }
    find_latest_session(&settings.history_dir, Some(settings.marker_path.as_path())).context(
        "No active session found. Create one with `newprompt new` or pass --session-dir",
    )
}

/// Values given to the `config` subcommand; `None` leaves the stored value alone
struct ConfigUpdate {
    always_launch: Option<bool>,
    skip_permissions: Option<bool>,
    history_dir: Option<PathBuf>,
    claude_command: Option<String>,
}

fn configure(path: &Path, mut config: Config, update: ConfigUpdate) -> Result<()> {
    let mut changed = false;
    if let Some(value) = update.always_launch {
        config.always_launch = value;
        changed = true;
    }
    if let Some(value) = update.skip_permissions {
        config.skip_permissions = value;
        changed = true;
    }
    if let Some(dir) = update.history_dir {
        config.history_dir = Some(dir);
        changed = true;
    }
    if let Some(command) = update.claude_command {
        config.claude_command = Some(command);
        changed = true;
    }

    if changed {
        save_config(&config, path)?;
        println!("Saved config to {}", path.display());
    }

    println!("{}", serde_json::to_string_pretty(&config).context("Failed to serialize config")?);
    Ok(())
}

fn print_saved(jsonl: &Path, markdown: &Path, bytes: u64) {
    let size_mb = bytes as f64 / (1024.0 * 1024.0);
    println!("Chat history copied to: {} ({:.1} MB)", jsonl.display(), size_mb);
    println!("Markdown chat history: {}", markdown.display());
}
