//! CLI command definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CLI arguments for parley
#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(author, version, about = "Turn-based debates between LLM personas, steered by you")]
#[command(long_about = r#"
Parley runs a turn-based debate between LLM personas. Each agent speaks in
turn; a round ends when every agent has spoken once. As the director you can
pause the exchange and inject weighted instructions that shape the next turn.

Configuration files are loaded from (in priority order):
1. PARLEY_* environment variables (e.g. PARLEY_DEBATE__MAX_ROUNDS=4)
2. --config <path>     Explicit config file
3. ./parley.toml       Project-level config
4. ~/.config/parley/config.toml   Global config

Example:
  parley run --topic "Should cities ban cars?" --rounds 3
  parley live --topic "Is math discovered or invented?"
  parley live --resume debate.json
  parley roles
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Also write diagnostics to this file
    #[arg(long, value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Roles directory (overrides [roles] dir)
    #[arg(long, value_name = "DIR", global = true)]
    pub roles: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a debate to completion, pausing for the director between turns
    Run(RunArgs),
    /// Start the live director console
    Live(LiveArgs),
    /// List the roles in the role library
    Roles,
    /// Show configuration file locations and the merged configuration
    ShowConfig,
}

/// Options shared by `run` and `live`
#[derive(Args, Debug, Clone, Default)]
pub struct DebateArgs {
    /// Debate topic (overrides [debate] topic)
    #[arg(short, long)]
    pub topic: Option<String>,

    /// Maximum number of rounds (overrides [debate] max_rounds)
    #[arg(short, long)]
    pub rounds: Option<u32>,

    /// Delay between turns in milliseconds (overrides [pacing] turn_delay_ms)
    #[arg(short, long, value_name = "MS")]
    pub delay: Option<u64>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub debate: DebateArgs,

    /// Never stop for director input between turns
    #[arg(long)]
    pub no_interactive: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct LiveArgs {
    #[command(flatten)]
    pub debate: DebateArgs,

    /// Continue from a saved snapshot instead of starting fresh
    #[arg(long, value_name = "PATH")]
    pub resume: Option<PathBuf>,
}
