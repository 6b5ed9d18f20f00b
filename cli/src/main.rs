//! CLI entrypoint for parley
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use parley_application::{
    CompletionDispatcher, DebateController, DebateProgressNotifier, DebateSettings,
    DirectorInput, NoTurnLogger, NonInteractive, RunDebateInput, RunDebateUseCase,
    SnapshotStore, StopReason, TurnLogger,
};
use parley_domain::{AgentConfig, DebateState, TurnScheduler, preview};
use parley_infrastructure::{
    ConfigError, ConfigLoader, FileConfig, JsonFileSnapshotStore, JsonlTurnLogger,
    OpenRouterClient, RoleLibrary,
};
use parley_presentation::{
    Cli, Command, ConsoleFormatter, ConsoleRenderer, DebateArgs, DebateProgressReporter, DirectorConsole, LiveArgs,
    RunArgs, SimpleProgress, StdinDirector, spawn_stdin_lines,
};
use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_tracing(cli.verbose, cli.log_file.as_deref())?;

    info!("Starting parley");

    let config = ConfigLoader::load(cli.config.as_ref()).map_err(ConfigError::from)?;
    for issue in config.validate().iter().filter(|i| !i.is_error()) {
        warn!("{}", issue);
    }

    let roles_dir = cli.roles.clone().unwrap_or_else(|| config.roles.dir.clone());
    let library = RoleLibrary::new(roles_dir);

    match cli.command {
        Command::ShowConfig => show_config(&config, cli.config.as_ref()),
        Command::Roles => list_roles(&library),
        Command::Run(args) => run_batch(&config, &library, args).await,
        Command::Live(args) => run_live(&config, &library, args).await,
    }
}

/// Stderr logging filtered by `-v`, plus an optional file.
fn init_tracing(verbose: u8, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let name = path
                .file_name()
                .with_context(|| format!("--log-file {} has no file name", path.display()))?;
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Could not create log directory {}", dir.display()))?;
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(file_layer)
        .init();

    Ok(guard)
}

fn show_config(config: &FileConfig, explicit: Option<&PathBuf>) -> Result<()> {
    ConfigLoader::print_config_sources(explicit);
    println!();
    println!("{}", toml::to_string_pretty(config)?);

    let issues = config.validate();
    if issues.is_empty() {
        println!("Configuration is valid.");
    } else {
        for issue in &issues {
            println!("{}", issue);
        }
    }
    Ok(())
}

fn list_roles(library: &RoleLibrary) -> Result<()> {
    library.ensure_dir()?;
    let roles = library.load_all()?;
    if roles.is_empty() {
        println!("No roles in {}. Add <id>.txt files there.", library.dir().display());
        return Ok(());
    }
    println!("Roles in {}:", library.dir().display());
    for role in roles {
        println!("  {:<16} {:<24} {}", role.id, role.name, preview(&role.system_prompt, 50));
    }
    Ok(())
}

/// Roster from `[[agents]]`, or every role in the library when none are configured.
fn resolve_roster(config: &FileConfig, library: &RoleLibrary) -> Result<Vec<AgentConfig>> {
    if !config.agents.is_empty() {
        return Ok(config.resolve_agents(library)?);
    }
    let agents = library
        .load_all()?
        .into_iter()
        .map(|role| role.into_agent(&config.provider.default_model))
        .collect::<Result<Vec<_>, _>>()?;
    if agents.is_empty() {
        bail!(
            "No agents: add [[agents]] to the config or role files to {}",
            library.dir().display()
        );
    }
    Ok(agents)
}

fn build_settings(config: &FileConfig, args: &DebateArgs) -> Result<DebateSettings> {
    config.ensure_valid()?;
    let mut settings = config.to_settings()?;
    if let Some(ms) = args.delay {
        settings = settings.with_turn_delay(Duration::from_millis(ms));
    }
    Ok(settings)
}

fn build_scheduler(
    config: &FileConfig,
    library: &RoleLibrary,
    args: &DebateArgs,
) -> Result<TurnScheduler> {
    let Some(topic) = args.topic.clone().or_else(|| config.debate.topic.clone()) else {
        bail!("No topic: pass --topic or set [debate] topic");
    };
    let rounds = args.rounds.unwrap_or(config.debate.max_rounds);
    let agents = resolve_roster(config, library)?;
    Ok(TurnScheduler::new(topic, agents, rounds)?)
}

fn build_dispatcher(config: &FileConfig) -> Result<CompletionDispatcher> {
    let client = OpenRouterClient::new(config.provider_config())
        .context("Could not create the completion client")?;
    Ok(CompletionDispatcher::new(Arc::new(client)))
}

fn build_turn_logger(config: &FileConfig) -> Arc<dyn TurnLogger> {
    match config.logging.turn_log.as_ref().and_then(JsonlTurnLogger::new) {
        Some(logger) => {
            info!(path = %logger.path().display(), "Logging turns");
            Arc::new(logger)
        }
        None => Arc::new(NoTurnLogger),
    }
}

/// Cancel `token` on the first Ctrl+C.
fn cancel_on_ctrl_c(token: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted; finishing up.");
            token.cancel();
        }
    });
}

async fn run_batch(config: &FileConfig, library: &RoleLibrary, args: RunArgs) -> Result<()> {
    let settings = build_settings(config, &args.debate)?;
    let scheduler = build_scheduler(config, library, &args.debate)?;

    let director: Arc<dyn DirectorInput> = if args.no_interactive {
        Arc::new(NonInteractive)
    } else {
        Arc::new(StdinDirector::new())
    };

    let cancellation = CancellationToken::new();
    cancel_on_ctrl_c(cancellation.clone());

    let use_case = RunDebateUseCase::new(build_dispatcher(config)?)
        .with_turn_logger(build_turn_logger(config))
        .with_director(director)
        .with_cancellation(cancellation);

    let progress: Box<dyn DebateProgressNotifier> = if std::io::stdout().is_terminal() {
        Box::new(DebateProgressReporter::new())
    } else {
        Box::new(SimpleProgress)
    };

    let output = use_case
        .execute_with_progress(RunDebateInput::new(scheduler, settings), progress.as_ref())
        .await?;

    println!();
    println!(
        "Debate stopped ({}): {} turns, {} failed, {} rounds completed.",
        output.stop_reason,
        output.turns_succeeded,
        output.turns_failed,
        output.state.rounds_completed
    );
    if output.stop_reason == StopReason::Cancelled {
        info!("Run cancelled by user");
    }
    if let Some(path) = &config.logging.turn_log {
        println!("Turns appended to {}", path.display());
    }
    Ok(())
}

async fn run_live(config: &FileConfig, library: &RoleLibrary, args: LiveArgs) -> Result<()> {
    let settings = build_settings(config, &args.debate)?;
    let store = Arc::new(JsonFileSnapshotStore);

    let scheduler = match &args.resume {
        Some(path) => {
            let state = store
                .load(path)
                .with_context(|| format!("Could not resume from {}", path.display()))?;
            info!(path = %path.display(), messages = state.history.len(), "Resuming debate");
            TurnScheduler::from_state(state)?
        }
        None => build_scheduler(config, library, &args.debate)?,
    };

    print!("{}", ConsoleFormatter::header(scheduler.state()));
    DirectorConsole::print_help();

    let agents = scheduler.state().agents.clone();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let controller = DebateController::new(scheduler, build_dispatcher(config)?, settings, events_tx)?
        .with_turn_logger(build_turn_logger(config))
        .with_snapshot_store(store);
    let handle = controller.handle();

    let renderer = tokio::spawn(ConsoleRenderer::new(agents).run(events_rx));
    tokio::spawn(DirectorConsole::new(handle.clone()).run(spawn_stdin_lines()));

    let stopper = handle.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = stopper.stop();
        }
    });

    handle.start()?;
    let state = controller.run().await;
    // The controller dropped its event sender; let the renderer drain.
    let _ = renderer.await;

    print_summary(&state);
    Ok(())
}

fn print_summary(state: &DebateState) {
    println!();
    println!(
        "Debate {}: {} messages, {} of {} rounds.",
        state.status, state.history.len(), state.rounds_completed, state.max_rounds
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_infrastructure::FileAgentEntry;

    fn entry(id: &str) -> FileAgentEntry {
        FileAgentEntry {
            id: Some(id.into()),
            name: Some(id.to_uppercase()),
            system_prompt: Some("Argue.".into()),
            ..FileAgentEntry::default()
        }
    }

    #[test]
    fn cli_topic_and_rounds_override_config() {
        let mut config = FileConfig::default();
        config.debate.topic = Some("From config".into());
        config.agents = vec![entry("pro"), entry("con")];
        let library = RoleLibrary::new("roles");

        let args = DebateArgs {
            topic: Some("From flag".into()),
            rounds: Some(2),
            delay: None,
        };
        let scheduler = build_scheduler(&config, &library, &args).unwrap();
        assert_eq!(scheduler.state().topic, "From flag");
        assert_eq!(scheduler.state().max_rounds, 2);

        let scheduler = build_scheduler(&config, &library, &DebateArgs::default()).unwrap();
        assert_eq!(scheduler.state().topic, "From config");
        assert_eq!(scheduler.state().max_rounds, 50);
    }

    #[test]
    fn missing_topic_is_an_error() {
        let mut config = FileConfig::default();
        config.agents = vec![entry("pro")];
        let err = build_scheduler(&config, &RoleLibrary::new("roles"), &DebateArgs::default())
            .unwrap_err();
        assert!(err.to_string().contains("No topic"));
    }

    #[test]
    fn empty_roster_falls_back_to_role_library() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("skeptic.txt"), "Doubt everything.").unwrap();
        let config = FileConfig::default();
        let agents = resolve_roster(&config, &RoleLibrary::new(dir.path())).unwrap();
        assert_eq!(agents.len(), 1);
        assert_eq!(agents[0].name(), "Skeptic");

        let empty = tempfile::tempdir().unwrap();
        assert!(resolve_roster(&config, &RoleLibrary::new(empty.path())).is_err());
    }

    #[test]
    fn delay_flag_overrides_pacing() {
        let config = FileConfig::default();
        let args = DebateArgs {
            delay: Some(4000),
            ..DebateArgs::default()
        };
        let settings = build_settings(&config, &args).unwrap();
        assert_eq!(settings.pacing.turn_delay(), Duration::from_millis(4000));
        assert!(settings.pacing.settle_delay() < settings.pacing.turn_delay());
    }
}
