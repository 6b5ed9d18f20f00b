//! Run Debate use case
//!
//! The batch loop: one turn after another until the configured rounds are
//! done, the director quits, replies start repeating, or the run is
//! cancelled. Failed turns are logged and skipped rather than pausing.

use crate::config::DebateSettings;
use crate::ports::completion::CompletionRequest;
use crate::ports::director_input::{DirectorDecision, DirectorInput, NonInteractive};
use crate::ports::progress::{DebateProgressNotifier, NoProgress};
use crate::ports::turn_log::{NoTurnLogger, TurnLogger, TurnRecord};
use crate::use_cases::dispatch::{CompletionDispatcher, DispatchError};
use parley_domain::{
    AgentConfig, DebateState, DebateStatus, DomainError, Message, TurnAdvance, TurnPrompt,
    TurnScheduler,
};
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Reply recorded for the human seat when the director enters nothing.
pub const HUMAN_SKIPPED: &str = "(user skipped)";

/// Errors that end a batch run before its first turn
#[derive(Error, Debug)]
pub enum RunDebateError {
    #[error("Cannot start debate: {0}")]
    Start(#[from] DomainError),
}

/// Why the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Completed,
    Cancelled,
    Repetition,
    DirectorQuit,
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Completed => "completed",
            StopReason::Cancelled => "cancelled",
            StopReason::Repetition => "repetition",
            StopReason::DirectorQuit => "director quit",
        }
    }
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for the RunDebate use case
#[derive(Debug, Clone)]
pub struct RunDebateInput {
    pub scheduler: TurnScheduler,
    pub settings: DebateSettings,
}

impl RunDebateInput {
    pub fn new(scheduler: TurnScheduler, settings: DebateSettings) -> Self {
        Self {
            scheduler,
            settings,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunDebateOutput {
    pub state: DebateState,
    pub turns_succeeded: usize,
    pub turns_failed: usize,
    pub stop_reason: StopReason,
}

/// Use case for running a debate without a live director console
pub struct RunDebateUseCase {
    dispatcher: CompletionDispatcher,
    turn_logger: Arc<dyn TurnLogger>,
    director: Arc<dyn DirectorInput>,
    cancellation: CancellationToken,
}

impl RunDebateUseCase {
    pub fn new(dispatcher: CompletionDispatcher) -> Self {
        Self {
            dispatcher,
            turn_logger: Arc::new(NoTurnLogger),
            director: Arc::new(NonInteractive),
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_turn_logger(mut self, logger: Arc<dyn TurnLogger>) -> Self {
        self.turn_logger = logger;
        self
    }

    /// Consult a director between turns.
    pub fn with_director(mut self, director: Arc<dyn DirectorInput>) -> Self {
        self.director = director;
        self
    }

    /// Set a cancellation token for graceful interruption.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub async fn execute(&self, input: RunDebateInput) -> Result<RunDebateOutput, RunDebateError> {
        self.execute_with_progress(input, &NoProgress).await
    }

    pub async fn execute_with_progress(
        &self,
        input: RunDebateInput,
        progress: &dyn DebateProgressNotifier,
    ) -> Result<RunDebateOutput, RunDebateError> {
        let RunDebateInput {
            mut scheduler,
            settings,
        } = input;

        scheduler.start()?;
        info!(
            topic = %scheduler.state().topic,
            agents = scheduler.state().agents.len(),
            max_rounds = scheduler.state().max_rounds,
            "Starting batch debate"
        );
        progress.on_debate_start(scheduler.state());

        let mut turns_succeeded = 0;
        let mut turns_failed = 0;
        let mut announced_round = 0;

        let stop_reason = loop {
            if self.cancellation.is_cancelled() {
                break StopReason::Cancelled;
            }
            if scheduler.status() == DebateStatus::Completed {
                break StopReason::Completed;
            }
            let Some(agent) = scheduler.current_agent().cloned() else {
                break StopReason::Completed;
            };

            let round = scheduler.state().current_round();
            if round != announced_round {
                progress.on_round_start(round, scheduler.state().max_rounds);
                announced_round = round;
            }
            progress.on_turn_start(&agent, round);

            let reply = self.take_turn(&scheduler, &agent, &settings).await;

            let message = match reply {
                Ok(content) if agent.is_human() => Message::from_human(&agent, content),
                Ok(content) => Message::from_agent(&agent, content),
                Err(e) => {
                    warn!(agent = agent.name(), round, error = %e, "Turn failed; moving on");
                    self.turn_logger
                        .log(&TurnRecord::failure(round, &agent, &e.to_string()));
                    progress.on_turn_failed(&agent, &e.to_string());
                    turns_failed += 1;
                    scheduler.advance_turn();
                    continue;
                }
            };

            self.turn_logger
                .log(&TurnRecord::reply(round, &agent, &message));
            scheduler.append_message(message);
            if let Some(message) = scheduler.history().last() {
                progress.on_turn_complete(&agent, message);
            }
            turns_succeeded += 1;

            if let Some(repeats) = settings.repetition.check(scheduler.history()) {
                info!(repeats, "Replies are repeating; stopping");
                progress.on_repetition(repeats);
                scheduler.advance_turn();
                break StopReason::Repetition;
            }

            if scheduler.advance_turn() == TurnAdvance::Completed {
                break StopReason::Completed;
            }

            match self.director.after_turn().await {
                DirectorDecision::Continue => {}
                DirectorDecision::Inject { content, weight } => {
                    let round = scheduler.state().current_round();
                    let injected = scheduler.inject_message(content, weight);
                    info!(weight = %weight, "Director injection");
                    self.turn_logger.log(&TurnRecord::injection(round, injected));
                    progress.on_injection(injected);
                }
                DirectorDecision::Quit => break StopReason::DirectorQuit,
            }

            let delay = settings.pacing.turn_delay();
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = self.cancellation.cancelled() => break StopReason::Cancelled,
            }
        };

        info!(
            %stop_reason,
            turns_succeeded,
            turns_failed,
            rounds_completed = scheduler.state().rounds_completed,
            "Batch debate finished"
        );

        Ok(RunDebateOutput {
            state: scheduler.into_state(),
            turns_succeeded,
            turns_failed,
            stop_reason,
        })
    }

    /// Produce the reply for the current seat: the director for the human
    /// seat, the completion service otherwise.
    async fn take_turn(
        &self,
        scheduler: &TurnScheduler,
        agent: &AgentConfig,
        settings: &DebateSettings,
    ) -> Result<String, DispatchError> {
        if agent.is_human() {
            let line = self.director.human_turn(agent).await;
            return Ok(line
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| HUMAN_SKIPPED.to_string()));
        }

        let state = scheduler.state();
        let prompt = TurnPrompt::batch(
            agent,
            &state.topic,
            &state.history,
            settings.batch_history_window,
        );
        debug!(agent = agent.name(), "Requesting batch turn");
        let request = CompletionRequest::for_turn(agent, &prompt);
        self.dispatcher
            .dispatch_with_retry(request, &settings.retry, None)
            .await
    }
}
