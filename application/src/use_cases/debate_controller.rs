//! Interactive debate controller.
//!
//! [`DebateController`] owns the [`TurnScheduler`] and is the only code that
//! mutates it. Everything that can change the session (director commands,
//! dispatch results, pacing triggers) arrives as a [`ControllerEvent`] on
//! one queue and is handled in order, so no two mutations ever race.
//!
//! Rendering happens elsewhere: the controller emits [`DebateEvent`]s and
//! never waits for anyone to read them.

mod timer;

pub use timer::Trigger;

use crate::config::DebateSettings;
use crate::ports::completion::CompletionRequest;
use crate::ports::debate_event::DebateEvent;
use crate::ports::snapshot::SnapshotStore;
use crate::ports::turn_log::{NoTurnLogger, TurnLogger, TurnRecord};
use crate::use_cases::dispatch::{CompletionDispatcher, DispatchEvent, TurnTicket};
use parley_domain::{
    AgentConfig, DebateState, DebateStatus, InfluenceWeight, Message, TurnAdvance, TurnPrompt,
    TurnScheduler,
};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use timer::NextTurnTimer;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum ControllerError {
    #[error("Human seat '{0}' is only supported in batch mode")]
    HumanSeat(String),

    #[error("Controller has stopped")]
    Closed,
}

/// Director intents.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorCommand {
    Start,
    Pause,
    Resume,
    Inject { content: String, weight: f64 },
    Save(PathBuf),
    Stop,
}

/// Everything the controller reacts to.
#[derive(Debug)]
pub enum ControllerEvent {
    Command(DirectorCommand),
    Dispatch(DispatchEvent),
    Trigger(Trigger),
}

impl From<DispatchEvent> for ControllerEvent {
    fn from(event: DispatchEvent) -> Self {
        ControllerEvent::Dispatch(event)
    }
}

impl From<Trigger> for ControllerEvent {
    fn from(trigger: Trigger) -> Self {
        ControllerEvent::Trigger(trigger)
    }
}

/// Cloneable sender for director commands.
#[derive(Clone)]
pub struct DirectorHandle {
    tx: mpsc::UnboundedSender<ControllerEvent>,
}

impl DirectorHandle {
    pub fn send(&self, command: DirectorCommand) -> Result<(), ControllerError> {
        self.tx
            .send(ControllerEvent::Command(command))
            .map_err(|_| ControllerError::Closed)
    }

    pub fn start(&self) -> Result<(), ControllerError> {
        self.send(DirectorCommand::Start)
    }

    pub fn pause(&self) -> Result<(), ControllerError> {
        self.send(DirectorCommand::Pause)
    }

    pub fn resume(&self) -> Result<(), ControllerError> {
        self.send(DirectorCommand::Resume)
    }

    pub fn inject(&self, content: impl Into<String>, weight: f64) -> Result<(), ControllerError> {
        self.send(DirectorCommand::Inject {
            content: content.into(),
            weight,
        })
    }

    pub fn save(&self, path: impl Into<PathBuf>) -> Result<(), ControllerError> {
        self.send(DirectorCommand::Save(path.into()))
    }

    pub fn stop(&self) -> Result<(), ControllerError> {
        self.send(DirectorCommand::Stop)
    }
}

struct InFlightTurn {
    ticket: TurnTicket,
    agent: AgentConfig,
    round: u32,
    /// Injection shaded into this turn's prompt
    injection: Option<Message>,
}

pub struct DebateController {
    scheduler: TurnScheduler,
    dispatcher: CompletionDispatcher,
    settings: DebateSettings,
    turn_logger: Arc<dyn TurnLogger>,
    snapshots: Option<Arc<dyn SnapshotStore>>,
    /// Outbound notifications for the presentation layer
    events: mpsc::UnboundedSender<DebateEvent>,
    tx: mpsc::UnboundedSender<ControllerEvent>,
    rx: mpsc::UnboundedReceiver<ControllerEvent>,
    timer: NextTurnTimer<ControllerEvent>,
    /// Held between a completed turn and its pacing trigger
    delay_lock: bool,
    in_flight: Option<InFlightTurn>,
    /// An injection arrived while a turn was in flight
    injected_during_flight: bool,
    /// Latest injection not yet answered by a completed turn
    pending_injection: Option<Message>,
    next_ticket: TurnTicket,
}

impl DebateController {
    pub fn new(
        scheduler: TurnScheduler,
        dispatcher: CompletionDispatcher,
        settings: DebateSettings,
        events: mpsc::UnboundedSender<DebateEvent>,
    ) -> Result<Self, ControllerError> {
        if let Some(human) = scheduler.state().agents.iter().find(|a| a.is_human()) {
            return Err(ControllerError::HumanSeat(human.name().to_string()));
        }

        // A resumed snapshot may end on an unanswered injection
        let pending_injection = if scheduler.last_is_injection() {
            scheduler.history().last().cloned()
        } else {
            None
        };

        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            scheduler,
            dispatcher,
            settings,
            turn_logger: Arc::new(NoTurnLogger),
            snapshots: None,
            events,
            timer: NextTurnTimer::new(tx.clone()),
            tx,
            rx,
            delay_lock: false,
            in_flight: None,
            injected_during_flight: false,
            pending_injection,
            next_ticket: TurnTicket::new(1),
        })
    }

    /// Set a turn logger for the append-only transcript.
    pub fn with_turn_logger(mut self, logger: Arc<dyn TurnLogger>) -> Self {
        self.turn_logger = logger;
        self
    }

    /// Enable `/save`.
    pub fn with_snapshot_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.snapshots = Some(store);
        self
    }

    pub fn handle(&self) -> DirectorHandle {
        DirectorHandle {
            tx: self.tx.clone(),
        }
    }

    pub fn state(&self) -> &DebateState {
        self.scheduler.state()
    }

    /// Process events until a `Stop` command, then return the final state.
    ///
    /// A turn still in flight at that point is abandoned.
    pub async fn run(mut self) -> DebateState {
        info!(
            topic = %self.scheduler.state().topic,
            agents = self.scheduler.state().agents.len(),
            "Debate controller started"
        );
        while let Some(event) = self.rx.recv().await {
            if !self.handle_event(event) {
                break;
            }
        }
        self.timer.cancel();
        info!(
            rounds = self.scheduler.state().rounds_completed,
            "Debate controller stopped"
        );
        self.scheduler.into_state()
    }

    /// Apply one event. Returns `false` when the controller should stop.
    fn handle_event(&mut self, event: ControllerEvent) -> bool {
        match event {
            ControllerEvent::Command(command) => return self.on_command(command),
            ControllerEvent::Dispatch(event) => self.on_dispatch(event),
            ControllerEvent::Trigger(trigger) => {
                if self.timer.accept(trigger) {
                    self.delay_lock = false;
                    self.trigger_next_turn();
                } else {
                    debug!(generation = trigger.generation, "Ignoring stale trigger");
                }
            }
        }
        true
    }

    fn on_command(&mut self, command: DirectorCommand) -> bool {
        match command {
            DirectorCommand::Start => match self.scheduler.start() {
                Ok(()) => {
                    self.emit_status();
                    self.trigger_next_turn();
                }
                Err(e) => self.notice(format!("Cannot start: {}", e)),
            },
            DirectorCommand::Pause => {
                if self.scheduler.pause() {
                    self.timer.cancel();
                    self.delay_lock = false;
                    self.emit_status();
                }
            }
            DirectorCommand::Resume => {
                if self.scheduler.resume() {
                    self.emit_status();
                    self.trigger_next_turn();
                }
            }
            DirectorCommand::Inject { content, weight } => self.on_injection(content, weight),
            DirectorCommand::Save(path) => self.save(path),
            DirectorCommand::Stop => return false,
        }
        true
    }

    fn on_injection(&mut self, content: String, weight: f64) {
        let weight = match InfluenceWeight::new(weight) {
            Ok(w) => w,
            Err(e) => {
                self.notice(format!("Injection rejected: {}", e));
                return;
            }
        };
        if content.trim().is_empty() {
            self.notice("Injection rejected: empty message".to_string());
            return;
        }
        if self.scheduler.status() == DebateStatus::Completed {
            self.notice("Injection rejected: the debate is over".to_string());
            return;
        }

        let round = self.scheduler.state().current_round();
        let message = self.scheduler.inject_message(content, weight).clone();
        info!(weight = %weight, "Director injection");
        self.turn_logger.log(&TurnRecord::injection(round, &message));
        self.emit(DebateEvent::MessageAppended(message.clone()));
        self.pending_injection = Some(message);

        if self.scheduler.resume() {
            self.emit_status();
        }

        if self.in_flight.is_some() {
            self.injected_during_flight = true;
            return;
        }
        if self.scheduler.is_running() {
            self.delay_lock = false;
            self.timer.schedule(self.settings.pacing.settle_delay());
        }
    }

    fn on_dispatch(&mut self, event: DispatchEvent) {
        let current = self.in_flight.as_ref().map(|t| t.ticket);
        if current != Some(event.ticket()) {
            debug!(ticket = %event.ticket(), "Ignoring result for a stale turn");
            return;
        }

        match event {
            DispatchEvent::Token { fragment, .. } => {
                if let Some(turn) = &self.in_flight {
                    self.emit(DebateEvent::Token {
                        agent_id: turn.agent.id().to_string(),
                        fragment,
                    });
                }
            }
            DispatchEvent::Completed { content, .. } => {
                if let Some(turn) = self.in_flight.take() {
                    self.on_turn_completed(turn, content);
                }
            }
            DispatchEvent::Failed { error, .. } => {
                if let Some(turn) = self.in_flight.take() {
                    self.on_turn_failed(turn, error.to_string());
                }
            }
        }
    }

    fn on_turn_completed(&mut self, turn: InFlightTurn, content: String) {
        let injected = std::mem::take(&mut self.injected_during_flight);

        if !self.scheduler.is_running() {
            debug!(
                agent = turn.agent.name(),
                status = %self.scheduler.status(),
                "Discarding reply; session is not running"
            );
            self.turn_logger
                .log(&TurnRecord::discarded(turn.round, &turn.agent));
            self.restore_injection(turn.injection);
            return;
        }

        let message = Message::from_agent(&turn.agent, content);
        self.turn_logger
            .log(&TurnRecord::reply(turn.round, &turn.agent, &message));
        self.scheduler.append_message(message.clone());
        self.emit(DebateEvent::MessageAppended(message));

        let max_rounds = self.scheduler.state().max_rounds;
        match self.scheduler.advance_turn() {
            TurnAdvance::Completed => {
                let rounds_completed = self.scheduler.state().rounds_completed;
                info!(rounds_completed, "Debate completed");
                self.emit(DebateEvent::RoundCompleted {
                    rounds_completed,
                    max_rounds,
                });
                self.emit_status();
                self.emit(DebateEvent::Completed { rounds_completed });
                return;
            }
            TurnAdvance::RoundCompleted(rounds_completed) => {
                self.emit(DebateEvent::RoundCompleted {
                    rounds_completed,
                    max_rounds,
                });
            }
            TurnAdvance::Advanced | TurnAdvance::Ignored => {}
        }

        if injected {
            self.timer.schedule(self.settings.pacing.settle_delay());
        } else {
            self.delay_lock = true;
            self.timer.schedule(self.settings.pacing.turn_delay());
        }
    }

    fn on_turn_failed(&mut self, turn: InFlightTurn, error: String) {
        self.injected_during_flight = false;
        self.restore_injection(turn.injection);
        warn!(agent = turn.agent.name(), error = %error, "Turn failed; pausing");
        self.turn_logger
            .log(&TurnRecord::failure(turn.round, &turn.agent, &error));
        self.emit(DebateEvent::TurnFailed {
            agent_name: turn.agent.name().to_string(),
            error,
        });
        self.timer.cancel();
        self.delay_lock = false;
        if self.scheduler.pause() {
            self.emit_status();
        }
    }

    /// Dispatch the current agent's turn if the session allows it.
    fn trigger_next_turn(&mut self) {
        if !self.scheduler.is_running() || self.delay_lock || self.in_flight.is_some() {
            debug!(
                status = %self.scheduler.status(),
                delay_lock = self.delay_lock,
                in_flight = self.in_flight.is_some(),
                "Not triggering next turn"
            );
            return;
        }
        let Some(agent) = self.scheduler.current_agent().cloned() else {
            return;
        };

        let injection = self.pending_injection.take();
        let state = self.scheduler.state();
        let round = state.current_round();
        let prompt = TurnPrompt::interactive(
            &agent,
            &state.topic,
            &state.history,
            self.settings.history_window,
            injection.as_ref(),
        );
        let request = CompletionRequest::for_turn(&agent, &prompt).streaming(true);

        let ticket = self.next_ticket;
        self.next_ticket = ticket.next();

        match self.dispatcher.spawn(ticket, request, self.tx.clone()) {
            Ok(()) => {
                debug!(%ticket, agent = agent.name(), round, "Turn dispatched");
                self.emit(DebateEvent::TurnStarted {
                    agent_id: agent.id().to_string(),
                    agent_name: agent.name().to_string(),
                    round,
                });
                self.in_flight = Some(InFlightTurn {
                    ticket,
                    agent,
                    round,
                    injection,
                });
            }
            Err(e) => {
                self.pending_injection = injection;
                warn!(error = %e, "Could not dispatch turn");
                self.notice(format!("Could not dispatch turn: {}", e));
            }
        }
    }

    /// Put back the injection of a turn that produced no reply, unless a
    /// newer one has arrived since.
    fn restore_injection(&mut self, injection: Option<Message>) {
        if self.pending_injection.is_none() {
            self.pending_injection = injection;
        }
    }

    fn save(&mut self, path: PathBuf) {
        let Some(store) = &self.snapshots else {
            self.notice("Saving is not available".to_string());
            return;
        };
        match store.save(self.scheduler.state(), &path) {
            Ok(()) => {
                info!(path = %path.display(), "Snapshot saved");
                self.emit(DebateEvent::Saved { path });
            }
            Err(e) => self.notice(format!("Save failed: {}", e)),
        }
    }

    fn emit_status(&self) {
        self.emit(DebateEvent::StatusChanged {
            status: self.scheduler.status(),
        });
    }

    fn notice(&self, message: String) {
        self.emit(DebateEvent::Notice { message });
    }

    fn emit(&self, event: DebateEvent) {
        // Receiver gone means nobody is rendering; the debate goes on
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Pacing;
    use crate::ports::completion::CompletionError;
    use crate::ports::snapshot::SnapshotError;
    use crate::use_cases::dispatch::testing::ScriptedService;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;
    use tokio::task::JoinHandle;
    use tokio::time::Instant;

    fn agents() -> Vec<AgentConfig> {
        vec![
            AgentConfig::new("optimist", "Optimist", "Be hopeful.").unwrap(),
            AgentConfig::new("skeptic", "Skeptic", "Be doubtful.").unwrap(),
        ]
    }

    fn settings() -> DebateSettings {
        DebateSettings::default().with_pacing(
            Pacing::new(Duration::from_millis(1500), Duration::from_millis(200)).unwrap(),
        )
    }

    struct Harness {
        handle: DirectorHandle,
        events: mpsc::UnboundedReceiver<DebateEvent>,
        task: JoinHandle<DebateState>,
    }

    impl Harness {
        fn new(service: Arc<ScriptedService>, max_rounds: u32) -> Self {
            Self::with(service, max_rounds, |c| c)
        }

        fn with(
            service: Arc<ScriptedService>,
            max_rounds: u32,
            configure: impl FnOnce(DebateController) -> DebateController,
        ) -> Self {
            let scheduler = TurnScheduler::new("Is remote work better?", agents(), max_rounds).unwrap();
            let (events_tx, events) = mpsc::unbounded_channel();
            let controller = DebateController::new(
                scheduler,
                CompletionDispatcher::new(service),
                settings(),
                events_tx,
            )
            .unwrap();
            let controller = configure(controller);
            let handle = controller.handle();
            let task = tokio::spawn(controller.run());
            Self {
                handle,
                events,
                task,
            }
        }

        async fn next_matching(&mut self, pred: impl Fn(&DebateEvent) -> bool) -> DebateEvent {
            loop {
                let event = self.events.recv().await.expect("controller alive");
                if pred(&event) {
                    return event;
                }
            }
        }

        async fn finish(self) -> DebateState {
            self.handle.stop().unwrap();
            self.task.await.unwrap()
        }
    }

    fn is_agent_reply(event: &DebateEvent) -> bool {
        matches!(event, DebateEvent::MessageAppended(m) if !m.is_injection)
    }

    #[derive(Default)]
    struct RecordingLogger {
        records: Mutex<Vec<TurnRecord>>,
    }

    impl TurnLogger for RecordingLogger {
        fn log(&self, record: &TurnRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn two_agents_two_rounds_take_four_turns() {
        let service = Arc::new(ScriptedService::replying("A fair point."));
        let mut h = Harness::new(service.clone(), 2);
        h.handle.start().unwrap();

        h.next_matching(|e| matches!(e, DebateEvent::Completed { .. }))
            .await;
        let state = h.finish().await;

        assert_eq!(state.status, DebateStatus::Completed);
        assert_eq!(state.history.len(), 4);
        assert_eq!(state.rounds_completed, 2);
        assert_eq!(state.current_turn_index, 0);
        let speakers: Vec<_> = state.history.iter().map(|m| m.sender_id.as_str()).collect();
        assert_eq!(speakers, ["optimist", "skeptic", "optimist", "skeptic"]);
        assert_eq!(service.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn turns_are_spaced_by_the_turn_delay() {
        let service = Arc::new(ScriptedService::replying("Noted."));
        let mut h = Harness::new(service, 2);
        h.handle.start().unwrap();

        h.next_matching(is_agent_reply).await;
        let replied_at = Instant::now();
        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        assert_eq!(Instant::now() - replied_at, Duration::from_millis(1500));
        h.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn strong_injection_overrides_next_prompt_and_settles_fast() {
        let service = Arc::new(ScriptedService::replying("Reply."));
        let mut h = Harness::new(service.clone(), 3);
        h.handle.start().unwrap();

        h.next_matching(is_agent_reply).await;
        let injected_at = Instant::now();
        h.handle.inject("Discuss costs", 0.9).unwrap();

        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        assert_eq!(Instant::now() - injected_at, Duration::from_millis(200));

        h.next_matching(is_agent_reply).await;
        let prompt = service.user_prompt(1);
        assert!(prompt.contains("SYSTEM OVERRIDE"));
        assert!(prompt.contains("Discuss costs"));

        let state = h.finish().await;
        assert!(state.history[1].is_injection);
        assert_eq!(state.history[2].sender_id, "skeptic");
        // The injection did not consume a turn
        assert_eq!(state.current_turn_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn injection_during_flight_reaches_the_next_prompt() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(ScriptedService::replying("Reply.").gated(gate.clone()));
        let mut h = Harness::new(service.clone(), 3);
        h.handle.start().unwrap();

        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        h.handle.inject("Discuss costs", 0.9).unwrap();
        h.next_matching(|e| matches!(e, DebateEvent::MessageAppended(m) if m.is_injection))
            .await;
        gate.notify_one();
        h.next_matching(is_agent_reply).await;

        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        gate.notify_one();
        h.next_matching(is_agent_reply).await;

        let prompt = service.user_prompt(1);
        assert!(prompt.contains("*** SYSTEM OVERRIDE (Priority 0.9) ***"));
        assert!(prompt.contains("'Discuss costs'"));

        let state = h.finish().await;
        let order: Vec<_> = state
            .history
            .iter()
            .map(|m| (m.sender_id.as_str(), m.is_injection))
            .collect();
        assert_eq!(
            order,
            [("director", true), ("optimist", false), ("skeptic", false)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn answered_injection_is_not_repeated() {
        let service = Arc::new(ScriptedService::replying("Reply."));
        let mut h = Harness::new(service.clone(), 3);
        h.handle.start().unwrap();

        h.next_matching(is_agent_reply).await;
        h.handle.inject("Discuss costs", 0.9).unwrap();
        h.next_matching(is_agent_reply).await;
        h.next_matching(is_agent_reply).await;

        assert!(service.user_prompt(1).contains("SYSTEM OVERRIDE"));
        assert!(!service.user_prompt(2).contains("SYSTEM OVERRIDE"));
        h.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn injection_survives_a_failed_turn() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(
            ScriptedService::replying("Recovered.")
                .then(Err(CompletionError::Timeout))
                .gated(gate.clone()),
        );
        let mut h = Harness::new(service.clone(), 2);
        h.handle.start().unwrap();

        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        h.handle.inject("Be brief", 0.5).unwrap();
        h.next_matching(|e| matches!(e, DebateEvent::MessageAppended(m) if m.is_injection))
            .await;
        gate.notify_one();
        h.next_matching(|e| matches!(e, DebateEvent::TurnFailed { .. }))
            .await;

        h.handle.resume().unwrap();
        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        gate.notify_one();
        h.next_matching(is_agent_reply).await;

        assert!(service.user_prompt(1).contains("[MANDATORY INSTRUCTION]"));
        h.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failure_pauses_without_touching_history() {
        let service = Arc::new(
            ScriptedService::replying("unused").then(Err(CompletionError::Timeout)),
        );
        let logger = Arc::new(RecordingLogger::default());
        let log = logger.clone();
        let mut h = Harness::with(service, 2, move |c| c.with_turn_logger(log));
        h.handle.start().unwrap();

        let failed = h
            .next_matching(|e| matches!(e, DebateEvent::TurnFailed { .. }))
            .await;
        assert!(matches!(failed, DebateEvent::TurnFailed { agent_name, .. } if agent_name == "Optimist"));
        h.next_matching(|e| {
            matches!(e, DebateEvent::StatusChanged { status } if *status == DebateStatus::Paused)
        })
        .await;

        let state = h.finish().await;
        assert_eq!(state.status, DebateStatus::Paused);
        assert!(state.history.is_empty());
        assert_eq!(state.current_turn_index, 0);
        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_failure());
    }

    #[tokio::test(start_paused = true)]
    async fn resume_after_failure_retries_the_same_agent() {
        let service = Arc::new(
            ScriptedService::replying("Recovered.").then(Err(CompletionError::Timeout)),
        );
        let mut h = Harness::new(service, 1);
        h.handle.start().unwrap();
        h.next_matching(|e| matches!(e, DebateEvent::TurnFailed { .. }))
            .await;

        h.handle.resume().unwrap();
        let reply = h.next_matching(is_agent_reply).await;
        assert!(matches!(reply, DebateEvent::MessageAppended(m) if m.sender_id == "optimist"));
        h.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn reply_arriving_while_paused_is_discarded() {
        let gate = Arc::new(Notify::new());
        let service = Arc::new(ScriptedService::replying("Late reply.").gated(gate.clone()));
        let logger = Arc::new(RecordingLogger::default());
        let log = logger.clone();
        let mut h = Harness::with(service, 2, move |c| c.with_turn_logger(log));
        h.handle.start().unwrap();

        h.next_matching(|e| matches!(e, DebateEvent::TurnStarted { .. }))
            .await;
        h.handle.pause().unwrap();
        h.next_matching(|e| {
            matches!(e, DebateEvent::StatusChanged { status } if *status == DebateStatus::Paused)
        })
        .await;
        gate.notify_one();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let state = h.finish().await;
        assert!(state.history.is_empty());
        assert_eq!(state.current_turn_index, 0);
        assert_eq!(state.status, DebateStatus::Paused);
        let records = logger.records.lock().unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].is_discarded());
        assert_eq!(records[0].agent_id, "optimist");
    }

    #[tokio::test(start_paused = true)]
    async fn pause_cancels_pending_trigger() {
        let service = Arc::new(ScriptedService::replying("Hmm."));
        let mut h = Harness::new(service.clone(), 3);
        h.handle.start().unwrap();

        h.next_matching(is_agent_reply).await;
        h.handle.pause().unwrap();
        tokio::time::sleep(Duration::from_secs(10)).await;

        let state = h.finish().await;
        assert_eq!(service.calls(), 1);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.current_turn_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn injection_resumes_a_paused_debate() {
        let service = Arc::new(ScriptedService::replying("Okay."));
        let mut h = Harness::new(service.clone(), 3);
        h.handle.start().unwrap();
        h.next_matching(is_agent_reply).await;
        h.handle.pause().unwrap();

        h.handle.inject("Consider the environment", 0.2).unwrap();
        h.next_matching(|e| {
            matches!(e, DebateEvent::StatusChanged { status } if *status == DebateStatus::Running)
        })
        .await;
        h.next_matching(is_agent_reply).await;
        assert!(service.user_prompt(1).contains("[Contextual Note]"));
        h.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn out_of_range_injection_is_rejected() {
        let service = Arc::new(ScriptedService::replying("Fine."));
        let mut h = Harness::new(service, 2);
        h.handle.inject("Too strong", 1.5).unwrap();

        h.next_matching(|e| matches!(e, DebateEvent::Notice { .. }))
            .await;
        let state = h.finish().await;
        assert!(state.history.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn start_after_completion_is_refused() {
        let service = Arc::new(ScriptedService::replying("Done."));
        let mut h = Harness::new(service.clone(), 1);
        h.handle.start().unwrap();
        h.next_matching(|e| matches!(e, DebateEvent::Completed { .. }))
            .await;

        h.handle.start().unwrap();
        let notice = h
            .next_matching(|e| matches!(e, DebateEvent::Notice { .. }))
            .await;
        assert!(matches!(notice, DebateEvent::Notice { message } if message.contains("completed")));
        h.finish().await;
        assert_eq!(service.calls(), 2);
    }

    struct MemoryStore {
        saved: Mutex<Vec<(PathBuf, DebateState)>>,
    }

    impl SnapshotStore for MemoryStore {
        fn save(&self, state: &DebateState, path: &Path) -> Result<(), SnapshotError> {
            self.saved
                .lock()
                .unwrap()
                .push((path.to_path_buf(), state.clone()));
            Ok(())
        }

        fn load(&self, _path: &Path) -> Result<DebateState, SnapshotError> {
            unreachable!("not used by the controller")
        }
    }

    #[tokio::test(start_paused = true)]
    async fn save_writes_current_state() {
        let store = Arc::new(MemoryStore {
            saved: Mutex::new(Vec::new()),
        });
        let service = Arc::new(ScriptedService::replying("Saved soon."));
        let snapshot = store.clone();
        let mut h = Harness::with(service, 2, move |c| c.with_snapshot_store(snapshot));
        h.handle.start().unwrap();
        h.next_matching(is_agent_reply).await;

        h.handle.save("debate.json").unwrap();
        h.next_matching(|e| matches!(e, DebateEvent::Saved { .. }))
            .await;
        h.finish().await;

        let saved = store.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, PathBuf::from("debate.json"));
        assert_eq!(saved[0].1.history.len(), 1);
    }

    #[test]
    fn human_seat_is_rejected() {
        let roster = vec![
            AgentConfig::new("user", "You", "").unwrap(),
            AgentConfig::new("bot", "Bot", "Argue.").unwrap(),
        ];
        let scheduler = TurnScheduler::new("t", roster, 1).unwrap();
        let (tx, _rx) = mpsc::unbounded_channel();
        let service = Arc::new(ScriptedService::replying("x"));
        let result = DebateController::new(
            scheduler,
            CompletionDispatcher::new(service),
            DebateSettings::default(),
            tx,
        );
        assert!(matches!(result, Err(ControllerError::HumanSeat(_))));
    }
}
