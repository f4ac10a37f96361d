use super::*;
use crate::Epoch;
use crate::capture::Camera;
use crate::config::Config;
use crate::fault::Fault;
use crate::game::*;
use crate::history::History;
use crate::peripheral::Absent;
use crate::peripheral::Peripheral;
use crate::peripheral::Signal;
use crate::predictor::Prediction;
use crate::predictor::Predictor;
use crate::predictor::PredictorState;
use crate::presentation::Frame;
use crate::presentation::Silent;
use crate::presentation::Sink;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Moves locked in when the human calls, before any finger is shown.
#[derive(Debug, Clone, Copy)]
struct Pending {
    choice: Parity,
    robot: Fingers,
    explored: bool,
    prediction: Prediction,
    began: Instant,
}

/// Single owner of the session and the predictor.
///
/// Drains one ordered queue and handles each event to completion, so no two
/// transitions can race. Timers (countdown, capture) run as separate tasks
/// tagged with the current epoch; cancelling bumps the epoch and aborts
/// them, and anything they managed to enqueue is dropped as stale.
///
/// ```text
/// IDLE → AWAITING_CHOICE → COUNTDOWN → CAPTURING → RESOLVING → ROUND_COMPLETE
///            ↑                                                    │
///            └──────────────── (no winner yet) ───────────────────┤
///                                                                  ↓
///                                                          GAME_COMPLETE
/// ```
pub struct Orchestrator {
    config: Config,
    phase: Phase,
    choice: Parity,
    session: Option<Session>,
    started: Instant,
    pending: Option<Pending>,
    predictor: Predictor,
    policy: Policy,
    history: History,
    camera: Camera,
    peripheral: Box<dyn Peripheral>,
    sink: Box<dyn Sink>,
    queue: Queue,
    epoch: Epoch,
    timers: Vec<JoinHandle<()>>,
    counter: u64,
    fault: Option<String>,
}

impl Orchestrator {
    /// Restore the predictor from the history and start idle, with no
    /// peripheral and no presentation attached.
    pub fn new(config: Config, history: History, camera: Camera) -> Self {
        let predictor = Predictor::restore(
            history.predictor().clone(),
            config.predictor,
            history.records(),
        );
        let counter = history.records().last().map(RoundRecord::id).unwrap_or(0);
        log::info!(
            "[room] predictor ready after {} observed rounds",
            predictor.observed()
        );
        Self {
            policy: Policy::new(config.policy),
            config,
            phase: Phase::Idle,
            choice: Parity::default(),
            session: None,
            started: Instant::now(),
            pending: None,
            predictor,
            history,
            camera,
            peripheral: Box::new(Absent),
            sink: Box::new(Silent),
            queue: Queue::default(),
            epoch: 0,
            timers: Vec::new(),
            counter,
            fault: None,
        }
    }
    pub fn with_peripheral(mut self, peripheral: Box<dyn Peripheral>) -> Self {
        self.peripheral = peripheral;
        self
    }
    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sink = sink;
        self
    }

    /// Handle for producers (console, peripheral, signal handler).
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.queue.sender()
    }

    /// Process events until asked to quit.
    pub async fn run(&mut self) {
        self.render();
        while self.step().await {}
        log::info!("[room] closed");
    }

    /// Wait for and handle exactly one event. False once the room has quit.
    pub async fn step(&mut self) -> bool {
        match self.queue.next().await {
            Some(event) => self.handle(event),
            None => false,
        }
    }

    /// Handle one event to completion. False once the room has quit.
    pub fn handle(&mut self, event: Event) -> bool {
        if let Some(epoch) = event.epoch().filter(|e| *e != self.epoch) {
            log::trace!("[room] dropped stale {:?} (epoch {} != {})", event, epoch, self.epoch);
            return true;
        }
        log::trace!("[room] {} <- {:?}", self.phase, event);
        match (self.phase, event) {
            (_, Event::Quit) => return self.quit(),
            (_, Event::LinkDown { reason, at }) => {
                log::warn!("[link] {} at {}ms", Fault::LinkUnavailable(reason), at)
            }
            (_, Event::Abort) => self.abort(),
            (phase, Event::Start) if phase.is_startable() => self.start(),
            (phase, Event::Advance | Event::Button) if phase.is_startable() => self.start(),
            (Phase::AwaitingChoice, Event::Advance | Event::Button) => self.begin(self.choice),
            (Phase::AwaitingChoice, Event::Declare(choice)) => self.begin(choice),
            (phase, Event::Declare(choice)) if !phase.is_live() => self.remember(choice),
            (Phase::Countdown(_), Event::Tick { tick, .. }) => self.tick(tick),
            (Phase::Capturing(_), Event::Shown { fingers, .. }) => self.resolve(Some(fingers)),
            (Phase::Capturing(attempt), Event::Expired { .. }) => self.expire(attempt),
            (phase, event) => log::debug!("[room] ignored {:?} during {}", event, phase),
        }
        true
    }
}

impl Orchestrator {
    pub fn phase(&self) -> Phase {
        self.phase
    }
    /// Parity used when the human advances without calling.
    pub fn choice(&self) -> Parity {
        self.choice
    }
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }
    pub fn score(&self) -> Score {
        self.session.as_ref().map(Session::score).unwrap_or_default()
    }
    pub fn history(&self) -> &History {
        &self.history
    }
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }
    /// Immutable copy of the model for readers.
    pub fn snapshot(&self) -> PredictorState {
        self.predictor.snapshot()
    }
    pub fn frame(&self) -> Frame {
        let settled = matches!(self.phase, Phase::RoundComplete | Phase::GameComplete);
        let records = self.session.as_ref().map(Session::records).unwrap_or_default();
        Frame {
            phase: self.phase,
            score: self.score(),
            round: u32::try_from(records.len())
                .unwrap_or(u32::MAX)
                .saturating_add(u32::from(!settled)),
            choice: self.pending.map(|p| p.choice).unwrap_or(self.choice),
            prediction: self
                .pending
                .map(|p| p.prediction)
                .unwrap_or_else(|| self.predictor.predict()),
            observed: self.predictor.observed(),
            last: records.last().cloned(),
            fault: self.fault.clone(),
            linked: self.peripheral.connected(),
        }
    }
}

impl Orchestrator {
    fn start(&mut self) {
        self.cancel();
        let session = Session::default();
        log::info!("[room] session {} started", session.id());
        self.session = Some(session);
        self.started = Instant::now();
        self.fault = None;
        self.peripheral.notify(Signal::GameStart);
        self.enter(Phase::AwaitingChoice);
    }

    fn remember(&mut self, choice: Parity) {
        log::debug!("[room] {} remembered for next round", choice);
        self.choice = choice;
        self.render();
    }

    /// Lock in the robot's move against the current prediction, then count down.
    fn begin(&mut self, choice: Parity) {
        self.cancel();
        self.choice = choice;
        let prediction = self.predictor.predict();
        let observed = self.predictor.observed();
        let (robot, explored) = self.policy.choose(&prediction, choice, observed);
        log::info!("[room] human calls {}", choice);
        log::debug!(
            "[room] robot locked in {} ({}, epsilon {:.3}, expects {})",
            robot,
            if explored { "explore" } else { "exploit" },
            self.policy.epsilon(observed),
            prediction.likely()
        );
        self.pending = Some(Pending {
            choice,
            robot,
            explored,
            prediction,
            began: Instant::now(),
        });
        self.timers
            .push(countdown(self.config.timing.tick, self.epoch, self.sender()));
        self.enter(Phase::Countdown(Tick::Three));
    }

    fn tick(&mut self, tick: Tick) {
        self.peripheral.notify(Signal::Countdown(tick));
        self.enter(Phase::Countdown(tick));
        if tick == Tick::Go {
            self.capture(1);
        }
    }

    fn capture(&mut self, attempt: u8) {
        self.timers.retain(|timer| !timer.is_finished());
        self.timers.push(crate::capture::poll(
            self.camera.clone(),
            self.config.timing,
            self.config.capture.threshold,
            self.epoch,
            self.sender(),
        ));
        self.enter(Phase::Capturing(attempt));
    }

    fn expire(&mut self, attempt: u8) {
        let retries = self.config.timing.retries;
        match attempt.checked_add(1).filter(|_| attempt <= retries) {
            Some(next) => {
                log::info!("[room] no hand detected, retrying ({}/{})", attempt, retries);
                self.capture(next);
            }
            None => {
                log::warn!("[capture] {}", Fault::InputTimeout { attempts: attempt });
                self.resolve(None);
            }
        }
    }

    /// Score the round, persist it, and feed it to the predictor.
    fn resolve(&mut self, human: Option<Fingers>) {
        self.cancel();
        self.enter(Phase::Resolving);
        let Some(pending) = self.pending.take() else {
            return self.fail(Fault::Invariant("resolution without a round in play".to_string()));
        };
        let Some(session) = self.session.as_ref() else {
            return self.fail(Fault::Invariant("resolution without a session".to_string()));
        };
        let record = RoundRecord::new(
            self.counter + 1,
            session.id(),
            session.next_round(),
            pending.choice,
            pending.robot,
            human,
            pending.prediction,
        )
        .with_exploration(pending.explored)
        .with_timing(
            self.started.elapsed().as_millis() as u64,
            pending.began.elapsed().as_millis() as u64,
        );
        let status = match self
            .session
            .as_mut()
            .ok_or_else(|| Fault::Invariant("session vanished mid-round".to_string()))
            .and_then(|session| session.append(record.clone()))
        {
            Ok(status) => status,
            Err(fault) => return self.fail(fault),
        };
        self.counter = record.id();
        log::info!("[room] {}", record);
        if let Err(fault) = self.predictor.update(&record) {
            log::error!("[predictor] {}; keeping previous state", fault);
        }
        if let Err(fault) = self.history.append(record.clone(), self.predictor.state()) {
            match fault.is_fatal() {
                true => return self.fail(fault),
                false => log::warn!("[history] {}", fault),
            }
        }
        self.settle(record.outcome(), status);
    }

    fn settle(&mut self, outcome: Outcome, status: Status) {
        match outcome {
            Outcome::HumanWin => self.peripheral.notify(Signal::PlayerRoundWin),
            Outcome::RobotWin => self.peripheral.notify(Signal::RobotRoundWin),
            Outcome::NoContest => {}
        }
        self.enter(Phase::RoundComplete);
        match status {
            Status::Complete => {
                let won = self.session.as_ref().and_then(Session::human_won);
                self.peripheral.notify(match won {
                    Some(true) => Signal::PlayerWin,
                    _ => Signal::PlayerLose,
                });
                log::info!("[room] session over, {}", self.score());
                self.enter(Phase::GameComplete);
            }
            Status::InProgress => {
                self.peripheral.notify(Signal::BetweenRounds);
                self.enter(Phase::AwaitingChoice);
            }
        }
    }

    fn abort(&mut self) {
        if !self.phase.is_abortable() {
            log::debug!("[room] nothing to abort during {}", self.phase);
            return;
        }
        log::info!("[room] aborted during {}", self.phase);
        self.cancel();
        self.pending = None;
        self.session = None;
        self.peripheral.notify(Signal::Reset);
        self.enter(Phase::Idle);
    }

    /// Internal inconsistency: drop the session rather than play on.
    fn fail(&mut self, fault: Fault) {
        log::error!("[room] session aborted: {}", fault);
        self.cancel();
        self.pending = None;
        self.session = None;
        self.fault = Some(fault.to_string());
        self.peripheral.notify(Signal::Reset);
        self.enter(Phase::Idle);
    }

    fn quit(&mut self) -> bool {
        log::info!("[room] quitting during {}", self.phase);
        self.cancel();
        self.pending = None;
        self.peripheral.notify(Signal::Reset);
        false
    }

    /// Invalidate every timer started so far.
    fn cancel(&mut self) {
        self.epoch += 1;
        self.timers.drain(..).for_each(|timer| timer.abort());
    }

    fn enter(&mut self, phase: Phase) {
        log::debug!("[room] {} -> {}", self.phase, phase);
        self.phase = phase;
        self.render();
    }

    fn render(&mut self) {
        let frame = self.frame();
        self.sink.render(&frame);
    }
}
