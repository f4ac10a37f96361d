//! Odds-or-evens against an opponent that learns how you play.
//!
//! A single [`gameroom::Orchestrator`] task owns the session and the
//! predictor. Everything time-driven or device-driven (countdown ticker,
//! capture poller, peripheral listener, console input) runs as an
//! independent producer feeding one ordered event queue.
//!
//! ## Modules
//!
//! - [`game`]: fingers, parity, outcomes, round records, sessions
//! - [`predictor`]: rolling feature window and online two-headed estimator
//! - [`gameroom`]: event queue, countdown ticker, epsilon-greedy policy, state machine
//! - [`capture`]: finger-count samples and the capture poller
//! - [`peripheral`]: optional line-protocol device link (or a no-op stand-in)
//! - [`presentation`]: passive sinks for orchestrator snapshots
//! - [`history`]: durable archive of records plus predictor snapshot
pub mod capture;
pub mod config;
pub mod fault;
pub mod game;
pub mod gameroom;
pub mod history;
pub mod peripheral;
pub mod predictor;
pub mod presentation;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Predicted distributions, capture confidence, exploration rates.
pub type Probability = f32;
/// Generation counter that invalidates in-flight timers on cancellation.
pub type Epoch = u64;

// ============================================================================
// IDENTITY TYPES
// ============================================================================
use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::marker::PhantomData;

/// Time-ordered uuid tagged with the type it identifies, so a session id
/// cannot be mixed up with any other. Ordered so statistics can group by it.
pub struct ID<T> {
    inner: uuid::Uuid,
    marker: PhantomData<T>,
}

impl<T> From<uuid::Uuid> for ID<T> {
    fn from(inner: uuid::Uuid) -> Self {
        Self {
            inner,
            marker: PhantomData,
        }
    }
}

impl<T> Default for ID<T> {
    fn default() -> Self {
        Self::from(uuid::Uuid::now_v7())
    }
}

impl<T> Copy for ID<T> {}
impl<T> Clone for ID<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Eq for ID<T> {}
impl<T> PartialEq for ID<T> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<T> Ord for ID<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<T> PartialOrd for ID<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Debug for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ID").field(&self.inner).finish()
    }
}
impl<T> Display for ID<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl<T> serde::Serialize for ID<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.inner.serialize(serializer)
    }
}
impl<'de, T> serde::Deserialize<'de> for ID<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        uuid::Uuid::deserialize(deserializer).map(Self::from)
    }
}

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Round wins needed to take a best-of-3 session.
pub const WINS_NEEDED: u8 = 2;
/// Finger counts a hand can show in a decisive round.
pub const FINGERS: usize = 5;
/// Parity classes (odds, evens).
pub const PARITIES: usize = 2;
/// Schema version of the persisted archive and predictor snapshot.
pub const SCHEMA_VERSION: u32 = 1;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Milliseconds since the unix epoch, used to stamp records and samples.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "console")]
pub fn log() -> anyhow::Result<()> {
    use anyhow::Context;
    std::fs::create_dir_all("logs").context("create logs directory")?;
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", now_ms() / 1000)).context("create log file")?,
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).context("initialize logger")
}

/// Register a Ctrl+C handler that asks the orchestrator to quit,
/// so the archive is flushed before the process exits.
pub fn interrupt(queue: tokio::sync::mpsc::UnboundedSender<gameroom::Event>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, quitting");
            let _ = queue.send(gameroom::Event::Quit);
        }
    });
}
