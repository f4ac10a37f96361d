/// Countdown beats, one per `timing.tick`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tick {
    Three,
    Two,
    One,
    Go,
}

impl Tick {
    pub fn all() -> impl Iterator<Item = Self> {
        [Self::Three, Self::Two, Self::One, Self::Go].into_iter()
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Three => write!(f, "3"),
            Self::Two => write!(f, "2"),
            Self::One => write!(f, "1"),
            Self::Go => write!(f, "GO"),
        }
    }
}

/// Where the orchestrator is in a round.
///
/// `Idle` is initial. `GameComplete` is terminal until a new session starts.
/// `Capturing` carries the one-based attempt number of the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    AwaitingChoice,
    Countdown(Tick),
    Capturing(u8),
    Resolving,
    RoundComplete,
    GameComplete,
}

impl Phase {
    /// Abort applies here.
    pub fn is_abortable(&self) -> bool {
        !matches!(self, Self::Idle | Self::GameComplete)
    }
    /// A new session may begin here.
    pub fn is_startable(&self) -> bool {
        matches!(self, Self::Idle | Self::GameComplete)
    }
    /// Timers are running and the round's moves are locked in.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Countdown(_) | Self::Capturing(_) | Self::Resolving)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "IDLE"),
            Self::AwaitingChoice => write!(f, "AWAITING_CHOICE"),
            Self::Countdown(tick) => write!(f, "COUNTDOWN({})", tick),
            Self::Capturing(attempt) => write!(f, "CAPTURING(#{})", attempt),
            Self::Resolving => write!(f, "RESOLVING"),
            Self::RoundComplete => write!(f, "ROUND_COMPLETE"),
            Self::GameComplete => write!(f, "GAME_COMPLETE"),
        }
    }
}
