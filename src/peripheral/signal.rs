use crate::gameroom::Tick;

/// Outbound notification vocabulary, one newline-terminated line each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Countdown(Tick),
    PlayerRoundWin,
    RobotRoundWin,
    PlayerWin,
    PlayerLose,
    GameStart,
    BetweenRounds,
    Reset,
    Test,
}

impl Signal {
    pub fn all() -> impl Iterator<Item = Self> {
        Tick::all()
            .map(Self::Countdown)
            .chain([
                Self::PlayerRoundWin,
                Self::RobotRoundWin,
                Self::PlayerWin,
                Self::PlayerLose,
                Self::GameStart,
                Self::BetweenRounds,
                Self::Reset,
                Self::Test,
            ])
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Countdown(Tick::Three) => write!(f, "COUNTDOWN_3"),
            Self::Countdown(Tick::Two) => write!(f, "COUNTDOWN_2"),
            Self::Countdown(Tick::One) => write!(f, "COUNTDOWN_1"),
            Self::Countdown(Tick::Go) => write!(f, "COUNTDOWN_GO"),
            Self::PlayerRoundWin => write!(f, "PLAYER_ROUND_WIN"),
            Self::RobotRoundWin => write!(f, "ROBOT_ROUND_WIN"),
            Self::PlayerWin => write!(f, "PLAYER_WIN"),
            Self::PlayerLose => write!(f, "PLAYER_LOSE"),
            Self::GameStart => write!(f, "GAME_START"),
            Self::BetweenRounds => write!(f, "BETWEEN_ROUNDS"),
            Self::Reset => write!(f, "RESET"),
            Self::Test => write!(f, "TEST"),
        }
    }
}

impl TryFrom<&str> for Signal {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::all()
            .find(|signal| signal.to_string() == s.trim())
            .ok_or("unknown signal")
    }
}

/// Lines the device may send unprompted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Button,
    Diagnostic(String),
}

impl From<&str> for Inbound {
    fn from(line: &str) -> Self {
        match line.trim() {
            "BUTTON_PRESSED" => Self::Button,
            other => Self::Diagnostic(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn wire_names() {
        assert_eq!(Signal::Countdown(Tick::Go).to_string(), "COUNTDOWN_GO");
        assert_eq!(Signal::BetweenRounds.to_string(), "BETWEEN_ROUNDS");
        assert_eq!(Signal::try_from("COUNTDOWN_2"), Ok(Signal::Countdown(Tick::Two)));
        assert_eq!(Signal::try_from("PLAYER_LOSE\r"), Ok(Signal::PlayerLose));
        assert!(Signal::try_from("FIREWORKS").is_err());
    }
    #[test]
    fn vocabulary_is_distinct() {
        let names = Signal::all().map(|s| s.to_string()).collect::<std::collections::HashSet<_>>();
        assert_eq!(names.len(), 12);
    }
    #[test]
    fn inbound_lines() {
        assert_eq!(Inbound::from("BUTTON_PRESSED\r"), Inbound::Button);
        assert_eq!(
            Inbound::from("Unknown command: FOO"),
            Inbound::Diagnostic("Unknown command: FOO".to_string())
        );
    }
}
