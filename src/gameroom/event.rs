use super::*;
use crate::Epoch;
use crate::game::Fingers;
use crate::game::Parity;

/// Everything the orchestrator reacts to, from every producer.
///
/// Timer-driven events carry the epoch they were started under; the
/// orchestrator drops any whose epoch is no longer current.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Begin a new session.
    Start,
    /// Human calls odds or evens.
    Declare(Parity),
    /// Primary "advance" input: start, or re-declare the remembered call.
    Advance,
    Abort,
    Quit,
    /// Countdown beat.
    Tick { epoch: Epoch, tick: Tick },
    /// Capture poller accepted a sample.
    Shown { epoch: Epoch, fingers: Fingers },
    /// Capture window elapsed without an accepted sample.
    Expired { epoch: Epoch },
    /// Peripheral button, equivalent to [`Event::Advance`].
    Button,
    /// Peripheral transport lost, with the wall-clock millisecond it dropped.
    LinkDown { reason: String, at: u64 },
}

impl Event {
    /// Epoch of a timer-driven event.
    pub fn epoch(&self) -> Option<Epoch> {
        match self {
            Self::Tick { epoch, .. } | Self::Shown { epoch, .. } | Self::Expired { epoch } => {
                Some(*epoch)
            }
            _ => None,
        }
    }
}

/// Console control surface: `start`, `odds`, `evens`, `go`, `abort`, `quit`.
impl TryFrom<&str> for Event {
    type Error = &'static str;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s.trim().to_lowercase().as_str() {
            "start" | "s" => Ok(Self::Start),
            "go" | "" => Ok(Self::Advance),
            "abort" | "a" => Ok(Self::Abort),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Parity::try_from(other)
                .map(Self::Declare)
                .map_err(|_| "expected start, odds, evens, go, show <n>, abort, or quit"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn parses_control_lines() {
        assert_eq!(Event::try_from("start"), Ok(Event::Start));
        assert_eq!(Event::try_from(" EVENS "), Ok(Event::Declare(Parity::Evens)));
        assert_eq!(Event::try_from("o"), Ok(Event::Declare(Parity::Odds)));
        assert_eq!(Event::try_from(""), Ok(Event::Advance));
        assert_eq!(Event::try_from("quit"), Ok(Event::Quit));
        assert!(Event::try_from("fold").is_err());
    }
    #[test]
    fn only_timers_carry_epochs() {
        assert_eq!(Event::Expired { epoch: 4 }.epoch(), Some(4));
        assert_eq!(Event::Abort.epoch(), None);
        assert_eq!(Event::Button.epoch(), None);
    }
}
