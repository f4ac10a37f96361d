/// Failures absorbed at adapter boundaries.
///
/// None of these ever escape the orchestrator as errors: each one is logged
/// where it happens and turned into a typed outcome (no contest, no-op link,
/// fresh state, skipped update). `Invariant` is the only fatal kind, and it
/// aborts the session rather than the process.
#[derive(Debug, Clone, PartialEq)]
pub enum Fault {
    InputTimeout { attempts: u8 },
    LinkUnavailable(String),
    CorruptState(String),
    ModelUpdateFailure(String),
    Invariant(String),
}

impl Fault {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

impl std::fmt::Display for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputTimeout { attempts } => {
                write!(f, "input timeout after {} attempt(s)", attempts)
            }
            Self::LinkUnavailable(s) => write!(f, "link unavailable: {}", s),
            Self::CorruptState(s) => write!(f, "corrupt state: {}", s),
            Self::ModelUpdateFailure(s) => write!(f, "model update failure: {}", s),
            Self::Invariant(s) => write!(f, "invariant violated: {}", s),
        }
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn only_invariants_are_fatal() {
        assert!(Fault::Invariant("score".into()).is_fatal());
        assert!(!Fault::InputTimeout { attempts: 3 }.is_fatal());
        assert!(!Fault::LinkUnavailable("absent".into()).is_fatal());
        assert!(!Fault::CorruptState("version".into()).is_fatal());
        assert!(!Fault::ModelUpdateFailure("order".into()).is_fatal());
    }
    #[test]
    fn display_names_the_kind() {
        assert_eq!(
            Fault::InputTimeout { attempts: 2 }.to_string(),
            "input timeout after 2 attempt(s)"
        );
        assert!(
            Fault::CorruptState("bad json".into())
                .to_string()
                .starts_with("corrupt state")
        );
    }
}
