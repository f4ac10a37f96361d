use super::*;

/// Stand-in used when no device is reachable. Every notification is dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absent;

impl Peripheral for Absent {
    fn notify(&self, signal: Signal) {
        log::trace!("[link] absent, dropped {}", signal);
    }
    fn connected(&self) -> bool {
        false
    }
}
