use serde::Deserialize;
use serde::Serialize;

/// A finger count shown in a decisive round, always within 1..=5.
/// Zero (no hand) is never a valid move; capture treats it as absent.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Fingers(u8);

impl Fingers {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = crate::FINGERS as u8;

    /// Every legal count, ascending.
    pub fn all() -> impl Iterator<Item = Self> {
        (Self::MIN..=Self::MAX).map(Self)
    }
    /// Zero-based position in a finger distribution.
    pub fn index(&self) -> usize {
        (self.0 - Self::MIN) as usize
    }
    pub fn from_index(i: usize) -> Option<Self> {
        u8::try_from(i)
            .ok()
            .and_then(|i| i.checked_add(Self::MIN))
            .and_then(|n| Self::try_from(n).ok())
    }
    /// Nearest legal count.
    pub fn clamp(n: u8) -> Self {
        Self(n.clamp(Self::MIN, Self::MAX))
    }
    pub fn count(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Fingers {
    type Error = &'static str;
    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            Self::MIN..=Self::MAX => Ok(Self(n)),
            _ => Err("finger count outside 1..=5"),
        }
    }
}

impl From<Fingers> for u8 {
    fn from(f: Fingers) -> Self {
        f.0
    }
}

impl std::fmt::Display for Fingers {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn bounds() {
        assert!(Fingers::try_from(0).is_err());
        assert!(Fingers::try_from(6).is_err());
        assert_eq!(Fingers::try_from(5).unwrap().count(), 5);
        assert_eq!(Fingers::all().count(), crate::FINGERS);
        assert_eq!(Fingers::clamp(0).count(), 1);
        assert_eq!(Fingers::clamp(9).count(), 5);
    }
    #[test]
    fn index_roundtrip() {
        for f in Fingers::all() {
            assert_eq!(Fingers::from_index(f.index()), Some(f));
        }
        assert_eq!(Fingers::from_index(5), None);
    }
    #[test]
    fn rejects_out_of_range_json() {
        assert!(serde_json::from_str::<Fingers>("7").is_err());
        assert_eq!(serde_json::from_str::<Fingers>("2").unwrap().count(), 2);
    }
}
