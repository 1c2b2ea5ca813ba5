//! Shared primitive aliases and small value types.

use serde::{Deserialize, Serialize};

/// Canonical film or list reference (a URL); doubles as an identity key.
pub type SourceRef = String;
/// 1-based place in the standings.
pub type Place = u32;
/// Runtime in whole minutes.
pub type Minutes = u32;

/// Member rating in half-star units, `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_half_stars(value).ok_or_else(|| format!("rating out of range: {value}"))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl Rating {
    /// Largest rating value (five stars).
    pub const MAX: u8 = 10;

    /// Builds a rating from half-star units, rejecting values outside `1..=10`.
    pub fn from_half_stars(half_stars: u8) -> Option<Self> {
        (1..=Self::MAX).contains(&half_stars).then_some(Self(half_stars))
    }

    /// Rating in half-star units.
    pub fn half_stars(self) -> u8 {
        self.0
    }

    /// Star label such as `★★★½`.
    pub fn label(self) -> String {
        let mut out = "★".repeat(usize::from(self.0 / 2));
        if self.0 % 2 == 1 {
            out.push('½');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::Rating;

    #[test]
    fn rating_bounds_and_labels() {
        assert!(Rating::from_half_stars(0).is_none());
        assert!(Rating::from_half_stars(11).is_none());
        assert_eq!(Rating::from_half_stars(7).map(Rating::label).as_deref(), Some("★★★½"));
        assert_eq!(Rating::from_half_stars(1).map(Rating::label).as_deref(), Some("½"));
        assert_eq!(Rating::from_half_stars(10).map(Rating::label).as_deref(), Some("★★★★★"));
    }

    #[test]
    fn out_of_range_ratings_do_not_deserialize() {
        assert!(serde_json::from_str::<Rating>("0").is_err());
        assert_eq!(serde_json::from_str::<Rating>("8").ok(), Rating::from_half_stars(8));
    }
}
