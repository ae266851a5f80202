//! Season buckets for per-season case aggregation.

use serde::Serialize;
use std::fmt;

/// One of the four fixed season buckets a document month maps into.
///
/// Serializes as the lowercase English key the frontend charts use
/// (`"spring"`, `"summer"`, `"autumn"`, `"winter"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    /// Canonical presentation order: spring first, winter last.
    pub const ALL: [Self; 4] = [Self::Spring, Self::Summer, Self::Autumn, Self::Winter];

    /// Map a 1-based calendar month to its season bucket.
    ///
    /// Spring = {3,4,5}, summer = {6,7,8}, autumn = {9,10,11},
    /// winter = {12,1,2}. Returns `None` for a month outside 1..=12.
    #[must_use]
    pub const fn from_month(month: u32) -> Option<Self> {
        match month {
            3..=5 => Some(Self::Spring),
            6..=8 => Some(Self::Summer),
            9..=11 => Some(Self::Autumn),
            12 | 1 | 2 => Some(Self::Winter),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Position in [`Self::ALL`], used for fixed-order accumulation.
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Spring => 0,
            Self::Summer => 1,
            Self::Autumn => 2,
            Self::Winter => 3,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::Season;

    #[test]
    fn every_month_maps_to_exactly_one_season() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (4, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (7, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (10, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), Some(season), "month {month}");
        }
    }

    #[test]
    fn out_of_range_months_have_no_season() {
        assert_eq!(Season::from_month(0), None);
        assert_eq!(Season::from_month(13), None);
    }

    #[test]
    fn canonical_order_is_spring_to_winter() {
        let keys: Vec<&str> = Season::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(keys, ["spring", "summer", "autumn", "winter"]);
    }

    #[test]
    fn index_matches_position_in_all() {
        for (position, season) in Season::ALL.iter().enumerate() {
            assert_eq!(season.index(), position);
        }
    }

    #[test]
    fn serializes_as_lowercase_key() {
        let json = serde_json::to_string(&Season::Autumn).expect("serialize season");
        assert_eq!(json, "\"autumn\"");
    }
}
