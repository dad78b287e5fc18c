//! Sort orders for achievement views.
//!
//! All sorts are stable: records with equal keys keep their input order.

use crate::achievements::CombatAchievement;
use crate::error::TrackerError;
use std::cmp::Ordering;
use std::str::FromStr;

/// Column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    Tier,
    Points,
    Name,
    Completion,
    CompletionPercentage,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Tier,
        SortKey::Points,
        SortKey::Name,
        SortKey::Completion,
        SortKey::CompletionPercentage,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Tier => "Tier",
            SortKey::Points => "Points",
            SortKey::Name => "Name",
            SortKey::Completion => "Completion",
            SortKey::CompletionPercentage => "Completion %",
        }
    }
}

impl FromStr for SortKey {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("Completion%") {
            return Ok(SortKey::CompletionPercentage);
        }
        SortKey::ALL
            .into_iter()
            .find(|key| key.label().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| TrackerError::InvalidSortKey(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sort key plus direction. No key means tier order with name tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSelection {
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortSelection {
    pub fn new(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Compare two records under this selection.
    pub fn compare(&self, a: &CombatAchievement, b: &CombatAchievement) -> Ordering {
        let Some(key) = self.key else {
            return a
                .tier_level()
                .cmp(&b.tier_level())
                .then_with(|| a.name().cmp(b.name()));
        };
        match key {
            SortKey::Tier => self.direction.apply(a.tier_level().cmp(&b.tier_level())),
            SortKey::Points => self.direction.apply(a.points().cmp(&b.points())),
            SortKey::Name => self.direction.apply(a.name().cmp(b.name())),
            SortKey::Completion => self
                .direction
                .apply(a.is_completed().cmp(&b.is_completed())),
            // Unknown percentages sort last in both directions
            SortKey::CompletionPercentage => {
                match (a.completion_percentage(), b.completion_percentage()) {
                    (None, None) => Ordering::Equal,
                    (None, Some(_)) => Ordering::Greater,
                    (Some(_), None) => Ordering::Less,
                    (Some(x), Some(y)) => self.direction.apply(x.total_cmp(&y)),
                }
            }
        }
    }
}

/// Sort records in place under `selection`.
pub fn sort_achievements(achievements: &mut [&CombatAchievement], selection: SortSelection) {
    achievements.sort_by(|a, b| selection.compare(a, b));
}
