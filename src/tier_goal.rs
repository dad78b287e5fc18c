//! Tier goal resolution: which tier threshold the player is working toward.

use crate::achievements::TierLevel;
use crate::error::TrackerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Points required to reach each tier, Easy through Grandmaster.
pub const FIXED_TIER_THRESHOLDS: [u32; 6] = [38, 148, 394, 1026, 1841, 2525];

/// User-selected goal: a specific tier, or the next tier not yet reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TierGoal {
    #[default]
    Auto,
    Easy,
    Medium,
    Hard,
    Elite,
    Master,
    Grandmaster,
}

impl TierGoal {
    /// All goals in configuration display order.
    pub const ALL: [TierGoal; 7] = [
        TierGoal::Auto,
        TierGoal::Easy,
        TierGoal::Medium,
        TierGoal::Hard,
        TierGoal::Elite,
        TierGoal::Master,
        TierGoal::Grandmaster,
    ];

    /// Display name for the goal.
    pub fn name(self) -> &'static str {
        match self.tier() {
            Some(tier) => tier.name(),
            None => "Auto",
        }
    }

    /// The explicit tier, or `None` for Auto.
    pub fn tier(self) -> Option<TierLevel> {
        match self {
            TierGoal::Auto => None,
            TierGoal::Easy => Some(TierLevel::Easy),
            TierGoal::Medium => Some(TierLevel::Medium),
            TierGoal::Hard => Some(TierLevel::Hard),
            TierGoal::Elite => Some(TierLevel::Elite),
            TierGoal::Master => Some(TierLevel::Master),
            TierGoal::Grandmaster => Some(TierLevel::Grandmaster),
        }
    }
}

impl fmt::Display for TierGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TierGoal {
    type Err = TrackerError;

    /// Accepts display names ("Elite") and config enum names ("TIER_ELITE").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed
            .strip_prefix("TIER_")
            .or_else(|| trimmed.strip_prefix("tier_"))
            .unwrap_or(trimmed);
        TierGoal::ALL
            .into_iter()
            .find(|goal| goal.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| TrackerError::InvalidTierGoal(s.to_string()))
    }
}

/// Point thresholds per tier.
///
/// Defaults to [`FIXED_TIER_THRESHOLDS`]; host-supplied values replace
/// individual entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TierThresholds {
    points: [u32; 6],
}

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            points: FIXED_TIER_THRESHOLDS,
        }
    }
}

impl TierThresholds {
    /// Build from host readings. Missing tiers and non-positive values keep
    /// the fixed threshold.
    pub fn from_host_values(values: impl IntoIterator<Item = (TierLevel, i32)>) -> Self {
        let mut thresholds = Self::default();
        for (tier, value) in values {
            match u32::try_from(value) {
                Ok(points) if points > 0 => {
                    tracing::debug!(tier = tier.name(), points, "loaded tier threshold");
                    thresholds.points[tier.order() as usize] = points;
                }
                _ => {
                    tracing::warn!(
                        tier = tier.name(),
                        value,
                        "host tier threshold unusable, using fixed value"
                    );
                }
            }
        }
        thresholds
    }

    /// Points required to reach `tier`.
    pub fn threshold(&self, tier: TierLevel) -> u32 {
        self.points[tier.order() as usize]
    }

    /// Tiers with their thresholds, lowest tier first.
    pub fn iter(&self) -> impl Iterator<Item = (TierLevel, u32)> + '_ {
        TierLevel::ALL.into_iter().map(|tier| (tier, self.threshold(tier)))
    }

    /// Resolve a goal against the player's completed points.
    pub fn resolve(&self, goal: TierGoal, completed_points: u32) -> GoalTarget {
        let tier = match goal.tier() {
            Some(tier) => tier,
            None => self
                .iter()
                .find(|(_, threshold)| *threshold > completed_points)
                .map_or(TierLevel::Grandmaster, |(tier, _)| tier),
        };
        GoalTarget {
            tier,
            threshold: self.threshold(tier),
            completed_points,
        }
    }
}

/// Resolve a goal with explicit thresholds.
pub fn resolve_goal(
    goal: TierGoal,
    completed_points: u32,
    thresholds: &TierThresholds,
) -> GoalTarget {
    thresholds.resolve(goal, completed_points)
}

/// The tier being targeted and how far away it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalTarget {
    pub tier: TierLevel,
    pub threshold: u32,
    pub completed_points: u32,
}

impl GoalTarget {
    /// Whether the target threshold has been reached.
    pub fn is_met(&self) -> bool {
        self.completed_points >= self.threshold
    }

    /// Points still needed; zero once met.
    pub fn remaining(&self) -> u32 {
        self.threshold.saturating_sub(self.completed_points)
    }
}
