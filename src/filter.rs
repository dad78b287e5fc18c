//! Filter predicates for achievement views.
//!
//! Every criterion is always evaluated; an inactive criterion matches
//! everything on its axis. Boss-scoped views narrow the list by boss before
//! these predicates run.

use crate::achievements::{CombatAchievement, TierLevel};
use std::collections::HashMap;

/// Completion status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Completed,
    Incomplete,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::All,
        StatusFilter::Completed,
        StatusFilter::Incomplete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Completed => "Completed",
            StatusFilter::Incomplete => "Incomplete",
        }
    }

    pub fn matches(self, completed: bool) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Completed => completed,
            StatusFilter::Incomplete => !completed,
        }
    }
}

/// Task type filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TypeFilter {
    #[default]
    AllTypes,
    /// Exact, case-sensitive type name
    Only(String),
}

impl TypeFilter {
    /// Parse a dropdown label; "All Types" selects everything.
    pub fn from_label(label: &str) -> Self {
        if label == "All Types" {
            TypeFilter::AllTypes
        } else {
            TypeFilter::Only(label.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            TypeFilter::AllTypes => "All Types",
            TypeFilter::Only(name) => name,
        }
    }

    /// An absent type never matches a specific type.
    pub fn matches(&self, task_type: Option<&str>) -> bool {
        match self {
            TypeFilter::AllTypes => true,
            TypeFilter::Only(wanted) => task_type == Some(wanted.as_str()),
        }
    }
}

/// Current filter selection for a view.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    search: String,
    tiers: HashMap<TierLevel, bool>,
    pub status: StatusFilter,
    pub task_type: TypeFilter,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Search text as entered.
    pub fn search(&self) -> &str {
        &self.search
    }

    /// Set the search text. Matching is case-insensitive.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    /// Enable or disable a tier.
    pub fn set_tier_enabled(&mut self, tier: TierLevel, enabled: bool) {
        self.tiers.insert(tier, enabled);
    }

    /// Tiers without an explicit toggle are enabled.
    pub fn is_tier_enabled(&self, tier: TierLevel) -> bool {
        self.tiers.get(&tier).copied().unwrap_or(true)
    }

    /// Re-enable every tier and clear all other criteria.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn matches_search(&self, achievement: &CombatAchievement) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let term = self.search.to_lowercase();
        achievement.name().to_lowercase().contains(&term)
            || achievement.description().to_lowercase().contains(&term)
    }

    /// Tier strings with no known tier have no toggle and always pass.
    fn matches_tier(&self, achievement: &CombatAchievement) -> bool {
        TierLevel::from_name(achievement.tier())
            .map_or(true, |tier| self.is_tier_enabled(tier))
    }

    /// Whether `achievement` passes every criterion.
    pub fn matches(&self, achievement: &CombatAchievement) -> bool {
        self.matches_search(achievement)
            && self.matches_tier(achievement)
            && self.status.matches(achievement.is_completed())
            && self.task_type.matches(achievement.task_type())
    }
}

/// Keep the records that pass `filter`, in their original order.
pub fn filter_achievements<'a>(
    achievements: impl IntoIterator<Item = &'a CombatAchievement>,
    filter: &FilterState,
) -> Vec<&'a CombatAchievement> {
    achievements
        .into_iter()
        .filter(|achievement| filter.matches(achievement))
        .collect()
}
