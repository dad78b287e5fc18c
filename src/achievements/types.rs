//! Combat achievement record and tier types.

use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable task identifier assigned by the game.
pub type AchievementId = u32;

/// Highest user difficulty rating. 0 means unrated.
pub const MAX_USER_DIFFICULTY: u8 = 5;

/// Base URL for generated wiki links.
pub const WIKI_BASE_URL: &str = "https://oldschool.runescape.wiki/w/";

/// Known task types, in filter display order.
pub const TASK_TYPES: [&str; 7] = [
    "Stamina",
    "Perfection",
    "Kill Count",
    "Mechanical",
    "Restriction",
    "Speed",
    "Other",
];

/// Difficulty tier of a combat achievement.
///
/// Tiers have a strict total order: Easy < Medium < Hard < Elite < Master <
/// Grandmaster. The order is given by [`TierLevel::order`], not by the
/// declaration order of the variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TierLevel {
    Easy,
    Medium,
    Hard,
    Elite,
    Master,
    Grandmaster,
}

impl TierLevel {
    /// All tiers from lowest to highest.
    pub const ALL: [TierLevel; 6] = [
        TierLevel::Easy,
        TierLevel::Medium,
        TierLevel::Hard,
        TierLevel::Elite,
        TierLevel::Master,
        TierLevel::Grandmaster,
    ];

    /// Position in the tier order (Easy = 0 ... Grandmaster = 5).
    pub fn order(self) -> u8 {
        match self {
            TierLevel::Easy => 0,
            TierLevel::Medium => 1,
            TierLevel::Hard => 2,
            TierLevel::Elite => 3,
            TierLevel::Master => 4,
            TierLevel::Grandmaster => 5,
        }
    }

    /// Display name for the tier.
    pub fn name(self) -> &'static str {
        match self {
            TierLevel::Easy => "Easy",
            TierLevel::Medium => "Medium",
            TierLevel::Hard => "Hard",
            TierLevel::Elite => "Elite",
            TierLevel::Master => "Master",
            TierLevel::Grandmaster => "Grandmaster",
        }
    }

    /// Points awarded for completing one task of this tier.
    pub fn base_points(self) -> u32 {
        u32::from(self.order()) + 1
    }

    /// Display color as RGB.
    pub fn color(self) -> (u8, u8, u8) {
        match self {
            TierLevel::Easy => (205, 133, 63),
            TierLevel::Medium => (169, 169, 169),
            TierLevel::Hard => (105, 105, 105),
            TierLevel::Elite => (100, 149, 237),
            TierLevel::Master => (220, 20, 60),
            TierLevel::Grandmaster => (255, 215, 0),
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<TierLevel> {
        let name = name.trim();
        TierLevel::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(name))
    }

    /// Lookup by display name, falling back to Easy for unknown names.
    pub fn from_name_or_easy(name: &str) -> TierLevel {
        TierLevel::from_name(name).unwrap_or_else(|| {
            tracing::warn!(tier = name, "unknown tier name, defaulting to Easy");
            TierLevel::Easy
        })
    }
}

impl PartialOrd for TierLevel {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TierLevel {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.order().cmp(&other.order())
    }
}

impl fmt::Display for TierLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single combat achievement.
///
/// Two records are equal iff their ids match. Classification fields are
/// fixed at construction; completion, tracking, rating and the wiki
/// completion percentage are session state.
#[derive(Debug, Clone)]
pub struct CombatAchievement {
    id: AchievementId,
    name: String,
    description: String,
    tier: String,
    tier_level: TierLevel,
    points: u32,
    boss_name: Option<String>,
    task_type: Option<String>,

    completed: bool,
    completed_timestamp: Option<i64>,
    tracked: bool,
    user_difficulty: u8,
    completion_percentage: Option<f64>,
    wiki_url: Option<String>,
}

impl CombatAchievement {
    /// Create an incomplete, untracked achievement.
    pub fn new(
        id: AchievementId,
        name: impl Into<String>,
        description: impl Into<String>,
        tier: impl Into<String>,
        points: u32,
    ) -> Self {
        let tier = tier.into();
        let tier_level = TierLevel::from_name_or_easy(&tier);
        Self {
            id,
            name: name.into(),
            description: description.into(),
            tier,
            tier_level,
            points,
            boss_name: None,
            task_type: None,
            completed: false,
            completed_timestamp: None,
            tracked: false,
            user_difficulty: 0,
            completion_percentage: None,
            wiki_url: None,
        }
    }

    /// Set the associated boss.
    pub fn with_boss(mut self, boss_name: impl Into<String>) -> Self {
        self.boss_name = Some(boss_name.into());
        self
    }

    /// Set the task type (Kill Count, Perfection, ...).
    pub fn with_type(mut self, task_type: impl Into<String>) -> Self {
        self.task_type = Some(task_type.into());
        self
    }

    /// Set an explicit wiki URL instead of the generated one.
    pub fn with_wiki_url(mut self, url: impl Into<String>) -> Self {
        self.wiki_url = Some(url.into());
        self
    }

    /// Set the completion state as reported by the host.
    pub fn with_completed(mut self, completed: bool) -> Self {
        if completed {
            self.mark_completed();
        }
        self
    }

    pub fn id(&self) -> AchievementId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Tier name exactly as supplied by the host.
    pub fn tier(&self) -> &str {
        &self.tier
    }

    pub fn tier_level(&self) -> TierLevel {
        self.tier_level
    }

    pub fn points(&self) -> u32 {
        self.points
    }

    /// Boss name, or `None` when absent, blank or "Unknown".
    pub fn boss_name(&self) -> Option<&str> {
        self.boss_name
            .as_deref()
            .filter(|name| !name.trim().is_empty() && *name != "Unknown")
    }

    /// Boss name exactly as supplied, including "Unknown".
    pub fn raw_boss_name(&self) -> Option<&str> {
        self.boss_name.as_deref()
    }

    pub fn task_type(&self) -> Option<&str> {
        self.task_type.as_deref()
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Epoch milliseconds of the false to true completion transition.
    pub fn completed_timestamp(&self) -> Option<i64> {
        self.completed_timestamp
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    /// User difficulty rating, 0 when unrated.
    pub fn user_difficulty(&self) -> u8 {
        self.user_difficulty
    }

    /// Percentage of players who completed this task, when known.
    pub fn completion_percentage(&self) -> Option<f64> {
        self.completion_percentage
    }

    /// Mark completed now. Returns true if newly completed.
    pub fn mark_completed(&mut self) -> bool {
        self.mark_completed_at(chrono::Utc::now().timestamp_millis())
    }

    /// Mark completed at the given epoch milliseconds. Returns true if newly completed.
    pub fn mark_completed_at(&mut self, timestamp_ms: i64) -> bool {
        if self.completed {
            return false;
        }
        self.completed = true;
        self.completed_timestamp = Some(timestamp_ms);
        true
    }

    /// Set the user difficulty rating (0 clears it).
    pub fn set_user_difficulty(&mut self, rating: u8) -> Result<()> {
        if rating > MAX_USER_DIFFICULTY {
            return Err(TrackerError::InvalidDifficulty(rating));
        }
        self.user_difficulty = rating;
        Ok(())
    }

    pub(crate) fn clear_user_difficulty(&mut self) {
        self.user_difficulty = 0;
    }

    pub fn set_completion_percentage(&mut self, percentage: Option<f64>) {
        self.completion_percentage = percentage;
    }

    // Tracked membership is owned by the store; the flag mirrors it.
    pub(crate) fn set_tracked(&mut self, tracked: bool) {
        self.tracked = tracked;
    }

    /// Wiki page for this task, generated from the name unless set explicitly.
    pub fn wiki_url(&self) -> String {
        match &self.wiki_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => format!(
                "{}{}",
                WIKI_BASE_URL,
                self.name.replace(' ', "_").replace('\'', "%27")
            ),
        }
    }
}

impl PartialEq for CombatAchievement {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CombatAchievement {}

impl Hash for CombatAchievement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
