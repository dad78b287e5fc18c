//! Conversion of host game data into achievement records.
//!
//! The host exposes tasks per tier, a packed completion bitfield spread over
//! twenty player variables, and the tier point thresholds as variable bits.
//! Everything here is pure over what the host hands back.

use super::types::{AchievementId, CombatAchievement, TierLevel};
use crate::tier_goal::TierThresholds;

/// Number of packed completion variables (32 tasks each).
pub const COMPLETION_VARP_COUNT: usize = 20;

/// Host enum ids holding the task structs of each tier.
pub const TIER_ENUM_IDS: [(u32, TierLevel); 6] = [
    (3981, TierLevel::Easy),
    (3982, TierLevel::Medium),
    (3983, TierLevel::Hard),
    (3984, TierLevel::Elite),
    (3985, TierLevel::Master),
    (3986, TierLevel::Grandmaster),
];

/// Host variable bits holding each tier's point threshold.
pub const TIER_THRESHOLD_VARBITS: [(u32, TierLevel); 6] = [
    (4132, TierLevel::Easy),
    (10660, TierLevel::Medium),
    (10661, TierLevel::Hard),
    (14812, TierLevel::Elite),
    (14813, TierLevel::Master),
    (14814, TierLevel::Grandmaster),
];

/// Boss name used by the host when a task has no boss.
pub const UNKNOWN_BOSS: &str = "Unknown";

/// Task type name for a host type id.
pub fn task_type_name(type_id: i32) -> Option<&'static str> {
    match type_id {
        1 => Some("Stamina"),
        2 => Some("Perfection"),
        3 => Some("Kill Count"),
        4 => Some("Mechanical"),
        5 => Some("Restriction"),
        6 => Some("Speed"),
        _ => None,
    }
}

/// Whether task `id` is set in the packed completion variables.
///
/// Task `n` lives in bit `n % 32` of variable `n / 32`. Ids past the packed
/// range, or variables the host did not supply, read as incomplete.
pub fn is_task_completed(varps: &[i32], id: AchievementId) -> bool {
    let index = (id / 32) as usize;
    if index >= COMPLETION_VARP_COUNT {
        return false;
    }
    let bit = id % 32;
    varps
        .get(index)
        .is_some_and(|value| (*value as u32) & (1u32 << bit) != 0)
}

/// One task row as read from the host's struct definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct HostTask {
    pub id: AchievementId,
    pub name: String,
    pub description: String,
    pub type_id: i32,
    pub boss_name: Option<String>,
}

/// Read access to the host's game data.
pub trait GameDataSource {
    /// Tasks of one tier, or `None` if the tier's enum is unavailable.
    fn tier_tasks(&self, tier: TierLevel) -> Option<Vec<HostTask>>;

    /// The packed completion variables, in index order.
    fn completion_varps(&self) -> Vec<i32>;

    /// Value of a variable bit, or `None` if it cannot be read.
    fn varbit(&self, varbit_id: u32) -> Option<i32>;
}

/// Build a record for one host task.
pub fn build_achievement(task: HostTask, tier: TierLevel, varps: &[i32]) -> CombatAchievement {
    let completed = is_task_completed(varps, task.id);
    let boss = task
        .boss_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| UNKNOWN_BOSS.to_string());

    let mut achievement = CombatAchievement::new(
        task.id,
        task.name,
        task.description,
        tier.name(),
        tier.base_points(),
    )
    .with_boss(boss)
    .with_completed(completed);

    if let Some(task_type) = task_type_name(task.type_id) {
        achievement = achievement.with_type(task_type);
    }
    achievement
}

/// Load the full achievement list from the host, tier by tier.
///
/// Tiers whose enum is unavailable are skipped with a warning.
pub fn load_achievements(source: &dyn GameDataSource) -> Vec<CombatAchievement> {
    let varps = source.completion_varps();
    let mut achievements = Vec::new();

    for (enum_id, tier) in TIER_ENUM_IDS {
        let Some(tasks) = source.tier_tasks(tier) else {
            tracing::warn!(tier = tier.name(), enum_id, "tier enum unavailable");
            continue;
        };
        tracing::debug!(tier = tier.name(), count = tasks.len(), "processing tier tasks");
        achievements.extend(
            tasks
                .into_iter()
                .map(|task| build_achievement(task, tier, &varps)),
        );
    }

    tracing::debug!(count = achievements.len(), "loaded achievements from host");
    achievements
}

/// Read tier thresholds from the host, falling back per tier to the fixed values.
pub fn load_tier_thresholds(source: &dyn GameDataSource) -> TierThresholds {
    TierThresholds::from_host_values(
        TIER_THRESHOLD_VARBITS
            .iter()
            .filter_map(|(varbit, tier)| source.varbit(*varbit).map(|value| (*tier, value))),
    )
}
