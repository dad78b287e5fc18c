//! Progress aggregation over achievement lists.

use crate::achievements::CombatAchievement;
use std::collections::BTreeMap;

/// Point and task counts over a list of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PointTotals {
    pub total_points: u32,
    pub completed_points: u32,
    pub count: usize,
    pub completed_count: usize,
}

impl PointTotals {
    pub fn from_achievements<'a>(
        achievements: impl IntoIterator<Item = &'a CombatAchievement>,
    ) -> Self {
        achievements
            .into_iter()
            .fold(Self::default(), |mut totals, achievement| {
                totals.total_points += achievement.points();
                totals.count += 1;
                if achievement.is_completed() {
                    totals.completed_points += achievement.points();
                    totals.completed_count += 1;
                }
                totals
            })
    }
}

/// Sum of points over completed records.
///
/// Callers pass the full achievement set: this number drives the tier goal
/// and must not depend on the current view.
pub fn total_completed_points<'a>(
    achievements: impl IntoIterator<Item = &'a CombatAchievement>,
) -> u32 {
    achievements
        .into_iter()
        .filter(|achievement| achievement.is_completed())
        .map(CombatAchievement::points)
        .sum()
}

/// Global, visible and tracked totals for the stats panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressStats {
    /// Every loaded record
    pub overall: PointTotals,
    /// The current filtered view only
    pub visible: PointTotals,
    /// The tracked set, regardless of view
    pub tracked: PointTotals,
}

impl ProgressStats {
    pub fn calculate<'a>(
        all: impl IntoIterator<Item = &'a CombatAchievement>,
        visible: impl IntoIterator<Item = &'a CombatAchievement>,
        tracked: impl IntoIterator<Item = &'a CombatAchievement>,
    ) -> Self {
        Self {
            overall: PointTotals::from_achievements(all),
            visible: PointTotals::from_achievements(visible),
            tracked: PointTotals::from_achievements(tracked),
        }
    }

    /// Completed points across every record; the tier goal input.
    pub fn total_completed_points(&self) -> u32 {
        self.overall.completed_points
    }
}

/// Completion counts for one boss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BossStats {
    pub total: usize,
    pub completed: usize,
}

impl BossStats {
    pub fn is_fully_completed(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Per-boss completion counts, keyed and ordered by boss name.
///
/// Records without a boss (absent, blank or "Unknown") are skipped.
pub fn boss_stats<'a>(
    achievements: impl IntoIterator<Item = &'a CombatAchievement>,
) -> BTreeMap<String, BossStats> {
    let mut stats: BTreeMap<String, BossStats> = BTreeMap::new();
    for achievement in achievements {
        let Some(boss) = achievement.boss_name() else {
            continue;
        };
        let entry = stats.entry(boss.to_string()).or_default();
        entry.total += 1;
        if achievement.is_completed() {
            entry.completed += 1;
        }
    }
    stats
}

/// How many bosses have every task done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BossSummary {
    pub total_bosses: usize,
    pub completed_bosses: usize,
}

impl BossSummary {
    pub fn from_stats(stats: &BTreeMap<String, BossStats>) -> Self {
        Self {
            total_bosses: stats.len(),
            completed_bosses: stats.values().filter(|s| s.is_fully_completed()).count(),
        }
    }
}
