//! Text for chat notifications and the stats panel.

use crate::stats::{BossSummary, PointTotals};
use crate::tier_goal::GoalTarget;

/// Prefix on every chat message the tracker sends.
pub const CHAT_PREFIX: &str = "[Combat Achievements] ";

/// Whether a game chat message announces a combat task completion.
///
/// Which task was completed is not extracted; the caller reloads.
pub fn is_task_completion_message(message: &str) -> bool {
    message.contains("Congratulations, you've completed") && message.contains("combat task")
}

/// Chat line reporting progress toward the goal.
pub fn progress_message(target: &GoalTarget) -> String {
    if target.is_met() {
        format!(
            "{}{} tier completed! ({} points)",
            CHAT_PREFIX,
            target.tier.name(),
            target.completed_points
        )
    } else {
        format!(
            "{}Progress: {}/{} points ({} points to {})",
            CHAT_PREFIX,
            target.completed_points,
            target.threshold,
            target.remaining(),
            target.tier.name()
        )
    }
}

fn points_text(totals: &PointTotals) -> String {
    format!(
        "{}/{} pts ({} tasks)",
        totals.completed_points, totals.total_points, totals.count
    )
}

/// Total progress line, e.g. "12/40 pts (20 tasks)".
pub fn total_label(totals: &PointTotals, compact: bool) -> String {
    if compact {
        format!("Total: {}", points_text(totals))
    } else {
        points_text(totals)
    }
}

/// Tracked progress line.
pub fn tracked_label(totals: &PointTotals, compact: bool) -> String {
    if compact {
        format!("Tracked: {}", points_text(totals))
    } else {
        points_text(totals)
    }
}

/// Goal line: completion when met, otherwise a countdown. Never negative.
pub fn goal_label(target: &GoalTarget, compact: bool) -> String {
    let text = if target.is_met() {
        format!(
            "{} Completed! ({} pts)",
            target.tier.name(),
            target.completed_points
        )
    } else {
        format!("{} pts to {}", target.remaining(), target.tier.name())
    };
    if compact {
        format!("Goal: {}", text)
    } else {
        text
    }
}

/// Boss overview line, e.g. "3/40 complete".
pub fn boss_label(summary: &BossSummary, compact: bool) -> String {
    let text = format!(
        "{}/{} complete",
        summary.completed_bosses, summary.total_bosses
    );
    if compact {
        format!("Bosses: {}", text)
    } else {
        text
    }
}
