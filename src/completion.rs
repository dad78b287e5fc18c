//! Wiki completion percentages and their merge into achievement records.
//!
//! Fetching and parsing the wiki page happens outside this crate. The
//! result is a map from task display name to percentage (0-100).

use crate::achievements::CombatAchievement;
use std::collections::HashMap;

/// Lowercase, drop everything but ASCII letters, digits and whitespace,
/// collapse whitespace runs and trim.
pub fn normalize_task_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let kept: String = lowered
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Completion percentages keyed by task name.
#[derive(Debug, Clone, Default)]
pub struct CompletionPercentages {
    by_name: HashMap<String, f64>,
    by_normalized: HashMap<String, f64>,
}

impl CompletionPercentages {
    pub fn new(percentages: HashMap<String, f64>) -> Self {
        let by_normalized = percentages
            .iter()
            .map(|(name, pct)| (normalize_task_name(name), *pct))
            .collect();
        let by_name = percentages
            .into_iter()
            .map(|(name, pct)| (name.trim().to_string(), pct))
            .collect();
        Self {
            by_name,
            by_normalized,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Exact name first, then normalized name.
    pub fn lookup(&self, name: &str) -> Option<f64> {
        self.by_name
            .get(name)
            .or_else(|| self.by_normalized.get(&normalize_task_name(name)))
            .copied()
    }

    /// Set each record's percentage; unmatched records become `None`.
    /// Returns how many records matched.
    pub fn hydrate<'a>(
        &self,
        achievements: impl IntoIterator<Item = &'a mut CombatAchievement>,
    ) -> usize {
        let mut matched = 0;
        for achievement in achievements {
            let pct = self.lookup(achievement.name());
            if pct.is_some() {
                matched += 1;
            }
            achievement.set_completion_percentage(pct);
        }
        tracing::debug!(matched, known = self.len(), "hydrated completion percentages");
        matched
    }
}

impl FromIterator<(String, f64)> for CompletionPercentages {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_task_name() {
        assert_eq!(normalize_task_name("  Can't   Touch This! "), "cant touch this");
        assert_eq!(normalize_task_name("Perfect Olm (Solo)"), "perfect olm solo");
        assert_eq!(normalize_task_name("Tzhaar-Ket-Rak's Speed"), "tzhaarketraks speed");
    }

    #[test]
    fn test_lookup_exact_then_normalized() {
        let pcts: CompletionPercentages = [
            ("Noxious Foe".to_string(), 55.2),
            ("Can't Touch This".to_string(), 3.1),
        ]
        .into_iter()
        .collect();

        assert_eq!(pcts.lookup("Noxious Foe"), Some(55.2));
        assert_eq!(pcts.lookup("cant touch this"), Some(3.1));
        assert_eq!(pcts.lookup("Missing Task"), None);
    }

    #[test]
    fn test_hydrate_clears_unmatched() {
        let pcts: CompletionPercentages =
            [("Noxious Foe".to_string(), 55.2)].into_iter().collect();

        let mut records = vec![
            CombatAchievement::new(1, "Noxious Foe", "", "Easy", 1),
            CombatAchievement::new(2, "Other", "", "Easy", 1),
        ];
        records[1].set_completion_percentage(Some(9.0));

        let matched = pcts.hydrate(records.iter_mut());
        assert_eq!(matched, 1);
        assert_eq!(records[0].completion_percentage(), Some(55.2));
        assert_eq!(records[1].completion_percentage(), None);
    }

    #[test]
    fn test_empty_map_leaves_all_absent() {
        let pcts = CompletionPercentages::default();
        let mut records = vec![CombatAchievement::new(1, "Noxious Foe", "", "Easy", 1)];
        assert_eq!(pcts.hydrate(records.iter_mut()), 0);
        assert_eq!(records[0].completion_percentage(), None);
    }
}
