//! Per-question, per-group score ledger.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Number of competing groups.
pub const GROUP_COUNT: usize = 8;

/// A single point awarded or taken away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreDelta {
    Add,
    Subtract,
}

impl ScoreDelta {
    pub fn from_key(c: char) -> Option<Self> {
        match c {
            '+' | '=' => Some(Self::Add),
            '-' | '_' => Some(Self::Subtract),
            _ => None,
        }
    }

    fn apply_to(self, score: u32) -> u32 {
        match self {
            Self::Add => score.saturating_add(1),
            // Floor at zero: subtracting from an empty score is a no-op.
            Self::Subtract => score.saturating_sub(1),
        }
    }
}

/// Scores keyed by question id, then by group index. Missing cells are 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreLedger {
    scores: BTreeMap<String, BTreeMap<usize, u32>>,
}

impl ScoreLedger {
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Current score for one cell.
    pub fn score(&self, question_id: &str, group: usize) -> u32 {
        self.scores
            .get(question_id)
            .and_then(|groups| groups.get(&group))
            .copied()
            .unwrap_or(0)
    }

    /// Scores of every group on one question.
    pub fn question_scores(&self, question_id: &str) -> [u32; GROUP_COUNT] {
        let mut row = [0; GROUP_COUNT];
        for (g, slot) in row.iter_mut().enumerate() {
            *slot = self.score(question_id, g);
        }
        row
    }

    /// Change one cell by one point and return its new value.
    ///
    /// Group indices outside `0..GROUP_COUNT` leave the ledger untouched.
    pub fn apply_delta(&mut self, question_id: &str, group: usize, delta: ScoreDelta) -> u32 {
        if group >= GROUP_COUNT {
            tracing::warn!(group, "ignoring score delta for out-of-range group");
            return 0;
        }

        let cell = self
            .scores
            .entry(question_id.to_string())
            .or_default()
            .entry(group)
            .or_insert(0);
        *cell = delta.apply_to(*cell);
        tracing::debug!(question_id, group, ?delta, score = *cell, "score changed");
        *cell
    }

    /// Sum of each group's score over every question, for groups `0..groups`.
    /// Sums saturate at `u32::MAX`.
    pub fn totals(&self, groups: usize) -> Vec<u32> {
        let mut totals: Vec<u32> = vec![0; groups];
        for row in self.scores.values() {
            for (&g, &score) in row {
                if let Some(total) = totals.get_mut(g) {
                    *total = total.saturating_add(score);
                }
            }
        }
        totals
    }

    /// Drop every entry.
    pub fn reset(&mut self) {
        self.scores.clear();
    }

    /// Every group index is in range.
    pub fn is_well_formed(&self) -> bool {
        self.scores
            .values()
            .all(|row| row.keys().all(|&g| g < GROUP_COUNT))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cells_read_as_zero() {
        let ledger = ScoreLedger::default();
        assert_eq!(ledger.score("q", 3), 0);
        assert_eq!(ledger.totals(GROUP_COUNT), vec![0; GROUP_COUNT]);
    }

    #[test]
    fn add_then_subtract_restores_score() {
        let mut ledger = ScoreLedger::default();
        ledger.apply_delta("q", 2, ScoreDelta::Add);
        let before = ledger.score("q", 2);
        ledger.apply_delta("q", 2, ScoreDelta::Add);
        ledger.apply_delta("q", 2, ScoreDelta::Subtract);
        assert_eq!(ledger.score("q", 2), before);
    }

    #[test]
    fn subtract_at_zero_is_floored_and_not_reversible() {
        let mut ledger = ScoreLedger::default();
        assert_eq!(ledger.apply_delta("q", 0, ScoreDelta::Subtract), 0);
        assert_eq!(ledger.apply_delta("q", 0, ScoreDelta::Subtract), 0);
        // The inverse of the floored subtract lands one above where we started.
        assert_eq!(ledger.apply_delta("q", 0, ScoreDelta::Add), 1);
    }

    #[test]
    fn delta_touches_only_one_cell() {
        let mut ledger = ScoreLedger::default();
        ledger.apply_delta("a", 1, ScoreDelta::Add);
        let snapshot = ledger.clone();
        ledger.apply_delta("b", 4, ScoreDelta::Add);

        assert_eq!(ledger.score("a", 1), snapshot.score("a", 1));
        assert_eq!(ledger.score("b", 4), 1);
        assert_eq!(ledger.question_scores("a"), snapshot.question_scores("a"));
    }

    #[test]
    fn out_of_range_group_is_ignored() {
        let mut ledger = ScoreLedger::default();
        ledger.apply_delta("q", GROUP_COUNT, ScoreDelta::Add);
        assert!(ledger.is_empty());
        assert!(ledger.is_well_formed());
    }

    #[test]
    fn totals_sum_across_questions() {
        let mut ledger = ScoreLedger::default();
        for _ in 0..3 {
            ledger.apply_delta("a", 0, ScoreDelta::Add);
        }
        ledger.apply_delta("b", 0, ScoreDelta::Add);
        ledger.apply_delta("b", 7, ScoreDelta::Add);

        let totals = ledger.totals(GROUP_COUNT);
        assert_eq!(totals[0], 4);
        assert_eq!(totals[7], 1);
        assert_eq!(totals.iter().sum::<u32>(), 5);
        assert_eq!(ledger.question_scores("a"), [3, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn totals_do_not_depend_on_question_order() {
        let deltas = [("x", 1), ("y", 1), ("z", 5), ("x", 5), ("y", 1)];

        let mut forward = ScoreLedger::default();
        for (q, g) in deltas {
            forward.apply_delta(q, g, ScoreDelta::Add);
        }
        let mut backward = ScoreLedger::default();
        for (q, g) in deltas.iter().rev() {
            backward.apply_delta(q, *g, ScoreDelta::Add);
        }

        assert_eq!(forward.totals(GROUP_COUNT), backward.totals(GROUP_COUNT));
    }

    #[test]
    fn totals_with_fewer_groups_truncate() {
        let mut ledger = ScoreLedger::default();
        ledger.apply_delta("q", 6, ScoreDelta::Add);
        assert_eq!(ledger.totals(4), vec![0, 0, 0, 0]);
    }

    #[test]
    fn reset_clears_everything() {
        let mut ledger = ScoreLedger::default();
        ledger.apply_delta("q", 1, ScoreDelta::Add);
        ledger.reset();
        assert_eq!(ledger, ScoreLedger::default());
    }

    #[test]
    fn delta_from_key() {
        assert_eq!(ScoreDelta::from_key('+'), Some(ScoreDelta::Add));
        assert_eq!(ScoreDelta::from_key('-'), Some(ScoreDelta::Subtract));
        assert_eq!(ScoreDelta::from_key('x'), None);
    }

    #[test]
    fn serializes_group_keys_as_strings() {
        let mut ledger = ScoreLedger::default();
        ledger.apply_delta("q1", 3, ScoreDelta::Add);
        let json = serde_json::to_string(&ledger).unwrap();
        assert_eq!(json, r#"{"q1":{"3":1}}"#);
        let back: ScoreLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    #[test]
    fn totals_saturate_on_huge_stored_scores() {
        let ledger: ScoreLedger =
            serde_json::from_str(r#"{"a":{"0":4294967295},"b":{"0":1,"1":2}}"#).unwrap();
        assert!(ledger.is_well_formed());

        let totals = ledger.totals(GROUP_COUNT);
        assert_eq!(totals[0], u32::MAX);
        assert_eq!(totals[1], 2);
    }
}
