/// Tier mapping: ranked items → contiguous tier buckets.
///
/// Pure function of (scores, pool order, tier list). No state.
use std::collections::HashMap;

use tracing::warn;

use crate::types::{ItemId, RankedItem, TierId};

/// One item's destination tier.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub item: ItemId,
    pub tier: TierId,
    /// Score the placement was based on.
    pub score: f64,
}

/// The result of a finished session: every pool item with its tier, in
/// final ranking order. Applied by the caller as one undoable unit.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssignmentBatch {
    assignments: Vec<Assignment>,
}

impl AssignmentBatch {
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.iter()
    }

    pub fn tier_of(&self, item: &str) -> Option<&str> {
        self.assignments.iter()
            .find(|a| a.item == item)
            .map(|a| a.tier.as_str())
    }

    /// Items assigned to `tier`, in ranking order.
    pub fn items_in(&self, tier: &str) -> Vec<&str> {
        self.assignments.iter()
            .filter(|a| a.tier == tier)
            .map(|a| a.item.as_str())
            .collect()
    }

    /// Only the assignments that move an item away from its `current` tier.
    /// Items missing from `current` count as moved.
    pub fn delta(&self, current: &HashMap<ItemId, TierId>) -> Vec<&Assignment> {
        self.assignments.iter()
            .filter(|a| current.get(&a.item) != Some(&a.tier))
            .collect()
    }
}

impl IntoIterator for AssignmentBatch {
    type Item = Assignment;
    type IntoIter = std::vec::IntoIter<Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.assignments.into_iter()
    }
}

/// Bucket sizes for `num_items` over `num_tiers`: each tier gets
/// `num_items / num_tiers`, and the first `num_items % num_tiers` tiers one
/// more. No two sizes differ by more than one.
pub fn tier_sizes(num_items: usize, num_tiers: usize) -> Vec<usize> {
    if num_tiers == 0 {
        return Vec::new();
    }
    let base = num_items / num_tiers;
    let extra = num_items % num_tiers;
    (0..num_tiers)
        .map(|i| base + usize::from(i < extra))
        .collect()
}

/// Assign items to tiers by score.
///
/// `scored` must be in pool order: the sort is stable, so equal scores keep
/// that order. The highest scores go to `tiers[0]`. `tiers` should not
/// include the caller's catch-all tier; nothing is ever placed there.
pub fn assign_tiers(scored: &[RankedItem], tiers: &[TierId]) -> AssignmentBatch {
    if tiers.is_empty() {
        warn!(items = scored.len(), "no destination tiers, nothing assigned");
        return AssignmentBatch::default();
    }

    let mut order: Vec<&RankedItem> = scored.iter().collect();
    order.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut assignments = Vec::with_capacity(order.len());
    let mut ranked = order.into_iter();
    for (tier, size) in tiers.iter().zip(tier_sizes(scored.len(), tiers.len())) {
        for item in ranked.by_ref().take(size) {
            assignments.push(Assignment {
                item: item.item.clone(),
                tier: tier.clone(),
                score: item.score,
            });
        }
    }

    AssignmentBatch { assignments }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn item(id: &str, score: f64) -> RankedItem {
        RankedItem {
            item: id.to_string(),
            score,
            lower_bound: score,
            upper_bound: 1.0,
            wins: 0,
            losses: 0,
        }
    }

    fn tiers(names: &[&str]) -> Vec<TierId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_tier_sizes_front_loaded() {
        assert_eq!(tier_sizes(3, 2), vec![2, 1]);
        assert_eq!(tier_sizes(10, 4), vec![3, 3, 2, 2]);
        assert_eq!(tier_sizes(5, 4), vec![2, 1, 1, 1]);
        assert_eq!(tier_sizes(2, 5), vec![1, 1, 0, 0, 0]);
        assert_eq!(tier_sizes(6, 3), vec![2, 2, 2]);
        assert!(tier_sizes(4, 0).is_empty());
    }

    #[test]
    fn test_every_item_assigned_once_and_balanced() {
        for n in 0..25 {
            for k in 1..8 {
                let scored: Vec<RankedItem> = (0..n)
                    .map(|i| item(&format!("item{i}"), ((i * 7) % 5) as f64 / 5.0))
                    .collect();
                let tier_ids: Vec<TierId> = (0..k).map(|t| format!("t{t}")).collect();
                let batch = assign_tiers(&scored, &tier_ids);

                assert_eq!(batch.len(), n);
                let unique: HashSet<&str> = batch.iter().map(|a| a.item.as_str()).collect();
                assert_eq!(unique.len(), n);

                let counts: Vec<usize> = tier_ids.iter().map(|t| batch.items_in(t).len()).collect();
                let max = counts.iter().max().copied().unwrap_or(0);
                let min = counts.iter().min().copied().unwrap_or(0);
                assert!(max - min <= 1, "n={n} k={k} counts={counts:?}");
            }
        }
    }

    #[test]
    fn test_highest_scores_go_to_first_tier() {
        let scored = vec![item("low", 0.1), item("high", 0.9), item("mid", 0.5)];
        let batch = assign_tiers(&scored, &tiers(&["S", "A", "B"]));
        assert_eq!(batch.tier_of("high"), Some("S"));
        assert_eq!(batch.tier_of("mid"), Some("A"));
        assert_eq!(batch.tier_of("low"), Some("B"));
    }

    #[test]
    fn test_ties_keep_pool_order() {
        let scored = vec![item("a", 0.5), item("b", 0.5), item("c", 0.5), item("d", 0.5)];
        let batch = assign_tiers(&scored, &tiers(&["S", "A", "B"]));
        assert_eq!(batch.items_in("S"), vec!["a", "b"]);
        assert_eq!(batch.items_in("A"), vec!["c"]);
        assert_eq!(batch.items_in("B"), vec!["d"]);
    }

    #[test]
    fn test_no_tiers_yields_empty_batch() {
        let scored = vec![item("a", 0.5), item("b", 0.2)];
        assert!(assign_tiers(&scored, &[]).is_empty());
    }

    #[test]
    fn test_delta_only_reports_moves() {
        let scored = vec![item("a", 0.9), item("b", 0.1), item("c", 0.4)];
        let batch = assign_tiers(&scored, &tiers(&["S", "A"]));

        let mut current = HashMap::new();
        current.insert("a".to_string(), "S".to_string());
        current.insert("b".to_string(), "S".to_string());

        let moved: Vec<&str> = batch.delta(&current).iter().map(|a| a.item.as_str()).collect();
        assert_eq!(moved, vec!["c", "b"]);
    }
}
