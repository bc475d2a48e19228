/// Pair scheduling for head-to-head sessions.
///
/// Public functions accept `item_ids: &[ItemId]` and return `Pair`.
/// The scheduler itself works on `usize` pool indices.
use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::scoring::intervals_overlap;
use crate::types::{IndexedPair, ItemId, Pair, RankedItem};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Idle,
    QuickPass,
    Refinement,
    /// Working through pairs that were skipped earlier in the current pass.
    ReviewingSkipped,
    Complete,
}

/// Whether a second pass re-asks the ambiguous pairs after the quick pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Refinement {
    /// Re-compare pairs whose Wilson intervals overlap and whose
    /// head-to-head result the scores don't already confirm.
    #[default]
    Overlap,
    /// Finish right after the quick pass.
    Off,
}

/// Main pass the scheduler is in. `ReviewingSkipped` is layered on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    QuickPass,
    Refinement,
    Complete,
}

// ---------------------------------------------------------------------------
// Public pairing functions (work with item IDs)
// ---------------------------------------------------------------------------

/// Every unordered pair of `item_ids`, once, in pool-index order:
/// `(0,1), (0,2), …, (1,2), …`.
pub fn generate_quick_pass_pairings(item_ids: &[ItemId]) -> Vec<Pair> {
    generate_quick_pass_pairings_indexed(item_ids.len())
        .into_iter()
        .map(|(a, b)| (item_ids[a].clone(), item_ids[b].clone()))
        .collect()
}

/// Pairs to re-ask in the refinement pass.
///
/// `scored[i]` is the standings row for `item_ids[i]` (pool order, not sorted).
/// `outcomes` holds the latest winner per decided pair.
pub fn generate_refinement_pairings(
    item_ids: &[ItemId],
    scored: &[RankedItem],
    outcomes: &HashMap<Pair, ItemId>,
) -> Vec<Pair> {
    let indexed: HashMap<IndexedPair, usize> = outcomes
        .iter()
        .filter_map(|((a, b), winner)| {
            let ia = item_ids.iter().position(|id| id == a)?;
            let ib = item_ids.iter().position(|id| id == b)?;
            let iw = item_ids.iter().position(|id| id == winner)?;
            Some(((ia.min(ib), ia.max(ib)), iw))
        })
        .collect();

    generate_refinement_pairings_indexed(scored, &indexed)
        .into_iter()
        .map(|(a, b)| (item_ids[a].clone(), item_ids[b].clone()))
        .collect()
}

// ---------------------------------------------------------------------------
// Internal indexed pairing functions
// ---------------------------------------------------------------------------

pub(crate) fn generate_quick_pass_pairings_indexed(num_items: usize) -> Vec<IndexedPair> {
    let mut pairs = Vec::with_capacity(num_items * num_items.saturating_sub(1) / 2);
    for a in 0..num_items {
        for b in (a + 1)..num_items {
            pairs.push((a, b));
        }
    }
    pairs
}

pub(crate) fn generate_refinement_pairings_indexed(
    scored: &[RankedItem],
    outcomes: &HashMap<IndexedPair, usize>,
) -> Vec<IndexedPair> {
    let mut pairs = Vec::new();
    for a in 0..scored.len() {
        for b in (a + 1)..scored.len() {
            if !intervals_overlap(&scored[a], &scored[b]) {
                continue;
            }
            let confirmed = match outcomes.get(&(a, b)) {
                Some(&winner) => {
                    let loser = if winner == a { b } else { a };
                    scored[winner].score > scored[loser].score
                }
                None => false,
            };
            if !confirmed {
                pairs.push((a, b));
            }
        }
    }
    pairs
}

/// Pending and deferred queues plus the phase bookkeeping around them.
#[derive(Debug, Clone)]
pub struct PairScheduler {
    pending: VecDeque<IndexedPair>,
    deferred: VecDeque<IndexedPair>,
    current: Option<IndexedPair>,
    stage: Stage,
    /// Set when the deferred queue is drained into pending, cleared when a
    /// new main pass starts.
    reviewing_skipped: bool,
    skipped_count: usize,
    refinement: Refinement,
}

impl PairScheduler {
    /// Queue the quick pass for `num_items` items and load the first pair.
    pub(crate) fn new(num_items: usize, refinement: Refinement) -> Self {
        let pending: VecDeque<IndexedPair> = generate_quick_pass_pairings_indexed(num_items).into();
        debug!(pairs = pending.len(), "quick pass queued");

        let mut scheduler = PairScheduler {
            pending,
            deferred: VecDeque::new(),
            current: None,
            stage: Stage::QuickPass,
            reviewing_skipped: false,
            skipped_count: 0,
            refinement,
        };
        scheduler.advance(Vec::new);
        scheduler
    }

    pub fn phase(&self) -> Phase {
        match self.stage {
            Stage::Complete => Phase::Complete,
            _ if self.reviewing_skipped => Phase::ReviewingSkipped,
            Stage::QuickPass => Phase::QuickPass,
            Stage::Refinement => Phase::Refinement,
        }
    }

    pub(crate) fn current(&self) -> Option<IndexedPair> {
        self.current
    }

    /// Pairs not yet decided, the current one included.
    pub fn remaining(&self) -> usize {
        self.pending.len() + self.deferred.len() + usize::from(self.current.is_some())
    }

    /// Total skips this session. Never decreases.
    pub fn skipped_count(&self) -> usize {
        self.skipped_count
    }

    /// Take the current pair off the board once it has been decided.
    pub(crate) fn take_current(&mut self) -> Option<IndexedPair> {
        self.current.take()
    }

    /// Move the current pair to the back of the deferred queue.
    pub(crate) fn defer_current(&mut self) -> Option<IndexedPair> {
        let pair = self.current.take()?;
        self.deferred.push_back(pair);
        self.skipped_count += 1;
        Some(pair)
    }

    /// Load the next pair into `current`, changing phase as queues run dry.
    ///
    /// `refine` is only called when the quick pass (and its skipped pairs)
    /// is exhausted; it returns the refinement pairs to queue.
    pub(crate) fn advance<F>(&mut self, refine: F) -> Option<IndexedPair>
    where
        F: FnOnce() -> Vec<IndexedPair>,
    {
        let mut refine = Some(refine);
        loop {
            if let Some(pair) = self.pending.pop_front() {
                self.current = Some(pair);
                return Some(pair);
            }

            if !self.deferred.is_empty() {
                debug!(pairs = self.deferred.len(), "reviewing skipped pairs");
                self.pending.extend(self.deferred.drain(..));
                self.reviewing_skipped = true;
                continue;
            }

            self.current = None;
            self.reviewing_skipped = false;

            let refinement_pairs = match (self.stage, self.refinement) {
                (Stage::QuickPass, Refinement::Overlap) => refine.take().map(|f| f()).unwrap_or_default(),
                _ => Vec::new(),
            };

            if refinement_pairs.is_empty() {
                if self.stage != Stage::Complete {
                    debug!("all pairs decided, session complete");
                }
                self.stage = Stage::Complete;
                return None;
            }

            debug!(pairs = refinement_pairs.len(), "refinement pass queued");
            self.stage = Stage::Refinement;
            self.pending.extend(refinement_pairs);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn ids(names: &[&str]) -> Vec<ItemId> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn ranked(item: &str, score: f64, lower_bound: f64, upper_bound: f64) -> RankedItem {
        RankedItem {
            item: item.to_string(),
            score,
            lower_bound,
            upper_bound,
            wins: 0,
            losses: 0,
        }
    }

    #[test]
    fn test_quick_pass_covers_every_pair_once() {
        for n in 2..12 {
            let pairs = generate_quick_pass_pairings_indexed(n);
            assert_eq!(pairs.len(), n * (n - 1) / 2);

            let unique: HashSet<IndexedPair> = pairs.iter().copied().collect();
            assert_eq!(unique.len(), pairs.len(), "duplicate pair for n={n}");
            assert!(pairs.iter().all(|&(a, b)| a < b && b < n));
        }
    }

    #[test]
    fn test_quick_pass_order_is_lexicographic() {
        let pairs = generate_quick_pass_pairings(&ids(&["a", "b", "c"]));
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "b".to_string()),
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "c".to_string()),
            ]
        );
    }

    #[test]
    fn test_scheduler_starts_on_first_pair() {
        let scheduler = PairScheduler::new(3, Refinement::Overlap);
        assert_eq!(scheduler.current(), Some((0, 1)));
        assert_eq!(scheduler.phase(), Phase::QuickPass);
        assert_eq!(scheduler.remaining(), 3);
    }

    #[test]
    fn test_skipped_pairs_come_back_after_pending() {
        let mut scheduler = PairScheduler::new(3, Refinement::Off);

        assert_eq!(scheduler.defer_current(), Some((0, 1)));
        assert_eq!(scheduler.advance(Vec::new), Some((0, 2)));
        assert_eq!(scheduler.skipped_count(), 1);
        assert_eq!(scheduler.remaining(), 3);

        scheduler.take_current();
        assert_eq!(scheduler.advance(Vec::new), Some((1, 2)));
        assert_eq!(scheduler.phase(), Phase::QuickPass);

        scheduler.take_current();
        assert_eq!(scheduler.advance(Vec::new), Some((0, 1)));
        assert_eq!(scheduler.phase(), Phase::ReviewingSkipped);
        assert_eq!(scheduler.skipped_count(), 1);

        scheduler.take_current();
        assert_eq!(scheduler.advance(Vec::new), None);
        assert_eq!(scheduler.phase(), Phase::Complete);
        assert_eq!(scheduler.remaining(), 0);
    }

    #[test]
    fn test_skipping_last_pair_requeues_it() {
        let mut scheduler = PairScheduler::new(2, Refinement::Overlap);
        scheduler.defer_current();
        assert_eq!(scheduler.advance(Vec::new), Some((0, 1)));
        assert_eq!(scheduler.phase(), Phase::ReviewingSkipped);

        // Skipping it again keeps it alive and keeps counting.
        scheduler.defer_current();
        assert_eq!(scheduler.advance(Vec::new), Some((0, 1)));
        assert_eq!(scheduler.skipped_count(), 2);
        assert_eq!(scheduler.remaining(), 1);
    }

    #[test]
    fn test_refinement_follows_quick_pass_then_completes() {
        let mut scheduler = PairScheduler::new(2, Refinement::Overlap);
        scheduler.take_current();
        assert_eq!(scheduler.advance(|| vec![(0, 1)]), Some((0, 1)));
        assert_eq!(scheduler.phase(), Phase::Refinement);

        scheduler.take_current();
        let called = std::cell::Cell::new(false);
        let next = scheduler.advance(|| {
            called.set(true);
            vec![(0, 1)]
        });
        assert_eq!(next, None);
        assert!(!called.get(), "refinement must only be generated once");
        assert_eq!(scheduler.phase(), Phase::Complete);
    }

    #[test]
    fn test_empty_refinement_completes() {
        let mut scheduler = PairScheduler::new(2, Refinement::Overlap);
        scheduler.take_current();
        assert_eq!(scheduler.advance(Vec::new), None);
        assert_eq!(scheduler.phase(), Phase::Complete);
    }

    #[test]
    fn test_refinement_off_skips_generation() {
        let mut scheduler = PairScheduler::new(2, Refinement::Off);
        scheduler.take_current();
        assert_eq!(scheduler.advance(|| vec![(0, 1)]), None);
        assert_eq!(scheduler.phase(), Phase::Complete);
    }

    #[test]
    fn test_reviewing_skipped_inside_refinement() {
        let mut scheduler = PairScheduler::new(2, Refinement::Overlap);
        scheduler.take_current();
        scheduler.advance(|| vec![(0, 1)]);
        scheduler.defer_current();
        assert_eq!(scheduler.advance(Vec::new), Some((0, 1)));
        assert_eq!(scheduler.phase(), Phase::ReviewingSkipped);

        scheduler.take_current();
        assert_eq!(scheduler.advance(|| vec![(0, 1)]), None);
        assert_eq!(scheduler.phase(), Phase::Complete);
    }

    #[test]
    fn test_refinement_skips_confirmed_and_separated_pairs() {
        let scored = vec![
            ranked("a", 0.6, 0.6, 0.9),
            ranked("b", 0.3, 0.3, 0.7),
            ranked("c", 0.0, 0.0, 0.2),
        ];
        let mut outcomes = HashMap::new();
        outcomes.insert((0, 1), 0); // a beat b, a scores higher: confirmed
        outcomes.insert((0, 2), 0); // no overlap anyway
        outcomes.insert((1, 2), 2); // c beat b but b scores higher: ambiguous

        let pairs = generate_refinement_pairings_indexed(&scored, &outcomes);
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn test_refinement_includes_tied_pairs() {
        let scored = vec![
            ranked("a", 0.1, 0.1, 0.9),
            ranked("b", 0.1, 0.1, 0.9),
        ];
        let mut outcomes = HashMap::new();
        outcomes.insert((0, 1), 1);
        let pairs = generate_refinement_pairings_indexed(&scored, &outcomes);
        assert_eq!(pairs, vec![(0, 1)]);
    }

    #[test]
    fn test_public_refinement_maps_ids() {
        let item_ids = ids(&["a", "b"]);
        let scored = vec![
            ranked("a", 0.2, 0.2, 1.0),
            ranked("b", 0.0, 0.0, 0.8),
        ];
        let mut outcomes = HashMap::new();
        outcomes.insert(("a".to_string(), "b".to_string()), "b".to_string());
        let pairs = generate_refinement_pairings(&item_ids, &scored, &outcomes);
        assert_eq!(pairs, vec![("a".to_string(), "b".to_string())]);
    }
}
