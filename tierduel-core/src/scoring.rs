/// Wilson score interval scoring.
///
/// Pure functions, no state. The ranking score of an item is the lower bound
/// of the Wilson interval on its win proportion, which keeps an item with one
/// lucky win from outranking an item with nine wins out of ten.
use crate::constants::NEUTRAL_SCORE;
use crate::ledger::{Record, VoteLedger};
use crate::types::{Pool, RankedItem};

/// Wilson score interval `(lower, upper)` for `wins` out of `wins + losses`.
///
/// With no decided comparisons the interval is the whole of `[0, 1]`.
pub fn wilson_interval(wins: u32, losses: u32, z: f64) -> (f64, f64) {
    let n = (wins + losses) as f64;
    if n == 0.0 {
        return (0.0, 1.0);
    }

    let p = wins as f64 / n;
    let z2 = z * z;
    let center = p + z2 / (2.0 * n);
    let margin = z * ((p * (1.0 - p) + z2 / (4.0 * n)) / n).sqrt();
    let denominator = 1.0 + z2 / n;

    let lower = (center - margin) / denominator;
    let upper = (center + margin) / denominator;
    (lower.clamp(0.0, 1.0), upper.clamp(0.0, 1.0))
}

/// Ranking score: Wilson lower bound, or the neutral 0.5 for an unseen item.
pub fn wilson_lower_bound(wins: u32, losses: u32, z: f64) -> f64 {
    if wins + losses == 0 {
        return NEUTRAL_SCORE;
    }
    wilson_interval(wins, losses, z).0
}

/// Score a ledger record.
pub fn score(record: Record, z: f64) -> f64 {
    wilson_lower_bound(record.wins, record.losses, z)
}

/// Two items are ambiguous while their Wilson intervals overlap.
pub fn intervals_overlap(a: &RankedItem, b: &RankedItem) -> bool {
    a.lower_bound <= b.upper_bound && b.lower_bound <= a.upper_bound
}

/// Score every pool item, in pool order.
pub(crate) fn score_pool(pool: &Pool, ledger: &VoteLedger, z: f64) -> Vec<RankedItem> {
    (0..pool.len())
        .map(|idx| {
            let record = ledger.get_indexed(idx);
            let (lower_bound, upper_bound) = wilson_interval(record.wins, record.losses, z);
            RankedItem {
                item: pool.id_at(idx).clone(),
                score: score(record, z),
                lower_bound,
                upper_bound,
                wins: record.wins,
                losses: record.losses,
            }
        })
        .collect()
}

/// Score every pool item and sort by score descending.
///
/// The sort is stable, so equal scores keep pool order. That makes the
/// result reproducible even when nothing has been voted on.
pub fn rank_items(pool: &Pool, ledger: &VoteLedger, z: f64) -> Vec<RankedItem> {
    let mut ranked = score_pool(pool, ledger, z);
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    ranked
}
