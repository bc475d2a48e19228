/// z-score for a 95% two-sided confidence level.
///
/// Used for both the Wilson lower bound (the ranking score) and the upper
/// bound (only needed to decide whether two items are still ambiguous).
pub const DEFAULT_CONFIDENCE_Z: f64 = 1.96;

/// Score assigned to an item with no decided comparisons.
/// Sits in the middle so unseen items rank between proven winners and losers.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Minimum pool size for a session. One pair is the least that can be ranked.
pub const MIN_POOL_SIZE: usize = 2;
