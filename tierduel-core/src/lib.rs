/// tierduel-core: Head-to-head ranking engine.
///
/// Binary human judgments → per-item win/loss ledger → Wilson lower-bound
/// scores → tier assignments. No IO, no rendering, no persistence. The caller
/// shows the pairs and applies the result.
///
/// Items are identified by caller-provided string IDs. The crate maps them to
/// pool indices internally; pool order is the tie-break for equal scores.
///
/// # Quick start
///
/// ```rust
/// use tierduel_core::{HeadToHead, Phase};
///
/// let mut engine = HeadToHead::default();
/// engine.start(["pizza", "sushi", "tacos"]).unwrap();
///
/// while let Some((a, _b)) = engine.current_pair() {
///     engine.vote(&a).unwrap(); // always prefer the left side
/// }
/// assert_eq!(engine.phase(), Phase::Complete);
///
/// let tiers = vec!["S".to_string(), "A".to_string()];
/// let batch = engine.finish(&tiers).unwrap();
/// assert_eq!(batch.tier_of("pizza"), Some("S"));
/// assert_eq!(batch.tier_of("tacos"), Some("A"));
/// ```

pub mod constants;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod pairing;
pub mod scoring;
pub mod tiers;
pub mod types;

// Re-export primary public API at crate root.
pub use engine::{EngineConfig, HeadToHead, Progress};
pub use error::{HeadToHeadError, HeadToHeadResult};
pub use ledger::{Record, VoteLedger};
pub use pairing::{
    generate_quick_pass_pairings, generate_refinement_pairings, PairScheduler, Phase, Refinement,
};
pub use scoring::{intervals_overlap, rank_items, score, wilson_interval, wilson_lower_bound};
pub use tiers::{assign_tiers, tier_sizes, Assignment, AssignmentBatch};
pub use types::{ItemId, Pair, Pool, RankedItem, TierId, VoteRecord};
