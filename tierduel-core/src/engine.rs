/// Head-to-head session controller.
///
/// Pure computation: no IO, no rendering. The caller shows `current_pair()`,
/// feeds back `vote()` or `skip()`, and calls `finish()` whenever it likes to
/// get the tier assignments.
///
/// Items are identified by caller-provided string IDs.
use std::collections::HashMap;

use tracing::{debug, info};

use crate::constants::{DEFAULT_CONFIDENCE_Z, MIN_POOL_SIZE};
use crate::error::{HeadToHeadError, HeadToHeadResult};
use crate::ledger::VoteLedger;
use crate::pairing::{generate_refinement_pairings_indexed, PairScheduler, Phase, Refinement};
use crate::scoring::{rank_items, score_pool};
use crate::tiers::{assign_tiers, AssignmentBatch};
use crate::types::{IndexedPair, ItemId, Pair, Pool, RankedItem, TierId, VoteRecord};

/// Configuration for the head-to-head engine.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EngineConfig {
    /// z-score for the Wilson interval. 1.96 is a 95% confidence level.
    /// Must be finite and positive; `start()` rejects anything else.
    pub confidence_z: f64,
    pub refinement: Refinement,
}

impl EngineConfig {
    pub fn validate(&self) -> HeadToHeadResult<()> {
        if !(self.confidence_z.is_finite() && self.confidence_z > 0.0) {
            return Err(HeadToHeadError::InvalidConfig(format!(
                "confidence_z must be a positive number, got {}",
                self.confidence_z
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            confidence_z: DEFAULT_CONFIDENCE_Z,
            refinement: Refinement::Overlap,
        }
    }
}

/// Derived progress. Computed fresh on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    /// Pairs still waiting for a decision, the current one and skipped ones included.
    pub remaining: usize,
    /// Skips so far. Never goes down within a session.
    pub skipped: usize,
    /// Votes cast so far.
    pub decided: usize,
    /// `decided / (decided + remaining)`, as 0–100.
    pub percentage: f64,
    pub phase: Phase,
}

/// State owned by one running session.
#[derive(Debug, Clone)]
struct Session {
    pool: Pool,
    scheduler: PairScheduler,
    ledger: VoteLedger,
    votes: Vec<VoteRecord>,
    /// Latest winner per decided pair, for deciding what to refine.
    outcomes: HashMap<IndexedPair, usize>,
}

impl Session {
    fn new(pool: Pool, config: &EngineConfig) -> Self {
        let ledger = VoteLedger::new(&pool);
        let scheduler = PairScheduler::new(pool.len(), config.refinement);
        Session {
            pool,
            scheduler,
            ledger,
            votes: Vec::new(),
            outcomes: HashMap::new(),
        }
    }

    fn advance(&mut self, z: f64) {
        let Session { pool, scheduler, ledger, outcomes, .. } = self;
        scheduler.advance(|| {
            let scored = score_pool(pool, ledger, z);
            generate_refinement_pairings_indexed(&scored, outcomes)
        });
    }

    fn progress(&self) -> Progress {
        let decided = self.ledger.total_decided();
        let remaining = self.scheduler.remaining();
        let total = decided + remaining;
        let percentage = if total == 0 {
            0.0
        } else {
            decided as f64 * 100.0 / total as f64
        };
        Progress {
            remaining,
            skipped: self.scheduler.skipped_count(),
            decided,
            percentage,
            phase: self.scheduler.phase(),
        }
    }
}

/// The head-to-head state machine.
///
/// `Idle` until `start()`; back to `Idle` after `finish()`. Mutating calls
/// take `&mut self`, so a shared instance needs outside locking.
#[derive(Debug, Clone, Default)]
pub struct HeadToHead {
    config: EngineConfig,
    session: Option<Session>,
}

impl HeadToHead {
    pub fn new(config: EngineConfig) -> Self {
        HeadToHead {
            config,
            session: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Begin (or restart) a session over `pool`.
    ///
    /// Duplicate IDs are dropped. Fewer than two distinct items, or an
    /// invalid config, is an error and leaves any running session untouched.
    pub fn start<I, S>(&mut self, pool: I) -> HeadToHeadResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        self.config.validate()?;
        let pool = Pool::from_ids(pool);
        if pool.len() < MIN_POOL_SIZE {
            return Err(HeadToHeadError::InsufficientItems { found: pool.len() });
        }

        if self.session.is_some() {
            debug!("restarting active session");
        }
        let session = Session::new(pool, &self.config);
        info!(
            items = session.pool.len(),
            pairs = session.scheduler.remaining(),
            "head-to-head session started"
        );
        self.session = Some(session);
        Ok(())
    }

    /// Record `winner` as the better side of the current pair and move on.
    pub fn vote(&mut self, winner: &str) -> HeadToHeadResult<()> {
        let z = self.config.confidence_z;
        let session = self.session.as_mut().ok_or(HeadToHeadError::NoActiveComparison)?;
        let (a, b) = session.scheduler.current().ok_or(HeadToHeadError::NoActiveComparison)?;

        let w = session.pool.index_of(winner)
            .filter(|&idx| idx == a || idx == b)
            .ok_or_else(|| HeadToHeadError::InvalidVote { item: winner.to_string() })?;
        let l = if w == a { b } else { a };

        session.ledger.record_win(session.pool.id_at(w), session.pool.id_at(l))?;
        session.scheduler.take_current();
        session.votes.push(VoteRecord {
            pair: session.pool.to_pair((a, b)),
            winner: session.pool.id_at(w).clone(),
        });
        session.outcomes.insert((a, b), w);
        debug!(winner = %winner, loser = %session.pool.id_at(l), "vote recorded");

        session.advance(z);
        Ok(())
    }

    /// Put the current pair off until the rest of this pass is done.
    pub fn skip(&mut self) -> HeadToHeadResult<()> {
        let z = self.config.confidence_z;
        let session = self.session.as_mut().ok_or(HeadToHeadError::NoActiveComparison)?;
        let (a, b) = session.scheduler.defer_current().ok_or(HeadToHeadError::NoActiveComparison)?;
        debug!(
            a = %session.pool.id_at(a),
            b = %session.pool.id_at(b),
            skipped = session.scheduler.skipped_count(),
            "pair deferred"
        );

        session.advance(z);
        Ok(())
    }

    /// End the session and map the current standings onto `tiers`.
    ///
    /// Works at any point after `start()`, with as few votes as the user
    /// cared to give; unvoted items score 0.5. Resets to `Idle`.
    pub fn finish(&mut self, tiers: &[TierId]) -> HeadToHeadResult<AssignmentBatch> {
        let session = self.session.take().ok_or(HeadToHeadError::NotStarted)?;
        let progress = session.progress();

        let scored = score_pool(&session.pool, &session.ledger, self.config.confidence_z);
        let batch = assign_tiers(&scored, tiers);

        info!(
            items = session.pool.len(),
            votes = progress.decided,
            skipped = progress.skipped,
            remaining = progress.remaining,
            tiers = tiers.len(),
            "head-to-head session finished"
        );
        Ok(batch)
    }

    pub fn progress(&self) -> Progress {
        match &self.session {
            Some(session) => session.progress(),
            None => Progress {
                remaining: 0,
                skipped: 0,
                decided: 0,
                percentage: 0.0,
                phase: Phase::Idle,
            },
        }
    }

    pub fn phase(&self) -> Phase {
        self.session.as_ref()
            .map(|s| s.scheduler.phase())
            .unwrap_or(Phase::Idle)
    }

    pub fn current_pair(&self) -> Option<Pair> {
        let session = self.session.as_ref()?;
        session.scheduler.current().map(|pair| session.pool.to_pair(pair))
    }

    /// Live ranking preview, best first. Empty when idle.
    pub fn standings(&self) -> Vec<RankedItem> {
        self.session.as_ref()
            .map(|s| rank_items(&s.pool, &s.ledger, self.config.confidence_z))
            .unwrap_or_default()
    }

    /// Votes cast this session, in order.
    pub fn votes(&self) -> &[VoteRecord] {
        self.session.as_ref()
            .map(|s| s.votes.as_slice())
            .unwrap_or(&[])
    }

    pub fn pool(&self) -> Option<&Pool> {
        self.session.as_ref().map(|s| &s.pool)
    }

    pub fn ledger(&self) -> Option<&VoteLedger> {
        self.session.as_ref().map(|s| &s.ledger)
    }
}
