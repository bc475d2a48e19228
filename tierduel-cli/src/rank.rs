/// The `rank` command: load a tier list, run a session, apply the result.
///
/// Generic over input and prompt output like `run_session`, so the whole
/// load, vote, snapshot, and save path runs against in-memory buffers in tests.
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use tierduel_core::{AssignmentBatch, EngineConfig, HeadToHead, ItemId, RankedItem, TierId};
use tracing::{info, warn};

use crate::interactive::{run_session, SessionEnd};
use crate::output::RunSummary;
use crate::store::{self, TierList};

pub struct RankRequest<'a> {
    pub list_path: &'a Path,
    /// Destination tiers, best first. Empty means every ranked tier in the list.
    pub tiers: Vec<TierId>,
    pub engine: EngineConfig,
    /// Compute and report, but leave the file alone.
    pub dry_run: bool,
}

pub struct RankOutcome {
    pub list: TierList,
    pub batch: AssignmentBatch,
    pub standings: Vec<RankedItem>,
    /// Tiers as they were before this run.
    pub previous: HashMap<ItemId, TierId>,
    pub end: SessionEnd,
    pub votes: usize,
    pub skipped: usize,
    pub moved: usize,
    /// Set when the batch was written; the undo point lives here.
    pub snapshot: Option<PathBuf>,
}

impl RankOutcome {
    pub fn applied(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            batch: &self.batch,
            standings: &self.standings,
            previous: &self.previous,
            votes: self.votes,
            skipped: self.skipped,
            moved: self.moved,
            applied: self.applied(),
        }
    }
}

/// Check requested tiers against the list. Repeats are dropped with a warning.
pub fn resolve_tiers(requested: &[TierId], list: &TierList) -> Result<Vec<TierId>> {
    let requested = if requested.is_empty() {
        list.tier_ids()
    } else {
        requested.to_vec()
    };

    let mut tiers: Vec<TierId> = Vec::with_capacity(requested.len());
    for tier in requested {
        if tier == list.unranked {
            bail!("\"{tier}\" is the unranked tier and can't be a destination");
        }
        if !list.has_tier(&tier) {
            bail!("Unknown tier \"{tier}\"");
        }
        if tiers.contains(&tier) {
            warn!(tier = %tier, "tier given more than once, using it once");
            continue;
        }
        tiers.push(tier);
    }

    if tiers.is_empty() {
        bail!("The tier list has no ranked tiers to sort into");
    }
    Ok(tiers)
}

/// Run one ranking session over the list at `request.list_path`.
///
/// The list is only rewritten when something moved and this isn't a dry run,
/// and then under exactly one undo snapshot taken right before the write.
pub fn run_rank<R: BufRead, W: Write>(
    request: &RankRequest,
    input: &mut R,
    prompts: &mut W,
) -> Result<RankOutcome> {
    let list_path = request.list_path;
    let mut list = TierList::load(list_path)?;
    let tiers = resolve_tiers(&request.tiers, &list)?;

    let mut engine = HeadToHead::new(request.engine.clone());
    engine.start(list.pool())
        .with_context(|| format!("Can't rank {}", list_path.display()))?;

    let end = run_session(&mut engine, &list, input, prompts)?;
    if end == SessionEnd::InputClosed {
        warn!("input ended before every pair was decided, placing items from votes so far");
    }

    let progress = engine.progress();
    let standings = engine.standings();
    let batch = engine.finish(&tiers)?;

    let previous = list.current_tiers();
    let moved = batch.delta(&previous).len();

    let snapshot = if request.dry_run || moved == 0 {
        info!(moved, dry_run = request.dry_run, "tier list left unchanged");
        None
    } else {
        let snapshot = store::write_snapshot(list_path, &list)?;
        list.apply(&batch)?;
        list.save(list_path)?;
        info!(snapshot = %snapshot.display(), moved, "tier list updated");
        Some(snapshot)
    };

    Ok(RankOutcome {
        list,
        batch,
        standings,
        previous,
        end,
        votes: progress.decided,
        skipped: progress.skipped,
        moved,
        snapshot,
    })
}
