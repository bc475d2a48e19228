/// Simulate command: runs the engine against a synthetic judge.
///
/// The judge knows a hidden true order and picks the truly better item,
/// except with probability `noise` it picks the other one, and with
/// probability `skip_rate` it skips. Measures how many comparisons a session
/// takes and how close the resulting tiers land to the ideal ones.
use anyhow::{bail, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tierduel_core::{tier_sizes, EngineConfig, HeadToHead, TierId};
use tracing::{debug, info};

pub struct SimulationOptions {
    pub items: usize,
    pub tiers: usize,
    pub noise: f64,
    pub skip_rate: f64,
    pub seed: Option<u64>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct SimulationReport {
    pub items: usize,
    pub tiers: usize,
    pub comparisons: usize,
    pub skips: usize,
    /// Items placed in exactly their ideal tier.
    pub exact: usize,
    /// Items placed one tier away from ideal.
    pub off_by_one: usize,
    /// Largest distance, in tiers, between placement and ideal.
    pub worst_miss: usize,
    pub completed: bool,
}

impl SimulationReport {
    pub fn accuracy(&self) -> f64 {
        if self.items == 0 {
            return 0.0;
        }
        self.exact as f64 * 100.0 / self.items as f64
    }
}

fn tier_id(index: usize) -> TierId {
    format!("tier-{}", index + 1)
}

/// Ideal tier index for each true rank (0 = best).
fn ideal_tiers(items: usize, tiers: usize) -> Vec<usize> {
    tier_sizes(items, tiers)
        .into_iter()
        .enumerate()
        .flat_map(|(tier, size)| std::iter::repeat(tier).take(size))
        .collect()
}

pub fn run_simulation(options: &SimulationOptions, config: EngineConfig) -> Result<SimulationReport> {
    if options.items < 2 {
        bail!("--items must be at least 2, got {}", options.items);
    }
    if options.tiers == 0 {
        bail!("--tiers must be at least 1");
    }
    if !(0.0..=1.0).contains(&options.noise) {
        bail!("--noise must be between 0.0 and 1.0, got {}", options.noise);
    }
    if !(0.0..1.0).contains(&options.skip_rate) {
        bail!("--skip-rate must be at least 0.0 and below 1.0, got {}", options.skip_rate);
    }

    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    // item-1 is truly the best. The pool is shuffled so pool order says
    // nothing about quality.
    let truth: Vec<String> = (1..=options.items).map(|i| format!("item-{i}")).collect();
    let true_rank = |id: &str| truth.iter().position(|t| t == id);
    let mut pool = truth.clone();
    pool.shuffle(&mut rng);

    let mut engine = HeadToHead::new(config);
    engine.start(pool)?;

    // A judge that skips forever can't stall the run.
    let total_pairs = options.items * (options.items - 1) / 2;
    let max_steps = total_pairs.saturating_mul(100).max(1000);
    let mut steps = 0;

    while let Some((a, b)) = engine.current_pair() {
        steps += 1;
        if steps > max_steps {
            debug!(steps, "step limit reached, finishing early");
            break;
        }
        if rng.random::<f64>() < options.skip_rate {
            engine.skip()?;
            continue;
        }
        let a_is_better = true_rank(a.as_str()) < true_rank(b.as_str());
        let honest = rng.random::<f64>() >= options.noise;
        let winner = if a_is_better == honest { a } else { b };
        engine.vote(&winner)?;
    }

    let progress = engine.progress();
    let completed = engine.current_pair().is_none();
    let tier_ids: Vec<TierId> = (0..options.tiers).map(tier_id).collect();
    let batch = engine.finish(&tier_ids)?;

    let ideal = ideal_tiers(options.items, options.tiers);
    let mut exact = 0;
    let mut off_by_one = 0;
    let mut worst_miss = 0;
    for assignment in batch.iter() {
        let placed = tier_ids.iter().position(|t| *t == assignment.tier).unwrap_or(0);
        let wanted = true_rank(assignment.item.as_str()).map(|r| ideal[r]).unwrap_or(0);
        let miss = placed.abs_diff(wanted);
        match miss {
            0 => exact += 1,
            1 => off_by_one += 1,
            _ => {}
        }
        worst_miss = worst_miss.max(miss);
    }

    let report = SimulationReport {
        items: options.items,
        tiers: options.tiers,
        comparisons: progress.decided,
        skips: progress.skipped,
        exact,
        off_by_one,
        worst_miss,
        completed,
    };
    info!(
        comparisons = report.comparisons,
        exact = report.exact,
        worst_miss = report.worst_miss,
        "simulation finished"
    );
    Ok(report)
}

pub fn print_report(report: &SimulationReport) {
    println!("=== Head-to-head simulation ===");
    println!("Items:           {}", report.items);
    println!("Tiers:           {}", report.tiers);
    println!("Comparisons:     {}", report.comparisons);
    println!("Skips:           {}", report.skips);
    println!("Completed:       {}", if report.completed { "yes" } else { "no (step limit)" });
    println!("Exact tier:      {} ({:.1}%)", report.exact, report.accuracy());
    println!("Off by one tier: {}", report.off_by_one);
    println!("Worst miss:      {} tier(s)", report.worst_miss);
}
