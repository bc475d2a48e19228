/// Output formatting: terminal table and JSON.
use serde::Serialize;
use std::collections::HashMap;
use std::io::{self, Write};
use tierduel_core::{AssignmentBatch, ItemId, RankedItem, TierId};

use crate::store::TierList;

#[derive(Serialize)]
struct JsonAssignment {
    rank: usize,
    id: String,
    name: String,
    tier: String,
    previous_tier: Option<String>,
    score: f64,
    lower_bound: f64,
    upper_bound: f64,
    wins: u32,
    losses: u32,
}

#[derive(Serialize)]
struct JsonOutput {
    items: Vec<JsonAssignment>,
    votes: usize,
    skipped: usize,
    moved: usize,
    applied: bool,
}

/// Summary of a finished `rank` run.
pub struct RunSummary<'a> {
    pub batch: &'a AssignmentBatch,
    pub standings: &'a [RankedItem],
    /// Tiers before the batch was applied.
    pub previous: &'a HashMap<ItemId, TierId>,
    pub votes: usize,
    pub skipped: usize,
    pub moved: usize,
    pub applied: bool,
}

fn standing<'a>(standings: &'a [RankedItem], item: &str) -> Option<&'a RankedItem> {
    standings.iter().find(|r| r.item == item)
}

/// Live standings, best first.
pub fn write_standings<W: Write>(out: &mut W, standings: &[RankedItem], list: &TierList) -> io::Result<()> {
    let name_width = standings.iter()
        .map(|r| list.item_name(&r.item).len())
        .max()
        .unwrap_or(4)
        .max(4);

    writeln!(out, " # | {:<name_width$} |  Score |   W |   L", "Item")?;
    for (i, r) in standings.iter().enumerate() {
        writeln!(
            out,
            "{:>2} | {:<name_width$} | {:>6.3} | {:>3} | {:>3}",
            i + 1, list.item_name(&r.item), r.score, r.wins, r.losses,
        )?;
    }
    Ok(())
}

/// Render the final assignments as a terminal table.
pub fn render_table(summary: &RunSummary, list: &TierList) -> String {
    let name_width = summary.batch.iter()
        .map(|a| list.item_name(&a.item).len())
        .max()
        .unwrap_or(4)
        .max(4);
    let tier_width = summary.batch.iter()
        .map(|a| list.tier_name(&a.tier).len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut out = String::new();
    out.push_str(&format!(
        " # | {:<name_width$} | {:<tier_width$} |  Score | 95% CI Low | 95% CI High |  W-L\n",
        "Item", "Tier",
    ));
    out.push_str(&format!(
        "---|-{}-|-{}-|--------|------------|-------------|-----\n",
        "-".repeat(name_width),
        "-".repeat(tier_width),
    ));

    for (i, a) in summary.batch.iter().enumerate() {
        let (lower, upper, wins, losses) = standing(summary.standings, &a.item)
            .map(|r| (r.lower_bound, r.upper_bound, r.wins, r.losses))
            .unwrap_or((0.0, 1.0, 0, 0));
        let moved = summary.previous.get(&a.item) != Some(&a.tier);
        out.push_str(&format!(
            "{:>2} | {:<name_width$} | {:<tier_width$} | {:>6.3} | {:>10.2} | {:>11.2} | {:>2}-{}{}\n",
            i + 1,
            list.item_name(&a.item),
            list.tier_name(&a.tier),
            a.score,
            lower,
            upper,
            wins,
            losses,
            if moved { "  *" } else { "" },
        ));
    }

    out.push_str(&format!(
        "\n{} items placed from {} votes ({} skipped), {} moved{}\n",
        summary.batch.len(),
        summary.votes,
        summary.skipped,
        summary.moved,
        if summary.applied { "" } else { " (not applied)" },
    ));
    out
}

pub fn print_table(summary: &RunSummary, list: &TierList) {
    print!("{}", render_table(summary, list));
}

pub fn render_json(summary: &RunSummary, list: &TierList) -> serde_json::Result<String> {
    let items = summary.batch.iter()
        .enumerate()
        .map(|(i, a)| {
            let r = standing(summary.standings, &a.item);
            JsonAssignment {
                rank: i + 1,
                id: a.item.clone(),
                name: list.item_name(&a.item).to_string(),
                tier: a.tier.clone(),
                previous_tier: summary.previous.get(&a.item).cloned(),
                score: a.score,
                lower_bound: r.map(|r| r.lower_bound).unwrap_or(0.0),
                upper_bound: r.map(|r| r.upper_bound).unwrap_or(1.0),
                wins: r.map(|r| r.wins).unwrap_or(0),
                losses: r.map(|r| r.losses).unwrap_or(0),
            }
        })
        .collect();

    let output = JsonOutput {
        items,
        votes: summary.votes,
        skipped: summary.skipped,
        moved: summary.moved,
        applied: summary.applied,
    };
    serde_json::to_string_pretty(&output)
}
