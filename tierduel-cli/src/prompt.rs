/// Text shown for each head-to-head comparison.
use tierduel_core::{Phase, Progress};

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Idle => "idle",
        Phase::QuickPass => "quick pass",
        Phase::Refinement => "refinement",
        Phase::ReviewingSkipped => "reviewing skipped",
        Phase::Complete => "complete",
    }
}

/// Build the prompt for one pair.
pub fn build_prompt(progress: &Progress, option1: &str, option2: &str) -> String {
    let skipped = if progress.skipped > 0 {
        format!(", {} skipped so far", progress.skipped)
    } else {
        String::new()
    };
    format!(
        "\n[{label}] {pct:.0}% done, {remaining} left{skipped}\n\
         \x20 1) {option1}\n\
         \x20 2) {option2}\n\
         Which is better? [1/2, s=skip, p=standings, f=finish] ",
        label = phase_label(progress.phase),
        pct = progress.percentage,
        remaining = progress.remaining,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(skipped: usize) -> Progress {
        Progress {
            remaining: 4,
            skipped,
            decided: 2,
            percentage: 100.0 / 3.0,
            phase: Phase::QuickPass,
        }
    }

    #[test]
    fn test_build_prompt_contains_all_parts() {
        let prompt = build_prompt(&progress(0), "Pizza", "Sushi");
        assert!(prompt.contains("[quick pass] 33% done, 4 left\n"));
        assert!(prompt.contains("  1) Pizza\n"));
        assert!(prompt.contains("  2) Sushi\n"));
        assert!(prompt.ends_with("f=finish] "));
        assert!(!prompt.contains("skipped"));
    }

    #[test]
    fn test_build_prompt_reports_skips() {
        let prompt = build_prompt(&progress(3), "Pizza", "Sushi");
        assert!(prompt.contains("4 left, 3 skipped so far"));
    }
}
