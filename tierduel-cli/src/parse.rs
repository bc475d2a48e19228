/// Parsing of the user's answer to a head-to-head prompt.

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    /// Option 1 wins.
    Left,
    /// Option 2 wins.
    Right,
    Skip,
    /// Stop now and assign tiers from what has been voted so far.
    Finish,
    /// Show the live standings.
    Standings,
}

/// Parse one input line. Case-insensitive, surrounding whitespace ignored.
/// Returns `None` for anything unrecognized.
pub fn parse_answer(line: &str) -> Option<Answer> {
    match line.trim().to_ascii_lowercase().as_str() {
        "1" | "l" | "left" => Some(Answer::Left),
        "2" | "r" | "right" => Some(Answer::Right),
        "s" | "skip" => Some(Answer::Skip),
        "f" | "finish" | "q" | "quit" => Some(Answer::Finish),
        "p" | "standings" => Some(Answer::Standings),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sides() {
        assert_eq!(parse_answer("1"), Some(Answer::Left));
        assert_eq!(parse_answer("  2\n"), Some(Answer::Right));
        assert_eq!(parse_answer("LEFT"), Some(Answer::Left));
        assert_eq!(parse_answer("r"), Some(Answer::Right));
    }

    #[test]
    fn test_commands() {
        assert_eq!(parse_answer("s"), Some(Answer::Skip));
        assert_eq!(parse_answer("S"), Some(Answer::Skip));
        assert_eq!(parse_answer("Finish"), Some(Answer::Finish));
        assert_eq!(parse_answer("q"), Some(Answer::Finish));
        assert_eq!(parse_answer("p"), Some(Answer::Standings));
    }

    #[test]
    fn test_unrecognized() {
        assert_eq!(parse_answer("3"), None);
        assert_eq!(parse_answer("maybe"), None);
        assert_eq!(parse_answer("\n"), None);
    }
}
