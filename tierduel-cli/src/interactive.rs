/// The question-and-answer loop that drives a head-to-head session.
///
/// Generic over input and output so it runs the same against a terminal, a
/// pipe, or in-memory buffers.
use anyhow::Result;
use std::io::{BufRead, Write};
use tierduel_core::HeadToHead;
use tracing::debug;

use crate::output::write_standings;
use crate::parse::{parse_answer, Answer};
use crate::prompt::build_prompt;
use crate::store::TierList;

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// Every pair was decided.
    Completed,
    /// The user asked to finish early.
    FinishedEarly,
    /// Input ran out before the session was complete.
    InputClosed,
}

/// Ask about pairs until the session completes, the user finishes, or input ends.
/// Does not call `finish()`; that's up to the caller.
pub fn run_session<R: BufRead, W: Write>(
    engine: &mut HeadToHead,
    list: &TierList,
    input: &mut R,
    out: &mut W,
) -> Result<SessionEnd> {
    let mut line = String::new();
    loop {
        let Some((a, b)) = engine.current_pair() else {
            writeln!(out, "\nAll comparisons done.")?;
            return Ok(SessionEnd::Completed);
        };

        write!(out, "{}", build_prompt(&engine.progress(), list.item_name(&a), list.item_name(&b)))?;
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("input closed with comparisons remaining");
            writeln!(out)?;
            return Ok(SessionEnd::InputClosed);
        }

        match parse_answer(&line) {
            Some(Answer::Left) => engine.vote(&a)?,
            Some(Answer::Right) => engine.vote(&b)?,
            Some(Answer::Skip) => engine.skip()?,
            Some(Answer::Finish) => return Ok(SessionEnd::FinishedEarly),
            Some(Answer::Standings) => {
                writeln!(out)?;
                write_standings(out, &engine.standings(), list)?;
            }
            None => writeln!(out, "  Answer 1 or 2, s to skip, p for standings, f to finish.")?,
        }
    }
}
