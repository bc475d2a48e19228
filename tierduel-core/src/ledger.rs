/// Append-only win/loss counters per pool item.
///
/// Counts are stored by pool index; lookups by caller ID go through the pool.
use crate::error::{HeadToHeadError, HeadToHeadResult};
use crate::types::{Pool, VoteRecord};

/// Win/loss counts for one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    pub wins: u32,
    pub losses: u32,
}

impl Record {
    /// Number of decided comparisons this item took part in.
    pub fn decided(&self) -> u32 {
        self.wins + self.losses
    }
}

#[derive(Debug, Clone)]
pub struct VoteLedger {
    pool: Pool,
    records: Vec<Record>,
    total: usize,
}

impl VoteLedger {
    pub fn new(pool: &Pool) -> Self {
        VoteLedger {
            pool: pool.clone(),
            records: vec![Record::default(); pool.len()],
            total: 0,
        }
    }

    /// Rebuild a ledger from a vote log. Same log in, same counts out.
    pub fn replay(pool: &Pool, votes: &[VoteRecord]) -> HeadToHeadResult<Self> {
        let mut ledger = VoteLedger::new(pool);
        for vote in votes {
            ledger.record_win(&vote.winner, vote.loser())?;
        }
        Ok(ledger)
    }

    /// Credit `winner` with a win and `loser` with a loss.
    ///
    /// Both IDs must be distinct pool members; otherwise nothing changes.
    pub fn record_win(&mut self, winner: &str, loser: &str) -> HeadToHeadResult<()> {
        if winner == loser {
            return Err(HeadToHeadError::InvalidVote { item: winner.to_string() });
        }
        let w = self.pool.index_of(winner)
            .ok_or_else(|| HeadToHeadError::InvalidVote { item: winner.to_string() })?;
        let l = self.pool.index_of(loser)
            .ok_or_else(|| HeadToHeadError::InvalidVote { item: loser.to_string() })?;

        self.records[w].wins += 1;
        self.records[l].losses += 1;
        self.total += 1;
        Ok(())
    }

    /// Counts for `item`; `{0, 0}` for anything never seen.
    pub fn get(&self, item: &str) -> Record {
        self.pool.index_of(item)
            .map(|idx| self.records[idx])
            .unwrap_or_default()
    }

    pub(crate) fn get_indexed(&self, idx: usize) -> Record {
        self.records[idx]
    }

    /// Number of votes recorded.
    pub fn total_decided(&self) -> usize {
        self.total
    }
}
