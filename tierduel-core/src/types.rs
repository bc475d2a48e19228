use std::collections::HashMap;

use tracing::warn;

/// Caller-provided item identifier. Opaque to the engine.
pub type ItemId = String;

/// Caller-provided tier identifier.
pub type TierId = String;

/// A head-to-head pairing: two item IDs, in pool order.
pub type Pair = (ItemId, ItemId);

/// Internal indexed pair (pool indices, `.0 < .1`).
pub(crate) type IndexedPair = (usize, usize);

/// One decided comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VoteRecord {
    /// The pair as it was presented.
    pub pair: Pair,
    /// Which side of `pair` won.
    pub winner: ItemId,
}

impl VoteRecord {
    /// The side of the pair that did not win.
    pub fn loser(&self) -> &str {
        if self.pair.0 == self.winner {
            &self.pair.1
        } else {
            &self.pair.0
        }
    }
}

/// A standings row: an item with its Wilson interval and raw counts.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RankedItem {
    pub item: ItemId,
    /// Wilson lower bound, or 0.5 with no decided comparisons.
    pub score: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub wins: u32,
    pub losses: u32,
}

/// The comparison pool: an ordered, deduplicated snapshot of item IDs.
///
/// Maps between caller IDs and internal 0..N indices. Index order is pool
/// order, which is the tie-break everywhere in the engine.
#[derive(Debug, Clone)]
pub struct Pool {
    ids: Vec<ItemId>,
    id_to_idx: HashMap<ItemId, usize>,
}

impl Pool {
    /// Build a pool, dropping repeated IDs (first occurrence wins).
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<ItemId>,
    {
        let mut pool = Pool {
            ids: Vec::new(),
            id_to_idx: HashMap::new(),
        };
        for id in ids {
            let id = id.into();
            if pool.id_to_idx.contains_key(&id) {
                warn!(item = %id, "duplicate item id in pool, ignoring");
                continue;
            }
            pool.id_to_idx.insert(id.clone(), pool.ids.len());
            pool.ids.push(id);
        }
        pool
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ItemId] {
        &self.ids
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_idx.contains_key(id)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_idx.get(id).copied()
    }

    pub(crate) fn id_at(&self, idx: usize) -> &ItemId {
        &self.ids[idx]
    }

    pub(crate) fn to_pair(&self, (a, b): IndexedPair) -> Pair {
        (self.ids[a].clone(), self.ids[b].clone())
    }
}
