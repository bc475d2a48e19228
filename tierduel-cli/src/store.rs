/// JSON tier-list file and its one-step undo snapshot.
///
/// The engine only sees item IDs; names, tiers and lock flags live here.
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tierduel_core::{AssignmentBatch, ItemId, TierId};
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown item: {0}")]
    UnknownItem(String),

    #[error("item {0} is listed more than once")]
    DuplicateItem(ItemId),

    #[error("unknown tier: {0}")]
    UnknownTier(String),

    #[error("no undo snapshot at {0}")]
    NoSnapshot(PathBuf),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tier {
    pub id: TierId,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub tier: TierId,
    /// Locked items keep their tier and are left out of head-to-head.
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TierList {
    #[serde(default)]
    pub title: String,
    /// Ranked tiers, best first. The catch-all tier is not listed here.
    pub tiers: Vec<Tier>,
    /// ID of the catch-all tier for items not ranked yet.
    #[serde(default = "default_unranked")]
    pub unranked: TierId,
    pub items: Vec<Item>,
}

fn default_unranked() -> TierId {
    "unranked".to_string()
}

impl TierList {
    pub fn load(path: &Path) -> StoreResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| StoreError::Io { path: path.to_path_buf(), source })?;
        let list: TierList = serde_json::from_str(&content)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        list.check_unique_items()?;
        debug!(path = %path.display(), items = list.items.len(), tiers = list.tiers.len(), "tier list loaded");
        Ok(list)
    }

    /// Every item ID must appear once; `apply` and `current_tiers` key on it.
    pub fn check_unique_items(&self) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if !seen.insert(item.id.as_str()) {
                return Err(StoreError::DuplicateItem(item.id.clone()));
            }
        }
        Ok(())
    }

    /// Write to a temp file next to `path`, then rename it over `path`.
    /// A crash mid-write leaves the old file intact.
    pub fn save(&self, path: &Path) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|source| StoreError::Json { path: path.to_path_buf(), source })?;
        let io_err = |source| StoreError::Io { path: path.to_path_buf(), source };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(content.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|e| io_err(e.error))?;
        Ok(())
    }

    /// IDs of every unlocked item, in file order.
    pub fn pool(&self) -> Vec<ItemId> {
        self.items.iter()
            .filter(|item| !item.locked)
            .map(|item| item.id.clone())
            .collect()
    }

    /// Ranked tier IDs, best first.
    pub fn tier_ids(&self) -> Vec<TierId> {
        self.tiers.iter().map(|t| t.id.clone()).collect()
    }

    pub fn has_tier(&self, id: &str) -> bool {
        id == self.unranked || self.tiers.iter().any(|t| t.id == id)
    }

    pub fn tier_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.tiers.iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or(id)
    }

    /// Display name for an item ID, falling back to the ID itself.
    pub fn item_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.items.iter()
            .find(|item| item.id == id)
            .map(|item| item.name.as_str())
            .unwrap_or(id)
    }

    pub fn current_tiers(&self) -> HashMap<ItemId, TierId> {
        self.items.iter()
            .map(|item| (item.id.clone(), item.tier.clone()))
            .collect()
    }

    /// Move items per `batch`. Validates the whole batch first, so either
    /// every assignment lands or none does. Returns how many items moved.
    pub fn apply(&mut self, batch: &AssignmentBatch) -> StoreResult<usize> {
        self.check_unique_items()?;
        let mut positions = HashMap::with_capacity(batch.len());
        for assignment in batch.iter() {
            if !self.has_tier(&assignment.tier) {
                return Err(StoreError::UnknownTier(assignment.tier.clone()));
            }
            let pos = self.items.iter()
                .position(|item| item.id == assignment.item)
                .ok_or_else(|| StoreError::UnknownItem(assignment.item.clone()))?;
            positions.insert(pos, assignment.tier.clone());
        }

        let mut moved = 0;
        for (pos, tier) in positions {
            if self.items[pos].tier != tier {
                self.items[pos].tier = tier;
                moved += 1;
            }
        }
        info!(moved, total = batch.len(), "assignments applied");
        Ok(moved)
    }
}

/// Where the undo snapshot for `list_path` lives: `<file>.undo.json`.
pub fn snapshot_path(list_path: &Path) -> PathBuf {
    let mut name = list_path.file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".undo.json");
    list_path.with_file_name(name)
}

/// Save `list` as the undo point for `list_path`, replacing any older one.
pub fn write_snapshot(list_path: &Path, list: &TierList) -> StoreResult<PathBuf> {
    let path = snapshot_path(list_path);
    list.save(&path)?;
    debug!(path = %path.display(), "undo snapshot written");
    Ok(path)
}

/// Put the snapshot back in place of `list_path` and remove it.
pub fn restore_snapshot(list_path: &Path) -> StoreResult<TierList> {
    let path = snapshot_path(list_path);
    if !path.exists() {
        return Err(StoreError::NoSnapshot(path));
    }
    let list = TierList::load(&path)?;
    list.save(list_path)?;
    std::fs::remove_file(&path)
        .map_err(|source| StoreError::Io { path: path.clone(), source })?;
    info!(path = %list_path.display(), "undo snapshot restored");
    Ok(list)
}
