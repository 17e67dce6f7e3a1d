//! Versioned progress snapshots and their persistence.
//!
//! A [`Snapshot`] captures everything needed to rebuild an [`ItemStore`]:
//! per-item status, session settings, theme, and the items the learner
//! added or removed relative to the built-in deck.
//!
//! Persistence is best-effort. The [`SnapshotStore`] trait never reports
//! failure; an unreadable, corrupt or unknown-version snapshot is logged and
//! treated as absent, so the worst case is a fresh start with defaults.

use std::collections::{BTreeMap, HashSet};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::SnapshotError;
use crate::model::{Item, ItemKind, Status};
use crate::seed;
use crate::store::{id_suffix, ItemStore, SessionSettings, Theme, FIRST_USER_ID};

/// Schema version written by this build.
pub const CURRENT_VERSION: i64 = 2;

/// Persisted status of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedProgress {
    pub kind: ItemKind,
    pub mastered: bool,
    pub seen: bool,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub review_after: Option<DateTime<Utc>>,
    pub attempts: u32,
    pub correct_count: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl PersistedProgress {
    fn from_item(item: &Item) -> Self {
        let status = item.status();
        Self {
            kind: item.kind(),
            mastered: status.mastered(),
            seen: status.seen(),
            review_after: status.review_after(),
            attempts: status.attempts(),
            correct_count: status.correct_count(),
            last_seen_at: status.last_seen_at(),
        }
    }

    fn to_status(&self) -> Status {
        Status::from_parts(
            self.mastered,
            self.seen,
            self.review_after,
            self.attempts,
            self.correct_count,
            self.last_seen_at,
        )
    }
}

/// A user-created item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub kind: ItemKind,
    pub prompt: String,
    pub answer: String,
}

/// Differences between the pool and the built-in deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(default = "default_next_id")]
    pub next_id: u64,
    #[serde(default)]
    pub added: Vec<ItemDefinition>,
    #[serde(default)]
    pub removed: Vec<String>,
}

fn default_next_id() -> u64 {
    FIRST_USER_ID
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            next_id: default_next_id(),
            added: Vec::new(),
            removed: Vec::new(),
        }
    }
}

/// The persisted document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub version: i64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub settings: SessionSettings,
    #[serde(default)]
    pub item_progress: BTreeMap<String, PersistedProgress>,
    #[serde(default)]
    pub catalog: Catalog,
}

// ---------------------------------------------------------------------------
// Version 1 layout and migration
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotV1 {
    #[serde(default)]
    theme: Theme,
    #[serde(default)]
    card_progress: BTreeMap<String, ProgressV1>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProgressV1 {
    mastered: bool,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    review_after: Option<DateTime<Utc>>,
    #[serde(default)]
    attempts: u32,
    #[serde(default)]
    correct_count: u32,
    #[serde(with = "chrono::serde::ts_milliseconds_option", default)]
    last_seen_at: Option<DateTime<Utc>>,
}

fn migrate_v1(old: SnapshotV1) -> Snapshot {
    let mut item_progress = BTreeMap::new();
    for (id, progress) in old.card_progress {
        let Some(kind) = ItemKind::from_id(&id) else {
            tracing::warn!(%id, "dropping progress for item with unrecognised id");
            continue;
        };
        // Version 1 had no `seen` flag; anything with history counts as seen.
        let seen =
            progress.attempts > 0 || progress.mastered || progress.last_seen_at.is_some();
        item_progress.insert(
            id,
            PersistedProgress {
                kind,
                mastered: progress.mastered,
                seen,
                review_after: progress.review_after,
                attempts: progress.attempts,
                correct_count: progress.correct_count,
                last_seen_at: progress.last_seen_at,
            },
        );
    }
    Snapshot {
        version: CURRENT_VERSION,
        theme: old.theme,
        settings: SessionSettings::default(),
        item_progress,
        catalog: Catalog::default(),
    }
}

/// Parse a raw document, migrating older versions forward.
///
/// The flag is `true` when a migration happened and the caller should write
/// the result back.
pub fn parse_snapshot(raw: &str) -> Result<(Snapshot, bool), SnapshotError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let version = value
        .get("version")
        .and_then(serde_json::Value::as_i64)
        .unwrap_or(0);
    match version {
        CURRENT_VERSION => Ok((serde_json::from_value(value)?, false)),
        1 => {
            let old: SnapshotV1 = serde_json::from_value(value)?;
            tracing::info!("migrating snapshot from version 1");
            Ok((migrate_v1(old), true))
        }
        other => Err(SnapshotError::UnsupportedVersion(other)),
    }
}

// ---------------------------------------------------------------------------
// Store <-> snapshot
// ---------------------------------------------------------------------------

impl ItemStore {
    /// Capture the store as a current-version snapshot.
    pub fn to_snapshot(&self) -> Snapshot {
        let item_progress = self
            .items()
            .iter()
            .map(|item| (item.id().to_string(), PersistedProgress::from_item(item)))
            .collect();

        let present: HashSet<&str> = self.items().iter().map(Item::id).collect();
        let added = self
            .items()
            .iter()
            .filter(|item| !seed::is_seed_id(item.id()))
            .map(|item| ItemDefinition {
                id: item.id().to_string(),
                kind: item.kind(),
                prompt: item.prompt().to_string(),
                answer: item.answer().to_string(),
            })
            .collect();
        let removed = seed::default_items()
            .iter()
            .map(Item::id)
            .filter(|id| !present.contains(id))
            .map(str::to_string)
            .collect();

        Snapshot {
            version: CURRENT_VERSION,
            theme: self.theme(),
            settings: *self.settings(),
            item_progress,
            catalog: Catalog {
                next_id: self.next_id(),
                added,
                removed,
            },
        }
    }

    /// Overwrite state from a snapshot.
    ///
    /// Catalog changes are applied first, then each item whose id has saved
    /// progress takes that status; items without saved progress keep theirs.
    pub fn hydrate(&mut self, snapshot: &Snapshot) {
        self.set_settings(snapshot.settings);
        self.set_theme(snapshot.theme);

        let removed: HashSet<&str> = snapshot.catalog.removed.iter().map(String::as_str).collect();
        self.items_mut()
            .retain(|item| !removed.contains(item.id()) || !seed::is_seed_id(item.id()));
        for def in &snapshot.catalog.added {
            if id_suffix(&def.id) == Some(u64::MAX) {
                tracing::warn!(id = %def.id, "saved item id is out of range, dropping it");
                continue;
            }
            if self.get(&def.id).is_none() {
                self.items_mut()
                    .push(Item::new(def.kind, def.id.clone(), &def.prompt, &def.answer));
            }
        }
        self.set_next_id(snapshot.catalog.next_id);

        let mut restored = 0usize;
        for item in self.items_mut().iter_mut() {
            let Some(saved) = snapshot.item_progress.get(item.id()) else {
                continue;
            };
            if saved.kind != item.kind() {
                tracing::warn!(id = item.id(), "saved progress has mismatched kind, ignoring");
                continue;
            }
            *item.status_mut() = saved.to_status();
            restored += 1;
        }
        tracing::debug!(restored, "store hydrated");
    }

    /// The built-in deck with any saved progress applied.
    pub fn load_from(backend: &dyn SnapshotStore) -> Self {
        let mut store = ItemStore::with_seed_deck();
        if let Some(snapshot) = backend.load() {
            store.hydrate(&snapshot);
        }
        store
    }

    /// Hand the current state to a backend.
    pub fn save_to(&self, backend: &dyn SnapshotStore) {
        backend.save(&self.to_snapshot());
    }
}

// ---------------------------------------------------------------------------
// Backends
// ---------------------------------------------------------------------------

/// Where snapshots live. Every method is infallible; failures are logged.
pub trait SnapshotStore: Send + Sync {
    /// The saved snapshot, or `None` if absent, corrupt or unsupported.
    fn load(&self) -> Option<Snapshot>;

    /// Replace the saved snapshot.
    fn save(&self, snapshot: &Snapshot);

    /// Remove the saved snapshot so the next load starts from defaults.
    fn clear(&self);
}

/// A JSON file on disk, replaced atomically on every save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let (snapshot, migrated) = parse_snapshot(&raw)?;
        if migrated {
            self.try_save(&snapshot)?;
        }
        Ok(Some(snapshot))
    }

    pub fn try_save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let mut file = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut file, snapshot)?;
        file.flush()?;
        file.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    pub fn try_clear(&self) -> Result<(), SnapshotError> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Option<Snapshot> {
        self.try_load().unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), "discarding saved progress: {e}");
            None
        })
    }

    fn save(&self, snapshot: &Snapshot) {
        if let Err(e) = self.try_save(snapshot) {
            tracing::warn!(path = %self.path.display(), "failed to save progress: {e}");
        }
    }

    fn clear(&self) {
        if let Err(e) = self.try_clear() {
            tracing::warn!(path = %self.path.display(), "failed to clear progress: {e}");
        }
    }
}

/// Keeps the serialized document in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an arbitrary raw document, e.g. an old-version snapshot.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// The currently stored document.
    pub fn raw(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<Snapshot> {
        let raw = self.raw()?;
        match parse_snapshot(&raw) {
            Ok((snapshot, migrated)) => {
                if migrated {
                    self.save(&snapshot);
                }
                Some(snapshot)
            }
            Err(e) => {
                tracing::warn!("discarding saved progress: {e}");
                None
            }
        }
    }

    fn save(&self, snapshot: &Snapshot) {
        match serde_json::to_string(snapshot) {
            Ok(raw) => *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = Some(raw),
            Err(e) => tracing::warn!("failed to serialize progress: {e}"),
        }
    }

    fn clear(&self) {
        *self.raw.lock().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
