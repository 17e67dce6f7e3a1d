pub mod edit;
pub mod hint;
pub mod init;
pub mod list;
pub mod settings;
pub mod stats;
pub mod study;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use spacedeck_core::{ItemStore, JsonFileStore, SnapshotStore};
use spacedeck_hints::config::{load_config_from, SpacedeckConfig};

/// Loaded config plus the item store backed by the progress file.
pub struct Deck {
    pub config: SpacedeckConfig,
    pub backend: JsonFileStore,
    pub store: ItemStore,
}

impl Deck {
    /// Load config and saved progress. A missing or unreadable progress file
    /// starts from the built-in deck.
    pub fn open(config_path: Option<&Path>, data: Option<PathBuf>) -> Result<Self> {
        let config = load_config_from(config_path)?;
        let path = data.unwrap_or_else(|| config.data_file());
        tracing::debug!(path = %path.display(), "opening progress file");
        let backend = JsonFileStore::new(path);
        let store = ItemStore::load_from(&backend);
        Ok(Self {
            config,
            backend,
            store,
        })
    }

    /// Save without failing; errors are logged and the caller carries on.
    pub fn save_best_effort(&self) {
        self.backend.save(&self.store.to_snapshot());
    }

    /// Save and report failure, for commands whose only effect is the save.
    pub fn save(&self) -> Result<()> {
        self.backend
            .try_save(&self.store.to_snapshot())
            .with_context(|| format!("failed to save {}", self.backend.path().display()))
    }
}
