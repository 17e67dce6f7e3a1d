//! The authoritative item collection.
//!
//! [`ItemStore`] owns every item and the session-size settings, and is the
//! only place item status changes. It is a single-writer aggregate: callers
//! hold it by `&mut` and there is no interior locking.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CatalogError;
use crate::model::{Item, ItemKind};
use crate::queue::{build_queue_with, type_stats, ReviewPolicy, TypeStats};
use crate::seed;
use crate::traits::ProgressRecorder;

/// First numeric suffix handed to user-created items.
pub const FIRST_USER_ID: u64 = 100;

/// Session size used when nothing has been configured.
pub const DEFAULT_CARDS_PER_SESSION: u32 = 10;

/// Colour scheme preference, persisted alongside progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Per-kind session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KindSettings {
    #[serde(deserialize_with = "deserialize_session_size")]
    pub cards_per_session: u32,
}

impl Default for KindSettings {
    fn default() -> Self {
        Self {
            cards_per_session: DEFAULT_CARDS_PER_SESSION,
        }
    }
}

/// Accepts any integer and clamps it into `1..=u32::MAX`.
fn deserialize_session_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    Ok(clamp_session_size(raw))
}

fn clamp_session_size(raw: i64) -> u32 {
    raw.clamp(1, u32::MAX as i64) as u32
}

/// Numeric part of an identifier such as `w12`.
pub(crate) fn id_suffix(id: &str) -> Option<u64> {
    id.get(1..)?.parse().ok()
}

/// Session sizes for both kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default)]
    pub words: KindSettings,
    #[serde(default)]
    pub sentences: KindSettings,
}

impl SessionSettings {
    pub fn cards_per_session(&self, kind: ItemKind) -> u32 {
        match kind {
            ItemKind::Word => self.words.cards_per_session,
            ItemKind::Sentence => self.sentences.cards_per_session,
        }
    }
}

/// A partial settings change; `None` leaves that kind untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub words: Option<i64>,
    pub sentences: Option<i64>,
}

/// Owns the item pool, settings and theme.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemStore {
    items: Vec<Item>,
    settings: SessionSettings,
    theme: Theme,
    next_id: u64,
}

impl Default for ItemStore {
    fn default() -> Self {
        Self::with_seed_deck()
    }
}

impl ItemStore {
    /// A store with no items at all.
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            settings: SessionSettings::default(),
            theme: Theme::default(),
            next_id: FIRST_USER_ID,
        }
    }

    /// A store holding the built-in deck with zero-value status.
    pub fn with_seed_deck() -> Self {
        Self {
            items: seed::default_items(),
            ..Self::empty()
        }
    }

    /// A store holding exactly `items`.
    pub fn from_items(items: Vec<Item>) -> Self {
        let mut store = Self {
            items,
            ..Self::empty()
        };
        store.bump_next_id();
        store
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn items_of(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.items.iter().filter(move |item| item.kind() == kind)
    }

    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }

    pub(crate) fn items_mut(&mut self) -> &mut Vec<Item> {
        &mut self.items
    }

    pub(crate) fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    pub(crate) fn set_next_id(&mut self, next_id: u64) {
        self.next_id = next_id;
        self.bump_next_id();
    }

    /// Keep the counter ahead of every numeric suffix already in the pool so
    /// identifiers are never reused.
    fn bump_next_id(&mut self) {
        let highest = self.items.iter().filter_map(|item| id_suffix(item.id())).max();
        if let Some(highest) = highest {
            self.next_id = self.next_id.max(highest.saturating_add(1));
        }
    }

    /// Add a word item and return its identifier.
    pub fn add_word(&mut self, prompt: &str, answer: &str) -> Result<String, CatalogError> {
        self.add(ItemKind::Word, prompt, answer)
    }

    /// Add a sentence item and return its identifier.
    pub fn add_sentence(&mut self, prompt: &str, answer: &str) -> Result<String, CatalogError> {
        self.add(ItemKind::Sentence, prompt, answer)
    }

    pub fn add(
        &mut self,
        kind: ItemKind,
        prompt: &str,
        answer: &str,
    ) -> Result<String, CatalogError> {
        if prompt.trim().is_empty() {
            return Err(CatalogError::EmptyText { field: "prompt" });
        }
        if answer.trim().is_empty() {
            return Err(CatalogError::EmptyText { field: "answer" });
        }
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(CatalogError::IdsExhausted)?;
        let id = format!("{}{}", kind.id_prefix(), self.next_id);
        self.next_id = following;
        self.items.push(Item::new(kind, id.clone(), prompt, answer));
        tracing::debug!(%id, %kind, "item added");
        Ok(id)
    }

    /// Remove an item from the pool.
    pub fn delete(&mut self, id: &str) -> Result<Item, CatalogError> {
        let index = self
            .items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| CatalogError::UnknownItem(id.to_string()))?;
        tracing::debug!(%id, "item deleted");
        Ok(self.items.remove(index))
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut Item> {
        let item = self.items.iter_mut().find(|item| item.id() == id);
        if item.is_none() {
            tracing::debug!(%id, "status transition for unknown item ignored");
        }
        item
    }

    /// Record a correct answer. Returns `false` if the item does not exist.
    pub fn mark_correct(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        let status = item.status_mut();
        status.record_correct(now);
        tracing::debug!(
            %id,
            correct_count = status.correct_count(),
            review_after = ?status.review_after(),
            "marked correct"
        );
        true
    }

    /// Record a wrong answer. Returns `false` if the item does not exist.
    pub fn mark_wrong(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        item.status_mut().record_wrong(now);
        tracing::debug!(%id, "marked wrong");
        true
    }

    /// Flag an item as displayed. Returns `true` only the first time.
    pub fn mark_seen(&mut self, id: &str, now: DateTime<Utc>) -> bool {
        self.item_mut(id)
            .is_some_and(|item| item.status_mut().record_seen(now))
    }

    /// Reset every item of `kind` to zero-value status.
    pub fn reset_kind(&mut self, kind: ItemKind) {
        for item in self.items.iter_mut().filter(|item| item.kind() == kind) {
            item.status_mut().reset();
        }
        tracing::info!(%kind, "progress reset");
    }

    /// Reset every item to zero-value status.
    pub fn reset_all(&mut self) {
        for item in &mut self.items {
            item.status_mut().reset();
        }
        tracing::info!("all progress reset");
    }

    /// Apply a partial settings change, clamping sizes to at least 1.
    pub fn update_settings(&mut self, update: SettingsUpdate) {
        if let Some(words) = update.words {
            self.settings.words.cards_per_session = clamp_session_size(words);
        }
        if let Some(sentences) = update.sentences {
            self.settings.sentences.cards_per_session = clamp_session_size(sentences);
        }
    }

    pub fn type_stats(&self, kind: ItemKind, now: DateTime<Utc>) -> TypeStats {
        type_stats(&self.items, kind, now)
    }

    /// Build a queue for `kind` using the configured session size.
    pub fn build_queue(
        &self,
        policy: ReviewPolicy,
        kind: ItemKind,
        now: DateTime<Utc>,
    ) -> Vec<Item> {
        build_queue_with(
            policy,
            kind,
            &self.items,
            self.settings.cards_per_session(kind),
            now,
        )
    }
}

impl ProgressRecorder for ItemStore {
    fn record_seen(&mut self, id: &str, now: DateTime<Utc>) {
        self.mark_seen(id, now);
    }

    fn record_correct(&mut self, id: &str, now: DateTime<Utc>) {
        self.mark_correct(id, now);
    }

    fn record_wrong(&mut self, id: &str, now: DateTime<Utc>) {
        self.mark_wrong(id, now);
    }
}
