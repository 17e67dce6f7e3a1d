//! The `spacedeck settings` and `spacedeck theme` commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use spacedeck_core::store::{SettingsUpdate, Theme};

use super::Deck;

pub fn execute(
    config: Option<&Path>,
    data: Option<PathBuf>,
    words: Option<i64>,
    sentences: Option<i64>,
) -> Result<()> {
    let mut deck = Deck::open(config, data)?;

    if words.is_some() || sentences.is_some() {
        deck.store.update_settings(SettingsUpdate { words, sentences });
        deck.save()?;
    }

    let settings = deck.store.settings();
    println!("Words per session: {}", settings.words.cards_per_session);
    println!("Sentences per session: {}", settings.sentences.cards_per_session);
    Ok(())
}

pub fn theme(config: Option<&Path>, data: Option<PathBuf>, theme: Option<Theme>) -> Result<()> {
    let mut deck = Deck::open(config, data)?;
    if let Some(theme) = theme {
        deck.store.set_theme(theme);
        deck.save()?;
    }
    println!("Theme: {}", deck.store.theme());
    Ok(())
}
