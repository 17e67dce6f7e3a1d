//! The `add-word`, `add-sentence`, `delete` and `reset` commands.

use std::path::{Path, PathBuf};

use anyhow::Result;

use spacedeck_core::ItemKind;

use super::Deck;

pub fn add(
    config: Option<&Path>,
    data: Option<PathBuf>,
    kind: ItemKind,
    prompt: &str,
    answer: &str,
) -> Result<()> {
    let mut deck = Deck::open(config, data)?;
    let id = deck.store.add(kind, prompt, answer)?;
    deck.save()?;
    println!("Added {kind} {id}");
    Ok(())
}

pub fn delete(config: Option<&Path>, data: Option<PathBuf>, id: &str) -> Result<()> {
    let mut deck = Deck::open(config, data)?;
    let removed = deck.store.delete(id)?;
    deck.save()?;
    println!("Deleted {} ({})", removed.id(), removed.prompt());
    Ok(())
}

pub fn reset(config: Option<&Path>, data: Option<PathBuf>, kind: Option<ItemKind>) -> Result<()> {
    let mut deck = Deck::open(config, data)?;
    match kind {
        Some(kind) => {
            deck.store.reset_kind(kind);
            deck.save()?;
            println!("Reset progress for every {kind}.");
        }
        None => {
            deck.store.reset_all();
            deck.save()?;
            println!("Reset all progress.");
        }
    }
    Ok(())
}
