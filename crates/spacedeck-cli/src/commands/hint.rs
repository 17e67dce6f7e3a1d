//! The `spacedeck hint` command.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;

use spacedeck_core::error::CatalogError;
use spacedeck_core::traits::HintRequest;
use spacedeck_hints::{create_provider, fetch_hint};

use super::Deck;

pub async fn execute(config: Option<&Path>, data: Option<PathBuf>, id: &str) -> Result<()> {
    let deck = Deck::open(config, data)?;
    let item = deck
        .store
        .get(id)
        .ok_or_else(|| CatalogError::UnknownItem(id.to_string()))?;

    let provider = create_provider(&deck.config.hints)?;
    let timeout = Duration::from_secs(deck.config.hints.timeout_secs);
    let outcome = fetch_hint(provider.as_ref(), &HintRequest::for_item(item), timeout).await;

    println!("{} ({})\n", item.answer(), item.prompt());
    println!("{}", outcome.text);
    Ok(())
}
