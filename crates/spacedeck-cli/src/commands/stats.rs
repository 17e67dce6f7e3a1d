//! The `spacedeck stats` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use comfy_table::{Cell, Table};

use spacedeck_core::queue::pool_stats;
use spacedeck_core::{Clock, ItemKind, SystemClock};

use super::Deck;

pub fn execute(config: Option<&Path>, data: Option<PathBuf>, json: bool) -> Result<()> {
    let deck = Deck::open(config, data)?;
    let now = SystemClock.now();

    if json {
        let report = serde_json::json!({
            "word": deck.store.type_stats(ItemKind::Word, now),
            "sentence": deck.store.type_stats(ItemKind::Sentence, now),
            "overall": pool_stats(deck.store.items(), now),
            "settings": deck.store.settings(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Kind",
        "Total",
        "Unseen",
        "Mastered",
        "Due for review",
        "Per session",
    ]);

    let mut warnings = Vec::new();
    for kind in [ItemKind::Word, ItemKind::Sentence] {
        let stats = deck.store.type_stats(kind, now);
        let per_session = deck.store.settings().cards_per_session(kind);
        table.add_row(vec![
            Cell::new(kind),
            Cell::new(stats.total),
            Cell::new(stats.unseen),
            Cell::new(stats.mastered),
            Cell::new(stats.due_for_review),
            Cell::new(per_session),
        ]);

        let available = stats.available_for_session();
        if (per_session as usize) > available {
            warnings.push(format!(
                "Only {available} {kind}(s) available for the next session \
                 (session size is {per_session})."
            ));
        }
    }

    println!("{table}");

    let overall = pool_stats(deck.store.items(), now);
    println!(
        "\n{} items: {} mastered, {} pending, {} mastered items due for review",
        overall.total, overall.mastered, overall.pending, overall.due_for_review
    );
    for warning in warnings {
        println!("Note: {warning}");
    }

    Ok(())
}
