//! The `spacedeck list` command.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{DateTime, Utc};
use comfy_table::{Cell, Table};

use spacedeck_core::queue::due_items;
use spacedeck_core::{Clock, Item, ItemKind, SystemClock};

use super::Deck;

pub fn execute(
    config: Option<&Path>,
    data: Option<PathBuf>,
    kind: Option<ItemKind>,
    due_only: bool,
) -> Result<()> {
    let deck = Deck::open(config, data)?;
    let now = SystemClock.now();

    let items: Vec<&Item> = if due_only {
        due_items(deck.store.items(), now)
    } else {
        deck.store.items().iter().collect()
    };
    let items: Vec<&Item> = items
        .into_iter()
        .filter(|item| kind.map_or(true, |k| item.kind() == k))
        .collect();

    if items.is_empty() {
        println!("No items.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Kind", "Prompt", "Answer", "Status", "Next review"]);
    for item in &items {
        table.add_row(vec![
            Cell::new(item.id()),
            Cell::new(item.kind()),
            Cell::new(item.prompt()),
            Cell::new(item.answer()),
            Cell::new(status_label(item)),
            Cell::new(review_label(item.status().review_after(), now)),
        ]);
    }
    println!("{table}");
    println!("{} item(s)", items.len());

    Ok(())
}

fn status_label(item: &Item) -> &'static str {
    let status = item.status();
    if status.mastered() {
        "mastered"
    } else if status.seen() {
        "learning"
    } else {
        "new"
    }
}

fn review_label(review_after: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    match review_after {
        None => "-".to_string(),
        Some(at) if at <= now => "due now".to_string(),
        Some(at) => {
            let minutes = (at - now).num_minutes();
            if minutes < 60 {
                format!("in {}m", minutes.max(1))
            } else {
                format!("in {}h {}m", minutes / 60, minutes % 60)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn review_labels() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(review_label(None, now), "-");
        assert_eq!(review_label(Some(now), now), "due now");
        assert_eq!(review_label(Some(now + Duration::seconds(20)), now), "in 1m");
        assert_eq!(review_label(Some(now + Duration::minutes(30)), now), "in 30m");
        assert_eq!(review_label(Some(now + Duration::minutes(480)), now), "in 8h 0m");
    }
}
