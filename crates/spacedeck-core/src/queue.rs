//! Study queue construction and per-kind statistics.
//!
//! A queue is a priority merge: items that are due for review after a wrong
//! answer come first, then items that have never been shown, capped to the
//! session size. Mastered items that are not yet due never appear.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Item, ItemKind};

/// Which items count as "due for review" when building a queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewPolicy {
    /// Only items answered wrong whose retry delay has passed.
    #[default]
    WrongOnly,
    /// Also mastered items whose scheduled review has passed.
    IncludeMasteredDue,
}

impl ReviewPolicy {
    fn admits(self, item: &Item, now: DateTime<Utc>) -> bool {
        let status = item.status();
        if !status.is_review_due(now) {
            return false;
        }
        match self {
            ReviewPolicy::WrongOnly => !status.mastered(),
            ReviewPolicy::IncludeMasteredDue => true,
        }
    }
}

/// What to build a queue from.
#[derive(Debug, Clone, Copy)]
pub struct QueueRequest<'a> {
    pub kind: ItemKind,
    pub pool: &'a [Item],
    pub cards_per_session: u32,
}

fn is_unseen(item: &Item) -> bool {
    let status = item.status();
    !status.seen() && !status.mastered()
}

/// Build a study queue for one kind using the default [`ReviewPolicy`].
pub fn build_queue(
    kind: ItemKind,
    pool: &[Item],
    cards_per_session: u32,
    now: DateTime<Utc>,
) -> Vec<Item> {
    build_queue_with(ReviewPolicy::default(), kind, pool, cards_per_session, now)
}

/// Build a study queue for one kind.
///
/// Review-due items come first, then unseen ones, each in pool order. The
/// result never holds the same identifier twice and never exceeds
/// `cards_per_session` (treated as at least 1). An empty result means there
/// is nothing to study.
pub fn build_queue_with(
    policy: ReviewPolicy,
    kind: ItemKind,
    pool: &[Item],
    cards_per_session: u32,
    now: DateTime<Utc>,
) -> Vec<Item> {
    let cap = cards_per_session.max(1) as usize;
    let of_kind = || pool.iter().filter(move |item| item.kind() == kind);

    let due = of_kind().filter(|item| policy.admits(item, now));
    let unseen = of_kind().filter(|item| is_unseen(item));

    let mut placed = HashSet::new();
    due.chain(unseen)
        .filter(|item| placed.insert(item.id().to_string()))
        .take(cap)
        .cloned()
        .collect()
}

/// Counts for one kind of item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeStats {
    pub total: usize,
    pub unseen: usize,
    pub mastered: usize,
    /// Items answered wrong whose retry delay has passed.
    pub due_for_review: usize,
}

impl TypeStats {
    /// How many items a session of this kind could actually contain.
    pub fn available_for_session(&self) -> usize {
        self.unseen + self.due_for_review
    }
}

/// Aggregate the queue partitions for one kind.
pub fn type_stats(pool: &[Item], kind: ItemKind, now: DateTime<Utc>) -> TypeStats {
    let mut stats = TypeStats::default();
    for item in pool.iter().filter(|item| item.kind() == kind) {
        stats.total += 1;
        if is_unseen(item) {
            stats.unseen += 1;
        }
        if item.status().mastered() {
            stats.mastered += 1;
        }
        if ReviewPolicy::WrongOnly.admits(item, now) {
            stats.due_for_review += 1;
        }
    }
    stats
}

/// Counts across the whole pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolStats {
    pub total: usize,
    pub mastered: usize,
    pub pending: usize,
    /// Mastered items whose scheduled review has passed.
    pub due_for_review: usize,
}

pub fn pool_stats(pool: &[Item], now: DateTime<Utc>) -> PoolStats {
    let mut stats = PoolStats {
        total: pool.len(),
        ..PoolStats::default()
    };
    for status in pool.iter().map(Item::status) {
        if status.mastered() {
            stats.mastered += 1;
            if status.is_review_due(now) {
                stats.due_for_review += 1;
            }
        } else {
            stats.pending += 1;
        }
    }
    stats
}

/// Items that need attention: anything not mastered, plus mastered items
/// whose scheduled review has passed.
pub fn due_items(pool: &[Item], now: DateTime<Utc>) -> Vec<&Item> {
    pool.iter()
        .filter(|item| {
            let status = item.status();
            !status.mastered() || status.is_review_due(now)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn with_status(mut item: Item, status: Status) -> Item {
        *item.status_mut() = status;
        item
    }

    fn wrong_at(item: Item, at: DateTime<Utc>) -> Item {
        let mut status = Status::default();
        status.record_wrong(at);
        with_status(item, status)
    }

    fn correct_at(item: Item, at: DateTime<Utc>) -> Item {
        let mut status = Status::default();
        status.record_correct(at);
        with_status(item, status)
    }

    fn seen(item: Item) -> Item {
        let mut status = Status::default();
        status.record_seen(t0());
        with_status(item, status)
    }

    fn ids(items: &[Item]) -> Vec<&str> {
        items.iter().map(Item::id).collect()
    }

    #[test]
    fn single_unseen_word() {
        let pool = vec![Item::word("w1", "casa", "house")];
        let queue = build_queue(ItemKind::Word, &pool, 10, t0());
        assert_eq!(ids(&queue), ["w1"]);
    }

    #[test]
    fn empty_pool_gives_empty_queue() {
        let pool = vec![Item::word("w1", "casa", "house")];
        assert!(build_queue(ItemKind::Sentence, &pool, 5, t0()).is_empty());
        assert!(build_queue(ItemKind::Word, &[], 5, t0()).is_empty());
    }

    #[test]
    fn review_due_items_come_before_unseen() {
        let pool = vec![
            Item::word("w1", "casa", "house"),
            wrong_at(Item::word("w2", "gato", "cat"), t0() - Duration::minutes(5)),
            Item::word("w3", "sol", "sun"),
            wrong_at(Item::word("w4", "lua", "moon"), t0() - Duration::minutes(3)),
        ];
        let queue = build_queue(ItemKind::Word, &pool, 10, t0());
        assert_eq!(ids(&queue), ["w2", "w4", "w1", "w3"]);
    }

    #[test]
    fn excludes_not_yet_due_seen_and_mastered() {
        let pool = vec![
            wrong_at(Item::word("w1", "casa", "house"), t0()),
            seen(Item::word("w2", "gato", "cat")),
            correct_at(Item::word("w3", "sol", "sun"), t0() - Duration::days(3)),
            Item::word("w4", "lua", "moon"),
        ];
        let queue = build_queue(ItemKind::Word, &pool, 10, t0());
        assert_eq!(ids(&queue), ["w4"]);
    }

    #[test]
    fn retry_becomes_due_exactly_at_review_time() {
        let pool = vec![wrong_at(Item::word("w1", "casa", "house"), t0())];
        let due_at = t0() + Duration::minutes(2);
        assert!(build_queue(ItemKind::Word, &pool, 10, due_at - Duration::seconds(1)).is_empty());
        assert_eq!(ids(&build_queue(ItemKind::Word, &pool, 10, due_at)), ["w1"]);
    }

    #[test]
    fn caps_to_session_size_and_clamps_zero() {
        let pool: Vec<Item> = (1..=8)
            .map(|n| Item::word(format!("w{n}"), "p", "a"))
            .collect();
        assert_eq!(build_queue(ItemKind::Word, &pool, 3, t0()).len(), 3);
        assert_eq!(ids(&build_queue(ItemKind::Word, &pool, 0, t0())), ["w1"]);
    }

    #[test]
    fn filters_by_kind() {
        let pool = vec![
            Item::word("w1", "casa", "house"),
            Item::sentence("s1", "Eu sou", "I am"),
        ];
        assert_eq!(ids(&build_queue(ItemKind::Sentence, &pool, 10, t0())), ["s1"]);
    }

    #[test]
    fn duplicate_ids_are_placed_once() {
        let pool = vec![
            Item::word("w1", "casa", "house"),
            Item::word("w1", "casa", "house"),
        ];
        assert_eq!(ids(&build_queue(ItemKind::Word, &pool, 10, t0())), ["w1"]);
    }

    #[test]
    fn mastered_due_items_follow_policy() {
        let pool = vec![correct_at(
            Item::word("w1", "casa", "house"),
            t0() - Duration::hours(1),
        )];
        assert!(build_queue(ItemKind::Word, &pool, 10, t0()).is_empty());
        let queue = build_queue_with(
            ReviewPolicy::IncludeMasteredDue,
            ItemKind::Word,
            &pool,
            10,
            t0(),
        );
        assert_eq!(ids(&queue), ["w1"]);
    }

    #[test]
    fn stats_per_kind() {
        let pool = vec![
            Item::word("w1", "casa", "house"),
            wrong_at(Item::word("w2", "gato", "cat"), t0() - Duration::minutes(5)),
            correct_at(Item::word("w3", "sol", "sun"), t0()),
            seen(Item::word("w4", "lua", "moon")),
            Item::sentence("s1", "Eu sou", "I am"),
        ];
        let stats = type_stats(&pool, ItemKind::Word, t0());
        assert_eq!(
            stats,
            TypeStats {
                total: 4,
                unseen: 1,
                mastered: 1,
                due_for_review: 1,
            }
        );
        assert_eq!(stats.available_for_session(), 2);
    }

    #[test]
    fn pool_stats_and_due_items() {
        let pool = vec![
            Item::word("w1", "casa", "house"),
            correct_at(Item::word("w2", "gato", "cat"), t0() - Duration::hours(1)),
            correct_at(Item::word("w3", "sol", "sun"), t0()),
        ];
        let stats = pool_stats(&pool, t0());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.mastered, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.due_for_review, 1);

        let due: Vec<&str> = due_items(&pool, t0()).into_iter().map(Item::id).collect();
        assert_eq!(due, ["w1", "w2"]);
    }
}
