//! Core data model types for spacedeck.
//!
//! An [`Item`] is a single learnable unit, either a word or a sentence, and
//! owns its learning [`Status`]. Status is only ever changed through the
//! transitions defined here, which the [`ItemStore`](crate::store::ItemStore)
//! drives.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::schedule::{next_review_time, WRONG_ANSWER_DELAY};

/// The two kinds of learnable items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Word,
    Sentence,
}

impl ItemKind {
    /// Identifier prefix used for items of this kind.
    pub fn id_prefix(self) -> char {
        match self {
            ItemKind::Word => 'w',
            ItemKind::Sentence => 's',
        }
    }

    /// Infer the kind from an identifier's prefix (`w12` or `s3`).
    pub fn from_id(id: &str) -> Option<Self> {
        match id.chars().next()? {
            'w' => Some(ItemKind::Word),
            's' => Some(ItemKind::Sentence),
            _ => None,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Word => write!(f, "word"),
            ItemKind::Sentence => write!(f, "sentence"),
        }
    }
}

impl FromStr for ItemKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "word" | "words" | "w" => Ok(ItemKind::Word),
            "sentence" | "sentences" | "s" => Ok(ItemKind::Sentence),
            other => Err(format!("unknown item kind: {other}")),
        }
    }
}

/// Learning status of a single item.
///
/// Invariants maintained by the transitions:
/// - `attempts >= correct_count`
/// - `mastered` implies `correct_count >= 1`
/// - `seen` only goes back to `false` through [`Status::reset`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    mastered: bool,
    seen: bool,
    review_after: Option<DateTime<Utc>>,
    attempts: u32,
    correct_count: u32,
    last_seen_at: Option<DateTime<Utc>>,
}

impl Status {
    /// Rebuild a status from persisted fields, repairing counters that would
    /// break the invariants.
    pub(crate) fn from_parts(
        mastered: bool,
        seen: bool,
        review_after: Option<DateTime<Utc>>,
        attempts: u32,
        correct_count: u32,
        last_seen_at: Option<DateTime<Utc>>,
    ) -> Self {
        let correct_count = if mastered {
            correct_count.max(1)
        } else {
            correct_count
        };
        Self {
            mastered,
            seen,
            review_after,
            attempts: attempts.max(correct_count),
            correct_count,
            last_seen_at,
        }
    }

    pub fn mastered(&self) -> bool {
        self.mastered
    }

    pub fn seen(&self) -> bool {
        self.seen
    }

    /// Earliest time the item becomes eligible again, if scheduled.
    pub fn review_after(&self) -> Option<DateTime<Utc>> {
        self.review_after
    }

    /// Total answer submissions.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Correct answers since the counter was last reset.
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    pub fn last_seen_at(&self) -> Option<DateTime<Utc>> {
        self.last_seen_at
    }

    /// Whether `review_after` is set and has passed at `now`.
    pub fn is_review_due(&self, now: DateTime<Utc>) -> bool {
        self.review_after.is_some_and(|at| now >= at)
    }

    pub(crate) fn record_correct(&mut self, now: DateTime<Utc>) {
        self.correct_count += 1;
        self.attempts += 1;
        self.mastered = true;
        self.seen = true;
        self.review_after = Some(next_review_time(self.correct_count, now));
        self.last_seen_at = Some(now);
    }

    /// A wrong answer clears mastery and schedules a short retry. The
    /// success counter is deliberately left untouched.
    pub(crate) fn record_wrong(&mut self, now: DateTime<Utc>) {
        self.mastered = false;
        self.seen = true;
        self.attempts += 1;
        self.review_after = Some(now + WRONG_ANSWER_DELAY);
        self.last_seen_at = Some(now);
    }

    /// Returns `false` if the item had already been seen.
    pub(crate) fn record_seen(&mut self, now: DateTime<Utc>) -> bool {
        if self.seen {
            return false;
        }
        self.seen = true;
        self.last_seen_at.get_or_insert(now);
        true
    }

    pub(crate) fn reset(&mut self) {
        *self = Status::default();
    }
}

/// A single-word flashcard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordItem {
    pub id: String,
    /// Foreign-language form shown to the learner.
    pub prompt: String,
    /// Target-language form the learner must produce.
    pub answer: String,
    pub status: Status,
}

/// A sentence flashcard, answered by arranging its tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceItem {
    pub id: String,
    pub prompt: String,
    pub answer: String,
    /// Whitespace-split answer, fixed at creation.
    tokens: Vec<String>,
    pub status: Status,
}

impl SentenceItem {
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

/// A learnable item, dispatched by kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Word(WordItem),
    Sentence(SentenceItem),
}

impl Item {
    /// Create a word item with zero-value status.
    pub fn word(id: impl Into<String>, prompt: &str, answer: &str) -> Self {
        Item::Word(WordItem {
            id: id.into(),
            prompt: prompt.trim().to_string(),
            answer: answer.trim().to_string(),
            status: Status::default(),
        })
    }

    /// Create a sentence item with zero-value status, splitting the answer
    /// into its token sequence.
    pub fn sentence(id: impl Into<String>, prompt: &str, answer: &str) -> Self {
        let answer = answer.trim().to_string();
        let tokens = answer.split_whitespace().map(str::to_string).collect();
        Item::Sentence(SentenceItem {
            id: id.into(),
            prompt: prompt.trim().to_string(),
            answer,
            tokens,
            status: Status::default(),
        })
    }

    /// Create an item of the given kind.
    pub fn new(kind: ItemKind, id: impl Into<String>, prompt: &str, answer: &str) -> Self {
        match kind {
            ItemKind::Word => Item::word(id, prompt, answer),
            ItemKind::Sentence => Item::sentence(id, prompt, answer),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Item::Word(w) => &w.id,
            Item::Sentence(s) => &s.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Word(_) => ItemKind::Word,
            Item::Sentence(_) => ItemKind::Sentence,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            Item::Word(w) => &w.prompt,
            Item::Sentence(s) => &s.prompt,
        }
    }

    pub fn answer(&self) -> &str {
        match self {
            Item::Word(w) => &w.answer,
            Item::Sentence(s) => &s.answer,
        }
    }

    pub fn status(&self) -> &Status {
        match self {
            Item::Word(w) => &w.status,
            Item::Sentence(s) => &s.status,
        }
    }

    pub(crate) fn status_mut(&mut self) -> &mut Status {
        match self {
            Item::Word(w) => &mut w.status,
            Item::Sentence(s) => &mut s.status,
        }
    }

    /// Token sequence for sentence items; `None` for words.
    pub fn tokens(&self) -> Option<&[String]> {
        match self {
            Item::Word(_) => None,
            Item::Sentence(s) => Some(s.tokens()),
        }
    }
}
