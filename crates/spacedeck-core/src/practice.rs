//! Helpers for presenting an item as an exercise.
//!
//! Word items are asked as multiple choice; sentence items are answered by
//! putting their shuffled tokens back in order.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::model::{Item, ItemKind};

/// Default number of choices offered for a word item.
pub const DEFAULT_OPTION_COUNT: usize = 4;

/// Answer choices for a word item: the correct answer plus up to
/// `count - 1` distinct distractors taken from other word items, shuffled.
pub fn word_options<R: Rng + ?Sized>(
    correct: &Item,
    pool: &[Item],
    count: usize,
    rng: &mut R,
) -> Vec<String> {
    let mut distractors: Vec<&str> = pool
        .iter()
        .filter(|item| item.kind() == ItemKind::Word && item.id() != correct.id())
        .map(Item::answer)
        .filter(|answer| *answer != correct.answer())
        .collect();
    distractors.sort_unstable();
    distractors.dedup();
    distractors.shuffle(rng);

    let mut options: Vec<String> = distractors
        .into_iter()
        .take(count.saturating_sub(1))
        .map(str::to_string)
        .collect();
    options.push(correct.answer().to_string());
    options.shuffle(rng);
    options
}

/// A shuffled copy of a sentence item's tokens; empty for words.
pub fn scrambled_tokens<R: Rng + ?Sized>(item: &Item, rng: &mut R) -> Vec<String> {
    let mut tokens = item.tokens().map(<[String]>::to_vec).unwrap_or_default();
    tokens.shuffle(rng);
    tokens
}

/// Whether the selected tokens are exactly the sentence's tokens, in order.
/// Always `false` for word items.
pub fn check_sentence(item: &Item, selected: &[String]) -> bool {
    item.tokens().is_some_and(|tokens| tokens == selected)
}
