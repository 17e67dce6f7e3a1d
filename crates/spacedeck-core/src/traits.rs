//! Seams between the scheduler and its collaborators.
//!
//! [`ProgressRecorder`] is how a study session reports answers back to
//! whoever owns item status. [`HintProvider`] is implemented by the
//! `spacedeck-hints` crate for the advisory text service.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Item;

// ---------------------------------------------------------------------------
// Progress recording
// ---------------------------------------------------------------------------

/// Receives status transitions from a running session.
///
/// Implementations must treat unknown identifiers as a no-op.
pub trait ProgressRecorder {
    /// The item was displayed.
    fn record_seen(&mut self, id: &str, now: DateTime<Utc>);

    /// The item was answered correctly.
    fn record_correct(&mut self, id: &str, now: DateTime<Utc>);

    /// The item was answered wrong.
    fn record_wrong(&mut self, id: &str, now: DateTime<Utc>);
}

// ---------------------------------------------------------------------------
// Hint provider trait
// ---------------------------------------------------------------------------

/// Backend that produces free-form study hints.
///
/// Hints are advisory: nothing they return is ever fed back into scheduling.
#[async_trait]
pub trait HintProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Produce hint text for a request.
    async fn hint(&self, request: &HintRequest) -> anyhow::Result<String>;
}

/// What to ask the hint service about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HintRequest {
    /// Example sentences using a single word.
    WordExample { word: String, translation: String },
    /// A grammar or memory tip for a sentence.
    SentenceTip { sentence: String, translation: String },
}

impl HintRequest {
    /// The request matching an item's kind.
    pub fn for_item(item: &Item) -> Self {
        match item {
            Item::Word(word) => HintRequest::WordExample {
                word: word.answer.clone(),
                translation: word.prompt.clone(),
            },
            Item::Sentence(sentence) => HintRequest::SentenceTip {
                sentence: sentence.answer.clone(),
                translation: sentence.prompt.clone(),
            },
        }
    }

    /// Prompt text sent to a text-generation model.
    pub fn prompt(&self) -> String {
        match self {
            HintRequest::WordExample { word, translation } => format!(
                "{TUTOR_PREAMBLE}\n\n\
                 Give 2 short, simple example sentences using the English word \"{word}\" \
                 (which means \"{translation}\" in Portuguese).\n\n\
                 Format:\n\
                 1. [sentence] - [Portuguese translation]\n\
                 2. [sentence] - [Portuguese translation]\n\n\
                 Keep sentences simple and appropriate for a beginner learner. Be concise."
            ),
            HintRequest::SentenceTip {
                sentence,
                translation,
            } => format!(
                "{TUTOR_PREAMBLE}\n\n\
                 The student is learning this English sentence: \"{sentence}\"\n\
                 Portuguese translation: \"{translation}\"\n\n\
                 Give a brief, helpful tip (2-3 sentences max) about:\n\
                 - A grammar point or pattern used in the sentence\n\
                 - A memory aid to remember the word order\n\
                 - Or a cultural/contextual note\n\n\
                 Write your tip in Portuguese to help the student understand. \
                 Be concise and friendly."
            ),
        }
    }
}

const TUTOR_PREAMBLE: &str =
    "You are an English language tutor helping a Portuguese speaker learn English.";
