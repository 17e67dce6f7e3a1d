//! In-session state machine.
//!
//! A [`StudySession`] walks a shuffled queue. Correct answers advance the
//! pointer; wrong answers advance it too but first re-insert a copy of the
//! item a few positions ahead so it comes back before the session ends.
//! Once the pointer passes the end of the queue the session is complete and
//! accepts no further answers.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::Item;
use crate::queue::{build_queue_with, QueueRequest, ReviewPolicy};
use crate::traits::ProgressRecorder;

/// How many other items a missed item waits behind before coming back.
pub const REINSERT_GAP: usize = 4;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Active,
    Complete,
}

/// Counters reported at the end of (or during) a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    /// Answers given, correct or not.
    pub completed: usize,
    /// Correct answers.
    pub correct_on_first: usize,
    /// Wrong answers, each of which re-queued its item.
    pub need_review: usize,
    /// Queue length including re-inserted copies.
    pub session_total: usize,
    /// The session started with nothing to study.
    pub nothing_to_study: bool,
}

/// Identifies the item a hint was requested for.
///
/// A hint that arrives after the session has moved on no longer matches and
/// should be dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintTicket {
    pub item_id: String,
    pub render_key: u64,
}

/// One bounded run through a queue of items.
#[derive(Debug, Clone)]
pub struct StudySession {
    id: Uuid,
    queue: Vec<Item>,
    position: usize,
    completed: usize,
    correct_on_first: usize,
    need_review: usize,
    initial_len: usize,
    render_key: u64,
}

impl StudySession {
    /// Build one queue per request with the default review policy, merge
    /// them and shuffle the result.
    pub fn start<R: Rng + ?Sized>(
        requests: &[QueueRequest<'_>],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        Self::start_with_policy(ReviewPolicy::default(), requests, now, rng)
    }

    pub fn start_with_policy<R: Rng + ?Sized>(
        policy: ReviewPolicy,
        requests: &[QueueRequest<'_>],
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let mut queue: Vec<Item> = requests
            .iter()
            .flat_map(|request| {
                build_queue_with(
                    policy,
                    request.kind,
                    request.pool,
                    request.cards_per_session,
                    now,
                )
            })
            .collect();
        queue.shuffle(rng);
        Self::from_queue(queue)
    }

    /// Start a session over an already-ordered queue.
    pub fn from_queue(queue: Vec<Item>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            initial_len: queue.len(),
            queue,
            position: 0,
            completed: 0,
            correct_on_first: 0,
            need_review: 0,
            render_key: 0,
        };
        if session.queue.is_empty() {
            tracing::info!(session = %session.id, "nothing to study");
        } else {
            tracing::info!(session = %session.id, items = session.queue.len(), "session started");
        }
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn phase(&self) -> SessionPhase {
        if self.position < self.queue.len() {
            SessionPhase::Active
        } else {
            SessionPhase::Complete
        }
    }

    pub fn is_complete(&self) -> bool {
        self.phase() == SessionPhase::Complete
    }

    /// The item awaiting an answer, if any.
    pub fn current(&self) -> Option<&Item> {
        self.queue.get(self.position)
    }

    /// Zero-based pointer into the queue.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn queue(&self) -> &[Item] {
        &self.queue
    }

    /// Changes on every answer so views can tell items apart even when the
    /// same item comes back.
    pub fn render_key(&self) -> u64 {
        self.render_key
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            completed: self.completed,
            correct_on_first: self.correct_on_first,
            need_review: self.need_review,
            session_total: self.queue.len(),
            nothing_to_study: self.initial_len == 0,
        }
    }

    /// Report the current item as displayed.
    pub fn present(&self, recorder: &mut dyn ProgressRecorder, now: DateTime<Utc>) {
        if let Some(item) = self.current() {
            recorder.record_seen(item.id(), now);
        }
    }

    /// Record a correct answer for the current item and advance.
    ///
    /// Returns `false` and changes nothing when there is no current item.
    pub fn answer_correct(&mut self, recorder: &mut dyn ProgressRecorder, now: DateTime<Utc>) -> bool {
        let Some(item) = self.current() else {
            return false;
        };
        recorder.record_correct(item.id(), now);
        self.correct_on_first += 1;
        self.advance();
        true
    }

    /// Record a wrong answer, re-queue a copy of the item and advance.
    ///
    /// Returns `false` and changes nothing when there is no current item.
    pub fn answer_wrong(&mut self, recorder: &mut dyn ProgressRecorder, now: DateTime<Utc>) -> bool {
        let Some(item) = self.current().cloned() else {
            return false;
        };
        recorder.record_wrong(item.id(), now);
        self.need_review += 1;
        let reinsert_at = (self.position + REINSERT_GAP).min(self.queue.len());
        tracing::debug!(
            session = %self.id,
            id = item.id(),
            reinsert_at,
            "re-queued missed item"
        );
        self.queue.insert(reinsert_at, item);
        self.advance();
        true
    }

    fn advance(&mut self) {
        self.completed += 1;
        self.render_key += 1;
        self.position += 1;
        if self.is_complete() {
            let summary = self.summary();
            tracing::info!(
                session = %self.id,
                completed = summary.completed,
                correct = summary.correct_on_first,
                need_review = summary.need_review,
                "session complete"
            );
        }
    }

    /// A ticket for the current item, to match against a late hint.
    pub fn hint_ticket(&self) -> Option<HintTicket> {
        self.current().map(|item| HintTicket {
            item_id: item.id().to_string(),
            render_key: self.render_key,
        })
    }

    /// Whether a hint requested with `ticket` is still relevant.
    pub fn accepts(&self, ticket: &HintTicket) -> bool {
        self.render_key == ticket.render_key
            && self.current().is_some_and(|item| item.id() == ticket.item_id)
    }
}
