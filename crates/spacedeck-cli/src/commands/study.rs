//! The `spacedeck study` command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use rand::rngs::StdRng;
use rand::SeedableRng;

use spacedeck_core::practice::{check_sentence, scrambled_tokens, word_options, DEFAULT_OPTION_COUNT};
use spacedeck_core::traits::{HintProvider, HintRequest};
use spacedeck_core::{Clock, ItemKind, QueueRequest, StudySession, SystemClock};
use spacedeck_hints::{create_provider, fetch_hint};

use super::Deck;
use crate::StudyKind;

pub async fn execute(
    config: Option<&Path>,
    data: Option<PathBuf>,
    kind: StudyKind,
    seed: Option<u64>,
) -> Result<()> {
    let mut deck = Deck::open(config, data)?;
    let provider = create_provider(&deck.config.hints)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut out = io::stdout();
    run(
        &mut deck,
        provider.as_ref(),
        kind.kinds(),
        &mut rng,
        &SystemClock,
        &mut input,
        &mut out,
    )
    .await
}

/// Drive one session over line-oriented input. Progress is saved after
/// every answer; a failed save is logged and the session goes on. End of
/// input behaves like quitting.
async fn run<R: BufRead, W: Write>(
    deck: &mut Deck,
    hints: &dyn HintProvider,
    kinds: &[ItemKind],
    rng: &mut StdRng,
    clock: &dyn Clock,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let hint_timeout = Duration::from_secs(deck.config.hints.timeout_secs);
    let mut session = {
        let requests: Vec<QueueRequest<'_>> = kinds
            .iter()
            .map(|&kind| QueueRequest {
                kind,
                pool: deck.store.items(),
                cards_per_session: deck.store.settings().cards_per_session(kind),
            })
            .collect();
        StudySession::start_with_policy(deck.config.review_policy, &requests, clock.now(), rng)
    };

    if session.is_complete() {
        writeln!(
            out,
            "Nothing to study right now. Come back later or add new items."
        )?;
        return Ok(());
    }

    'items: while let Some(item) = session.current().cloned() {
        session.present(&mut deck.store, clock.now());

        let choices = match item.kind() {
            ItemKind::Word => word_options(&item, deck.store.items(), DEFAULT_OPTION_COUNT, rng),
            ItemKind::Sentence => scrambled_tokens(&item, rng),
        };
        writeln!(
            out,
            "\n[{}/{}] {}: {}",
            session.position() + 1,
            session.queue().len(),
            item.kind(),
            item.prompt()
        )?;
        for (n, choice) in choices.iter().enumerate() {
            writeln!(out, "  {}. {choice}", n + 1)?;
        }

        loop {
            match item.kind() {
                ItemKind::Word => write!(out, "Pick a number or type the answer (h = hint, q = quit): ")?,
                ItemKind::Sentence => write!(
                    out,
                    "Enter the numbers in order or type the sentence (h = hint, q = quit): "
                )?,
            }
            out.flush()?;

            let Some(line) = read_line(input)? else {
                break 'items;
            };
            let answer = line.trim();
            match answer {
                "" => continue,
                "q" => break 'items,
                "h" => {
                    let ticket = session.hint_ticket();
                    let outcome =
                        fetch_hint(hints, &HintRequest::for_item(&item), hint_timeout).await;
                    if ticket.is_some_and(|ticket| session.accepts(&ticket)) {
                        writeln!(out, "\n{}\n", outcome.text)?;
                    }
                    continue;
                }
                _ => {}
            }

            let correct = match item.kind() {
                ItemKind::Word => {
                    pick_option(answer, &choices).eq_ignore_ascii_case(item.answer())
                }
                ItemKind::Sentence => check_sentence(&item, &select_tokens(answer, &choices)),
            };
            let now = clock.now();
            if correct {
                session.answer_correct(&mut deck.store, now);
                writeln!(out, "Correct!")?;
            } else {
                session.answer_wrong(&mut deck.store, now);
                writeln!(out, "Not quite. The answer is: {}", item.answer())?;
            }
            deck.save_best_effort();
            break;
        }
    }

    deck.save_best_effort();
    let summary = session.summary();
    writeln!(
        out,
        "\nSession over: {} answered, {} correct, {} to review ({} cards in this session).",
        summary.completed, summary.correct_on_first, summary.need_review, summary.session_total
    )?;
    if !session.is_complete() {
        writeln!(
            out,
            "{} item(s) left unanswered.",
            summary.session_total - session.position()
        )?;
    }
    Ok(())
}

fn read_line<R: BufRead>(input: &mut R) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

/// A 1-based option number selects that option; anything else is taken as
/// typed text.
fn pick_option<'a>(answer: &'a str, options: &'a [String]) -> &'a str {
    match answer.parse::<usize>() {
        Ok(n) if (1..=options.len()).contains(&n) => &options[n - 1],
        _ => answer,
    }
}

/// Numbers pick tokens by position; anything else is split into words.
fn select_tokens(answer: &str, tokens: &[String]) -> Vec<String> {
    let picked: Option<Vec<String>> = answer
        .split_whitespace()
        .map(|part| match part.parse::<usize>() {
            Ok(n) if (1..=tokens.len()).contains(&n) => Some(tokens[n - 1].clone()),
            _ => None,
        })
        .collect();
    picked.unwrap_or_else(|| answer.split_whitespace().map(str::to_string).collect())
}
