//! spacedeck CLI: study flashcards from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use spacedeck_core::store::Theme;
use spacedeck_core::ItemKind;

mod commands;

#[derive(Parser)]
#[command(
    name = "spacedeck",
    version,
    about = "Spaced-repetition flashcards for words and sentences"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Progress file path (overrides the config's data_file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Which items a study session draws from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StudyKind {
    Word,
    Sentence,
    All,
}

impl StudyKind {
    pub fn kinds(self) -> &'static [ItemKind] {
        match self {
            StudyKind::Word => &[ItemKind::Word],
            StudyKind::Sentence => &[ItemKind::Sentence],
            StudyKind::All => &[ItemKind::Word, ItemKind::Sentence],
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run an interactive study session
    Study {
        /// Item kind to study
        #[arg(long, value_enum, default_value = "all")]
        kind: StudyKind,

        /// Seed for shuffling (makes the session order reproducible)
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show progress per item kind
    Stats {
        /// Print machine-readable JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List items and their status
    List {
        /// Only show one kind (word or sentence)
        #[arg(long)]
        kind: Option<ItemKind>,

        /// Only show items that need attention
        #[arg(long)]
        due: bool,
    },

    /// Add a word item
    AddWord {
        /// Text shown to the learner
        #[arg(long)]
        prompt: String,

        /// Expected answer
        #[arg(long)]
        answer: String,
    },

    /// Add a sentence item
    AddSentence {
        /// Text shown to the learner
        #[arg(long)]
        prompt: String,

        /// Expected sentence, tokens separated by spaces
        #[arg(long)]
        answer: String,
    },

    /// Delete an item by id
    Delete {
        /// Item id (e.g. w3, s100)
        id: String,
    },

    /// Reset progress for one kind, or for everything
    Reset {
        /// Only reset one kind (word or sentence)
        #[arg(long)]
        kind: Option<ItemKind>,
    },

    /// Show or change session sizes
    Settings {
        /// Words per session (values below 1 become 1)
        #[arg(long, allow_negative_numbers = true)]
        words: Option<i64>,

        /// Sentences per session (values below 1 become 1)
        #[arg(long, allow_negative_numbers = true)]
        sentences: Option<i64>,
    },

    /// Show or change the colour theme preference
    Theme {
        /// light or dark
        theme: Option<Theme>,
    },

    /// Ask the hint service about an item
    Hint {
        /// Item id (e.g. w3, s1)
        id: String,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("spacedeck=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let data = cli.data;

    let result = match cli.command {
        Commands::Study { kind, seed } => commands::study::execute(config, data, kind, seed).await,
        Commands::Stats { json } => commands::stats::execute(config, data, json),
        Commands::List { kind, due } => commands::list::execute(config, data, kind, due),
        Commands::AddWord { prompt, answer } => {
            commands::edit::add(config, data, ItemKind::Word, &prompt, &answer)
        }
        Commands::AddSentence { prompt, answer } => {
            commands::edit::add(config, data, ItemKind::Sentence, &prompt, &answer)
        }
        Commands::Delete { id } => commands::edit::delete(config, data, &id),
        Commands::Reset { kind } => commands::edit::reset(config, data, kind),
        Commands::Settings { words, sentences } => {
            commands::settings::execute(config, data, words, sentences)
        }
        Commands::Theme { theme } => commands::settings::theme(config, data, theme),
        Commands::Hint { id } => commands::hint::execute(config, data, &id).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
