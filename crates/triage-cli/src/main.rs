//! Triage CLI - Command-line demo driver
//!
//! Usage:
//!   triage demo
//!   triage classify <text>
//!   triage analyze <text> [--top-n N] [--json]

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use triage_core::{LoggingConfig, TriageConfig};
use triage_extractor::{Capabilities, Triage};

const SAMPLE_QUESTIONS: &[&str] = &[
    "What should I eat to increase hemoglobin?",
    "Is ibuprofen safe with paracetamol?",
    "My mother is unconscious – what do I do?",
    "Give me exercises to sleep better.",
];

#[derive(Parser)]
#[command(name = "triage")]
#[command(about = "Health query triage: intent, entities and keywords")]
#[command(version)]
struct Cli {
    /// TOML file replacing the built-in term tables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Run without the entity model
    #[arg(long, global = true)]
    no_entities: bool,

    /// Run without the phrase ranker (frequency keywords)
    #[arg(long, global = true)]
    no_ranker: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Triage the built-in sample questions
    Demo,
    /// Print the intent label for a query
    Classify {
        /// Query text
        text: String,
    },
    /// Print intent, entities and keywords for a query
    Analyze {
        /// Query text
        text: String,
        /// Number of keywords
        #[arg(long)]
        top_n: Option<usize>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.level.as_str().into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TriageConfig::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => TriageConfig::default(),
    };

    init_logging(&config.logging);
    tracing::debug!(
        intents = config.intents.len(),
        entity_labels = config.entities.categories.len(),
        "configuration loaded"
    );

    let mut capabilities = Capabilities::detect(&config);
    if cli.no_entities {
        capabilities = capabilities.without_entity_model();
    }
    if cli.no_ranker {
        capabilities = capabilities.without_keyword_ranker();
    }

    let triage = Triage::new(&config, capabilities).context("building classifier")?;

    match cli.command.unwrap_or(Commands::Demo) {
        Commands::Demo => {
            for question in SAMPLE_QUESTIONS {
                println!("\n{}", triage.analyze(question));
            }
        }
        Commands::Classify { text } => {
            println!("{}", triage.classify(&text));
        }
        Commands::Analyze { text, top_n, json } => {
            let report = match top_n {
                Some(n) => triage.analyze_with(&text, n),
                None => triage.analyze(&text),
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
    }

    Ok(())
}
