//! quizforge CLI: generate, store and grade quiz tests.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;

use quizforge_core::QuizError;

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "AI-generated quiz tests and answer grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a test and store it
    Generate {
        /// Topic of the test (also used as its title)
        #[arg(long)]
        topic: String,

        /// Number of questions
        #[arg(long, default_value = "5")]
        count: u32,

        /// Question type: multiple_choice, discursive, mixed
        #[arg(long = "type", default_value = "multiple_choice")]
        question_type: String,

        /// Difficulty label (e.g. easy, medium, hard)
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// AI provider: gemini or openai
        #[arg(long)]
        provider: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Grade an answer against the reference answer
    Evaluate {
        /// The question that was asked
        #[arg(long)]
        question: String,

        /// Reference answer
        #[arg(long)]
        correct_answer: String,

        /// The answer to grade (may be empty)
        #[arg(long, default_value = "")]
        user_answer: String,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List stored tests, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Delete a stored test
    Delete {
        /// Test id
        #[arg(long)]
        id: u64,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// Replace the questions of a stored test
    Update {
        /// Test id
        #[arg(long)]
        id: u64,

        /// JSON file with the new question set
        #[arg(long)]
        questions: PathBuf,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Store file (overrides config)
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List configured AI providers
    Providers {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let result = match cli.command {
        Commands::Generate {
            topic,
            count,
            question_type,
            difficulty,
            provider,
            config,
            store,
        } => {
            commands::generate::execute(
                topic,
                count,
                question_type,
                difficulty,
                provider,
                config,
                store,
                cancel,
            )
            .await
        }
        Commands::Evaluate {
            question,
            correct_answer,
            user_answer,
            config,
        } => {
            commands::evaluate::execute(question, correct_answer, user_answer, config, cancel).await
        }
        Commands::List {
            json,
            config,
            store,
        } => commands::list::execute(json, config, store),
        Commands::Delete { id, config, store } => commands::delete::execute(id, config, store),
        Commands::Update {
            id,
            questions,
            config,
            store,
        } => commands::update::execute(id, questions, config, store),
        Commands::Providers { config } => commands::providers::execute(config),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(exit_code(&e));
    }
}

/// 2 for failures caused by the caller's input, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<QuizError>() {
        Some(e) if e.is_client_error() => 2,
        _ => 1,
    }
}
