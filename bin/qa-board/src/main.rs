//! # qa-board
//!
//! Command-line front end for the Q&A support board. Every command opens the
//! board file, applies one operation and writes it back when it changed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use configs::{BoardConfig, LogFormat};
use qb_board::{Board, ImportSession};
use qb_core::{Category, Filter, NewQuestion, Question, QuestionId, StatusFilter, TracingObserver};
use qb_import::Normalizer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod store;

#[derive(Parser, Debug)]
#[command(name = "qa-board")]
#[command(about = "Q&A support board with Tumblr dump import")]
#[command(version)]
struct Cli {
    /// Config file to use instead of ./qa-board.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board file, overriding the configured one
    #[arg(long, global = true, env = "QA_BOARD_FILE")]
    board: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Normalize a dump and merge its questions into the board
    Import {
        dump: PathBuf,
        /// Show the preview without merging
        #[arg(long)]
        dry_run: bool,
    },
    /// Post a new question
    Ask {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: String,
        #[arg(long)]
        author: String,
    },
    /// Answer (or re-answer) a question
    Answer { id: String, text: String },
    /// List questions, newest first
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long, default_value = "all")]
        status: StatusFilter,
    },
    /// Write the whole board as JSON
    Export {
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let (json, pretty) = match format {
        LogFormat::Json => (Some(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)), None),
        LogFormat::Pretty => (None, Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))),
    };

    tracing_subscriber::registry().with(filter).with(json).with(pretty).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BoardConfig::load_from(path),
        None => BoardConfig::load(),
    }
    .context("Failed to load configuration")?;
    init_tracing(config.log_format);

    let board_file = cli.board.clone().unwrap_or_else(|| config.board_file.clone());
    let mut board = store::load_board(&board_file, config.seed_samples).await?;

    let changed = match cli.command {
        Command::Import { dump, dry_run } => import(&mut board, &config, &dump, dry_run).await?,
        Command::Ask { title, content, category, author } => {
            let form = NewQuestion { title, content, category, author };
            let question = board.add_question(form).context("Question was not posted")?;
            println!("posted {}", question.id);
            true
        }
        Command::Answer { id, text } => {
            let question = board
                .answer_question(&QuestionId::new(id), text)
                .context("Answer was not recorded")?;
            println!("answered {}", question.id);
            true
        }
        Command::List { search, category, status } => {
            let filter = Filter::new()
                .with_search(search)
                .with_category(category)
                .with_status(status);
            list(&board, &filter);
            false
        }
        Command::Export { out } => {
            let out = out.unwrap_or_else(|| config.export_file.clone());
            store::save_board(&board, &out).await?;
            println!("exported {} questions to {}", board.len(), out.display());
            false
        }
    };

    if changed {
        store::save_board(&board, &board_file).await?;
    }
    Ok(())
}

async fn import(board: &mut Board, config: &BoardConfig, dump: &Path, dry_run: bool) -> Result<bool> {
    let normalizer = Normalizer::new(config.normalize_options()?).with_observer(TracingObserver);
    let mut session = ImportSession::new();
    session.begin(dump.display().to_string())?;

    let raw = match tokio::fs::read_to_string(dump).await {
        Ok(raw) => raw,
        Err(e) => {
            session.cancel();
            return Err(e).with_context(|| format!("Failed to read {}", dump.display()));
        }
    };

    let preview = session
        .complete(&raw, &normalizer)
        .with_context(|| format!("Could not import {}", dump.display()))?;
    for question in preview {
        print_question(question);
    }

    if dry_run {
        println!("{} questions found (dry run, board unchanged)", preview.len());
        session.cancel();
        return Ok(false);
    }

    let count = board.commit_import(&mut session)?;
    println!("imported {} questions", count);
    Ok(true)
}

fn list(board: &Board, filter: &Filter) {
    let shown = board.filter(filter);
    for question in &shown {
        print_question(question);
    }

    let stats = board.stats();
    println!(
        "{} shown / {} total ({} answered, {} unanswered)",
        shown.len(),
        stats.total,
        stats.answered,
        stats.unanswered
    );
}

fn print_question(question: &Question) {
    let status = if question.is_answered() { "answered" } else { "open" };
    println!(
        "[{}] {} {:<10} {:<8} {}",
        question.id, question.date, question.category, status, question.title
    );
}
