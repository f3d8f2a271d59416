//! Zhuyin Quiz - phonetic guessing game host
//!
//! Enter or import Zhuyin prompts with their answers, then flip the cards
//! one unit at a time while groups compete for points.

mod builder;
mod config;
mod error;
mod ledger;
mod models;
mod storage;
mod tokenizer;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableBracketedPaste, EnableBracketedPaste},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use config::Config;
use storage::{FileStore, QuizStorage};
use ui::App;

const LOG_FILE: &str = "zq.log";

// ══════════════════════════════════════════════════════════════════════════
// CLI Arguments
// ══════════════════════════════════════════════════════════════════════════

#[derive(Parser, Debug)]
#[command(name = "zq")]
#[command(author, version, about = "Zhuyin guessing game with group scoring", long_about = None)]
struct Args {
    /// Directory holding questions, scores and the log file
    #[arg(short, long)]
    data_dir: Option<PathBuf>,

    /// Append questions from a file (one `phonetic<TAB>answer` per line)
    #[arg(short, long, conflicts_with_all = ["export", "clear_scores", "ephemeral"])]
    import: Option<PathBuf>,

    /// Write all questions to a file in the import format
    #[arg(short, long, conflicts_with_all = ["clear_scores", "ephemeral"])]
    export: Option<PathBuf>,

    /// Clear every recorded score
    #[arg(long, conflicts_with = "ephemeral")]
    clear_scores: bool,

    /// Start an empty scratch session that is never written to disk
    #[arg(long)]
    ephemeral: bool,
}

// ══════════════════════════════════════════════════════════════════════════
// Main Entry Point
// ══════════════════════════════════════════════════════════════════════════

fn main() -> Result<()> {
    let args = Args::parse();

    let data_dir = args.data_dir.unwrap_or_else(FileStore::default_path);
    let store = FileStore::new(data_dir.clone())?;

    let config = Config::load().unwrap_or_default();
    init_logging(&data_dir, &config.log_filter);

    if args.ephemeral {
        tracing::info!("ephemeral session, nothing will be saved");
        return run_tui(QuizStorage::in_memory(), config);
    }

    let mut storage = QuizStorage::new(store);

    if let Some(path) = args.import {
        return import_file(&mut storage, &path);
    }
    if let Some(path) = args.export {
        return export_file(&storage, &path);
    }
    if args.clear_scores {
        storage.clear_ledger();
        println!("✓ Scores cleared");
        return Ok(());
    }

    run_tui(storage, config)
}

/// Send `tracing` output to a log file; the terminal belongs to the TUI.
fn init_logging(data_dir: &Path, default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let writer = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))
        .map(|file| BoxMakeWriter::new(Mutex::new(file)))
        .unwrap_or_else(|_| BoxMakeWriter::new(io::sink));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

fn import_file(storage: &mut QuizStorage, path: &Path) -> Result<()> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read import file: {:?}", path))?;

    let result = builder::import_bulk(&text);
    let imported = result.questions.len();

    let mut bank = storage.load_questions();
    bank.extend(result.questions);
    storage.save_questions(&bank);
    tracing::info!(imported, skipped = result.error_count, file = %path.display(), "imported from file");

    println!(
        "✓ Imported {} questions ({} lines skipped)",
        imported, result.error_count
    );
    for failure in &result.failures {
        eprintln!("  line {}: {}", failure.line, failure.reason);
    }
    Ok(())
}

fn export_file(storage: &QuizStorage, path: &Path) -> Result<()> {
    let bank = storage.load_questions();
    fs::write(path, builder::export_tsv(bank.questions()))
        .with_context(|| format!("Failed to write export file: {:?}", path))?;

    println!("✓ Exported {} questions to {}", bank.len(), path.display());
    Ok(())
}

fn run_tui(storage: QuizStorage, config: Config) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(storage, config);

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableBracketedPaste)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        tracing::error!("{:#}", err);
        eprintln!("Error: {}", err);
        return Err(err);
    }

    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| app.render(frame))?;
        app.handle_events()?;
    }
    Ok(())
}
