//! Local backend server binary.

use anyhow::{Context, Result};
use clap::Parser;
use innerverse::init_logging;
use innerverse_protocol::LessonRecord;
use innerverse_store::LessonStore;
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

/// InnerVerse local backend: lesson catalog, chat history, and progress.
#[derive(Debug, Parser)]
#[command(name = "innerverse", version, about)]
struct Cli {
    /// Path to the sqlite database file.
    #[arg(long, default_value = "innerverse.db")]
    db: PathBuf,

    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8017")]
    bind: String,

    /// Optional JSON file with an array of lessons to seed the catalog.
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let store = Arc::new(
        LessonStore::open(&cli.db)
            .with_context(|| format!("failed to open store at {}", cli.db.display()))?,
    );
    if let Some(seed) = &cli.seed {
        let count = seed_catalog(&store, seed)
            .with_context(|| format!("failed to seed catalog from {}", seed.display()))?;
        info!("seeded {} lessons from {}", count, seed.display());
    }

    let app = innerverse_server::router(store);
    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    info!("serving on http://{}", cli.bind);
    axum::serve(listener, app).await.context("server exited")?;
    Ok(())
}

/// Load a JSON array of lessons into the catalog. Existing ids are replaced.
fn seed_catalog(store: &LessonStore, path: &PathBuf) -> Result<usize> {
    let raw = std::fs::read_to_string(path)?;
    let lessons: Vec<LessonRecord> = serde_json::from_str(&raw)?;
    for lesson in &lessons {
        store.insert_lesson(lesson)?;
    }
    Ok(lessons.len())
}
