use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use filetracker_core::config::AppConfig;
use filetracker_watchman::FileTracker;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "FileTracker - remembers where new files get saved", long_about = None)]
struct Args {
    /// Config file (defaults to ./filetracker.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Watch all fixed volumes until Ctrl-C (default)
    Watch,
    /// Show recorded folders, most recent first
    List {
        /// Print a JSON array instead of one folder per line
        #[arg(long)]
        json: bool,
    },
    /// Record a folder by hand
    Add {
        #[arg(index = 1)]
        path: String,
    },
    /// Forget all recorded folders
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Show the roots that would be watched
    Roots,
    /// Tell whether a path would be ignored
    Check {
        #[arg(index = 1)]
        path: String,
    },
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("cannot open log file {}", path.display()))?;
            let (non_blocking, guard) = tracing_appender::non_blocking(file);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_ansi(true)
                .init();
            Ok(None)
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::stdout().flush()?;
    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

async fn watch(tracker: &FileTracker) -> Result<()> {
    let report = tracker.start_monitoring().await?;
    for failure in &report.failed {
        eprintln!("⚠️ {}", failure);
    }
    if !report.is_watching() {
        warn!("No root could be watched; waiting for Ctrl-C anyway");
    }

    println!("👀 Watching {} root(s). Press Ctrl-C to stop.", report.watched.len());
    tokio::signal::ctrl_c().await.context("failed to listen for Ctrl-C")?;

    info!("Shutting down...");
    tracker.stop_monitoring().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_logging(args.log_file.as_ref())?;

    filetracker_core::init();

    let config = AppConfig::load_from(args.config.as_deref()).context("configuration is invalid")?;
    let tracker = FileTracker::new(config).await;

    match args.command.unwrap_or(Commands::Watch) {
        Commands::Watch => watch(&tracker).await?,
        Commands::List { json } => {
            let records = tracker.get_records().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("(no records)");
            } else {
                for record in records {
                    println!("{}", record);
                }
            }
        }
        Commands::Add { path } => {
            tracker.add_record(&path).await?;
            println!("✅ Recorded {}", path);
        }
        Commands::Clear { yes } => {
            if yes || confirm("Clear all recorded folders?")? {
                tracker.clear_records().await?;
                println!("🧹 Records cleared.");
            } else {
                println!("Nothing changed.");
            }
        }
        Commands::Roots => {
            let roots = tracker.roots();
            if roots.is_empty() {
                println!("No watchable roots found.");
            }
            for root in roots {
                println!("📂 {}", root.path.display());
            }
        }
        Commands::Check { path } => match tracker.classifier().exclusions().matching(&path) {
            Some(pattern) => println!("🚫 excluded (matches {:?})", pattern),
            None => println!("✅ tracked"),
        },
    }

    Ok(())
}
