/// Main entry point for the reminder check worker
///
/// This binary is the scheduling collaborator of the engine: it opens the
/// practice database and polls the reminder service on a fixed interval,
/// passing the current local time in on every tick. Delivery of the
/// rendered notifications is out of scope; they are logged for whatever
/// transport picks them up.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use practice_insights::{run_scheduled_checks, SqliteStore};

/// Get the default database path with robust fallback strategy
fn get_default_database_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
    // Try various locations in order of preference
    let potential_paths = [
        // 1. User's home directory (preferred)
        dirs::home_dir().map(|mut p| {
            p.push(".practice_insights");
            p
        }),
        // 2. User's data directory (platform-specific)
        dirs::data_dir().map(|mut p| {
            p.push("practice_insights");
            p
        }),
        // 3. Current working directory (last resort)
        std::env::current_dir().ok().map(|mut p| {
            p.push(".practice_insights");
            p
        }),
    ];

    for potential_path in potential_paths.iter().flatten() {
        if let Ok(()) = std::fs::create_dir_all(potential_path) {
            let test_file = potential_path.join(".test_write");
            if std::fs::write(&test_file, "test").is_ok() {
                let _ = std::fs::remove_file(&test_file);
                let mut db_path = potential_path.clone();
                db_path.push("practice.db");
                return Ok(db_path);
            }
        }
    }

    // Ultimate fallback: use a temporary directory
    let mut temp_path = std::env::temp_dir();
    temp_path.push("practice_insights");
    std::fs::create_dir_all(&temp_path)?;
    temp_path.push("practice.db");

    tracing::warn!("Using temporary directory for database: {}", temp_path.display());
    Ok(temp_path)
}

/// Command line arguments for the reminder check worker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the SQLite database file
    /// If not provided, uses a default location in the user's home directory
    #[arg(long)]
    database: Option<PathBuf>,

    /// Seconds between reminder check runs
    #[arg(long, default_value_t = 300)]
    interval: u64,

    /// Run a single check pass and exit
    #[arg(long)]
    once: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable verbose output (implies debug)
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Set up logging based on command line flags
    let log_level = if args.verbose {
        "debug"
    } else if args.debug {
        "info"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(format!("practice_insights={}", log_level))
        .with_writer(std::io::stderr)
        .init();

    info!("Starting practice insights reminder worker");

    // Determine database path
    let db_path = match args.database {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.exists() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            path
        }
        None => get_default_database_path()?,
    };

    info!("Using database at: {}", db_path.display());

    let store = SqliteStore::new(db_path)?;

    let mut ticker = tokio::time::interval(std::time::Duration::from_secs(args.interval.max(1)));
    loop {
        ticker.tick().await;

        let now = chrono::Local::now().naive_local();
        match run_scheduled_checks(&store, now) {
            Ok(notifications) => {
                for notification in &notifications {
                    info!(
                        "Notification ready for delivery: {} ({}) for user {}",
                        notification.title,
                        notification.kind.as_str(),
                        notification.user_id.to_string()
                    );
                }
            }
            Err(e) => {
                tracing::error!("Reminder check run failed: {}", e);
            }
        }

        if args.once {
            break;
        }
    }

    info!("Reminder worker shutdown complete");
    Ok(())
}
