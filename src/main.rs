use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use gazette::api::NewsClient;
use gazette::app::{App, AppEvent};
use gazette::config::{Config, TOKEN_ENV_VAR};
use gazette::storage::Database;
use gazette::ui;

/// Get the config directory path (~/.config/gazette/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("gazette"))
}

#[derive(Parser, Debug)]
#[command(name = "gazette", about = "Terminal news browser with cached pagination")]
struct Args {
    /// Delete all saved favorites and exit
    #[arg(long)]
    reset_favorites: bool,

    /// Use an alternate config file instead of ~/.config/gazette/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing for debug logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    // Directory holds the token-bearing config and the favorites database.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(&config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(&config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }

    let config_path = args
        .config
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let Some(token) = config.resolve_token() else {
        eprintln!("Error: No news API token configured.");
        eprintln!();
        eprintln!("Set one of:");
        eprintln!("  {TOKEN_ENV_VAR}=<token> in the environment, or");
        eprintln!(
            "  api_token = \"<token>\" in {}",
            config_path.display()
        );
        std::process::exit(1);
    };

    // Open database
    let db_path = config_dir.join("gazette.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = Database::open(db_path_str)
        .await
        .context("Failed to open database")?;

    // Handle --reset-favorites flag
    if args.reset_favorites {
        db.reset_favorites()
            .await
            .context("Failed to reset favorites")?;
        println!("Favorites reset.");
        return Ok(());
    }

    let favorites = db.load_favorites().await;
    if !favorites.is_empty() {
        tracing::info!(count = favorites.len(), "Restored favorites");
    }

    let client = NewsClient::new(&config.base_url, token, config.search_recency_days)
        .context("Failed to create HTTP client")?;

    let mut app = App::new(db, client, config.categories.clone(), favorites);

    // Create event channel for background fetch tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    // Run the TUI
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
