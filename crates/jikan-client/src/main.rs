//! Jikan catalog CLI application.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use jikan_client::api::AnimeDetailsResponse;
use jikan_client::{JikanClient, TopFilter};
use serde::Serialize;
use shared::{AnimeLibrary, Config, SqliteStore};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Anime airing this season
    Seasonal,
    /// Top ranked anime
    Top {
        /// all, airing, upcoming, bypopularity or favorite
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Most recently started airing anime
    Recent,
    /// Full details of one anime
    Details { id: String },
    /// Characters of one anime
    Characters { id: String },
    /// Search anime by title
    Search {
        query: String,
        /// Restrict results to a genre id
        #[arg(short, long)]
        genre: Option<u32>,
    },
    /// All anime genres
    Genres,
    /// Show details of an anime and record it as recently viewed
    View { id: String },
    /// Add an anime to favorites, or remove it if already there
    Favorite { id: String },
    /// List favorites
    Favorites,
    /// List recently viewed anime
    Recents,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = shared::LogConfig::from_config(&config, "jikan-client");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(config_file = %args.config.display(), "Loaded configuration");

    let client = JikanClient::from_config(&config.jikan).context("Failed to create Jikan client")?;

    match args.command {
        Command::Seasonal => print_json(&client.seasonal().await.into_json()),
        Command::Top { filter } => {
            let filter = TopFilter::from(filter.as_str());
            print_json(&client.top(filter).await.into_json())
        }
        Command::Recent => print_json(&client.recent().await.into_json()),
        Command::Details { id } => print_json(&client.details(&id).await.into_json()),
        Command::Characters { id } => print_json(&client.characters(&id).await.into_json()),
        Command::Search { query, genre } => {
            print_json(&client.search(&query, genre).await.into_json())
        }
        Command::Genres => print_json(&client.genres().await.into_json()),
        Command::View { id } => {
            let mut library = open_library(&config)?;
            let details = fetch_details(&client, &id).await?;
            library
                .add_to_recents(details.data.clone())
                .context("Failed to update recents")?;
            print_json(&details)
        }
        Command::Favorite { id } => {
            let mut library = open_library(&config)?;
            let details = fetch_details(&client, &id).await?;
            let title = details.data.display_title().to_string();
            let favorite = library
                .toggle_favorite(details.data)
                .context("Failed to update favorites")?;
            info!(id = %id, title = %title, favorite, "Toggled favorite");
            print_json(&serde_json::json!({
                "mal_id": id,
                "title": title,
                "favorite": favorite,
            }))
        }
        Command::Favorites => print_json(&open_library(&config)?.favorites()),
        Command::Recents => print_json(&open_library(&config)?.recents()),
    }
}

fn open_library(config: &Config) -> Result<AnimeLibrary<SqliteStore>> {
    let path = config.storage_path();
    info!(path = %path.display(), "Opening library");
    let store = SqliteStore::open(&path).context("Failed to open library database")?;
    Ok(AnimeLibrary::with_capacity(store, config.library.recents_capacity))
}

async fn fetch_details(client: &JikanClient, id: &str) -> Result<AnimeDetailsResponse> {
    client
        .details(id)
        .await
        .decode()
        .ok_or_else(|| anyhow!("No details available for anime {}", id))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let output = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", output);
    Ok(())
}
