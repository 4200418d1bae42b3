mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ukaddr")]
#[command(about = "UK address lookup command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve free text or a postcode into address suggestions
    Search {
        query: String,
        /// Maximum number of suggestions
        #[arg(long)]
        limit: Option<u32>,
        /// Allow Google Places even when Mapbox is configured
        #[arg(long)]
        google: bool,
        /// Latitude to bias results towards (requires --lng)
        #[arg(long, requires = "lng", allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude to bias results towards (requires --lat)
        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lng: Option<f64>,
        /// Print one line per suggestion instead of JSON
        #[arg(long)]
        plain: bool,
    },
    /// Show how a query would be classified
    Classify { query: String },
    /// Autocomplete a partial postcode, or look up a full one
    Postcode {
        postcode: String,
        /// Fetch administrative details instead of completions
        #[arg(long)]
        lookup: bool,
    },
    /// Resolve a Google place id into a suggestion
    Place { place_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ukaddr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            query,
            limit,
            google,
            lat,
            lng,
            plain,
        } => {
            let options = commands::search_options(limit, lat.zip(lng));
            commands::run_search(&config, &query, options, google, plain).await?;
        }
        Commands::Classify { query } => commands::run_classify(&query)?,
        Commands::Postcode { postcode, lookup } => {
            commands::run_postcode(&config, &postcode, lookup).await?;
        }
        Commands::Place { place_id } => commands::run_place(&config, &place_id).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
