mod commands;

use clap::{Parser, Subcommand};
use muambr_core::Country;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "muambr-cli")]
#[command(about = "Compare product prices across countries from the shell")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search every storefront selected for a country and print ranked sections
    Search {
        /// Product search term
        term: String,
        /// Country the user shops from (e.g., BR)
        #[arg(long)]
        base: Country,
        /// Country the user is browsing from, if different
        #[arg(long)]
        current: Option<Country>,
        /// Display currency (defaults to the base country's currency)
        #[arg(long)]
        currency: Option<String>,
        /// Search the whole macro-region of the current country
        #[arg(long)]
        macro_region: bool,
        /// Maximum listings per country (0 keeps all)
        #[arg(long, default_value = "10")]
        limit: usize,
    },
    /// Print the exchange rate table for a base currency
    Rates {
        /// Base currency (e.g., USD)
        base: String,
    },
    /// Convert a price string between currencies
    Convert {
        /// Price as shown by a store (e.g., "R$ 1.299,90")
        price: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = muambr_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Search {
            term,
            base,
            current,
            currency,
            macro_region,
            limit,
        } => {
            let request = commands::build_request(term, base, current, currency, macro_region)?;
            commands::run_search(&config, &request, limit).await?;
        }
        Commands::Rates { base } => commands::run_rates(&config, &base).await?,
        Commands::Convert { price, from, to } => {
            commands::run_convert(&config, &price, &from, &to).await?;
        }
    }

    Ok(())
}
