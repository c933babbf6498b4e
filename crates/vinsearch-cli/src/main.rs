mod output;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use vinsearch_lib::{lookup_vin, Error as LibError, SearchConfig, SerpApiClient};

#[derive(Parser, Debug)]
#[command(author, version, about = "Find Canadian marketplace listings for a VIN")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search marketplaces for a VIN and print the best listing found.
    Lookup {
        /// Vehicle Identification Number (17 characters).
        vin: String,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
        /// SerpApi key. Falls back to the SERPAPI_KEY environment variable.
        #[arg(long, env = "SERPAPI_KEY", hide_env_values = true)]
        api_key: Option<String>,
        /// Override the search endpoint.
        #[arg(long, env = "SERPAPI_ENDPOINT")]
        endpoint: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Lookup {
            vin,
            format,
            api_key,
            endpoint,
        } => handle_lookup(&vin, format, api_key, endpoint).await,
    }
}

async fn handle_lookup(
    vin: &str,
    format: OutputFormat,
    api_key: Option<String>,
    endpoint: Option<String>,
) -> Result<()> {
    let Some(api_key) = api_key.filter(|key| !key.is_empty()) else {
        bail!(LibError::MissingApiKey);
    };

    let mut config = SearchConfig::new(api_key);
    if let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) {
        config = config.with_endpoint(endpoint);
    }
    let client = SerpApiClient::new(config).context("failed to build search client")?;

    let record = lookup_vin(&client, vin).await.to_record();

    match format {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(&record).context("failed to serialize record")?;
            println!("{}", json);
        }
        OutputFormat::Text => print!("{}", output::render_text(&record)),
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
