use clap::{Parser, Subcommand, ValueEnum};
use tpsmail_core::{AppConfig, Query};
use tpsmail_scraper::{
    EmailLookup, FetchOptions, LinkPolicy, LookupOutcome, LookupSettings, ProxyClient,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tpsmail-cli")]
#[command(about = "Look up a person's email address through the scraping proxy")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one lookup and print the result as JSON.
    Lookup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        state: Option<String>,
        /// How the detail-record link is picked on the results page.
        #[arg(long, value_enum, default_value_t = PolicyArg::Text)]
        policy: PolicyArg,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PolicyArg {
    /// Anchor text contains "View Details".
    Text,
    /// Anchor href starts with /find/person/.
    Path,
}

impl From<PolicyArg> for LinkPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Text => LinkPolicy::TextMatch,
            PolicyArg::Path => LinkPolicy::PathMatch,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = tpsmail_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Lookup {
            name,
            city,
            state,
            policy,
        } => {
            let query = Query::new(&name, city.as_deref(), state.as_deref());
            let outcome = run_lookup(&config, &query, policy).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
    }

    Ok(())
}

async fn run_lookup(
    config: &AppConfig,
    query: &Query,
    policy: PolicyArg,
) -> anyhow::Result<LookupOutcome> {
    let client = ProxyClient::new(&config.proxy)?;
    let mut settings =
        LookupSettings::from_site(&config.site, FetchOptions::from_config(&config.proxy))?;
    settings.link_policy = policy.into();

    tracing::info!(?policy, origin = %settings.site_origin, "starting email lookup");
    let outcome = EmailLookup::new(client, settings).lookup(query).await;
    match &outcome {
        Ok(found) => tracing::info!(emails = found.emails.len(), "email lookup finished"),
        Err(e) => tracing::error!(error = %e, "email lookup failed"),
    }
    Ok(outcome?)
}
