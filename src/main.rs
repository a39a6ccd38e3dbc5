use std::sync::Arc;

use auth::credentials::{CredentialManager, EnvCredentialManager, FileCredentialManager};
use authenticator::Authenticator;
use clap::{Args, Parser, Subcommand};
use config::Config;
use error::Error;
use log::{error, info};
use providers::he::HeProvider;
use providers::he::error::map_error;
use tracing_subscriber::EnvFilter;

use crate::core::provider::DNSProvider;

mod auth;
mod authenticator;
mod config;
mod core;
mod error;
mod providers;

/// dns-01 hook for domains hosted on the Hurricane Electric DNS console.
///
/// Meant to be run as certbot `--manual-auth-hook` / `--manual-cleanup-hook`,
/// which pass the challenge through CERTBOT_DOMAIN and CERTBOT_VALIDATION.
#[derive(Parser)]
#[command(name = "dns-he-auth", version, about)]
struct Cli {
    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "HE_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the challenge TXT record and wait for it to propagate
    Auth(ChallengeArgs),
    /// Remove the challenge TXT record
    Cleanup(ChallengeArgs),
}

#[derive(Args)]
struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    domain: String,

    /// Validation token to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    validation: String,

    /// TXT record name, defaults to _acme-challenge.<domain>
    #[arg(long)]
    record_name: Option<String>,
}

impl ChallengeArgs {
    fn domain(&self) -> &str {
        self.domain.strip_prefix("*.").unwrap_or(&self.domain)
    }

    fn validation_name(&self) -> String {
        self.record_name
            .clone()
            .unwrap_or_else(|| format!("_acme-challenge.{}", self.domain()))
    }
}

fn credentials(config: &Config) -> Result<Arc<dyn CredentialManager>, Error> {
    match &config.credentials_file {
        Some(path) => Ok(Arc::new(FileCredentialManager::load(path)?)),
        None => Ok(Arc::new(EnvCredentialManager)),
    }
}

async fn run(command: Command) -> Result<(), Error> {
    let config = Config::from_env();

    let provider = HeProvider::new(config.provider_config(), credentials(&config)?)
        .map_err(map_error)?;
    info!("Using {} at {}", provider.name(), config.base_url);

    let mut authenticator = Authenticator::new(provider).with_ttl(config.ttl);
    match command {
        Command::Auth(args) => {
            authenticator
                .perform(args.domain(), &args.validation_name(), &args.validation)
                .await?;
            if !config.propagation.is_zero() {
                info!(
                    "Waiting {}s for DNS changes to propagate",
                    config.propagation.as_secs()
                );
                tokio::time::sleep(config.propagation).await;
            }
        }
        Command::Cleanup(args) => {
            authenticator
                .cleanup(args.domain(), &args.validation_name(), &args.validation)
                .await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Hooks may have their stdout captured, keep logs on stderr
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli.command).await {
        // Display already carries the wrapped cause
        error!("{e}");
        std::process::exit(1);
    }
}
