use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::authenticator::DEFAULT_TTL;
use crate::providers::he::HeConfig;
use crate::providers::he::client::DEFAULT_BASE_URL;

#[derive(Clone, Debug)]
pub struct Config {
    pub base_url: String,
    pub timeout: Duration,
    pub ttl: u32,
    pub propagation: Duration,
    pub credentials_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            base_url: env::var("HE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            timeout: Duration::from_secs(
                env::var("HE_TIMEOUT")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30),
            ),
            ttl: env::var("HE_TTL")
                .unwrap_or_else(|_| DEFAULT_TTL.to_string())
                .parse()
                .unwrap_or(DEFAULT_TTL),
            propagation: Duration::from_secs(
                env::var("HE_PROPAGATION_SECONDS")
                    .unwrap_or_else(|_| "10".to_string())
                    .parse()
                    .unwrap_or(10),
            ),
            credentials_file: env::var_os("HE_CREDENTIALS").map(PathBuf::from),
        }
    }

    pub fn provider_config(&self) -> HeConfig {
        HeConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: Duration::from_secs(30),
            ttl: DEFAULT_TTL,
            propagation: Duration::from_secs(10),
            credentials_file: None,
        }
    }
}
