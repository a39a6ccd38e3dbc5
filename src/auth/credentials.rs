use crate::error::Error;
use log::warn;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

/// Supplies the console login. Keys are `user` and `pass`.
pub trait CredentialManager: Send + Sync {
    fn get(&self, key: &str) -> Result<String, Error>;
}

/// Reads `HE_USER` / `HE_PASS` from the environment.
pub struct EnvCredentialManager;

impl CredentialManager for EnvCredentialManager {
    fn get(&self, key: &str) -> Result<String, Error> {
        let var = match key {
            "user" => "HE_USER",
            "pass" => "HE_PASS",
            _ => return Err(Error::CredentialError(format!("Unknown key: {key}"))),
        };
        env::var(var).map_err(|e| Error::CredentialError(format!("{var}: {e}")))
    }
}

/// Key prefixes accepted in a credentials file, so certbot-style files work as is.
const KEY_PREFIXES: [&str; 3] = ["", "dns_he_", "dns_hurricane_electric_"];

/// certbot-style INI credentials file:
///
/// ```ini
/// dns_hurricane_electric_user = myuser
/// dns_hurricane_electric_pass = secret
/// ```
#[cfg_attr(test, derive(Debug))]
pub struct FileCredentialManager {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl FileCredentialManager {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::CredentialError(format!("Unable to read {}: {e}", path.display()))
        })?;
        warn_if_shared(&path);
        Ok(Self {
            values: parse_ini(&contents),
            path,
        })
    }
}

impl CredentialManager for FileCredentialManager {
    fn get(&self, key: &str) -> Result<String, Error> {
        KEY_PREFIXES
            .iter()
            .find_map(|prefix| self.values.get(&format!("{prefix}{key}")))
            .filter(|value| !value.is_empty())
            .cloned()
            .ok_or_else(|| {
                Error::CredentialError(format!("{key} missing from {}", self.path.display()))
            })
    }
}

fn parse_ini(contents: &str) -> HashMap<String, String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(['#', ';', '[']))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .collect()
}

#[cfg(unix)]
fn warn_if_shared(path: &Path) {
    use std::os::unix::fs::PermissionsExt;

    if let Ok(meta) = std::fs::metadata(path) {
        if meta.permissions().mode() & 0o077 != 0 {
            warn!(
                "[DNS-HE] Credentials file {} is accessible by other users",
                path.display()
            );
        }
    }
}

#[cfg(not(unix))]
fn warn_if_shared(_path: &Path) {}
