use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::auth::credentials::CredentialManager;
use crate::core::record::DNSRecord;
use crate::core::zone::Zone;
use crate::providers::he::error::HeProviderError;
use crate::providers::he::parser::Page;
use crate::providers::he::session::Session;
use crate::providers::he::types::*;

pub const DEFAULT_BASE_URL: &str = "https://dns.he.net";

pub struct HeConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for HeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the Hurricane Electric DNS web console.
///
/// There is no API: every call fetches or submits a console page and reads
/// the result back out of the HTML. Login happens on demand and is remembered
/// for the life of the instance.
pub struct HeProvider {
    session: Session,
    credentials: Arc<dyn CredentialManager>,
}

impl HeProvider {
    pub fn new(
        config: HeConfig,
        credentials: Arc<dyn CredentialManager>,
    ) -> Result<Self, HeProviderError> {
        let session = Session::new(&config.base_url, config.timeout)?;
        Ok(Self {
            session,
            credentials,
        })
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Logs in unless already logged in. A rejected login is `Ok(false)`,
    /// only transport and page problems are errors.
    pub async fn login(&mut self) -> Result<bool, HeProviderError> {
        if self.is_logged_in() {
            return Ok(true);
        }

        let user = self
            .credentials
            .get("user")
            .map_err(|e| HeProviderError::Credential(e.to_string()))?;
        let pass = self
            .credentials
            .get("pass")
            .map_err(|e| HeProviderError::Credential(e.to_string()))?;

        // Picks up the session cookie
        self.session.get("/").await?;

        let body = self
            .session
            .post(
                "/",
                &LoginForm {
                    email: &user,
                    pass: &pass,
                },
            )
            .await?;

        let page = Page::parse(&body);
        let logged_in = page.login_succeeded()?;
        if logged_in {
            info!(user = %user, "logged in to console");
        } else {
            let reason = page.error_message()?.unwrap_or_default();
            warn!(user = %user, reason = %reason, "console login rejected");
        }
        self.session.set_authenticated(logged_in);
        Ok(logged_in)
    }

    pub async fn list_zones(&self) -> Result<Vec<Zone>, HeProviderError> {
        self.ensure_logged_in()?;
        let body = self.session.get("/").await?;
        let zones = Page::parse(&body).zones()?;
        debug!(count = zones.len(), "listed zones");
        Ok(zones)
    }

    pub async fn list_records(&self, zone: &Zone) -> Result<Vec<DNSRecord>, HeProviderError> {
        self.ensure_logged_in()?;
        let body = self
            .session
            .get_query("/", &EditZoneQuery::new(zone))
            .await?;
        let records = Page::parse(&body).records()?;
        debug!(zone = %zone.name, count = records.len(), "listed records");
        Ok(records)
    }

    pub async fn delete_record(
        &self,
        zone: &Zone,
        record: &DNSRecord,
    ) -> Result<(), HeProviderError> {
        self.ensure_logged_in()?;
        let Some(record_id) = record.id else {
            return Err(HeProviderError::InvalidInput(format!(
                "cannot delete {record} without a record id"
            )));
        };

        let body = self
            .session
            .post("/", &DeleteRecordForm::new(zone, record_id))
            .await?;

        if let Some(message) = Page::parse(&body).error_message()? {
            return Err(HeProviderError::Rejected(format!("Delete failed: {message}")));
        }
        Ok(())
    }

    /// Creates the record, or updates it in place when it has an id. Returns
    /// the zone's records from the response page.
    pub async fn put_record(
        &self,
        zone: &Zone,
        record: &DNSRecord,
    ) -> Result<Vec<DNSRecord>, HeProviderError> {
        self.ensure_logged_in()?;
        let body = self
            .session
            .post("/", &EditRecordForm::new(zone, record))
            .await?;

        let page = Page::parse(&body);
        if let Some(message) = page.error_message()? {
            return Err(HeProviderError::Rejected(format!("Put failed: {message}")));
        }
        page.records()
    }

    fn ensure_logged_in(&self) -> Result<(), HeProviderError> {
        if self.is_logged_in() {
            Ok(())
        } else {
            Err(HeProviderError::NotAuthenticated)
        }
    }
}
