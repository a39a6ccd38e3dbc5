use crate::core::record::DNSRecord;
use crate::core::zone::Zone;
use crate::error::Error;
use async_trait::async_trait;

/// A DNS host that can list zones and edit records in them.
///
/// Implementations keep session state, so one instance serves one sequential
/// flow of calls. Everything except `login` requires a successful login first.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DNSProvider: Send + Sync {
    fn name(&self) -> &'static str;
    /// Returns `Ok(false)` when the provider rejects the credentials.
    async fn login(&mut self) -> Result<bool, Error>;
    async fn list_zones(&self) -> Result<Vec<Zone>, Error>;
    async fn list_records(&self, zone: &Zone) -> Result<Vec<DNSRecord>, Error>;
    /// Creates `record`, or updates it when it carries an id. Returns the zone's
    /// records as the provider shows them afterwards.
    async fn put_record(&self, zone: &Zone, record: &DNSRecord) -> Result<Vec<DNSRecord>, Error>;
    async fn delete_record(&self, zone: &Zone, record: &DNSRecord) -> Result<(), Error>;
}
