//! Hurricane Electric DNS console provider

pub mod client;
pub mod error;
pub mod parser;
pub mod session;
pub mod types;


pub use client::{HeConfig, HeProvider};

// --- DNSProvider trait implementation for HeProvider ---
use crate::core::provider::DNSProvider;
use crate::core::record::DNSRecord;
use crate::core::zone::Zone;
use crate::error::Error;
use async_trait::async_trait;
use error::map_error;

#[async_trait]
impl DNSProvider for HeProvider {
    fn name(&self) -> &'static str {
        "hurricane-electric"
    }

    async fn login(&mut self) -> Result<bool, Error> {
        HeProvider::login(self).await.map_err(map_error)
    }

    async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        HeProvider::list_zones(self).await.map_err(map_error)
    }

    async fn list_records(&self, zone: &Zone) -> Result<Vec<DNSRecord>, Error> {
        HeProvider::list_records(self, zone).await.map_err(map_error)
    }

    async fn put_record(&self, zone: &Zone, record: &DNSRecord) -> Result<Vec<DNSRecord>, Error> {
        HeProvider::put_record(self, zone, record)
            .await
            .map_err(map_error)
    }

    async fn delete_record(&self, zone: &Zone, record: &DNSRecord) -> Result<(), Error> {
        HeProvider::delete_record(self, zone, record)
            .await
            .map_err(map_error)
    }
}
