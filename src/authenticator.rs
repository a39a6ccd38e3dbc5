use log::{info, warn};

use crate::core::provider::DNSProvider;
use crate::core::record::DNSRecord;
use crate::core::zone::{Zone, resolve_zone};
use crate::error::Error;

pub const DEFAULT_TTL: u32 = 300;

/// Places and removes dns-01 challenge TXT records through a provider.
///
/// Both operations are safe to repeat: `perform` skips a record that is
/// already there and `cleanup` succeeds when there is nothing to remove.
pub struct Authenticator<P: DNSProvider> {
    provider: P,
    ttl: u32,
}

impl<P: DNSProvider> Authenticator<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            ttl: DEFAULT_TTL,
        }
    }

    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Makes sure `validation_name` has a TXT record holding `validation`.
    pub async fn perform(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        self.create_txt(domain, validation_name, validation)
            .await
            .map_err(|source| Error::ChallengeFailed {
                action: "create",
                domain: domain.to_string(),
                record: validation_name.to_string(),
                source: Box::new(source),
            })
    }

    /// Removes the TXT record placed by `perform`, if it is still there.
    pub async fn cleanup(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        self.delete_txt(domain, validation_name, validation)
            .await
            .map_err(|source| Error::ChallengeFailed {
                action: "delete",
                domain: domain.to_string(),
                record: validation_name.to_string(),
                source: Box::new(source),
            })
    }

    async fn create_txt(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let zone = self.target_zone(domain).await?;

        let records = self.provider.list_records(&zone).await?;
        if let Some(existing) = records
            .iter()
            .find(|r| r.is_txt_match(validation_name, validation))
        {
            warn!("[DNS-HE] Record {existing} already exists");
            return Ok(());
        }

        let record = DNSRecord::txt(validation_name, validation, self.ttl);
        info!("[DNS-HE] Putting record {record} in {}", zone.name);
        self.provider.put_record(&zone, &record).await?;
        Ok(())
    }

    async fn delete_txt(
        &mut self,
        domain: &str,
        validation_name: &str,
        validation: &str,
    ) -> Result<(), Error> {
        let zone = self.target_zone(domain).await?;

        let records = self.provider.list_records(&zone).await?;
        match records
            .iter()
            .find(|r| r.is_txt_match(validation_name, validation))
        {
            Some(record) => {
                info!("[DNS-HE] Deleting record {record} from {}", zone.name);
                self.provider.delete_record(&zone, record).await
            }
            None => {
                info!("[DNS-HE] No TXT {validation_name} left to delete");
                Ok(())
            }
        }
    }

    async fn target_zone(&mut self, domain: &str) -> Result<Zone, Error> {
        if !self.provider.login().await? {
            return Err(Error::AuthenticationError(format!(
                "{} rejected the login",
                self.provider.name()
            )));
        }

        let zones = self.provider.list_zones().await?;
        let found = resolve_zone(domain, &zones)
            .ok_or_else(|| Error::ZoneNotFound(domain.to_string()))?;
        if found.labels_stripped > 0 {
            info!(
                "[DNS-HE] Using {} for {domain} ({} labels up)",
                found.zone, found.labels_stripped
            );
        }
        Ok(found.zone.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::MockDNSProvider;
    use crate::core::record::DNSRecordType;
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const NAME: &str = "_acme-challenge.a.b.example.com";
    const TOKEN: &str = "Xyz-token";

    fn logged_in_mock(zones: Vec<Zone>) -> MockDNSProvider {
        let mut provider = MockDNSProvider::new();
        provider.expect_login().returning(|| Ok(true));
        provider
            .expect_list_zones()
            .returning(move || Ok(zones.clone()));
        provider
    }

    fn existing(id: u64, name: &str, value: &str) -> DNSRecord {
        DNSRecord {
            id: Some(id),
            ..DNSRecord::txt(name, value, 300)
        }
    }

    #[tokio::test]
    async fn test_perform_creates_record_in_parent_zone() {
        let mut provider = logged_in_mock(vec![Zone::new(1, "example.com")]);
        provider
            .expect_list_records()
            .withf(|zone| zone.name == "example.com")
            .returning(|_| Ok(vec![]));
        provider
            .expect_put_record()
            .withf(|zone, record| {
                zone.id == 1
                    && record.id.is_none()
                    && record.record_type == DNSRecordType::TXT
                    && record.name == NAME
                    && record.value == TOKEN
                    && record.ttl == 300
            })
            .times(1)
            .returning(|_, record| Ok(vec![record.clone()]));

        let mut auth = Authenticator::new(provider);
        auth.perform("a.b.example.com", NAME, TOKEN).await.unwrap();
    }

    #[tokio::test]
    async fn test_perform_uses_configured_ttl() {
        let mut provider = logged_in_mock(vec![Zone::new(1, "example.com")]);
        provider.expect_list_records().returning(|_| Ok(vec![]));
        provider
            .expect_put_record()
            .withf(|_, record| record.ttl == 120)
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let mut auth = Authenticator::new(provider).with_ttl(120);
        auth.perform("example.com", "_acme-challenge.example.com", TOKEN)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_perform_skips_existing_record_with_other_case() {
        let mut provider = logged_in_mock(vec![Zone::new(1, "example.com")]);
        provider
            .expect_list_records()
            .returning(|_| Ok(vec![existing(9, "_ACME-Challenge.A.B.Example.com", TOKEN)]));
        provider.expect_put_record().times(0);

        let mut auth = Authenticator::new(provider);
        auth.perform("a.b.example.com", NAME, TOKEN).await.unwrap();
    }

    #[tokio::test]
    async fn test_perform_login_rejected() {
        let mut provider = MockDNSProvider::new();
        provider.expect_login().returning(|| Ok(false));
        provider
            .expect_name()
            .return_const("hurricane-electric");
        provider.expect_list_zones().times(0);

        let mut auth = Authenticator::new(provider);
        let err = auth.perform("example.com", NAME, TOKEN).await.unwrap_err();
        assert_matches!(err.root_cause(), Error::AuthenticationError(_));
        assert_matches!(err, Error::ChallengeFailed { action: "create", .. });
    }

    #[tokio::test]
    async fn test_perform_zone_not_found() {
        let mut provider = logged_in_mock(vec![Zone::new(1, "example.org")]);
        provider.expect_list_records().times(0);

        let mut auth = Authenticator::new(provider);
        let err = auth.perform("a.b.example.com", NAME, TOKEN).await.unwrap_err();
        assert_matches!(
            err,
            Error::ChallengeFailed { ref domain, ref record, .. }
                if domain == "a.b.example.com" && record == NAME
        );
        assert_matches!(err.root_cause(), Error::ZoneNotFound(d) if d == "a.b.example.com");
    }

    #[tokio::test]
    async fn test_perform_wraps_provider_rejection() {
        let mut provider = logged_in_mock(vec![Zone::new(1, "example.com")]);
        provider.expect_list_records().returning(|_| Ok(vec![]));
        provider
            .expect_put_record()
            .returning(|_, _| Err(Error::ProviderRejected("Put failed: zone locked".into())));

        let mut auth = Authenticator::new(provider);
        let err = auth.perform("example.com", NAME, TOKEN).await.unwrap_err();
        assert_matches!(err.root_cause(), Error::ProviderRejected(m) if m.contains("zone locked"));
        assert!(err.to_string().contains(NAME));
    }

    #[tokio::test]
    async fn test_cleanup_deletes_first_match_only() {
        let mut provider = logged_in_mock(vec![
            Zone::new(1, "example.com"),
            Zone::new(2, "b.example.com"),
        ]);
        provider
            .expect_list_records()
            .withf(|zone| zone.id == 2)
            .returning(|_| {
                Ok(vec![
                    existing(7, NAME, "other-token"),
                    existing(8, &NAME.to_uppercase(), TOKEN),
                    existing(9, NAME, TOKEN),
                ])
            });
        provider
            .expect_delete_record()
            .withf(|zone, record| zone.id == 2 && record.id == Some(8))
            .times(1)
            .returning(|_, _| Ok(()));

        let mut auth = Authenticator::new(provider);
        auth.cleanup("a.b.example.com", NAME, TOKEN).await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_without_match_is_noop() {
        let mut provider = logged_in_mock(vec![Zone::new(1, "example.com")]);
        provider
            .expect_list_records()
            .returning(|_| Ok(vec![existing(7, NAME, "other-token")]));
        provider.expect_delete_record().times(0);

        let mut auth = Authenticator::new(provider);
        auth.cleanup("a.b.example.com", NAME, TOKEN).await.unwrap();
    }

    #[tokio::test]
    async fn test_cleanup_zone_not_found() {
        let provider = logged_in_mock(vec![]);

        let mut auth = Authenticator::new(provider);
        let err = auth.cleanup("example.com", NAME, TOKEN).await.unwrap_err();
        assert_matches!(err, Error::ChallengeFailed { action: "delete", .. });
        assert_matches!(err.root_cause(), Error::ZoneNotFound(_));
    }

    /// Keeps records in memory and counts mutating calls.
    struct FakeProvider {
        logged_in: bool,
        zones: Vec<Zone>,
        records: Mutex<Vec<DNSRecord>>,
        puts: Mutex<usize>,
        deletes: Mutex<usize>,
    }

    impl FakeProvider {
        fn new(zone: &str) -> Self {
            Self {
                logged_in: false,
                zones: vec![Zone::new(1, zone)],
                records: Mutex::new(Vec::new()),
                puts: Mutex::new(0),
                deletes: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl DNSProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn login(&mut self) -> Result<bool, Error> {
            self.logged_in = true;
            Ok(true)
        }

        async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
            if !self.logged_in {
                return Err(Error::NotAuthenticated);
            }
            Ok(self.zones.clone())
        }

        async fn list_records(&self, _zone: &Zone) -> Result<Vec<DNSRecord>, Error> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn put_record(
            &self,
            _zone: &Zone,
            record: &DNSRecord,
        ) -> Result<Vec<DNSRecord>, Error> {
            *self.puts.lock().unwrap() += 1;
            let mut records = self.records.lock().unwrap();
            let id = records.len() as u64 + 100;
            records.push(DNSRecord {
                id: Some(id),
                ..record.clone()
            });
            Ok(records.clone())
        }

        async fn delete_record(&self, _zone: &Zone, record: &DNSRecord) -> Result<(), Error> {
            *self.deletes.lock().unwrap() += 1;
            self.records.lock().unwrap().retain(|r| r.id != record.id);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_perform_twice_mutates_once() {
        let mut auth = Authenticator::new(FakeProvider::new("example.com"));

        auth.perform("a.b.example.com", NAME, TOKEN).await.unwrap();
        auth.perform("a.b.example.com", NAME, TOKEN).await.unwrap();

        assert_eq!(*auth.provider.puts.lock().unwrap(), 1);
        assert_eq!(auth.provider.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_perform_then_cleanup_twice() {
        let mut auth = Authenticator::new(FakeProvider::new("example.com"));

        auth.perform("a.b.example.com", NAME, TOKEN).await.unwrap();
        auth.cleanup("a.b.example.com", NAME, TOKEN).await.unwrap();
        auth.cleanup("a.b.example.com", NAME, TOKEN).await.unwrap();

        assert_eq!(*auth.provider.deletes.lock().unwrap(), 1);
        assert!(auth.provider.records.lock().unwrap().is_empty());
    }
}
