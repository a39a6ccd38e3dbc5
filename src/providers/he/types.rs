use serde::Serialize;

use crate::core::record::DNSRecord;
use crate::core::zone::Zone;

const EDIT_ZONE_MENU: &str = "edit_zone";

/// The console calls the field `email` but only accepts the account username.
#[derive(Serialize)]
pub struct LoginForm<'a> {
    pub email: &'a str,
    pub pass: &'a str,
}

#[derive(Serialize)]
pub struct EditZoneQuery {
    pub hosted_dns_zoneid: u64,
    pub menu: &'static str,
    pub hosted_dns_editzone: u8,
}

impl EditZoneQuery {
    pub fn new(zone: &Zone) -> Self {
        Self {
            hosted_dns_zoneid: zone.id,
            menu: EDIT_ZONE_MENU,
            hosted_dns_editzone: 1,
        }
    }
}

#[derive(Serialize)]
pub struct DeleteRecordForm {
    pub menu: &'static str,
    pub hosted_dns_editzone: u8,
    pub hosted_dns_delrecord: u8,
    pub hosted_dns_delconfirm: &'static str,
    pub hosted_dns_zoneid: u64,
    pub hosted_dns_recordid: u64,
}

impl DeleteRecordForm {
    pub fn new(zone: &Zone, record_id: u64) -> Self {
        Self {
            menu: EDIT_ZONE_MENU,
            hosted_dns_editzone: 1,
            hosted_dns_delrecord: 1,
            hosted_dns_delconfirm: "delete",
            hosted_dns_zoneid: zone.id,
            hosted_dns_recordid: record_id,
        }
    }
}

#[derive(Serialize)]
pub struct EditRecordForm<'a> {
    pub menu: &'static str,
    pub hosted_dns_editrecord: &'static str,
    pub hosted_dns_editzone: u8,
    pub hosted_dns_zoneid: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosted_dns_recordid: Option<u64>,
    #[serde(rename = "Name")]
    pub name: &'a str,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "Content")]
    pub content: &'a str,
    #[serde(rename = "Priority")]
    pub priority: String,
    #[serde(rename = "TTL")]
    pub ttl: u32,
}

impl<'a> EditRecordForm<'a> {
    /// A record with an id updates the stored record, one without creates it.
    pub fn new(zone: &Zone, record: &'a DNSRecord) -> Self {
        Self {
            menu: EDIT_ZONE_MENU,
            hosted_dns_editrecord: if record.id.is_some() { "Update" } else { "Submit" },
            hosted_dns_editzone: 1,
            hosted_dns_zoneid: zone.id,
            hosted_dns_recordid: record.id,
            name: &record.name,
            record_type: record.record_type.to_string(),
            content: &record.value,
            priority: record.priority.map(|p| p.to_string()).unwrap_or_default(),
            ttl: record.ttl,
        }
    }
}
