use std::fmt;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DNSRecordType {
    A,
    AAAA,
    CAA,
    CNAME,
    MX,
    NS,
    PTR,
    SOA,
    SRV,
    TXT,
    Other(String),
}

impl From<&str> for DNSRecordType {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => DNSRecordType::A,
            "AAAA" => DNSRecordType::AAAA,
            "CAA" => DNSRecordType::CAA,
            "CNAME" => DNSRecordType::CNAME,
            "MX" => DNSRecordType::MX,
            "NS" => DNSRecordType::NS,
            "PTR" => DNSRecordType::PTR,
            "SOA" => DNSRecordType::SOA,
            "SRV" => DNSRecordType::SRV,
            "TXT" => DNSRecordType::TXT,
            other => DNSRecordType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DNSRecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DNSRecordType::A => "A",
            DNSRecordType::AAAA => "AAAA",
            DNSRecordType::CAA => "CAA",
            DNSRecordType::CNAME => "CNAME",
            DNSRecordType::MX => "MX",
            DNSRecordType::NS => "NS",
            DNSRecordType::PTR => "PTR",
            DNSRecordType::SOA => "SOA",
            DNSRecordType::SRV => "SRV",
            DNSRecordType::TXT => "TXT",
            DNSRecordType::Other(name) => name,
        };
        f.write_str(name)
    }
}

/// A record as the provider shows it. `id` is `None` until the provider has
/// stored the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DNSRecord {
    pub id: Option<u64>,
    pub record_type: DNSRecordType,
    pub name: String,
    pub value: String,
    pub ttl: u32,
    pub priority: Option<u32>,
}

impl DNSRecord {
    pub fn txt(name: &str, value: &str, ttl: u32) -> Self {
        DNSRecord {
            id: None,
            record_type: DNSRecordType::TXT,
            name: name.to_string(),
            value: value.to_string(),
            ttl,
            priority: None,
        }
    }

    /// Identity used for challenge bookkeeping: TXT type, name compared
    /// case-insensitively, exact value. TTL and priority are ignored.
    pub fn is_txt_match(&self, name: &str, value: &str) -> bool {
        self.record_type == DNSRecordType::TXT
            && self.name.eq_ignore_ascii_case(name)
            && self.value == value
    }
}

impl fmt::Display for DNSRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "<{id} ")?,
            None => write!(f, "<new ")?,
        }
        write!(
            f,
            "[{}] {} {} TTL:{}>",
            self.record_type, self.name, self.value, self.ttl
        )
    }
}
