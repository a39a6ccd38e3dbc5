//! Reads the console's HTML pages.
//!
//! The markup has no published schema, so the anchors below (element ids, row
//! classes, cell positions and attribute names) are the contract. A missing
//! anchor is a hard `Parse` error; there is no fallback layout.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::core::record::{DNSRecord, DNSRecordType};
use crate::core::zone::Zone;
use crate::providers::he::error::HeProviderError;

const ERROR_CONTAINER: &str = "#dns_err";
const ZONE_TABLE: &str = "#domains_table";
const ZONE_ROWS: &str = "tbody tr";
const ZONE_NAME: &str = "span";
const ZONE_EDIT_ICON: &str = r#"img[alt="edit"]"#;
const RECORD_CONTENT: &str = "#dns_main_content";
const RECORD_ROWS: &str = "table tr.dns_tr";

const CELL_NAME: usize = 2;
const CELL_TYPE: usize = 3;
const CELL_TTL: usize = 4;
const CELL_PRIORITY: usize = 5;
const CELL_VALUE: usize = 6;

/// Zone id inside the edit icon's `onclick` handler.
static ZONE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"hosted_dns_zoneid=(\d+)").expect("zone id pattern is valid")
});

/// A parsed console page. Holds a DOM that is not `Send`, so build it, read
/// what you need and drop it before the next `.await`.
pub struct Page {
    document: Html,
}

impl Page {
    pub fn parse(html: &str) -> Self {
        Self {
            document: Html::parse_document(html),
        }
    }

    /// Text of the error container, present after a failed login or a
    /// rejected edit.
    pub fn error_message(&self) -> Result<Option<String>, HeProviderError> {
        let err = selector(ERROR_CONTAINER)?;
        Ok(self.document.select(&err).next().map(element_text))
    }

    pub fn login_succeeded(&self) -> Result<bool, HeProviderError> {
        Ok(self.error_message()?.is_none())
    }

    /// Zones listed on the account overview page.
    pub fn zones(&self) -> Result<Vec<Zone>, HeProviderError> {
        let table = selector(ZONE_TABLE)?;
        let rows = selector(ZONE_ROWS)?;
        let name = selector(ZONE_NAME)?;
        let edit_icon = selector(ZONE_EDIT_ICON)?;

        let table = self
            .document
            .select(&table)
            .next()
            .ok_or_else(|| missing(ZONE_TABLE))?;

        let mut zones = Vec::new();
        for row in table.select(&rows) {
            let zone_name = row
                .select(&name)
                .next()
                .map(element_text)
                .ok_or_else(|| missing("zone name span"))?;
            let onclick = row
                .select(&edit_icon)
                .next()
                .and_then(|icon| icon.value().attr("onclick"))
                .ok_or_else(|| missing("zone edit icon onclick"))?;
            let id = ZONE_ID
                .captures(onclick)
                .and_then(|c| c.get(1))
                .ok_or_else(|| {
                    HeProviderError::Parse(format!("no zone id in handler for {zone_name}"))
                })?
                .as_str()
                .parse::<u64>()
                .map_err(|e| HeProviderError::Parse(format!("zone id for {zone_name}: {e}")))?;

            zones.push(Zone::new(id, &zone_name));
        }
        Ok(zones)
    }

    /// Records shown on a zone's edit page.
    pub fn records(&self) -> Result<Vec<DNSRecord>, HeProviderError> {
        let content = selector(RECORD_CONTENT)?;
        let rows = selector(RECORD_ROWS)?;

        let content = self
            .document
            .select(&content)
            .next()
            .ok_or_else(|| missing(RECORD_CONTENT))?;

        content.select(&rows).map(parse_record_row).collect()
    }
}

fn parse_record_row(row: ElementRef<'_>) -> Result<DNSRecord, HeProviderError> {
    let cells: Vec<ElementRef<'_>> = row.children().filter_map(ElementRef::wrap).collect();
    if cells.len() <= CELL_VALUE {
        return Err(HeProviderError::Parse(format!(
            "record row has {} cells, expected at least {}",
            cells.len(),
            CELL_VALUE + 1
        )));
    }

    let id = row
        .value()
        .attr("id")
        .ok_or_else(|| missing("record row id"))?
        .trim()
        .parse::<u64>()
        .map_err(|e| HeProviderError::Parse(format!("record id: {e}")))?;

    let name = element_text(cells[CELL_NAME]);
    let record_type = DNSRecordType::from(element_text(cells[CELL_TYPE]).as_str());
    let ttl = element_text(cells[CELL_TTL])
        .parse::<u32>()
        .map_err(|e| HeProviderError::Parse(format!("ttl of record {id}: {e}")))?;
    let priority = match element_text(cells[CELL_PRIORITY]).as_str() {
        "-" => None,
        p => Some(
            p.parse::<u32>()
                .map_err(|e| HeProviderError::Parse(format!("priority of record {id}: {e}")))?,
        ),
    };

    // Visible text may be truncated, the data attribute carries the full value
    let raw_value = cells[CELL_VALUE]
        .value()
        .attr("data")
        .ok_or_else(|| missing("record value data attribute"))?;
    let value = if record_type == DNSRecordType::TXT {
        strip_outer_quotes(raw_value)
    } else {
        raw_value.to_string()
    };

    Ok(DNSRecord {
        id: Some(id),
        record_type,
        name,
        value,
        ttl,
        priority,
    })
}

/// TXT values come wrapped in literal quotes. Drops exactly one character
/// from each end.
fn strip_outer_quotes(value: &str) -> String {
    let mut chars = value.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}

fn element_text(element: ElementRef<'_>) -> String {
    let text: String = element.text().collect();
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn selector(css: &str) -> Result<Selector, HeProviderError> {
    Selector::parse(css)
        .map_err(|e| HeProviderError::Parse(format!("invalid selector {css}: {e}")))
}

fn missing(anchor: &str) -> HeProviderError {
    HeProviderError::Parse(format!("missing {anchor}"))
}
