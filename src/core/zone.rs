use std::fmt;

/// A zone hosted on the provider account. `name` is always lower-case.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Zone {
    pub id: u64,
    pub name: String,
}

impl Zone {
    pub fn new(id: u64, name: &str) -> Self {
        Zone {
            id,
            name: name.trim().to_lowercase(),
        }
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Zone:{} {}>", self.id, self.name)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct ZoneMatch<'a> {
    pub zone: &'a Zone,
    /// Leftmost labels removed from the requested domain before the match.
    pub labels_stripped: usize,
}

/// Finds the zone hosting `domain` by dropping leftmost labels until a zone
/// name matches. Candidates without a `.` are never tried.
pub fn resolve_zone<'a>(domain: &str, zones: &'a [Zone]) -> Option<ZoneMatch<'a>> {
    let domain = domain.trim().trim_end_matches('.').to_lowercase();
    let mut candidate = domain.as_str();
    let mut labels_stripped = 0;

    while candidate.contains('.') {
        if let Some(zone) = zones.iter().find(|z| z.name.eq_ignore_ascii_case(candidate)) {
            return Some(ZoneMatch {
                zone,
                labels_stripped,
            });
        }
        // contains('.') guarantees the split
        candidate = candidate.split_once('.').map(|(_, rest)| rest)?;
        labels_stripped += 1;
    }

    None
}
