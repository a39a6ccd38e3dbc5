use std::fmt;

#[allow(clippy::enum_variant_names)]
#[derive(Debug)]
pub enum Error {
    TransportError(String),
    ParseError(String),
    NotAuthenticated,
    AuthenticationError(String),
    ZoneNotFound(String),
    ProviderRejected(String),
    CredentialError(String),
    InvalidInput(String),
    ChallengeFailed {
        action: &'static str,
        domain: String,
        record: String,
        source: Box<Error>,
    },
}

impl Error {
    /// Innermost error, looking through any challenge wrappers.
    pub fn root_cause(&self) -> &Error {
        match self {
            Error::ChallengeFailed { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ChallengeFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::TransportError(msg) => write!(f, "Transport error: {msg}"),
            Error::ParseError(msg) => write!(f, "Unexpected page layout: {msg}"),
            Error::NotAuthenticated => write!(f, "Not logged in"),
            Error::AuthenticationError(msg) => write!(f, "Authentication failed: {msg}"),
            Error::ZoneNotFound(domain) => write!(f, "Unable to find zone for domain: {domain}"),
            Error::ProviderRejected(msg) => write!(f, "Provider rejected request: {msg}"),
            Error::CredentialError(msg) => write!(f, "Credential error: {msg}"),
            Error::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Error::ChallengeFailed {
                action,
                domain,
                record,
                source,
            } => write!(f, "Unable to {action} TXT {record} for {domain}: {source}"),
        }
    }
}
