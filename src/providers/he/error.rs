use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeProviderError {
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected page layout: {0}")]
    Parse(String),

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("{0}")]
    Rejected(String),
}

use crate::error::Error;

pub fn map_error(e: HeProviderError) -> Error {
    use HeProviderError::*;
    match e {
        Transport(err) => Error::TransportError(err.to_string()),
        Parse(msg) => Error::ParseError(msg),
        NotAuthenticated => Error::NotAuthenticated,
        Credential(msg) => Error::CredentialError(msg),
        InvalidInput(msg) => Error::InvalidInput(msg),
        Rejected(msg) => Error::ProviderRejected(msg),
    }
}
