//! Domain errors raised by the deposit and lookup operations

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Missing or malformed input supplied by the caller.
    #[error("{0}")]
    Validation(String),
    /// The referenced fund is not part of the catalog.
    #[error("{0}")]
    NotFound(String),
}

impl Error {
    pub fn missing_fields() -> Self {
        Error::Validation("missing required fields".to_string())
    }

    pub fn fund_not_found(fund_id: &str) -> Self {
        Error::NotFound(format!("fund not found: {fund_id}"))
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
