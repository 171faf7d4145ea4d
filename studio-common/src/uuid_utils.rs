//! UUID utilities

use crate::{Error, Result};
use uuid::Uuid;

/// Generate a new UUIDv4
pub fn generate() -> Uuid {
    Uuid::new_v4()
}

/// Parse a UUID stored as TEXT
///
/// `column` is only used to make the error message point at the bad value.
pub fn parse_column(column: &str, value: &str) -> Result<Uuid> {
    Uuid::parse_str(value)
        .map_err(|e| Error::InvalidInput(format!("{} is not a valid UUID ({}): {}", column, value, e)))
}

/// Parse an optional UUID column (NULL stays `None`)
pub fn parse_optional_column(column: &str, value: Option<&str>) -> Result<Option<Uuid>> {
    value.map(|v| parse_column(column, v)).transpose()
}
