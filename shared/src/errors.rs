//! Shared error types for the bench-deploy workspace

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SharedError {
    #[error("Invalid configuration: {field} = {value}")]
    InvalidConfig { field: String, value: String },
}

impl SharedError {
    pub fn invalid(field: &str, value: impl ToString) -> Self {
        SharedError::InvalidConfig {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
