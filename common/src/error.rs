use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Nenhum dado JSON recebido")]
    NoPayload,

    #[error("Dados incompletos. Faltando campos.")]
    MissingFields,

    #[error("Field '{field}' could not be converted to {target}: {value}")]
    Coercion {
        field: &'static str,
        target: &'static str,
        value: String,
    },

    #[error("Database error: {0}")]
    DbError(String),

    #[error("Store write timed out after {0:?}")]
    Timeout(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl Error {
    /// True for errors caused by the request itself rather than by processing it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::NoPayload | Error::MissingFields)
    }
}
