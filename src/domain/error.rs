use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppError {
    /// The uploaded sheet contained no data rows.
    EmptyInput,
    /// None of the canonical fields could be matched against the sheet headers.
    UnrecognizedSchedule,
    FileRead(String),
    RemoteService(String),
    Validation(String),
    /// The requested operation collides with one already running.
    Conflict(String),
    Config(String),
    Security(String),
    NotFound(String),
    Internal(String),
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::EmptyInput => write!(f, "The uploaded spreadsheet is empty"),
            AppError::UnrecognizedSchedule => write!(
                f,
                concat!(
                    "No recognizable columns found. The sheet must contain columns such as: ",
                    "DNI, IBAN, Dirección, Nombre, CUPS, Teléfono"
                )
            ),
            AppError::FileRead(msg) => write!(f, "File read error: {}", msg),
            AppError::RemoteService(msg) => write!(f, "Remote service error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Security(msg) => write!(f, "Security error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_conversion() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert_eq!(err, AppError::Io("gone".to_string()));
    }

    #[test]
    fn test_remote_service_message_is_carried() {
        let err = AppError::RemoteService("quota exceeded".to_string());
        assert!(err.to_string().contains("quota exceeded"));
    }
}
