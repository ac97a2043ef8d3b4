use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    UnsupportedTable,
    InvalidCodonFormat,
    InvalidNucleotideSet,
    EmptyTarget,
    UnknownAminoAcid,
    InvalidInput,
    Io,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AntError {
    pub code: ErrorCode,
    pub message: String,
}

impl AntError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for AntError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

impl Error for AntError {}

impl From<std::io::Error> for AntError {
    fn from(err: std::io::Error) -> Self {
        AntError::new(ErrorCode::Io, err.to_string())
    }
}

impl From<serde_json::Error> for AntError {
    fn from(err: serde_json::Error) -> Self {
        AntError::new(ErrorCode::InvalidInput, err.to_string())
    }
}

impl From<csv::Error> for AntError {
    fn from(err: csv::Error) -> Self {
        AntError::new(ErrorCode::Internal, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_code() {
        let err = AntError::new(ErrorCode::UnsupportedTable, "Genetic code 999 is not supported");
        assert_eq!(
            err.to_string(),
            "UnsupportedTable: Genetic code 999 is not supported"
        );
    }

    #[test]
    fn test_from_serde_json() {
        let err: AntError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert_eq!(err.code, ErrorCode::InvalidInput);
    }
}
