// Error types for routing table acquisition and parsing

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("can't parse route table")]
    CantParse,

    #[error("invalid row {row:?} in route file")]
    InvalidRow { row: String },

    #[error("not implemented for OS: {os}")]
    NotImplemented { os: String },

    #[error("invalid address family tag: {0}")]
    InvalidAddressFamily(u8),

    #[error("default route gateway {gateway:?} is not an IP address")]
    InvalidGateway { gateway: String },

    #[error("Failed to execute command: {0}")]
    CommandExecution(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using GatewayError
pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    pub(crate) fn invalid_row(row: &str) -> Self {
        GatewayError::InvalidRow {
            row: row.to_string(),
        }
    }

    pub(crate) fn not_implemented() -> Self {
        GatewayError::NotImplemented {
            os: std::env::consts::OS.to_string(),
        }
    }

    /// Convert error to user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::CantParse => {
                "The routing table output was not recognised.".to_string()
            }
            GatewayError::InvalidRow { row } => {
                format!("The routing table contains a malformed row: {:?}", row)
            }
            GatewayError::NotImplemented { os } => {
                format!("Reading the routing table is not supported on {}.", os)
            }
            GatewayError::InvalidAddressFamily(tag) => {
                format!("Unknown address family {}. This might be a bug, please report it.", tag)
            }
            GatewayError::InvalidGateway { gateway } => {
                format!("A default route points at {:?}, which is not an IP address.", gateway)
            }
            GatewayError::CommandExecution(cmd) => {
                format!("Failed to execute command. Make sure {} is installed.", cmd)
            }
            GatewayError::Io(_) => {
                "File system error. Check that the routing table is readable.".to_string()
            }
        }
    }

    /// True when the error came from malformed table contents rather than I/O
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            GatewayError::CantParse | GatewayError::InvalidRow { .. }
        )
    }
}
