//! # Errors
//!
//! Every failure an upload can hit, on either side of the wire:
//! - `PermissionDenied` never reaches the upload core; pickers map it to "no assets"
//! - `Transport` / `HttpStatus` are client-side and end up in an outcome string
//! - `Decode` is server-side and ends up in a 500 JSON body
//! - `Encode` covers asset content that could not be read before sending

use thiserror::Error;

/// Result type for parcel operations
pub type ParcelResult<T> = Result<T, ParcelError>;

#[derive(Error, Debug)]
pub enum ParcelError {
    #[error("Permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("{message}")]
    Transport { message: String },

    #[error("HTTP error! status: {status}")]
    HttpStatus { status: u16 },

    #[error("{message}")]
    Decode { message: String },

    #[error("{message}")]
    Encode { message: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
}

impl ParcelError {
    pub fn permission_denied<S: Into<String>>(message: S) -> Self {
        Self::PermissionDenied {
            message: message.into(),
        }
    }

    /// Wrap any transport-level error (connect, send, read body)
    pub fn transport<E>(error: E) -> Self
    where
        E: std::fmt::Display,
    {
        Self::Transport {
            message: error.to_string(),
        }
    }

    pub fn http_status(status: u16) -> Self {
        Self::HttpStatus { status }
    }

    pub fn decode<S: Into<String>>(message: S) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn encode<S: Into<String>>(message: S) -> Self {
        Self::Encode {
            message: message.into(),
        }
    }

    /// True when the received body itself was at fault.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
