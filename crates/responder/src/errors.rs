use derive_more::From;
use http::header::{InvalidHeaderName, InvalidHeaderValue};
use http::StatusCode;

use crate::reply::Reply;
use crate::types::BoxedError;

// -- Request errors

/// `ResponderError` covers everything that can go wrong while resolving a
/// single request. Each variant maps onto an HTTP outcome via [`ResponderError::status`],
/// none of them are fatal to the process.
#[derive(Debug, From)]
pub enum ResponderError {
    #[from(ignore)]
    MalformedSeed(serde_json::Error),

    #[from(ignore)]
    InvalidSeed(String),

    #[from(ignore)]
    InvalidJsonBody(serde_json::Error),

    #[from(ignore)]
    FixtureNotFound(String),

    #[from(ignore)]
    EncodingFailed(serde_json::Error),

    InvalidHashHeader(InvalidHeaderValue),
}

impl std::error::Error for ResponderError {}

impl core::fmt::Display for ResponderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl ResponderError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::MalformedSeed(_) | Self::InvalidSeed(_) | Self::InvalidJsonBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::FixtureNotFound(_) => StatusCode::NOT_FOUND,
            Self::EncodingFailed(_) | Self::InvalidHashHeader(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            Self::MalformedSeed(err) => format!("MALFORMED SEED PAYLOAD: {err}"),
            Self::InvalidSeed(reason) => format!("INVALID SEED PAYLOAD: {reason}"),
            Self::InvalidJsonBody(err) => format!("INVALID JSON BODY: {err}"),
            Self::FixtureNotFound(_) => "NOT FOUND".into(),
            Self::EncodingFailed(_) | Self::InvalidHashHeader(_) => {
                "INTERNAL SERVER ERROR".into()
            }
        }
    }

    /// Renders the error as a plain text reply.
    #[must_use]
    pub fn into_reply(self) -> Reply {
        Reply::text(self.status(), self.message())
    }
}

// -- Settings errors

#[derive(Debug, From)]
pub enum SettingsError {
    #[from(ignore)]
    EmptyValue(&'static str),

    #[from(ignore)]
    InvalidHeaderName(String, InvalidHeaderName),
}

impl std::error::Error for SettingsError {}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

// -- Preload errors

#[derive(Debug, From)]
pub enum PreloadError {
    IOError(std::io::Error),

    Malformed(serde_json::Error),

    #[from(ignore)]
    InvalidEntry(usize, ResponderError),
}

impl std::error::Error for PreloadError {}

impl core::fmt::Display for PreloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

// -- Startup errors

#[derive(Debug, From)]
pub enum StartupError {
    Settings(SettingsError),
    Preload(PreloadError),
}

impl std::error::Error for StartupError {}

impl core::fmt::Display for StartupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

// -- Server errors

#[derive(Debug, From)]
pub enum ServerError {
    #[from(ignore)]
    BindFailed(String, std::io::Error),

    IOError(std::io::Error),

    FailedStreaming(BoxedError),
}

impl std::error::Error for ServerError {}

impl core::fmt::Display for ServerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}
