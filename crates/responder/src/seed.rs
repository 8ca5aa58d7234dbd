//! Decoding and validation of seed payloads.
//!
//! ```json
//! {
//!   "Request":  { "URL": "/encoding/utf8", "Method": "GET", "Body": "" },
//!   "Response": { "StatusCode": 942, "Body": "{\"key\": \"value\"}",
//!                 "Headers": { "Content-Type": "application/json" } }
//! }
//! ```
//!
//! Only `Request.URL` is required. Validation happens here so a fixture that
//! made it into the registry can always be replayed.

use std::collections::BTreeMap;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{StatusCode, Uri};
use serde::{Deserialize, Serialize};

use crate::errors::ResponderError;
use crate::registry::{Fixture, FixtureTarget};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedPayload {
    pub request: SeedRequest,
    #[serde(default)]
    pub response: SeedResponse,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedRequest {
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedResponse {
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_status_code() -> u16 {
    200
}

impl Default for SeedResponse {
    fn default() -> Self {
        Self {
            status_code: default_status_code(),
            body: String::new(),
            headers: BTreeMap::new(),
        }
    }
}

/// `SeedEntry` is a validated payload: where the fixture goes and what it is.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedEntry {
    pub path: String,
    pub method: Option<String>,
    pub fixture: Fixture,
}

impl SeedEntry {
    #[must_use]
    pub fn target(&self) -> FixtureTarget<'_> {
        FixtureTarget::with_method(&self.path, self.method.as_deref())
    }
}

impl SeedPayload {
    pub fn from_slice(raw: &[u8]) -> Result<Self, ResponderError> {
        serde_json::from_slice(raw).map_err(ResponderError::MalformedSeed)
    }

    pub fn into_entry(self) -> Result<SeedEntry, ResponderError> {
        let path = fixture_path(&self.request.url)?;

        let status = fixture_status(self.response.status_code)?;
        if !self.response.body.is_empty() && !carries_body(status) {
            return Err(ResponderError::InvalidSeed(format!(
                "status code {} cannot carry a body",
                status.as_u16()
            )));
        }

        let mut headers = HeaderMap::new();
        for (name, value) in &self.response.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                ResponderError::InvalidSeed(format!("invalid header name {name:?}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|_| {
                ResponderError::InvalidSeed(format!("invalid value for header {name:?}"))
            })?;
            headers.insert(header_name, header_value);
        }

        let method = self
            .request
            .method
            .map(|method| method.trim().to_ascii_uppercase())
            .filter(|method| !method.is_empty());

        Ok(SeedEntry {
            path,
            method,
            fixture: Fixture {
                status,
                headers,
                body: Bytes::from(self.response.body),
            },
        })
    }
}

/// Fixtures must be replayable as a final response, so informational codes
/// are refused along with anything outside `100..=999`.
fn fixture_status(code: u16) -> Result<StatusCode, ResponderError> {
    let status = StatusCode::from_u16(code).map_err(|_| {
        ResponderError::InvalidSeed(format!("status code {code} is outside 100..=999"))
    })?;

    if status.is_informational() {
        return Err(ResponderError::InvalidSeed(format!(
            "status code {code} is informational and cannot be replayed"
        )));
    }
    Ok(status)
}

fn carries_body(status: StatusCode) -> bool {
    status != StatusCode::NO_CONTENT && status != StatusCode::NOT_MODIFIED
}

/// Reduces the seeded URL to the path requests are matched on. Absolute
/// URLs keep only their path; queries are dropped.
fn fixture_path(url: &str) -> Result<String, ResponderError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ResponderError::InvalidSeed("Request.URL is empty".into()));
    }

    let uri: Uri = trimmed
        .parse()
        .map_err(|_| ResponderError::InvalidSeed(format!("invalid Request.URL {trimmed:?}")))?;

    if uri.scheme().is_none() && !trimmed.starts_with('/') {
        return Err(ResponderError::InvalidSeed(format!(
            "Request.URL {trimmed:?} must be a path or an absolute URL"
        )));
    }

    match uri.path() {
        "" => Ok(String::from("/")),
        path => Ok(path.to_string()),
    }
}
