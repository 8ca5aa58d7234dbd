//! Canonical in-memory form of an inbound request.

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};

/// `NormalizedRequest` is what every responder works against: an uppercase
/// method token (any token, standard or not), the URI path without its query,
/// case-insensitive headers and the untouched body bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub method: String,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// -- Constructors

impl NormalizedRequest {
    /// Builds the normalized form from the transport's request head and the
    /// fully collected body.
    #[must_use]
    pub fn normalize(parts: &http::request::Parts, body: Bytes) -> Self {
        Self {
            method: normalize_method(parts.method.as_str()),
            path: normalize_path(parts.uri.path()),
            headers: parts.headers.clone(),
            body,
        }
    }

    #[must_use]
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: normalize_method(method),
            path: normalize_path(path),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn with_body<T: Into<Bytes>>(mut self, body: T) -> Self {
        self.body = body.into();
        self
    }
}

// -- Getters

impl NormalizedRequest {
    #[must_use]
    pub fn has_body(&self) -> bool {
        !self.body.is_empty()
    }

    /// Returns every value sent for `name` joined with `", "`, or `None`
    /// when the header is absent.
    #[must_use]
    pub fn header_value(&self, name: &HeaderName) -> Option<String> {
        let values: Vec<String> = self
            .headers
            .get_all(name)
            .iter()
            .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
            .collect();

        if values.is_empty() {
            return None;
        }
        Some(values.join(", "))
    }
}

fn normalize_method(method: &str) -> String {
    method.trim().to_ascii_uppercase()
}

fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        return String::from("/");
    }
    path.to_string()
}
