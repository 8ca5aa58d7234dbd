//! Stable identifying hashes for requests.
//!
//! The digest covers the method and the body, and the path when
//! [`RequestHasher::include_path`] is set. Fields are separated by a NUL byte so
//! `("GE", "T{}")` and `("GET", "{}")` never collide:
//!
//! ```text
//! sha1( METHOD 0x00 [PATH 0x00] BODY )  -> 40 lowercase hex chars
//! ```

use http::header::{HeaderName, HeaderValue, InvalidHeaderValue};
use sha1::{Digest, Sha1};

use crate::normalizer::NormalizedRequest;

const FIELD_SEPARATOR: [u8; 1] = [0x00];

/// `RequestHash` is either the digest computed from the request or the
/// value a caller supplied in the hash header, which always wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestHash {
    Computed(String),
    Override(HeaderValue),
}

impl RequestHash {
    pub fn to_header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        match self {
            Self::Computed(digest) => HeaderValue::from_str(digest),
            Self::Override(value) => Ok(value.clone()),
        }
    }
}

impl core::fmt::Display for RequestHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Computed(digest) => write!(f, "{digest}"),
            Self::Override(value) => write!(f, "{}", String::from_utf8_lossy(value.as_bytes())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestHasher {
    pub include_path: bool,
}

impl RequestHasher {
    #[must_use]
    pub fn new(include_path: bool) -> Self {
        Self { include_path }
    }

    /// Pure digest of the request's relevant fields.
    #[must_use]
    pub fn compute(&self, request: &NormalizedRequest) -> String {
        let mut hasher = Sha1::new();
        hasher.update(request.method.as_bytes());
        hasher.update(FIELD_SEPARATOR);
        if self.include_path {
            hasher.update(request.path.as_bytes());
            hasher.update(FIELD_SEPARATOR);
        }
        hasher.update(&request.body);
        format!("{:x}", hasher.finalize())
    }

    /// Uses the caller's value from `override_header` when present, untouched
    /// and unvalidated; otherwise computes the digest.
    #[must_use]
    pub fn resolve(&self, request: &NormalizedRequest, override_header: &HeaderName) -> RequestHash {
        match request.headers.get(override_header) {
            Some(value) => RequestHash::Override(value.clone()),
            None => RequestHash::Computed(self.compute(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> HeaderName {
        HeaderName::from_static("chameleon-request-hash")
    }

    fn post(path: &str, body: &'static str) -> NormalizedRequest {
        NormalizedRequest::new("POST", path).with_body(body)
    }

    #[test]
    fn identical_method_and_body_hash_identically() {
        let hasher = RequestHasher::default();
        let first = hasher.compute(&post("/post", r#"{"foo":"bar"}"#));
        let second = hasher.compute(&post("/post", r#"{"foo":"bar"}"#));
        assert_eq!(first, second);
        assert_eq!(first.len(), 40);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn differing_bodies_or_methods_hash_differently() {
        let hasher = RequestHasher::default();
        let base = hasher.compute(&post("/post", r#"{"foo":"bar"}"#));

        assert_ne!(base, hasher.compute(&post("/post", r#"{"foo":"baz"}"#)));
        assert_ne!(
            base,
            hasher.compute(&NormalizedRequest::new("PUT", "/post").with_body(r#"{"foo":"bar"}"#))
        );
    }

    #[test]
    fn separator_keeps_field_boundaries() {
        let hasher = RequestHasher::default();
        let shifted = NormalizedRequest::new("GE", "/").with_body("T{}");
        let plain = NormalizedRequest::new("GET", "/").with_body("{}");
        assert_ne!(hasher.compute(&shifted), hasher.compute(&plain));
    }

    #[test]
    fn path_only_counts_when_enabled() {
        let without_path = RequestHasher::new(false);
        let with_path = RequestHasher::new(true);

        let a = post("/a", "{}");
        let b = post("/b", "{}");

        assert_eq!(without_path.compute(&a), without_path.compute(&b));
        assert_ne!(with_path.compute(&a), with_path.compute(&b));
    }

    #[test]
    fn override_header_is_authoritative_and_verbatim() {
        let hasher = RequestHasher::default();
        let request = post("/post", r#"{"foo":"bar"}"#)
            .with_header(header(), HeaderValue::from_static("foo_bar_hash"));

        let resolved = hasher.resolve(&request, &header());
        assert!(matches!(resolved, RequestHash::Override(_)));
        assert_eq!(
            resolved.to_header_value().expect("override is a header value"),
            "foo_bar_hash"
        );
    }

    #[test]
    fn computed_hash_used_without_override() {
        let hasher = RequestHasher::default();
        let request = post("/post", r#"{"foo":"bar"}"#);

        let resolved = hasher.resolve(&request, &header());
        assert_eq!(resolved, RequestHash::Computed(hasher.compute(&request)));
        assert_eq!(resolved.to_string(), hasher.compute(&request));
    }
}
