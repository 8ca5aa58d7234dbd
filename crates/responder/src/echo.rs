use http::header::HeaderName;
use http::StatusCode;
use serde_json::{Map, Value};

use crate::errors::ResponderError;
use crate::hasher::RequestHash;
use crate::normalizer::NormalizedRequest;
use crate::reply::Reply;

/// Field of the envelope carrying the parsed request body.
pub const ECHO_FIELD: &str = "json";

/// `echo` parses the request body as JSON and returns it wrapped as
/// `{"json": <body>}`, tagged with the resolved request hash. Nothing is
/// echoed when the body is not valid JSON.
pub fn echo(
    request: &NormalizedRequest,
    hash: &RequestHash,
    hash_header: &HeaderName,
) -> Result<Reply, ResponderError> {
    let parsed: Value =
        serde_json::from_slice(&request.body).map_err(ResponderError::InvalidJsonBody)?;

    let mut envelope = Map::new();
    envelope.insert(ECHO_FIELD.to_string(), parsed);

    let encoded =
        serde_json::to_vec(&Value::Object(envelope)).map_err(ResponderError::EncodingFailed)?;

    let mut reply = Reply::json(StatusCode::OK, encoded);
    reply
        .headers
        .insert(hash_header.clone(), hash.to_header_value()?);
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::RequestHasher;
    use crate::reply::APPLICATION_JSON;
    use http::header::HeaderValue;

    fn hash_header() -> HeaderName {
        HeaderName::from_static("chameleon-request-hash")
    }

    #[test]
    fn wraps_body_in_json_envelope() {
        let request = NormalizedRequest::new("POST", "/post").with_body(r#"{"foo":"bar"}"#);
        let hash = RequestHasher::default().resolve(&request, &hash_header());

        let reply = echo(&request, &hash, &hash_header()).expect("should echo");

        assert_eq!(reply.status, StatusCode::OK);
        assert_eq!(reply.content_type(), Some(APPLICATION_JSON));
        assert_eq!(reply.body_str(), Some(r#"{"json":{"foo":"bar"}}"#));
        assert_eq!(
            reply.headers[hash_header()],
            RequestHasher::default().compute(&request)
        );
    }

    #[test]
    fn custom_verbs_echo_too() {
        let request = NormalizedRequest::new("REQUESTHASH", "/post").with_body(r#"[1, 2, 3]"#);
        let hash = RequestHasher::default().resolve(&request, &hash_header());

        let reply = echo(&request, &hash, &hash_header()).expect("should echo");
        assert_eq!(reply.body_str(), Some(r#"{"json":[1,2,3]}"#));
    }

    #[test]
    fn key_order_of_the_body_is_kept() {
        let request = NormalizedRequest::new("PUT", "/put").with_body(r#"{"spam":"eggs","a":1}"#);
        let hash = RequestHasher::default().resolve(&request, &hash_header());

        let reply = echo(&request, &hash, &hash_header()).expect("should echo");
        assert_eq!(reply.body_str(), Some(r#"{"json":{"spam":"eggs","a":1}}"#));
    }

    #[test]
    fn override_hash_is_echoed_unchanged() {
        let request = NormalizedRequest::new("POST", "/post")
            .with_body(r#"{"foo":"bar"}"#)
            .with_header(hash_header(), HeaderValue::from_static("foo_bar_hash"));
        let hash = RequestHasher::default().resolve(&request, &hash_header());

        let reply = echo(&request, &hash, &hash_header()).expect("should echo");
        assert_eq!(reply.headers[hash_header()], "foo_bar_hash");
    }

    #[test]
    fn invalid_json_is_a_client_error() {
        let request = NormalizedRequest::new("PATCH", "/patch").with_body("{not json");
        let hash = RequestHasher::default().resolve(&request, &hash_header());

        let err = echo(&request, &hash, &hash_header()).expect_err("should reject");
        assert!(matches!(err, ResponderError::InvalidJsonBody(_)));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
