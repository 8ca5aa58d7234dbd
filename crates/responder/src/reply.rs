use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderValue};
use http::StatusCode;
use http_body_util::Full;

pub const TEXT_PLAIN: &str = "text/plain";
pub const APPLICATION_JSON: &str = "application/json";

/// `Reply` is the transport-neutral outcome of dispatching one request:
/// the status, headers and body the transport writes back.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

// -- Constructors

impl Reply {
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    #[must_use]
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status, HeaderMap::new(), Bytes::new())
    }

    #[must_use]
    pub fn text<T: Into<Bytes>>(status: StatusCode, body: T) -> Self {
        Self::with_content_type(status, TEXT_PLAIN, body.into())
    }

    #[must_use]
    pub fn json<T: Into<Bytes>>(status: StatusCode, body: T) -> Self {
        Self::with_content_type(status, APPLICATION_JSON, body.into())
    }

    fn with_content_type(status: StatusCode, content_type: &'static str, body: Bytes) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        Self::new(status, headers, body)
    }
}

// -- Getters

impl Reply {
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
    }

    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

// -- Rendering

impl Reply {
    /// Converts into a hyper response. Framing headers are dropped since hyper
    /// derives them from the body it actually writes.
    #[must_use]
    pub fn into_response(self) -> hyper::Response<Full<Bytes>> {
        let mut headers = self.headers;
        headers.remove(header::CONTENT_LENGTH);
        headers.remove(header::TRANSFER_ENCODING);

        let mut response = hyper::Response::new(Full::new(self.body));
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_replies_are_plain_text() {
        let reply = Reply::text(StatusCode::OK, "OK");
        assert_eq!(reply.content_type(), Some(TEXT_PLAIN));
        assert_eq!(reply.body_str(), Some("OK"));
    }

    #[test]
    fn rendering_drops_framing_headers_only() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from_static("999"));
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
        headers.insert("x-fixture", HeaderValue::from_static("yes"));

        let status = StatusCode::from_u16(942).expect("942 is a valid code");
        let response = Reply::new(status, headers, Bytes::from_static(b"{}")).into_response();

        assert_eq!(response.status().as_u16(), 942);
        assert!(response.headers().get(header::CONTENT_LENGTH).is_none());
        assert_eq!(response.headers()["content-type"], APPLICATION_JSON);
        assert_eq!(response.headers()["x-fixture"], "yes");
    }
}
