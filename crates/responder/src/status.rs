use std::borrow::Cow;

use http::StatusCode;

use crate::reply::Reply;

pub const UNKNOWN_REASON: &str = "UNKNOWN";

/// Registered codes the `http` crate has no canonical reason for.
fn supplementary_reason(code: u16) -> Option<&'static str> {
    match code {
        103 => Some("EARLY HINTS"),
        425 => Some("TOO EARLY"),
        _ => None,
    }
}

/// `reason_phrase` returns the canonical uppercase reason text for `code`,
/// e.g. `418` gives `I'M A TEAPOT`. Unregistered codes give [`UNKNOWN_REASON`].
#[must_use]
pub fn reason_phrase(code: u16) -> Cow<'static, str> {
    if let Some(reason) = supplementary_reason(code) {
        return Cow::Borrowed(reason);
    }

    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map_or(Cow::Borrowed(UNKNOWN_REASON), |reason| {
            Cow::Owned(reason.to_ascii_uppercase())
        })
}

/// Returns the digits of a path made of exactly one numeric segment,
/// such as `/418`.
#[must_use]
pub fn numeric_segment(path: &str) -> Option<&str> {
    let segment = path.strip_prefix('/')?;
    if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
        return Some(segment);
    }
    None
}

/// Serves the reason phrase for the code spelled by `digits`. Values that do
/// not fit a status code still answer, with the placeholder phrase.
#[must_use]
pub fn respond(digits: &str) -> Reply {
    let phrase = digits
        .parse::<u16>()
        .map_or(Cow::Borrowed(UNKNOWN_REASON), reason_phrase);
    Reply::text(StatusCode::OK, phrase.into_owned())
}
