use chameleon_config::{
    ResponderConfig, DEFAULT_HASH_HEADER, DEFAULT_MARKER_VERB, DEFAULT_METHOD_HEADER,
    DEFAULT_SEED_PATH, DEFAULT_SEED_VERB,
};
use http::header::HeaderName;

use crate::errors::SettingsError;
use crate::registry::KeyStrategy;

/// `DispatcherSettings` holds the validated routing knobs: reserved verbs
/// (uppercased), the admin path, header names and hashing/keying choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherSettings {
    pub marker_verb: String,
    pub seed_path: String,
    pub seed_verb: String,
    pub hash_header: HeaderName,
    pub method_header: HeaderName,
    pub hash_includes_path: bool,
    pub keying: KeyStrategy,
}

impl Default for DispatcherSettings {
    fn default() -> Self {
        Self {
            marker_verb: DEFAULT_MARKER_VERB.into(),
            seed_path: DEFAULT_SEED_PATH.into(),
            seed_verb: DEFAULT_SEED_VERB.into(),
            hash_header: HeaderName::from_static(DEFAULT_HASH_HEADER),
            method_header: HeaderName::from_static(DEFAULT_METHOD_HEADER),
            hash_includes_path: false,
            keying: KeyStrategy::Path,
        }
    }
}

impl TryFrom<&ResponderConfig> for DispatcherSettings {
    type Error = SettingsError;

    fn try_from(config: &ResponderConfig) -> Result<Self, Self::Error> {
        Ok(Self {
            marker_verb: verb("routing.marker_verb", &config.routing.marker_verb)?,
            seed_verb: verb("routing.seed_verb", &config.routing.seed_verb)?,
            seed_path: seed_path(&config.routing.seed_path)?,
            hash_header: header_name(&config.hashing.header)?,
            method_header: header_name(&config.fixtures.method_header)?,
            hash_includes_path: config.hashing.include_path,
            keying: config.fixtures.keying.into(),
        })
    }
}

fn verb(field: &'static str, value: &str) -> Result<String, SettingsError> {
    let token = value.trim().to_ascii_uppercase();
    if token.is_empty() {
        return Err(SettingsError::EmptyValue(field));
    }
    Ok(token)
}

fn seed_path(value: &str) -> Result<String, SettingsError> {
    let path = value.trim();
    if path.is_empty() {
        return Err(SettingsError::EmptyValue("routing.seed_path"));
    }
    if path.starts_with('/') {
        Ok(path.to_string())
    } else {
        Ok(format!("/{path}"))
    }
}

fn header_name(value: &str) -> Result<HeaderName, SettingsError> {
    HeaderName::from_bytes(value.trim().as_bytes())
        .map_err(|err| SettingsError::InvalidHeaderName(value.to_string(), err))
}
