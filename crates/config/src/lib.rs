use derive_more::derive::From;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Why a responder config file could not be turned into a [`ResponderConfig`].
#[derive(Debug, From)]
pub enum ConfigError {
    /// The path does not name a regular file.
    #[from(ignore)]
    InvalidPath(PathBuf),

    ReadFailed(std::io::Error),

    /// Malformed TOML, or a value of the wrong type such as an unknown `fixtures.keying`.
    DeserializationFailed(toml::de::Error),
}

impl std::error::Error for ConfigError {}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

pub const DEFAULT_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 6005;
pub const DEFAULT_MARKER_VERB: &str = "SEEDED";
pub const DEFAULT_SEED_PATH: &str = "/_seed";
pub const DEFAULT_SEED_VERB: &str = "POST";
pub const DEFAULT_HASH_HEADER: &str = "chameleon-request-hash";
pub const DEFAULT_METHOD_HEADER: &str = "chameleon-seeded-method";
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Where the responder listens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub addr: String,
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.into(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSection {
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }
}

/// The reserved verbs and paths the dispatcher routes on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingSection {
    pub marker_verb: String,
    pub seed_path: String,
    pub seed_verb: String,
}

impl Default for RoutingSection {
    fn default() -> Self {
        Self {
            marker_verb: DEFAULT_MARKER_VERB.into(),
            seed_path: DEFAULT_SEED_PATH.into(),
            seed_verb: DEFAULT_SEED_VERB.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashingSection {
    pub header: String,
    pub include_path: bool,
}

impl Default for HashingSection {
    fn default() -> Self {
        Self {
            header: DEFAULT_HASH_HEADER.into(),
            include_path: false,
        }
    }
}

/// `FixtureKeying` selects how seeded fixtures are indexed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureKeying {
    #[default]
    Path,
    PathAndMethod,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixturesSection {
    pub keying: FixtureKeying,
    pub method_header: String,
    pub preload: Option<PathBuf>,
}

impl Default for FixturesSection {
    fn default() -> Self {
        Self {
            keying: FixtureKeying::default(),
            method_header: DEFAULT_METHOD_HEADER.into(),
            preload: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.into(),
        }
    }
}

/// `ResponderConfig` is the full configuration file, every section optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponderConfig {
    pub server: ServerSection,
    pub routing: RoutingSection,
    pub hashing: HashingSection,
    pub fixtures: FixturesSection,
    pub logging: LoggingSection,
}

impl ResponderConfig {
    /// `load` reads a [`ResponderConfig`] from a TOML file, resolving a relative
    /// `fixtures.preload` path against the directory holding the config file.
    /// A path that is not a regular file is reported as [`ConfigError::InvalidPath`].
    pub fn load<V: Into<PathBuf>>(target: V) -> ConfigResult<Self> {
        let target_path: PathBuf = target.into();
        if !target_path.is_file() {
            return Err(ConfigError::InvalidPath(target_path));
        }

        let mut config = Self::from_toml_str(&std::fs::read_to_string(&target_path)?)?;

        if let Some(preload) = config.fixtures.preload.take() {
            let resolved = match target_path.parent() {
                Some(parent) if preload.is_relative() => parent.join(preload),
                _ => preload,
            };
            config.fixtures.preload = Some(resolved);
        }

        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(content)?)
    }
}
