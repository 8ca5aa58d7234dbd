use derive_more::From;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, From)]
pub enum SubscriberError {
    #[from(ignore)]
    UnknownLevel(String),

    AlreadyInstalled(tracing::subscriber::SetGlobalDefaultError),
}

impl std::error::Error for SubscriberError {}

impl core::fmt::Display for SubscriberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// `parse_level` maps the textual levels used in config files and flags
/// (`trace`, `debug`, `info`, `warn`, `error`) to a [`Level`].
pub fn parse_level(value: &str) -> Result<Level, SubscriberError> {
    value
        .trim()
        .parse::<Level>()
        .map_err(|_| SubscriberError::UnknownLevel(value.to_string()))
}

/// `setup` installs a fmt subscriber capped at `level` as the process wide default.
/// It can only succeed once per process.
pub fn setup(level: Level) -> Result<(), SubscriberError> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
