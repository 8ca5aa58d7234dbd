//! HTTP service double for exercising clients without a live backend.
//!
//! Requests are normalized, classified by the [`Dispatcher`] and answered by one of:
//! the status responder (`/418` → `I'M A TEAPOT`), the fixture registry (seeded
//! through `POST /_seed`, replayed with the `SEEDED` verb) or the JSON echo
//! responder, which tags replies with a stable request hash.

use std::sync::Arc;

use chameleon_config::ResponderConfig;

pub mod dispatcher;
pub mod echo;
pub mod errors;
pub mod hasher;
pub mod normalizer;
pub mod preload;
pub mod registry;
pub mod reply;
pub mod seed;
pub mod server;
pub mod settings;
pub mod status;
pub mod types;

pub use dispatcher::{Dispatcher, Route};
pub use errors::{PreloadError, ResponderError, ServerError, SettingsError, StartupError};
pub use hasher::{RequestHash, RequestHasher};
pub use normalizer::NormalizedRequest;
pub use registry::{Fixture, FixtureRegistry, FixtureTarget, KeyStrategy, SeedOutcome};
pub use reply::Reply;
pub use seed::{SeedEntry, SeedPayload};
pub use server::ResponderServer;
pub use settings::DispatcherSettings;

/// Builds the dispatcher described by `config`, with its registry preloaded
/// from `fixtures.preload` when one is configured.
pub fn dispatcher_from_config(config: &ResponderConfig) -> Result<Arc<Dispatcher>, StartupError> {
    let settings = DispatcherSettings::try_from(config)?;
    let dispatcher = Dispatcher::shared(settings);

    if let Some(path) = &config.fixtures.preload {
        preload::preload_fixtures(path, dispatcher.registry())?;
    }

    Ok(dispatcher)
}
