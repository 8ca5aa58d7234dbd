//! Per-request routing.
//!
//! Every request is classified into a [`Route`] in a fixed order, first match wins:
//!
//! 1. a single numeric path segment (`/418`) goes to the status responder;
//! 2. the marker verb replays the fixture seeded for the path;
//! 3. the seed verb on the seed path registers a fixture;
//! 4. any other request carrying a body is echoed as JSON;
//! 5. everything else gets an empty `200`.
//!
//! Verbs are compared as opaque uppercase tokens, so custom methods route like
//! any standard one. The dispatcher keeps no state between requests besides
//! the registry it was given.

use std::sync::Arc;

use http::StatusCode;

use crate::echo;
use crate::errors::ResponderError;
use crate::hasher::RequestHasher;
use crate::normalizer::NormalizedRequest;
use crate::registry::{FixtureRegistry, FixtureTarget, SeedOutcome};
use crate::reply::Reply;
use crate::seed::SeedPayload;
use crate::settings::DispatcherSettings;
use crate::status;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Status(String),
    Retrieve,
    Seed,
    Echo,
    Empty,
}

#[derive(Debug)]
pub struct Dispatcher {
    settings: DispatcherSettings,
    hasher: RequestHasher,
    registry: Arc<FixtureRegistry>,
}

// -- Constructors

impl Dispatcher {
    /// `registry` must use the keying strategy named in `settings`; use
    /// [`Dispatcher::with_settings`] to have one created.
    #[must_use]
    pub fn new(settings: DispatcherSettings, registry: Arc<FixtureRegistry>) -> Self {
        let hasher = RequestHasher::new(settings.hash_includes_path);
        Self {
            settings,
            hasher,
            registry,
        }
    }

    #[must_use]
    pub fn with_settings(settings: DispatcherSettings) -> Self {
        let registry = FixtureRegistry::shared(settings.keying);
        Self::new(settings, registry)
    }

    #[must_use]
    pub fn shared(settings: DispatcherSettings) -> Arc<Self> {
        Arc::new(Self::with_settings(settings))
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::with_settings(DispatcherSettings::default())
    }
}

// -- Getters

impl Dispatcher {
    #[must_use]
    pub fn registry(&self) -> &Arc<FixtureRegistry> {
        &self.registry
    }

    #[must_use]
    pub fn settings(&self) -> &DispatcherSettings {
        &self.settings
    }
}

// -- Routing

impl Dispatcher {
    #[must_use]
    pub fn classify(&self, request: &NormalizedRequest) -> Route {
        if let Some(digits) = status::numeric_segment(&request.path) {
            return Route::Status(digits.to_string());
        }

        if request.method == self.settings.marker_verb {
            return Route::Retrieve;
        }

        if request.path == self.settings.seed_path && request.method == self.settings.seed_verb {
            return Route::Seed;
        }

        if request.has_body() {
            return Route::Echo;
        }

        Route::Empty
    }

    /// Resolves `request` into the reply to send. Failures come back as
    /// error replies and never escape.
    #[must_use]
    pub fn dispatch(&self, request: NormalizedRequest) -> Reply {
        let route = self.classify(&request);
        chameleon_trace::debug!(
            "Dispatching {} {} as {:?}",
            request.method,
            request.path,
            route
        );

        match self.resolve(&route, &request) {
            Ok(reply) => reply,
            Err(err) => {
                chameleon_trace::warn!(
                    "Request {} {} failed on route {:?}: {}",
                    request.method,
                    request.path,
                    route,
                    err
                );
                err.into_reply()
            }
        }
    }

    fn resolve(&self, route: &Route, request: &NormalizedRequest) -> Result<Reply, ResponderError> {
        match route {
            Route::Status(digits) => Ok(status::respond(digits)),
            Route::Retrieve => self.retrieve(request),
            Route::Seed => self.seed(request),
            Route::Echo => {
                let hash = self.hasher.resolve(request, &self.settings.hash_header);
                echo::echo(request, &hash, &self.settings.hash_header)
            }
            Route::Empty => Ok(Reply::empty(StatusCode::OK)),
        }
    }

    fn retrieve(&self, request: &NormalizedRequest) -> Result<Reply, ResponderError> {
        let method = request.header_value(&self.settings.method_header);
        let target = FixtureTarget::with_method(&request.path, method.as_deref());

        match self.registry.lookup(&target) {
            Some(fixture) => {
                chameleon_trace::info!(
                    "Replaying fixture for {} with status {}",
                    request.path,
                    fixture.status.as_u16()
                );
                Ok(Reply::new(
                    fixture.status,
                    fixture.headers.clone(),
                    fixture.body.clone(),
                ))
            }
            None => Err(ResponderError::FixtureNotFound(request.path.clone())),
        }
    }

    fn seed(&self, request: &NormalizedRequest) -> Result<Reply, ResponderError> {
        let entry = SeedPayload::from_slice(&request.body)?.into_entry()?;
        let outcome = self.registry.seed(&entry.target(), entry.fixture.clone());

        chameleon_trace::info!(
            "Seeded fixture for {} (method: {:?}) with status {}: {:?}",
            entry.path,
            entry.method,
            entry.fixture.status.as_u16(),
            outcome
        );

        Ok(match outcome {
            SeedOutcome::Created => Reply::empty(StatusCode::CREATED),
            SeedOutcome::Replaced => Reply::empty(StatusCode::OK),
        })
    }
}
