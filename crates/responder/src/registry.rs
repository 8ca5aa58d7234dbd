//! Process-wide store of seeded fixtures.
//!
//! The registry is the only shared mutable state in the responder. It is owned
//! explicitly (usually behind an `Arc`) and handed to the dispatcher. Fixtures are
//! swapped in as whole `Arc`s under a write lock, so a reader either sees the
//! previous fixture or the new one, never a mix.
//!
//! How fixtures are indexed is a [`KeyStrategy`] private to the registry: callers
//! describe what they seed or look up with a [`FixtureTarget`] and never build
//! keys themselves.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use chameleon_config::FixtureKeying;
use http::{HeaderMap, StatusCode};

/// A canned response registered ahead of time.
#[derive(Debug, Clone, PartialEq)]
pub struct Fixture {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

/// `FixtureTarget` names what a seed or lookup is about: the URL path and,
/// optionally, the method the fixture stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureTarget<'a> {
    pub path: &'a str,
    pub method: Option<&'a str>,
}

impl<'a> FixtureTarget<'a> {
    #[must_use]
    pub fn path(path: &'a str) -> Self {
        Self { path, method: None }
    }

    #[must_use]
    pub fn with_method(path: &'a str, method: Option<&'a str>) -> Self {
        Self { path, method }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyStrategy {
    /// One fixture per path; the method is informational.
    #[default]
    Path,
    /// One fixture per `(path, METHOD)`; a target without a method
    /// addresses the fixture seeded without one.
    PathAndMethod,
}

impl From<FixtureKeying> for KeyStrategy {
    fn from(value: FixtureKeying) -> Self {
        match value {
            FixtureKeying::Path => Self::Path,
            FixtureKeying::PathAndMethod => Self::PathAndMethod,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum FixtureKey {
    Path(String),
    PathAndMethod(String, String),
}

impl KeyStrategy {
    fn key_for(self, target: &FixtureTarget<'_>) -> FixtureKey {
        match self {
            Self::Path => FixtureKey::Path(target.path.to_string()),
            Self::PathAndMethod => FixtureKey::PathAndMethod(
                target.path.to_string(),
                target
                    .method
                    .map(|method| method.trim().to_ascii_uppercase())
                    .unwrap_or_default(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Created,
    Replaced,
}

#[derive(Debug, Default)]
pub struct FixtureRegistry {
    strategy: KeyStrategy,
    fixtures: RwLock<HashMap<FixtureKey, Arc<Fixture>>>,
}

// -- Constructors

impl FixtureRegistry {
    #[must_use]
    pub fn new(strategy: KeyStrategy) -> Self {
        Self {
            strategy,
            fixtures: RwLock::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn shared(strategy: KeyStrategy) -> Arc<Self> {
        Arc::new(Self::new(strategy))
    }
}

// -- Operations

impl FixtureRegistry {
    /// Stores `fixture` for `target`, replacing whatever was there. Visible to
    /// every lookup that starts after this returns.
    pub fn seed(&self, target: &FixtureTarget<'_>, fixture: Fixture) -> SeedOutcome {
        let key = self.strategy.key_for(target);
        let fixture = Arc::new(fixture);

        // every write is a single insert, a poisoned map is still consistent.
        let mut fixtures = self.fixtures.write().unwrap_or_else(PoisonError::into_inner);
        match fixtures.insert(key, fixture) {
            Some(_) => SeedOutcome::Replaced,
            None => SeedOutcome::Created,
        }
    }

    #[must_use]
    pub fn lookup(&self, target: &FixtureTarget<'_>) -> Option<Arc<Fixture>> {
        let key = self.strategy.key_for(target);
        let fixtures = self.fixtures.read().unwrap_or_else(PoisonError::into_inner);
        fixtures.get(&key).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fixtures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
