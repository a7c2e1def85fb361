// Chooses between the process environment and a mock, so `run` can be tested without touching
// real variables or files.

use std::io;
use std::path::Path;
#[cfg(test)]
use std::sync::Arc;

#[cfg(test)]
use crate::pal::MockEnvironment;
use crate::pal::{BuildTargetEnvironment, Environment};

/// Where host lists and task counts come from: the process environment, or a mock in tests.
#[derive(Clone)]
pub(crate) enum EnvironmentFacade {
    /// Process environment and real files.
    Target(&'static BuildTargetEnvironment),

    /// Scripted variables and nodelist contents.
    #[cfg(test)]
    Mock(Arc<MockEnvironment>),
}

// Output shape of `Debug` is not part of any contract.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl std::fmt::Debug for EnvironmentFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Target(_) => f.debug_struct("EnvironmentFacade::Target").finish(),
            #[cfg(test)]
            Self::Mock(_) => f.debug_struct("EnvironmentFacade::Mock").finish(),
        }
    }
}

static BUILD_TARGET_ENVIRONMENT: BuildTargetEnvironment = BuildTargetEnvironment;

// Constructors only; callers' tests cover both variants.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl EnvironmentFacade {
    /// Reads the environment of the current process.
    pub(crate) const fn target() -> Self {
        Self::Target(&BUILD_TARGET_ENVIRONMENT)
    }

    /// Wraps a mock with scripted expectations.
    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockEnvironment) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

// Each method picks the variant and forwards unchanged.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Environment for EnvironmentFacade {
    fn var(&self, name: &str) -> Option<String> {
        match self {
            Self::Target(env) => env.var(name),
            #[cfg(test)]
            Self::Mock(mock) => mock.var(name),
        }
    }

    fn read_nodelist(&self, path: &Path) -> io::Result<String> {
        match self {
            Self::Target(env) => env.read_nodelist(path),
            #[cfg(test)]
            Self::Mock(mock) => mock.read_nodelist(path),
        }
    }
}
