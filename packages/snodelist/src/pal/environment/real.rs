// Real environment implementation that delegates to std::env, std::fs and std::io.

use std::env::VarError;
use std::io;
use std::path::Path;

use tracing::warn;

use crate::pal::Environment;

/// Real environment implementation that uses the operating system's process environment.
#[derive(Debug, Default)]
pub(crate) struct BuildTargetEnvironment;

// Thin wrapper over system APIs, exercised through `var_value` and the integration tests.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Environment for BuildTargetEnvironment {
    fn var(&self, name: &str) -> Option<String> {
        var_value(name, std::env::var(name))
    }

    fn read_nodelist(&self, path: &Path) -> io::Result<String> {
        if path == Path::new("-") {
            io::read_to_string(io::stdin())
        } else {
            std::fs::read_to_string(path)
        }
    }
}

/// Host names are text, so a variable that is not valid Unicode is skipped with a warning.
fn var_value(name: &str, value: Result<String, VarError>) -> Option<String> {
    match value {
        Ok(value) => Some(value),
        Err(VarError::NotPresent) => None,
        Err(VarError::NotUnicode(raw)) => {
            warn!(
                variable = name,
                value = %raw.to_string_lossy(),
                "ignoring environment variable that is not valid Unicode"
            );
            None
        }
    }
}
