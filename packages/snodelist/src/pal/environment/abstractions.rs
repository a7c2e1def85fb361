// Environment trait abstraction for mocking in tests.

use std::fmt::Debug;
use std::io;
use std::path::Path;

/// Abstraction over the process environment used by snodelist.
///
/// This trait is automatically mocked by mockall in test builds, generating `MockEnvironment`.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Environment: Debug + Send + Sync + 'static {
    /// Returns the value of an environment variable, or `None` if it is unset or not valid
    /// Unicode.
    fn var(&self, name: &str) -> Option<String>;

    /// Reads the complete contents of a nodelist file.
    ///
    /// The path `-` means standard input.
    fn read_nodelist(&self, path: &Path) -> io::Result<String>;
}
