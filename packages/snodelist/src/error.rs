use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when decoding a compact task-count list such as `1,4(x2),8`.
///
/// Every variant carries the byte offset of the problem, measured from the start of the original
/// task-count string, together with that string.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum DecodeError {
    /// A term did not start with an unsigned integer that fits into a `u32`.
    #[error("invalid integer value at offset {offset}: {spec}")]
    InvalidInteger {
        /// Byte offset of the term that failed to parse.
        offset: usize,
        /// The complete task-count string.
        spec: String,
    },

    /// A `(x<repeat>)` suffix was malformed or its repeat factor was not positive.
    #[error("invalid repeat count at offset {offset}: {spec}")]
    InvalidRepeatCount {
        /// Byte offset at which the `x` or the repeat factor was expected.
        offset: usize,
        /// The complete task-count string.
        spec: String,
    },

    /// A character appeared where only `)`, `,` or the end of the string may appear.
    #[error("unexpected character at offset {offset}: {spec}")]
    UnexpectedCharacter {
        /// Byte offset of the unexpected character (or of the end of the string).
        offset: usize,
        /// The complete task-count string.
        spec: String,
    },
}

impl DecodeError {
    /// Byte offset of the problem, relative to the start of the task-count string.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::InvalidInteger { offset, .. }
            | Self::InvalidRepeatCount { offset, .. }
            | Self::UnexpectedCharacter { offset, .. } => *offset,
        }
    }
}

/// Errors that can occur when compiling a machinefile line template.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum TemplateError {
    /// A `%[` delimiter token was never closed with `]`.
    #[error("invalid delimiter in format specification: {delimiter}")]
    UnterminatedDelimiter {
        /// The template text following the opening `[`.
        delimiter: String,
    },
}

/// Errors that can occur when running the tool.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The task-count list could not be decoded.
    #[error(transparent)]
    TaskCount(#[from] DecodeError),

    /// The machinefile line template is malformed.
    #[error(transparent)]
    Template(#[from] TemplateError),

    /// A host-list expression is malformed.
    #[error(transparent)]
    HostList(#[from] hostlist::Error),

    /// A required environment variable is unset or empty.
    #[error("no {name} in environment")]
    MissingEnvironment {
        /// Name of the environment variable.
        name: String,
    },

    /// A nodelist file could not be read.
    #[error("unable to open nodelist {}: {source}", path.display())]
    NodelistUnreadable {
        /// The path that was given, `-` meaning standard input.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Writing the listing to the output failed.
    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

/// A specialized `Result` type for snodelist operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
