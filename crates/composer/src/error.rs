//! Error types for the composer crate

use std::fmt;
use thiserror::Error;

/// Errors that can occur while composing a deployment plan
///
/// Every variant is fatal for the run that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// A required deployment parameter is unset or empty
    #[error("{name} environment variable is required")]
    MissingRequiredParameter { name: String },

    /// A unit with the same name is already registered
    #[error("unit '{name}' is already registered")]
    DuplicateUnitName { name: String },

    /// A unit references a dependency that is not registered
    #[error("unit '{unit}' depends on '{dependency}', which is not registered")]
    UnknownDependency { unit: String, dependency: String },

    /// The dependency graph contains a cycle
    #[error("cyclic dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },

    /// A unit consumes an output its producer does not declare
    #[error("unit '{unit}' does not produce an output named '{output}'")]
    UnknownOutput { unit: String, output: String },

    /// A unit name is blank or path-like
    #[error("invalid unit name: {name:?}")]
    InvalidUnitName { name: String },
}

impl ConfigurationError {
    /// The kind of this error, without its details
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingRequiredParameter { .. } => ErrorKind::MissingRequiredParameter,
            Self::DuplicateUnitName { .. } => ErrorKind::DuplicateUnitName,
            Self::UnknownDependency { .. } => ErrorKind::UnknownDependency,
            Self::CyclicDependency { .. } => ErrorKind::CyclicDependency,
            Self::UnknownOutput { .. } => ErrorKind::UnknownOutput,
            Self::InvalidUnitName { .. } => ErrorKind::InvalidUnitName,
        }
    }
}

/// Discriminant of [`ConfigurationError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingRequiredParameter,
    DuplicateUnitName,
    UnknownDependency,
    CyclicDependency,
    UnknownOutput,
    InvalidUnitName,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingRequiredParameter => "MissingRequiredParameter",
            Self::DuplicateUnitName => "DuplicateUnitName",
            Self::UnknownDependency => "UnknownDependency",
            Self::CyclicDependency => "CyclicDependency",
            Self::UnknownOutput => "UnknownOutput",
            Self::InvalidUnitName => "InvalidUnitName",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for composer operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;
