//! Error types for cpupin

use thiserror::Error;

/// Minimum number of comma-separated fields on a topology line
pub const MIN_TOPOLOGY_FIELDS: usize = 5;

/// A single integer field that failed to parse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidField {
    /// Field name (cpu, core, socket or node)
    pub name: &'static str,
    /// Raw text as it appeared on the line
    pub raw: String,
}

impl std::fmt::Display for InvalidField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}='{}'", self.name, self.raw)
    }
}

/// Error for the fields of a single topology line
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError {
    /// The line does not carry enough fields
    #[error("insufficient fields: expected at least {}, found {found}", MIN_TOPOLOGY_FIELDS)]
    TooFewFields { found: usize },

    /// One or more of the integer fields did not parse
    #[error("failed to parse fields: {}", join_fields(.0))]
    InvalidFields(Vec<InvalidField>),
}

fn join_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Main error type for cpupin
#[derive(Error, Debug)]
pub enum CpupinError {
    /// A topology line could not be parsed; the whole input is rejected
    #[error("Failed to parse line {line_number} ({line}): {source}")]
    Parse {
        /// 1-based line number in the raw input
        line_number: usize,
        /// Offending line text
        line: String,
        source: FieldError,
    },

    /// More vCPUs were requested than the topology provides
    #[error(
        "Cannot request more vCPUs than available CPUs: requested={requested}, available={available}"
    )]
    Capacity { requested: usize, available: usize },

    /// Nothing to pin
    #[error("Cannot format an empty placement")]
    EmptySelection,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for cpupin operations
pub type CpupinResult<T> = Result<T, CpupinError>;

impl From<toml::de::Error> for CpupinError {
    fn from(err: toml::de::Error) -> Self {
        CpupinError::Config(err.to_string())
    }
}
