use thiserror::Error;

/// Errors raised while interpreting proposal identifiers and cycles.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("empty proposal identifier")]
    EmptyIdentifier,

    #[error("malformed proposal identifier '{id}': {reason}")]
    ParseError { id: String, reason: String },

    #[error("cycle {0} has no known submission date")]
    UnknownCycle(u32),

    #[error("malformed submission date '{0}' (expected \"Month Year\")")]
    MalformedDate(String),
}
