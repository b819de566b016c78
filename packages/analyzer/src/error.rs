//! Analyzer Errors

use thiserror::Error;

use crate::expression_tree::NodeKind;

/// Failure of a structural comparison.
///
/// Distinct from `Ok(false)`: an error means the comparer was asked about nodes
/// it cannot reason about, not that the nodes differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ComparisonError {
    /// The comparer does not support this node kind
    #[error("comparison of {kind} nodes is not supported by the {comparer} comparer")]
    Unsupported {
        kind: NodeKind,
        comparer: &'static str,
    },

    /// One of the nodes is an error node produced from malformed source
    #[error("cannot compare a malformed expression")]
    MalformedNode,
}

/// Failure to load an analyzer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for `{parameter}`: {message}")]
    InvalidParameter {
        parameter: &'static str,
        message: String,
    },
}

pub type ComparisonResult = std::result::Result<bool, ComparisonError>;
