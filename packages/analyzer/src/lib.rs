#![deny(clippy::all)]

/**
 * BSL Analyzer
 *
 * Expression tree engine for 1C:Enterprise BSL: a precedence-resolving tree
 * builder over parsed expressions, structural comparers, and the diagnostics
 * built on top of them.
 */

// Core modules
pub mod chars;
pub mod config;
pub mod error;
pub mod parse_util;

// Parsing and trees
pub mod expression_parser;
pub mod expression_tree;

// Consumers
pub mod diagnostics;

// Re-exports
pub use config::AnalyzerConfig;
pub use diagnostics::{Diagnostic, DiagnosticCode, DiagnosticEngine, Severity};
pub use error::{ComparisonError, ComparisonResult, ConfigError};
pub use expression_parser::Parser;
pub use expression_tree::{
    build_expression_tree, serialize, DefaultNodeEqualityComparer, ExpressionNode,
    NodeEqualityComparer, StrictNodeEqualityComparer, TransitiveOperationsIgnoringComparer,
};
pub use parse_util::SourceSpan;

/// Parse and build the tree of a single expression, discarding parse errors
pub fn parse_expression_tree(source: &str) -> ExpressionNode {
    let result = Parser::new().parse_expression(source);
    build_expression_tree(&result.expression)
}
