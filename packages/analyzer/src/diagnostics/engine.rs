//! Diagnostic engine
//!
//! Parses, builds and checks batches of expressions in parallel. Every
//! expression gets its own parser and builder; results keep input order.

use rayon::prelude::*;

use super::{
    Diagnostic, DuplicatedConditions, IdenticalExpressions,
    NestedConstructorsInStructureDeclaration,
};
use crate::config::AnalyzerConfig;
use crate::expression_parser::Parser;
use crate::expression_tree::{build_expression_tree, ExpressionNode};
use crate::parse_util::{ParseError, SourceSpan};

/// Diagnostics and parse errors of one analyzed expression
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpressionReport {
    pub diagnostics: Vec<Diagnostic>,
    pub parse_errors: Vec<ParseError>,
}

pub struct DiagnosticEngine {
    config: AnalyzerConfig,
    identical_expressions: Option<IdenticalExpressions>,
    nested_constructors: Option<NestedConstructorsInStructureDeclaration>,
    duplicated_conditions: Option<DuplicatedConditions>,
}

impl Default for DiagnosticEngine {
    fn default() -> Self {
        Self::new(AnalyzerConfig::default())
    }
}

impl DiagnosticEngine {
    pub fn new(config: AnalyzerConfig) -> Self {
        let identical_expressions = config
            .identical_expressions
            .enabled
            .then(|| IdenticalExpressions::new(&config.identical_expressions));
        let nested_constructors = config
            .nested_constructors_in_structure_declaration
            .enabled
            .then(NestedConstructorsInStructureDeclaration::new);
        let duplicated_conditions = config
            .duplicated_conditions
            .enabled
            .then(DuplicatedConditions::new);

        Self {
            config,
            identical_expressions,
            nested_constructors,
            duplicated_conditions,
        }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyze one standalone expression
    pub fn analyze_expression(&self, source: &str) -> ExpressionReport {
        let (tree, parse_errors) = parse_and_build(source, 0);

        let mut diagnostics = Vec::new();
        if let Some(diagnostic) = &self.identical_expressions {
            diagnostics.extend(diagnostic.check(&tree));
        }
        if let Some(diagnostic) = &self.nested_constructors {
            diagnostics.extend(diagnostic.check(&tree));
        }
        tracing::debug!(
            "Analyzed `{}`: {} diagnostic(s), {} parse error(s)",
            source,
            diagnostics.len(),
            parse_errors.len()
        );

        ExpressionReport {
            diagnostics,
            parse_errors,
        }
    }

    /// Analyze a batch of expressions in parallel; one report per source, in input order
    #[tracing::instrument(skip_all, fields(count = sources.len()))]
    pub fn analyze_expressions(&self, sources: &[&str]) -> Vec<ExpressionReport> {
        sources
            .par_iter()
            .map(|source| self.analyze_expression(source))
            .collect()
    }

    /// Check the conditions of one `If ... ElsIf ...` chain.
    ///
    /// `conditions` are spans into `module_source`, in branch order; reported
    /// spans are offsets into `module_source` as well.
    #[tracing::instrument(skip_all, fields(count = conditions.len()))]
    pub fn analyze_conditions(&self, module_source: &str, conditions: &[SourceSpan]) -> Vec<Diagnostic> {
        let Some(diagnostic) = &self.duplicated_conditions else {
            return Vec::new();
        };

        let trees: Vec<ExpressionNode> = conditions
            .par_iter()
            .map(|span| parse_and_build(span.text(module_source), span.start).0)
            .collect();
        diagnostic.check(&trees)
    }
}

fn parse_and_build(source: &str, offset: usize) -> (ExpressionNode, Vec<ParseError>) {
    let result = Parser::new().parse_expression_at(source, offset);
    if result.has_errors() {
        for error in &result.errors {
            tracing::warn!("Parse error in `{}`: {}", source, error);
        }
    }
    (build_expression_tree(&result.expression), result.errors)
}
