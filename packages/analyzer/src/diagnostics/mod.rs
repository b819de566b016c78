//! Diagnostics over expression trees
//!
//! Each diagnostic inspects built trees with one of the structural comparers
//! and reports locations as source spans. A comparison that fails with a
//! `ComparisonError` is never reported.

pub mod duplicated_conditions;
pub mod engine;
pub mod identical_expressions;
pub mod nested_constructors;

pub use duplicated_conditions::DuplicatedConditions;
pub use engine::{DiagnosticEngine, ExpressionReport};
pub use identical_expressions::IdenticalExpressions;
pub use nested_constructors::NestedConstructorsInStructureDeclaration;

use serde::{Deserialize, Serialize};

use crate::parse_util::{SourceFile, SourceSpan};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    #[default]
    Warning,
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticCode {
    IdenticalExpressions,
    NestedConstructorsInStructureDeclaration,
    DuplicatedConditions,
}

impl DiagnosticCode {
    pub fn default_severity(self) -> Severity {
        match self {
            DiagnosticCode::IdenticalExpressions => Severity::Error,
            DiagnosticCode::NestedConstructorsInStructureDeclaration => Severity::Info,
            DiagnosticCode::DuplicatedConditions => Severity::Warning,
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let code = match self {
            DiagnosticCode::IdenticalExpressions => "IdenticalExpressions",
            DiagnosticCode::NestedConstructorsInStructureDeclaration => {
                "NestedConstructorsInStructureDeclaration"
            }
            DiagnosticCode::DuplicatedConditions => "DuplicatedConditions",
        };
        f.write_str(code)
    }
}

/// A reported problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub code: DiagnosticCode,
    pub message: String,
    /// Primary location
    pub span: SourceSpan,
    /// Secondary locations, e.g. the other occurrences of a duplicate
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<SourceSpan>,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(code: DiagnosticCode, message: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            code,
            message: message.into(),
            span,
            related: Vec::new(),
            severity: code.default_severity(),
        }
    }

    pub fn with_related(mut self, related: impl IntoIterator<Item = SourceSpan>) -> Self {
        self.related.extend(related);
        self
    }

    /// `url:line:col: severity[code] message`, with a one-based position
    pub fn render(&self, file: &SourceFile) -> String {
        format!(
            "{}:{}: {}[{}] {}",
            file.url,
            file.location(self.span.start),
            self.severity,
            self.code,
            self.message
        )
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[{}] {}..{}: {}",
            self.severity, self.code, self.span.start, self.span.end, self.message
        )
    }
}
