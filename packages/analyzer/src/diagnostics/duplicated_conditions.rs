//! Repeated conditions in an `If ... ElsIf ...` chain
//!
//! A branch whose condition equals an earlier one can never be taken.

use super::{Diagnostic, DiagnosticCode};
use crate::expression_tree::{
    serialize, DefaultNodeEqualityComparer, ExpressionNode, NodeEqualityComparer,
};

#[derive(Debug, Default)]
pub struct DuplicatedConditions {
    comparer: DefaultNodeEqualityComparer,
}

impl DuplicatedConditions {
    pub fn new() -> Self {
        Self::default()
    }

    /// `conditions` are the `If` condition followed by every `ElsIf` condition, in order
    pub fn check(&self, conditions: &[ExpressionNode]) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for (index, condition) in conditions.iter().enumerate() {
            let earlier = conditions[..index]
                .iter()
                .find(|earlier| self.comparer.try_equal(earlier, condition) == Ok(true));
            if let Some(earlier) = earlier {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::DuplicatedConditions,
                        format!("Condition `{}` duplicates an earlier branch", serialize(condition)),
                        condition.span(),
                    )
                    .with_related([earlier.span()]),
                );
            }
        }
        diagnostics
    }
}
