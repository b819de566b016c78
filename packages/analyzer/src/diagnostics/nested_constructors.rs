//! Constructor calls nested in a structure declaration
//!
//! `New Structure("Key", New Array)` hides the nested object's creation inside
//! the declaration. The first argument (the key list) is not inspected.

use once_cell::sync::Lazy;

use super::{Diagnostic, DiagnosticCode};
use crate::expression_tree::{
    walk, Call, CallTarget, ConstructorType, ExpressionNode, NodeEqualityComparer,
    StrictNodeEqualityComparer,
};
use crate::parse_util::SourceSpan;

static STRUCTURE_TYPES: Lazy<Vec<ExpressionNode>> = Lazy::new(|| {
    ["Structure", "Структура"]
        .into_iter()
        .map(|name| ExpressionNode::identifier(name, SourceSpan::default()))
        .collect()
});

#[derive(Debug, Default)]
pub struct NestedConstructorsInStructureDeclaration {
    comparer: StrictNodeEqualityComparer,
}

impl NestedConstructorsInStructureDeclaration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&self, root: &ExpressionNode) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        walk(root, &mut |node| {
            let Some(call) = node.as_call() else {
                return;
            };
            if !self.is_structure_constructor(call) {
                return;
            }

            let mut nested = Vec::new();
            for argument in call.arguments.iter().skip(1) {
                collect_constructors(argument, &mut nested);
            }
            if !nested.is_empty() {
                diagnostics.push(
                    Diagnostic::new(
                        DiagnosticCode::NestedConstructorsInStructureDeclaration,
                        "Constructor calls nested in a structure declaration",
                        call.span,
                    )
                    .with_related(nested),
                );
            }
        });
        diagnostics
    }

    fn is_structure_constructor(&self, call: &Call) -> bool {
        let CallTarget::Constructor(ConstructorType::Static(type_name)) = &call.target else {
            return false;
        };
        let type_name = type_name.to_identifier();
        STRUCTURE_TYPES
            .iter()
            .any(|structure| self.comparer.are_equal(&type_name, structure))
    }
}

/// Spans of the outermost constructor calls in `node`, in source order
fn collect_constructors(node: &ExpressionNode, spans: &mut Vec<SourceSpan>) {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        match node.as_call() {
            Some(call) if call.is_constructor() => spans.push(call.span),
            _ => pending.extend(node.children().into_iter().rev()),
        }
    }
}
