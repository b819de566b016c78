//! Identical sub-expressions on both sides of an operator
//!
//! `A = A`, `X - X`, `Flag AND Flag` and friends. Operands are matched with the
//! transitive comparer, so `A + B = B + A` is reported too. Chains of the same
//! logical operator are flattened first: `A AND B AND A` reports the repeated
//! `A` even though the two occurrences are not siblings in the tree.

use indexmap::IndexMap;

use super::{Diagnostic, DiagnosticCode};
use crate::config::IdenticalExpressionsConfig;
use crate::expression_tree::{
    serialize, BinaryOperation, BslOperator, ExpressionNode, LiteralKind, NodeEqualityComparer,
    TransitiveOperationsIgnoringComparer,
};

pub struct IdenticalExpressions {
    comparer: TransitiveOperationsIgnoringComparer,
    popular_divisors: Vec<String>,
}

impl IdenticalExpressions {
    pub fn new(config: &IdenticalExpressionsConfig) -> Self {
        Self {
            comparer: TransitiveOperationsIgnoringComparer::new(
                config.logical_operations_as_transitive,
            ),
            popular_divisors: config
                .popular_divisors()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn check(&self, root: &ExpressionNode) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        // (node, operator of the parent binary node)
        let mut stack: Vec<(&ExpressionNode, Option<BslOperator>)> = vec![(root, None)];

        while let Some((node, parent_operator)) = stack.pop() {
            if let ExpressionNode::Binary(binary) = node {
                if binary.operator.is_logical() {
                    // Only the outermost node of a chain reports
                    if parent_operator != Some(binary.operator) {
                        self.check_logical_chain(binary, &mut diagnostics);
                    }
                } else if is_checked_operator(binary.operator) {
                    self.check_operands(binary, &mut diagnostics);
                }
            }

            let operator = node.as_binary().map(|binary| binary.operator);
            for child in node.children().into_iter().rev() {
                stack.push((child, operator));
            }
        }

        diagnostics
    }

    fn check_operands(&self, binary: &BinaryOperation, diagnostics: &mut Vec<Diagnostic>) {
        if matches!(binary.operator, BslOperator::Multiply | BslOperator::Divide)
            && (self.is_popular_divisor(&binary.left) || self.is_popular_divisor(&binary.right))
        {
            return;
        }
        if self.comparer.try_equal(&binary.left, &binary.right) == Ok(true) {
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::IdenticalExpressions,
                    message(binary.operator, &binary.left),
                    binary.span,
                )
                .with_related([binary.left.span(), binary.right.span()]),
            );
        }
    }

    fn check_logical_chain(&self, binary: &BinaryOperation, diagnostics: &mut Vec<Diagnostic>) {
        let operands = flatten_chain(binary);

        // first occurrence index -> indexes of its duplicates
        let mut duplicates: IndexMap<usize, Vec<usize>> = IndexMap::new();
        let mut representatives: Vec<usize> = Vec::new();
        for (index, operand) in operands.iter().enumerate() {
            let original = representatives
                .iter()
                .copied()
                .find(|&candidate| self.comparer.try_equal(operands[candidate], operand) == Ok(true));
            match original {
                Some(original) => duplicates.entry(original).or_default().push(index),
                None => representatives.push(index),
            }
        }

        for (original, copies) in duplicates {
            let related = std::iter::once(original)
                .chain(copies)
                .map(|index| operands[index].span());
            diagnostics.push(
                Diagnostic::new(
                    DiagnosticCode::IdenticalExpressions,
                    message(binary.operator, operands[original]),
                    binary.span,
                )
                .with_related(related),
            );
        }
    }

    fn is_popular_divisor(&self, node: &ExpressionNode) -> bool {
        match node.as_literal() {
            Some(literal) if literal.kind == LiteralKind::Number => self
                .popular_divisors
                .iter()
                .any(|divisor| *divisor == literal.text),
            _ => false,
        }
    }
}

fn is_checked_operator(operator: BslOperator) -> bool {
    operator.is_comparison()
        || matches!(
            operator,
            BslOperator::Subtract | BslOperator::Divide | BslOperator::Modulo
        )
}

/// Operands of a maximal chain of the same operator, left to right
fn flatten_chain(binary: &BinaryOperation) -> Vec<&ExpressionNode> {
    let mut operands = Vec::new();
    let mut pending = vec![&*binary.right, &*binary.left];
    while let Some(node) = pending.pop() {
        match node.as_binary() {
            Some(inner) if inner.operator == binary.operator => {
                pending.push(&*inner.right);
                pending.push(&*inner.left);
            }
            _ => operands.push(node),
        }
    }
    operands
}

fn message(operator: BslOperator, operand: &ExpressionNode) -> String {
    format!(
        "Identical sub-expressions `{}` around the `{}` operator",
        serialize(operand),
        operator
    )
}
