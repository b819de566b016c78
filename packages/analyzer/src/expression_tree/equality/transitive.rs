use smallvec::smallvec;

use super::{Comparison, NodeEqualityComparer, ShallowResult};
use crate::expression_tree::node::BinaryOperation;
use crate::expression_tree::operator::BslOperator;

/// Default equality that also accepts swapped operands of commutative operators.
///
/// `Add`, `Equal` and `Multiply` are always commutative; `And` and `Or` only
/// when `logical_operations_as_transitive` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitiveOperationsIgnoringComparer {
    logical_operations_as_transitive: bool,
}

impl TransitiveOperationsIgnoringComparer {
    pub fn new(logical_operations_as_transitive: bool) -> Self {
        TransitiveOperationsIgnoringComparer {
            logical_operations_as_transitive,
        }
    }

    pub fn logical_operations_as_transitive(&self) -> bool {
        self.logical_operations_as_transitive
    }

    fn is_transitive(&self, operator: BslOperator) -> bool {
        match operator {
            BslOperator::Add | BslOperator::Equal | BslOperator::Multiply => true,
            BslOperator::And | BslOperator::Or => self.logical_operations_as_transitive,
            _ => false,
        }
    }
}

impl NodeEqualityComparer for TransitiveOperationsIgnoringComparer {
    fn name(&self) -> &'static str {
        "transitive"
    }

    /// Operands in order first, then swapped for commutative operators
    fn binary_equal<'a>(&self, first: &'a BinaryOperation, second: &'a BinaryOperation) -> ShallowResult<'a> {
        if first.operator != second.operator || first.operator.is_access() {
            return Ok(Comparison::Decided(false));
        }
        let direct = smallvec![
            (&*first.left, &*second.left),
            (&*first.right, &*second.right),
        ];
        if !self.is_transitive(first.operator) {
            return Ok(Comparison::All(direct));
        }
        Ok(Comparison::Any(smallvec![
            direct,
            smallvec![(&*first.left, &*second.right), (&*first.right, &*second.left)],
        ]))
    }
}
