use super::NodeEqualityComparer;
use crate::chars;
use crate::error::{ComparisonError, ComparisonResult};
use crate::expression_tree::node::ExpressionNode;

/// Identifier-only comparer.
///
/// Supports nothing but identifiers. The same node is equal to itself and nodes
/// of different kinds are never equal; two distinct nodes of any other kind,
/// literals included, are reported as `ComparisonError::Unsupported`. Only use
/// it where both sides are known to be plain names, such as constructor type
/// names.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictNodeEqualityComparer;

impl NodeEqualityComparer for StrictNodeEqualityComparer {
    fn name(&self) -> &'static str {
        "strict"
    }

    fn try_equal(&self, first: &ExpressionNode, second: &ExpressionNode) -> ComparisonResult {
        if std::ptr::eq(first, second) {
            return Ok(true);
        }
        match (first, second) {
            (ExpressionNode::Error(_), _) | (_, ExpressionNode::Error(_)) => {
                Err(ComparisonError::MalformedNode)
            }
            (ExpressionNode::Identifier(a), ExpressionNode::Identifier(b)) => {
                Ok(chars::eq_ignore_case(&a.name, &b.name))
            }
            _ if first.kind() != second.kind() => Ok(false),
            _ => Err(ComparisonError::Unsupported {
                kind: first.kind(),
                comparer: self.name(),
            }),
        }
    }
}
