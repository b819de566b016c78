/**
 * Expression Tree Module
 *
 * Precedence-correct semantic trees built from parsed expressions, and the
 * structural comparers diagnostics use to match them.
 */
pub mod builder;
pub mod equality;
pub mod node;
pub mod operator;
pub mod serializer;
pub mod visitor;

pub use builder::{build_expression_tree, ExpressionTreeBuilder};
pub use equality::{
    DefaultNodeEqualityComparer, NodeEqualityComparer, StrictNodeEqualityComparer,
    TransitiveOperationsIgnoringComparer,
};
pub use node::*;
pub use operator::BslOperator;
pub use serializer::serialize;
pub use visitor::{walk, ExpressionVisitor};
