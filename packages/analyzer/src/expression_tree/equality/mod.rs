/**
 * Structural Equality
 *
 * Comparers decide whether two expression trees denote "the same expression"
 * for a given diagnostic. The shared traversal lives in the provided methods
 * of `NodeEqualityComparer`; each comparer overrides only the hooks whose
 * semantics differ.
 *
 * Hooks look one level deep and return the child pairs still to compare. The
 * traversal keeps those pairs on an explicit stack, so arbitrarily deep trees
 * (long flat operator chains included) compare in constant call depth.
 */

mod default;
mod strict;
mod transitive;

pub use default::DefaultNodeEqualityComparer;
pub use strict::StrictNodeEqualityComparer;
pub use transitive::TransitiveOperationsIgnoringComparer;

use smallvec::{smallvec, SmallVec};

use super::node::*;
use crate::chars;
use crate::error::{ComparisonError, ComparisonResult};

/// Two nodes to compare
pub type NodePair<'a> = (&'a ExpressionNode, &'a ExpressionNode);

/// Pairs that must all be equal, compared in order
pub type PairList<'a> = SmallVec<[NodePair<'a>; 4]>;

/// Outcome of comparing two nodes one level deep
#[derive(Debug)]
pub enum Comparison<'a> {
    /// Known without looking at children
    Decided(bool),
    /// Equal when every pair is equal
    All(PairList<'a>),
    /// Equal when every pair of some alternative is equal; alternatives are tried in order
    Any(SmallVec<[PairList<'a>; 2]>),
}

pub type ShallowResult<'a> = Result<Comparison<'a>, ComparisonError>;

pub trait NodeEqualityComparer: Send + Sync {
    /// Short name used in comparison errors
    fn name(&self) -> &'static str;

    /// Compares two trees.
    ///
    /// Identical references are equal and nodes of different kinds are not.
    /// Error nodes cannot be compared and yield `ComparisonError::MalformedNode`.
    fn try_equal(&self, first: &ExpressionNode, second: &ExpressionNode) -> ComparisonResult {
        evaluate(self, first, second)
    }

    /// `try_equal` with comparison errors treated as "not equal"
    fn are_equal(&self, first: &ExpressionNode, second: &ExpressionNode) -> bool {
        self.try_equal(first, second).unwrap_or(false)
    }

    /// One level of `try_equal`: shared rules, then dispatch to the per-kind hook
    fn compare_shallow<'a>(&self, first: &'a ExpressionNode, second: &'a ExpressionNode) -> ShallowResult<'a> {
        if std::ptr::eq(first, second) {
            return Ok(Comparison::Decided(true));
        }

        match (first, second) {
            (ExpressionNode::Error(_), _) | (_, ExpressionNode::Error(_)) => {
                Err(ComparisonError::MalformedNode)
            }
            (ExpressionNode::Literal(a), ExpressionNode::Literal(b)) => {
                Ok(Comparison::Decided(self.literal_equal(a, b)?))
            }
            (ExpressionNode::Identifier(a), ExpressionNode::Identifier(b)) => {
                Ok(Comparison::Decided(self.identifier_equal(a, b)?))
            }
            (ExpressionNode::Binary(a), ExpressionNode::Binary(b)) => self.binary_equal(a, b),
            (ExpressionNode::Unary(a), ExpressionNode::Unary(b)) => self.unary_equal(a, b),
            (ExpressionNode::Ternary(a), ExpressionNode::Ternary(b)) => self.ternary_equal(a, b),
            (ExpressionNode::Call(a), ExpressionNode::Call(b)) => self.call_equal(a, b),
            (ExpressionNode::SkippedArgument(_), ExpressionNode::SkippedArgument(_)) => {
                Ok(Comparison::Decided(true))
            }
            _ => Ok(Comparison::Decided(false)),
        }
    }

    fn literal_equal(&self, first: &Literal, second: &Literal) -> ComparisonResult {
        Ok(chars::eq_ignore_case(&first.text, &second.text))
    }

    fn identifier_equal(&self, first: &Identifier, second: &Identifier) -> ComparisonResult {
        Ok(chars::eq_ignore_case(&first.name, &second.name))
    }

    /// Same operator and pairwise equal operands. Access operators never match.
    fn binary_equal<'a>(&self, first: &'a BinaryOperation, second: &'a BinaryOperation) -> ShallowResult<'a> {
        if first.operator != second.operator || first.operator.is_access() {
            return Ok(Comparison::Decided(false));
        }
        Ok(Comparison::All(smallvec![
            (&*first.left, &*second.left),
            (&*first.right, &*second.right),
        ]))
    }

    fn unary_equal<'a>(&self, first: &'a UnaryOperation, second: &'a UnaryOperation) -> ShallowResult<'a> {
        if first.operator != second.operator {
            return Ok(Comparison::Decided(false));
        }
        Ok(Comparison::All(smallvec![(&*first.operand, &*second.operand)]))
    }

    fn ternary_equal<'a>(&self, first: &'a TernaryOperation, second: &'a TernaryOperation) -> ShallowResult<'a> {
        Ok(Comparison::All(smallvec![
            (&*first.condition, &*second.condition),
            (&*first.true_branch, &*second.true_branch),
            (&*first.false_branch, &*second.false_branch),
        ]))
    }

    fn call_equal<'a>(&self, first: &'a Call, second: &'a Call) -> ShallowResult<'a> {
        let mut pairs = PairList::new();
        let targets_equal = match (&first.target, &second.target) {
            (CallTarget::Method(a), CallTarget::Method(b)) => chars::eq_ignore_case(&a.name, &b.name),
            (
                CallTarget::Constructor(ConstructorType::Static(a)),
                CallTarget::Constructor(ConstructorType::Static(b)),
            ) => chars::eq_ignore_case(&a.name, &b.name),
            (
                CallTarget::Constructor(ConstructorType::Dynamic(a)),
                CallTarget::Constructor(ConstructorType::Dynamic(b)),
            ) => {
                pairs.push((&**a, &**b));
                true
            }
            _ => false,
        };
        if !targets_equal {
            return Ok(Comparison::Decided(false));
        }
        // The dynamic type pair, if any, is compared before the arguments
        Ok(match self.arguments_equal(&first.arguments, &second.arguments)? {
            Comparison::Decided(false) => Comparison::Decided(false),
            Comparison::Decided(true) => Comparison::All(pairs),
            Comparison::All(arguments) => {
                pairs.extend(arguments);
                Comparison::All(pairs)
            }
            Comparison::Any(alternatives) => Comparison::Any(
                alternatives
                    .into_iter()
                    .map(|alternative| pairs.iter().copied().chain(alternative).collect())
                    .collect(),
            ),
        })
    }

    /// Equal length and pairwise equal in order
    fn arguments_equal<'a>(&self, first: &'a [ExpressionNode], second: &'a [ExpressionNode]) -> ShallowResult<'a> {
        if first.len() != second.len() {
            return Ok(Comparison::Decided(false));
        }
        Ok(Comparison::All(first.iter().zip(second).collect()))
    }
}

enum Frame<'a> {
    All { pairs: PairList<'a>, next: usize },
    Any { alternatives: SmallVec<[PairList<'a>; 2]>, next: usize },
}

enum Step<'a> {
    /// The top frame is finished with this value
    Finish(bool),
    Compare(NodePair<'a>),
    Enter(PairList<'a>),
}

/// Drives `compare_shallow` over both trees with an explicit frame stack.
///
/// `result` carries the value of the last finished sub-comparison to the frame
/// below it; `None` means the top frame has just been entered.
fn evaluate<C>(comparer: &C, first: &ExpressionNode, second: &ExpressionNode) -> ComparisonResult
where
    C: NodeEqualityComparer + ?Sized,
{
    let mut frames = vec![Frame::All {
        pairs: smallvec![(first, second)],
        next: 0,
    }];
    let mut result: Option<bool> = None;

    while let Some(frame) = frames.last_mut() {
        let step = match frame {
            Frame::All { pairs, next } => {
                if result == Some(false) {
                    Step::Finish(false)
                } else if *next == pairs.len() {
                    Step::Finish(true)
                } else {
                    *next += 1;
                    Step::Compare(pairs[*next - 1])
                }
            }
            Frame::Any { alternatives, next } => {
                if result == Some(true) {
                    Step::Finish(true)
                } else if *next == alternatives.len() {
                    Step::Finish(false)
                } else {
                    *next += 1;
                    Step::Enter(std::mem::take(&mut alternatives[*next - 1]))
                }
            }
        };

        match step {
            Step::Finish(value) => {
                frames.pop();
                result = Some(value);
            }
            Step::Enter(pairs) => {
                frames.push(Frame::All { pairs, next: 0 });
                result = None;
            }
            Step::Compare((a, b)) => match comparer.compare_shallow(a, b)? {
                Comparison::Decided(value) => result = Some(value),
                Comparison::All(pairs) => {
                    frames.push(Frame::All { pairs, next: 0 });
                    result = None;
                }
                Comparison::Any(alternatives) => {
                    frames.push(Frame::Any { alternatives, next: 0 });
                    result = None;
                }
            },
        }
    }

    Ok(result == Some(true))
}
