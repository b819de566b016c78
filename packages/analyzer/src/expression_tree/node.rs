/**
 * Expression Tree Nodes
 *
 * Semantic expression tree produced by the builder. Each non-leaf node owns
 * its children; trees are never mutated after construction.
 */

use serde::{Deserialize, Serialize};

use super::operator::BslOperator;
use crate::parse_util::SourceSpan;

/// Kind of constant a literal node holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiteralKind {
    Number,
    String,
    Date,
    Boolean,
    Undefined,
    Null,
}

/// Discriminant of an `ExpressionNode`, used in diagnostics and comparison errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Literal,
    Identifier,
    Binary,
    Unary,
    Ternary,
    MethodCall,
    ConstructorCall,
    SkippedArgument,
    Error,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            NodeKind::Literal => "literal",
            NodeKind::Identifier => "identifier",
            NodeKind::Binary => "binary operation",
            NodeKind::Unary => "unary operation",
            NodeKind::Ternary => "ternary operation",
            NodeKind::MethodCall => "method call",
            NodeKind::ConstructorCall => "constructor call",
            NodeKind::SkippedArgument => "skipped argument",
            NodeKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// Main expression tree enum
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ExpressionNode {
    Literal(Literal),
    Identifier(Identifier),
    Binary(BinaryOperation),
    Unary(UnaryOperation),
    Ternary(TernaryOperation),
    Call(Call),
    SkippedArgument(SkippedArgument),
    Error(ErrorNode),
}

/// Constant (number, string, date, boolean, `Undefined` or `NULL`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Literal {
    pub span: SourceSpan,
    pub kind: LiteralKind,
    /// Exact source text of the constant
    pub text: String,
}

/// Bare name reference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identifier {
    pub span: SourceSpan,
    pub name: String,
}

/// Binary operation.
///
/// Property and index access are binary operations too: the left operand is the
/// accessed target, the right operand is the accessor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinaryOperation {
    pub span: SourceSpan,
    pub operator: BslOperator,
    pub left: Box<ExpressionNode>,
    pub right: Box<ExpressionNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnaryOperation {
    pub span: SourceSpan,
    pub operator: BslOperator,
    pub operand: Box<ExpressionNode>,
}

/// `?(condition, trueBranch, falseBranch)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TernaryOperation {
    pub span: SourceSpan,
    pub condition: Box<ExpressionNode>,
    pub true_branch: Box<ExpressionNode>,
    pub false_branch: Box<ExpressionNode>,
}

/// Method or constructor call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Call {
    pub span: SourceSpan,
    pub target: CallTarget,
    pub arguments: Vec<ExpressionNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CallTarget {
    Method(MethodName),
    Constructor(ConstructorType),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodName {
    pub span: SourceSpan,
    pub name: String,
}

/// Type of a `New` expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConstructorType {
    /// `New Structure(...)`
    Static(TypeName),
    /// `New("Structure", ...)`
    Dynamic(Box<ExpressionNode>),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeName {
    pub span: SourceSpan,
    pub name: String,
}

/// Omitted positional argument, as in `F(, 2)`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedArgument {
    pub span: SourceSpan,
}

/// Malformed sub-expression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorNode {
    pub span: SourceSpan,
}

// Helper constructors
impl ExpressionNode {
    pub fn literal(kind: LiteralKind, text: impl Into<String>, span: SourceSpan) -> Self {
        ExpressionNode::Literal(Literal {
            span,
            kind,
            text: text.into(),
        })
    }

    pub fn identifier(name: impl Into<String>, span: SourceSpan) -> Self {
        ExpressionNode::Identifier(Identifier {
            span,
            name: name.into(),
        })
    }

    /// Binary operation spanning from its left operand to its right operand
    pub fn binary(operator: BslOperator, left: ExpressionNode, right: ExpressionNode) -> Self {
        let span = left.span().cover(right.span());
        ExpressionNode::Binary(BinaryOperation {
            span,
            operator,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    pub fn unary(operator: BslOperator, operand: ExpressionNode, span: SourceSpan) -> Self {
        ExpressionNode::Unary(UnaryOperation {
            span,
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn ternary(
        condition: ExpressionNode,
        true_branch: ExpressionNode,
        false_branch: ExpressionNode,
        span: SourceSpan,
    ) -> Self {
        ExpressionNode::Ternary(TernaryOperation {
            span,
            condition: Box::new(condition),
            true_branch: Box::new(true_branch),
            false_branch: Box::new(false_branch),
        })
    }

    pub fn method_call(
        name: MethodName,
        arguments: Vec<ExpressionNode>,
        span: SourceSpan,
    ) -> Self {
        ExpressionNode::Call(Call {
            span,
            target: CallTarget::Method(name),
            arguments,
        })
    }

    pub fn constructor_call(
        constructor: ConstructorType,
        arguments: Vec<ExpressionNode>,
        span: SourceSpan,
    ) -> Self {
        ExpressionNode::Call(Call {
            span,
            target: CallTarget::Constructor(constructor),
            arguments,
        })
    }

    pub fn skipped_argument(span: SourceSpan) -> Self {
        ExpressionNode::SkippedArgument(SkippedArgument { span })
    }

    pub fn error(span: SourceSpan) -> Self {
        ExpressionNode::Error(ErrorNode { span })
    }
}

// Accessors
impl ExpressionNode {
    pub fn span(&self) -> SourceSpan {
        match self {
            ExpressionNode::Literal(e) => e.span,
            ExpressionNode::Identifier(e) => e.span,
            ExpressionNode::Binary(e) => e.span,
            ExpressionNode::Unary(e) => e.span,
            ExpressionNode::Ternary(e) => e.span,
            ExpressionNode::Call(e) => e.span,
            ExpressionNode::SkippedArgument(e) => e.span,
            ExpressionNode::Error(e) => e.span,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            ExpressionNode::Literal(_) => NodeKind::Literal,
            ExpressionNode::Identifier(_) => NodeKind::Identifier,
            ExpressionNode::Binary(_) => NodeKind::Binary,
            ExpressionNode::Unary(_) => NodeKind::Unary,
            ExpressionNode::Ternary(_) => NodeKind::Ternary,
            ExpressionNode::Call(call) => match call.target {
                CallTarget::Method(_) => NodeKind::MethodCall,
                CallTarget::Constructor(_) => NodeKind::ConstructorCall,
            },
            ExpressionNode::SkippedArgument(_) => NodeKind::SkippedArgument,
            ExpressionNode::Error(_) => NodeKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ExpressionNode::Error(_))
    }

    /// True when this node or any node below it is an error node
    pub fn contains_error(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.is_error() {
                return true;
            }
            pending.extend(node.children());
        }
        false
    }

    pub fn as_binary(&self) -> Option<&BinaryOperation> {
        match self {
            ExpressionNode::Binary(binary) => Some(binary),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            ExpressionNode::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            ExpressionNode::Identifier(identifier) => Some(identifier),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            ExpressionNode::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    /// Direct children in source order
    pub fn children(&self) -> Vec<&ExpressionNode> {
        match self {
            ExpressionNode::Binary(b) => vec![&*b.left, &*b.right],
            ExpressionNode::Unary(u) => vec![&*u.operand],
            ExpressionNode::Ternary(t) => {
                vec![&*t.condition, &*t.true_branch, &*t.false_branch]
            }
            ExpressionNode::Call(c) => {
                let mut children = Vec::with_capacity(c.arguments.len() + 1);
                if let CallTarget::Constructor(ConstructorType::Dynamic(type_name)) = &c.target {
                    children.push(&**type_name);
                }
                children.extend(c.arguments.iter());
                children
            }
            ExpressionNode::Literal(_)
            | ExpressionNode::Identifier(_)
            | ExpressionNode::SkippedArgument(_)
            | ExpressionNode::Error(_) => Vec::new(),
        }
    }
}

/// Drops children from a local worklist instead of recursing per level
impl Drop for ExpressionNode {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl ExpressionNode {
    fn detach_children(&mut self, out: &mut Vec<ExpressionNode>) {
        fn take(slot: &mut Box<ExpressionNode>) -> ExpressionNode {
            std::mem::replace(&mut **slot, ExpressionNode::skipped_argument(SourceSpan::default()))
        }

        match self {
            ExpressionNode::Binary(b) => {
                out.push(take(&mut b.left));
                out.push(take(&mut b.right));
            }
            ExpressionNode::Unary(u) => out.push(take(&mut u.operand)),
            ExpressionNode::Ternary(t) => {
                out.push(take(&mut t.condition));
                out.push(take(&mut t.true_branch));
                out.push(take(&mut t.false_branch));
            }
            ExpressionNode::Call(c) => {
                if let CallTarget::Constructor(ConstructorType::Dynamic(type_name)) = &mut c.target {
                    out.push(take(type_name));
                }
                out.append(&mut c.arguments);
            }
            ExpressionNode::Literal(_)
            | ExpressionNode::Identifier(_)
            | ExpressionNode::SkippedArgument(_)
            | ExpressionNode::Error(_) => {}
        }
    }
}

impl Call {
    pub fn is_constructor(&self) -> bool {
        matches!(self.target, CallTarget::Constructor(_))
    }

    /// Method name, or the static type name of a constructor
    pub fn name(&self) -> Option<&str> {
        match &self.target {
            CallTarget::Method(method) => Some(&method.name),
            CallTarget::Constructor(ConstructorType::Static(type_name)) => Some(&type_name.name),
            CallTarget::Constructor(ConstructorType::Dynamic(_)) => None,
        }
    }
}

impl TypeName {
    /// The type name as an identifier node, for identifier-only comparers
    pub fn to_identifier(&self) -> ExpressionNode {
        ExpressionNode::identifier(self.name.clone(), self.span)
    }
}
