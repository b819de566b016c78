/**
 * BSL Expression Syntax
 *
 * Grammar-shaped parse of a single expression: a first member followed by
 * `(operation, member)` pairs in source order. This is the input of the
 * expression tree builder; it keeps every token's span and marks the places
 * where the parser had to recover from an error.
 */

use serde::{Deserialize, Serialize};

use crate::expression_tree::{BslOperator, LiteralKind};
use crate::parse_util::SourceSpan;

/// A flat expression: `head (operation member)*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionSyntax {
    pub span: SourceSpan,
    pub head: MemberSyntax,
    pub tail: Vec<(OperationSyntax, MemberSyntax)>,
}

impl ExpressionSyntax {
    /// An expression consisting of a single unparsable member
    pub fn error(span: SourceSpan) -> Self {
        ExpressionSyntax {
            span,
            head: MemberSyntax {
                span,
                unary: None,
                primary: Some(PrimarySyntax::Error(span)),
                malformed: true,
            },
            tail: Vec::new(),
        }
    }

    pub fn members(&self) -> impl Iterator<Item = &MemberSyntax> {
        std::iter::once(&self.head).chain(self.tail.iter().map(|(_, member)| member))
    }

    pub fn last_member_mut(&mut self) -> &mut MemberSyntax {
        match self.tail.last_mut() {
            Some((_, member)) => member,
            None => &mut self.head,
        }
    }
}

/// Binary operator token between two members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationSyntax {
    pub span: SourceSpan,
    pub operator: BslOperator,
}

/// Leading `+`, `-` or `NOT` of a member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnaryModifierSyntax {
    pub span: SourceSpan,
    pub operator: BslOperator,
}

/// One operand-producing unit of the flat sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberSyntax {
    pub span: SourceSpan,
    pub unary: Option<UnaryModifierSyntax>,
    pub primary: Option<PrimarySyntax>,
    /// Set when the parser recovered from an error inside this member's own tokens
    pub malformed: bool,
}

impl MemberSyntax {
    /// True when the member cannot be turned into a meaningful node.
    ///
    /// Nested expressions (parentheses, arguments, indexes) are not inspected here;
    /// they degrade on their own when the builder reaches them.
    pub fn is_malformed(&self) -> bool {
        if self.malformed {
            return true;
        }
        match &self.primary {
            None | Some(PrimarySyntax::Error(_)) => true,
            Some(PrimarySyntax::Complex(complex)) => {
                complex.modifiers.iter().any(ModifierSyntax::is_error)
            }
            Some(PrimarySyntax::Parenthesized(group)) => {
                group.modifiers.iter().any(ModifierSyntax::is_error)
            }
            Some(PrimarySyntax::Constant(_)) | Some(PrimarySyntax::Await(_)) => false,
        }
    }
}

/// Exactly one primary form of a member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PrimarySyntax {
    Constant(ConstantSyntax),
    Complex(ComplexIdentifierSyntax),
    Parenthesized(ParenthesizedSyntax),
    Await(AwaitSyntax),
    Error(SourceSpan),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstantSyntax {
    pub span: SourceSpan,
    pub kind: LiteralKind,
    pub text: String,
}

/// Plain name token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameSyntax {
    pub span: SourceSpan,
    pub text: String,
}

/// A chain base followed by access modifiers, e.g. `Items[0].Name` or `F(1).G()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexIdentifierSyntax {
    pub span: SourceSpan,
    pub base: ChainBase,
    pub modifiers: Vec<ModifierSyntax>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChainBase {
    Identifier(NameSyntax),
    GlobalCall(MethodCallSyntax),
    New(NewExpressionSyntax),
    Ternary(TernarySyntax),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierSyntax {
    /// `.Name`
    Property(NameSyntax),
    /// `[expression]`
    Index(IndexSyntax),
    /// `.Method(arguments)`
    Call(MethodCallSyntax),
    Error(SourceSpan),
}

impl ModifierSyntax {
    pub fn is_error(&self) -> bool {
        matches!(self, ModifierSyntax::Error(_))
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            ModifierSyntax::Property(name) => name.span,
            ModifierSyntax::Index(index) => index.span,
            ModifierSyntax::Call(call) => call.span,
            ModifierSyntax::Error(span) => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSyntax {
    pub span: SourceSpan,
    /// `None` when the brackets are empty
    pub expression: Option<Box<ExpressionSyntax>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCallSyntax {
    pub span: SourceSpan,
    pub name: NameSyntax,
    pub arguments: Vec<ArgumentSyntax>,
}

/// One positional argument slot; `expression` is `None` for an elided argument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArgumentSyntax {
    pub span: SourceSpan,
    pub expression: Option<ExpressionSyntax>,
}

/// `New Type(arguments)` or `New(typeName, arguments)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpressionSyntax {
    pub span: SourceSpan,
    pub type_name: Option<NameSyntax>,
    pub arguments: Vec<ArgumentSyntax>,
}

/// `?(condition, trueBranch, falseBranch)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TernarySyntax {
    pub span: SourceSpan,
    pub condition: Option<Box<ExpressionSyntax>>,
    pub true_branch: Option<Box<ExpressionSyntax>>,
    pub false_branch: Option<Box<ExpressionSyntax>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParenthesizedSyntax {
    pub span: SourceSpan,
    pub expression: Option<Box<ExpressionSyntax>>,
    pub modifiers: Vec<ModifierSyntax>,
}

/// `Await expression`; the awaited expression is passed through unchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AwaitSyntax {
    pub span: SourceSpan,
    pub expression: Option<Box<ExpressionSyntax>>,
}
