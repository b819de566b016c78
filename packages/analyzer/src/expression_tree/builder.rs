/**
 * Expression Tree Builder
 *
 * Resolves operator precedence over the flat member/operation sequence
 * produced by the expression parser. Each nesting level owns two stacks:
 * pending operators and built operands. An incoming operator first collapses
 * every pending operator of strictly greater priority, so operators of the
 * same tier group to the right (`2 - 3 - 4` is `2 - (3 - 4)`).
 */

use smallvec::SmallVec;

use super::node::{
    BinaryOperation, ConstructorType, ExpressionNode, MethodName, TypeName,
};
use super::operator::BslOperator;
use crate::expression_parser::syntax::{
    ArgumentSyntax, ChainBase, ComplexIdentifierSyntax, ExpressionSyntax, MemberSyntax,
    MethodCallSyntax, ModifierSyntax, NewExpressionSyntax, ParenthesizedSyntax, PrimarySyntax,
    TernarySyntax,
};
use crate::expression_parser::MAX_NESTING_DEPTH;
use crate::parse_util::SourceSpan;

/// Builds the expression tree of a parsed expression.
///
/// Malformed input never fails: the offending member or sub-expression is
/// replaced by an `Error` node.
#[tracing::instrument(level = "trace", skip_all, fields(span = ?syntax.span))]
pub fn build_expression_tree(syntax: &ExpressionSyntax) -> ExpressionNode {
    ExpressionTreeBuilder::new().build(syntax)
}

#[derive(Debug, Clone, Copy)]
enum PendingOperator {
    Binary(BslOperator),
    Unary { operator: BslOperator, span: SourceSpan },
}

impl PendingOperator {
    fn priority(self) -> u8 {
        match self {
            PendingOperator::Binary(operator) => operator.priority(),
            PendingOperator::Unary { operator, .. } => operator.priority(),
        }
    }
}

/// Operator and operand stacks of one nesting level
#[derive(Default)]
struct Level {
    operators: SmallVec<[PendingOperator; 8]>,
    operands: SmallVec<[ExpressionNode; 8]>,
}

impl Level {
    fn collapse_top(&mut self) {
        let Some(pending) = self.operators.pop() else {
            return;
        };
        let node = match pending {
            PendingOperator::Binary(operator) => {
                let right = self.pop_operand();
                let left = self.pop_operand();
                ExpressionNode::binary(operator, left, right)
            }
            PendingOperator::Unary { operator, span } => {
                let operand = self.pop_operand();
                let span = span.cover(operand.span());
                ExpressionNode::unary(operator, operand, span)
            }
        };
        self.operands.push(node);
    }

    /// Collapses pending operators whose priority is strictly greater than `priority`
    fn collapse_above(&mut self, priority: u8) {
        while let Some(top) = self.operators.last() {
            if top.priority() <= priority {
                break;
            }
            self.collapse_top();
        }
    }

    fn collapse_all(&mut self) {
        while !self.operators.is_empty() {
            self.collapse_top();
        }
    }

    fn pop_operand(&mut self) -> ExpressionNode {
        // Only reachable on an unbalanced sequence, which the builder never produces
        self.operands
            .pop()
            .unwrap_or_else(|| ExpressionNode::error(SourceSpan::default()))
    }
}

/// Single-use builder; tracks the nesting depth of the expression it builds
pub struct ExpressionTreeBuilder {
    depth: usize,
}

impl Default for ExpressionTreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionTreeBuilder {
    pub fn new() -> Self {
        ExpressionTreeBuilder { depth: 0 }
    }

    pub fn build(mut self, syntax: &ExpressionSyntax) -> ExpressionNode {
        self.visit_expression(syntax)
    }

    fn visit_expression(&mut self, syntax: &ExpressionSyntax) -> ExpressionNode {
        // The outermost expression sits at depth zero, like in the parser
        if self.depth > MAX_NESTING_DEPTH {
            tracing::debug!(span = ?syntax.span, "expression nesting limit reached");
            return ExpressionNode::error(syntax.span);
        }
        self.depth += 1;

        let mut level = Level::default();
        self.visit_member(&syntax.head, &mut level);
        for (operation, member) in &syntax.tail {
            level.collapse_above(operation.operator.priority());
            level.operators.push(PendingOperator::Binary(operation.operator));
            self.visit_member(member, &mut level);
        }
        level.collapse_all();

        self.depth -= 1;

        let result = level.operands.pop();
        debug_assert!(level.operands.is_empty());
        result.unwrap_or_else(|| ExpressionNode::error(syntax.span))
    }

    fn visit_member(&mut self, member: &MemberSyntax, level: &mut Level) {
        if member.is_malformed() {
            level.operands.push(ExpressionNode::error(member.span));
            return;
        }

        if let Some(unary) = member.unary {
            level.operators.push(PendingOperator::Unary {
                operator: unary.operator,
                span: unary.span,
            });
        }

        let node = match &member.primary {
            Some(primary) => self.visit_primary(primary),
            None => ExpressionNode::error(member.span),
        };
        level.operands.push(node);

        if member.unary.is_some() {
            level.collapse_top();
        }
    }

    fn visit_primary(&mut self, primary: &PrimarySyntax) -> ExpressionNode {
        match primary {
            PrimarySyntax::Constant(constant) => {
                ExpressionNode::literal(constant.kind, constant.text.clone(), constant.span)
            }
            PrimarySyntax::Complex(complex) => self.visit_complex(complex),
            PrimarySyntax::Parenthesized(group) => self.visit_parenthesized(group),
            PrimarySyntax::Await(await_syntax) => {
                self.visit_optional(await_syntax.expression.as_deref(), await_syntax.span)
            }
            PrimarySyntax::Error(span) => ExpressionNode::error(*span),
        }
    }

    fn visit_optional(
        &mut self,
        syntax: Option<&ExpressionSyntax>,
        fallback: SourceSpan,
    ) -> ExpressionNode {
        match syntax {
            Some(expression) => self.visit_expression(expression),
            None => ExpressionNode::error(fallback),
        }
    }

    fn visit_complex(&mut self, complex: &ComplexIdentifierSyntax) -> ExpressionNode {
        let base = match &complex.base {
            ChainBase::Identifier(name) => ExpressionNode::identifier(name.text.clone(), name.span),
            ChainBase::GlobalCall(call) => self.visit_method_call(call),
            ChainBase::New(new_expression) => self.visit_new(new_expression),
            ChainBase::Ternary(ternary) => self.visit_ternary(ternary),
        };
        self.apply_modifiers(base, &complex.modifiers)
    }

    fn visit_parenthesized(&mut self, group: &ParenthesizedSyntax) -> ExpressionNode {
        let Some(expression) = &group.expression else {
            return ExpressionNode::error(group.span);
        };
        let inner = self.visit_expression(expression);
        self.apply_modifiers(inner, &group.modifiers)
    }

    /// Folds an access chain left to right into `Dereference`/`IndexAccess` nodes
    fn apply_modifiers(
        &mut self,
        mut target: ExpressionNode,
        modifiers: &[ModifierSyntax],
    ) -> ExpressionNode {
        for modifier in modifiers {
            let (operator, accessor) = match modifier {
                ModifierSyntax::Property(name) => (
                    BslOperator::Dereference,
                    ExpressionNode::identifier(name.text.clone(), name.span),
                ),
                ModifierSyntax::Call(call) => {
                    (BslOperator::Dereference, self.visit_method_call(call))
                }
                ModifierSyntax::Index(index) => (
                    BslOperator::IndexAccess,
                    self.visit_optional(index.expression.as_deref(), index.span),
                ),
                ModifierSyntax::Error(span) => return ExpressionNode::error(*span),
            };
            let span = target.span().cover(modifier.span());
            target = ExpressionNode::Binary(BinaryOperation {
                span,
                operator,
                left: Box::new(target),
                right: Box::new(accessor),
            });
        }
        target
    }

    fn visit_method_call(&mut self, call: &MethodCallSyntax) -> ExpressionNode {
        let name = MethodName {
            span: call.name.span,
            name: call.name.text.clone(),
        };
        let arguments = self.visit_arguments(&call.arguments);
        ExpressionNode::method_call(name, arguments, call.span)
    }

    fn visit_arguments(&mut self, arguments: &[ArgumentSyntax]) -> Vec<ExpressionNode> {
        arguments
            .iter()
            .map(|argument| match &argument.expression {
                Some(expression) => self.visit_expression(expression),
                None => ExpressionNode::skipped_argument(argument.span),
            })
            .collect()
    }

    fn visit_new(&mut self, new_expression: &NewExpressionSyntax) -> ExpressionNode {
        if let Some(type_name) = &new_expression.type_name {
            let constructor = ConstructorType::Static(TypeName {
                span: type_name.span,
                name: type_name.text.clone(),
            });
            let arguments = self.visit_arguments(&new_expression.arguments);
            return ExpressionNode::constructor_call(constructor, arguments, new_expression.span);
        }

        // `New(typeName, arguments...)`: the first slot is the type expression
        let Some((first, rest)) = new_expression.arguments.split_first() else {
            return ExpressionNode::error(new_expression.span);
        };
        let Some(type_expression) = &first.expression else {
            return ExpressionNode::error(new_expression.span);
        };
        let type_node = self.visit_expression(type_expression);
        let arguments = self.visit_arguments(rest);
        ExpressionNode::constructor_call(
            ConstructorType::Dynamic(Box::new(type_node)),
            arguments,
            new_expression.span,
        )
    }

    fn visit_ternary(&mut self, ternary: &TernarySyntax) -> ExpressionNode {
        let condition = self.visit_optional(ternary.condition.as_deref(), ternary.span);
        let true_branch = self.visit_optional(ternary.true_branch.as_deref(), ternary.span);
        let false_branch = self.visit_optional(ternary.false_branch.as_deref(), ternary.span);
        ExpressionNode::ternary(condition, true_branch, false_branch, ternary.span)
    }
}
