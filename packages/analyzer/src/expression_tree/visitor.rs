/**
 * Expression Tree Traversal
 *
 * `walk` visits every node in pre-order. `ExpressionVisitor` dispatches on
 * the node kind; every hook defaults to descending into the children, so an
 * implementation only overrides the kinds it cares about.
 */

use super::node::*;

/// Pre-order traversal of `node` and all of its descendants
pub fn walk<'a>(node: &'a ExpressionNode, f: &mut impl FnMut(&'a ExpressionNode)) {
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        f(current);
        // Reversed so the leftmost child is visited first
        stack.extend(current.children().into_iter().rev());
    }
}

pub trait ExpressionVisitor<'a> {
    fn visit_node(&mut self, node: &'a ExpressionNode) {
        match node {
            ExpressionNode::Literal(literal) => self.visit_literal(literal),
            ExpressionNode::Identifier(identifier) => self.visit_identifier(identifier),
            ExpressionNode::Binary(binary) => self.visit_binary(binary),
            ExpressionNode::Unary(unary) => self.visit_unary(unary),
            ExpressionNode::Ternary(ternary) => self.visit_ternary(ternary),
            ExpressionNode::Call(call) => self.visit_call(call),
            ExpressionNode::SkippedArgument(_) | ExpressionNode::Error(_) => {}
        }
    }

    fn visit_literal(&mut self, _literal: &'a Literal) {}

    fn visit_identifier(&mut self, _identifier: &'a Identifier) {}

    fn visit_binary(&mut self, binary: &'a BinaryOperation) {
        self.visit_node(&binary.left);
        self.visit_node(&binary.right);
    }

    fn visit_unary(&mut self, unary: &'a UnaryOperation) {
        self.visit_node(&unary.operand);
    }

    fn visit_ternary(&mut self, ternary: &'a TernaryOperation) {
        self.visit_node(&ternary.condition);
        self.visit_node(&ternary.true_branch);
        self.visit_node(&ternary.false_branch);
    }

    fn visit_call(&mut self, call: &'a Call) {
        if let CallTarget::Constructor(ConstructorType::Dynamic(type_expression)) = &call.target {
            self.visit_node(type_expression);
        }
        for argument in &call.arguments {
            self.visit_node(argument);
        }
    }
}
