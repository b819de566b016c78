/**
 * Expression Tree Serializer
 *
 * Renders a tree back to BSL-like text. Every non-access binary and unary
 * operation is parenthesized, so the output shows the grouping the builder
 * chose: `2 + 3 * 4` serializes as `(2 + (3 * 4))`.
 */

use super::node::*;
use super::operator::BslOperator;

/// Serialize a tree to its fully parenthesized form
pub fn serialize(node: &ExpressionNode) -> String {
    let mut serializer = Serializer {
        out: String::new(),
        pending: vec![Piece::Node(node)],
    };
    while let Some(piece) = serializer.pending.pop() {
        match piece {
            Piece::Text(text) => serializer.out.push_str(text),
            Piece::Node(node) => serializer.visit(node),
        }
    }
    serializer.out
}

enum Piece<'a> {
    Node(&'a ExpressionNode),
    Text(&'a str),
}

/// Output plus a stack of pieces still to write, top last
struct Serializer<'a> {
    out: String,
    pending: Vec<Piece<'a>>,
}

impl<'a> Serializer<'a> {
    /// Schedules `pieces` to be written in the given order
    fn then(&mut self, pieces: impl DoubleEndedIterator<Item = Piece<'a>>) {
        self.pending.extend(pieces.rev());
    }

    fn visit(&mut self, node: &'a ExpressionNode) {
        match node {
            ExpressionNode::Literal(literal) => self.out.push_str(&literal.text),
            ExpressionNode::Identifier(identifier) => self.out.push_str(&identifier.name),
            ExpressionNode::Binary(binary) => self.visit_binary(binary),
            ExpressionNode::Unary(unary) => self.visit_unary(unary),
            ExpressionNode::Ternary(ternary) => self.visit_ternary(ternary),
            ExpressionNode::Call(call) => self.visit_call(call),
            ExpressionNode::SkippedArgument(_) => {}
            ExpressionNode::Error(_) => self.out.push_str("<error>"),
        }
    }

    fn visit_binary(&mut self, binary: &'a BinaryOperation) {
        let left = Piece::Node(&binary.left);
        let right = Piece::Node(&binary.right);
        match binary.operator {
            BslOperator::Dereference => self.then([left, Piece::Text("."), right].into_iter()),
            BslOperator::IndexAccess => {
                self.then([left, Piece::Text("["), right, Piece::Text("]")].into_iter())
            }
            operator => {
                self.out.push('(');
                self.then(
                    [
                        left,
                        Piece::Text(" "),
                        Piece::Text(operator.symbol()),
                        Piece::Text(" "),
                        right,
                        Piece::Text(")"),
                    ]
                    .into_iter(),
                );
            }
        }
    }

    fn visit_unary(&mut self, unary: &'a UnaryOperation) {
        self.out.push('(');
        self.out.push_str(unary.operator.symbol());
        if unary.operator == BslOperator::Not {
            self.out.push(' ');
        }
        self.then([Piece::Node(&unary.operand), Piece::Text(")")].into_iter());
    }

    fn visit_ternary(&mut self, ternary: &'a TernaryOperation) {
        self.out.push_str("?(");
        self.then(
            [
                Piece::Node(&ternary.condition),
                Piece::Text(", "),
                Piece::Node(&ternary.true_branch),
                Piece::Text(", "),
                Piece::Node(&ternary.false_branch),
                Piece::Text(")"),
            ]
            .into_iter(),
        );
    }

    fn visit_call(&mut self, call: &'a Call) {
        match &call.target {
            CallTarget::Method(method) => {
                self.out.push_str(&method.name);
                self.out.push('(');
                self.visit_arguments(&call.arguments, false);
            }
            CallTarget::Constructor(ConstructorType::Static(type_name)) => {
                self.out.push_str("New ");
                self.out.push_str(&type_name.name);
                self.out.push('(');
                self.visit_arguments(&call.arguments, false);
            }
            CallTarget::Constructor(ConstructorType::Dynamic(type_expression)) => {
                self.out.push_str("New(");
                self.visit_arguments(&call.arguments, true);
                self.pending.push(Piece::Node(type_expression));
            }
        }
    }

    /// Schedules the argument list and the closing parenthesis.
    /// With `continued`, a leading item precedes the first argument.
    fn visit_arguments(&mut self, arguments: &'a [ExpressionNode], continued: bool) {
        self.pending.push(Piece::Text(")"));
        for (index, argument) in arguments.iter().enumerate().rev() {
            self.pending.push(Piece::Node(argument));
            if continued || index > 0 {
                self.pending.push(Piece::Text(", "));
            }
        }
    }
}
