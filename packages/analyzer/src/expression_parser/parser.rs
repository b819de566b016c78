/**
 * BSL Expression Parser
 *
 * Recursive descent parser producing the flat, grammar-shaped expression
 * syntax consumed by the expression tree builder. The parser never gives up:
 * every problem is recorded as a `ParseError`, the affected member is marked
 * malformed and parsing resumes.
 */
use super::lexer::{Keyword, Lexer, Token, TokenType};
use super::syntax::*;
use crate::expression_tree::{BslOperator, LiteralKind};
use crate::parse_util::{ParseError, SourceSpan};

/// Nested expressions deeper than this are replaced by an error member
pub const MAX_NESTING_DEPTH: usize = 256;

/// Result of parsing one expression
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub expression: ExpressionSyntax,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parser for BSL expressions
pub struct Parser {
    lexer: Lexer,
}

impl Parser {
    pub fn new() -> Self {
        Parser {
            lexer: Lexer::new(),
        }
    }

    /// Parse a standalone expression
    pub fn parse_expression(&self, input: &str) -> ParseResult {
        self.parse_expression_at(input, 0)
    }

    /// Parse an expression embedded in a larger document starting at `absolute_offset`.
    ///
    /// All spans in the result are absolute.
    pub fn parse_expression_at(&self, input: &str, absolute_offset: usize) -> ParseResult {
        let tokens = self.lexer.tokenize(input);
        let mut parse_ast = ParseAST::new(input, absolute_offset, tokens);
        let mut expression = parse_ast.parse_expression();

        parse_ast.consume_optional_character(';');
        if let Some(token) = parse_ast.current() {
            let message = format!("Unexpected token '{}'", token.str_value);
            parse_ast.record_error(message);
            expression.last_member_mut().malformed = true;
        }

        ParseResult {
            expression,
            errors: parse_ast.errors,
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Internal parser state
struct ParseAST<'a> {
    input: &'a str,
    absolute_offset: usize,
    tokens: Vec<Token>,
    index: usize,
    depth: usize,
    errors: Vec<ParseError>,
}

impl<'a> ParseAST<'a> {
    fn new(input: &'a str, absolute_offset: usize, tokens: Vec<Token>) -> Self {
        ParseAST {
            input,
            absolute_offset,
            tokens,
            index: 0,
            depth: 0,
            errors: Vec::new(),
        }
    }

    fn record_error(&mut self, message: String) {
        let span = match self.current() {
            Some(token) => SourceSpan::new(token.index, token.end),
            None => SourceSpan::empty(self.input.len()),
        };
        self.errors.push(ParseError::new(self.absolute(span), message));
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.index)
    }

    fn advance(&mut self) {
        self.index += 1;
    }

    fn at_character(&self, code: char) -> bool {
        self.current().map_or(false, |token| token.is_character(code))
    }

    fn consume_optional_character(&mut self, code: char) -> bool {
        if self.at_character(code) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume `code` or record an error and flag the enclosing member
    fn expect_character(&mut self, code: char, malformed: &mut bool) {
        if !self.consume_optional_character(code) {
            self.record_error(format!("Expected character '{}'", code));
            *malformed = true;
        }
    }

    /// Parse `member (operation member)*`
    fn parse_expression(&mut self) -> ExpressionSyntax {
        let start = self.input_index();
        let head = self.parse_member();
        let mut tail = Vec::new();

        while let Some(operator) = self.current_binary_operator() {
            let operation_start = self.input_index();
            self.advance();
            let operation = OperationSyntax {
                span: self.span(operation_start),
                operator,
            };
            let member = self.parse_member();
            tail.push((operation, member));
        }

        ExpressionSyntax {
            span: self.span(start),
            head,
            tail,
        }
    }

    /// Parse an expression one nesting level down, guarding the recursion depth
    fn parse_nested_expression(&mut self) -> ExpressionSyntax {
        if self.depth >= MAX_NESTING_DEPTH {
            let start = self.input_index();
            self.record_error("Expression is nested too deeply".to_string());
            self.skip_nested_group();
            return ExpressionSyntax::error(self.span(start));
        }

        self.depth += 1;
        let expression = self.parse_expression();
        self.depth -= 1;
        expression
    }

    /// Skip tokens up to the `)`, `]` or `,` that closes the current group
    fn skip_nested_group(&mut self) {
        let mut balance = 0usize;
        while let Some(token) = self.current() {
            if token.is_character('(') || token.is_character('[') {
                balance += 1;
            } else if token.is_character(')') || token.is_character(']') {
                if balance == 0 {
                    break;
                }
                balance -= 1;
            } else if token.is_character(',') && balance == 0 {
                break;
            }
            self.advance();
        }
    }

    fn current_binary_operator(&self) -> Option<BslOperator> {
        let token = self.current()?;
        match token.token_type {
            TokenType::Operator => match token.str_value.as_str() {
                "+" => Some(BslOperator::Add),
                "-" => Some(BslOperator::Subtract),
                "*" => Some(BslOperator::Multiply),
                "/" => Some(BslOperator::Divide),
                "%" => Some(BslOperator::Modulo),
                "=" => Some(BslOperator::Equal),
                "<>" => Some(BslOperator::NotEqual),
                "<" => Some(BslOperator::Less),
                "<=" => Some(BslOperator::LessOrEqual),
                ">" => Some(BslOperator::Greater),
                ">=" => Some(BslOperator::GreaterOrEqual),
                _ => None,
            },
            TokenType::Keyword => match token.keyword {
                Some(Keyword::And) => Some(BslOperator::And),
                Some(Keyword::Or) => Some(BslOperator::Or),
                _ => None,
            },
            _ => None,
        }
    }

    /// Parse `unary? primary`
    fn parse_member(&mut self) -> MemberSyntax {
        let start = self.input_index();
        let mut malformed = false;

        let unary_operator = match self.current() {
            Some(token) if token.is_operator("+") => Some(BslOperator::UnaryPlus),
            Some(token) if token.is_operator("-") => Some(BslOperator::UnaryMinus),
            Some(token) if token.is_keyword(Keyword::Not) => Some(BslOperator::Not),
            _ => None,
        };
        let unary = unary_operator.map(|operator| {
            let unary_start = self.input_index();
            self.advance();
            UnaryModifierSyntax {
                span: self.span(unary_start),
                operator,
            }
        });

        let primary = self.parse_primary(&mut malformed);

        MemberSyntax {
            span: self.span(start),
            unary,
            primary,
            malformed,
        }
    }

    /// Parse the single primary form of a member
    fn parse_primary(&mut self, malformed: &mut bool) -> Option<PrimarySyntax> {
        let start = self.input_index();

        let token = match self.current() {
            Some(token) => token.clone(),
            None => {
                self.record_error("Unexpected end of expression".to_string());
                *malformed = true;
                return None;
            }
        };

        match token.token_type {
            TokenType::Number => {
                self.advance();
                Some(self.constant(start, LiteralKind::Number))
            }
            TokenType::String => {
                // Adjacent string literals form one constant
                self.advance();
                while self.current().map_or(false, Token::is_string) {
                    self.advance();
                }
                Some(self.constant(start, LiteralKind::String))
            }
            TokenType::Date => {
                self.advance();
                Some(self.constant(start, LiteralKind::Date))
            }
            TokenType::Keyword => match token.keyword {
                Some(Keyword::True) | Some(Keyword::False) => {
                    self.advance();
                    Some(self.constant(start, LiteralKind::Boolean))
                }
                Some(Keyword::Undefined) => {
                    self.advance();
                    Some(self.constant(start, LiteralKind::Undefined))
                }
                Some(Keyword::Null) => {
                    self.advance();
                    Some(self.constant(start, LiteralKind::Null))
                }
                Some(Keyword::Await) => {
                    self.advance();
                    let expression = if self.current().is_some() {
                        Some(Box::new(self.parse_nested_expression()))
                    } else {
                        self.record_error("Expected expression after 'Await'".to_string());
                        *malformed = true;
                        None
                    };
                    Some(PrimarySyntax::Await(AwaitSyntax {
                        span: self.span(start),
                        expression,
                    }))
                }
                Some(Keyword::New) => {
                    let base = ChainBase::New(self.parse_new_expression(malformed));
                    Some(self.parse_complex_identifier(start, base, malformed))
                }
                _ => {
                    self.record_error(format!("Unexpected keyword '{}'", token.str_value));
                    *malformed = true;
                    Some(PrimarySyntax::Error(self.absolute(SourceSpan::new(token.index, token.end))))
                }
            },
            TokenType::Identifier => {
                self.advance();
                let name = NameSyntax {
                    span: self.span(start),
                    text: token.str_value.clone(),
                };
                let base = if self.consume_optional_character('(') {
                    let arguments = self.parse_arguments(malformed);
                    ChainBase::GlobalCall(MethodCallSyntax {
                        span: self.span(start),
                        name,
                        arguments,
                    })
                } else {
                    ChainBase::Identifier(name)
                };
                Some(self.parse_complex_identifier(start, base, malformed))
            }
            TokenType::Operator if token.is_operator("?") => {
                let base = ChainBase::Ternary(self.parse_ternary(malformed));
                Some(self.parse_complex_identifier(start, base, malformed))
            }
            TokenType::Character if token.is_character('(') => {
                self.advance();
                let expression = if self.at_character(')') {
                    None
                } else {
                    Some(Box::new(self.parse_nested_expression()))
                };
                self.expect_character(')', malformed);
                let modifiers = self.parse_modifiers(malformed);
                Some(PrimarySyntax::Parenthesized(ParenthesizedSyntax {
                    span: self.span(start),
                    expression,
                    modifiers,
                }))
            }
            TokenType::Error => {
                self.record_error(token.str_value.clone());
                self.advance();
                *malformed = true;
                Some(PrimarySyntax::Error(self.span(start)))
            }
            _ => {
                self.record_error(format!("Unexpected token '{}'", token.str_value));
                *malformed = true;
                Some(PrimarySyntax::Error(self.absolute(SourceSpan::empty(token.index))))
            }
        }
    }

    fn constant(&self, start: usize, kind: LiteralKind) -> PrimarySyntax {
        let span = self.span(start);
        PrimarySyntax::Constant(ConstantSyntax {
            span,
            kind,
            text: self.relative_text(span).to_string(),
        })
    }

    fn parse_complex_identifier(
        &mut self,
        start: usize,
        base: ChainBase,
        malformed: &mut bool,
    ) -> PrimarySyntax {
        let modifiers = self.parse_modifiers(malformed);
        PrimarySyntax::Complex(ComplexIdentifierSyntax {
            span: self.span(start),
            base,
            modifiers,
        })
    }

    /// Parse `New Type(args)`, `New Type` or `New(typeName, args)`
    fn parse_new_expression(&mut self, malformed: &mut bool) -> NewExpressionSyntax {
        let start = self.input_index();
        self.advance(); // Skip 'New'

        let type_name = match self.current() {
            Some(token) if token.is_identifier() => {
                let name_start = token.index;
                let text = token.str_value.clone();
                self.advance();
                Some(NameSyntax {
                    span: self.span(name_start),
                    text,
                })
            }
            _ => None,
        };

        let arguments = if self.consume_optional_character('(') {
            self.parse_arguments(malformed)
        } else {
            if type_name.is_none() {
                self.record_error("Expected type name or '(' after 'New'".to_string());
                *malformed = true;
            }
            Vec::new()
        };

        NewExpressionSyntax {
            span: self.span(start),
            type_name,
            arguments,
        }
    }

    /// Parse `?(condition, trueBranch, falseBranch)`
    fn parse_ternary(&mut self, malformed: &mut bool) -> TernarySyntax {
        let start = self.input_index();
        self.advance(); // Skip '?'

        if !self.consume_optional_character('(') {
            self.record_error("Expected character '('".to_string());
            *malformed = true;
            return TernarySyntax {
                span: self.span(start),
                condition: None,
                true_branch: None,
                false_branch: None,
            };
        }

        let condition = self.parse_ternary_part(malformed);
        self.expect_character(',', malformed);
        let true_branch = self.parse_ternary_part(malformed);
        self.expect_character(',', malformed);
        let false_branch = self.parse_ternary_part(malformed);
        self.expect_character(')', malformed);

        TernarySyntax {
            span: self.span(start),
            condition,
            true_branch,
            false_branch,
        }
    }

    fn parse_ternary_part(&mut self, malformed: &mut bool) -> Option<Box<ExpressionSyntax>> {
        if self.at_character(',') || self.at_character(')') || self.current().is_none() {
            self.record_error("Expected ternary operand".to_string());
            *malformed = true;
            return None;
        }
        Some(Box::new(self.parse_nested_expression()))
    }

    /// Parse call arguments after the opening parenthesis, including the closing one.
    ///
    /// An empty slot between commas becomes an argument without an expression.
    fn parse_arguments(&mut self, malformed: &mut bool) -> Vec<ArgumentSyntax> {
        let mut arguments = Vec::new();

        if self.consume_optional_character(')') {
            return arguments;
        }

        loop {
            let start = self.input_index();
            let expression = if self.at_character(',') || self.at_character(')') {
                None
            } else {
                Some(self.parse_nested_expression())
            };
            arguments.push(ArgumentSyntax {
                span: self.span(start),
                expression,
            });

            if self.consume_optional_character(',') {
                continue;
            }
            self.expect_character(')', malformed);
            break;
        }

        arguments
    }

    /// Parse `.Name`, `.Method(args)` and `[index]` modifiers
    fn parse_modifiers(&mut self, malformed: &mut bool) -> Vec<ModifierSyntax> {
        let mut modifiers = Vec::new();

        loop {
            let start = self.input_index();
            if self.consume_optional_character('.') {
                let name = match self.current() {
                    Some(token)
                        if token.is_identifier() || token.token_type == TokenType::Keyword =>
                    {
                        let name_start = token.index;
                        let text = token.str_value.clone();
                        self.advance();
                        NameSyntax {
                            span: self.span(name_start),
                            text,
                        }
                    }
                    _ => {
                        self.record_error("Expected property or method name".to_string());
                        *malformed = true;
                        modifiers.push(ModifierSyntax::Error(self.span(start)));
                        break;
                    }
                };

                if self.consume_optional_character('(') {
                    let arguments = self.parse_arguments(malformed);
                    modifiers.push(ModifierSyntax::Call(MethodCallSyntax {
                        span: self.span(name.span.start - self.absolute_offset),
                        name,
                        arguments,
                    }));
                } else {
                    modifiers.push(ModifierSyntax::Property(name));
                }
            } else if self.consume_optional_character('[') {
                let expression = if self.at_character(']') {
                    self.record_error("Expected index expression".to_string());
                    *malformed = true;
                    None
                } else {
                    Some(Box::new(self.parse_nested_expression()))
                };
                self.expect_character(']', malformed);
                modifiers.push(ModifierSyntax::Index(IndexSyntax {
                    span: self.span(start),
                    expression,
                }));
            } else {
                break;
            }
        }

        modifiers
    }

    // Helper methods
    fn input_index(&self) -> usize {
        self.current().map(|t| t.index).unwrap_or(self.input.len())
    }

    /// Absolute span from `start` to the end of the last consumed token.
    ///
    /// Nothing consumed since `start` yields an empty span at `start`.
    fn span(&self, start: usize) -> SourceSpan {
        let end = if self.index > 0 && self.index <= self.tokens.len() {
            self.tokens[self.index - 1].end
        } else {
            start
        };
        self.absolute(SourceSpan::new(start, end.max(start)))
    }

    fn absolute(&self, span: SourceSpan) -> SourceSpan {
        SourceSpan::new(
            self.absolute_offset + span.start,
            self.absolute_offset + span.end,
        )
    }

    fn relative_text(&self, span: SourceSpan) -> &str {
        SourceSpan::new(
            span.start - self.absolute_offset,
            span.end - self.absolute_offset,
        )
        .text(self.input)
    }
}
