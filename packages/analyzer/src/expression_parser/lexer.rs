/**
 * BSL Expression Lexer
 *
 * Tokenizes BSL expressions into tokens for parsing
 */

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::chars;

/// Token types in BSL expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum TokenType {
    Character = 0,
    Identifier = 1,
    Keyword = 2,
    String = 3,
    Number = 4,
    Date = 5,
    Operator = 6,
    Error = 7,
}

/// Reserved words that matter inside expressions.
///
/// Every keyword has a Russian and an English spelling; both are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Keyword {
    And,
    Or,
    Not,
    New,
    Await,
    True,
    False,
    Undefined,
    Null,
}

static KEYWORDS: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    let mut map = HashMap::new();

    map.insert("and", Keyword::And);
    map.insert("и", Keyword::And);
    map.insert("or", Keyword::Or);
    map.insert("или", Keyword::Or);
    map.insert("not", Keyword::Not);
    map.insert("не", Keyword::Not);
    map.insert("new", Keyword::New);
    map.insert("новый", Keyword::New);
    map.insert("await", Keyword::Await);
    map.insert("ждать", Keyword::Await);
    map.insert("true", Keyword::True);
    map.insert("истина", Keyword::True);
    map.insert("false", Keyword::False);
    map.insert("ложь", Keyword::False);
    map.insert("undefined", Keyword::Undefined);
    map.insert("неопределено", Keyword::Undefined);
    map.insert("null", Keyword::Null);

    map
});

/// Looks up a keyword by its spelling in either language
pub fn keyword(text: &str) -> Option<Keyword> {
    KEYWORDS.get(text.to_lowercase().as_str()).copied()
}

/// Token representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub index: usize,
    pub end: usize,
    pub token_type: TokenType,
    /// Exact source text, or the error message for `TokenType::Error`
    pub str_value: String,
    pub keyword: Option<Keyword>,
}

impl Token {
    pub fn new(index: usize, end: usize, token_type: TokenType, str_value: String) -> Self {
        Token {
            index,
            end,
            token_type,
            str_value,
            keyword: None,
        }
    }

    pub fn operator(index: usize, end: usize, str_value: &str) -> Self {
        Token::new(index, end, TokenType::Operator, str_value.to_string())
    }

    pub fn is_character(&self, code: char) -> bool {
        self.token_type == TokenType::Character && self.str_value.chars().next() == Some(code)
    }

    pub fn is_number(&self) -> bool {
        self.token_type == TokenType::Number
    }

    pub fn is_string(&self) -> bool {
        self.token_type == TokenType::String
    }

    pub fn is_date(&self) -> bool {
        self.token_type == TokenType::Date
    }

    pub fn is_identifier(&self) -> bool {
        self.token_type == TokenType::Identifier
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.token_type == TokenType::Keyword && self.keyword == Some(keyword)
    }

    pub fn is_operator(&self, operator: &str) -> bool {
        self.token_type == TokenType::Operator && self.str_value == operator
    }

    pub fn is_error(&self) -> bool {
        self.token_type == TokenType::Error
    }
}

/// BSL expression lexer
pub struct Lexer;

impl Lexer {
    pub fn new() -> Self {
        Lexer
    }

    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        Scanner::new(text).scan()
    }
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scanner for tokenizing input
struct Scanner<'a> {
    input: &'a str,
    length: usize,
    index: usize,
    peek: char,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        let peek = input.chars().next().unwrap_or(chars::EOF);
        Scanner {
            input,
            length: input.len(),
            index: 0,
            peek,
        }
    }

    fn scan(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        while let Some(token) = self.scan_token() {
            tokens.push(token);
        }
        tokens
    }

    fn advance(&mut self) {
        self.index += self.peek.len_utf8();
        self.peek = if self.index < self.length {
            self.input[self.index..].chars().next().unwrap_or(chars::EOF)
        } else {
            chars::EOF
        };
    }

    fn next_char(&self) -> Option<char> {
        self.input[self.index..].chars().nth(1)
    }

    fn skip_trivia(&mut self) {
        loop {
            while self.index < self.length && chars::is_whitespace(self.peek) {
                self.advance();
            }

            // Line comment
            if self.peek == chars::SLASH && self.next_char() == Some(chars::SLASH) {
                while self.index < self.length && !chars::is_new_line(self.peek) {
                    self.advance();
                }
                continue;
            }

            break;
        }
    }

    fn scan_token(&mut self) -> Option<Token> {
        self.skip_trivia();

        if self.index >= self.length {
            return None;
        }

        let start = self.index;
        let ch = self.peek;

        if chars::is_identifier_start(ch) {
            return Some(self.scan_identifier());
        }

        if chars::is_digit(ch) {
            return Some(self.scan_number(start));
        }

        let token = match ch {
            chars::LPAREN
            | chars::RPAREN
            | chars::LBRACKET
            | chars::RBRACKET
            | chars::COMMA
            | chars::PERIOD
            | chars::SEMICOLON => self.scan_character(start, ch),
            chars::DQ => self.scan_string(start),
            chars::SQ => self.scan_date(start),
            chars::PLUS => self.scan_operator(start, "+"),
            chars::MINUS => self.scan_operator(start, "-"),
            chars::STAR => self.scan_operator(start, "*"),
            chars::SLASH => self.scan_operator(start, "/"),
            chars::PERCENT => self.scan_operator(start, "%"),
            chars::EQ => self.scan_operator(start, "="),
            chars::QUESTION => self.scan_operator(start, "?"),
            chars::LT => {
                self.advance();
                if self.peek == chars::GT {
                    self.advance();
                    Token::operator(start, self.index, "<>")
                } else if self.peek == chars::EQ {
                    self.advance();
                    Token::operator(start, self.index, "<=")
                } else {
                    Token::operator(start, self.index, "<")
                }
            }
            chars::GT => {
                self.advance();
                if self.peek == chars::EQ {
                    self.advance();
                    Token::operator(start, self.index, ">=")
                } else {
                    Token::operator(start, self.index, ">")
                }
            }
            _ => {
                self.advance();
                Token::new(
                    start,
                    self.index,
                    TokenType::Error,
                    format!("Lexer Error: Invalid character [{}] at column {}", ch, start),
                )
            }
        };

        Some(token)
    }

    fn scan_character(&mut self, start: usize, ch: char) -> Token {
        self.advance();
        Token::new(start, self.index, TokenType::Character, ch.to_string())
    }

    fn scan_operator(&mut self, start: usize, op: &str) -> Token {
        self.advance();
        Token::operator(start, self.index, op)
    }

    fn scan_identifier(&mut self) -> Token {
        let start = self.index;
        self.advance();

        while self.index < self.length && chars::is_identifier_part(self.peek) {
            self.advance();
        }

        let str_value = self.input[start..self.index].to_string();
        match keyword(&str_value) {
            Some(kw) => {
                let mut token = Token::new(start, self.index, TokenType::Keyword, str_value);
                token.keyword = Some(kw);
                token
            }
            None => Token::new(start, self.index, TokenType::Identifier, str_value),
        }
    }

    fn scan_number(&mut self, start: usize) -> Token {
        while self.index < self.length && chars::is_digit(self.peek) {
            self.advance();
        }

        // Fractional part only when a digit follows the period, so `1.Foo` stays an access
        if self.peek == chars::PERIOD && self.next_char().map_or(false, chars::is_digit) {
            self.advance();
            while self.index < self.length && chars::is_digit(self.peek) {
                self.advance();
            }
        }

        Token::new(
            start,
            self.index,
            TokenType::Number,
            self.input[start..self.index].to_string(),
        )
    }

    fn scan_string(&mut self, start: usize) -> Token {
        self.advance(); // Skip opening quote

        while self.index < self.length {
            if self.peek == chars::DQ {
                self.advance();
                // A doubled quote is an escaped quote inside the literal
                if self.peek == chars::DQ {
                    self.advance();
                    continue;
                }
                return Token::new(
                    start,
                    self.index,
                    TokenType::String,
                    self.input[start..self.index].to_string(),
                );
            }
            self.advance();
        }

        Token::new(
            start,
            self.index,
            TokenType::Error,
            format!("Lexer Error: Unterminated string at column {}", start),
        )
    }

    fn scan_date(&mut self, start: usize) -> Token {
        self.advance(); // Skip opening quote

        while self.index < self.length && self.peek != chars::SQ {
            if chars::is_new_line(self.peek) {
                break;
            }
            self.advance();
        }

        if self.peek != chars::SQ {
            return Token::new(
                start,
                self.index,
                TokenType::Error,
                format!("Lexer Error: Unterminated date literal at column {}", start),
            );
        }

        self.advance();
        Token::new(
            start,
            self.index,
            TokenType::Date,
            self.input[start..self.index].to_string(),
        )
    }
}
