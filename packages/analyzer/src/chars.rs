/*
 * Character Codes
 *
 * Character constants and classifiers used by the BSL expression lexer
 */

//! Character constants used throughout the analyzer

// Special characters
pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const LF: char = '\n';
pub const CR: char = '\r';
pub const SPACE: char = ' ';
pub const NBSP: char = '\u{00A0}';

// Punctuation
pub const DQ: char = '"';
pub const SQ: char = '\'';
pub const PERCENT: char = '%';
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const STAR: char = '*';
pub const PLUS: char = '+';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';
pub const QUESTION: char = '?';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const UNDERSCORE: char = '_';

// Digits
pub const ZERO: char = '0';
pub const NINE: char = '9';

/// Check if character is whitespace
pub fn is_whitespace(ch: char) -> bool {
    ch == SPACE || ch == TAB || ch == LF || ch == CR || ch == NBSP || ch.is_whitespace()
}

/// Check if character is a decimal digit
pub fn is_digit(ch: char) -> bool {
    (ZERO..=NINE).contains(&ch)
}

/// Check if character is newline
pub fn is_new_line(ch: char) -> bool {
    ch == LF || ch == CR
}

/// Check if character can start an identifier.
///
/// BSL identifiers accept any Unicode letter, so Cyrillic names are as valid as Latin ones.
pub fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == UNDERSCORE
}

/// Check if character can be part of an identifier
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_numeric()
}

/// Case-insensitive comparison following the language's identifier rule.
///
/// Works on full Unicode lowercase mappings, so `Структура` equals `СТРУКТУРА`.
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    if left.len() == right.len() && left.eq_ignore_ascii_case(right) {
        return true;
    }
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}
