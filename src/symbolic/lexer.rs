//! Tokenizer for the integrand/bound expression language.
//!
//! Produces a flat token stream and then inserts the implicit multiplications
//! a user writes without thinking: `2x`, `x(y)`, `(x+1)(x-1)`, `3sin(x)`.
use std::fmt;

/// Operator and punctuation symbols of the language
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Symbol {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Symbol {
    fn from_char(c: char) -> Option<Symbol> {
        match c {
            '+' => Some(Symbol::Plus),
            '-' => Some(Symbol::Minus),
            '*' => Some(Symbol::Star),
            '/' => Some(Symbol::Slash),
            '^' => Some(Symbol::Caret),
            '(' => Some(Symbol::LParen),
            ')' => Some(Symbol::RParen),
            ',' => Some(Symbol::Comma),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        match self {
            Symbol::Plus => '+',
            Symbol::Minus => '-',
            Symbol::Star => '*',
            Symbol::Slash => '/',
            Symbol::Caret => '^',
            Symbol::LParen => '(',
            Symbol::RParen => ')',
            Symbol::Comma => ',',
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    Number(f64),
    Identifier(String),
    Symbol(Symbol),
}

impl Token {
    /// number, identifier or closing bracket: something a product can follow
    fn is_value_like(&self) -> bool {
        matches!(
            self,
            Token::Number(_) | Token::Identifier(_) | Token::Symbol(Symbol::RParen)
        )
    }

    /// identifier or opening bracket: something that can start a factor
    fn is_value_starting(&self) -> bool {
        matches!(self, Token::Identifier(_) | Token::Symbol(Symbol::LParen))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Number(val) => write!(f, "{}", val),
            Token::Identifier(name) => write!(f, "{}", name),
            Token::Symbol(sym) => write!(f, "{}", sym.as_char()),
        }
    }
}

/// Error raised for characters outside the language alphabet
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    UnknownCharacter { ch: char, position: usize },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LexError::UnknownCharacter { ch, position } => {
                write!(f, "Unknown character '{}' at position {}", ch, position)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// An identifier longer than one character written directly before `(` is a
/// function call (`sin(x)`, `foo(x)`); a single letter is a factor (`x(y)`).
fn is_call_head(name: &str) -> bool {
    name.chars().count() > 1
}

/// turn an expression string into tokens, implicit multiplication included
pub fn tokenize(src: &str) -> Result<Vec<Token>, LexError> {
    let chars: Vec<char> = src.chars().collect();
    let mut raw: Vec<Token> = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
            continue;
        }
        let starts_number =
            c.is_ascii_digit() || (c == '.' && chars.get(i + 1).is_some_and(|n| n.is_ascii_digit()));
        if starts_number {
            let start = i;
            let mut seen_dot = false;
            while i < chars.len() {
                let d = chars[i];
                if d.is_ascii_digit() {
                    i += 1;
                } else if d == '.' && !seen_dot {
                    seen_dot = true;
                    i += 1;
                } else {
                    break;
                }
            }
            let literal: String = chars[start..i].iter().collect();
            // "3." is accepted as 3.0
            let value = literal
                .trim_end_matches('.')
                .parse::<f64>()
                .map_err(|_| LexError::UnknownCharacter { ch: c, position: start })?;
            raw.push(Token::Number(value));
            continue;
        }
        if c.is_ascii_alphabetic() || c == '_' {
            let start = i;
            while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                i += 1;
            }
            raw.push(Token::Identifier(chars[start..i].iter().collect()));
            continue;
        }
        match Symbol::from_char(c) {
            Some(sym) => {
                raw.push(Token::Symbol(sym));
                i += 1;
            }
            None => return Err(LexError::UnknownCharacter { ch: c, position: i }),
        }
    }
    Ok(insert_implicit_multiplication(raw))
}

fn insert_implicit_multiplication(raw: Vec<Token>) -> Vec<Token> {
    let mut out = Vec::with_capacity(raw.len() * 2);
    let mut iter = raw.into_iter().peekable();
    while let Some(current) = iter.next() {
        let insert = match iter.peek() {
            Some(next) if current.is_value_like() && next.is_value_starting() => {
                let is_call = matches!(
                    (&current, next),
                    (Token::Identifier(name), Token::Symbol(Symbol::LParen)) if is_call_head(name)
                );
                !is_call
            }
            _ => false,
        };
        out.push(current);
        if insert {
            out.push(Token::Symbol(Symbol::Star));
        }
    }
    out
}
