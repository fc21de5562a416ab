//! Arithmetic expression evaluator backing `calculate_math`.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/' | '//' | '%') unary)*
//! unary := ('+' | '-') unary | power
//! power := atom ('**' unary)?
//! atom  := number | name '(' args? ')' | '(' expr ')'
//! ```
//!
//! `**` is right-associative and binds tighter than a leading sign, so
//! `-2 ** 2` is `-4`. `//` and `%` floor toward negative infinity.

use std::fmt;

use crate::error::CalcError;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Name(String),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Power,
    LParen,
    RParen,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Num(n) => f.write_str(&format_number(*n)),
            Self::Name(name) => f.write_str(name),
            Self::Plus => f.write_str("+"),
            Self::Minus => f.write_str("-"),
            Self::Star => f.write_str("*"),
            Self::Slash => f.write_str("/"),
            Self::DoubleSlash => f.write_str("//"),
            Self::Percent => f.write_str("%"),
            Self::Power => f.write_str("**"),
            Self::LParen => f.write_str("("),
            Self::RParen => f.write_str(")"),
            Self::Comma => f.write_str(","),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < chars.len() {
        let ch = chars[pos];
        let next = chars.get(pos + 1).copied();

        if ch.is_whitespace() {
            pos += 1;
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                pos += 1;
            }
            if pos < chars.len() && matches!(chars[pos], 'e' | 'E') {
                let mut lookahead = pos + 1;
                if matches!(chars.get(lookahead), Some('+' | '-')) {
                    lookahead += 1;
                }
                if chars.get(lookahead).is_some_and(char::is_ascii_digit) {
                    pos = lookahead;
                    while pos < chars.len() && chars[pos].is_ascii_digit() {
                        pos += 1;
                    }
                }
            }
            let literal: String = chars[start..pos].iter().collect();
            let value = literal
                .parse::<f64>()
                .map_err(|_| CalcError::InvalidNumber(literal.clone()))?;
            tokens.push(Token::Num(value));
            continue;
        }

        if ch.is_ascii_alphabetic() || ch == '_' {
            let start = pos;
            while pos < chars.len() && (chars[pos].is_ascii_alphanumeric() || chars[pos] == '_') {
                pos += 1;
            }
            tokens.push(Token::Name(chars[start..pos].iter().collect()));
            continue;
        }

        let (token, width) = match (ch, next) {
            ('*', Some('*')) => (Token::Power, 2),
            ('/', Some('/')) => (Token::DoubleSlash, 2),
            ('+', _) => (Token::Plus, 1),
            ('-', _) => (Token::Minus, 1),
            ('*', _) => (Token::Star, 1),
            ('/', _) => (Token::Slash, 1),
            ('%', _) => (Token::Percent, 1),
            ('(', _) => (Token::LParen, 1),
            (')', _) => (Token::RParen, 1),
            (',', _) => (Token::Comma, 1),
            _ => return Err(CalcError::UnexpectedChar { ch, pos }),
        };
        tokens.push(token);
        pos += width;
    }

    Ok(tokens)
}

/// Deepest nesting of parentheses, signs and exponents accepted.
pub const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn expect(&mut self, expected: Token) -> Result<(), CalcError> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            Some(token) => Err(CalcError::UnexpectedToken(token.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            let op = match self.peek() {
                Some(op @ (Token::Star | Token::Slash | Token::DoubleSlash | Token::Percent)) => {
                    op.clone()
                }
                _ => return Ok(value),
            };
            self.pos += 1;
            let rhs = self.unary()?;
            value = match op {
                Token::Star => value * rhs,
                Token::Slash => divide(value, rhs)?,
                Token::DoubleSlash => divide(value, rhs)?.floor(),
                _ => floor_mod(value, rhs)?,
            };
        }
    }

    /// Every recursive path passes through here, so nesting is bounded here.
    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, CalcError> {
        match self.peek() {
            Some(Token::Plus) => {
                self.pos += 1;
                self.unary()
            }
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, CalcError> {
        let base = self.atom()?;
        if self.peek() != Some(&Token::Power) {
            return Ok(base);
        }
        self.pos += 1;
        let exponent = self.unary()?;

        if base == 0.0 && exponent < 0.0 {
            return Err(CalcError::DivisionByZero);
        }
        if base < 0.0 && exponent.fract() != 0.0 {
            return Err(CalcError::Domain);
        }
        Ok(base.powf(exponent))
    }

    fn atom(&mut self) -> Result<f64, CalcError> {
        match self.next() {
            Some(Token::Num(value)) => Ok(value),
            Some(Token::LParen) => {
                let value = self.expr()?;
                self.expect(Token::RParen)?;
                Ok(value)
            }
            Some(Token::Name(name)) => {
                if self.peek() != Some(&Token::LParen) {
                    return Err(CalcError::UnknownName(name));
                }
                self.pos += 1;
                let args = self.arguments()?;
                call(&name, &args)
            }
            Some(token) => Err(CalcError::UnexpectedToken(token.to_string())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    /// Comma-separated arguments up to and including the closing paren.
    fn arguments(&mut self) -> Result<Vec<f64>, CalcError> {
        let mut args = Vec::new();
        if self.peek() == Some(&Token::RParen) {
            self.pos += 1;
            return Ok(args);
        }
        loop {
            args.push(self.expr()?);
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::RParen) => return Ok(args),
                Some(token) => return Err(CalcError::UnexpectedToken(token.to_string())),
                None => return Err(CalcError::UnexpectedEnd),
            }
        }
    }
}

fn divide(lhs: f64, rhs: f64) -> Result<f64, CalcError> {
    if rhs == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    Ok(lhs / rhs)
}

fn floor_mod(lhs: f64, rhs: f64) -> Result<f64, CalcError> {
    if rhs == 0.0 {
        return Err(CalcError::DivisionByZero);
    }
    let rem = lhs % rhs;
    if rem != 0.0 && (rem < 0.0) != (rhs < 0.0) {
        Ok(rem + rhs)
    } else {
        Ok(rem)
    }
}

fn call(name: &str, args: &[f64]) -> Result<f64, CalcError> {
    match (name, args) {
        ("abs", [x]) => Ok(x.abs()),
        ("abs", _) => Err(arity("abs", "1 argument", args)),
        ("sqrt", [x]) if *x < 0.0 => Err(CalcError::Domain),
        ("sqrt", [x]) => Ok(x.sqrt()),
        ("sqrt", _) => Err(arity("sqrt", "1 argument", args)),
        ("round", [x]) => Ok(x.round_ties_even()),
        ("round", [x, digits]) => {
            let scale = 10f64.powi(digits.trunc() as i32);
            Ok((x * scale).round_ties_even() / scale)
        }
        ("round", _) => Err(arity("round", "1 or 2 arguments", args)),
        ("min", [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::min)),
        ("max", [first, rest @ ..]) => Ok(rest.iter().copied().fold(*first, f64::max)),
        ("min", []) => Err(arity("min", "at least 1 argument", args)),
        ("max", []) => Err(arity("max", "at least 1 argument", args)),
        _ => Err(CalcError::UnknownFunction(name.to_string())),
    }
}

fn arity(name: &'static str, expected: &'static str, args: &[f64]) -> CalcError {
    CalcError::Arity {
        name,
        expected,
        got: args.len(),
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(token) = parser.peek() {
        return Err(CalcError::UnexpectedToken(token.to_string()));
    }
    if !value.is_finite() {
        return Err(CalcError::Overflow);
    }
    Ok(value)
}

/// Format a result, dropping the fractional part of integral values.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
