//! Scale factors and the arithmetic subset accepted inside `[sx,sy]`
//!
//! Scale entries are small expressions such as `0.5`, `2` or `1/10`. They are
//! evaluated by a dedicated recursive-descent parser that only understands
//! numeric literals, `+ - * /`, unary signs and parentheses.
//!
//! Precedence levels (low to high):
//!  1. Additive (`+`, `-`)
//!  2. Multiplicative (`*`, `/`)
//!  3. Unary prefix (`-`, `+`)
//!  4. Literals and parenthesized groups

use crate::{Error, Result};
use serde::Serialize;

/// Independent X/Y scale factors applied to an exported shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Scale {
    pub x: f64,
    pub y: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Scale::IDENTITY
    }
}

impl Scale {
    pub const IDENTITY: Scale = Scale { x: 1.0, y: 1.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Scale { x, y }
    }

    pub fn is_identity(&self) -> bool {
        self.x == 1.0 && self.y == 1.0
    }

    /// Parse the text between the brackets of a shape sub-line, e.g. `2,1/2`
    pub fn parse_pair(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split(',').collect();
        if parts.len() != 2 {
            return Err(Error::InvalidScale {
                expr: text.to_string(),
                reason: format!("expected two factors, got {}", parts.len()),
            });
        }

        let x = evaluate_factor(parts[0])?;
        let y = evaluate_factor(parts[1])?;
        Ok(Scale { x, y })
    }
}

/// Parsed scale expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl Expr {
    /// Parse an expression, consuming the whole input
    pub fn parse(text: &str) -> Result<Self> {
        let tokens = tokenize(text)?;
        let mut parser = Parser {
            text,
            tokens: &tokens,
            pos: 0,
        };
        let expr = parser.parse_additive()?;
        if let Some(tok) = parser.peek() {
            return Err(parser.error(format!("unexpected {}", tok.describe())));
        }
        Ok(expr)
    }

    pub fn eval(&self) -> f64 {
        match self {
            Expr::Number(n) => *n,
            Expr::Binary { op, lhs, rhs } => {
                let (l, r) = (lhs.eval(), rhs.eval());
                match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                }
            }
        }
    }
}

/// Evaluate one scale factor, requiring a finite positive result
pub fn evaluate_factor(text: &str) -> Result<f64> {
    let value = Expr::parse(text.trim())?.eval();
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::InvalidScale {
            expr: text.trim().to_string(),
            reason: format!("evaluates to {}, must be a positive number", value),
        });
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let tok = match c {
            b' ' | b'\t' => {
                i += 1;
                continue;
            }
            b'+' => Token::Plus,
            b'-' => Token::Minus,
            b'*' => Token::Star,
            b'/' => Token::Slash,
            b'(' => Token::LParen,
            b')' => Token::RParen,
            b'0'..=b'9' | b'.' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
                    i += 1;
                }
                let literal = &text[start..i];
                let value = literal.parse::<f64>().map_err(|_| Error::InvalidScale {
                    expr: text.to_string(),
                    reason: format!("bad numeric literal '{}'", literal),
                })?;
                tokens.push(Token::Number(value));
                continue;
            }
            _ => {
                let ch = text[i..].chars().next().unwrap_or('?');
                return Err(Error::InvalidScale {
                    expr: text.to_string(),
                    reason: format!("unexpected character '{}'", ch),
                });
            }
        };
        tokens.push(tok);
        i += 1;
    }

    Ok(tokens)
}

struct Parser<'a> {
    text: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<Token> {
        let tok = self.peek();
        self.pos += 1;
        tok
    }

    fn error(&self, reason: String) -> Error {
        Error::InvalidScale {
            expr: self.text.to_string(),
            reason,
        }
    }

    fn parse_additive(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_multiplicative()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_multiplicative(&mut self) -> Result<Expr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => BinaryOp::Mul,
                Some(Token::Slash) => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            self.bump();
            let rhs = self.parse_unary()?;
            lhs = binary(op, lhs, rhs);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Minus) => {
                self.bump();
                let operand = self.parse_unary()?;
                Ok(binary(BinaryOp::Sub, Expr::Number(0.0), operand))
            }
            Some(Token::Plus) => {
                self.bump();
                self.parse_unary()
            }
            _ => self.parse_primary(),
        }
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        match self.bump() {
            Some(Token::Number(n)) => Ok(Expr::Number(n)),
            Some(Token::LParen) => {
                let inner = self.parse_additive()?;
                match self.bump() {
                    Some(Token::RParen) => Ok(inner),
                    Some(tok) => Err(self.error(format!("expected ')', got {}", tok.describe()))),
                    None => Err(self.error("unclosed '('".to_string())),
                }
            }
            Some(tok) => Err(self.error(format!("unexpected {}", tok.describe()))),
            None => Err(self.error("unexpected end of expression".to_string())),
        }
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
    Expr::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eval(text: &str) -> f64 {
        Expr::parse(text).unwrap().eval()
    }

    #[test]
    fn test_literals() {
        assert_eq!(eval("2"), 2.0);
        assert_eq!(eval("0.5"), 0.5);
        assert_eq!(eval(".25"), 0.25);
    }

    #[test]
    fn test_precedence_and_grouping() {
        assert_eq!(eval("1/2"), 0.5);
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("8 / 2 / 2"), 2.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("-2 * -3"), 6.0);
    }

    #[test]
    fn test_tree_shape() {
        let expr = Expr::parse("1/10").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Div,
                lhs: Box::new(Expr::Number(1.0)),
                rhs: Box::new(Expr::Number(10.0)),
            }
        );
    }

    #[test]
    fn test_rejects_anything_but_arithmetic() {
        assert!(Expr::parse("__import__('os')").is_err());
        assert!(Expr::parse("2 ** 3").is_err());
        assert!(Expr::parse("1e3").is_err());
        assert!(Expr::parse("(1 + 2").is_err());
        assert!(Expr::parse("1 2").is_err());
        assert!(Expr::parse("").is_err());
        assert!(Expr::parse("1..2").is_err());
    }

    #[test]
    fn test_factor_must_be_positive_and_finite() {
        assert_eq!(evaluate_factor(" 1/4 ").unwrap(), 0.25);
        assert!(matches!(evaluate_factor("0"), Err(Error::InvalidScale { .. })));
        assert!(matches!(evaluate_factor("-1"), Err(Error::InvalidScale { .. })));
        assert!(matches!(evaluate_factor("1/0"), Err(Error::InvalidScale { .. })));
    }

    #[test]
    fn test_parse_pair() {
        assert_eq!(Scale::parse_pair("2,0.5").unwrap(), Scale::new(2.0, 0.5));
        assert_eq!(Scale::parse_pair(" 1/2 , 3 ").unwrap(), Scale::new(0.5, 3.0));
        assert!(Scale::parse_pair("2").is_err());
        assert!(Scale::parse_pair("1,2,3").is_err());
        assert!(Scale::parse_pair("1,").is_err());
    }

    #[test]
    fn test_identity() {
        assert!(Scale::default().is_identity());
        assert!(!Scale::new(1.0, 0.5).is_identity());
    }
}
