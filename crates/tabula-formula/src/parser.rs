//! Arithmetic parser
//!
//! A recursive descent parser for the arithmetic fallback form of a formula:
//! numbers, cell references, `+ - * / ^`, parentheses and unary signs.
//!
//! Precedence (lowest to highest):
//! 1. Addition/Subtraction: `+`, `-`
//! 2. Multiplication/Division: `*`, `/`
//! 3. Unary: `-`, `+`
//! 4. Exponentiation: `^` (right-associative)
//! 5. Primary: literals, references, parentheses
//!
//! A signed operand cannot be the base of `^`: `-2^2` is rejected, `(-2)^2`
//! and `2^-2` are accepted. Doubled signs written together (`--2`, `1++2`)
//! are rejected; separated by whitespace (`1- -2`) they are two unary signs.
//!
//! Parenthesis and sign nesting is capped at [`MAX_NESTING`] levels and the
//! operator count at [`MAX_OPERATORS`].

use crate::ast::{BinaryOperator, Expr, UnaryOperator};
use crate::error::{FormulaError, FormulaResult};
use tabula_core::CellAddress;

/// Deepest nesting of parentheses and unary signs accepted in one expression
pub const MAX_NESTING: usize = 64;

/// Most operators accepted in one expression
pub const MAX_OPERATORS: usize = 256;

/// Parse an arithmetic expression (without the leading `=`)
///
/// # Example
/// ```rust
/// use tabula_formula::parse_expression;
///
/// assert!(parse_expression("A1*2 + (B2 - 1)^2").is_ok());
/// assert!(parse_expression("SUM(A1:A3)").is_err());
/// ```
pub fn parse_expression(input: &str) -> FormulaResult<Expr> {
    let mut parser = Parser::new(input)?;
    let expr = parser.parse_additive()?;

    if parser.current() != &Token::Eof {
        return Err(FormulaError::Parse(format!(
            "Unexpected {:?} after expression",
            parser.current()
        )));
    }

    Ok(expr)
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    CellRef(CellAddress),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LeftParen,
    RightParen,
    Eof,
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    current: Token,
    nesting: usize,
    operators: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> FormulaResult<Self> {
        let mut parser = Self {
            input,
            pos: 0,
            current: Token::Eof,
            nesting: 0,
            operators: 0,
        };
        parser.advance_token()?;
        Ok(parser)
    }

    // === Token scanning ===

    fn advance_token(&mut self) -> FormulaResult<()> {
        self.current = self.scan_token()?;
        Ok(())
    }

    fn scan_token(&mut self) -> FormulaResult<Token> {
        self.skip_whitespace();

        let c = match self.peek_char() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        if matches!(c, '+' | '-') && self.input[self.pos + 1..].starts_with(c) {
            return Err(FormulaError::Parse(format!(
                "Unexpected '{}{}' at {}",
                c, c, self.pos
            )));
        }

        let single = match c {
            '+' => Some(Token::Plus),
            '-' => Some(Token::Minus),
            '*' => Some(Token::Star),
            '/' => Some(Token::Slash),
            '^' => Some(Token::Caret),
            '(' => Some(Token::LeftParen),
            ')' => Some(Token::RightParen),
            _ => None,
        };
        if let Some(token) = single {
            self.advance();
            return Ok(token);
        }

        if c.is_ascii_digit() || c == '.' {
            return self.scan_number();
        }

        if c.is_ascii_alphabetic() {
            return self.scan_reference();
        }

        Err(FormulaError::Parse(format!(
            "Unexpected character '{}' at {}",
            c, self.pos
        )))
    }

    fn scan_number(&mut self) -> FormulaResult<Token> {
        let start = self.pos;

        self.skip_digits();
        if self.peek_char() == Some('.') {
            self.advance();
            self.skip_digits();
        }

        // Exponent part
        if matches!(self.peek_char(), Some('e' | 'E')) {
            self.advance();
            if matches!(self.peek_char(), Some('+' | '-')) {
                self.advance();
            }
            self.skip_digits();
        }

        let text = &self.input[start..self.pos];
        text.parse::<f64>()
            .map(Token::Number)
            .map_err(|_| FormulaError::Parse(format!("Invalid number '{}'", text)))
    }

    fn scan_reference(&mut self) -> FormulaResult<Token> {
        let start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_alphanumeric() || c == '_') {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        CellAddress::parse(text)
            .map(Token::CellRef)
            .map_err(|_| FormulaError::Parse(format!("Unexpected identifier '{}'", text)))
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn skip_digits(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn current(&self) -> &Token {
        &self.current
    }

    fn consume(&mut self) -> FormulaResult<Token> {
        let token = std::mem::replace(&mut self.current, Token::Eof);
        self.advance_token()?;
        Ok(token)
    }

    fn count_operator(&mut self) -> FormulaResult<()> {
        self.operators += 1;
        if self.operators > MAX_OPERATORS {
            return Err(FormulaError::Parse(format!(
                "More than {} operators in expression",
                MAX_OPERATORS
            )));
        }
        Ok(())
    }

    fn expect(&mut self, expected: &Token) -> FormulaResult<()> {
        if self.current() == expected {
            self.consume()?;
            Ok(())
        } else {
            Err(FormulaError::Parse(format!(
                "Expected {:?}, got {:?}",
                expected,
                self.current()
            )))
        }
    }

    // === Expression parsing with precedence ===

    fn parse_additive(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_multiplicative()?;

        loop {
            let op = match self.current() {
                Token::Plus => BinaryOperator::Add,
                Token::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            self.count_operator()?;
            self.consume()?;
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.current() {
                Token::Star => BinaryOperator::Multiply,
                Token::Slash => BinaryOperator::Divide,
                _ => break,
            };

            self.count_operator()?;
            self.consume()?;
            let right = self.parse_unary()?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> FormulaResult<Expr> {
        // Every recursive path (parentheses, signs, exponents) passes through here
        if self.nesting >= MAX_NESTING {
            return Err(FormulaError::Parse(format!(
                "Expression nested deeper than {} levels",
                MAX_NESTING
            )));
        }

        self.nesting += 1;
        let result = self.parse_signed();
        self.nesting -= 1;
        result
    }

    fn parse_signed(&mut self) -> FormulaResult<Expr> {
        let op = match self.current() {
            Token::Minus => UnaryOperator::Negate,
            Token::Plus => UnaryOperator::Plus,
            _ => return self.parse_power(),
        };
        self.count_operator()?;
        self.consume()?;

        let operand = match self.current() {
            Token::Minus | Token::Plus => self.parse_unary()?,
            _ => self.parse_primary()?,
        };

        if self.current() == &Token::Caret {
            return Err(FormulaError::Parse(
                "A signed operand must be parenthesized before '^'".into(),
            ));
        }

        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> FormulaResult<Expr> {
        let base = self.parse_primary()?;

        if self.current() != &Token::Caret {
            return Ok(base);
        }
        self.count_operator()?;
        self.consume()?;

        // Right-associative: the exponent may itself be a power or a signed operand
        let exponent = self.parse_unary()?;
        Ok(Expr::Binary {
            op: BinaryOperator::Power,
            left: Box::new(base),
            right: Box::new(exponent),
        })
    }

    fn parse_primary(&mut self) -> FormulaResult<Expr> {
        match self.consume()? {
            Token::Number(n) => Ok(Expr::Number(n)),
            Token::CellRef(addr) => Ok(Expr::Ref(addr)),
            Token::LeftParen => {
                let expr = self.parse_additive()?;
                self.expect(&Token::RightParen)?;
                Ok(expr)
            }
            token => Err(FormulaError::Parse(format!("Unexpected {:?}", token))),
        }
    }
}
