//! Expression parser — tokenizer, AST types, and recursive descent parser
//!
//! Accepts exactly the closed arithmetic grammar:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/' | '%') unary | implicit)*
//! unary   := ('-' | '+') unary | power
//! power   := primary ('**' unary)?
//! primary := NUMBER | CONST | FUNC '(' args? ')' | FUNC unary | '(' expr ')'
//! ```
//!
//! `implicit` is multiplication by juxtaposition when the right operand
//! starts with `(` or a builtin name (`2 Math.PI`, `(1)(2)`). `**` is
//! right-associative and binds tighter than a unary sign.

pub mod ast;
pub mod tokenizer;

use crate::builtins;
use crate::{Error, Result};
use ast::{BinaryOp, Expr, UnaryOp};
use tokenizer::{SpannedToken, Token, Tokenizer};

/// Parse a canonical expression into an AST
///
/// # Errors
/// Returns `Syntax` with line:column for anything outside the grammar,
/// including names that are not on the builtin allow-list.
pub fn parse(input: &str) -> Result<Expr> {
    let tokens = Tokenizer::new(input).tokenize()?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    parser.expect_end()?;
    Ok(expr)
}

/// Deepest nesting of parentheses, signs and exponents the parser accepts
pub const MAX_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<SpannedToken>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    // ── Token helpers ──────────────────────────────────────

    fn peek(&self) -> &SpannedToken {
        // tokenize() always terminates the stream with Eof
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> SpannedToken {
        let token = self.peek().clone();
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
        token
    }

    fn check(&self, token: &Token) -> bool {
        &self.peek().token == token
    }

    fn unexpected(&self) -> Error {
        let current = self.peek();
        match current.token {
            Token::Eof => Error::Syntax("unexpected end of expression".into()),
            _ => Error::Syntax(format!("unexpected {} at {}", current.token, current.span)),
        }
    }

    fn expect(&mut self, token: Token) -> Result<()> {
        if self.check(&token) {
            self.advance();
            Ok(())
        } else {
            let current = self.peek();
            Err(Error::Syntax(format!(
                "expected {} but found {} at {}",
                token, current.token, current.span
            )))
        }
    }

    fn expect_end(&self) -> Result<()> {
        if self.check(&Token::Eof) {
            Ok(())
        } else {
            Err(self.unexpected())
        }
    }

    // ── Grammar ────────────────────────────────────────────

    fn parse_expr(&mut self) -> Result<Expr> {
        let mut left = self.parse_term()?;

        loop {
            let op = match self.peek().token {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> Result<Expr> {
        let mut left = self.parse_unary()?;

        loop {
            let op = match self.peek().token {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                Token::Percent => BinaryOp::Rem,
                Token::LParen | Token::Ident(_) => {
                    // implicit multiplication, operand is not consumed here
                    let right = self.parse_unary()?;
                    left = binary(BinaryOp::Mul, left, right);
                    continue;
                }
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = binary(op, left, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        // every recursive path of the grammar passes through here
        if self.depth >= MAX_DEPTH {
            return Err(Error::Syntax(format!(
                "expression nested too deeply at {}",
                self.peek().span
            )));
        }
        self.depth += 1;
        let expr = self.parse_signed();
        self.depth -= 1;
        expr
    }

    fn parse_signed(&mut self) -> Result<Expr> {
        let op = match self.peek().token {
            Token::Minus => UnaryOp::Neg,
            Token::Plus => UnaryOp::Plus,
            _ => return self.parse_power(),
        };
        self.advance();
        let operand = self.parse_unary()?;
        Ok(Expr::Unary {
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_power(&mut self) -> Result<Expr> {
        let base = self.parse_primary()?;

        if self.check(&Token::StarStar) {
            self.advance();
            let exponent = self.parse_unary()?;
            return Ok(binary(BinaryOp::Pow, base, exponent));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        let current = self.advance();

        match current.token {
            Token::Number(value) => Ok(Expr::Number(value)),
            Token::LParen => {
                let inner = self.parse_expr()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                if let Some(constant) = builtins::constant(&name) {
                    return Ok(Expr::Constant(constant));
                }
                let function = builtins::function(&name).ok_or_else(|| {
                    Error::Syntax(format!(
                        "unknown function or constant '{}' at {}",
                        name, current.span
                    ))
                })?;

                let args = if self.check(&Token::LParen) {
                    self.advance();
                    self.parse_arguments()?
                } else if function.arity.accepts(0) {
                    Vec::new()
                } else {
                    vec![self.parse_unary()?]
                };

                if !function.arity.accepts(args.len()) {
                    return Err(Error::Syntax(format!(
                        "{} expects {}, got {} at {}",
                        function.name,
                        function.arity,
                        args.len(),
                        current.span
                    )));
                }

                Ok(Expr::Call { function, args })
            }
            Token::Eof => Err(Error::Syntax("unexpected end of expression".into())),
            other => Err(Error::Syntax(format!(
                "unexpected {} at {}",
                other, current.span
            ))),
        }
    }

    /// Comma-separated arguments after an opening `(`, consumes the `)`
    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check(&Token::RParen) {
            self.advance();
            return Ok(args);
        }

        loop {
            args.push(self.parse_expr()?);
            if self.check(&Token::Comma) {
                self.advance();
                continue;
            }
            self.expect(Token::RParen)?;
            return Ok(args);
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(input: &str) -> String {
        parse(input).unwrap().to_string()
    }

    fn parse_err(input: &str) -> String {
        parse(input).unwrap_err().to_string()
    }

    // ── Precedence ─────────────────────────────────────

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        assert_eq!(render("2 + 3 * 4"), "(2 + (3 * 4))");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(render("(2 + 3) * 4"), "((2 + 3) * 4)");
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(render("2 ** 3 ** 2"), "(2 ** (3 ** 2))");
    }

    #[test]
    fn test_power_binds_tighter_than_unary_minus() {
        assert_eq!(render("-(2) ** 2"), "(-(2 ** 2))");
    }

    #[test]
    fn test_signed_literal_is_an_atom() {
        assert_eq!(render("-2 **2"), "(-2 ** 2)");
    }

    #[test]
    fn test_left_associative_division_and_remainder() {
        assert_eq!(render("8 / 4 / 2"), "((8 / 4) / 2)");
        assert_eq!(render("10 % 4 * 3"), "((10 % 4) * 3)");
    }

    // ── Functions and constants ────────────────────────

    #[test]
    fn test_call_with_parentheses() {
        assert_eq!(render("Math.sin(0.5)"), "sin(0.5)");
        assert_eq!(render("Math.max(3, 5, 1)"), "max(3, 5, 1)");
    }

    #[test]
    fn test_call_by_juxtaposition() {
        assert_eq!(render("Math.sqrt 16 + 9"), "(sqrt(16) + 9)");
    }

    #[test]
    fn test_zero_arity_call() {
        assert_eq!(render("Math.random()"), "random()");
        assert_eq!(render("Math.random"), "random()");
    }

    #[test]
    fn test_constants() {
        assert_eq!(render("Math.PI * 2"), "(PI * 2)");
        assert_eq!(render("E"), "E");
    }

    #[test]
    fn test_implicit_multiplication() {
        assert_eq!(render("2 Math.PI"), "(2 * PI)");
        assert_eq!(render("(1)(2)"), "(1 * 2)");
    }

    // ── Errors ─────────────────────────────────────────

    #[test]
    fn test_unknown_function_rejected() {
        let err = parse_err("Math.exp(1)");
        assert!(err.contains("unknown function or constant 'Math.exp' at 1:1"), "{}", err);
    }

    #[test]
    fn test_arbitrary_code_rejected() {
        assert!(parse("alert(1)").is_err());
        assert!(parse("process.exit()").is_err());
    }

    #[test]
    fn test_wrong_arity() {
        let err = parse_err("Math.sqrt(1, 2)");
        assert!(err.contains("sqrt expects exactly 1 argument, got 2"), "{}", err);
        let err = parse_err("Math.max()");
        assert!(err.contains("max expects at least 1 argument, got 0"), "{}", err);
    }

    #[test]
    fn test_adjacent_numbers_rejected() {
        let err = parse_err("2 3");
        assert!(err.contains("unexpected number 3 at 1:3"), "{}", err);
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert!(parse_err("(2 + 3").contains("expected ')'"));
        assert!(parse_err("2 + 3)").contains("unexpected ')'"));
    }

    #[test]
    fn test_deep_nesting_rejected() {
        let input = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let err = parse(&input).unwrap_err();
        assert!(matches!(err, Error::Syntax(_)));
        assert!(err.to_string().contains("nested too deeply at 1:"), "{}", err);

        let signs = format!("{}1", "- ".repeat(10_000));
        assert!(parse_err(&signs).contains("nested too deeply"));

        let powers = vec!["2"; 10_000].join(" ** ");
        assert!(parse_err(&powers).contains("nested too deeply"));
    }

    #[test]
    fn test_moderate_nesting_accepted() {
        let input = format!("{}1{}", "(".repeat(200), ")".repeat(200));
        assert_eq!(render(&input), "1");
    }

    #[test]
    fn test_dangling_operator() {
        assert_eq!(parse_err("2 +"), "Syntax error: unexpected end of expression");
    }

    #[test]
    fn test_parse_determinism_100_iterations() {
        let input = "(Math.sin(0.5235987755982988)) * 2 + Math.max(1, 2) ** 2";
        let first = parse(input).unwrap();
        for i in 0..100 {
            let result = parse(input).unwrap();
            assert_eq!(first, result, "Non-determinism at iteration {}", i);
        }
    }
}
