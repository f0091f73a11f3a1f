//! Expression tokenizer — converts a canonical expression into a token stream
//!
//! Handles: numeric literals (optionally signed, optionally decimal),
//! the operators `+ - * / % **`, parentheses, argument commas and
//! builtin names with or without the `Math.` prefix.
//!
//! A `-` immediately followed by a digit is folded into the literal when it
//! stands in prefix position (start of input, after an operator, `(` or `,`).
//! Everywhere else it is the binary minus.

/// Token types of the closed arithmetic grammar
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    /// Builtin name as written, e.g. `Math.sqrt` or `PI`
    Ident(String),

    Plus,       // +
    Minus,      // -
    Star,       // *
    StarStar,   // **
    Slash,      // /
    Percent,    // %
    LParen,     // (
    RParen,     // )
    Comma,      // ,

    Eof,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::Number(n) => write!(f, "number {}", n),
            Token::Ident(name) => write!(f, "'{}'", name),
            Token::Plus => write!(f, "'+'"),
            Token::Minus => write!(f, "'-'"),
            Token::Star => write!(f, "'*'"),
            Token::StarStar => write!(f, "'**'"),
            Token::Slash => write!(f, "'/'"),
            Token::Percent => write!(f, "'%'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
            Token::Comma => write!(f, "','"),
            Token::Eof => write!(f, "end of expression"),
        }
    }
}

/// Position in source text for error reporting
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token with source position
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedToken {
    pub token: Token,
    pub span: Span,
}

/// Tokenizer for canonical expressions
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    previous: Option<Token>,
}

impl Tokenizer {
    pub fn new(text: &str) -> Self {
        Tokenizer {
            input: text.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            previous: None,
        }
    }

    /// Tokenize the entire input, always terminated by `Token::Eof`
    pub fn tokenize(&mut self) -> crate::Result<Vec<SpannedToken>> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                tokens.push(SpannedToken {
                    token: Token::Eof,
                    span: self.current_span(),
                });
                break;
            }

            let token = self.next_token()?;
            self.previous = Some(token.token.clone());
            tokens.push(token);
        }

        Ok(tokens)
    }

    // ── Character helpers ──────────────────────────────────

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.input.get(self.position).copied();
        if let Some(c) = ch {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        ch
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.position,
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// A sign here belongs to the following literal, not to a binary operator
    fn in_prefix_position(&self) -> bool {
        !matches!(
            self.previous,
            Some(Token::Number(_)) | Some(Token::Ident(_)) | Some(Token::RParen)
        )
    }

    fn starts_number_at(&self, offset: usize) -> bool {
        match self.peek_ahead(offset) {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => matches!(self.peek_ahead(offset + 1), Some(c) if c.is_ascii_digit()),
            _ => false,
        }
    }

    // ── Main dispatch ──────────────────────────────────────

    fn next_token(&mut self) -> crate::Result<SpannedToken> {
        let span = self.current_span();
        let ch = match self.peek() {
            Some(c) => c,
            None => {
                return Ok(SpannedToken { token: Token::Eof, span });
            }
        };

        let token = match ch {
            '+' => { self.advance(); Token::Plus }
            '/' => { self.advance(); Token::Slash }
            '%' => { self.advance(); Token::Percent }
            '(' => { self.advance(); Token::LParen }
            ')' => { self.advance(); Token::RParen }
            ',' => { self.advance(); Token::Comma }
            '*' => {
                self.advance();
                if self.peek() == Some('*') {
                    self.advance();
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            '-' if self.in_prefix_position() && self.starts_number_at(1) => {
                self.advance();
                let value = self.read_number(span)?;
                Token::Number(-value)
            }
            '-' => { self.advance(); Token::Minus }
            c if c.is_ascii_digit() || c == '.' => Token::Number(self.read_number(span)?),
            c if c.is_ascii_alphabetic() || c == '_' => self.read_identifier(),
            _ => {
                return Err(crate::Error::Syntax(format!(
                    "unexpected character '{}' at {}",
                    ch, span
                )));
            }
        };

        Ok(SpannedToken { token, span })
    }

    // ── Numbers ────────────────────────────────────────────

    fn read_number(&mut self, span: Span) -> crate::Result<f64> {
        let start = self.position;
        let mut has_dot = false;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else if ch == '.' && !has_dot {
                has_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        text.parse::<f64>().map_err(|_| {
            crate::Error::Syntax(format!("invalid number '{}' at {}", text, span))
        })
    }

    // ── Identifiers ────────────────────────────────────────

    fn read_identifier(&mut self) -> Token {
        let start = self.position;

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '.' {
                self.advance();
            } else {
                break;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        Token::Ident(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(input: &str) -> Vec<Token> {
        Tokenizer::new(input)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|st| st.token)
            .collect()
    }

    fn tokenize_err(input: &str) -> String {
        Tokenizer::new(input)
            .tokenize()
            .unwrap_err()
            .to_string()
    }

    // ── Numbers ────────────────────────────────────────

    #[test]
    fn test_tokenize_integers_and_decimals() {
        assert_eq!(
            tokenize("42 0 3.5 .25"),
            vec![
                Token::Number(42.0),
                Token::Number(0.0),
                Token::Number(3.5),
                Token::Number(0.25),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_signed_literal_in_prefix_position() {
        assert_eq!(
            tokenize("-5 + 3"),
            vec![Token::Number(-5.0), Token::Plus, Token::Number(3.0), Token::Eof]
        );
        assert_eq!(
            tokenize("2 * -3"),
            vec![Token::Number(2.0), Token::Star, Token::Number(-3.0), Token::Eof]
        );
        assert_eq!(
            tokenize("(-0.5)"),
            vec![Token::LParen, Token::Number(-0.5), Token::RParen, Token::Eof]
        );
    }

    #[test]
    fn test_minus_after_operand_is_binary() {
        assert_eq!(
            tokenize("3 -5"),
            vec![Token::Number(3.0), Token::Minus, Token::Number(5.0), Token::Eof]
        );
        assert_eq!(
            tokenize("(1)-2"),
            vec![
                Token::LParen,
                Token::Number(1.0),
                Token::RParen,
                Token::Minus,
                Token::Number(2.0),
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_minus_before_paren_is_operator() {
        assert_eq!(
            tokenize("-(2)"),
            vec![
                Token::Minus,
                Token::LParen,
                Token::Number(2.0),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    // ── Operators ──────────────────────────────────────

    #[test]
    fn test_tokenize_operators() {
        assert_eq!(
            tokenize("+ - * ** / % ( ) ,"),
            vec![
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::StarStar,
                Token::Slash,
                Token::Percent,
                Token::LParen,
                Token::RParen,
                Token::Comma,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_power_without_spaces() {
        assert_eq!(
            tokenize("5**2"),
            vec![Token::Number(5.0), Token::StarStar, Token::Number(2.0), Token::Eof]
        );
    }

    // ── Identifiers ────────────────────────────────────

    #[test]
    fn test_tokenize_builtin_names() {
        assert_eq!(
            tokenize("Math.sqrt(Math.PI)"),
            vec![
                Token::Ident("Math.sqrt".into()),
                Token::LParen,
                Token::Ident("Math.PI".into()),
                Token::RParen,
                Token::Eof,
            ]
        );
    }

    // ── Span tracking ──────────────────────────────────

    #[test]
    fn test_span_tracking() {
        let tokens = Tokenizer::new("1 +\n  22").tokenize().unwrap();
        assert_eq!(tokens[0].span, Span { line: 1, column: 1, offset: 0 });
        assert_eq!(tokens[1].span, Span { line: 1, column: 3, offset: 2 });
        assert_eq!(tokens[2].span, Span { line: 2, column: 3, offset: 6 });
        assert_eq!(tokens[2].token, Token::Number(22.0));
    }

    // ── Edge cases ─────────────────────────────────────

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![Token::Eof]);
        assert_eq!(tokenize("  \t "), vec![Token::Eof]);
    }

    #[test]
    fn test_unexpected_character() {
        let err = tokenize_err("2 ^ 3");
        assert!(err.contains("unexpected character '^' at 1:3"), "{}", err);
    }

    #[test]
    fn test_leftover_factorial_is_rejected() {
        let err = tokenize_err("(3)!");
        assert!(err.contains("unexpected character '!'"));
    }

    #[test]
    fn test_tokenize_determinism_100_iterations() {
        let input = "(Math.sin(0.5235987755982988)) + -2 ** 3 % 7";
        let first = Tokenizer::new(input).tokenize().unwrap();

        for i in 0..100 {
            let result = Tokenizer::new(input).tokenize().unwrap();
            assert_eq!(first, result, "Determinism failure at iteration {}", i);
        }
    }
}
