//! Lugha Language Lexer
//!
//! Tokenizes Lugha source code into a stream of tokens for parsing.
//! Newlines and semicolons are significant (statement terminators).

mod token;

pub use token::*;

use lugha_core::{LughaError, Position, SourceId, Span};

/// The lexer for the Lugha programming language.
#[derive(Debug)]
pub struct Lexer<'src> {
    source: &'src str,
    source_id: SourceId,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    current_pos: usize,
    line: u32,
    column: u32,
    tokens: Vec<Token>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    pub fn new(source_id: SourceId, source: &'src str) -> Self {
        Self {
            source,
            source_id,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            line: 1,
            column: 1,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire source and return all tokens.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LughaError> {
        while !self.is_at_end() {
            self.skip_whitespace_and_comments();
            if !self.is_at_end() {
                let token = self.scan_token()?;
                self.tokens.push(token);
            }
        }

        let eof = self.position();
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            span: Span::new(self.source_id, eof, eof),
            lexeme: String::new(),
        });

        Ok(self.tokens)
    }

    fn is_at_end(&mut self) -> bool {
        self.chars.peek().is_none()
    }

    fn position(&self) -> Position {
        Position::new(self.current_pos, self.line, self.column)
    }

    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.current_pos = pos + ch.len_utf8();
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        result
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    fn skip_whitespace_and_comments(&mut self) {
        while let Some(ch) = self.peek() {
            match ch {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                // Newlines are significant (same as semicolons) - emit a token
                '\n' => return,
                '#' => {
                    // Line comment
                    while let Some(ch) = self.peek() {
                        if ch == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    /// Consume the next char if it matches, returning whether it did.
    fn matches(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn scan_token(&mut self) -> Result<Token, LughaError> {
        let start = self.position();

        let (_, ch) = self.advance().unwrap();

        let kind = match ch {
            // Statement terminators
            '\n' => TokenKind::Newline,
            ';' => TokenKind::Semicolon,

            // Delimiters and punctuation
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,

            // Operators
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Mul,
            '/' => TokenKind::Div,
            '%' => TokenKind::Mod,
            '^' => TokenKind::Pow,
            '=' => {
                if self.matches('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Equal
                }
            }
            '!' => {
                if self.matches('=') {
                    TokenKind::NotEq
                } else {
                    TokenKind::Not
                }
            }
            '<' => {
                if self.matches('=') {
                    TokenKind::LessEq
                } else {
                    TokenKind::Less
                }
            }
            '>' => {
                if self.matches('=') {
                    TokenKind::GreaterEq
                } else {
                    TokenKind::Greater
                }
            }
            '&' => {
                if self.matches('&') {
                    TokenKind::And
                } else {
                    return Err(LughaError::LexerError {
                        message: "Unexpected '&'. Did you mean '&&'?".to_string(),
                        line: start.line,
                        column: start.column,
                    });
                }
            }
            '|' => {
                if self.matches('|') {
                    TokenKind::Or
                } else {
                    return Err(LughaError::LexerError {
                        message: "Unexpected '|'. Did you mean '||'?".to_string(),
                        line: start.line,
                        column: start.column,
                    });
                }
            }

            // String literal
            '"' => return self.scan_string(start),

            // Number literal
            c if c.is_ascii_digit() => return self.scan_number(start),

            // Identifier or keyword
            c if c.is_alphabetic() || c == '_' => return self.scan_identifier(start),

            _ => {
                return Err(LughaError::LexerError {
                    message: format!("Unexpected character: '{}'", ch),
                    line: start.line,
                    column: start.column,
                });
            }
        };

        Ok(self.make_token(kind, start))
    }

    fn make_token(&self, kind: TokenKind, start: Position) -> Token {
        let lexeme = self.source[start.offset..self.current_pos].to_string();
        Token {
            kind,
            span: Span::new(self.source_id, start, self.position()),
            lexeme,
        }
    }

    fn scan_string(&mut self, start: Position) -> Result<Token, LughaError> {
        let mut value = String::new();

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    match self.advance().map(|(_, c)| c) {
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some('\\') => value.push('\\'),
                        Some('"') => value.push('"'),
                        Some(other) => {
                            return Err(LughaError::LexerError {
                                message: format!("Unknown escape sequence: '\\{}'", other),
                                line: start.line,
                                column: start.column,
                            });
                        }
                        None => {
                            return Err(LughaError::LexerError {
                                message: "Unterminated string literal".to_string(),
                                line: start.line,
                                column: start.column,
                            });
                        }
                    }
                }
                Some(_) => {
                    let (_, ch) = self.advance().unwrap();
                    value.push(ch);
                }
                None => {
                    return Err(LughaError::LexerError {
                        message: "Unterminated string literal".to_string(),
                        line: start.line,
                        column: start.column,
                    });
                }
            }
        }

        Ok(self.make_token(TokenKind::Str(value), start))
    }

    fn scan_number(&mut self, start: Position) -> Result<Token, LughaError> {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        // A single fractional part; the dot must be followed by a digit.
        if self.peek() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if lookahead
                .next()
                .map(|(_, c)| c.is_ascii_digit())
                .unwrap_or(false)
            {
                self.advance();
                while let Some(ch) = self.peek() {
                    if ch.is_ascii_digit() {
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        let text = &self.source[start.offset..self.current_pos];
        let value: f64 = text.parse().map_err(|_| LughaError::LexerError {
            message: format!("Invalid number literal: '{}'", text),
            line: start.line,
            column: start.column,
        })?;

        Ok(self.make_token(TokenKind::Number(value), start))
    }

    fn scan_identifier(&mut self, start: Position) -> Result<Token, LughaError> {
        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() || ch == '_' {
                self.advance();
            } else {
                break;
            }
        }

        let text = &self.source[start.offset..self.current_pos];
        let kind = TokenKind::keyword(text).unwrap_or_else(|| TokenKind::Identifier(text.to_string()));

        Ok(self.make_token(kind, start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<TokenKind> {
        Lexer::new(SourceId::REPL, source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("1 2.5 100"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(100.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            lex("+ - * / % ^ == != < > <= >= && || ! ="),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Mul,
                TokenKind::Div,
                TokenKind::Mod,
                TokenKind::Pow,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Less,
                TokenKind::Greater,
                TokenKind::LessEq,
                TokenKind::GreaterEq,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            lex("shughuli jumla kama sivyo kwa mpaka hatua wakati rudisha kweli"),
            vec![
                TokenKind::Shughuli,
                TokenKind::Identifier("jumla".to_string()),
                TokenKind::Kama,
                TokenKind::Sivyo,
                TokenKind::Kwa,
                TokenKind::Mpaka,
                TokenKind::Hatua,
                TokenKind::Wakati,
                TokenKind::Rudisha,
                // Not a keyword: bound as a constant in the root scope.
                TokenKind::Identifier("kweli".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            lex(r#""habari\n\"dunia\"""#),
            vec![
                TokenKind::Str("habari\n\"dunia\"".to_string()),
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let err = Lexer::new(SourceId::REPL, "\"habari").tokenize().unwrap_err();
        assert!(matches!(err, LughaError::LexerError { .. }));
    }

    #[test]
    fn test_terminators() {
        assert_eq!(
            lex("1\n2;3"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Newline,
                TokenKind::Number(2.0),
                TokenKind::Semicolon,
                TokenKind::Number(3.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments() {
        assert_eq!(
            lex("1 # maoni hapa\n2"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Newline,
                TokenKind::Number(2.0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_lone_ampersand_rejected() {
        let err = Lexer::new(SourceId::REPL, "a & b").tokenize().unwrap_err();
        assert!(matches!(err, LughaError::LexerError { .. }));
    }

    #[test]
    fn test_keyword_predicate_and_display() {
        assert!(TokenKind::Kama.is_keyword());
        assert!(!TokenKind::Identifier("kama2".to_string()).is_keyword());
        assert_eq!(TokenKind::LessEq.to_string(), "'<='");
        assert_eq!(TokenKind::Number(2.5).to_string(), "2.5");
    }

    #[test]
    fn test_spans_track_lines() {
        let tokens = Lexer::new(SourceId::REPL, "a\nb").tokenize().unwrap();
        assert_eq!(tokens[0].span.start.line, 1);
        assert_eq!(tokens[2].span.start.line, 2);
        assert_eq!(tokens[2].span.start.column, 1);
    }
}
