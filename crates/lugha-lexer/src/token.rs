//! Token definitions for the Lugha lexer.

use lugha_core::Span;

/// A token produced by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Source location
    pub span: Span,
    /// The original lexeme (raw text from source)
    pub lexeme: String,
}

impl Token {
    /// Check if this token is a statement terminator (newline or semicolon)
    pub fn is_terminator(&self) -> bool {
        matches!(self.kind, TokenKind::Newline | TokenKind::Semicolon)
    }
}

/// The kind of token.
///
/// `kweli`, `uwongo` and `tupu` are not keywords: they are ordinary
/// identifiers, pre-bound as constants in the root scope at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Str(String),

    // Identifiers and keywords
    Identifier(String),
    Shughuli, // function definition
    Kama,     // if
    Sivyo,    // else
    Kwa,      // for
    Mpaka,    // for-loop end bound
    Hatua,    // for-loop step
    Wakati,   // while
    Rudisha,  // return

    // Operators
    Plus,      // +
    Minus,     // -
    Mul,       // *
    Div,       // /
    Mod,       // %
    Pow,       // ^
    Equal,     // = (assignment)
    EqEq,      // ==
    NotEq,     // !=
    Less,      // <
    Greater,   // >
    LessEq,    // <=
    GreaterEq, // >=
    And,       // &&
    Or,        // ||
    Not,       // !

    // Delimiters and punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,

    // Statement terminators
    Newline,
    Semicolon,

    // End of file
    Eof,
}

impl TokenKind {
    /// Get the name of this token kind for error messages
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number literal",
            TokenKind::Str(_) => "string literal",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Shughuli => "'shughuli'",
            TokenKind::Kama => "'kama'",
            TokenKind::Sivyo => "'sivyo'",
            TokenKind::Kwa => "'kwa'",
            TokenKind::Mpaka => "'mpaka'",
            TokenKind::Hatua => "'hatua'",
            TokenKind::Wakati => "'wakati'",
            TokenKind::Rudisha => "'rudisha'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Mul => "'*'",
            TokenKind::Div => "'/'",
            TokenKind::Mod => "'%'",
            TokenKind::Pow => "'^'",
            TokenKind::Equal => "'='",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::LessEq => "'<='",
            TokenKind::GreaterEq => "'>='",
            TokenKind::And => "'&&'",
            TokenKind::Or => "'||'",
            TokenKind::Not => "'!'",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::LeftBracket => "'['",
            TokenKind::RightBracket => "']'",
            TokenKind::LeftBrace => "'{'",
            TokenKind::RightBrace => "'}'",
            TokenKind::Comma => "','",
            TokenKind::Newline => "newline",
            TokenKind::Semicolon => "';'",
            TokenKind::Eof => "end of file",
        }
    }

    /// Map an identifier lexeme to its keyword kind, if it is one.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "shughuli" => Some(TokenKind::Shughuli),
            "kama" => Some(TokenKind::Kama),
            "sivyo" => Some(TokenKind::Sivyo),
            "kwa" => Some(TokenKind::Kwa),
            "mpaka" => Some(TokenKind::Mpaka),
            "hatua" => Some(TokenKind::Hatua),
            "wakati" => Some(TokenKind::Wakati),
            "rudisha" => Some(TokenKind::Rudisha),
            _ => None,
        }
    }

    /// Check if this is a keyword (not an identifier)
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::Shughuli
                | TokenKind::Kama
                | TokenKind::Sivyo
                | TokenKind::Kwa
                | TokenKind::Mpaka
                | TokenKind::Hatua
                | TokenKind::Wakati
                | TokenKind::Rudisha
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(v) => write!(f, "{}", v),
            TokenKind::Str(s) => write!(f, "\"{}\"", s),
            TokenKind::Identifier(s) => write!(f, "{}", s),
            _ => write!(f, "{}", self.name()),
        }
    }
}
