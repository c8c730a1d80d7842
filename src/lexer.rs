// ABOUTME: Lexer turning source text into a flat token stream

use crate::error::LexError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Number,
    String,
    Identifier,

    Ef,
    While,
    If,
    Diff,
    Ec,
    Ret,
    New,
    Save,
    Message,
    Typeof,

    Import,

    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,
    Arrow,

    Equal,
    NotEqual,
    Less,
    Greater,
    LessEqual,
    GreaterEqual,

    InterpolateStart,
    InterpolateEnd,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Dot,
    Colon,
    At,

    Newline,
    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}

fn keyword_kind(word: &str) -> Option<TokenKind> {
    match word {
        "ef" => Some(TokenKind::Ef),
        "while" => Some(TokenKind::While),
        "if" => Some(TokenKind::If),
        "diff" => Some(TokenKind::Diff),
        "ec" => Some(TokenKind::Ec),
        "ret" => Some(TokenKind::Ret),
        "new" => Some(TokenKind::New),
        "Save" => Some(TokenKind::Save),
        "Message" => Some(TokenKind::Message),
        "typeof" => Some(TokenKind::Typeof),
        _ => None,
    }
}

pub struct Lexer {
    source: Vec<char>,
    current: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            source: source.chars().collect(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        while !self.is_at_end() {
            if let Some(token) = self.next_token()? {
                tokens.push(token);
            }
        }
        tokens.push(Token::new(TokenKind::Eof, "", self.line, self.column));
        Ok(tokens)
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn peek(&self) -> char {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> char {
        self.source.get(self.current + offset).copied().unwrap_or('\0')
    }

    fn advance(&mut self) -> char {
        if self.is_at_end() {
            return '\0';
        }
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '/' if self.peek_at(1) == '/' => {
                    while !self.is_at_end() && self.peek() != '\n' {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Returns `None` for a skipped error token, matching the teacher's
    /// "invalid characters are dropped from the final stream" behavior.
    fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        self.skip_whitespace();
        if self.is_at_end() {
            return Ok(None);
        }

        let c = self.peek();

        if c == '\n' {
            self.advance();
            return Ok(Some(Token::new(TokenKind::Newline, "\n", self.line - 1, self.column)));
        }
        if c.is_ascii_digit() {
            return Ok(Some(self.make_number()));
        }
        if c == '"' || c == '\'' {
            return self.make_string().map(Some);
        }
        if c.is_alphabetic() || c == '_' {
            return Ok(Some(self.make_identifier()));
        }
        self.make_operator()
    }

    fn make_number(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while self.peek().is_ascii_digit() || self.peek() == '.' {
            text.push(self.advance());
        }
        Token::new(TokenKind::Number, text, line, column)
    }

    fn make_string(&mut self) -> Result<Token, LexError> {
        let (line, column) = (self.line, self.column);
        let quote = self.advance();
        let mut text = String::new();
        while !self.is_at_end() && self.peek() != quote {
            if self.peek() == '\\' {
                self.advance();
                let escaped = self.advance();
                text.push(match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    other => other,
                });
            } else {
                text.push(self.advance());
            }
        }
        if self.is_at_end() {
            return Err(LexError::UnterminatedString { line });
        }
        self.advance();
        Ok(Token::new(TokenKind::String, text, line, column))
    }

    fn make_identifier(&mut self) -> Token {
        let (line, column) = (self.line, self.column);
        let mut text = String::new();
        while self.peek().is_alphanumeric() || self.peek() == '_' {
            text.push(self.advance());
        }
        let kind = keyword_kind(&text).unwrap_or(TokenKind::Identifier);
        Token::new(kind, text, line, column)
    }

    fn make_operator(&mut self) -> Result<Option<Token>, LexError> {
        let (line, column) = (self.line, self.column);
        let c = self.advance();
        let single = |kind: TokenKind, ch: char| Token::new(kind, ch.to_string(), line, column);

        let token = match c {
            '+' => single(TokenKind::Plus, c),
            '-' => single(TokenKind::Minus, c),
            '*' => single(TokenKind::Star, c),
            '/' => single(TokenKind::Slash, c),
            '%' => single(TokenKind::Percent, c),
            '(' => single(TokenKind::LParen, c),
            ')' => single(TokenKind::RParen, c),
            '{' => single(TokenKind::LBrace, c),
            '}' => single(TokenKind::RBrace, c),
            '[' => single(TokenKind::LBracket, c),
            ']' => single(TokenKind::RBracket, c),
            ';' => single(TokenKind::Semicolon, c),
            ',' => single(TokenKind::Comma, c),
            '.' => single(TokenKind::Dot, c),
            ':' => single(TokenKind::Colon, c),
            '^' => single(TokenKind::Import, c),
            '@' => single(TokenKind::At, c),
            '=' => {
                if self.peek() == '=' {
                    self.advance();
                    Token::new(TokenKind::Equal, "==", line, column)
                } else if self.peek() == '>' {
                    self.advance();
                    Token::new(TokenKind::Arrow, "=>", line, column)
                } else {
                    Token::new(TokenKind::Assign, "=", line, column)
                }
            }
            '!' => {
                if self.peek() == '=' {
                    self.advance();
                    Token::new(TokenKind::NotEqual, "!=", line, column)
                } else {
                    return Ok(None);
                }
            }
            '<' => {
                if self.peek() == '=' {
                    self.advance();
                    Token::new(TokenKind::LessEqual, "<=", line, column)
                } else if self.peek() == '<' {
                    self.advance();
                    Token::new(TokenKind::InterpolateStart, "<<", line, column)
                } else {
                    Token::new(TokenKind::Less, "<", line, column)
                }
            }
            '>' => {
                if self.peek() == '=' {
                    self.advance();
                    Token::new(TokenKind::GreaterEqual, ">=", line, column)
                } else if self.peek() == '>' {
                    self.advance();
                    Token::new(TokenKind::InterpolateEnd, ">>", line, column)
                } else {
                    Token::new(TokenKind::Greater, ">", line, column)
                }
            }
            _ => return Ok(None),
        };
        Ok(Some(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        Lexer::new(src).tokenize().unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_keywords_and_identifiers() {
        assert_eq!(
            kinds("ef foo"),
            vec![TokenKind::Ef, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_multi_char_operators_maximal_munch() {
        assert_eq!(
            kinds("<< >> <= >= == != =>"),
            vec![
                TokenKind::InterpolateStart,
                TokenKind::InterpolateEnd,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::Equal,
                TokenKind::NotEqual,
                TokenKind::Arrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comment_is_skipped() {
        assert_eq!(kinds("1 // comment\n2"), vec![
            TokenKind::Number,
            TokenKind::Newline,
            TokenKind::Number,
            TokenKind::Eof,
        ]);
    }

    #[test]
    fn test_unterminated_string_errors() {
        let err = Lexer::new("\"abc").tokenize().unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { line: 1 });
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""a\nb""#).tokenize().unwrap();
        assert_eq!(tokens[0].lexeme, "a\nb");
    }

    #[test]
    fn test_number_permissive_multi_dot() {
        let tokens = Lexer::new("12.34.56").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Number);
        assert_eq!(tokens[0].lexeme, "12.34.56");
    }

    #[test]
    fn test_both_quote_styles() {
        let tokens = Lexer::new("'hi'").tokenize().unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].lexeme, "hi");
    }

    #[test]
    fn test_unrecognized_characters_are_skipped_not_fatal() {
        assert_eq!(
            kinds("1 # 2 ! 3"),
            vec![
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
    }
}
