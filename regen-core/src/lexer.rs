//! Lexer for tokenizing regex patterns
//!
//! This module provides a tokenizer that converts regex pattern strings
//! into a stream of tokens for parsing. The accepted syntax is the
//! ECMAScript flavour: `(?<name>...)` groups, `\k<name>` backreferences,
//! `\xHH`/`\uHHHH` escapes and counted quantifiers that fall back to a
//! literal `{` when malformed.

use crate::error::{LexerErrorKind, RegenError};
use std::fmt;

/// A token in a regex pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Capturing group opener `(`
    LeftParen,
    /// Non-capturing group marker `(?:`
    NonCapturing,
    /// Positive lookahead `(?=`
    Lookahead,
    /// Negative lookahead `(?!`
    NegativeLookahead,
    /// Positive lookbehind `(?<=`
    Lookbehind,
    /// Negative lookbehind `(?<!`
    NegativeLookbehind,
    /// A named group opener `(?<name>` or `(?P<name>`
    NamedGroupStart(String),
    /// Right parenthesis `)`
    RightParen,
    /// Left bracket `[` (start of character class)
    LeftBracket,
    /// Negated class opener `[^`
    NegatedBracket,
    /// Right bracket `]` (end of character class)
    RightBracket,
    /// Pipe `|` (alternation)
    Pipe,
    /// Caret `^` (start anchor)
    Caret,
    /// Dollar `$` (end anchor)
    Dollar,
    /// Dot `.` (any character)
    Dot,
    /// Star `*` (zero or more)
    Star,
    /// Plus `+` (one or more)
    Plus,
    /// Question `?` (optional, or lazy marker after a quantifier)
    Question,
    /// A counted quantifier `{n}`, `{n,}` or `{n,m}`
    Counted {
        /// Lower bound
        min: u32,
        /// Upper bound, `None` for `{n,}`
        max: Option<u32>,
    },
    /// An escaped code point (e.g., \n, \x41, \u{1F600}, \., \-)
    Escape(u32),
    /// A backreference by number (e.g., \1, \2)
    BackrefNumber(u32),
    /// A backreference by name (e.g., \k<name>)
    BackrefName(String),
    /// Word character shorthand (\w)
    WordChar,
    /// Non-word character shorthand (\W)
    NonWordChar,
    /// Digit shorthand (\d)
    Digit,
    /// Non-digit shorthand (\D)
    NonDigit,
    /// Whitespace shorthand (\s)
    Whitespace,
    /// Non-whitespace shorthand (\S)
    NonWhitespace,
    /// Word boundary assertion (\b)
    WordBoundary,
    /// Non-word boundary assertion (\B)
    NonWordBoundary,
    /// A literal character
    Literal(char),
    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => write!(f, "`(`"),
            Token::NonCapturing => write!(f, "`(?:`"),
            Token::Lookahead => write!(f, "`(?=`"),
            Token::NegativeLookahead => write!(f, "`(?!`"),
            Token::Lookbehind => write!(f, "`(?<=`"),
            Token::NegativeLookbehind => write!(f, "`(?<!`"),
            Token::NamedGroupStart(name) => write!(f, "named group `{}`", name),
            Token::RightParen => write!(f, "`)`"),
            Token::LeftBracket => write!(f, "`[`"),
            Token::NegatedBracket => write!(f, "`[^`"),
            Token::RightBracket => write!(f, "`]`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Caret => write!(f, "`^`"),
            Token::Dollar => write!(f, "`$`"),
            Token::Dot => write!(f, "`.`"),
            Token::Star => write!(f, "`*`"),
            Token::Plus => write!(f, "`+`"),
            Token::Question => write!(f, "`?`"),
            Token::Counted { min, max: None } => write!(f, "`{{{},}}`", min),
            Token::Counted { min, max: Some(max) } => write!(f, "`{{{},{}}}`", min, max),
            Token::Escape(code) => write!(f, "escape `\\u{{{:x}}}`", code),
            Token::BackrefNumber(n) => write!(f, "backref `\\{}`", n),
            Token::BackrefName(name) => write!(f, "backref `\\k<{}>`", name),
            Token::WordChar => write!(f, "shorthand `\\w`"),
            Token::NonWordChar => write!(f, "shorthand `\\W`"),
            Token::Digit => write!(f, "shorthand `\\d`"),
            Token::NonDigit => write!(f, "shorthand `\\D`"),
            Token::Whitespace => write!(f, "shorthand `\\s`"),
            Token::NonWhitespace => write!(f, "shorthand `\\S`"),
            Token::WordBoundary => write!(f, "boundary `\\b`"),
            Token::NonWordBoundary => write!(f, "boundary `\\B`"),
            Token::Literal(c) => write!(f, "literal `{}`", c),
            Token::Eof => write!(f, "EOF"),
        }
    }
}

/// Lexer for tokenizing regex patterns
pub struct Lexer {
    chars: Vec<char>,
    position: usize,
    /// Whether we're currently inside a character class
    in_char_class: bool,
}

impl Lexer {
    /// Create a new lexer for the given input string
    pub fn new(input: &str) -> Self {
        Lexer {
            chars: input.chars().collect(),
            position: 0,
            in_char_class: false,
        }
    }

    /// Character position of the next unread character
    pub fn position(&self) -> usize {
        self.position
    }

    fn current(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.position + offset).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.current();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.current() == Some(expected) {
            self.position += 1;
            true
        } else {
            false
        }
    }

    fn error(&self, kind: LexerErrorKind) -> RegenError {
        RegenError::Lexer {
            position: self.position,
            kind,
        }
    }

    /// Read digits in `radix`, at most `limit` of them
    fn read_digits(&mut self, radix: u32, limit: usize) -> Option<u32> {
        let mut value: Option<u32> = None;
        let mut count = 0;
        while count < limit {
            let Some(digit) = self.current().and_then(|c| c.to_digit(radix)) else {
                break;
            };
            value = Some(value.unwrap_or(0).saturating_mul(radix).saturating_add(digit));
            self.position += 1;
            count += 1;
        }
        value
    }

    /// Read exactly `count` hex digits
    fn read_hex_exact(&mut self, count: usize, escape: char) -> Result<u32, RegenError> {
        let start = self.position;
        match self.read_digits(16, count) {
            Some(value) if self.position - start == count => Ok(value),
            _ => Err(self.error(LexerErrorKind::InvalidEscape(escape))),
        }
    }

    /// Read a group name up to and including the closing `>`
    fn read_group_name(&mut self) -> Result<String, RegenError> {
        let mut name = String::new();
        loop {
            match self.advance() {
                Some('>') => break,
                Some(c) => name.push(c),
                None => return Err(self.error(LexerErrorKind::UnclosedGroupName)),
            }
        }
        let mut chars = name.chars();
        let valid = match chars.next() {
            Some(first) => {
                (first.is_alphabetic() || first == '_' || first == '$')
                    && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
            }
            None => false,
        };
        if valid {
            Ok(name)
        } else {
            Err(self.error(LexerErrorKind::InvalidGroupName(name)))
        }
    }

    /// Try to read `{n}`, `{n,}` or `{n,m}` after the opening brace
    fn read_counted(&mut self) -> Option<Token> {
        let start = self.position;
        let counted = (|| {
            let min = self.read_digits(10, usize::MAX)?;
            let max = if self.eat(',') {
                self.read_digits(10, usize::MAX)
            } else {
                Some(min)
            };
            self.eat('}').then_some(Token::Counted { min, max })
        })();
        if counted.is_none() {
            self.position = start;
        }
        counted
    }

    /// Read an escape sequence (assumes backslash was already consumed)
    fn read_escape(&mut self) -> Result<Token, RegenError> {
        let Some(c) = self.advance() else {
            return Err(self.error(LexerErrorKind::TrailingBackslash));
        };

        let token = match c {
            'w' => Token::WordChar,
            'W' => Token::NonWordChar,
            'd' => Token::Digit,
            'D' => Token::NonDigit,
            's' => Token::Whitespace,
            'S' => Token::NonWhitespace,
            'b' if self.in_char_class => Token::Escape(0x08),
            'b' => Token::WordBoundary,
            'B' if !self.in_char_class => Token::NonWordBoundary,
            'n' => Token::Escape('\n' as u32),
            'r' => Token::Escape('\r' as u32),
            't' => Token::Escape('\t' as u32),
            'v' => Token::Escape(0x0b),
            'f' => Token::Escape(0x0c),
            'x' => Token::Escape(self.read_hex_exact(2, 'x')?),
            'u' => {
                if self.eat('{') {
                    let value = self
                        .read_digits(16, 6)
                        .filter(|v| *v <= 0x10ffff)
                        .ok_or_else(|| self.error(LexerErrorKind::InvalidEscape('u')))?;
                    if !self.eat('}') {
                        return Err(self.error(LexerErrorKind::InvalidEscape('u')));
                    }
                    Token::Escape(value)
                } else {
                    Token::Escape(self.read_hex_exact(4, 'u')?)
                }
            }
            'c' => match self.current() {
                Some(letter) if letter.is_ascii_alphabetic() => {
                    self.position += 1;
                    Token::Escape(letter as u32 % 32)
                }
                _ => Token::Escape('c' as u32),
            },
            'k' if !self.in_char_class && self.current() == Some('<') => {
                self.position += 1;
                Token::BackrefName(self.read_group_name()?)
            }
            '0'..='7' if self.in_char_class => {
                // Legacy octal escape inside a class
                self.position -= 1;
                Token::Escape(self.read_digits(8, 3).unwrap_or(0))
            }
            '0' => Token::Escape(0),
            '1'..='9' if !self.in_char_class => {
                self.position -= 1;
                Token::BackrefNumber(self.read_digits(10, usize::MAX).unwrap_or(0))
            }
            other => Token::Escape(other as u32),
        };
        Ok(token)
    }

    /// Read a group opener (assumes `(` was already consumed)
    fn read_group_opener(&mut self) -> Result<Token, RegenError> {
        if self.current() != Some('?') {
            return Ok(Token::LeftParen);
        }
        let token = match (self.peek_at(1), self.peek_at(2)) {
            (Some(':'), _) => Token::NonCapturing,
            (Some('='), _) => Token::Lookahead,
            (Some('!'), _) => Token::NegativeLookahead,
            (Some('<'), Some('=')) => Token::Lookbehind,
            (Some('<'), Some('!')) => Token::NegativeLookbehind,
            (Some('<'), _) => {
                self.position += 2;
                return Ok(Token::NamedGroupStart(self.read_group_name()?));
            }
            (Some('P'), Some('<')) => {
                self.position += 3;
                return Ok(Token::NamedGroupStart(self.read_group_name()?));
            }
            // Not a special group, leave `?` for the parser to reject
            _ => return Ok(Token::LeftParen),
        };
        self.position += match token {
            Token::Lookbehind | Token::NegativeLookbehind => 3,
            _ => 2,
        };
        Ok(token)
    }

    fn next_class_token(&mut self, c: char) -> Result<Token, RegenError> {
        match c {
            '\\' => self.read_escape(),
            ']' => {
                self.in_char_class = false;
                Ok(Token::RightBracket)
            }
            other => Ok(Token::Literal(other)),
        }
    }

    /// Get the next token from the input
    pub fn next_token(&mut self) -> Result<Token, RegenError> {
        let Some(c) = self.advance() else {
            return Ok(Token::Eof);
        };
        if self.in_char_class {
            return self.next_class_token(c);
        }

        let token = match c {
            '\\' => self.read_escape()?,
            '(' => self.read_group_opener()?,
            ')' => Token::RightParen,
            '[' => {
                self.in_char_class = true;
                if self.eat('^') {
                    Token::NegatedBracket
                } else {
                    Token::LeftBracket
                }
            }
            '{' => self.read_counted().unwrap_or(Token::Literal('{')),
            '|' => Token::Pipe,
            '^' => Token::Caret,
            '$' => Token::Dollar,
            '.' => Token::Dot,
            '*' => Token::Star,
            '+' => Token::Plus,
            '?' => Token::Question,
            other => Token::Literal(other),
        };
        Ok(token)
    }

    /// Tokenize the entire input and return a vector of tokens
    pub fn tokenize(&mut self) -> Result<Vec<Token>, RegenError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            if token == Token::Eof {
                tokens.push(token);
                break;
            }
            tokens.push(token);
        }
        Ok(tokens)
    }
}
