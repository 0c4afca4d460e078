//! Parser for regex patterns
//!
//! This module provides a recursive descent parser that converts
//! tokens into a token tree ([`Node`]).
//!
//! Grammar (in order of precedence, lowest to highest):
//!   regex       := alternation
//!   alternation := sequence ( '|' sequence )*
//!   sequence    := quantified*
//!   quantified  := atom ( quantifier '?'? )?
//!   quantifier  := '*' | '+' | '?' | '{' number (',' number?)? '}'
//!   atom        := literal | anchor | group | char_class | '.' | backref | escape
//!   group       := '(' ( '?:' | '?=' | '?!' | '?<=' | '?<!' | '?<' name '>' )? alternation ')'
//!   char_class  := '[' '^'? class_item* ']'
//!   class_item  := char | char '-' char | shorthand
//!   backref     := '\' number | '\k<' name '>'

use tracing::trace;

use crate::ast::{Anchor, CharSet, ClassItem, Group, Lookaround, Node};
use crate::error::{ParseError, RegenError};
use crate::groups::{GroupRegistry, GroupRegistryError};
use crate::lexer::{Lexer, Token};

/// Parser for regex patterns
pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    registry: GroupRegistry,
}

impl From<GroupRegistryError> for ParseError {
    fn from(err: GroupRegistryError) -> Self {
        match err {
            GroupRegistryError::DuplicateGroupName(name) => ParseError::DuplicateGroupName(name),
            GroupRegistryError::UndefinedBackreference(name) => {
                ParseError::UndefinedBackreference(name)
            }
        }
    }
}

impl Parser {
    /// Create a new parser for the given input string
    pub fn new(input: &str) -> Result<Self, RegenError> {
        let mut lexer = Lexer::new(input);
        let current_token = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current_token,
            registry: GroupRegistry::new(),
        })
    }

    /// Groups registered so far
    pub fn registry(&self) -> &GroupRegistry {
        &self.registry
    }

    /// Advance to the next token
    fn advance(&mut self) -> Result<(), RegenError> {
        self.current_token = self.lexer.next_token()?;
        Ok(())
    }

    /// Expect a specific token, error if not found
    fn expect(&mut self, expected: Token) -> Result<(), RegenError> {
        if self.current_token == expected {
            self.advance()
        } else if self.current_token == Token::Eof {
            Err(ParseError::UnexpectedEof.into())
        } else {
            Err(ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.current_token.to_string(),
            }
            .into())
        }
    }

    /// Parse the entire input and return the root of the tree
    pub fn parse(&mut self) -> Result<Node, RegenError> {
        let group = self.parse_alternation()?;

        // Ensure we've consumed all tokens
        if self.current_token != Token::Eof {
            return Err(ParseError::UnexpectedToken {
                expected: "EOF".to_string(),
                found: self.current_token.to_string(),
            }
            .into());
        }

        trace!(groups = self.registry.group_count(), "parsed pattern");
        Ok(Node::Root(group))
    }

    /// Parse alternation (lowest precedence)
    /// alternation := sequence ( '|' sequence )*
    fn parse_alternation(&mut self) -> Result<Group, RegenError> {
        let mut alternatives = vec![self.parse_sequence()?];

        while self.current_token == Token::Pipe {
            self.advance()?; // consume '|'
            alternatives.push(self.parse_sequence()?);
        }

        Ok(Group::alternatives(alternatives))
    }

    /// Parse a sequence (concatenation)
    /// sequence := quantified*
    fn parse_sequence(&mut self) -> Result<Vec<Node>, RegenError> {
        let mut nodes = Vec::new();

        while !self.is_sequence_end() {
            nodes.push(self.parse_quantified()?);
        }

        Ok(nodes)
    }

    /// Check if we've reached the end of a sequence
    fn is_sequence_end(&self) -> bool {
        matches!(
            self.current_token,
            Token::Eof | Token::RightParen | Token::Pipe
        )
    }

    /// Parse a quantified expression
    /// quantified := atom ( quantifier '?'? )?
    fn parse_quantified(&mut self) -> Result<Node, RegenError> {
        let atom = self.parse_atom()?;

        let Some((min, max)) = self.parse_quantifier()? else {
            return Ok(atom);
        };
        if max.is_some_and(|max| max < min) {
            return Err(ParseError::InvalidQuantifier(format!(
                "{{{},{}}} has its bounds out of order",
                min,
                max.unwrap_or_default()
            ))
            .into());
        }
        // A trailing `?` makes the quantifier lazy, which generation ignores
        if self.current_token == Token::Question {
            self.advance()?;
        }
        Ok(Node::repetition(atom, min, max))
    }

    /// Parse a quantifier if present, as inclusive bounds
    fn parse_quantifier(&mut self) -> Result<Option<(u32, Option<u32>)>, RegenError> {
        let bounds = match &self.current_token {
            Token::Star => (0, None),
            Token::Plus => (1, None),
            Token::Question => (0, Some(1)),
            Token::Counted { min, max } => (*min, *max),
            _ => return Ok(None),
        };
        self.advance()?;
        Ok(Some(bounds))
    }

    fn is_quantifier(token: &Token) -> bool {
        matches!(
            token,
            Token::Star | Token::Plus | Token::Question | Token::Counted { .. }
        )
    }

    /// Parse an atomic expression
    fn parse_atom(&mut self) -> Result<Node, RegenError> {
        let node = match &self.current_token {
            Token::Literal(c) => Node::Char(*c as u32),
            Token::Escape(code) => Node::Char(*code),
            Token::Dot => Node::Set(CharSet::any()),
            Token::Caret => Node::Position(Anchor::Start),
            Token::Dollar => Node::Position(Anchor::End),
            Token::WordBoundary => Node::Position(Anchor::WordBoundary),
            Token::NonWordBoundary => Node::Position(Anchor::NonWordBoundary),
            Token::BackrefNumber(n) => Node::Reference(*n),
            Token::BackrefName(name) => {
                Node::Reference(self.registry.validate_backref_name(name).map_err(ParseError::from)?)
            }
            Token::WordChar => Node::Set(CharSet::word()),
            Token::NonWordChar => Node::Set(CharSet::word().negate()),
            Token::Digit => Node::Set(CharSet::digit()),
            Token::NonDigit => Node::Set(CharSet::digit().negate()),
            Token::Whitespace => Node::Set(CharSet::whitespace()),
            Token::NonWhitespace => Node::Set(CharSet::whitespace().negate()),
            Token::LeftParen
            | Token::NonCapturing
            | Token::Lookahead
            | Token::NegativeLookahead
            | Token::Lookbehind
            | Token::NegativeLookbehind
            | Token::NamedGroupStart(_) => return self.parse_group(),
            Token::LeftBracket | Token::NegatedBracket => return self.parse_char_class(),
            Token::Eof => return Err(ParseError::UnexpectedEof.into()),
            token if Self::is_quantifier(token) => {
                return Err(ParseError::NothingToRepeat(token.to_string()).into());
            }
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "expression".to_string(),
                    found: self.current_token.to_string(),
                }
                .into());
            }
        };
        self.advance()?;
        Ok(node)
    }

    /// Parse a group of any kind
    fn parse_group(&mut self) -> Result<Node, RegenError> {
        let opener = self.current_token.clone();
        self.advance()?;

        // Register before the body so nested groups number after their parent
        let capture = match &opener {
            Token::LeftParen => Some(None),
            Token::NamedGroupStart(name) => Some(Some(name.clone())),
            _ => None,
        };
        if let Some(name) = &capture {
            self.registry
                .register_group(name.clone())
                .map_err(ParseError::from)?;
        }

        let mut group = self.parse_alternation()?;
        self.expect(Token::RightParen)?;

        group.lookaround = match opener {
            Token::Lookahead => Some(Lookaround::FollowedBy),
            Token::NegativeLookahead => Some(Lookaround::NotFollowedBy),
            Token::Lookbehind => Some(Lookaround::PrecededBy),
            Token::NegativeLookbehind => Some(Lookaround::NotPrecededBy),
            _ => None,
        };
        if let Some(name) = capture {
            group.remember = true;
            group.name = name;
        }
        Ok(Node::Group(group))
    }

    /// Parse a character class
    /// char_class := '[' '^'? class_item* ']'
    fn parse_char_class(&mut self) -> Result<Node, RegenError> {
        let negated = self.current_token == Token::NegatedBracket;
        self.advance()?;

        let mut items = Vec::new();
        while self.current_token != Token::RightBracket {
            if self.current_token == Token::Eof {
                return Err(ParseError::UnexpectedEof.into());
            }
            items.push(self.parse_class_item()?);
        }
        self.expect(Token::RightBracket)?;

        Ok(Node::Set(CharSet { negated, items }))
    }

    /// Single code point of a class token, if it stands for one
    fn class_code(token: &Token) -> Option<u32> {
        match token {
            Token::Literal(c) => Some(*c as u32),
            Token::Escape(code) => Some(*code),
            _ => None,
        }
    }

    /// Parse an item in a character class
    /// class_item := char | char '-' char | shorthand
    fn parse_class_item(&mut self) -> Result<ClassItem, RegenError> {
        let shorthand = match &self.current_token {
            Token::Digit => Some(CharSet::digit()),
            Token::NonDigit => Some(CharSet::digit().negate()),
            Token::WordChar => Some(CharSet::word()),
            Token::NonWordChar => Some(CharSet::word().negate()),
            Token::Whitespace => Some(CharSet::whitespace()),
            Token::NonWhitespace => Some(CharSet::whitespace().negate()),
            _ => None,
        };
        if let Some(set) = shorthand {
            self.advance()?;
            return Ok(ClassItem::Set(set));
        }

        let Some(start) = Self::class_code(&self.current_token) else {
            return Err(ParseError::UnexpectedToken {
                expected: "character or escape".to_string(),
                found: self.current_token.to_string(),
            }
            .into());
        };
        self.advance()?;

        // A raw '-' between two single characters makes a range
        if self.current_token != Token::Literal('-') {
            return Ok(ClassItem::Char(start));
        }
        self.advance()?; // consume '-'
        match Self::class_code(&self.current_token) {
            Some(end) => {
                self.advance()?;
                if end < start {
                    return Err(ParseError::InvalidClassRange { start, end }.into());
                }
                Ok(ClassItem::Range(start, end))
            }
            // `[a-]` or `[a-\d]`: the '-' is literal and the next token is left for the caller
            None => Ok(ClassItem::Set(CharSet::of(vec![
                ClassItem::Char(start),
                ClassItem::Char('-' as u32),
            ]))),
        }
    }
}

/// Parse a regex pattern string into a token tree
pub fn parse(input: &str) -> Result<Node, RegenError> {
    let mut parser = Parser::new(input)?;
    parser.parse()
}
