//! Error types for the generator
//!
//! This module provides comprehensive error handling using the `thiserror` crate.
//! Errors are categorized by their source: lexing, parsing, configuration,
//! argument validation, or generation.

use thiserror::Error;

/// The main error type for the generator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegenError {
    /// Errors that occur during lexing/tokenization
    #[error("lexer error at position {position}: {kind}")]
    Lexer {
        /// Position in the input where the error occurred
        position: usize,
        /// The specific kind of lexer error
        kind: LexerErrorKind,
    },

    /// Errors that occur during parsing
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The generator was handed something it cannot be built from
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A caller-supplied argument was rejected before generation started
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Generation reached a state it cannot produce output from
    #[error("generation error: {0}")]
    Generate(#[from] GenerateError),
}

/// Specific kinds of lexer errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexerErrorKind {
    /// A backslash at the very end of the pattern
    #[error("trailing backslash")]
    TrailingBackslash,

    /// `\x`, `\u` or `\u{...}` without the required hex digits
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    /// `(?<name` or `\k<name` without the closing `>`
    #[error("unclosed group name")]
    UnclosedGroupName,

    /// Invalid group name
    #[error("invalid group name '{0}'")]
    InvalidGroupName(String),
}

/// Errors that occur during parsing
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// Unexpected token encountered
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        /// What was expected
        expected: String,
        /// What was actually found
        found: String,
    },

    /// Unexpected end of input
    #[error("unexpected end of input")]
    UnexpectedEof,

    /// A quantifier with no preceding atom
    #[error("nothing to repeat before {0}")]
    NothingToRepeat(String),

    /// Duplicate group name
    #[error("duplicate group name '{0}'")]
    DuplicateGroupName(String),

    /// Undefined backreference
    #[error("undefined backreference '{0}'")]
    UndefinedBackreference(String),

    /// Invalid quantifier
    #[error("invalid quantifier: {0}")]
    InvalidQuantifier(String),

    /// A class range whose start is after its end
    #[error("character class range out of order: {start:#x}-{end:#x}")]
    InvalidClassRange {
        /// First code point of the range
        start: u32,
        /// Last code point of the range
        end: u32,
    },
}

/// Errors raised while building a generator
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The tree handed to the generator does not start at a root node
    #[error("expected a root token tree, found {0}")]
    NotARoot(&'static str),

    /// A flag character outside the accepted set
    #[error("unknown flag '{0}'")]
    UnknownFlag(char),
}

/// Errors raised when checking arguments to an invalid generation call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// An explicit invalid group is not one of the root's slots
    #[error("invalid group {index} is out of bounds for a tree with {group_size} slots")]
    GroupOutOfBounds {
        /// The rejected index
        index: usize,
        /// Number of slots available
        group_size: usize,
    },
}

/// Errors raised during a generation call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    /// `{0,}` style repetitions have no count outside their bounds
    #[error("repetition {{{min},}} has no repeat count outside its bounds")]
    UnboundedRepetition {
        /// Lower bound of the repetition
        min: u32,
    },

    /// Every printable character was excluded when corrupting a literal
    #[error("no replacement character left for literal {0:#x}")]
    ExhaustedUniverse(u32),

    /// The tree has no slots, so there is nothing to corrupt
    #[error("pattern has no slots to corrupt")]
    NothingToCorrupt,

    /// The random primitive broke its contract
    #[error("random source returned {value} outside [{low}, {high}]")]
    RandomOutOfRange {
        /// Requested lower bound
        low: u32,
        /// Requested upper bound
        high: u32,
        /// The value it produced
        value: u32,
    },

    /// A code point that has no `char` representation
    #[error("code point {0:#x} is not a unicode scalar value")]
    InvalidCodePoint(u32),
}

/// Result type alias for generator operations
pub type Result<T> = std::result::Result<T, RegenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_error_display() {
        let err = RegenError::Lexer {
            position: 5,
            kind: LexerErrorKind::InvalidEscape('x'),
        };
        assert_eq!(
            err.to_string(),
            "lexer error at position 5: invalid escape sequence '\\x'"
        );
    }

    #[test]
    fn test_parse_error_unexpected_token() {
        let err = ParseError::UnexpectedToken {
            expected: "`)`".to_string(),
            found: "EOF".to_string(),
        };
        assert_eq!(err.to_string(), "expected `)`, found EOF");
    }

    #[test]
    fn test_parse_error_duplicate_group() {
        let err = ParseError::DuplicateGroupName("name".to_string());
        assert_eq!(err.to_string(), "duplicate group name 'name'");
    }

    #[test]
    fn test_regen_error_from_parse_error() {
        let parse_err = ParseError::UnexpectedEof;
        let err: RegenError = parse_err.into();
        assert_eq!(err.to_string(), "parse error: unexpected end of input");
    }

    #[test]
    fn test_validation_error_display() {
        let err: RegenError = ValidationError::GroupOutOfBounds {
            index: 9,
            group_size: 3,
        }
        .into();
        assert_eq!(
            err.to_string(),
            "validation error: invalid group 9 is out of bounds for a tree with 3 slots"
        );
    }

    #[test]
    fn test_generate_error_display() {
        let err = GenerateError::UnboundedRepetition { min: 0 };
        assert_eq!(
            err.to_string(),
            "repetition {0,} has no repeat count outside its bounds"
        );

        let err = GenerateError::RandomOutOfRange {
            low: 1,
            high: 3,
            value: 7,
        };
        assert_eq!(err.to_string(), "random source returned 7 outside [1, 3]");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NotARoot("char");
        assert_eq!(err.to_string(), "expected a root token tree, found char");
    }
}
