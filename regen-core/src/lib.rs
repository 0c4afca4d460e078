//! Regen Core Library
//!
//! Generates strings that match a regular expression, or that are built to
//! fail it, straight from the pattern's structure.

pub mod ast;
pub mod config;
pub mod error;
pub mod generator;
pub mod groups;
pub mod lexer;
pub mod parser;
pub mod random;
pub mod range;
pub mod selection;

pub use ast::{Anchor, Body, CharSet, ClassItem, Group, Lookaround, Node, Repetition};
pub use config::{DEFAULT_MAX_REPEAT, Flags, GeneratorConfig};
pub use error::{
    ConfigError, GenerateError, LexerErrorKind, ParseError, RegenError, Result, ValidationError,
};
pub use generator::Generator;
pub use groups::{CaptureTable, GroupRegistry, GroupRegistryError, assign_slots};
pub use lexer::{Lexer, Token};
pub use parser::{Parser, parse};
pub use random::{DefaultRand, RandInt, RngSource};
pub use range::{CharRange, Span};
pub use selection::{CorruptionPlan, InvalidGroups};

/// One string matching `pattern`
pub fn generate_valid(pattern: &str) -> Result<String> {
    Generator::new(pattern)?.generate_valid()
}

/// One string that fails `pattern`
pub fn generate_invalid(pattern: &str) -> Result<String> {
    Generator::new(pattern)?.generate_invalid()
}
