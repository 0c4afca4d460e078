//! Generator configuration

use crate::error::ConfigError;
use crate::range::CharRange;

/// Default extra repetitions allowed past `min` for unbounded repetitions
pub const DEFAULT_MAX_REPEAT: u32 = 100;

/// Pattern flags that affect generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// `i`: letters may be emitted in either case
    pub ignore_case: bool,
    /// `m`: stored for completeness; anchors emit nothing either way
    pub multiline: bool,
}

impl Flags {
    /// Parse JavaScript style flag characters such as `"gi"`
    ///
    /// `i` and `m` are honoured. `g`, `s`, `u`, `y` and `d` do not change
    /// what a single sample looks like and are accepted as no-ops.
    pub fn parse(flags: &str) -> Result<Self, ConfigError> {
        let mut parsed = Flags::default();
        for c in flags.chars() {
            match c {
                'i' => parsed.ignore_case = true,
                'm' => parsed.multiline = true,
                'g' | 's' | 'u' | 'y' | 'd' => {}
                other => return Err(ConfigError::UnknownFlag(other)),
            }
        }
        Ok(parsed)
    }

    /// Strip a leading inline flag group like `(?i)` or `(?mi)` off a pattern
    ///
    /// Returns the flags it set and the rest of the pattern. Patterns that do
    /// not start with such a group come back unchanged.
    pub fn split_inline(pattern: &str) -> (Self, &str) {
        let Some(rest) = pattern.strip_prefix("(?") else {
            return (Flags::default(), pattern);
        };
        let Some(end) = rest.find(')') else {
            return (Flags::default(), pattern);
        };
        let letters = &rest[..end];
        if letters.is_empty() || !letters.chars().all(|c| c == 'i' || c == 'm') {
            return (Flags::default(), pattern);
        }
        let flags = Flags {
            ignore_case: letters.contains('i'),
            multiline: letters.contains('m'),
        };
        (flags, &rest[end + 1..])
    }
}

/// Knobs a generator is built with
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Unbounded repetitions sample at most `min + max_repeat` times
    pub max_repeat: u32,
    /// Universe for negated classes and class intersection
    pub default_range: CharRange,
    /// Pattern flags
    pub flags: Flags,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_repeat: DEFAULT_MAX_REPEAT,
            default_range: CharRange::printable_ascii(),
            flags: Flags::default(),
        }
    }
}

impl GeneratorConfig {
    /// Default knobs with the given flags
    pub fn with_flags(flags: Flags) -> Self {
        Self {
            flags,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flags() {
        assert_eq!(Flags::parse("").unwrap(), Flags::default());
        let flags = Flags::parse("gim").unwrap();
        assert!(flags.ignore_case);
        assert!(flags.multiline);
        assert_eq!(Flags::parse("suyd").unwrap(), Flags::default());
    }

    #[test]
    fn test_parse_unknown_flag() {
        assert_eq!(Flags::parse("ix"), Err(ConfigError::UnknownFlag('x')));
    }

    #[test]
    fn test_split_inline() {
        let (flags, rest) = Flags::split_inline("(?i)abc");
        assert!(flags.ignore_case);
        assert!(!flags.multiline);
        assert_eq!(rest, "abc");

        let (flags, rest) = Flags::split_inline("(?mi)^a$");
        assert!(flags.ignore_case && flags.multiline);
        assert_eq!(rest, "^a$");
    }

    #[test]
    fn test_split_inline_leaves_groups_alone() {
        for pattern in ["(?:ab)", "(?<n>a)", "(?i", "abc", "(?)x"] {
            let (flags, rest) = Flags::split_inline(pattern);
            assert_eq!(flags, Flags::default());
            assert_eq!(rest, pattern);
        }
    }

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.max_repeat, 100);
        assert_eq!(config.default_range, CharRange::span(32, 126));
        assert_eq!(config.flags, Flags::default());
    }
}
