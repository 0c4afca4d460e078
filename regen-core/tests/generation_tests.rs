//! Generation test suite
//!
//! Checks generated samples against independent regex engines: the `regex`
//! crate for plain patterns and `fancy-regex` where backreferences are
//! involved.

use regen_core::{CharRange, Generator, RegenError, ValidationError};

const TRIALS: usize = 1000;

fn matcher(pattern: &str) -> regex::Regex {
    regex::Regex::new(pattern).unwrap()
}

fn assert_all_valid(pattern: &str, flags: &str) {
    let re = matcher(&format!("(?{}){}", flags_or_default(flags), pattern));
    let mut generator = Generator::with_flags(pattern, flags).unwrap();
    for _ in 0..TRIALS {
        let sample = generator.generate_valid().unwrap();
        assert!(re.is_match(&sample), "{pattern:?} rejected {sample:?}");
    }
}

fn assert_all_invalid(pattern: &str) {
    let re = matcher(pattern);
    let mut generator = Generator::new(pattern).unwrap();
    for _ in 0..TRIALS {
        let sample = generator.generate_invalid().unwrap();
        assert!(!re.is_match(&sample), "{pattern:?} accepted {sample:?}");
    }
}

// The regex crate rejects an empty `(?)` group
fn flags_or_default(flags: &str) -> &str {
    if flags.contains('i') { "i" } else { "-i" }
}

mod valid_samples {
    use super::*;

    #[test]
    fn test_mixed_pattern() {
        assert_all_valid("^[a-c]{3,5}gg(ddd[4-9]{0,3})r{5,}$", "");
    }

    #[test]
    fn test_phone_number() {
        assert_all_valid(r"^\(\d{3}\) \d{3}-\d{4}$", "");
    }

    #[test]
    fn test_email_like() {
        assert_all_valid(r"^\w+@\w+\.(com|org|net)$", "");
    }

    #[test]
    fn test_alternation_and_nesting() {
        assert_all_valid("^(foo|ba(r|z)+|q?)x{2}$", "");
    }

    #[test]
    fn test_shorthands_and_dot() {
        assert_all_valid(r"^\s\S\d\D\w\W.$", "");
    }

    #[test]
    fn test_negated_classes() {
        assert_all_valid("^[^a-z0-9]{1,8}$", "");
    }

    #[test]
    fn test_escapes() {
        assert_all_valid(r"^\x41B[\x30-\x39]\.\*$", "");
    }

    #[test]
    fn test_ignore_case() {
        assert_all_valid("^hello [w-z]orld$", "i");
    }

    #[test]
    fn test_wide_default_range() {
        let re = matcher("^[^a]{5}$");
        let mut generator = Generator::new("^[^a]{5}$")
            .unwrap()
            .default_range(CharRange::span(0x20, 0x7ff));
        for _ in 0..TRIALS {
            let sample = generator.generate_valid().unwrap();
            assert!(re.is_match(&sample), "rejected {sample:?}");
        }
    }

    #[test]
    fn test_midpoint_source_repeats() {
        let mut generator = Generator::new(r"^[a-z]{2,9}\d*$")
            .unwrap()
            .rand_int(|low: u32, high: u32| low + (high - low) / 2);
        let first = generator.generate_valid().unwrap();
        for _ in 0..10 {
            assert_eq!(generator.generate_valid().unwrap(), first);
        }
    }
}

mod invalid_samples {
    use super::*;

    #[test]
    fn test_mixed_pattern() {
        assert_all_invalid("^[a-c]{3,5}gg(ddd[4-9]{0,3})r{5,}$");
    }

    #[test]
    fn test_literal_only() {
        assert_all_invalid("^hello world$");
    }

    #[test]
    fn test_counted_classes() {
        assert_all_invalid(r"^\d{3}-\d{4}$");
        assert_all_invalid("^[0-9a-f]{8}$");
    }

    #[test]
    fn test_names() {
        assert_all_invalid("^[A-Z][a-z]+ [A-Z][a-z]+$");
    }

    #[test]
    fn test_explicit_group_grows_repetition() {
        let re = matcher("^a{0,3}$");
        let mut generator = Generator::new("^a{0,3}$").unwrap().max_repeat(20);
        for _ in 0..TRIALS {
            let sample = generator.generate_invalid_groups([1]).unwrap();
            let count = sample.chars().count();
            assert!((4..=24).contains(&count), "count {count}");
            assert!(!re.is_match(&sample));
        }
    }

    #[test]
    fn test_explicit_groups_only_touch_their_slot() {
        let mut generator = Generator::new("abcdef").unwrap();
        for _ in 0..100 {
            let sample = generator.generate_invalid_groups([0, 5, 5]).unwrap();
            assert_eq!(&sample[1..5], "bcde");
            assert_ne!(&sample[..1], "a");
            assert_ne!(&sample[5..], "f");
        }
    }
}

mod backreferences {
    use super::*;

    fn fancy(pattern: &str) -> fancy_regex::Regex {
        fancy_regex::Regex::new(pattern).unwrap()
    }

    #[test]
    fn test_numbered_backreference() {
        let pattern = r"^([a-z]{2,4})-\1$";
        let re = fancy(pattern);
        let mut generator = Generator::new(pattern).unwrap();
        for _ in 0..TRIALS {
            let sample = generator.generate_valid().unwrap();
            assert!(re.is_match(&sample).unwrap(), "rejected {sample:?}");
        }
    }

    #[test]
    fn test_named_backreference() {
        let pattern = r"^(?<tag>[a-z]{1,5})=(?<v>\d+);\k<tag>$";
        let re = fancy(pattern);
        let mut generator = Generator::new(pattern).unwrap();
        for _ in 0..TRIALS {
            let sample = generator.generate_valid().unwrap();
            assert!(re.is_match(&sample).unwrap(), "rejected {sample:?}");
        }
    }

    #[test]
    fn test_backreference_to_nested_group() {
        let pattern = r"^((a|b)c)\2\1$";
        let re = fancy(pattern);
        let mut generator = Generator::new(pattern).unwrap();
        for _ in 0..TRIALS {
            let sample = generator.generate_valid().unwrap();
            assert!(re.is_match(&sample).unwrap(), "rejected {sample:?}");
        }
    }
}

mod validation {
    use super::*;

    #[test]
    fn test_group_size_counts_root_children() {
        let generator = Generator::new("^[a-c]{3,5}gg(ddd[4-9]{0,3})r{5,}$").unwrap();
        assert_eq!(generator.group_size(), 7);
        assert_eq!(generator.capture_count(), 1);
        assert_eq!(Generator::new("ab|cde").unwrap().group_size(), 3);
    }

    #[test]
    fn test_out_of_bounds_group() {
        let mut generator = Generator::new("abc").unwrap();
        let err = generator.generate_invalid_groups([7]).unwrap_err();
        assert_eq!(
            err,
            RegenError::Validation(ValidationError::GroupOutOfBounds {
                index: 7,
                group_size: 3
            })
        );
    }

    #[test]
    fn test_parse_errors_surface() {
        assert!(matches!(
            Generator::new("a{3,1}"),
            Err(RegenError::Parse(_))
        ));
        assert!(matches!(
            Generator::new(r"abc\"),
            Err(RegenError::Lexer { position: 4, .. })
        ));
    }
}
