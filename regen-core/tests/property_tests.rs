//! Property tests
//!
//! `CharRange` algebra is compared against a plain `BTreeSet` model, and
//! counted patterns are generated, sampled and matched.

use std::collections::BTreeSet;

use proptest::prelude::*;
use regen_core::{CharRange, Generator, Span};

fn spans() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0u32..200, 0u32..20), 0..6)
        .prop_map(|v| v.into_iter().map(|(start, len)| (start, start + len)).collect())
}

fn range_of(spans: &[(u32, u32)]) -> CharRange {
    spans.iter().map(|&(a, b)| Span::new(a, b)).collect()
}

fn model_of(spans: &[(u32, u32)]) -> BTreeSet<u32> {
    spans.iter().flat_map(|&(a, b)| a..=b).collect()
}

fn points(range: &CharRange) -> BTreeSet<u32> {
    range.iter().collect()
}

mod char_range {
    use super::*;

    proptest! {
        #[test]
        fn union_matches_model(a in spans(), b in spans()) {
            let mut range = range_of(&a);
            range.union(&range_of(&b));
            let model: BTreeSet<_> = model_of(&a).union(&model_of(&b)).copied().collect();
            prop_assert_eq!(points(&range), model);
        }

        #[test]
        fn intersect_matches_model(a in spans(), b in spans()) {
            let mut range = range_of(&a);
            range.intersect(&range_of(&b));
            let model: BTreeSet<_> = model_of(&a).intersection(&model_of(&b)).copied().collect();
            prop_assert_eq!(points(&range), model);
        }

        #[test]
        fn difference_matches_model(a in spans(), b in spans()) {
            let mut range = range_of(&a);
            range.difference(&range_of(&b));
            let model: BTreeSet<_> = model_of(&a).difference(&model_of(&b)).copied().collect();
            prop_assert_eq!(points(&range), model);
        }

        #[test]
        fn spans_stay_canonical(a in spans(), b in spans()) {
            let mut range = range_of(&a);
            range.difference(&range_of(&b));
            range.union(&range_of(&b));
            for pair in range.spans().windows(2) {
                prop_assert!(pair[0].end() + 1 < pair[1].start());
            }
        }

        #[test]
        fn get_walks_in_order(a in spans()) {
            let range = range_of(&a);
            let model: Vec<_> = model_of(&a).into_iter().collect();
            prop_assert_eq!(range.len(), model.len() as u64);
            for (i, code) in model.iter().enumerate() {
                prop_assert_eq!(range.get(i as u64), Some(*code));
                prop_assert!(range.contains(*code));
            }
            prop_assert_eq!(range.get(model.len() as u64), None);
        }
    }
}

mod counted_patterns {
    use super::*;

    fn class() -> impl Strategy<Value = &'static str> {
        prop::sample::select(vec!["a-z", "0-9", "A-Fx_", "^a-z", r"\w", r"\d-"])
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn valid_samples_match(class in class(), min in 0u32..5, extra in 0u32..5, seed: u64) {
            let pattern = format!("^[{class}]{{{min},{}}}$", min + extra);
            let re = regex::Regex::new(&pattern).unwrap();
            let mut generator = Generator::new(&pattern).unwrap().seed(seed);
            for _ in 0..20 {
                let sample = generator.generate_valid().unwrap();
                prop_assert!(re.is_match(&sample), "{} rejected {:?}", pattern, sample);
            }
        }

        #[test]
        fn invalid_samples_fail(class in class(), min in 1u32..5, extra in 0u32..5, seed: u64) {
            let pattern = format!("^[{class}]{{{min},{}}}$", min + extra);
            let re = regex::Regex::new(&pattern).unwrap();
            let mut generator = Generator::new(&pattern).unwrap().seed(seed);
            for _ in 0..20 {
                let sample = generator.generate_invalid().unwrap();
                prop_assert!(!re.is_match(&sample), "{} accepted {:?}", pattern, sample);
            }
        }
    }
}
