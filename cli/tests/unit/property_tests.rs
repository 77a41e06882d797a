//! Property-based tests for suffix generation and name verification.
//!
//! Uses `proptest` to verify invariants across many random inputs.

#![allow(clippy::expect_used)]

use std::collections::HashSet;

use proptest::prelude::*;

use jokester_e2e::domain::run::{TestRun, unique_id, validate_suffix};

proptest! {
    /// Generated suffixes are always `-test-` plus six lowercase base-36 chars.
    #[test]
    fn prop_generated_suffix_has_valid_format(env in "[a-z]{1,12}") {
        let run = TestRun::generate(&env).expect("generated suffix must validate");
        let suffix = run.resource_suffix();
        prop_assert!(suffix.starts_with("-test-"), "missing marker: {}", suffix);
        let id = &suffix["-test-".len()..];
        prop_assert_eq!(id.len(), 6);
        prop_assert!(
            id.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
            "bad chars: {}", id
        );
        prop_assert_eq!(run.environment(), env.as_str());
    }

    /// For every valid suffix the expected name is the prefix plus the suffix,
    /// and it verifies against itself.
    #[test]
    fn prop_expected_name_is_prefix_plus_suffix(id in "[a-z0-9]{1,20}") {
        let suffix = format!("-test-{id}");
        let run = TestRun::with_suffix("test", &suffix).expect("valid suffix");
        let expected = format!("jokester-test-{id}");
        prop_assert_eq!(run.expected_function_name(), expected.clone());
        prop_assert!(run.verify_function_name(&expected).is_ok());
    }

    /// Any other name is rejected.
    #[test]
    fn prop_other_names_are_rejected(id in "[a-z0-9]{1,20}", other in "[a-zA-Z0-9-]{0,40}") {
        let run = TestRun::with_suffix("test", &format!("-test-{id}")).expect("valid suffix");
        if other != run.expected_function_name() {
            prop_assert!(run.verify_function_name(&other).is_err());
        }
    }

    /// Suffixes with characters outside `[a-z0-9-]` are rejected.
    #[test]
    fn prop_suffix_with_uppercase_rejected(s in "[a-z0-9-]{0,8}[A-Z_. ][a-z0-9-]{0,8}") {
        prop_assert!(validate_suffix(&s).is_err(), "accepted {}", s);
    }
}

#[test]
fn test_unique_id_uniqueness_batch() {
    let ids: HashSet<_> = (0..100).map(|_| unique_id().to_lowercase()).collect();
    assert_eq!(ids.len(), 100, "duplicate IDs generated");
}
