//! Property-based tests for the value comparisons and expression aliases.
//!
//! Direct-data restrictions and closed-world comparisons implement the same
//! bounds in two places; these tests keep them in agreement.

use pbconf_ontology::Literal;
use pbconf_validator::closed_world::check_value;
use pbconf_validator::compile::restrictions;
use pbconf_validator::expression::alias;
use pbconf_validator::Comparator;
use proptest::prelude::*;

// =============================================================================
// Aliases
// =============================================================================

proptest! {
    /// Every alias is two ASCII letters.
    #[test]
    fn prop_alias_is_two_letters(index: i64) {
        let name = alias(index);
        prop_assert_eq!(name.len(), 2);
        prop_assert!(name.chars().all(|c| c.is_ascii_alphabetic()));
    }

    /// Distinct indexes in range get distinct aliases.
    #[test]
    fn prop_alias_is_injective(a in 0i64..2704, b in 0i64..2704) {
        prop_assume!(a != b);
        prop_assert_ne!(alias(a), alias(b));
    }
}

// =============================================================================
// Comparator Properties
// =============================================================================

proptest! {
    /// `gt` and `lte` split the integers between them.
    #[test]
    fn prop_gt_lte_complementary(bound: i32, value: i32) {
        let (bound, value) = (bound.to_string(), value.to_string());
        let gt = check_value(Comparator::Gt, &bound, &value).is_ok();
        let lte = check_value(Comparator::Lte, &bound, &value).is_ok();
        prop_assert_ne!(gt, lte);
    }

    /// `lt` and `gte` split the integers between them.
    #[test]
    fn prop_lt_gte_complementary(bound: i32, value: i32) {
        let (bound, value) = (bound.to_string(), value.to_string());
        let lt = check_value(Comparator::Lt, &bound, &value).is_ok();
        let gte = check_value(Comparator::Gte, &bound, &value).is_ok();
        prop_assert_ne!(lt, gte);
    }

    /// `eq` and `neq` never agree.
    #[test]
    fn prop_eq_neq_complementary(bound in -50i32..50, value in -50i32..50) {
        let (bound, value) = (bound.to_string(), value.to_string());
        let eq = check_value(Comparator::Eq, &bound, &value).is_ok();
        let neq = check_value(Comparator::Neq, &bound, &value).is_ok();
        prop_assert_ne!(eq, neq);
    }

    /// Mixed case passes exactly when neither single case does.
    #[test]
    fn prop_mixed_case_excludes_single_case(text in "[a-zA-Z]{1,12}") {
        let lower = check_value(Comparator::Complexity, "lowercase", &text).is_ok();
        let upper = check_value(Comparator::Complexity, "uppercase", &text).is_ok();
        let mixed = check_value(Comparator::Complexity, "mixedcase", &text).is_ok();
        prop_assert_eq!(mixed, !lower && !upper);
    }

    /// Closed-world length limits are strict.
    #[test]
    fn prop_min_length_is_strict(text in "[a-z]{0,20}") {
        let length = text.len().to_string();
        prop_assert!(check_value(Comparator::MinLength, &length, &text).is_err());
        prop_assert!(check_value(Comparator::MaxLength, &length, &text).is_err());
    }
}

// =============================================================================
// Direct Restrictions Agree With Closed-World Comparisons
// =============================================================================

proptest! {
    /// Integer bounds compile to facets that admit what the comparison passes.
    #[test]
    fn prop_integer_facets_match_comparisons(bound: i32, value: i32) {
        let literal = Literal::Int(i64::from(value));
        let (bound_text, value_text) = (bound.to_string(), value.to_string());
        for (predicate, comparator) in [
            ("gt", Comparator::Gt),
            ("lt", Comparator::Lt),
            ("gte", Comparator::Gte),
            ("lte", Comparator::Lte),
        ] {
            let ranges = restrictions(predicate, &bound_text);
            prop_assert_eq!(ranges.len(), 1);
            prop_assert_eq!(
                ranges[0].matches(&literal),
                check_value(comparator, &bound_text, &value_text).is_ok(),
                "{} {} {}", value, predicate, bound
            );
        }
    }

    /// The single-case patterns admit what the complexity comparison passes.
    #[test]
    fn prop_case_patterns_match_comparisons(text in "[a-zA-Z]{1,12}") {
        let literal = Literal::Str(text.clone());
        for case in ["lowercase", "uppercase"] {
            let ranges = restrictions("complexity", case);
            prop_assert_eq!(ranges.len(), 1);
            prop_assert_eq!(
                ranges[0].matches(&literal),
                check_value(Comparator::Complexity, case, &text).is_ok()
            );
        }
    }

    /// Values that are not integers yield no bound.
    #[test]
    fn prop_non_integer_bounds_are_dropped(value in "[a-z]{1,8}") {
        for predicate in ["min-length", "max-length", "gt", "lt", "gte", "lte", "eq", "neq"] {
            prop_assert!(restrictions(predicate, &value).is_empty());
        }
    }
}
