//! Property-based tests for unification using proptest
//!
//! Terms are generated over a small vocabulary so that random pairs share
//! variables and functors often enough for unification to succeed.

use datalog_core::{unify, Substitution};
use datalog_parser::{parse_term, SrcId, Term};
use proptest::prelude::*;

const VARIABLES: &[&str] = &["X", "Y", "Z", "W"];
const CONSTANTS: &[&str] = &["a", "b", "c", "1"];
const FUNCTORS: &[&str] = &["f", "g", "h"];

fn variable_strategy() -> impl Strategy<Value = Term> {
    prop::sample::select(VARIABLES).prop_map(Term::var)
}

fn term_strategy() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        variable_strategy(),
        prop::sample::select(CONSTANTS).prop_map(Term::constant),
    ];
    leaf.prop_recursive(3, 24, 3, |inner| {
        (
            prop::sample::select(FUNCTORS),
            prop::collection::vec(inner, 0..3),
        )
            .prop_map(|(functor, args)| Term::app(functor, args))
    })
}

/// No bound variable appears in any right-hand side
fn is_flat(subst: &Substitution) -> bool {
    subst
        .iter()
        .all(|(_, term)| subst.iter().all(|(var, _)| !term.contains_variable(var)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn test_unify_reflexive(term in term_strategy()) {
        let subst = unify(&term, &term);
        prop_assert_eq!(subst, Some(Substitution::new()));
    }

    #[test]
    fn test_unify_symmetric(lhs in term_strategy(), rhs in term_strategy()) {
        let forward = unify(&lhs, &rhs);
        let backward = unify(&rhs, &lhs);
        prop_assert_eq!(forward.is_some(), backward.is_some(),
            "unify({}, {}) disagrees with its mirror", lhs, rhs);
        if let Some(subst) = backward {
            prop_assert_eq!(subst.apply(&lhs), subst.apply(&rhs));
        }
    }

    #[test]
    fn test_unifier_is_sound(lhs in term_strategy(), rhs in term_strategy()) {
        if let Some(subst) = unify(&lhs, &rhs) {
            prop_assert_eq!(subst.apply(&lhs), subst.apply(&rhs),
                "{} does not unify {} and {}", subst, lhs, rhs);
        }
    }

    #[test]
    fn test_unifier_is_idempotent(lhs in term_strategy(), rhs in term_strategy()) {
        if let Some(subst) = unify(&lhs, &rhs) {
            prop_assert!(is_flat(&subst), "{} is not flat", subst);
            for term in [&lhs, &rhs] {
                let once = subst.apply(term);
                prop_assert_eq!(subst.apply(&once), once);
            }
        }
    }

    #[test]
    fn test_variable_unifies_with_anything_it_does_not_occur_in(
        var in variable_strategy(),
        term in term_strategy(),
    ) {
        let Term::Variable(name) = var else { unreachable!() };
        let result = unify(&var, &term);
        if term == var || !term.contains_variable(&name) {
            prop_assert!(result.is_some());
        } else {
            // X against a compound term mentioning X
            prop_assert!(result.is_none(), "occurs check missed {} in {}", var, term);
        }
    }

    #[test]
    fn test_occurs_check_under_functor(
        var in variable_strategy(),
        functor in prop::sample::select(FUNCTORS),
        others in prop::collection::vec(term_strategy(), 0..3),
    ) {
        let mut args = others;
        args.push(var.clone());
        let term = Term::app(functor, args);
        prop_assert_eq!(unify(&var, &term), None);
        prop_assert_eq!(unify(&term, &var), None);
    }

    #[test]
    fn test_display_parses_back(term in term_strategy()) {
        let parsed = parse_term(&term.to_string(), SrcId::empty()).ok();
        prop_assert_eq!(parsed, Some(term));
    }
}
