//! Safety checking for Datalog rules
//!
//! A rule is range-restricted ("safe") when every variable in its head also
//! appears somewhere in its body. Only safe rules are guaranteed to derive
//! ground facts. The evaluator does not enforce this; callers run these
//! checks when they want a report up front.
//!
//! # Example
//!
//! ```ignore
//! // Safe: ancestor(X, Y) :- parent(X, Y).
//! // Unsafe: owns(X, Y) :- person(X).   // Y never bound
//! ```

use datalog_parser::{Rule, Symbol};
use std::collections::HashSet;

/// Error indicating a rule is unsafe
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SafetyError {
    /// Head variables that no body atom binds
    #[error("unsafe rule '{rule}': head variables {} do not appear in the body", join(.variables))]
    UnboundHeadVariables { rule: String, variables: Vec<Symbol> },
}

fn join(variables: &[Symbol]) -> String {
    variables
        .iter()
        .map(|v| v.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Check if a rule is safe
pub fn check_rule_safety(rule: &Rule) -> Result<(), SafetyError> {
    let mut body_vars = HashSet::new();
    for atom in &rule.body {
        atom.collect_variables(&mut body_vars);
    }

    let mut head_vars = HashSet::new();
    rule.head.collect_variables(&mut head_vars);

    let mut unbound: Vec<Symbol> = head_vars
        .into_iter()
        .filter(|v| !body_vars.contains(v))
        .collect();

    if unbound.is_empty() {
        return Ok(());
    }

    unbound.sort_by(|a, b| a.as_str().cmp(b.as_str()));
    Err(SafetyError::UnboundHeadVariables {
        rule: rule.to_string(),
        variables: unbound,
    })
}

/// Check every rule, collecting all violations rather than stopping at the first
pub fn check_program_safety<'a>(rules: impl IntoIterator<Item = &'a Rule>) -> Vec<SafetyError> {
    rules
        .into_iter()
        .filter_map(|rule| check_rule_safety(rule).err())
        .collect()
}
