//! Plain-text rendering of unifiers and query answers

use datalog_core::Substitution;
use datalog_parser::{Query, Term};

/// `No` for failure, otherwise `Yes` followed by one `X = term` line per
/// binding, ordered by variable name
pub fn unifier_lines(unifier: Option<&Substitution>) -> Vec<String> {
    let Some(subst) = unifier else {
        return vec!["No".to_string()];
    };

    let mut lines = vec!["Yes".to_string()];
    lines.extend(
        subst
            .sorted()
            .into_iter()
            .map(|(var, term)| format!("{} = {}", var, term)),
    );
    lines
}

/// One line per answer, projected onto the query's variables in order of
/// first appearance. A ground query answers `Yes`; no answers at all is `No`.
pub fn answer_lines(query: &Query, answers: &[Substitution]) -> Vec<String> {
    if answers.is_empty() {
        return vec!["No".to_string()];
    }

    let variables = query.variables();
    if variables.is_empty() {
        return vec!["Yes".to_string()];
    }

    let mut lines: Vec<String> = answers
        .iter()
        .map(|answer| {
            variables
                .iter()
                .map(|var| format!("{} = {}", var, answer.apply(&Term::Variable(*var))))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect();
    lines.sort();
    lines.dedup();
    lines
}
