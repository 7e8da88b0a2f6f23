//! Query evaluation
//!
//! This module implements conjunctive queries against the current facts of a
//! [`Database`]. Answers are produced lazily by depth-first backtracking:
//! each atom is matched against every fact of its predicate, the substitution
//! from earlier atoms threaded through, and a complete substitution is yielded
//! once every atom has matched.
//!
//! Queries never trigger inference and never see rules, only stored facts.
//! Answer order follows fact-set iteration and is unspecified.
//!
//! # Example
//!
//! ```ignore
//! // Query: ?- parent(X, bob).
//! let answers: Vec<Substitution> = db.query(&[parent.atom(vec![x, bob])])?.collect();
//! ```

use crate::database::{Database, DatabaseError, Fact, Predicate};
use datalog_core::{unify_args, Substitution};
use datalog_parser::Atom;
use std::collections::hash_set;
use std::iter::FusedIterator;

impl Database {
    /// Evaluate a conjunction of atoms against the current facts.
    ///
    /// Every atom is checked against the registered predicates before any
    /// answer is produced. An empty conjunction yields one empty substitution.
    pub fn query(&self, atoms: &[Atom]) -> Result<Answers<'_>, DatabaseError> {
        let predicates = atoms
            .iter()
            .map(|atom| self.check_atom(atom))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Answers::new(atoms.to_vec(), predicates))
    }
}

struct Frame<'db> {
    /// Index of the atom this frame is matching
    depth: usize,
    /// Bindings made by atoms before `depth`
    subst: Substitution,
    facts: hash_set::Iter<'db, Fact>,
}

/// Lazy, finite, non-restartable sequence of query answers
pub struct Answers<'db> {
    body: Vec<Atom>,
    predicates: Vec<&'db Predicate>,
    stack: Vec<Frame<'db>>,
    yield_empty: bool,
}

impl<'db> Answers<'db> {
    fn new(body: Vec<Atom>, predicates: Vec<&'db Predicate>) -> Self {
        let mut answers = Answers {
            body,
            predicates,
            stack: Vec::new(),
            yield_empty: false,
        };
        match answers.predicates.first() {
            Some(&first) => answers.stack.push(Frame {
                depth: 0,
                subst: Substitution::new(),
                facts: first.facts.iter(),
            }),
            None => answers.yield_empty = true,
        }
        answers
    }
}

impl Iterator for Answers<'_> {
    type Item = Substitution;

    fn next(&mut self) -> Option<Substitution> {
        if self.yield_empty {
            self.yield_empty = false;
            return Some(Substitution::new());
        }

        while let Some(frame) = self.stack.last_mut() {
            let Some(fact) = frame.facts.next() else {
                self.stack.pop();
                continue;
            };

            let atom = &self.body[frame.depth];
            let Some(subst) = unify_args(&atom.terms, fact.terms(), frame.subst.clone()) else {
                continue;
            };

            let depth = frame.depth + 1;
            if depth == self.body.len() {
                return Some(subst);
            }

            let predicate: &Predicate = self.predicates[depth];
            self.stack.push(Frame {
                depth,
                subst,
                facts: predicate.facts.iter(),
            });
        }

        None
    }
}

impl FusedIterator for Answers<'_> {}
