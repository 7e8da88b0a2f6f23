//! Unification algorithm (Robinson's unification)
//!
//! This module implements first-order unification, which finds substitutions
//! that make two terms equal. This is a core operation in logic programming.
//!
//! # Algorithm
//!
//! Implements Robinson's unification algorithm with occurs check to prevent
//! infinite structures. Bindings are kept flattened as they are discovered,
//! so every substitution handed back is idempotent: no right-hand side
//! mentions a bound variable.
//!
//! Failure is `None`, never an empty substitution, and carries no partial
//! bindings.
//!
//! # Example
//!
//! ```
//! use datalog_core::unify;
//! use datalog_parser::Term;
//!
//! // f(X, b) with f(a, Y)
//! let lhs = Term::app("f", vec![Term::var("X"), Term::constant("b")]);
//! let rhs = Term::app("f", vec![Term::constant("a"), Term::var("Y")]);
//! let subst = unify(&lhs, &rhs).expect("terms unify");
//! assert_eq!(subst.apply(&lhs), subst.apply(&rhs));
//! ```

use datalog_parser::{Atom, Symbol, Term};
use std::collections::HashMap;
use std::fmt;
use tracing::trace;

/// A substitution maps variables to terms
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Substitution {
    bindings: HashMap<Symbol, Term>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an unbound variable to a term and re-flatten.
    ///
    /// `term` is resolved against the current bindings first, then every
    /// existing right-hand side mentioning `var` is rewritten to use the
    /// resolved term. Self-bindings (`X -> X`) are dropped. Only reachable
    /// through `unify`, which runs the occurs check first.
    pub(crate) fn bind(&mut self, var: Symbol, term: Term) {
        let term = self.apply(&term);
        if term == Term::Variable(var) {
            return;
        }

        for bound in self.bindings.values_mut() {
            if bound.contains_variable(&var) {
                *bound = replace_variable(bound, &var, &term);
            }
        }
        trace!(variable = %var, term = %term, "bind");
        self.bindings.insert(var, term);
        self.bindings
            .retain(|var, bound| !matches!(&*bound, Term::Variable(v) if v == var));
    }

    /// Get the binding for a variable
    pub fn get(&self, var: &Symbol) -> Option<&Term> {
        self.bindings.get(var)
    }

    /// Check if a variable is bound
    pub fn contains(&self, var: &Symbol) -> bool {
        self.bindings.contains_key(var)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over bindings, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Term)> {
        self.bindings.iter()
    }

    /// Bindings ordered by variable name
    pub fn sorted(&self) -> Vec<(Symbol, &Term)> {
        let mut bindings: Vec<(Symbol, &Term)> =
            self.bindings.iter().map(|(var, term)| (*var, term)).collect();
        bindings.sort_by(|a, b| a.0.as_str().cmp(b.0.as_str()));
        bindings
    }

    /// Apply substitution to a term, following chains of bindings until
    /// only constants and unbound variables remain
    pub fn apply(&self, term: &Term) -> Term {
        match term {
            Term::Variable(var) => match self.get(var) {
                Some(bound) => self.apply(bound),
                None => term.clone(),
            },
            Term::Constant(_) => term.clone(),
            Term::Application(functor, args) => {
                Term::Application(*functor, args.iter().map(|arg| self.apply(arg)).collect())
            }
        }
    }

    /// Apply substitution to an atom
    pub fn apply_atom(&self, atom: &Atom) -> Atom {
        Atom {
            predicate: atom.predicate,
            terms: atom.terms.iter().map(|t| self.apply(t)).collect(),
        }
    }
}

impl fmt::Display for Substitution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, term)) in self.sorted().into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} = {}", var, term)?;
        }
        write!(f, "}}")
    }
}

fn replace_variable(term: &Term, var: &Symbol, replacement: &Term) -> Term {
    match term {
        Term::Variable(v) if v == var => replacement.clone(),
        Term::Variable(_) | Term::Constant(_) => term.clone(),
        Term::Application(functor, args) => Term::Application(
            *functor,
            args.iter()
                .map(|arg| replace_variable(arg, var, replacement))
                .collect(),
        ),
    }
}

/// Occurs check: does `var` occur in `term` once the bindings in `subst`
/// are followed?
pub fn occurs_check(var: &Symbol, term: &Term, subst: &Substitution) -> bool {
    match term {
        Term::Variable(v) if v == var => true,
        Term::Variable(v) => subst
            .get(v)
            .is_some_and(|bound| occurs_check(var, bound, subst)),
        Term::Constant(_) => false,
        Term::Application(_, args) => args.iter().any(|arg| occurs_check(var, arg, subst)),
    }
}

/// Compute the most general unifier of two terms
pub fn unify(term1: &Term, term2: &Term) -> Option<Substitution> {
    unify_with(term1, term2, Substitution::new())
}

/// Unify two terms under an existing substitution, extending it
pub fn unify_with(term1: &Term, term2: &Term, subst: Substitution) -> Option<Substitution> {
    if term1 == term2 {
        return Some(subst);
    }

    match (term1, term2) {
        (Term::Variable(var), other) | (other, Term::Variable(var)) => {
            unify_variable(var, other, subst)
        }
        (Term::Application(f1, args1), Term::Application(f2, args2))
            if f1 == f2 && args1.len() == args2.len() =>
        {
            unify_args(args1, args2, subst)
        }
        // Differing functors or arities, constant mismatches, and
        // constant-vs-application all fail
        _ => None,
    }
}

/// Unify a variable with a term
pub fn unify_variable(var: &Symbol, term: &Term, subst: Substitution) -> Option<Substitution> {
    if let Some(bound) = subst.get(var).cloned() {
        return unify_with(&bound, term, subst);
    }
    if let Term::Variable(other) = term {
        if other == var {
            return Some(subst);
        }
        if let Some(bound) = subst.get(other).cloned() {
            return unify_with(&Term::Variable(*var), &bound, subst);
        }
    }
    if occurs_check(var, term, &subst) {
        trace!(variable = %var, term = %term, "occurs check failed");
        return None;
    }

    let mut subst = subst;
    subst.bind(*var, term.clone());
    Some(subst)
}

/// Unify argument lists pairwise, left to right, threading one substitution
/// through every pair
pub fn unify_args(lhs: &[Term], rhs: &[Term], subst: Substitution) -> Option<Substitution> {
    if lhs.len() != rhs.len() {
        return None;
    }

    let mut subst = subst;
    for (t1, t2) in lhs.iter().zip(rhs.iter()) {
        subst = unify_with(t1, t2, subst)?;
    }
    Some(subst)
}

/// Unify two atoms
pub fn unify_atoms(atom1: &Atom, atom2: &Atom, subst: Substitution) -> Option<Substitution> {
    if atom1.predicate != atom2.predicate {
        return None;
    }
    unify_args(&atom1.terms, &atom2.terms, subst)
}
