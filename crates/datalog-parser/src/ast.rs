//! Abstract syntax for terms and Datalog programs
//!
//! # Key Components
//!
//! - **Term**: a variable, a constant, or an application `f(t1, ..., tn)`
//! - **Atom**: predicate applied to terms (e.g., `parent(alice, bob)`)
//! - **Rule**: a Horn clause `head :- body1, ..., bodyN`
//! - **Program**: a collection of statements (facts, rules, queries)
//!
//! # Syntax Examples
//!
//! - **Terms**: `f(X, g(Y), a)`
//! - **Facts**: `parent(alice, bob).`
//! - **Rules**: `ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).`
//! - **Queries**: `?- ancestor(X, carol).`
//!
//! Equality on every type here is structural. Terms are never mutated once
//! built; unification produces a substitution and resolved copies instead.

use internment::Intern;
use std::collections::HashSet;
use std::fmt;

/// Interned string for cheap copies and comparison
pub type Symbol = Intern<String>;

/// Intern a name as a [`Symbol`]
pub fn sym(name: &str) -> Symbol {
    Intern::new(name.to_string())
}

/// A term: the unit of unification
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Placeholder bound by substitutions, uppercase-leading (`X`, `Item`)
    Variable(Symbol),
    /// Atomic value, lowercase- or digit-leading (`alice`, `42`)
    Constant(Symbol),
    /// Compound term with a fixed arity: `f(a, X)`, `f()`
    Application(Symbol, Vec<Term>),
}

impl Term {
    pub fn var(name: &str) -> Self {
        Term::Variable(sym(name))
    }

    pub fn constant(name: &str) -> Self {
        Term::Constant(sym(name))
    }

    pub fn app(functor: &str, args: Vec<Term>) -> Self {
        Term::Application(sym(functor), args)
    }

    /// Check if this term is a variable
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Check if this term is ground (contains no variables)
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Variable(_) => false,
            Term::Constant(_) => true,
            Term::Application(_, args) => args.iter().all(Term::is_ground),
        }
    }

    /// Does `var` occur anywhere inside this term?
    pub fn contains_variable(&self, var: &Symbol) -> bool {
        match self {
            Term::Variable(v) => v == var,
            Term::Constant(_) => false,
            Term::Application(_, args) => args.iter().any(|arg| arg.contains_variable(var)),
        }
    }

    /// Collect the variables of this term into `vars`
    pub fn collect_variables(&self, vars: &mut HashSet<Symbol>) {
        match self {
            Term::Variable(v) => {
                vars.insert(*v);
            }
            Term::Constant(_) => {}
            Term::Application(_, args) => {
                for arg in args {
                    arg.collect_variables(vars);
                }
            }
        }
    }

    pub fn variables(&self) -> HashSet<Symbol> {
        let mut vars = HashSet::new();
        self.collect_variables(&mut vars);
        vars
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Variable(name) | Term::Constant(name) => write!(f, "{}", name),
            Term::Application(functor, args) => {
                write!(f, "{}(", functor)?;
                write_separated(f, args)?;
                write!(f, ")")
            }
        }
    }
}

/// An atom is a predicate applied to terms: `parent(alice, bob)`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub predicate: Symbol,
    pub terms: Vec<Term>,
}

impl Atom {
    /// Create a new atom with the given predicate and terms
    pub fn new(predicate: &str, terms: Vec<Term>) -> Self {
        Atom {
            predicate: sym(predicate),
            terms,
        }
    }

    pub fn arity(&self) -> usize {
        self.terms.len()
    }

    pub fn is_ground(&self) -> bool {
        self.terms.iter().all(Term::is_ground)
    }

    pub fn collect_variables(&self, vars: &mut HashSet<Symbol>) {
        for term in &self.terms {
            term.collect_variables(vars);
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.predicate)?;
        if !self.terms.is_empty() {
            write!(f, "(")?;
            write_separated(f, &self.terms)?;
            write!(f, ")")?;
        }
        Ok(())
    }
}

/// A rule has a head and a non-empty conjunctive body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub head: Atom,
    pub body: Vec<Atom>,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} :- ", self.head)?;
        write_separated(f, &self.body)?;
        write!(f, ".")
    }
}

/// A conjunctive query: `?- parent(X, bob), parent(bob, Y).`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub body: Vec<Atom>,
}

impl Query {
    /// Variables of the query, in order of first appearance
    pub fn variables(&self) -> Vec<Symbol> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        for atom in &self.body {
            for term in &atom.terms {
                collect_ordered(term, &mut seen, &mut ordered);
            }
        }
        ordered
    }
}

fn collect_ordered(term: &Term, seen: &mut HashSet<Symbol>, ordered: &mut Vec<Symbol>) {
    match term {
        Term::Variable(v) => {
            if seen.insert(*v) {
                ordered.push(*v);
            }
        }
        Term::Constant(_) => {}
        Term::Application(_, args) => {
            for arg in args {
                collect_ordered(arg, seen, ordered);
            }
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?- ")?;
        write_separated(f, &self.body)?;
        write!(f, ".")
    }
}

/// Top-level statements in a Datalog program
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A ground fact: `parent(alice, bob).`
    Fact(Atom),
    /// A rule with head and body: `ancestor(X, Y) :- parent(X, Y).`
    Rule(Rule),
    /// A query: `?- ancestor(X, carol).`
    Query(Query),
}

/// A Datalog program consists of facts, rules, and queries
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    pub statements: Vec<Statement>,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all facts from the program
    pub fn facts(&self) -> impl Iterator<Item = &Atom> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Fact(f) => Some(f),
            _ => None,
        })
    }

    /// Get all rules from the program
    pub fn rules(&self) -> impl Iterator<Item = &Rule> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Rule(r) => Some(r),
            _ => None,
        })
    }

    /// Get all queries from the program
    pub fn queries(&self) -> impl Iterator<Item = &Query> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Query(q) => Some(q),
            _ => None,
        })
    }
}

fn write_separated<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}
