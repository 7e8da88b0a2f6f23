//! Fact and rule storage
//!
//! A [`Database`] owns one [`Predicate`] per registered name. Each predicate
//! has a fixed arity, a set of ground fact tuples, and an insertion-ordered
//! list of rules whose head is an atom of that predicate.
//!
//! # Example
//!
//! ```
//! use datalog_eval::Database;
//! use datalog_parser::Term;
//!
//! let mut db = Database::new();
//! let parent = db.predicate("parent", 2).unwrap();
//! let ancestor = db.predicate("ancestor", 2).unwrap();
//! let (x, y) = (db.variable("X").unwrap(), db.variable("Y").unwrap());
//!
//! db.add_fact(parent.atom(vec![Term::constant("alice"), Term::constant("bob")])).unwrap();
//! db.add_rule(
//!     ancestor.atom(vec![x.clone(), y.clone()]),
//!     vec![parent.atom(vec![x, y])],
//! )
//! .unwrap();
//! ```

use datalog_parser::{sym, Atom, Program, Query, Rule, Statement, Symbol, Term};
use datalog_safety::{check_program_safety, SafetyError};
use std::collections::{HashMap, HashSet};

/// Errors raised while building or querying a database
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatabaseError {
    #[error("undefined predicate `{0}`")]
    UndefinedPredicate(Symbol),
    #[error("predicate `{0}` is already defined")]
    DuplicatePredicate(Symbol),
    #[error("variable `{0}` is already defined")]
    DuplicateVariable(Symbol),
    /// Atom has wrong number of arguments for its predicate
    #[error("arity mismatch for {predicate}: expected {expected} arguments, found {found}")]
    ArityMismatch {
        predicate: Symbol,
        expected: usize,
        found: usize,
    },
    /// Attempted to assert a fact containing variables
    #[error("cannot assert non-ground fact: {0}")]
    NonGroundFact(Atom),
    #[error("rule for {0} has an empty body")]
    EmptyRuleBody(Atom),
}

/// Outcome of a successful fact assertion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The fact was newly inserted (did not exist before)
    Inserted,
    /// The fact already existed (duplicate, no change)
    Duplicate,
}

impl InsertOutcome {
    /// Returns true if the fact was newly inserted
    pub fn is_new(&self) -> bool {
        matches!(self, InsertOutcome::Inserted)
    }
}

/// A ground tuple stored under some predicate
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fact(Vec<Term>);

impl Fact {
    pub(crate) fn new(terms: Vec<Term>) -> Self {
        Fact(terms)
    }

    pub fn terms(&self) -> &[Term] {
        &self.0
    }
}

/// Handle returned by [`Database::predicate`], used to build atoms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PredicateRef {
    name: Symbol,
    arity: usize,
}

impl PredicateRef {
    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Apply this predicate to terms. Arity is checked when the atom is used.
    pub fn atom(&self, terms: Vec<Term>) -> Atom {
        Atom {
            predicate: self.name,
            terms,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Predicate {
    name: Symbol,
    arity: usize,
    pub(crate) facts: HashSet<Fact>,
    rules: Vec<Rule>,
}

impl Predicate {
    fn new(name: Symbol, arity: usize) -> Self {
        Predicate {
            name,
            arity,
            facts: HashSet::new(),
            rules: Vec::new(),
        }
    }

    pub fn name(&self) -> Symbol {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Facts in no particular order
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    /// Facts rendered as ground atoms
    pub fn atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        self.facts.iter().map(|fact| Atom {
            predicate: self.name,
            terms: fact.0.clone(),
        })
    }

    pub fn fact_count(&self) -> usize {
        self.facts.len()
    }

    pub fn contains(&self, terms: &[Term]) -> bool {
        self.facts.contains(&Fact(terms.to_vec()))
    }

    /// Rules in insertion order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    fn handle(&self) -> PredicateRef {
        PredicateRef {
            name: self.name,
            arity: self.arity,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Database {
    predicates: HashMap<Symbol, Predicate>,
    variables: HashSet<Symbol>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a predicate with a fixed arity
    pub fn predicate(&mut self, name: &str, arity: usize) -> Result<PredicateRef, DatabaseError> {
        let name = sym(name);
        if self.predicates.contains_key(&name) {
            return Err(DatabaseError::DuplicatePredicate(name));
        }
        let predicate = Predicate::new(name, arity);
        let handle = predicate.handle();
        self.predicates.insert(name, predicate);
        Ok(handle)
    }

    /// Register a variable name for use in rules and queries
    pub fn variable(&mut self, name: &str) -> Result<Term, DatabaseError> {
        let name = sym(name);
        if !self.variables.insert(name) {
            return Err(DatabaseError::DuplicateVariable(name));
        }
        Ok(Term::Variable(name))
    }

    /// Look up a registered predicate by name
    pub fn get(&self, name: &str) -> Result<&Predicate, DatabaseError> {
        let name = sym(name);
        self.predicates
            .get(&name)
            .ok_or(DatabaseError::UndefinedPredicate(name))
    }

    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.predicates.values()
    }

    /// Current facts of a predicate as ground atoms
    pub fn facts(&self, name: &str) -> Result<impl Iterator<Item = Atom> + '_, DatabaseError> {
        Ok(self.get(name)?.atoms())
    }

    /// Rules of a predicate in insertion order
    pub fn rules(&self, name: &str) -> Result<&[Rule], DatabaseError> {
        Ok(self.get(name)?.rules())
    }

    /// Total number of facts across all predicates
    pub fn fact_count(&self) -> usize {
        self.predicates.values().map(Predicate::fact_count).sum()
    }

    /// Resolve the predicate an atom refers to, checking its arity
    pub(crate) fn check_atom(&self, atom: &Atom) -> Result<&Predicate, DatabaseError> {
        let predicate = self
            .predicates
            .get(&atom.predicate)
            .ok_or(DatabaseError::UndefinedPredicate(atom.predicate))?;
        if predicate.arity != atom.arity() {
            return Err(DatabaseError::ArityMismatch {
                predicate: atom.predicate,
                expected: predicate.arity,
                found: atom.arity(),
            });
        }
        Ok(predicate)
    }

    /// Assert a ground fact. Asserting an existing fact is a no-op.
    pub fn add_fact(&mut self, atom: Atom) -> Result<InsertOutcome, DatabaseError> {
        self.check_atom(&atom)?;
        if !atom.is_ground() {
            return Err(DatabaseError::NonGroundFact(atom));
        }
        Ok(self.insert(atom.predicate, Fact(atom.terms)))
    }

    /// Append a rule `head :- body` to the head's predicate
    pub fn add_rule(&mut self, head: Atom, body: Vec<Atom>) -> Result<(), DatabaseError> {
        if body.is_empty() {
            return Err(DatabaseError::EmptyRuleBody(head));
        }
        for atom in &body {
            self.check_atom(atom)?;
        }
        self.check_atom(&head)?;

        if let Some(predicate) = self.predicates.get_mut(&head.predicate) {
            predicate.rules.push(Rule { head, body });
        }
        Ok(())
    }

    /// Store a fact whose predicate and arity are already known to be valid
    pub(crate) fn insert(&mut self, predicate: Symbol, fact: Fact) -> InsertOutcome {
        match self.predicates.get_mut(&predicate) {
            Some(p) => {
                if p.facts.insert(fact) {
                    InsertOutcome::Inserted
                } else {
                    InsertOutcome::Duplicate
                }
            }
            None => InsertOutcome::Duplicate,
        }
    }

    /// Load a parsed program, registering predicates as they first appear.
    ///
    /// Facts and rules are added; the program's queries are returned for the
    /// caller to run after inference.
    pub fn load_program(&mut self, program: &Program) -> Result<Vec<Query>, DatabaseError> {
        let mut queries = Vec::new();
        for statement in &program.statements {
            match statement {
                Statement::Fact(atom) => {
                    self.declare(atom)?;
                    self.add_fact(atom.clone())?;
                }
                Statement::Rule(rule) => {
                    self.declare(&rule.head)?;
                    for atom in &rule.body {
                        self.declare(atom)?;
                    }
                    self.add_rule(rule.head.clone(), rule.body.clone())?;
                }
                Statement::Query(query) => queries.push(query.clone()),
            }
        }
        Ok(queries)
    }

    fn declare(&mut self, atom: &Atom) -> Result<(), DatabaseError> {
        match self.predicates.get(&atom.predicate) {
            Some(_) => self.check_atom(atom).map(|_| ()),
            None => {
                self.predicates.insert(
                    atom.predicate,
                    Predicate::new(atom.predicate, atom.arity()),
                );
                Ok(())
            }
        }
    }

    /// Report rules whose head variables are not bound by their body
    pub fn check_safety(&self) -> Vec<SafetyError> {
        check_program_safety(self.predicates.values().flat_map(|p| p.rules.iter()))
    }
}
