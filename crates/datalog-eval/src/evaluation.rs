//! Fixpoint inference
//!
//! This module materializes every fact entailed by the stored facts and rules
//! using naive bottom-up evaluation. Each pass evaluates every rule body as a
//! query against a stable snapshot of the facts, collects the instantiated
//! heads, and only then commits them. Facts derived during a pass are
//! therefore visible starting with the next pass, which makes the fixpoint
//! independent of the order predicates and rules were declared.
//!
//! # Example
//!
//! ```ignore
//! // ancestor(X, Y) :- parent(X, Y).
//! // ancestor(X, Z) :- parent(X, Y), ancestor(Y, Z).
//! let stats = db.infer()?;
//! println!("{} facts derived in {} passes", stats.facts_derived, stats.iterations);
//! ```

use crate::database::{Database, DatabaseError, Fact};
use datalog_parser::{Atom, Symbol};
use tracing::{debug, info};

/// Errors that can occur during inference
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Database(#[from] DatabaseError),
    /// A rule instantiated its head with unbound variables
    #[error("rule for `{predicate}` derived non-ground fact {fact}")]
    NonGroundDerivation { predicate: Symbol, fact: Atom },
    /// Inference ran the configured number of passes without reaching a fixpoint
    #[error("no fixpoint after {limit} passes")]
    IterationLimit { limit: usize },
}

/// Knobs for [`Database::infer_with`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InferenceOptions {
    /// Maximum number of passes, counting the final pass that confirms the
    /// fixpoint. `None` runs until a fixpoint is reached.
    pub max_iterations: Option<usize>,
}

impl InferenceOptions {
    pub fn with_max_iterations(limit: usize) -> Self {
        InferenceOptions {
            max_iterations: Some(limit),
        }
    }
}

/// Statistics about one inference run
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EvaluationStats {
    /// Number of passes performed, including the one that found nothing new
    pub iterations: usize,
    /// Total number of rule applications (rule evaluated once = 1 application)
    pub rule_applications: usize,
    /// Number of new facts derived (not counting duplicates)
    pub facts_derived: usize,
}

impl Database {
    /// Run inference to a fixpoint with default options.
    pub fn infer(&mut self) -> Result<EvaluationStats, EvaluationError> {
        self.infer_with(&InferenceOptions::default())
    }

    /// Run inference to a fixpoint.
    ///
    /// Termination is only guaranteed when rules cannot build unboundedly many
    /// new terms; set [`InferenceOptions::max_iterations`] to guard against that.
    pub fn infer_with(
        &mut self,
        options: &InferenceOptions,
    ) -> Result<EvaluationStats, EvaluationError> {
        let mut stats = EvaluationStats::default();

        loop {
            if let Some(limit) = options.max_iterations {
                if stats.iterations >= limit {
                    return Err(EvaluationError::IterationLimit { limit });
                }
            }
            stats.iterations += 1;

            let candidates = self.derive(&mut stats)?;
            let candidate_count = candidates.len();

            let mut new_facts = 0;
            for (predicate, fact) in candidates {
                if self.insert(predicate, fact).is_new() {
                    new_facts += 1;
                }
            }
            stats.facts_derived += new_facts;

            debug!(
                pass = stats.iterations,
                candidates = candidate_count,
                new_facts,
                "inference pass"
            );

            if new_facts == 0 {
                info!(
                    iterations = stats.iterations,
                    facts_derived = stats.facts_derived,
                    "reached fixpoint"
                );
                return Ok(stats);
            }
        }
    }

    /// Evaluate every rule against the current facts without committing anything
    fn derive(&self, stats: &mut EvaluationStats) -> Result<Vec<(Symbol, Fact)>, EvaluationError> {
        let mut candidates = Vec::new();

        for predicate in self.predicates() {
            for rule in predicate.rules() {
                stats.rule_applications += 1;

                for subst in self.query(&rule.body)? {
                    let head = subst.apply_atom(&rule.head);
                    if !head.is_ground() {
                        return Err(EvaluationError::NonGroundDerivation {
                            predicate: head.predicate,
                            fact: head,
                        });
                    }
                    candidates.push((head.predicate, Fact::new(head.terms)));
                }
            }
        }

        Ok(candidates)
    }
}
