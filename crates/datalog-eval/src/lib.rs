pub mod database;
pub mod evaluation;
pub mod query;

// Re-export database types
pub use database::{Database, DatabaseError, Fact, InsertOutcome, Predicate, PredicateRef};

// Re-export evaluation
pub use evaluation::{EvaluationError, EvaluationStats, InferenceOptions};

// Re-export query
pub use query::Answers;

// Re-export unification types used by query answers
pub use datalog_core::Substitution;
