//! Parser for the term notation and for small Datalog programs
//!
//! This crate implements a parser combinator-based parser using the Chumsky library.
//! It parses text into the term algebra shared by the unifier and the
//! Datalog evaluator.
//!
//! # Supported Syntax
//!
//! - **Terms**: `f(X, g(Y), a)`
//! - **Facts**: `parent(alice, bob).`
//! - **Rules**: `ancestor(X, Y) :- parent(X, Z), ancestor(Z, Y).`
//! - **Queries**: `?- ancestor(X, carol).`
//! - **Comments**: `% to end of line`
//!
//! # Example
//!
//! ```
//! use datalog_parser::{parse_term, SrcId, Term};
//!
//! let term = parse_term("f(X, a)", SrcId::empty()).expect("valid term");
//! assert_eq!(term, Term::app("f", vec![Term::var("X"), Term::constant("a")]));
//! ```

mod ast;
mod parser;
mod span;
mod src;
mod token;

pub use ast::*;
pub use parser::{parse_atom, parse_program, parse_query, parse_term, ParseError};
pub use span::Span;
pub use src::SrcId;
pub use token::{LexError, Token};
