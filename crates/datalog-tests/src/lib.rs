//! Scenario and property-based tests
//!
//! This crate exercises the parser, unifier and Datalog database together.
//! Properties are checked with proptest over randomly generated terms and
//! fact sets; scenarios pin down the worked examples.

#[cfg(test)]
mod proptest_unification;


#[cfg(test)]
mod scenarios;
