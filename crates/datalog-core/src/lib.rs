pub mod unification;

pub use unification::{
    occurs_check, unify, unify_args, unify_atoms, unify_variable, unify_with, Substitution,
};
