pub mod safety;

pub use safety::{check_program_safety, check_rule_safety, SafetyError};
