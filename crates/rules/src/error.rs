// In crates/rules/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Rule '{0}' is defined more than once")]
    DuplicateRule(String),

    #[error("Rule '{rule}' depends on unknown rule '{dependency}'")]
    UnknownDependency { rule: String, dependency: String },

    #[error("Rule dependencies form a cycle involving: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("Rule '{rule}' produced an invalid {field}: {value}")]
    InvalidOutput {
        rule: String,
        field: &'static str,
        value: f64,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
