use thiserror::Error;

#[derive(Error, Debug)]
pub enum DefragError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unit conservation violated: expected {expected} units, found {actual}")]
    InvariantViolation { expected: u64, actual: u64 },
}

pub type Result<T> = std::result::Result<T, DefragError>;
