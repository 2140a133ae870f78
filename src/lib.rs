pub mod field;
pub mod hash;
pub mod mle;
pub mod oracle;
pub mod sumcheck;
pub mod utils;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("transcript exhausted, unwritable or non-canonical")]
    Transcript,
    #[error("oracle expects {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },
    #[error("{got} variables exceed the supported maximum of {max}")]
    ArityLimit { max: usize, got: usize },
    #[error("exponent {got} exceeds the supported maximum of {max}")]
    DegreeLimit { max: usize, got: usize },
    #[error("round {round} is invalid for {num_vars} variables")]
    RoundIndex { round: usize, num_vars: usize },
    #[error("sampling width {got} is below the required {required}")]
    SampleWidth { required: usize, got: usize },
    #[error("challenge range is empty or too narrow")]
    ChallengeRange,
    #[error("challenge drawn in round {round} is outside the range")]
    ChallengeOutOfRange { round: usize },
    #[error("table length {0} is not a power of two")]
    TableSize(usize),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("verifier step called out of order")]
    State,
}
