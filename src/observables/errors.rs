//! Errors for observable specifications and their evaluation.
//!
//! A mismatched `(funs, funs_args)` pair is a malformed request and is caught
//! when the spec is built. Evaluation errors come from the observable
//! functions themselves and are never caught inside this layer.

pub type ObsResult<T> = Result<T, ObsError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ObsError {
    /// `funs` and `funs_args` must have the same length.
    ArgsLengthMismatch { funs: usize, args: usize },

    /// An observable rejected the state it was evaluated at.
    EvaluationFailed { name: String, reason: String },
}

impl std::error::Error for ObsError {}

impl std::fmt::Display for ObsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObsError::ArgsLengthMismatch { funs, args } => {
                write!(
                    f,
                    "The length of funs and funs_args should be the same, in this case is \
                     {funs} and {args}"
                )
            }
            ObsError::EvaluationFailed { name, reason } => {
                write!(f, "Observable '{name}' failed: {reason}")
            }
        }
    }
}
