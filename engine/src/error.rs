use std::error::Error;
use std::fmt;

/// The evaluator process failed, timed out, or closed its pipe. Fatal
/// to the in-flight evaluation; retry policy belongs to the caller,
/// which can `downcast_ref` to this type to tell engine failures apart
/// from contract violations.
#[derive(Debug, Clone)]
pub struct EvaluatorUnavailable {
    reason: String,
}

impl EvaluatorUnavailable {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl fmt::Display for EvaluatorUnavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "evaluator unavailable: {}", self.reason)
    }
}

impl Error for EvaluatorUnavailable {}
