//! Extraction error taxonomy.
//!
//! Transport failures are the only retryable class. Everything the model
//! itself got wrong (no call, bad arguments, vague input, missing fields) is
//! terminal for the attempt that produced it — a resample is a paid call for
//! a low-probability different answer, so it is not taken.

use nudge_core::retry::{Retryable, TransportError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractError {
    /// The model returned free text instead of invoking the structured call.
    #[error("No function call returned from the model")]
    NoFunctionCall,

    /// A structured call was present but its arguments did not parse.
    #[error("Invalid response from the model: {0}")]
    InvalidResponse(String),

    /// The model judged the prompt too vague to extract a task. This is a
    /// client-input problem, not a server fault.
    #[error("Input too vague: {0}")]
    VagueInput(String),

    /// No explicit error, but title or date/time is absent.
    #[error("Extraction response is missing the task title or date/time")]
    MissingRequiredFields,

    /// The transport failed on this attempt.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Retries exhausted — the last transport failure, wrapped for callers.
    #[error("Reminder generation failed: {source}")]
    Generation {
        #[source]
        source: TransportError,
    },
}

impl Retryable for ExtractError {
    fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(t) => t.is_retryable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_retryable() {
        assert!(!ExtractError::NoFunctionCall.is_retryable());
        assert!(!ExtractError::VagueInput("no date".into()).is_retryable());
        assert!(!ExtractError::MissingRequiredFields.is_retryable());
        assert!(!ExtractError::InvalidResponse("bad json".into()).is_retryable());
        assert!(
            ExtractError::Transport(TransportError::new("down").with_status(503)).is_retryable()
        );
        assert!(
            !ExtractError::Transport(TransportError::new("bad request").with_status(400))
                .is_retryable()
        );
    }
}
