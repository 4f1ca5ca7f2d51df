//! Output classification
//!
//! Success is decided from the captured text alone. Entrypoint scripts report
//! failures by printing a line that starts with `Error`; the exit status of
//! the script plays no part.

use crate::errors::RunnerError;

pub const ERROR_PREFIX: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoOutput,
    ExecutionError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    Output(String),
    Error { kind: FailureKind, message: String },
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, ExecutionResult::Output(_))
    }

    pub fn into_result(self) -> Result<String, RunnerError> {
        match self {
            ExecutionResult::Output(text) => Ok(text),
            ExecutionResult::Error { kind: FailureKind::NoOutput, .. } => Err(RunnerError::NoOutput),
            ExecutionResult::Error { kind: FailureKind::ExecutionError, message } => {
                Err(RunnerError::Execution(message))
            }
        }
    }
}

/// Trim surrounding newlines from `raw` and decide success or failure.
pub fn classify(raw: &str) -> ExecutionResult {
    let trimmed = raw.trim_matches('\n');

    if trimmed.is_empty() {
        return ExecutionResult::Error {
            kind: FailureKind::NoOutput,
            message: RunnerError::NoOutput.to_string(),
        };
    }

    if trimmed.starts_with(ERROR_PREFIX) {
        return ExecutionResult::Error {
            kind: FailureKind::ExecutionError,
            message: trimmed.to_string(),
        };
    }

    ExecutionResult::Output(trimmed.to_string())
}
