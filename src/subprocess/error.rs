use crate::error::{ErrorCode, ScriptportError};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Mock expectation not met: {0}")]
    MockExpectationNotMet(String),
}

/// Process failures surface through the toolchain step, so they land in the
/// build family
impl From<ProcessError> for ScriptportError {
    fn from(err: ProcessError) -> Self {
        let code = match &err {
            ProcessError::CommandNotFound(_) => ErrorCode::BUILD_TOOLCHAIN_NOT_FOUND,
            ProcessError::SpawnFailed { .. } | ProcessError::Io(_) => {
                ErrorCode::BUILD_SPAWN_FAILED
            }
            ProcessError::Timeout(_) | ProcessError::MockExpectationNotMet(_) => {
                ErrorCode::BUILD_GENERIC
            }
        };

        ScriptportError::build_with_code(code, err.to_string()).with_source(err)
    }
}
