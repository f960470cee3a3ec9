//! Invokes the Go toolchain to produce a static, stripped binary

use crate::error::{ErrorCode, Result, ScriptportError};
use crate::subprocess::{ExitStatus, ProcessCommandBuilder, ProcessRunner};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub struct GoBuilder {
    runner: Arc<dyn ProcessRunner>,
}

impl GoBuilder {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// Compile `source` into `binary`.
    ///
    /// A failed build returns the toolchain's combined stdout and stderr
    /// verbatim inside the error.
    pub async fn build(&self, source: &Path, binary: &Path) -> Result<()> {
        info!(
            source = %source.display(),
            output = %binary.display(),
            "Building binary"
        );

        let command = ProcessCommandBuilder::new("go")
            .args(["build", "-ldflags", "-s -w", "-o"])
            .path_arg(binary)
            .path_arg(source)
            .env("CGO_ENABLED", "0")
            .build();

        let output = self.runner.run(command).await?;

        match &output.status {
            ExitStatus::Success => {
                info!(path = %binary.display(), "Successfully built binary");
                Ok(())
            }
            ExitStatus::Signal(signal) => Err(ScriptportError::build_with_code(
                ErrorCode::BUILD_SIGNAL_RECEIVED,
                format!("toolchain terminated by signal {}", *signal),
            )),
            status => Err(ScriptportError::build_failed(
                output.combined_output(),
                status.code(),
            )),
        }
    }
}
