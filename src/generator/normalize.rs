//! Cleanup of generated text before it is written as a Go source file.
//!
//! Providers are told to answer with bare code but often wrap it in a
//! markdown fence anyway. [`strip_code_fence`] removes one outer fence, then
//! [`OutputNormalizer`] runs the result through a [`SourceFormatter`]. Text
//! that cannot be formatted is still returned, unformatted, with a warning.

use crate::subprocess::{ProcessCommandBuilder, ProcessError, ProcessRunner};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound for a single `gofmt` call
const GOFMT_TIMEOUT: Duration = Duration::from_secs(30);

/// Closing fence on its own line
static FENCE_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[\w+#.-]*[ \t]*\r?\n(.*?)\r?\n```$").expect("Invalid regex pattern")
});

/// Closing fence glued to the last line of code
static FENCE_BLOCK_INLINE_CLOSE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[\w+#.-]*[ \t]*\r?\n(.*?)```$").expect("Invalid regex pattern")
});

/// Remove a single fence that spans the whole (trimmed) input.
///
/// Input without such a fence comes back trimmed and otherwise unchanged.
pub fn strip_code_fence(raw: &str) -> String {
    let trimmed = raw.trim();

    for pattern in [&*FENCE_BLOCK, &*FENCE_BLOCK_INLINE_CLOSE] {
        if let Some(inner) = pattern.captures(trimmed).and_then(|caps| caps.get(1)) {
            return inner.as_str().to_string();
        }
    }

    trimmed.to_string()
}

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("source is not valid Go: {0}")]
    Syntax(String),

    #[error("formatter unavailable: {0}")]
    Unavailable(#[from] ProcessError),
}

/// Canonical layout for the target language
#[async_trait]
pub trait SourceFormatter: Send + Sync {
    async fn format(&self, source: &str) -> Result<String, FormatError>;
}

/// Formats Go source by piping it through `gofmt`
pub struct GofmtFormatter {
    runner: Arc<dyn ProcessRunner>,
}

impl GofmtFormatter {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }
}

#[async_trait]
impl SourceFormatter for GofmtFormatter {
    async fn format(&self, source: &str) -> Result<String, FormatError> {
        let command = ProcessCommandBuilder::new("gofmt")
            .stdin(source.to_string())
            .timeout(GOFMT_TIMEOUT)
            .build();
        let output = self.runner.run(command).await?;

        if output.status.success() {
            Ok(output.stdout)
        } else {
            Err(FormatError::Syntax(output.stderr.trim().to_string()))
        }
    }
}

/// Fence stripping followed by best-effort formatting
#[derive(Clone)]
pub struct OutputNormalizer {
    formatter: Arc<dyn SourceFormatter>,
}

impl OutputNormalizer {
    pub fn new(formatter: Arc<dyn SourceFormatter>) -> Self {
        Self { formatter }
    }

    /// Never fails: unformattable code is kept as-is after fence stripping
    pub async fn normalize(&self, raw: &str) -> String {
        let code = strip_code_fence(raw);

        match self.formatter.format(&code).await {
            Ok(formatted) => {
                debug!(length = formatted.len(), "Formatted generated source");
                formatted
            }
            Err(e) => {
                warn!(error = %e, "Failed to format Go code, using raw code");
                with_trailing_newline(code)
            }
        }
    }
}

fn with_trailing_newline(mut code: String) -> String {
    if !code.is_empty() && !code.ends_with('\n') {
        code.push('\n');
    }
    code
}
