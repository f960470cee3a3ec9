use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;

pub mod codes;

pub use codes::ErrorCode;

/// The unified error type for every stage of a scriptport run
#[derive(Error, Debug)]
pub enum ScriptportError {
    #[error("[E{code:04}] Input error: {message}")]
    Input {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Configuration error: {message}")]
    Config {
        code: u16,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Generation error: {message}")]
    Generation {
        code: u16,
        message: String,
        provider: Option<String>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Storage error: {message}")]
    Storage {
        code: u16,
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("[E{code:04}] Build error: {message}")]
    Build {
        code: u16,
        message: String,
        output: Option<String>,
        exit_code: Option<i32>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl ScriptportError {
    /// Create an input error with specific code and path
    pub fn input_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Input {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a configuration error with specific code
    pub fn config_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Config {
            code,
            message: message.into(),
            source: None,
        }
    }

    /// Create a generation error with specific code and provider name
    pub fn generation_with_code(
        code: u16,
        message: impl Into<String>,
        provider: Option<String>,
    ) -> Self {
        Self::Generation {
            code,
            message: message.into(),
            provider,
            source: None,
        }
    }

    /// Create a storage error with specific code and path
    pub fn storage_with_code(code: u16, message: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self::Storage {
            code,
            message: message.into(),
            path,
            source: None,
        }
    }

    /// Create a build error that carries the toolchain output verbatim
    pub fn build_failed(output: impl Into<String>, exit_code: Option<i32>) -> Self {
        let output = output.into();
        Self::Build {
            code: ErrorCode::BUILD_FAILED,
            message: format!("build failed: {}", output),
            output: Some(output),
            exit_code,
            source: None,
        }
    }

    /// Create a build error with specific code
    pub fn build_with_code(code: u16, message: impl Into<String>) -> Self {
        Self::Build {
            code,
            message: message.into(),
            output: None,
            exit_code: None,
            source: None,
        }
    }

    /// Add a source error to this error
    pub fn with_source(
        mut self,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        match &mut self {
            Self::Input { source: src, .. }
            | Self::Config { source: src, .. }
            | Self::Generation { source: src, .. }
            | Self::Storage { source: src, .. }
            | Self::Build { source: src, .. } => {
                *src = Some(source.into());
            }
        }
        self
    }

    /// Prefix the message with the pipeline step that failed
    pub fn at_step(mut self, step: impl Display) -> Self {
        let updated = format!("{}: {}", step, self.message());
        *self.message_mut() = updated;
        self
    }

    fn message_mut(&mut self) -> &mut String {
        match self {
            Self::Input { message, .. }
            | Self::Config { message, .. }
            | Self::Generation { message, .. }
            | Self::Storage { message, .. }
            | Self::Build { message, .. } => message,
        }
    }

    /// The bare message without code or category prefix
    pub fn message(&self) -> &str {
        match self {
            Self::Input { message, .. }
            | Self::Config { message, .. }
            | Self::Generation { message, .. }
            | Self::Storage { message, .. }
            | Self::Build { message, .. } => message,
        }
    }

    /// Get the process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Input { .. } => 2,
            Self::Config { .. } => 3,
            Self::Generation { .. } => 4,
            Self::Storage { .. } => 5,
            Self::Build { .. } => 6,
        }
    }

    /// Get the error code
    pub fn code(&self) -> u16 {
        match self {
            Self::Input { code, .. }
            | Self::Config { code, .. }
            | Self::Generation { code, .. }
            | Self::Storage { code, .. }
            | Self::Build { code, .. } => *code,
        }
    }

    /// Captured toolchain output, if this is a failed build
    pub fn compiler_output(&self) -> Option<&str> {
        match self {
            Self::Build { output, .. } => output.as_deref(),
            _ => None,
        }
    }

    /// Network failures and timeouts may succeed if the whole run is retried
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Generation { code, .. }
                if *code == ErrorCode::GEN_TRANSPORT || *code == ErrorCode::GEN_TIMEOUT
        )
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Input { message, path, .. } => match path {
                Some(p) => format!("Cannot use input {}: {}", p.display(), message),
                None => format!("Input problem: {}", message),
            },
            Self::Config { message, .. } => format!("Configuration problem: {}", message),
            Self::Generation {
                message, provider, ..
            } => match provider {
                Some(name) => format!("Provider '{}' failed: {}", name, message),
                None => format!("Generation failed: {}", message),
            },
            Self::Storage { message, path, .. } => match path {
                Some(p) => format!("Storage error at {}: {}", p.display(), message),
                None => format!("Storage error: {}", message),
            },
            Self::Build { message, .. } => format!("Build failed: {}", message),
        }
    }
}

/// Type alias for Results using ScriptportError
pub type Result<T> = std::result::Result<T, ScriptportError>;

impl From<tera::Error> for ScriptportError {
    fn from(err: tera::Error) -> Self {
        ScriptportError::config_with_code(ErrorCode::CONFIG_TEMPLATE, "Prompt template error")
            .with_source(err)
    }
}
