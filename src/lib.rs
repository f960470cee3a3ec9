//! # Scriptport
//!
//! Converts Python and shell scripts into standalone Go programs by handing
//! the translation to a remote text-generation service, then cleaning up,
//! saving and optionally compiling whatever comes back.
//!
//! ## Usage
//!
//! ```bash
//! scriptport script.py [-o out.go] [--build] [-b bin/tool] [-p openai]
//! ```
//!
//! ## Modules
//!
//! - `script` - Reads input files and classifies them as Python or shell
//! - `llm` - Prompt templates and clients for the gemini, openai and claude APIs
//! - `generator` - Fence stripping, gofmt formatting, file output and `go build`
//! - `pipeline` - Sequences the steps of one translation run
//! - `config` - Provider selection and credentials from the environment
//! - `subprocess` - Process runner abstraction with a mock for tests
//! - `error` - Unified error type with numeric codes
pub mod config;
pub mod error;
pub mod generator;
pub mod llm;
pub mod pipeline;
pub mod script;
pub mod subprocess;

pub use error::{Result, ScriptportError};
pub use pipeline::{Pipeline, PipelineResult, TranspileOptions};
