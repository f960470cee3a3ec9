//! End-to-end translation of one script.
//!
//! A run is strictly linear: parse, gate on script type, generate once,
//! normalize and write, then optionally build. The first failing step ends
//! the run; files written by earlier steps are left in place.

use crate::error::{ErrorCode, Result, ScriptportError};
use crate::generator::{self, GoBuilder, GofmtFormatter, OutputNormalizer, SourceFormatter};
use crate::llm::{self, ClientOptions, GenerationClient, Provider};
use crate::script::ScriptParser;
use crate::subprocess::SubprocessManager;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Steps of a run, used to prefix errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Parse,
    CheckType,
    Generate,
    Write,
    Build,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::Parse => "parse input",
            Step::CheckType => "check script type",
            Step::Generate => "generate",
            Step::Write => "write output",
            Step::Build => "build binary",
        };
        f.write_str(name)
    }
}

/// What to translate and where to put the results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranspileOptions {
    pub input_path: PathBuf,
    /// Defaults to the input path with a `.go` extension
    pub output_path: Option<PathBuf>,
    pub build: bool,
    /// Defaults to the output path without its extension
    pub binary_path: Option<PathBuf>,
}

impl TranspileOptions {
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            ..Default::default()
        }
    }

    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn build(mut self, build: bool) -> Self {
        self.build = build;
        self
    }

    pub fn binary(mut self, path: impl Into<PathBuf>) -> Self {
        self.binary_path = Some(path.into());
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineResult {
    pub source: String,
    pub output_path: PathBuf,
    pub binary_path: Option<PathBuf>,
}

/// Orchestrates one translation per call to [`Pipeline::run`].
///
/// Holds no state between runs, so one pipeline may serve concurrent runs
/// on different inputs.
pub struct Pipeline {
    client: Arc<dyn GenerationClient>,
    parser: ScriptParser,
    normalizer: OutputNormalizer,
    builder: GoBuilder,
    repair_attempts: u32,
}

impl Pipeline {
    /// Production pipeline: real HTTP client, `gofmt` and `go` from PATH
    pub fn new(provider: Provider, api_key: &str, options: ClientOptions) -> Result<Self> {
        let client = llm::create_client(provider, api_key, options)?;
        Ok(Self::with_components(client, SubprocessManager::production()))
    }

    /// Pipeline over an already-bound client and subprocess runner
    pub fn with_components(
        client: Arc<dyn GenerationClient>,
        subprocess: SubprocessManager,
    ) -> Self {
        let formatter: Arc<dyn SourceFormatter> =
            Arc::new(GofmtFormatter::new(subprocess.runner()));
        Self {
            client,
            parser: ScriptParser::new(),
            normalizer: OutputNormalizer::new(formatter),
            builder: GoBuilder::new(subprocess.runner()),
            repair_attempts: 0,
        }
    }

    /// Allow up to `attempts` repair-and-rebuild cycles after a failed build
    pub fn with_repair_attempts(mut self, attempts: u32) -> Self {
        self.repair_attempts = attempts;
        self
    }

    pub fn provider(&self) -> Provider {
        self.client.provider()
    }

    pub async fn run(&self, options: &TranspileOptions) -> Result<PipelineResult> {
        let input = options.input_path.as_path();
        info!(input = %input.display(), provider = %self.provider(), "Starting transpilation");

        let parsed = self
            .parser
            .parse(input)
            .await
            .map_err(|e| e.at_step(Step::Parse))?;

        if !parsed.script_type.is_supported() {
            return Err(ScriptportError::input_with_code(
                ErrorCode::INPUT_UNSUPPORTED_TYPE,
                format!(
                    "unsupported script type: {} (file: {})",
                    parsed.script_type, parsed.file_name
                ),
                Some(parsed.path.clone()),
            )
            .at_step(Step::CheckType));
        }

        info!(
            file = %parsed.file_name,
            script_type = %parsed.script_type,
            "Parsed script file"
        );

        let prompt = llm::build_translation_prompt(parsed.script_type, &parsed.content)
            .map_err(|e| e.at_step(Step::Generate))?;
        let generated = self.generate(&prompt).await?;

        let output_path = options
            .output_path
            .clone()
            .unwrap_or_else(|| generator::default_output_path(input));

        let source = self.normalizer.normalize(&generated).await;
        generator::write_source(&output_path, &source)
            .await
            .map_err(|e| e.at_step(Step::Write))?;

        let mut result = PipelineResult {
            source,
            output_path,
            binary_path: None,
        };

        if options.build {
            let binary_path = options
                .binary_path
                .clone()
                .unwrap_or_else(|| generator::default_binary_path(&result.output_path));

            result.source = self
                .build_with_repair(&result.output_path, &binary_path, result.source)
                .await?;
            result.binary_path = Some(binary_path);
        }

        info!(
            output = %result.output_path.display(),
            binary = ?result.binary_path,
            "Transpilation completed successfully"
        );
        Ok(result)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        info!(
            provider = %self.provider(),
            prompt_length = prompt.len(),
            "Requesting translation"
        );
        let generated = self
            .client
            .generate(prompt)
            .await
            .map_err(|e| ScriptportError::from(e).at_step(Step::Generate))?;
        info!(result_length = generated.len(), "Generation completed");
        Ok(generated)
    }

    /// Build, and on failure feed the compiler output back for another try
    /// while repair attempts remain. Returns the source that was built.
    async fn build_with_repair(
        &self,
        source_path: &Path,
        binary_path: &Path,
        mut source: String,
    ) -> Result<String> {
        let mut attempt = 0;
        loop {
            let err = match self.builder.build(source_path, binary_path).await {
                Ok(()) => return Ok(source),
                Err(e) => e.at_step(Step::Build),
            };

            let output = match err.compiler_output() {
                Some(output) if attempt < self.repair_attempts => output.to_string(),
                _ => return Err(err),
            };
            attempt += 1;
            warn!(attempt, "Build failed, requesting a repaired version");

            let prompt = llm::build_repair_prompt(&source, &output)
                .map_err(|e| e.at_step(Step::Generate))?;
            let repaired = self.generate(&prompt).await?;
            source = self.normalizer.normalize(&repaired).await;
            generator::write_source(source_path, &source)
                .await
                .map_err(|e| e.at_step(Step::Write))?;
        }
    }
}
