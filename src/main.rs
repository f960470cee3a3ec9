use anyhow::Context;
use clap::Parser;
use scriptport::config::AppConfig;
use scriptport::{Pipeline, PipelineResult, ScriptportError, TranspileOptions};
use std::path::PathBuf;
use tracing::{debug, error, trace};
use tracing_subscriber::EnvFilter;

/// Convert a Python or shell script into a Go program
#[derive(Parser)]
#[command(name = "scriptport", version)]
#[command(
    about = "Converts Python or shell scripts into idiomatic Go code",
    long_about = "Converts Python or shell scripts into idiomatic Go code.

The translation is done by a remote LLM provider; the result is cleaned up,
formatted with gofmt and optionally built into a static binary.

Supported providers:
  gemini  (Google Gemini, default)
  openai  (OpenAI GPT-4o)
  claude  (Anthropic Claude)

Credentials are read from GEMINI_API_KEY (or API_KEY), OPENAI_API_KEY and
ANTHROPIC_API_KEY. LLM_PROVIDER sets the default provider."
)]
struct Cli {
    /// Script file to convert
    file: PathBuf,

    /// Output path for the generated Go file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Build the generated Go code into a binary
    #[arg(long)]
    build: bool,

    /// Output path for the compiled binary (requires --build)
    #[arg(short, long, requires = "build")]
    binary: Option<PathBuf>,

    /// LLM provider to use (gemini, openai, claude)
    #[arg(short, long)]
    provider: Option<String>,

    /// If the build fails, ask the provider once to fix the compiler errors
    #[arg(long, requires = "build")]
    repair: bool,

    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = AppConfig::from_env();

    let log_level = match cli.verbose {
        0 => config.log_profile().default_filter(),
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("scriptport started with verbosity level: {}", cli.verbose);
    trace!("Full CLI args: {:?}", std::env::args().collect::<Vec<_>>());

    match run(&cli, &config).await {
        Ok((provider, result)) => {
            println!(
                "Successfully transpiled: {} (using {})",
                cli.file.display(),
                provider
            );
            println!("   Go file: {}", result.output_path.display());
            if let Some(binary) = &result.binary_path {
                println!("   Binary:  {}", binary.display());
            }
        }
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("Error: {e:#}");
            let failure = e.downcast_ref::<ScriptportError>();
            if failure.is_some_and(ScriptportError::is_transient) {
                eprintln!("The provider could not be reached; running the command again may succeed.");
            }
            std::process::exit(failure.map(ScriptportError::exit_code).unwrap_or(1));
        }
    }
}

async fn run(cli: &Cli, config: &AppConfig) -> anyhow::Result<(String, PipelineResult)> {
    let resolved = config.resolve(cli.provider.as_deref())?;

    let pipeline = Pipeline::new(
        resolved.provider,
        &resolved.api_key,
        resolved.client_options(),
    )
    .context("failed to initialize pipeline")?
    .with_repair_attempts(u32::from(cli.repair));

    let mut options = TranspileOptions::new(&cli.file).build(cli.build);
    options.output_path = cli.output.clone();
    options.binary_path = cli.binary.clone();

    let result = pipeline.run(&options).await?;
    Ok((resolved.provider.to_string(), result))
}
