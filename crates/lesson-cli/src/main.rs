use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use dotenvy::dotenv;
use lesson_core::{
    AiBackend, ContentSource, LessonConfig, LessonPipeline, LessonRequest, LessonRequestInput,
    PackageResult,
};
use lesson_docs::MarkdownAssembler;
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(author, version, about = "Generate differentiated lesson packages", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a complete lesson package
    Generate {
        #[command(flatten)]
        ai: AiArgs,

        /// Directory for generated documents (overrides LESSON_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Print the resolved lesson content as JSON without writing documents
    Content {
        #[command(flatten)]
        ai: AiArgs,
    },
}

#[derive(clap::Args)]
struct AiArgs {
    /// Path to the lesson request (.json, .yaml or .yml)
    #[arg(short, long)]
    request: PathBuf,

    /// AI provider to use (overrides LESSON_AI_PROVIDER)
    #[arg(long, value_enum)]
    provider: Option<ProviderType>,

    /// Model name (optional, uses provider default if not specified)
    #[arg(short, long)]
    model: Option<String>,

    /// Seconds to wait for the AI service before using templates
    #[arg(long)]
    timeout: Option<u64>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
enum ProviderType {
    Anthropic,
    Openai,
    /// Template content only
    None,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenv().ok();

    // Initialize logging
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { ai, output_dir } => {
            let mut config = apply_overrides(LessonConfig::from_env(), &ai);
            if let Some(dir) = output_dir {
                config = config.with_output_dir(dir);
            }

            let result = match load_request(&ai.request).await {
                Ok(request) => generate(&config, &request).await,
                Err(message) => PackageResult::Error { message },
            };

            println!("{}", serde_json::to_string_pretty(&result)?);
            if !result.is_success() {
                std::process::exit(1);
            }
        }
        Commands::Content { ai } => {
            let config = apply_overrides(LessonConfig::from_env(), &ai);
            let request = match load_request(&ai.request).await {
                Ok(request) => request,
                Err(message) => exit_with_error(message)?,
            };

            let resolver = match lesson_ai::resolver_from_config(&config) {
                Ok(resolver) => resolver,
                Err(e) => exit_with_error(format!("Failed to initialize AI provider: {}", e))?,
            };
            let resolved = resolver.resolve_detailed(&request).await;
            match &resolved.source {
                ContentSource::Ai { provider } => info!("Content generated by {}", provider),
                ContentSource::Template { reason } => info!("Template content ({})", reason),
            }

            println!("{}", serde_json::to_string_pretty(&resolved.content)?);
        }
    }

    Ok(())
}

/// Print the error result and exit with a failure status.
fn exit_with_error<T>(message: String) -> Result<T> {
    let result = PackageResult::Error { message };
    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("Failed to encode result")?
    );
    std::process::exit(1)
}

/// Run the pipeline. Setup failures are reported in the result like any other.
async fn generate(config: &LessonConfig, request: &LessonRequest) -> PackageResult {
    let resolver = match lesson_ai::resolver_from_config(config) {
        Ok(resolver) => resolver,
        Err(e) => {
            error!("Failed to initialize AI provider: {}", e);
            return PackageResult::Error {
                message: format!("Failed to initialize AI provider: {}", e),
            };
        }
    };
    let assembler = match MarkdownAssembler::new(&config.output_dir) {
        Ok(assembler) => assembler,
        Err(e) => {
            error!("Failed to load document templates: {}", e);
            return PackageResult::Error {
                message: format!("Failed to load document templates: {}", e),
            };
        }
    };

    info!(
        "Generating Grade {} {} lesson on '{}' into {:?}",
        request.grade(),
        request.subject(),
        request.topic(),
        config.output_dir
    );

    let pipeline = LessonPipeline::new(resolver, assembler)
        .with_download_prefix(config.download_prefix.clone());
    pipeline.generate_package(request).await
}

/// Read and validate a request file. Errors become the result message.
async fn load_request(path: &Path) -> std::result::Result<LessonRequest, String> {
    info!("Reading lesson request from {:?}", path);
    LessonRequestInput::from_file(path)
        .await
        .and_then(LessonRequestInput::validate)
        .map_err(|e| e.to_string())
}

fn apply_overrides(mut config: LessonConfig, args: &AiArgs) -> LessonConfig {
    if let Some(provider) = args.provider {
        config = match provider {
            ProviderType::None => config.without_ai(),
            ProviderType::Anthropic => select_backend(config, AiBackend::Anthropic),
            ProviderType::Openai => select_backend(config, AiBackend::OpenAi),
        };
    }

    if let Some(model) = &args.model {
        match config.ai.as_mut() {
            Some(ai) => ai.provider.model = model.clone(),
            None => warn!("--model ignored: AI generation is disabled"),
        }
    }

    if let Some(seconds) = args.timeout {
        config = config.with_ai_timeout(seconds);
    }

    config
}

fn select_backend(config: LessonConfig, backend: AiBackend) -> LessonConfig {
    let config = config.with_backend_from_env(backend);
    match &config.ai {
        Some(ai) => debug!("Using {:?} model {}", backend, ai.provider.model),
        None => warn!(
            "{} not set; continuing with template content only",
            backend.key_var()
        ),
    }
    config
}
