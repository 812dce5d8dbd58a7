//! edu-forge 命令行：生成、缓存并校验教育内容。
//!
//! Usage:
//!   edu-forge shapes --n 10 --complexity beginner [--offline]
//!   edu-forge topics --topics "Photosynthesis,Solar System"
//!   edu-forge animations --concept "Sine wave" --duration 8
//!   edu-forge schema topic-summary

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info, warn};

use edu_forge::animations::{AnimationRequest, ConceptAnimationDomain, DEFAULT_DURATION};
use edu_forge::batch::{BatchResult, BatchRunner};
use edu_forge::catalog::split_subjects;
use edu_forge::config::{Credentials, PipelineConfig};
use edu_forge::pipeline::{ContentDomain, ContentPipeline, Processed};
use edu_forge::schema::schema_document;
use edu_forge::shapes::{ShapeAnalogyDomain, ShapeAnalogyPlanner, CONFIRM_THRESHOLD};
use edu_forge::topics::{TopicRequest, TopicSummaryDomain};
use edu_forge::types::{AnimationType, Audience, Complexity, RecordKind};

#[derive(Parser)]
#[command(name = "edu-forge", version, about = "Generate cached, validated educational content")]
struct Cli {
    /// YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    /// -v for debug, -vv for trace. RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Shape analogy questions with illustrations.
    Shapes(ShapesArgs),
    /// Topic summaries from Wikipedia with learning objectives.
    Topics(TopicsArgs),
    /// Concept animations with learning goals.
    Animations(AnimationsArgs),
    /// Print the JSON Schema of a record kind.
    Schema {
        /// shape-analogy, topic-summary or concept-animation
        kind: String,
    },
}

#[derive(Args)]
struct ShapesArgs {
    /// Number of analogies.
    #[arg(long, default_value_t = 5)]
    n: usize,

    /// beginner, intermediate or advanced
    #[arg(long, default_value = "beginner")]
    complexity: String,

    /// Skip the image API and write mock image files.
    #[arg(long)]
    offline: bool,

    /// Seed for shape and relationship selection.
    #[arg(long)]
    seed: Option<u64>,

    /// Confirm runs of more than 50 analogies.
    #[arg(long)]
    yes: bool,

    #[arg(long)]
    no_cache: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("subjects").required(true).args(["topic", "topics"])))]
struct TopicsArgs {
    #[arg(long)]
    topic: Option<String>,

    /// Comma-separated topics.
    #[arg(long)]
    topics: Option<String>,

    #[arg(long)]
    no_cache: bool,
}

#[derive(Args)]
#[command(group(ArgGroup::new("subjects").required(true).args(["concept", "concepts"])))]
struct AnimationsArgs {
    #[arg(long)]
    concept: Option<String>,

    /// Comma-separated concepts.
    #[arg(long)]
    concepts: Option<String>,

    /// Seconds, 5 to 15.
    #[arg(long, default_value_t = DEFAULT_DURATION)]
    duration: u32,

    #[arg(long, default_value = "high_school")]
    audience: String,

    /// gif or mp4
    #[arg(long, default_value = "gif")]
    animation_type: String,

    /// Skip drawing a GIF when no service answers; write the text description.
    #[arg(long)]
    text_only: bool,

    #[arg(long)]
    no_cache: bool,
}

fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = match cli.verbose {
        0 => "edu_forge=info",
        1 => "edu_forge=debug",
        _ => "edu_forge=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .init(),
    }
}

/// Defaults, then the YAML file, then `EDU_FORGE_*`, then flags.
fn load_config(cli: &Cli, no_cache: bool) -> anyhow::Result<PipelineConfig> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => PipelineConfig::default(),
    }
    .with_env_overrides();
    if let Some(dir) = &cli.output_dir {
        config = config.with_output_dir(dir);
    }
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }
    if no_cache {
        config = config.with_cache_enabled(false);
    }
    config.validate()?;
    Ok(config)
}

async fn run_batch<D: ContentDomain>(
    config: &PipelineConfig,
    pipeline: &ContentPipeline<D>,
    requests: &[D::Request],
) -> anyhow::Result<ExitCode> {
    let kind = pipeline.domain().kind();
    let result = BatchRunner::for_kind(kind, config).run(pipeline, requests).await?;
    print_batch(kind, &result);
    if result.total_processed > 0 && result.success_count() == 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}

fn print_batch(kind: RecordKind, result: &BatchResult) {
    println!(
        "{}: {} succeeded, {} failed, {} from fallback ({:.1}s)",
        kind,
        result.success_count(),
        result.failure_count(),
        result.degraded_count(),
        result.execution_time.as_secs_f64()
    );
    for failure in &result.failures {
        println!("  failed: {}", failure);
    }
    if let Some(path) = &result.aggregate_path {
        println!("  aggregate: {}", path.display());
    }
}

fn print_single(processed: &Processed, path: &std::path::Path) {
    println!(
        "{} [{}] via {}",
        processed.record.id(),
        processed.record.kind(),
        processed.origin
    );
    println!("  saved: {}", path.display());
}

async fn run_single<D: ContentDomain>(
    pipeline: &ContentPipeline<D>,
    request: &D::Request,
) -> anyhow::Result<ExitCode> {
    let processed = pipeline.process(request).await?;
    let path = pipeline.persist(&processed.record).await?;
    print_single(&processed, &path);
    Ok(ExitCode::SUCCESS)
}

async fn shapes(cli: &Cli, args: &ShapesArgs) -> anyhow::Result<ExitCode> {
    let complexity: Complexity = args.complexity.parse()?;
    if args.n > CONFIRM_THRESHOLD && !args.yes {
        bail!(
            "{} analogies requested; pass --yes to confirm runs over {}",
            args.n,
            CONFIRM_THRESHOLD
        );
    }
    let config = load_config(cli, args.no_cache)?;
    let domain = ShapeAnalogyDomain::new(&config, &Credentials::from_env(), args.offline)?;
    config.prepare_dirs()?;

    let mut planner = match args.seed {
        Some(seed) => ShapeAnalogyPlanner::seeded(seed),
        None => ShapeAnalogyPlanner::new(),
    };
    let requests = planner.plan(args.n, complexity)?;
    info!(n = args.n, %complexity, offline = domain.is_offline(), "generating shape analogies");
    let pipeline = ContentPipeline::from_config(domain, &config)?;
    run_batch(&config, &pipeline, &requests).await
}

/// `--topics` wins over `--topic`; clap guarantees at least one is set.
fn subjects(single: &Option<String>, list: &Option<String>, flag: &str) -> anyhow::Result<Vec<String>> {
    let subjects = match (single, list) {
        (_, Some(list)) => split_subjects(list),
        (Some(one), None) => vec![one.clone()],
        (None, None) => Vec::new(),
    };
    if subjects.is_empty() {
        bail!("--{} contained no subjects", flag);
    }
    Ok(subjects)
}

async fn run_requests<D: ContentDomain>(
    config: &PipelineConfig,
    pipeline: &ContentPipeline<D>,
    requests: &[D::Request],
    batch: bool,
) -> anyhow::Result<ExitCode> {
    match requests {
        [single] if !batch => run_single(pipeline, single).await,
        _ => run_batch(config, pipeline, requests).await,
    }
}

async fn topics(cli: &Cli, args: &TopicsArgs) -> anyhow::Result<ExitCode> {
    let requests = subjects(&args.topic, &args.topics, "topics")?
        .iter()
        .map(|t| TopicRequest::new(t))
        .collect::<edu_forge::Result<Vec<_>>>()?;

    let config = load_config(cli, args.no_cache)?;
    let domain = TopicSummaryDomain::new(&config, &Credentials::from_env())?;
    config.prepare_dirs()?;
    let pipeline = ContentPipeline::from_config(domain, &config)?;
    run_requests(&config, &pipeline, &requests, args.topics.is_some()).await
}

async fn animations(cli: &Cli, args: &AnimationsArgs) -> anyhow::Result<ExitCode> {
    let audience: Audience = args.audience.parse()?;
    let animation_type: AnimationType = args.animation_type.parse()?;
    let requests = subjects(&args.concept, &args.concepts, "concepts")?
        .iter()
        .map(|c| {
            AnimationRequest::new(c, args.duration).map(|r| {
                r.with_audience(audience)
                    .with_animation_type(animation_type)
            })
        })
        .collect::<edu_forge::Result<Vec<_>>>()?;

    let config = load_config(cli, args.no_cache)?;
    let domain = ConceptAnimationDomain::new(&config, &Credentials::from_env())?
        .with_rendered_fallback(!args.text_only);
    info!(providers = ?domain.providers(), "animation providers configured");
    config.prepare_dirs()?;
    let pipeline = ContentPipeline::from_config(domain, &config)?;
    run_requests(&config, &pipeline, &requests, args.concepts.is_some()).await
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    match &cli.command {
        Command::Shapes(args) => shapes(&cli, args).await,
        Command::Topics(args) => topics(&cli, args).await,
        Command::Animations(args) => animations(&cli, args).await,
        Command::Schema { kind } => {
            let kind: RecordKind = kind.parse()?;
            println!("{}", schema_document(kind));
            Ok(ExitCode::SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let outcome = tokio::select! {
        result = run(cli) => result,
        _ = tokio::signal::ctrl_c() => Err(edu_forge::Error::Interrupted.into()),
    };

    match outcome {
        Ok(code) => code,
        Err(e) => match e.downcast_ref::<edu_forge::Error>() {
            Some(edu_forge::Error::Interrupted) => {
                warn!("interrupted, stopping");
                ExitCode::from(130)
            }
            _ => {
                error!("{:#}", e);
                ExitCode::from(1)
            }
        },
    }
}
