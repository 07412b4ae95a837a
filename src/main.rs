use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use career_explorer::channels::{Outcome, StdioTerminal, run_dialogue, run_form};
use career_explorer::config::AppConfig;
use career_explorer::crew::{AgentPipeline, LlmCompletionProvider, RetryPolicy};
use career_explorer::llm::create_provider;
use career_explorer::session::CareerSession;

/// Tech career exploration: answer a few questions, get career recommendations
#[derive(Parser, Debug)]
#[command(name = "career-explorer")]
#[command(version, about, long_about = None)]
struct Args {
    /// Interaction style
    #[arg(long, value_enum, default_value_t = Mode::Form)]
    mode: Mode,

    /// Submit even when questions were left blank
    #[arg(long)]
    allow_incomplete: bool,

    /// Re-run the pipeline up to N times when the model backend fails
    #[arg(long, default_value_t = 0)]
    retries: u32,

    /// Model to use (overrides CAREER_EXPLORER_MODEL)
    #[arg(long)]
    model: Option<String>,

    /// Model backend base URL (overrides CAREER_EXPLORER_API_BASE)
    #[arg(long)]
    endpoint: Option<String>,

    /// Log prompts and responses
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Step-by-step form with navigation and CV upload
    Form,
    /// Linear question-and-answer dialogue
    Dialogue,
}

impl Args {
    fn apply(&self, config: &mut AppConfig) {
        if let Some(model) = &self.model {
            config.model = model.trim().to_string();
        }
        if let Some(endpoint) = &self.endpoint {
            config.api_base = endpoint.trim().trim_end_matches('/').to_string();
        }
    }
}

/// Logs go to stderr so stdout stays the conversation. With a log dir, a
/// daily-rolling file gets a copy; keep the returned guard alive.
fn init_tracing(log_dir: Option<&Path>, verbose: bool) -> Option<WorkerGuard> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "career-explorer.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(stderr_layer)
                .init();
            None
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    args.apply(&mut config);
    anyhow::ensure!(!config.api_base.is_empty(), "--endpoint must not be empty");
    anyhow::ensure!(!config.model.is_empty(), "--model must not be empty");

    let _guard = init_tracing(config.log_dir.as_deref(), args.verbose);
    info!(
        endpoint = %config.api_base,
        model = %config.model,
        mode = ?args.mode,
        "Starting career explorer"
    );

    let llm = create_provider(&config)?;
    let provider = Arc::new(
        LlmCompletionProvider::new(llm, config.request_timeout)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens),
    );
    let pipeline = AgentPipeline::from_config(provider, &config);

    let mut session = CareerSession::new(pipeline).allow_incomplete(args.allow_incomplete);
    if args.retries > 0 {
        session = session.with_retry(RetryPolicy::with_max_retries(args.retries));
    }

    let mut term = StdioTerminal::new();
    let outcome = match args.mode {
        Mode::Form => run_form(&mut session, &mut term).await?,
        Mode::Dialogue => run_dialogue(&mut session, &mut term).await?,
    };
    info!(session = %session.id(), outcome = ?outcome, "Session finished");

    Ok(match outcome {
        Outcome::Failed => ExitCode::FAILURE,
        Outcome::Recommended | Outcome::Abandoned => ExitCode::SUCCESS,
    })
}
