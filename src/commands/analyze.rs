//! Analyze Command
//!
//! Loads a conversation export, runs the batched analysis against the
//! configured provider, and writes the consolidated report as JSON.

use std::future::Future;
use std::path::{Path, PathBuf};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use usecase_mapper_core::AnalysisResult;
use usecase_mapper_llm::create_generator;

use crate::commands::{EngineArgs, ScopeArgs};
use crate::models::settings::AppConfig;
use crate::services::analysis::{
    analyze_conversations, AnalysisObserver, AnalysisRequest, AnalysisStatus, ProgressControl,
};
use crate::services::report::load_report;
use crate::utils::error::AppResult;
use crate::utils::paths::ensure_parent_dir;

/// Arguments for `analyze`
#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Conversation export (JSON array or object with `conversations`)
    pub input: PathBuf,

    #[command(flatten)]
    pub scope: ScopeArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Write the report here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Single-line JSON
    #[arg(long)]
    pub compact: bool,
}

/// Progress bar observer. A cancelled token turns the next progress poll into
/// `Halt`.
pub struct ProgressObserver {
    bar: ProgressBar,
    cancel: CancellationToken,
}

impl ProgressObserver {
    pub fn new(bar: ProgressBar, cancel: CancellationToken) -> Self {
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        Self { bar, cancel }
    }

    pub fn bar(&self) -> &ProgressBar {
        &self.bar
    }
}

impl AnalysisObserver for ProgressObserver {
    fn on_progress(&self, current: usize, total: usize) -> ProgressControl {
        if self.cancel.is_cancelled() {
            self.bar.set_message("stopping after collected batches");
            return ProgressControl::Halt;
        }
        self.bar.set_length(total as u64);
        self.bar.set_position(current.saturating_sub(1) as u64);
        self.bar.set_message(format!("batch {}/{}", current, total));
        ProgressControl::Continue
    }

    fn on_status(&self, status: AnalysisStatus) {
        if status == AnalysisStatus::Consolidating {
            if let Some(len) = self.bar.length() {
                self.bar.set_position(len);
            }
        }
        self.bar.set_message(status.to_string());
    }
}

pub async fn execute(args: AnalyzeArgs, mut config: AppConfig, cancel: CancellationToken) -> AppResult<()> {
    config.apply_update(args.engine.to_update());
    let settings = config.engine_settings()?;
    let scope = args.scope.selection()?;
    let credential = config.resolve_credential();

    let report = load_report(&args.input)?;

    let generator = create_generator(&config.provider_config())?;
    let observer = ProgressObserver::new(ProgressBar::new(0), cancel);
    let request = AnalysisRequest::new(&report.conversations, &settings)
        .with_scope(scope)
        .with_credential(credential.as_ref());

    let outcome = analyze_conversations(generator.as_ref(), request, &observer).await;
    observer.bar().finish_and_clear();

    let result = match outcome {
        Ok(result) => result,
        Err(e) => {
            if e.is_auth_failure() {
                warn!("the provider rejected the API key");
                eprintln!("Authentication failed. Check the API key and run again (--api-key, config api_key, or API_KEY).");
            }
            return Err(e.into());
        }
    };

    let body = render(&result, args.compact)?;
    write_output(args.output.as_deref(), &body)?;
    eprintln!("{}", summary_line(&result));
    Ok(())
}

/// Interrupt handling for a run: the first signal cancels `cancel` so the
/// current batch finishes and consolidation runs; a second one calls `abort`.
pub async fn handle_interrupts<S, Fut, A>(mut next_signal: S, cancel: CancellationToken, abort: A)
where
    S: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
    A: FnOnce(),
{
    if next_signal().await.is_err() {
        return;
    }
    warn!("interrupted, finishing the current batch before consolidating (interrupt again to abort)");
    cancel.cancel();

    if next_signal().await.is_ok() {
        warn!("interrupted again, aborting");
        abort();
    }
}

/// Serialize the report, pretty unless `compact`.
pub fn render(result: &AnalysisResult, compact: bool) -> AppResult<String> {
    let body = if compact {
        serde_json::to_string(result)?
    } else {
        serde_json::to_string_pretty(result)?
    };
    Ok(body)
}

/// Write to `path`, creating parent directories, or print to stdout.
pub fn write_output(path: Option<&Path>, body: &str) -> AppResult<()> {
    match path {
        Some(path) => {
            ensure_parent_dir(path)?;
            std::fs::write(path, format!("{}\n", body))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{}", body),
    }
    Ok(())
}

pub fn summary_line(result: &AnalysisResult) -> String {
    format!(
        "{} use cases ({} conversations), {} patterns, {} top issues",
        result.identified_use_cases.len(),
        result.total_use_case_count(),
        result.common_patterns.len(),
        result.top_issues.len()
    )
}
