//! Overview Command
//!
//! Prints headline statistics for a conversation export without calling the
//! provider.

use std::path::PathBuf;

use clap::Args;

use crate::commands::ScopeArgs;
use crate::services::report::{load_report, ReportOverview};
use crate::utils::error::AppResult;

/// Arguments for `overview`
#[derive(Debug, Clone, Args)]
pub struct OverviewArgs {
    /// Conversation export (JSON array or object with `conversations`)
    pub input: PathBuf,

    #[command(flatten)]
    pub scope: ScopeArgs,
}

pub fn execute(args: OverviewArgs) -> AppResult<()> {
    let overview = build(&args)?;
    println!("{}", serde_json::to_string_pretty(&overview)?);
    Ok(())
}

fn build(args: &OverviewArgs) -> AppResult<ReportOverview> {
    let scope = args.scope.selection()?;
    let report = load_report(&args.input)?;
    Ok(ReportOverview::from_report(&report, scope))
}
