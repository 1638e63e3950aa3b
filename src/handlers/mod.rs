//! Command handlers

pub mod route;

use anyhow::Result;

use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::services::schedule::parse_start_time;
use route::PlanOptions;

/// Run the parsed command and return its output
pub async fn run(cli: Cli, config: &Config) -> Result<String> {
    match cli.command {
        Command::Plan { file, delivery, ids, start, refine, json } => {
            let start = start.as_deref().map(parse_start_time).transpose()?;
            let options = PlanOptions { file, delivery, ids, start, refine, json };
            route::handle_plan(config, options).await
        }
        Command::Pool { file, json } => route::handle_pool(config, file, json).await,
    }
}
