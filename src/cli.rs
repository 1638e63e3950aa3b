//! CLI argument parsing for the route-timing binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "route-timing", about = "Drive and handling time estimates for delivery routes")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute segments and totals for a route
    Plan {
        /// Order JSON file (defaults to ORDERS_FILE)
        file: Option<PathBuf>,
        /// Delivery to plan (default: the only delivery in the file, or
        /// the one the first of `--ids` belongs to)
        #[arg(long)]
        delivery: Option<String>,
        /// Order ids in visit order, comma separated (default: file order)
        #[arg(long, value_delimiter = ',')]
        ids: Option<Vec<String>>,
        /// Departure time (HH:MM) for an arrival schedule
        #[arg(long)]
        start: Option<String>,
        /// Ask the configured routing provider for drive times
        #[arg(long)]
        refine: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List orders not yet assigned to a delivery
    Pool {
        /// Order JSON file (defaults to ORDERS_FILE)
        file: Option<PathBuf>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}
