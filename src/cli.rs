//! Command line surface. Every flag overrides the matching configuration value for one run.

use crate::harness::{ColdStartOptions, LatencyBreakdownOptions};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "coldprobe")]
#[command(
    author,
    version,
    about = "Cold start and latency probes for serverless image handlers",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Call every platform after exponentially growing idle periods.
    ///
    /// Waits 0, I0, 2*I0, ... seconds (up to the maximum) and probes each platform once after
    /// every wait, to see how long a platform may idle before the next call starts cold.
    ColdStart(ColdStartArgs),

    /// Call every platform once per image size, smallest first.
    LatencyBreakdown(LatencyBreakdownArgs),
}

#[derive(Args, Debug, Default)]
pub struct ColdStartArgs {
    /// First non-zero wait in seconds.
    #[arg(long)]
    pub initial_wait: Option<u64>,

    /// Longest wait in seconds; the schedule stops before exceeding it.
    #[arg(long)]
    pub max_wait: Option<u64>,

    /// Image the handlers are asked to fetch.
    #[arg(long)]
    pub image_url: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Default)]
pub struct LatencyBreakdownArgs {
    /// Image source with `{width}` and `{height}` placeholders.
    #[arg(long)]
    pub image_url_template: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Args, Debug, Default)]
pub struct CommonArgs {
    /// CSV file to write results to. Overwritten if it exists.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Only probe this platform. Repeat for several.
    #[arg(short, long = "platform")]
    pub platforms: Vec<String>,

    /// Log the planned calls without making them.
    #[arg(long)]
    pub dry_run: bool,
}

impl From<ColdStartArgs> for ColdStartOptions {
    fn from(args: ColdStartArgs) -> Self {
        Self {
            initial_wait_secs: args.initial_wait,
            max_wait_secs: args.max_wait,
            image_url: args.image_url,
            output_path: args.common.output,
            platforms: args.common.platforms,
            dry_run: args.common.dry_run,
        }
    }
}

impl From<LatencyBreakdownArgs> for LatencyBreakdownOptions {
    fn from(args: LatencyBreakdownArgs) -> Self {
        Self {
            image_url_template: args.image_url_template,
            output_path: args.common.output,
            platforms: args.common.platforms,
            dry_run: args.common.dry_run,
        }
    }
}
