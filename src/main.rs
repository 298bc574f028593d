use clap::Parser;
use coldprobe::cli::{Cli, Commands};
use coldprobe::configuration::Settings;
use coldprobe::harness::Harness;
use coldprobe::platforms::HarnessError;
use coldprobe::telemetry::init_subscriber;
use tracing::error;

#[tokio::main]
async fn main() {
    // Load telemetry
    init_subscriber();
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), HarnessError> {
    // Load configuration
    let settings = Settings::from_configuration()?;

    // Build harness
    let harness = Harness::new(settings)?;

    // Run probe
    // An empty result set is still a normal exit, the header-only file marks it
    match cli.command {
        Commands::ColdStart(args) => harness.cold_start(&args.into()).await?,
        Commands::LatencyBreakdown(args) => harness.latency_breakdown(&args.into()).await?,
    };
    Ok(())
}
