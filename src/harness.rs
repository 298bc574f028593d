use crate::{
    configuration::Settings,
    platforms::{HarnessError, Invoke, RestClient, TargetRegistry},
    probe::{ProbeRun, Prober},
    report::RunReport,
    results::{ProbeKind, ResultSet},
    schedule::Schedule,
};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColdStartOptions {
    pub initial_wait_secs: Option<u64>,
    pub max_wait_secs: Option<u64>,
    pub image_url: Option<String>,
    pub output_path: Option<String>,
    pub platforms: Vec<String>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatencyBreakdownOptions {
    pub image_url_template: Option<String>,
    pub output_path: Option<String>,
    pub platforms: Vec<String>,
    pub dry_run: bool,
}

// Everything a probe needs once the command line and configuration are merged.
struct Plan<'a> {
    kind: ProbeKind,
    schedule: Schedule,
    targets: TargetRegistry,
    image_url_template: &'a str,
    elapsed_decimals: Option<u32>,
    output_path: &'a str,
    dry_run: bool,
}

#[derive(Debug)]
pub struct Harness<I = RestClient> {
    pub settings: Settings,
    pub registry: TargetRegistry,
    pub client: I,
}

impl Harness<RestClient> {
    pub fn new(settings: Settings) -> Result<Self, HarnessError> {
        // Create http client shared by every probe call
        let client = RestClient::new(settings.client.timeout()).map_err(HarnessError::Client)?;
        Ok(Self::with_client(settings, client))
    }
}

impl<I: Invoke + Sync> Harness<I> {
    pub fn with_client(settings: Settings, client: I) -> Self {
        let registry = TargetRegistry::new(settings.targets.clone());
        Self {
            settings,
            registry,
            client,
        }
    }

    pub async fn cold_start(&self, opts: &ColdStartOptions) -> Result<ResultSet, HarnessError> {
        let cfg = &self.settings.cold_start;
        let initial = opts.initial_wait_secs.unwrap_or(cfg.initial_wait_secs);
        let ceiling = opts.max_wait_secs.unwrap_or(cfg.max_wait_secs);
        if initial == 0 {
            warn!("Initial wait is zero, only the baseline point will be probed.");
        }
        let plan = Plan {
            kind: ProbeKind::ColdStart,
            schedule: Schedule::backoff(initial, ceiling),
            targets: self.select(&opts.platforms)?,
            image_url_template: opts.image_url.as_deref().unwrap_or(&cfg.image_url),
            elapsed_decimals: cfg.elapsed_decimals,
            output_path: opts.output_path.as_deref().unwrap_or(&cfg.output_path),
            dry_run: opts.dry_run,
        };
        info!("Starting cold start detection...");
        self.execute(plan).await
    }

    pub async fn latency_breakdown(
        &self,
        opts: &LatencyBreakdownOptions,
    ) -> Result<ResultSet, HarnessError> {
        let cfg = &self.settings.latency_breakdown;
        let plan = Plan {
            kind: ProbeKind::LatencyBreakdown,
            schedule: Schedule::sweep(cfg.image_sizes.clone()),
            targets: self.select(&opts.platforms)?,
            image_url_template: opts
                .image_url_template
                .as_deref()
                .unwrap_or(&cfg.image_url_template),
            elapsed_decimals: cfg.elapsed_decimals,
            output_path: opts.output_path.as_deref().unwrap_or(&cfg.output_path),
            dry_run: opts.dry_run,
        };
        info!("Starting latency breakdown test with varying input sizes...");
        self.execute(plan).await
    }

    fn select(&self, platforms: &[String]) -> Result<TargetRegistry, HarnessError> {
        self.registry
            .select(platforms)
            .map_err(HarnessError::UnknownPlatform)
    }

    async fn execute(&self, plan: Plan<'_>) -> Result<ResultSet, HarnessError> {
        info!(
            probe = plan.kind.as_str(),
            platforms = ?plan.targets.names(),
            test_points = plan.schedule.len(),
            "Planned {} calls",
            plan.schedule.len() * plan.targets.len()
        );

        if plan.dry_run {
            for test_point in plan.schedule.points() {
                for target in plan.targets.iter() {
                    info!(
                        "Would call {} at {} with url={}",
                        target.name,
                        test_point,
                        test_point.image_url(plan.image_url_template)
                    );
                }
            }
            return Ok(ResultSet::new(plan.kind));
        }

        // Probe every platform at every test point
        let prober = Prober::new(&self.client, &plan.targets, plan.image_url_template)
            .with_elapsed_decimals(plan.elapsed_decimals);
        let run: ProbeRun = prober.run(plan.kind, &plan.schedule).await;

        // Results are only written once the run is over
        run.results.persist(plan.output_path)?;
        info!("Results saved to {}", plan.output_path);

        let report = RunReport::from_run(&run);
        info!("{}", report.render());
        if run.results.is_empty() {
            warn!("Every call failed, {} only has a header row.", plan.output_path);
        }
        if report.implausible() > 0 {
            warn!(
                "{} records report a handler duration longer than the measured elapsed time.",
                report.implausible()
            );
        }
        Ok(run.results)
    }
}
