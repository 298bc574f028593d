use crate::platforms::{Invoke, ProbeError, Target, TargetRegistry};
use crate::results::{ProbeKind, ProbeResult, ResultSet};
use crate::schedule::{Schedule, TestPoint};
use crate::utilities::minutes;
use tokio::time::{sleep, Instant};
use tracing::{info, warn};

/// What became of a single call. Skipped calls leave no record behind.
#[derive(Debug)]
pub enum ProbeOutcome {
    Success(ProbeResult),
    Skipped {
        platform: String,
        test_point: TestPoint,
        reason: ProbeError,
    },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ProbeOutcome::Success(_))
    }
}

#[derive(Debug)]
pub struct ProbeRun {
    pub results: ResultSet,
    pub attempted: usize,
    pub skipped: usize,
}

pub struct Prober<'a, I: Invoke + Sync + ?Sized> {
    invoker: &'a I,
    targets: &'a TargetRegistry,
    image_url_template: &'a str,
    elapsed_decimals: Option<u32>,
}

impl<'a, I: Invoke + Sync + ?Sized> Prober<'a, I> {
    pub fn new(invoker: &'a I, targets: &'a TargetRegistry, image_url_template: &'a str) -> Self {
        Self {
            invoker,
            targets,
            image_url_template,
            elapsed_decimals: None,
        }
    }

    pub fn with_elapsed_decimals(mut self, decimals: Option<u32>) -> Self {
        self.elapsed_decimals = decimals;
        self
    }

    /// One timed call. The clock runs around the whole request and body read, independent of
    /// whatever the handler reports about itself.
    pub async fn probe(&self, target: &Target, test_point: TestPoint) -> ProbeOutcome {
        let image_url = test_point.image_url(self.image_url_template);
        let start = Instant::now();
        let response = self.invoker.invoke(target, &image_url).await;
        let elapsed = start.elapsed().as_secs_f64();

        match response {
            Ok(timings) => {
                let mut result = ProbeResult::new(&target.name, test_point, elapsed, timings);
                if let Some(decimals) = self.elapsed_decimals {
                    result = result.round_elapsed(decimals);
                }
                info!(
                    platform = %target.name,
                    test_point = %test_point,
                    elapsed_time = result.elapsed_wall_seconds,
                    overall_duration = result.overall_duration,
                    network_duration = result.network_duration,
                    cpu_duration = result.cpu_duration,
                    ml_duration = ?result.ml_duration,
                    "Probe succeeded"
                );
                ProbeOutcome::Success(result)
            }
            Err(reason) => {
                warn!(
                    platform = %target.name,
                    test_point = %test_point,
                    "Call skipped: {}",
                    reason
                );
                ProbeOutcome::Skipped {
                    platform: target.name.clone(),
                    test_point,
                    reason,
                }
            }
        }
    }

    /// Walk the schedule once. Each test point waits its idle time a single time, then probes
    /// every platform in registry order. Failed calls are dropped and the walk continues.
    pub async fn run(&self, kind: ProbeKind, schedule: &Schedule) -> ProbeRun {
        let mut results = ResultSet::new(kind);
        let mut attempted = 0;
        let mut skipped = 0;

        for test_point in schedule.points() {
            let wait = test_point.wait();
            if wait.as_secs() > 0 {
                info!(
                    wait_secs = wait.as_secs(),
                    "Waiting {} minutes before calling functions...",
                    minutes(wait)
                );
                sleep(wait).await;
            } else {
                info!(test_point = %test_point, "Probing {} platforms", self.targets.len());
            }

            for target in self.targets {
                attempted += 1;
                match self.probe(target, test_point).await {
                    ProbeOutcome::Success(result) => results.push(result),
                    ProbeOutcome::Skipped { .. } => skipped += 1,
                }
            }
        }

        ProbeRun {
            results,
            attempted,
            skipped,
        }
    }
}
