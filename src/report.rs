//! End of run summary, one line per platform.
//!
//! The CSV file is the real output of a run; this is what the operator reads in the console
//! when the run finishes, to see at a glance whether both platforms produced a usable series.

use crate::probe::ProbeRun;
use crate::results::{ProbeKind, ProbeResult};
use chrono::{DateTime, Utc};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq)]
pub struct PlatformSummary {
    pub platform: String,
    pub records: usize,
    pub mean_elapsed: f64,
    pub mean_overall: f64,
    pub mean_overhead: f64,
    pub min_elapsed: f64,
    pub max_elapsed: f64,
    /// Records where the wall clock time is shorter than the handler's own duration.
    pub implausible: usize,
}

impl PlatformSummary {
    fn from_records(platform: &str, records: &[&ProbeResult]) -> Self {
        let n = records.len() as f64;
        let sum = |f: fn(&ProbeResult) -> f64| records.iter().map(|r| f(r)).sum::<f64>();
        let elapsed = records.iter().map(|r| r.elapsed_wall_seconds);
        Self {
            platform: platform.to_string(),
            records: records.len(),
            mean_elapsed: sum(|r| r.elapsed_wall_seconds) / n,
            mean_overall: sum(|r| r.overall_duration) / n,
            mean_overhead: sum(|r| r.overhead()) / n,
            min_elapsed: elapsed.clone().fold(f64::INFINITY, f64::min),
            max_elapsed: elapsed.fold(f64::NEG_INFINITY, f64::max),
            implausible: records.iter().filter(|r| !r.is_plausible()).count(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub kind: ProbeKind,
    pub generated: DateTime<Utc>,
    pub attempted: usize,
    pub skipped: usize,
    pub platforms: Vec<PlatformSummary>,
}

impl RunReport {
    pub fn from_run(run: &ProbeRun) -> Self {
        // Platforms in order of first appearance
        let mut names: Vec<&str> = Vec::new();
        for record in run.results.iter() {
            if !names.contains(&record.platform.as_str()) {
                names.push(record.platform.as_str());
            }
        }
        let platforms = names
            .iter()
            .map(|name| {
                let records: Vec<&ProbeResult> = run
                    .results
                    .iter()
                    .filter(|r| r.platform == *name)
                    .collect();
                PlatformSummary::from_records(name, &records)
            })
            .collect();
        Self {
            kind: run.results.kind(),
            generated: Utc::now(),
            attempted: run.attempted,
            skipped: run.skipped,
            platforms,
        }
    }

    pub fn implausible(&self) -> usize {
        self.platforms.iter().map(|p| p.implausible).sum()
    }

    pub fn render(&self) -> String {
        let mut output = String::new();
        let _ = writeln!(output, "Run summary ({})", self.kind.as_str());
        let _ = writeln!(output, "Generated: {}", self.generated.to_rfc3339());
        let _ = writeln!(
            output,
            "Calls: {} attempted, {} recorded, {} skipped",
            self.attempted,
            self.attempted - self.skipped,
            self.skipped
        );
        for p in self.platforms.iter() {
            let _ = writeln!(
                output,
                "{}: n={} elapsed mean={:.3}s min={:.3}s max={:.3}s \
                 overall mean={:.3}s overhead mean={:.3}s",
                p.platform,
                p.records,
                p.mean_elapsed,
                p.min_elapsed,
                p.max_elapsed,
                p.mean_overall,
                p.mean_overhead
            );
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platforms::HandlerTimings;
    use crate::results::ResultSet;
    use crate::schedule::TestPoint;

    fn record(platform: &str, wait: u64, elapsed: f64, overall: f64) -> ProbeResult {
        ProbeResult::new(
            platform,
            TestPoint::Wait(wait),
            elapsed,
            HandlerTimings {
                overall_duration: overall,
                network_duration: 0.5,
                cpu_duration: 0.25,
                ml_duration: None,
            },
        )
    }

    fn run() -> ProbeRun {
        let mut results = ResultSet::new(ProbeKind::ColdStart);
        results.push(record("OpenFaaS", 0, 2.0, 1.5));
        results.push(record("Azure", 0, 6.0, 4.0));
        results.push(record("OpenFaaS", 60, 1.0, 1.5));
        ProbeRun {
            results,
            attempted: 4,
            skipped: 1,
        }
    }

    #[test]
    fn report_groups_by_platform_in_first_seen_order() {
        let report = RunReport::from_run(&run());
        let names: Vec<&str> = report.platforms.iter().map(|p| p.platform.as_str()).collect();
        assert_eq!(names, vec!["OpenFaaS", "Azure"]);
        let openfaas = &report.platforms[0];
        assert_eq!(openfaas.records, 2);
        assert_eq!(openfaas.mean_elapsed, 1.5);
        assert_eq!(openfaas.min_elapsed, 1.0);
        assert_eq!(openfaas.max_elapsed, 2.0);
        assert_eq!(openfaas.mean_overhead, 0.0);
    }

    #[test]
    fn report_counts_implausible_records() {
        let report = RunReport::from_run(&run());
        assert_eq!(report.platforms[0].implausible, 1);
        assert_eq!(report.platforms[1].implausible, 0);
        assert_eq!(report.implausible(), 1);
    }

    #[test]
    fn render_lists_call_counts_and_each_platform() {
        let rendered = RunReport::from_run(&run()).render();
        assert!(rendered.contains("Run summary (cold_start)"));
        assert!(rendered.contains("Calls: 4 attempted, 3 recorded, 1 skipped"));
        assert!(rendered.contains("Azure: n=1 elapsed mean=6.000s"));
    }

    #[test]
    fn empty_run_has_no_platforms() {
        let run = ProbeRun {
            results: ResultSet::new(ProbeKind::LatencyBreakdown),
            attempted: 18,
            skipped: 18,
        };
        let report = RunReport::from_run(&run);
        assert!(report.platforms.is_empty());
        assert!(report.render().contains("0 recorded"));
    }
}
