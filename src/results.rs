use crate::platforms::{HandlerTimings, HarnessError};
use crate::schedule::TestPoint;
use crate::utilities::round_to;
use csv::WriterBuilder;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeKind {
    ColdStart,
    LatencyBreakdown,
}

impl ProbeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeKind::ColdStart => "cold_start",
            ProbeKind::LatencyBreakdown => "latency_breakdown",
        }
    }

    // Column names are what the plotting notebooks read, so the two probes differ slightly.
    pub fn header(&self) -> [&'static str; 7] {
        match self {
            ProbeKind::ColdStart => [
                "platform",
                "wait_time",
                "elapsed_time",
                "total_duration",
                "network_duration",
                "cpu_duration",
                "ml_duration",
            ],
            ProbeKind::LatencyBreakdown => [
                "platform",
                "image_size",
                "elapsed_time",
                "overall_duration",
                "network_duration",
                "cpu_duration",
                "ml_duration",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    pub platform: String,
    pub test_point: TestPoint,
    pub elapsed_wall_seconds: f64,
    pub overall_duration: f64,
    pub network_duration: f64,
    pub cpu_duration: f64,
    pub ml_duration: Option<f64>,
    // Decided on the measured elapsed time, before any rounding for output
    plausible: bool,
}

impl ProbeResult {
    pub fn new(
        platform: &str,
        test_point: TestPoint,
        elapsed_wall_seconds: f64,
        timings: HandlerTimings,
    ) -> Self {
        Self {
            platform: platform.to_string(),
            test_point,
            elapsed_wall_seconds,
            overall_duration: timings.overall_duration,
            network_duration: timings.network_duration,
            cpu_duration: timings.cpu_duration,
            ml_duration: timings.ml_duration,
            plausible: elapsed_wall_seconds >= timings.overall_duration,
        }
    }

    /// Round the recorded elapsed time. Plausibility keeps the verdict of the unrounded value.
    pub fn round_elapsed(mut self, decimals: u32) -> Self {
        self.elapsed_wall_seconds = round_to(self.elapsed_wall_seconds, decimals);
        self
    }

    /// Client side time not accounted for by the handler: network round trip and serialization.
    pub fn overhead(&self) -> f64 {
        self.elapsed_wall_seconds - self.overall_duration
    }

    /// Wall clock time covers the duration the handler reported for itself.
    pub fn is_plausible(&self) -> bool {
        self.plausible
    }

    fn as_row(&self) -> (&str, String, f64, f64, f64, f64, Option<f64>) {
        (
            self.platform.as_str(),
            self.test_point.to_string(),
            self.elapsed_wall_seconds,
            self.overall_duration,
            self.network_duration,
            self.cpu_duration,
            self.ml_duration,
        )
    }
}

/// Results of one run in call order. Only written out once the run is over.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    kind: ProbeKind,
    records: Vec<ProbeResult>,
}

impl ResultSet {
    pub fn new(kind: ProbeKind) -> Self {
        Self {
            kind,
            records: Vec::new(),
        }
    }

    pub fn kind(&self) -> ProbeKind {
        self.kind
    }

    pub fn push(&mut self, result: ProbeResult) {
        self.records.push(result);
    }

    pub fn records(&self) -> &[ProbeResult] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn persist(&self, path: impl AsRef<Path>) -> Result<(), HarnessError> {
        let path = path.as_ref();
        // Check directory for the results file is created
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        // Header is written by hand so an empty run still gets one
        let mut wtr = WriterBuilder::new().has_headers(false).from_path(path)?;
        wtr.write_record(&self.kind.header())?;
        for record in self.records.iter() {
            wtr.serialize(record.as_row())?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
