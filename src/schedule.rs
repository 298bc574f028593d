use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The independent variable of a sweep. Every platform is probed once per test point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestPoint {
    Wait(u64),
    ImageSize(ImageSize),
}

impl TestPoint {
    /// Idle time to let pass before the platforms are probed at this point.
    pub fn wait(&self) -> Duration {
        match self {
            TestPoint::Wait(secs) => Duration::from_secs(*secs),
            TestPoint::ImageSize(_) => Duration::from_secs(0),
        }
    }

    /// Image source the handler is asked to fetch. `{width}` and `{height}` in the template are
    /// filled from image size points; wait points use the template as is.
    pub fn image_url(&self, template: &str) -> String {
        match self {
            TestPoint::Wait(_) => template.to_string(),
            TestPoint::ImageSize(size) => template
                .replace("{width}", &size.width.to_string())
                .replace("{height}", &size.height.to_string()),
        }
    }
}

impl fmt::Display for TestPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestPoint::Wait(secs) => write!(f, "{}", secs),
            TestPoint::ImageSize(size) => write!(f, "{}", size),
        }
    }
}

/// Wait schedule `0, I0, 2*I0, 4*I0, ...` up to and including `ceiling`.
///
/// The leading zero is the baseline call made before any idle period. Doubling covers several
/// orders of magnitude of idle time with few points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExponentialBackoff {
    initial: u64,
    ceiling: u64,
    next: Option<u64>,
}

impl ExponentialBackoff {
    pub fn new(initial: u64, ceiling: u64) -> Self {
        Self {
            initial,
            ceiling,
            next: Some(0),
        }
    }
}

impl Iterator for ExponentialBackoff {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        let current = self.next?;
        let following = match current {
            0 if self.initial == 0 => None,
            0 => Some(self.initial),
            c => c.checked_mul(2),
        };
        self.next = following.filter(|v| *v <= self.ceiling);
        Some(current)
    }
}

/// Explicit list of image sizes, consumed exactly as given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSweep {
    sizes: Vec<ImageSize>,
}

impl FixedSweep {
    pub fn new(sizes: Vec<ImageSize>) -> Self {
        Self { sizes }
    }

    pub fn sizes(&self) -> &[ImageSize] {
        &self.sizes
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Backoff(ExponentialBackoff),
    Sweep(FixedSweep),
}

impl Schedule {
    pub fn backoff(initial: u64, ceiling: u64) -> Self {
        Schedule::Backoff(ExponentialBackoff::new(initial, ceiling))
    }

    pub fn sweep(sizes: Vec<ImageSize>) -> Self {
        Schedule::Sweep(FixedSweep::new(sizes))
    }

    /// Fresh pass over the schedule. Each call starts from the first point again.
    pub fn points(&self) -> Box<dyn Iterator<Item = TestPoint> + Send + '_> {
        match self {
            Schedule::Backoff(backoff) => Box::new(backoff.clone().map(TestPoint::Wait)),
            Schedule::Sweep(sweep) => {
                Box::new(sweep.sizes().iter().copied().map(TestPoint::ImageSize))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.points().count()
    }

    pub fn is_empty(&self) -> bool {
        self.points().next().is_none()
    }
}
