//! Sample clock and step grids

/// Global clock counting output samples
///
/// Time is derived from the integer sample count, so it never accumulates
/// rounding error no matter how long the stream runs.
#[derive(Debug, Clone)]
pub struct Clock {
    sample_rate: u32,
    samples: u64,
}

impl Clock {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            samples: 0,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples emitted so far
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Current time in seconds
    pub fn time(&self) -> f64 {
        self.samples as f64 / self.sample_rate as f64
    }

    /// Duration of one sample in seconds
    pub fn sample_period(&self) -> f64 {
        1.0 / self.sample_rate as f64
    }

    /// Convert seconds to the nearest whole number of samples
    pub fn seconds_to_samples(&self, seconds: f64) -> u64 {
        (seconds * self.sample_rate as f64).round() as u64
    }

    /// Move forward by one sample
    pub fn advance(&mut self) {
        self.samples += 1;
    }
}

/// Fixed-tempo grid of equally spaced steps
#[derive(Debug, Clone, Copy)]
pub struct StepGrid {
    step_duration: f64,
}

impl StepGrid {
    /// Grid of `steps_per_beat` subdivisions at `bpm`
    pub fn new(bpm: f64, steps_per_beat: u32) -> Self {
        Self::from_duration(60.0 / bpm / steps_per_beat as f64)
    }

    /// Grid with an explicit step length in seconds
    pub fn from_duration(step_duration: f64) -> Self {
        debug_assert!(step_duration > 0.0, "step duration must be positive");
        Self { step_duration }
    }

    pub fn step_duration(&self) -> f64 {
        self.step_duration
    }

    /// `floor(t / step_duration)`
    pub fn step_at(&self, t: f64) -> u64 {
        (t / self.step_duration).floor() as u64
    }

    /// Start time of step `step`
    pub fn step_start(&self, step: u64) -> f64 {
        step as f64 * self.step_duration
    }
}

/// Reports each step of a grid exactly once
///
/// Boundaries are detected by comparing integer step indices, never by
/// checking whether the time inside a step is "close to zero".
#[derive(Debug, Clone)]
pub struct StepTrigger {
    grid: StepGrid,
    last: Option<u64>,
}

impl StepTrigger {
    pub fn new(grid: StepGrid) -> Self {
        Self { grid, last: None }
    }

    pub fn grid(&self) -> &StepGrid {
        &self.grid
    }

    /// Returns the step index if `t` lies in a step that has not fired yet
    pub fn poll(&mut self, t: f64) -> Option<u64> {
        let step = self.grid.step_at(t);
        if self.last == Some(step) {
            return None;
        }
        self.last = Some(step);
        Some(step)
    }

    /// Most recently fired step
    pub fn last(&self) -> Option<u64> {
        self.last
    }
}
