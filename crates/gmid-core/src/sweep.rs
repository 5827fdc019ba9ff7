use serde::Serialize;

/// One sweep sample with its derived figures of merit. SI units
/// throughout; `ft` in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SweepPoint {
    pub vgs: f64,
    pub id: f64,
    pub gm: f64,
    pub gds: f64,
    pub cgg: f64,
    pub gm_id: f64,
    pub gm_gds: f64,
    pub ft: f64,
}

/// Ordered rows of one DC sweep, immutable once produced. An empty result
/// is the uniform "no data" signal for failed or unparseable runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    pub points: Vec<SweepPoint>,
}

impl SweepResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Extract one column as a plain series, for the charting consumer.
    pub fn series<F>(&self, field: F) -> Vec<f64>
    where
        F: Fn(&SweepPoint) -> f64,
    {
        self.points.iter().map(field).collect()
    }
}
