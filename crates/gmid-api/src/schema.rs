use serde::Serialize;

use gmid_core::history::HistoryEntry;

/// Compact description of one stored sweep, used by result and history
/// responses.
#[derive(Debug, Clone, Serialize)]
pub struct SweepSummary {
    pub device: String,
    pub width_um: f64,
    pub length_um: f64,
    pub fingers: u32,
    pub mult: u32,
    pub vds: f64,
    pub vgs_max: f64,
    pub vbs: f64,
    pub points: usize,
}

impl SweepSummary {
    pub fn from_entry(entry: &HistoryEntry) -> SweepSummary {
        SweepSummary {
            device: entry.params.family.model_name().to_string(),
            width_um: entry.params.width * 1e6,
            length_um: entry.params.length * 1e6,
            fingers: entry.params.fingers,
            mult: entry.params.mult,
            vds: entry.params.vds,
            vgs_max: entry.params.vgs_max,
            vbs: entry.params.vbs,
            points: entry.result.len(),
        }
    }
}
