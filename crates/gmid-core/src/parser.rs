use std::path::Path;

use log::{debug, warn};

use crate::sweep::{SweepPoint, SweepResult};

/// Drain current magnitude floor: keeps log-scale plotting and the gm/Id
/// division well defined at zero bias.
pub const ID_FLOOR: f64 = 1e-15;

/// Denominator guard for the derived ratios.
pub const GUARD_EPS: f64 = 1e-18;

// ngspice wrdata emits interleaved (sweep, value) pairs per saved vector,
// so for four vectors a row is: vgs ids vgs gm vgs gds vgs cgg.
const ID_COL: usize = 1;
const GM_COL: usize = 3;
const GDS_COL: usize = 5;
const CGG_COL: usize = 7;
const MIN_COLUMNS: usize = 8;

/// Parse the simulator's flat output file. An absent or unreadable file
/// yields an empty result, never an error; callers treat empty as a
/// failed run.
pub fn parse_sweep_file(path: &Path) -> SweepResult {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("sweep output not readable at {}: {}", path.display(), err);
            return SweepResult::new();
        }
    };
    parse_sweep_text(&content)
}

/// Parse whitespace-delimited headerless columns. Rows with non-numeric
/// tokens or fewer than the expected eight columns are skipped rather
/// than mis-mapped.
pub fn parse_sweep_text(input: &str) -> SweepResult {
    let mut points = Vec::new();
    for (line_no, line) in input.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let Some(cols) = parse_columns(trimmed) else {
            debug!("skipping unparseable sweep row {}", line_no + 1);
            continue;
        };
        points.push(derive_point(
            cols[0],
            cols[ID_COL],
            cols[GM_COL],
            cols[GDS_COL],
            cols[CGG_COL],
        ));
    }
    SweepResult { points }
}

fn parse_columns(line: &str) -> Option<Vec<f64>> {
    let mut cols = Vec::with_capacity(MIN_COLUMNS);
    for token in line.split_whitespace() {
        cols.push(token.parse::<f64>().ok()?);
    }
    if cols.len() < MIN_COLUMNS {
        return None;
    }
    Some(cols)
}

/// Per-row derivation with saturating divide guards: a denominator at or
/// below `GUARD_EPS` maps the ratio to 0 instead of raising.
fn derive_point(vgs: f64, ids_raw: f64, gm: f64, gds: f64, cgg: f64) -> SweepPoint {
    let id = ids_raw.abs().max(ID_FLOOR);
    let gm_id = if id.abs() > GUARD_EPS { gm / id } else { 0.0 };
    let gm_gds = if gds.abs() > GUARD_EPS { gm / gds } else { 0.0 };
    let ft = if cgg.abs() > GUARD_EPS {
        gm / (2.0 * std::f64::consts::PI * cgg.abs())
    } else {
        0.0
    };
    SweepPoint {
        vgs,
        id,
        gm,
        gds,
        cgg,
        gm_id,
        gm_gds,
        ft,
    }
}
