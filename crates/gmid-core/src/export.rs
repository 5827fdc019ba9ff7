use std::fs;
use std::path::Path;

use crate::device::DeviceParameters;
use crate::sweep::SweepResult;

pub const TABLE_COLUMNS: [&str; 8] =
    ["vgs", "id", "gm", "gds", "cgg", "gm_id", "gm_gds", "ft"];

/// Write the derived table as whitespace-separated text: a comment line
/// recording the producing parameters, a header row, then one row per
/// sweep point in scientific notation.
pub fn write_sweep_table(
    params: &DeviceParameters,
    result: &SweepResult,
    path: &Path,
) -> std::io::Result<()> {
    let mut out = String::new();
    out.push_str(&format!(
        "* {} w={:e} l={:e} ng={} m={} vds={} vbs={}\n",
        params.family.model_name(),
        params.width,
        params.length,
        params.fingers,
        params.mult,
        params.vds,
        params.vbs
    ));
    out.push_str(&TABLE_COLUMNS.join(" "));
    out.push('\n');
    for point in &result.points {
        out.push_str(&format!(
            "{:.6e} {:.6e} {:.6e} {:.6e} {:.6e} {:.6e} {:.6e} {:.6e}\n",
            point.vgs,
            point.id,
            point.gm,
            point.gds,
            point.cgg,
            point.gm_id,
            point.gm_gds,
            point.ft
        ));
    }
    fs::write(path, out)
}
