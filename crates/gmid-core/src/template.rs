use std::path::Path;

use crate::device::DeviceParameters;
use crate::error::Result;

/// Render the sweep deck for one device. Polarity is a fixed two-way
/// choice: the NMOS skeleton sweeps the gate from 0 to +max, the PMOS
/// skeleton sweeps 0 to -max and negates the drain bias. The control
/// block saves exactly four device-internal vectors (ids, gm, gds, cgg)
/// and writes them to `output_file` in flat column form.
///
/// No I/O happens here; rendering fails only on invalid parameters.
pub fn render_netlist(params: &DeviceParameters, output_file: &Path) -> Result<String> {
    params.validate()?;

    let model = params.family.model_name();
    let lib = params.family.model_library();
    let sign = if params.family.is_pmos() { -1.0 } else { 1.0 };
    let vds = sign * params.vds;
    let vgs_stop = sign * params.vgs_max;
    let vgs_step = sign * params.vgs_step;

    // Instance prefix follows the polarity, matching the probe paths the
    // PDK subcircuit wrapper exposes.
    let inst = if params.family.is_pmos() { "xp1" } else { "xn1" };
    let probe = format!("@n.{}.n{}", inst, model);

    let mut out = String::new();
    out.push_str(&format!("* {} gm/Id sweep\n", model));
    out.push_str(&format!(".lib '{}' mos_tt\n\n", lib));

    out.push_str(&format!("Vds d 0 DC {}\n", vds));
    out.push_str("Vgate g 0 DC 0\n");
    out.push_str(&format!("Vbs b 0 DC {}\n\n", params.vbs));

    out.push_str(&format!(
        "X{} d g 0 b {} w={:e} l={:e} ng={} m={}\n\n",
        &inst[1..],
        model,
        params.width,
        params.length,
        params.fingers,
        params.mult
    ));

    out.push_str(&format!(".dc Vgate 0 {} {}\n\n", vgs_stop, vgs_step));

    out.push_str(".control\n");
    out.push_str(&format!(
        "save all {p}[ids] {p}[gm] {p}[gds] {p}[cgg]\n",
        p = probe
    ));
    out.push_str("run\n");
    out.push_str(&format!(
        "wrdata {} {p}[ids] {p}[gm] {p}[gds] {p}[cgg]\n",
        output_file.display(),
        p = probe
    ));
    out.push_str(".endc\n");
    out.push_str(".end\n");

    Ok(out)
}
