use std::path::Path;

use gmid_core::device::{DeviceFamily, DeviceParameters};
use gmid_core::template::render_netlist;

fn params(family: DeviceFamily) -> DeviceParameters {
    DeviceParameters::new(family, 10e-6, 1e-6)
}

#[test]
fn nmos_netlist_has_one_instance_and_one_sweep() {
    let netlist = render_netlist(
        &params(DeviceFamily::NmosLv),
        Path::new("/tmp/out.txt"),
    )
    .unwrap();

    let instance_lines = netlist
        .lines()
        .filter(|line| line.starts_with('X'))
        .count();
    assert_eq!(instance_lines, 1);

    let sweep_lines: Vec<&str> = netlist
        .lines()
        .filter(|line| line.starts_with(".dc"))
        .collect();
    assert_eq!(sweep_lines.len(), 1);
    assert_eq!(sweep_lines[0], ".dc Vgate 0 1.8 0.01");
}

#[test]
fn nmos_netlist_wires_bias_and_device() {
    let netlist = render_netlist(
        &params(DeviceFamily::NmosLv),
        Path::new("/tmp/out.txt"),
    )
    .unwrap();
    assert!(netlist.contains("Vds d 0 DC 0.9"));
    assert!(netlist.contains("Vbs b 0 DC 0"));
    assert!(netlist.contains("Xn1 d g 0 b sg13_lv_nmos"));
    assert!(netlist.contains("ng=1 m=1"));
    assert!(netlist.contains("wrdata /tmp/out.txt"));
    assert!(netlist.trim_end().ends_with(".end"));
}

#[test]
fn pmos_netlist_negates_drain_and_sweep() {
    let netlist = render_netlist(
        &params(DeviceFamily::PmosLv),
        Path::new("/tmp/out.txt"),
    )
    .unwrap();
    assert!(netlist.contains("Vds d 0 DC -0.9"));
    assert!(netlist.contains(".dc Vgate 0 -1.8 -0.01"));
    assert!(netlist.contains("Xp1 d g 0 b sg13_lv_pmos"));
}

#[test]
fn voltage_class_selects_model_library() {
    let lv = render_netlist(&params(DeviceFamily::NmosLv), Path::new("/tmp/o")).unwrap();
    assert!(lv.contains(".lib 'cornerMOSlv.lib' mos_tt"));

    let hv = render_netlist(&params(DeviceFamily::PmosHv), Path::new("/tmp/o")).unwrap();
    assert!(hv.contains(".lib 'cornerMOShv.lib' mos_tt"));
}

#[test]
fn control_block_saves_four_quantities() {
    let netlist = render_netlist(
        &params(DeviceFamily::NmosHv),
        Path::new("/tmp/out.txt"),
    )
    .unwrap();
    let probe = "@n.xn1.nsg13_hv_nmos";
    for quantity in ["ids", "gm", "gds", "cgg"] {
        assert!(
            netlist.contains(&format!("{}[{}]", probe, quantity)),
            "missing save for {}",
            quantity
        );
    }
}

#[test]
fn rendering_rejects_invalid_parameters() {
    let mut bad = params(DeviceFamily::NmosLv);
    bad.width = 0.0;
    assert!(render_netlist(&bad, Path::new("/tmp/o")).is_err());

    let mut bad = params(DeviceFamily::NmosLv);
    bad.vgs_step = 2.0; // larger than vgs_max
    assert!(render_netlist(&bad, Path::new("/tmp/o")).is_err());
}
