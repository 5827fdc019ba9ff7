use gmid_core::device::{DeviceFamily, DeviceParameters};

#[test]
fn family_names_round_trip() {
    for family in DeviceFamily::all() {
        assert_eq!(DeviceFamily::from_name(family.model_name()), Some(family));
    }
    assert_eq!(DeviceFamily::from_name("sg13_lv_weird"), None);
}

#[test]
fn polarity_and_voltage_class() {
    assert!(!DeviceFamily::NmosLv.is_pmos());
    assert!(DeviceFamily::PmosHv.is_pmos());
    assert!(!DeviceFamily::PmosLv.is_high_voltage());
    assert!(DeviceFamily::NmosHv.is_high_voltage());

    assert_eq!(DeviceFamily::NmosLv.model_library(), "cornerMOSlv.lib");
    assert_eq!(DeviceFamily::NmosHv.model_library(), "cornerMOShv.lib");
}

#[test]
fn point_count_matches_sweep_grid() {
    let mut params = DeviceParameters::new(DeviceFamily::NmosLv, 10e-6, 1e-6);
    params.vgs_max = 1.8;
    params.vgs_step = 0.01;
    assert_eq!(params.point_count(), 181);

    params.vgs_max = 1.2;
    params.vgs_step = 0.1;
    assert_eq!(params.point_count(), 13);
}

#[test]
fn validation_rejects_bad_inputs() {
    let good = DeviceParameters::new(DeviceFamily::NmosLv, 10e-6, 1e-6);
    assert!(good.validate().is_ok());

    let mut bad = good.clone();
    bad.width = 0.0;
    assert!(bad.validate().is_err());

    let mut bad = good.clone();
    bad.length = f64::NAN;
    assert!(bad.validate().is_err());

    let mut bad = good.clone();
    bad.fingers = 0;
    assert!(bad.validate().is_err());

    let mut bad = good.clone();
    bad.mult = 0;
    assert!(bad.validate().is_err());

    let mut bad = good.clone();
    bad.vgs_step = 0.0;
    assert!(bad.validate().is_err());

    let mut bad = good.clone();
    bad.vgs_step = bad.vgs_max * 2.0;
    assert!(bad.validate().is_err());

    let mut bad = good.clone();
    bad.vgs_max = -1.0;
    assert!(bad.validate().is_err());
}

#[test]
fn effective_width_scales_with_multiplier() {
    let mut params = DeviceParameters::new(DeviceFamily::NmosLv, 10e-6, 1e-6);
    params.mult = 4;
    assert!((params.effective_width() - 40e-6).abs() < 1e-15);
}
