use crate::config::DeviceLimits;
use crate::error::{Result, SimulationError};

/// The four supported MOS device families of the SG13G2 process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceFamily {
    NmosLv,
    PmosLv,
    NmosHv,
    PmosHv,
}

impl DeviceFamily {
    pub fn all() -> [DeviceFamily; 4] {
        [
            DeviceFamily::NmosLv,
            DeviceFamily::PmosLv,
            DeviceFamily::NmosHv,
            DeviceFamily::PmosHv,
        ]
    }

    /// Subcircuit model name as spelled in the PDK libraries.
    pub fn model_name(&self) -> &'static str {
        match self {
            DeviceFamily::NmosLv => "sg13_lv_nmos",
            DeviceFamily::PmosLv => "sg13_lv_pmos",
            DeviceFamily::NmosHv => "sg13_hv_nmos",
            DeviceFamily::PmosHv => "sg13_hv_pmos",
        }
    }

    pub fn from_name(name: &str) -> Option<DeviceFamily> {
        match name.to_ascii_lowercase().as_str() {
            "sg13_lv_nmos" => Some(DeviceFamily::NmosLv),
            "sg13_lv_pmos" => Some(DeviceFamily::PmosLv),
            "sg13_hv_nmos" => Some(DeviceFamily::NmosHv),
            "sg13_hv_pmos" => Some(DeviceFamily::PmosHv),
            _ => None,
        }
    }

    pub fn is_pmos(&self) -> bool {
        matches!(self, DeviceFamily::PmosLv | DeviceFamily::PmosHv)
    }

    pub fn is_high_voltage(&self) -> bool {
        matches!(self, DeviceFamily::NmosHv | DeviceFamily::PmosHv)
    }

    /// Model library filename, selected by voltage class only. The
    /// simulator's own sourcepath mechanism locates it by filename.
    pub fn model_library(&self) -> &'static str {
        if self.is_high_voltage() {
            "cornerMOShv.lib"
        } else {
            "cornerMOSlv.lib"
        }
    }
}

/// Bias and geometry inputs for one sweep. Lengths are in meters,
/// voltages in volts.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceParameters {
    pub family: DeviceFamily,
    pub width: f64,
    pub length: f64,
    pub fingers: u32,
    pub mult: u32,
    pub vds: f64,
    pub vgs_max: f64,
    pub vgs_step: f64,
    pub vbs: f64,
}

impl DeviceParameters {
    pub fn new(family: DeviceFamily, width: f64, length: f64) -> Self {
        Self {
            family,
            width,
            length,
            fingers: 1,
            mult: 1,
            vds: 0.9,
            vgs_max: 1.8,
            vgs_step: 0.01,
            vbs: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.width.is_finite() || self.width <= 0.0 {
            return Err(SimulationError::InvalidParameters(format!(
                "width must be > 0, got {}",
                self.width
            )));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(SimulationError::InvalidParameters(format!(
                "length must be > 0, got {}",
                self.length
            )));
        }
        if self.fingers < 1 {
            return Err(SimulationError::InvalidParameters(
                "finger count must be >= 1".to_string(),
            ));
        }
        if self.mult < 1 {
            return Err(SimulationError::InvalidParameters(
                "multiplier must be >= 1".to_string(),
            ));
        }
        if !self.vds.is_finite() || !self.vbs.is_finite() {
            return Err(SimulationError::InvalidParameters(
                "bias voltages must be finite".to_string(),
            ));
        }
        if !self.vgs_max.is_finite() || self.vgs_max <= 0.0 {
            return Err(SimulationError::InvalidParameters(format!(
                "max vgs must be > 0, got {}",
                self.vgs_max
            )));
        }
        if !self.vgs_step.is_finite() || self.vgs_step <= 0.0 || self.vgs_step > self.vgs_max {
            return Err(SimulationError::InvalidParameters(format!(
                "vgs step must be > 0 and <= max vgs, got {}",
                self.vgs_step
            )));
        }
        Ok(())
    }

    /// Check geometry and bias against per-family PDK limits.
    pub fn check_limits(&self, limits: &DeviceLimits) -> Result<()> {
        if self.width < limits.min_width || self.width > limits.max_width {
            return Err(SimulationError::InvalidParameters(format!(
                "width {} outside [{}, {}] for {}",
                self.width,
                limits.min_width,
                limits.max_width,
                self.family.model_name()
            )));
        }
        if self.length < limits.min_length || self.length > limits.max_length {
            return Err(SimulationError::InvalidParameters(format!(
                "length {} outside [{}, {}] for {}",
                self.length,
                limits.min_length,
                limits.max_length,
                self.family.model_name()
            )));
        }
        if self.vgs_max > limits.max_vgs {
            return Err(SimulationError::InvalidParameters(format!(
                "max vgs {} exceeds {} for {}",
                self.vgs_max,
                limits.max_vgs,
                self.family.model_name()
            )));
        }
        Ok(())
    }

    /// Number of sweep points the simulator will emit. The small epsilon
    /// keeps near-integer ratios like 1.2/0.1 from flooring one short.
    pub fn point_count(&self) -> usize {
        (self.vgs_max / self.vgs_step + 1e-9).floor() as usize + 1
    }

    /// Effective electrical width: drawn width times multiplier.
    pub fn effective_width(&self) -> f64 {
        self.width * self.mult as f64
    }
}
