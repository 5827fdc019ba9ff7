use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Deserialize;

use crate::device::DeviceFamily;

pub const DEFAULT_CONFIG_PATH: &str = "config/global.json";

/// Geometry and bias limits for one device family, as published by the PDK.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceLimits {
    pub min_width: f64,
    pub max_width: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub max_vgs: f64,
}

/// On-disk shape of `config/global.json`. All fields optional so a partial
/// file still loads; the process registry maps process names to their
/// config file paths.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GlobalConfig {
    pub ngspice_path: Option<String>,
    pub pdk_root: Option<String>,
    pub pdk_name: Option<String>,
    #[serde(default)]
    pub processes: HashMap<String, String>,
    #[serde(default)]
    pub device_limits: HashMap<String, DeviceLimits>,
}

/// On-disk shape of a per-process config file. Fields present here
/// override the global ones.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProcessConfig {
    pub ngspice_path: Option<String>,
    pub pdk_root: Option<String>,
    pub pdk_name: Option<String>,
    #[serde(default)]
    pub device_limits: HashMap<String, DeviceLimits>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    File,
    BuiltinDefaults,
}

/// Immutable, merged configuration for the duration of one invocation.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Configured simulator path; may be `~`-relative. `None` means
    /// resolve from PATH only.
    pub ngspice_path: Option<String>,
    pub pdk_root: String,
    pub pdk_name: String,
    /// Keyed by device model name (`sg13_lv_nmos`, ...).
    pub device_limits: HashMap<String, DeviceLimits>,
    pub source: ConfigSource,
}

impl SimulationConfig {
    pub fn builtin_defaults() -> Self {
        Self {
            ngspice_path: Some("~/analog/tools/bin/ngspice".to_string()),
            pdk_root: "~/analog/pdk/IHP-Open-PDK".to_string(),
            pdk_name: "ihp-sg13g2".to_string(),
            device_limits: HashMap::new(),
            source: ConfigSource::BuiltinDefaults,
        }
    }

    /// Field-by-field merge: process-specific values win over global,
    /// both win over built-in defaults.
    pub fn merge(global: &GlobalConfig, process: Option<&ProcessConfig>) -> Self {
        let defaults = Self::builtin_defaults();
        let mut merged = Self {
            ngspice_path: global.ngspice_path.clone().or(defaults.ngspice_path),
            pdk_root: global.pdk_root.clone().unwrap_or(defaults.pdk_root),
            pdk_name: global.pdk_name.clone().unwrap_or(defaults.pdk_name),
            device_limits: global.device_limits.clone(),
            source: ConfigSource::File,
        };
        if let Some(process) = process {
            if let Some(path) = &process.ngspice_path {
                merged.ngspice_path = Some(path.clone());
            }
            if let Some(root) = &process.pdk_root {
                merged.pdk_root = root.clone();
            }
            if let Some(name) = &process.pdk_name {
                merged.pdk_name = name.clone();
            }
            for (key, limits) in &process.device_limits {
                merged.device_limits.insert(key.clone(), limits.clone());
            }
        }
        merged
    }

    pub fn limits_for(&self, family: DeviceFamily) -> Option<&DeviceLimits> {
        self.device_limits.get(family.model_name())
    }
}

/// Load and merge configuration. Any unreadable file degrades to the
/// built-in defaults (flagged via `source`) instead of failing the run.
pub fn load_config(path: Option<&Path>) -> SimulationConfig {
    let global_path = path.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let global: GlobalConfig = match read_json(global_path) {
        Some(global) => global,
        None => {
            warn!(
                "no usable config at {}, using built-in defaults",
                global_path.display()
            );
            return SimulationConfig::builtin_defaults();
        }
    };
    let process = load_first_process(&global);
    SimulationConfig::merge(&global, process.as_ref())
}

/// Pick the first registered process, by sorted name, and load its config.
fn load_first_process(global: &GlobalConfig) -> Option<ProcessConfig> {
    let mut names: Vec<&String> = global.processes.keys().collect();
    names.sort();
    let name = names.first()?;
    let path = Path::new(&global.processes[*name]);
    match read_json::<ProcessConfig>(path) {
        Some(process) => Some(process),
        None => {
            warn!(
                "process config for {} not readable at {}",
                name,
                path.display()
            );
            None
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Option<T> {
    let content = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("malformed config {}: {}", path.display(), err);
            None
        }
    }
}

/// Expand a leading `~` against `$HOME`. Paths without one pass through.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
