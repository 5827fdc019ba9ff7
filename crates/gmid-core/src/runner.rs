use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info, warn};
use uuid::Uuid;

use crate::config::{expand_home, SimulationConfig};
use crate::device::DeviceParameters;
use crate::error::{Result, SimulationError};
use crate::parser::parse_sweep_file;
use crate::sweep::SweepResult;
use crate::template::render_netlist;

/// Local root for per-run scratch directories. Shared across invocations;
/// each run gets its own uuid-named subdirectory underneath.
pub const SCRATCH_ROOT: &str = ".sim_buffer";

const NETLIST_FILE: &str = "input.cir";
const OUTPUT_FILE: &str = "output.txt";

/// Per-run scratch directory, removed recursively when dropped so the
/// cleanup holds on every exit path, including unwinds.
struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    fn create(root: &Path) -> std::io::Result<ScratchDir> {
        fs::create_dir_all(root)?;
        let path = root.join(Uuid::new_v4().to_string());
        fs::create_dir(&path)?;
        Ok(ScratchDir { path })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_dir_all(&self.path) {
            warn!("scratch cleanup failed at {}: {}", self.path.display(), err);
        }
    }
}

/// Resolve the simulator binary: configured path first (with `~`
/// expansion), then a PATH probe. Fails before anything is spawned.
pub fn resolve_executable(config: &SimulationConfig) -> Result<PathBuf> {
    if let Some(configured) = &config.ngspice_path {
        let expanded = expand_home(configured);
        if is_executable(&expanded) {
            return Ok(expanded);
        }
        debug!(
            "configured simulator {} not executable, falling back to PATH",
            expanded.display()
        );
    }
    find_in_path("ngspice").ok_or_else(|| {
        SimulationError::ExecutableNotFound(
            "no configured path and no ngspice on PATH".to_string(),
        )
    })
}

fn find_in_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    for dir in std::env::split_paths(&paths) {
        let candidate = dir.join(name);
        if is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && meta.permissions().mode() & 0o111 != 0,
        Err(_) => false,
    }
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Run one DC gate sweep through the external simulator.
///
/// Single attempt, no retries. The simulator runs in batch mode from the
/// caller's working directory (so its own init file stays discoverable);
/// the scratch directory is referenced by absolute path only and is
/// removed before returning, whatever the outcome.
pub fn run_dc_sweep(
    params: &DeviceParameters,
    config: &SimulationConfig,
) -> Result<SweepResult> {
    params.validate()?;
    if let Some(limits) = config.limits_for(params.family) {
        params.check_limits(limits)?;
    }
    let executable = resolve_executable(config)?;

    let scratch = ScratchDir::create(Path::new(SCRATCH_ROOT))?;
    let scratch_abs = scratch.path().canonicalize()?;
    let netlist_path = scratch_abs.join(NETLIST_FILE);
    let output_path = scratch_abs.join(OUTPUT_FILE);

    let netlist = render_netlist(params, &output_path)?;
    fs::write(&netlist_path, netlist)?;

    info!(
        "running {} for {} ({} points)",
        executable.display(),
        params.family.model_name(),
        params.point_count()
    );
    let output = Command::new(&executable)
        .arg("-b")
        .arg(&netlist_path)
        .env("PDK_ROOT", expand_home(&config.pdk_root))
        .env("PDK", &config.pdk_name)
        .output()
        .map_err(|err| {
            SimulationError::ExecutableNotFound(format!(
                "{}: {}",
                executable.display(),
                err
            ))
        })?;

    if !output.status.success() {
        return Err(SimulationError::SimulatorExecutionFailed {
            status: output.status.to_string(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }
    if !output_path.exists() {
        return Err(SimulationError::NoOutputProduced {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let result = parse_sweep_file(&output_path);
    if result.is_empty() {
        warn!("simulator output at {} yielded no rows", output_path.display());
    }
    Ok(result)
}

/// Probe whether a simulator binary responds to `--version`.
pub fn is_simulator_available(config: &SimulationConfig) -> bool {
    let Ok(executable) = resolve_executable(config) else {
        return false;
    };
    Command::new(executable)
        .arg("--version")
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
