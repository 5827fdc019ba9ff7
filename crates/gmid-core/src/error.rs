use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimulationError>;

/// Errors for a single sweep invocation. Empty simulator output is not an
/// error: the parser returns an empty `SweepResult` and callers treat that
/// as "no data". A missing configuration file is not an error either; the
/// loader falls back to built-in defaults and flags the condition.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Device parameters failed validation before any I/O happened.
    #[error("invalid device parameters: {0}")]
    InvalidParameters(String),

    /// Simulator binary not resolvable via config or PATH. Raised before
    /// anything is spawned.
    #[error("simulator executable not found: {0}")]
    ExecutableNotFound(String),

    /// Simulator exited nonzero. Carries captured output for diagnostics.
    #[error("simulator execution failed ({status})\nstdout: {stdout}\nstderr: {stderr}")]
    SimulatorExecutionFailed {
        status: String,
        stdout: String,
        stderr: String,
    },

    /// Simulator exited zero but the expected output file is missing.
    #[error("simulator produced no output file\nstdout: {stdout}\nstderr: {stderr}")]
    NoOutputProduced { stdout: String, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
