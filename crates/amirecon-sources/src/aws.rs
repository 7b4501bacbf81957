//! Running the `aws` command line and capturing its output.

use std::path::{Path, PathBuf};
use std::process::Command;

use amirecon_common::constants::AWS_CLI_PROGRAM;
use amirecon_common::error::{ReconError, Result};

/// Locates `aws` on `PATH`.
///
/// # Errors
///
/// Returns `ReconError::NotFound` if the program is not installed.
pub fn locate() -> Result<PathBuf> {
    which::which(AWS_CLI_PROGRAM).map_err(|_| ReconError::NotFound {
        kind: "aws CLI",
        id: format!("{AWS_CLI_PROGRAM} (install the AWS CLI to query AWS)"),
    })
}

/// Runs `program` with `args` and returns its standard output.
///
/// # Errors
///
/// Returns an I/O error if the program cannot be started, or
/// `ReconError::Command` carrying its stderr if it exits unsuccessfully.
pub fn run(program: &Path, args: &[&str]) -> Result<Vec<u8>> {
    tracing::trace!(program = %program.display(), ?args, "running aws CLI");
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| ReconError::Io {
            path: program.to_path_buf(),
            source: e,
        })?;
    if !output.status.success() {
        return Err(ReconError::Command {
            program: program.display().to_string(),
            message: format!(
                "{}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }
    Ok(output.stdout)
}
