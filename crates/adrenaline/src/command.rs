//! Running the user's shell commands

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

use crate::files::resolve_path;

/// Captured result of a shell command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// The command as the user typed it
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    /// Exit code, if the process exited normally
    pub status: Option<i32>,
}

impl CommandOutput {
    /// Fail unless the command exited with status 0.
    ///
    /// A process killed by a signal has no exit code and counts as a
    /// failure. A blank command never ran and does not.
    pub fn check_status(&self) -> Result<()> {
        match self.status {
            Some(0) => Ok(()),
            Some(code) => bail!("`{}` exited with status {}", self.command, code),
            None if self.command.trim().is_empty() => Ok(()),
            None => bail!("`{}` was terminated by a signal", self.command),
        }
    }
}

/// Rewrite `command` so its first argument is a path under `home/current_dir`.
///
/// Single-word commands are returned unchanged.
pub fn resolve_command(command: &str, home: &Path, current_dir: &Path) -> String {
    let mut parts = command.split_whitespace();
    let Some(program) = parts.next() else {
        return String::new();
    };
    let Some(target) = parts.next() else {
        return command.to_string();
    };

    let target = resolve_path(&home.join(current_dir), Path::new(target));
    let mut resolved = format!("{} {}", program, target.display());
    for rest in parts {
        resolved.push(' ');
        resolved.push_str(rest);
    }
    resolved
}

/// Run `command` through `sh -c` with its argument resolved against the
/// home directory and `current_dir`.
///
/// Blank commands return empty output without spawning anything.
pub fn run_command(command: &str, current_dir: &Path) -> Result<CommandOutput> {
    if command.trim().is_empty() {
        return Ok(CommandOutput {
            command: command.to_string(),
            ..CommandOutput::default()
        });
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let to_run = resolve_command(command, &home, current_dir);
    log::debug!("Running `{}`", to_run);

    let output = Command::new("sh")
        .arg("-c")
        .arg(&to_run)
        .output()
        .with_context(|| format!("Failed to run `{}`", to_run))?;

    Ok(CommandOutput {
        command: command.to_string(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        status: output.status.code(),
    })
}
