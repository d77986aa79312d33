//! External command execution utilities.
//!
//! Provides a small builder API for running commands and capturing their
//! output. Used by the `template` processor to expand `<%= … %>` blocks.
//!
//! # Examples
//!
//! ```ignore
//! use crate::utils::exec::Cmd;
//!
//! let out = Cmd::new("git").args(["rev-parse", "--short", "HEAD"]).cwd(root).run()?;
//! let out = Cmd::shell("date +%Y").cwd(root).run()?;
//! ```

use anyhow::{Context, Result, bail};
use std::{
    ffi::{OsStr, OsString},
    path::{Path, PathBuf},
    process::{Command, Output},
};

/// Command builder for external process execution.
#[derive(Debug, Default)]
pub struct Cmd {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
}

impl Cmd {
    /// Create a new command builder.
    pub fn new<S: AsRef<OsStr>>(program: S) -> Self {
        Self {
            program: program.as_ref().to_owned(),
            ..Default::default()
        }
    }

    /// Run `script` through the platform shell.
    pub fn shell(script: &str) -> Self {
        #[cfg(windows)]
        {
            Self::new("cmd").args(["/C", script])
        }
        #[cfg(not(windows))]
        {
            Self::new("sh").args(["-c", script])
        }
    }

    /// Add a single argument.
    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Add multiple arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_owned()));
        self
    }

    /// Set working directory.
    pub fn cwd<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Execute and return the captured output.
    ///
    /// Fails when the process cannot be spawned or exits non-zero; the
    /// error carries the command's stderr.
    pub fn run(self) -> Result<Output> {
        let name = self.program.to_string_lossy().to_string();
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let output = cmd
            .output()
            .with_context(|| format!("Failed to execute `{name}`"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("`{name}` exited with {}: {}", output.status, stderr.trim());
        }
        Ok(output)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[test]
    fn test_shell_captures_stdout() {
        let out = Cmd::shell("printf hello").run().unwrap();
        assert_eq!(String::from_utf8_lossy(&out.stdout), "hello");
    }

    #[test]
    fn test_nonzero_exit_is_error() {
        let err = Cmd::shell("echo boom >&2; exit 3").run().unwrap_err();
        assert!(err.to_string().contains("boom"));
    }
}
