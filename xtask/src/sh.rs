// sh! command execution

use std::path::PathBuf;
use std::process::{Command, Stdio};

use anyhow::{bail, Context, Result};
use derive_builder::Builder;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamMode {
    Inherit,
    Pipe,
    Null,
}

impl StreamMode {
    fn stdio(&self) -> Stdio {
        match self {
            StreamMode::Inherit => Stdio::inherit(),
            StreamMode::Pipe => Stdio::piped(),
            StreamMode::Null => Stdio::null(),
        }
    }
}

#[derive(Clone, Debug, Builder)]
#[builder(default)]
pub struct ShOptions {
    pub stdout: StreamMode,
    pub stderr: StreamMode,
    pub cwd: Option<PathBuf>,
    /// Extra environment for the child, e.g. `RUSTFLAGS` for a target.
    pub env: Vec<(String, String)>,
}

impl Default for ShOptions {
    fn default() -> Self {
        Self {
            stdout: StreamMode::Inherit,
            stderr: StreamMode::Inherit,
            cwd: None,
            env: Vec::new(),
        }
    }
}

impl ShOptions {
    fn apply(&self, cmd: &mut Command) {
        cmd.stdout(self.stdout.stdio());
        cmd.stderr(self.stderr.stdio());
        if let Some(ref dir) = self.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.env {
            cmd.env(key, value);
        }
    }
}

#[derive(Debug)]
pub struct ShOutput {
    pub stdout: String,
}

#[macro_export]
macro_rules! sh {
    (options($opts:expr), $cmd:expr $(,)?) => {{ $crate::sh::sh($cmd, &$opts) }};
    ($cmd:expr $(,)?) => {{ $crate::sh::sh($cmd, &$crate::sh::ShOptions::default()) }};
}

pub fn sh(cmd: impl AsRef<str>, opts: &ShOptions) -> Result<ShOutput> {
    let cmd = cmd.as_ref();
    log::debug!("[sh] {}", cmd);

    let mut command = Command::new("sh");
    command.arg("-c").arg(cmd);
    opts.apply(&mut command);

    let output = command
        .output()
        .with_context(|| format!("failed to spawn `{cmd}`"))?;

    if !output.status.success() {
        bail!(
            "command failed: {}\nexit code: {:?}",
            cmd,
            output.status.code().unwrap_or(-1)
        );
    }

    Ok(ShOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn piped() -> ShOptions {
        ShOptionsBuilder::default()
            .stdout(StreamMode::Pipe)
            .stderr(StreamMode::Null)
            .build()
            .unwrap()
    }

    #[test]
    fn test_captures_stdout() {
        let out = crate::sh!(options(piped()), "echo bootcode").unwrap();
        assert_eq!(out.stdout.trim(), "bootcode");
    }

    #[test]
    fn test_passes_environment() {
        let mut opts = piped();
        opts.env.push(("BOOTCODE_PROBE".into(), "42".into()));
        let out = crate::sh!(options(opts), "echo $BOOTCODE_PROBE").unwrap();
        assert_eq!(out.stdout.trim(), "42");
    }

    #[test]
    fn test_failure_is_an_error() {
        let err = crate::sh!(options(piped()), "exit 3").unwrap_err();
        assert!(err.to_string().contains("exit code: Some(3)"));
    }
}
