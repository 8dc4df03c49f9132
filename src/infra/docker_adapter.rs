use crate::domain::{ContainerInfo, ContainerRuntime};
use anyhow::{Context, Result, bail};
use std::process::{Command, Output, Stdio};
use tracing::debug;

/// Docker-compatible CLI (`docker`, `podman`, `nerdctl`).
#[derive(Debug)]
pub struct DockerAdapter {
    binary: String,
}

impl DockerAdapter {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn output(&self, args: &[&str], context: &str) -> Result<Output> {
        Command::new(&self.binary)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .with_context(|| format!("{context} ({})", self.binary))
    }
}

impl Default for DockerAdapter {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl ContainerRuntime for DockerAdapter {
    fn binary(&self) -> &str {
        &self.binary
    }

    fn version(&self) -> Option<String> {
        let output = self.output(&["--version"], "querying version").ok()?;
        if !output.status.success() {
            debug!("{} --version exited with {:?}", self.binary, output.status);
            return None;
        }
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    fn list_running(&self) -> Result<Vec<ContainerInfo>> {
        let output = self.output(&["ps", "--format", "{{json .}}"], "listing containers")?;
        if !output.status.success() {
            bail!(
                "{} ps returned status {:?}: {}",
                self.binary,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        parse_ps_output(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Parses one JSON object per line, as printed by `ps --format '{{json .}}'`.
pub fn parse_ps_output(stdout: &str) -> Result<Vec<ContainerInfo>> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str(line).with_context(|| format!("parsing container entry {line}"))
        })
        .collect()
}
