use crate::domain::PackageManager;
use anyhow::{Context, Result, bail};
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

/// The `uv` Python package manager.
#[derive(Debug, Default)]
pub struct UvAdapter;

impl UvAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl PackageManager for UvAdapter {
    fn is_available(&self) -> bool {
        Command::new("uv")
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }

    fn create_venv(&self, project_dir: &Path) -> Result<()> {
        uv(project_dir, ["venv"], "creating virtual environment")
    }

    fn sync_requirements(&self, project_dir: &Path, requirements: &Path) -> Result<()> {
        uv(
            project_dir,
            [OsStr::new("pip"), OsStr::new("sync"), requirements.as_os_str()],
            &format!("syncing {:?}", requirements),
        )
    }

    fn install_editable(&self, project_dir: &Path) -> Result<()> {
        uv(
            project_dir,
            ["pip", "install", "-e", "."],
            "installing project in editable mode",
        )
    }
}

fn uv<I, S>(project_dir: &Path, args: I, context: &str) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let status = Command::new("uv")
        .args(args)
        .current_dir(project_dir)
        .status()
        .with_context(|| context.to_string())?;
    ensure_success(status, context)
}

fn ensure_success(status: ExitStatus, context: &str) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("uv returned status {:?} ({context})", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_status_carries_context() {
        let status = Command::new("false").status().unwrap();
        let err = ensure_success(status, "syncing \"requirements.txt\"").unwrap_err();

        let message = err.to_string();
        assert!(message.starts_with("uv returned status"));
        assert!(message.ends_with("(syncing \"requirements.txt\")"));
    }

    #[test]
    fn successful_status_passes() {
        let status = Command::new("true").status().unwrap();
        assert!(ensure_success(status, "creating virtual environment").is_ok());
    }

    #[test]
    fn availability_check_never_panics() {
        let _ = UvAdapter::new().is_available();
    }

    #[test]
    fn unusable_project_dir_reports_step() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone");

        let err = UvAdapter::new().install_editable(&missing).unwrap_err();
        assert!(format!("{err:#}").contains("installing project in editable mode"));
    }
}
