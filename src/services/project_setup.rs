use crate::domain::PackageManager;
use crate::infra::{ServiceEnv, Settings};
use anyhow::{Context, Result, bail};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFileAction {
    Created,
    AlreadyPresent,
    TemplateMissing,
}

/// Prepares a fresh checkout of the assistant application.
pub struct ProjectSetup {
    settings: Settings,
    package_manager: Arc<dyn PackageManager>,
}

impl ProjectSetup {
    pub fn new(settings: Settings, package_manager: Arc<dyn PackageManager>) -> Self {
        Self {
            settings,
            package_manager,
        }
    }

    /// Copies the example env file into place. Never overwrites.
    pub fn prepare_env_file(&self) -> Result<EnvFileAction> {
        let env_file = &self.settings.env_file;
        let example = &self.settings.env_example;

        if env_file.exists() {
            info!("{:?} already exists", env_file);
            return Ok(EnvFileAction::AlreadyPresent);
        }

        if !example.exists() {
            warn!("{:?} not found, cannot create {:?}", example, env_file);
            return Ok(EnvFileAction::TemplateMissing);
        }

        fs::copy(example, env_file)
            .with_context(|| format!("copying {:?} to {:?}", example, env_file))?;
        info!("created {:?} from {:?}", env_file, example);
        Ok(EnvFileAction::Created)
    }

    /// Directories the application expects to write into.
    pub fn data_directories(&self, process_env: &HashMap<String, String>) -> Vec<PathBuf> {
        let env = ServiceEnv::load(&self.settings.env_file, process_env)
            .unwrap_or_else(|_| ServiceEnv::from_values(process_env.clone()));
        let project_dir = &self.settings.project_dir;

        vec![
            env.chroma_persist_directory(project_dir),
            project_dir.join("data").join("content"),
            project_dir.join("logs"),
        ]
    }

    /// Creates missing data directories and returns the ones it created.
    pub fn ensure_directories(
        &self,
        process_env: &HashMap<String, String>,
    ) -> Result<Vec<PathBuf>> {
        let mut created = Vec::new();
        for dir in self.data_directories(process_env) {
            if dir.exists() {
                continue;
            }
            fs::create_dir_all(&dir).with_context(|| format!("creating {:?}", dir))?;
            info!("created directory {:?}", dir);
            created.push(dir);
        }
        Ok(created)
    }

    /// Creates the virtual environment and installs dependencies.
    /// Returns `false` when the package manager is not installed.
    pub fn install_dependencies(&self) -> Result<bool> {
        if !self.package_manager.is_available() {
            warn!("uv is not installed or not in PATH, skipping dependency installation");
            return Ok(false);
        }

        let project_dir = &self.settings.project_dir;
        self.package_manager.create_venv(project_dir)?;

        let requirements = project_dir.join("requirements.txt");
        if requirements.exists() {
            self.package_manager
                .sync_requirements(project_dir, &requirements)?;
        } else if project_dir.join("pyproject.toml").exists()
            || project_dir.join("setup.py").exists()
        {
            self.package_manager.install_editable(project_dir)?;
        } else {
            bail!(
                "Neither requirements.txt nor a project manifest found in {:?}",
                project_dir
            );
        }

        Ok(true)
    }
}
