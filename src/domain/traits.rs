use super::ContainerInfo;
use anyhow::Result;
use std::fmt::Debug;
use std::path::Path;

/// The language runtime the assistant application runs on.
pub trait Interpreter: Send + Sync + Debug {
    /// Program name or path used to invoke the interpreter
    fn program(&self) -> &str;

    /// Version string, or `None` when the interpreter cannot be invoked
    fn version(&self) -> Option<String>;

    /// Whether `package` can be imported
    fn can_import(&self, package: &str) -> bool;
}

/// Trait for container runtime operations
pub trait ContainerRuntime: Send + Sync + Debug {
    /// Binary name used to invoke the runtime
    fn binary(&self) -> &str;

    /// Version string, or `None` when the runtime binary is absent
    fn version(&self) -> Option<String>;

    /// List running containers
    fn list_running(&self) -> Result<Vec<ContainerInfo>>;
}

/// Package manager used to provision the application's virtual environment
pub trait PackageManager: Send + Sync + Debug {
    fn is_available(&self) -> bool;

    /// Create a virtual environment in `project_dir`
    fn create_venv(&self, project_dir: &Path) -> Result<()>;

    /// Install exactly what a requirements file lists
    fn sync_requirements(&self, project_dir: &Path, requirements: &Path) -> Result<()>;

    /// Install the project itself in editable mode
    fn install_editable(&self, project_dir: &Path) -> Result<()>;
}
