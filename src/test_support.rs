use crate::domain::{ContainerInfo, ContainerRuntime, Interpreter, PackageManager, SuiteReport};
use crate::services::{Suite, SuiteContext};
use anyhow::{Result, bail};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Shared, ordered log of mock calls.
pub type CallLog = Arc<RwLock<Vec<String>>>;

#[derive(Debug)]
pub struct MockInterpreter {
    version: RwLock<Option<String>>,
    installed: RwLock<HashSet<String>>,
    commands: RwLock<Vec<String>>,
}

impl MockInterpreter {
    pub fn new() -> Self {
        Self {
            version: RwLock::new(Some("Python 3.12.3".to_string())),
            installed: RwLock::new(HashSet::new()),
            commands: RwLock::new(Vec::new()),
        }
    }

    pub fn with_packages(packages: &[&str]) -> Self {
        let mock = Self::new();
        for pkg in packages {
            mock.install(pkg);
        }
        mock
    }

    pub fn install(&self, package: &str) {
        self.installed.write().unwrap().insert(package.to_string());
    }

    pub fn set_missing(&self) {
        *self.version.write().unwrap() = None;
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }
}

impl Default for MockInterpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter for MockInterpreter {
    fn program(&self) -> &str {
        "python3"
    }

    fn version(&self) -> Option<String> {
        self.record_command("version");
        self.version.read().unwrap().clone()
    }

    fn can_import(&self, package: &str) -> bool {
        self.record_command(&format!("import:{}", package));
        self.installed.read().unwrap().contains(package)
    }
}

#[derive(Debug)]
pub struct MockRuntime {
    version: RwLock<Option<String>>,
    containers: RwLock<Vec<ContainerInfo>>,
    commands: RwLock<Vec<String>>,
    fail_on: RwLock<Option<String>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self {
            version: RwLock::new(Some("Docker version 27.3.1, build ce12230".to_string())),
            containers: RwLock::new(Vec::new()),
            commands: RwLock::new(Vec::new()),
            fail_on: RwLock::new(None),
        }
    }

    pub fn add_container(&self, container: ContainerInfo) {
        self.containers.write().unwrap().push(container);
    }

    pub fn set_unavailable(&self) {
        *self.version.write().unwrap() = None;
    }

    pub fn set_fail_on(&self, operation: &str) {
        *self.fail_on.write().unwrap() = Some(operation.to_string());
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }

    fn check_fail(&self, operation: &str) -> Result<()> {
        if let Some(ref fail_on) = *self.fail_on.read().unwrap() {
            if fail_on == operation {
                bail!("Mock failure on: {}", operation);
            }
        }
        Ok(())
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ContainerRuntime for MockRuntime {
    fn binary(&self) -> &str {
        "docker"
    }

    fn version(&self) -> Option<String> {
        self.record_command("version");
        self.version.read().unwrap().clone()
    }

    fn list_running(&self) -> Result<Vec<ContainerInfo>> {
        self.record_command("list_running");
        self.check_fail("list_running")?;
        Ok(self.containers.read().unwrap().clone())
    }
}

#[derive(Debug)]
pub struct MockPackageManager {
    available: RwLock<bool>,
    commands: RwLock<Vec<String>>,
}

impl MockPackageManager {
    pub fn new() -> Self {
        Self {
            available: RwLock::new(true),
            commands: RwLock::new(Vec::new()),
        }
    }

    pub fn set_available(&self, available: bool) {
        *self.available.write().unwrap() = available;
    }

    pub fn get_commands(&self) -> Vec<String> {
        self.commands.read().unwrap().clone()
    }

    fn record_command(&self, cmd: &str) {
        self.commands.write().unwrap().push(cmd.to_string());
    }
}

impl Default for MockPackageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PackageManager for MockPackageManager {
    fn is_available(&self) -> bool {
        *self.available.read().unwrap()
    }

    fn create_venv(&self, _project_dir: &Path) -> Result<()> {
        self.record_command("venv");
        Ok(())
    }

    fn sync_requirements(&self, _project_dir: &Path, requirements: &Path) -> Result<()> {
        let file = requirements
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.record_command(&format!("sync:{}", file));
        Ok(())
    }

    fn install_editable(&self, _project_dir: &Path) -> Result<()> {
        self.record_command("install_editable");
        Ok(())
    }
}

/// Suite that records when it runs and reports a canned outcome.
pub struct MockSuite {
    name: String,
    needs_runtime: bool,
    fail_with: Option<String>,
    log: CallLog,
}

impl MockSuite {
    pub fn new(name: &str, log: CallLog) -> Self {
        Self {
            name: name.to_string(),
            needs_runtime: false,
            fail_with: None,
            log,
        }
    }

    pub fn needing_runtime(mut self) -> Self {
        self.needs_runtime = true;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_with = Some(message.to_string());
        self
    }
}

impl Suite for MockSuite {
    fn name(&self) -> &str {
        &self.name
    }

    fn requires_container_runtime(&self) -> bool {
        self.needs_runtime
    }

    fn run(&self, _ctx: &SuiteContext<'_>) -> SuiteReport {
        self.log.write().unwrap().push(self.name.clone());

        let mut report = SuiteReport::new(&self.name);
        match &self.fail_with {
            Some(message) => report.fail("case", message.clone()),
            None => report.pass("case"),
        }
        report
    }
}
