use crate::domain::ContainerExpectation;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "stackcheck.toml";

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_CONTAINER_RUNTIME: &str = "docker";
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

pub const DEFAULT_PACKAGES: &[&str] = &[
    "telegram",
    "openai",
    "langchain",
    "langchain_core",
    "langchain_openai",
    "chromadb",
    "pydantic",
    "apscheduler",
    "bs4",
    "requests",
    "dotenv",
    "pytest",
];

pub const REQUIRED_ENV_KEYS: &[&str] = &["TELEGRAM_BOT_TOKEN", "OPENAI_API_KEY"];

pub const DOCUMENTED_ENV_KEYS: &[&str] = &[
    "TELEGRAM_BOT_TOKEN",
    "OPENAI_API_KEY",
    "ANTHROPIC_API_KEY",
    "MISTRAL_API_KEY",
    "CHROMA_PERSIST_DIRECTORY",
    "REDIS_URL",
    "NOTION_API_KEY",
    "LOG_LEVEL",
    "RAGFLOW_API_URL",
    "RAGFLOW_API_KEY",
    "RAGFLOW_COLLECTION_NAME",
];

pub fn default_config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/root"))
        .join(".config/stackcheck")
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub env_file: Option<PathBuf>,
    pub env_example: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct RuntimeConfig {
    pub interpreter: Option<String>,
    pub packages: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentConfig {
    pub required: Option<Vec<String>>,
    pub documented: Option<Vec<String>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct ContainersConfig {
    pub runtime: Option<String>,
    pub expected: Option<Vec<ContainerExpectation>>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct NetworkConfig {
    pub timeout_secs: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub containers: ContainersConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

impl AppConfig {
    /// Merges another AppConfig into self.
    /// Values from `other` overwrite values in `self` if present.
    pub fn merge(&mut self, other: AppConfig) {
        if let Some(p) = other.project.env_file {
            self.project.env_file = Some(p);
        }
        if let Some(p) = other.project.env_example {
            self.project.env_example = Some(p);
        }
        if let Some(i) = other.runtime.interpreter {
            self.runtime.interpreter = Some(i);
        }
        if let Some(pkgs) = other.runtime.packages {
            self.runtime.packages = Some(pkgs);
        }
        if let Some(keys) = other.environment.required {
            self.environment.required = Some(keys);
        }
        if let Some(keys) = other.environment.documented {
            self.environment.documented = Some(keys);
        }
        if let Some(rt) = other.containers.runtime {
            self.containers.runtime = Some(rt);
        }
        if let Some(expected) = other.containers.expected {
            self.containers.expected = Some(expected);
        }
        if let Some(t) = other.network.timeout_secs {
            self.network.timeout_secs = Some(t);
        }
    }

    /// Fills unset values with defaults and anchors paths at `project_dir`.
    pub fn resolve(self, project_dir: &Path) -> Result<Settings> {
        let packages = self
            .runtime
            .packages
            .unwrap_or_else(|| to_strings(DEFAULT_PACKAGES));
        for pkg in &packages {
            validate_module_name(pkg)?;
        }

        let timeout_secs = self.network.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
        if timeout_secs == 0 {
            bail!("network.timeout_secs must be greater than zero");
        }

        let expected_containers = self
            .containers
            .expected
            .unwrap_or_else(ContainerExpectation::defaults);
        for expectation in &expected_containers {
            if expectation.keywords.is_empty() {
                bail!("Container expectation '{}' has no keywords", expectation.label);
            }
        }

        Ok(Settings {
            project_dir: project_dir.to_path_buf(),
            env_file: anchor(
                project_dir,
                self.project.env_file.unwrap_or_else(|| PathBuf::from(".env")),
            ),
            env_example: anchor(
                project_dir,
                self.project
                    .env_example
                    .unwrap_or_else(|| PathBuf::from(".env.example")),
            ),
            interpreter: self
                .runtime
                .interpreter
                .unwrap_or_else(|| DEFAULT_INTERPRETER.to_string()),
            packages,
            required_env: self
                .environment
                .required
                .unwrap_or_else(|| to_strings(REQUIRED_ENV_KEYS)),
            documented_env: self
                .environment
                .documented
                .unwrap_or_else(|| to_strings(DOCUMENTED_ENV_KEYS)),
            container_runtime: self
                .containers
                .runtime
                .unwrap_or_else(|| DEFAULT_CONTAINER_RUNTIME.to_string()),
            expected_containers,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

/// Fully resolved verifier settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub project_dir: PathBuf,
    pub env_file: PathBuf,
    pub env_example: PathBuf,
    pub interpreter: String,
    pub packages: Vec<String>,
    pub required_env: Vec<String>,
    pub documented_env: Vec<String>,
    pub container_runtime: String,
    pub expected_containers: Vec<ContainerExpectation>,
    pub timeout: Duration,
}

impl Settings {
    /// Settings built purely from defaults.
    pub fn defaults(project_dir: &Path) -> Result<Self> {
        AppConfig::default().resolve(project_dir)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn anchor(project_dir: &Path, path: PathBuf) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        project_dir.join(expanded)
    }
}

/// Package names end up in `import <name>`, so only dotted identifiers pass.
fn validate_module_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Empty package name in runtime.packages");
    }

    for part in name.split('.') {
        let mut chars = part.chars();
        let Some(first) = chars.next() else {
            bail!("Package name '{}' has an empty segment", name);
        };
        if !(first.is_alphabetic() || first == '_') {
            bail!("Package name '{}' must start with a letter or underscore", name);
        }
        if let Some(c) = chars.find(|c| !c.is_alphanumeric() && *c != '_') {
            bail!("Package name '{}' contains invalid character '{}'", name, c);
        }
    }

    Ok(())
}

fn read_layer(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path).with_context(|| format!("reading {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("parsing {:?}", path))
}

/// Loads config layers in order: global, project-local, then an explicit file.
pub fn load_app_config(project_dir: &Path, explicit: Option<&Path>) -> Result<Settings> {
    load_app_config_from(&default_config_dir(), project_dir, explicit)
}

pub fn load_app_config_from(
    global_dir: &Path,
    project_dir: &Path,
    explicit: Option<&Path>,
) -> Result<Settings> {
    let mut app_config = AppConfig::default();

    let global_config_path = global_dir.join(CONFIG_FILE_NAME);
    if global_config_path.exists() {
        debug!("loading global config {:?}", global_config_path);
        app_config.merge(read_layer(&global_config_path)?);
    }

    let local_config_path = project_dir.join(CONFIG_FILE_NAME);
    if local_config_path.exists() {
        debug!("loading project config {:?}", local_config_path);
        app_config.merge(read_layer(&local_config_path)?);
    }

    if let Some(path) = explicit {
        let path = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
        if !path.exists() {
            bail!("Config file {:?} not found", path);
        }
        debug!("loading explicit config {:?}", path);
        app_config.merge(read_layer(&path)?);
    }

    app_config.resolve(project_dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_no_config_present() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        let settings = load_app_config_from(global.path(), project.path(), None).unwrap();

        assert_eq!(settings.interpreter, "python3");
        assert_eq!(settings.container_runtime, "docker");
        assert_eq!(settings.env_file, project.path().join(".env"));
        assert_eq!(settings.packages.len(), DEFAULT_PACKAGES.len());
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.expected_containers.len(), 5);
    }

    #[test]
    fn local_layer_overrides_global() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();

        fs::write(
            global.path().join(CONFIG_FILE_NAME),
            r#"
[runtime]
interpreter = "python3.11"
packages = ["requests"]

[network]
timeout_secs = 10
"#,
        )
        .unwrap();
        fs::write(
            project.path().join(CONFIG_FILE_NAME),
            r#"
[runtime]
interpreter = ".venv/bin/python"
"#,
        )
        .unwrap();

        let settings = load_app_config_from(global.path(), project.path(), None).unwrap();

        assert_eq!(settings.interpreter, ".venv/bin/python");
        assert_eq!(settings.packages, vec!["requests"]);
        assert_eq!(settings.timeout, Duration::from_secs(10));
    }

    #[test]
    fn explicit_layer_wins() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let explicit = project.path().join("ci.toml");

        fs::write(
            project.path().join(CONFIG_FILE_NAME),
            "[containers]\nruntime = \"podman\"\n",
        )
        .unwrap();
        fs::write(&explicit, "[containers]\nruntime = \"nerdctl\"\n").unwrap();

        let settings =
            load_app_config_from(global.path(), project.path(), Some(&explicit)).unwrap();
        assert_eq!(settings.container_runtime, "nerdctl");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let global = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let result = load_app_config_from(
            global.path(),
            project.path(),
            Some(&project.path().join("nope.toml")),
        );
        assert!(result.is_err());
    }

    #[test]
    fn parses_container_expectations() {
        let toml = r#"
[[containers.expected]]
label = "qdrant"
keywords = ["qdrant"]

[[containers.expected]]
label = "cache"
keywords = ["redis", "valkey"]
local_redis_only = true
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        let settings = config.resolve(Path::new("/srv/bot")).unwrap();

        assert_eq!(settings.expected_containers.len(), 2);
        assert!(settings.expected_containers[1].local_redis_only);
        assert_eq!(settings.expected_containers[0].name_contains, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let result = toml::from_str::<AppConfig>("[runtime]\ninterpeter = \"python\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn rejects_injected_package_names() {
        let config: AppConfig =
            toml::from_str("[runtime]\npackages = [\"os; import shutil\"]\n").unwrap();
        assert!(config.resolve(Path::new("/srv/bot")).is_err());
    }

    #[test]
    fn accepts_dotted_package_names() {
        assert!(validate_module_name("langchain_core.messages").is_ok());
        assert!(validate_module_name("bs4").is_ok());
        assert!(validate_module_name("4chan").is_err());
        assert!(validate_module_name("a..b").is_err());
        assert!(validate_module_name("").is_err());
    }

    #[test]
    fn rejects_zero_timeout() {
        let config: AppConfig = toml::from_str("[network]\ntimeout_secs = 0\n").unwrap();
        assert!(config.resolve(Path::new("/srv/bot")).is_err());
    }

    #[test]
    fn relative_env_file_is_anchored_at_project() {
        let config: AppConfig =
            toml::from_str("[project]\nenv_file = \"config/bot.env\"\n").unwrap();
        let settings = config.resolve(Path::new("/srv/bot")).unwrap();
        assert_eq!(settings.env_file, PathBuf::from("/srv/bot/config/bot.env"));
        assert_eq!(settings.env_example, PathBuf::from("/srv/bot/.env.example"));
    }
}
