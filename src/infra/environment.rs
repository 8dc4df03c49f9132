use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const TELEGRAM_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const REDIS_URL: &str = "REDIS_URL";
pub const RAGFLOW_API_URL: &str = "RAGFLOW_API_URL";
pub const RAGFLOW_API_KEY: &str = "RAGFLOW_API_KEY";
pub const CHROMA_PERSIST_DIRECTORY: &str = "CHROMA_PERSIST_DIRECTORY";

pub const DEFAULT_RAGFLOW_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REDIS_URL: &str = "redis://localhost:6379/0";

/// Values the downstream services are configured with: the `.env` file
/// overlaid by the process environment.
#[derive(Debug, Clone, Default)]
pub struct ServiceEnv {
    values: HashMap<String, String>,
}

impl ServiceEnv {
    pub fn from_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Reads `env_file` without touching the process environment. Process
    /// values take precedence over file values.
    pub fn load(env_file: &Path, process_env: &HashMap<String, String>) -> Result<Self> {
        let mut values = HashMap::new();

        let entries =
            dotenv::from_path_iter(env_file).with_context(|| format!("opening {:?}", env_file))?;
        for entry in entries {
            let (key, value) = entry.with_context(|| format!("parsing {:?}", env_file))?;
            values.insert(key, value);
        }

        values.extend(process_env.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(Self { values })
    }

    /// Non-empty value of `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    pub fn missing<'a>(&self, keys: &'a [String]) -> Vec<&'a str> {
        keys.iter()
            .map(String::as_str)
            .filter(|k| self.get(k).is_none())
            .collect()
    }

    pub fn ragflow_api_url(&self) -> &str {
        self.get(RAGFLOW_API_URL).unwrap_or(DEFAULT_RAGFLOW_API_URL)
    }

    pub fn ragflow_api_key(&self) -> Option<&str> {
        self.get(RAGFLOW_API_KEY)
    }

    pub fn openai_api_key(&self) -> Option<&str> {
        self.get(OPENAI_API_KEY)
    }

    /// Only an explicitly configured URL; the connectivity check skips Redis otherwise.
    pub fn redis_url(&self) -> Option<&str> {
        self.get(REDIS_URL)
    }

    pub fn redis_is_local(&self) -> bool {
        self.redis_url()
            .is_some_and(|url| url.contains("localhost") || url.contains("127.0.0.1"))
    }

    pub fn chroma_persist_directory(&self, project_dir: &Path) -> PathBuf {
        match self.get(CHROMA_PERSIST_DIRECTORY) {
            Some(dir) => {
                let dir = PathBuf::from(shellexpand::tilde(dir).into_owned());
                if dir.is_absolute() {
                    dir
                } else {
                    project_dir.join(dir)
                }
            }
            None => project_dir.join("data").join("chroma"),
        }
    }
}
