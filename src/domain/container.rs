use serde::Deserialize;

/// A running container as reported by `docker ps --format '{{json .}}'`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ContainerInfo {
    #[serde(rename = "Names", default)]
    pub names: String,
    #[serde(rename = "Image", default)]
    pub image: String,
}

impl ContainerInfo {
    pub fn new(names: &str, image: &str) -> Self {
        Self {
            names: names.to_string(),
            image: image.to_string(),
        }
    }
}

/// A container the stack expects to find running.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContainerExpectation {
    pub label: String,
    /// Matched case-insensitively against both the container name and image.
    pub keywords: Vec<String>,
    /// When set, the container name must also contain this.
    #[serde(default)]
    pub name_contains: Option<String>,
    #[serde(default)]
    pub hint: Option<String>,
    /// Only expected when REDIS_URL points at this machine.
    #[serde(default)]
    pub local_redis_only: bool,
}

impl ContainerExpectation {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            name_contains: None,
            hint: None,
            local_redis_only: false,
        }
    }

    pub fn matches(&self, container: &ContainerInfo) -> bool {
        let name = container.names.to_lowercase();
        let image = container.image.to_lowercase();

        let keyword_hit = self.keywords.iter().any(|k| {
            let k = k.to_lowercase();
            name.contains(&k) || image.contains(&k)
        });

        let qualified = self
            .name_contains
            .as_ref()
            .is_none_or(|q| name.contains(&q.to_lowercase()));

        keyword_hit && qualified
    }

    pub fn failure_message(&self) -> String {
        match &self.hint {
            Some(hint) => format!("no {} container found. {hint}", self.label),
            None => format!("no {} container found", self.label),
        }
    }

    /// The containers a RAGFlow deployment brings up, plus a local Redis.
    pub fn defaults() -> Vec<Self> {
        vec![
            Self {
                hint: Some("Make sure the RAGFlow container is running.".into()),
                ..Self::new("ragflow", &["ragflow", "infiniflow/ragflow"])
            },
            Self {
                name_contains: Some("ragflow".into()),
                hint: Some("RAGFlow may not function correctly.".into()),
                ..Self::new("elasticsearch", &["elasticsearch", "elastic"])
            },
            Self {
                hint: Some("Document storage may not function correctly.".into()),
                ..Self::new("minio", &["minio"])
            },
            Self {
                name_contains: Some("ragflow".into()),
                hint: Some("RAGFlow metadata storage may not function correctly.".into()),
                ..Self::new("mysql", &["mysql"])
            },
            Self {
                hint: Some("Start the Redis container if caching is enabled.".into()),
                local_redis_only: true,
                ..Self::new("redis", &["redis"])
            },
        ]
    }
}
