use std::path::Path;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "search.yaml";

/// Field searched when the caller does not name one
const DEFAULT_FIELD: &str = "description";
/// Each operator nests the tree one level deeper
const DEFAULT_MAX_OPERATORS: usize = 512;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Field used by `QueryParser::parse_default`
    #[serde(default = "default_field")]
    pub default_field: String,

    /// Queries with more `AND`/`OR` operators than this degrade to a plain
    /// text match over the raw input
    #[serde(default = "default_max_operators")]
    pub max_operators: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_FIELD.to_string(),
            max_operators: DEFAULT_MAX_OPERATORS,
        }
    }
}

fn default_field() -> String {
    DEFAULT_FIELD.to_string()
}

fn default_max_operators() -> usize {
    DEFAULT_MAX_OPERATORS
}

impl QueryConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.default_field.trim().is_empty() {
            bail!("default_field must not be empty");
        }
        if self.max_operators == 0 {
            bail!("max_operators must be greater than 0");
        }
        Ok(())
    }

    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yml::from_str(yaml).context("search config is malformed")?;
        config.validate()?;
        Ok(config)
    }

    /// Load `search.yaml` from `base_path`, writing defaults if it is missing.
    pub fn load_with(base_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let base_path = base_path.as_ref();
        let path = base_path.join(CONFIG_FILE);

        // create new if does not exist
        if !path.exists() {
            std::fs::create_dir_all(base_path)
                .with_context(|| format!("failed to create {}", base_path.display()))?;
            Self::default().save(base_path)?;
        }

        let config_str = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_yaml(&config_str)?;

        // resave in case missing keys were filled in with defaults
        if config_str != serde_yml::to_string(&config)? {
            log::debug!("rewriting {} with normalized settings", path.display());
            config.save(base_path)?;
        }

        Ok(config)
    }

    pub fn save(&self, base_path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = base_path.as_ref().join(CONFIG_FILE);
        let config_str = serde_yml::to_string(self)?;
        std::fs::write(&path, config_str)
            .with_context(|| format!("failed to write {}", path.display()))
    }
}
