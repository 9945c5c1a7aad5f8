use anyhow::Context;
use boundviz_log::ParserConfig;
use boundviz_render::RenderOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Contents of a `--config` JSON file. Both sections are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub parser: ParserConfig,
    pub render: RenderOptions,
}

impl ConfigFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }
}

/// Everything one `plot` run needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub parser: ParserConfig,
    pub render: RenderOptions,
    pub inputs: Vec<PathBuf>,
}

impl RunConfig {
    pub fn new(inputs: Vec<PathBuf>) -> Self {
        Self {
            parser: ParserConfig::default(),
            render: RenderOptions::default(),
            inputs,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.inputs.is_empty() {
            anyhow::bail!("no input files given");
        }
        self.render.validate()
    }
}
