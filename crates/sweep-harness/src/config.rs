use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Optional TOML defaults for a harness run; explicit flags override it.
#[derive(Debug, Deserialize, Default)]
pub struct HarnessConfig {
    #[serde(default)]
    pub cache_filters: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl HarnessConfig {
    pub fn parse(toml_src: &str) -> Result<Self, String> {
        toml::from_str(toml_src).map_err(|err| format!("invalid harness config: {err}"))
    }

    pub fn load(path: &Path) -> Result<Self, String> {
        let src = fs::read_to_string(path)
            .map_err(|err| format!("read harness config {}: {err}", path.display()))?;
        Self::parse(&src)
    }
}
