use std::path::Path;

use anyhow::{Context, Result};
use easel_render::RendererConfig;
use easel_time::TimeConfig;
use serde::{Deserialize, Serialize};

/// Settings file for a run: `{ "renderer": {...}, "time": {...} }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub renderer: RendererConfig,
    pub time: TimeConfig,
}

impl EngineConfig {
    /// Load from JSON, or YAML when the extension is `.yaml`/`.yml`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text, path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml")
        );
        let config = if is_yaml {
            serde_yaml::from_str(text).with_context(|| format!("parsing {}", path.display()))?
        } else {
            serde_json::from_str(text).with_context(|| format!("parsing {}", path.display()))?
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_with_partial_sections() {
        let config =
            EngineConfig::parse(r#"{"time": {"fps": 30}}"#, Path::new("run.json")).unwrap();
        assert_eq!(config.time.fps, 30.0);
        assert_eq!(config.time.time_scale, 1.0);
        assert_eq!(config.renderer, RendererConfig::default());
    }

    #[test]
    fn yaml_by_extension() {
        let text = "renderer:\n  name: hud\n  width: 320\n  smooth_image: true\n";
        let config = EngineConfig::parse(text, Path::new("run.yaml")).unwrap();
        assert_eq!(config.renderer.name, "hud");
        assert_eq!(config.renderer.width, 320);
        assert_eq!(config.renderer.height, 600);
        assert!(config.renderer.smooth_image);
    }

    #[test]
    fn malformed_config_is_an_error() {
        assert!(EngineConfig::parse("{", Path::new("bad.json")).is_err());
    }
}
