//! Run configuration loaded from YAML

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agent::Attribute;
use crate::grid::GridSettings;
use crate::ingest::IngestPolicy;
use crate::report::{ChartSpec, EmptyZones};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub grid: GridSettings,
    pub ingest: IngestConfig,
    pub report: ReportConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    pub policy: IngestPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub attribute: Attribute,
    pub empty_zones: EmptyZones,
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub show_grid: bool,
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            attribute: Attribute::Agreeableness,
            empty_zones: EmptyZones::default(),
            title: None,
            x_label: None,
            y_label: None,
            show_grid: true,
            output_dir: PathBuf::from("reports"),
        }
    }
}

impl ReportConfig {
    /// Chart strings for the configured attribute, with any overrides applied.
    pub fn chart(&self) -> ChartSpec {
        let mut chart = ChartSpec::density_vs_attribute(self.attribute);
        if let Some(title) = &self.title {
            chart.title = title.clone();
        }
        if let Some(x_label) = &self.x_label {
            chart.x_label = x_label.clone();
        }
        if let Some(y_label) = &self.y_label {
            chart.y_label = y_label.clone();
        }
        chart.show_grid = self.show_grid;
        chart
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl RunConfig {
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: RunConfig = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        config
            .grid
            .validate()
            .with_context(|| format!("Invalid grid section in {}", path.display()))?;
        Ok(config)
    }

    pub fn to_yaml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, yaml)
            .with_context(|| format!("Failed to write config file {}", path.display()))?;
        Ok(())
    }

    /// Defaults when no path is given.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_yaml(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();

        assert_eq!(config.grid, GridSettings::default());
        assert_eq!(config.ingest.policy, IngestPolicy::FailFast);
        assert_eq!(config.report.attribute, Attribute::Agreeableness);
        assert_eq!(config.report.empty_zones, EmptyZones::Include);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let yaml = "
grid:
  width_degrees: 2.0
report:
  attribute: openness
  empty_zones: exclude
ingest:
  policy: skip
";
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.grid.width_degrees, 2.0);
        assert_eq!(config.grid.height_degrees, 1.0);
        assert_eq!(config.grid.longitude_bins(), 180);
        assert_eq!(config.report.attribute, Attribute::Openness);
        assert_eq!(config.report.empty_zones, EmptyZones::Exclude);
        assert_eq!(config.ingest.policy, IngestPolicy::Skip);
        assert!(config.report.show_grid);
    }

    #[test]
    fn test_config_serialization() {
        let mut config = RunConfig::default();
        config.report.title = Some("Openness".into());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.yaml");

        config.to_yaml(&path).unwrap();
        let loaded = RunConfig::from_yaml(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.report.chart().title, "Openness");
    }

    #[test]
    fn test_invalid_grid_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "grid:\n  width_degrees: 0.7\n").unwrap();

        assert!(RunConfig::from_yaml(&path).is_err());
    }
}
