//! Persisted analysis reports

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::Attribute;
use crate::grid::GridSettings;
use crate::ingest::IngestSummary;
use crate::report::ScatterReport;
use crate::zone::ZoneSummary;

/// Everything one analysis pass produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub generated_at: DateTime<Utc>,
    pub attribute: Attribute,
    pub grid: GridSettings,
    pub ingest: IngestSummary,
    pub total_population: usize,
    pub report: ScatterReport,
    pub populated_zones: Vec<ZoneSummary>,
}

pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
        }
    }

    pub fn path_for(&self, attribute: Attribute) -> PathBuf {
        self.output_dir.join(format!("report_{attribute}.json"))
    }

    pub fn write(&self, document: &ReportDocument) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create report directory {}",
                self.output_dir.display()
            )
        })?;
        let path = self.path_for(document.attribute);
        let json =
            serde_json::to_string_pretty(document).context("Failed to serialize report")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        log::info!("wrote report {}", path.display());
        Ok(path)
    }

    pub fn read(path: impl AsRef<Path>) -> Result<ReportDocument> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read report {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path.display()))
    }
}
