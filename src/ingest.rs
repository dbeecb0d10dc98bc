//! Record loading and the sequential ingestion pass

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::agent::AgentRecord;
use crate::error::GridError;
use crate::grid::ZoneGrid;

/// What to do with a record whose position the grid rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestPolicy {
    #[default]
    FailFast,
    /// Log and count out-of-range records, keep going.
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestSummary {
    pub ingested: usize,
    pub skipped: usize,
    pub populated_zones: usize,
}

pub fn load_records(path: impl AsRef<Path>) -> Result<Vec<AgentRecord>> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read agent file {}", path.display()))?;
    let records: Vec<AgentRecord> = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse agent records from {}", path.display()))?;
    log::info!("loaded {} agent records from {}", records.len(), path.display());
    Ok(records)
}

pub fn write_records(path: impl AsRef<Path>, records: &[AgentRecord]) -> Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(records).context("Failed to serialize agent records")?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write agent file {}", path.display()))?;
    Ok(())
}

/// Place every record, one at a time, in arrival order.
///
/// Invariant violations abort under either policy.
pub fn ingest<I>(
    grid: &mut ZoneGrid,
    records: I,
    policy: IngestPolicy,
) -> Result<IngestSummary, GridError>
where
    I: IntoIterator<Item = AgentRecord>,
{
    let mut summary = IngestSummary::default();
    for (index, record) in records.into_iter().enumerate() {
        match grid.place(record.into_agent()) {
            Ok(_) => summary.ingested += 1,
            Err(err) if policy == IngestPolicy::Skip && err.is_out_of_range() => {
                log::warn!("skipping record {index}: {err}");
                summary.skipped += 1;
            }
            Err(err) => {
                return Err(GridError::Record {
                    index,
                    source: Box::new(err),
                })
            }
        }
    }
    summary.populated_zones = grid.populated_zones().count();
    log::info!(
        "ingested {} agents into {} zones ({} skipped)",
        summary.ingested,
        summary.populated_zones,
        summary.skipped
    );
    Ok(summary)
}
