use chrono::Utc;

use crate::agent::{AgentRecord, Attribute};
use crate::config::RunConfig;
use crate::error::Result;
use crate::grid::{GridSettings, ZoneGrid};
use crate::ingest::{ingest, IngestPolicy, IngestSummary};
use crate::output::ReportDocument;
use crate::report::{ChartSpec, EmptyZones, ScatterReport};

pub struct PipelineSettings {
    pub grid: GridSettings,
    pub policy: IngestPolicy,
    pub attribute: Attribute,
    pub empty_zones: EmptyZones,
    pub chart: ChartSpec,
}

impl PipelineSettings {
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            grid: config.grid.clone(),
            policy: config.ingest.policy,
            attribute: config.report.attribute,
            empty_zones: config.report.empty_zones,
            chart: config.report.chart(),
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&RunConfig::default())
    }
}

pub struct PipelineBuilder {
    settings: PipelineSettings,
}

impl PipelineBuilder {
    pub fn new(settings: PipelineSettings) -> Self {
        Self { settings }
    }

    pub fn with_policy(mut self, policy: IngestPolicy) -> Self {
        self.settings.policy = policy;
        self
    }

    /// Switches the statistic; the chart strings follow the attribute.
    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.settings.attribute = attribute;
        self.settings.chart = ChartSpec {
            show_grid: self.settings.chart.show_grid,
            ..ChartSpec::density_vs_attribute(attribute)
        };
        self
    }

    pub fn with_empty_zones(mut self, empty_zones: EmptyZones) -> Self {
        self.settings.empty_zones = empty_zones;
        self
    }

    pub fn build(self) -> Result<Pipeline> {
        let grid = ZoneGrid::new(self.settings.grid.clone())?;
        Ok(Pipeline {
            grid,
            settings: self.settings,
        })
    }
}

/// Ingest once, then aggregate.
pub struct Pipeline {
    grid: ZoneGrid,
    settings: PipelineSettings,
}

/// A finished pass: the populated grid plus its report.
pub struct PipelineOutcome {
    pub ingest: IngestSummary,
    pub report: ScatterReport,
    grid: ZoneGrid,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn grid(&self) -> &ZoneGrid {
        &self.grid
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Consumes the pipeline; each grid is populated by exactly one pass.
    pub fn run<I>(mut self, records: I) -> Result<PipelineOutcome>
    where
        I: IntoIterator<Item = AgentRecord>,
    {
        let summary = ingest(&mut self.grid, records, self.settings.policy)?;
        let report = ScatterReport::build(
            self.grid.zones(),
            self.settings.chart.clone(),
            crate::report::density_vs_attribute(self.settings.attribute),
            self.settings.empty_zones,
        )?;
        log::debug!(
            "report for '{}' holds {} samples",
            self.settings.attribute,
            report.series.len()
        );
        Ok(PipelineOutcome {
            ingest: summary,
            report,
            grid: self.grid,
            settings: self.settings,
        })
    }
}

impl PipelineOutcome {
    pub fn grid(&self) -> &ZoneGrid {
        &self.grid
    }

    pub fn document(self) -> ReportDocument {
        ReportDocument {
            generated_at: Utc::now(),
            attribute: self.settings.attribute,
            grid: self.settings.grid.clone(),
            ingest: self.ingest,
            total_population: self.grid.total_population(),
            populated_zones: self.grid.populated_zones().map(|zone| zone.summary()).collect(),
            report: self.report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentAttributes;
    use crate::error::GridError;

    fn record(latitude: f64, longitude: f64, agreeableness: f64) -> AgentRecord {
        AgentRecord {
            latitude,
            longitude,
            attributes: AgentAttributes::default().with(Attribute::Agreeableness, agreeableness),
        }
    }

    #[test]
    fn test_run_builds_grid_and_report() {
        let pipeline = PipelineBuilder::new(PipelineSettings::default())
            .build()
            .unwrap();
        assert!(!pipeline.grid().is_ready());

        let outcome = pipeline
            .run(vec![record(10.4, 20.2, 0.8), record(10.6, 20.6, 0.4)])
            .unwrap();
        assert!(outcome.grid().is_ready());
        assert_eq!(outcome.grid().total_population(), 2);
        assert_eq!(outcome.report.series.len(), 64_800);

        let document = outcome.document();
        assert_eq!(document.total_population, 2);
        assert_eq!(document.populated_zones.len(), 1);
        assert_eq!(document.populated_zones[0].population, 2);
    }

    #[test]
    fn test_separate_runs_do_not_accumulate() {
        let records = vec![record(1.0, 1.0, 0.5), record(1.5, 1.5, 0.5)];
        let first = PipelineBuilder::new(PipelineSettings::default())
            .build()
            .unwrap()
            .run(records.clone())
            .unwrap();
        let second = PipelineBuilder::new(PipelineSettings::default())
            .build()
            .unwrap()
            .run(records)
            .unwrap();

        assert_eq!(first.grid().total_population(), 2);
        assert_eq!(second.grid().total_population(), 2);
    }

    #[test]
    fn test_run_surfaces_record_errors() {
        let pipeline = PipelineBuilder::new(PipelineSettings::default())
            .build()
            .unwrap();
        let err = pipeline
            .run(vec![record(1.0, 1.0, 0.5), record(91.0, 1.0, 0.5)])
            .err()
            .expect("out-of-range record fails the run");

        assert!(matches!(err, GridError::Record { index: 1, .. }));
    }
}
