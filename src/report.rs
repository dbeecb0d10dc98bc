//! Per-zone scatter series for the charting boundary

use serde::{Deserialize, Serialize};

use crate::agent::Attribute;
use crate::error::Result;
use crate::zone::Zone;

/// Display strings and options handed to the chart renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub show_grid: bool,
}

impl Default for ChartSpec {
    fn default() -> Self {
        Self {
            title: "Chart".to_string(),
            x_label: "X-axis".to_string(),
            y_label: "Y-axis".to_string(),
            show_grid: true,
        }
    }
}

impl ChartSpec {
    pub fn density_vs_attribute(attribute: Attribute) -> Self {
        Self {
            title: format!("Average {attribute} by population density"),
            x_label: "Population density (inhabitants / km²)".to_string(),
            y_label: format!("Average {attribute}"),
            show_grid: true,
        }
    }
}

/// How zones without inhabitants enter the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyZones {
    /// Keep every zone; empty ones contribute their zero statistics.
    #[default]
    Include,
    Exclude,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ScatterSeries {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            x: Vec::with_capacity(capacity),
            y: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

/// Density on x, mean of `attribute` on y.
pub fn density_vs_attribute(attribute: Attribute) -> impl Fn(&Zone) -> Result<(f64, f64)> {
    move |zone| Ok((zone.population_density(), zone.average_attribute(attribute)?))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterReport {
    pub chart: ChartSpec,
    pub empty_zones: EmptyZones,
    pub series: ScatterSeries,
}

impl ScatterReport {
    /// One sample per zone, in input order.
    pub fn build<'a, I, F>(
        zones: I,
        chart: ChartSpec,
        extract: F,
        empty_zones: EmptyZones,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Zone>,
        F: Fn(&Zone) -> Result<(f64, f64)>,
    {
        let zones = zones.into_iter();
        let mut series = ScatterSeries::with_capacity(zones.size_hint().0);
        for zone in zones {
            if empty_zones == EmptyZones::Exclude && zone.is_empty() {
                continue;
            }
            let (x, y) = extract(zone)?;
            series.push(x, y);
        }
        Ok(Self {
            chart,
            empty_zones,
            series,
        })
    }

    pub fn density_vs_attribute<'a, I>(
        zones: I,
        attribute: Attribute,
        empty_zones: EmptyZones,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Zone>,
    {
        Self::build(
            zones,
            ChartSpec::density_vs_attribute(attribute),
            density_vs_attribute(attribute),
            empty_zones,
        )
    }
}
