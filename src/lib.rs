pub mod agent;
pub mod config;
pub mod error;
pub mod geo;
pub mod grid;
pub mod ingest;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod synth;
pub mod web;
pub mod zone;

pub use agent::{Agent, AgentAttributes, AgentRecord, Attribute};
pub use error::GridError;
pub use geo::Coordinate;
pub use grid::{GridSettings, ZoneGrid, ZoneId};
pub use report::{ChartSpec, EmptyZones, ScatterReport, ScatterSeries};
pub use zone::Zone;
