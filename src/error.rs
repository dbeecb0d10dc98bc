use thiserror::Error;

use crate::agent::Attribute;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("invalid grid settings: {0}")]
    InvalidSettings(String),

    #[error(
        "position (longitude {longitude}, latitude {latitude}) lies outside the grid extent"
    )]
    OutOfRange { longitude: f64, latitude: f64 },

    #[error("inhabitant {inhabitant} of zone {zone} has no '{attribute}' attribute")]
    MissingAttribute {
        zone: usize,
        inhabitant: usize,
        attribute: Attribute,
    },

    /// The flat index resolved to a zone that does not contain the position.
    #[error(
        "zone {zone} does not contain (longitude {longitude}, latitude {latitude}); grid index is corrupt"
    )]
    InvariantViolation {
        zone: usize,
        longitude: f64,
        latitude: f64,
    },

    #[error("zone grid has not been initialized")]
    NotInitialized,

    #[error("record {index}")]
    Record {
        index: usize,
        #[source]
        source: Box<GridError>,
    },
}

impl GridError {
    pub fn is_out_of_range(&self) -> bool {
        match self {
            GridError::OutOfRange { .. } => true,
            GridError::Record { source, .. } => source.is_out_of_range(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GridError>;
