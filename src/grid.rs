//! Zone grid - uniform row-major tiling of the longitude/latitude extent

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::{GridError, Result};
use crate::geo::Coordinate;
use crate::zone::Zone;

pub const MIN_LONGITUDE_DEGREES: f64 = -180.0;
pub const MAX_LONGITUDE_DEGREES: f64 = 180.0;
pub const MIN_LATITUDE_DEGREES: f64 = -90.0;
pub const MAX_LATITUDE_DEGREES: f64 = 90.0;
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const WIDTH_DEGREES: f64 = 1.0;
pub const HEIGHT_DEGREES: f64 = 1.0;

const BIN_TOLERANCE: f64 = 1e-9;

/// Upper bound on zones a grid may allocate.
pub const MAX_ZONES: usize = 100_000_000;

pub type ZoneId = usize;

/// Column/row of a zone in the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneBins {
    pub lon: usize,
    pub lat: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub min_longitude_degrees: f64,
    pub max_longitude_degrees: f64,
    pub min_latitude_degrees: f64,
    pub max_latitude_degrees: f64,
    pub width_degrees: f64,
    pub height_degrees: f64,
    pub earth_radius_km: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            min_longitude_degrees: MIN_LONGITUDE_DEGREES,
            max_longitude_degrees: MAX_LONGITUDE_DEGREES,
            min_latitude_degrees: MIN_LATITUDE_DEGREES,
            max_latitude_degrees: MAX_LATITUDE_DEGREES,
            width_degrees: WIDTH_DEGREES,
            height_degrees: HEIGHT_DEGREES,
            earth_radius_km: EARTH_RADIUS_KM,
        }
    }
}

impl GridSettings {
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.min_longitude_degrees,
            self.max_longitude_degrees,
            self.min_latitude_degrees,
            self.max_latitude_degrees,
            self.width_degrees,
            self.height_degrees,
            self.earth_radius_km,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(GridError::InvalidSettings(
                "all grid settings must be finite".into(),
            ));
        }
        if self.min_longitude_degrees >= self.max_longitude_degrees {
            return Err(GridError::InvalidSettings(format!(
                "longitude range [{}, {}) is empty",
                self.min_longitude_degrees, self.max_longitude_degrees
            )));
        }
        if self.min_latitude_degrees >= self.max_latitude_degrees {
            return Err(GridError::InvalidSettings(format!(
                "latitude range [{}, {}) is empty",
                self.min_latitude_degrees, self.max_latitude_degrees
            )));
        }
        if self.width_degrees <= 0.0 || self.height_degrees <= 0.0 {
            return Err(GridError::InvalidSettings(
                "zone width and height must be positive".into(),
            ));
        }
        if self.earth_radius_km <= 0.0 {
            return Err(GridError::InvalidSettings(
                "earth radius must be positive".into(),
            ));
        }
        check_whole_bins(
            "longitude",
            self.max_longitude_degrees - self.min_longitude_degrees,
            self.width_degrees,
        )?;
        check_whole_bins(
            "latitude",
            self.max_latitude_degrees - self.min_latitude_degrees,
            self.height_degrees,
        )?;
        match self.longitude_bins().checked_mul(self.latitude_bins()) {
            Some(count) if count <= MAX_ZONES => Ok(()),
            _ => Err(GridError::InvalidSettings(format!(
                "{} x {} zones exceeds the limit of {MAX_ZONES}",
                self.longitude_bins(),
                self.latitude_bins()
            ))),
        }
    }

    pub fn longitude_bins(&self) -> usize {
        ((self.max_longitude_degrees - self.min_longitude_degrees) / self.width_degrees).round()
            as usize
    }

    pub fn latitude_bins(&self) -> usize {
        ((self.max_latitude_degrees - self.min_latitude_degrees) / self.height_degrees).round()
            as usize
    }

    pub fn zone_count(&self) -> usize {
        self.longitude_bins() * self.latitude_bins()
    }

    /// Whether the position lies in `[min_lon, max_lon) x [min_lat, max_lat)`.
    pub fn in_extent(&self, position: &Coordinate) -> bool {
        let lon = position.longitude_degrees;
        let lat = position.latitude_degrees;
        lon >= self.min_longitude_degrees
            && lon < self.max_longitude_degrees
            && lat >= self.min_latitude_degrees
            && lat < self.max_latitude_degrees
    }
}

fn check_whole_bins(axis: &str, span: f64, step: f64) -> Result<()> {
    let bins = span / step;
    if (bins - bins.round()).abs() > BIN_TOLERANCE || bins.round() < 1.0 {
        return Err(GridError::InvalidSettings(format!(
            "{axis} span {span} is not a whole multiple of step {step}"
        )));
    }
    Ok(())
}

/// The global zone collection.
///
/// Starts uninitialized with no zones; `initialize` (or the first mutable
/// lookup) builds every zone once. Zone boundaries never change afterwards.
pub struct ZoneGrid {
    settings: GridSettings,
    lon_bins: usize,
    lat_bins: usize,
    zones: Vec<Zone>,
}

impl ZoneGrid {
    pub fn new(settings: GridSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            lon_bins: settings.longitude_bins(),
            lat_bins: settings.latitude_bins(),
            settings,
            zones: Vec::new(),
        })
    }

    pub fn build(settings: GridSettings) -> Result<Self> {
        let mut grid = Self::new(settings)?;
        grid.initialize();
        Ok(grid)
    }

    pub fn settings(&self) -> &GridSettings {
        &self.settings
    }

    pub fn is_ready(&self) -> bool {
        !self.zones.is_empty()
    }

    /// Builds all zones row-major: latitude slowest, longitude fastest.
    pub fn initialize(&mut self) {
        if self.is_ready() {
            return;
        }
        let s = &self.settings;
        let mut zones = Vec::with_capacity(self.lon_bins * self.lat_bins);
        for lat in 0..self.lat_bins {
            let lat_low = s.min_latitude_degrees + lat as f64 * s.height_degrees;
            let lat_high = s.min_latitude_degrees + (lat + 1) as f64 * s.height_degrees;
            for lon in 0..self.lon_bins {
                let lon_low = s.min_longitude_degrees + lon as f64 * s.width_degrees;
                let lon_high = s.min_longitude_degrees + (lon + 1) as f64 * s.width_degrees;
                zones.push(Zone::new(
                    zones.len(),
                    Coordinate::new(lon_low, lat_low),
                    Coordinate::new(lon_high, lat_high),
                    s.earth_radius_km,
                ));
            }
        }
        log::debug!(
            "initialized zone grid: {} x {} = {} zones",
            self.lon_bins,
            self.lat_bins,
            zones.len()
        );
        self.zones = zones;
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn zone(&self, id: ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn populated_zones(&self) -> impl Iterator<Item = &Zone> + '_ {
        self.zones.iter().filter(|zone| !zone.is_empty())
    }

    pub fn total_population(&self) -> usize {
        self.zones.iter().map(Zone::population).sum()
    }

    /// Convert bins to a flat row-major zone id
    pub fn bins_to_id(&self, bins: ZoneBins) -> Option<ZoneId> {
        if bins.lon < self.lon_bins && bins.lat < self.lat_bins {
            Some(bins.lat * self.lon_bins + bins.lon)
        } else {
            None
        }
    }

    pub fn id_to_bins(&self, id: ZoneId) -> Option<ZoneBins> {
        if id < self.lon_bins * self.lat_bins {
            Some(ZoneBins {
                lon: id % self.lon_bins,
                lat: id / self.lon_bins,
            })
        } else {
            None
        }
    }

    /// O(1) lookup on a ready grid.
    pub fn locate(&self, position: &Coordinate) -> Result<ZoneId> {
        if !self.is_ready() {
            return Err(GridError::NotInitialized);
        }
        if !self.settings.in_extent(position) {
            return Err(GridError::OutOfRange {
                longitude: position.longitude_degrees,
                latitude: position.latitude_degrees,
            });
        }

        let s = &self.settings;
        let lon_offset = (position.longitude_degrees - s.min_longitude_degrees) / s.width_degrees;
        let lat_offset = (position.latitude_degrees - s.min_latitude_degrees) / s.height_degrees;
        // In-extent positions can still floor onto the upper bin through rounding.
        let mut bins = ZoneBins {
            lon: (lon_offset.floor() as usize).min(self.lon_bins - 1),
            lat: (lat_offset.floor() as usize).min(self.lat_bins - 1),
        };
        let id = self.checked_id(bins, position)?;
        if self.zones[id].contains(position) {
            return Ok(id);
        }

        // Degree arithmetic and radian containment disagree only within one
        // ulp of a shared edge, so a single step on each axis settles it.
        let (corner_a, corner_b) = self.zones[id].corners();
        let lon = position.longitude_radians();
        let lat = position.latitude_radians();
        if lon < corner_a.longitude_radians().min(corner_b.longitude_radians()) && bins.lon > 0 {
            bins.lon -= 1;
        } else if lon >= corner_a.longitude_radians().max(corner_b.longitude_radians())
            && bins.lon + 1 < self.lon_bins
        {
            bins.lon += 1;
        }
        if lat < corner_a.latitude_radians().min(corner_b.latitude_radians()) && bins.lat > 0 {
            bins.lat -= 1;
        } else if lat >= corner_a.latitude_radians().max(corner_b.latitude_radians())
            && bins.lat + 1 < self.lat_bins
        {
            bins.lat += 1;
        }
        let settled = self.checked_id(bins, position)?;
        if self.zones[settled].contains(position) {
            Ok(settled)
        } else {
            Err(GridError::InvariantViolation {
                zone: id,
                longitude: position.longitude_degrees,
                latitude: position.latitude_degrees,
            })
        }
    }

    fn checked_id(&self, bins: ZoneBins, position: &Coordinate) -> Result<ZoneId> {
        self.bins_to_id(bins)
            .filter(|&id| id < self.zones.len())
            .ok_or(GridError::InvariantViolation {
                zone: bins.lat.saturating_mul(self.lon_bins).saturating_add(bins.lon),
                longitude: position.longitude_degrees,
                latitude: position.latitude_degrees,
            })
    }

    /// Lookup that builds the grid on first use.
    pub fn find_zone_id(&mut self, position: &Coordinate) -> Result<ZoneId> {
        self.initialize();
        self.locate(position)
    }

    pub fn find_zone(&mut self, position: &Coordinate) -> Result<&Zone> {
        let id = self.find_zone_id(position)?;
        Ok(&self.zones[id])
    }

    pub fn find_zone_mut(&mut self, position: &Coordinate) -> Result<&mut Zone> {
        let id = self.find_zone_id(position)?;
        Ok(&mut self.zones[id])
    }

    /// Resolve the agent's zone and append it there.
    pub fn place(&mut self, agent: Agent) -> Result<ZoneId> {
        let id = self.find_zone_id(&agent.position())?;
        self.zones[id].add_inhabitant(agent);
        Ok(id)
    }
}
