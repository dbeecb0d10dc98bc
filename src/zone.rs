//! Zones: fixed rectangular cells of the degree grid and their aggregates

use serde::{Deserialize, Serialize};

use crate::agent::{Agent, Attribute};
use crate::error::{GridError, Result};
use crate::geo::Coordinate;

#[derive(Debug, Clone)]
pub struct Zone {
    id: usize,
    corner_a: Coordinate,
    corner_b: Coordinate,
    earth_radius_km: f64,
    inhabitants: Vec<Agent>,
}

impl Zone {
    /// Corners are opposite vertices in either order.
    pub fn new(
        id: usize,
        corner_a: Coordinate,
        corner_b: Coordinate,
        earth_radius_km: f64,
    ) -> Self {
        Self {
            id,
            corner_a,
            corner_b,
            earth_radius_km,
            inhabitants: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn corners(&self) -> (Coordinate, Coordinate) {
        (self.corner_a, self.corner_b)
    }

    pub fn inhabitants(&self) -> &[Agent] {
        &self.inhabitants
    }

    pub fn population(&self) -> usize {
        self.inhabitants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inhabitants.is_empty()
    }

    pub fn width_km(&self) -> f64 {
        (self.corner_a.longitude_radians() - self.corner_b.longitude_radians()).abs()
            * self.earth_radius_km
    }

    pub fn height_km(&self) -> f64 {
        (self.corner_a.latitude_radians() - self.corner_b.latitude_radians()).abs()
            * self.earth_radius_km
    }

    pub fn area_km2(&self) -> f64 {
        self.width_km() * self.height_km()
    }

    /// Inhabitants per km². Infinite or NaN only for a degenerate zone.
    pub fn population_density(&self) -> f64 {
        self.population() as f64 / self.area_km2()
    }

    /// Half-open on both axes: lower edges inclusive, upper edges exclusive.
    pub fn contains(&self, position: &Coordinate) -> bool {
        let lon = position.longitude_radians();
        let lat = position.latitude_radians();
        let (lon_a, lon_b) = (
            self.corner_a.longitude_radians(),
            self.corner_b.longitude_radians(),
        );
        let (lat_a, lat_b) = (
            self.corner_a.latitude_radians(),
            self.corner_b.latitude_radians(),
        );
        lon >= lon_a.min(lon_b)
            && lon < lon_a.max(lon_b)
            && lat >= lat_a.min(lat_b)
            && lat < lat_a.max(lat_b)
    }

    /// Appends without checking containment; the grid guarantees it.
    pub fn add_inhabitant(&mut self, agent: Agent) {
        self.inhabitants.push(agent);
    }

    /// Mean of `attribute` over inhabitants, `0.0` for an empty zone.
    pub fn average_attribute(&self, attribute: Attribute) -> Result<f64> {
        if self.inhabitants.is_empty() {
            return Ok(0.0);
        }
        let mut total = 0.0;
        for (index, inhabitant) in self.inhabitants.iter().enumerate() {
            total += inhabitant
                .attribute(attribute)
                .ok_or(GridError::MissingAttribute {
                    zone: self.id,
                    inhabitant: index,
                    attribute,
                })?;
        }
        Ok(total / self.population() as f64)
    }

    pub fn summary(&self) -> ZoneSummary {
        let (lon_a, lon_b) = (self.corner_a.longitude_degrees, self.corner_b.longitude_degrees);
        let (lat_a, lat_b) = (self.corner_a.latitude_degrees, self.corner_b.latitude_degrees);
        ZoneSummary {
            id: self.id,
            min_longitude: lon_a.min(lon_b),
            max_longitude: lon_a.max(lon_b),
            min_latitude: lat_a.min(lat_b),
            max_latitude: lat_a.max(lat_b),
            population: self.population(),
            area_km2: self.area_km2(),
            population_density: self.population_density(),
        }
    }
}

/// Serializable view of one zone for reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSummary {
    pub id: usize,
    pub min_longitude: f64,
    pub max_longitude: f64,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub population: usize,
    pub area_km2: f64,
    pub population_density: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::AgentAttributes;

    fn unit_zone() -> Zone {
        Zone::new(0, Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0), 6371.0)
    }

    fn agent_at(lon: f64, lat: f64, agreeableness: Option<f64>) -> Agent {
        let mut attrs = AgentAttributes::default();
        attrs.agreeableness = agreeableness;
        Agent::new(Coordinate::new(lon, lat), attrs)
    }

    #[test]
    fn test_equator_zone_dimensions() {
        let zone = unit_zone();

        assert!((zone.width_km() - 111.19).abs() < 0.01);
        assert!((zone.height_km() - 111.19).abs() < 0.01);
        assert!((zone.area_km2() - 12364.3).abs() < 1.0);
    }

    #[test]
    fn test_population_density() {
        let mut zone = unit_zone();
        zone.add_inhabitant(agent_at(0.2, 0.2, Some(0.5)));
        zone.add_inhabitant(agent_at(0.7, 0.9, Some(0.5)));

        assert_eq!(zone.population(), 2);
        assert!((zone.population_density() - 1.617e-4).abs() < 1e-7);
    }

    #[test]
    fn test_contains_is_half_open() {
        let zone = unit_zone();

        assert!(zone.contains(&Coordinate::new(0.0, 0.0)));
        assert!(zone.contains(&Coordinate::new(0.999, 0.5)));
        assert!(!zone.contains(&Coordinate::new(1.0, 0.5)));
        assert!(!zone.contains(&Coordinate::new(0.5, 1.0)));
        assert!(!zone.contains(&Coordinate::new(-0.001, 0.5)));
    }

    #[test]
    fn test_corner_order_does_not_matter() {
        let swapped = Zone::new(0, Coordinate::new(1.0, 1.0), Coordinate::new(0.0, 0.0), 6371.0);
        let zone = unit_zone();

        assert!(swapped.contains(&Coordinate::new(0.0, 0.0)));
        assert!(!swapped.contains(&Coordinate::new(1.0, 1.0)));
        assert_eq!(swapped.area_km2(), zone.area_km2());
    }

    #[test]
    fn test_average_of_empty_zone_is_zero() {
        let zone = unit_zone();
        assert_eq!(zone.average_attribute(Attribute::Agreeableness).unwrap(), 0.0);
    }

    #[test]
    fn test_average_attribute() {
        let mut zone = unit_zone();
        zone.add_inhabitant(agent_at(0.1, 0.1, Some(0.8)));
        zone.add_inhabitant(agent_at(0.2, 0.2, Some(0.4)));

        let avg = zone.average_attribute(Attribute::Agreeableness).unwrap();
        assert!((avg - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_missing_attribute_fails() {
        let mut zone = unit_zone();
        zone.add_inhabitant(agent_at(0.1, 0.1, Some(0.8)));
        zone.add_inhabitant(agent_at(0.2, 0.2, None));

        let err = zone.average_attribute(Attribute::Agreeableness).unwrap_err();
        assert!(matches!(
            err,
            GridError::MissingAttribute {
                inhabitant: 1,
                attribute: Attribute::Agreeableness,
                ..
            }
        ));
    }

    #[test]
    fn test_summary_normalizes_corners() {
        let zone = Zone::new(7, Coordinate::new(3.0, -4.0), Coordinate::new(2.0, -5.0), 6371.0);
        let summary = zone.summary();

        assert_eq!(summary.id, 7);
        assert_eq!(summary.min_longitude, 2.0);
        assert_eq!(summary.max_latitude, -4.0);
        assert_eq!(summary.population, 0);
    }
}
