//! Deterministic synthetic agent populations

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::agent::{AgentAttributes, AgentRecord};
use crate::grid::GridSettings;

/// Seeded generator of agent records spread over a grid extent.
pub struct SyntheticAgents {
    rng: ChaCha8Rng,
    settings: GridSettings,
}

impl SyntheticAgents {
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, GridSettings::default())
    }

    pub fn with_settings(seed: u64, settings: GridSettings) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            settings,
        }
    }

    pub fn next_record(&mut self) -> AgentRecord {
        let s = &self.settings;
        let longitude = self
            .rng
            .gen_range(s.min_longitude_degrees..s.max_longitude_degrees);
        let latitude = self
            .rng
            .gen_range(s.min_latitude_degrees..s.max_latitude_degrees);
        let attributes = AgentAttributes {
            age: Some(self.rng.gen_range(18..=90) as f64),
            agreeableness: Some(self.rng.gen::<f64>()),
            conscientiousness: Some(self.rng.gen::<f64>()),
            extraversion: Some(self.rng.gen::<f64>()),
            income: Some((self.rng.gen_range(5_000.0..150_000.0_f64)).round()),
            neuroticism: Some(self.rng.gen::<f64>()),
            openness: Some(self.rng.gen::<f64>()),
        };
        AgentRecord {
            latitude,
            longitude,
            attributes,
        }
    }

    pub fn generate(&mut self, count: usize) -> Vec<AgentRecord> {
        (0..count).map(|_| self.next_record()).collect()
    }
}
