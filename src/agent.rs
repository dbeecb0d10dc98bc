//! Agents and the closed set of numeric attributes they may carry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Numeric agent attributes accepted at ingestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Age,
    Agreeableness,
    Conscientiousness,
    Extraversion,
    Income,
    Neuroticism,
    Openness,
}

impl Attribute {
    pub const ALL: [Attribute; 7] = [
        Attribute::Age,
        Attribute::Agreeableness,
        Attribute::Conscientiousness,
        Attribute::Extraversion,
        Attribute::Income,
        Attribute::Neuroticism,
        Attribute::Openness,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Attribute::Age => "age",
            Attribute::Agreeableness => "agreeableness",
            Attribute::Conscientiousness => "conscientiousness",
            Attribute::Extraversion => "extraversion",
            Attribute::Income => "income",
            Attribute::Neuroticism => "neuroticism",
            Attribute::Openness => "openness",
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Attribute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted = value.trim().to_ascii_lowercase();
        Attribute::ALL
            .into_iter()
            .find(|attr| attr.name() == wanted)
            .ok_or_else(|| {
                let known: Vec<&str> = Attribute::ALL.iter().map(|a| a.name()).collect();
                format!(
                    "unknown attribute '{value}' (expected one of: {})",
                    known.join(", ")
                )
            })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreeableness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conscientiousness: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extraversion: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub income: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neuroticism: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openness: Option<f64>,
}

impl AgentAttributes {
    pub fn get(&self, attribute: Attribute) -> Option<f64> {
        match attribute {
            Attribute::Age => self.age,
            Attribute::Agreeableness => self.agreeableness,
            Attribute::Conscientiousness => self.conscientiousness,
            Attribute::Extraversion => self.extraversion,
            Attribute::Income => self.income,
            Attribute::Neuroticism => self.neuroticism,
            Attribute::Openness => self.openness,
        }
    }

    pub fn with(mut self, attribute: Attribute, value: f64) -> Self {
        let slot = match attribute {
            Attribute::Age => &mut self.age,
            Attribute::Agreeableness => &mut self.agreeableness,
            Attribute::Conscientiousness => &mut self.conscientiousness,
            Attribute::Extraversion => &mut self.extraversion,
            Attribute::Income => &mut self.income,
            Attribute::Neuroticism => &mut self.neuroticism,
            Attribute::Openness => &mut self.openness,
        };
        *slot = Some(value);
        self
    }
}

/// One input record: a position plus any subset of the known attributes.
///
/// Keys outside the known set (identifiers, free-text fields) are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRecord {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub attributes: AgentAttributes,
}

impl AgentRecord {
    pub fn position(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }

    pub fn into_agent(self) -> Agent {
        Agent::new(self.position(), self.attributes)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    position: Coordinate,
    attributes: AgentAttributes,
}

impl Agent {
    pub fn new(position: Coordinate, attributes: AgentAttributes) -> Self {
        Self {
            position,
            attributes,
        }
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn attributes(&self) -> &AgentAttributes {
        &self.attributes
    }

    pub fn attribute(&self, attribute: Attribute) -> Option<f64> {
        self.attributes.get(attribute)
    }
}
