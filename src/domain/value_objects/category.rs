//! Vehicle category (price tier).

use serde::{Deserialize, Serialize};

/// Size category of a vehicle. Selects which catalog price applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VehicleCategory {
    #[default]
    Hatch,
    Sedan,
    Suv,
    Pickup,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 4] = [Self::Hatch, Self::Sedan, Self::Suv, Self::Pickup];

    /// Parse from the database or a form value.
    ///
    /// Unknown or empty values fall back to `Hatch`, the cheapest tier.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "sedan" => Self::Sedan,
            "suv" => Self::Suv,
            "pickup" | "picape" => Self::Pickup,
            _ => Self::Hatch,
        }
    }

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hatch => "hatch",
            Self::Sedan => "sedan",
            Self::Suv => "suv",
            Self::Pickup => "pickup",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
