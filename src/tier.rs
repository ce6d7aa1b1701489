//! Sustainability tiers for EcoScores

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum EcoTier {
    Critical,
    VeryPoor,
    Poor,
    BelowAverage,
    Average,
    Fair,
    Good,
    VeryGood,
    Excellent,
}

/// Lower threshold of each tier, highest first. Anything below 20 is Critical.
const THRESHOLDS: [(i64, EcoTier); 8] = [
    (90, EcoTier::Excellent),
    (80, EcoTier::VeryGood),
    (70, EcoTier::Good),
    (60, EcoTier::Fair),
    (50, EcoTier::Average),
    (40, EcoTier::BelowAverage),
    (30, EcoTier::Poor),
    (20, EcoTier::VeryPoor),
];

impl EcoTier {
    pub const ALL: [EcoTier; 9] = [
        EcoTier::Excellent,
        EcoTier::VeryGood,
        EcoTier::Good,
        EcoTier::Fair,
        EcoTier::Average,
        EcoTier::BelowAverage,
        EcoTier::Poor,
        EcoTier::VeryPoor,
        EcoTier::Critical,
    ];

    /// Total over all integers: scores above 100 are Excellent, below 0 Critical.
    pub fn from_score(score: i64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, tier)| *tier)
            .unwrap_or(EcoTier::Critical)
    }

    pub fn label(&self) -> &'static str {
        match self {
            EcoTier::Excellent => "Excellent",
            EcoTier::VeryGood => "Very Good",
            EcoTier::Good => "Good",
            EcoTier::Fair => "Fair",
            EcoTier::Average => "Average",
            EcoTier::BelowAverage => "Below Average",
            EcoTier::Poor => "Poor",
            EcoTier::VeryPoor => "Very Poor",
            EcoTier::Critical => "Critical",
        }
    }

    pub fn summary(&self) -> &'static str {
        match self {
            EcoTier::Excellent => "Very sustainable",
            EcoTier::VeryGood => "Highly sustainable",
            EcoTier::Good => "Sustainable",
            EcoTier::Fair => "Moderately sustainable",
            EcoTier::Average => "Room for improvement",
            EcoTier::BelowAverage => "Needs improvement",
            EcoTier::Poor => "Not very sustainable",
            EcoTier::VeryPoor => "Unsustainable",
            EcoTier::Critical => "Extremely unsustainable",
        }
    }
}

impl fmt::Display for EcoTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.label(), self.summary())
    }
}
