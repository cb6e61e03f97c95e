//! Buy/pass verdict with confidence and rationale.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::Profile;

/// Transaction stance for a waiver add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    Buy,
    Pass,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::Buy => "buy",
            Recommendation::Pass => "pass",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Recommendation::Buy),
            "pass" => Ok(Recommendation::Pass),
            other => Err(anyhow::anyhow!("unknown recommendation: {other:?}")),
        }
    }
}

/// Decision for one player. Confidence expresses certainty in the chosen label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub profile: Profile,
    pub recommendation: Recommendation,
    /// In <0.0, 1.0>.
    pub confidence: f64,
    pub rationale: String,
}

impl Decision {
    pub fn new(
        profile: Profile,
        recommendation: Recommendation,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            profile,
            recommendation,
            confidence: clamp01(confidence),
            rationale: rationale.into(),
        }
    }
}

fn clamp01(x: f64) -> f64 {
    if x.is_nan() {
        0.0
    } else {
        x.clamp(0.0, 1.0)
    }
}
