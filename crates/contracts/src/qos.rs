//! Quality of service classification
//!
//! A WRP message carries an ordinal QOS value. The gateway only reasons about
//! the four named bands derived from it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw ordinal QOS value as carried on the wire.
///
/// Any integer is accepted; [`QosValue::level`] folds it into a band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QosValue(pub i64);

impl QosValue {
    /// Canonical value for [`QosLevel::Low`]
    pub const LOW: Self = Self(0);
    /// Canonical value for [`QosLevel::Medium`]
    pub const MEDIUM: Self = Self(25);
    /// Canonical value for [`QosLevel::High`]
    pub const HIGH: Self = Self(50);
    /// Canonical value for [`QosLevel::Critical`]
    pub const CRITICAL: Self = Self(75);

    /// Classify the value into its band.
    ///
    /// Total: negative values fall into `Low`, anything at or above the
    /// critical threshold is `Critical`.
    pub const fn level(self) -> QosLevel {
        match self.0 {
            v if v < Self::MEDIUM.0 => QosLevel::Low,
            v if v < Self::HIGH.0 => QosLevel::Medium,
            v if v < Self::CRITICAL.0 => QosLevel::High,
            _ => QosLevel::Critical,
        }
    }
}

impl From<i64> for QosValue {
    fn from(v: i64) -> Self {
        Self(v)
    }
}

/// Named QOS band, totally ordered `Low < Medium < High < Critical`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QosLevel {
    #[default]
    Low,
    Medium,
    High,
    Critical,
}

impl QosLevel {
    /// Label value used in metrics and logs
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for QosLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
