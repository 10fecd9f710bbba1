//! Risk Assessment Types

use sensor_acquisition::SensorReading;
use serde::{Deserialize, Serialize};

/// Risk category, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskCategory {
    Safe,
    Attention,
    Alert,
    Danger,
}

impl RiskCategory {
    /// All categories, least severe first
    pub const ALL: [RiskCategory; 4] = [
        RiskCategory::Safe,
        RiskCategory::Attention,
        RiskCategory::Alert,
        RiskCategory::Danger,
    ];
}

/// Result of classifying one reading
///
/// `alert_active` is evaluated on its own and is not derived from
/// `category`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub category: RiskCategory,
    pub alert_active: bool,
}

/// What consumers receive each cycle: the reading and the assessment made from it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskReport {
    /// Classification cycle, starting at 1
    pub cycle: u64,
    pub reading: SensorReading,
    pub assessment: RiskAssessment,
}
