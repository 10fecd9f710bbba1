//! Flood Risk Classification
//!
//! Evaluates an ordered threshold rule table against each sensor reading
//! and fans the result out to every registered consumer.

mod assessment;
mod classifier;
mod rules;
mod thresholds;

pub use assessment::{RiskAssessment, RiskCategory, RiskReport};
pub use classifier::{ClassifierConfig, ClassifierSummary, RiskClassifier};
pub use rules::{Condition, Rule, RuleTable, ShadowedClause};
pub use thresholds::RiskThresholds;
