//! Category Labels

use risk_engine::RiskCategory;

const LABELS: [&str; 4] = ["SAFE", "ATTENTION", "ALERT", "DANGER"];

/// Display text for a category
pub fn category_label(category: RiskCategory) -> &'static str {
    LABELS[category as usize]
}
