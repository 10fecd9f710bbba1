//! Ordered Threshold Rules

use crate::{RiskCategory, RiskThresholds};
use serde::{Deserialize, Serialize};

/// Predicate over `(river level, rain intensity)`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// level >= x
    LevelAtLeast(f64),
    /// level > x
    LevelAbove(f64),
    /// level <= x
    LevelAtMost(f64),
    /// rain > x
    RainAbove(f64),
    /// rain <= x
    RainAtMost(f64),
    /// Every child holds
    All(Vec<Condition>),
    /// At least one child holds
    Any(Vec<Condition>),
}

impl Condition {
    /// Evaluate against one reading
    pub fn holds(&self, level: f64, rain: f64) -> bool {
        match self {
            Condition::LevelAtLeast(x) => level >= *x,
            Condition::LevelAbove(x) => level > *x,
            Condition::LevelAtMost(x) => level <= *x,
            Condition::RainAbove(x) => rain > *x,
            Condition::RainAtMost(x) => rain <= *x,
            Condition::All(children) => children.iter().all(|c| c.holds(level, rain)),
            Condition::Any(children) => children.iter().any(|c| c.holds(level, rain)),
        }
    }

    /// Top-level alternatives of this condition
    pub fn disjuncts(&self) -> &[Condition] {
        match self {
            Condition::Any(children) => children,
            other => std::slice::from_ref(other),
        }
    }
}

/// A category and the condition that selects it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub category: RiskCategory,
    pub condition: Condition,
}

/// A disjunct that can never decide the outcome because an earlier rule
/// carries the identical disjunct
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowedClause {
    /// Rule containing the unreachable disjunct
    pub rule: RiskCategory,
    /// Earlier rule that always wins first
    pub shadowed_by: RiskCategory,
    pub clause: Condition,
}

/// Rules evaluated in order; the first match wins and SAFE is the fallback
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table from rules in priority order
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The flood monitor's rule set
    ///
    /// 1. DANGER: level >= danger, or level >= high with heavy rain
    /// 2. ALERT: level >= high with heavy rain, or level > baseline with heavy rain
    /// 3. ATTENTION: level > baseline without heavy rain, or level <= baseline with extreme rain
    ///
    /// The first ALERT alternative repeats the second DANGER alternative
    /// verbatim and can never fire. It is kept as written; see
    /// [`RuleTable::shadowed_clauses`].
    pub fn standard(t: &RiskThresholds) -> Self {
        let high_and_heavy = Condition::All(vec![
            Condition::LevelAtLeast(t.high_level_m),
            Condition::RainAbove(t.heavy_rain),
        ]);

        Self::new(vec![
            Rule {
                category: RiskCategory::Danger,
                condition: Condition::Any(vec![
                    Condition::LevelAtLeast(t.danger_level_m),
                    high_and_heavy.clone(),
                ]),
            },
            Rule {
                category: RiskCategory::Alert,
                condition: Condition::Any(vec![
                    high_and_heavy,
                    Condition::All(vec![
                        Condition::LevelAbove(t.baseline_level_m),
                        Condition::RainAbove(t.heavy_rain),
                    ]),
                ]),
            },
            Rule {
                category: RiskCategory::Attention,
                condition: Condition::Any(vec![
                    Condition::All(vec![
                        Condition::LevelAbove(t.baseline_level_m),
                        Condition::RainAtMost(t.heavy_rain),
                    ]),
                    Condition::All(vec![
                        Condition::LevelAtMost(t.baseline_level_m),
                        Condition::RainAbove(t.extreme_rain),
                    ]),
                ]),
            },
        ])
    }

    /// Category of the first matching rule
    pub fn evaluate(&self, level: f64, rain: f64) -> RiskCategory {
        self.rules
            .iter()
            .find(|rule| rule.condition.holds(level, rain))
            .map(|rule| rule.category)
            .unwrap_or(RiskCategory::Safe)
    }

    /// Disjuncts made unreachable by an identical disjunct in an earlier rule
    pub fn shadowed_clauses(&self) -> Vec<ShadowedClause> {
        let mut shadowed = Vec::new();

        for (i, rule) in self.rules.iter().enumerate() {
            for clause in rule.condition.disjuncts() {
                let earlier = self.rules[..i]
                    .iter()
                    .find(|prior| prior.condition.disjuncts().contains(clause));

                if let Some(prior) = earlier {
                    shadowed.push(ShadowedClause {
                        rule: rule.category,
                        shadowed_by: prior.category,
                        clause: clause.clone(),
                    });
                }
            }
        }

        shadowed
    }

    /// Rules in priority order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
