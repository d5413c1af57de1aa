//! Ticker → instrument type classification.
//!
//! Rules are an ordered list evaluated top-down; the first match wins and an
//! unmatched ticker is an `Equity`. Order matters: `TBOND1` is a treasury
//! bill, not a bond, because the `TB` prefix rule sits above `BOND`.

use crate::domain::InstrumentType;
use serde::{Deserialize, Serialize};

/// Pure, total mapping from a ticker symbol to an instrument type.
pub trait InstrumentClassifier {
    fn classify(&self, ticker: &str) -> InstrumentType;
}

impl<F> InstrumentClassifier for F
where
    F: Fn(&str) -> InstrumentType,
{
    fn classify(&self, ticker: &str) -> InstrumentType {
        self(ticker)
    }
}

/// How a rule tests the (upper-cased) ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Prefix,
    Contains,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassifierRule {
    pub kind: MatchKind,
    pub pattern: String,
    pub instrument_type: InstrumentType,
}

impl ClassifierRule {
    pub fn prefix(pattern: &str, instrument_type: InstrumentType) -> Self {
        Self { kind: MatchKind::Prefix, pattern: pattern.to_string(), instrument_type }
    }

    pub fn contains(pattern: &str, instrument_type: InstrumentType) -> Self {
        Self { kind: MatchKind::Contains, pattern: pattern.to_string(), instrument_type }
    }

    /// `upper_ticker` must already be upper-cased.
    fn matches(&self, upper_ticker: &str) -> bool {
        let pattern = self.pattern.to_uppercase();
        match self.kind {
            MatchKind::Prefix => upper_ticker.starts_with(&pattern),
            MatchKind::Contains => upper_ticker.contains(&pattern),
        }
    }
}

/// Ordered (predicate, type) dispatch with an `Equity` fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleClassifier {
    rules: Vec<ClassifierRule>,
}

impl RuleClassifier {
    pub fn new(rules: Vec<ClassifierRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ClassifierRule] {
        &self.rules
    }

    /// Exchange naming conventions: index codes start with `00`, treasury
    /// bills with `TB`, then sukuk, bond and mutual-fund substrings.
    pub fn default_rules() -> Vec<ClassifierRule> {
        vec![
            ClassifierRule::prefix("00", InstrumentType::Index),
            ClassifierRule::prefix("TB", InstrumentType::TreasuryBill),
            ClassifierRule::contains("SUKUK", InstrumentType::Sukuk),
            ClassifierRule::contains("BOND", InstrumentType::Bond),
            ClassifierRule::contains("MF", InstrumentType::MutualFund),
        ]
    }
}

impl Default for RuleClassifier {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

impl InstrumentClassifier for RuleClassifier {
    fn classify(&self, ticker: &str) -> InstrumentType {
        let upper = ticker.to_uppercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&upper))
            .map(|rule| rule.instrument_type)
            .unwrap_or(InstrumentType::Equity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_cover_each_type() {
        let c = RuleClassifier::default();
        assert_eq!(c.classify("00DS30"), InstrumentType::Index);
        assert_eq!(c.classify("TB5Y0129"), InstrumentType::TreasuryBill);
        assert_eq!(c.classify("BEXGSUKUK"), InstrumentType::Sukuk);
        assert_eq!(c.classify("IBBLPBOND"), InstrumentType::Bond);
        assert_eq!(c.classify("GRAMEENS2MF"), InstrumentType::MutualFund);
        assert_eq!(c.classify("GP"), InstrumentType::Equity);
    }

    #[test]
    fn priority_order_resolves_multiple_matches() {
        let c = RuleClassifier::default();
        // Matches TB prefix and BOND substring; prefix rule is first.
        assert_eq!(c.classify("TBOND1"), InstrumentType::TreasuryBill);
        // Matches SUKUK and MF; SUKUK is first.
        assert_eq!(c.classify("MFSUKUK"), InstrumentType::Sukuk);
        // Index prefix wins over everything.
        assert_eq!(c.classify("00BONDMF"), InstrumentType::Index);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let c = RuleClassifier::default();
        assert_eq!(c.classify("tb91d"), InstrumentType::TreasuryBill);
        assert_eq!(c.classify("aibl1stimf"), InstrumentType::MutualFund);
    }

    #[test]
    fn prefix_rules_do_not_match_mid_string() {
        let c = RuleClassifier::default();
        assert_eq!(c.classify("ATB"), InstrumentType::Equity);
        assert_eq!(c.classify("A00"), InstrumentType::Equity);
    }

    #[test]
    fn empty_rule_set_is_all_equity() {
        let c = RuleClassifier::new(vec![]);
        assert_eq!(c.classify("00DSEX"), InstrumentType::Equity);
    }

    #[test]
    fn closures_are_classifiers() {
        let only_index = |t: &str| {
            if t == "IDX" { InstrumentType::Index } else { InstrumentType::Equity }
        };
        assert_eq!(only_index.classify("IDX"), InstrumentType::Index);
        assert_eq!(only_index.classify("ABC"), InstrumentType::Equity);
    }
}
