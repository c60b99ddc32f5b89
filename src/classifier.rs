//! Commercial weight and funnel-stage intent of a keyword.
//!
//! Both are pure substring rules over the canonical keyword text, evaluated
//! on the full phrase. The same classifier annotates matrix rows and
//! competitor terms.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierConfig;
use crate::vocabulary::VocabularyNormalizer;

/// Funnel stage implied by a search term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    /// Ready to act (enrol, pay, book).
    Transactional,
    /// Comparing options.
    Commercial,
    /// Researching.
    Informational,
    /// No rule matched.
    Generic,
}

impl Intent {
    pub const ALL: [Intent; 4] = [
        Intent::Transactional,
        Intent::Commercial,
        Intent::Informational,
        Intent::Generic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::Transactional => "TRANSACTIONAL",
            Intent::Commercial => "COMMERCIAL",
            Intent::Informational => "INFORMATIONAL",
            Intent::Generic => "GENERIC",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the ordered intent rule list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentRule {
    pub intent: Intent,
    pub triggers: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: Intent, triggers: Vec<String>) -> Self {
        Self { intent, triggers }
    }
}

/// trigger substring -> multiplier, triggers in canonical form.
#[derive(Debug, Clone, Default)]
pub struct WeightTable {
    entries: Vec<(String, f64)>,
}

impl WeightTable {
    pub fn new(normalizer: &VocabularyNormalizer, weights: &IndexMap<String, f64>) -> Self {
        let entries = weights
            .iter()
            .map(|(trigger, weight)| (normalizer.canonical(trigger), *weight))
            .filter(|(trigger, _)| !trigger.is_empty())
            .collect();
        Self { entries }
    }

    /// Highest multiplier among the triggers contained in `canonical`, 1.0 when none.
    pub fn weight(&self, canonical: &str) -> f64 {
        self.entries
            .iter()
            .filter(|(trigger, _)| canonical.contains(trigger.as_str()))
            .fold(1.0, |acc, (_, weight)| f64::max(acc, *weight))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered (intent, triggers) list; first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct IntentRules {
    rules: Vec<(Intent, Vec<String>)>,
}

impl IntentRules {
    pub fn new(normalizer: &VocabularyNormalizer, rules: &[IntentRule]) -> Self {
        let rules = rules
            .iter()
            .map(|rule| {
                let triggers = rule
                    .triggers
                    .iter()
                    .map(|t| normalizer.canonical(t))
                    .filter(|t| !t.is_empty())
                    .collect();
                (rule.intent, triggers)
            })
            .collect();
        Self { rules }
    }

    pub fn classify(&self, canonical: &str) -> Intent {
        self.rules
            .iter()
            .find(|(_, triggers)| triggers.iter().any(|t| canonical.contains(t.as_str())))
            .map(|(intent, _)| *intent)
            .unwrap_or(Intent::Generic)
    }
}

/// Weight and intent of one keyword.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KeywordProfile {
    pub commercial_weight: f64,
    pub intent: Intent,
}

/// Commercial Weight & Intent Classifier.
#[derive(Debug, Clone)]
pub struct CommercialClassifier {
    normalizer: Arc<VocabularyNormalizer>,
    weights: WeightTable,
    rules: IntentRules,
}

impl CommercialClassifier {
    pub fn new(normalizer: Arc<VocabularyNormalizer>, config: &ClassifierConfig) -> Self {
        let weights = WeightTable::new(&normalizer, &config.weights);
        let rules = IntentRules::new(&normalizer, &config.intent_rules);
        Self { normalizer, weights, rules }
    }

    pub fn weight(&self, keyword: &str) -> f64 {
        self.weights.weight(&self.normalizer.canonical(keyword))
    }

    pub fn intent(&self, keyword: &str) -> Intent {
        self.rules.classify(&self.normalizer.canonical(keyword))
    }

    pub fn profile(&self, keyword: &str) -> KeywordProfile {
        let canonical = self.normalizer.canonical(keyword);
        KeywordProfile {
            commercial_weight: self.weights.weight(&canonical),
            intent: self.rules.classify(&canonical),
        }
    }
}
