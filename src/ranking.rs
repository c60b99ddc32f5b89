//! Opportunity Ranker: merges coverage, commercial weight and market interest
//! into one priority per keyword.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::{CommercialClassifier, Intent};
use crate::config::RankingConfig;
use crate::relevance::RelevanceMatrix;
use crate::vocabulary::VocabularyNormalizer;

/// How `action_priority` is computed. Always chosen explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RankingPolicy {
    /// `market_interest × (1 − max_coverage)`: high demand, low coverage first.
    #[default]
    DemandGap,
    /// `commercial_weight × max_coverage`: best current fit first.
    CommercialFit,
}

impl RankingPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankingPolicy::DemandGap => "demand-gap",
            RankingPolicy::CommercialFit => "commercial-fit",
        }
    }

    /// Priority of one keyword under this policy.
    #[inline]
    pub fn priority(&self, market_interest: f64, commercial_weight: f64, max_coverage: f64) -> f64 {
        match self {
            RankingPolicy::DemandGap => market_interest * (1.0 - max_coverage),
            RankingPolicy::CommercialFit => commercial_weight * max_coverage,
        }
    }
}

impl fmt::Display for RankingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "demand-gap" => Ok(RankingPolicy::DemandGap),
            "commercial-fit" => Ok(RankingPolicy::CommercialFit),
            other => Err(format!(
                "unknown ranking policy '{other}', expected 'demand-gap' or 'commercial-fit'"
            )),
        }
    }
}

/// Per-keyword market interest in `[0, 100]` from the market intelligence source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MarketInterest {
    scores: IndexMap<String, f64>,
}

impl MarketInterest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a score, clamped into `[0, 100]`. Non-finite scores are ignored.
    pub fn insert(&mut self, keyword: impl Into<String>, score: f64) -> &mut Self {
        if score.is_finite() {
            self.scores.insert(keyword.into(), score.clamp(0.0, 100.0));
        }
        self
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Scores keyed by canonical keyword; the first entry of a canonical form wins.
    fn canonicalized(
        &self,
        normalizer: &VocabularyNormalizer,
    ) -> HashMap<String, f64, RandomState> {
        let mut out = HashMap::with_hasher(RandomState::new());
        for (keyword, score) in &self.scores {
            if score.is_finite() {
                out.entry(normalizer.canonical(keyword))
                    .or_insert(score.clamp(0.0, 100.0));
            }
        }
        out
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for MarketInterest {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut interest = MarketInterest::new();
        for (keyword, score) in iter {
            interest.insert(keyword, score);
        }
        interest
    }
}

/// One keyword of the ranked table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub keyword: String,
    /// Coverage per page, in page column order.
    pub coverage: Vec<f64>,
    pub intent: Intent,
    pub commercial_weight: f64,
    /// Interest used for the priority; `None` under [`RankingPolicy::CommercialFit`].
    pub market_interest: Option<f64>,
    pub max_coverage: f64,
    pub action_priority: f64,
}

/// Keywords sorted by priority, with the top-N cut kept alongside the full list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTable {
    pages: Vec<String>,
    policy: RankingPolicy,
    top_n: usize,
    rows: Vec<RankedRow>,
}

impl RankedTable {
    pub fn pages(&self) -> &[String] {
        &self.pages
    }

    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// First `min(top_n, len)` rows.
    pub fn top(&self) -> &[RankedRow] {
        &self.rows[..self.top_n.min(self.rows.len())]
    }

    /// Every keyword, ranked.
    pub fn all(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, keyword: &str) -> Option<&RankedRow> {
        self.rows.iter().find(|row| row.keyword == keyword)
    }
}

/// Opportunity Ranker
pub struct OpportunityRanker<'a> {
    normalizer: &'a VocabularyNormalizer,
    classifier: &'a CommercialClassifier,
    config: &'a RankingConfig,
}

impl<'a> OpportunityRanker<'a> {
    pub fn new(
        normalizer: &'a VocabularyNormalizer,
        classifier: &'a CommercialClassifier,
        config: &'a RankingConfig,
    ) -> Self {
        Self { normalizer, classifier, config }
    }

    /// Annotate, score and sort every matrix row.
    ///
    /// The sort is stable: equal priorities keep vocabulary order.
    pub fn rank(&self, matrix: &RelevanceMatrix, interest: Option<&MarketInterest>) -> RankedTable {
        let policy = self.config.policy;
        let lookup = interest.map(|i| i.canonicalized(self.normalizer)).unwrap_or_default();
        if policy == RankingPolicy::CommercialFit && !lookup.is_empty() {
            info!("market interest supplied but ignored by the commercial-fit policy");
        }

        let mut rows: Vec<RankedRow> = matrix
            .iter_rows()
            .map(|(keyword, coverage)| {
                let profile = self.classifier.profile(keyword);
                let max_coverage = coverage.iter().copied().fold(0.0, f64::max);
                let market_interest = match policy {
                    RankingPolicy::DemandGap => Some(
                        lookup
                            .get(&self.normalizer.canonical(keyword))
                            .copied()
                            .unwrap_or(self.config.default_interest),
                    ),
                    RankingPolicy::CommercialFit => None,
                };
                let action_priority = policy.priority(
                    market_interest.unwrap_or(self.config.default_interest),
                    profile.commercial_weight,
                    max_coverage,
                );
                RankedRow {
                    keyword: keyword.to_string(),
                    coverage: coverage.to_vec(),
                    intent: profile.intent,
                    commercial_weight: profile.commercial_weight,
                    market_interest,
                    max_coverage,
                    action_priority,
                }
            })
            .collect();

        // stable: ties keep vocabulary order
        rows.sort_by(|a, b| b.action_priority.total_cmp(&a.action_priority));

        info!(
            policy = policy.as_str(),
            keywords = rows.len(),
            top_n = self.config.top_n,
            scored_by_interest = lookup.len(),
            "ranked keywords"
        );

        RankedTable {
            pages: matrix.pages().to_vec(),
            policy,
            top_n: self.config.top_n,
            rows,
        }
    }
}
