//! Per-page gap report: which keywords a page misses and which it already owns.

use serde::Serialize;
use tracing::debug;

use crate::classifier::Intent;
use crate::config::GapConfig;
use crate::ranking::RankedTable;

/// How a single (keyword, page) cell reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageClass {
    /// Transactional keyword the page barely touches.
    CriticalGap,
    /// Commercial keyword the page barely touches.
    OpportunityGap,
    /// Keyword the page already covers well.
    Strength,
    Neutral,
}

/// Classify one cell. Low coverage is strictly below `low_coverage`, strength
/// is strictly above `high_coverage`.
pub fn classify_cell(similarity: f64, intent: Intent, config: &GapConfig) -> CoverageClass {
    if similarity < config.low_coverage {
        match intent {
            Intent::Transactional => return CoverageClass::CriticalGap,
            Intent::Commercial => return CoverageClass::OpportunityGap,
            _ => {}
        }
    }
    if similarity > config.high_coverage {
        CoverageClass::Strength
    } else {
        CoverageClass::Neutral
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Urgency {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapEntry {
    pub keyword: String,
    pub similarity: f64,
    pub commercial_weight: f64,
    pub urgency: Urgency,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrengthEntry {
    pub keyword: String,
    pub similarity: f64,
}

/// Gap report of one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageGaps {
    pub page: String,
    pub critical_gaps: Vec<GapEntry>,
    pub opportunity_gaps: Vec<GapEntry>,
    pub strengths: Vec<StrengthEntry>,
}

impl PageGaps {
    pub fn is_empty(&self) -> bool {
        self.critical_gaps.is_empty()
            && self.opportunity_gaps.is_empty()
            && self.strengths.is_empty()
    }
}

pub struct GapDetector<'a> {
    config: &'a GapConfig,
}

impl<'a> GapDetector<'a> {
    pub fn new(config: &'a GapConfig) -> Self {
        Self { config }
    }

    /// One report per page column, in column order, over every ranked keyword.
    ///
    /// Gaps are ordered by commercial weight, strengths by similarity, both
    /// descending and stable with respect to ranking order.
    pub fn detect(&self, table: &RankedTable) -> Vec<PageGaps> {
        table
            .pages()
            .iter()
            .enumerate()
            .map(|(col, page)| self.detect_page(table, col, page))
            .collect()
    }

    fn detect_page(&self, table: &RankedTable, col: usize, page: &str) -> PageGaps {
        let mut critical_gaps = Vec::new();
        let mut opportunity_gaps = Vec::new();
        let mut strengths = Vec::new();

        for row in table.all() {
            let similarity = match row.coverage.get(col) {
                Some(&s) => s,
                None => continue,
            };
            match classify_cell(similarity, row.intent, self.config) {
                CoverageClass::CriticalGap => {
                    critical_gaps.push(self.gap(&row.keyword, similarity, row.commercial_weight))
                }
                CoverageClass::OpportunityGap => {
                    opportunity_gaps.push(self.gap(&row.keyword, similarity, row.commercial_weight))
                }
                CoverageClass::Strength => strengths.push(StrengthEntry {
                    keyword: row.keyword.clone(),
                    similarity,
                }),
                CoverageClass::Neutral => {}
            }
        }

        for gaps in [&mut critical_gaps, &mut opportunity_gaps] {
            gaps.sort_by(|a, b| b.commercial_weight.total_cmp(&a.commercial_weight));
            gaps.truncate(self.config.max_gaps_per_page);
        }
        strengths.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
        strengths.truncate(self.config.max_strengths_per_page);

        debug!(
            page,
            critical = critical_gaps.len(),
            opportunity = opportunity_gaps.len(),
            strengths = strengths.len(),
            "page gaps"
        );

        PageGaps {
            page: page.to_string(),
            critical_gaps,
            opportunity_gaps,
            strengths,
        }
    }

    fn gap(&self, keyword: &str, similarity: f64, commercial_weight: f64) -> GapEntry {
        let urgency = if commercial_weight > self.config.high_urgency_weight {
            Urgency::High
        } else {
            Urgency::Medium
        };
        GapEntry {
            keyword: keyword.to_string(),
            similarity,
            commercial_weight,
            urgency,
        }
    }
}
