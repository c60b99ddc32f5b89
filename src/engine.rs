//! One scoring run: matrix, ranking and gaps on the site side, term
//! extraction on the competitor side.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::classifier::CommercialClassifier;
use crate::competitor::{CompetitorCorpus, CompetitorExtractor, CompetitorTerm};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::export::{CoverageTable, RowSelection};
use crate::gaps::{GapDetector, PageGaps};
use crate::ranking::{MarketInterest, OpportunityRanker, RankedTable};
use crate::relevance::{PageCorpus, RelevanceMatrix, RelevanceMatrixBuilder};
use crate::vocabulary::VocabularyNormalizer;

/// Everything the collaborators hand to one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringInput {
    pub site_corpus: PageCorpus,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub competitor_corpus: CompetitorCorpus,
    #[serde(default)]
    pub market_interest: Option<MarketInterest>,
}

impl ScoringInput {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoringReport {
    pub matrix: RelevanceMatrix,
    pub ranking: RankedTable,
    /// Numeric sub-table of the top-N cut, for the heatmap.
    pub coverage: CoverageTable,
    pub page_gaps: Vec<PageGaps>,
    /// Empty when the competitor path had nothing to work with.
    pub competitor_terms: Vec<CompetitorTerm>,
}

/// Relevance & Opportunity Scoring Engine
///
/// Holds the read-only configuration and the structures derived from it, so
/// one engine can serve any number of runs, from any number of threads.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: Arc<EngineConfig>,
    normalizer: Arc<VocabularyNormalizer>,
    classifier: CommercialClassifier,
}

impl ScoringEngine {
    pub fn new(config: Arc<EngineConfig>) -> Result<Self> {
        config.validate()?;
        let normalizer = Arc::new(VocabularyNormalizer::new(&config.text));
        let classifier = CommercialClassifier::new(normalizer.clone(), &config.classifier);
        Ok(Self { config, normalizer, classifier })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &VocabularyNormalizer {
        &self.normalizer
    }

    pub fn classifier(&self) -> &CommercialClassifier {
        &self.classifier
    }

    /// Keyword × page coverage. Keywords are deduplicated first.
    pub fn relevance_matrix<S: AsRef<str>>(
        &self,
        corpus: &PageCorpus,
        keywords: &[S],
    ) -> Result<RelevanceMatrix> {
        let vocabulary = self.normalizer.normalize_keywords(keywords.iter().map(|k| k.as_ref()));
        RelevanceMatrixBuilder::new(&self.normalizer, &self.config.vectorizer)
            .build(corpus, &vocabulary)
    }

    pub fn rank(&self, matrix: &RelevanceMatrix, interest: Option<&MarketInterest>) -> RankedTable {
        OpportunityRanker::new(&self.normalizer, &self.classifier, &self.config.ranking)
            .rank(matrix, interest)
    }

    pub fn page_gaps(&self, table: &RankedTable) -> Vec<PageGaps> {
        GapDetector::new(&self.config.gaps).detect(table)
    }

    pub fn competitor_terms(&self, corpus: &CompetitorCorpus) -> Result<Vec<CompetitorTerm>> {
        CompetitorExtractor::new(&self.normalizer, &self.classifier, &self.config.competitor)
            .extract(corpus)
    }

    /// Run both paths. Only a matrix failure is returned as an error.
    pub fn run(&self, input: &ScoringInput) -> Result<ScoringReport> {
        let (site, competitor) = rayon::join(
            || self.site_path(input),
            || self.competitor_terms(&input.competitor_corpus),
        );
        let SiteAnalysis { matrix, ranking, coverage, page_gaps } = site?;

        let competitor_terms = match competitor {
            Ok(terms) => terms,
            Err(err) if !err.is_fatal() => {
                warn!(error = %err, "competitor analysis skipped");
                Vec::new()
            }
            Err(err) => return Err(err),
        };

        info!(
            keywords = matrix.n_rows(),
            pages = matrix.n_cols(),
            policy = %ranking.policy(),
            competitor_terms = competitor_terms.len(),
            "scoring run complete"
        );

        Ok(ScoringReport {
            matrix,
            ranking,
            coverage,
            page_gaps,
            competitor_terms,
        })
    }

    fn site_path(&self, input: &ScoringInput) -> Result<SiteAnalysis> {
        let matrix = self.relevance_matrix(&input.site_corpus, &input.keywords)?;
        let ranking = self.rank(&matrix, input.market_interest.as_ref());
        let coverage = CoverageTable::from_ranked(&ranking, RowSelection::Top);
        let page_gaps = self.page_gaps(&ranking);
        Ok(SiteAnalysis { matrix, ranking, coverage, page_gaps })
    }
}

struct SiteAnalysis {
    matrix: RelevanceMatrix,
    ranking: RankedTable,
    coverage: CoverageTable,
    page_gaps: Vec<PageGaps>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        let config = Arc::new(EngineConfig::default());
        let normalizer = Arc::new(VocabularyNormalizer::new(&config.text));
        let classifier = CommercialClassifier::new(normalizer.clone(), &config.classifier);
        Self { config, normalizer, classifier }
    }
}
