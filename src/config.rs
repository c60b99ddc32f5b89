//! Engine configuration.
//!
//! Every table the engine consults (stopwords, commercial weights, intent
//! rules) lives here and is handed to the engine as immutable data, so several
//! configurations can score side by side.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::classifier::{Intent, IntentRule};
use crate::error::{Result, ScoringError};
use crate::ranking::RankingPolicy;

/// Inclusive n-gram range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NgramRange {
    pub min_n: usize,
    pub max_n: usize,
}

impl NgramRange {
    pub const fn new(min_n: usize, max_n: usize) -> Self {
        Self { min_n, max_n }
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.min_n == 0 || self.min_n > self.max_n {
            return Err(ScoringError::Config(format!(
                "{field}: invalid n-gram range ({}, {})",
                self.min_n, self.max_n
            )));
        }
        Ok(())
    }
}

/// Linguistic cleaning policy shared by every vectorization call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    /// Tokens dropped from document text before n-grams are formed.
    pub stopwords: Vec<String>,
    /// Fold accented letters to their base letter ("inscripción" -> "inscripcion").
    pub fold_accents: bool,
    /// Tokens shorter than this (in chars) never become features.
    pub min_token_chars: usize,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            stopwords: to_strings(SPANISH_STOPWORDS),
            fold_accents: true,
            min_token_chars: 2,
        }
    }
}

/// Parameters of the page/keyword vectorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    pub ngram_range: NgramRange,
    /// Keep only the most frequent features. `None` keeps all.
    pub max_features: Option<usize>,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            ngram_range: NgramRange::new(1, 3),
            max_features: None,
        }
    }
}

/// Commercial weight table and ordered intent rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// trigger substring -> multiplier (>= 1.0)
    pub weights: IndexMap<String, f64>,
    /// Evaluated top to bottom, first match wins.
    pub intent_rules: Vec<IntentRule>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            weights: COMMERCIAL_WEIGHTS
                .iter()
                .map(|(trigger, weight)| (trigger.to_string(), *weight))
                .collect(),
            intent_rules: vec![
                IntentRule::new(Intent::Transactional, to_strings(TRANSACTIONAL_TRIGGERS)),
                IntentRule::new(Intent::Commercial, to_strings(COMMERCIAL_TRIGGERS)),
                IntentRule::new(Intent::Informational, to_strings(INFORMATIONAL_TRIGGERS)),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub policy: RankingPolicy,
    /// Market interest assumed for keywords the interest source did not score.
    pub default_interest: f64,
    /// Rows kept for presentation.
    pub top_n: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            policy: RankingPolicy::DemandGap,
            default_interest: 10.0,
            top_n: 40,
        }
    }
}

/// Per-page gap classification thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GapConfig {
    /// Below this similarity a keyword is missing from the page.
    pub low_coverage: f64,
    /// Above this similarity a keyword is a strength of the page.
    pub high_coverage: f64,
    /// Gaps whose commercial weight exceeds this are high urgency.
    pub high_urgency_weight: f64,
    pub max_gaps_per_page: usize,
    pub max_strengths_per_page: usize,
}

impl Default for GapConfig {
    fn default() -> Self {
        Self {
            low_coverage: 0.10,
            high_coverage: 0.20,
            high_urgency_weight: 1.3,
            max_gaps_per_page: 8,
            max_strengths_per_page: 3,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitorConfig {
    pub ngram_range: NgramRange,
    pub max_features: usize,
    /// Terms scoring at or below this are noise.
    pub min_score: f64,
    /// Terms shorter than this (in chars) are dropped.
    pub min_term_chars: usize,
    pub top_k: usize,
    /// Scale TF-IDF scores by the commercial weight.
    pub apply_commercial_weight: bool,
}

impl Default for CompetitorConfig {
    fn default() -> Self {
        Self {
            ngram_range: NgramRange::new(1, 2),
            max_features: 300,
            min_score: 0.05,
            min_term_chars: 3,
            top_k: 25,
            apply_commercial_weight: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Decimal places written for numeric cells.
    pub precision: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { precision: 4 }
    }
}

/// Complete configuration of a scoring engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub text: TextConfig,
    pub vectorizer: VectorizerConfig,
    pub classifier: ClassifierConfig,
    pub ranking: RankingConfig,
    pub gaps: GapConfig,
    pub competitor: CompetitorConfig,
    pub export: ExportConfig,
}

impl EngineConfig {
    /// Parse a JSON document; missing sections fall back to defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    /// Reject values the engine cannot score with.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.ngram_range.validate("vectorizer.ngram_range")?;
        self.competitor.ngram_range.validate("competitor.ngram_range")?;
        if self.text.min_token_chars == 0 {
            return Err(ScoringError::Config("text.min_token_chars must be at least 1".into()));
        }
        if self.vectorizer.max_features == Some(0) || self.competitor.max_features == 0 {
            return Err(ScoringError::Config("max_features must be positive".into()));
        }
        for (trigger, weight) in &self.classifier.weights {
            if trigger.trim().is_empty() {
                return Err(ScoringError::Config("empty commercial weight trigger".into()));
            }
            if !weight.is_finite() || *weight < 1.0 {
                return Err(ScoringError::Config(format!(
                    "commercial weight for '{trigger}' must be >= 1.0, got {weight}"
                )));
            }
        }
        let gaps = &self.gaps;
        if !(0.0..=1.0).contains(&gaps.low_coverage)
            || !(0.0..=1.0).contains(&gaps.high_coverage)
            || gaps.low_coverage > gaps.high_coverage
        {
            return Err(ScoringError::Config(format!(
                "gap thresholds must satisfy 0 <= low ({}) <= high ({}) <= 1",
                gaps.low_coverage, gaps.high_coverage
            )));
        }
        if !(0.0..=100.0).contains(&self.ranking.default_interest) {
            return Err(ScoringError::Config(format!(
                "ranking.default_interest must be within [0, 100], got {}",
                self.ranking.default_interest
            )));
        }
        if !self.competitor.min_score.is_finite() {
            return Err(ScoringError::Config("competitor.min_score must be finite".into()));
        }
        Ok(())
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

const SPANISH_STOPWORDS: &[&str] = &[
    "de", "la", "que", "el", "en", "y", "a", "los", "del", "se", "las",
    "por", "un", "para", "con", "no", "una", "su", "al", "lo", "como",
    "mas", "pero", "sus", "le", "ya", "o", "fue", "este", "ha", "si",
    "porque", "esta", "son", "entre", "muy", "sin", "sobre", "ser",
    "tiene", "tambien", "me", "hasta", "hay", "donde", "quien", "desde",
    "todo", "nos", "durante", "todos", "uno", "les", "ni", "contra",
    "otros", "ese", "eso", "ante", "ellos", "e", "esto", "mi", "antes",
    "algunos", "unos", "yo", "otro", "otras", "otra", "cual", "poco",
    "ella", "estar", "estos", "algunas", "algo", "nosotros", "mis", "tu",
    "tus", "te", "ti", "web", "sitio",
];

// 1.5 direct money, 1.3-1.4 urgency/action, 1.1-1.2 quality/authority/location
const COMMERCIAL_WEIGHTS: &[(&str, f64)] = &[
    ("precio", 1.5), ("costo", 1.5), ("pension", 1.5), ("matricula", 1.5),
    ("inscripcion", 1.5), ("admision", 1.5), ("cupo", 1.5), ("2026", 1.4),
    ("abiertas", 1.3), ("requisitos", 1.3), ("agenda", 1.3), ("visita", 1.3),
    ("contacto", 1.3), ("ubicacion", 1.2), ("norte", 1.2), ("quito", 1.1),
    ("excelencia", 1.2), ("bilingue", 1.2), ("ingles", 1.2), ("tecnico", 1.2),
    ("informatica", 1.2), ("seguridad", 1.2), ("bullying", 1.1),
];

const TRANSACTIONAL_TRIGGERS: &[&str] = &[
    "matricula", "inscripcion", "admision", "precio", "costo", "pension",
    "cupo", "pago", "comprar", "reservar", "agendar", "formulario", "solicitud",
];

const COMMERCIAL_TRIGGERS: &[&str] = &[
    "mejor", "comparar", "comparativa", "opiniones", "ranking", "recomendad",
    "bilingue", "ingles", "cambridge", "excelencia", "calidad", "tecnico",
];

const INFORMATIONAL_TRIGGERS: &[&str] = &[
    "que es", "como", "historia", "guia", "significado", "beneficios",
    "por que", "cuando", "donde", "tipos", "consejos", "informacion",
    "requisitos",
];
