//! Property-based tests for the scoring engine.
//!
//! These check the invariants of the matrix, the classifier and the ranker
//! over generated corpora and keyword lists.

use std::sync::Arc;

use coverage_gap::{
    EngineConfig, Intent, PageCorpus, RankingPolicy, ScoringEngine, ScoringError, ScoringInput,
};
use proptest::prelude::*;

const WORDS: &[&str] = &[
    "colegio", "quito", "norte", "matricula", "pension", "historia", "bilingue",
    "cupos", "2026", "mejor", "deportes", "robotica", "inicial", "bachillerato",
    "de", "la", "en", "el",
];

const TRIGGERS: &[&str] = &["precio", "norte", "quito", "bilingue", "2026"];

/// Space-joined words from a small domain vocabulary, stopwords included.
fn text_strategy(max_words: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(prop::sample::select(WORDS), 1..=max_words).prop_map(|w| w.join(" "))
}

fn corpus_strategy() -> impl Strategy<Value = PageCorpus> {
    prop::collection::vec(text_strategy(12), 1..5).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| (format!("page-{i}"), text))
            .collect()
    })
}

fn keywords_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(text_strategy(3), 1..12)
}

fn input(site_corpus: PageCorpus, keywords: Vec<String>) -> ScoringInput {
    ScoringInput {
        site_corpus,
        keywords,
        ..Default::default()
    }
}

fn engine(policy: RankingPolicy, top_n: usize) -> ScoringEngine {
    let mut config = EngineConfig::default();
    config.ranking.policy = policy;
    config.ranking.top_n = top_n;
    ScoringEngine::new(Arc::new(config)).unwrap()
}

proptest! {
    #[test]
    fn similarity_is_within_unit_interval(
        corpus in corpus_strategy(),
        keywords in keywords_strategy(),
    ) {
        match ScoringEngine::default().relevance_matrix(&corpus, &keywords) {
            Ok(matrix) => {
                for (_, row) in matrix.iter_rows() {
                    for &value in row {
                        prop_assert!(
                            (0.0..=1.0).contains(&value),
                            "similarity {} out of range",
                            value
                        );
                    }
                }
            }
            Err(err) => prop_assert!(matches!(err, ScoringError::InsufficientData(_))),
        }
    }

    #[test]
    fn page_text_keyword_is_closest_to_its_page(
        corpus in corpus_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let texts: Vec<&String> = corpus.values().collect();
        let target = pick.index(texts.len());
        let keyword = texts[target].clone();
        if let Ok(matrix) = ScoringEngine::default().relevance_matrix(&corpus, &[keyword]) {
            let row = matrix.row(0).unwrap();
            let best = row.iter().copied().fold(0.0, f64::max);
            prop_assert!(row[target] >= best - 1e-9);
        }
    }

    #[test]
    fn weight_grows_with_added_triggers(
        base in text_strategy(3),
        trigger in prop::sample::select(TRIGGERS),
    ) {
        let engine = ScoringEngine::default();
        let classifier = engine.classifier();
        let extended = format!("{base} {trigger}");
        prop_assert!(classifier.weight(&extended) >= classifier.weight(&base));
        prop_assert!(classifier.weight(&base) >= 1.0);
    }

    #[test]
    fn intent_is_total_and_transactional_wins(base in text_strategy(4)) {
        let engine = ScoringEngine::default();
        let classifier = engine.classifier();
        prop_assert!(Intent::ALL.contains(&classifier.intent(&base)));
        let mixed = format!("mejor {base} matricula");
        prop_assert_eq!(classifier.intent(&mixed), Intent::Transactional);
    }

    #[test]
    fn ranking_is_deterministic_and_sorted(
        corpus in corpus_strategy(),
        keywords in keywords_strategy(),
        commercial in any::<bool>(),
    ) {
        let policy = if commercial {
            RankingPolicy::CommercialFit
        } else {
            RankingPolicy::DemandGap
        };
        let engine = engine(policy, 40);
        let run_input = input(corpus, keywords);
        if let Ok(first) = engine.run(&run_input) {
            let second = engine.run(&run_input).unwrap();
            prop_assert_eq!(&first.ranking, &second.ranking);
            for pair in first.ranking.all().windows(2) {
                prop_assert!(pair[0].action_priority >= pair[1].action_priority);
            }
        }
    }

    #[test]
    fn top_n_returns_min_of_n_and_keywords(
        corpus in corpus_strategy(),
        keywords in keywords_strategy(),
        top_n in 0usize..20,
    ) {
        let engine = engine(RankingPolicy::DemandGap, top_n);
        if let Ok(report) = engine.run(&input(corpus, keywords)) {
            prop_assert_eq!(report.ranking.top().len(), top_n.min(report.ranking.len()));
        }
    }

    #[test]
    fn empty_inputs_are_insufficient_data(
        keywords in keywords_strategy(),
        corpus in corpus_strategy(),
    ) {
        let engine = ScoringEngine::default();
        let no_pages = engine.run(&input(PageCorpus::new(), keywords));
        prop_assert!(matches!(no_pages, Err(ScoringError::InsufficientData(_))));
        let no_keywords = engine.run(&input(corpus, Vec::new()));
        prop_assert!(matches!(no_keywords, Err(ScoringError::InsufficientData(_))));
    }
}

#[test]
fn equal_priorities_keep_keyword_order() {
    let corpus: PageCorpus =
        [("Home".to_string(), "colegio quito".to_string())].into_iter().collect();
    let keywords = vec!["robotica".to_string(), "historia".to_string(), "deportes".to_string()];
    let report = ScoringEngine::default().run(&input(corpus, keywords)).unwrap();
    let order: Vec<&str> = report.ranking.all().iter().map(|r| r.keyword.as_str()).collect();
    assert_eq!(order, vec!["robotica", "historia", "deportes"]);
}
