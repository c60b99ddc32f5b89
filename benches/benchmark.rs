use std::hint::black_box;

use coverage_gap::{
    vectorizer::TfIdfVectorizer, EngineConfig, PageCorpus, ScoringEngine, ScoringInput,
    VocabularyNormalizer,
};
use criterion::{criterion_group, criterion_main, Criterion};

const WORDS: &[&str] = &[
    "colegio", "quito", "norte", "matricula", "pension", "historia", "bilingue", "cupos",
    "2026", "mejor", "deportes", "robotica", "inicial", "bachillerato", "tecnico",
    "informatica", "ingles", "excelencia", "seguridad", "visita", "agenda", "requisitos",
    "de", "la", "en", "el", "para", "con",
];

// deterministic pseudo-text, no rand dependency
fn text(seed: usize, len: usize) -> String {
    (0..len)
        .map(|i| WORDS[(seed * 31 + i * 17 + i * i) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn input(pages: usize, keywords: usize) -> ScoringInput {
    let site_corpus: PageCorpus = (0..pages).map(|p| (format!("page-{p}"), text(p, 400))).collect();
    ScoringInput {
        site_corpus,
        keywords: (0..keywords).map(|k| text(k + 1000, 1 + k % 3)).collect(),
        competitor_corpus: (0..5)
            .map(|c| (format!("https://rival-{c}.ec"), text(c + 5000, 800)))
            .collect(),
        market_interest: None,
    }
}

fn vectorize_benchmark(c: &mut Criterion) {
    let config = EngineConfig::default();
    let normalizer = VocabularyNormalizer::new(&config.text);
    let docs: Vec<String> = (0..50).map(|d| text(d, 400)).collect();

    c.bench_function("fit_transform_50_docs", |b| {
        b.iter(|| {
            TfIdfVectorizer::new(&normalizer, config.vectorizer.ngram_range)
                .fit_transform(black_box(&docs))
        })
    });
}

fn scoring_benchmark(c: &mut Criterion) {
    let engine = ScoringEngine::default();
    let small = input(8, 60);
    let large = input(40, 400);

    c.bench_function("run_8_pages_60_keywords", |b| b.iter(|| engine.run(black_box(&small))));
    c.bench_function("run_40_pages_400_keywords", |b| b.iter(|| engine.run(black_box(&large))));
}

criterion_group!(benches, vectorize_benchmark, scoring_benchmark);
criterion_main!(benches);
