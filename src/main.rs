use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use coverage_gap::{export, seeds, EngineConfig, RankingPolicy, ScoringEngine, ScoringInput};

#[derive(Parser, Debug)]
#[command(
    name = "coverage-gap",
    about = "Score how well site pages cover a keyword set and rank the gaps"
)]
struct Cli {
    /// JSON bundle with site_corpus, keywords, competitor_corpus and market_interest.
    #[arg(long)]
    input: PathBuf,

    /// Extra seed keywords, one per line.
    #[arg(long)]
    seeds: Option<PathBuf>,

    /// Engine configuration (JSON). Defaults apply for missing fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the CSV / JSON exports.
    #[arg(long, default_value = "output")]
    out_dir: PathBuf,

    /// Ranking policy, overrides the configuration: demand-gap or commercial-fit.
    #[arg(long)]
    policy: Option<RankingPolicy>,

    /// Rows kept in the ranked export, overrides the configuration.
    #[arg(long)]
    top_n: Option<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if let Some(policy) = cli.policy {
        config.ranking.policy = policy;
    }
    if let Some(top_n) = cli.top_n {
        config.ranking.top_n = top_n;
    }

    let raw = std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read input {}", cli.input.display()))?;
    let mut input = ScoringInput::from_json_str(&raw)
        .with_context(|| format!("failed to parse input {}", cli.input.display()))?;
    if let Some(path) = &cli.seeds {
        let extra = seeds::load_seeds(path)
            .with_context(|| format!("failed to load seeds {}", path.display()))?;
        input.keywords.extend(extra);
    }

    let engine = ScoringEngine::new(Arc::new(config)).context("invalid configuration")?;
    let report = engine.run(&input).context("scoring run failed")?;
    let paths = export::write_report(&report, &cli.out_dir, &engine.config().export)?;

    println!(
        "policy {} | {} keywords x {} pages | {} competitor terms",
        report.ranking.policy(),
        report.matrix.n_rows(),
        report.matrix.n_cols(),
        report.competitor_terms.len()
    );
    for row in report.ranking.top().iter().take(10) {
        println!(
            "  {:<40} {:<14} priority {:>8.3}  max coverage {:.3}",
            row.keyword,
            row.intent.as_str(),
            row.action_priority,
            row.max_coverage
        );
    }
    println!("ranked table:   {}", paths.ranked.display());
    println!("raw matrix:     {}", paths.raw_matrix.display());
    println!("page gaps:      {}", paths.page_gaps.display());
    println!("heatmap:        {}", paths.coverage.display());
    println!("competitors:    {}", paths.competitor_terms.display());

    Ok(())
}
