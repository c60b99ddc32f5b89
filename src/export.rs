//! Plain tabular output: CSV for the matrices, JSON for the term and gap lists.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::config::ExportConfig;
use crate::engine::ScoringReport;
use crate::error::Result;
use crate::ranking::RankedTable;
use crate::relevance::RelevanceMatrix;

pub const RAW_MATRIX_FILE: &str = "coverage_matrix_raw.csv";
pub const RANKED_FILE: &str = "coverage_ranked.csv";
pub const COMPETITOR_FILE: &str = "competitor_terms.json";
pub const PAGE_GAPS_FILE: &str = "page_gaps.json";
pub const COVERAGE_FILE: &str = "coverage_heatmap.csv";

/// Which rows of a ranked table to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSelection {
    /// The top-N cut.
    Top,
    All,
}

/// Numeric keyword × page sub-table, ready for a heatmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageTable {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CoverageTable {
    pub fn from_ranked(table: &RankedTable, selection: RowSelection) -> Self {
        let rows = match selection {
            RowSelection::Top => table.top(),
            RowSelection::All => table.all(),
        };
        Self {
            rows: rows.iter().map(|r| r.keyword.clone()).collect(),
            columns: table.pages().to_vec(),
            values: rows.iter().map(|r| r.coverage.clone()).collect(),
        }
    }

    pub fn from_matrix(matrix: &RelevanceMatrix) -> Self {
        Self {
            rows: matrix.keywords().to_vec(),
            columns: matrix.pages().to_vec(),
            values: matrix.iter_rows().map(|(_, row)| row.to_vec()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CsvExporter {
    precision: usize,
}

impl CsvExporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self { precision: config.precision }
    }

    /// `keyword, <pages..>, intent, commercial_weight, max_coverage, action_priority`
    pub fn write_ranked<W: Write>(
        &self,
        table: &RankedTable,
        selection: RowSelection,
        writer: W,
    ) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = Vec::with_capacity(table.pages().len() + 5);
        header.push("keyword");
        header.extend(table.pages().iter().map(String::as_str));
        header.extend(["intent", "commercial_weight", "max_coverage", "action_priority"]);
        wtr.write_record(&header)?;

        let rows = match selection {
            RowSelection::Top => table.top(),
            RowSelection::All => table.all(),
        };
        for row in rows {
            let mut record = Vec::with_capacity(header.len());
            record.push(row.keyword.clone());
            record.extend(row.coverage.iter().map(|v| self.number(*v)));
            record.push(row.intent.to_string());
            record.push(self.number(row.commercial_weight));
            record.push(self.number(row.max_coverage));
            record.push(self.number(row.action_priority));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// `keyword, <pages..>` in vocabulary order, unsorted.
    pub fn write_matrix<W: Write>(&self, matrix: &RelevanceMatrix, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let header = std::iter::once("keyword").chain(matrix.pages().iter().map(String::as_str));
        wtr.write_record(header)?;
        for (keyword, row) in matrix.iter_rows() {
            let record = std::iter::once(keyword.to_string())
                .chain(row.iter().map(|v| self.number(*v)));
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    /// `keyword, <columns..>`, rows in table order.
    pub fn write_coverage<W: Write>(&self, table: &CoverageTable, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        let header = std::iter::once("keyword").chain(table.columns.iter().map(String::as_str));
        wtr.write_record(header)?;
        for (keyword, row) in table.rows.iter().zip(&table.values) {
            let record =
                std::iter::once(keyword.clone()).chain(row.iter().map(|v| self.number(*v)));
            wtr.write_record(record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn number(&self, value: f64) -> String {
        format!("{:.*}", self.precision, value)
    }
}

/// Pretty-printed JSON.
pub fn write_json<T, W>(value: &T, mut writer: W) -> Result<()>
where
    T: Serialize + ?Sized,
    W: Write,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Paths written by [`write_report`].
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub raw_matrix: PathBuf,
    pub ranked: PathBuf,
    pub competitor_terms: PathBuf,
    pub page_gaps: PathBuf,
    pub coverage: PathBuf,
}

/// Write every export of a run into `dir`, creating it when missing.
///
/// The ranked CSV and the heatmap hold the top-N cut, the raw matrix holds
/// every keyword.
pub fn write_report(
    report: &ScoringReport,
    dir: &Path,
    config: &ExportConfig,
) -> Result<ExportPaths> {
    fs::create_dir_all(dir)?;
    let paths = ExportPaths {
        raw_matrix: dir.join(RAW_MATRIX_FILE),
        ranked: dir.join(RANKED_FILE),
        competitor_terms: dir.join(COMPETITOR_FILE),
        page_gaps: dir.join(PAGE_GAPS_FILE),
        coverage: dir.join(COVERAGE_FILE),
    };

    let exporter = CsvExporter::new(config);
    exporter.write_matrix(&report.matrix, BufWriter::new(File::create(&paths.raw_matrix)?))?;
    exporter.write_ranked(
        &report.ranking,
        RowSelection::Top,
        BufWriter::new(File::create(&paths.ranked)?),
    )?;
    exporter.write_coverage(&report.coverage, BufWriter::new(File::create(&paths.coverage)?))?;
    write_json(&report.competitor_terms, BufWriter::new(File::create(&paths.competitor_terms)?))?;
    write_json(&report.page_gaps, BufWriter::new(File::create(&paths.page_gaps)?))?;

    info!(dir = %dir.display(), "exports written");
    Ok(paths)
}
