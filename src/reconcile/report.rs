//! Tab separated reconciliation reports.
//!
//! For every tier three files are written, `<tier>_right_mappings.tsv`,
//! `<tier>_wrong_mappings.tsv` and `<tier>_novel_mappings.tsv`, next to a
//! single `maps_with_no_names.tsv`.

use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use tracing::info;

use super::verdict::{Contradiction, ReconciliationReport};
use crate::config::ReconcileConfig;
use crate::mapping::Mapping;
use crate::tabular::{Table, TableError};

pub const UNNAMED_FILE: &str = "maps_with_no_names.tsv";

const PREDICTION_COLUMNS: [&str; 6] = [
    "source identifier",
    "source name",
    "target prefix",
    "target identifier",
    "target name",
    "confidence",
];

const CONTRADICTION_COLUMNS: [&str; 9] = [
    "source identifier",
    "source name",
    "target prefix",
    "predicted identifier",
    "predicted name",
    "asserted for",
    "true identifier",
    "true name",
    "confidence",
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportWriter {
    output_dir: PathBuf,
    dated: bool,
}

impl From<&ReconcileConfig> for ReportWriter {
    fn from(config: &ReconcileConfig) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            dated: config.dated,
        }
    }
}

impl ReportWriter {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            dated: false,
        }
    }

    /// Writes into a `YYYY_MM_DD` sub directory of the output directory.
    #[must_use]
    pub fn dated(mut self, dated: bool) -> Self {
        self.dated = dated;
        self
    }

    #[must_use]
    pub fn directory(&self, date: NaiveDate) -> PathBuf {
        if self.dated {
            self.output_dir.join(date.format("%Y_%m_%d").to_string())
        } else {
            self.output_dir.clone()
        }
    }

    /// Writes the report for today and returns the directory used.
    pub fn write(&self, report: &ReconciliationReport) -> Result<PathBuf, TableError> {
        self.write_on(report, Local::now().date_naive())
    }

    pub fn write_on(
        &self,
        report: &ReconciliationReport,
        date: NaiveDate,
    ) -> Result<PathBuf, TableError> {
        let dir = self.directory(date);
        predictions_table(&report.unnamed).write(&dir.join(UNNAMED_FILE))?;
        for tier in &report.tiers {
            let file = |kind: &str| tier_file(&dir, &tier.tier, kind);
            predictions_table(&tier.confirmed).write(&file("right"))?;
            contradictions_table(&tier.contradicted).write(&file("wrong"))?;
            predictions_table(&tier.unverified).write(&file("novel"))?;
        }
        info!(dir = %dir.display(), tiers = report.tiers.len(), "reconciliation_report_written");
        Ok(dir)
    }
}

fn tier_file(dir: &Path, tier: &str, kind: &str) -> PathBuf {
    dir.join(format!("{tier}_{kind}_mappings.tsv"))
}

fn confidence(mapping: &Mapping) -> String {
    mapping
        .confidence
        .map(|confidence| confidence.to_string())
        .unwrap_or_default()
}

/// Rows in the layout predictions are read from.
#[must_use]
pub fn predictions_table(mappings: &[Mapping]) -> Table {
    let mut table = Table::new(PREDICTION_COLUMNS);
    for mapping in mappings {
        table.push_padded([
            mapping.source_id.clone(),
            mapping.source_name.clone().unwrap_or_default(),
            mapping.target_prefix.clone(),
            mapping.target_id.clone(),
            mapping.target_name.clone().unwrap_or_default(),
            confidence(mapping),
        ]);
    }
    table
}

/// Contradicted rows with the asserted targets joined by `", "`.
///
/// `asserted for` names the term the true ids belong to, which is the
/// predicted target for rows inheriting the verdict of their mirror.
#[must_use]
pub fn contradictions_table(rows: &[(Mapping, Contradiction)]) -> Table {
    let mut table = Table::new(CONTRADICTION_COLUMNS);
    for (mapping, contradiction) in rows {
        table.push_padded([
            mapping.source_id.clone(),
            mapping.source_name.clone().unwrap_or_default(),
            mapping.target_prefix.clone(),
            mapping.target_id.clone(),
            mapping.target_name.clone().unwrap_or_default(),
            contradiction.asserted_for(mapping).to_string(),
            contradiction.true_ids.join(", "),
            contradiction.true_names.join(", "),
            confidence(mapping),
        ]);
    }
    table
}
