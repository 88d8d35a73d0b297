use std::collections::HashSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;

use super::record::{DatasetKind, RelationRecord};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// A stored line does not match the dataset schema.
    #[error("{path}:{line}: schema violation: {reason}")]
    SchemaViolation {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// A row handed to `append` does not match the dataset kind.
    #[error("row {index}: schema violation: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("cannot read dataset `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write dataset `{path}`: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Encode(#[from] serde_json::Error),
}

impl DatasetError {
    #[must_use]
    pub fn is_schema_violation(&self) -> bool {
        matches!(self, Self::SchemaViolation { .. } | Self::InvalidRecord { .. })
    }
}

/// Counters of one append.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AppendStats {
    pub existing: usize,
    pub submitted: usize,
    pub written: usize,
}

impl AppendStats {
    /// Rows that were not in the file before.
    #[must_use]
    pub fn added(&self) -> usize {
        self.written.saturating_sub(self.existing)
    }
}

/// JSON Lines file of [`RelationRecord`]s with set semantics.
///
/// Every append rewrites the whole file: existing rows and new rows are
/// merged, names are case-folded, identical rows collapse to their first
/// occurrence, and the result replaces the file through a rename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RelationDataset {
    path: PathBuf,
    kind: DatasetKind,
}

impl RelationDataset {
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, kind: DatasetKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// Reads every stored row; a missing file is an empty dataset.
    pub fn read(&self) -> Result<Vec<RelationRecord>, DatasetError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(DatasetError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut records = Vec::new();
        for (index, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let violation = |reason: String| DatasetError::SchemaViolation {
                path: self.path.clone(),
                line: index + 1,
                reason,
            };
            let record: RelationRecord =
                serde_json::from_str(line).map_err(|err| violation(err.to_string()))?;
            if let Some(reason) = self.kind.violation(&record) {
                return Err(violation(reason.to_string()));
            }
            records.push(record);
        }
        Ok(records)
    }

    /// Merges `rows` into the stored dataset.
    ///
    /// Nothing is written when a new row or a stored line violates the schema.
    pub fn append(&self, rows: Vec<RelationRecord>) -> Result<AppendStats, DatasetError> {
        for (index, row) in rows.iter().enumerate() {
            if let Some(reason) = self.kind.violation(row) {
                return Err(DatasetError::InvalidRecord {
                    index,
                    reason: reason.to_string(),
                });
            }
        }

        let existing = self.read()?;
        let mut stats = AppendStats {
            existing: existing.len(),
            submitted: rows.len(),
            written: 0,
        };

        let mut seen = HashSet::new();
        let merged: Vec<RelationRecord> = existing
            .into_iter()
            .chain(rows)
            .map(RelationRecord::casefolded)
            .filter(|record| seen.insert(record.clone()))
            .collect();
        stats.written = merged.len();

        let mut content = String::new();
        for record in &merged {
            content.push_str(&serde_json::to_string(record)?);
            content.push('\n');
        }
        self.replace(&content)?;

        info!(
            path = %self.path.display(),
            existing = stats.existing,
            submitted = stats.submitted,
            written = stats.written,
            "dataset_appended"
        );
        Ok(stats)
    }

    fn replace(&self, content: &str) -> Result<(), DatasetError> {
        let write_err = |source| DatasetError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let staging = self.path.with_file_name(format!(".{file_name}.tmp"));
        let staged = fs::write(&staging, content).and_then(|()| fs::rename(&staging, &self.path));
        if staged.is_err() {
            let _ = fs::remove_file(&staging);
        }
        staged.map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::record::MatchClass;

    fn record(name: &str, class: Option<MatchClass>) -> RelationRecord {
        RelationRecord {
            source_id: "mondo:1".into(),
            source_name: Some(name.into()),
            source_prefix: "mondo".into(),
            target_id: "doid:1".into(),
            target_name: Some("fever".into()),
            target_prefix: "doid".into(),
            class,
            source_descendant_ids: vec![],
            source_descendant_names: vec![],
            target_descendant_ids: vec![],
            target_descendant_names: vec![],
            source_ancestor_ids: vec![],
            source_ancestor_names: vec![],
            target_ancestor_ids: vec![],
            target_ancestor_names: vec![],
            edit_similarity: "HIGH".into(),
        }
    }

    #[test]
    fn failed_replace_leaves_no_staging_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("train.jsonl");
        fs::create_dir_all(path.join("occupied")).expect("blocking directory");
        let dataset = RelationDataset::open(&path, DatasetKind::Training);

        let err = dataset.replace("{}\n").expect_err("rename onto a directory");
        assert!(matches!(err, DatasetError::Write { .. }));
        assert!(!dir.path().join(".train.jsonl.tmp").exists());
        assert!(path.is_dir());
    }

    #[test]
    fn appending_twice_keeps_one_row() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dataset = RelationDataset::open(dir.path().join("train.jsonl"), DatasetKind::Training);
        let row = record("Fever", Some(MatchClass::Exact));

        let first = dataset.append(vec![row.clone()]).expect("append");
        assert_eq!(first.written, 1);
        let second = dataset.append(vec![row.clone(), row]).expect("append");
        assert_eq!(second.existing, 1);
        assert_eq!(second.written, 1);
        assert_eq!(second.added(), 0);

        let stored = dataset.read().expect("read");
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].source_name.as_deref(), Some("fever"));
    }

    #[test]
    fn names_differing_only_in_case_collapse() {
        let dir = tempfile::tempdir().expect("tempdir");
        let dataset = RelationDataset::open(dir.path().join("train.jsonl"), DatasetKind::Training);
        let stats = dataset
            .append(vec![
                record("Fever", Some(MatchClass::Exact)),
                record("FEVER", Some(MatchClass::Exact)),
                record("fever", Some(MatchClass::Broad)),
            ])
            .expect("append");
        assert_eq!(stats.written, 2);
    }

    #[test]
    fn rows_of_the_wrong_kind_are_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("infer.jsonl");
        let dataset = RelationDataset::open(&path, DatasetKind::Inference);

        let err = dataset
            .append(vec![record("fever", None), record("fever", Some(MatchClass::Exact))])
            .expect_err("labelled inference row");
        assert!(err.is_schema_violation());
        assert!(matches!(err, DatasetError::InvalidRecord { index: 1, .. }));
        assert!(!path.exists());
    }

    #[test]
    fn corrupt_lines_stop_the_append() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("train.jsonl");
        fs::write(&path, "{\"source identifier\": 1}\n").expect("seed file");
        let dataset = RelationDataset::open(&path, DatasetKind::Training);

        let err = dataset
            .append(vec![record("fever", Some(MatchClass::Exact))])
            .expect_err("corrupt store");
        assert!(matches!(err, DatasetError::SchemaViolation { line: 1, .. }));
        assert_eq!(
            fs::read_to_string(&path).expect("unchanged"),
            "{\"source identifier\": 1}\n"
        );
    }
}
