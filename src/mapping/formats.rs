//! Flat-file correspondence formats.
//!
//! Two tabular layouts are understood:
//!
//! * biomappings style, `source identifier, source name, source prefix,
//!   target identifier, target name, target prefix` plus the optional
//!   `relation`, `confidence` and `source` columns. Matcher predictions use the
//!   same layout without `source prefix`;
//! * SSSOM style, `subject_id, subject_label, predicate_id, object_id,
//!   object_label, mapping_justification` plus an optional `confidence`.
//!
//! Identifiers are full CURIEs. Prefixes missing from the table are derived
//! from the identifier, and labels missing from the table are filled from the
//! [`NameResolver`] when one is given.

use crate::ontology::{Curie, NameResolver};
use crate::tabular::{Row, Table, TableError};

use super::entities::{Mapping, MatchPredicate};

pub const SOURCE_IDENTIFIER: &str = "source identifier";
pub const SOURCE_NAME: &str = "source name";
pub const SOURCE_PREFIX: &str = "source prefix";
pub const TARGET_IDENTIFIER: &str = "target identifier";
pub const TARGET_NAME: &str = "target name";
pub const TARGET_PREFIX: &str = "target prefix";
pub const RELATION: &str = "relation";
pub const CONFIDENCE: &str = "confidence";
pub const PROVENANCE: &str = "source";

pub const SUBJECT_ID: &str = "subject_id";
pub const SUBJECT_LABEL: &str = "subject_label";
pub const PREDICATE_ID: &str = "predicate_id";
pub const OBJECT_ID: &str = "object_id";
pub const OBJECT_LABEL: &str = "object_label";
pub const MAPPING_JUSTIFICATION: &str = "mapping_justification";

#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("row {row}: invalid confidence `{value}`")]
    Confidence { row: usize, value: String },
}

/// Reads biomappings-style rows, including matcher predictions.
pub fn read_biomappings(
    table: &Table,
    resolver: Option<&NameResolver>,
) -> Result<Vec<Mapping>, MappingError> {
    table
        .rows()
        .enumerate()
        .map(|(index, row)| {
            let source_id = row.require(SOURCE_IDENTIFIER)?;
            let target_id = row.require(TARGET_IDENTIFIER)?;
            Ok(Mapping {
                source_id: source_id.trim().to_string(),
                source_name: label(&row, SOURCE_NAME, source_id, resolver),
                source_prefix: prefix(&row, SOURCE_PREFIX, source_id, resolver),
                target_id: target_id.trim().to_string(),
                target_name: label(&row, TARGET_NAME, target_id, resolver),
                target_prefix: prefix(&row, TARGET_PREFIX, target_id, resolver),
                predicate: row.non_empty(RELATION).map(MatchPredicate::from_curie),
                confidence: confidence(&row, index)?,
                provenance: row.non_empty(PROVENANCE).map(str::to_string),
            })
        })
        .collect()
}

/// Reads SSSOM-style rows.
pub fn read_sssom(
    table: &Table,
    resolver: Option<&NameResolver>,
) -> Result<Vec<Mapping>, MappingError> {
    table
        .rows()
        .enumerate()
        .map(|(index, row)| {
            let subject = row.require(SUBJECT_ID)?;
            let object = row.require(OBJECT_ID)?;
            Ok(Mapping {
                source_id: subject.trim().to_string(),
                source_name: label(&row, SUBJECT_LABEL, subject, resolver),
                source_prefix: derived_prefix(subject, resolver),
                target_id: object.trim().to_string(),
                target_name: label(&row, OBJECT_LABEL, object, resolver),
                target_prefix: derived_prefix(object, resolver),
                predicate: row.non_empty(PREDICATE_ID).map(MatchPredicate::from_curie),
                confidence: confidence(&row, index)?,
                provenance: row.non_empty(MAPPING_JUSTIFICATION).map(str::to_string),
            })
        })
        .collect()
}

/// Renders mappings in the biomappings layout.
#[must_use]
pub fn biomappings_table(mappings: &[Mapping]) -> Table {
    let mut table = Table::new([
        SOURCE_PREFIX,
        SOURCE_IDENTIFIER,
        SOURCE_NAME,
        RELATION,
        TARGET_PREFIX,
        TARGET_IDENTIFIER,
        TARGET_NAME,
        CONFIDENCE,
        PROVENANCE,
    ]);
    for mapping in mappings {
        table.push_padded([
            mapping.source_prefix.clone(),
            mapping.source_id.clone(),
            cell(mapping.source_name.as_deref()),
            cell(mapping.predicate.as_ref().map(MatchPredicate::as_curie)),
            mapping.target_prefix.clone(),
            mapping.target_id.clone(),
            cell(mapping.target_name.as_deref()),
            mapping.confidence.map(|c| c.to_string()).unwrap_or_default(),
            cell(mapping.provenance.as_deref()),
        ]);
    }
    table
}

/// Renders mappings in the SSSOM layout.
#[must_use]
pub fn sssom_table(mappings: &[Mapping]) -> Table {
    let mut table = Table::new([
        SUBJECT_ID,
        SUBJECT_LABEL,
        PREDICATE_ID,
        OBJECT_ID,
        OBJECT_LABEL,
        MAPPING_JUSTIFICATION,
        CONFIDENCE,
    ]);
    for mapping in mappings {
        table.push_padded([
            mapping.source_id.clone(),
            cell(mapping.source_name.as_deref()),
            cell(mapping.predicate.as_ref().map(MatchPredicate::as_curie)),
            mapping.target_id.clone(),
            cell(mapping.target_name.as_deref()),
            cell(mapping.provenance.as_deref()),
            mapping.confidence.map(|c| c.to_string()).unwrap_or_default(),
        ]);
    }
    table
}

pub fn sssom_to_biomappings(
    table: &Table,
    resolver: Option<&NameResolver>,
) -> Result<Table, MappingError> {
    Ok(biomappings_table(&read_sssom(table, resolver)?))
}

pub fn biomappings_to_sssom(
    table: &Table,
    resolver: Option<&NameResolver>,
) -> Result<Table, MappingError> {
    Ok(sssom_table(&read_biomappings(table, resolver)?))
}

/// Keeps the mappings whose predicate is one of `predicates`.
#[must_use]
pub fn retain_predicates(mappings: Vec<Mapping>, predicates: &[MatchPredicate]) -> Vec<Mapping> {
    mappings
        .into_iter()
        .filter(|mapping| {
            mapping
                .predicate
                .as_ref()
                .is_some_and(|predicate| predicates.contains(predicate))
        })
        .collect()
}

fn cell(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

fn label(row: &Row<'_>, column: &str, id: &str, resolver: Option<&NameResolver>) -> Option<String> {
    row.non_empty(column)
        .or_else(|| resolver?.resolve(id))
        .map(str::to_string)
}

fn prefix(row: &Row<'_>, column: &str, id: &str, resolver: Option<&NameResolver>) -> String {
    row.non_empty(column).map_or_else(
        || derived_prefix(id, resolver),
        |prefix| prefix.trim().to_lowercase(),
    )
}

fn derived_prefix(id: &str, resolver: Option<&NameResolver>) -> String {
    let Ok(curie) = Curie::parse(id) else {
        return id.split(':').next().unwrap_or_default().trim().to_lowercase();
    };
    resolver
        .and_then(|resolver| resolver.registry().canonicalize(curie.prefix()))
        .map_or_else(|| curie.prefix().to_lowercase(), str::to_string)
}

fn confidence(row: &Row<'_>, index: usize) -> Result<Option<f64>, MappingError> {
    row.non_empty(CONFIDENCE)
        .map(|value| {
            value.trim().parse().map_err(|_| MappingError::Confidence {
                row: index + 1,
                value: value.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ontology::{NameTable, PrefixRegistry};

    fn resolver() -> NameResolver {
        let mut mondo = NameTable::new("mondo");
        mondo.insert("0000001", "disease");
        NameResolver::new(PrefixRegistry::disease_landscape()).with_table(mondo)
    }

    #[test]
    fn predictions_derive_source_prefix() {
        let table = Table::parse(
            "source identifier\tsource name\ttarget prefix\ttarget identifier\ttarget name\tconfidence\n\
             MONDO:0000001\tdisease\tdoid\tDOID:4\t\t0.93\n",
        )
        .expect("table");

        let mappings = read_biomappings(&table, None).expect("mappings");
        assert_eq!(mappings.len(), 1);
        let mapping = &mappings[0];
        assert_eq!(mapping.source_prefix, "mondo");
        assert_eq!(mapping.target_prefix, "doid");
        assert_eq!(mapping.target_name, None);
        assert_eq!(mapping.confidence, Some(0.93));
        assert_eq!(mapping.predicate, None);
    }

    #[test]
    fn sssom_labels_are_filled_from_the_resolver() {
        let table = Table::parse(
            "subject_id\tsubject_label\tpredicate_id\tobject_id\tobject_label\tmapping_justification\n\
             DOID:4\tdisease\tskos:exactMatch\tmondo:0000001\t\tsemapv:ManualMappingCuration\n",
        )
        .expect("table");

        let mappings = read_sssom(&table, Some(&resolver())).expect("mappings");
        assert_eq!(mappings[0].source_prefix, "doid");
        assert_eq!(mappings[0].target_name.as_deref(), Some("disease"));
        assert_eq!(mappings[0].predicate, Some(MatchPredicate::Exact));
        assert_eq!(
            mappings[0].provenance.as_deref(),
            Some("semapv:ManualMappingCuration")
        );
    }

    #[test]
    fn converts_sssom_to_biomappings() {
        let table = Table::parse(
            "subject_id\tsubject_label\tpredicate_id\tobject_id\tobject_label\tmapping_justification\n\
             mesh:D1\tfever\tskos:broadMatch\tmondo:0000001\tdisease\t\n",
        )
        .expect("table");

        let converted = sssom_to_biomappings(&table, None).expect("converted");
        let rows: Vec<_> = converted.rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(SOURCE_PREFIX), Some("mesh"));
        assert_eq!(rows[0].get(RELATION), Some("skos:broadMatch"));
        assert_eq!(rows[0].get(TARGET_NAME), Some("disease"));
        assert_eq!(rows[0].get(CONFIDENCE), Some(""));

        let back = biomappings_to_sssom(&converted, None).expect("round trip");
        let rows: Vec<_> = back.rows().collect();
        assert_eq!(rows[0].get(SUBJECT_ID), Some("mesh:D1"));
        assert_eq!(rows[0].get(PREDICATE_ID), Some("skos:broadMatch"));
        assert_eq!(rows[0].get(OBJECT_LABEL), Some("disease"));
    }

    #[test]
    fn invalid_confidence_is_reported() {
        let table = Table::parse(
            "source identifier\ttarget identifier\tconfidence\nmondo:1\tdoid:2\thigh\n",
        )
        .expect("table");
        let err = read_biomappings(&table, None).expect_err("invalid confidence");
        assert!(matches!(err, MappingError::Confidence { row: 1, .. }));
    }

    #[test]
    fn missing_identifier_column_is_an_error() {
        let table = Table::parse("source identifier\nmondo:1\n").expect("table");
        assert!(matches!(
            read_biomappings(&table, None),
            Err(MappingError::Table(TableError::MissingColumn(_)))
        ));
    }

    #[test]
    fn predicate_filter() {
        let exact = Mapping::new("a:1", "a", "b:1", "b").with_predicate(MatchPredicate::Exact);
        let broad = Mapping::new("a:2", "a", "b:2", "b").with_predicate(MatchPredicate::Broad);
        let bare = Mapping::new("a:3", "a", "b:3", "b");
        let kept = retain_predicates(
            vec![exact, broad.clone(), bare],
            &[MatchPredicate::Broad, MatchPredicate::Narrow],
        );
        assert_eq!(kept, vec![broad]);
    }
}
