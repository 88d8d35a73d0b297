use std::collections::HashMap;
use std::fs;

use mapnet::{
    app::AppContext,
    config::Config,
    dataset::{DatasetKind, MatchClass, RelationDataset},
    mapping::{read_biomappings, Mapping, MatchPredicate},
    ontology::{
        Curie, GraphProvider, InMemoryResources, NameSource, OntologyGraph, PrefixRegistry, Term,
    },
    reconcile::EvidenceTier,
    tabular::Table,
    Error,
};

fn graph(prefix: &str, labels: &[(&str, &str)], edges: &[(&str, &str)]) -> OntologyGraph {
    let mut graph = OntologyGraph::new(prefix);
    for (local, label) in labels {
        graph
            .add_term(Term::new(Curie::new(prefix, *local).expect("curie")).with_label(*label))
            .expect("term");
    }
    for (narrower, broader) in edges {
        graph
            .add_broader(&format!("{prefix}:{narrower}"), &format!("{prefix}:{broader}"))
            .expect("edge");
    }
    graph
}

fn resources() -> InMemoryResources {
    InMemoryResources::new()
        .with_graph(graph(
            "mondo",
            &[("1", "disease"), ("2", "fever"), ("3", "relapsing fever")],
            &[("2", "1"), ("3", "2")],
        ))
        .with_graph(graph(
            "doid",
            &[("10", "disease"), ("20", "Fever"), ("30", "Relapsing Fever")],
            &[("20", "10"), ("30", "20")],
        ))
        .with_names(
            "orphanet.ordo",
            [("99".to_string(), "rare fever".to_string())],
        )
}

fn config(extra: &str) -> Config {
    format!(
        "resources:\n  - prefix: mondo\n  - prefix: doid\n  - prefix: orphanet\n    secondary: orphanet.ordo\nsynthesis:\n  seed: 11\n{extra}"
    )
    .parse()
    .expect("config")
}

fn context(extra: &str) -> AppContext {
    let resources = resources();
    AppContext::load(config(extra), PrefixRegistry::disease_landscape(), &resources, &resources)
        .expect("context")
}

fn exact(source: &str, target: &str) -> Mapping {
    Mapping::between(source, target)
        .expect("curies")
        .with_names(Some("fever"), Some("fever"))
        .with_predicate(MatchPredicate::Exact)
}

#[test]
fn context_loads_graphs_and_names() {
    let context = context("");

    assert_eq!(context.graphs.len(), 2);
    assert!(context.graphs.get("orphanet").is_none());
    assert_eq!(context.resolver.resolve("DOID:20"), Some("Fever"));
    assert_eq!(context.resolver.resolve("orphanet:99"), Some("rare fever"));
    assert_eq!(context.resolver.resolve("mondo:404"), None);
    assert_eq!(context.extractor().max_distance, 3);
}

#[test]
fn training_append_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("data").join("train.jsonl");
    let context = context("");
    let pool = vec![exact("mondo:2", "doid:20"), exact("mondo:3", "doid:30")];
    let known = vec![exact("mondo:3", "doid:20").with_predicate(MatchPredicate::Broad)];

    let (outcome, stats) = context
        .synthesize_training(&pool, &known, &path)
        .expect("first run");
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(stats.written, 3);
    assert!(outcome.counts.get(MatchClass::Narrow) >= 1);
    let first = fs::read_to_string(&path).expect("dataset");

    let (_, stats) = context
        .synthesize_training(&pool, &known, &path)
        .expect("second run");
    assert_eq!(stats.added(), 0);
    assert_eq!(fs::read_to_string(&path).expect("dataset"), first);

    let stored = RelationDataset::open(&path, DatasetKind::Training)
        .read()
        .expect("read");
    assert!(stored
        .iter()
        .flat_map(|record| record.target_name.as_deref())
        .all(|name| name == name.to_lowercase()));
}

#[test]
fn inference_rows_cannot_land_in_a_training_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("rows.jsonl");
    let context = context("inference:\n  edit_cutoff: 0.5\n");

    let (outcome, _) = context
        .synthesize_inference(&[exact("mondo:2", "doid:20"), exact("mondo:2", "mondo:2")], &path)
        .expect("inference");
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.skipped.self_mappings, 1);

    let err = context
        .synthesize_training(&[exact("mondo:2", "doid:20")], &[], &path)
        .expect_err("mixed dataset");
    assert!(matches!(err, Error::Dataset(err) if err.is_schema_violation()));
}

#[test]
fn reconciliation_reports_land_in_the_configured_directory() {
    let dir = tempfile::tempdir().expect("tempdir");
    let context = context(&format!(
        "reconcile:\n  output_dir: {}\n",
        dir.path().display()
    ));
    let predictions = Table::parse(
        "source identifier\tsource name\tsource prefix\ttarget identifier\ttarget name\ttarget prefix\tconfidence\n\
         mondo:2\tfever\tmondo\tdoid:20\tFever\tdoid\t0.8\n\
         doid:20\tFever\tdoid\tmondo:2\t\tmondo\t0.8\n\
         mondo:3\trelapsing fever\tmondo\tdoid:99\tother\tdoid\t0.4\n",
    )
    .expect("predictions");
    let predicted = read_biomappings(&predictions, Some(&context.resolver)).expect("mappings");
    let evidence = vec![
        Mapping::between("mondo:2", "doid:20")
            .expect("curies")
            .with_names(Some("fever"), Some("Fever")),
        Mapping::between("mondo:3", "doid:30")
            .expect("curies")
            .with_names(Some("relapsing fever"), Some("Relapsing Fever")),
    ];

    let (report, written) = context
        .reconcile_to_reports(predicted, vec![EvidenceTier::new("curated", evidence)])
        .expect("reconcile");

    assert_eq!(written, dir.path());
    assert!(report.unnamed.is_empty());
    assert_eq!(report.confirmed().count(), 2);
    assert_eq!(report.contradicted().count(), 1);
    assert!(report.novel().is_empty());
    let wrong = Table::read(&written.join("curated_wrong_mappings.tsv")).expect("report");
    let row = wrong.rows().next().expect("row");
    assert_eq!(row.get("true identifier"), Some("doid:30"));
}

/// Provider whose storage is unreachable.
struct Offline;

#[derive(Debug, thiserror::Error)]
#[error("ontology store offline")]
struct OfflineError;

impl GraphProvider for Offline {
    type Error = OfflineError;

    fn load_graph(
        &self,
        _prefix: &str,
        _version: Option<&str>,
    ) -> Result<Option<OntologyGraph>, Self::Error> {
        Err(OfflineError)
    }
}

impl NameSource for Offline {
    type Error = OfflineError;

    fn id_name_mapping(
        &self,
        _prefix: &str,
        _version: Option<&str>,
    ) -> Result<HashMap<String, String>, Self::Error> {
        Err(OfflineError)
    }
}

#[test]
fn collaborator_failures_surface_as_errors() {
    let err = AppContext::load(config(""), PrefixRegistry::new(), &Offline, &Offline)
        .expect_err("offline");
    assert!(matches!(err, Error::Any(_)));
    assert_eq!(err.to_string(), "ontology store offline");
}
