use std::collections::BTreeMap;

/// Registry of the ontology prefixes a run knows about.
///
/// Canonical prefixes are lower case. Synonyms (`MeSH`, `ORDO`, `OMIMPS`, ...)
/// map onto a canonical prefix. Anything not registered is unknown.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PrefixRegistry {
    lookup: BTreeMap<String, String>,
}

impl PrefixRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the resources of the disease landscape.
    #[must_use]
    pub fn disease_landscape() -> Self {
        let mut registry = Self::new();
        for prefix in [
            "doid", "efo", "gard", "icd10", "icd11", "mesh", "mondo", "ncit", "omim.ps",
            "orphanet", "orphanet.ordo", "hp", "go", "chebi", "hgnc", "uberon",
        ] {
            registry.register(prefix);
        }
        registry.add_synonym("omimps", "omim.ps");
        registry.add_synonym("ordo", "orphanet.ordo");
        registry.add_synonym("icd10who", "icd10");
        registry.add_synonym("icd11foundation", "icd11");
        registry.add_synonym("hpo", "hp");
        registry
    }

    /// Registers a canonical prefix.
    pub fn register(&mut self, prefix: &str) {
        let canonical = fold(prefix);
        self.lookup.insert(canonical.clone(), canonical);
    }

    /// Registers `synonym` as an alternative spelling of `canonical`.
    ///
    /// The canonical prefix is registered as well if it was not yet known.
    pub fn add_synonym(&mut self, synonym: &str, canonical: &str) {
        self.register(canonical);
        self.lookup.insert(fold(synonym), fold(canonical));
    }

    /// Returns the canonical spelling of `prefix`, if it is known.
    #[must_use]
    pub fn canonicalize(&self, prefix: &str) -> Option<&str> {
        self.lookup.get(&fold(prefix)).map(String::as_str)
    }

    /// Returns `true` when the prefix (or one of its synonyms) is registered.
    #[must_use]
    pub fn contains(&self, prefix: &str) -> bool {
        self.canonicalize(prefix).is_some()
    }
}

fn fold(prefix: &str) -> String {
    prefix.trim().trim_matches('#').to_lowercase()
}
