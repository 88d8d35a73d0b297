use std::collections::HashMap;

use tracing::{debug, warn};

use super::registry::PrefixRegistry;
use super::repositories::NameSource;
use super::value_objects::Curie;
use crate::config::ResourceConfig;

/// Local id → label table of one namespace.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NameTable {
    namespace: String,
    version: Option<String>,
    names: HashMap<String, String>,
}

impl NameTable {
    #[must_use]
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_names(mut self, names: HashMap<String, String>) -> Self {
        self.names = names;
        self
    }

    pub fn insert(&mut self, local_id: impl Into<String>, label: impl Into<String>) {
        self.names.insert(local_id.into(), label.into());
    }

    #[must_use]
    pub fn get(&self, local_id: &str) -> Option<&str> {
        self.names.get(local_id).map(String::as_str)
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Resolves CURIEs to labels across the configured namespaces.
///
/// Resolution is total: any failure (unparseable text, unknown prefix, id
/// missing from both the primary and the secondary table) yields `None`.
#[derive(Clone, Debug, Default)]
pub struct NameResolver {
    registry: PrefixRegistry,
    tables: HashMap<String, NameTable>,
    secondary: HashMap<String, String>,
}

impl NameResolver {
    #[must_use]
    pub fn new(registry: PrefixRegistry) -> Self {
        Self {
            registry,
            tables: HashMap::new(),
            secondary: HashMap::new(),
        }
    }

    /// Registers the primary table of a namespace.
    ///
    /// Namespaces unknown to the registry are registered on the fly.
    #[must_use]
    pub fn with_table(mut self, table: NameTable) -> Self {
        self.insert_table(table);
        self
    }

    /// Declares `namespace` as the fallback table for `prefix`.
    #[must_use]
    pub fn with_secondary(mut self, prefix: &str, namespace: &str) -> Self {
        let key = self.canonical_or_registered(prefix);
        let namespace = self.canonical_or_registered(namespace);
        self.secondary.insert(key, namespace);
        self
    }

    pub fn insert_table(&mut self, table: NameTable) {
        let key = self.canonical_or_registered(table.namespace());
        self.tables.insert(key, table);
    }

    fn canonical_or_registered(&mut self, prefix: &str) -> String {
        if let Some(canonical) = self.registry.canonicalize(prefix) {
            return canonical.to_string();
        }
        self.registry.register(prefix);
        self.registry
            .canonicalize(prefix)
            .map_or_else(|| prefix.to_lowercase(), str::to_string)
    }

    /// Builds the resolver for the configured resources.
    ///
    /// Each resource contributes its primary table and, when configured, its
    /// secondary namespace table.
    pub fn load<S: NameSource>(
        registry: PrefixRegistry,
        resources: &[ResourceConfig],
        source: &S,
    ) -> Result<Self, S::Error> {
        let mut resolver = Self::new(registry);
        for resource in resources {
            let version = resource.version.as_deref();
            let names = source.id_name_mapping(&resource.prefix, version)?;
            if names.is_empty() {
                warn!(prefix = %resource.prefix, version = ?version, "name_table_empty");
            }
            debug!(prefix = %resource.prefix, names = names.len(), "name_table_loaded");
            let mut table = NameTable::new(resource.prefix.as_str()).with_names(names);
            if let Some(version) = version {
                table = table.with_version(version);
            }
            resolver.insert_table(table);

            if let Some(namespace) = resource.secondary.as_deref() {
                let names = source.id_name_mapping(namespace, version)?;
                debug!(prefix = %resource.prefix, namespace, names = names.len(), "secondary_name_table_loaded");
                resolver.insert_table(NameTable::new(namespace).with_names(names));
                resolver = resolver.with_secondary(&resource.prefix, namespace);
            }
        }
        Ok(resolver)
    }

    /// Returns the label of `curie`, or `None` when it cannot be resolved.
    #[must_use]
    pub fn resolve(&self, curie: &str) -> Option<&str> {
        let curie = Curie::parse(curie).ok()?;
        let prefix = self.registry.canonicalize(curie.prefix())?;
        self.lookup(prefix, curie.local_id()).or_else(|| {
            let fallback = self.secondary.get(prefix)?;
            self.lookup(fallback, curie.local_id())
        })
    }

    fn lookup(&self, namespace: &str, local_id: &str) -> Option<&str> {
        self.tables.get(namespace)?.get(local_id)
    }

    /// Returns the prefix registry backing the resolver.
    #[must_use]
    pub fn registry(&self) -> &PrefixRegistry {
        &self.registry
    }
}
