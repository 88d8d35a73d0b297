use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Matches the trailing segment of an IRI, e.g. `MONDO_0000001` in
/// `http://purl.obolibrary.org/obo/MONDO_0000001`.
fn iri_tail() -> Option<&'static Regex> {
    static IRI_TAIL: OnceLock<Option<Regex>> = OnceLock::new();
    IRI_TAIL
        .get_or_init(|| Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://\S*/(?P<tail>[^/]+)$").ok())
        .as_ref()
}

/// Value object for a compact identifier `prefix:localId`.
///
/// The prefix is kept as written; canonicalisation against known resources is
/// the job of [`super::PrefixRegistry`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Curie {
    prefix: String,
    local_id: String,
}

impl Curie {
    /// Builds a CURIE from an already split prefix and local identifier.
    pub fn new(prefix: impl Into<String>, local_id: impl Into<String>) -> Result<Self, CurieError> {
        let prefix = prefix.into().trim().replace('#', "");
        let local_id = local_id.into().trim().to_string();
        if prefix.is_empty() || local_id.is_empty() {
            return Err(CurieError::Invalid {
                value: format!("{prefix}:{local_id}"),
            });
        }
        Ok(Self { prefix, local_id })
    }

    /// Parses free text into a CURIE.
    ///
    /// Accepts the plain `prefix:local` form, OBO PURLs (`.../MONDO_0000001`),
    /// fragment variants (`...#orphanet:123`, `#mesh:D001`) and nested
    /// namespaces (`obo:mondo:0000001`, where the last two segments win).
    pub fn parse(text: &str) -> Result<Self, CurieError> {
        let invalid = || CurieError::Invalid {
            value: text.to_string(),
        };

        let trimmed = text.trim();
        let mut candidate = iri_tail()
            .and_then(|regex| regex.captures(trimmed))
            .and_then(|captures| captures.name("tail"))
            .map_or(trimmed, |tail| tail.as_str());

        if let Some((_, fragment)) = candidate.rsplit_once('#') {
            if fragment.contains(':') || fragment.contains('_') {
                candidate = fragment;
            }
        }

        let owned;
        if !candidate.contains(':') {
            let Some((prefix, local_id)) = candidate.split_once('_') else {
                return Err(invalid());
            };
            owned = format!("{prefix}:{local_id}");
            candidate = &owned;
        }

        let mut segments = candidate.rsplit(':');
        let local_id = segments.next().ok_or_else(invalid)?;
        let prefix = segments.next().ok_or_else(invalid)?;
        Self::new(prefix, local_id).map_err(|_| invalid())
    }

    /// Returns the prefix as written in the source text.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Returns the local identifier.
    #[must_use]
    pub fn local_id(&self) -> &str {
        &self.local_id
    }
}

impl Display for Curie {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.prefix, self.local_id)
    }
}

impl FromStr for Curie {
    type Err = CurieError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Curie {
    type Error = CurieError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Errors produced when parsing a [`Curie`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CurieError {
    /// The provided text has no recognisable prefix/local id split.
    #[error("invalid CURIE: {value}")]
    Invalid { value: String },
}
