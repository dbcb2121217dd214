//! Ore yield mapping: raw mined ore type to canonical composition type.
//!
//! The observer ledger records the ore type a pilot actually pulled out of
//! the chunk, which may be an enriched variant (`Brimful Zeolites`,
//! `Glistening Zeolites`) of the base ore listed in the moon survey
//! (`Zeolites`). The [`OreVariantTable`] substitutes every known raw type
//! with the type it must be attributed to.
//!
//! The table is loaded once at startup and then only read, so a single
//! instance can be shared by every concurrent report without locking.
//! Identifiers with no registered substitution map to
//! [`OreTypeId::UNATTRIBUTED`]; callers drop those quantities.

use std::collections::BTreeMap;
use std::path::Path;

use moonbot_types::OreTypeId;
use serde::Deserialize;

use crate::error::OreTableError;

/// The substitution table bundled with the crate.
const BUILTIN_TABLE: &str = include_str!("../data/ore_variants.yaml");

/// One row of the substitution table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OreVariant {
    /// Ore type id as it appears in a ledger entry.
    pub source: OreTypeId,
    /// Display name of the source type.
    pub name: String,
    /// Ore type id to attribute the quantity to.
    pub destination: OreTypeId,
}

/// Immutable lookup from raw ore type to canonical ore type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OreVariantTable {
    by_source: BTreeMap<OreTypeId, OreVariant>,
}

impl OreVariantTable {
    /// Build a table from an ordered list of substitutions.
    ///
    /// # Errors
    ///
    /// Returns [`OreTableError::DuplicateSource`] if two rows share a
    /// source id, and [`OreTableError::UnattributedId`] if a row uses the
    /// reserved zero id on either side.
    pub fn from_variants(variants: Vec<OreVariant>) -> Result<Self, OreTableError> {
        let mut by_source = BTreeMap::new();
        for variant in variants {
            if variant.source.is_unattributed() || variant.destination.is_unattributed() {
                return Err(OreTableError::UnattributedId { name: variant.name });
            }
            let source = variant.source;
            if by_source.insert(source, variant).is_some() {
                return Err(OreTableError::DuplicateSource(source));
            }
        }
        Ok(Self { by_source })
    }

    /// Parse a table from YAML: a sequence of `{source, name, destination}`.
    ///
    /// # Errors
    ///
    /// Returns [`OreTableError::Yaml`] on malformed input, or any error
    /// from [`Self::from_variants`].
    pub fn parse(yaml: &str) -> Result<Self, OreTableError> {
        let variants: Vec<OreVariant> = serde_yml::from_str(yaml)?;
        Self::from_variants(variants)
    }

    /// Load a table from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`OreTableError::Io`] if the file cannot be read, or any
    /// error from [`Self::parse`].
    pub fn from_file(path: &Path) -> Result<Self, OreTableError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// The table shipped with the crate.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data file is itself malformed.
    pub fn builtin() -> Result<Self, OreTableError> {
        Self::parse(BUILTIN_TABLE)
    }

    /// Map a raw ore type to the type it is attributed to.
    ///
    /// Returns [`OreTypeId::UNATTRIBUTED`] for unregistered types.
    pub fn map_ore_type(&self, raw: OreTypeId) -> OreTypeId {
        self.by_source
            .get(&raw)
            .map_or(OreTypeId::UNATTRIBUTED, |v| v.destination)
    }

    /// Display name registered for a raw ore type.
    pub fn name_of(&self, raw: OreTypeId) -> Option<&str> {
        self.by_source.get(&raw).map(|v| v.name.as_str())
    }

    /// Number of registered substitutions.
    pub fn len(&self) -> usize {
        self.by_source.len()
    }

    /// Returns `true` if no substitutions are registered.
    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}
