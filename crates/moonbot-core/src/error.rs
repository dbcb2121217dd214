//! Error types for the `moonbot-core` crate.

use moonbot_types::{ExtractionId, OreTypeId};

/// Errors that can occur while loading the ore substitution table.
#[derive(Debug, thiserror::Error)]
pub enum OreTableError {
    /// Failed to read the table file from disk.
    #[error("failed to read ore table: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse the YAML content.
    #[error("failed to parse ore table YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// Two rows share the same source type id.
    #[error("duplicate ore table source id: {0}")]
    DuplicateSource(OreTypeId),

    /// A row uses the reserved unattributed id.
    #[error("ore table row {name:?} uses reserved type id 0")]
    UnattributedId {
        /// Display name of the offending row.
        name: String,
    },
}

impl From<serde_yml::Error> for OreTableError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Errors that can occur while reconciling an extraction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    /// Reconciliation was requested for an extraction that is not active.
    #[error("extraction {0} is not active")]
    NotActive(ExtractionId),

    /// Arithmetic overflow during a checked operation.
    #[error("arithmetic overflow reconciling extraction {0}")]
    ArithmeticOverflow(ExtractionId),
}
