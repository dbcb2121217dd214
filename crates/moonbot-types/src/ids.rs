//! Type-safe identifier wrappers.
//!
//! Every identifier that crosses the report document boundary gets its own
//! newtype so that an ore type id can never be passed where a structure id
//! is expected. The numeric ids mirror the upstream game identifiers; the
//! only locally generated id is [`ReportId`], a UUID v7 that tags one
//! report-generation attempt for log correlation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a newtype wrapper around a numeric game identifier.
macro_rules! define_numeric_id {
    (
        $(#[$meta:meta])*
        $name:ident($inner:ty)
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub $inner);

        impl $name {
            /// Return the inner numeric value.
            pub const fn into_inner(self) -> $inner {
                self.0
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$inner> for $name {
            fn from(id: $inner) -> Self {
                Self(id)
            }
        }
    };
}

define_numeric_id! {
    /// Inventory type identifier of an ore.
    OreTypeId(u32)
}

define_numeric_id! {
    /// Identifier of a moon.
    MoonId(u64)
}

define_numeric_id! {
    /// Identifier of an upwell structure (refinery) anchored at a moon.
    StructureId(i64)
}

define_numeric_id! {
    /// Identifier of a mining observer attached to a structure.
    ObserverId(i64)
}

define_numeric_id! {
    /// Report-service identifier of a single extraction record.
    ExtractionId(u64)
}

impl OreTypeId {
    /// The id every ore type without a registered substitution maps to.
    ///
    /// Mined quantities attributed to this id cannot be matched against any
    /// moon composition and are dropped from reconciliation.
    pub const UNATTRIBUTED: Self = Self(0);

    /// Returns `true` if this is the [`Self::UNATTRIBUTED`] id.
    pub const fn is_unattributed(self) -> bool {
        self.0 == 0
    }
}

/// Identifier of one report-generation attempt (one trigger).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReportId(pub Uuid);

impl ReportId {
    /// Create a new identifier using UUID v7 (time-ordered).
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Return the inner [`Uuid`] value.
    pub const fn into_inner(self) -> Uuid {
        self.0
    }
}

impl Default for ReportId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for ReportId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_serialize_transparently() {
        let id = OreTypeId(45_492);
        let json = serde_json::to_string(&id).unwrap_or_default();
        assert_eq!(json, "45492");

        let back: Result<OreTypeId, _> = serde_json::from_str("45492");
        assert_eq!(back.ok(), Some(id));
    }

    #[test]
    fn unattributed_ore_type_is_zero() {
        assert!(OreTypeId::UNATTRIBUTED.is_unattributed());
        assert!(OreTypeId::default().is_unattributed());
        assert!(!OreTypeId(45_490).is_unattributed());
    }

    #[test]
    fn report_ids_are_unique() {
        let a = ReportId::new();
        let b = ReportId::new();
        assert_ne!(a, b);
        assert_eq!(a.into_inner().get_version_num(), 7);
    }

    #[test]
    fn display_matches_inner_value() {
        assert_eq!(StructureId(1_035_466_617_946).to_string(), "1035466617946");
        let report = ReportId::new();
        assert_eq!(report.to_string(), report.into_inner().to_string());
    }
}
