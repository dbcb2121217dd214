//! Wire types for the extraction report document.
//!
//! The report service returns a JSON array of extraction records, each
//! with its moon (and the moon's surveyed ore composition), the refinery
//! structure if known, and the mining observer ledger if telemetry exists.
//! Only the fields the reconciliation engine and the report need are
//! modelled here; everything else in the upstream payload is ignored.
//!
//! These structs are a faithful, unvalidated mirror of the payload. Use
//! [`crate::Extraction::from_record`] to obtain a validated domain entity.

use serde::{Deserialize, Deserializer, Serialize};

/// The full document returned by the report service.
pub type ReportDocument = Vec<ExtractionRecord>;

/// Decode a report document from raw JSON bytes.
///
/// # Errors
///
/// Returns the underlying [`serde_json::Error`] if the payload is not a
/// well-formed document.
pub fn decode_document(bytes: &[u8]) -> Result<ReportDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Deserialize `null` as the type's default.
///
/// Used on fields whose malformed values are skipped downstream, so a
/// `null` there drops one ore or ledger row instead of the whole document.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// One moon extraction as reported upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    /// Report-service record id.
    pub id: u64,
    /// Refinery running the extraction.
    #[serde(default)]
    pub structure_id: Option<i64>,
    /// Moon being extracted.
    #[serde(default)]
    pub moon_id: Option<u64>,
    /// When the extraction was started.
    pub extraction_start_time: String,
    /// When the chunk arrives and becomes minable.
    pub chunk_arrival_time: String,
    /// When an unfractured chunk decays on its own.
    #[serde(default)]
    pub natural_decay_time: Option<String>,
    /// The moon with its ore composition.
    pub moon: MoonRecord,
    /// The refinery, if the service could resolve it.
    #[serde(default)]
    pub structure: Option<StructureRecord>,
    /// Mining observer telemetry, if any exists.
    #[serde(default)]
    pub observer: Option<ObserverRecord>,
}

/// A moon and its survey report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoonRecord {
    /// Moon id.
    pub moon_id: u64,
    /// Moon display name.
    pub name: String,
    /// Survey report; absent for moons nobody has scanned.
    #[serde(default)]
    pub moon_report: Option<MoonReportRecord>,
}

/// A moon survey report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoonReportRecord {
    /// Ore types present on the moon, in document order.
    #[serde(default)]
    pub content: Vec<OreContentRecord>,
}

/// One ore type in a moon survey report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreContentRecord {
    /// Ore inventory type id.
    #[serde(rename = "typeID")]
    pub type_id: u32,
    /// Inventory group id; rarer moon ores live in higher groups.
    #[serde(rename = "groupID")]
    pub group_id: u32,
    /// Ore display name.
    #[serde(rename = "typeName", default, deserialize_with = "null_as_default")]
    pub type_name: String,
    /// Volume of one unit, in cubic meters.
    #[serde(default, deserialize_with = "null_as_default")]
    pub volume: rust_decimal::Decimal,
    /// Per-moon extraction rate of this ore.
    pub pivot: PivotRecord,
}

/// Join row between a moon and an ore type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRecord {
    /// Fraction of the extraction's volume made up of this ore.
    #[serde(default, deserialize_with = "null_as_default")]
    pub rate: RawRate,
}

/// A rate fraction as it appeared on the wire.
///
/// Upstream usually sends a decimal string (`"0.2345"`) but bare numbers
/// are accepted too. Parsing is deferred to the engine so a malformed rate
/// skips one ore rather than failing the whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRate {
    /// Textual rate.
    Text(String),
    /// Numeric rate.
    Number(serde_json::Number),
}

impl Default for RawRate {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl RawRate {
    /// The rate as text, suitable for decimal parsing.
    pub fn as_text(&self) -> String {
        match self {
            Self::Text(text) => text.trim().to_owned(),
            Self::Number(number) => number.to_string(),
        }
    }
}

/// An upwell structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureRecord {
    /// Structure id.
    pub structure_id: i64,
    /// Public structure info; absent if the service lacks docking rights.
    #[serde(default)]
    pub info: Option<StructureInfoRecord>,
}

/// Public info about a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureInfoRecord {
    /// Structure id as resolved by the info lookup (0 when unresolved).
    #[serde(default)]
    pub structure_id: i64,
    /// Structure display name.
    #[serde(default)]
    pub name: String,
}

/// A mining observer and its ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObserverRecord {
    /// Observer id.
    pub observer_id: i64,
    /// When the observer last reported.
    #[serde(default)]
    pub last_updated: Option<String>,
    /// Per-character, per-ore mining ledger rows.
    #[serde(default)]
    pub entries: Vec<LedgerEntryRecord>,
}

/// One mining-ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntryRecord {
    /// Ore type id as mined (may be an enriched variant).
    pub type_id: u32,
    /// Units mined.
    pub quantity: u64,
    /// When the row was last updated; empty when upstream sent `null`.
    #[serde(default, deserialize_with = "null_as_default")]
    pub last_updated: String,
    /// Character who mined it.
    #[serde(default)]
    pub character_id: Option<u64>,
}
