//! Validated domain entities built from the wire document.
//!
//! An [`Extraction`] is constructed fresh from each fetched document and
//! never mutated afterwards. Construction only rejects records whose start
//! or arrival timestamps are unusable; every finer-grained anomaly
//! (malformed rate fraction, unparsable ledger timestamp, arrival before
//! start) is preserved so the engine can skip or flag it.

use std::str::FromStr;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::document::{ExtractionRecord, LedgerEntryRecord, OreContentRecord, RawRate};
use crate::ids::{ExtractionId, MoonId, ObserverId, OreTypeId, StructureId};
use crate::timestamp::{TimestampError, parse_timestamp};

/// One mining operation on one moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    /// Report-service record id.
    pub id: ExtractionId,
    /// When the extraction was started.
    pub started_at: NaiveDateTime,
    /// When the chunk arrives.
    pub chunk_arrival: NaiveDateTime,
    /// When the chunk decays naturally, if the service reported it.
    pub natural_decay: Option<NaiveDateTime>,
    /// The moon being extracted.
    pub moon: Moon,
    /// The refinery, when known.
    pub structure: Option<StructureInfo>,
    /// Observer ledger, present only if telemetry exists.
    pub ledger: Option<ObserverLedger>,
}

/// A moon and its ore composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Moon {
    /// Moon id.
    pub id: MoonId,
    /// Moon display name.
    pub name: String,
    /// Surveyed ore composition.
    pub composition: MoonComposition,
}

/// Ordered ore composition of a moon.
///
/// Rate fractions are supplied per ore and need not sum to one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoonComposition {
    /// Ores in document order.
    pub ores: Vec<OreEntry>,
}

/// One ore type in a moon's composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreEntry {
    /// Ore type id.
    pub type_id: OreTypeId,
    /// Display name.
    pub name: String,
    /// Rarity/group rank; higher is more valuable.
    pub group_rank: u32,
    /// Volume of one unit, in cubic meters.
    pub unit_volume: Decimal,
    /// Rate fraction exactly as received.
    pub raw_rate: String,
}

impl OreEntry {
    /// Parse the rate fraction.
    ///
    /// Returns `None` for text that is not a decimal number and for
    /// negative values; callers skip such entries.
    pub fn rate_fraction(&self) -> Option<Decimal> {
        let text = self.raw_rate.trim();
        Decimal::from_str(text)
            .or_else(|_plain| Decimal::from_scientific(text))
            .ok()
            .filter(|rate| !rate.is_sign_negative())
    }
}

/// Public identity of the refinery running an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureInfo {
    /// Structure id as resolved by the info lookup.
    pub id: StructureId,
    /// Structure display name.
    pub name: String,
}

/// Mining telemetry recorded by a structure's observer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObserverLedger {
    /// Observer id.
    pub observer_id: ObserverId,
    /// Ledger rows.
    pub entries: Vec<LedgerEntry>,
}

/// One mining-ledger row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Ore type id as mined; may be an enriched variant.
    pub type_id: OreTypeId,
    /// Units mined.
    pub quantity: u64,
    /// Last-updated timestamp exactly as received.
    pub last_updated: String,
}

impl From<&LedgerEntryRecord> for LedgerEntry {
    fn from(record: &LedgerEntryRecord) -> Self {
        Self {
            type_id: OreTypeId(record.type_id),
            quantity: record.quantity,
            last_updated: record.last_updated.clone(),
        }
    }
}

impl From<&OreContentRecord> for OreEntry {
    fn from(record: &OreContentRecord) -> Self {
        Self {
            type_id: OreTypeId(record.type_id),
            name: record.type_name.clone(),
            group_rank: record.group_id,
            unit_volume: record.volume,
            raw_rate: match &record.pivot.rate {
                RawRate::Text(text) => text.clone(),
                rate @ RawRate::Number(_) => rate.as_text(),
            },
        }
    }
}

impl Extraction {
    /// Build a validated extraction from a wire record.
    ///
    /// # Errors
    ///
    /// Returns [`TimestampError`] if the start or arrival time cannot be
    /// parsed. An unparsable natural decay time is dropped to `None`.
    pub fn from_record(record: &ExtractionRecord) -> Result<Self, TimestampError> {
        let started_at = parse_timestamp("extraction_start_time", &record.extraction_start_time)?;
        let chunk_arrival = parse_timestamp("chunk_arrival_time", &record.chunk_arrival_time)?;
        let natural_decay = record
            .natural_decay_time
            .as_deref()
            .and_then(|raw| parse_timestamp("natural_decay_time", raw).ok());

        let composition = MoonComposition {
            ores: record
                .moon
                .moon_report
                .as_ref()
                .map(|report| report.content.iter().map(OreEntry::from).collect())
                .unwrap_or_default(),
        };

        let structure = record
            .structure
            .as_ref()
            .and_then(|s| s.info.as_ref())
            .filter(|info| info.structure_id > 0)
            .map(|info| StructureInfo {
                id: StructureId(info.structure_id),
                name: info.name.clone(),
            });

        let ledger = record.observer.as_ref().map(|observer| ObserverLedger {
            observer_id: ObserverId(observer.observer_id),
            entries: observer.entries.iter().map(LedgerEntry::from).collect(),
        });

        Ok(Self {
            id: ExtractionId(record.id),
            started_at,
            chunk_arrival,
            natural_decay,
            moon: Moon {
                id: MoonId(record.moon.moon_id),
                name: record.moon.name.clone(),
                composition,
            },
            structure,
            ledger,
        })
    }

    /// Returns `true` unless the chunk arrives before the extraction began.
    pub fn has_plausible_timing(&self) -> bool {
        self.chunk_arrival >= self.started_at
    }

    /// Display label: the structure name when known, else the moon name.
    pub fn label(&self) -> &str {
        self.structure
            .as_ref()
            .map_or(self.moon.name.as_str(), |s| s.name.as_str())
    }

    /// Ledger rows, or an empty slice when no telemetry exists.
    pub fn ledger_entries(&self) -> &[LedgerEntry] {
        self.ledger
            .as_ref()
            .map(|l| l.entries.as_slice())
            .unwrap_or_default()
    }
}
