//! Shared type definitions for MoonBot.
//!
//! This crate is the single source of truth for the data that crosses a
//! process boundary: the extraction report document fetched from the
//! report service, the chat messages relayed by the chat bridge, and the
//! report messages published back to it.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for game identifiers and report ids
//! - [`timestamp`] -- The fixed-format, zone-less timestamp codec
//! - [`document`] -- Wire mirror of the report document
//! - [`extraction`] -- Validated extraction entities built from the wire
//! - [`chat`] -- Inbound chat messages and trigger matching
//! - [`report`] -- Outbound report messages and per-ore remaining volume

pub mod chat;
pub mod document;
pub mod extraction;
pub mod ids;
pub mod report;
pub mod timestamp;

// Re-export all public types at crate root for convenience.
pub use chat::ChatMessage;
pub use document::{
    ExtractionRecord, LedgerEntryRecord, MoonRecord, MoonReportRecord, ObserverRecord,
    OreContentRecord, PivotRecord, RawRate, ReportDocument, StructureInfoRecord, StructureRecord,
    decode_document,
};
pub use extraction::{
    Extraction, LedgerEntry, Moon, MoonComposition, ObserverLedger, OreEntry, StructureInfo,
};
pub use ids::{ExtractionId, MoonId, ObserverId, OreTypeId, ReportId, StructureId};
pub use report::{
    ActiveExtraction, MessageKind, RemainingOre, ReportField, ReportMessage, UpcomingExtraction,
};
pub use timestamp::{TimestampError, format_timestamp, parse_ledger_timestamp, parse_timestamp};
