//! Extraction depletion reconciliation engine for MoonBot.
//!
//! Given a fetched extraction report and a single `now`, this crate decides
//! which extractions are active, estimates how much ore each chunk held,
//! reconciles that against the mining observer ledger, and orders the
//! results for presentation.
//!
//! # Modules
//!
//! - [`ore_map`] -- Substitution of raw (enriched) ore types by the base
//!   ore they are attributed to.
//! - [`window`] -- Active/upcoming classification and the ledger
//!   tolerance window.
//! - [`volume`] -- Theoretical chunk volume from duration and composition.
//! - [`reconcile`] -- Remaining volume per ore type.
//! - [`rank`] -- Extraction and ore orderings.
//! - [`report`] -- Assembly of the full report message sequence.
//! - [`error`] -- Error types.
//!
//! # Example
//!
//! ```
//! use moonbot_core::{LedgerWindow, OreVariantTable, reconcile, volume};
//! use moonbot_types::{Extraction, decode_document, parse_timestamp};
//!
//! let json = br#"[{
//!     "id": 1,
//!     "extraction_start_time": "2021-08-18 01:28:18",
//!     "chunk_arrival_time": "2021-08-19 01:28:18",
//!     "moon": {
//!         "moon_id": 40000001,
//!         "name": "Moon",
//!         "moon_report": { "content": [{
//!             "typeID": 45490, "groupID": 1884, "typeName": "Zeolites",
//!             "volume": 10, "pivot": { "rate": "0.5" }
//!         }]}
//!     }
//! }]"#;
//!
//! let records = decode_document(json).unwrap_or_default();
//! let extraction = records.first().map(Extraction::from_record);
//! let Some(Ok(extraction)) = extraction else { return };
//!
//! assert_eq!(volume::theoretical_volume(&extraction), Ok(480_000));
//!
//! let table = OreVariantTable::builtin().unwrap_or_default();
//! let now = parse_timestamp("now", "2021-08-19 12:00:00").unwrap_or_default();
//! let result = reconcile::remaining_by_ore_type(&extraction, &table, LedgerWindow::default(), now);
//! assert!(result.is_ok());
//! ```

pub mod error;
pub mod ore_map;
pub mod rank;
pub mod reconcile;
pub mod report;
pub mod volume;
pub mod window;

// Re-export primary types at crate root.
pub use error::{OreTableError, ReconcileError};
pub use ore_map::{OreVariant, OreVariantTable};
pub use reconcile::{MinedTotals, Reconciliation, remaining_by_ore_type};
pub use report::{ReportContext, build_report};
pub use volume::{VolumeEstimate, theoretical_volume};
pub use window::{LedgerWindow, Partition, WindowState, classify, is_active, partition};
