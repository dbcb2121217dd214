//! Outbound report payloads.
//!
//! A report is a short sequence of [`ReportMessage`]s published to the chat
//! bridge, which turns them into rich embeds. Numbers are shipped raw; the
//! bridge owns all number formatting.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::{ExtractionId, OreTypeId, ReportId};

/// Embed colour for the running and complete banners.
pub const COLOR_INFO: u32 = 0x17_A2_B8;
/// Embed colour for the active extractions message.
pub const COLOR_ACTIVE: u32 = 0x28_A7_45;
/// Embed colour for the upcoming extractions message.
pub const COLOR_UPCOMING: u32 = 0xFF_C1_07;
/// Embed colour for failure notices.
pub const COLOR_FAILURE: u32 = 0xDC_35_45;

/// Footer attached to the final banner.
pub const REPORT_FOOTER: &str = "MoonBot by Crypta Electrica";

/// What a [`ReportMessage`] represents within the report sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// "Report running" banner.
    Running,
    /// Active extractions with remaining volumes.
    Active,
    /// Upcoming extractions with arrival times.
    Upcoming,
    /// "Report complete" banner.
    Complete,
    /// The report could not be generated.
    Failure,
}

/// One message in a report sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMessage {
    /// Report attempt this message belongs to.
    pub report_id: ReportId,
    /// Role of the message in the sequence.
    pub kind: MessageKind,
    /// Embed title.
    pub title: String,
    /// Embed colour as `0xRRGGBB`.
    pub color: u32,
    /// Free-text body, used by failure notices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Per-extraction fields.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ReportField>,
    /// Embed footer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
}

impl ReportMessage {
    /// A message with no fields, description or footer.
    pub fn banner(report_id: ReportId, kind: MessageKind, title: &str, color: u32) -> Self {
        Self {
            report_id,
            kind,
            title: title.to_owned(),
            color,
            description: None,
            fields: Vec::new(),
            footer: None,
        }
    }

    /// A user-visible failure notice.
    pub fn failure(report_id: ReportId, notice: String) -> Self {
        Self {
            description: Some(notice),
            ..Self::banner(report_id, MessageKind::Failure, "Moon Report Failed", COLOR_FAILURE)
        }
    }
}

/// One extraction's entry in a report message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportField {
    /// An extraction whose chunk is currently minable.
    Active(ActiveExtraction),
    /// An extraction whose chunk is not currently minable.
    Upcoming(UpcomingExtraction),
}

/// Depletion summary of an active extraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveExtraction {
    /// Extraction id.
    pub extraction_id: ExtractionId,
    /// Structure or moon name.
    pub label: String,
    /// Chunk arrival time.
    pub chunk_arrival: NaiveDateTime,
    /// Theoretical total volume, in cubic meters.
    pub theoretical_volume: i64,
    /// Set when the chunk arrives before the extraction started.
    pub implausible_timing: bool,
    /// Remaining volume per ore, rarest first.
    pub ores: Vec<RemainingOre>,
    /// Set when the ledger could not be reconciled; `ores` is then empty.
    #[serde(default)]
    pub reconcile_failed: bool,
}

/// Arrival summary of an upcoming extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpcomingExtraction {
    /// Extraction id.
    pub extraction_id: ExtractionId,
    /// Structure or moon name.
    pub label: String,
    /// Chunk arrival time.
    pub chunk_arrival: NaiveDateTime,
    /// Ore display names, rarest first.
    pub ores: Vec<String>,
}

/// Remaining volume of one ore type in an active extraction.
///
/// Derived on demand; never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemainingOre {
    /// Ore type id.
    pub type_id: OreTypeId,
    /// Ore display name.
    pub name: String,
    /// Rarity/group rank.
    pub group_rank: u32,
    /// Theoretical volume allocated to this ore.
    pub allocated: Decimal,
    /// Units attributed to this ore by the observer ledger.
    pub mined_units: u64,
    /// Mined units times unit volume.
    pub mined_volume: Decimal,
    /// `allocated - mined_volume`; negative when over-mined.
    pub remaining: Decimal,
    /// `remaining / allocated * 100`, or `None` when nothing was allocated.
    pub remaining_pct: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_notice_carries_description() {
        let id = ReportId::new();
        let msg = ReportMessage::failure(id, "error getting request: timed out".to_owned());
        assert_eq!(msg.kind, MessageKind::Failure);
        assert_eq!(msg.color, COLOR_FAILURE);
        assert_eq!(msg.description.as_deref(), Some("error getting request: timed out"));
        assert!(msg.fields.is_empty());
    }

    #[test]
    fn fields_serialize_with_status_tag() {
        let field = ReportField::Upcoming(UpcomingExtraction {
            extraction_id: ExtractionId(3),
            label: "Moon".to_owned(),
            chunk_arrival: NaiveDateTime::default(),
            ores: vec!["Zeolites".to_owned()],
        });
        let json = serde_json::to_value(&field).unwrap_or_default();
        assert_eq!(json.get("status").and_then(|v| v.as_str()), Some("upcoming"));
        assert_eq!(json.get("label").and_then(|v| v.as_str()), Some("Moon"));
    }

    #[test]
    fn banner_omits_empty_optionals() {
        let msg = ReportMessage::banner(ReportId::new(), MessageKind::Running, "Moon Report Running", COLOR_INFO);
        let json = serde_json::to_value(&msg).unwrap_or_default();
        assert!(json.get("fields").is_none());
        assert!(json.get("footer").is_none());
        assert_eq!(json.get("kind").and_then(|v| v.as_str()), Some("running"));
    }
}
