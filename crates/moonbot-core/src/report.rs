//! Report assembly: one document and one `now` in, report messages out.
//!
//! This is the only entry point the runner needs. It validates the
//! document's records, sequences extractions by arrival, partitions them
//! against a single `now`, reconciles the active ones, ranks the upcoming
//! ones and wraps everything in the fixed banner sequence:
//!
//! ```text
//! Running -> [Active] -> [Upcoming] -> Complete
//! ```
//!
//! The active and upcoming messages are omitted when empty. Records whose
//! start or arrival time cannot be parsed are logged and left out. An
//! active extraction that fails to reconcile is still listed, flagged and
//! without ore rows.

use chrono::NaiveDateTime;
use moonbot_types::report::{COLOR_ACTIVE, COLOR_INFO, COLOR_UPCOMING, REPORT_FOOTER};
use moonbot_types::{
    ActiveExtraction, Extraction, ExtractionRecord, MessageKind, ReportField, ReportId,
    ReportMessage, UpcomingExtraction,
};
use tracing::{debug, info, warn};

use crate::error::ReconcileError;
use crate::ore_map::OreVariantTable;
use crate::rank::{ranked_ore_names, ranked_remaining, sort_extractions};
use crate::reconcile::remaining_by_ore_type;
use crate::volume::theoretical_volume;
use crate::window::{LedgerWindow, partition};

/// Read-only inputs shared by every report.
#[derive(Debug, Clone, Default)]
pub struct ReportContext {
    /// Ore substitution table.
    pub table: OreVariantTable,
    /// Ledger tolerance window.
    pub window: LedgerWindow,
}

/// Validate records into extractions sorted by chunk arrival.
///
/// Records with unusable timestamps are dropped with a warning.
pub fn extractions_from_records(records: &[ExtractionRecord]) -> Vec<Extraction> {
    let mut extractions: Vec<Extraction> = records
        .iter()
        .filter_map(|record| match Extraction::from_record(record) {
            Ok(extraction) => Some(extraction),
            Err(e) => {
                warn!(
                    extraction_id = record.id,
                    error = %e,
                    "skipping extraction record with unusable timestamp"
                );
                None
            }
        })
        .collect();
    sort_extractions(&mut extractions);
    extractions
}

/// Build the depletion summary for one active extraction.
///
/// # Errors
///
/// Propagates any [`ReconcileError`] from reconciliation.
pub fn active_field(
    extraction: &Extraction,
    ctx: &ReportContext,
    now: NaiveDateTime,
) -> Result<ActiveExtraction, ReconcileError> {
    let reconciliation = remaining_by_ore_type(extraction, &ctx.table, ctx.window, now)?;
    Ok(ActiveExtraction {
        extraction_id: extraction.id,
        label: extraction.label().to_owned(),
        chunk_arrival: extraction.chunk_arrival,
        theoretical_volume: reconciliation.theoretical_volume,
        implausible_timing: reconciliation.implausible_timing,
        ores: ranked_remaining(&extraction.moon.composition, reconciliation.ores.values()),
        reconcile_failed: false,
    })
}

/// Summary for an active extraction whose ledger could not be reconciled.
///
/// Keeps the extraction visible with its label and arrival, without ore rows.
pub fn unreconciled_field(extraction: &Extraction) -> ActiveExtraction {
    ActiveExtraction {
        extraction_id: extraction.id,
        label: extraction.label().to_owned(),
        chunk_arrival: extraction.chunk_arrival,
        theoretical_volume: theoretical_volume(extraction).unwrap_or_default(),
        implausible_timing: !extraction.has_plausible_timing(),
        ores: Vec::new(),
        reconcile_failed: true,
    }
}

/// Build the arrival summary for one upcoming extraction.
pub fn upcoming_field(extraction: &Extraction) -> UpcomingExtraction {
    UpcomingExtraction {
        extraction_id: extraction.id,
        label: extraction.label().to_owned(),
        chunk_arrival: extraction.chunk_arrival,
        ores: ranked_ore_names(&extraction.moon.composition),
    }
}

/// Build the full message sequence for one report attempt.
///
/// `now` must be captured once by the caller and is used for every
/// extraction in the document.
pub fn build_report(
    report_id: ReportId,
    records: &[ExtractionRecord],
    ctx: &ReportContext,
    now: NaiveDateTime,
) -> Vec<ReportMessage> {
    let extractions = extractions_from_records(records);
    let split = partition(&extractions, now);

    let active: Vec<ReportField> = split
        .active
        .iter()
        .map(|extraction| match active_field(extraction, ctx, now) {
            Ok(field) => ReportField::Active(field),
            Err(e) => {
                warn!(
                    report_id = %report_id,
                    extraction_id = %extraction.id,
                    error = %e,
                    "failed to reconcile active extraction, reporting without ores"
                );
                ReportField::Active(unreconciled_field(extraction))
            }
        })
        .collect();

    let upcoming: Vec<ReportField> = split
        .upcoming
        .iter()
        .map(|extraction| ReportField::Upcoming(upcoming_field(extraction)))
        .collect();

    info!(
        report_id = %report_id,
        records = records.len(),
        active = active.len(),
        upcoming = upcoming.len(),
        "report assembled"
    );

    let mut messages = vec![ReportMessage::banner(
        report_id,
        MessageKind::Running,
        "Moon Report Running",
        COLOR_INFO,
    )];

    if !active.is_empty() {
        messages.push(ReportMessage {
            fields: active,
            ..ReportMessage::banner(
                report_id,
                MessageKind::Active,
                "Active Extractions",
                COLOR_ACTIVE,
            )
        });
    }

    if !upcoming.is_empty() {
        messages.push(ReportMessage {
            fields: upcoming,
            ..ReportMessage::banner(
                report_id,
                MessageKind::Upcoming,
                "Upcoming Extractions",
                COLOR_UPCOMING,
            )
        });
    }

    messages.push(ReportMessage {
        footer: Some(REPORT_FOOTER.to_owned()),
        ..ReportMessage::banner(
            report_id,
            MessageKind::Complete,
            "Moon Report Complete!",
            COLOR_INFO,
        )
    });

    debug!(report_id = %report_id, messages = messages.len(), "report messages built");
    messages
}
