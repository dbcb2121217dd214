//! Ledger reconciliation: how much of an active chunk is left.
//!
//! For an active extraction the theoretical volume is split across ores by
//! rate fraction, and the observer ledger says how many units of each ore
//! have been mined. The difference is what remains:
//!
//! ```text
//! allocated     = base_volume * rate_fraction
//! mined_volume  = mined_units[ore] * unit_volume
//! remaining     = allocated - mined_volume
//! remaining_pct = remaining / allocated * 100      (None if allocated == 0)
//! ```
//!
//! Ledger rows are attributed through the [`OreVariantTable`] so that
//! enriched variants count towards their base ore, and are only counted
//! when the [`LedgerWindow`] admits their timestamp. Over-mining yields a
//! negative remaining volume, which is reported unclamped.
//!
//! Reconciliation is a pure function of its inputs: the same extraction,
//! table, window and `now` always give the same [`Reconciliation`].

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use moonbot_types::{
    Extraction, ExtractionId, LedgerEntry, OreTypeId, RemainingOre, parse_ledger_timestamp,
};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::ReconcileError;
use crate::ore_map::OreVariantTable;
use crate::volume;
use crate::window::{LedgerWindow, is_active};

/// Percentage scale factor.
const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Units mined per canonical ore type, plus what could not be attributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MinedTotals {
    /// Units per canonical ore type.
    pub by_type: BTreeMap<OreTypeId, u64>,
    /// Units whose raw type has no registered substitution.
    pub unattributed_units: u64,
    /// Ledger rows skipped because their timestamp did not parse.
    pub skipped_entries: usize,
    /// Ledger rows outside the ledger window.
    pub out_of_window_entries: usize,
}

/// Depletion state of one active extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    /// Extraction id.
    pub extraction_id: ExtractionId,
    /// Theoretical total volume.
    pub theoretical_volume: i64,
    /// Set when the chunk arrives before the extraction started.
    pub implausible_timing: bool,
    /// Remaining volume per ore type.
    pub ores: BTreeMap<OreTypeId, RemainingOre>,
    /// Ledger aggregation that produced the mined figures.
    pub mined: MinedTotals,
}

/// Aggregate ledger rows for an extraction by canonical ore type.
///
/// A row counts when its timestamp parses and the window admits it
/// relative to `chunk_arrival`. Rows with unparsable timestamps are logged
/// and skipped; rows with unregistered ore types add to
/// [`MinedTotals::unattributed_units`] only.
pub fn mined_by_ore_type(
    entries: &[LedgerEntry],
    chunk_arrival: NaiveDateTime,
    table: &OreVariantTable,
    window: LedgerWindow,
) -> MinedTotals {
    let mut totals = MinedTotals::default();

    for entry in entries {
        let updated = match parse_ledger_timestamp(&entry.last_updated) {
            Ok(ts) => ts,
            Err(e) => {
                warn!(
                    ore_type = %entry.type_id,
                    error = %e,
                    "skipping ledger entry with unparsable timestamp"
                );
                totals.skipped_entries = totals.skipped_entries.saturating_add(1);
                continue;
            }
        };

        if !window.admits(updated, chunk_arrival) {
            totals.out_of_window_entries = totals.out_of_window_entries.saturating_add(1);
            continue;
        }

        let canonical = table.map_ore_type(entry.type_id);
        if canonical.is_unattributed() {
            debug!(
                ore_type = %entry.type_id,
                quantity = entry.quantity,
                "ledger entry has no ore mapping, not attributed"
            );
            totals.unattributed_units = totals.unattributed_units.saturating_add(entry.quantity);
            continue;
        }

        let mined = totals.by_type.entry(canonical).or_insert(0);
        *mined = mined.saturating_add(entry.quantity);
    }

    totals
}

/// Remaining volume per ore type for an active extraction.
///
/// # Errors
///
/// Returns [`ReconcileError::NotActive`] if the extraction is not active at
/// `now`, or [`ReconcileError::ArithmeticOverflow`] if checked arithmetic
/// fails.
pub fn remaining_by_ore_type(
    extraction: &Extraction,
    table: &OreVariantTable,
    window: LedgerWindow,
    now: NaiveDateTime,
) -> Result<Reconciliation, ReconcileError> {
    if !is_active(extraction, now) {
        return Err(ReconcileError::NotActive(extraction.id));
    }

    let overflow = || ReconcileError::ArithmeticOverflow(extraction.id);
    let estimate = volume::estimate(extraction)?;
    if estimate.implausible_timing {
        warn!(
            extraction_id = %extraction.id,
            started_at = %extraction.started_at,
            chunk_arrival = %extraction.chunk_arrival,
            "chunk arrives before extraction start, volumes will be negative"
        );
    }

    let mined = mined_by_ore_type(
        extraction.ledger_entries(),
        extraction.chunk_arrival,
        table,
        window,
    );

    let mut ores = BTreeMap::new();
    for ore in &extraction.moon.composition.ores {
        let Some(rate) = ore.rate_fraction() else {
            continue;
        };

        let allocated = estimate.base_volume.checked_mul(rate).ok_or_else(overflow)?;
        let mined_units = mined.by_type.get(&ore.type_id).copied().unwrap_or(0);
        let mined_volume = Decimal::from(mined_units)
            .checked_mul(ore.unit_volume)
            .ok_or_else(overflow)?;
        let remaining = allocated.checked_sub(mined_volume).ok_or_else(overflow)?;
        let remaining_pct = remaining_percentage(remaining, allocated);

        ores.insert(
            ore.type_id,
            RemainingOre {
                type_id: ore.type_id,
                name: ore.name.clone(),
                group_rank: ore.group_rank,
                allocated,
                mined_units,
                mined_volume,
                remaining,
                remaining_pct,
            },
        );
    }

    debug!(
        extraction_id = %extraction.id,
        theoretical_volume = estimate.theoretical_volume,
        ore_count = ores.len(),
        unattributed_units = mined.unattributed_units,
        "extraction reconciled"
    );

    Ok(Reconciliation {
        extraction_id: extraction.id,
        theoretical_volume: estimate.theoretical_volume,
        implausible_timing: estimate.implausible_timing,
        ores,
        mined,
    })
}

/// `remaining / allocated * 100`, or `None` when `allocated` is zero.
pub fn remaining_percentage(remaining: Decimal, allocated: Decimal) -> Option<Decimal> {
    if allocated.is_zero() {
        return None;
    }
    remaining
        .checked_div(allocated)
        .and_then(|ratio| ratio.checked_mul(HUNDRED))
}
