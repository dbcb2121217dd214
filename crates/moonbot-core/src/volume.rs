//! Theoretical extraction volume.
//!
//! A moon drill liberates a fixed volume per hour of extraction time. The
//! chunk's theoretical volume is that hourly rate times the extraction's
//! duration, scaled by the sum of the moon's ore rate fractions:
//!
//! ```text
//! elapsed_hours = (chunk_arrival - started_at) / 3600s
//! base_volume   = elapsed_hours * 40_000
//! theoretical   = round(base_volume * sum(rate_fraction))
//! ```
//!
//! All arithmetic is done in [`Decimal`] with checked operations, so rate
//! fractions such as `"0.2345"` are used exactly as published. Unparsable
//! rate fractions are skipped, not fatal. A chunk that arrives before its
//! extraction started yields a negative volume, which is kept as-is and
//! flagged through [`VolumeEstimate::implausible_timing`].

use moonbot_types::{Extraction, MoonComposition};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::warn;

use crate::error::ReconcileError;

/// Cubic meters liberated per hour of extraction.
pub const BASE_RATE_PER_HOUR: Decimal = Decimal::from_parts(40_000, 0, 0, false, 0);

/// Seconds in one hour.
const SECONDS_PER_HOUR: Decimal = Decimal::from_parts(3_600, 0, 0, false, 0);

/// Intermediate and final values of a volume estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeEstimate {
    /// Hours between extraction start and chunk arrival.
    pub elapsed_hours: Decimal,
    /// `elapsed_hours * BASE_RATE_PER_HOUR`, before composition scaling.
    pub base_volume: Decimal,
    /// Sum of all parsable rate fractions.
    pub composition_sum: Decimal,
    /// `round(base_volume * composition_sum)`.
    pub theoretical_volume: i64,
    /// Set when the chunk arrives before the extraction started.
    pub implausible_timing: bool,
}

/// Hours between extraction start and chunk arrival (negative if reversed).
///
/// # Errors
///
/// Returns [`ReconcileError::ArithmeticOverflow`] if the division fails.
pub fn elapsed_hours(extraction: &Extraction) -> Result<Decimal, ReconcileError> {
    let seconds = extraction
        .chunk_arrival
        .signed_duration_since(extraction.started_at)
        .num_seconds();
    Decimal::from(seconds)
        .checked_div(SECONDS_PER_HOUR)
        .ok_or(ReconcileError::ArithmeticOverflow(extraction.id))
}

/// Volume liberated over the extraction's duration, before scaling by
/// composition.
///
/// # Errors
///
/// Returns [`ReconcileError::ArithmeticOverflow`] if checked arithmetic fails.
pub fn base_volume(extraction: &Extraction) -> Result<Decimal, ReconcileError> {
    elapsed_hours(extraction)?
        .checked_mul(BASE_RATE_PER_HOUR)
        .ok_or(ReconcileError::ArithmeticOverflow(extraction.id))
}

/// Sum of the parsable rate fractions of a composition.
///
/// Entries whose rate fraction does not parse are logged and skipped.
/// An empty composition sums to zero.
pub fn composition_sum(composition: &MoonComposition) -> Decimal {
    composition
        .ores
        .iter()
        .filter_map(|ore| {
            let rate = ore.rate_fraction();
            if rate.is_none() {
                warn!(
                    ore_type = %ore.type_id,
                    ore_name = ore.name,
                    raw_rate = ore.raw_rate,
                    "skipping ore with unparsable rate fraction"
                );
            }
            rate
        })
        .fold(Decimal::ZERO, |sum, rate| sum.saturating_add(rate))
}

/// Compute the full volume estimate for an extraction.
///
/// # Errors
///
/// Returns [`ReconcileError::ArithmeticOverflow`] if checked arithmetic fails
/// or the rounded volume does not fit in an `i64`.
pub fn estimate(extraction: &Extraction) -> Result<VolumeEstimate, ReconcileError> {
    let overflow = ReconcileError::ArithmeticOverflow(extraction.id);

    let elapsed_hours = elapsed_hours(extraction)?;
    let base_volume = elapsed_hours
        .checked_mul(BASE_RATE_PER_HOUR)
        .ok_or_else(|| overflow.clone())?;
    let composition_sum = composition_sum(&extraction.moon.composition);
    let theoretical_volume = base_volume
        .checked_mul(composition_sum)
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or(overflow)?;

    Ok(VolumeEstimate {
        elapsed_hours,
        base_volume,
        composition_sum,
        theoretical_volume,
        implausible_timing: !extraction.has_plausible_timing(),
    })
}

/// Theoretical total ore volume of an extraction, in cubic meters.
///
/// # Errors
///
/// See [`estimate`].
pub fn theoretical_volume(extraction: &Extraction) -> Result<i64, ReconcileError> {
    estimate(extraction).map(|e| e.theoretical_volume)
}
