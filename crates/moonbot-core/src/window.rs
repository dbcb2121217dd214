//! Time windows: chunk visibility and ledger matching tolerance.
//!
//! Two independent windows drive the engine:
//!
//! - The **chunk visibility window** decides whether an extraction is
//!   active. A chunk is minable from its arrival until 48 hours later,
//!   which matches how long an unharvested chunk stays in space.
//! - The **ledger window** decides which observer ledger rows count
//!   towards an extraction. Ledger timestamps and the arrival timestamp
//!   come from different clocks, so both are truncated to a bucket
//!   (one day by default) and compared at bucket granularity.
//!
//! Every function here takes `now` explicitly. Callers capture it once per
//! report so that every extraction in a batch is judged against the same
//! instant.

use std::num::NonZeroU32;

use chrono::{DateTime, NaiveDateTime, TimeDelta};
use moonbot_types::Extraction;

/// Seconds after arrival during which a chunk stays minable.
pub const CHUNK_VISIBILITY_SECS: i64 = 172_800;

/// Default ledger bucket width: one day.
pub const DEFAULT_LEDGER_BUCKET_SECS: u32 = 86_400;

/// [`DEFAULT_LEDGER_BUCKET_SECS`] as a non-zero width.
const DEFAULT_LEDGER_BUCKET: NonZeroU32 = match NonZeroU32::new(DEFAULT_LEDGER_BUCKET_SECS) {
    Some(width) => width,
    None => NonZeroU32::MIN,
};

/// Slack subtracted from the arrival bucket start before comparing.
const BUCKET_EDGE_SLACK_SECS: i64 = 1;

/// Whether an extraction's chunk is minable at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    /// Arrived and not yet decayed.
    Active,
    /// Not yet arrived, or past the visibility window.
    Upcoming,
}

/// Length of the chunk visibility window.
pub fn chunk_visibility() -> TimeDelta {
    TimeDelta::seconds(CHUNK_VISIBILITY_SECS)
}

/// Classify an extraction against `now`.
///
/// Active iff `arrival <= now < arrival + 48h`. Everything else, including
/// chunks whose window has already elapsed, is [`WindowState::Upcoming`].
pub fn classify(extraction: &Extraction, now: NaiveDateTime) -> WindowState {
    if is_active(extraction, now) {
        WindowState::Active
    } else {
        WindowState::Upcoming
    }
}

/// Returns `true` if the extraction's chunk is minable at `now`.
pub fn is_active(extraction: &Extraction, now: NaiveDateTime) -> bool {
    let arrival = extraction.chunk_arrival;
    if now < arrival {
        return false;
    }
    arrival
        .checked_add_signed(chunk_visibility())
        .is_none_or(|window_end| now < window_end)
}

/// Extractions split by [`WindowState`], each side in input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Partition<'a> {
    /// Extractions whose chunk is minable.
    pub active: Vec<&'a Extraction>,
    /// All other extractions.
    pub upcoming: Vec<&'a Extraction>,
}

/// Partition extractions into active and upcoming against one `now`.
pub fn partition(extractions: &[Extraction], now: NaiveDateTime) -> Partition<'_> {
    let (active, upcoming) = extractions
        .iter()
        .partition(|extraction| is_active(extraction, now));
    Partition { active, upcoming }
}

/// Tolerance window for attributing ledger rows to an extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerWindow {
    bucket_secs: NonZeroU32,
}

impl Default for LedgerWindow {
    fn default() -> Self {
        Self::new(DEFAULT_LEDGER_BUCKET)
    }
}

impl LedgerWindow {
    /// A window with the given bucket width.
    pub const fn new(bucket_secs: NonZeroU32) -> Self {
        Self { bucket_secs }
    }

    /// Bucket width in seconds.
    pub const fn bucket_secs(self) -> u32 {
        self.bucket_secs.get()
    }

    /// Start of the bucket containing `ts`.
    ///
    /// Buckets are aligned to the Unix epoch, so a one-day bucket starts at
    /// midnight.
    pub fn bucket_start(self, ts: NaiveDateTime) -> Option<NaiveDateTime> {
        let secs = ts.and_utc().timestamp();
        let offset = secs.checked_rem_euclid(i64::from(self.bucket_secs.get()))?;
        let start = secs.checked_sub(offset)?;
        DateTime::from_timestamp(start, 0).map(|dt| dt.naive_utc())
    }

    /// Returns `true` if a ledger row updated at `entry` counts towards an
    /// extraction whose chunk arrived at `arrival`.
    ///
    /// The row counts when its bucket starts no earlier than one second
    /// before the arrival's bucket.
    pub fn admits(self, entry: NaiveDateTime, arrival: NaiveDateTime) -> bool {
        let threshold = self
            .bucket_start(arrival)
            .and_then(|start| start.checked_sub_signed(TimeDelta::seconds(BUCKET_EDGE_SLACK_SECS)));
        match (self.bucket_start(entry), threshold) {
            (Some(entry_bucket), Some(threshold)) => entry_bucket >= threshold,
            _ => entry >= arrival,
        }
    }
}
