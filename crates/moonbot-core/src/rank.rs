//! Deterministic orderings for report presentation.
//!
//! Extractions are listed by chunk arrival, soonest first. Ores within an
//! extraction are listed rarest first, by descending group rank. All
//! comparators are plain functions of the compared values and are used
//! with stable sorts, so ties keep document order.

use std::cmp::Ordering;

use moonbot_types::{Extraction, MoonComposition, OreEntry, RemainingOre};

/// Order extractions by chunk arrival, ascending; ties by extraction id.
pub fn by_chunk_arrival(a: &Extraction, b: &Extraction) -> Ordering {
    a.chunk_arrival
        .cmp(&b.chunk_arrival)
        .then_with(|| a.id.cmp(&b.id))
}

/// Order ores by group rank, descending.
pub fn by_descending_rank(a: &OreEntry, b: &OreEntry) -> Ordering {
    b.group_rank.cmp(&a.group_rank)
}

/// Sort extractions in place by [`by_chunk_arrival`].
pub fn sort_extractions(extractions: &mut [Extraction]) {
    extractions.sort_by(by_chunk_arrival);
}

/// Ore entries of a composition, rarest first, ties in document order.
pub fn ranked_ores(composition: &MoonComposition) -> Vec<&OreEntry> {
    let mut ores: Vec<&OreEntry> = composition.ores.iter().collect();
    ores.sort_by(|a, b| by_descending_rank(a, b));
    ores
}

/// Ore display names of a composition, rarest first.
pub fn ranked_ore_names(composition: &MoonComposition) -> Vec<String> {
    ranked_ores(composition)
        .into_iter()
        .map(|ore| ore.name.clone())
        .collect()
}

/// Remaining-volume rows, rarest first, ties in composition order.
///
/// `composition` supplies the tie-break order; rows for ores that are not
/// in it sort last.
pub fn ranked_remaining<'a, I>(composition: &MoonComposition, rows: I) -> Vec<RemainingOre>
where
    I: IntoIterator<Item = &'a RemainingOre>,
{
    let position = |row: &RemainingOre| {
        composition
            .ores
            .iter()
            .position(|ore| ore.type_id == row.type_id)
            .unwrap_or(usize::MAX)
    };
    let mut ranked: Vec<RemainingOre> = rows.into_iter().cloned().collect();
    ranked.sort_by(|a, b| {
        b.group_rank
            .cmp(&a.group_rank)
            .then_with(|| position(a).cmp(&position(b)))
    });
    ranked
}
