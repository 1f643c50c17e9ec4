//! Reference model of positional selection.

use strata_blockstream::{BlockStream, collect_positions};
use strata_ranges::{RowRange, intersect};

/// The observable output of a positional scan: one entry per emitted block,
/// with the block range and the selected positions in order.
pub type Selection = Vec<(RowRange, Vec<u64>)>;

/// Pulls every block of `stream` and records its range and positions.
///
/// Field values are checked along the way: every block must carry the value
/// written by [`value_block`](crate::value_block) at each of its positions.
pub fn collect_selection(stream: &dyn BlockStream) -> anyhow::Result<Selection> {
    let mut selection = Vec::new();
    for block in stream.iter() {
        let block = block?;
        let mut cursor = block.cursor();
        while cursor.advance_next_position() {
            let pos = cursor.position();
            anyhow::ensure!(
                cursor.get_i64(0) == crate::value_at(pos),
                "block {} carries a wrong value at position {pos}",
                block.range()
            );
        }
        selection.push((block.range(), collect_positions(block.as_ref())));
    }
    Ok(selection)
}

/// Computes the expected output of a positional scan of `values` at
/// `positions`, without any block alignment logic: every value block is
/// intersected with the flattened position list, and blocks left with no
/// positions are dropped.
///
/// Both streams must be well formed.
pub fn expected_selection(
    values: &dyn BlockStream,
    positions: &dyn BlockStream,
) -> anyhow::Result<Selection> {
    let mut selected = Vec::new();
    for block in positions.iter() {
        selected.extend(collect_positions(block?.as_ref()));
    }

    let mut expected = Vec::new();
    for block in values.iter() {
        let block = block?;
        let range = block.range();
        let within = selected
            .iter()
            .copied()
            .skip_while(|&p| p < range.start())
            .take_while(|&p| p <= range.end());
        let hits: Vec<u64> = intersect(collect_positions(block.as_ref()), within).collect();
        if !hits.is_empty() {
            expected.push((range, hits));
        }
    }
    Ok(expected)
}
