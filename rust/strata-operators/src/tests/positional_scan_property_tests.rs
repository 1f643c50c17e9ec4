use itertools::Itertools;
use strata_blockstream::{BlockStream, VecBlockStream, collect_positions};
use strata_ranges::intersect;
use strata_testkit::{
    RandomStreamConfig, Selection, collect_selection, expected_selection, random_streams,
};

use crate::{PositionalScan, ScanOptions};

const SEEDS: u64 = 200;

fn configs() -> [RandomStreamConfig; 3] {
    [
        RandomStreamConfig::default(),
        RandomStreamConfig::sparse_values(),
        RandomStreamConfig::dense_positions(),
    ]
}

fn assert_well_formed(selection: &Selection) {
    for ((a, _), (b, _)) in selection.iter().tuple_windows() {
        assert!(a.precedes(b), "output block {b} does not follow {a}");
    }
    for (range, positions) in selection {
        assert!(!positions.is_empty(), "empty output block {range}");
        assert!(positions.iter().all(|&p| range.contains(p)));
        assert!(positions.iter().tuple_windows().all(|(a, b)| a < b));
    }
}

fn flatten(selection: &Selection) -> Vec<u64> {
    selection
        .iter()
        .flat_map(|(_, positions)| positions.iter().copied())
        .collect()
}

#[test]
fn test_scan_matches_reference() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        for config in configs() {
            let (values, positions) = random_streams(&mut rng, &config);
            let expected = expected_selection(&values, &positions).unwrap();
            let scan = PositionalScan::new(values.into_ref(), positions.into_ref());

            let actual = collect_selection(&scan).unwrap();
            assert_eq!(actual, expected, "seed {seed}, {config:?}");
            assert_well_formed(&actual);

            assert_eq!(collect_selection(&scan).unwrap(), actual, "seed {seed}");
        }
    }
}

#[test]
fn test_unverified_scan_matches_verified() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let (values, positions) = random_streams(&mut rng, &RandomStreamConfig::default());
        let (values, positions) = (values.into_ref(), positions.into_ref());
        let verified = PositionalScan::new(values.clone(), positions.clone());
        let unverified = PositionalScan::with_options(
            values,
            positions,
            ScanOptions::new().verify_ordering(false),
        );
        assert_eq!(
            collect_selection(&verified).unwrap(),
            collect_selection(&unverified).unwrap(),
            "seed {seed}"
        );
    }
}

#[test]
fn test_scan_stats_are_consistent() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let (values, positions) = random_streams(&mut rng, &RandomStreamConfig::sparse_values());
        let value_count = values.blocks().len() as u64;
        let position_count = positions.blocks().len() as u64;
        let scan = PositionalScan::new(values.into_ref(), positions.into_ref());

        let mut iter = scan.scan();
        let emitted = iter.by_ref().map(|block| block.unwrap()).collect_vec();
        let stats = *iter.stats();

        assert_eq!(stats.emitted_blocks, emitted.len() as u64, "seed {seed}");
        assert_eq!(
            stats.selected_positions,
            emitted.iter().map(|b| b.position_count()).sum::<u64>()
        );
        assert!(stats.emitted_blocks + stats.dropped_blocks <= stats.value_blocks);
        assert!(stats.value_blocks <= value_count);
        assert!(stats.position_blocks <= position_count);
    }
}

#[test]
fn test_chained_scan_intersects_both_selections() {
    for seed in 0..SEEDS {
        let mut rng = fastrand::Rng::with_seed(seed);
        let config = RandomStreamConfig::dense_positions();
        let (values, first) = random_streams(&mut rng, &config);
        let (_, second) = random_streams(&mut rng, &config);

        let first_selection = expected_selection(&values, &first).unwrap();
        let second_positions = flatten(&collect_selection_of_positions(&second));

        let expected: Selection = first_selection
            .into_iter()
            .filter_map(|(range, positions)| {
                let hits = intersect(positions, second_positions.iter().copied()).collect_vec();
                (!hits.is_empty()).then_some((range, hits))
            })
            .collect();

        let chained = PositionalScan::new(
            PositionalScan::new(values.into_ref(), first.into_ref()).into_ref(),
            second.into_ref(),
        );
        let actual = collect_selection(&chained).unwrap();
        assert_eq!(actual, expected, "seed {seed}");
        assert_well_formed(&actual);
    }
}

#[test]
fn test_stream_cursor_visits_selected_positions() {
    for seed in 0..SEEDS / 4 {
        let mut rng = fastrand::Rng::with_seed(seed);
        let (values, positions) = random_streams(&mut rng, &RandomStreamConfig::default());
        let expected = flatten(&expected_selection(&values, &positions).unwrap());
        let scan = PositionalScan::new(values.into_ref(), positions.into_ref());

        let mut cursor = scan.cursor();
        let mut visited = Vec::new();
        while cursor.advance_next_position().unwrap() {
            assert_eq!(cursor.get_i64(0), strata_testkit::value_at(cursor.position()));
            visited.push(cursor.position());
        }
        assert_eq!(visited, expected, "seed {seed}");
    }
}

/// Positions of a position stream, as (range, positions) pairs.
fn collect_selection_of_positions(stream: &VecBlockStream) -> Selection {
    stream
        .iter()
        .map(|block| {
            let block = block.unwrap();
            (block.range(), collect_positions(block.as_ref()))
        })
        .collect()
}
