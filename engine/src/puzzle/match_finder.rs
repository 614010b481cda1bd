use super::grid::Grid;
use super::settings::MatchWeights;
use super::types::{Match, MatchKind, Orientation};

/// Matches discovered in one grid state together with the grid value they
/// add up to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MatchScan {
    pub matches: Vec<Match>,
    pub grid_value: f64,
}

impl MatchScan {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

struct ScanBuilder<'a> {
    grid: &'a Grid,
    target: u8,
    weights: MatchWeights,
    used: Vec<bool>,
    scan: MatchScan,
}

impl<'a> ScanBuilder<'a> {
    fn new(grid: &'a Grid, target: u8, weights: MatchWeights) -> Self {
        Self {
            grid,
            target,
            weights,
            used: vec![false; grid.len()],
            scan: MatchScan::default(),
        }
    }

    fn kind(&self, first: usize, second: usize) -> Option<MatchKind> {
        let a = self.grid.get(first)?;
        let b = self.grid.get(second)?;
        if !a.is_active() || !b.is_active() {
            return None;
        }
        MatchKind::of(a.value(), b.value(), self.target)
    }

    fn try_record(&mut self, first: usize, second: usize, orientation: Orientation) {
        let Some(kind) = self.kind(first, second) else {
            return;
        };
        let candidate = Match {
            first: self.grid.position_of(first),
            second: self.grid.position_of(second),
            kind,
            orientation,
        };
        // A two-cell sequence would report its only pair twice, once as the
        // successor pair and once as the wraparound pair.
        if self.scan.matches.contains(&candidate) {
            return;
        }

        let weight = match orientation {
            Orientation::Row => self.weights.row,
            Orientation::Column => self.weights.column,
        };
        if self.used[first] || self.used[second] {
            self.scan.grid_value += weight * self.weights.reuse;
        } else {
            self.scan.grid_value += weight;
        }
        self.used[first] = true;
        self.used[second] = true;
        self.scan.matches.push(candidate);
    }

    fn scan_rows(&mut self) {
        let grid = self.grid;
        let len = grid.len();
        if len < 2 {
            return;
        }

        let first_active = grid.cells()[0].is_active();
        let last_active = grid.cells()[len - 1].is_active();
        if first_active && last_active {
            self.try_record(0, len - 1, Orientation::Row);
        }

        self.pair_successors(0..len, Orientation::Row);
    }

    fn scan_columns(&mut self) {
        let grid = self.grid;
        for col in 0..grid.width() {
            self.pair_successors(grid.column_indices(col), Orientation::Column);
        }
    }

    fn pair_successors(&mut self, indices: impl Iterator<Item = usize>, orientation: Orientation) {
        let grid = self.grid;
        let mut previous: Option<usize> = None;
        for index in indices.filter(|&i| grid.cells()[i].is_active()) {
            if let Some(prev) = previous {
                self.try_record(prev, index, orientation);
            }
            previous = Some(index);
        }
    }
}

/// Finds every playable pair under the "next active neighbour" rule.
///
/// The row pass reads the grid as one sequence and pairs each active cell
/// with the next active cell after it, plus the very first cell with the
/// very last. The column pass does the same down each column, without
/// wrapping. The first match touching a cell adds the full orientation
/// weight to the grid value; later matches touching an already counted cell
/// add only the reuse share.
pub fn find_matches(grid: &Grid, target: u8, weights: MatchWeights) -> MatchScan {
    let mut builder = ScanBuilder::new(grid, target, weights);
    builder.scan_rows();
    builder.scan_columns();
    builder.scan
}

/// True when at least two active values could ever be paired, whatever
/// their arrangement.
pub fn has_matchable_values(values: &[u8], target: u8) -> bool {
    let mut seen = [false; 10];
    for &value in values {
        let index = value as usize;
        if seen[index] {
            return true;
        }
        let partner = target.checked_sub(value).map(usize::from);
        if partner.is_some_and(|p| p < seen.len() && seen[p]) {
            return true;
        }
        seen[index] = true;
    }
    false
}

/// The first active cell whose next active successor does not match it.
pub fn find_invalid_pair(grid: &Grid, target: u8) -> Option<(usize, usize)> {
    let active: Vec<usize> = (0..grid.len())
        .filter(|&i| grid.cells()[i].is_active())
        .collect();
    active.windows(2).find_map(|pair| {
        let a = grid.cells()[pair[0]].value();
        let b = grid.cells()[pair[1]].value();
        MatchKind::of(a, b, target)
            .is_none()
            .then_some((pair[0], pair[1]))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(values: &[i8], width: usize) -> MatchScan {
        find_matches(&Grid::from_values(values, width), 10, MatchWeights::default())
    }

    fn pairs(scan: &MatchScan) -> Vec<((usize, usize), (usize, usize), Orientation)> {
        scan.matches
            .iter()
            .map(|m| {
                (
                    (m.first.col, m.first.row),
                    (m.second.col, m.second.row),
                    m.orientation,
                )
            })
            .collect()
    }

    #[test]
    fn test_row_pass_pairs_successors_and_wraparound() {
        let result = scan(&[3, 7, 3, 7], 4);

        assert_eq!(
            pairs(&result),
            vec![
                ((1, 1), (4, 1), Orientation::Row),
                ((1, 1), (2, 1), Orientation::Row),
                ((2, 1), (3, 1), Orientation::Row),
                ((3, 1), (4, 1), Orientation::Row),
            ]
        );
    }

    #[test]
    fn test_row_pass_skips_consumed_cells() {
        let result = scan(&[4, -1, -2, 4, 2], 5);

        assert_eq!(pairs(&result), vec![((1, 1), (4, 1), Orientation::Row)]);
    }

    #[test]
    fn test_row_pass_does_not_look_past_first_successor() {
        let result = scan(&[4, 1, 4, 2], 4);

        assert!(result.is_empty());
    }

    #[test]
    fn test_wraparound_pairs_first_and_last_cell() {
        #[rustfmt::skip]
        let result = scan(&[
            2, 1, 3,
            4, 6, 8,
        ], 3);

        assert!(pairs(&result).contains(&((1, 1), (3, 2), Orientation::Row)));
    }

    #[test]
    fn test_wraparound_requires_literal_first_cell_active() {
        let result = scan(&[-8, 2, 1, 3, 8], 5);

        assert!(result.is_empty());
    }

    #[test]
    fn test_row_pass_crosses_row_boundaries() {
        #[rustfmt::skip]
        let result = scan(&[
            1, 2, 6,
            6, 3, 1,
        ], 3);

        assert!(pairs(&result).contains(&((3, 1), (1, 2), Orientation::Row)));
    }

    #[test]
    fn test_column_pass_pairs_next_active_vertically() {
        #[rustfmt::skip]
        let result = scan(&[
            1, 2, 3,
            -5, 4, 6,
            9, 6, 3,
        ], 3);

        let found = pairs(&result);
        assert!(found.contains(&((1, 1), (1, 3), Orientation::Column)));
        assert!(found.contains(&((2, 2), (2, 3), Orientation::Column)));
        assert!(!found.contains(&((3, 1), (3, 3), Orientation::Column)));
    }

    #[test]
    fn test_column_pass_handles_short_last_row() {
        #[rustfmt::skip]
        let result = scan(&[
            1, 2, 3,
            -4, 6, 8,
            9,
        ], 3);

        assert!(pairs(&result).contains(&((1, 1), (1, 3), Orientation::Column)));
    }

    #[test]
    fn test_two_cell_grid_reports_pair_once() {
        let result = scan(&[5, 5], 4);

        assert_eq!(pairs(&result), vec![((1, 1), (2, 1), Orientation::Row)]);
        assert!((result.grid_value - 1.2).abs() < 1e-9);
    }

    #[test]
    fn test_grid_value_discounts_reused_cells() {
        let result = scan(&[3, 7, 3, 7], 4);

        // Full row weight for the wraparound pair, reuse share for the
        // three successor pairs that touch already counted cells.
        let expected = 1.2 + 3.0 * 1.2 * 0.2;
        assert!((result.grid_value - expected).abs() < 1e-9);
    }

    #[test]
    fn test_column_weight_lower_than_row_weight() {
        #[rustfmt::skip]
        let result = scan(&[
            1, 2,
            1, 4,
        ], 2);

        assert_eq!(pairs(&result), vec![((1, 1), (1, 2), Orientation::Column)]);
        assert!((result.grid_value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_and_single_cell_grids_have_no_matches() {
        assert!(scan(&[], 4).is_empty());
        let single = scan(&[5], 4);
        assert!(single.is_empty());
        assert_eq!(single.grid_value, 0.0);
    }

    #[test]
    fn test_fuzz_matches_hold_predicate_and_value_tracks_list() {
        let mut rng = crate::SessionRng::new(11);
        for _ in 0..500 {
            let len = rng.random_range(0..40usize);
            let width = rng.random_range(1..8usize);
            let values: Vec<i8> = (0..len)
                .map(|_| {
                    let v: i8 = rng.random_range(1..=9);
                    if rng.random_range(0..4) == 0 { -v } else { v }
                })
                .collect();
            let grid = Grid::from_values(&values, width);

            let result = find_matches(&grid, 10, MatchWeights::default());

            for m in &result.matches {
                let a = grid.get(grid.index_of(m.first).unwrap()).unwrap();
                let b = grid.get(grid.index_of(m.second).unwrap()).unwrap();
                assert!(a.is_active() && b.is_active());
                assert!(a.value() == b.value() || a.value() + b.value() == 10);
            }
            assert_eq!(result.grid_value == 0.0, result.matches.is_empty());
        }
    }

    #[test]
    fn test_has_matchable_values() {
        assert!(has_matchable_values(&[3, 4, 3], 10));
        assert!(has_matchable_values(&[3, 4, 7], 10));
        assert!(!has_matchable_values(&[3, 4], 10));
        assert!(!has_matchable_values(&[], 10));
        assert!(has_matchable_values(&[9, 9], 18));
    }

    #[test]
    fn test_find_invalid_pair() {
        let grid = Grid::from_values(&[5, 5, -1, 3, 4], 5);

        assert_eq!(find_invalid_pair(&grid, 10), Some((1, 3)));
        assert_eq!(find_invalid_pair(&Grid::from_values(&[3, 7], 2), 10), None);
    }
}
