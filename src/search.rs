//! The backtracking search over a [`Matrix`]: Knuth's Algorithm X.
//!
//! The driver is a plain depth-first recursion. At each level it picks
//! the active column with the fewest remaining options (the minimum
//! remaining values heuristic, which Knuth found to keep the branching
//! factor low on standard exact cover problems), tries each option in
//! that column in turn, and undoes every mutation before moving on.

use std::ops::ControlFlow;

use crate::indices::{NodeIndex, ROOT};
use crate::matrix::Matrix;

impl<'a, I, O> Matrix<'a, I, O> {
    /// Calls a closure on each exact cover, in discovery order.
    ///
    /// A solution is the sequence of option labels selected along the
    /// current search path; the slice is only valid for the duration of
    /// the call, but the labels themselves borrow from the caller's data
    /// and may be kept.
    ///
    /// The traversal runs until all solutions have been visited or the
    /// closure returns [`ControlFlow::Break`], whichever comes first.
    /// Either way, every pending restore is unwound before this method
    /// returns: the matrix is back in its post-construction state and
    /// may be solved again.
    pub fn solve<F>(&mut self, mut visit: F)
    where
        F: FnMut(&[&'a O]) -> ControlFlow<()>,
    {
        let mut solution = Vec::new();
        let _ = self.search(&mut solution, &mut visit);
        debug_assert!(solution.is_empty());
    }

    fn search<F>(&mut self, solution: &mut Vec<&'a O>, visit: &mut F) -> ControlFlow<()>
    where
        F: FnMut(&[&'a O]) -> ControlFlow<()>,
    {
        if self.right(ROOT) == ROOT {
            // No columns remain to be covered: the selected options
            // partition the item universe.
            log::debug!("exact cover found, {} options", solution.len());
            return visit(solution);
        }
        let col = self.choose_column();
        let count = self.count(col);
        if count == 0 {
            // Nothing can cover this item anymore on the current path.
            log::trace!("dead end at depth {}, column {col:?}", solution.len());
            return ControlFlow::Continue(());
        }
        log::trace!(
            "depth {}: branching on column {col:?} with {count} options",
            solution.len()
        );
        let mut cell = self.down(col);
        while cell != col {
            let row = self.row_of(cell);
            solution.push(self.row_label(row));
            self.select_option(row);
            let flow = self.search(solution, visit);
            self.restore_option(row);
            solution.pop();
            // Propagate a break only after this level has been undone,
            // so an abandoned traversal still leaves the matrix fully
            // restored.
            flow?;
            cell = self.down(cell);
        }
        ControlFlow::Continue(())
    }

    /// Picks the active column with the fewest remaining options, ties
    /// broken by position in the column list. A zero-count column wins
    /// immediately; the caller backtracks on it without branching.
    fn choose_column(&self) -> NodeIndex {
        let mut min_count = usize::MAX;
        let mut min_col = ROOT;
        let mut col = self.right(ROOT);
        while col != ROOT {
            let count = self.count(col);
            if count < min_count {
                if count == 0 {
                    return col;
                }
                min_count = count;
                min_col = col;
            }
            col = self.right(col);
        }
        min_col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static ITEMS: [&str; 7] = [
        "Item1", "Item2", "Item3", "Item4", "Item5", "Item6", "Item7",
    ];
    static OPTIONS: [(&str, &[&str]); 6] = [
        ("RowA", &["Item1", "Item4", "Item7"]),
        ("RowB", &["Item1", "Item4"]),
        ("RowC", &["Item4", "Item5", "Item7"]),
        ("RowD", &["Item3", "Item5", "Item6"]),
        ("RowE", &["Item2", "Item3", "Item6", "Item7"]),
        ("RowF", &["Item2", "Item7"]),
    ];

    fn build(
        items: &'static [&'static str],
        options: &'static [(&'static str, &'static [&'static str])],
    ) -> Matrix<'static, &'static str, &'static str> {
        let mut matrix = Matrix::new(items);
        for (name, covers) in options {
            matrix.add_option(name, covers).unwrap();
        }
        matrix
    }

    fn all_solutions(
        matrix: &mut Matrix<'static, &'static str, &'static str>,
    ) -> Vec<Vec<&'static str>> {
        let mut solutions = Vec::new();
        matrix.solve(|solution| {
            solutions.push(solution.iter().map(|label| **label).collect());
            ControlFlow::Continue(())
        });
        solutions
    }

    /// Asserts that the selected options cover each item exactly once.
    fn assert_partition(
        solution: &[&str],
        options: &[(&str, &[&str])],
        items: &[&str],
    ) {
        let mut covered: Vec<&str> = solution
            .iter()
            .flat_map(|name| {
                let (_, covers) = options.iter().find(|(n, _)| n == name).unwrap();
                covers.iter().copied()
            })
            .collect();
        covered.sort_unstable();
        let mut expected = items.to_vec();
        expected.sort_unstable();
        assert_eq!(covered, expected);
    }

    #[test]
    fn fixture_has_unique_solution() {
        let mut matrix = build(&ITEMS, &OPTIONS);
        let solutions = all_solutions(&mut matrix);
        assert_eq!(solutions, [["RowB", "RowD", "RowF"]]);
        for solution in &solutions {
            assert_partition(solution, &OPTIONS, &ITEMS);
        }
    }

    #[test]
    fn exhaustive_solve_restores_matrix() {
        let mut matrix = build(&ITEMS, &OPTIONS);
        let before = matrix.snapshot();

        let first = all_solutions(&mut matrix);
        assert_eq!(matrix.snapshot(), before);

        // A restored matrix yields the same solutions again.
        assert_eq!(all_solutions(&mut matrix), first);
    }

    #[test]
    fn uncoverable_item_yields_no_solutions() {
        // Without RowF nothing can cover Item2 alongside the rest.
        static SHORT: [(&str, &[&str]); 5] = [
            ("RowA", &["Item1", "Item4", "Item7"]),
            ("RowB", &["Item1", "Item4"]),
            ("RowC", &["Item4", "Item5", "Item7"]),
            ("RowD", &["Item3", "Item5", "Item6"]),
            ("RowE", &["Item2", "Item3", "Item6", "Item7"]),
        ];
        let mut matrix = build(&ITEMS, &SHORT);
        let before = matrix.snapshot();
        assert!(all_solutions(&mut matrix).is_empty());
        assert_eq!(matrix.snapshot(), before);
    }

    #[test]
    fn dead_ends_prune_without_corrupting_later_branches() {
        // Branching on "1" tries X and Y first; each zeroes out a column
        // ("3" and "2" respectively) and must back off cleanly before W
        // completes the cover.
        static ITEMS3: [&str; 3] = ["1", "2", "3"];
        static OPTIONS3: [(&str, &[&str]); 4] = [
            ("X", &["1", "2"]),
            ("Y", &["1", "3"]),
            ("Z", &["2", "3"]),
            ("W", &["1", "2", "3"]),
        ];
        let mut matrix = build(&ITEMS3, &OPTIONS3);
        let before = matrix.snapshot();
        assert_eq!(all_solutions(&mut matrix), [["W"]]);
        assert_eq!(matrix.snapshot(), before);
    }

    #[test]
    fn break_stops_traversal_and_restores_matrix() {
        static ITEMS2: [&str; 2] = ["1", "2"];
        static OPTIONS2: [(&str, &[&str]); 3] =
            [("A", &["1"]), ("B", &["2"]), ("C", &["1", "2"])];
        let mut matrix = build(&ITEMS2, &OPTIONS2);
        let before = matrix.snapshot();

        let mut first = Vec::new();
        matrix.solve(|solution| {
            first.push(solution.to_vec());
            ControlFlow::Break(())
        });
        assert_eq!(first, [[&"A", &"B"]]);
        assert_eq!(matrix.snapshot(), before);

        // The abandoned traversal left nothing covered; a full solve
        // still finds both covers.
        assert_eq!(all_solutions(&mut matrix), [vec!["A", "B"], vec!["C"]]);
    }

    #[test]
    fn solutions_follow_branch_order() {
        // Both columns have count 2; the leftmost ("1") is branched on,
        // and its options are tried top to bottom: A first, then C.
        static ITEMS2: [&str; 2] = ["1", "2"];
        static OPTIONS2: [(&str, &[&str]); 3] =
            [("A", &["1"]), ("B", &["2"]), ("C", &["1", "2"])];
        let mut matrix = build(&ITEMS2, &OPTIONS2);
        assert_eq!(all_solutions(&mut matrix), [vec!["A", "B"], vec!["C"]]);
    }
}
