//! This crate solves the exact cover problem with D. E. Knuth's dancing
//! links technique.
//!
//! Suppose we're given a universe of _items_ and a collection of _options_,
//! each of which covers a subset of the items; the _exact cover_ problem is
//! to find every selection of options such that each item is covered by
//! exactly one selected option. Knuth's paper "Dancing Links",
//! [arXiv:cs/0011047][dl] [cs.DS] (2000), represents the corresponding
//! sparse binary matrix as a toroidal network of doubly-linked nodes, in
//! which a row or column can be removed and later restored in O(1) per
//! link: a detached node keeps its own neighbor links, and those links are
//! all that restoration needs. His backtracking scheme over this structure,
//! _Algorithm X_, visits all exact covers in a recursive, depth-first
//! manner, always branching on a column with the fewest remaining options.
//!
//! The [`Matrix`] structure is the whole of this crate's API: build it
//! from an item list, add options with [`Matrix::add_option`], and visit
//! the solutions with [`Matrix::solve`]. Solutions are produced one at a
//! time as the search finds them; return [`ControlFlow::Break`] from the
//! visitor to stop early. The matrix is restored to its freshly built
//! state whenever `solve` returns, so it can be solved repeatedly.
//!
//! Its [`Display`] implementation renders the active part of the matrix
//! as a binary table, which is handy when debugging an encoding.
//!
//! # Examples
//!
//! The following program solves the worked example from Wikipedia's
//! [Algorithm X](https://en.wikipedia.org/wiki/Knuth%27s_Algorithm_X)
//! article: seven items, six candidate options, one solution.
//!
//! ```
//! use std::ops::ControlFlow;
//! use exact_cover::Matrix;
//!
//! let items = ["Item1", "Item2", "Item3", "Item4", "Item5", "Item6", "Item7"];
//! let mut matrix = Matrix::new(&items);
//! matrix.add_option(&"RowA", &["Item1", "Item4", "Item7"]).unwrap();
//! matrix.add_option(&"RowB", &["Item1", "Item4"]).unwrap();
//! matrix.add_option(&"RowC", &["Item4", "Item5", "Item7"]).unwrap();
//! matrix.add_option(&"RowD", &["Item3", "Item5", "Item6"]).unwrap();
//! matrix.add_option(&"RowE", &["Item2", "Item3", "Item6", "Item7"]).unwrap();
//! matrix.add_option(&"RowF", &["Item2", "Item7"]).unwrap();
//!
//! let mut solutions = Vec::new();
//! matrix.solve(|solution| {
//!     solutions.push(solution.to_vec());
//!     ControlFlow::Continue(())
//! });
//! assert_eq!(solutions, vec![vec![&"RowB", &"RowD", &"RowF"]]);
//! ```
//!
//! Constraints that may be satisfied at most once (rather than exactly
//! once) are expressed by adding one synthetic "skip" option per such
//! item, covering that item alone; see the N-Queens test in this
//! repository, which handles board diagonals this way.
//!
//! [dl]: https://arxiv.org/pdf/cs/0011047.pdf
//! [`ControlFlow::Break`]: std::ops::ControlFlow::Break
//! [`Display`]: std::fmt::Display

mod indices;
mod matrix;
mod search;

pub use matrix::{Error, Matrix};
