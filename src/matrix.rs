use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use thiserror::Error;

use crate::indices::{NodeIndex, ROOT};

/// An error arising while adding options to a [`Matrix`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error<I: fmt::Display> {
    /// An option claimed to cover an item that is not in the matrix's
    /// item list. The matrix is left exactly as it was before the call.
    #[error("option covers unknown item `{0}`")]
    UnknownItem(I),
}

/// What role a node plays in the toroidal structure of a [`Matrix`].
enum Kind<'a, I, O> {
    /// The root sentinel: head of the horizontal list of column headers
    /// and of the vertical list of row headers.
    Root,
    /// A column header, anchoring the vertical list of cells for one item.
    ///
    /// `count` is the number of cells currently linked into that list;
    /// it is the quantity the search branches on, so cover/uncover must
    /// keep it exact at all times.
    Column { label: &'a I, count: usize },
    /// A row header, anchoring the horizontal list of cells for one option.
    Row { label: &'a O },
    /// An incidence cell: the option of its row covers the item of its
    /// column.
    Cell,
}

/// A node in the arena of a [`Matrix`].
///
/// Every node sits in one horizontal and one vertical circular list. The
/// four neighbor links of a node are never cleared when the node is
/// detached from a list; they keep pointing at the neighbors it had at
/// detachment time, which is exactly the information needed to splice it
/// back in. See `Matrix::restore_horizontal` and friends.
struct Node<'a, I, O> {
    left: NodeIndex,
    right: NodeIndex,
    up: NodeIndex,
    down: NodeIndex,
    /// The header of the column this node belongs to. Fixed at
    /// construction time; headers and the root refer to themselves.
    column: NodeIndex,
    /// The header of the row this node belongs to. Fixed at construction
    /// time; headers and the root refer to themselves.
    row: NodeIndex,
    kind: Kind<'a, I, O>,
}

/// A sparse binary constraint matrix in the dancing links representation
/// of D. E. Knuth's paper "Dancing Links", [arXiv:cs/0011047][dl] [cs.DS]
/// (2000).
///
/// Columns represent _items_ (constraints to satisfy) and rows represent
/// _options_ (candidates that each cover a subset of the items). The
/// whole structure lives in a flat arena of nodes addressed by integer
/// handles; links between nodes are handles rather than references, so
/// a detached node's links remain valid and restoration needs no saved
/// state.
///
/// Nodes are only ever created during construction. The search in
/// [`solve`] detaches and reattaches them transiently, and always leaves
/// the matrix in its post-construction state by the time it returns.
///
/// [dl]: https://arxiv.org/pdf/cs/0011047.pdf
/// [`solve`]: Self::solve
pub struct Matrix<'a, I, O> {
    /// The node arena. Entry 0 is always the root sentinel.
    nodes: Vec<Node<'a, I, O>>,
    /// Item label to column header handle. If an item label occurs twice
    /// in the input list, the later column silently shadows the earlier
    /// one here; construction does not reject duplicates.
    columns: HashMap<&'a I, NodeIndex>,
}

impl<'a, I: Eq + Hash, O> Matrix<'a, I, O> {
    /// Creates a matrix with one column per item, in input order, and no
    /// options yet.
    ///
    /// To specify the options that cover these items, use
    /// [`Self::add_option`].
    pub fn new(items: &'a [I]) -> Self {
        let mut matrix = Self {
            nodes: Vec::with_capacity(items.len() + 1),
            columns: HashMap::with_capacity(items.len()),
        };
        let root = matrix.alloc(Kind::Root);
        debug_assert_eq!(root, ROOT);
        for item in items {
            let col = matrix.alloc(Kind::Column {
                label: item,
                count: 0,
            });
            matrix.link_before(ROOT, col);
            matrix.columns.insert(item, col);
        }
        matrix
    }

    /// Appends an option that covers the given items, in the given order.
    ///
    /// The new row is linked below all existing rows, and each of its
    /// cells at the bottom of the corresponding column, so row and cell
    /// order mirror insertion order.
    ///
    /// Fails with [`Error::UnknownItem`] if any element of `covers` is
    /// not in the matrix's item list; in that case no part of the option
    /// is linked in and the matrix is unchanged.
    pub fn add_option(&mut self, label: &'a O, covers: &[I]) -> Result<(), Error<I>>
    where
        I: Clone + fmt::Display,
    {
        // Resolve every item before touching a single link, so a failed
        // lookup cannot leave a partially linked option behind.
        let mut cols = Vec::with_capacity(covers.len());
        for item in covers {
            match self.columns.get(item) {
                Some(&col) => cols.push(col),
                None => return Err(Error::UnknownItem(item.clone())),
            }
        }
        let row = self.alloc(Kind::Row { label });
        self.link_above(ROOT, row);
        for col in cols {
            let cell = self.alloc(Kind::Cell);
            self.node_mut(cell).column = col;
            self.node_mut(cell).row = row;
            self.link_before(row, cell);
            self.link_above(col, cell);
            *self.count_mut(col) += 1;
        }
        Ok(())
    }
}

impl<'a, I, O> Matrix<'a, I, O> {
    /// Pushes a fresh node onto the arena, linked only to itself.
    fn alloc(&mut self, kind: Kind<'a, I, O>) -> NodeIndex {
        let ix = NodeIndex::new(self.nodes.len());
        self.nodes.push(Node {
            left: ix,
            right: ix,
            up: ix,
            down: ix,
            column: ix,
            row: ix,
            kind,
        });
        ix
    }

    // Linking primitives. Each runs in O(1).

    /// Inserts `node` immediately above `anchor` in `anchor`'s vertical
    /// list. When `anchor` is a list head, this appends at the bottom.
    fn link_above(&mut self, anchor: NodeIndex, node: NodeIndex) {
        let up = self.node(anchor).up;
        let n = self.node_mut(node);
        n.up = up;
        n.down = anchor;
        self.node_mut(up).down = node;
        self.node_mut(anchor).up = node;
    }

    /// Inserts `node` immediately before `anchor` in `anchor`'s
    /// horizontal list. When `anchor` is a list head, this appends at
    /// the right end.
    fn link_before(&mut self, anchor: NodeIndex, node: NodeIndex) {
        let left = self.node(anchor).left;
        let n = self.node_mut(node);
        n.left = left;
        n.right = anchor;
        self.node_mut(left).right = node;
        self.node_mut(anchor).left = node;
    }

    /// Removes `node` from its horizontal list. The node's own links are
    /// left untouched; they are what [`Self::restore_horizontal`] reads
    /// to splice it back in.
    fn detach_horizontal(&mut self, node: NodeIndex) {
        let (left, right) = {
            let n = self.node(node);
            (n.left, n.right)
        };
        self.node_mut(left).right = right;
        self.node_mut(right).left = left;
    }

    /// Reinserts `node` into its horizontal list between the neighbors
    /// it had when detached.
    ///
    /// Only valid while those neighbors are in the same relative state
    /// as immediately after the matching [`Self::detach_horizontal`];
    /// detaches and restores must nest strictly.
    fn restore_horizontal(&mut self, node: NodeIndex) {
        let (left, right) = {
            let n = self.node(node);
            (n.left, n.right)
        };
        self.node_mut(left).right = node;
        self.node_mut(right).left = node;
    }

    /// Removes `node` from its vertical list, preserving the node's own
    /// links. Counterpart of [`Self::detach_horizontal`].
    fn detach_vertical(&mut self, node: NodeIndex) {
        let (up, down) = {
            let n = self.node(node);
            (n.up, n.down)
        };
        self.node_mut(up).down = down;
        self.node_mut(down).up = up;
    }

    /// Reinserts `node` into its vertical list. The strict-nesting
    /// contract of [`Self::restore_horizontal`] applies here too.
    fn restore_vertical(&mut self, node: NodeIndex) {
        let (up, down) = {
            let n = self.node(node);
            (n.up, n.down)
        };
        self.node_mut(up).down = node;
        self.node_mut(down).up = node;
    }

    // The cover/uncover "dance".

    /// Covers a column: removes its header from the horizontal list of
    /// columns, then detaches every option that covers its item from all
    /// other lists those options appear in.
    ///
    /// Selecting one of the removed options later would cover some item
    /// twice, so they are out of consideration until [`Self::uncover`]
    /// puts them back. Row headers ride along in their row's horizontal
    /// list: detaching one vertically removes the row from the root's
    /// row list, with no count to adjust.
    pub(crate) fn cover(&mut self, col: NodeIndex) {
        self.detach_horizontal(col);
        let mut i = self.node(col).down;
        while i != col {
            let mut j = self.node(i).right;
            while j != i {
                self.detach_vertical(j);
                if let Kind::Cell = self.node(j).kind {
                    let c = self.node(j).column;
                    *self.count_mut(c) -= 1;
                }
                j = self.node(j).right;
            }
            i = self.node(i).down;
        }
    }

    /// Undoes the matching [`Self::cover`], restoring every link and
    /// count to its prior value.
    ///
    /// Traversal order is the exact mirror of `cover` (bottom to top,
    /// right to left, header last): the detaches mutated shared neighbor
    /// links, so restoring in any other order would reattach nodes to
    /// the wrong neighbors.
    pub(crate) fn uncover(&mut self, col: NodeIndex) {
        let mut i = self.node(col).up;
        while i != col {
            let mut j = self.node(i).left;
            while j != i {
                self.restore_vertical(j);
                if let Kind::Cell = self.node(j).kind {
                    let c = self.node(j).column;
                    *self.count_mut(c) += 1;
                }
                j = self.node(j).left;
            }
            i = self.node(i).up;
        }
        self.restore_horizontal(col);
    }

    /// Selects an option for the partial solution by covering the column
    /// of every cell in its row, left to right. This removes all options
    /// that compete with `row` for any of the items it covers.
    pub(crate) fn select_option(&mut self, row: NodeIndex) {
        let mut j = self.node(row).right;
        while j != row {
            let col = self.node(j).column;
            self.cover(col);
            j = self.node(j).right;
        }
    }

    /// Undoes the matching [`Self::select_option`], uncovering right to
    /// left.
    pub(crate) fn restore_option(&mut self, row: NodeIndex) {
        let mut j = self.node(row).left;
        while j != row {
            let col = self.node(j).column;
            self.uncover(col);
            j = self.node(j).left;
        }
    }

    // Accessors.

    fn node(&self, ix: NodeIndex) -> &Node<'a, I, O> {
        &self.nodes[ix.get()]
    }

    fn node_mut(&mut self, ix: NodeIndex) -> &mut Node<'a, I, O> {
        &mut self.nodes[ix.get()]
    }

    pub(crate) fn right(&self, ix: NodeIndex) -> NodeIndex {
        self.node(ix).right
    }

    pub(crate) fn down(&self, ix: NodeIndex) -> NodeIndex {
        self.node(ix).down
    }

    pub(crate) fn row_of(&self, ix: NodeIndex) -> NodeIndex {
        self.node(ix).row
    }

    /// Returns the number of active cells in a column's vertical list.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not refer to a column header; that is
    /// an internal contract violation, not a recoverable condition.
    pub(crate) fn count(&self, ix: NodeIndex) -> usize {
        match self.node(ix).kind {
            Kind::Column { count, .. } => count,
            _ => panic!("node at {ix:?} is not a column header"),
        }
    }

    fn count_mut(&mut self, ix: NodeIndex) -> &mut usize {
        match &mut self.node_mut(ix).kind {
            Kind::Column { count, .. } => count,
            _ => panic!("node at {ix:?} is not a column header"),
        }
    }

    fn column_label(&self, ix: NodeIndex) -> &'a I {
        match self.node(ix).kind {
            Kind::Column { label, .. } => label,
            _ => panic!("node at {ix:?} is not a column header"),
        }
    }

    /// Returns the option label carried by a row header.
    ///
    /// # Panics
    ///
    /// Panics if the handle does not refer to a row header.
    pub(crate) fn row_label(&self, ix: NodeIndex) -> &'a O {
        match self.node(ix).kind {
            Kind::Row { label } => label,
            _ => panic!("node at {ix:?} is not a row header"),
        }
    }

    /// Captures every node's four links together with the column counts,
    /// for exact-restoration assertions in tests.
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> Vec<(usize, usize, usize, usize, Option<usize>)> {
        self.nodes
            .iter()
            .map(|n| {
                let count = match n.kind {
                    Kind::Column { count, .. } => Some(count),
                    _ => None,
                };
                (n.left.get(), n.right.get(), n.up.get(), n.down.get(), count)
            })
            .collect()
    }
}

/// Renders the currently active part of the matrix as a binary table:
/// a line of column labels, a line of their counts, then one line per
/// active row with an incidence bit per active column. Covered columns
/// and detached rows do not appear, so dumping mid-search shows the
/// reduced matrix the search actually sees.
impl<'a, I: fmt::Display, O: fmt::Display> fmt::Display for Matrix<'a, I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut num_columns = 0;
        write!(f, "{:20}:", "")?;
        let mut col = self.node(ROOT).right;
        while col != ROOT {
            write!(f, "{:^8}", self.column_label(col).to_string())?;
            num_columns += 1;
            col = self.node(col).right;
        }
        writeln!(f)?;

        write!(f, "{:20}:", "")?;
        let mut col = self.node(ROOT).right;
        while col != ROOT {
            write!(f, "{:^8}", self.count(col))?;
            col = self.node(col).right;
        }
        writeln!(f)?;
        writeln!(f, "{}", "-".repeat(20 + num_columns * 8))?;

        let mut row = self.node(ROOT).down;
        while row != ROOT {
            write!(f, "{:<20}:", self.row_label(row).to_string())?;
            let mut cell = self.node(row).right;
            let mut col = self.node(ROOT).right;
            while col != ROOT {
                let bit = if cell != row && self.node(cell).column == col {
                    cell = self.node(cell).right;
                    1
                } else {
                    0
                };
                write!(f, "{bit:^8}")?;
                col = self.node(col).right;
            }
            writeln!(f)?;
            row = self.node(row).down;
        }
        Ok(())
    }
}
