/// The position of a node in the arena of a [`Matrix`].
///
/// All of the toroidal linked-list structure is expressed through handles
/// of this type rather than references, so a node that has been detached
/// from its neighbors still holds valid handles to them. This is the key
/// property behind the dancing links technique: restoration reads the
/// stale-but-valid links of the detached node itself.
///
/// [`Matrix`]: `crate::Matrix`
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[repr(transparent)]
pub(crate) struct NodeIndex(usize);

impl NodeIndex {
    /// Creates a new handle.
    #[must_use]
    pub(crate) const fn new(ix: usize) -> Self {
        Self(ix)
    }

    /// Returns the handle value as a primitive type.
    #[must_use]
    pub(crate) const fn get(self) -> usize {
        self.0
    }
}

/// The handle of the root sentinel in the arena of a [`Matrix`]: the head
/// of both the horizontal list of column headers and the vertical list of
/// row headers.
///
/// [`Matrix`]: `crate::Matrix`
pub(crate) const ROOT: NodeIndex = NodeIndex::new(0);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_get() {
        assert_eq!(NodeIndex::new(0).get(), 0);
        assert_eq!(NodeIndex::new(123).get(), 123);
        assert_eq!(NodeIndex::new(456789).get(), 456789);
    }

    #[test]
    fn root_is_first_arena_entry() {
        assert_eq!(ROOT.get(), 0);
    }
}
