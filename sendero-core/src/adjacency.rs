//! Owned neighbour lists.

/// Ordered, append-only collection of node identifiers.
///
/// Duplicates are permitted; deduplication is the responsibility of whoever
/// builds the neighbourhood. Cloning produces a fully independent list.
///
/// # Examples
/// ```
/// use sendero_core::AdjacencySet;
///
/// let mut adjacency = AdjacencySet::new();
/// adjacency.push(3);
/// adjacency.push(1);
/// adjacency.push(3);
///
/// let copy = adjacency.clone();
/// adjacency.clear();
///
/// assert!(adjacency.is_empty());
/// assert_eq!(copy.iter().collect::<Vec<_>>(), vec![3, 1, 3]);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AdjacencySet {
    ids: Vec<usize>,
}

impl AdjacencySet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an identifier to the end of the set.
    pub fn push(&mut self, id: usize) {
        self.ids.push(id);
    }

    /// Number of stored identifiers, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns whether the set holds no identifiers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Returns whether `id` occurs at least once.
    #[must_use]
    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    /// Iterates identifiers by value in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.ids.iter().copied()
    }

    /// Borrows the identifiers as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.ids
    }

    /// Releases every identifier and the backing allocation.
    pub fn clear(&mut self) {
        self.ids = Vec::new();
    }
}

impl FromIterator<usize> for AdjacencySet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl Extend<usize> for AdjacencySet {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.ids.extend(iter);
    }
}

impl<'a> IntoIterator for &'a AdjacencySet {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clone_is_independent() {
        let mut original: AdjacencySet = [1, 2].into_iter().collect();
        let mut copy = original.clone();
        copy.push(9);
        original.clear();

        assert!(original.is_empty());
        assert_eq!(copy.as_slice(), &[1, 2, 9]);
    }

    #[test]
    fn keeps_duplicates_in_order() {
        let mut adjacency = AdjacencySet::new();
        adjacency.extend([4, 4, 2]);
        assert_eq!(adjacency.len(), 3);
        assert!(adjacency.contains(4));
        assert!(!adjacency.contains(7));
        assert_eq!((&adjacency).into_iter().collect::<Vec<_>>(), vec![4, 4, 2]);
    }
}
