use std::collections::BTreeSet;

/// Rows picked in the UI for a delete. Rows are positions in the catalog at
/// the time the selection was made; duplicates collapse.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    rows: BTreeSet<usize>,
}

impl Selection {
    /// Nothing selected.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn single(row: usize) -> Self {
        Self {
            rows: BTreeSet::from([row]),
        }
    }

    /// Add the row if absent, drop it otherwise. Returns whether the row is
    /// selected afterwards.
    pub fn toggle(&mut self, row: usize) -> bool {
        if self.rows.remove(&row) {
            false
        } else {
            self.rows.insert(row);
            true
        }
    }

    pub fn contains(&self, row: usize) -> bool {
        self.rows.contains(&row)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Rows in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.iter().copied()
    }
}

impl FromIterator<usize> for Selection {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let mut selection = Selection::none();
        assert!(selection.toggle(2));
        assert!(selection.contains(2));
        assert!(!selection.toggle(2));
        assert!(selection.is_empty());
    }

    #[test]
    fn rows_iterate_in_ascending_order_without_duplicates() {
        let selection: Selection = [4, 1, 4, 0].into_iter().collect();
        assert_eq!(selection.iter().collect::<Vec<_>>(), vec![0, 1, 4]);
        assert_eq!(selection.len(), 3);
    }
}
