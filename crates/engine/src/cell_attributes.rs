//! Selection-indexed formatting overlay.
//!
//! Attributes are kept as an append-ordered log of `(selection, delta)` pairs.
//! The effective attributes of a cell are the deltas of every covering
//! selection merged in log order, so later entries win on key collisions.
//! Entries are never merged or compacted: with partial overlaps the order of
//! the log is what decides the result.

use gridmodel_core::{AttrDelta, Coord, Key, Result, Selection};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CellAttributes {
    entries: Vec<(Selection, AttrDelta)>,
}

impl CellAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective attributes of one cell.
    pub fn get(&self, coord: &Coord) -> AttrDelta {
        let mut result = AttrDelta::new();
        for (selection, delta) in &self.entries {
            if selection.contains(coord) {
                result.extend(delta.iter().map(|(k, v)| (k.clone(), v.clone())));
            }
        }
        result
    }

    /// Effective attributes of the single cell named by `key`.
    ///
    /// Keys with ranges or labels are rejected; look up multiple cells one
    /// coordinate at a time.
    pub fn query(&self, key: &Key) -> Result<AttrDelta> {
        Ok(self.get(&key.to_coord()?))
    }

    pub fn append(&mut self, selection: Selection, delta: AttrDelta) {
        self.entries.push((selection, delta));
    }

    /// Remove the most recent entry. Only used to take back an append.
    pub fn pop(&mut self) -> Option<(Selection, AttrDelta)> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Selection, AttrDelta)> {
        self.entries.iter()
    }
}

impl FromIterator<(Selection, AttrDelta)> for CellAttributes {
    fn from_iter<I: IntoIterator<Item = (Selection, AttrDelta)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmodel_core::{delta, key, AttrValue, ModelError};

    #[test]
    fn test_later_entry_wins_where_selections_overlap() {
        let mut attrs = CellAttributes::new();
        attrs.append(Selection::block(0, 0, 4, 4), delta([("a", 1i64)]));
        attrs.append(Selection::block(2, 2, 9, 9), delta([("a", 2i64)]));

        // In both
        assert_eq!(attrs.get(&Coord::from([3, 3, 0])), delta([("a", 2i64)]));
        // Only in the first
        assert_eq!(attrs.get(&Coord::from([0, 0, 0])), delta([("a", 1i64)]));
        // In neither
        assert!(attrs.get(&Coord::from([0, 9, 0])).is_empty());
    }

    #[test]
    fn test_deltas_merge_per_key() {
        let mut attrs = CellAttributes::new();
        attrs.append(Selection::rows([1]), delta([("bold", AttrValue::from(true))]));
        attrs.append(Selection::cols([2]), delta([("fontsize", AttrValue::from(14i64))]));

        let merged = attrs.get(&Coord::from([1, 2, 0]));
        assert_eq!(merged.get("bold"), Some(&AttrValue::Bool(true)));
        assert_eq!(merged.get("fontsize"), Some(&AttrValue::Int(14)));
    }

    #[test]
    fn test_repeated_selection_is_not_compacted() {
        let mut attrs = CellAttributes::new();
        let sel = Selection::cell(1, 1);
        attrs.append(sel.clone(), delta([("a", 1i64)]));
        attrs.append(sel, delta([("a", 3i64)]));
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get(&Coord::from([1, 1, 0])), delta([("a", 3i64)]));

        attrs.pop();
        assert_eq!(attrs.get(&Coord::from([1, 1, 0])), delta([("a", 1i64)]));
    }

    #[test]
    fn test_query_rejects_ranges_and_labels() {
        let attrs = CellAttributes::new();
        assert!(attrs.query(&key![0, 0, 0]).unwrap().is_empty());
        assert!(matches!(
            attrs.query(&key![0..2, 0, 0]),
            Err(ModelError::UnsupportedAddressing(_))
        ));
        assert!(matches!(
            attrs.query(&key!["A1", 0, 0]),
            Err(ModelError::UnsupportedAddressing(_))
        ));
    }
}
