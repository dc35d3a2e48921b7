//! Multi-dimensional slice addressing over a [`DictGrid`].
//!
//! A key holds one element per axis. Scalar keys read one cell. Every range
//! axis adds one level of nesting to the result, in axis order: `[0..3, 1, 0]`
//! gives three values, `[0..3, 0..2, 0]` gives three sequences of two values.
//! Writes only take scalar keys; bulk writes must be decomposed by the caller.

use gridmodel_core::{slice_range, Coord, Key, ModelError, Result, Shape};
use log::debug;

use crate::dict_grid::DictGrid;

/// Result of reading through a key: one value, or one level of nesting per
/// range axis.
#[derive(Debug, Clone, PartialEq)]
pub enum Cells<T> {
    Value(Option<T>),
    Nested(Vec<Cells<T>>),
}

impl<T> Cells<T> {
    /// The value of a scalar read. `None` for nested results and empty cells.
    pub fn value(&self) -> Option<&T> {
        match self {
            Cells::Value(v) => v.as_ref(),
            Cells::Nested(_) => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Cells::Nested(_))
    }

    /// Number of entries at the top level (1 for a scalar).
    pub fn len(&self) -> usize {
        match self {
            Cells::Value(_) => 1,
            Cells::Nested(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cells::Nested(items) if items.is_empty())
    }

    /// Leaf values in traversal order.
    pub fn flatten(self) -> Vec<Option<T>> {
        match self {
            Cells::Value(v) => vec![v],
            Cells::Nested(items) => items.into_iter().flat_map(Cells::flatten).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataArray {
    dict_grid: DictGrid,
}

impl DataArray {
    pub fn new(shape: Shape) -> Self {
        Self { dict_grid: DictGrid::new(shape) }
    }

    pub fn from_dict_grid(dict_grid: DictGrid) -> Self {
        Self { dict_grid }
    }

    pub fn dict_grid(&self) -> &DictGrid {
        &self.dict_grid
    }

    pub fn dict_grid_mut(&mut self) -> &mut DictGrid {
        &mut self.dict_grid
    }

    pub fn into_dict_grid(self) -> DictGrid {
        self.dict_grid
    }

    pub fn shape(&self) -> &Shape {
        self.dict_grid.shape()
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.dict_grid.set_shape(shape);
    }

    fn check_ndim(&self, ndim: usize) -> Result<()> {
        let expected = self.shape().ndim();
        if ndim != expected {
            return Err(ModelError::DimensionMismatch { expected, got: ndim });
        }
        Ok(())
    }

    fn check_axis(&self, axis: usize) -> Result<()> {
        let ndim = self.shape().ndim();
        if axis >= ndim {
            return Err(ModelError::DimensionMismatch { expected: ndim, got: axis + 1 });
        }
        Ok(())
    }

    /// The single cell `key` names, for write paths.
    pub fn scalar_coord(&self, key: &Key) -> Result<Coord> {
        self.check_ndim(key.ndim())?;
        key.to_coord()
    }

    /// Read through `key`.
    ///
    /// Labels fail fast. A key without ranges performs one lookup and returns
    /// [`Cells::Value`]; otherwise the ranges are expanded against the shape.
    pub fn get(&self, key: &Key) -> Result<Cells<&str>> {
        self.check_ndim(key.ndim())?;
        key.reject_labels()?;

        if key.has_range() {
            return self.cell_array_generator(key).map(Cells::Nested);
        }
        let coord = key.to_coord()?;
        Ok(Cells::Value(self.dict_grid.get(&coord)))
    }

    /// Expand the first range axis of `key` and read every resulting key.
    ///
    /// Each expanded key that still holds a range yields a nested sequence.
    /// Keys without a range yield an empty sequence.
    pub fn cell_array_generator(&self, key: &Key) -> Result<Vec<Cells<&str>>> {
        let Some((axis, slice)) = key.first_range() else {
            return Ok(Vec::new());
        };

        let bound = self.shape().bound(axis).unwrap_or(0);
        let has_subslice = key
            .elements()
            .iter()
            .enumerate()
            .any(|(i, element)| i != axis && element.is_range());

        slice_range(slice, bound)?
            .into_iter()
            .map(|index| {
                let sub_key = key.with_index(axis, index);
                if has_subslice {
                    self.cell_array_generator(&sub_key).map(Cells::Nested)
                } else {
                    Ok(Cells::Value(self.dict_grid.get(&sub_key.to_coord()?)))
                }
            })
            .collect()
    }

    /// Write one cell, returning the previous code. Ranges and labels are rejected.
    pub fn set(&mut self, key: &Key, code: impl Into<String>) -> Result<Option<String>> {
        let coord = self.scalar_coord(key)?;
        Ok(self.dict_grid.set(coord, code.into()))
    }

    /// Clear one cell, returning its code. Ranges and labels are rejected.
    pub fn delete(&mut self, key: &Key) -> Result<Option<String>> {
        let coord = self.scalar_coord(key)?;
        Ok(self.dict_grid.delete(&coord))
    }

    /// Insert `count` empty slices before `insertion_point` on `axis`.
    ///
    /// Stored code at or after the insertion point moves up by `count` and
    /// the axis bound grows by `count`.
    pub fn insert(&mut self, insertion_point: usize, count: usize, axis: usize) -> Result<()> {
        self.check_axis(axis)?;
        if count == 0 {
            return Ok(());
        }

        self.dict_grid.code_mut().remap(|coord| match coord.get(axis) {
            Some(i) if i >= insertion_point => Some(coord.with_axis(axis, i + count)),
            _ => Some(coord.clone()),
        });

        let bound = self.shape().bound(axis).unwrap_or(0);
        let shape = self.shape().with_bound(axis, bound + count);
        self.set_shape(shape);

        debug!("inserted {count} slice(s) at {insertion_point} on axis {axis}");
        Ok(())
    }

    /// Remove `count` slices starting at `deletion_point` on `axis`.
    ///
    /// Code inside the removed slices is dropped and returned; later code
    /// moves down by `count`. The axis bound shrinks but stays positive.
    pub fn remove(
        &mut self,
        deletion_point: usize,
        count: usize,
        axis: usize,
    ) -> Result<Vec<(Coord, String)>> {
        self.check_axis(axis)?;
        if count == 0 {
            return Ok(Vec::new());
        }

        let end = deletion_point.saturating_add(count);
        let removed = self.dict_grid.code_mut().remap(|coord| match coord.get(axis) {
            Some(i) if i >= end => Some(coord.with_axis(axis, i - count)),
            Some(i) if i >= deletion_point => None,
            _ => Some(coord.clone()),
        });

        let bound = self.shape().bound(axis).unwrap_or(0);
        let shape = self.shape().with_bound(axis, bound.saturating_sub(count).max(1));
        self.set_shape(shape);

        debug!(
            "removed {count} slice(s) at {deletion_point} on axis {axis} ({} cell(s) dropped)",
            removed.len()
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmodel_core::{key, SliceSpec};

    fn array() -> DataArray {
        let mut data = DataArray::new(Shape::from([5, 4, 2]));
        for row in 0..5 {
            for col in 0..4 {
                data.set(&key![row, col, 0], format!("{row}{col}")).unwrap();
            }
        }
        data
    }

    #[test]
    fn test_scalar_key_returns_value_directly() {
        let data = array();
        let cells = data.get(&key![2, 3, 0]).unwrap();
        assert!(!cells.is_nested());
        assert_eq!(cells.value(), Some(&"23"));
        assert_eq!(data.get(&key![2, 3, 1]).unwrap(), Cells::Value(None));
    }

    #[test]
    fn test_one_range_axis_gives_flat_sequence() {
        let data = array();
        let cells = data.get(&key![1..4, 2, 0]).unwrap();
        assert_eq!(
            cells,
            Cells::Nested(vec![
                Cells::Value(Some("12")),
                Cells::Value(Some("22")),
                Cells::Value(Some("32")),
            ])
        );
    }

    #[test]
    fn test_two_range_axes_nest_in_axis_order() {
        let data = array();
        let Cells::Nested(rows) = data.get(&key![0..3, 1..3, 0]).unwrap() else {
            panic!("expected nested result");
        };
        assert_eq!(rows.len(), 3);
        for (r, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), 2);
            let values: Vec<Option<String>> =
                row.clone().flatten().into_iter().map(|v| v.map(str::to_string)).collect();
            assert_eq!(values, vec![Some(format!("{r}1")), Some(format!("{r}2"))]);
        }
    }

    #[test]
    fn test_range_is_clamped_to_shape() {
        let data = array();
        let cells = data.get(&key![3.., 0, 0]).unwrap();
        assert_eq!(cells.len(), 2);

        let negative = SliceSpec::new(Some(-2), None, None);
        let cells = data.get(&key![negative, 0, 0]).unwrap();
        assert_eq!(cells.flatten(), vec![Some("30"), Some("40")]);
    }

    #[test]
    fn test_three_range_axes() {
        let data = array();
        let cells = data.get(&key![.., .., ..]).unwrap();
        assert_eq!(cells.len(), 5);
        let flat = cells.flatten();
        assert_eq!(flat.len(), 5 * 4 * 2);
        assert_eq!(flat.iter().filter(|v| v.is_some()).count(), 20);
    }

    #[test]
    fn test_generator_on_scalar_key_is_empty() {
        assert!(array().cell_array_generator(&key![0, 0, 0]).unwrap().is_empty());
    }

    #[test]
    fn test_label_key_fails_fast() {
        let data = array();
        assert!(matches!(
            data.get(&key!["A", 0, 0]),
            Err(ModelError::UnsupportedAddressing(_))
        ));
        // Also when the label comes after a range
        assert!(matches!(
            data.get(&key![0..2, "B", 0]),
            Err(ModelError::UnsupportedAddressing(_))
        ));
    }

    #[test]
    fn test_range_write_fails_without_mutation() {
        let mut data = array();
        let before = data.clone();
        assert!(matches!(
            data.set(&key![0..2, 0, 0], "x"),
            Err(ModelError::UnsupportedAddressing(_))
        ));
        assert!(data.delete(&key![.., 0, 0]).is_err());
        assert_eq!(data, before);
    }

    #[test]
    fn test_wrong_dimensionality() {
        let data = array();
        assert_eq!(
            data.get(&key![0, 0]),
            Err(ModelError::DimensionMismatch { expected: 3, got: 2 })
        );
    }

    #[test]
    fn test_shrink_keeps_cells_addressable() {
        let mut data = array();
        data.set_shape(Shape::from([2, 2, 1]));
        assert_eq!(data.shape(), &Shape::from([2, 2, 1]));
        assert_eq!(data.get(&key![4, 3, 0]).unwrap().value(), Some(&"43"));
        // Ranges only reach up to the new bound
        assert_eq!(data.get(&key![.., 3, 0]).unwrap().len(), 2);
    }

    #[test]
    fn test_insert_rows_shifts_code() {
        let mut data = array();
        data.insert(1, 2, 0).unwrap();
        assert_eq!(data.shape(), &Shape::from([7, 4, 2]));
        assert_eq!(data.get(&key![0, 0, 0]).unwrap().value(), Some(&"00"));
        assert_eq!(data.get(&key![1, 0, 0]).unwrap().value(), None);
        assert_eq!(data.get(&key![2, 0, 0]).unwrap().value(), None);
        assert_eq!(data.get(&key![3, 0, 0]).unwrap().value(), Some(&"10"));
        assert_eq!(data.get(&key![6, 3, 0]).unwrap().value(), Some(&"43"));
    }

    #[test]
    fn test_remove_cols_drops_and_shifts() {
        let mut data = array();
        let mut removed = data.remove(1, 2, 1).unwrap();
        removed.sort();
        assert_eq!(removed.len(), 10);
        assert_eq!(removed[0], (Coord::from([0, 1, 0]), "01".to_string()));

        assert_eq!(data.shape(), &Shape::from([5, 2, 2]));
        assert_eq!(data.get(&key![0, 1, 0]).unwrap().value(), Some(&"03"));
        assert_eq!(data.dict_grid().code().len(), 10);
    }

    #[test]
    fn test_insert_rejects_bad_axis() {
        let mut data = array();
        assert!(matches!(data.insert(0, 1, 3), Err(ModelError::DimensionMismatch { .. })));
    }
}
