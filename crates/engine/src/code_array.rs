use std::ops::{Deref, DerefMut};

use gridmodel_core::{Key, Result, Shape};

use crate::data_array::{Cells, DataArray};
use crate::dict_grid::DictGrid;

/// Addressable surface over stored cell code.
///
/// Reads and writes follow [`DataArray`] exactly: scalar or sliced reads,
/// scalar-only writes. Everything else of the data array is reachable
/// through `Deref`.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeArray {
    data_array: DataArray,
}

impl CodeArray {
    pub fn new(shape: Shape) -> Self {
        Self { data_array: DataArray::new(shape) }
    }

    pub fn from_dict_grid(dict_grid: DictGrid) -> Self {
        Self { data_array: DataArray::from_dict_grid(dict_grid) }
    }

    /// Code stored under `key`.
    pub fn get_code(&self, key: &Key) -> Result<Cells<&str>> {
        self.data_array.get(key)
    }

    /// Replace the code of one cell, returning the previous code.
    pub fn set_code(&mut self, key: &Key, code: impl Into<String>) -> Result<Option<String>> {
        self.data_array.set(key, code)
    }

    /// Clear the code of one cell, returning it.
    pub fn delete_code(&mut self, key: &Key) -> Result<Option<String>> {
        self.data_array.delete(key)
    }
}

impl Deref for CodeArray {
    type Target = DataArray;

    fn deref(&self) -> &DataArray {
        &self.data_array
    }
}

impl DerefMut for CodeArray {
    fn deref_mut(&mut self) -> &mut DataArray {
        &mut self.data_array
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridmodel_core::{key, ModelError};

    #[test]
    fn test_code_roundtrip() {
        let mut code = CodeArray::new(Shape::from([10, 10, 1]));
        assert_eq!(code.set_code(&key![0, 0, 0], "1 + 2").unwrap(), None);
        assert_eq!(code.get_code(&key![0, 0, 0]).unwrap().value(), Some(&"1 + 2"));
        assert_eq!(code.delete_code(&key![0, 0, 0]).unwrap().as_deref(), Some("1 + 2"));
        assert_eq!(code.get_code(&key![0, 0, 0]).unwrap(), Cells::Value(None));
    }

    #[test]
    fn test_slice_read_and_scalar_only_write() {
        let mut code = CodeArray::new(Shape::from([3, 3, 1]));
        code.set_code(&key![1, 1, 0], "x").unwrap();

        let column = code.get_code(&key![.., 1, 0]).unwrap();
        assert_eq!(column.flatten(), vec![None, Some("x"), None]);

        assert!(matches!(
            code.set_code(&key![.., 1, 0], "y"),
            Err(ModelError::UnsupportedAddressing(_))
        ));
    }

    #[test]
    fn test_shape_passes_through() {
        let mut code = CodeArray::new(Shape::from([3, 3, 1]));
        code.set_shape(Shape::from([4, 4, 1]));
        assert_eq!(code.dict_grid().shape(), &Shape::from([4, 4, 1]));
    }
}
