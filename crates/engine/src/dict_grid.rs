use gridmodel_core::{AttrDelta, Coord, Selection, Shape};
use serde::{Deserialize, Serialize};

use crate::cell_attributes::CellAttributes;
use crate::store::KeyValueStore;

/// Everything a saved file contains.
///
/// The shape only bounds what is shown: changing it neither deletes code
/// outside the new bound nor creates any inside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DictGrid {
    shape: Shape,
    code: KeyValueStore<String>,
    pub cell_attributes: CellAttributes,
    pub macros: String,
}

impl DictGrid {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            code: KeyValueStore::new(),
            cell_attributes: CellAttributes::new(),
            macros: String::new(),
        }
    }

    /// Rebuild a grid from its enumerated parts.
    pub fn from_parts(
        shape: Shape,
        entries: impl IntoIterator<Item = (Coord, String)>,
        attributes: impl IntoIterator<Item = (Selection, AttrDelta)>,
        macros: impl Into<String>,
    ) -> Self {
        Self {
            shape,
            code: entries.into_iter().collect(),
            cell_attributes: attributes.into_iter().collect(),
            macros: macros.into(),
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn set_shape(&mut self, shape: Shape) {
        self.shape = shape;
    }

    pub fn get(&self, coord: &Coord) -> Option<&str> {
        self.code.get(coord).map(String::as_str)
    }

    pub fn set(&mut self, coord: Coord, code: String) -> Option<String> {
        self.code.set(coord, code)
    }

    pub fn delete(&mut self, coord: &Coord) -> Option<String> {
        self.code.delete(coord)
    }

    /// All stored code, in no particular order.
    pub fn entries(&self) -> impl Iterator<Item = (&Coord, &str)> {
        self.code.iter().map(|(c, s)| (c, s.as_str()))
    }

    pub fn code(&self) -> &KeyValueStore<String> {
        &self.code
    }

    pub fn code_mut(&mut self) -> &mut KeyValueStore<String> {
        &mut self.code
    }
}
