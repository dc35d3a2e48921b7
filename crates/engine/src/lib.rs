pub mod cell_attributes;
pub mod code_array;
pub mod data_array;
pub mod dict_grid;
pub mod document;
pub mod store;
pub mod unredo;

pub use cell_attributes::CellAttributes;
pub use code_array::CodeArray;
pub use data_array::{Cells, DataArray};
pub use dict_grid::DictGrid;
pub use document::{Document, EditArg};
pub use store::KeyValueStore;
pub use unredo::{Command, Operation, UnRedo, DEFAULT_MAX_UNREDO};

pub use gridmodel_core::{ModelError, Result};
