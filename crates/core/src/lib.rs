pub mod attrs;
pub mod codes;
pub mod coord;
pub mod error;
pub mod key;
pub mod selection;

pub use attrs::{delta, AttrDelta, AttrValue};
pub use coord::{Coord, Shape};
pub use error::{ModelError, Result};
pub use key::{slice_range, Key, KeyElement, SliceSpec};
pub use selection::{Block, Region, Selection};
