//! Multi-dimensional keys mixing scalar indices and slices.
//!
//! Each axis of a key is one [`KeyElement`]. The element kind is decided once,
//! when the key is built, so addressing code can match on it instead of
//! probing values at lookup time.

use std::fmt;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::coord::Coord;
use crate::error::{ModelError, Result};

/// A `(start, stop, step)` range over one axis.
///
/// Components follow Python slice rules: `None` means "from the edge",
/// negative values count from the end of the axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SliceSpec {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl SliceSpec {
    pub fn new(start: Option<isize>, stop: Option<isize>, step: Option<isize>) -> Self {
        Self { start, stop, step }
    }

    /// The whole axis.
    pub fn full() -> Self {
        Self::default()
    }

    /// Same slice with an explicit step.
    pub fn step_by(mut self, step: isize) -> Self {
        self.step = Some(step);
        self
    }

    /// Resolve against an axis of length `bound` into `(start, stop, step)`.
    ///
    /// Out-of-range starts and stops are clamped rather than rejected.
    pub fn indices(&self, bound: usize) -> Result<(isize, isize, isize)> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(ModelError::ZeroSliceStep);
        }
        let len = isize::try_from(bound).unwrap_or(isize::MAX);
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |value: Option<isize>, default: isize| match value {
            None => default,
            Some(v) if v < 0 => (v + len).max(lower),
            Some(v) => v.min(upper),
        };

        let start = clamp(self.start, if step < 0 { upper } else { lower });
        let stop = clamp(self.stop, if step < 0 { lower } else { upper });
        Ok((start, stop, step))
    }
}

/// Expand a slice into the concrete indices it selects on an axis of length `bound`.
///
/// `slice_range(&(1..4).into(), 10)` is `[1, 2, 3]`. Negative starts and stops
/// are taken relative to `bound`; anything past either edge is clamped.
pub fn slice_range(slice: &SliceSpec, bound: usize) -> Result<Vec<usize>> {
    let (start, stop, step) = slice.indices(bound)?;
    let mut indices = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < stop {
            indices.push(i as usize);
            i += step;
        }
    } else {
        while i > stop {
            indices.push(i as usize);
            i += step;
        }
    }
    Ok(indices)
}

impl From<Range<usize>> for SliceSpec {
    fn from(r: Range<usize>) -> Self {
        Self::new(Some(r.start as isize), Some(r.end as isize), None)
    }
}

impl From<RangeInclusive<usize>> for SliceSpec {
    fn from(r: RangeInclusive<usize>) -> Self {
        Self::new(Some(*r.start() as isize), Some(*r.end() as isize + 1), None)
    }
}

impl From<RangeFrom<usize>> for SliceSpec {
    fn from(r: RangeFrom<usize>) -> Self {
        Self::new(Some(r.start as isize), None, None)
    }
}

impl From<RangeTo<usize>> for SliceSpec {
    fn from(r: RangeTo<usize>) -> Self {
        Self::new(None, Some(r.end as isize), None)
    }
}

impl From<RangeFull> for SliceSpec {
    fn from(_: RangeFull) -> Self {
        Self::full()
    }
}

/// Addressing of one axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyElement {
    /// A single index.
    Index(usize),
    /// A slice over the axis.
    Range(SliceSpec),
    /// Label-based addressing (e.g. `"A1"`). Parsed but never resolved.
    Label(String),
}

impl KeyElement {
    pub fn is_range(&self) -> bool {
        matches!(self, KeyElement::Range(_))
    }
}

impl From<usize> for KeyElement {
    fn from(index: usize) -> Self {
        KeyElement::Index(index)
    }
}

impl From<SliceSpec> for KeyElement {
    fn from(slice: SliceSpec) -> Self {
        KeyElement::Range(slice)
    }
}

impl From<&str> for KeyElement {
    fn from(label: &str) -> Self {
        KeyElement::Label(label.to_string())
    }
}

impl From<String> for KeyElement {
    fn from(label: String) -> Self {
        KeyElement::Label(label)
    }
}

macro_rules! range_into_element {
    ($($ty:ty),*) => {
        $(impl From<$ty> for KeyElement {
            fn from(r: $ty) -> Self {
                KeyElement::Range(r.into())
            }
        })*
    };
}

range_into_element!(Range<usize>, RangeInclusive<usize>, RangeFrom<usize>, RangeTo<usize>, RangeFull);

/// An N-dimensional key, one element per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key(Vec<KeyElement>);

/// Build a [`Key`] from per-axis elements: `key![2, 0..5, ..]`.
#[macro_export]
macro_rules! key {
    ($($element:expr),* $(,)?) => {
        $crate::Key::new(vec![$($crate::KeyElement::from($element)),*])
    };
}

impl Key {
    pub fn new(elements: Vec<KeyElement>) -> Self {
        Self(elements)
    }

    pub fn ndim(&self) -> usize {
        self.0.len()
    }

    pub fn elements(&self) -> &[KeyElement] {
        &self.0
    }

    /// Axis and slice of the first range element.
    pub fn first_range(&self) -> Option<(usize, &SliceSpec)> {
        self.0.iter().enumerate().find_map(|(axis, e)| match e {
            KeyElement::Range(slice) => Some((axis, slice)),
            _ => None,
        })
    }

    pub fn has_range(&self) -> bool {
        self.first_range().is_some()
    }

    /// Fails on the first label element.
    pub fn reject_labels(&self) -> Result<()> {
        match self.0.iter().find_map(|e| match e {
            KeyElement::Label(label) => Some(label),
            _ => None,
        }) {
            Some(label) => Err(ModelError::UnsupportedAddressing(format!(
                "label key element '{label}'"
            ))),
            None => Ok(()),
        }
    }

    /// Copy of this key with `axis` replaced by a scalar index.
    pub fn with_index(&self, axis: usize, index: usize) -> Self {
        let mut elements = self.0.clone();
        elements[axis] = KeyElement::Index(index);
        Self(elements)
    }

    /// The single cell this key names. Ranges and labels are rejected.
    pub fn to_coord(&self) -> Result<Coord> {
        self.0
            .iter()
            .map(|element| match element {
                KeyElement::Index(i) => Ok(*i),
                KeyElement::Range(slice) => Err(ModelError::UnsupportedAddressing(format!(
                    "range {slice:?} where a single cell is required"
                ))),
                KeyElement::Label(label) => Err(ModelError::UnsupportedAddressing(format!(
                    "label key element '{label}'"
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Coord::new)
    }
}

impl From<Coord> for Key {
    fn from(coord: Coord) -> Self {
        Self(coord.as_slice().iter().map(|&i| KeyElement::Index(i)).collect())
    }
}

impl From<&Coord> for Key {
    fn from(coord: &Coord) -> Self {
        Self(coord.as_slice().iter().map(|&i| KeyElement::Index(i)).collect())
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fmt_opt = |v: Option<isize>| v.map(|v| v.to_string()).unwrap_or_default();
        write!(f, "[")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match element {
                KeyElement::Index(index) => write!(f, "{index}")?,
                KeyElement::Range(s) => {
                    write!(f, "{}:{}", fmt_opt(s.start), fmt_opt(s.stop))?;
                    if let Some(step) = s.step {
                        write!(f, ":{step}")?;
                    }
                }
                KeyElement::Label(label) => write!(f, "{label:?}")?,
            }
        }
        write!(f, "]")
    }
}
