use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Value of one formatting attribute (e.g. `"bgcolor"`, `"fontsize"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(OrderedFloat<f64>),
    Text(String),
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(x) => write!(f, "{}", x.into_inner()),
            AttrValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(b: bool) -> Self {
        AttrValue::Bool(b)
    }
}

impl From<i64> for AttrValue {
    fn from(i: i64) -> Self {
        AttrValue::Int(i)
    }
}

impl From<f64> for AttrValue {
    fn from(x: f64) -> Self {
        AttrValue::Float(OrderedFloat(x))
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

/// Partial mapping of attribute names to values. Keys are ordered so merged
/// results compare and print deterministically.
pub type AttrDelta = BTreeMap<String, AttrValue>;

/// Build an [`AttrDelta`] from `(name, value)` pairs.
pub fn delta<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> AttrDelta
where
    K: Into<String>,
    V: Into<AttrValue>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}
