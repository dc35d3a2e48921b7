// Sparse cell storage
// Unwritten coordinates read as None; no bounds check against a shape.

use gridmodel_core::Coord;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub struct KeyValueStore<V> {
    entries: FxHashMap<Coord, V>,
}

impl<V> Default for KeyValueStore<V> {
    fn default() -> Self {
        Self { entries: FxHashMap::default() }
    }
}

impl<V> KeyValueStore<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value at `coord`, or `None` if nothing was stored there.
    #[inline]
    pub fn get(&self, coord: &Coord) -> Option<&V> {
        self.entries.get(coord)
    }

    /// Insert or overwrite, returning the previous value.
    pub fn set(&mut self, coord: Coord, value: V) -> Option<V> {
        self.entries.insert(coord, value)
    }

    /// Remove the value at `coord`, if any.
    pub fn delete(&mut self, coord: &Coord) -> Option<V> {
        self.entries.remove(coord)
    }

    pub fn contains(&self, coord: &Coord) -> bool {
        self.entries.contains_key(coord)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Present entries, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&Coord, &V)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &Coord> {
        self.entries.keys()
    }

    /// Move every entry to the coordinate `f` returns for it.
    ///
    /// Entries mapped to `None` are dropped from the store and handed back.
    /// `f` must not map two coordinates onto the same target.
    pub fn remap(&mut self, mut f: impl FnMut(&Coord) -> Option<Coord>) -> Vec<(Coord, V)> {
        let old = std::mem::take(&mut self.entries);
        let mut removed = Vec::new();
        self.entries.reserve(old.len());

        for (coord, value) in old {
            match f(&coord) {
                Some(target) => {
                    self.entries.insert(target, value);
                }
                None => removed.push((coord, value)),
            }
        }

        removed
    }
}

impl<V> FromIterator<(Coord, V)> for KeyValueStore<V> {
    fn from_iter<I: IntoIterator<Item = (Coord, V)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

impl<V> Extend<(Coord, V)> for KeyValueStore<V> {
    fn extend<I: IntoIterator<Item = (Coord, V)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

// Serialized as a list of `[coord, value]` pairs: coordinates are not valid
// map keys in most text formats.
impl<V: Serialize> Serialize for KeyValueStore<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for KeyValueStore<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<(Coord, V)>::deserialize(deserializer)?;
        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_missing_is_none() {
        let store: KeyValueStore<String> = KeyValueStore::new();
        assert_eq!(store.get(&Coord::from([0, 0, 0])), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_set_get_delete() {
        let mut store = KeyValueStore::new();
        let c = Coord::from([3, 4, 0]);

        assert_eq!(store.set(c.clone(), "1 + 1".to_string()), None);
        assert_eq!(store.get(&c).map(String::as_str), Some("1 + 1"));
        assert_eq!(store.set(c.clone(), "2".to_string()).as_deref(), Some("1 + 1"));

        assert_eq!(store.delete(&c).as_deref(), Some("2"));
        assert_eq!(store.get(&c), None);
        // Deleting again is a no-op
        assert_eq!(store.delete(&c), None);
    }

    #[test]
    fn test_no_bounds_check() {
        let mut store = KeyValueStore::new();
        let far = Coord::from([1_000_000_000, 7, 99]);
        store.set(far.clone(), 1);
        assert_eq!(store.get(&far), Some(&1));
    }

    #[test]
    fn test_remap_moves_and_drops() {
        let mut store: KeyValueStore<i32> =
            [(Coord::from([0, 0]), 1), (Coord::from([1, 0]), 2), (Coord::from([2, 0]), 3)]
                .into_iter()
                .collect();

        let removed = store.remap(|c| match c.get(0) {
            Some(1) => None,
            Some(r) => Some(c.with_axis(0, r + 10)),
            None => None,
        });

        assert_eq!(removed, vec![(Coord::from([1, 0]), 2)]);
        assert_eq!(store.get(&Coord::from([10, 0])), Some(&1));
        assert_eq!(store.get(&Coord::from([12, 0])), Some(&3));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_json_roundtrip() {
        let mut store = KeyValueStore::new();
        store.set(Coord::from([1, 2, 0]), "x".to_string());
        let json = serde_json::to_string(&store).unwrap();
        assert_eq!(json, r#"[[[1,2,0],"x"]]"#);

        let back: KeyValueStore<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, store);
    }

    proptest! {
        #[test]
        fn prop_set_then_delete_restores_default(
            row in 0usize..50, col in 0usize..50, tab in 0usize..3, value in ".*",
        ) {
            let mut store = KeyValueStore::new();
            let c = Coord::from([row, col, tab]);
            prop_assert_eq!(store.get(&c), None);
            store.set(c.clone(), value.clone());
            prop_assert_eq!(store.get(&c), Some(&value));
            store.delete(&c);
            prop_assert_eq!(store.get(&c), None);
        }
    }
}
