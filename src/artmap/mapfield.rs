use std::collections::HashMap;

/// Many-to-one association from an A-category id to a B-category id. An
/// A-id maps to at most one B-id at any time; reassignment only happens
/// through match-tracking allocating a fresh A-category.
#[derive(Debug, Default, Clone)]
pub struct MapField(HashMap<usize, usize>);

impl MapField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, a: usize) -> Option<usize> {
        self.0.get(&a).copied()
    }

    /// Sets `a -> b`. Caller (the match-tracking loop) is responsible for
    /// only calling this when `a` is unset or already maps to `b` — the
    /// many-to-one invariant is a protocol guarantee enforced by the
    /// match-tracking loop, not by this type.
    pub fn set(&mut self, a: usize, b: usize) {
        self.0.insert(a, b);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(&a, &b)| (a, b))
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_entry_returns_none() {
        let map = MapField::new();
        assert_eq!(map.get(0), None);
    }

    #[test]
    fn set_then_get_round_trips() {
        let mut map = MapField::new();
        map.set(3, 7);
        assert_eq!(map.get(3), Some(7));
    }
}
