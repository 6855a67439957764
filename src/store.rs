//! Authoritative collection of simulated bodies.
//!
//! Bodies live in an arena indexed by [`BodyId`]. Removal leaves a hole so
//! ids stay stable and iteration keeps insertion order, which keeps merge and
//! removal outcomes deterministic.
//!
//! Holes are only reclaimed by [`BodyStore::clear`], so iteration cost is
//! proportional to the number of ids ever issued, not to the live count.

use crate::types::{Body, BodyId, InvalidBodyError};

#[derive(Clone, Debug, Default)]
pub struct BodyStore {
    slots: Vec<Option<Body>>,
    len: usize,
}

impl BodyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a body, returning its new id.
    ///
    /// On error the store is left unchanged.
    pub fn add(&mut self, mut body: Body) -> Result<BodyId, InvalidBodyError> {
        body.validate()?;
        let id = BodyId(self.slots.len() as u32);
        body.id = id;
        self.slots.push(Some(body));
        self.len += 1;
        Ok(id)
    }

    /// Remove a body, returning it if it was present.
    pub fn remove(&mut self, id: BodyId) -> Option<Body> {
        let removed = self.slots.get_mut(id.index())?.take();
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.slots.get(id.index())?.as_ref()
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.slots.get_mut(id.index())?.as_mut()
    }

    /// Mutable access to two distinct bodies at once.
    pub fn pair_mut(&mut self, a: BodyId, b: BodyId) -> Option<(&mut Body, &mut Body)> {
        let (ia, ib) = (a.index(), b.index());
        if ia == ib || ia >= self.slots.len() || ib >= self.slots.len() {
            return None;
        }
        let (lo, hi) = (ia.min(ib), ia.max(ib));
        let (head, tail) = self.slots.split_at_mut(hi);
        let first = head[lo].as_mut()?;
        let second = tail[0].as_mut()?;
        if ia < ib {
            Some((first, second))
        } else {
            Some((second, first))
        }
    }

    pub fn contains(&self, id: BodyId) -> bool {
        self.get(id).is_some()
    }

    /// Bodies in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Body> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> + '_ {
        self.slots.iter_mut().filter_map(Option::as_mut)
    }

    /// Snapshot of all bodies in insertion order.
    pub fn all(&self) -> Vec<Body> {
        self.iter().cloned().collect()
    }

    pub fn ids(&self) -> Vec<BodyId> {
        self.iter().map(|b| b.id).collect()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every body. Ids start from zero again afterwards.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.len = 0;
    }

    /// Most massive body, first inserted wins ties.
    pub fn heaviest(&self) -> Option<&Body> {
        self.iter().fold(None, |best: Option<&Body>, b| match best {
            Some(best) if best.mass >= b.mass => Some(best),
            _ => Some(b),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::math::DVec2;

    fn body(x: f64, mass: f64) -> Body {
        Body::new(DVec2::new(x, 0.0), DVec2::ZERO, mass, 1.0)
    }

    #[test]
    fn test_add_assigns_sequential_ids() {
        let mut store = BodyStore::new();
        let a = store.add(body(0.0, 1.0)).unwrap();
        let b = store.add(body(1.0, 1.0)).unwrap();
        assert_eq!(a, BodyId(0));
        assert_eq!(b, BodyId(1));
        assert_eq!(store.get(b).unwrap().id, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_invalid_add_leaves_store_unchanged() {
        let mut store = BodyStore::new();
        store.add(body(0.0, 1.0)).unwrap();
        let err = store.add(body(1.0, -1.0)).unwrap_err();
        assert_eq!(err, InvalidBodyError::NonPositiveMass(-1.0));
        assert_eq!(store.len(), 1);
        assert_eq!(store.ids(), vec![BodyId(0)]);
    }

    #[test]
    fn test_remove_keeps_ids_stable() {
        let mut store = BodyStore::new();
        let a = store.add(body(0.0, 1.0)).unwrap();
        let b = store.add(body(1.0, 1.0)).unwrap();
        let c = store.add(body(2.0, 1.0)).unwrap();

        assert!(store.remove(b).is_some());
        assert!(store.remove(b).is_none());
        assert_eq!(store.ids(), vec![a, c]);
        assert_eq!(store.get(c).unwrap().pos.x, 2.0);

        // New bodies never reuse a removed id
        let d = store.add(body(3.0, 1.0)).unwrap();
        assert_eq!(d, BodyId(3));
    }

    #[test]
    fn test_pair_mut_returns_in_argument_order() {
        let mut store = BodyStore::new();
        let a = store.add(body(0.0, 1.0)).unwrap();
        let b = store.add(body(5.0, 2.0)).unwrap();

        let (second, first) = store.pair_mut(b, a).unwrap();
        assert_eq!(second.id, b);
        assert_eq!(first.id, a);
        assert!(store.pair_mut(a, a).is_none());
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = BodyStore::new();
        store.add(body(0.0, 1.0)).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }

    #[test]
    fn test_heaviest_prefers_first_on_ties() {
        let mut store = BodyStore::new();
        store.add(body(0.0, 3.0)).unwrap();
        let b = store.add(body(1.0, 5.0)).unwrap();
        store.add(body(2.0, 5.0)).unwrap();
        assert_eq!(store.heaviest().unwrap().id, b);
    }
}
