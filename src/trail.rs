//! Bounded position history for trajectory display.
//!
//! Trails are observational only: physics never reads them.

use std::collections::VecDeque;

use bevy::math::DVec2;

use crate::store::BodyStore;

/// FIFO of past positions, oldest first.
#[derive(Clone, Debug, Default)]
pub struct Trail {
    points: VecDeque<DVec2>,
}

impl Trail {
    /// Append a position, discarding the oldest entries beyond `capacity`.
    pub fn record(&mut self, pos: DVec2, capacity: usize) {
        if capacity == 0 {
            self.points.clear();
            return;
        }
        // Capacity may shrink between steps.
        while self.points.len() >= capacity {
            self.points.pop_front();
        }
        self.points.push_back(pos);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Drop the oldest entries until at most `capacity` remain.
    pub fn truncate(&mut self, capacity: usize) {
        while self.points.len() > capacity {
            self.points.pop_front();
        }
    }

    /// Most recent position, if any.
    pub fn latest(&self) -> Option<DVec2> {
        self.points.back().copied()
    }

    /// Positions from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = DVec2> + '_ {
        self.points.iter().copied()
    }
}

/// Append every body's current position to its trail.
pub fn record_all(store: &mut BodyStore, capacity: usize) {
    for body in store.iter_mut() {
        let pos = body.pos;
        body.trail.record(pos, capacity);
    }
}
