//! Collision and boundary resolution.
//!
//! Runs after integration and mutates the store in place:
//! 1. Overlapping pairs are handled by the configured [`CollisionPolicy`]
//! 2. Bodies crossing the domain edge are reflected back inside
//!
//! Walls run last so a merged body created near the edge still ends up
//! inside the domain.

use std::collections::HashSet;

use bevy::log::debug;
use bevy::math::DVec2;

use crate::config::{Bounds, CollisionPolicy, SimulationConfig};
use crate::physics::Contact;
use crate::store::BodyStore;
use crate::types::{Body, BodyId};

/// A body–body collision handled during one step.
#[derive(Clone, Debug, PartialEq)]
pub enum CollisionRecord {
    /// `absorbed` was folded into `survivor`.
    Merged {
        survivor: BodyId,
        absorbed: BodyId,
        /// Mass of the survivor after the merge.
        mass: f64,
        pos: DVec2,
    },
    /// The pair exchanged normal velocity.
    Bounced { a: BodyId, b: BodyId },
}

/// What the resolver did during one step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ResolveReport {
    pub collisions: Vec<CollisionRecord>,
    /// Number of body/wall reflections.
    pub wall_hits: usize,
}

/// Resolve overlaps and boundary crossings.
///
/// `contacts` are pairs the force stage already found overlapping; they are
/// resolved even if integration has since moved them apart.
pub fn resolve(
    store: &mut BodyStore,
    config: &SimulationConfig,
    contacts: &[Contact],
) -> ResolveReport {
    let mut report = ResolveReport::default();

    match config.collision_policy {
        CollisionPolicy::None => {}
        CollisionPolicy::Merge => merge_overlaps(store, contacts, &mut report),
        CollisionPolicy::Elastic => bounce_overlaps(store, contacts, &mut report),
    }

    if let Some(bounds) = config.bounds {
        report.wall_hits = reflect_at_bounds(store, &bounds, config.restitution);
    }

    report
}

/// Pairs to consider this step, closest first, each listed once.
fn candidate_pairs(store: &BodyStore, contacts: &[Contact]) -> Vec<(BodyId, BodyId, f64)> {
    let bodies: Vec<&Body> = store.iter().collect();
    let mut seen = HashSet::new();
    let mut pairs = Vec::new();

    let mut push = |a: &Body, b: &Body, pairs: &mut Vec<(BodyId, BodyId, f64)>| {
        let key = (a.id.min(b.id), a.id.max(b.id));
        if seen.insert(key) {
            pairs.push((key.0, key.1, a.pos.distance(b.pos)));
        }
    };

    for contact in contacts {
        if let (Some(a), Some(b)) = (store.get(contact.a), store.get(contact.b)) {
            push(a, b, &mut pairs);
        }
    }
    for (i, a) in bodies.iter().enumerate() {
        for b in &bodies[i + 1..] {
            if a.overlaps(b) {
                push(*a, *b, &mut pairs);
            }
        }
    }

    // Stable sort keeps insertion order between equal separations
    pairs.sort_by(|x, y| x.2.total_cmp(&y.2));
    pairs
}

/// Combine two bodies into the one that survives.
///
/// The heavier body survives (the earlier one on ties) and keeps its id,
/// category and trail. A fixed body always survives and does not move.
pub fn merge_pair(a: &Body, b: &Body) -> (Body, BodyId) {
    let a_survives = match (a.fixed, b.fixed) {
        (true, false) => true,
        (false, true) => false,
        _ => a.mass > b.mass || (a.mass == b.mass && a.id <= b.id),
    };
    let (survivor, absorbed) = if a_survives { (a, b) } else { (b, a) };

    let mass = survivor.mass + absorbed.mass;
    let mut merged = survivor.clone();
    merged.mass = mass;
    // Equal-density discs: areas add
    merged.radius = (survivor.radius.powi(2) + absorbed.radius.powi(2)).sqrt();
    merged.charge = match (survivor.charge, absorbed.charge) {
        (None, None) => None,
        (x, y) => Some(x.unwrap_or(0.0) + y.unwrap_or(0.0)),
    };
    merged.dipole = match (survivor.dipole, absorbed.dipole) {
        (None, None) => None,
        (x, y) => Some(x.unwrap_or(0.0) + y.unwrap_or(0.0)),
    };

    if !survivor.fixed {
        merged.pos = (survivor.pos * survivor.mass + absorbed.pos * absorbed.mass) / mass;
        merged.vel = (survivor.momentum() + absorbed.momentum()) / mass;
    }

    (merged, absorbed.id)
}

fn merge_overlaps(store: &mut BodyStore, contacts: &[Contact], report: &mut ResolveReport) {
    let mut consumed: HashSet<BodyId> = HashSet::new();

    for (a_id, b_id, _) in candidate_pairs(store, contacts) {
        // Each body takes part in at most one merge per step
        if consumed.contains(&a_id) || consumed.contains(&b_id) {
            continue;
        }
        let (Some(a), Some(b)) = (store.get(a_id), store.get(b_id)) else {
            continue;
        };
        if a.fixed && b.fixed {
            continue;
        }

        let (merged, absorbed) = merge_pair(a, b);
        let survivor = merged.id;
        debug!("merge: {} absorbed {} (mass {:.3})", survivor, absorbed, merged.mass);

        report.collisions.push(CollisionRecord::Merged {
            survivor,
            absorbed,
            mass: merged.mass,
            pos: merged.pos,
        });
        store.remove(absorbed);
        if let Some(slot) = store.get_mut(survivor) {
            *slot = merged;
        }
        consumed.insert(a_id);
        consumed.insert(b_id);
    }
}

/// Exchange the normal velocity components of two bodies.
///
/// Uses the 1D elastic collision formulas along the line of centres, so
/// momentum and kinetic energy are conserved for any mass ratio. A fixed
/// body acts as an infinite mass. Returns `false` when the pair is not
/// approaching or the centres coincide.
pub fn elastic_exchange(a: &mut Body, b: &mut Body) -> bool {
    if a.fixed && b.fixed {
        return false;
    }
    let delta = b.pos - a.pos;
    let distance = delta.length();
    if distance <= f64::EPSILON {
        return false;
    }
    let normal = delta / distance;

    let ua = a.vel.dot(normal);
    let ub = b.vel.dot(normal);
    // Separating pairs are left alone so they can drift apart
    if ua - ub <= 0.0 {
        return false;
    }

    let (ua_new, ub_new) = if a.fixed {
        (ua, 2.0 * ua - ub)
    } else if b.fixed {
        (2.0 * ub - ua, ub)
    } else {
        let total = a.mass + b.mass;
        (
            ((a.mass - b.mass) * ua + 2.0 * b.mass * ub) / total,
            ((b.mass - a.mass) * ub + 2.0 * a.mass * ua) / total,
        )
    };

    if !a.fixed {
        a.vel += normal * (ua_new - ua);
    }
    if !b.fixed {
        b.vel += normal * (ub_new - ub);
    }
    true
}

fn bounce_overlaps(store: &mut BodyStore, contacts: &[Contact], report: &mut ResolveReport) {
    for (a_id, b_id, _) in candidate_pairs(store, contacts) {
        let Some((a, b)) = store.pair_mut(a_id, b_id) else {
            continue;
        };
        // Positions stay put; free motion separates the pair afterwards
        if elastic_exchange(a, b) {
            report.collisions.push(CollisionRecord::Bounced { a: a_id, b: b_id });
        }
    }
}

/// Reflect one coordinate off `[min, max]`. Returns whether a wall was hit.
fn reflect_axis(
    pos: &mut f64,
    vel: &mut f64,
    radius: f64,
    min: f64,
    max: f64,
    restitution: f64,
) -> bool {
    let (low, high) = (min + radius, max - radius);
    if low > high {
        // Body wider than the box: pin it to the middle
        *pos = 0.5 * (min + max);
        *vel = 0.0;
        return true;
    }
    if *pos < low {
        *pos = low;
        if *vel < 0.0 {
            *vel = -*vel * restitution;
        }
        true
    } else if *pos > high {
        *pos = high;
        if *vel > 0.0 {
            *vel = -*vel * restitution;
        }
        true
    } else {
        false
    }
}

/// Clamp every free body inside `bounds`, reflecting the outward velocity.
pub fn reflect_at_bounds(store: &mut BodyStore, bounds: &Bounds, restitution: f64) -> usize {
    let mut hits = 0;
    for body in store.iter_mut().filter(|b| !b.fixed) {
        let r = body.radius;
        let (min, max) = (bounds.min, bounds.max);
        let hit_x = reflect_axis(&mut body.pos.x, &mut body.vel.x, r, min.x, max.x, restitution);
        let hit_y = reflect_axis(&mut body.pos.y, &mut body.vel.y, r, min.y, max.y, restitution);
        hits += usize::from(hit_x) + usize::from(hit_y);
    }
    hits
}
