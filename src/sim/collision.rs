//! Spear vs target hit detection and damage resolution
//!
//! A spear is a single-use projectile: the first live target within reach
//! takes its damage and the spear is destroyed, whether or not the target
//! dies. Targets are visited in id order, so overlapping targets always
//! resolve against the lowest id.

use glam::DVec2;

use super::spear::{DestroyCause, Spear};
use super::target::Target;
use crate::config::CollisionReach;

/// Result of a single spear/target proximity check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the spear connects
    pub hit: bool,
    /// Centre-to-centre distance
    pub distance: f64,
    /// Effective hit radius used for the check
    pub reach: f64,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            distance: f64::INFINITY,
            reach: 0.0,
        }
    }
}

/// A resolved hit, reported back to the encounter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HitRecord {
    pub spear_id: u32,
    pub target_id: u32,
    pub damage: u32,
    pub remaining: u32,
    pub killed: bool,
}

/// Effective hit radius for a spear against a target
#[inline]
pub fn reach(spear: &Spear, target: &Target, policy: CollisionReach) -> f64 {
    match policy {
        CollisionReach::LengthBased => target.radius + spear.length / 2.0,
        CollisionReach::SpeedBased => target.radius + spear.speed,
    }
}

/// Check whether a flying spear connects with a live target
pub fn spear_target_collision(
    spear: &Spear,
    target: &Target,
    policy: CollisionReach,
) -> CollisionResult {
    if !spear.is_thrown() || !target.is_alive() {
        return CollisionResult::miss();
    }
    let distance = spear.pos.distance(target.pos);
    let reach = reach(spear, target, policy);
    CollisionResult {
        hit: distance <= reach,
        distance,
        reach,
    }
}

/// Index of the first live target the spear connects with
pub fn first_hit(spear: &Spear, targets: &[Target], policy: CollisionReach) -> Option<usize> {
    targets
        .iter()
        .position(|target| spear_target_collision(spear, target, policy).hit)
}

/// Resolve every flying spear against the target list.
///
/// Each spear resolves at most one hit; it is destroyed at `now` on contact.
pub fn resolve_hits(
    spears: &mut [Spear],
    targets: &mut [Target],
    policy: CollisionReach,
    now: f64,
) -> Vec<HitRecord> {
    let mut hits = Vec::new();
    for spear in spears.iter_mut() {
        let Some(index) = first_hit(spear, targets, policy) else {
            continue;
        };
        let target = &mut targets[index];
        let result = target.take_damage(spear.damage);
        spear.destroy(now, DestroyCause::Hit);
        hits.push(HitRecord {
            spear_id: spear.id,
            target_id: target.id,
            damage: spear.damage,
            remaining: result.remaining,
            killed: result.killed,
        });
    }
    hits
}

/// True if a point lies outside the playfield rectangle
#[inline]
pub fn out_of_bounds(pos: DVec2, bounds: DVec2) -> bool {
    pos.x < 0.0 || pos.x > bounds.x || pos.y < 0.0 || pos.y > bounds.y
}
