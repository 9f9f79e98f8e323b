//! Projectiles and their swept collision against ship hulls.
//!
//! A projectile tests the full segment it travels in a frame, so it cannot
//! tunnel through a hull between frames no matter how fast it moves.

use glam::{Vec2, Vec4};

use crate::render::{DrawTarget, RenderGroup};
use crate::sim::geom::{Aabb, segment_intersection};
use crate::sim::particle::Particle;
use crate::sim::ship::{Faction, Ship};

/// Lifetime of the flash spawned where a projectile strikes a hull.
const IMPACT_FLASH_TTL: f32 = 0.15;

#[derive(Debug, Clone)]
pub struct Projectile {
    pub faction: Faction,
    pub pos: Vec2,
    pub velocity: Vec2,
    pub extent: Vec2,
    pub color: Vec4,
    pub dead: bool,
}

impl Projectile {
    pub fn new(faction: Faction, pos: Vec2, velocity: Vec2, extent: Vec2, color: Vec4) -> Self {
        Self {
            faction,
            pos,
            velocity,
            extent,
            color,
            dead: false,
        }
    }

    /// Box around the travel from the current position through `swept`,
    /// padded by half the largest extent.
    pub fn aabb(&self, swept: Vec2) -> Aabb {
        Aabb::enclosing(self.pos, self.pos + swept).inflate(self.extent.max_element() / 2.0)
    }

    /// Advances the projectile, resolving swept collision against `ships`.
    ///
    /// Ships are scanned in list order and the first ship with any edge hit
    /// ends the scan: that ship takes exactly one hit at the intersection
    /// nearest the old position, the projectile dies, and an impact flash is
    /// spawned at the hit point. With no hit the projectile just moves.
    pub fn update(&mut self, dt: f32, ships: &mut [Ship], particles: &mut Vec<Particle>) {
        let swept = self.velocity * dt;
        let target = self.pos + swept;
        let broad = self.aabb(swept);

        for ship in ships.iter_mut() {
            if ship.dead || ship.faction == self.faction {
                continue;
            }
            if !broad.overlaps(&ship.aabb()) {
                continue;
            }
            let mut nearest: Option<(f32, Vec2)> = None;
            for (e1, e2) in ship.hull_edges() {
                if let Some(hit) = segment_intersection(self.pos, target, e1, e2) {
                    let dist = self.pos.distance_squared(hit);
                    if nearest.is_none_or(|(best, _)| dist < best) {
                        nearest = Some((dist, hit));
                    }
                }
            }
            if let Some((_, point)) = nearest {
                ship.hit();
                self.dead = true;
                particles.push(Particle::new(
                    point,
                    self.extent.max_element() * 2.0,
                    0.0,
                    IMPACT_FLASH_TTL,
                    self.color,
                ));
                return;
            }
        }
        self.pos = target;
    }

    pub fn draw(&self, target: &mut dyn DrawTarget) {
        target.ngon(self.pos, self.extent, 10, self.color, RenderGroup::Neon);
    }
}
