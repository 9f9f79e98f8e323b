//! Short-lived visual effects: engine exhaust, explosion debris, impact
//! flashes, the death-stage blackout.

use glam::{Vec2, Vec4};

use crate::render::{DrawTarget, RenderGroup};

/// A drifting dot that shrinks (or grows) from `start_size` to `end_size`
/// over its lifetime.
#[derive(Debug, Clone)]
pub struct Particle {
    pub pos: Vec2,
    pub velocity: Vec2,
    pub start_size: f32,
    pub end_size: f32,
    pub lifetime: f32,
    pub ttl: f32,
    pub color: Vec4,
    pub group: RenderGroup,
    pub dead: bool,
}

impl Particle {
    pub fn new(pos: Vec2, start_size: f32, end_size: f32, lifetime: f32, color: Vec4) -> Self {
        Self {
            pos,
            velocity: Vec2::ZERO,
            start_size,
            end_size,
            lifetime,
            ttl: lifetime,
            color,
            group: RenderGroup::Neon,
            dead: false,
        }
    }

    /// Current size, interpolated from remaining lifetime.
    pub fn size(&self) -> f32 {
        (self.start_size - self.end_size) * (self.ttl / self.lifetime) + self.end_size
    }

    pub fn update(&mut self, dt: f32) {
        self.pos += self.velocity * dt;
        // Expiry is checked before ttl advances, so a particle survives one
        // extra update after crossing zero.
        if self.ttl < 0.0 {
            self.dead = true;
        }
        self.ttl -= dt;
    }

    pub fn draw(&self, target: &mut dyn DrawTarget) {
        let size = self.size();
        target.ngon(self.pos, Vec2::splat(size), 10, self.color, self.group);
    }
}
