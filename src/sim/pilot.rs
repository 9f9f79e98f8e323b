//! Scripted enemy pilots
//!
//! Pilots hold a ship id rather than the ship itself; a pilot whose ship
//! has left the roster marks itself dead on its next update.

use glam::Vec2;

use super::ship::{Ship, ShipId};
use super::world::World;

/// Escort behavior: fly in from the right edge, then hold position and
/// sweep continuous fire across an angle range.
#[derive(Clone)]
pub struct StrafePilot {
    pub dead: bool,

    ship: ShipId,
    end_pos_x: f32,
    angle_min: f32,
    angle_max: f32,
    /// Heading at takeover; the sweep rotates relative to this.
    dir: Vec2,
    t: f32,
}

impl StrafePilot {
    /// `end_pos_x` is a fraction of world width; angles are radians
    /// relative to the ship's current heading.
    pub fn new(ship: &Ship, end_pos_x: f32, angle_min: f32, angle_max: f32) -> Self {
        Self {
            dead: false,
            ship: ship.id,
            end_pos_x,
            angle_min,
            angle_max,
            dir: ship.dir,
            t: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32, world: &mut World) {
        const APPROACH_THRUST: f32 = 0.2;
        const SWEEP_SPEED: f32 = 0.5;

        let hold_x = self.end_pos_x * world.size().x;
        let Some(ship) = world.ship_mut(self.ship) else {
            self.dead = true;
            return;
        };
        if ship.dead {
            self.dead = true;
            return;
        }

        if ship.pos.x > hold_x {
            ship.control(Vec2::new(-APPROACH_THRUST, 0.0), false);
        } else {
            ship.control(Vec2::ZERO, true);

            // Triangle wave over |t|: min..max and back, period 4 s.
            self.t += SWEEP_SPEED * dt;
            while self.t > 1.0 {
                self.t -= 2.0;
            }
            let angle = self.angle_min + self.t.abs() * (self.angle_max - self.angle_min);
            ship.dir = Vec2::from_angle(angle).rotate(self.dir).normalize();
        }
    }

    /// Hit the ship until nothing is left; the world's next frame turns
    /// that into an explosion.
    pub fn force_kill(&self, world: &mut World) {
        if let Some(ship) = world.ship_mut(self.ship) {
            while ship.health() > 0.0 {
                ship.hit();
            }
        }
    }
}
