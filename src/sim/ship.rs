//! Ships: the player craft and everything sent against it
//!
//! A ship is a static model plus a mutable pose. Steering goes through
//! [`Ship::control`], whether it comes from player input or a stage script.
//! Updating a ship feeds projectiles and exhaust particles back into the
//! world and sound cues into the [`CuePlayer`].

use glam::{Affine2, Vec2};
use rand::Rng;

use crate::audio::CuePlayer;
use crate::perp;
use crate::render::{DrawTarget, RenderGroup, WHITE};

use super::geom::{Aabb, segment_intersection};
use super::model::Model;
use super::particle::Particle;
use super::projectile::Projectile;
use super::world::World;

/// Stable handle to a ship; survives list compaction across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShipId(pub u32);

/// Which side a ship fights for. Collisions and projectiles only ever
/// connect across factions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Faction {
    Player,
    Hostile,
    /// Script-driven during intro and outro. Invulnerable, never contained
    /// by the world edges.
    Autopilot,
}

/// Exhaust drift speed relative to the ship, world units per second.
const EXHAUST_SPEED: f32 = 100.0;
/// Engines cut out when the ship slides sideways faster than this.
const MAX_SIDE_VELOCITY: f32 = 90.0;

#[derive(Debug)]
pub struct Ship {
    pub id: ShipId,
    pub faction: Faction,
    pub dead: bool,
    pub pos: Vec2,
    /// Unit heading. Guns shoot and engines blow along it.
    pub dir: Vec2,
    pub velocity: Vec2,
    pub model: &'static Model,
    pub hp: i32,
    /// Set on hit, cleared by the world at the top of the next frame.
    pub damaged: bool,

    transform: Affine2,
    fire: bool,
    gun_cooldowns: Vec<f32>,
    engine_cooldowns: Vec<f32>,
}

impl Ship {
    pub fn new(id: ShipId, faction: Faction, model: &'static Model, pos: Vec2) -> Self {
        let dir = match faction {
            Faction::Player => Vec2::X,
            _ => -Vec2::X,
        };
        let mut ship = Self {
            id,
            faction,
            dead: false,
            pos,
            dir,
            velocity: Vec2::ZERO,
            model,
            hp: model.hp,
            damaged: false,
            transform: Affine2::IDENTITY,
            fire: false,
            gun_cooldowns: vec![0.0; model.guns.len()],
            engine_cooldowns: vec![0.0; model.engines.len()],
        };
        ship.transform = ship.calc_trs(1.0);
        ship
    }

    /// Steer the ship. Thrust is a per-axis fraction of the model's top
    /// speed; the resulting velocity is clamped to that speed. Zero thrust
    /// stops the ship without touching its heading.
    pub fn control(&mut self, thrust: Vec2, fire: bool) {
        self.fire = fire;
        self.velocity = (thrust * self.model.speed).clamp_length_max(self.model.speed);
    }

    /// Advance the ship one frame. `before` and `after` are the remaining
    /// ships in world order, split around this one.
    ///
    /// Order matters: the ram scan runs first so a ship that just lost its
    /// last hit point still trades damage, then the death check, and only a
    /// surviving ship moves, shoots and burns fuel.
    pub fn update(
        &mut self,
        dt: f32,
        world: &mut World,
        before: &mut [Ship],
        after: &mut [Ship],
        cues: &mut dyn CuePlayer,
    ) {
        for other in before.iter_mut().chain(after.iter_mut()) {
            if other.dead || other.faction == self.faction {
                continue;
            }
            if self.collides(other) {
                other.hit();
                self.hit();
            }
        }

        if self.hp <= 0 {
            self.dead = true;
            self.explode(world, cues);
            return;
        }

        self.pos += self.velocity * dt;
        self.stay_in_world(world.size());
        self.transform = self.calc_trs(1.0);
        self.update_guns(dt, world, cues);
        self.update_engines(dt, world);
    }

    fn update_guns(&mut self, dt: f32, world: &mut World, cues: &mut dyn CuePlayer) {
        let guns = self.model.guns;
        for (i, gun) in guns.iter().enumerate() {
            self.gun_cooldowns[i] -= dt;
            // Catch-up loop: a large dt releases every shot it covers.
            while self.fire && self.gun_cooldowns[i] < 0.0 {
                let mount = self.transform.transform_point2(gun.pos);
                let shot =
                    Projectile::new(self.faction, mount, self.dir * gun.speed, gun.size, gun.color);
                world.add_projectile(shot);
                if let Some(cue) = gun.cue {
                    cues.play(cue.label, cue.gain, cue.pitch);
                }
                self.gun_cooldowns[i] += 1.0 / gun.rate;
            }
            // No banked shots while the trigger is up.
            if !self.fire && self.gun_cooldowns[i] < 0.0 {
                self.gun_cooldowns[i] = 0.0;
            }
        }
    }

    fn update_engines(&mut self, dt: f32, world: &mut World) {
        let engines = self.model.engines;
        for (i, engine) in engines.iter().enumerate() {
            self.engine_cooldowns[i] -= dt;

            let ahead = self.velocity.dot(self.dir);
            let side = self.velocity - self.dir * ahead;
            let active = engine.min_velocity <= ahead && side.length() < MAX_SIDE_VELOCITY;

            while active && self.engine_cooldowns[i] < 0.0 {
                let shift = world.rng_mut().random::<f32>() - 0.5;
                let mount = self.transform.transform_point2(engine.pos)
                    + perp(self.dir) * (shift * engine.size / 2.0);
                let lifetime = engine.ttl + engine.ttl * world.rng_mut().random::<f32>();

                let mut exhaust = Particle::new(
                    mount,
                    engine.particle_size.y,
                    engine.particle_size.x,
                    lifetime,
                    engine.color,
                );
                exhaust.velocity = self.dir * -EXHAUST_SPEED;
                exhaust.group = RenderGroup::Engine;
                world.add_particle(exhaust);

                self.engine_cooldowns[i] += 1.0 / engine.rate;
            }
            if !active && self.engine_cooldowns[i] < 0.0 {
                self.engine_cooldowns[i] = 0.0;
            }
        }
    }

    /// Register one point of damage. Autopilot ships shrug everything off.
    pub fn hit(&mut self) {
        if self.faction != Faction::Autopilot {
            self.hp -= 1;
            self.damaged = true;
        }
    }

    /// Remaining health as a fraction of the model's hit points, clamped
    /// to zero for ships that took overkill damage.
    pub fn health(&self) -> f32 {
        self.hp.max(0) as f32 / self.model.hp as f32
    }

    /// Square bounding box around the ship, sized by the larger hull
    /// dimension so it covers the hull at any heading.
    pub fn aabb(&self) -> Aabb {
        let side = self.model.size.max_element();
        Aabb::from_center(self.pos, Vec2::splat(side))
    }

    /// World-space hull edges, three per triangle.
    pub fn hull_edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let trs = self.transform;
        self.model.hull.chunks_exact(3).flat_map(move |tri| {
            let a = trs.transform_point2(tri[0]);
            let b = trs.transform_point2(tri[1]);
            let c = trs.transform_point2(tri[2]);
            [(a, b), (b, c), (c, a)]
        })
    }

    fn collides(&self, other: &Ship) -> bool {
        if !self.aabb().overlaps(&other.aabb()) {
            return false;
        }
        self.hull_edges().any(|(a1, a2)| {
            other
                .hull_edges()
                .any(|(b1, b2)| segment_intersection(a1, a2, b1, b2).is_some())
        })
    }

    fn stay_in_world(&mut self, size: Vec2) {
        let aabb = self.aabb();
        match self.faction {
            Faction::Player => {
                self.pos.x -= aabb.min.x.min(0.0);
                self.pos.y -= aabb.min.y.min(0.0);
                self.pos.x += (size.x - aabb.max.x).min(0.0);
                self.pos.y += (size.y - aabb.max.y).min(0.0);
            }
            Faction::Hostile => {
                // Out the back edge and gone; no wreck for these.
                if aabb.max.x < 0.0 {
                    self.dead = true;
                }
            }
            Faction::Autopilot => {}
        }
    }

    fn explode(&self, world: &mut World, cues: &mut dyn CuePlayer) {
        world.spawn_explosion(self.pos, self.model);
        let pitch = if self.faction == Faction::Player {
            0.3
        } else {
            1.0 / self.model.blowup_factor
        };
        cues.play("boom", 1.0, pitch);
    }

    fn calc_trs(&self, scale: f32) -> Affine2 {
        let angle = -self.dir.x.atan2(self.dir.y);
        Affine2::from_scale_angle_translation(self.model.size * (scale * 0.5), angle, self.pos)
    }

    fn transformed_hull(&self, trs: Affine2) -> Vec<Vec2> {
        self.model
            .hull
            .iter()
            .map(|&p| trs.transform_point2(p))
            .collect()
    }

    /// Damaged ships flash solid white for one frame; otherwise the hull
    /// draws in color1 with a half-scale inner hull in color2 on top.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        if self.damaged {
            target.poly(&self.transformed_hull(self.transform), WHITE, RenderGroup::Plain);
        } else {
            target.poly(
                &self.transformed_hull(self.transform),
                self.model.color1,
                RenderGroup::Plain,
            );
            target.poly(
                &self.transformed_hull(self.calc_trs(0.5)),
                self.model.color2,
                RenderGroup::Plain,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CueRecorder, NullCues};
    use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
    use crate::sim::model;
    use proptest::prelude::*;

    fn test_world() -> World {
        World::new(Vec2::new(WORLD_WIDTH, WORLD_HEIGHT), 7)
    }

    fn player(pos: Vec2) -> Ship {
        Ship::new(ShipId(0), Faction::Player, &model::PLAYER, pos)
    }

    fn cargo(id: u32, pos: Vec2) -> Ship {
        Ship::new(ShipId(id), Faction::Hostile, &model::CARGO, pos)
    }

    #[test]
    fn test_control_clamps_to_model_speed() {
        let mut ship = player(Vec2::new(300.0, 300.0));
        ship.control(Vec2::new(2.0, 2.0), false);
        assert!((ship.velocity.length() - ship.model.speed).abs() < 1e-3);

        ship.control(Vec2::new(0.5, 0.0), false);
        assert_eq!(ship.velocity, Vec2::new(300.0, 0.0));
    }

    #[test]
    fn test_zero_thrust_keeps_heading() {
        let mut ship = cargo(1, Vec2::new(800.0, 300.0));
        assert_eq!(ship.dir, Vec2::new(-1.0, 0.0));
        ship.control(Vec2::ZERO, true);
        assert_eq!(ship.velocity, Vec2::ZERO);
        assert_eq!(ship.dir, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn test_autopilot_ignores_hits() {
        let mut ship = player(Vec2::new(300.0, 300.0));
        ship.faction = Faction::Autopilot;
        ship.hit();
        assert_eq!(ship.hp, ship.model.hp);
        assert!(!ship.damaged);
    }

    #[test]
    fn test_overkill_health_clamps_to_zero() {
        let mut ship = player(Vec2::new(300.0, 300.0));
        ship.hit();
        ship.hit();
        assert_eq!(ship.hp, -1);
        assert_eq!(ship.health(), 0.0);
    }

    #[test]
    fn test_player_pushed_back_inside_world() {
        let mut world = test_world();
        let mut ship = player(Vec2::new(10.0, WORLD_HEIGHT / 2.0));
        ship.control(Vec2::new(-1.0, 0.0), false);
        ship.update(1.0 / 60.0, &mut world, &mut [], &mut [], &mut NullCues);
        // Half the larger hull dimension is as close as the edge allows.
        assert_eq!(ship.pos.x, 25.0);
        assert!(!ship.dead);
    }

    #[test]
    fn test_hostile_culled_past_left_edge_without_boom() {
        let mut world = test_world();
        let mut cues = CueRecorder::new();
        let mut ship = cargo(1, Vec2::new(-40.0, 300.0));
        ship.control(Vec2::new(-0.3, 0.0), false);
        ship.update(1.0 / 60.0, &mut world, &mut [], &mut [], &mut cues);

        assert!(ship.dead);
        assert_eq!(cues.count("boom"), 0);
        // The cull is not an early return: the engine still burned this frame.
        assert_eq!(world.particles().len(), 1);
    }

    #[test]
    fn test_ramming_damages_both_ships() {
        let mut world = test_world();
        let mut ship = player(Vec2::new(300.0, 300.0));
        let mut others = [cargo(1, Vec2::new(300.0, 300.0))];
        ship.update(1.0 / 60.0, &mut world, &mut [], &mut others, &mut NullCues);

        assert_eq!(ship.hp, 0);
        assert!(ship.damaged);
        assert_eq!(others[0].hp, others[0].model.hp - 1);
        assert!(others[0].damaged);
    }

    #[test]
    fn test_death_spawns_explosion_and_boom() {
        let mut world = test_world();
        let mut cues = CueRecorder::new();
        let mut ship = cargo(1, Vec2::new(700.0, 300.0));
        for _ in 0..ship.model.hp {
            ship.hit();
        }
        ship.update(1.0 / 60.0, &mut world, &mut [], &mut [], &mut cues);

        assert!(ship.dead);
        // One big boom plus 35 radial fragments.
        assert_eq!(world.particles().len(), 36);
        assert_eq!(cues.count("boom"), 1);
        assert_eq!(cues.cues[0].pitch, 1.0);
    }

    #[test]
    fn test_guns_catch_up_on_large_dt() {
        let mut world = test_world();
        let mut cues = CueRecorder::new();
        let mut ship = player(Vec2::new(300.0, 300.0));
        ship.control(Vec2::ZERO, true);
        ship.update(0.35, &mut world, &mut [], &mut [], &mut cues);

        // Two barrels at 10 rounds/s each release 4 shots over 0.35 s.
        assert_eq!(world.projectiles().len(), 8);
        // Only the first barrel carries the sound cue.
        assert_eq!(cues.count("shoot_player"), 4);
        for shot in world.projectiles() {
            assert_eq!(shot.velocity, Vec2::new(1000.0, 0.0));
            assert_eq!(shot.faction, Faction::Player);
        }
    }

    #[test]
    fn test_idle_trigger_banks_no_shots() {
        let mut world = test_world();
        let mut ship = player(Vec2::new(300.0, 300.0));
        ship.control(Vec2::ZERO, false);
        ship.update(2.0, &mut world, &mut [], &mut [], &mut NullCues);
        assert!(world.projectiles().is_empty());

        // One frame of fire after a long idle releases a single volley.
        ship.control(Vec2::ZERO, true);
        ship.update(1.0 / 60.0, &mut world, &mut [], &mut [], &mut NullCues);
        assert_eq!(world.projectiles().len(), 2);
    }

    #[test]
    fn test_exhaust_trails_moving_ship() {
        let mut world = test_world();
        let mut ship = player(Vec2::new(300.0, 300.0));
        ship.control(Vec2::new(1.0, 0.0), false);
        ship.update(1.0 / 60.0, &mut world, &mut [], &mut [], &mut NullCues);

        // Center engine plus both outriggers light up at full thrust.
        assert_eq!(world.particles().len(), 3);
        for exhaust in world.particles() {
            assert_eq!(exhaust.group, RenderGroup::Engine);
            assert_eq!(exhaust.velocity, Vec2::new(-EXHAUST_SPEED, 0.0));
        }
    }

    proptest! {
        // No start position or thrust leaves the player outside the world
        // once its update has run.
        #[test]
        fn test_player_never_escapes_world_bounds(
            px in -2000.0f32..3000.0,
            py in -2000.0f32..3000.0,
            tx in -3.0f32..3.0,
            ty in -3.0f32..3.0,
        ) {
            let mut world = test_world();
            let mut ship = player(Vec2::new(px, py));
            ship.control(Vec2::new(tx, ty), false);
            ship.update(1.0 / 60.0, &mut world, &mut [], &mut [], &mut NullCues);

            let aabb = ship.aabb();
            prop_assert!(aabb.min.x >= -1e-3 && aabb.min.y >= -1e-3);
            prop_assert!(aabb.max.x <= WORLD_WIDTH + 1e-3);
            prop_assert!(aabb.max.y <= WORLD_HEIGHT + 1e-3);
        }
    }
}
