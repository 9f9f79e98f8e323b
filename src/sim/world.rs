//! World: entity storage and the per-frame update passes
//!
//! The world owns every live entity and the seeded random stream, and runs
//! the frame in three fixed passes: ships, projectiles, particles. Entities
//! spawned during a pass are updated the same frame when their category
//! comes later in that order; removal happens at the end of each pass, so
//! order within a category stays stable.

use std::f32::consts::TAU;
use std::mem;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::audio::CuePlayer;
use crate::render::{DrawTarget, WHITE};

use super::geom::Aabb;
use super::model::Model;
use super::particle::Particle;
use super::projectile::Projectile;
use super::ship::{Ship, ShipId};

pub struct World {
    size: Vec2,
    time_speed: f32,
    ships: Vec<Ship>,
    projectiles: Vec<Projectile>,
    particles: Vec<Particle>,
    rng: Pcg32,
    next_ship_id: u32,
}

impl World {
    pub fn new(size: Vec2, seed: u64) -> Self {
        Self {
            size,
            time_speed: 1.0,
            ships: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_ship_id: 0,
        }
    }

    /// Advance every entity by one frame. `dt` is wall-clock time; the
    /// time-speed multiplier is applied here, once, for the whole frame.
    pub fn update(&mut self, dt: f32, cues: &mut dyn CuePlayer) {
        let dt = dt * self.time_speed;

        // Damage flashes last exactly one frame.
        for ship in &mut self.ships {
            ship.damaged = false;
        }

        // Ship pass. The list is detached so each ship can walk the full
        // pre-compaction roster while spawning into the world; ships killed
        // mid-pass stay visible (marked dead) until the retain below.
        let mut ships = mem::take(&mut self.ships);
        for i in 0..ships.len() {
            let (before, rest) = ships.split_at_mut(i);
            if let Some((ship, after)) = rest.split_first_mut() {
                ship.update(dt, self, before, after, cues);
            }
        }
        ships.retain(|s| !s.dead);
        self.ships = ships;

        // Projectile pass, with the stray-bounds sweep folded in.
        let bounds = self.bounds();
        for shot in &mut self.projectiles {
            shot.update(dt, &mut self.ships, &mut self.particles);
            if !shot.dead && !shot.aabb(Vec2::ZERO).overlaps(&bounds) {
                shot.dead = true;
            }
        }
        self.projectiles.retain(|m| !m.dead);

        for particle in &mut self.particles {
            particle.update(dt);
        }
        self.particles.retain(|p| !p.dead);
    }

    /// Burst of debris for a dying ship: one white flash sized to the hull,
    /// then one fragment per angular slice so the ring has no gaps.
    pub fn spawn_explosion(&mut self, pos: Vec2, model: &Model) {
        let factor = model.blowup_factor;
        let boom_ttl = 0.5 * factor;
        let size = 15.0 * factor;
        let ttl = 2.0 * factor;
        let count = 35.0 * factor;
        let velocity_min = 50.0 * factor;
        let velocity_max = 200.0 * factor;

        let flash = Particle::new(pos, model.size.max_element() * factor, 0.0, boom_ttl, WHITE);
        self.particles.push(flash);

        let colors = [model.color1, model.color2];
        for i in 0..count as i32 {
            let angle_min = i as f32 * TAU / count;
            let angle_max = (i + 1) as f32 * TAU / count;
            let angle = angle_min + (angle_max - angle_min) * self.rng.random::<f32>();
            let speed = velocity_min + (velocity_max - velocity_min) * self.rng.random::<f32>();

            let mut fragment = Particle::new(
                pos,
                (size / 2.0) * self.rng.random::<f32>() + size / 2.0,
                0.0,
                (ttl / 2.0) * self.rng.random::<f32>() + ttl / 2.0,
                colors[self.rng.random_range(0..2)],
            );
            fragment.velocity = Vec2::new(angle.sin() * speed, angle.cos() * speed);
            self.particles.push(fragment);
        }
    }

    pub fn alloc_ship_id(&mut self) -> ShipId {
        let id = ShipId(self.next_ship_id);
        self.next_ship_id += 1;
        id
    }

    pub fn add_ship(&mut self, ship: Ship) {
        self.ships.push(ship);
    }

    pub fn ship(&self, id: ShipId) -> Option<&Ship> {
        self.ships.iter().find(|s| s.id == id)
    }

    pub fn ship_mut(&mut self, id: ShipId) -> Option<&mut Ship> {
        self.ships.iter_mut().find(|s| s.id == id)
    }

    /// Remove a ship from the roster, keeping its state. The outro uses
    /// this to carry the player across a world reset.
    pub fn take_ship(&mut self, id: ShipId) -> Option<Ship> {
        let index = self.ships.iter().position(|s| s.id == id)?;
        Some(self.ships.remove(index))
    }

    pub fn add_projectile(&mut self, shot: Projectile) {
        self.projectiles.push(shot);
    }

    pub fn add_particle(&mut self, particle: Particle) {
        self.particles.push(particle);
    }

    pub fn ship_count(&self) -> usize {
        self.ships.len()
    }

    /// Clear ships and projectiles between stages. Particles finish on
    /// their own, so explosions carry across the cut.
    pub fn reset_projectiles_and_ships(&mut self) {
        self.ships.clear();
        self.projectiles.clear();
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(Vec2::ZERO, self.size)
    }

    pub fn time_speed(&self) -> f32 {
        self.time_speed
    }

    pub fn set_time_speed(&mut self, speed: f32) {
        self.time_speed = speed;
    }

    pub fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    pub fn draw(&self, target: &mut dyn DrawTarget) {
        for particle in &self.particles {
            particle.draw(target);
        }
        for ship in &self.ships {
            ship.draw(target);
        }
        for shot in &self.projectiles {
            shot.draw(target);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::NullCues;
    use crate::consts::{WORLD_HEIGHT, WORLD_WIDTH};
    use crate::sim::model;
    use crate::sim::ship::Faction;

    fn test_world() -> World {
        World::new(Vec2::new(WORLD_WIDTH, WORLD_HEIGHT), 99)
    }

    fn spawn(world: &mut World, faction: Faction, model: &'static Model, pos: Vec2) -> ShipId {
        let id = world.alloc_ship_id();
        world.add_ship(Ship::new(id, faction, model, pos));
        id
    }

    #[test]
    fn test_explosion_particle_budget() {
        let mut world = test_world();
        world.spawn_explosion(Vec2::new(400.0, 300.0), &model::CARGO);

        let particles = world.particles();
        assert_eq!(particles.len(), 36);
        // White flash first, sized to the hull.
        assert_eq!(particles[0].start_size, 60.0);
        assert_eq!(particles[0].velocity, Vec2::ZERO);
        for fragment in &particles[1..] {
            let speed = fragment.velocity.length();
            assert!((50.0..200.0).contains(&speed), "speed {speed}");
            let hull_color = fragment.color == model::CARGO.color1
                || fragment.color == model::CARGO.color2;
            assert!(hull_color);
        }
    }

    #[test]
    fn test_explosion_scales_with_blowup_factor() {
        let mut world = test_world();
        world.spawn_explosion(Vec2::new(400.0, 300.0), &model::BOSS);

        assert_eq!(world.particles().len(), 71);
        for fragment in &world.particles()[1..] {
            let speed = fragment.velocity.length();
            assert!((100.0..400.0).contains(&speed), "speed {speed}");
        }
    }

    #[test]
    fn test_damage_flash_lasts_one_frame() {
        let mut world = test_world();
        let id = spawn(
            &mut world,
            Faction::Hostile,
            &model::CARGO,
            Vec2::new(700.0, 300.0),
        );
        if let Some(ship) = world.ship_mut(id) {
            ship.hit();
            assert!(ship.damaged);
        }
        world.update(1.0 / 60.0, &mut NullCues);
        assert!(world.ship(id).is_some_and(|s| !s.damaged));
    }

    #[test]
    fn test_dead_ships_compact_after_pass() {
        let mut world = test_world();
        let doomed = spawn(
            &mut world,
            Faction::Hostile,
            &model::CARGO,
            Vec2::new(700.0, 200.0),
        );
        let survivor = spawn(
            &mut world,
            Faction::Hostile,
            &model::CARGO,
            Vec2::new(700.0, 500.0),
        );
        if let Some(ship) = world.ship_mut(doomed) {
            for _ in 0..ship.model.hp {
                ship.hit();
            }
        }
        world.update(1.0 / 60.0, &mut NullCues);

        assert_eq!(world.ship_count(), 1);
        assert!(world.ship(doomed).is_none());
        assert!(world.ship(survivor).is_some());
    }

    #[test]
    fn test_colliding_pair_trades_double_damage() {
        let mut world = test_world();
        // Both rams survive their scans, so each ordered pair lands a hit.
        let fighter = spawn(
            &mut world,
            Faction::Player,
            &model::FIGHTER,
            Vec2::new(500.0, 300.0),
        );
        let cargo = spawn(
            &mut world,
            Faction::Hostile,
            &model::CARGO,
            Vec2::new(500.0, 300.0),
        );
        world.update(1.0 / 60.0, &mut NullCues);

        assert_eq!(world.ship(fighter).map(|s| s.hp), Some(model::FIGHTER.hp - 2));
        assert_eq!(world.ship(cargo).map(|s| s.hp), Some(model::CARGO.hp - 2));
    }

    #[test]
    fn test_stray_projectiles_swept() {
        let mut world = test_world();
        world.add_projectile(Projectile::new(
            Faction::Player,
            Vec2::new(WORLD_WIDTH + 100.0, 300.0),
            Vec2::new(1000.0, 0.0),
            Vec2::new(7.5, 5.0),
            WHITE,
        ));
        world.add_projectile(Projectile::new(
            Faction::Player,
            Vec2::new(400.0, 300.0),
            Vec2::new(1000.0, 0.0),
            Vec2::new(7.5, 5.0),
            WHITE,
        ));
        world.update(1.0 / 60.0, &mut NullCues);

        assert_eq!(world.projectiles().len(), 1);
        assert!(world.projectiles()[0].pos.x < WORLD_WIDTH);
    }

    #[test]
    fn test_shots_fired_move_the_same_frame() {
        let mut world = test_world();
        let id = spawn(
            &mut world,
            Faction::Player,
            &model::PLAYER,
            Vec2::new(300.0, 300.0),
        );
        if let Some(ship) = world.ship_mut(id) {
            ship.control(Vec2::ZERO, true);
        }
        world.update(1.0 / 60.0, &mut NullCues);

        assert_eq!(world.projectiles().len(), 2);
        // Spawned at the muzzle (x = 320) during the ship pass, then moved
        // by the projectile pass in the same frame.
        for shot in world.projectiles() {
            assert!(shot.pos.x > 330.0);
        }
    }

    #[test]
    fn test_time_speed_scales_the_frame() {
        let mut world = test_world();
        world.add_particle(Particle::new(Vec2::new(100.0, 100.0), 4.0, 0.0, 1.0, WHITE));
        world.set_time_speed(0.2);
        world.update(1.0, &mut NullCues);

        let ttl = world.particles()[0].ttl;
        assert!((ttl - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_take_ship_preserves_state() {
        let mut world = test_world();
        let id = spawn(
            &mut world,
            Faction::Player,
            &model::PLAYER,
            Vec2::new(300.0, 300.0),
        );
        let ship = world.take_ship(id).unwrap();
        assert_eq!(world.ship_count(), 0);
        assert!(world.take_ship(id).is_none());

        world.add_ship(ship);
        assert_eq!(world.ship(id).map(|s| s.pos), Some(Vec2::new(300.0, 300.0)));
    }
}
