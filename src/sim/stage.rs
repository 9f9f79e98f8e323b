//! Stages: scripted phases of a session
//!
//! A stage seeds the world in `init` and steers it every frame in `update`
//! until it reports completion. Stages receive the raw frame dt; only the
//! world applies the time-speed multiplier.

use glam::Vec2;

use crate::audio::CuePlayer;
use crate::render::BLACK;

use super::model::{self, Model};
use super::particle::Particle;
use super::pilot::StrafePilot;
use super::ship::{Faction, Ship, ShipId};
use super::starfield::Starfield;
use super::world::World;

use rand::Rng;

/// One scripted phase. The set is closed; the session driver walks a
/// fixed rotation and cuts to `Death` out of band.
#[derive(Clone)]
pub enum Stage {
    Intro(IntroStage),
    Cargo(CargoStage),
    Fighter(FighterStage),
    Boss(BossStage),
    Outro(OutroStage),
    Death(DeathStage),
}

impl Stage {
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Intro(_) => "intro",
            Stage::Cargo(_) => "cargo",
            Stage::Fighter(_) => "fighter",
            Stage::Boss(_) => "boss",
            Stage::Outro(_) => "outro",
            Stage::Death(_) => "death",
        }
    }

    pub fn init(&mut self, world: &mut World) {
        match self {
            Stage::Intro(s) => s.init(world),
            Stage::Cargo(s) => s.init(world),
            Stage::Fighter(s) => s.init(world),
            Stage::Boss(s) => s.init(world),
            Stage::Outro(s) => s.init(world),
            Stage::Death(s) => s.init(world),
        }
    }

    /// Returns true while the stage is still running.
    pub fn update(
        &mut self,
        dt: f32,
        world: &mut World,
        stars: &mut Starfield,
        cues: &mut dyn CuePlayer,
    ) -> bool {
        match self {
            Stage::Intro(s) => s.update(dt, world, stars, cues),
            Stage::Cargo(s) => s.update(world),
            Stage::Fighter(s) => s.update(world),
            Stage::Boss(s) => s.update(dt, world, cues),
            Stage::Outro(s) => s.update(dt, world, stars, cues),
            Stage::Death(s) => s.update(dt, world, cues),
        }
    }
}

/// Opening flyby: the ship drifts in from the left on autopilot while the
/// star scroll brakes from warp speed down to cruise.
#[derive(Clone)]
pub struct IntroStage {
    player: ShipId,
    time: f32,
    cued: bool,
}

const INTRO_TIME: f32 = 17.0;

impl IntroStage {
    pub fn new(player: ShipId) -> Self {
        Self {
            player,
            time: 0.0,
            cued: false,
        }
    }

    fn init(&mut self, world: &mut World) {
        const THRUST: f32 = 0.1;

        self.time = 0.0;
        self.cued = false;

        let size = world.size();
        if let Some(ship) = world.ship_mut(self.player) {
            ship.pos = Vec2::new(size.x * -0.1, size.y / 2.0);
            ship.faction = Faction::Autopilot;
            ship.control(Vec2::new(THRUST, 0.0), false);
        }
    }

    fn update(
        &mut self,
        dt: f32,
        world: &mut World,
        stars: &mut Starfield,
        cues: &mut dyn CuePlayer,
    ) -> bool {
        const HANDOVER_X: f32 = 0.2;
        const STAR_BOOST: f32 = 1000.0;
        const BRAKE_TIME: f32 = 1.0;

        let size = world.size();
        if let Some(ship) = world.ship_mut(self.player) {
            if ship.pos.x > size.x * HANDOVER_X {
                ship.faction = Faction::Player;
            } else if ship.pos.x > 0.0 && !self.cued {
                self.cued = true;
                cues.play("intro", 1.0, 1.0);
            }
        }

        self.time += dt;
        let t = ((BRAKE_TIME - self.time) / INTRO_TIME).clamp(0.0, 1.0);
        stars.change_speed(1.0 + STAR_BOOST * t);

        if self.time > INTRO_TIME {
            if let Some(ship) = world.ship_mut(self.player) {
                ship.faction = Faction::Player;
            }
            stars.change_speed(1.0);
            return false;
        }
        true
    }
}

/// A drifting convoy of unarmed freighters.
#[derive(Clone)]
pub struct CargoStage {
    pub min_count: usize,
    pub max_count: usize,
}

impl CargoStage {
    fn init(&mut self, world: &mut World) {
        const MIN_THRUST: f32 = 0.2;
        const MAX_THRUST: f32 = 0.5;
        const SPAWN_X: f32 = 1.05;

        let models: [&'static Model; 2] = [&model::CARGO, &model::CARGO_HEAVY];
        let size = world.size();

        let count = self.min_count;
        if self.max_count > self.min_count {
            // The convoy size stays at the minimum; the range draw is
            // still taken.
            let _ = world.rng_mut().random_range(0..self.max_count - self.min_count);
        }

        for i in 0..count {
            let row = (i + 1) as f32 / (count as f32 + 1.0);
            let thrust = MIN_THRUST + world.rng_mut().random::<f32>() * (MAX_THRUST - MIN_THRUST);
            let pick = world.rng_mut().random_range(0..models.len());

            let id = world.alloc_ship_id();
            let mut ship = Ship::new(
                id,
                Faction::Hostile,
                models[pick],
                Vec2::new(size.x * SPAWN_X, size.y * row),
            );
            ship.control(Vec2::new(-thrust, 0.0), false);
            world.add_ship(ship);
        }
    }

    fn update(&mut self, world: &World) -> bool {
        world.ship_count() > 1
    }
}

/// A wall of fighters that advances to the firing line, stops and shoots.
#[derive(Clone, Default)]
pub struct FighterStage {
    ships: Vec<ShipId>,
}

impl FighterStage {
    fn init(&mut self, world: &mut World) {
        const COUNT: usize = 8;
        const MIN_THRUST: f32 = 0.1;
        const MAX_THRUST: f32 = 0.5;
        const SPAWN_X: f32 = 1.1;

        let size = world.size();
        self.ships = Vec::with_capacity(COUNT);
        for i in 0..COUNT {
            let row = (i + 1) as f32 / (COUNT as f32 + 1.0);
            let thrust = MIN_THRUST + world.rng_mut().random::<f32>() * (MAX_THRUST - MIN_THRUST);

            let id = world.alloc_ship_id();
            let mut ship = Ship::new(
                id,
                Faction::Hostile,
                &model::FIGHTER,
                Vec2::new(size.x * SPAWN_X, size.y * row),
            );
            ship.control(Vec2::new(-thrust, 0.0), false);
            world.add_ship(ship);
            self.ships.push(id);
        }
    }

    fn update(&mut self, world: &mut World) -> bool {
        const HOLD_X: f32 = 0.9;

        if world.ship_count() <= 1 {
            self.ships.clear();
            return false;
        }

        let hold = world.size().x * HOLD_X;
        for &id in &self.ships {
            if let Some(ship) = world.ship_mut(id) {
                if ship.pos.x <= hold {
                    ship.control(Vec2::ZERO, true);
                }
            }
        }
        true
    }
}

/// The boss crawls in with a pair of strafing escorts that respawn until
/// the boss itself goes down.
#[derive(Clone, Default)]
pub struct BossStage {
    boss: Option<ShipId>,
    cued: bool,
    up_pilot: Option<StrafePilot>,
    down_pilot: Option<StrafePilot>,
}

impl BossStage {
    fn init(&mut self, world: &mut World) {
        const SPAWN_X: f32 = 1.1;
        const THRUST: f32 = 0.05;

        let size = world.size();
        self.cued = false;
        self.up_pilot = None;
        self.down_pilot = None;

        let id = world.alloc_ship_id();
        let mut ship = Ship::new(
            id,
            Faction::Hostile,
            &model::BOSS,
            Vec2::new(size.x * SPAWN_X, size.y / 2.0),
        );
        ship.control(Vec2::new(-THRUST, 0.0), false);
        world.add_ship(ship);
        self.boss = Some(id);
    }

    fn update(&mut self, dt: f32, world: &mut World, cues: &mut dyn CuePlayer) -> bool {
        const HOLD_X: f32 = 0.9;

        let Some(boss_id) = self.boss else {
            return false;
        };

        let size = world.size();
        if let Some(boss) = world.ship_mut(boss_id) {
            if !self.cued && boss.pos.x <= size.x {
                self.cued = true;
                cues.play("boss", 1.0, 0.8);
            }
            if boss.pos.x <= size.x * HOLD_X {
                boss.control(Vec2::ZERO, true);
            }
        }

        // Escorts come back as long as the boss flies; a pilot is only
        // driven from the frame after it spawns.
        match &mut self.up_pilot {
            Some(pilot) if !pilot.dead => pilot.update(dt, world),
            _ => self.up_pilot = Some(spawn_escort(world, 0.9, 0.0, 70f32.to_radians())),
        }
        match &mut self.down_pilot {
            Some(pilot) if !pilot.dead => pilot.update(dt, world),
            _ => self.down_pilot = Some(spawn_escort(world, 0.1, 0.0, (-70f32).to_radians())),
        }

        if world.ship(boss_id).is_none_or(|s| s.dead) {
            if let Some(pilot) = &self.up_pilot {
                pilot.force_kill(world);
            }
            if let Some(pilot) = &self.down_pilot {
                pilot.force_kill(world);
            }
            return false;
        }
        true
    }
}

fn spawn_escort(world: &mut World, row: f32, angle_min: f32, angle_max: f32) -> StrafePilot {
    const SPAWN_X: f32 = 1.1;
    const HOLD_X: f32 = 0.9;

    let size = world.size();
    let id = world.alloc_ship_id();
    let ship = Ship::new(
        id,
        Faction::Hostile,
        &model::ESCORT,
        Vec2::new(size.x * SPAWN_X, size.y * row),
    );
    let pilot = StrafePilot::new(&ship, HOLD_X, angle_min, angle_max);
    world.add_ship(ship);
    pilot
}

/// Closing flyby: the ship eases to center screen, then burns off to the
/// right as the star scroll winds back up to warp.
#[derive(Clone)]
pub struct OutroStage {
    player: ShipId,
    time: f32,
    started: bool,
}

impl OutroStage {
    pub fn new(player: ShipId) -> Self {
        Self {
            player,
            time: 0.0,
            started: false,
        }
    }

    fn init(&mut self, world: &mut World) {
        self.time = 0.0;
        self.started = false;

        // Carry the player across the reset; everything else goes.
        if let Some(mut ship) = world.take_ship(self.player) {
            ship.faction = Faction::Autopilot;
            ship.control(Vec2::ZERO, false);
            world.reset_projectiles_and_ships();
            world.add_ship(ship);
        } else {
            world.reset_projectiles_and_ships();
        }
    }

    fn update(
        &mut self,
        dt: f32,
        world: &mut World,
        stars: &mut Starfield,
        cues: &mut dyn CuePlayer,
    ) -> bool {
        const STAR_BOOST: f32 = 100.0;
        const DEPART_THRUST: f32 = 0.5;
        const DEPART_TIME: f32 = 3.0;

        let size = world.size();
        let target = Vec2::new(size.x * 0.6, size.y / 2.0);

        if self.started {
            self.time += dt;
            let t = (self.time / DEPART_TIME).clamp(0.0, 1.0);
            stars.change_speed(1.0 + STAR_BOOST * t);
            if self.time > DEPART_TIME {
                return false;
            }
        } else if let Some(ship) = world.ship_mut(self.player) {
            let to_target = target - ship.pos;
            if to_target.length() > size.y * 0.1 {
                ship.pos += to_target * dt;
            } else {
                self.started = true;
                ship.control(Vec2::new(DEPART_THRUST, 0.0), false);
                cues.play("blip", 1.0, 1.0);
            }
        }
        true
    }
}

/// Slow-motion interlude after the player dies: the world winds down,
/// a black shroud swallows the screen, and the player returns fresh.
#[derive(Clone)]
pub struct DeathStage {
    player: ShipId,
    pos: Vec2,
    time: f32,
    started: bool,
}

const DEATH_TIME: f32 = 5.0;

impl DeathStage {
    /// `pos` is where the player was last seen; the shroud grows from it.
    pub fn new(player: ShipId, pos: Vec2) -> Self {
        Self {
            player,
            pos,
            time: DEATH_TIME,
            started: false,
        }
    }

    fn init(&mut self, world: &mut World) {
        const SLOW_MOTION: f32 = 0.2;

        self.time = DEATH_TIME;
        self.started = false;
        world.set_time_speed(SLOW_MOTION);
    }

    fn update(&mut self, dt: f32, world: &mut World, cues: &mut dyn CuePlayer) -> bool {
        const SHROUD_TIME: f32 = 0.5;
        const SHROUD_BOOST: f32 = 5.0;

        self.time -= dt;
        if !self.started && self.time < SHROUD_TIME {
            self.started = true;
            let end_size = world.size().max_element() * SHROUD_BOOST;
            world.add_particle(Particle::new(self.pos, 0.0, end_size, SHROUD_TIME, BLACK));
            cues.play("blip", 1.0, 1.0);
        }

        if self.time < 0.0 {
            world.reset_projectiles_and_ships();
            world.set_time_speed(1.0);

            let size = world.size();
            let ship = Ship::new(
                self.player,
                Faction::Player,
                &model::PLAYER,
                Vec2::new(size.x * 0.1, size.y / 2.0),
            );
            world.add_ship(ship);
            return false;
        }
        true
    }
}
