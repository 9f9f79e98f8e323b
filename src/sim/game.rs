//! Session driver
//!
//! Walks the stage rotation over one world, applies the player's input,
//! and cuts to the death interlude whenever the player's ship is gone.

use glam::Vec2;

use crate::audio::CuePlayer;
use crate::render::DrawTarget;

use super::model::{self, ModelError};
use super::ship::{Faction, Ship, ShipId};
use super::stage::{
    BossStage, CargoStage, DeathStage, FighterStage, IntroStage, OutroStage, Stage,
};
use super::starfield::Starfield;
use super::world::World;

/// One frame of player intent.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub thrust: Vec2,
    pub fire: bool,
}

/// Owns a world plus the script that populates it.
pub struct Game {
    world: World,
    stars: Starfield,
    player: ShipId,
    templates: Vec<Stage>,
    cursor: usize,
    active: Option<Stage>,
    player_pos: Vec2,
}

impl Game {
    /// Builds a session over a fresh world. Fails if any built-in model
    /// is structurally broken.
    pub fn new(width: f32, height: f32, seed: u64) -> Result<Self, ModelError> {
        for m in model::models() {
            m.validate()?;
        }

        let mut world = World::new(Vec2::new(width, height), seed);
        let stars = Starfield::new(world.size(), world.rng_mut());

        let player = world.alloc_ship_id();
        world.add_ship(Ship::new(player, Faction::Player, &model::PLAYER, Vec2::ZERO));

        let templates = vec![
            Stage::Intro(IntroStage::new(player)),
            Stage::Cargo(CargoStage {
                min_count: 2,
                max_count: 2,
            }),
            Stage::Cargo(CargoStage {
                min_count: 5,
                max_count: 8,
            }),
            Stage::Cargo(CargoStage {
                min_count: 6,
                max_count: 8,
            }),
            Stage::Fighter(FighterStage::default()),
            Stage::Cargo(CargoStage {
                min_count: 6,
                max_count: 8,
            }),
            Stage::Boss(BossStage::default()),
            Stage::Outro(OutroStage::new(player)),
        ];

        Ok(Self {
            world,
            stars,
            player,
            templates,
            cursor: 0,
            active: None,
            player_pos: Vec2::ZERO,
        })
    }

    pub fn update(&mut self, dt: f32, input: PlayerInput, cues: &mut dyn CuePlayer) {
        if let Some(ship) = self.world.ship_mut(self.player) {
            if ship.faction == Faction::Player {
                ship.control(input.thrust, input.fire);
            }
            self.player_pos = ship.pos;
        }

        if self.active.is_none() {
            let mut stage = self.templates[self.cursor].clone();
            self.cursor += 1;
            if self.cursor >= self.templates.len() {
                // The intro never replays; the loop resumes at the first convoy.
                self.cursor = 1;
            }
            stage.init(&mut self.world);
            self.active = Some(stage);
        }

        let player_down = self.world.ship(self.player).is_none_or(|s| s.dead);
        if player_down && !matches!(self.active, Some(Stage::Death(_))) {
            self.cursor = 1;
            let mut stage = Stage::Death(DeathStage::new(self.player, self.player_pos));
            stage.init(&mut self.world);
            self.active = Some(stage);
        }

        if let Some(mut stage) = self.active.take() {
            if stage.update(dt, &mut self.world, &mut self.stars, cues) {
                self.active = Some(stage);
            }
        }

        self.world.update(dt, cues);
        let scaled = dt * self.world.time_speed();
        self.stars.update(scaled, self.world.rng_mut());
    }

    /// Stars first so ships and shots draw over them.
    pub fn draw(&self, target: &mut dyn DrawTarget) {
        self.stars.draw(target);
        self.world.draw(target);
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn player_id(&self) -> ShipId {
        self.player
    }

    /// Name of the active stage, if one is running.
    pub fn stage_name(&self) -> Option<&'static str> {
        self.active.as_ref().map(Stage::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{CueRecorder, NullCues};
    use crate::consts::{FRAME_DT, WORLD_HEIGHT, WORLD_WIDTH};

    fn new_game() -> Game {
        Game::new(WORLD_WIDTH, WORLD_HEIGHT, 42).unwrap()
    }

    #[test]
    fn test_new_game_holds_one_idle_ship() {
        let game = new_game();
        assert_eq!(game.world().ship_count(), 1);
        assert!(game.stage_name().is_none());
        let ship = game.world().ship(game.player_id()).unwrap();
        assert_eq!(ship.faction, Faction::Player);
    }

    #[test]
    fn test_first_frame_enters_the_intro() {
        let mut game = new_game();
        game.update(FRAME_DT, PlayerInput::default(), &mut NullCues);

        assert_eq!(game.stage_name(), Some("intro"));
        // The flyby puts the ship off the left edge on autopilot.
        let ship = game.world().ship(game.player_id()).unwrap();
        assert_eq!(ship.faction, Faction::Autopilot);
        assert!(ship.pos.x < 0.0);
    }

    #[test]
    fn test_intro_gives_way_to_the_first_convoy() {
        let mut game = new_game();
        for _ in 0..1022 {
            game.update(FRAME_DT, PlayerInput::default(), &mut NullCues);
        }

        assert_eq!(game.stage_name(), Some("cargo"));
        // Player plus two freighters.
        assert_eq!(game.world().ship_count(), 3);
    }

    #[test]
    fn test_player_death_cuts_to_the_interlude_and_back() {
        let mut game = new_game();
        let mut cues = CueRecorder::new();
        game.update(FRAME_DT, PlayerInput::default(), &mut cues);
        assert_eq!(game.stage_name(), Some("intro"));

        let player = game.player_id();
        game.world_mut().ship_mut(player).unwrap().hp = 0;
        game.update(FRAME_DT, PlayerInput::default(), &mut cues);
        assert_eq!(cues.count("boom"), 1);
        assert!(game.world().ship(game.player_id()).is_none());

        // The interlude replaces the intro the frame after the ship is gone.
        game.update(FRAME_DT, PlayerInput::default(), &mut cues);
        assert_eq!(game.stage_name(), Some("death"));
        assert_eq!(game.world().time_speed(), 0.2);

        for _ in 0..300 {
            game.update(FRAME_DT, PlayerInput::default(), &mut cues);
        }
        let ship = game.world().ship(game.player_id()).unwrap();
        assert_eq!(ship.health(), 1.0);
        assert_eq!(game.world().time_speed(), 1.0);

        // The rotation resumes at the first convoy, not the intro.
        game.update(FRAME_DT, PlayerInput::default(), &mut cues);
        assert_eq!(game.stage_name(), Some("cargo"));
    }

    #[test]
    fn test_input_is_ignored_while_on_autopilot() {
        let mut game = new_game();
        let push = PlayerInput {
            thrust: Vec2::new(1.0, 0.0),
            fire: true,
        };
        game.update(FRAME_DT, push, &mut NullCues);
        game.update(FRAME_DT, push, &mut NullCues);

        // The intro owns the ship: cruise thrust, no shots.
        let ship = game.world().ship(game.player_id()).unwrap();
        assert_eq!(ship.velocity.x, 60.0);
        assert!(game.world().projectiles().is_empty());
    }

    #[test]
    fn test_rotation_visits_every_stage_and_wraps_past_the_intro() {
        let mut game = new_game();
        let mut seen: Vec<&'static str> = Vec::new();
        let mut last: Option<&'static str> = None;

        for _ in 0..20_000 {
            game.update(FRAME_DT, PlayerInput::default(), &mut NullCues);

            // Clear hostiles each frame so combat stages finish without
            // the player firing a shot.
            let hostiles: Vec<ShipId> = game
                .world()
                .ships()
                .iter()
                .filter(|s| s.faction == Faction::Hostile)
                .map(|s| s.id)
                .collect();
            for id in hostiles {
                if let Some(ship) = game.world_mut().ship_mut(id) {
                    ship.hp = 0;
                }
            }

            let stage = game.stage_name();
            if stage != last {
                if let Some(name) = stage {
                    seen.push(name);
                }
                last = stage;
            }
            if seen.len() >= 10 {
                break;
            }
        }

        assert_eq!(
            seen,
            [
                "intro", "cargo", "cargo", "cargo", "fighter", "cargo", "boss", "outro", "cargo",
                "cargo",
            ]
        );
    }

    #[test]
    fn test_equal_seeds_replay_identically() {
        let mut a = Game::new(WORLD_WIDTH, WORLD_HEIGHT, 9).unwrap();
        let mut b = Game::new(WORLD_WIDTH, WORLD_HEIGHT, 9).unwrap();
        let mut cues_a = CueRecorder::new();
        let mut cues_b = CueRecorder::new();

        let input = PlayerInput {
            thrust: Vec2::new(0.3, -0.2),
            fire: true,
        };
        for _ in 0..1200 {
            a.update(FRAME_DT, input, &mut cues_a);
            b.update(FRAME_DT, input, &mut cues_b);
        }

        assert_eq!(cues_a.cues, cues_b.cues);
        let pos_a = a.world().ship(a.player_id()).map(|s| s.pos);
        let pos_b = b.world().ship(b.player_id()).map(|s| s.pos);
        assert_eq!(pos_a, pos_b);
        assert_eq!(a.world().ship_count(), b.world().ship_count());
    }
}
