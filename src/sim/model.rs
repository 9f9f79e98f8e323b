//! Static ship configuration.
//!
//! Every ship kind is described by a [`Model`]: hull triangles in local
//! space, hit points, colors, and the gun/engine mounts hanging off it.
//! Models are plain static data; ships keep a `&'static Model` and never
//! copy any of it.

use glam::{Vec2, Vec4};
use thiserror::Error;

use crate::render::hex;

/// Sound cue attached to a gun.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueSpec {
    pub label: &'static str,
    pub gain: f32,
    pub pitch: f32,
}

/// Gun mount. `pos` is in hull-local space, x right and y forward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GunSpec {
    pub pos: Vec2,
    /// Shots per second.
    pub rate: f32,
    /// Muzzle speed of spawned projectiles.
    pub speed: f32,
    /// Projectile extents.
    pub size: Vec2,
    pub color: Vec4,
    /// Paired guns carry the cue on one barrel only.
    pub cue: Option<CueSpec>,
}

/// Exhaust emitter mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineSpec {
    pub pos: Vec2,
    /// Particles per second.
    pub rate: f32,
    /// Lateral spread of the emission point, in world units.
    pub size: f32,
    /// Particle end (x) and start (y) sizes.
    pub particle_size: Vec2,
    pub color: Vec4,
    /// Base particle lifetime; each particle lives `ttl + ttl * rand`.
    pub ttl: f32,
    /// Forward speed below which the engine stays dark.
    pub min_velocity: f32,
}

/// One ship kind.
///
/// `hull` is a closed triangle list: points consumed in groups of three,
/// each group contributing its three edges to collision and its face to
/// rendering.
#[derive(Debug)]
pub struct Model {
    pub name: &'static str,
    pub size: Vec2,
    /// Top speed; `Ship::control` scales and clamps thrust by this.
    pub speed: f32,
    pub hp: i32,
    pub color1: Vec4,
    pub color2: Vec4,
    /// Scales the death explosion (particle count, sizes, lifetimes).
    pub blowup_factor: f32,
    pub guns: &'static [GunSpec],
    pub engines: &'static [EngineSpec],
    pub hull: &'static [Vec2],
}

/// Malformed model data, caught once at game construction.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("model {model}: hull has {count} points, want a positive multiple of 3")]
    BadHull { model: &'static str, count: usize },
    #[error("model {model}: gun {index} has non-positive rate {rate}")]
    BadGunRate {
        model: &'static str,
        index: usize,
        rate: f32,
    },
    #[error("model {model}: engine {index} has non-positive rate {rate}")]
    BadEngineRate {
        model: &'static str,
        index: usize,
        rate: f32,
    },
}

impl Model {
    /// Checks the structural assumptions the simulation relies on: hulls
    /// decompose into whole triangles and every firing/emission rate is
    /// positive so cooldown catch-up loops terminate.
    pub fn validate(&'static self) -> Result<(), ModelError> {
        if self.hull.is_empty() || self.hull.len() % 3 != 0 {
            return Err(ModelError::BadHull {
                model: self.name,
                count: self.hull.len(),
            });
        }
        for (index, gun) in self.guns.iter().enumerate() {
            if gun.rate <= 0.0 {
                return Err(ModelError::BadGunRate {
                    model: self.name,
                    index,
                    rate: gun.rate,
                });
            }
        }
        for (index, engine) in self.engines.iter().enumerate() {
            if engine.rate <= 0.0 {
                return Err(ModelError::BadEngineRate {
                    model: self.name,
                    index,
                    rate: engine.rate,
                });
            }
        }
        Ok(())
    }
}

/// Every built-in model, for load-time validation.
pub fn models() -> [&'static Model; 6] {
    [&PLAYER, &CARGO, &CARGO_HEAVY, &FIGHTER, &ESCORT, &BOSS]
}

const PLAYER_HULL: [Vec2; 21] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(-0.2, -0.2),
    Vec2::new(0.2, -0.2),
    Vec2::new(0.0, 1.0),
    Vec2::new(-0.4, 0.8),
    Vec2::new(-0.2, -0.2),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.2, -0.2),
    Vec2::new(0.4, 0.8),
    Vec2::new(-0.4, 0.8),
    Vec2::new(-1.0, -0.3),
    Vec2::new(-0.2, -0.2),
    Vec2::new(0.4, 0.8),
    Vec2::new(0.2, -0.2),
    Vec2::new(1.0, -0.3),
    Vec2::new(-1.0, -0.3),
    Vec2::new(-0.8, -1.0),
    Vec2::new(-0.2, -0.2),
    Vec2::new(0.2, -0.2),
    Vec2::new(0.8, -1.0),
    Vec2::new(1.0, -0.3),
];

const CARGO_HULL: [Vec2; 21] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.4, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-0.6, 0.8),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.4, 0.0),
    Vec2::new(0.6, 0.8),
    Vec2::new(-0.6, 0.8),
    Vec2::new(-1.0, -0.1),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.6, 0.8),
    Vec2::new(0.4, 0.0),
    Vec2::new(1.0, -0.1),
    Vec2::new(-1.0, -0.1),
    Vec2::new(-0.6, -1.0),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.4, 0.0),
    Vec2::new(0.6, -1.0),
    Vec2::new(1.0, -0.1),
];

// Same silhouette as the cargo hull, nose pointing the other way.
const FIGHTER_HULL: [Vec2; 21] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.4, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(-0.6, -0.8),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(0.4, 0.0),
    Vec2::new(0.6, -0.8),
    Vec2::new(-0.6, -0.8),
    Vec2::new(-1.0, 0.1),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.6, -0.8),
    Vec2::new(0.4, 0.0),
    Vec2::new(1.0, 0.1),
    Vec2::new(-1.0, 0.1),
    Vec2::new(-0.6, 1.0),
    Vec2::new(-0.4, 0.0),
    Vec2::new(0.4, 0.0),
    Vec2::new(0.6, 1.0),
    Vec2::new(1.0, 0.1),
];

/// Two-triangle hexagram used by the starfield backdrop.
pub const STAR: [Vec2; 6] = [
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, -0.5),
    Vec2::new(1.0, -0.5),
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, 0.5),
    Vec2::new(-1.0, 0.5),
];

const CARGO_ENGINES: [EngineSpec; 1] = [EngineSpec {
    pos: Vec2::new(0.0, 0.1),
    rate: 60.0,
    size: 15.0,
    particle_size: Vec2::new(3.0, 16.0),
    color: hex(0xb181ff, 0.2),
    ttl: 0.2,
    min_velocity: 0.0,
}];

pub static PLAYER: Model = Model {
    name: "player",
    size: Vec2::new(40.0, 50.0),
    speed: 600.0,
    hp: 1,
    color1: hex(0x333333, 1.0),
    color2: hex(0x555555, 1.0),
    blowup_factor: 1.0,
    guns: &[
        GunSpec {
            pos: Vec2::new(-0.2, 0.8),
            rate: 10.0,
            speed: 1000.0,
            size: Vec2::new(7.5, 5.0),
            color: hex(0xffff00, 1.0),
            cue: Some(CueSpec {
                label: "shoot_player",
                gain: 0.4,
                pitch: 0.8,
            }),
        },
        GunSpec {
            pos: Vec2::new(0.2, 0.8),
            rate: 10.0,
            speed: 1000.0,
            size: Vec2::new(7.5, 5.0),
            color: hex(0xffff00, 1.0),
            cue: None,
        },
    ],
    engines: &[
        EngineSpec {
            pos: Vec2::new(0.0, -0.1),
            rate: 60.0,
            size: 10.0,
            particle_size: Vec2::new(3.0, 8.0),
            color: hex(0x01ffe6, 0.2),
            ttl: 0.1,
            min_velocity: 0.0,
        },
        // Outrigger thrusters only light up once the ship is moving.
        EngineSpec {
            pos: Vec2::new(-0.8, -1.0),
            rate: 30.0,
            size: 1.0,
            particle_size: Vec2::new(1.0, 3.0),
            color: hex(0x01ffe6, 0.2),
            ttl: 0.1,
            min_velocity: 1.0,
        },
        EngineSpec {
            pos: Vec2::new(0.8, -1.0),
            rate: 30.0,
            size: 1.0,
            particle_size: Vec2::new(1.0, 3.0),
            color: hex(0x01ffe6, 0.2),
            ttl: 0.1,
            min_velocity: 1.0,
        },
    ],
    hull: &PLAYER_HULL,
};

pub static CARGO: Model = Model {
    name: "cargo",
    size: Vec2::new(55.0, 60.0),
    speed: 600.0,
    hp: 5,
    color1: hex(0x4f6952, 1.0),
    color2: hex(0x7aff93, 1.0),
    blowup_factor: 1.0,
    guns: &[],
    engines: &CARGO_ENGINES,
    hull: &CARGO_HULL,
};

pub static CARGO_HEAVY: Model = Model {
    name: "cargo_heavy",
    size: Vec2::new(59.0, 65.0),
    speed: 600.0,
    hp: 7,
    color1: hex(0x6b524d, 1.0),
    color2: hex(0xecff3e, 1.0),
    blowup_factor: 1.3,
    guns: &[],
    engines: &CARGO_ENGINES,
    hull: &CARGO_HULL,
};

pub static FIGHTER: Model = Model {
    name: "fighter",
    size: Vec2::new(40.0, 55.0),
    speed: 600.0,
    hp: 10,
    color1: hex(0xa2904f, 1.0),
    color2: hex(0xf3e52e, 1.0),
    blowup_factor: 1.0,
    guns: &[
        GunSpec {
            pos: Vec2::new(-0.5, 0.9),
            rate: 0.4,
            speed: 200.0,
            size: Vec2::new(9.0, 6.0),
            color: hex(0xe50c0c, 1.0),
            cue: Some(CueSpec {
                label: "shoot",
                gain: 0.7,
                pitch: 1.0,
            }),
        },
        GunSpec {
            pos: Vec2::new(0.5, 0.9),
            rate: 0.4,
            speed: 200.0,
            size: Vec2::new(9.0, 6.0),
            color: hex(0xe50c0c, 1.0),
            cue: None,
        },
    ],
    engines: &[],
    hull: &FIGHTER_HULL,
};

pub static ESCORT: Model = Model {
    name: "escort",
    size: Vec2::new(40.0, 55.0),
    speed: 600.0,
    hp: 10,
    color1: hex(0xa64b4b, 1.0),
    color2: hex(0x35d7d0, 1.0),
    blowup_factor: 1.0,
    guns: &[GunSpec {
        pos: Vec2::new(0.0, 0.7),
        rate: 4.0,
        speed: 200.0,
        size: Vec2::new(7.0, 7.0),
        color: hex(0xff1818, 1.0),
        cue: Some(CueSpec {
            label: "shoot",
            gain: 0.3,
            pitch: 1.0,
        }),
    }],
    engines: &[],
    hull: &FIGHTER_HULL,
};

pub static BOSS: Model = Model {
    name: "boss",
    size: Vec2::new(120.0, 100.0),
    speed: 600.0,
    hp: 300,
    color1: hex(0x5b5a59, 1.0),
    color2: hex(0xc14848, 1.0),
    blowup_factor: 2.0,
    guns: &[GunSpec {
        pos: Vec2::new(0.0, 0.75),
        rate: 1.0,
        speed: 800.0,
        size: Vec2::new(70.0, 45.0),
        color: hex(0xfffd6a, 1.0),
        cue: Some(CueSpec {
            label: "shoot_heavy",
            gain: 1.0,
            pitch: 1.0,
        }),
    }],
    engines: &[EngineSpec {
        pos: Vec2::new(0.0, -0.8),
        rate: 150.0,
        size: 100.0,
        particle_size: Vec2::new(3.0, 24.0),
        color: hex(0xc14848, 0.6),
        ttl: 0.3,
        min_velocity: 0.0,
    }],
    hull: &FIGHTER_HULL,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_models_validate() {
        for model in models() {
            model.validate().unwrap();
        }
    }

    #[test]
    fn test_hulls_are_triangle_lists() {
        for model in models() {
            assert_eq!(model.hull.len() % 3, 0, "{}", model.name);
            assert!(!model.hull.is_empty(), "{}", model.name);
        }
        assert_eq!(PLAYER.hull.len(), 21);
        assert_eq!(STAR.len(), 6);
    }

    #[test]
    fn test_validate_rejects_ragged_hull() {
        static BROKEN: Model = Model {
            name: "broken",
            size: Vec2::new(10.0, 10.0),
            speed: 100.0,
            hp: 1,
            color1: hex(0xffffff, 1.0),
            color2: hex(0xffffff, 1.0),
            blowup_factor: 1.0,
            guns: &[],
            engines: &[],
            hull: &[Vec2::new(0.0, 1.0), Vec2::new(-1.0, -1.0)],
        };
        assert_eq!(
            BROKEN.validate(),
            Err(ModelError::BadHull {
                model: "broken",
                count: 2,
            })
        );
    }

    #[test]
    fn test_validate_rejects_zero_rate_gun() {
        static BROKEN: Model = Model {
            name: "broken_gun",
            size: Vec2::new(10.0, 10.0),
            speed: 100.0,
            hp: 1,
            color1: hex(0xffffff, 1.0),
            color2: hex(0xffffff, 1.0),
            blowup_factor: 1.0,
            guns: &[GunSpec {
                pos: Vec2::new(0.0, 1.0),
                rate: 0.0,
                speed: 100.0,
                size: Vec2::new(5.0, 5.0),
                color: hex(0xffffff, 1.0),
                cue: None,
            }],
            engines: &[],
            hull: &FIGHTER_HULL,
        };
        assert!(matches!(
            BROKEN.validate(),
            Err(ModelError::BadGunRate { index: 0, .. })
        ));
    }

    #[test]
    fn test_only_first_barrel_of_a_pair_carries_a_cue() {
        assert!(PLAYER.guns[0].cue.is_some());
        assert!(PLAYER.guns[1].cue.is_none());
        assert!(FIGHTER.guns[0].cue.is_some());
        assert!(FIGHTER.guns[1].cue.is_none());
    }
}
