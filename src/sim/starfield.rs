//! Scrolling parallax starfield
//!
//! Twenty strata scroll leftward at staggered speeds, deep blue at the
//! back and near-white up front. Each stratum keeps its stars in a ring
//! of vertical stripes and rewrites the oldest stripe just off the right
//! edge as the field drifts, so the population never changes.

use glam::{Vec2, Vec4};
use rand::Rng;

use crate::render::{hex, DrawTarget, RenderGroup};

use super::model;

const STAR_MIN_SIZE: f32 = 1.0;
const STAR_MAX_SIZE: f32 = 4.0;

#[derive(Clone, Copy, Default)]
struct Star {
    pos: Vec2,
    size: f32,
}

/// One depth layer of the field.
#[derive(Clone)]
struct StarStratum {
    size: Vec2,
    stars: Vec<Star>,
    stripe_count: usize,
    speed: f32,
    speed_factor: f32,
    color: Vec4,

    last_x: f32,
    last_stripe: usize,
}

#[derive(Clone)]
pub struct Starfield {
    strata: Vec<StarStratum>,
}

impl Starfield {
    pub fn new(size: Vec2, rng: &mut impl Rng) -> Self {
        const STRATUM_COUNT: usize = 20;
        const STARS_PER_STRATUM: usize = 50;
        const MIN_SPEED: f32 = 5.0;
        const MAX_SPEED: f32 = 100.0;

        let min_color = hex(0x001f5d, 1.0);
        let max_color = hex(0xb0caff, 1.0);

        let strata = (0..STRATUM_COUNT)
            .map(|i| {
                let t = i as f32 / STRATUM_COUNT as f32;
                let speed = MIN_SPEED + (MAX_SPEED - MIN_SPEED) * t;
                let color = min_color.lerp(max_color, t);
                StarStratum::new(size, STARS_PER_STRATUM, speed, color, rng)
            })
            .collect();

        Self { strata }
    }

    /// Scales the scroll rate of every stratum. Sticks until changed again.
    pub fn change_speed(&mut self, factor: f32) {
        for stratum in &mut self.strata {
            stratum.speed_factor = factor;
        }
    }

    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        for stratum in &mut self.strata {
            stratum.update(dt, rng);
        }
    }

    pub fn draw(&self, target: &mut dyn DrawTarget) {
        for stratum in &self.strata {
            stratum.draw(target);
        }
    }
}

const EXTRA_STRIPES: usize = 2;

impl StarStratum {
    fn new(size: Vec2, count: usize, speed: f32, color: Vec4, rng: &mut impl Rng) -> Self {
        // Square-ish stripes: a stripe holds one star per horizontal band,
        // plus two spare stripes so the right edge never runs dry.
        let stripe_count = ((count as f32).sqrt() + 0.5).floor() as usize;
        let mut stratum = Self {
            size,
            stars: vec![Star::default(); stripe_count * (stripe_count + EXTRA_STRIPES)],
            stripe_count,
            speed,
            speed_factor: 1.0,
            color,
            last_x: 0.0,
            last_stripe: 0,
        };

        for _ in 0..stripe_count + EXTRA_STRIPES {
            stratum.generate_next_stripe(rng);
        }

        stratum
    }

    fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        let shift = dt * self.speed * self.speed_factor;

        for star in &mut self.stars {
            star.pos.x -= shift;
        }
        self.last_x -= shift;

        let stripe_width = self.size.x / self.stripe_count as f32;
        if self.last_x < self.size.x + stripe_width / 2.0 {
            self.generate_next_stripe(rng);
        }
    }

    fn draw(&self, target: &mut dyn DrawTarget) {
        for star in &self.stars {
            let points = model::STAR.map(|p| p * (star.size / 2.0) + star.pos);
            target.poly(&points, self.color, RenderGroup::Stars);
        }
    }

    fn generate_next_stripe(&mut self, rng: &mut impl Rng) {
        let width = self.size.x / self.stripe_count as f32;
        let height = self.size.y / self.stripe_count as f32;

        let from = self.last_stripe * self.stripe_count;
        for (i, star) in self.stars[from..from + self.stripe_count]
            .iter_mut()
            .enumerate()
        {
            star.pos.x = self.last_x + width * rng.random::<f32>();
            star.pos.y = height * i as f32 + height * rng.random::<f32>();
            star.size = STAR_MIN_SIZE + (STAR_MAX_SIZE - STAR_MIN_SIZE) * rng.random::<f32>();
        }

        self.last_x += width;
        self.last_stripe = (self.last_stripe + 1) % (self.stripe_count + EXTRA_STRIPES);
    }
}
