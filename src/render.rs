//! Renderer boundary
//!
//! The simulation never touches a GPU. Entities emit world-space primitives
//! through `DrawTarget`; a real renderer sorts them by group for
//! post-processing, while `DrawList` just records them for tests and
//! headless runs.

use glam::{Vec2, Vec4};

/// Post-processing group a primitive is drawn into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderGroup {
    /// Background starfield
    Stars,
    /// Flat-shaded ship hulls
    Plain,
    /// Glowing primitives: projectiles, explosions, transitions
    Neon,
    /// Engine exhaust
    Engine,
}

/// Solid white, used for damage flashes and explosion cores
pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
/// Opaque black, used by the death-transition shroud
pub const BLACK: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);

/// RGBA color from a 0xRRGGBB literal plus alpha
#[inline]
pub const fn hex(rgb: u32, alpha: f32) -> Vec4 {
    let r = ((rgb >> 16) & 0xff) as f32 / 255.0;
    let g = ((rgb >> 8) & 0xff) as f32 / 255.0;
    let b = (rgb & 0xff) as f32 / 255.0;
    Vec4::new(r, g, b, alpha)
}

/// Sink for world-space draw commands
pub trait DrawTarget {
    /// Draw a triangle list: every 3 consecutive points form one triangle
    fn poly(&mut self, points: &[Vec2], color: Vec4, group: RenderGroup);

    /// Draw a regular n-gon filling an ellipse of the given extents
    fn ngon(&mut self, center: Vec2, size: Vec2, segments: u32, color: Vec4, group: RenderGroup);
}

/// One recorded draw command
#[derive(Debug, Clone)]
pub enum DrawCmd {
    Poly {
        points: Vec<Vec2>,
        color: Vec4,
        group: RenderGroup,
    },
    Ngon {
        center: Vec2,
        size: Vec2,
        segments: u32,
        color: Vec4,
        group: RenderGroup,
    },
}

impl DrawCmd {
    pub fn group(&self) -> RenderGroup {
        match self {
            DrawCmd::Poly { group, .. } | DrawCmd::Ngon { group, .. } => *group,
        }
    }
}

/// Collecting `DrawTarget` for tests and headless runs
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Number of recorded commands in one group
    pub fn count(&self, group: RenderGroup) -> usize {
        self.commands.iter().filter(|c| c.group() == group).count()
    }
}

impl DrawTarget for DrawList {
    fn poly(&mut self, points: &[Vec2], color: Vec4, group: RenderGroup) {
        self.commands.push(DrawCmd::Poly {
            points: points.to_vec(),
            color,
            group,
        });
    }

    fn ngon(&mut self, center: Vec2, size: Vec2, segments: u32, color: Vec4, group: RenderGroup) {
        self.commands.push(DrawCmd::Ngon {
            center,
            size,
            segments,
            color,
            group,
        });
    }
}
