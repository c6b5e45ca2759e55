//! Sprite shapes and the dot-occupancy masks derived from them.
//!
//! A `Shape` is a polygon in local space, facing up. Rasterizing it at a
//! heading produces a `Mask`: the per-dot opacity data used both by the
//! braille renderer and by the narrow-phase collision test. Shapes live in a
//! `SpriteSet` registry built once at startup and shared by handle, so every
//! big asteroid points at the same polygon and no mask source data is ever
//! copied per instance.

use std::rc::Rc;

use rand::Rng;

use crate::vec2::{Vec2, UP};

/// Irregular-polygon radii per asteroid size class, in dots.
pub const BIG_RADIUS: f32 = 11.0;
pub const MEDIUM_RADIUS: f32 = 6.5;
pub const SMALL_RADIUS: f32 = 3.5;

const SHIP_NOSE: f32 = 6.0;
const SHIP_WING: f32 = 4.4;
const SHIP_NOTCH: f32 = 2.4;
const SHIP_WING_DEG: f32 = 108.4;

/// Dot-occupancy bitmap for one sprite at one heading.
#[derive(Clone, Debug)]
pub struct Mask {
    dim: u32,
    bits: Vec<bool>,
}

impl Mask {
    pub fn dim(&self) -> u32 {
        self.dim
    }

    /// Half extents of the bounding box, in dots.
    pub fn half_extents(&self) -> (f32, f32) {
        (self.dim as f32 / 2.0, self.dim as f32 / 2.0)
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.dim as i32 || y >= self.dim as i32 {
            return false;
        }
        self.bits[y as usize * self.dim as usize + x as usize]
    }

    pub fn opaque_count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Coordinates of every opaque dot, for the renderer.
    pub fn opaque_dots(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let dim = self.dim as i32;
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, b)| **b)
            .map(move |(i, _)| (i as i32 % dim, i as i32 / dim))
    }
}

/// A sprite outline: polygon vertices in local space, facing `UP`.
#[derive(Clone, Debug)]
pub struct Shape {
    verts: Vec<Vec2>,
    dim: u32,
}

impl Shape {
    pub fn new(verts: Vec<Vec2>) -> Self {
        let max = verts
            .iter()
            .map(|v| v.length())
            .fold(0.0f32, f32::max);
        // Square mask sized to hold the polygon at any rotation.
        let dim = (max * 2.0).ceil() as u32 + 2;
        Shape { verts, dim }
    }

    /// Rasterize at a heading, measured in degrees clockwise from up.
    /// Even-odd fill sampled at dot centers.
    pub fn rasterize(&self, angle_deg: f32) -> Mask {
        let rotated: Vec<Vec2> = self.verts.iter().map(|v| v.rotated(angle_deg)).collect();
        let dim = self.dim;
        let half = dim as f32 / 2.0;
        let mut bits = vec![false; (dim * dim) as usize];
        for y in 0..dim {
            for x in 0..dim {
                let p = Vec2::new(x as f32 + 0.5 - half, y as f32 + 0.5 - half);
                if point_in_polygon(&rotated, p) {
                    bits[(y * dim + x) as usize] = true;
                }
            }
        }
        Mask { dim, bits }
    }
}

fn point_in_polygon(verts: &[Vec2], p: Vec2) -> bool {
    let mut inside = false;
    let n = verts.len();
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (verts[i], verts[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let t = (p.y - a.y) / (b.y - a.y);
            if p.x < a.x + t * (b.x - a.x) {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Nose, left wing, tail notch, right wing.
fn ship_shape() -> Shape {
    Shape::new(vec![
        UP * SHIP_NOSE,
        UP.rotated(SHIP_WING_DEG) * SHIP_WING,
        -UP * SHIP_NOTCH,
        UP.rotated(-SHIP_WING_DEG) * SHIP_WING,
    ])
}

/// Irregular rock outline: `n` vertices with per-vertex radius jitter.
fn asteroid_shape(radius: f32, n: usize, rng: &mut impl Rng) -> Shape {
    let verts = (0..n)
        .map(|i| {
            let angle = i as f32 / n as f32 * 360.0;
            let r = radius * rng.gen_range(0.72..1.0);
            UP.rotated(angle) * r
        })
        .collect();
    Shape::new(verts)
}

fn bullet_shape() -> Shape {
    Shape::new(vec![
        Vec2::new(-1.0, -1.0),
        Vec2::new(1.0, -1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(-1.0, 1.0),
    ])
}

/// Asset registry: one shared shape per sprite type, built once at startup
/// and handed to entities by handle.
pub struct SpriteSet {
    pub ship: Rc<Shape>,
    pub bullet: Rc<Shape>,
    big: Rc<Shape>,
    medium: Rc<Shape>,
    small: Rc<Shape>,
}

impl SpriteSet {
    pub fn load() -> Self {
        let mut rng = rand::thread_rng();
        SpriteSet {
            ship: Rc::new(ship_shape()),
            bullet: Rc::new(bullet_shape()),
            big: Rc::new(asteroid_shape(BIG_RADIUS, 11, &mut rng)),
            medium: Rc::new(asteroid_shape(MEDIUM_RADIUS, 9, &mut rng)),
            small: Rc::new(asteroid_shape(SMALL_RADIUS, 7, &mut rng)),
        }
    }

    pub fn asteroid(&self, size: crate::entity::SizeClass) -> Rc<Shape> {
        use crate::entity::SizeClass::*;
        match size {
            Big => Rc::clone(&self.big),
            Medium => Rc::clone(&self.medium),
            Small => Rc::clone(&self.small),
        }
    }
}
