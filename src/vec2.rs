use std::ops::{Add, AddAssign, Mul, Neg, Sub};

use rand::Rng;

/// 2D vector in world space. World units are braille dots; y grows downward.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

/// Facing straight up the screen.
pub const UP: Vec2 = Vec2 { x: 0.0, y: -1.0 };

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > f32::EPSILON {
            Vec2::new(self.x / len, self.y / len)
        } else {
            UP
        }
    }

    /// Rotate by `deg` degrees. With y pointing down, a positive angle turns
    /// the vector clockwise on screen.
    pub fn rotated(self, deg: f32) -> Self {
        let rad = deg.to_radians();
        let (sin, cos) = rad.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    /// Heading in degrees, measured clockwise from `UP`.
    pub fn angle_deg(self) -> f32 {
        self.x.atan2(-self.y).to_degrees()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Vec2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Random spawn point on a ring of radius `min(w,h)/2` around the screen
/// center, so fresh rocks never land on the ship's starting spot.
pub fn random_ring_pos(w: f32, h: f32) -> Vec2 {
    let mut rng = rand::thread_rng();
    let angle = rng.gen_range(0.0..std::f32::consts::TAU);
    let radius = w.min(h) / 2.0;
    Vec2::new(
        w / 2.0 + radius * angle.sin(),
        h / 2.0 + radius * angle.cos(),
    )
}

/// Uniform drift velocity with each component in `[-limit, limit]`.
pub fn random_drift(limit: f32) -> Vec2 {
    let mut rng = rand::thread_rng();
    Vec2::new(rng.gen_range(-limit..limit), rng.gen_range(-limit..limit))
}
