use crate::vec2::Vec2;

/// The toroidal play field. Leaving one edge re-enters the opposite edge, so
/// anything overlapping an edge must also appear (and collide) at its wrapped
/// position on the far side.
#[derive(Clone, Copy, Debug)]
pub struct Space {
    pub width: f32,
    pub height: f32,
}

impl Space {
    pub fn new(width: f32, height: f32) -> Self {
        Space { width, height }
    }

    /// Reduce a position into `[0, width) x [0, height)`. Uses a true modulo
    /// so negative coordinates wrap to the positive range.
    pub fn wrap(&self, p: Vec2) -> Vec2 {
        Vec2::new(p.x.rem_euclid(self.width), p.y.rem_euclid(self.height))
    }

    /// Offsets at which an object centered at `pos` with the given half
    /// extents must be drawn and collided. Always contains `(0,0)`; adds one
    /// offset per crossed edge and, when both a horizontal and a vertical
    /// edge are crossed, their sum for the corner copy. Yields 1, 2, or 4
    /// offsets.
    pub fn mirror_offsets(&self, pos: Vec2, half_w: f32, half_h: f32) -> Vec<Vec2> {
        let mut offsets = vec![Vec2::ZERO];

        if pos.x - half_w < 0.0 {
            offsets.push(Vec2::new(self.width, 0.0));
        } else if pos.x + half_w > self.width {
            offsets.push(Vec2::new(-self.width, 0.0));
        }

        if pos.y - half_h < 0.0 {
            offsets.push(Vec2::new(0.0, self.height));
        } else if pos.y + half_h > self.height {
            offsets.push(Vec2::new(0.0, -self.height));
        }

        if offsets.len() == 3 {
            let corner = offsets[1] + offsets[2];
            offsets.push(corner);
        }

        offsets
    }

    /// Whether the bounding rect still touches the screen rect. Non-wrapping
    /// objects (bullets) die once this turns false.
    pub fn rect_intersects_screen(&self, pos: Vec2, half_w: f32, half_h: f32) -> bool {
        pos.x + half_w >= 0.0
            && pos.x - half_w <= self.width
            && pos.y + half_h >= 0.0
            && pos.y - half_h <= self.height
    }
}
