//! World-space vector math.
//!
//! Coordinates are game units with `z` up.  Yaw is measured in degrees
//! counter-clockwise from the +x axis and normalised to `[0, 360)`.

use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// A 3-component single-precision vector.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const UP:   Vec3 = Vec3::new(0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn dot(self, o: Vec3) -> f32 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    #[inline]
    pub fn dot_2d(self, o: Vec3) -> f32 {
        self.x * o.x + self.y * o.y
    }

    #[inline]
    pub fn cross(self, o: Vec3) -> Vec3 {
        Vec3::new(
            self.y * o.z - self.z * o.y,
            self.z * o.x - self.x * o.z,
            self.x * o.y - self.y * o.x,
        )
    }

    #[inline]
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Length ignoring the vertical component.
    #[inline]
    pub fn length_2d(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn distance(self, o: Vec3) -> f32 {
        (o - self).length()
    }

    #[inline]
    pub fn distance_2d(self, o: Vec3) -> f32 {
        (o - self).length_2d()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalize(self) -> Vec3 {
        let len = self.length();
        if len <= f32::EPSILON { Vec3::ZERO } else { self * (1.0 / len) }
    }

    /// Horizontal projection (`z` dropped to 0).
    #[inline]
    pub fn flat(self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.0)
    }

    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.z == 0.0
    }

    /// Yaw of this direction in degrees, `[0, 360)`.
    pub fn to_yaw(self) -> f32 {
        if self.x == 0.0 && self.y == 0.0 {
            return 0.0;
        }
        angle_mod(self.y.atan2(self.x).to_degrees())
    }

    /// Horizontal unit vector pointing along `yaw_deg`.
    pub fn from_yaw(yaw_deg: f32) -> Vec3 {
        let r = yaw_deg.to_radians();
        Vec3::new(r.cos(), r.sin(), 0.0)
    }

    /// Horizontal unit vector 90° clockwise of `yaw_deg` (the "right" axis).
    pub fn right_of_yaw(yaw_deg: f32) -> Vec3 {
        Vec3::from_yaw(yaw_deg - 90.0)
    }

    /// Linear interpolation toward `o`.
    #[inline]
    pub fn lerp(self, o: Vec3, t: f32) -> Vec3 {
        self + (o - self) * t
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    #[inline]
    fn add(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x + o.x, self.y + o.y, self.z + o.z)
    }
}

impl AddAssign for Vec3 {
    #[inline]
    fn add_assign(&mut self, o: Vec3) {
        *self = *self + o;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    #[inline]
    fn sub(self, o: Vec3) -> Vec3 {
        Vec3::new(self.x - o.x, self.y - o.y, self.z - o.z)
    }
}

impl SubAssign for Vec3 {
    #[inline]
    fn sub_assign(&mut self, o: Vec3) {
        *self = *self - o;
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;
    #[inline]
    fn mul(self, s: f32) -> Vec3 {
        Vec3::new(self.x * s, self.y * s, self.z * s)
    }
}

impl Neg for Vec3 {
    type Output = Vec3;
    #[inline]
    fn neg(self) -> Vec3 {
        Vec3::new(-self.x, -self.y, -self.z)
    }
}

impl std::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

// ── Angles ────────────────────────────────────────────────────────────────────

/// Wrap an angle in degrees into `[0, 360)`.
pub fn angle_mod(deg: f32) -> f32 {
    let a = deg % 360.0;
    if a < 0.0 { a + 360.0 } else { a }
}

/// Signed shortest difference `to - from`, in `(-180, 180]`.
pub fn yaw_delta(from: f32, to: f32) -> f32 {
    let mut d = angle_mod(to) - angle_mod(from);
    if d > 180.0 {
        d -= 360.0;
    } else if d <= -180.0 {
        d += 360.0;
    }
    d
}

// ── Plane ─────────────────────────────────────────────────────────────────────

/// A half-space boundary `normal · p = dist`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub dist:   f32,
}

impl Plane {
    /// Plane through `point` facing along `normal`.
    pub fn through(normal: Vec3, point: Vec3) -> Self {
        Self { normal, dist: normal.dot(point) }
    }

    /// `true` when `p` lies on or in front of the plane.
    #[inline]
    pub fn point_in_front(&self, p: Vec3) -> bool {
        self.normal.dot(p) - self.dist >= 0.0
    }
}
