//! 2D vector algebra used throughout the engine.

use std::ops::{Add, Mul, Neg, Sub};

/// An immutable 2D vector. All operations return new vectors; the one exception
/// is integration and the impulse solver, which mutate body fields in place for
/// performance (see `body.rs` and `solver.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vector) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// 2D cross product (a scalar: the z-component of the 3D cross product).
    pub fn cross(self, other: Vector) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Cross product of a vector with a scalar, as used when distributing
    /// angular velocity onto a contact arm: `perp(r) * omega`.
    pub fn cross_scalar(self, scalar: f64) -> Vector {
        Vector::new(-scalar * self.y, scalar * self.x)
    }

    /// `perp(v) = (-v.y, v.x)`.
    pub fn perp(self) -> Vector {
        Vector::new(-self.y, self.x)
    }

    pub fn magnitude(self) -> f64 {
        self.magnitude_squared().sqrt()
    }

    pub fn magnitude_squared(self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    pub fn normalize(self) -> Vector {
        let mag = self.magnitude();
        if mag < 1e-12 {
            return Vector::ZERO;
        }
        Vector::new(self.x / mag, self.y / mag)
    }

    /// Angle of the vector against the x-axis. Returns `pi/2` for a zero x
    /// component (matching the source's half-line convention, §4.1) rather than
    /// `atan2`; axis deduplication post-processes this so the ambiguity between
    /// a direction and its opposite is harmless there.
    pub fn direction(self) -> f64 {
        if self.x == 0.0 {
            std::f64::consts::FRAC_PI_2
        } else {
            (self.y / self.x).atan()
        }
    }

    /// Rotate by `angle` radians about the origin.
    pub fn rotate(self, angle: f64) -> Vector {
        let cos = angle.cos();
        let sin = angle.sin();
        Vector::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    /// Rotate by `angle` radians about `point`.
    pub fn rotate_about(self, angle: f64, point: Vector) -> Vector {
        (self - point).rotate(angle) + point
    }

    pub fn scale(self, scalar: f64) -> Vector {
        Vector::new(self.x * scalar, self.y * scalar)
    }

    pub fn neg(self) -> Vector {
        Vector::new(-self.x, -self.y)
    }
}

impl Add for Vector {
    type Output = Vector;
    fn add(self, rhs: Vector) -> Vector {
        Vector::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vector {
    type Output = Vector;
    fn sub(self, rhs: Vector) -> Vector {
        Vector::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;
    fn mul(self, scalar: f64) -> Vector {
        self.scale(scalar)
    }
}

impl Neg for Vector {
    type Output = Vector;
    fn neg(self) -> Vector {
        Vector::neg(self)
    }
}
