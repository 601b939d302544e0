//! Immutable 2D points and vectors in screen coordinates
//!
//! Every operation returns a new value. Angles follow the screen convention:
//! counter-clockwise from +x with the y axis pointing down.

use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::{screen_angle, screen_direction};

/// A position on the playfield
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point2d {
    pub x: f64,
    pub y: f64,
}

/// A displacement, velocity or acceleration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2d {
    pub x: f64,
    pub y: f64,
}

/// An integer screen point (solution sets are made of these)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntPoint {
    pub x: i32,
    pub y: i32,
}

impl Point2d {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    /// This point moved by `offset`
    #[inline]
    pub fn translate(self, offset: Vector2d) -> Self {
        self + offset
    }

    /// Displacement from this point to `other`
    #[inline]
    pub fn to(self, other: Point2d) -> Vector2d {
        other - self
    }

    #[inline]
    pub fn distance(self, other: Point2d) -> f64 {
        self.as_dvec2().distance(other.as_dvec2())
    }

    #[inline]
    pub fn distance_squared(self, other: Point2d) -> f64 {
        self.as_dvec2().distance_squared(other.as_dvec2())
    }

    /// Screen angle of the ray from this point toward `other`
    #[inline]
    pub fn angle_to(self, other: Point2d) -> f64 {
        screen_angle(other.x - self.x, other.y - self.y)
    }

    /// Nearest integer point
    #[inline]
    pub fn rounded(self) -> IntPoint {
        IntPoint::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl From<DVec2> for Point2d {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl From<IntPoint> for Point2d {
    fn from(p: IntPoint) -> Self {
        Self::new(p.x as f64, p.y as f64)
    }
}

impl Vector2d {
    pub const ZERO: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector of the given length pointing along a screen angle
    #[inline]
    pub fn from_polar(magnitude: f64, angle: f64) -> Self {
        (screen_direction(angle) * magnitude).into()
    }

    #[inline]
    pub fn as_dvec2(self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.as_dvec2().length()
    }

    #[inline]
    pub fn length_squared(self) -> f64 {
        self.as_dvec2().length_squared()
    }

    /// Screen angle of this vector
    #[inline]
    pub fn angle(self) -> f64 {
        screen_angle(self.x, self.y)
    }

    #[inline]
    pub fn dot(self, other: Vector2d) -> f64 {
        self.as_dvec2().dot(other.as_dvec2())
    }

    /// Unit vector, or zero for a zero-length vector
    #[inline]
    pub fn normalize_or_zero(self) -> Self {
        self.as_dvec2().normalize_or_zero().into()
    }

    /// Component of this vector along `direction`; zero when `direction` is zero
    pub fn projection_onto(self, direction: Vector2d) -> Self {
        if direction.length_squared() == 0.0 {
            return Self::ZERO;
        }
        self.as_dvec2().project_onto(direction.as_dvec2()).into()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<DVec2> for Vector2d {
    fn from(v: DVec2) -> Self {
        Self::new(v.x, v.y)
    }
}

impl IntPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Formats as the conventional `"x y"` pair used by solution files
impl fmt::Display for IntPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.x, self.y)
    }
}

impl Add<Vector2d> for Point2d {
    type Output = Point2d;
    fn add(self, rhs: Vector2d) -> Point2d {
        Point2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign<Vector2d> for Point2d {
    fn add_assign(&mut self, rhs: Vector2d) {
        *self = *self + rhs;
    }
}

impl Sub for Point2d {
    type Output = Vector2d;
    fn sub(self, rhs: Point2d) -> Vector2d {
        Vector2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Vector2d {
    type Output = Vector2d;
    fn add(self, rhs: Vector2d) -> Vector2d {
        Vector2d::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2d {
    fn add_assign(&mut self, rhs: Vector2d) {
        *self = *self + rhs;
    }
}

impl Sub for Vector2d {
    type Output = Vector2d;
    fn sub(self, rhs: Vector2d) -> Vector2d {
        Vector2d::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Vector2d {
    type Output = Vector2d;
    fn mul(self, k: f64) -> Vector2d {
        Vector2d::new(self.x * k, self.y * k)
    }
}

impl Div<f64> for Vector2d {
    type Output = Vector2d;
    fn div(self, k: f64) -> Vector2d {
        Vector2d::new(self.x / k, self.y / k)
    }
}

impl Neg for Vector2d {
    type Output = Vector2d;
    fn neg(self) -> Vector2d {
        Vector2d::new(-self.x, -self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_close(left: f64, right: f64) {
        assert!((left - right).abs() < 1e-9, "{left} != {right}");
    }

    #[test]
    fn test_angle_uses_screen_convention() {
        // Straight up on screen is negative y
        assert_close(Vector2d::new(0.0, -5.0).angle(), FRAC_PI_2);
        assert_close(Vector2d::new(0.0, 5.0).angle(), -FRAC_PI_2);
        assert_close(Vector2d::new(-2.0, 0.0).angle(), PI);
    }

    #[test]
    fn test_polar_dual() {
        let v = Vector2d::from_polar(3.0, 2.0);
        assert_close(v.length(), 3.0);
        assert_close(v.angle(), 2.0);

        let w = Vector2d::new(-4.0, 3.0);
        let back = Vector2d::from_polar(w.length(), w.angle());
        assert_close(back.x, w.x);
        assert_close(back.y, w.y);
    }

    #[test]
    fn test_projection() {
        let v = Vector2d::new(3.0, 4.0);
        let p = v.projection_onto(Vector2d::new(10.0, 0.0));
        assert_close(p.x, 3.0);
        assert_close(p.y, 0.0);
        assert_eq!(v.projection_onto(Vector2d::ZERO), Vector2d::ZERO);
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point2d::new(1.0, 2.0);
        let b = a.translate(Vector2d::new(3.0, -2.0));
        assert_eq!(b, Point2d::new(4.0, 0.0));
        assert_eq!(a.to(b), Vector2d::new(3.0, -2.0));
        assert_close(a.distance(b), 13.0_f64.sqrt());
        assert_close(a.distance_squared(b), 13.0);
        assert_close(a.angle_to(Point2d::new(1.0, 0.0)), FRAC_PI_2);
    }

    #[test]
    fn test_rounding_and_display() {
        assert_eq!(Point2d::new(2.5, -1.4).rounded(), IntPoint::new(3, -1));
        assert_eq!(IntPoint::new(12, -7).to_string(), "12 -7");
    }
}
