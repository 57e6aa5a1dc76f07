use core::ops::{Add, Mul, Sub};

/// 2D vector in logical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn zero() -> Self {
        Self { x: 0.0, y: 0.0 }
    }

    /// Unit vector pointing at `angle` radians.
    ///
    /// Angles follow screen space: 0 points right (+X) and positive angles
    /// turn clockwise because +Y points down.
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { x: cos, y: sin }
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    #[inline]
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn from_angle_zero_points_right() {
        let v = Vec2::from_angle(0.0);
        assert!((v.x - 1.0).abs() < EPS);
        assert!(v.y.abs() < EPS);
    }

    #[test]
    fn from_angle_minus_half_pi_points_up() {
        // +Y is down, so -π/2 is "12 o'clock".
        let v = Vec2::from_angle(-core::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < EPS);
        assert!((v.y + 1.0).abs() < EPS);
    }

    #[test]
    fn length_of_3_4_is_5() {
        assert!((Vec2::new(3.0, 4.0).length() - 5.0).abs() < EPS);
    }
}
