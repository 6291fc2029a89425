use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

use fixed::types::I32F32;

const MILLI: i128 = 1000;
const FRAC_SCALE: i128 = 1 << I32F32::FRAC_NBITS;

/// A length in points. Every value is snapped to 1/1000 pt, so the same
/// layout input always lands on the same coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Pt(I32F32);

// Integer division rounding half away from zero. `den` must not be zero.
fn round_div(num: i128, den: i128) -> i128 {
    let quotient = (num.unsigned_abs() + den.unsigned_abs() / 2) / den.unsigned_abs();
    let quotient = quotient.min(i128::MAX as u128) as i128;
    if (num < 0) != (den < 0) { -quotient } else { quotient }
}

impl Pt {
    pub const ZERO: Pt = Pt(I32F32::ZERO);

    fn from_milli(milli: i128) -> Pt {
        let bits = round_div(milli.saturating_mul(FRAC_SCALE), MILLI);
        Pt(I32F32::from_bits(
            bits.clamp(i64::MIN as i128, i64::MAX as i128) as i64,
        ))
    }

    fn milli(self) -> i128 {
        round_div(i128::from(self.0.to_bits()) * MILLI, FRAC_SCALE)
    }

    /// Non-finite input collapses to zero.
    pub fn from_f32(value: f32) -> Pt {
        if !value.is_finite() {
            return Pt::ZERO;
        }
        Pt::from_milli((f64::from(value) * 1000.0).round() as i128)
    }

    pub fn from_i32(value: i32) -> Pt {
        Pt::from_milli(i128::from(value) * MILLI)
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    pub fn to_milli_i64(self) -> i64 {
        self.milli().clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    pub fn max(self, other: Pt) -> Pt {
        if other > self { other } else { self }
    }

    pub fn min(self, other: Pt) -> Pt {
        if other < self { other } else { self }
    }

    pub fn is_positive(self) -> bool {
        self.milli() > 0
    }

    /// `self * num / denom` in exact milli arithmetic; zero when `denom` is zero.
    pub fn mul_ratio(self, num: i32, denom: i32) -> Pt {
        if denom == 0 {
            return Pt::ZERO;
        }
        Pt::from_milli(round_div(
            self.milli().saturating_mul(i128::from(num)),
            i128::from(denom),
        ))
    }
}

impl fmt::Display for Pt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}", self.to_f32())
    }
}

impl Add for Pt {
    type Output = Pt;
    fn add(self, rhs: Pt) -> Pt {
        Pt::from_milli(self.milli() + rhs.milli())
    }
}

impl AddAssign for Pt {
    fn add_assign(&mut self, rhs: Pt) {
        *self = *self + rhs;
    }
}

impl Sub for Pt {
    type Output = Pt;
    fn sub(self, rhs: Pt) -> Pt {
        Pt::from_milli(self.milli() - rhs.milli())
    }
}

impl SubAssign for Pt {
    fn sub_assign(&mut self, rhs: Pt) {
        *self = *self - rhs;
    }
}

impl Mul<i32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: i32) -> Pt {
        Pt::from_milli(self.milli().saturating_mul(i128::from(rhs)))
    }
}

impl Div<i32> for Pt {
    type Output = Pt;
    fn div(self, rhs: i32) -> Pt {
        self.mul_ratio(1, rhs)
    }
}

impl Mul<f32> for Pt {
    type Output = Pt;
    fn mul(self, rhs: f32) -> Pt {
        if rhs.is_finite() {
            Pt::from_f32(self.to_f32() * rhs)
        } else {
            Pt::ZERO
        }
    }
}

impl Sum for Pt {
    fn sum<I: Iterator<Item = Pt>>(iter: I) -> Pt {
        iter.fold(Pt::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Pt> for Pt {
    fn sum<I: Iterator<Item = &'a Pt>>(iter: I) -> Pt {
        iter.copied().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: Pt,
    pub height: Pt,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Pt::from_f32(width),
            height: Pt::from_f32(height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: Pt,
    pub y: Pt,
    pub width: Pt,
    pub height: Pt,
}

impl Rect {
    pub fn new(x: Pt, y: Pt, width: Pt, height: Pt) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> Pt {
        self.x + self.width
    }

    pub fn bottom(&self) -> Pt {
        self.y + self.height
    }
}

/// Page margins, in document order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: Pt,
    pub right: Pt,
    pub bottom: Pt,
    pub left: Pt,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        let value = Pt::from_f32(value);
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Opaque RGB with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_rounds_to_the_nearest_milli() {
        let third = Pt::from_i32(100) / 3;
        assert_eq!(third.to_milli_i64(), 33_333);
        let sum: Pt = [third, third, third].iter().sum();
        assert_eq!(sum.to_milli_i64(), 99_999);
        assert_eq!((Pt::from_i32(-100) / 3).to_milli_i64(), -33_333);
        assert_eq!(Pt::from_f32(0.0015).to_milli_i64(), 2);
    }

    #[test]
    fn non_finite_and_zero_divisors_give_zero() {
        assert_eq!(Pt::from_f32(f32::NAN), Pt::ZERO);
        assert_eq!(Pt::from_f32(f32::INFINITY), Pt::ZERO);
        assert_eq!(Pt::from_i32(5) / 0, Pt::ZERO);
        assert_eq!(Pt::from_i32(5) * f32::NAN, Pt::ZERO);
    }

    #[test]
    fn ratio_scales_exactly() {
        assert_eq!(Pt::from_i32(10).mul_ratio(6, 5), Pt::from_i32(12));
        assert_eq!(Pt::from_i32(7).mul_ratio(1, 0), Pt::ZERO);
        assert!(Pt::from_f32(0.001).is_positive());
        assert!(!Pt::from_f32(-0.001).is_positive());
    }

    #[test]
    fn rect_edges() {
        let rect = Rect::new(
            Pt::from_i32(10),
            Pt::from_i32(20),
            Pt::from_i32(30),
            Pt::from_i32(40),
        );
        assert_eq!(rect.right(), Pt::from_i32(40));
        assert_eq!(rect.bottom(), Pt::from_i32(60));
    }
}
