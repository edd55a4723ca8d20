//! Numeric coordinate conversion.
//!
//! Drawing calls accept any primitive number as a coordinate. The value is
//! converted once, at the API boundary, by truncating toward zero. Floats
//! lose their fractional part, NaN becomes 0, and anything outside the
//! `i32` range saturates (and is then simply off-canvas).

/// A value usable as a pixel coordinate.
pub trait Coord: Copy {
    fn to_coord(self) -> i32;
}

macro_rules! int_coord {
    ($($t:ty),+) => {
        $(
            impl Coord for $t {
                fn to_coord(self) -> i32 {
                    i32::try_from(self).unwrap_or(if self > 0 as $t { i32::MAX } else { i32::MIN })
                }
            }
        )+
    };
}

int_coord!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl Coord for f32 {
    fn to_coord(self) -> i32 {
        self as i32
    }
}

impl Coord for f64 {
    fn to_coord(self) -> i32 {
        self as i32
    }
}

// ── Point ────────────────────────────────────────────────────────

/// An integer canvas position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl<X: Coord, Y: Coord> From<(X, Y)> for Point {
    fn from((x, y): (X, Y)) -> Self {
        Point::new(x.to_coord(), y.to_coord())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floats_truncate_toward_zero() {
        assert_eq!(3.9f64.to_coord(), 3);
        assert_eq!((-3.9f64).to_coord(), -3);
        assert_eq!(0.5f32.to_coord(), 0);
        assert_eq!(f64::NAN.to_coord(), 0);
    }

    #[test]
    fn integers_saturate() {
        assert_eq!(7u8.to_coord(), 7);
        assert_eq!((-7i64).to_coord(), -7);
        assert_eq!(u64::MAX.to_coord(), i32::MAX);
        assert_eq!(i64::MIN.to_coord(), i32::MIN);
        assert_eq!(f64::INFINITY.to_coord(), i32::MAX);
    }

    #[test]
    fn points_from_mixed_tuples() {
        assert_eq!(Point::from((1.7, -2)), Point::new(1, -2));
        assert_eq!(Point::from((3u16, 4i64)), Point::new(3, 4));
    }
}
