use num_traits::{cast, AsPrimitive, Bounded, Float, FromPrimitive, NumCast, ToPrimitive};
use std::fmt::Display;

/// Scalar usable for lattice and box arithmetic. Instantiated both at
/// floating types and at `isize` for integer cell ranges.
pub trait Number:
    nalgebra_glm::Number + NumCast + FromPrimitive + ToPrimitive + Bounded + Display
{
}

impl<T> Number for T where
    T: nalgebra_glm::Number + NumCast + FromPrimitive + ToPrimitive + Bounded + Display
{
}

/// Scalar of all geometric math. The width (`f32`/`f64`) is selected by the
/// caller at monomorphization time; machine epsilon follows the width.
pub trait RealNumber: Number + nalgebra_glm::RealNumber + Float + AsPrimitive<i32> {
    #[inline]
    fn i32(value: i32) -> Self {
        cast(value).unwrap()
    }
}

impl<T> RealNumber for T where T: Number + nalgebra_glm::RealNumber + Float + AsPrimitive<i32> {}
