use crate::{geometry::traits::Number, helpers::aliases::Vec3};

/// Componentwise numeric cast between vector scalar types.
#[inline]
pub fn cast<TFrom: Number, TTo: Number>(vec: &Vec3<TFrom>) -> Vec3<TTo> {
    Vec3::new(
        num_traits::cast(vec.x).unwrap(),
        num_traits::cast(vec.y).unwrap(),
        num_traits::cast(vec.z).unwrap(),
    )
}
