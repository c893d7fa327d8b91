use nalgebra_glm::{max2, min2};
use num_traits::{cast, Bounded};

use crate::{
    geometry::traits::{Number, RealNumber},
    helpers::aliases::Vec3,
};

/// 3D axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Box3<TScalar: Number> {
    min: Vec3<TScalar>,
    max: Vec3<TScalar>,
}

impl<TScalar: Number> Box3<TScalar> {
    pub fn new(min: Vec3<TScalar>, max: Vec3<TScalar>) -> Self {
        Self { min, max }
    }

    /// Neutral element of componentwise expansion: every union with a point
    /// or box replaces the bounds.
    pub fn empty() -> Self {
        Self {
            min: Vec3::repeat(Bounded::max_value()),
            max: Vec3::repeat(Bounded::min_value()),
        }
    }

    /// `true` for boxes that contain no point, e.g. the [empty](Box3::empty) box.
    /// Degenerate (zero-volume) boxes are not empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    #[inline]
    pub fn get_min(&self) -> &Vec3<TScalar> {
        &self.min
    }

    #[inline]
    pub fn get_max(&self) -> &Vec3<TScalar> {
        &self.max
    }

    #[inline]
    pub fn size_x(&self) -> TScalar {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn size_y(&self) -> TScalar {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn size_z(&self) -> TScalar {
        self.max.z - self.min.z
    }

    #[inline]
    pub fn sizes(&self) -> Vec3<TScalar> {
        self.max - self.min
    }

    #[inline]
    pub fn volume(&self) -> TScalar {
        self.size_x() * self.size_y() * self.size_z()
    }

    #[inline]
    pub fn union_box(&mut self, other: &Box3<TScalar>) -> &mut Self {
        self.min = min2(&self.min, &other.min);
        self.max = max2(&self.max, &other.max);

        self
    }

    #[inline]
    pub fn union_point(&mut self, point: &Vec3<TScalar>) -> &mut Self {
        self.min = min2(&self.min, point);
        self.max = max2(&self.max, point);

        self
    }

    /// Returns the ith box corner in order: (x,y,z),(X,y,z),(x,Y,z),(X,Y,z),(x,y,Z),(X,y,Z),(x,Y,Z),(X,Y,Z)
    #[inline]
    pub fn vertex(&self, i: u8) -> Vec3<TScalar> {
        Vec3::new(
            if i & 1 == 0 { self.min.x } else { self.max.x },
            if i & 2 == 0 { self.min.y } else { self.max.y },
            if i & 4 == 0 { self.min.z } else { self.max.z },
        )
    }

    #[inline]
    pub fn contains_point(&self, point: &Vec3<TScalar>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    #[inline]
    pub fn contains_box(&self, other: &Box3<TScalar>) -> bool {
        self.contains_point(&other.min) && self.contains_point(&other.max)
    }

    /// Test bbox - bbox intersection. Shared-face contact counts as
    /// intersection.
    pub fn intersects_box3(&self, other: &Box3<TScalar>) -> bool {
        if self.max[0] < other.min[0] || self.min[0] > other.max[0] {
            return false;
        }

        if self.max[1] < other.min[1] || self.min[1] > other.max[1] {
            return false;
        }

        if self.max[2] < other.min[2] || self.min[2] > other.max[2] {
            return false;
        }

        true
    }
}

impl<TScalar: RealNumber> Box3<TScalar> {
    #[inline]
    pub fn get_center(&self) -> Vec3<TScalar> {
        (self.min + self.max) * cast::<f64, TScalar>(0.5).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::Box3;
    use crate::helpers::aliases::{Vec3, Vec3f};
    use test_case::test_case;

    #[test_case((0.0, 0.0, 0.0), (1.0, 1.0, 1.0), true; "identical")]
    #[test_case((1.0, 0.0, 0.0), (2.0, 1.0, 1.0), true; "shared face")]
    #[test_case((1.0, 1.0, 1.0), (2.0, 2.0, 2.0), true; "shared corner")]
    #[test_case((0.5, 0.5, 0.5), (0.75, 0.75, 0.75), true; "contained")]
    #[test_case((1.1, 0.0, 0.0), (2.0, 1.0, 1.0), false; "separated along x")]
    #[test_case((0.0, 0.0, 1.5), (1.0, 1.0, 2.0), false; "separated along z")]
    fn box_box_intersection(min: (f32, f32, f32), max: (f32, f32, f32), expected: bool) {
        let unit = Box3::new(Vec3f::zeros(), Vec3f::repeat(1.0));
        let other = Box3::new(Vec3::new(min.0, min.1, min.2), Vec3::new(max.0, max.1, max.2));

        assert_eq!(expected, unit.intersects_box3(&other));
        assert_eq!(expected, other.intersects_box3(&unit));
    }

    #[test]
    fn empty_box_is_union_neutral() {
        let mut bbox = Box3::<f64>::empty();
        assert!(bbox.is_empty());

        bbox.union_point(&Vec3::new(1.0, 2.0, 3.0));
        bbox.union_point(&Vec3::new(-1.0, 0.0, 5.0));

        assert_eq!(&Vec3::new(-1.0, 0.0, 3.0), bbox.get_min());
        assert_eq!(&Vec3::new(1.0, 2.0, 5.0), bbox.get_max());
        assert!(!bbox.is_empty());
    }

    #[test]
    fn empty_box_intersects_nothing() {
        let empty = Box3::<f32>::empty();
        let unit = Box3::new(Vec3f::zeros(), Vec3f::repeat(1.0));

        assert!(!empty.intersects_box3(&unit));
        assert!(!unit.intersects_box3(&empty));
    }

    #[test]
    fn degenerate_box_is_permitted() {
        let flat = Box3::new(Vec3f::zeros(), Vec3::new(1.0, 1.0, 0.0));

        assert!(!flat.is_empty());
        assert_eq!(0.0, flat.volume());
        assert!(flat.contains_point(&Vec3::new(0.5, 0.5, 0.0)));
    }

    #[test]
    fn corners_follow_axis_bit_order() {
        let bbox = Box3::new(Vec3f::zeros(), Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(Vec3::new(0.0, 0.0, 0.0), bbox.vertex(0));
        assert_eq!(Vec3::new(1.0, 0.0, 0.0), bbox.vertex(1));
        assert_eq!(Vec3::new(0.0, 2.0, 0.0), bbox.vertex(2));
        assert_eq!(Vec3::new(1.0, 2.0, 3.0), bbox.vertex(7));
    }

    #[test]
    fn integer_cell_range() {
        let range = Box3::new(Vec3::new(0isize, 0, 0), Vec3::new(2isize, 1, 0));

        assert!(range.contains_point(&Vec3::new(1, 1, 0)));
        assert!(!range.contains_point(&Vec3::new(3, 0, 0)));
        assert!(range.intersects_box3(&Box3::new(Vec3::new(2, 0, 0), Vec3::new(4, 0, 0))));
        assert!(!range.intersects_box3(&Box3::new(Vec3::new(3, 0, 0), Vec3::new(4, 0, 0))));
    }
}
