use std::mem::swap;

use num_traits::Float;

use crate::{geometry::traits::RealNumber, helpers::aliases::Vec3};

use super::box3::Box3;

/// Infinite line. l(t) = p + v*t
#[derive(PartialEq, Debug)]
pub struct Line3<TScalar: RealNumber> {
    point: Vec3<TScalar>,
    direction: Vec3<TScalar>,
}

impl<TScalar: RealNumber> Line3<TScalar> {
    pub fn new(point: Vec3<TScalar>, direction: Vec3<TScalar>) -> Self {
        Self { point, direction }
    }

    pub fn from_points(start: &Vec3<TScalar>, end: &Vec3<TScalar>) -> Self {
        Self {
            direction: (end - start).normalize(),
            point: *start,
        }
    }

    #[inline]
    pub fn get_point(&self) -> &Vec3<TScalar> {
        &self.point
    }

    #[inline]
    pub fn get_direction(&self) -> &Vec3<TScalar> {
        &self.direction
    }

    #[inline]
    pub fn point_at(&self, t: TScalar) -> Vec3<TScalar> {
        self.point + self.direction.scale(t)
    }

    /// Slab test against an axis-aligned box. Returns the entry and exit
    /// parameters of the intersection interval; box boundaries are inclusive.
    pub fn intersects_box3_at(&self, aabb: &Box3<TScalar>) -> Option<(TScalar, TScalar)> {
        let mut t_min = TScalar::neg_infinity();
        let mut t_max = TScalar::infinity();

        for i in 0..3 {
            if Float::abs(self.direction[i]) < TScalar::epsilon() {
                // Line is parallel to slab. No hit if origin not within slab
                if self.point[i] < aabb.get_min()[i] || self.point[i] > aabb.get_max()[i] {
                    return None;
                }
            } else {
                // Compute intersection t value of line with near and far plane of slab
                let ood = TScalar::one() / self.direction[i];
                let mut t1 = (aabb.get_min()[i] - self.point[i]) * ood;
                let mut t2 = (aabb.get_max()[i] - self.point[i]) * ood;

                // Make t1 be intersection with near plane, t2 with far plane
                if t1 > t2 {
                    swap(&mut t1, &mut t2);
                }

                if t1 > t_min {
                    t_min = t1;
                }

                if t2 < t_max {
                    t_max = t2;
                }

                // Exit with no collision as soon as slab intersection becomes empty
                if t_min > t_max {
                    return None;
                }
            }
        }

        Some((t_min, t_max))
    }

    #[inline]
    pub fn intersects_box3(&self, aabb: &Box3<TScalar>) -> bool {
        self.intersects_box3_at(aabb).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::Line3;
    use crate::{geometry::primitives::box3::Box3, helpers::aliases::{Vec3, Vec3f}};

    #[test]
    fn line_box_intersection_interval() {
        let unit = Box3::new(Vec3f::zeros(), Vec3f::repeat(1.0));
        let line = Line3::new(Vec3::new(-1.0, 0.5, 0.5), Vec3::new(1.0, 0.0, 0.0));

        let (t_enter, t_exit) = line.intersects_box3_at(&unit).expect("should intersect");
        assert_eq!(1.0, t_enter);
        assert_eq!(2.0, t_exit);
    }

    #[test]
    fn parallel_line_outside_slab_misses() {
        let unit = Box3::new(Vec3f::zeros(), Vec3f::repeat(1.0));
        let line = Line3::new(Vec3::new(-1.0, 2.0, 0.5), Vec3::new(1.0, 0.0, 0.0));

        assert!(line.intersects_box3_at(&unit).is_none());
    }

    #[test]
    fn grazing_line_hits_inclusive_boundary() {
        let unit = Box3::new(Vec3f::zeros(), Vec3f::repeat(1.0));
        let line = Line3::new(Vec3::new(-1.0, 1.0, 0.5), Vec3::new(1.0, 0.0, 0.0));

        assert!(line.intersects_box3(&unit));
    }
}
