use num_traits::Float;

use crate::{geometry::traits::RealNumber, helpers::aliases::Vec3};

use super::{box3::Box3, line3::Line3};

/// 3D line segment
#[derive(PartialEq, Debug)]
pub struct LineSegment3<TScalar: RealNumber> {
    line: Line3<TScalar>,
    length: TScalar,
}

impl<TScalar: RealNumber> LineSegment3<TScalar> {
    pub fn new(start: &Vec3<TScalar>, end: &Vec3<TScalar>) -> Self {
        Self {
            line: Line3::from_points(start, end),
            length: (end - start).norm(),
        }
    }

    #[inline]
    pub fn get_start(&self) -> &Vec3<TScalar> {
        self.line.get_point()
    }

    #[inline]
    pub fn get_end(&self) -> Vec3<TScalar> {
        self.line.point_at(self.length)
    }

    #[inline]
    pub fn get_line(&self) -> &Line3<TScalar> {
        &self.line
    }

    /// Intersection interval with an axis-aligned box, clamped to the
    /// segment. Parameters are distances from the segment start.
    #[inline]
    pub fn intersects_box3_at(&self, aabb: &Box3<TScalar>) -> Option<(TScalar, TScalar)> {
        let (t_enter, t_exit) = self.line.intersects_box3_at(aabb)?;

        if t_exit < TScalar::zero() || t_enter > self.length {
            return None;
        }

        Some((
            Float::max(t_enter, TScalar::zero()),
            Float::min(t_exit, self.length),
        ))
    }

    #[inline]
    pub fn intersects_box3(&self, aabb: &Box3<TScalar>) -> bool {
        self.intersects_box3_at(aabb).is_some()
    }

    #[inline]
    pub fn is_on_segment(&self, t: TScalar) -> bool {
        t >= TScalar::zero() && t <= self.length
    }
}
