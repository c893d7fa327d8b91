use nalgebra_glm::{max2, min2};
use smallvec::{smallvec, SmallVec};

use crate::{geometry::traits::RealNumber, helpers::aliases::Vec3};

use super::{box3::Box3, plane3::Plane3};

pub type BarycentricCoordinates<TScalar> = Vec3<TScalar>;

/// 3D triangle
pub struct Triangle3<TScalar: RealNumber> {
    a: Vec3<TScalar>,
    b: Vec3<TScalar>,
    c: Vec3<TScalar>,
}

impl<TScalar: RealNumber> Triangle3<TScalar> {
    pub fn new(a: Vec3<TScalar>, b: Vec3<TScalar>, c: Vec3<TScalar>) -> Self {
        Self { a, b, c }
    }

    #[inline]
    pub fn p1(&self) -> &Vec3<TScalar> {
        &self.a
    }

    #[inline]
    pub fn p2(&self) -> &Vec3<TScalar> {
        &self.b
    }

    #[inline]
    pub fn p3(&self) -> &Vec3<TScalar> {
        &self.c
    }

    #[inline]
    pub fn is_degenerate(a: &Vec3<TScalar>, b: &Vec3<TScalar>, c: &Vec3<TScalar>) -> bool {
        let cross = (b - a).cross(&(c - a));
        cross.norm_squared().is_zero()
    }

    #[inline]
    pub fn point_at(&self, barycoords: &BarycentricCoordinates<TScalar>) -> Vec3<TScalar> {
        Vec3::new(
            barycoords.x * self.a.x + barycoords.y * self.b.x + barycoords.z * self.c.x,
            barycoords.x * self.a.y + barycoords.y * self.b.y + barycoords.z * self.c.y,
            barycoords.x * self.a.z + barycoords.y * self.b.z + barycoords.z * self.c.z,
        )
    }

    #[inline]
    pub fn plane(&self) -> Plane3<TScalar> {
        Plane3::from_points(&self.a, &self.b, &self.c)
    }

    #[inline]
    pub fn bbox(&self) -> Box3<TScalar> {
        Box3::new(
            min2(&self.c, &min2(&self.a, &self.b)),
            max2(&self.c, &max2(&self.a, &self.b)),
        )
    }

    /// Test triangle - bbox intersection. Separating axis theorem over 13
    /// axes: the three box normals (folded into the bbox pretest), the nine
    /// cross products of box and triangle edges, and the triangle normal.
    /// Boundaries are inclusive; degenerate triangles never intersect.
    pub fn intersects_box3(&self, aabb: &Box3<TScalar>) -> bool {
        if Self::is_degenerate(&self.a, &self.b, &self.c) {
            return false;
        }

        // Box normal axes
        if !aabb.intersects_box3(&self.bbox()) {
            return false;
        }

        let center = aabb.get_center();
        let extents = aabb.get_max() - center;

        let v0 = self.a - center;
        let v1 = self.b - center;
        let v2 = self.c - center;

        // Cross products of box edges and triangle edges
        let edges = [v1 - v0, v2 - v1, v0 - v2];

        for edge in &edges {
            for axis in 0..3 {
                let mut basis = Vec3::zeros();
                basis[axis] = TScalar::one();

                if internal::axis_separates(&basis.cross(edge), &extents, &v0, &v1, &v2) {
                    return false;
                }
            }
        }

        // Triangle normal axis
        self.plane().intersects_box3(aabb)
    }

    /// Clips the triangle to an axis-aligned box, yielding the intersection
    /// polygon (up to 6 vertices). Empty result means no overlap.
    pub fn clip_box3(&self, aabb: &Box3<TScalar>) -> SmallVec<[Vec3<TScalar>; 6]> {
        let mut polygon: SmallVec<[Vec3<TScalar>; 6]> = smallvec![self.a, self.b, self.c];

        for axis in 0..3 {
            let min = aabb.get_min()[axis];
            let max = aabb.get_max()[axis];

            internal::clip_polygon(&mut polygon, |p| p[axis] - min);
            internal::clip_polygon(&mut polygon, |p| max - p[axis]);
        }

        polygon
    }
}

pub(super) mod internal {
    use num_traits::Float;
    use smallvec::SmallVec;

    use crate::{geometry::traits::RealNumber, helpers::aliases::Vec3};

    /// Projects the triangle (given relative to the box center) and the box
    /// half-extents onto `axis` and reports disjoint projection intervals.
    pub fn axis_separates<TScalar: RealNumber>(
        axis: &Vec3<TScalar>,
        extents: &Vec3<TScalar>,
        v0: &Vec3<TScalar>,
        v1: &Vec3<TScalar>,
        v2: &Vec3<TScalar>,
    ) -> bool {
        let p0 = v0.dot(axis);
        let p1 = v1.dot(axis);
        let p2 = v2.dot(axis);

        let radius = extents.x * Float::abs(axis.x)
            + extents.y * Float::abs(axis.y)
            + extents.z * Float::abs(axis.z);

        Float::min(p0, Float::min(p1, p2)) > radius
            || Float::max(p0, Float::max(p1, p2)) < -radius
    }

    /// One Sutherland-Hodgman pass: keeps the polygon part with
    /// `distance(p) >= 0`, inserting edge intersections at sign changes.
    pub fn clip_polygon<TScalar, TDistance>(
        polygon: &mut SmallVec<[Vec3<TScalar>; 6]>,
        distance: TDistance,
    ) where
        TScalar: RealNumber,
        TDistance: Fn(&Vec3<TScalar>) -> TScalar,
    {
        if polygon.is_empty() {
            return;
        }

        let mut clipped = SmallVec::new();

        for i in 0..polygon.len() {
            let current = polygon[i];
            let next = polygon[(i + 1) % polygon.len()];

            let d_current = distance(&current);
            let d_next = distance(&next);

            if d_current >= TScalar::zero() {
                clipped.push(current);
            }

            if d_current * d_next < TScalar::zero() {
                let t = d_current / (d_current - d_next);
                clipped.push(current + (next - current).scale(t));
            }
        }

        *polygon = clipped;
    }
}
