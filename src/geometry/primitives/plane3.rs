use num_traits::Float;

use crate::{geometry::traits::RealNumber, helpers::aliases::Vec3};

use super::box3::Box3;

/// n * x - d = 0
pub struct Plane3<TScalar: RealNumber> {
    normal: Vec3<TScalar>,
    distance: TScalar,
}

impl<TScalar: RealNumber> Plane3<TScalar> {
    pub fn new(normal: Vec3<TScalar>, d: TScalar) -> Self {
        Self { normal, distance: d }
    }

    /// Given three noncollinear points (ordered ccw), compute plane equation
    pub fn from_points(a: &Vec3<TScalar>, b: &Vec3<TScalar>, c: &Vec3<TScalar>) -> Self {
        let normal = (b - a).cross(&(c - a)).normalize();
        let d = normal.dot(a);

        Self { normal, distance: d }
    }

    #[inline]
    pub fn get_normal(&self) -> &Vec3<TScalar> {
        &self.normal
    }

    #[inline]
    pub fn get_distance(&self) -> TScalar {
        self.distance
    }

    pub fn intersects_box3(&self, aabb: &Box3<TScalar>) -> bool {
        // These two lines not necessary with a (center, extents) AABB representation
        let c = aabb.get_center();
        let e = aabb.get_max() - c;
        // Compute the projection interval radius of b onto L(t) = b.c + t * p.n
        let r = e[0] * Float::abs(self.normal[0])
            + e[1] * Float::abs(self.normal[1])
            + e[2] * Float::abs(self.normal[2]);
        // Compute distance of box center from plane
        let s = self.normal.dot(&c) - self.distance;
        // Intersection occurs when distance s falls within [-r,+r] interval
        Float::abs(s) <= r
    }
}

#[cfg(test)]
mod tests {
    use super::Plane3;
    use crate::{geometry::primitives::box3::Box3, helpers::aliases::{Vec3, Vec3f}};

    #[test]
    fn plane_box_intersection() {
        let unit = Box3::new(Vec3f::zeros(), Vec3f::repeat(1.0));

        let through = Plane3::new(Vec3::new(0.0, 0.0, 1.0), 0.5);
        assert!(through.intersects_box3(&unit));

        let above = Plane3::new(Vec3::new(0.0, 0.0, 1.0), 1.5);
        assert!(!above.intersects_box3(&unit));

        // Coplanar with the top face
        let grazing = Plane3::new(Vec3::new(0.0, 0.0, 1.0), 1.0);
        assert!(grazing.intersects_box3(&unit));
    }
}
