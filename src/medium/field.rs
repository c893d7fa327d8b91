use std::collections::HashSet;

use crate::{
    geometry::{
        primitives::{box3::Box3, triangle3::Triangle3},
        traits::RealNumber,
    },
    mesh::{attribute::Attribute, traits::Index},
    spatial_partitioning::octree::Octree,
};

/// Interpolated acoustic attribute of an axis-aligned cell.
///
/// Shepard (inverse-distance, p = 2) weighting over the vertices of the
/// triangles that actually intersect the cell. A vertex coinciding with the
/// cell center short-circuits to that vertex's attribute, verbatim. A cell
/// no face reaches evaluates to air, which keeps holes in the mesh
/// navigable for the decomposer.
pub fn cell_attribute<TScalar: RealNumber, TIndex: Index>(
    octree: &Octree<'_, TScalar, TIndex>,
    cell: &Box3<TScalar>,
) -> Attribute<TScalar> {
    let center = cell.get_center();
    let mesh = octree.mesh();

    // The octree may report a triangle once per overlapped leaf
    let mut visited: HashSet<[usize; 3]> = HashSet::new();

    let mut accumulated = Attribute::new(TScalar::zero(), TScalar::zero(), TScalar::zero());
    let mut weight_sum = TScalar::zero();

    for triple in octree.query_potential_faces(cell).chunks_exact(3) {
        let vertices: [usize; 3] = [triple[0].as_(), triple[1].as_(), triple[2].as_()];
        if !visited.insert(vertices) {
            continue;
        }

        let triangle = Triangle3::new(
            *mesh.vertex_position(vertices[0]),
            *mesh.vertex_position(vertices[1]),
            *mesh.vertex_position(vertices[2]),
        );

        if !triangle.intersects_box3(cell) {
            continue;
        }

        for vertex in vertices {
            let distance_squared = (mesh.vertex_position(vertex) - center).norm_squared();

            if distance_squared.is_zero() {
                return *mesh.vertex_attribute(vertex);
            }

            let weight = TScalar::one() / distance_squared;
            let attribute = mesh.vertex_attribute(vertex);

            accumulated.reflection += attribute.reflection * weight;
            accumulated.transmission += attribute.transmission * weight;
            accumulated.absorption += attribute.absorption * weight;
            weight_sum += weight;
        }
    }

    if weight_sum.is_zero() {
        return Attribute::air();
    }

    Attribute::new(
        accumulated.reflection / weight_sum,
        accumulated.transmission / weight_sum,
        accumulated.absorption / weight_sum,
    )
    .normalized()
}
