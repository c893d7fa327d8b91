use tracing::debug;

use crate::{
    geometry::{primitives::box3::Box3, traits::RealNumber},
    helpers::aliases::Vec3,
    mesh::{traits::Index, triangle_mesh::TriangleMesh},
};

pub const ROOT: usize = 0;

/// Arena node. Children are either all present or all absent; the octant
/// index encodes the offset from the parent min corner as bit 2 = +x,
/// bit 1 = +y, bit 0 = +z.
#[derive(Debug)]
pub struct OctreeNode<TScalar: RealNumber, TIndex: Index> {
    bbox: Box3<TScalar>,
    children: Option<[usize; 8]>,
    indices: Vec<TIndex>,
}

impl<TScalar: RealNumber, TIndex: Index> OctreeNode<TScalar, TIndex> {
    #[inline]
    pub fn bbox(&self) -> &Box3<TScalar> {
        &self.bbox
    }

    #[inline]
    pub fn children(&self) -> Option<&[usize; 8]> {
        self.children.as_ref()
    }

    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }
}

///
/// Octree over the faces of a triangle mesh. Nodes live in an index-keyed
/// arena; the root covers the mesh bounding box and aliases the mesh index
/// buffer instead of copying it. Every other node holds the triples of its
/// parent's triangles whose bounding box overlaps the node octant, so a
/// query returns a superset of the exact face set.
///
#[derive(Debug)]
pub struct Octree<'a, TScalar: RealNumber, TIndex: Index> {
    mesh: &'a TriangleMesh<TScalar, TIndex>,
    nodes: Vec<OctreeNode<TScalar, TIndex>>,
    smallest_cell: Vec3<TScalar>,
}

impl<'a, TScalar: RealNumber, TIndex: Index> Octree<'a, TScalar, TIndex> {
    /// Builds the tree by recursive subdivision. Subdivision stops at nodes
    /// holding at most one triangle and at nodes smaller than
    /// `smallest_cell` on any axis, so construction always terminates.
    pub fn build(mesh: &'a TriangleMesh<TScalar, TIndex>, smallest_cell: Vec3<TScalar>) -> Self {
        let root = OctreeNode {
            bbox: *mesh.bbox(),
            children: None,
            indices: Vec::new(),
        };

        let mut octree = Self {
            mesh,
            nodes: vec![root],
            smallest_cell,
        };
        octree.subdivide(ROOT);

        debug!(
            nodes = octree.nodes.len(),
            faces = mesh.face_count(),
            "octree built"
        );

        octree
    }

    #[inline]
    pub fn mesh(&self) -> &'a TriangleMesh<TScalar, TIndex> {
        self.mesh
    }

    #[inline]
    pub fn nodes(&self) -> &[OctreeNode<TScalar, TIndex>] {
        &self.nodes
    }

    /// Index triples of the node. The root aliases the mesh index buffer.
    #[inline]
    pub fn node_indices(&self, node: usize) -> &[TIndex] {
        if node == ROOT {
            self.mesh.indices()
        } else {
            &self.nodes[node].indices
        }
    }

    /// Collects the index triples of all leaves overlapping `bbox`: a
    /// superset of the triangles whose bounding box meets `bbox`. Callers
    /// intersect precisely. The element width is the mesh index width.
    pub fn query_potential_faces(&self, bbox: &Box3<TScalar>) -> Vec<TIndex> {
        let mut faces = Vec::new();
        let mut stack = vec![ROOT];

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];

            if !node.bbox.intersects_box3(bbox) {
                continue;
            }

            match node.children {
                Some(children) => stack.extend(children),
                None => faces.extend_from_slice(self.node_indices(node_index)),
            }
        }

        faces
    }

    fn subdivide(&mut self, node_index: usize) {
        if self.node_indices(node_index).len() <= 3 {
            return; // At most one triangle left
        }

        let bbox = self.nodes[node_index].bbox;
        if bbox.size_x() < self.smallest_cell.x
            || bbox.size_y() < self.smallest_cell.y
            || bbox.size_z() < self.smallest_cell.z
        {
            return;
        }

        let octants = octants(&bbox);
        let mut child_indices: [Vec<TIndex>; 8] = Default::default();

        for triple in self.node_indices(node_index).chunks_exact(3) {
            let mut triangle_bbox = Box3::empty();
            for index in triple {
                triangle_bbox.union_point(self.mesh.vertex_position(index.as_()));
            }

            for (octant, octant_bbox) in octants.iter().enumerate() {
                if triangle_bbox.intersects_box3(octant_bbox) {
                    child_indices[octant].extend_from_slice(triple);
                }
            }
        }

        let first_child = self.nodes.len();
        for (octant, indices) in child_indices.into_iter().enumerate() {
            self.nodes.push(OctreeNode {
                bbox: octants[octant],
                children: None,
                indices,
            });
        }

        self.nodes[node_index].children = Some(core::array::from_fn(|i| first_child + i));

        for child in 0..8 {
            self.subdivide(first_child + child);
        }
    }
}

/// Eight equal octants of a box: bit 2 = +x, bit 1 = +y, bit 0 = +z.
/// Each axis interval is split at the center so the octants tile the box
/// exactly, without cracks from rounded offset arithmetic.
fn octants<TScalar: RealNumber>(bbox: &Box3<TScalar>) -> [Box3<TScalar>; 8] {
    let min = bbox.get_min();
    let max = bbox.get_max();
    let center = bbox.get_center();

    core::array::from_fn(|octant| {
        let upper = [octant & 4 != 0, octant & 2 != 0, octant & 1 != 0];

        let mut octant_min = *min;
        let mut octant_max = center;

        for axis in 0..3 {
            if upper[axis] {
                octant_min[axis] = center[axis];
                octant_max[axis] = max[axis];
            }
        }

        Box3::new(octant_min, octant_max)
    })
}
