use petgraph::graph::{DiGraph, NodeIndex};
use thiserror::Error;
use tracing::debug;

use crate::{
    geometry::{primitives::box3::Box3, traits::RealNumber},
    helpers::aliases::Vec3,
    mesh::{attribute::Attribute, traits::Index, triangle_mesh::TriangleMesh},
    spatial_partitioning::octree::Octree,
};

mod cells;
mod decompose;
mod field;

pub use cells::{Cell, CellLattice, CellRange, CellsIter};
pub use decompose::{DecomposeStrategy, Directions, GreedyRandom, Systematic};
pub use field::cell_attribute;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecomposeError {
    #[error("grid size components must be positive")]
    InvalidGridSize,
}

///
/// Maximal axis-aligned box of uniform acoustic attribute. `adjacent` holds
/// the indices of the partitions this one spawned, in construction order.
///
#[derive(Debug, Clone)]
pub struct MediumPartition<TScalar: RealNumber> {
    bbox: Box3<TScalar>,
    sound_speed: TScalar,
    attribute: Attribute<TScalar>,
    adjacent: Vec<usize>,
}

impl<TScalar: RealNumber> MediumPartition<TScalar> {
    pub fn new(bbox: Box3<TScalar>, attribute: Attribute<TScalar>) -> Self {
        Self {
            bbox,
            sound_speed: TScalar::one(),
            attribute,
            adjacent: Vec::new(),
        }
    }

    #[inline]
    pub fn bbox(&self) -> &Box3<TScalar> {
        &self.bbox
    }

    #[inline]
    pub fn sound_speed(&self) -> TScalar {
        self.sound_speed
    }

    #[inline]
    pub fn set_sound_speed(&mut self, sound_speed: TScalar) {
        self.sound_speed = sound_speed;
    }

    #[inline]
    pub fn attribute(&self) -> &Attribute<TScalar> {
        &self.attribute
    }

    #[inline]
    pub fn adjacent(&self) -> &[usize] {
        &self.adjacent
    }
}

///
/// Decomposed acoustic volume: a boundary box tiled by grid cells, grouped
/// into uniform partitions with a directed spawn-order adjacency graph.
///
/// ```ignore
/// let medium = Medium::build_from_mesh::<Systematic, _>(&mesh, grid_size, None)?;
/// for partition in medium.partitions() { /* feed the solver */ }
/// ```
///
#[derive(Debug)]
pub struct Medium<TScalar: RealNumber> {
    boundary: Box3<TScalar>,
    grid_size: Vec3<TScalar>,
    partitions: Vec<MediumPartition<TScalar>>,
}

impl<TScalar: RealNumber> Medium<TScalar> {
    /// Decomposes the volume around `mesh` with the given strategy. The
    /// boundary defaults to the mesh bounding box; the octree is built with
    /// `grid_size` as its smallest cell and dropped before returning.
    pub fn build_from_mesh<TStrategy, TIndex>(
        mesh: &TriangleMesh<TScalar, TIndex>,
        grid_size: Vec3<TScalar>,
        boundary: Option<Box3<TScalar>>,
    ) -> Result<Self, DecomposeError>
    where
        TStrategy: DecomposeStrategy<TScalar>,
        TIndex: Index,
    {
        if grid_size.iter().any(|size| *size <= TScalar::zero()) {
            return Err(DecomposeError::InvalidGridSize);
        }

        let boundary = boundary.unwrap_or(*mesh.bbox());
        let mut medium = Self {
            boundary,
            grid_size,
            partitions: Vec::new(),
        };

        let octree = Octree::build(mesh, grid_size);
        TStrategy::default().decompose(&mut medium, &octree)?;

        debug!(partitions = medium.partitions.len(), "medium decomposed");

        Ok(medium)
    }

    #[inline]
    pub fn boundary(&self) -> &Box3<TScalar> {
        &self.boundary
    }

    #[inline]
    pub fn grid_size(&self) -> &Vec3<TScalar> {
        &self.grid_size
    }

    #[inline]
    pub fn partitions(&self) -> &[MediumPartition<TScalar>] {
        &self.partitions
    }

    /// Appends a partition and links it to its parent. Returns the new
    /// partition index. Strategies call this once per committed region.
    pub fn push_partition(
        &mut self,
        partition: MediumPartition<TScalar>,
        parent: Option<usize>,
    ) -> usize {
        let index = self.partitions.len();
        self.partitions.push(partition);

        if let Some(parent) = parent {
            self.partitions[parent].adjacent.push(index);
        }

        index
    }

    /// Directed parent → child adjacency as a graph; node weights are
    /// partition indices. The symmetric closure is left to callers.
    pub fn adjacency_graph(&self) -> DiGraph<usize, ()> {
        let mut graph = DiGraph::with_capacity(self.partitions.len(), self.partitions.len());

        for index in 0..self.partitions.len() {
            graph.add_node(index);
        }

        for (parent, partition) in self.partitions.iter().enumerate() {
            for &child in &partition.adjacent {
                graph.add_edge(NodeIndex::new(parent), NodeIndex::new(child), ());
            }
        }

        graph
    }
}

#[cfg(test)]
mod tests {
    use super::{DecomposeError, Medium, Systematic};
    use crate::{
        geometry::primitives::box3::Box3,
        helpers::aliases::{Vec3, Vec3d},
        mesh::{attribute::Attribute, triangle_mesh::TriangleMesh},
    };
    use petgraph::algo::connected_components;

    fn cube_mesh() -> TriangleMesh<f64, u32> {
        let vertices = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ];
        let indices = vec![
            0, 2, 1, 0, 3, 2, 4, 5, 6, 4, 6, 7, 0, 1, 5, 0, 5, 4, 2, 3, 7, 2, 7, 6, 0, 4, 7, 0,
            7, 3, 1, 2, 6, 1, 6, 5,
        ];

        TriangleMesh::with_uniform_attribute(vertices, indices, Attribute::solid()).unwrap()
    }

    #[test]
    fn non_positive_grid_size_is_rejected() {
        let mesh = cube_mesh();

        let zero = Medium::build_from_mesh::<Systematic, _>(&mesh, Vec3d::zeros(), None);
        assert_eq!(Some(DecomposeError::InvalidGridSize), zero.err());

        let negative =
            Medium::build_from_mesh::<Systematic, _>(&mesh, Vec3::new(0.5, -0.5, 0.5), None);
        assert!(negative.is_err());
    }

    #[test]
    fn boundary_defaults_to_mesh_bbox() {
        let mesh = cube_mesh();
        let medium =
            Medium::build_from_mesh::<Systematic, _>(&mesh, Vec3d::repeat(0.5), None).unwrap();

        assert_eq!(mesh.bbox(), medium.boundary());
    }

    #[test]
    fn explicit_boundary_is_kept() {
        let mesh = cube_mesh();
        let boundary = Box3::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let medium =
            Medium::build_from_mesh::<Systematic, _>(&mesh, Vec3d::repeat(0.5), Some(boundary))
                .unwrap();

        assert_eq!(&boundary, medium.boundary());

        for partition in medium.partitions() {
            assert!(boundary.contains_box(partition.bbox()));
        }
    }

    #[test]
    fn adjacency_graph_is_connected_through_spawn_edges() {
        let mesh = cube_mesh();
        let boundary = Box3::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        let medium =
            Medium::build_from_mesh::<Systematic, _>(&mesh, Vec3d::repeat(0.5), Some(boundary))
                .unwrap();

        // Air column, solid block, air column
        assert_eq!(3, medium.partitions().len());

        let graph = medium.adjacency_graph();
        assert_eq!(medium.partitions().len(), graph.node_count());
        assert_eq!(1, connected_components(&graph));
    }
}
