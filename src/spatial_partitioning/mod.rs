pub mod octree;

pub use octree::{Octree, OctreeNode};
