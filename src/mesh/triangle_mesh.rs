use thiserror::Error;

use crate::{
    geometry::{
        primitives::{box3::Box3, triangle3::{BarycentricCoordinates, Triangle3}},
        traits::RealNumber,
    },
    helpers::aliases::Vec3,
};

use super::{attribute::Attribute, traits::Index};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotMultipleOfThree(usize),
    #[error("vertex index {index} not found, mesh has {vertex_count} vertices")]
    VertexIndexNotFound { index: usize, vertex_count: usize },
    #[error("attribute count {attributes} does not match vertex count {vertices}")]
    AttributeCountMismatch { attributes: usize, vertices: usize },
}

/// Indexed triangle mesh with a per-vertex acoustic attribute buffer.
///
/// Vertex and index element widths are type parameters; the attribute
/// buffer is parallel to the vertex buffer. The bounding box is computed
/// once at construction.
#[derive(Debug, PartialEq)]
pub struct TriangleMesh<TScalar: RealNumber, TIndex: Index> {
    vertices: Vec<Vec3<TScalar>>,
    indices: Vec<TIndex>,
    attributes: Vec<Attribute<TScalar>>,
    bbox: Box3<TScalar>,
}

impl<TScalar: RealNumber, TIndex: Index> TriangleMesh<TScalar, TIndex> {
    /// Takes ownership of the caller's buffers.
    pub fn from_buffers(
        vertices: Vec<Vec3<TScalar>>,
        indices: Vec<TIndex>,
        attributes: Vec<Attribute<TScalar>>,
    ) -> Result<Self, MeshError> {
        if indices.len() % 3 != 0 {
            return Err(MeshError::IndexCountNotMultipleOfThree(indices.len()));
        }

        if attributes.len() != vertices.len() {
            return Err(MeshError::AttributeCountMismatch {
                attributes: attributes.len(),
                vertices: vertices.len(),
            });
        }

        for index in &indices {
            let index: usize = index.as_();
            if index >= vertices.len() {
                return Err(MeshError::VertexIndexNotFound {
                    index,
                    vertex_count: vertices.len(),
                });
            }
        }

        let mut bbox = Box3::empty();
        for vertex in &vertices {
            bbox.union_point(vertex);
        }

        Ok(Self {
            vertices,
            indices,
            attributes,
            bbox,
        })
    }

    /// Copies the caller's buffers; the caller keeps ownership of its data.
    #[inline]
    pub fn from_slices(
        vertices: &[Vec3<TScalar>],
        indices: &[TIndex],
        attributes: &[Attribute<TScalar>],
    ) -> Result<Self, MeshError> {
        Self::from_buffers(vertices.to_vec(), indices.to_vec(), attributes.to_vec())
    }

    /// Builds a mesh whose vertices all carry the same attribute.
    pub fn with_uniform_attribute(
        vertices: Vec<Vec3<TScalar>>,
        indices: Vec<TIndex>,
        attribute: Attribute<TScalar>,
    ) -> Result<Self, MeshError> {
        let attributes = vec![attribute; vertices.len()];
        Self::from_buffers(vertices, indices, attributes)
    }

    /// Replaces the attribute buffer; the length must match the vertex count.
    pub fn set_attributes(&mut self, attributes: Vec<Attribute<TScalar>>) -> Result<(), MeshError> {
        if attributes.len() != self.vertices.len() {
            return Err(MeshError::AttributeCountMismatch {
                attributes: attributes.len(),
                vertices: self.vertices.len(),
            });
        }

        self.attributes = attributes;
        Ok(())
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3<TScalar>] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[TIndex] {
        &self.indices
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute<TScalar>] {
        &self.attributes
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn vertex_position(&self, vertex: usize) -> &Vec3<TScalar> {
        &self.vertices[vertex]
    }

    #[inline]
    pub fn vertex_attribute(&self, vertex: usize) -> &Attribute<TScalar> {
        &self.attributes[vertex]
    }

    #[inline]
    pub fn face_vertices(&self, face: usize) -> [usize; 3] {
        [
            self.indices[face * 3].as_(),
            self.indices[face * 3 + 1].as_(),
            self.indices[face * 3 + 2].as_(),
        ]
    }

    #[inline]
    pub fn face_positions(&self, face: usize) -> Triangle3<TScalar> {
        let [v1, v2, v3] = self.face_vertices(face);
        Triangle3::new(self.vertices[v1], self.vertices[v2], self.vertices[v3])
    }

    /// Barycentric interpolation of the three vertex attributes of a face.
    pub fn face_attribute_at(
        &self,
        face: usize,
        barycoords: &BarycentricCoordinates<TScalar>,
    ) -> Attribute<TScalar> {
        let [v1, v2, v3] = self.face_vertices(face);
        let (a1, a2, a3) = (self.attributes[v1], self.attributes[v2], self.attributes[v3]);

        Attribute::new(
            barycoords.x * a1.reflection + barycoords.y * a2.reflection + barycoords.z * a3.reflection,
            barycoords.x * a1.transmission + barycoords.y * a2.transmission + barycoords.z * a3.transmission,
            barycoords.x * a1.absorption + barycoords.y * a2.absorption + barycoords.z * a3.absorption,
        )
        .normalized()
    }

    #[inline]
    pub fn faces(&self) -> impl Iterator<Item = usize> {
        0..self.face_count()
    }

    #[inline]
    pub fn triangles(&self) -> impl Iterator<Item = Triangle3<TScalar>> + '_ {
        self.faces().map(|face| self.face_positions(face))
    }

    /// Componentwise min/max over all vertex positions. Empty meshes report
    /// the [empty](Box3::empty) box.
    #[inline]
    pub fn bbox(&self) -> &Box3<TScalar> {
        &self.bbox
    }
}
