use std::{
    collections::HashMap,
    fs::OpenOptions,
    io::{self, BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use num_traits::cast;
use tracing::warn;

use crate::{
    algo::float_hash::hash_vec3,
    geometry::{primitives::box3::Box3, traits::RealNumber},
    helpers::aliases::Vec3,
    medium::Medium,
    mesh::{attribute::Attribute, traits::Index, triangle_mesh::TriangleMesh},
    spatial_partitioning::octree::Octree,
};

use super::ReadError;

// OBJ format spec:
// https://www.martinreddy.net/gfx/3d/OBJ.spec

///
/// Wavefront OBJ reader for `v`/`f` records. Faces with more than three
/// vertices are fan-triangulated; known-but-unsupported record kinds are
/// skipped; unknown record kinds are recoverable and reported with their
/// line number via [unknown_statements](ObjReader::unknown_statements).
/// OBJ carries no acoustic data, so ingested vertices get the solid
/// attribute.
///
#[derive(Debug, Default)]
pub struct ObjReader {
    unknown_statements: Vec<(usize, String)>,
}

impl ObjReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record kinds of the last read the parser did not recognize, with
    /// their one-based line numbers.
    #[inline]
    pub fn unknown_statements(&self) -> &[(usize, String)] {
        &self.unknown_statements
    }

    /// Reads mesh from file
    pub fn read_from_file<TScalar, TIndex>(
        &mut self,
        filepath: &Path,
    ) -> Result<TriangleMesh<TScalar, TIndex>, ReadError>
    where
        TScalar: RealNumber,
        TIndex: Index,
    {
        let file = OpenOptions::new().read(true).open(filepath)?;
        let mut reader = BufReader::new(file);

        self.read_from_buffer(&mut reader)
    }

    /// Reads mesh from buffer
    pub fn read_from_buffer<TBuffer, TScalar, TIndex>(
        &mut self,
        reader: &mut BufReader<TBuffer>,
    ) -> Result<TriangleMesh<TScalar, TIndex>, ReadError>
    where
        TBuffer: Read,
        TScalar: RealNumber,
        TIndex: Index,
    {
        self.unknown_statements.clear();

        let mut vertices: Vec<Vec3<TScalar>> = Vec::new();
        let mut indices: Vec<TIndex> = Vec::new();
        let mut line = String::new();
        let mut line_number = 0;

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break; // EOF
            }
            line_number += 1;

            let statement = parse_stmt(&line).map_err(|message| ReadError::Parse {
                line: line_number,
                message,
            })?;

            match statement {
                Statement::Vertex(x, y, z) => vertices.push(Vec3::new(
                    cast(x).unwrap(),
                    cast(y).unwrap(),
                    cast(z).unwrap(),
                )),
                Statement::Face(face) => {
                    // Fan triangulation; OBJ indices are one-based
                    for i in 1..face.len() - 1 {
                        for vertex in [face[0], face[i], face[i + 1]] {
                            let index =
                                TIndex::from_u64(vertex - 1).ok_or_else(|| ReadError::Parse {
                                    line: line_number,
                                    message: format!(
                                        "vertex index {} does not fit the index type",
                                        vertex
                                    ),
                                })?;
                            indices.push(index);
                        }
                    }
                }
                Statement::Ignored => {}
                Statement::Unknown(token) => {
                    warn!(
                        line = line_number,
                        token = token.as_str(),
                        "unknown statement skipped"
                    );
                    self.unknown_statements.push((line_number, token));
                }
            }
        }

        Ok(TriangleMesh::with_uniform_attribute(
            vertices,
            indices,
            Attribute::solid(),
        )?)
    }
}

#[derive(Debug)]
enum Statement {
    Vertex(f64, f64, f64),
    Face(Vec<u64>),
    Ignored,
    Unknown(String),
}

fn parse_stmt(line: &str) -> Result<Statement, String> {
    let mut tokens = line.split_whitespace();

    match tokens.next() {
        None => Ok(Statement::Ignored),
        Some("v") => parse_vertex(tokens),
        Some("f") => parse_face(tokens),
        Some(kind) if is_ignored_kind(kind) => Ok(Statement::Ignored),
        Some(token) => Ok(Statement::Unknown(token.to_string())),
    }
}

fn is_ignored_kind(kind: &str) -> bool {
    matches!(
        kind,
        "vt" | "vn" | "vp" | "l" | "p" | "g" | "o" | "s" | "usemtl" | "mtllib"
    ) || kind.starts_with('#')
}

fn parse_vertex<'a, TTokens>(mut tokens: TTokens) -> Result<Statement, String>
where
    TTokens: Iterator<Item = &'a str>,
{
    let mut coordinates = [0.0f64; 3];

    for coordinate in coordinates.iter_mut() {
        let token = tokens
            .next()
            .ok_or_else(|| "vertex statement needs three coordinates".to_string())?;
        *coordinate = token
            .parse()
            .map_err(|_| format!("malformed coordinate '{}'", token))?;
    }

    // A trailing w component is legal and ignored
    Ok(Statement::Vertex(
        coordinates[0],
        coordinates[1],
        coordinates[2],
    ))
}

fn parse_face<'a, TTokens>(tokens: TTokens) -> Result<Statement, String>
where
    TTokens: Iterator<Item = &'a str>,
{
    let mut face = Vec::new();

    for token in tokens {
        // Only the vertex index of "v/vt/vn" references is used
        let vertex_token = token.split('/').next().unwrap_or(token);
        let vertex: u64 = vertex_token
            .parse()
            .map_err(|_| format!("malformed vertex index '{}'", token))?;

        if vertex == 0 {
            return Err("vertex indices are one-based".to_string());
        }

        face.push(vertex);
    }

    if face.len() < 3 {
        // Two-index records are edges from wireframe exports; skip them
        return Ok(Statement::Ignored);
    }

    Ok(Statement::Face(face))
}

///
/// Wavefront OBJ writer. Meshes are written as `v`/`f` records; octrees and
/// mediums as box wireframes with one `v` record per unique box corner and
/// one two-index `f` record per box edge. Indices are one-based.
///
#[derive(Debug, Default)]
pub struct ObjWriter;

impl ObjWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_to_file<TScalar, TIndex>(
        &self,
        mesh: &TriangleMesh<TScalar, TIndex>,
        path: &Path,
    ) -> io::Result<()>
    where
        TScalar: RealNumber,
        TIndex: Index,
    {
        let mut writer = Self::file_writer(path)?;
        self.write_to_buffer(mesh, &mut writer)
    }

    pub fn write_to_buffer<TBuffer, TScalar, TIndex>(
        &self,
        mesh: &TriangleMesh<TScalar, TIndex>,
        writer: &mut BufWriter<TBuffer>,
    ) -> io::Result<()>
    where
        TBuffer: Write,
        TScalar: RealNumber,
        TIndex: Index,
    {
        for vertex in mesh.vertices() {
            writeln!(writer, "v {} {} {}", vertex.x, vertex.y, vertex.z)?;
        }

        for face in mesh.faces() {
            let [v1, v2, v3] = mesh.face_vertices(face);
            writeln!(writer, "f {} {} {}", v1 + 1, v2 + 1, v3 + 1)?;
        }

        Ok(())
    }

    pub fn write_octree_to_file<TScalar, TIndex>(
        &self,
        octree: &Octree<'_, TScalar, TIndex>,
        path: &Path,
    ) -> io::Result<()>
    where
        TScalar: RealNumber,
        TIndex: Index,
    {
        let mut writer = Self::file_writer(path)?;
        self.write_octree_to_buffer(octree, &mut writer)
    }

    /// Wireframe of the root node and all of its descendants.
    pub fn write_octree_to_buffer<TBuffer, TScalar, TIndex>(
        &self,
        octree: &Octree<'_, TScalar, TIndex>,
        writer: &mut BufWriter<TBuffer>,
    ) -> io::Result<()>
    where
        TBuffer: Write,
        TScalar: RealNumber,
        TIndex: Index,
    {
        self.write_wireframe(octree.nodes().iter().map(|node| *node.bbox()), writer)
    }

    pub fn write_medium_to_file<TScalar: RealNumber>(
        &self,
        medium: &Medium<TScalar>,
        path: &Path,
    ) -> io::Result<()> {
        let mut writer = Self::file_writer(path)?;
        self.write_medium_to_buffer(medium, &mut writer)
    }

    /// Wireframe of all partition boxes.
    pub fn write_medium_to_buffer<TBuffer, TScalar>(
        &self,
        medium: &Medium<TScalar>,
        writer: &mut BufWriter<TBuffer>,
    ) -> io::Result<()>
    where
        TBuffer: Write,
        TScalar: RealNumber,
    {
        self.write_wireframe(
            medium.partitions().iter().map(|partition| *partition.bbox()),
            writer,
        )
    }

    fn file_writer(path: &Path) -> io::Result<BufWriter<std::fs::File>> {
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .create(true)
            .open(path)?;

        Ok(BufWriter::new(file))
    }

    fn write_wireframe<TScalar, TBuffer>(
        &self,
        boxes: impl Iterator<Item = Box3<TScalar>>,
        writer: &mut BufWriter<TBuffer>,
    ) -> io::Result<()>
    where
        TScalar: RealNumber,
        TBuffer: Write,
    {
        // Pairs of corner ids (see Box3::vertex) forming the 12 box edges
        const EDGES: [(usize, usize); 12] = [
            (0, 1), (2, 3), (4, 5), (6, 7), // x-aligned
            (0, 2), (1, 3), (4, 6), (5, 7), // y-aligned
            (0, 4), (1, 5), (2, 6), (3, 7), // z-aligned
        ];

        let mut corners: Vec<Vec3<TScalar>> = Vec::new();
        let mut buckets: HashMap<i32, Vec<usize>> = HashMap::new();
        let mut edges: Vec<(usize, usize)> = Vec::new();

        for bbox in boxes {
            let mut corner_ids = [0usize; 8];

            for (i, corner_id) in corner_ids.iter_mut().enumerate() {
                let corner = bbox.vertex(i as u8);
                let bucket = buckets.entry(hash_vec3(&corner)).or_default();

                *corner_id = match bucket.iter().find(|&&id| corners[id] == corner) {
                    Some(&id) => id,
                    None => {
                        corners.push(corner);
                        bucket.push(corners.len() - 1);
                        corners.len() - 1
                    }
                };
            }

            for (start, end) in EDGES {
                edges.push((corner_ids[start], corner_ids[end]));
            }
        }

        for corner in &corners {
            writeln!(writer, "v {} {} {}", corner.x, corner.y, corner.z)?;
        }

        for (start, end) in edges {
            writeln!(writer, "f {} {}", start + 1, end + 1)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{ObjReader, ObjWriter};
    use crate::{
        geometry::primitives::box3::Box3,
        helpers::aliases::{Vec3, Vec3d},
        io::ReadError,
        medium::{Medium, Systematic},
        mesh::{attribute::Attribute, triangle_mesh::{MeshError, TriangleMesh}},
        spatial_partitioning::octree::Octree,
    };
    use std::io::{BufReader, BufWriter};

    fn read(content: &str) -> Result<TriangleMesh<f64, u32>, ReadError> {
        ObjReader::new().read_from_buffer(&mut BufReader::new(content.as_bytes()))
    }

    #[test]
    fn reads_vertices_and_faces() {
        let mesh = read("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();

        assert_eq!(3, mesh.vertex_count());
        assert_eq!(1, mesh.face_count());
        assert_eq!(&Vec3::new(1.0, 0.0, 0.0), mesh.vertex_position(1));
        assert_eq!([0, 1, 2], mesh.face_vertices(0));
        assert_eq!(&Attribute::solid(), mesh.vertex_attribute(0));
    }

    #[test]
    fn polygons_are_fan_triangulated() {
        let mesh = read("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n").unwrap();

        assert_eq!(2, mesh.face_count());
        assert_eq!([0, 1, 2], mesh.face_vertices(0));
        assert_eq!([0, 2, 3], mesh.face_vertices(1));
    }

    #[test]
    fn face_references_with_slashes_use_vertex_index() {
        let mesh = read("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1/4/7 2/5/8 3/6/9\n").unwrap();

        assert_eq!([0, 1, 2], mesh.face_vertices(0));
    }

    #[test]
    fn unsupported_record_kinds_are_skipped() {
        let mut reader = ObjReader::new();
        let content = "# comment\nvn 0 0 1\nv 0 0 0\nv 1 0 0\nv 0 1 0\ns off\nf 1 2 3\n";
        let mesh: TriangleMesh<f64, u32> = reader
            .read_from_buffer(&mut BufReader::new(content.as_bytes()))
            .unwrap();

        assert_eq!(1, mesh.face_count());
        assert!(reader.unknown_statements().is_empty());
    }

    #[test]
    fn unknown_statements_are_recoverable_and_reported() {
        let mut reader = ObjReader::new();
        let content = "v 0 0 0\nv 1 0 0\nv 0 1 0\ncurv 0.5 1.0\nf 1 2 3\n";
        let mesh: TriangleMesh<f64, u32> = reader
            .read_from_buffer(&mut BufReader::new(content.as_bytes()))
            .unwrap();

        assert_eq!(1, mesh.face_count());
        assert_eq!(&[(4, "curv".to_string())], reader.unknown_statements());
    }

    #[test]
    fn malformed_coordinates_are_fatal() {
        let error = read("v 0 0 0\nv 1 abc 0\n").unwrap_err();

        match error {
            ReadError::Parse { line, .. } => assert_eq!(2, line),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn face_index_out_of_range_is_reported() {
        let error = read("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 99\n").unwrap_err();

        match error {
            ReadError::Mesh(MeshError::VertexIndexNotFound { index, vertex_count }) => {
                assert_eq!(98, index);
                assert_eq!(3, vertex_count);
            }
            other => panic!("expected mesh error, got {:?}", other),
        }
    }

    #[test]
    fn mesh_write_read_round_trip() {
        let mesh = TriangleMesh::<f64, u32>::with_uniform_attribute(
            vec![
                Vec3::new(0.125, -0.25, 3.5),
                Vec3::new(1.0, 0.0, 0.1),
                Vec3::new(0.0, 1.0, -2.75),
            ],
            vec![0, 1, 2],
            Attribute::solid(),
        )
        .unwrap();

        let mut buffer = BufWriter::new(Vec::new());
        ObjWriter::new().write_to_buffer(&mesh, &mut buffer).unwrap();
        let written = String::from_utf8(buffer.into_inner().unwrap()).unwrap();

        let read_back: TriangleMesh<f64, u32> = ObjReader::new()
            .read_from_buffer(&mut BufReader::new(written.as_bytes()))
            .unwrap();

        assert_eq!(mesh.vertex_count(), read_back.vertex_count());
        assert_eq!(mesh.indices(), read_back.indices());
        for vertex in 0..mesh.vertex_count() {
            assert_eq!(mesh.vertex_position(vertex), read_back.vertex_position(vertex));
        }
    }

    fn record_counts(content: &str) -> (usize, usize) {
        let vertices = content.lines().filter(|l| l.starts_with("v ")).count();
        let faces = content.lines().filter(|l| l.starts_with("f ")).count();

        (vertices, faces)
    }

    #[test]
    fn single_node_octree_exports_one_wireframe_box() {
        let mesh = TriangleMesh::<f64, u32>::with_uniform_attribute(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
            vec![0, 1, 2],
            Attribute::solid(),
        )
        .unwrap();
        let octree = Octree::build(&mesh, Vec3d::repeat(0.1));
        assert_eq!(1, octree.nodes().len());

        let mut buffer = BufWriter::new(Vec::new());
        ObjWriter::new()
            .write_octree_to_buffer(&octree, &mut buffer)
            .unwrap();
        let written = String::from_utf8(buffer.into_inner().unwrap()).unwrap();

        assert_eq!((8, 12), record_counts(&written));
    }

    #[test]
    fn subdivided_octree_export_dedups_shared_corners() {
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
        let mesh =
            TriangleMesh::<f64, u32>::with_uniform_attribute(vertices, indices, Attribute::solid())
                .unwrap();

        // One subdivision: root + 8 octants whose corners form a 3x3x3 lattice
        let octree = Octree::build(&mesh, Vec3d::repeat(0.6));
        assert_eq!(9, octree.nodes().len());

        let mut buffer = BufWriter::new(Vec::new());
        ObjWriter::new()
            .write_octree_to_buffer(&octree, &mut buffer)
            .unwrap();
        let written = String::from_utf8(buffer.into_inner().unwrap()).unwrap();

        assert_eq!((27, 108), record_counts(&written));
    }

    #[test]
    fn medium_export_is_readable_as_statements() {
        let mesh =
            TriangleMesh::<f64, u32>::from_buffers(Vec::new(), Vec::new(), Vec::new()).unwrap();
        let boundary = Box3::new(Vec3d::zeros(), Vec3d::repeat(2.0));
        let medium =
            Medium::build_from_mesh::<Systematic, _>(&mesh, Vec3d::repeat(1.0), Some(boundary))
                .unwrap();

        let mut buffer = BufWriter::new(Vec::new());
        ObjWriter::new()
            .write_medium_to_buffer(&medium, &mut buffer)
            .unwrap();
        let written = String::from_utf8(buffer.into_inner().unwrap()).unwrap();

        assert_eq!((8, 12), record_counts(&written));

        // Edge records are skipped by the mesh reader rather than rejected
        let mut reader = ObjReader::new();
        let read_back: TriangleMesh<f64, u32> = reader
            .read_from_buffer(&mut BufReader::new(written.as_bytes()))
            .unwrap();

        assert_eq!(8, read_back.vertex_count());
        assert_eq!(0, read_back.face_count());
        assert!(reader.unknown_statements().is_empty());
    }
}
