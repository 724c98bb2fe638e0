//! Mesh accumulator with OBJ-style global pools.
//!
//! Vertex, normal and texture-coordinate indices are 1-based, matching the
//! serialized form, and stay valid for the rest of the export pass.

use crate::material::uv::{planar_uv, TextureTransform};
use glam::Vec3;

/// Normals shorter than this are rejected.
const MIN_NORMAL_LENGTH: f32 = 1e-6;

/// A triangle referencing the accumulator pools.
///
/// Normal and UV slots are all-or-none; a face never mixes present and
/// absent references of one kind.
#[derive(Debug, Clone, PartialEq)]
pub struct Face {
    pub vertices: [u32; 3],
    pub normals: Option<[u32; 3]>,
    pub uvs: Option<[u32; 3]>,
    pub material: String,
}

impl Face {
    pub fn new(vertices: [u32; 3], material: impl Into<String>) -> Self {
        Self {
            vertices,
            normals: None,
            uvs: None,
            material: material.into(),
        }
    }

    pub fn with_normals(mut self, normals: Option<[u32; 3]>) -> Self {
        self.normals = normals;
        self
    }

    pub fn with_uvs(mut self, uvs: Option<[u32; 3]>) -> Self {
        self.uvs = uvs;
        self
    }
}

/// Geometry collected during one export pass.
#[derive(Debug, Clone, Default)]
pub struct MeshAccumulator {
    pub vertices: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub tex_coords: Vec<[f32; 2]>,
    pub faces: Vec<Face>,
}

impl MeshAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its 1-based index.
    ///
    /// Every call appends, so shared corners are duplicated.
    pub fn add_vertex(&mut self, point: Vec3) -> u32 {
        self.vertices.push(point);
        self.vertices.len() as u32
    }

    /// Add a normal and return its 1-based index.
    ///
    /// The vector is normalized. Degenerate or NaN vectors return `None` and
    /// the caller must leave the normal off its faces.
    pub fn add_normal(&mut self, normal: Vec3) -> Option<u32> {
        if !normal.is_finite() {
            return None;
        }
        let length = normal.length();
        if length < MIN_NORMAL_LENGTH {
            return None;
        }
        self.normals.push(normal / length);
        Some(self.normals.len() as u32)
    }

    /// Add a texture coordinate and return its 1-based index.
    pub fn add_tex_coord(&mut self, uv: [f32; 2]) -> u32 {
        self.tex_coords.push(uv);
        self.tex_coords.len() as u32
    }

    /// Add a pre-built face. Indices must already exist in the pools.
    pub fn add_face(&mut self, face: Face) {
        debug_assert!(face.vertices.iter().all(|&i| i >= 1 && i as usize <= self.vertices.len()));
        self.faces.push(face);
    }

    /// Add a triangle with one flat normal.
    pub fn add_triangle(&mut self, vertices: [u32; 3], normal: Vec3, material: &str) {
        let n = self.add_normal(normal).map(|n| [n; 3]);
        self.add_face(Face::new(vertices, material).with_normals(n));
    }

    /// Add a quad as two triangles sharing the v0-v2 diagonal and one normal.
    pub fn add_quad(&mut self, vertices: [u32; 4], normal: Vec3, material: &str) {
        let [v0, v1, v2, v3] = vertices;
        let n = self.add_normal(normal).map(|n| [n; 3]);
        self.add_face(Face::new([v0, v1, v2], material).with_normals(n));
        self.add_face(Face::new([v0, v2, v3], material).with_normals(n));
    }

    /// Add a triangle with UVs projected from its own positions.
    pub fn add_textured_triangle(
        &mut self,
        vertices: [u32; 3],
        normal: Vec3,
        material: &str,
        transform: &TextureTransform,
    ) {
        let points = vertices.map(|v| self.position(v));
        let uvs = planar_uv(&points, transform);
        let t = uvs.map(|uv| self.add_tex_coord(uv));
        let n = self.add_normal(normal).map(|n| [n; 3]);
        self.add_face(Face::new(vertices, material).with_normals(n).with_uvs(Some(t)));
    }

    /// Add a quad with UVs projected from its four positions.
    pub fn add_textured_quad(
        &mut self,
        vertices: [u32; 4],
        normal: Vec3,
        material: &str,
        transform: &TextureTransform,
    ) {
        let points = vertices.map(|v| self.position(v));
        let uvs = planar_uv(&points, transform);
        let [t0, t1, t2, t3] = uvs.map(|uv| self.add_tex_coord(uv));
        let [v0, v1, v2, v3] = vertices;
        let n = self.add_normal(normal).map(|n| [n; 3]);
        self.add_face(
            Face::new([v0, v1, v2], material)
                .with_normals(n)
                .with_uvs(Some([t0, t1, t2])),
        );
        self.add_face(
            Face::new([v0, v2, v3], material)
                .with_normals(n)
                .with_uvs(Some([t0, t2, t3])),
        );
    }

    /// Add a triangle, textured when a transform is given.
    pub fn add_surface_triangle(
        &mut self,
        vertices: [u32; 3],
        normal: Vec3,
        material: &str,
        transform: Option<&TextureTransform>,
    ) {
        match transform {
            Some(t) => self.add_textured_triangle(vertices, normal, material, t),
            None => self.add_triangle(vertices, normal, material),
        }
    }

    /// Add a quad, textured when a transform is given.
    pub fn add_surface_quad(
        &mut self,
        vertices: [u32; 4],
        normal: Vec3,
        material: &str,
        transform: Option<&TextureTransform>,
    ) {
        match transform {
            Some(t) => self.add_textured_quad(vertices, normal, material, t),
            None => self.add_quad(vertices, normal, material),
        }
    }

    /// Position of a 1-based vertex index.
    pub fn position(&self, index: u32) -> Vec3 {
        self.vertices[index as usize - 1]
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }
}
