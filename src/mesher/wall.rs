//! Wall slabs.

use super::geometry::MeshAccumulator;
use crate::material::SurfaceMaterial;
use crate::types::{plan_to_world, Wall};
use glam::Vec3;

/// Walls shorter than this (cm) produce no geometry.
pub const MIN_WALL_LENGTH: f32 = 1e-3;

/// Resolved dimensions and appearance of one wall.
#[derive(Debug, Clone)]
pub struct WallShape<'a> {
    pub base: f32,
    pub height: f32,
    pub thickness: f32,
    pub left: &'a SurfaceMaterial,
    pub right: &'a SurfaceMaterial,
}

/// Emit the six faces of a wall slab.
///
/// The left side lies along `(-dy, dx)` from the center line. The right face
/// uses `right`; the caps, top and bottom share the left material. Returns
/// `false` for a degenerate wall.
pub fn build_wall(mesh: &mut MeshAccumulator, wall: &Wall, shape: &WallShape<'_>) -> bool {
    let length = wall.length();
    if length.is_nan() || length < MIN_WALL_LENGTH {
        return false;
    }

    let [sx, sy] = wall.start;
    let [ex, ey] = wall.end;
    let dir = [(ex - sx) / length, (ey - sy) / length];
    let half = shape.thickness * 0.5;
    let off = [-dir[1] * half, dir[0] * half];

    let low = shape.base;
    let high = shape.base + shape.height;
    let point = |p: [f32; 2], sign: f32, y: f32| {
        plan_to_world([p[0] + off[0] * sign, p[1] + off[1] * sign], y)
    };

    let a_l0 = mesh.add_vertex(point(wall.start, 1.0, low));
    let b_l0 = mesh.add_vertex(point(wall.end, 1.0, low));
    let b_lh = mesh.add_vertex(point(wall.end, 1.0, high));
    let a_lh = mesh.add_vertex(point(wall.start, 1.0, high));
    let a_r0 = mesh.add_vertex(point(wall.start, -1.0, low));
    let b_r0 = mesh.add_vertex(point(wall.end, -1.0, low));
    let b_rh = mesh.add_vertex(point(wall.end, -1.0, high));
    let a_rh = mesh.add_vertex(point(wall.start, -1.0, high));

    let along = Vec3::new(dir[0], 0.0, dir[1]);
    let left_normal = Vec3::new(-dir[1], 0.0, dir[0]);

    let left = shape.left;
    let right = shape.right;
    let quads = [
        ([a_l0, b_l0, b_lh, a_lh], left_normal, left),
        ([a_r0, a_rh, b_rh, b_r0], -left_normal, right),
        ([a_lh, b_lh, b_rh, a_rh], Vec3::Y, left),
        ([a_l0, a_r0, b_r0, b_l0], Vec3::NEG_Y, left),
        ([a_r0, a_l0, a_lh, a_rh], -along, left),
        ([b_l0, b_r0, b_rh, b_lh], along, left),
    ];
    for (verts, normal, material) in quads {
        mesh.add_surface_quad(verts, normal, &material.name, material.transform.as_ref());
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::TextureTransform;

    fn flat(name: &str) -> SurfaceMaterial {
        SurfaceMaterial::flat(name.to_string())
    }

    fn shape<'a>(left: &'a SurfaceMaterial, right: &'a SurfaceMaterial) -> WallShape<'a> {
        WallShape {
            base: 0.0,
            height: 250.0,
            thickness: 10.0,
            left,
            right,
        }
    }

    #[test]
    fn test_wall_emits_six_quads() {
        let (l, r) = (flat("left"), flat("right"));
        let mut mesh = MeshAccumulator::new();
        assert!(build_wall(&mut mesh, &Wall::new([0.0, 0.0], [100.0, 0.0]), &shape(&l, &r)));
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.face_count(), 12);
        assert_eq!(mesh.normals.len(), 6);
        assert_eq!(mesh.faces.iter().filter(|f| f.material == "right").count(), 2);
    }

    #[test]
    fn test_wall_faces_sit_at_half_thickness() {
        let (l, r) = (flat("left"), flat("right"));
        let mut mesh = MeshAccumulator::new();
        build_wall(&mut mesh, &Wall::new([0.0, 0.0], [100.0, 0.0]), &shape(&l, &r));

        let zs: Vec<f32> = mesh.vertices.iter().map(|v| v.z).collect();
        assert!(zs[..4].iter().all(|&z| (z - 5.0).abs() < 1e-5));
        assert!(zs[4..].iter().all(|&z| (z + 5.0).abs() < 1e-5));
        let max_y = mesh.vertices.iter().map(|v| v.y).fold(f32::MIN, f32::max);
        assert_eq!(max_y, 250.0);

        assert_eq!(mesh.normals[0], Vec3::Z);
        assert_eq!(mesh.normals[1], Vec3::NEG_Z);
    }

    #[test]
    fn test_winding_matches_normals() {
        let (l, r) = (flat("left"), flat("right"));
        let mut mesh = MeshAccumulator::new();
        build_wall(&mut mesh, &Wall::new([30.0, -20.0], [80.0, 140.0]), &shape(&l, &r));

        for face in &mesh.faces {
            let [a, b, c] = face.vertices.map(|v| mesh.position(v));
            let geometric = (b - a).cross(c - a).normalize();
            let normal = face.normals.map(|n| mesh.normals[n[0] as usize - 1]).unwrap();
            assert!(geometric.dot(normal) > 0.99, "face {:?}", face);
        }
    }

    #[test]
    fn test_degenerate_wall_is_skipped() {
        let (l, r) = (flat("left"), flat("right"));
        let mut mesh = MeshAccumulator::new();
        assert!(!build_wall(&mut mesh, &Wall::new([5.0, 5.0], [5.0, 5.0]), &shape(&l, &r)));
        assert!(mesh.is_empty());
        assert_eq!(mesh.vertex_count(), 0);
    }

    #[test]
    fn test_textured_side_gets_uvs() {
        let l = SurfaceMaterial {
            name: "wall_0_left_texture".to_string(),
            transform: Some(TextureTransform::default()),
        };
        let r = flat("right");
        let mut mesh = MeshAccumulator::new();
        build_wall(&mut mesh, &Wall::new([0.0, 0.0], [100.0, 0.0]), &shape(&l, &r));

        let textured = mesh.faces.iter().filter(|f| f.uvs.is_some()).count();
        assert_eq!(textured, 10);
        assert!(mesh.tex_coords.iter().all(|uv| (0.0..1.0).contains(&uv[0])));
    }
}
