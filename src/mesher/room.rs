//! Room floors and ceilings.

use super::geometry::MeshAccumulator;
use super::triangulate::triangulate;
use crate::material::SurfaceMaterial;
use glam::Vec3;

/// Which horizontal slab of a room is being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomSide {
    Floor,
    Ceiling,
}

impl RoomSide {
    /// Floors face down, ceilings face up.
    pub fn normal(self) -> Vec3 {
        match self {
            RoomSide::Floor => Vec3::NEG_Y,
            RoomSide::Ceiling => Vec3::Y,
        }
    }

    fn flip(self) -> bool {
        matches!(self, RoomSide::Ceiling)
    }

    pub fn label(self) -> &'static str {
        match self {
            RoomSide::Floor => "floor",
            RoomSide::Ceiling => "ceiling",
        }
    }
}

/// Triangulate one side of a room polygon and append it.
///
/// Every triangle carries its own copy of the side normal. Returns the number
/// of triangles written.
pub fn build_room_side(
    mesh: &mut MeshAccumulator,
    points: &[[f32; 2]],
    side: RoomSide,
    elevation: f32,
    material: &SurfaceMaterial,
) -> usize {
    let triangles = triangulate(points, elevation, side.flip());
    for tri in &triangles {
        let vertices = tri.map(|p| mesh.add_vertex(p));
        mesh.add_surface_triangle(vertices, side.normal(), &material.name, material.transform.as_ref());
    }
    triangles.len()
}
