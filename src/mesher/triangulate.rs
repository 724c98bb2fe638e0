//! Planar polygon triangulation.

use crate::types::plan_to_world;
use glam::Vec3;

/// Triangulate a plan polygon at a fixed elevation.
///
/// Triangles fan out from the first point, so a quad splits along its 0-2
/// diagonal. This is exact for convex polygons only. With `flip` each
/// triangle is emitted as `(a, c, b)`.
pub fn triangulate(points: &[[f32; 2]], elevation: f32, flip: bool) -> Vec<[Vec3; 3]> {
    if points.len() < 3 {
        return Vec::new();
    }

    let world: Vec<Vec3> = points.iter().map(|&p| plan_to_world(p, elevation)).collect();
    let a = world[0];
    world[1..]
        .windows(2)
        .map(|pair| {
            let (b, c) = (pair[0], pair[1]);
            if flip {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect()
}
