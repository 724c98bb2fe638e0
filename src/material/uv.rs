//! Planar UV projection for generated geometry.

use crate::types::SurfaceTexture;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Y variance below which a polygon counts as horizontal.
const HORIZONTAL_VARIANCE: f32 = 0.01;

/// Texture placement on a surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureTransform {
    /// Offset in repeats, added after rotation.
    pub offset: [f32; 2],
    /// Rotation in radians.
    pub angle: f32,
    /// World size of one repeat along u and v, in centimeters.
    pub scale: [f32; 2],
}

impl Default for TextureTransform {
    fn default() -> Self {
        Self {
            offset: [0.0, 0.0],
            angle: 0.0,
            scale: [100.0, 100.0],
        }
    }
}

impl TextureTransform {
    /// Derive the transform from a surface texture's placement parameters.
    pub fn from_surface(texture: &SurfaceTexture) -> Self {
        let factor = if texture.scale > 0.0 { texture.scale } else { 1.0 };
        Self {
            offset: [texture.x_offset, texture.y_offset],
            angle: texture.angle,
            scale: [
                repeat_size(texture.width) * factor,
                repeat_size(texture.height) * factor,
            ],
        }
    }

    /// Map a planar coordinate to a wrapped UV.
    pub fn apply(&self, a: f32, b: f32) -> [f32; 2] {
        let u = a / self.scale[0];
        let v = b / self.scale[1];
        let (sin, cos) = self.angle.sin_cos();
        let ru = u * cos - v * sin + self.offset[0];
        let rv = u * sin + v * cos + self.offset[1];
        [wrap(ru), wrap(rv)]
    }
}

fn repeat_size(size: f32) -> f32 {
    if size > 0.0 {
        size
    } else {
        100.0
    }
}

/// Wrap into [0, 1), folding -0.0 into 0.0.
fn wrap(value: f32) -> f32 {
    let w = value.rem_euclid(1.0);
    if w >= 1.0 {
        0.0
    } else {
        w + 0.0
    }
}

/// Returns `true` if the points lie (nearly) in one horizontal plane.
pub fn is_horizontal(points: &[Vec3]) -> bool {
    if points.is_empty() {
        return true;
    }
    let n = points.len() as f32;
    let mean = points.iter().map(|p| p.y).sum::<f32>() / n;
    let variance = points.iter().map(|p| (p.y - mean).powi(2)).sum::<f32>() / n;
    variance < HORIZONTAL_VARIANCE
}

/// Project points onto (x, z) when horizontal or (x, y) otherwise, then apply
/// the texture transform.
///
/// Vertical surfaces always use (x, y), so a wall running along z gets a
/// constant u.
pub fn planar_uv<const N: usize>(points: &[Vec3; N], transform: &TextureTransform) -> [[f32; 2]; N] {
    let horizontal = is_horizontal(points);
    std::array::from_fn(|i| {
        let p = points[i];
        if horizontal {
            transform.apply(p.x, p.z)
        } else {
            transform.apply(p.x, p.y)
        }
    })
}
