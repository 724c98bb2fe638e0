//! Surface kinds and their fallback appearance.

use serde::{Deserialize, Serialize};

/// The kind of surface a material is resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    Wall,
    Floor,
    Ceiling,
    Furniture,
}

impl SurfaceKind {
    /// All surface kinds in order.
    pub const ALL: [SurfaceKind; 4] = [
        SurfaceKind::Wall,
        SurfaceKind::Floor,
        SurfaceKind::Ceiling,
        SurfaceKind::Furniture,
    ];

    /// Name of the material used when a surface has neither color nor texture.
    pub fn default_material_name(&self) -> &'static str {
        match self {
            SurfaceKind::Wall => "default_wall",
            SurfaceKind::Floor => "default_floor",
            SurfaceKind::Ceiling => "default_ceiling",
            SurfaceKind::Furniture => "furniture_default",
        }
    }

    /// Diffuse color of the default material.
    pub fn default_diffuse(&self) -> [f32; 3] {
        match self {
            SurfaceKind::Wall => [0.9, 0.9, 0.88],
            SurfaceKind::Floor => [0.6, 0.5, 0.4],
            SurfaceKind::Ceiling => [1.0, 1.0, 1.0],
            SurfaceKind::Furniture => [0.7, 0.7, 0.7],
        }
    }
}
