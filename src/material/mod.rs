//! Material records and texture assets for one export.
//!
//! Materials are keyed by a deterministic name so that repeated colors
//! collapse into one record, and are kept in insertion order so the written
//! material library is stable from run to run.

pub mod texture;
pub mod uv;

pub use texture::{TextureAsset, TextureStore};
pub use uv::TextureTransform;

use crate::resource::{MtlMaterial, ResourceLoader};
use crate::types::{Color, Surface, SurfaceKind};
use indexmap::IndexMap;

/// A material record as written to the MTL library.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub shininess: f32,
    /// 0 is opaque, 1 fully transparent.
    pub transparency: f32,
    /// Flat file name of the diffuse texture.
    pub texture: Option<String>,
}

impl Material {
    /// An untextured material with the given diffuse color.
    pub fn flat(name: impl Into<String>, diffuse: [f32; 3]) -> Self {
        Self {
            name: name.into(),
            ambient: [0.2, 0.2, 0.2],
            diffuse,
            specular: [0.0, 0.0, 0.0],
            shininess: 1.0,
            transparency: 0.0,
            texture: None,
        }
    }

    /// A white material showing a texture.
    pub fn textured(name: impl Into<String>, file_name: String) -> Self {
        Self {
            texture: Some(file_name),
            ..Self::flat(name, [1.0, 1.0, 1.0])
        }
    }

    /// Build from a parsed MTL record, keeping only what the record sets.
    pub fn from_mtl(name: impl Into<String>, source: &MtlMaterial, texture: Option<String>) -> Self {
        let base = Self::flat(name, SurfaceKind::Furniture.default_diffuse());
        Self {
            ambient: source.ambient.unwrap_or(base.ambient),
            diffuse: source.diffuse.unwrap_or(base.diffuse),
            specular: source.specular.unwrap_or(base.specular),
            shininess: source.shininess.unwrap_or(base.shininess),
            transparency: source
                .opacity
                .map(|d| (1.0 - d).clamp(0.0, 1.0))
                .unwrap_or(0.0),
            texture,
            ..base
        }
    }

    /// Opacity as written to `d`.
    pub fn opacity(&self) -> f32 {
        1.0 - self.transparency
    }
}

/// The outcome of resolving a surface: the material to use and, for
/// textured materials, how to project UVs.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceMaterial {
    pub name: String,
    pub transform: Option<TextureTransform>,
}

impl SurfaceMaterial {
    pub fn flat(name: String) -> Self {
        Self {
            name,
            transform: None,
        }
    }
}

/// Deterministic name for a flat color: `color_<r>_<g>_<b>` with 0-255 channels.
pub fn color_material_name(color: Color) -> String {
    let [r, g, b] = color.channels();
    format!("color_{}_{}_{}", r, g, b)
}

/// Replace every character other than ASCII letters and digits with `_`.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "unnamed".to_string()
    } else {
        cleaned
    }
}

/// Insertion-ordered materials plus their texture assets.
#[derive(Debug, Clone, Default)]
pub struct MaterialLibrary {
    materials: IndexMap<String, Material>,
    textures: TextureStore,
}

impl MaterialLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Insert a material unless one with the same name exists. Returns the name.
    pub fn insert(&mut self, material: Material) -> String {
        let name = material.name.clone();
        self.materials.entry(name.clone()).or_insert(material);
        name
    }

    /// Register texture bytes and return the flat file name.
    pub fn register_texture(&mut self, data: Vec<u8>) -> String {
        self.textures.register(data)
    }

    /// Material for a flat color, shared by every surface with that color.
    pub fn color_material(&mut self, color: Color) -> String {
        let name = color_material_name(color);
        if !self.contains(&name) {
            self.insert(Material::flat(name.clone(), color.to_unit()));
        }
        name
    }

    /// Fallback material for a surface kind.
    pub fn default_material(&mut self, kind: SurfaceKind) -> String {
        let name = kind.default_material_name();
        if !self.contains(name) {
            self.insert(Material::flat(name, kind.default_diffuse()));
        }
        name.to_string()
    }

    /// Resolve a surface's appearance: texture, then color, then the
    /// surface-kind default.
    ///
    /// `instance_key` names the texture-bearing material (`<key>_texture`),
    /// since two surfaces with the same image may place it differently. A
    /// texture that cannot be fetched is logged and skipped.
    pub fn resolve_surface(
        &mut self,
        surface: Surface<'_>,
        kind: SurfaceKind,
        instance_key: &str,
        loader: &ResourceLoader<'_>,
    ) -> SurfaceMaterial {
        if let Some(texture) = surface.texture {
            match loader.load_texture(&texture.image) {
                Ok(data) => {
                    let file_name = self.register_texture(data);
                    let transform = TextureTransform::from_surface(texture);
                    let name = self.insert(Material::textured(format!("{}_texture", instance_key), file_name));
                    return SurfaceMaterial {
                        name,
                        transform: Some(transform),
                    };
                }
                Err(e) => {
                    tracing::warn!(
                        surface = instance_key,
                        image = %texture.image,
                        error = %e,
                        "Texture unavailable, falling back to color"
                    );
                }
            }
        }

        match surface.color {
            Some(color) => SurfaceMaterial::flat(self.color_material(color)),
            None => SurfaceMaterial::flat(self.default_material(kind)),
        }
    }

    pub fn materials(&self) -> impl Iterator<Item = &Material> {
        self.materials.values()
    }

    pub fn textures(&self) -> &[TextureAsset] {
        self.textures.assets()
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Split into materials (insertion order) and texture assets.
    pub fn into_parts(self) -> (Vec<Material>, Vec<TextureAsset>) {
        (
            self.materials.into_values().collect(),
            self.textures.into_assets(),
        )
    }
}
