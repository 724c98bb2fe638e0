//! Mesh generation from a home.
//!
//! Walls, then rooms, then furniture are walked in source-list order and
//! appended to one shared accumulator.

pub mod furniture;
pub mod geometry;
pub mod room;
pub mod triangulate;
pub mod wall;

pub use furniture::{FurnitureMesher, FurnitureOutcome};
pub use geometry::{Face, MeshAccumulator};
pub use room::RoomSide;
pub use triangulate::triangulate;

use crate::error::{ExportError, Result};
use crate::export::ExportOutput;
use crate::material::{Material, MaterialLibrary, TextureAsset};
use crate::resource::{parse_mtl, MtlLibrary, ResourceFetcher, ResourceLoader, ResourceLocator};
use crate::types::{Home, Room, SurfaceKind, Wall};
use serde::Deserialize;
use wall::WallShape;

/// Export configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Height of walls that do not set one, in centimeters.
    pub default_wall_height: f32,
    /// Thickness of walls that do not set one, in centimeters.
    pub default_wall_thickness: f32,
    /// Elevation of room floors.
    pub floor_elevation: f32,
    /// Elevation of room ceilings.
    pub ceiling_elevation: f32,
    /// Directory holding model archives.
    pub models_dir: String,
    /// Archive path for catalog ids, with `{id}` as placeholder.
    pub catalog_model_template: String,
    /// MTL library consulted for model materials missing from their archive.
    pub default_material_library: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_wall_height: 250.0,
            default_wall_thickness: 10.0,
            floor_elevation: 0.0,
            ceiling_elevation: 250.0,
            models_dir: "resources/models".to_string(),
            catalog_model_template: "resources/models/{id}.zip".to_string(),
            default_material_library: None,
        }
    }
}

impl ExportConfig {
    pub fn with_wall_defaults(mut self, height: f32, thickness: f32) -> Self {
        self.default_wall_height = height;
        self.default_wall_thickness = thickness;
        self
    }

    pub fn with_elevations(mut self, floor: f32, ceiling: f32) -> Self {
        self.floor_elevation = floor;
        self.ceiling_elevation = ceiling;
        self
    }

    pub fn with_models_dir(mut self, dir: impl Into<String>) -> Self {
        self.models_dir = dir.into();
        self
    }

    pub fn with_catalog_template(mut self, template: impl Into<String>) -> Self {
        self.catalog_model_template = template.into();
        self
    }

    pub fn with_default_material_library(mut self, path: impl Into<String>) -> Self {
        self.default_material_library = Some(path.into());
        self
    }

    /// Load a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn locator(&self) -> ResourceLocator {
        ResourceLocator::new(&self.models_dir, &self.catalog_model_template)
    }
}

/// Counters for one export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExportStats {
    pub walls: usize,
    pub rooms: usize,
    pub furniture_models: usize,
    pub furniture_boxes: usize,
    pub vertices: usize,
    pub normals: usize,
    pub uvs: usize,
    pub faces: usize,
    pub materials: usize,
    pub textures: usize,
}

/// Geometry and materials produced from a home, before serialization.
#[derive(Debug, Clone)]
pub struct SceneMesh {
    pub mesh: MeshAccumulator,
    pub materials: Vec<Material>,
    pub textures: Vec<TextureAsset>,
    pub stats: ExportStats,
}

/// Turns homes into meshes using one resource fetcher.
///
/// Each call works on fresh state, so an exporter can be shared.
pub struct Exporter<F: ResourceFetcher> {
    fetcher: F,
    config: ExportConfig,
}

impl<F: ResourceFetcher> Exporter<F> {
    /// Create an exporter with default configuration.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            config: ExportConfig::default(),
        }
    }

    /// Create an exporter with custom configuration.
    pub fn with_config(fetcher: F, config: ExportConfig) -> Self {
        Self { fetcher, config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Build the mesh for a home.
    pub fn mesh(&self, home: &Home) -> Result<SceneMesh> {
        let locator = self.config.locator();
        let loader = ResourceLoader::new(&self.fetcher, &locator);
        let default_library = self.load_default_library(&loader)?;

        let mut session = ExportSession::new(&self.config, loader, &default_library);
        session.add_home(home);
        session.finish(home)
    }

    /// Mesh a home and serialize it as `<name>.obj` plus its side files.
    pub fn export(&self, home: &Home, name: &str) -> Result<ExportOutput> {
        let scene = self.mesh(home)?;
        let output = ExportOutput::from_scene(name, scene, home, &self.config);
        tracing::info!(
            name,
            vertices = output.stats.vertices,
            faces = output.stats.faces,
            materials = output.stats.materials,
            textures = output.stats.textures,
            "Exported home"
        );
        Ok(output)
    }

    fn load_default_library(&self, loader: &ResourceLoader<'_>) -> Result<MtlLibrary> {
        let Some(path) = self.config.default_material_library.as_deref() else {
            return Ok(MtlLibrary::new());
        };
        let text = loader
            .load_text(path)
            .map_err(|e| ExportError::LibraryUnavailable(format!("{}: {}", path, e)))?;
        let library = parse_mtl(&text);
        if library.is_empty() {
            return Err(ExportError::LibraryUnavailable(format!(
                "{}: no materials defined",
                path
            )));
        }
        tracing::debug!(path, materials = library.len(), "Loaded default material library");
        Ok(library)
    }
}

/// Mutable state of one export pass.
struct ExportSession<'a> {
    config: &'a ExportConfig,
    loader: ResourceLoader<'a>,
    furniture: FurnitureMesher<'a>,
    mesh: MeshAccumulator,
    materials: MaterialLibrary,
    stats: ExportStats,
}

impl<'a> ExportSession<'a> {
    fn new(config: &'a ExportConfig, loader: ResourceLoader<'a>, default_library: &'a MtlLibrary) -> Self {
        Self {
            config,
            loader,
            furniture: FurnitureMesher::new(loader, default_library),
            mesh: MeshAccumulator::new(),
            materials: MaterialLibrary::new(),
            stats: ExportStats::default(),
        }
    }

    fn add_home(&mut self, home: &Home) {
        for (index, wall) in home.walls.iter().enumerate() {
            self.add_wall(index, wall);
        }
        for (index, room) in home.rooms.iter().enumerate() {
            self.add_room(index, room);
        }
        for (index, piece) in home.furniture.iter().enumerate() {
            if !piece.visible {
                tracing::debug!(index, name = piece.display_name(), "Skipping hidden furniture");
                continue;
            }
            match self.furniture.add(&mut self.mesh, &mut self.materials, index, piece) {
                FurnitureOutcome::Model(_) => self.stats.furniture_models += 1,
                FurnitureOutcome::Box => self.stats.furniture_boxes += 1,
            }
        }
    }

    fn add_wall(&mut self, index: usize, wall: &Wall) {
        let length = wall.length();
        if length.is_nan() || length < wall::MIN_WALL_LENGTH {
            tracing::debug!(index, "Skipping zero-length wall");
            return;
        }

        let left = self.materials.resolve_surface(
            wall.left_side(),
            SurfaceKind::Wall,
            &format!("wall_{}_left", index),
            &self.loader,
        );
        let right = if wall.has_right_override() {
            self.materials.resolve_surface(
                wall.right_side(),
                SurfaceKind::Wall,
                &format!("wall_{}_right", index),
                &self.loader,
            )
        } else {
            left.clone()
        };

        let shape = WallShape {
            base: self.config.floor_elevation,
            height: wall.height.unwrap_or(self.config.default_wall_height),
            thickness: wall.thickness.unwrap_or(self.config.default_wall_thickness),
            left: &left,
            right: &right,
        };
        if wall::build_wall(&mut self.mesh, wall, &shape) {
            self.stats.walls += 1;
        }
    }

    fn add_room(&mut self, index: usize, room: &Room) {
        if room.points.len() < 3 {
            tracing::warn!(index, points = room.points.len(), "Skipping room with fewer than 3 points");
            return;
        }

        let sides = [
            (RoomSide::Floor, room.floor_visible, room.floor(), SurfaceKind::Floor, self.config.floor_elevation),
            (
                RoomSide::Ceiling,
                room.ceiling_visible,
                room.ceiling(),
                SurfaceKind::Ceiling,
                self.config.ceiling_elevation,
            ),
        ];
        let mut emitted = 0;
        for (side, visible, surface, kind, elevation) in sides {
            if !visible {
                continue;
            }
            let key = format!("room_{}_{}", index, side.label());
            let material = self.materials.resolve_surface(surface, kind, &key, &self.loader);
            emitted += room::build_room_side(&mut self.mesh, &room.points, side, elevation, &material);
        }
        if emitted > 0 {
            self.stats.rooms += 1;
        }
    }

    fn finish(self, home: &Home) -> Result<SceneMesh> {
        if self.mesh.is_empty() {
            return Err(if home.is_empty() {
                ExportError::EmptyHome
            } else {
                ExportError::NoGeometry(home.item_count())
            });
        }

        let mut stats = self.stats;
        stats.vertices = self.mesh.vertices.len();
        stats.normals = self.mesh.normals.len();
        stats.uvs = self.mesh.tex_coords.len();
        stats.faces = self.mesh.faces.len();

        let (materials, textures) = self.materials.into_parts();
        stats.materials = materials.len();
        stats.textures = textures.len();
        Ok(SceneMesh {
            mesh: self.mesh,
            materials,
            textures,
            stats,
        })
    }
}
