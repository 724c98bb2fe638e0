//! # Floor-plan Mesher
//!
//! A Rust library for exporting house floor plans as textured 3D meshes.
//!
//! ## Overview
//!
//! This library takes a home (walls, rooms and furniture placements, in
//! centimeters on a 2D plan) plus access to its resources, and produces a
//! Wavefront OBJ mesh with an MTL material library, the texture files those
//! materials reference, and a JSON metadata sidecar.
//!
//! Walls become six-sided slabs, rooms become floor and ceiling polygons, and
//! furniture pieces import their OBJ model from a ZIP archive. A piece whose
//! model cannot be used is replaced by a box of the same size.
//!
//! ## Quick Start
//!
//! ```ignore
//! use floorplan_mesher::{DirectoryFetcher, Exporter, Home};
//!
//! let home = Home::from_json(&std::fs::read_to_string("home.json")?)?;
//! let exporter = Exporter::new(DirectoryFetcher::new("path/to/resources"));
//!
//! let output = exporter.export(&home, "home")?;
//! std::fs::write("home.zip", output.to_zip()?)?;
//! std::fs::write("home.json", output.metadata_json()?)?;
//! ```
//!
//! ## Resources
//!
//! Model archives and texture images are read through the
//! [`ResourceFetcher`] trait. [`DirectoryFetcher`] reads from disk and
//! [`MemoryFetcher`] serves bytes supplied by the host.

pub mod error;
pub mod types;
pub mod resource;
pub mod mesher;
pub mod material;
pub mod export;

// Re-export main types for convenience
pub use error::{ExportError, Result};
pub use types::{BoundingBox, Color, Furniture, Home, Room, SurfaceKind, SurfaceTexture, Wall};
pub use resource::{DirectoryFetcher, MemoryFetcher, ModelArchive, ResourceFetcher, ResourceLocator};
pub use mesher::{ExportConfig, ExportStats, Exporter, MeshAccumulator, SceneMesh};
pub use material::{Material, MaterialLibrary, TextureAsset, TextureTransform};
pub use export::{write_bundle, write_mtl, write_obj, ExportOutput, HomeMetadata};

/// Export a home with resources read from a directory.
pub fn export_home<P: AsRef<std::path::Path>>(
    home: &Home,
    resources: P,
    config: ExportConfig,
    name: &str,
) -> Result<ExportOutput> {
    Exporter::with_config(DirectoryFetcher::new(resources), config).export(home, name)
}
