//! Serialized export artifacts.
//!
//! An [`ExportOutput`] holds the OBJ text, the MTL text, texture files and the
//! metadata sidecar for one home. It can be packaged as a ZIP bundle or
//! written out to a directory.

pub mod bundle;
pub mod metadata;
pub mod obj;

pub use bundle::write_bundle;
pub use metadata::HomeMetadata;
pub use obj::{write_mtl, write_obj, MATERIAL_LIBRARY};

use crate::error::Result;
use crate::material::TextureAsset;
use crate::mesher::{ExportConfig, ExportStats, SceneMesh};
use crate::types::Home;
use std::path::Path;

/// Everything produced by one export.
#[derive(Debug, Clone)]
pub struct ExportOutput {
    /// Base name of the OBJ file and its object.
    pub name: String,
    pub obj: String,
    pub mtl: String,
    pub textures: Vec<TextureAsset>,
    pub metadata: HomeMetadata,
    pub stats: ExportStats,
}

impl ExportOutput {
    /// Serialize a meshed scene. The home supplies the metadata.
    pub fn from_scene(name: &str, scene: SceneMesh, home: &Home, config: &ExportConfig) -> Self {
        Self {
            name: name.to_string(),
            obj: write_obj(&scene.mesh, name),
            mtl: write_mtl(&scene.materials),
            textures: scene.textures,
            metadata: HomeMetadata::from_home(home, config.default_wall_height, config.default_wall_thickness),
            stats: scene.stats,
        }
    }

    pub fn obj_file_name(&self) -> String {
        format!("{}.obj", self.name)
    }

    /// Package the mesh, materials and textures as ZIP bytes.
    pub fn to_zip(&self) -> Result<Vec<u8>> {
        write_bundle(self)
    }

    pub fn metadata_json(&self) -> Result<String> {
        self.metadata.to_json()
    }

    /// Write the OBJ, MTL and texture files into a directory.
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(self.obj_file_name()), &self.obj)?;
        std::fs::write(dir.join(MATERIAL_LIBRARY), &self.mtl)?;
        for texture in &self.textures {
            std::fs::write(dir.join(&texture.file_name), &texture.data)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::Exporter;
    use crate::resource::{parse_obj, MemoryFetcher};
    use crate::types::{Furniture, Wall};

    #[test]
    fn test_export_output() {
        let home = Home::new()
            .with_wall(Wall::new([0.0, 0.0], [300.0, 0.0]))
            .with_furniture(Furniture::new(150.0, 80.0));
        let output = Exporter::new(MemoryFetcher::new()).export(&home, "studio").unwrap();

        assert_eq!(output.obj_file_name(), "studio.obj");
        assert!(output.obj.contains("o studio\n"));
        assert!(output.mtl.contains("newmtl default_wall\n"));
        assert!(output.mtl.contains("newmtl furniture_default\n"));
        assert_eq!(parse_obj(&output.obj).unwrap().triangle_count(), output.stats.faces);
        assert!(output.metadata_json().unwrap().contains("\"devices\""));
    }

    #[test]
    fn test_write_to_dir() {
        let dir = tempfile::tempdir().unwrap();
        let home = Home::new().with_wall(Wall::new([0.0, 0.0], [100.0, 100.0]));
        let output = Exporter::new(MemoryFetcher::new()).export(&home, "corner").unwrap();
        output.write_to_dir(dir.path().join("out")).unwrap();

        let obj = std::fs::read_to_string(dir.path().join("out/corner.obj")).unwrap();
        assert_eq!(obj, output.obj);
        assert!(dir.path().join("out/materials.mtl").exists());
    }
}
