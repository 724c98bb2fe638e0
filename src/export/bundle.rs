//! ZIP bundle of an export: mesh, material library and textures.

use super::obj::MATERIAL_LIBRARY;
use super::ExportOutput;
use crate::error::{ExportError, Result};
use std::io::Write;

/// Package an export as ZIP bytes.
///
/// Entries are `<name>.obj`, `materials.mtl` and every texture under its flat
/// file name, all Deflate-compressed.
pub fn write_bundle(output: &ExportOutput) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    {
        let cursor = std::io::Cursor::new(&mut buf);
        let mut zip = zip::ZipWriter::new(cursor);

        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);

        let mut add = |name: &str, data: &[u8]| -> Result<()> {
            zip.start_file(name, options)
                .map_err(|e| ExportError::Export(format!("bundle write error for {}: {}", name, e)))?;
            zip.write_all(data)?;
            Ok(())
        };

        add(&output.obj_file_name(), output.obj.as_bytes())?;
        add(MATERIAL_LIBRARY, output.mtl.as_bytes())?;
        for texture in &output.textures {
            add(&texture.file_name, &texture.data)?;
        }

        zip.finish()?;
    }

    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesher::Exporter;
    use crate::resource::{MemoryFetcher, ModelArchive};
    use crate::types::{Home, Room, SurfaceTexture};
    use std::io::Read;

    #[test]
    fn test_bundle_entries() {
        let fetcher = MemoryFetcher::new().with("tiles.png", vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
        let mut room = Room::new(vec![[0.0, 0.0], [300.0, 0.0], [300.0, 300.0]]);
        room.floor_texture = Some(SurfaceTexture::new("tiles.png"));
        let output = Exporter::new(fetcher)
            .export(&Home::new().with_room(room), "flat")
            .unwrap();

        let bytes = write_bundle(&output).unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes.as_slice())).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["flat.obj", "materials.mtl", "texture_0.png"]);

        let mut mtl = String::new();
        archive.by_name("materials.mtl").unwrap().read_to_string(&mut mtl).unwrap();
        assert_eq!(mtl, output.mtl);
        assert_eq!(
            archive.by_name("flat.obj").unwrap().compression(),
            zip::CompressionMethod::Deflated
        );

        // The bundle reads back as a model archive.
        let reopened = ModelArchive::from_bytes(&bytes).unwrap();
        assert_eq!(reopened.mesh_name, "flat.obj");
        assert!(reopened.image("texture_0.png").is_some());
    }
}
