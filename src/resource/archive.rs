//! Furniture model archives.
//!
//! A model archive is a ZIP holding one OBJ mesh, optionally an MTL library
//! and any number of images.

use super::mtl::{bare_file_name, parse_mtl, MtlLibrary};
use crate::error::{ExportError, Result};
use std::collections::HashMap;
use std::io::Read;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif"];

/// The contents of a model archive.
#[derive(Debug, Clone)]
pub struct ModelArchive {
    /// Entry name of the mesh file.
    pub mesh_name: String,
    pub mesh_text: String,
    /// Entry name and text of the chosen material library.
    pub material_library: Option<(String, String)>,
    /// Image bytes keyed by lower-cased bare file name.
    pub images: HashMap<String, Vec<u8>>,
}

impl ModelArchive {
    /// Read a model archive from ZIP bytes.
    ///
    /// The first `.obj` entry is the mesh. An `.mtl` entry sharing the mesh's
    /// stem is preferred over any other `.mtl`.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let cursor = std::io::Cursor::new(data);
        let mut archive = zip::ZipArchive::new(cursor)?;

        let mut mesh: Option<(String, String)> = None;
        let mut libraries: Vec<(String, String)> = Vec::new();
        let mut images = HashMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let entry_name = file.name().to_string();

            match extension(&entry_name).as_deref() {
                Some("obj") => {
                    if mesh.is_some() {
                        tracing::debug!(entry = %entry_name, "Ignoring extra mesh file in archive");
                        continue;
                    }
                    mesh = Some((entry_name, read_text(&mut file)?));
                }
                Some("mtl") => {
                    let text = read_text(&mut file)?;
                    libraries.push((entry_name, text));
                }
                Some(ext) if IMAGE_EXTENSIONS.contains(&ext) => {
                    let mut bytes = Vec::new();
                    file.read_to_end(&mut bytes)?;
                    images.insert(bare_file_name(&entry_name).to_lowercase(), bytes);
                }
                _ => {}
            }
        }

        let (mesh_name, mesh_text) = mesh
            .ok_or_else(|| ExportError::InvalidArchive("no .obj mesh file in archive".to_string()))?;

        let mesh_stem = stem(&mesh_name).to_lowercase();
        let preferred = libraries
            .iter()
            .position(|(name, _)| stem(name).to_lowercase() == mesh_stem);
        let material_library = match preferred {
            Some(idx) => Some(libraries.swap_remove(idx)),
            None => libraries.into_iter().next(),
        };

        Ok(Self {
            mesh_name,
            mesh_text,
            material_library,
            images,
        })
    }

    /// Parse the archive's material library, or an empty one.
    pub fn materials(&self) -> MtlLibrary {
        self.material_library
            .as_ref()
            .map(|(_, text)| parse_mtl(text))
            .unwrap_or_default()
    }

    /// Look up an image by reference, ignoring directories and case.
    pub fn image(&self, reference: &str) -> Option<&[u8]> {
        self.images
            .get(&bare_file_name(reference).to_lowercase())
            .map(|v| v.as_slice())
    }
}

fn read_text<R: Read>(reader: &mut R) -> Result<String> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn extension(name: &str) -> Option<String> {
    let file = bare_file_name(name);
    file.rfind('.')
        .filter(|&dot| dot > 0)
        .map(|dot| file[dot + 1..].to_lowercase())
}

fn stem(name: &str) -> &str {
    let file = bare_file_name(name);
    match file.rfind('.') {
        Some(dot) if dot > 0 => &file[..dot],
        _ => file,
    }
}
