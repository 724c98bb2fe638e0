//! Access to external resources: model archives and texture images.
//!
//! Resources are addressed by plain string paths. A [`ResourceFetcher`]
//! supplies the bytes, a [`ResourceLocator`] turns the reference shapes found
//! in a home into those paths.

pub mod archive;
pub mod locator;
pub mod mtl;
pub mod obj;

pub use archive::ModelArchive;
pub use locator::{ResourceLocator, ResourceRequest};
pub use mtl::{parse_mtl, MtlLibrary, MtlMaterial};
pub use obj::{parse_obj, ObjModel, ObjTriangle};

use crate::error::{ExportError, Result};
use crate::types::Furniture;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Component, Path, PathBuf};

/// Source of resource bytes.
///
/// Fetches are blocking and happen one at a time during an export.
pub trait ResourceFetcher {
    /// Fetch the bytes stored at `path`.
    fn fetch(&self, path: &str) -> Result<Vec<u8>>;
}

impl<T: ResourceFetcher + ?Sized> ResourceFetcher for &T {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        (**self).fetch(path)
    }
}

/// Fetches resources from files below a root directory.
#[derive(Debug, Clone)]
pub struct DirectoryFetcher {
    root: PathBuf,
}

impl DirectoryFetcher {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a resource path below the root. Parent components are refused.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return None;
        }
        Some(self.root.join(relative))
    }
}

impl ResourceFetcher for DirectoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let full = self
            .resolve(path)
            .ok_or_else(|| ExportError::ResourceNotFound(path.to_string()))?;
        match std::fs::read(&full) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(ExportError::ResourceNotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory resources keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(path.into(), data.into());
    }

    pub fn with(mut self, path: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(path, data);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceFetcher for MemoryFetcher {
    fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        self.entries
            .get(path.trim_start_matches('/'))
            .cloned()
            .ok_or_else(|| ExportError::ResourceNotFound(path.to_string()))
    }
}

/// A fetcher paired with the locator that addresses it.
#[derive(Clone, Copy)]
pub struct ResourceLoader<'a> {
    fetcher: &'a dyn ResourceFetcher,
    locator: &'a ResourceLocator,
}

impl<'a> ResourceLoader<'a> {
    pub fn new(fetcher: &'a dyn ResourceFetcher, locator: &'a ResourceLocator) -> Self {
        Self { fetcher, locator }
    }

    pub fn locator(&self) -> &ResourceLocator {
        self.locator
    }

    /// Fetch a located resource, unpacking archive entries.
    pub fn fetch(&self, request: &ResourceRequest) -> Result<Vec<u8>> {
        match request {
            ResourceRequest::File(path) => self.fetcher.fetch(path),
            ResourceRequest::ArchiveEntry { archive, entry } => {
                let data = self.fetcher.fetch(archive)?;
                read_archive_entry(&data, entry)
            }
        }
    }

    /// Fetch a texture image by reference.
    pub fn load_texture(&self, reference: &str) -> Result<Vec<u8>> {
        let request = self
            .locator
            .texture_request(reference)
            .ok_or_else(|| ExportError::ResourceNotFound(reference.to_string()))?;
        self.fetch(&request)
    }

    /// Fetch and open the model archive for a furniture piece.
    pub fn load_model(&self, piece: &Furniture) -> Result<ModelArchive> {
        let path = self.locator.model_archive(piece).ok_or_else(|| {
            ExportError::ResourceNotFound(format!(
                "no model reference or catalog id for '{}'",
                piece.display_name()
            ))
        })?;
        let data = self.fetcher.fetch(&path)?;
        ModelArchive::from_bytes(&data)
    }

    /// Fetch a text resource such as a material library.
    pub fn load_text(&self, path: &str) -> Result<String> {
        let data = self.fetcher.fetch(path)?;
        Ok(String::from_utf8_lossy(&data).into_owned())
    }
}

/// Read one named entry out of ZIP bytes.
fn read_archive_entry(data: &[u8], entry: &str) -> Result<Vec<u8>> {
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor)?;
    let mut file = match archive.by_name(entry.trim_start_matches('/')) {
        Ok(file) => file,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ExportError::ResourceNotFound(entry.to_string()))
        }
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::io::Write;

    /// Build ZIP bytes from (name, contents) pairs.
    pub fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let cursor = std::io::Cursor::new(&mut buf);
            let mut zip = zip::ZipWriter::new(cursor);
            let options = zip::write::SimpleFileOptions::default()
                .compression_method(zip::CompressionMethod::Deflated);
            for (name, data) in entries {
                zip.start_file(*name, options).unwrap();
                zip.write_all(data).unwrap();
            }
            zip.finish().unwrap();
        }
        buf
    }
}
