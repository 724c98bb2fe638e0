//! Reference-to-path resolution for models and textures.
//!
//! Homes refer to resources in several shapes: archive-embedded URLs
//! (`jar:file:/x/sofa.zip!/sofa.obj`), bare mesh files (`sofa.obj`) and
//! already-resolved archive paths (`resources/models/sofa.zip`). Each shape is
//! handled by one [`LocatorRule`]; rules are tried in order and the first match
//! wins.

use crate::types::Furniture;

/// A located resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceRequest {
    /// A file addressed directly.
    File(String),
    /// An entry inside a ZIP archive.
    ArchiveEntry { archive: String, entry: String },
}

/// What a model rule resolved a reference to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelTarget {
    /// A model name, looked up in the models directory.
    Named(String),
    /// A path to use as-is.
    Path(String),
}

/// One reference shape and how to canonicalize it.
pub struct LocatorRule<T> {
    pub name: &'static str,
    pub canonicalize: fn(&str) -> Option<T>,
}

/// Model rules in priority order.
pub const MODEL_RULES: &[LocatorRule<ModelTarget>] = &[
    LocatorRule {
        name: "archive-entry",
        canonicalize: model_from_archive_entry,
    },
    LocatorRule {
        name: "bare-mesh",
        canonicalize: model_from_bare_mesh,
    },
    LocatorRule {
        name: "resolved-archive",
        canonicalize: model_from_resolved_archive,
    },
];

/// Texture rules in priority order.
pub const TEXTURE_RULES: &[LocatorRule<ResourceRequest>] = &[
    LocatorRule {
        name: "archive-entry",
        canonicalize: texture_from_archive_entry,
    },
    LocatorRule {
        name: "file",
        canonicalize: texture_from_file,
    },
];

/// Resolves home references to fetchable resource paths.
#[derive(Debug, Clone)]
pub struct ResourceLocator {
    /// Directory holding `<name>.zip` model archives.
    pub models_dir: String,
    /// Path template for catalog ids; `{id}` is replaced.
    pub catalog_template: String,
}

impl Default for ResourceLocator {
    fn default() -> Self {
        Self {
            models_dir: "resources/models".to_string(),
            catalog_template: "resources/models/{id}.zip".to_string(),
        }
    }
}

impl ResourceLocator {
    pub fn new(models_dir: impl Into<String>, catalog_template: impl Into<String>) -> Self {
        Self {
            models_dir: models_dir.into(),
            catalog_template: catalog_template.into(),
        }
    }

    /// Resolve an explicit model reference to an archive path.
    pub fn model_reference(&self, reference: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        let target = MODEL_RULES
            .iter()
            .find_map(|rule| (rule.canonicalize)(reference))?;
        Some(match target {
            ModelTarget::Named(name) => {
                format!("{}/{}.zip", self.models_dir.trim_end_matches('/'), name)
            }
            ModelTarget::Path(path) => path,
        })
    }

    /// Synthesize an archive path from a catalog id.
    ///
    /// The id is the text after the last `#` or `/` (`eTeks#bed140x190` → `bed140x190`).
    pub fn catalog_archive(&self, catalog_id: &str) -> Option<String> {
        let id = catalog_id
            .rsplit(|c: char| c == '#' || c == '/')
            .next()
            .unwrap_or(catalog_id)
            .trim();
        if id.is_empty() {
            return None;
        }
        Some(self.catalog_template.replace("{id}", id))
    }

    /// Archive path for a furniture piece: explicit reference first, then catalog id.
    pub fn model_archive(&self, piece: &Furniture) -> Option<String> {
        piece
            .model
            .as_deref()
            .and_then(|m| self.model_reference(m))
            .or_else(|| piece.catalog_id.as_deref().and_then(|id| self.catalog_archive(id)))
    }

    /// Resolve a texture image reference.
    pub fn texture_request(&self, reference: &str) -> Option<ResourceRequest> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }
        TEXTURE_RULES
            .iter()
            .find_map(|rule| (rule.canonicalize)(reference))
    }
}

/// Strip URL scheme prefixes (`jar:`, `file:`, `file://`).
fn strip_scheme(reference: &str) -> &str {
    let s = reference.strip_prefix("jar:").unwrap_or(reference);
    let s = s.strip_prefix("file://").unwrap_or(s);
    s.strip_prefix("file:").unwrap_or(s)
}

/// File name without directories or extension.
fn file_stem(path: &str) -> &str {
    let name = path.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(path);
    match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    }
}

fn has_extension(path: &str, ext: &str) -> bool {
    path.len() > ext.len()
        && path
            .get(path.len() - ext.len()..)
            .map_or(false, |tail| tail.eq_ignore_ascii_case(ext))
}

fn split_archive_entry(reference: &str) -> Option<(&str, &str)> {
    let (archive, entry) = strip_scheme(reference).split_once("!/")?;
    if archive.is_empty() || entry.is_empty() {
        return None;
    }
    Some((archive, entry))
}

fn model_from_archive_entry(reference: &str) -> Option<ModelTarget> {
    let (archive, _) = split_archive_entry(reference)?;
    Some(ModelTarget::Named(file_stem(archive).to_string()))
}

fn model_from_bare_mesh(reference: &str) -> Option<ModelTarget> {
    let path = strip_scheme(reference);
    if !has_extension(path, ".obj") {
        return None;
    }
    Some(ModelTarget::Named(file_stem(path).to_string()))
}

fn model_from_resolved_archive(reference: &str) -> Option<ModelTarget> {
    let path = strip_scheme(reference);
    if !has_extension(path, ".zip") {
        return None;
    }
    Some(ModelTarget::Path(path.to_string()))
}

fn texture_from_archive_entry(reference: &str) -> Option<ResourceRequest> {
    let (archive, entry) = split_archive_entry(reference)?;
    Some(ResourceRequest::ArchiveEntry {
        archive: archive.to_string(),
        entry: entry.to_string(),
    })
}

fn texture_from_file(reference: &str) -> Option<ResourceRequest> {
    Some(ResourceRequest::File(strip_scheme(reference).to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_reference_shapes() {
        let locator = ResourceLocator::default();
        assert_eq!(
            locator.model_reference("jar:file:/home/me/lib/sofa.zip!/sofa/sofa.obj"),
            Some("resources/models/sofa.zip".to_string())
        );
        assert_eq!(
            locator.model_reference("models/chair.OBJ"),
            Some("resources/models/chair.zip".to_string())
        );
        assert_eq!(
            locator.model_reference("file:custom/table.zip"),
            Some("custom/table.zip".to_string())
        );
        assert_eq!(locator.model_reference("lamp.3ds"), None);
        assert_eq!(locator.model_reference("  "), None);
    }

    #[test]
    fn test_catalog_id_convention() {
        let locator = ResourceLocator::default();
        assert_eq!(
            locator.catalog_archive("eTeks#bed140x190"),
            Some("resources/models/bed140x190.zip".to_string())
        );
        assert_eq!(
            locator.catalog_archive("lamp"),
            Some("resources/models/lamp.zip".to_string())
        );
        assert_eq!(locator.catalog_archive("vendor#"), None);
    }

    #[test]
    fn test_explicit_reference_beats_catalog() {
        let locator = ResourceLocator::default();
        let piece = Furniture::new(0.0, 0.0)
            .with_model("desk.obj")
            .with_catalog_id("eTeks#table");
        assert_eq!(
            locator.model_archive(&piece),
            Some("resources/models/desk.zip".to_string())
        );

        let unmatched = Furniture::new(0.0, 0.0)
            .with_model("desk.3ds")
            .with_catalog_id("eTeks#table");
        assert_eq!(
            locator.model_archive(&unmatched),
            Some("resources/models/table.zip".to_string())
        );

        assert_eq!(locator.model_archive(&Furniture::new(0.0, 0.0)), None);
    }

    #[test]
    fn test_texture_requests() {
        let locator = ResourceLocator::default();
        assert_eq!(
            locator.texture_request("jar:file:textures/lib.zip!/wood/oak.jpg"),
            Some(ResourceRequest::ArchiveEntry {
                archive: "textures/lib.zip".to_string(),
                entry: "wood/oak.jpg".to_string(),
            })
        );
        assert_eq!(
            locator.texture_request("file:textures/tile.png"),
            Some(ResourceRequest::File("textures/tile.png".to_string()))
        );
        assert_eq!(locator.texture_request(""), None);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<_> = MODEL_RULES.iter().map(|r| r.name).collect();
        assert_eq!(names, ["archive-entry", "bare-mesh", "resolved-archive"]);
    }
}
