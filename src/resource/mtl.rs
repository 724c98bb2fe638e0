//! Wavefront MTL material-library parsing.

use std::collections::HashMap;

/// One material record from an MTL file. Unset channels stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MtlMaterial {
    pub name: String,
    pub ambient: Option<[f32; 3]>,
    pub diffuse: Option<[f32; 3]>,
    pub specular: Option<[f32; 3]>,
    pub shininess: Option<f32>,
    /// `d`, or `1 - Tr`.
    pub opacity: Option<f32>,
    /// Bare file name from `map_Kd`.
    pub diffuse_map: Option<String>,
}

/// Materials keyed by lower-cased name.
#[derive(Debug, Clone, Default)]
pub struct MtlLibrary {
    materials: HashMap<String, MtlMaterial>,
}

impl MtlLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&MtlMaterial> {
        self.materials.get(&name.to_lowercase())
    }

    pub fn insert(&mut self, material: MtlMaterial) {
        self.materials.insert(material.name.to_lowercase(), material);
    }

    pub fn len(&self) -> usize {
        self.materials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }
}

/// Parse MTL text. Malformed statements are skipped.
pub fn parse_mtl(text: &str) -> MtlLibrary {
    let mut library = MtlLibrary::new();
    let mut current: Option<MtlMaterial> = None;

    for (line_idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };
        let args: Vec<&str> = parts.collect();

        if keyword == "newmtl" {
            if let Some(done) = current.take() {
                library.insert(done);
            }
            let name = args.join(" ");
            if name.is_empty() {
                tracing::debug!(line = line_idx + 1, "Skipping unnamed newmtl");
                continue;
            }
            current = Some(MtlMaterial {
                name,
                ..Default::default()
            });
            continue;
        }

        let Some(material) = current.as_mut() else {
            continue;
        };
        match keyword {
            "Ka" => set(&mut material.ambient, parse_rgb(&args)),
            "Kd" => set(&mut material.diffuse, parse_rgb(&args)),
            "Ks" => set(&mut material.specular, parse_rgb(&args)),
            "Ns" => set(&mut material.shininess, args.first().and_then(|s| parse_finite(s))),
            "d" => set(&mut material.opacity, args.last().and_then(|s| parse_finite(s))),
            "Tr" => set(
                &mut material.opacity,
                args.last().and_then(|s| parse_finite(s)).map(|tr| 1.0 - tr),
            ),
            "map_Kd" => set(
                &mut material.diffuse_map,
                args.last().map(|s| bare_file_name(s).to_string()),
            ),
            _ => {}
        }
    }

    if let Some(done) = current {
        library.insert(done);
    }
    library
}

/// Overwrite only with a successfully parsed value.
fn set<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

fn parse_finite(token: &str) -> Option<f32> {
    token.parse::<f32>().ok().filter(|v| v.is_finite())
}

fn parse_rgb(args: &[&str]) -> Option<[f32; 3]> {
    let r = parse_finite(args.first()?)?;
    // A single value means grey.
    let g = match args.get(1) {
        Some(s) => parse_finite(s)?,
        None => r,
    };
    let b = match args.get(2) {
        Some(s) => parse_finite(s)?,
        None => r,
    };
    Some([r, g, b])
}

/// Strip directories from a texture path (`maps\wood.jpg` → `wood.jpg`).
pub fn bare_file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}
