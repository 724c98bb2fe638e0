//! Texture assets, deduplicated by content.

use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// An image file written next to the exported mesh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureAsset {
    /// Flat file name, e.g. `texture_0.png`.
    pub file_name: String,
    /// Image bytes, stored untouched.
    pub data: Vec<u8>,
}

/// Registered textures in insertion order.
///
/// Two registrations with byte-identical payloads share one asset regardless
/// of where they came from.
#[derive(Debug, Clone, Default)]
pub struct TextureStore {
    assets: Vec<TextureAsset>,
    by_digest: HashMap<[u8; 32], Vec<usize>>,
}

impl TextureStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register image bytes and return the asset's file name.
    pub fn register(&mut self, data: Vec<u8>) -> String {
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&Sha256::digest(&data));
        let bucket = self.by_digest.entry(digest).or_default();

        // Digest equality narrows the search; identity is the byte comparison.
        if let Some(&idx) = bucket.iter().find(|&&idx| self.assets[idx].data == data) {
            return self.assets[idx].file_name.clone();
        }

        let idx = self.assets.len();
        let file_name = format!("texture_{}.{}", idx, sniff_extension(&data));
        bucket.push(idx);
        self.assets.push(TextureAsset {
            file_name: file_name.clone(),
            data,
        });
        file_name
    }

    pub fn assets(&self) -> &[TextureAsset] {
        &self.assets
    }

    pub fn into_assets(self) -> Vec<TextureAsset> {
        self.assets
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

/// File extension for image bytes, `png` when the format is unknown.
fn sniff_extension(data: &[u8]) -> &'static str {
    image::guess_format(data)
        .ok()
        .and_then(|format| format.extensions_str().first().copied())
        .unwrap_or("png")
}
