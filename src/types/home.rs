//! The architectural model read by the exporter.
//!
//! Every field is optional on the wire; absent values fall back to the
//! documented defaults rather than failing the export.

use crate::error::{ExportError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A house design: walls, rooms and furniture in source-list order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Home {
    pub walls: Vec<Wall>,
    pub rooms: Vec<Room>,
    pub furniture: Vec<Furniture>,
}

impl Home {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a home from JSON. A literal `null` is a missing home.
    pub fn from_json(text: &str) -> Result<Self> {
        let home: Option<Home> = serde_json::from_str(text)?;
        home.ok_or(ExportError::MissingHome)
    }

    /// Total number of walls, rooms and furniture pieces.
    pub fn item_count(&self) -> usize {
        self.walls.len() + self.rooms.len() + self.furniture.len()
    }

    /// Returns `true` if the home has no elements at all.
    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    pub fn with_wall(mut self, wall: Wall) -> Self {
        self.walls.push(wall);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }

    pub fn with_furniture(mut self, piece: Furniture) -> Self {
        self.furniture.push(piece);
        self
    }
}

/// A straight wall between two plan points, in centimeters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Wall {
    pub start: [f32; 2],
    pub end: [f32; 2],
    /// `None` uses [`ExportConfig::default_wall_height`](crate::ExportConfig).
    pub height: Option<f32>,
    /// `None` uses [`ExportConfig::default_wall_thickness`](crate::ExportConfig).
    pub thickness: Option<f32>,
    pub left_color: Option<Color>,
    pub right_color: Option<Color>,
    pub left_texture: Option<SurfaceTexture>,
    pub right_texture: Option<SurfaceTexture>,
}

impl Wall {
    pub fn new(start: [f32; 2], end: [f32; 2]) -> Self {
        Self {
            start,
            end,
            ..Default::default()
        }
    }

    pub fn with_height(mut self, height: f32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_thickness(mut self, thickness: f32) -> Self {
        self.thickness = Some(thickness);
        self
    }

    /// Length of the wall centerline.
    pub fn length(&self) -> f32 {
        let dx = self.end[0] - self.start[0];
        let dy = self.end[1] - self.start[1];
        (dx * dx + dy * dy).sqrt()
    }

    pub fn left_side(&self) -> Surface<'_> {
        Surface {
            color: self.left_color,
            texture: self.left_texture.as_ref(),
        }
    }

    pub fn right_side(&self) -> Surface<'_> {
        Surface {
            color: self.right_color,
            texture: self.right_texture.as_ref(),
        }
    }

    /// Returns `true` if the right side carries its own color or texture.
    pub fn has_right_override(&self) -> bool {
        self.right_color.is_some() || self.right_texture.is_some()
    }
}

/// A room polygon with floor and ceiling surfaces.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Room {
    pub name: Option<String>,
    /// Polygon points, implicitly closed.
    pub points: Vec<[f32; 2]>,
    pub floor_color: Option<Color>,
    pub floor_texture: Option<SurfaceTexture>,
    pub ceiling_color: Option<Color>,
    pub ceiling_texture: Option<SurfaceTexture>,
    pub floor_visible: bool,
    pub ceiling_visible: bool,
}

impl Default for Room {
    fn default() -> Self {
        Self {
            name: None,
            points: Vec::new(),
            floor_color: None,
            floor_texture: None,
            ceiling_color: None,
            ceiling_texture: None,
            floor_visible: true,
            ceiling_visible: true,
        }
    }
}

impl Room {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self {
            points,
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn floor(&self) -> Surface<'_> {
        Surface {
            color: self.floor_color,
            texture: self.floor_texture.as_ref(),
        }
    }

    pub fn ceiling(&self) -> Surface<'_> {
        Surface {
            color: self.ceiling_color,
            texture: self.ceiling_texture.as_ref(),
        }
    }

    /// Plan area in square centimeters (shoelace formula).
    pub fn area(&self) -> f32 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut twice = 0.0;
        for i in 0..n {
            let [x0, y0] = self.points[i];
            let [x1, y1] = self.points[(i + 1) % n];
            twice += x0 * y1 - x1 * y0;
        }
        (twice * 0.5).abs()
    }
}

/// A furniture placement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Furniture {
    pub name: Option<String>,
    /// Catalog identifier, e.g. `eTeks#bed140x190`.
    pub catalog_id: Option<String>,
    /// Model reference in any of the supported URL shapes.
    pub model: Option<String>,
    /// Center of the footprint on the plan.
    pub x: f32,
    pub y: f32,
    /// Height of the bottom above the floor.
    pub elevation: f32,
    /// Yaw in radians, clockwise on the plan.
    pub angle: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub color: Option<Color>,
    pub visible: bool,
}

impl Default for Furniture {
    fn default() -> Self {
        Self {
            name: None,
            catalog_id: None,
            model: None,
            x: 0.0,
            y: 0.0,
            elevation: 0.0,
            angle: 0.0,
            width: 100.0,
            depth: 100.0,
            height: 100.0,
            color: None,
            visible: true,
        }
    }
}

impl Furniture {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Default::default()
        }
    }

    pub fn with_size(mut self, width: f32, depth: f32, height: f32) -> Self {
        self.width = width;
        self.depth = depth;
        self.height = height;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_catalog_id(mut self, id: impl Into<String>) -> Self {
        self.catalog_id = Some(id.into());
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Name for log messages.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.catalog_id.as_deref())
            .unwrap_or("<unnamed>")
    }
}

/// Texture applied to a wall side, floor or ceiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceTexture {
    /// Image resource reference.
    pub image: String,
    /// Width of one texture repeat, in centimeters.
    pub width: f32,
    /// Height of one texture repeat, in centimeters.
    pub height: f32,
    pub x_offset: f32,
    pub y_offset: f32,
    /// Rotation in radians.
    pub angle: f32,
    pub scale: f32,
}

impl Default for SurfaceTexture {
    fn default() -> Self {
        Self {
            image: String::new(),
            width: 100.0,
            height: 100.0,
            x_offset: 0.0,
            y_offset: 0.0,
            angle: 0.0,
            scale: 1.0,
        }
    }
}

impl SurfaceTexture {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            ..Default::default()
        }
    }
}

/// Borrowed view of one surface's appearance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Surface<'a> {
    pub color: Option<Color>,
    pub texture: Option<&'a SurfaceTexture>,
}

impl<'a> Surface<'a> {
    pub fn color(color: Color) -> Self {
        Self {
            color: Some(color),
            texture: None,
        }
    }

    /// Returns `true` if neither color nor texture is set.
    pub fn is_plain(&self) -> bool {
        self.color.is_none() && self.texture.is_none()
    }
}

/// An RGB color packed as `0xRRGGBB`.
///
/// Deserializes from an integer (alpha bits are discarded, so negative
/// ARGB ints work) or a `"#RRGGBB"` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u32);

impl Color {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Channels as 0-255 values.
    pub fn channels(&self) -> [u8; 3] {
        [
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        ]
    }

    /// Channels as 0-1 floats.
    pub fn to_unit(&self) -> [f32; 3] {
        let [r, g, b] = self.channels();
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0]
    }

    /// Parse `#RRGGBB`, `RRGGBB` or `0xRRGGBB`.
    pub fn from_hex(text: &str) -> Option<Self> {
        let digits = text
            .trim()
            .trim_start_matches('#')
            .trim_start_matches("0x");
        if digits.is_empty() || digits.len() > 8 {
            return None;
        }
        u32::from_str_radix(digits, 16)
            .ok()
            .map(|v| Self(v & 0x00FF_FFFF))
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Hex(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Int(v) => Ok(Color((v as u32) & 0x00FF_FFFF)),
            Raw::Hex(s) => Color::from_hex(&s)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid color '{}'", s))),
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let [r, g, b] = self.channels();
        serializer.serialize_str(&format!("#{:02X}{:02X}{:02X}", r, g, b))
    }
}
