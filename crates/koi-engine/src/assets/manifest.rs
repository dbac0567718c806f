use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::pixmap::{Pixmap, Rgba8};

/// Asset manifest describing all named sprites (and, optionally, entity
/// prototypes) for a simulation. Loaded from a JSON string at startup.
///
/// Sprites are stored as rows of palette characters:
///
/// ```json
/// {
///     "palette": { ".": "transparent", "o": "#E86A17" },
///     "sprites": { "bait": { "rows": [".o.", "ooo", ".o."] } }
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteManifest {
    /// Palette character → color. Colors are "#RRGGBB", "#RRGGBBAA" or the
    /// word "transparent".
    pub palette: HashMap<char, String>,
    /// Named sprite grids.
    pub sprites: HashMap<String, SpriteGrid>,
    /// Optional entity prototypes keyed by kind identifier.
    #[serde(default)]
    pub prototypes: HashMap<String, PrototypeDescriptor>,
}

/// Pixel rows of a single sprite; every row must have the same width.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteGrid {
    pub rows: Vec<String>,
}

/// Describes how to build an entity of a given kind: which image it wears,
/// which layer it lives on, and optionally a pivot and a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrototypeDescriptor {
    /// Name of a sprite in this manifest.
    pub image: String,
    /// Render layer as its u8 value.
    pub layer: u8,
    /// Pivot override; defaults to the image's geometric center.
    #[serde(default)]
    pub center: Option<[i32; 2]>,
    /// Entity tag; defaults to the kind identifier.
    #[serde(default)]
    pub tag: Option<String>,
}

/// Manifest problems. All of these are configuration errors: they surface
/// at load time and abort startup rather than degrade into broken pixels.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("palette color {entry:?} is not #RRGGBB, #RRGGBBAA or \"transparent\"")]
    BadColor { entry: String },
    #[error("sprite {sprite:?} uses {ch:?} which is not in the palette")]
    UnknownChar { sprite: String, ch: char },
    #[error("sprite {sprite:?} has rows of differing widths")]
    RaggedRows { sprite: String },
    #[error("sprite {sprite:?} has no pixels")]
    EmptySprite { sprite: String },
    #[error("prototype {kind:?} uses layer {layer} which does not exist")]
    BadLayer { kind: String, layer: u8 },
    #[error("prototype {kind:?} references unknown sprite {image:?}")]
    UnknownImage { kind: String, image: String },
}

impl SpriteManifest {
    /// Parse a manifest from a JSON string. Only checks JSON shape — sprite
    /// contents are validated when they are decoded.
    pub fn from_json(json: &str) -> Result<Self, ManifestError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the palette into concrete colors.
    pub fn decode_palette(&self) -> Result<HashMap<char, Rgba8>, ManifestError> {
        let mut palette = HashMap::with_capacity(self.palette.len());
        for (&ch, entry) in &self.palette {
            let color = parse_color(entry).ok_or_else(|| ManifestError::BadColor {
                entry: entry.clone(),
            })?;
            palette.insert(ch, color);
        }
        Ok(palette)
    }

    /// Decode one sprite grid into a pixmap using a decoded palette.
    pub fn decode_sprite(
        &self,
        name: &str,
        grid: &SpriteGrid,
        palette: &HashMap<char, Rgba8>,
    ) -> Result<Pixmap, ManifestError> {
        let height = grid.rows.len() as u32;
        let width = grid
            .rows
            .first()
            .map_or(0, |row| row.chars().count() as u32);
        if width == 0 || height == 0 {
            return Err(ManifestError::EmptySprite {
                sprite: name.to_string(),
            });
        }

        let mut pixmap = Pixmap::new(width, height);
        for (y, row) in grid.rows.iter().enumerate() {
            if row.chars().count() as u32 != width {
                return Err(ManifestError::RaggedRows {
                    sprite: name.to_string(),
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let color = palette.get(&ch).ok_or_else(|| ManifestError::UnknownChar {
                    sprite: name.to_string(),
                    ch,
                })?;
                pixmap.put(x as i32, y as i32, *color);
            }
        }
        Ok(pixmap)
    }
}

/// Parse "#RRGGBB", "#RRGGBBAA" or "transparent". Case-insensitive hex.
fn parse_color(entry: &str) -> Option<Rgba8> {
    if entry.eq_ignore_ascii_case("transparent") {
        return Some(Rgba8::TRANSPARENT);
    }
    let hex = entry.strip_prefix('#')?;
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let r = byte(0)?;
    let g = byte(2)?;
    let b = byte(4)?;
    let a = if hex.len() == 8 { byte(6)? } else { 255 };
    Some(Rgba8::new(r, g, b, a))
}
