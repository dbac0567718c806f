//! Software RGBA surface — every image in the engine, including the shared
//! canvas, is a Pixmap. Supplies the copy/crop/rotate/mirror/blit primitives
//! the transform pipeline is built on.

use bytemuck::{Pod, Zeroable};
use glam::UVec2;

use crate::core::geometry::sin_cos_degrees;

/// One RGBA pixel, straight (non-premultiplied) alpha.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }
}

/// Owned 2D pixel buffer, row-major, top-left origin, y growing downward.
///
/// Reads outside the buffer return transparent pixels and writes outside are
/// dropped, so callers can blit and crop with unclamped coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Pixmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba8>,
}

impl Pixmap {
    /// Create a fully transparent pixmap. A zero-area pixmap is valid and
    /// simply holds no pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba8::TRANSPARENT; width as usize * height as usize],
        }
    }

    /// Create from an existing pixel vector. Returns None when the vector
    /// length does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba8>) -> Option<Self> {
        if pixels.len() != width as usize * height as usize {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> UVec2 {
        UVec2::new(self.width, self.height)
    }

    /// Whether either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some((y as u32 * self.width + x as u32) as usize)
    }

    /// Read a pixel; out-of-bounds reads are transparent.
    pub fn get(&self, x: i32, y: i32) -> Rgba8 {
        match self.index(x, y) {
            Some(i) => self.pixels[i],
            None => Rgba8::TRANSPARENT,
        }
    }

    /// Write a pixel; out-of-bounds writes are dropped.
    pub fn put(&mut self, x: i32, y: i32, pixel: Rgba8) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = pixel;
        }
    }

    /// Fill the whole surface with one color.
    pub fn fill(&mut self, color: Rgba8) {
        self.pixels.fill(color);
    }

    /// Copy a `width` x `height` region starting at (x, y). Regions reaching
    /// outside the source are padded with transparency rather than clipped.
    pub fn crop(&self, x: i32, y: i32, width: u32, height: u32) -> Pixmap {
        let mut out = Pixmap::new(width, height);
        for dy in 0..height as i32 {
            for dx in 0..width as i32 {
                let pixel = self.get(x + dx, y + dy);
                if pixel.a != 0 {
                    out.put(dx, dy, pixel);
                }
            }
        }
        out
    }

    /// Copy with columns reversed (reflection across the vertical axis).
    pub fn mirrored_x(&self) -> Pixmap {
        let mut out = Pixmap::new(self.width, self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.put(self.width as i32 - 1 - x, y, self.get(x, y));
            }
        }
        out
    }

    /// Copy with rows reversed (reflection across the horizontal axis).
    pub fn mirrored_y(&self) -> Pixmap {
        let mut out = Pixmap::new(self.width, self.height);
        for y in 0..self.height as i32 {
            for x in 0..self.width as i32 {
                out.put(x, self.height as i32 - 1 - y, self.get(x, y));
            }
        }
        out
    }

    /// Copy rotated by `degrees` about the surface center, same dimensions.
    /// Positive angles turn in the +x-toward-+y direction (clockwise on
    /// screen). Destination pixels are inverse-mapped onto the source and
    /// sampled nearest-neighbour at pixel centers; 0 degrees is an exact copy.
    pub fn rotated(&self, degrees: f64) -> Pixmap {
        if degrees == 0.0 {
            return self.clone();
        }
        let mut out = Pixmap::new(self.width, self.height);
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0;
        let (sin, cos) = sin_cos_degrees(degrees);
        for dy in 0..self.height as i32 {
            for dx in 0..self.width as i32 {
                let vx = dx as f64 + 0.5 - cx;
                let vy = dy as f64 + 0.5 - cy;
                // Inverse of the forward rotation [cos -sin; sin cos].
                let sx = vx * cos + vy * sin + cx;
                let sy = -vx * sin + vy * cos + cy;
                let pixel = self.get(sx.floor() as i32, sy.floor() as i32);
                if pixel.a != 0 {
                    out.put(dx, dy, pixel);
                }
            }
        }
        out
    }

    /// Blit `src` with its top-left corner at (x, y), source-over.
    pub fn draw_pixmap(&mut self, src: &Pixmap, x: i32, y: i32) {
        self.draw_pixmap_faded(src, x, y, 255);
    }

    /// Blit with an extra 0-255 transparency scalar applied to the source
    /// (255 = as-is, 0 = draws nothing).
    pub fn draw_pixmap_faded(&mut self, src: &Pixmap, x: i32, y: i32, fade: u8) {
        if fade == 0 {
            return;
        }
        for sy in 0..src.height as i32 {
            for sx in 0..src.width as i32 {
                let pixel = src.get(sx, sy);
                if pixel.a == 0 {
                    continue;
                }
                let dx = x + sx;
                let dy = y + sy;
                if let Some(i) = self.index(dx, dy) {
                    self.pixels[i] = blend(pixel, self.pixels[i], fade);
                }
            }
        }
    }

    /// Borrow the pixels as raw bytes (RGBA order) for the display-scaling
    /// collaborator.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixels(&self) -> &[Rgba8] {
        &self.pixels
    }
}

/// Porter-Duff source-over with a 0-255 fade on the source alpha.
fn blend(src: Rgba8, dst: Rgba8, fade: u8) -> Rgba8 {
    // Opaque source over anything, or anything over a blank pixel, needs no
    // arithmetic and stays byte-exact.
    if fade == 255 {
        if src.a == 255 {
            return src;
        }
        if dst.a == 0 {
            return src;
        }
    }

    let src_alpha = (src.a as f32 / 255.0) * (fade as f32 / 255.0);
    if src_alpha == 0.0 {
        return dst;
    }
    let dst_alpha = dst.a as f32 / 255.0;
    let out_alpha = src_alpha + dst_alpha * (1.0 - src_alpha);

    let channel = |s: u8, d: u8| -> u8 {
        let s = s as f32 / 255.0;
        let d = d as f32 / 255.0;
        let c = (s * src_alpha + d * dst_alpha * (1.0 - src_alpha)) / out_alpha;
        (c.clamp(0.0, 1.0) * 255.0).round() as u8
    };

    Rgba8::new(
        channel(src.r, dst.r),
        channel(src.g, dst.g),
        channel(src.b, dst.b),
        (out_alpha * 255.0).round() as u8,
    )
}
