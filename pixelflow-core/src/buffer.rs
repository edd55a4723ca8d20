//! Local mirror of the remote canvas contents.

use crate::message::{Color, ColorMode};

/// Row-major pixel storage, `channels` bytes per pixel.
///
/// Coordinates are signed so callers can pass anything and get `None`
/// back for positions outside the canvas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u16,
    height: u16,
    color_mode: ColorMode,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A zero-filled buffer.
    pub fn new(width: u16, height: u16, color_mode: ColorMode) -> Self {
        let len = width as usize * height as usize * color_mode.channels();
        Self {
            width,
            height,
            color_mode,
            data: vec![0; len],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        self.color_mode.channels()
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && x < self.width as i32 && y < self.height as i32
    }

    /// Byte offset of `(x, y)`, or `None` outside the canvas.
    pub fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if !self.contains(x, y) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * self.channels())
    }

    /// Store `color` at `(x, y)`. Returns `false` (and changes nothing)
    /// outside the canvas.
    ///
    /// In palette mode only `color.r` is stored.
    pub fn write(&mut self, x: i32, y: i32, color: Color) -> bool {
        let Some(offset) = self.offset(x, y) else {
            return false;
        };
        match self.color_mode {
            ColorMode::Rgb => {
                self.data[offset..offset + 3].copy_from_slice(&[color.r, color.g, color.b]);
            }
            ColorMode::Palette => self.data[offset] = color.r,
        }
        true
    }

    /// The stored value at `(x, y)`, [`Color::BLACK`] outside the canvas.
    pub fn read(&self, x: i32, y: i32) -> Color {
        let Some(offset) = self.offset(x, y) else {
            return Color::BLACK;
        };
        match self.color_mode {
            ColorMode::Rgb => Color::rgb(
                self.data[offset],
                self.data[offset + 1],
                self.data[offset + 2],
            ),
            ColorMode::Palette => Color::index(self.data[offset]),
        }
    }

    /// Zero every byte, keeping the geometry.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Raw contents in wire order.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────────
