//! Protocol message types and the mode enums they carry.
//!
//! Unknown bytes surface as errors through `TryFrom`, never as panics.
//! Every mode can be built from its wire byte or its lowercase name; both
//! conversions fail with [`CanvasError::InvalidConfig`].

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::CanvasError;

// ── Opcode ───────────────────────────────────────────────────────

/// First byte of every message on the wire.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `width:u16, height:u16`.
    Resize = 1,
    /// `mode:u8`.
    SetColorMode = 2,
    /// `index:u8, r:u8, g:u8, b:u8`.
    SetPalette = 3,
    /// `mode:u8`.
    SetAdvanceMode = 4,
    /// `x, y`, each one or two bytes depending on the canvas size.
    MoveCursor = 5,
    /// One or three channel bytes depending on the color mode.
    SetPixel = 6,
    /// The whole pixel buffer.
    Flush = 7,
}

impl TryFrom<u8> for Opcode {
    type Error = CanvasError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Opcode::Resize),
            2 => Ok(Opcode::SetColorMode),
            3 => Ok(Opcode::SetPalette),
            4 => Ok(Opcode::SetAdvanceMode),
            5 => Ok(Opcode::MoveCursor),
            6 => Ok(Opcode::SetPixel),
            7 => Ok(Opcode::Flush),
            _ => Err(CanvasError::UnknownOpcode(value)),
        }
    }
}

// ── Modes ────────────────────────────────────────────────────────

macro_rules! wire_mode {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident = $byte:literal => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(u8)]
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $byte ),+
        }

        impl $name {
            /// The byte sent on the wire for this mode.
            pub const fn wire_value(self) -> u8 {
                self as u8
            }

            /// Lowercase name, as used in config files.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $label ),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = CanvasError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $byte => Ok($name::$variant), )+
                    _ => Err(CanvasError::invalid($kind, value)),
                }
            }
        }

        impl FromStr for $name {
            type Err = CanvasError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.to_ascii_lowercase().as_str() {
                    $( $label => Ok($name::$variant), )+
                    _ => Err(CanvasError::invalid($kind, s)),
                }
            }
        }

        impl TryFrom<&str> for $name {
            type Error = CanvasError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                value.parse()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_mode! {
    /// How many channels a pixel carries.
    ColorMode, "color mode" {
        /// Three bytes per pixel: red, green, blue.
        #[default]
        Rgb = 0 => "rgb",
        /// One byte per pixel: an index into the remote palette.
        Palette = 1 => "palette",
    }
}

wire_mode! {
    /// Which way the cursor moves after each pixel write.
    AdvanceMode, "advance mode" {
        /// Row-major: `x += 1`, wrapping to the next row.
        #[default]
        Right = 0 => "right",
        /// Column-major: `y += 1`, wrapping to the next column.
        Down = 1 => "down",
    }
}

wire_mode! {
    /// When pixel writes reach the remote display.
    ///
    /// Purely local: changing it sends nothing.
    DrawMode, "draw mode" {
        /// Every pixel write is sent immediately.
        #[default]
        Direct = 0 => "direct",
        /// Pixel writes only touch the local buffer until `flip()`.
        Buffered = 1 => "buffered",
    }
}

impl ColorMode {
    /// Bytes per pixel in this mode.
    pub const fn channels(self) -> usize {
        match self {
            ColorMode::Rgb => 3,
            ColorMode::Palette => 1,
        }
    }
}

// ── Color ────────────────────────────────────────────────────────

/// A pixel value.
///
/// In [`ColorMode::Palette`] only `r` is meaningful and holds the palette
/// index; `g` and `b` are ignored on write and read back as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// All channels zero; also what out-of-bounds reads return.
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A palette-mode value.
    pub const fn index(i: u8) -> Self {
        Self { r: i, g: 0, b: 0 }
    }
}

impl From<u8> for Color {
    fn from(i: u8) -> Self {
        Color::index(i)
    }
}

impl From<(u8, u8, u8)> for Color {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Color::rgb(r, g, b)
    }
}

impl From<[u8; 3]> for Color {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Color::rgb(r, g, b)
    }
}

// ── Message ──────────────────────────────────────────────────────

/// One protocol message, in the form it takes on the wire.
///
/// Field values are the exact bytes that get sent; the scaling rule for
/// palette entries is applied by [`Message::palette`], not by the codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Resize { width: u16, height: u16 },
    SetColorMode(ColorMode),
    SetPalette { index: u8, r: u8, g: u8, b: u8 },
    SetAdvanceMode(AdvanceMode),
    MoveCursor { x: u16, y: u16 },
    SetPixel(Color),
    Flush(Bytes),
}

impl Message {
    /// Build a palette entry from loosely-typed input.
    ///
    /// The index is taken modulo 256. Each channel is taken modulo 64 and
    /// shifted left by two, spreading the 6-bit range over a full byte.
    pub fn palette(index: i32, r: i32, g: i32, b: i32) -> Self {
        let scale = |c: i32| (c.rem_euclid(64) << 2) as u8;
        Message::SetPalette {
            index: index.rem_euclid(256) as u8,
            r: scale(r),
            g: scale(g),
            b: scale(b),
        }
    }

    /// Opcode this message is sent under.
    pub fn opcode(&self) -> Opcode {
        match self {
            Message::Resize { .. } => Opcode::Resize,
            Message::SetColorMode(_) => Opcode::SetColorMode,
            Message::SetPalette { .. } => Opcode::SetPalette,
            Message::SetAdvanceMode(_) => Opcode::SetAdvanceMode,
            Message::MoveCursor { .. } => Opcode::MoveCursor,
            Message::SetPixel(_) => Opcode::SetPixel,
            Message::Flush(_) => Opcode::Flush,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}
