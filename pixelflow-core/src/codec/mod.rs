//! Wire codec for the pixelflow protocol.
//!
//! Messages have no length prefix, so both sides have to agree on the size
//! of every payload. Two of them depend on canvas state:
//!
//! ```text
//! MoveCursor  05 x y        x is 1 byte if width  <= 256, else u16 BE
//!                           y is 1 byte if height <= 256, else u16 BE
//! SetPixel    06 c [c c]    1 byte in palette mode, 3 in rgb mode
//! Flush       07 ...        width * height * channels raw bytes
//! ```
//!
//! [`WireCodec`] therefore tracks the geometry and color mode of every
//! `Resize` / `SetColorMode` it encodes or decodes.

use bytes::{Buf, BufMut, BytesMut};

use crate::error::CanvasError;
use crate::message::{AdvanceMode, Color, ColorMode, Message, Opcode};

/// Largest dimension whose coordinates still travel as a single byte.
pub const SHORT_COORD_LIMIT: u16 = 256;

/// Canvas size the remote display starts out with.
pub const DEFAULT_WIDTH: u16 = 320;
pub const DEFAULT_HEIGHT: u16 = 180;

/// Stateful encoder/decoder for pixelflow messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WireCodec {
    width: u16,
    height: u16,
    color_mode: ColorMode,
}

impl Default for WireCodec {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, ColorMode::Rgb)
    }
}

impl WireCodec {
    pub fn new(width: u16, height: u16, color_mode: ColorMode) -> Self {
        Self {
            width,
            height,
            color_mode,
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

    /// Bytes carried by a `Flush` under the current state.
    pub fn frame_len(&self) -> usize {
        self.width as usize * self.height as usize * self.color_mode.channels()
    }

    /// Size of one encoded `MoveCursor` under the current state.
    pub fn move_cursor_len(&self) -> usize {
        1 + coord_len(self.width) + coord_len(self.height)
    }

    fn track(&mut self, msg: &Message) {
        match msg {
            Message::Resize { width, height } => {
                self.width = *width;
                self.height = *height;
            }
            Message::SetColorMode(mode) => self.color_mode = *mode,
            _ => {}
        }
    }

    /// Append `msg` to `dst`.
    pub fn encode(&mut self, msg: &Message, dst: &mut BytesMut) {
        dst.put_u8(msg.opcode() as u8);
        match msg {
            Message::Resize { width, height } => {
                dst.put_u16(*width);
                dst.put_u16(*height);
            }
            Message::SetColorMode(mode) => dst.put_u8(mode.wire_value()),
            Message::SetPalette { index, r, g, b } => {
                dst.put_slice(&[*index, *r, *g, *b]);
            }
            Message::SetAdvanceMode(mode) => dst.put_u8(mode.wire_value()),
            Message::MoveCursor { x, y } => {
                put_coord(dst, *x, self.width);
                put_coord(dst, *y, self.height);
            }
            Message::SetPixel(color) => match self.color_mode {
                ColorMode::Rgb => dst.put_slice(&[color.r, color.g, color.b]),
                ColorMode::Palette => dst.put_u8(color.r),
            },
            Message::Flush(frame) => dst.put_slice(frame),
        }
        self.track(msg);
    }

    /// Encode a single message into a fresh buffer.
    pub fn encode_to_vec(&mut self, msg: &Message) -> Vec<u8> {
        let mut dst = BytesMut::new();
        self.encode(msg, &mut dst);
        dst.to_vec()
    }

    /// Take one message off the front of `src`.
    ///
    /// Returns `Ok(None)` and leaves `src` untouched when the message is
    /// not complete yet. Errors (unknown opcode, bad mode byte) consume
    /// nothing either, and leave the tracked state unchanged.
    pub fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Message>, CanvasError> {
        let Some(&first) = src.first() else {
            return Ok(None);
        };
        let opcode = Opcode::try_from(first)?;

        let body_len = match opcode {
            Opcode::Resize => 4,
            Opcode::SetColorMode | Opcode::SetAdvanceMode => 1,
            Opcode::SetPalette => 4,
            Opcode::MoveCursor => self.move_cursor_len() - 1,
            Opcode::SetPixel => self.color_mode.channels(),
            Opcode::Flush => self.frame_len(),
        };
        if src.len() < 1 + body_len {
            return Ok(None);
        }
        match opcode {
            Opcode::SetColorMode => {
                ColorMode::try_from(src[1])?;
            }
            Opcode::SetAdvanceMode => {
                AdvanceMode::try_from(src[1])?;
            }
            _ => {}
        }
        src.advance(1);

        let msg = match opcode {
            Opcode::Resize => Message::Resize {
                width: src.get_u16(),
                height: src.get_u16(),
            },
            Opcode::SetColorMode => Message::SetColorMode(ColorMode::try_from(src.get_u8())?),
            Opcode::SetPalette => Message::SetPalette {
                index: src.get_u8(),
                r: src.get_u8(),
                g: src.get_u8(),
                b: src.get_u8(),
            },
            Opcode::SetAdvanceMode => {
                Message::SetAdvanceMode(AdvanceMode::try_from(src.get_u8())?)
            }
            Opcode::MoveCursor => Message::MoveCursor {
                x: get_coord(src, self.width),
                y: get_coord(src, self.height),
            },
            Opcode::SetPixel => Message::SetPixel(match self.color_mode {
                ColorMode::Rgb => Color::rgb(src.get_u8(), src.get_u8(), src.get_u8()),
                ColorMode::Palette => Color::index(src.get_u8()),
            }),
            Opcode::Flush => Message::Flush(src.split_to(body_len).freeze()),
        };
        self.track(&msg);
        Ok(Some(msg))
    }

    /// Decode every complete message in `src`, leaving any trailing
    /// partial message in place.
    pub fn decode_all(&mut self, src: &mut BytesMut) -> Result<Vec<Message>, CanvasError> {
        let mut out = Vec::new();
        while let Some(msg) = self.decode(src)? {
            out.push(msg);
        }
        Ok(out)
    }
}

fn coord_len(dimension: u16) -> usize {
    if dimension <= SHORT_COORD_LIMIT { 1 } else { 2 }
}

fn put_coord(dst: &mut BytesMut, value: u16, dimension: u16) {
    if dimension <= SHORT_COORD_LIMIT {
        dst.put_u8(value as u8);
    } else {
        dst.put_u16(value);
    }
}

fn get_coord(src: &mut BytesMut, dimension: u16) -> u16 {
    if dimension <= SHORT_COORD_LIMIT {
        src.get_u8() as u16
    } else {
        src.get_u16()
    }
}

/// Decode a captured byte stream from the display's initial state.
pub fn decode_stream(bytes: &[u8]) -> Result<Vec<Message>, CanvasError> {
    let mut src = BytesMut::from(bytes);
    let messages = WireCodec::default().decode_all(&mut src)?;
    if !src.is_empty() {
        return Err(CanvasError::Truncated(src.len()));
    }
    Ok(messages)
}

// ── Tests ────────────────────────────────────────────────────────
