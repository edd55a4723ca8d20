//! The canvas: configuration, cursor, local mirror and the wire.
//!
//! Every drawing call lands here as a single pixel write. The canvas keeps
//! its [`PixelBuffer`] in sync and, depending on the [`DrawMode`], either
//! sends the pixel right away or waits for [`Canvas::flip`] to ship the
//! whole buffer.
//!
//! ```text
//! set_pixel(x, y, c)
//!   ├─ out of bounds?            → ignored
//!   ├─ (x, y) != cursor?         → MoveCursor
//!   ├─ buffer[x, y] = c
//!   ├─ DrawMode::Direct?         → SetPixel
//!   └─ cursor advances (Right: x+1, Down: y+1, wrapping)
//! ```

use std::io::Write;
use std::net::TcpStream;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::buffer::PixelBuffer;
use crate::codec::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::coord::Coord;
use crate::error::CanvasError;
use crate::message::{AdvanceMode, Color, ColorMode, DrawMode, Message};
use crate::network::{Connection, ConnectionInfo};
use crate::pacing::FrameLimiter;
use crate::raster::PixelSink;

// ── CanvasConfig ─────────────────────────────────────────────────

/// Everything needed to set a canvas up in one go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: u16,
    pub height: u16,
    pub color_mode: ColorMode,
    pub advance_mode: AdvanceMode,
    pub draw_mode: DrawMode,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            color_mode: ColorMode::Rgb,
            advance_mode: AdvanceMode::Right,
            draw_mode: DrawMode::Direct,
        }
    }
}

// ── Cursor ───────────────────────────────────────────────────────

/// Current write position, shared (implicitly) with the remote display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub x: i32,
    pub y: i32,
}

// ── Canvas ───────────────────────────────────────────────────────

/// A remote raster display plus its local mirror.
///
/// Owns the connection exclusively; dropping the canvas closes it.
#[derive(Debug)]
pub struct Canvas<W: Write = TcpStream> {
    connection: Connection<W>,
    buffer: PixelBuffer,
    cursor: Cursor,
    advance_mode: AdvanceMode,
    draw_mode: DrawMode,
    limiter: FrameLimiter,
}

impl Canvas<TcpStream> {
    /// Connect to the display at `info` and size it.
    pub fn connect(
        info: &ConnectionInfo,
        width: u16,
        height: u16,
        color_mode: Option<ColorMode>,
    ) -> Result<Self, CanvasError> {
        let connection = Connection::connect(info)?;
        Self::with_connection(connection, width, height, color_mode)
    }

    /// Connect to the display at `info` and apply `config`.
    pub fn connect_with_config(
        info: &ConnectionInfo,
        config: &CanvasConfig,
    ) -> Result<Self, CanvasError> {
        let connection = Connection::connect(info)?;
        Self::configure(connection, config)
    }
}

impl<W: Write> Canvas<W> {
    /// Drive a display over an already-open transport.
    ///
    /// Sends `Resize`, then `SetColorMode` if `color_mode` is given;
    /// otherwise the display keeps its current (RGB) mode.
    pub fn new(
        stream: W,
        width: u16,
        height: u16,
        color_mode: Option<ColorMode>,
    ) -> Result<Self, CanvasError> {
        Self::with_connection(Connection::new(stream), width, height, color_mode)
    }

    /// Like [`Canvas::new`], applying a whole [`CanvasConfig`].
    pub fn from_config(stream: W, config: &CanvasConfig) -> Result<Self, CanvasError> {
        Self::configure(Connection::new(stream), config)
    }

    fn with_connection(
        connection: Connection<W>,
        width: u16,
        height: u16,
        color_mode: Option<ColorMode>,
    ) -> Result<Self, CanvasError> {
        let mut canvas = Self {
            connection,
            buffer: PixelBuffer::new(DEFAULT_WIDTH, DEFAULT_HEIGHT, ColorMode::Rgb),
            cursor: Cursor::default(),
            advance_mode: AdvanceMode::Right,
            draw_mode: DrawMode::Direct,
            limiter: FrameLimiter::new(),
        };
        canvas.resize(width, height)?;
        if let Some(mode) = color_mode {
            canvas.set_color_mode(mode)?;
        }
        Ok(canvas)
    }

    fn configure(connection: Connection<W>, config: &CanvasConfig) -> Result<Self, CanvasError> {
        let mut canvas =
            Self::with_connection(connection, config.width, config.height, Some(config.color_mode))?;
        canvas.set_advance_mode(config.advance_mode)?;
        canvas.set_draw_mode(config.draw_mode)?;
        Ok(canvas)
    }

    // ── Configuration ────────────────────────────────────────────

    /// Resize the canvas.
    ///
    /// Resets the cursor and zero-fills the mirror. Both dimensions must be
    /// non-zero.
    pub fn resize(&mut self, width: u16, height: u16) -> Result<(), CanvasError> {
        if width == 0 || height == 0 {
            return Err(CanvasError::invalid(
                "canvas size",
                format!("{width}x{height}"),
            ));
        }
        self.cursor = Cursor::default();
        self.buffer = PixelBuffer::new(width, height, self.buffer.color_mode());
        debug!(width, height, "canvas resized");
        self.connection.send(&Message::Resize { width, height })
    }

    /// Switch between RGB and palette pixels.
    ///
    /// Accepts a [`ColorMode`], its wire byte or its name. Zero-fills the
    /// mirror, since the pixel size changes.
    pub fn set_color_mode<M>(&mut self, mode: M) -> Result<(), CanvasError>
    where
        M: TryInto<ColorMode>,
        CanvasError: From<M::Error>,
    {
        let mode = mode.try_into()?;
        self.buffer = PixelBuffer::new(self.buffer.width(), self.buffer.height(), mode);
        debug!(%mode, "color mode set");
        self.connection.send(&Message::SetColorMode(mode))
    }

    /// Choose which way the cursor moves after each pixel write.
    pub fn set_advance_mode<M>(&mut self, mode: M) -> Result<(), CanvasError>
    where
        M: TryInto<AdvanceMode>,
        CanvasError: From<M::Error>,
    {
        let mode = mode.try_into()?;
        self.advance_mode = mode;
        debug!(%mode, "advance mode set");
        self.connection.send(&Message::SetAdvanceMode(mode))
    }

    /// Choose between sending pixels immediately and on [`Canvas::flip`].
    ///
    /// Local only: nothing is sent and the buffer is kept.
    pub fn set_draw_mode<M>(&mut self, mode: M) -> Result<(), CanvasError>
    where
        M: TryInto<DrawMode>,
        CanvasError: From<M::Error>,
    {
        let mode = mode.try_into()?;
        self.draw_mode = mode;
        debug!(%mode, "draw mode set");
        Ok(())
    }

    /// Define palette entry `index` (taken modulo 256).
    ///
    /// Channels are 6-bit (taken modulo 64) and scaled to a byte by the
    /// encoder. Nothing is kept locally.
    pub fn set_palette(&mut self, index: i32, r: i32, g: i32, b: i32) -> Result<(), CanvasError> {
        let msg = Message::palette(index, r, g, b);
        debug!(?msg, "palette entry set");
        self.connection.send(&msg)
    }

    // ── Drawing ──────────────────────────────────────────────────

    /// Move the cursor. Positions outside the canvas are ignored.
    pub fn move_cursor(&mut self, x: impl Coord, y: impl Coord) -> Result<(), CanvasError> {
        let (x, y) = (x.to_coord(), y.to_coord());
        if !self.buffer.contains(x, y) {
            return Ok(());
        }
        self.cursor = Cursor { x, y };
        self.connection.send(&Message::MoveCursor {
            x: x as u16,
            y: y as u16,
        })
    }

    /// Write one pixel. Positions outside the canvas are ignored.
    ///
    /// In palette mode only `color.r` is used, as the palette index.
    pub fn set_pixel(
        &mut self,
        x: impl Coord,
        y: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let (x, y) = (x.to_coord(), y.to_coord());
        if !self.buffer.contains(x, y) {
            return Ok(());
        }
        if self.cursor != (Cursor { x, y }) {
            self.move_cursor(x, y)?;
        }

        let color = color.into();
        self.buffer.write(x, y, color);
        if self.draw_mode == DrawMode::Direct {
            self.connection.send(&Message::SetPixel(color))?;
        }
        self.advance();
        Ok(())
    }

    /// Read back a pixel from the local mirror; black outside the canvas.
    ///
    /// In palette mode the index comes back in `r`.
    pub fn get_pixel(&self, x: impl Coord, y: impl Coord) -> Color {
        self.buffer.read(x.to_coord(), y.to_coord())
    }

    /// Send the whole buffer in buffered mode; does nothing in direct mode.
    pub fn flip(&mut self) -> Result<(), CanvasError> {
        if self.draw_mode == DrawMode::Buffered {
            self.connection.send_frame(self.buffer.as_bytes())?;
        }
        Ok(())
    }

    /// Zero the local mirror without sending anything.
    ///
    /// In buffered mode the next [`Canvas::flip`] blanks the display.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Sleep until at least `1 / fps` seconds have passed since the
    /// previous call. Non-positive `fps` does not wait.
    pub fn ensure_max_fps(&mut self, fps: f64) {
        self.limiter.wait(fps);
    }

    fn advance(&mut self) {
        let width = self.buffer.width() as i32;
        let height = self.buffer.height() as i32;
        let Cursor { x, y } = &mut self.cursor;
        match self.advance_mode {
            AdvanceMode::Right => {
                *x += 1;
                if *x >= width {
                    *x = 0;
                    *y = (*y + 1) % height;
                }
            }
            AdvanceMode::Down => {
                *y += 1;
                if *y >= height {
                    *y = 0;
                    *x = (*x + 1) % width;
                }
            }
        }
    }

    // ── Accessors ────────────────────────────────────────────────

    pub fn width(&self) -> u16 {
        self.buffer.width()
    }

    pub fn height(&self) -> u16 {
        self.buffer.height()
    }

    pub fn color_mode(&self) -> ColorMode {
        self.buffer.color_mode()
    }

    pub fn advance_mode(&self) -> AdvanceMode {
        self.advance_mode
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Snapshot of the current configuration.
    pub fn config(&self) -> CanvasConfig {
        CanvasConfig {
            width: self.width(),
            height: self.height(),
            color_mode: self.color_mode(),
            advance_mode: self.advance_mode,
            draw_mode: self.draw_mode,
        }
    }

    /// The local mirror.
    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    /// Bytes written to the transport so far.
    pub fn bytes_sent(&self) -> u64 {
        self.connection.bytes_sent()
    }

    /// Messages written to the transport so far.
    pub fn messages_sent(&self) -> u64 {
        self.connection.messages_sent()
    }

    pub fn transport(&self) -> &W {
        self.connection.get_ref()
    }

    /// Tear the canvas down and return the transport.
    pub fn into_inner(self) -> W {
        self.connection.into_inner()
    }
}

impl<W: Write> PixelSink for Canvas<W> {
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), CanvasError> {
        self.set_pixel(x, y, color)
    }

    fn pixel(&self, x: i32, y: i32) -> Color {
        self.get_pixel(x, y)
    }
}

// ── Tests ────────────────────────────────────────────────────────
