//! # pixelflow-core
//!
//! Client library for pixelflow canvas servers.
//!
//! A pixelflow server owns a framebuffer and listens on TCP; clients push
//! configuration and pixels to it as a stream of opcode-prefixed binary
//! messages. This crate contains:
//! - **Message**: `Message`, `Opcode`, `Color` and the wire-level modes
//! - **Codec**: `WireCodec`, the stateful encoder/decoder for the stream
//! - **Network**: `Connection` over any `Write` transport, `ConnectionInfo`
//! - **Canvas**: `Canvas`, the stateful drawing surface with a local mirror
//! - **Raster**: `Rasterizer` shape algorithms on top of `PixelSink`
//! - **Pacing**: `FrameLimiter` for a cooperative frame-rate cap
//! - **Error**: `CanvasError`, a `thiserror`-based error type

pub mod buffer;
pub mod canvas;
pub mod codec;
pub mod coord;
pub mod error;
pub mod message;
pub mod network;
pub mod pacing;
pub mod raster;

// ── Re-exports for ergonomic usage ───────────────────────────────

pub use buffer::PixelBuffer;
pub use canvas::{Canvas, CanvasConfig, Cursor};
pub use codec::{WireCodec, decode_stream};
pub use coord::{Coord, Point};
pub use error::CanvasError;
pub use message::{AdvanceMode, Color, ColorMode, DrawMode, Message, Opcode};
pub use network::{Connection, ConnectionInfo, DEFAULT_HOST, DEFAULT_PORT};
pub use pacing::FrameLimiter;
pub use raster::{DEFAULT_BEZIER_STEPS, PixelSink, Rasterizer};
