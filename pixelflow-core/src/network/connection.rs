use std::fmt;
use std::io::Write;
use std::net::TcpStream;

use bytes::BytesMut;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};

use crate::codec::WireCodec;
use crate::error::CanvasError;
use crate::message::{Message, Opcode};

/// Where the display server listens unless told otherwise.
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 19223;

/// A single outbound stream to the display.
///
/// Every message is written in full and flushed before `send` returns.
/// There is no write timeout and no reconnect: a stalled peer blocks the
/// caller, and a dead one surfaces as [`CanvasError::Transport`].
#[derive(Debug)]
pub struct Connection<W: Write = TcpStream> {
    stream: W,
    codec: WireCodec,
    // Reused between sends.
    scratch: BytesMut,
    bytes_sent: u64,
    messages_sent: u64,
}

impl Connection<TcpStream> {
    /// Open a TCP stream to `info`.
    pub fn connect(info: &ConnectionInfo) -> Result<Self, CanvasError> {
        let stream = TcpStream::connect((info.host.as_str(), info.port))?;
        stream.set_nodelay(info.nodelay)?;
        info!("connected to display at {info}");
        Ok(Self::new(stream))
    }
}

impl<W: Write> Connection<W> {
    /// Wrap an already-open transport.
    pub fn new(stream: W) -> Self {
        Self {
            stream,
            codec: WireCodec::default(),
            scratch: BytesMut::with_capacity(16),
            bytes_sent: 0,
            messages_sent: 0,
        }
    }

    /// Encode, write and flush one message.
    pub fn send(&mut self, msg: &Message) -> Result<(), CanvasError> {
        self.scratch.clear();
        self.codec.encode(msg, &mut self.scratch);
        self.stream.write_all(&self.scratch)?;
        self.stream.flush()?;

        self.bytes_sent += self.scratch.len() as u64;
        self.messages_sent += 1;
        Ok(())
    }

    /// Send a `Flush` carrying `frame`, without copying it into the
    /// scratch buffer first.
    pub fn send_frame(&mut self, frame: &[u8]) -> Result<(), CanvasError> {
        self.stream.write_all(&[Opcode::Flush as u8])?;
        self.stream.write_all(frame)?;
        self.stream.flush()?;

        self.bytes_sent += 1 + frame.len() as u64;
        self.messages_sent += 1;
        trace!(bytes = frame.len(), "frame flushed");
        Ok(())
    }

    /// Codec state as the remote side should currently see it.
    pub fn codec(&self) -> &WireCodec {
        &self.codec
    }

    /// Total bytes written since construction.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Total messages written since construction.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    pub fn get_ref(&self) -> &W {
        &self.stream
    }

    /// Consume the connection and hand back the transport.
    pub fn into_inner(self) -> W {
        self.stream
    }
}

// ── ConnectionInfo ───────────────────────────────────────────────

/// Address of the display server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionInfo {
    pub host: String,
    pub port: u16,
    /// Set `TCP_NODELAY` on the stream.
    pub nodelay: bool,
}

impl ConnectionInfo {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            nodelay: false,
        }
    }
}

impl Default for ConnectionInfo {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, DEFAULT_PORT)
    }
}

impl fmt::Display for ConnectionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::ColorMode;

    /// Writer that counts flushes and can be told to fail.
    #[derive(Default)]
    struct Probe {
        data: Vec<u8>,
        flushes: usize,
        broken: bool,
    }

    impl Write for Probe {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.broken {
                return Err(std::io::ErrorKind::BrokenPipe.into());
            }
            self.data.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            self.flushes += 1;
            Ok(())
        }
    }

    #[test]
    fn every_send_is_flushed() {
        let mut conn = Connection::new(Probe::default());
        conn.send(&Message::SetColorMode(ColorMode::Palette)).unwrap();
        conn.send(&Message::palette(1, 2, 3, 4)).unwrap();

        assert_eq!(conn.get_ref().flushes, 2);
        assert_eq!(conn.get_ref().data, [2, 1, 3, 1, 8, 12, 16]);
        assert_eq!(conn.bytes_sent(), 7);
        assert_eq!(conn.messages_sent(), 2);
    }

    #[test]
    fn codec_tracks_sent_geometry() {
        let mut conn = Connection::new(Vec::new());
        conn.send(&Message::Resize {
            width: 1000,
            height: 10,
        })
        .unwrap();
        assert_eq!(conn.codec().width(), 1000);
        assert_eq!(conn.codec().move_cursor_len(), 4);
    }

    #[test]
    fn send_frame_prefixes_opcode() {
        let mut conn = Connection::new(Probe::default());
        conn.send_frame(&[1, 2, 3]).unwrap();
        assert_eq!(conn.get_ref().data, [7, 1, 2, 3]);
        assert_eq!(conn.get_ref().flushes, 1);
        assert_eq!(conn.bytes_sent(), 4);
    }

    #[test]
    fn write_failure_is_a_transport_error() {
        let mut conn = Connection::new(Probe {
            broken: true,
            ..Probe::default()
        });
        let err = conn.send(&Message::MoveCursor { x: 0, y: 0 }).unwrap_err();
        assert!(err.is_transport());
        assert_eq!(conn.messages_sent(), 0);
    }

    #[test]
    fn connection_info_defaults() {
        let info = ConnectionInfo::default();
        assert_eq!(info.to_string(), "127.0.0.1:19223");
        assert!(!info.nodelay);
    }

    #[test]
    fn connect_refused_is_transport_error() {
        // Bind and drop to find a port nothing listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = Connection::connect(&ConnectionInfo::new("127.0.0.1", port)).unwrap_err();
        assert!(err.is_transport());
    }
}
