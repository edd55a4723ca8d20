//! Integration tests — a canvas talking to a real TCP listener on
//! localhost, with the server side decoding what arrived.

use std::io::Read;
use std::net::TcpListener;
use std::thread::{self, JoinHandle};

use pixelflow_core::{
    AdvanceMode, Canvas, CanvasConfig, CanvasError, Color, ColorMode, ConnectionInfo, DrawMode,
    Message, Rasterizer, decode_stream,
};

// ── Helpers ──────────────────────────────────────────────────────

/// Bind an OS-assigned port and collect everything one client sends until
/// it disconnects.
fn recording_server() -> (ConnectionInfo, JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let info = ConnectionInfo::new(addr.ip().to_string(), addr.port());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut received = Vec::new();
        stream.read_to_end(&mut received).unwrap();
        received
    });
    (info, handle)
}

// ── Session lifecycle ────────────────────────────────────────────

#[test]
fn direct_session_over_tcp() {
    let (info, server) = recording_server();

    {
        let mut canvas = Canvas::connect(&info, 16, 8, None).unwrap();
        canvas.set_pixel(3, 2, Color::rgb(1, 2, 3)).unwrap();
        canvas.set_pixel(4, 2, Color::rgb(4, 5, 6)).unwrap();
        assert_eq!(canvas.messages_sent(), 4);
    }

    let messages = decode_stream(&server.join().unwrap()).unwrap();
    assert_eq!(
        messages,
        vec![
            Message::Resize { width: 16, height: 8 },
            Message::MoveCursor { x: 3, y: 2 },
            Message::SetPixel(Color::rgb(1, 2, 3)),
            Message::SetPixel(Color::rgb(4, 5, 6)),
        ]
    );
}

#[test]
fn buffered_palette_session_over_tcp() {
    let (info, server) = recording_server();
    let config = CanvasConfig {
        width: 4,
        height: 2,
        color_mode: ColorMode::Palette,
        advance_mode: AdvanceMode::Down,
        draw_mode: DrawMode::Buffered,
    };

    {
        let mut canvas = Canvas::connect_with_config(&info, &config).unwrap();
        canvas.set_palette(1, 63, 0, 0).unwrap();
        canvas.fill_rect(0, 0, 3, 0, 1u8).unwrap();
        canvas.flip().unwrap();
        canvas.ensure_max_fps(1000.0);
    }

    let messages = decode_stream(&server.join().unwrap()).unwrap();
    assert_eq!(
        messages,
        vec![
            Message::Resize { width: 4, height: 2 },
            Message::SetColorMode(ColorMode::Palette),
            Message::SetAdvanceMode(AdvanceMode::Down),
            Message::SetPalette { index: 1, r: 252, g: 0, b: 0 },
            Message::MoveCursor { x: 1, y: 0 },
            Message::MoveCursor { x: 2, y: 0 },
            Message::MoveCursor { x: 3, y: 0 },
            Message::Flush(vec![1, 1, 1, 1, 0, 0, 0, 0].into()),
        ]
    );
}

#[test]
fn large_canvas_uses_wide_coordinates() {
    let (info, server) = recording_server();

    {
        let mut canvas = Canvas::connect(&info, 640, 100, None).unwrap();
        canvas.move_cursor(300, 50).unwrap();
    }

    let bytes = server.join().unwrap();
    assert_eq!(&bytes[5..], &[5, 0x01, 0x2C, 50]);
}

// ── Error scenarios ──────────────────────────────────────────────

#[test]
fn refused_connection_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = Canvas::connect(&ConnectionInfo::new("127.0.0.1", port), 8, 8, None).unwrap_err();
    assert!(err.is_transport());
}

#[test]
fn invalid_config_sends_nothing() {
    let (info, server) = recording_server();

    {
        let mut canvas = Canvas::connect(&info, 8, 8, Some(ColorMode::Rgb)).unwrap();
        let err = canvas.set_color_mode("sepia").unwrap_err();
        assert!(matches!(err, CanvasError::InvalidConfig { .. }));
        assert!(canvas.resize(0, 8).is_err());
    }

    let messages = decode_stream(&server.join().unwrap()).unwrap();
    assert_eq!(
        messages,
        vec![
            Message::Resize { width: 8, height: 8 },
            Message::SetColorMode(ColorMode::Rgb),
        ]
    );
}
