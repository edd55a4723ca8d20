//! Property tests for the canvas state machine, run against an in-memory
//! transport.

use pixelflow_core::{AdvanceMode, Canvas, Color, ColorMode, DrawMode, Message, decode_stream};
use proptest::prelude::*;

fn canvas(width: u16, height: u16, mode: ColorMode) -> Canvas<Vec<u8>> {
    Canvas::new(Vec::new(), width, height, Some(mode)).unwrap()
}

fn color_mode() -> impl Strategy<Value = ColorMode> {
    prop_oneof![Just(ColorMode::Rgb), Just(ColorMode::Palette)]
}

proptest! {
    #[test]
    fn set_then_get_returns_the_stored_value(
        width in 1u16..64,
        height in 1u16..64,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
        (r, g, b) in any::<(u8, u8, u8)>(),
        mode in color_mode(),
        buffered in any::<bool>(),
    ) {
        let mut c = canvas(width, height, mode);
        if buffered {
            c.set_draw_mode(DrawMode::Buffered).unwrap();
        }
        let x = (fx * width as f64) as i32;
        let y = (fy * height as f64) as i32;

        c.set_pixel(x, y, Color::rgb(r, g, b)).unwrap();
        let expected = match mode {
            ColorMode::Rgb => Color::rgb(r, g, b),
            ColorMode::Palette => Color::index(r),
        };
        prop_assert_eq!(c.get_pixel(x, y), expected);
    }

    #[test]
    fn out_of_bounds_writes_change_nothing(
        width in 1u16..32,
        height in 1u16..32,
        x in -100i32..100,
        y in -100i32..100,
    ) {
        prop_assume!(x < 0 || y < 0 || x >= width as i32 || y >= height as i32);
        let mut c = canvas(width, height, ColorMode::Rgb);
        let before = c.transport().len();
        let cursor = c.cursor();

        c.set_pixel(x, y, Color::rgb(9, 9, 9)).unwrap();
        c.move_cursor(x, y).unwrap();

        prop_assert_eq!(c.transport().len(), before);
        prop_assert_eq!(c.cursor(), cursor);
        prop_assert!(c.buffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn cursor_always_stays_on_canvas(
        width in 1u16..16,
        height in 1u16..16,
        writes in 0usize..300,
        down in any::<bool>(),
    ) {
        let mut c = canvas(width, height, ColorMode::Palette);
        if down {
            c.set_advance_mode(AdvanceMode::Down).unwrap();
        }
        let moves_before = c.messages_sent();
        let mut x = 0;
        let mut y = 0;
        for _ in 0..writes {
            let cur = c.cursor();
            prop_assert!(cur.x >= 0 && cur.x < width as i32);
            prop_assert!(cur.y >= 0 && cur.y < height as i32);
            c.set_pixel(x, y, 1u8).unwrap();
            // Follow the cursor so no explicit move is ever needed.
            let next = c.cursor();
            x = next.x;
            y = next.y;
        }
        prop_assert_eq!(c.messages_sent() - moves_before, writes as u64);
    }

    #[test]
    fn resize_zeroes_and_resets(
        width in 1u16..32,
        height in 1u16..32,
        new_width in 1u16..32,
        new_height in 1u16..32,
    ) {
        let mut c = canvas(width, height, ColorMode::Rgb);
        c.set_pixel(width as i32 - 1, height as i32 - 1, Color::rgb(1, 1, 1)).unwrap();
        c.resize(new_width, new_height).unwrap();

        prop_assert_eq!(c.cursor().x, 0);
        prop_assert_eq!(c.cursor().y, 0);
        prop_assert_eq!(c.buffer().len(), new_width as usize * new_height as usize * 3);
        prop_assert!(c.buffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn transcript_always_decodes(
        ops in proptest::collection::vec((0i32..300, 0i32..300, any::<u8>()), 0..40),
        wide in any::<bool>(),
    ) {
        let (w, h) = if wide { (300, 280) } else { (200, 150) };
        let mut c = canvas(w, h, ColorMode::Palette);
        for &(x, y, v) in &ops {
            c.set_pixel(x, y, v).unwrap();
        }
        let messages = decode_stream(c.transport()).unwrap();
        let pixels = messages
            .iter()
            .filter(|m| matches!(m, Message::SetPixel(_)))
            .count();
        let on_canvas = ops
            .iter()
            .filter(|&&(x, y, _)| x < w as i32 && y < h as i32)
            .count();
        prop_assert_eq!(pixels, on_canvas);
    }
}
