//! The classic fire effect on a palette canvas.
//!
//! Heat lives directly in the canvas as palette indices `0..=63`. Each
//! frame the bottom rows are seeded, then every pixel becomes a weighted
//! average of the pixel below it and its two horizontal neighbours, with a
//! little noise so the flames flicker.

use std::io::Write;

use pixelflow_core::{Canvas, CanvasError};
use rand::Rng;

use crate::config::FireSettings;

/// Highest heat value and the last palette index in use.
pub const MAX_HEAT: u8 = 63;

/// Define the 64-entry black → red → yellow → white ramp.
pub fn install_palette<W: Write>(canvas: &mut Canvas<W>) -> Result<(), CanvasError> {
    for i in 0..16 {
        canvas.set_palette(i, 2 * i, 0, 0)?;
        canvas.set_palette(i + 16, 2 * (i + 16), 0, 0)?;
        canvas.set_palette(i + 32, 63, 4 * i, 0)?;
        canvas.set_palette(i + 48, 63, 63, 4 * i)?;
    }
    Ok(())
}

/// Simulation state between frames.
#[derive(Debug)]
pub struct Fire<R> {
    settings: FireSettings,
    heat: u8,
    rng: R,
}

impl<R: Rng> Fire<R> {
    pub fn new(settings: FireSettings, rng: R) -> Self {
        let heat = settings.heat.min(MAX_HEAT);
        Self {
            settings,
            heat,
            rng,
        }
    }

    pub fn heat(&self) -> u8 {
        self.heat
    }

    pub fn heat_up(&mut self) {
        self.heat = (self.heat + 1).min(MAX_HEAT);
    }

    pub fn heat_down(&mut self) {
        self.heat = self.heat.saturating_sub(1);
    }

    /// Advance one frame and send it.
    ///
    /// With `seed == false` the bottom rows are left alone and the flames
    /// die down.
    pub fn frame<W: Write>(&mut self, canvas: &mut Canvas<W>, seed: bool) -> Result<(), CanvasError> {
        if seed {
            self.seed(canvas)?;
        }
        self.spread(canvas)?;
        canvas.flip()
    }

    fn seed<W: Write>(&mut self, canvas: &mut Canvas<W>) -> Result<(), CanvasError> {
        let height = canvas.height() as i32;
        // The row at `height` is off-canvas and dropped by the canvas.
        for y in [height, height - 1] {
            for x in self.settings.seed_start..=self.settings.seed_end {
                canvas.set_pixel(x, y, self.heat)?;
            }
        }
        Ok(())
    }

    fn spread<W: Write>(&mut self, canvas: &mut Canvas<W>) -> Result<(), CanvasError> {
        let (width, height) = (canvas.width() as i32, canvas.height() as i32);
        let jitter = self.settings.jitter.abs();
        for y in 0..height {
            for x in 0..width {
                let below = canvas.get_pixel(x, y + 1).r as i32;
                let left = canvas.get_pixel(x - 1, y).r as i32;
                let right = canvas.get_pixel(x + 1, y).r as i32;
                let mut c = (2 * below + left + right) >> 2;
                if c > 0 && jitter > 0 {
                    c += self.rng.random_range(-jitter..=jitter);
                }
                canvas.set_pixel(x, y, c.clamp(0, MAX_HEAT as i32) as u8)?;
            }
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pixelflow_core::{ColorMode, DrawMode, Message, decode_stream};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn canvas(width: u16, height: u16) -> Canvas<Vec<u8>> {
        let mut c = Canvas::new(Vec::new(), width, height, Some(ColorMode::Palette)).unwrap();
        c.set_draw_mode(DrawMode::Buffered).unwrap();
        c
    }

    fn fire(settings: FireSettings) -> Fire<StdRng> {
        Fire::new(settings, StdRng::seed_from_u64(7))
    }

    fn calm(seed_start: i32, seed_end: i32) -> FireSettings {
        FireSettings {
            seed_start,
            seed_end,
            jitter: 0,
            ..FireSettings::default()
        }
    }

    #[test]
    fn palette_ramp() {
        let mut c = canvas(4, 4);
        let before = c.transport().len();
        install_palette(&mut c).unwrap();
        let messages = decode_stream(c.transport()).unwrap();
        let entries: Vec<_> = messages
            .into_iter()
            .filter_map(|m| match m {
                Message::SetPalette { index, r, g, b } => Some((index, r, g, b)),
                _ => None,
            })
            .collect();

        assert_eq!(entries.len(), 64);
        assert_eq!(c.transport().len() - before, 64 * 5);
        assert!(entries.contains(&(0, 0, 0, 0)));
        assert!(entries.contains(&(31, 248, 0, 0)));
        assert!(entries.contains(&(47, 252, 240, 0)));
        assert!(entries.contains(&(63, 252, 252, 240)));
    }

    #[test]
    fn heat_is_bounded() {
        let mut f = fire(FireSettings { heat: 200, ..FireSettings::default() });
        assert_eq!(f.heat(), MAX_HEAT);
        f.heat_up();
        assert_eq!(f.heat(), MAX_HEAT);

        let mut f = fire(FireSettings { heat: 0, ..FireSettings::default() });
        f.heat_down();
        assert_eq!(f.heat(), 0);
        f.heat_up();
        assert_eq!(f.heat(), 1);
    }

    #[test]
    fn seeded_frame_heats_the_bottom() {
        let mut c = canvas(8, 4);
        let mut f = fire(FireSettings { heat: 40, ..calm(2, 5) });
        f.frame(&mut c, true).unwrap();

        // Bottom row: 2*0 + neighbours, averaged in place.
        assert_eq!(c.get_pixel(1, 3).r, 10);
        assert_eq!(c.get_pixel(2, 3).r, 12);
        assert!(c.get_pixel(3, 3).r > 0);
        assert_eq!(c.get_pixel(7, 3).r, 0);
        // Row above picks up heat from below.
        assert!(c.get_pixel(3, 2).r > 0);
        assert_eq!(c.get_pixel(3, 0).r, 0);
    }

    #[test]
    fn unseeded_frames_die_out() {
        let mut c = canvas(8, 4);
        let mut f = fire(FireSettings { heat: 63, ..calm(0, 7) });
        f.frame(&mut c, true).unwrap();
        for _ in 0..64 {
            f.frame(&mut c, false).unwrap();
        }
        assert!(c.buffer().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn every_frame_is_one_flush() {
        let mut c = canvas(8, 4);
        let mut f = fire(FireSettings::default());
        f.frame(&mut c, true).unwrap();
        f.frame(&mut c, false).unwrap();

        let flushes: Vec<_> = decode_stream(c.transport())
            .unwrap()
            .into_iter()
            .filter_map(|m| match m {
                Message::Flush(frame) => Some(frame),
                _ => None,
            })
            .collect();
        assert_eq!(flushes.len(), 2);
        assert!(flushes.iter().all(|frame| frame.len() == 32));
        assert!(decode_stream(c.transport())
            .unwrap()
            .iter()
            .all(|m| !matches!(m, Message::SetPixel(_))));
    }

    #[test]
    fn jitter_stays_in_range() {
        let mut c = canvas(16, 8);
        let mut f = fire(FireSettings { heat: 63, jitter: 3, ..calm(0, 15) });
        for _ in 0..10 {
            f.frame(&mut c, true).unwrap();
        }
        assert!(c.buffer().as_bytes().iter().all(|&b| b <= MAX_HEAT));
    }
}
