//! Shape rasterization on top of a single pixel-set primitive.
//!
//! Every algorithm here reaches the canvas only through [`PixelSink`], so
//! clipping, cursor handling and wire traffic all stay in one place. Any
//! type that can store a pixel gets the whole [`Rasterizer`] API for free.
//! Offsets from a centre are summed in `i64`, so shapes around saturated
//! coordinates are clipped rather than wrapped.
//!
//! | Shape            | Algorithm                                   |
//! |------------------|---------------------------------------------|
//! | line             | integer Bresenham, both endpoints inclusive |
//! | rectangle        | four edges / row-major fill                 |
//! | circle           | midpoint, 8-way symmetry                    |
//! | ellipse          | two-region midpoint                         |
//! | Bézier curves    | uniform sampling joined by lines            |
//! | triangle/polygon | closed chain of lines                       |

use crate::coord::{Coord, Point};
use crate::error::CanvasError;
use crate::message::Color;

/// Samples taken along a Bézier curve when no count is given.
pub const DEFAULT_BEZIER_STEPS: u32 = 100;

/// Anything that can store and report single pixels.
pub trait PixelSink {
    /// Write one pixel. Positions outside the target must be ignored.
    fn put_pixel(&mut self, x: i32, y: i32, color: Color) -> Result<(), CanvasError>;

    /// Read one pixel back; [`Color::BLACK`] outside the target.
    fn pixel(&self, x: i32, y: i32) -> Color;
}

/// Shape drawing for every [`PixelSink`].
///
/// Coordinates are converted with [`Coord`] (truncation toward zero)
/// before any geometry is done.
pub trait Rasterizer: PixelSink {
    /// Straight line from `(x0, y0)` to `(x1, y1)`, both ends included.
    fn draw_line(
        &mut self,
        x0: impl Coord,
        y0: impl Coord,
        x1: impl Coord,
        y1: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        line(self, x0.to_coord(), y0.to_coord(), x1.to_coord(), y1.to_coord(), color.into())
    }

    /// Outline of the rectangle spanned by two opposite corners.
    ///
    /// Each edge is drawn in full, so corners are written twice.
    fn draw_rect(
        &mut self,
        x0: impl Coord,
        y0: impl Coord,
        x1: impl Coord,
        y1: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let color = color.into();
        let (left, right) = ordered(x0.to_coord(), x1.to_coord());
        let (top, bottom) = ordered(y0.to_coord(), y1.to_coord());
        hline(self, left.into(), right.into(), top.into(), color)?;
        hline(self, left.into(), right.into(), bottom.into(), color)?;
        vline(self, left, top, bottom, color)?;
        vline(self, right, top, bottom, color)
    }

    /// Solid rectangle spanned by two opposite corners, filled row by row.
    fn fill_rect(
        &mut self,
        x0: impl Coord,
        y0: impl Coord,
        x1: impl Coord,
        y1: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let color = color.into();
        let (left, right) = ordered(x0.to_coord(), x1.to_coord());
        let (top, bottom) = ordered(y0.to_coord(), y1.to_coord());
        for y in top..=bottom {
            hline(self, left.into(), right.into(), y.into(), color)?;
        }
        Ok(())
    }

    /// Circle outline.
    ///
    /// A negative radius leaves only the four axis points at distance
    /// `|radius|`.
    fn draw_circle(
        &mut self,
        cx: impl Coord,
        cy: impl Coord,
        radius: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let (cx, cy) = (i64::from(cx.to_coord()), i64::from(cy.to_coord()));
        let r = i64::from(radius.to_coord());
        let color = color.into();

        for (dx, dy) in [(0, r), (0, -r), (r, 0), (-r, 0)] {
            plot(self, cx + dx, cy + dy, color)?;
        }
        for (x, y) in MidpointCircle::new(r) {
            for (dx, dy) in [(x, y), (-x, y), (x, -y), (-x, -y)] {
                plot(self, cx + dx, cy + dy, color)?;
            }
            for (dx, dy) in [(y, x), (-y, x), (y, -x), (-y, -x)] {
                plot(self, cx + dx, cy + dy, color)?;
            }
        }
        Ok(())
    }

    /// Filled circle, drawn as horizontal spans. A negative radius draws
    /// nothing.
    fn fill_circle(
        &mut self,
        cx: impl Coord,
        cy: impl Coord,
        radius: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let (cx, cy) = (i64::from(cx.to_coord()), i64::from(cy.to_coord()));
        let r = i64::from(radius.to_coord());
        let color = color.into();
        if r < 0 {
            return Ok(());
        }

        hline(self, cx - r, cx + r, cy, color)?;
        for (x, y) in MidpointCircle::new(r) {
            hline(self, cx - x, cx + x, cy + y, color)?;
            hline(self, cx - x, cx + x, cy - y, color)?;
            hline(self, cx - y, cx + y, cy + x, color)?;
            hline(self, cx - y, cx + y, cy - x, color)?;
        }
        Ok(())
    }

    /// Axis-aligned ellipse outline with semi-axes `a` (horizontal) and
    /// `b` (vertical).
    ///
    /// Semi-axes are taken by magnitude. With one semi-axis zero only the
    /// centre and the two ends of the other axis are drawn.
    fn draw_ellipse(
        &mut self,
        cx: impl Coord,
        cy: impl Coord,
        a: impl Coord,
        b: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let (cx, cy) = (i64::from(cx.to_coord()), i64::from(cy.to_coord()));
        let (a, b) = (a.to_coord().unsigned_abs(), b.to_coord().unsigned_abs());
        let color = color.into();

        walk_ellipse(a, b, |x, y| {
            for (dx, dy) in [(x, y), (-x, y), (x, -y), (-x, -y)] {
                plot(self, cx + dx, cy + dy, color)?;
            }
            Ok(())
        })
    }

    /// Filled ellipse, one full horizontal span per computed row.
    fn fill_ellipse(
        &mut self,
        cx: impl Coord,
        cy: impl Coord,
        a: impl Coord,
        b: impl Coord,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let (cx, cy) = (i64::from(cx.to_coord()), i64::from(cy.to_coord()));
        let (a, b) = (a.to_coord().unsigned_abs(), b.to_coord().unsigned_abs());
        let color = color.into();

        walk_ellipse(a, b, |x, y| {
            hline(self, cx - x, cx + x, cy + y, color)?;
            if y != 0 {
                hline(self, cx - x, cx + x, cy - y, color)?;
            }
            Ok(())
        })
    }

    /// Quadratic Bézier through control points `p0`, `p1`, `p2`, sampled
    /// [`DEFAULT_BEZIER_STEPS`] times.
    fn draw_quadratic_bezier(
        &mut self,
        p0: (f64, f64),
        p1: (f64, f64),
        p2: (f64, f64),
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        self.draw_quadratic_bezier_steps(p0, p1, p2, color, DEFAULT_BEZIER_STEPS)
    }

    /// Quadratic Bézier sampled at `steps + 1` evenly spaced parameters.
    ///
    /// `steps == 0` is treated as 1 (a straight line from `p0` to `p2`).
    fn draw_quadratic_bezier_steps(
        &mut self,
        p0: (f64, f64),
        p1: (f64, f64),
        p2: (f64, f64),
        color: impl Into<Color>,
        steps: u32,
    ) -> Result<(), CanvasError> {
        let curve = |t: f64| {
            let u = 1.0 - t;
            let (w0, w1, w2) = (u * u, 2.0 * u * t, t * t);
            (
                w0 * p0.0 + w1 * p1.0 + w2 * p2.0,
                w0 * p0.1 + w1 * p1.1 + w2 * p2.1,
            )
        };
        sampled_curve(self, curve, steps, color.into())
    }

    /// Cubic Bézier through control points `p0`..`p3`, sampled
    /// [`DEFAULT_BEZIER_STEPS`] times.
    fn draw_cubic_bezier(
        &mut self,
        p0: (f64, f64),
        p1: (f64, f64),
        p2: (f64, f64),
        p3: (f64, f64),
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        self.draw_cubic_bezier_steps(p0, p1, p2, p3, color, DEFAULT_BEZIER_STEPS)
    }

    /// Cubic Bézier sampled at `steps + 1` evenly spaced parameters.
    fn draw_cubic_bezier_steps(
        &mut self,
        p0: (f64, f64),
        p1: (f64, f64),
        p2: (f64, f64),
        p3: (f64, f64),
        color: impl Into<Color>,
        steps: u32,
    ) -> Result<(), CanvasError> {
        let curve = |t: f64| {
            let u = 1.0 - t;
            let (w0, w1, w2, w3) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
            (
                w0 * p0.0 + w1 * p1.0 + w2 * p2.0 + w3 * p3.0,
                w0 * p0.1 + w1 * p1.1 + w2 * p2.1 + w3 * p3.1,
            )
        };
        sampled_curve(self, curve, steps, color.into())
    }

    /// Triangle outline: three lines between the vertices.
    fn draw_triangle(
        &mut self,
        p0: impl Into<Point>,
        p1: impl Into<Point>,
        p2: impl Into<Point>,
        color: impl Into<Color>,
    ) -> Result<(), CanvasError> {
        let (p0, p1, p2) = (p0.into(), p1.into(), p2.into());
        let color = color.into();
        line(self, p0.x, p0.y, p1.x, p1.y, color)?;
        line(self, p1.x, p1.y, p2.x, p2.y, color)?;
        line(self, p2.x, p2.y, p0.x, p0.y, color)
    }

    /// Closed polygon outline through `points`, the last joined back to
    /// the first.
    fn draw_polygon<P, I>(&mut self, points: I, color: impl Into<Color>) -> Result<(), CanvasError>
    where
        P: Into<Point>,
        I: IntoIterator<Item = P>,
    {
        let points: Vec<Point> = points.into_iter().map(Into::into).collect();
        let color = color.into();
        match points.as_slice() {
            [] => Ok(()),
            [only] => self.put_pixel(only.x, only.y, color),
            [first, .., last] => {
                for pair in points.windows(2) {
                    line(self, pair[0].x, pair[0].y, pair[1].x, pair[1].y, color)?;
                }
                line(self, last.x, last.y, first.x, first.y, color)
            }
        }
    }
}

impl<T: PixelSink + ?Sized> Rasterizer for T {}

// ── Primitives ───────────────────────────────────────────────────

fn ordered(a: i32, b: i32) -> (i32, i32) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Write one pixel given in wide coordinates. Positions that do not fit
/// an `i32` cannot be on any sink and are skipped.
fn plot<S: PixelSink + ?Sized>(sink: &mut S, x: i64, y: i64, color: Color) -> Result<(), CanvasError> {
    match (i32::try_from(x), i32::try_from(y)) {
        (Ok(x), Ok(y)) => sink.put_pixel(x, y, color),
        _ => Ok(()),
    }
}

/// Horizontal span `x0..=x1` on row `y`, clipped to the `i32` range.
fn hline<S: PixelSink + ?Sized>(
    sink: &mut S,
    x0: i64,
    x1: i64,
    y: i64,
    color: Color,
) -> Result<(), CanvasError> {
    let (min, max) = (i64::from(i32::MIN), i64::from(i32::MAX));
    let Ok(y) = i32::try_from(y) else {
        return Ok(());
    };
    if x1 < min || x0 > max {
        return Ok(());
    }
    for x in x0.max(min) as i32..=x1.min(max) as i32 {
        sink.put_pixel(x, y, color)?;
    }
    Ok(())
}

fn vline<S: PixelSink + ?Sized>(
    sink: &mut S,
    x: i32,
    y0: i32,
    y1: i32,
    color: Color,
) -> Result<(), CanvasError> {
    for y in y0..=y1 {
        sink.put_pixel(x, y, color)?;
    }
    Ok(())
}

fn line<S: PixelSink + ?Sized>(
    sink: &mut S,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color,
) -> Result<(), CanvasError> {
    // i64 so that extreme endpoints cannot overflow the error terms.
    let (mut x, mut y) = (x0 as i64, y0 as i64);
    let (x1, y1) = (x1 as i64, y1 as i64);
    let dx = (x1 - x).abs();
    let dy = (y1 - y).abs();
    let sx = if x < x1 { 1 } else { -1 };
    let sy = if y < y1 { 1 } else { -1 };
    let mut err = dx - dy;

    loop {
        sink.put_pixel(x as i32, y as i32, color)?;
        if x == x1 && y == y1 {
            return Ok(());
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

fn sampled_curve<S, F>(sink: &mut S, curve: F, steps: u32, color: Color) -> Result<(), CanvasError>
where
    S: PixelSink + ?Sized,
    F: Fn(f64) -> (f64, f64),
{
    let steps = steps.max(1);
    let mut previous: Option<Point> = None;
    for i in 0..=steps {
        let point = Point::from(curve(i as f64 / steps as f64));
        if let Some(prev) = previous {
            line(sink, prev.x, prev.y, point.x, point.y, color)?;
        }
        previous = Some(point);
    }
    Ok(())
}

// ── Midpoint iterators ───────────────────────────────────────────

/// Octant points `(x, y)` with `0 < x <= y` of a midpoint circle,
/// excluding the four axis points. Empty for a negative radius.
struct MidpointCircle {
    f: i64,
    ddf_x: i64,
    ddf_y: i64,
    x: i64,
    y: i64,
}

impl MidpointCircle {
    fn new(r: i64) -> Self {
        Self {
            f: 1 - r,
            ddf_x: 1,
            ddf_y: -2 * r,
            x: 0,
            y: r,
        }
    }
}

impl Iterator for MidpointCircle {
    type Item = (i64, i64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.x >= self.y {
            return None;
        }
        if self.f >= 0 {
            self.y -= 1;
            self.ddf_y += 2;
            self.f += self.ddf_y;
        }
        self.x += 1;
        self.ddf_x += 2;
        self.f += self.ddf_x;
        Some((self.x, self.y))
    }
}

/// Visit the first-quadrant points of a two-region midpoint ellipse.
///
/// Region 1 steps along x from the top of the ellipse, region 2 steps
/// along y from its right end; each stops where the slope passes -1.
/// The decision terms grow with the cube of the semi-axes, hence `i128`.
fn walk_ellipse<F>(a: u32, b: u32, mut visit: F) -> Result<(), CanvasError>
where
    F: FnMut(i64, i64) -> Result<(), CanvasError>,
{
    // Both loops stall on a zero-sized ellipse.
    if a == 0 && b == 0 {
        return visit(0, 0);
    }

    let (a, b) = (i128::from(a), i128::from(b));
    let (a2, b2) = (a * a, b * b);
    let (fa2, fb2) = (4 * a2, 4 * b2);

    let (mut x, mut y) = (0i128, b);
    let mut sigma = 2 * b2 + a2 * (1 - 2 * b);
    while b2 * x <= a2 * y {
        visit(x as i64, y as i64)?;
        if sigma >= 0 {
            sigma += fa2 * (1 - y);
            y -= 1;
        }
        sigma += b2 * (4 * x + 6);
        x += 1;
    }

    let (mut x, mut y) = (a, 0i128);
    let mut sigma = 2 * a2 + b2 * (1 - 2 * a);
    while a2 * y <= b2 * x {
        visit(x as i64, y as i64)?;
        if sigma >= 0 {
            sigma += fb2 * (1 - x);
            x -= 1;
        }
        sigma += a2 * (4 * y + 6);
        y += 1;
    }
    Ok(())
}

// ── Tests ────────────────────────────────────────────────────────
