use crate::foundation::core::{Canvas, Point, StrokeStyle};
use crate::foundation::error::PlumResult;

/// Rectangular drawing target the growth engine strokes onto.
///
/// Setting the size discards all pixels, like resizing an HTML canvas. Coordinates outside the
/// surface are clipped, never rejected.
pub trait Surface {
    /// Current dimensions.
    fn canvas(&self) -> Canvas;

    /// Resize to `canvas`, discarding all drawn content.
    fn resize(&mut self, canvas: Canvas) -> PlumResult<()>;

    /// Erase all drawn content, keeping the size.
    fn clear(&mut self);

    /// Color and width applied to subsequent lines. Lines drawn earlier keep their style.
    fn set_stroke_style(&mut self, style: StrokeStyle) -> PlumResult<()>;

    /// Stroke a straight line between two points.
    fn draw_line(&mut self, from: Point, to: Point);

    /// Make every line drawn so far visible in the pixel buffer.
    ///
    /// Surfaces that rasterize eagerly have nothing to do here.
    fn flush(&mut self) -> PlumResult<()> {
        Ok(())
    }
}

/// One call observed by a [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// [`Surface::resize`].
    Resize(Canvas),
    /// [`Surface::clear`].
    Clear,
    /// [`Surface::set_stroke_style`].
    StrokeStyle(StrokeStyle),
    /// [`Surface::draw_line`].
    Line {
        /// Segment start.
        from: Point,
        /// Segment end.
        to: Point,
    },
    /// [`Surface::flush`].
    Flush,
}

/// Surface that keeps a log of every operation instead of pixels.
#[derive(Clone, Debug)]
pub struct RecordingSurface {
    canvas: Canvas,
    ops: Vec<SurfaceOp>,
}

impl RecordingSurface {
    /// Create an empty log for a surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    /// Every operation in call order.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Lines stroked so far, in call order.
    pub fn lines(&self) -> impl Iterator<Item = (Point, Point)> + '_ {
        self.ops.iter().filter_map(|op| match *op {
            SurfaceOp::Line { from, to } => Some((from, to)),
            _ => None,
        })
    }

    /// Number of lines stroked so far.
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }

    /// Forget the log, keeping the size.
    pub fn reset_log(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) -> PlumResult<()> {
        self.canvas = canvas;
        self.ops.push(SurfaceOp::Resize(canvas));
        Ok(())
    }

    fn clear(&mut self) {
        self.ops.push(SurfaceOp::Clear);
    }

    fn set_stroke_style(&mut self, style: StrokeStyle) -> PlumResult<()> {
        self.ops.push(SurfaceOp::StrokeStyle(style));
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        self.ops.push(SurfaceOp::Line { from, to });
    }

    fn flush(&mut self) -> PlumResult<()> {
        self.ops.push(SurfaceOp::Flush);
        Ok(())
    }
}

/// Surface that only counts lines. Used for long headless runs where pixels are irrelevant.
#[derive(Clone, Copy, Debug)]
pub struct NullSurface {
    canvas: Canvas,
    lines: u64,
}

impl NullSurface {
    /// Create a counter for a surface of the given size.
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas, lines: 0 }
    }

    /// Lines stroked since the last clear or resize.
    pub fn lines_drawn(&self) -> u64 {
        self.lines
    }
}

impl Surface for NullSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) -> PlumResult<()> {
        self.canvas = canvas;
        self.lines = 0;
        Ok(())
    }

    fn clear(&mut self) {
        self.lines = 0;
    }

    fn set_stroke_style(&mut self, _style: StrokeStyle) -> PlumResult<()> {
        Ok(())
    }

    fn draw_line(&mut self, _from: Point, _to: Point) {
        self.lines += 1;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
