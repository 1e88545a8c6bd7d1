use crate::foundation::core::{Canvas, Point, StrokeStyle};
use crate::foundation::error::{PlumError, PlumResult};
use crate::foundation::math::over_in_place;
use crate::render::frame::FrameRGBA;
use crate::render::surface::Surface;

/// Raster surface powered by `vello_cpu`.
///
/// Lines are batched by [`Surface::draw_line`] and rasterized on [`Surface::flush`] into a
/// scratch layer, which is then composited over the persistent pixmap. Drawn content therefore
/// accumulates across flushes until the next clear or resize.
pub struct CpuSurface {
    canvas: Canvas,
    style: StrokeStyle,
    target: Option<CpuPixmaps>,
    batch: Vec<(Point, Point)>,
}

struct CpuPixmaps {
    width: u16,
    height: u16,
    pixmap: vello_cpu::Pixmap,
    scratch: vello_cpu::Pixmap,
}

impl CpuSurface {
    /// Create a transparent surface of the given size.
    pub fn new(canvas: Canvas) -> PlumResult<Self> {
        Ok(Self {
            canvas,
            style: StrokeStyle::default(),
            target: allocate(canvas)?,
            batch: Vec::new(),
        })
    }

    /// Number of lines drawn but not yet rasterized.
    pub fn pending_lines(&self) -> usize {
        self.batch.len()
    }

    /// Flush and read back the current pixels.
    pub fn snapshot(&mut self) -> PlumResult<FrameRGBA> {
        self.flush()?;
        let data = match &self.target {
            Some(t) => t.pixmap.data_as_u8_slice().to_vec(),
            None => Vec::new(),
        };
        Ok(FrameRGBA {
            width: self.canvas.width,
            height: self.canvas.height,
            data,
            premultiplied: true,
        })
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn resize(&mut self, canvas: Canvas) -> PlumResult<()> {
        self.batch.clear();
        self.target = allocate(canvas)?;
        self.canvas = canvas;
        Ok(())
    }

    fn clear(&mut self) {
        self.batch.clear();
        if let Some(t) = self.target.as_mut() {
            clear_pixmap(&mut t.pixmap);
        }
    }

    fn set_stroke_style(&mut self, style: StrokeStyle) -> PlumResult<()> {
        if !self.batch.is_empty() && style != self.style {
            self.flush()?;
        }
        self.style = style;
        Ok(())
    }

    fn draw_line(&mut self, from: Point, to: Point) {
        if self.target.is_some() {
            self.batch.push((from, to));
        }
    }

    fn flush(&mut self) -> PlumResult<()> {
        let Some(t) = self.target.as_mut() else {
            self.batch.clear();
            return Ok(());
        };
        if self.batch.is_empty() {
            return Ok(());
        }

        let mut ctx = vello_cpu::RenderContext::new(t.width, t.height);
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_stroke(vello_cpu::kurbo::Stroke::new(self.style.width));
        let c = self.style.color;
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
        for (from, to) in self.batch.drain(..) {
            let mut path = vello_cpu::kurbo::BezPath::new();
            path.move_to(point_to_cpu(from));
            path.line_to(point_to_cpu(to));
            ctx.stroke_path(&path);
        }
        ctx.flush();

        clear_pixmap(&mut t.scratch);
        ctx.render_to_pixmap(&mut t.scratch);
        if !over_in_place(
            t.pixmap.data_as_u8_slice_mut(),
            t.scratch.data_as_u8_slice(),
        ) {
            return Err(PlumError::render("scratch layer size mismatch"));
        }
        Ok(())
    }
}

fn allocate(canvas: Canvas) -> PlumResult<Option<CpuPixmaps>> {
    if canvas.is_empty() {
        return Ok(None);
    }
    let width: u16 = canvas
        .width
        .try_into()
        .map_err(|_| PlumError::render("surface width exceeds u16"))?;
    let height: u16 = canvas
        .height
        .try_into()
        .map_err(|_| PlumError::render("surface height exceeds u16"))?;
    Ok(Some(CpuPixmaps {
        width,
        height,
        pixmap: vello_cpu::Pixmap::new(width, height),
        scratch: vello_cpu::Pixmap::new(width, height),
    }))
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap) {
    pixmap.data_as_u8_slice_mut().fill(0);
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
