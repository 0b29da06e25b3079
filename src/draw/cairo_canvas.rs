//! Cairo-backed render context drawing into an in-memory image surface.

use std::io::Write;

use cairo::{Context, Format, ImageSurface, Operator};

use super::color::{BLACK, Color};
use super::surface::RenderContext;

#[derive(Clone, Copy, Debug)]
struct StyleState {
    line_width: f64,
    stroke: Color,
    fill: Color,
}

/// Render context over a cairo ARGB32 image surface.
///
/// Cairo has a single source and consumes the path on stroke/fill, while the
/// canvas model keeps separate stroke and fill styles and leaves the path in
/// place. This adapter tracks both styles itself and uses the `*_preserve`
/// variants.
pub struct CairoCanvas {
    surface: ImageSurface,
    ctx: Context,
    style: StyleState,
    saved: Vec<StyleState>,
}

impl CairoCanvas {
    /// Creates a transparent canvas of the given size.
    pub fn new(width: i32, height: i32) -> Result<Self, cairo::Error> {
        let surface = ImageSurface::create(Format::ARgb32, width, height)?;
        let ctx = Context::new(&surface)?;
        let style = StyleState {
            line_width: 1.0,
            stroke: BLACK,
            fill: BLACK,
        };
        ctx.set_line_width(style.line_width);
        Ok(Self {
            surface,
            ctx,
            style,
            saved: Vec::new(),
        })
    }

    pub fn surface(&self) -> &ImageSurface {
        &self.surface
    }

    /// Encodes the current pixels as PNG.
    pub fn write_png<W: Write>(&self, writer: &mut W) -> Result<(), cairo::IoError> {
        self.surface.flush();
        self.surface.write_to_png(writer)
    }

    fn set_source(&self, color: Color) {
        self.ctx.set_source_rgba(color.r, color.g, color.b, color.a);
    }
}

impl RenderContext for CairoCanvas {
    fn width(&self) -> f64 {
        f64::from(self.surface.width())
    }

    fn height(&self) -> f64 {
        f64::from(self.surface.height())
    }

    fn begin_path(&mut self) {
        self.ctx.new_path();
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.ctx.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.ctx.line_to(x, y);
    }

    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) {
        if anticlockwise {
            self.ctx.arc_negative(x, y, radius, start_angle, end_angle);
        } else {
            self.ctx.arc(x, y, radius, start_angle, end_angle);
        }
    }

    fn stroke(&mut self) {
        self.set_source(self.style.stroke);
        if let Err(err) = self.ctx.stroke_preserve() {
            log::warn!("Cairo stroke failed: {}", err);
        }
    }

    fn fill(&mut self) {
        self.set_source(self.style.fill);
        if let Err(err) = self.ctx.fill_preserve() {
            log::warn!("Cairo fill failed: {}", err);
        }
    }

    fn save(&mut self) {
        self.saved.push(self.style);
        if let Err(err) = self.ctx.save() {
            log::warn!("Cairo save failed: {}", err);
        }
    }

    fn restore(&mut self) {
        if let Some(style) = self.saved.pop() {
            self.style = style;
            if let Err(err) = self.ctx.restore() {
                log::warn!("Cairo restore failed: {}", err);
            }
        }
    }

    fn set_line_width(&mut self, width: f64) {
        self.style.line_width = width;
        self.ctx.set_line_width(width);
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.style.stroke = color;
    }

    fn set_fill_style(&mut self, color: Color) {
        self.style.fill = color;
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        // Clearing must not disturb the current path.
        let path = self.ctx.copy_path().ok();
        self.ctx.new_path();
        self.ctx.rectangle(x, y, width, height);
        let previous = self.ctx.operator();
        self.ctx.set_operator(Operator::Clear);
        if let Err(err) = self.ctx.fill() {
            log::warn!("Cairo clear failed: {}", err);
        }
        self.ctx.set_operator(previous);
        if let Some(path) = path {
            self.ctx.append_path(&path);
        }
    }
}
