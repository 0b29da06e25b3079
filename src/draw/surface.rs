//! Drawing surface capability.
//!
//! [`RenderContext`] is the boundary to a real 2D rendering context. The
//! [`DrawingSurface`] wraps one and makes every operation dual-purpose: it
//! performs the call and returns the [`Instruction`] describing what was done.

use rand::SeedableRng;
use rand::rngs::StdRng;

use super::color::Color;
use super::instruction::Instruction;
use super::shapes::ShapeStyle;

/// Opaque 2D rendering context the surface draws through.
///
/// Mirrors the immediate-mode canvas model: a current path, separate stroke
/// and fill styles, and a save/restore stack for style state.
pub trait RenderContext {
    /// Current surface width in pixels.
    fn width(&self) -> f64;
    /// Current surface height in pixels.
    fn height(&self) -> f64;

    fn begin_path(&mut self);
    fn close_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    );
    fn stroke(&mut self);
    fn fill(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn set_line_width(&mut self, width: f64);
    fn set_stroke_style(&mut self, color: Color);
    fn set_fill_style(&mut self, color: Color);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
}

/// Executes primitives against a [`RenderContext`] and records them.
pub struct DrawingSurface<C> {
    ctx: C,
    pub(crate) rng: StdRng,
    pub(crate) style: ShapeStyle,
}

impl<C: RenderContext> DrawingSurface<C> {
    /// Wraps a context using the default shape style and an entropy-seeded RNG.
    pub fn new(ctx: C) -> Self {
        Self {
            ctx,
            rng: StdRng::from_entropy(),
            style: ShapeStyle::default(),
        }
    }

    /// Replaces the style used by composite shapes.
    pub fn with_style(mut self, style: ShapeStyle) -> Self {
        self.style = style;
        self
    }

    /// Seeds the random source (useful for deterministic tests).
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn into_context(self) -> C {
        self.ctx
    }

    pub fn style(&self) -> &ShapeStyle {
        &self.style
    }

    pub fn begin_path(&mut self) -> Instruction {
        self.ctx.begin_path();
        Instruction::BeginPath
    }

    pub fn close_path(&mut self) -> Instruction {
        self.ctx.close_path();
        Instruction::ClosePath
    }

    pub fn move_to(&mut self, x: f64, y: f64) -> Instruction {
        self.ctx.move_to(x, y);
        Instruction::MoveTo { x, y }
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> Instruction {
        self.ctx.line_to(x, y);
        Instruction::LineTo { x, y }
    }

    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Instruction {
        self.ctx
            .arc(x, y, radius, start_angle, end_angle, anticlockwise);
        Instruction::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        }
    }

    pub fn stroke(&mut self) -> Instruction {
        self.ctx.stroke();
        Instruction::Stroke
    }

    pub fn fill(&mut self) -> Instruction {
        self.ctx.fill();
        Instruction::Fill
    }

    pub fn save(&mut self) -> Instruction {
        self.ctx.save();
        Instruction::Save
    }

    pub fn restore(&mut self) -> Instruction {
        self.ctx.restore();
        Instruction::Restore
    }

    /// Sets the line width. The context receives the absolute value; the
    /// recorded instruction keeps the argument as given.
    pub fn line_width(&mut self, width: f64) -> Instruction {
        self.ctx.set_line_width(width.abs());
        Instruction::LineWidth { width }
    }

    pub fn stroke_style(&mut self, color: Color) -> Instruction {
        self.ctx.set_stroke_style(color);
        Instruction::StrokeStyle { color }
    }

    pub fn fill_style(&mut self, color: Color) -> Instruction {
        self.ctx.set_fill_style(color);
        Instruction::FillStyle { color }
    }

    /// Clears a rectangle. Omitted origin components default to 0 and omitted
    /// dimensions are read from the context at call time.
    pub fn clear_rect(
        &mut self,
        x: Option<f64>,
        y: Option<f64>,
        width: Option<f64>,
        height: Option<f64>,
    ) -> Instruction {
        let x = x.unwrap_or(0.0);
        let y = y.unwrap_or(0.0);
        let width = width.unwrap_or_else(|| self.ctx.width());
        let height = height.unwrap_or_else(|| self.ctx.height());
        self.ctx.clear_rect(x, y, width, height);
        Instruction::ClearRect {
            x,
            y,
            width,
            height,
        }
    }

    /// Clears the whole surface.
    pub fn clear(&mut self) -> Instruction {
        self.clear_rect(None, None, None, None)
    }

    /// Performs a previously recorded instruction and returns the record of
    /// doing it again. Groups run their members in order and are re-wrapped.
    pub fn interpret(&mut self, instruction: &Instruction) -> Instruction {
        match instruction {
            Instruction::Arc {
                x,
                y,
                radius,
                start_angle,
                end_angle,
                anticlockwise,
            } => self.arc(*x, *y, *radius, *start_angle, *end_angle, *anticlockwise),
            Instruction::ClearRect {
                x,
                y,
                width,
                height,
            } => self.clear_rect(Some(*x), Some(*y), Some(*width), Some(*height)),
            Instruction::BeginPath => self.begin_path(),
            Instruction::ClosePath => self.close_path(),
            Instruction::Stroke => self.stroke(),
            Instruction::Fill => self.fill(),
            Instruction::Save => self.save(),
            Instruction::Restore => self.restore(),
            Instruction::LineWidth { width } => self.line_width(*width),
            Instruction::StrokeStyle { color } => self.stroke_style(*color),
            Instruction::FillStyle { color } => self.fill_style(*color),
            Instruction::MoveTo { x, y } => self.move_to(*x, *y),
            Instruction::LineTo { x, y } => self.line_to(*x, *y),
            Instruction::Group { instructions } => Instruction::group(self.interpret_all(instructions)),
        }
    }

    /// Interprets a sequence strictly in order.
    pub fn interpret_all(&mut self, instructions: &[Instruction]) -> Vec<Instruction> {
        instructions
            .iter()
            .map(|instruction| self.interpret(instruction))
            .collect()
    }

    /// Clears the surface and replays `log` on top of it.
    pub fn redraw(&mut self, log: &[Instruction]) -> Vec<Instruction> {
        self.clear();
        self.interpret_all(log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::MemoryCanvas;

    #[test]
    fn clear_rect_reads_dimensions_lazily() {
        let mut surface = DrawingSurface::new(MemoryCanvas::new(100.0, 50.0));
        assert_eq!(
            surface.clear(),
            Instruction::ClearRect {
                x: 0.0,
                y: 0.0,
                width: 100.0,
                height: 50.0,
            }
        );

        surface.context_mut().resize(300.0, 200.0);
        assert_eq!(
            surface.clear_rect(Some(5.0), None, None, Some(10.0)),
            Instruction::ClearRect {
                x: 5.0,
                y: 0.0,
                width: 300.0,
                height: 10.0,
            }
        );
    }

    #[test]
    fn line_width_records_argument_but_applies_absolute_value() {
        let mut surface = DrawingSurface::new(MemoryCanvas::new(10.0, 10.0));
        assert_eq!(surface.line_width(-3.0), Instruction::LineWidth { width: -3.0 });
        assert_eq!(surface.context().line_width(), 3.0);
    }

    #[test]
    fn interpret_reproduces_recorded_instructions() {
        let mut original = DrawingSurface::new(MemoryCanvas::new(640.0, 480.0)).with_seed(3);
        let mut recorded = vec![original.clear()];
        for (x, y) in [(10.0, 20.0), (200.0, 120.0), (320.0, 40.0)] {
            let (group, _) = original.circle(x, y, 40.0, None, None);
            recorded.push(group);
        }
        recorded.push(original.marker(5.0, 5.0));
        recorded.push(original.save());
        recorded.push(original.move_to(1.0, 1.0));
        recorded.push(original.line_to(2.0, 3.0));
        recorded.push(original.close_path());
        recorded.push(original.restore());

        let mut fresh = DrawingSurface::new(MemoryCanvas::new(640.0, 480.0));
        let replayed = fresh.interpret_all(&recorded);
        assert_eq!(replayed, recorded);
        assert_eq!(fresh.context().calls(), original.context().calls());
    }

    #[test]
    fn redraw_clears_before_replaying() {
        let mut surface = DrawingSurface::new(MemoryCanvas::new(20.0, 20.0));
        let log = vec![Instruction::BeginPath, Instruction::Stroke];
        surface.redraw(&log);
        let calls = surface.context().calls();
        assert!(matches!(calls[0], Instruction::ClearRect { .. }));
        assert_eq!(&calls[1..], &log[..]);
    }
}
