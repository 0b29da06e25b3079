//! In-memory render context that records every call it receives.

use super::color::{BLACK, Color};
use super::instruction::Instruction;
use super::surface::RenderContext;

#[derive(Clone, Copy, Debug)]
struct StyleState {
    line_width: f64,
    stroke: Color,
    fill: Color,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            line_width: 1.0,
            stroke: BLACK,
            fill: BLACK,
        }
    }
}

/// Headless canvas: keeps the dimensions, the style state and a flat log of
/// calls expressed as primitive [`Instruction`]s.
#[derive(Debug, Default)]
pub struct MemoryCanvas {
    width: f64,
    height: f64,
    style: StyleState,
    saved: Vec<StyleState>,
    calls: Vec<Instruction>,
}

impl MemoryCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> &[Instruction] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<Instruction> {
        std::mem::take(&mut self.calls)
    }

    /// Calls received since the most recent full-surface clear.
    pub fn calls_since_clear(&self) -> &[Instruction] {
        let start = self
            .calls
            .iter()
            .rposition(|call| {
                matches!(call, Instruction::ClearRect { x, y, width, height }
                    if *x == 0.0 && *y == 0.0 && *width >= self.width && *height >= self.height)
            })
            .map(|idx| idx + 1)
            .unwrap_or(0);
        &self.calls[start..]
    }

    pub fn line_width(&self) -> f64 {
        self.style.line_width
    }

    pub fn stroke_color(&self) -> Color {
        self.style.stroke
    }

    pub fn fill_color(&self) -> Color {
        self.style.fill
    }
}

impl RenderContext for MemoryCanvas {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn begin_path(&mut self) {
        self.calls.push(Instruction::BeginPath);
    }

    fn close_path(&mut self) {
        self.calls.push(Instruction::ClosePath);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.calls.push(Instruction::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.calls.push(Instruction::LineTo { x, y });
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
        self.calls.push(Instruction::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        });
    }

    fn stroke(&mut self) {
        self.calls.push(Instruction::Stroke);
    }

    fn fill(&mut self) {
        self.calls.push(Instruction::Fill);
    }

    fn save(&mut self) {
        self.saved.push(self.style);
        self.calls.push(Instruction::Save);
    }

    fn restore(&mut self) {
        if let Some(style) = self.saved.pop() {
            self.style = style;
        }
        self.calls.push(Instruction::Restore);
    }

    fn set_line_width(&mut self, width: f64) {
        self.style.line_width = width;
        self.calls.push(Instruction::LineWidth { width });
    }

    fn set_stroke_style(&mut self, color: Color) {
        self.style.stroke = color;
        self.calls.push(Instruction::StrokeStyle { color });
    }

    fn set_fill_style(&mut self, color: Color) {
        self.style.fill = color;
        self.calls.push(Instruction::FillStyle { color });
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.calls.push(Instruction::ClearRect {
            x,
            y,
            width,
            height,
        });
    }
}
