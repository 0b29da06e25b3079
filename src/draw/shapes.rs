//! Composite shapes built from surface primitives.
//!
//! Each helper draws immediately and returns a single [`Instruction::Group`]
//! so the shape can be committed, logged and replayed as one unit.

use std::f64::consts::PI;

use rand::Rng;

use super::color::{Color, random_color};
use super::instruction::Instruction;
use super::surface::{DrawingSurface, RenderContext};
use crate::config::DrawingConfig;

/// Bounds of the random end angle, in thousandths of a radian.
const END_ANGLE_MILLIS_MIN: u32 = (PI * 100.0) as u32;
const END_ANGLE_MILLIS_MAX: u32 = (PI * 1000.0) as u32;

/// Appearance parameters for composite shapes.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeStyle {
    /// Stroke width of random circles
    pub line_width: f64,
    /// Smallest random circle radius (inclusive)
    pub circle_min_radius: u32,
    /// Largest random circle radius (inclusive)
    pub circle_max_radius: u32,
    /// Radius of click markers and polygon vertex markers
    pub marker_radius: f64,
    /// Stroke and fill color of markers; also the polygon outline color
    pub marker_color: Color,
    /// Stroke width of polygon outlines
    pub polygon_line_width: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self::from_config(&DrawingConfig::default())
    }
}

impl ShapeStyle {
    pub fn from_config(config: &DrawingConfig) -> Self {
        Self {
            line_width: config.line_width,
            circle_min_radius: config.circle_min_radius,
            circle_max_radius: config.circle_max_radius,
            marker_radius: config.marker_radius,
            marker_color: Color::from_array(config.marker_color),
            polygon_line_width: config.polygon_line_width,
        }
    }
}

/// Resolved geometry of a drawn circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircleSpec {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl<C: RenderContext> DrawingSurface<C> {
    /// Draws a randomly styled circle.
    ///
    /// Without explicit angles the start angle is a random integer in 0..360
    /// used directly as radians, and the end angle a random value between
    /// pi/10 and pi. Arcs therefore often wind several times around the
    /// centre, which is the intended look.
    pub fn circle(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: Option<f64>,
        end_angle: Option<f64>,
    ) -> (Instruction, CircleSpec) {
        let start_angle =
            start_angle.unwrap_or_else(|| f64::from(self.rng.gen_range(0..360u32)));
        let end_angle = end_angle.unwrap_or_else(|| {
            f64::from(self.rng.gen_range(END_ANGLE_MILLIS_MIN..=END_ANGLE_MILLIS_MAX)) / 1000.0
        });
        let stroke = random_color(&mut self.rng, Some(1.0));
        let fill = random_color(&mut self.rng, None);
        let line_width = self.style.line_width;

        let instructions = vec![
            self.stroke_style(stroke),
            self.fill_style(fill),
            self.line_width(line_width),
            self.begin_path(),
            self.arc(x, y, radius, start_angle, end_angle, false),
            self.stroke(),
            self.fill(),
        ];

        (
            Instruction::group(instructions),
            CircleSpec {
                x,
                y,
                radius,
                start_angle,
                end_angle,
            },
        )
    }

    /// Draws a circle with a random radius from the configured range.
    pub fn random_circle(&mut self, x: f64, y: f64) -> (Instruction, CircleSpec) {
        let min = self.style.circle_min_radius;
        let max = self.style.circle_max_radius.max(min);
        let radius = f64::from(self.rng.gen_range(min..=max));
        self.circle(x, y, radius, None, None)
    }

    /// Draws a small full-turn marker at `(x, y)`.
    pub fn marker(&mut self, x: f64, y: f64) -> Instruction {
        let color = self.style.marker_color;
        let radius = self.style.marker_radius;
        Instruction::group(vec![
            self.stroke_style(color),
            self.fill_style(color),
            self.line_width(1.0),
            self.begin_path(),
            self.arc(x, y, radius, 0.0, 2.0 * PI, false),
            self.stroke(),
            self.fill(),
        ])
    }

    /// Strokes an open path through `points` and marks every committed vertex.
    ///
    /// `candidate` extends the path to a point that is not a vertex yet
    /// (the pointer position while building a polygon).
    pub fn polygon_preview(
        &mut self,
        points: &[(f64, f64)],
        candidate: Option<(f64, f64)>,
    ) -> Instruction {
        let mut path: Vec<(f64, f64)> = points.to_vec();
        path.extend(candidate);

        let mut instructions = Vec::new();
        if path.len() >= 2 {
            let color = self.style.marker_color;
            let width = self.style.polygon_line_width;
            instructions.push(self.stroke_style(color));
            instructions.push(self.line_width(width));
            instructions.push(self.begin_path());
            instructions.extend(self.trace(&path));
            instructions.push(self.stroke());
        }
        for &(x, y) in points {
            instructions.push(self.marker(x, y));
        }
        Instruction::group(instructions)
    }

    /// Draws a closed, filled polygon followed by one marker per vertex.
    ///
    /// The result is `Group[outline, marker, marker, ...]`.
    pub fn closed_polygon(&mut self, points: &[(f64, f64)], fill: Color) -> Instruction {
        let color = self.style.marker_color;
        let width = self.style.polygon_line_width;

        let mut outline = vec![
            self.stroke_style(color),
            self.fill_style(fill),
            self.line_width(width),
            self.begin_path(),
        ];
        outline.extend(self.trace(points));
        outline.push(self.close_path());
        outline.push(self.fill());
        outline.push(self.stroke());

        let mut members = vec![Instruction::group(outline)];
        for &(x, y) in points {
            members.push(self.marker(x, y));
        }
        Instruction::group(members)
    }

    /// Random fill for a closed polygon.
    pub fn random_fill(&mut self) -> Color {
        random_color(&mut self.rng, None)
    }

    fn trace(&mut self, points: &[(f64, f64)]) -> Vec<Instruction> {
        let mut out = Vec::with_capacity(points.len());
        if let Some((&(x, y), rest)) = points.split_first() {
            out.push(self.move_to(x, y));
            for &(x, y) in rest {
                out.push(self.line_to(x, y));
            }
        }
        out
    }
}
