//! Serializable drawing instructions.
//!
//! Every primitive performed on a [`DrawingSurface`](super::DrawingSurface)
//! returns the [`Instruction`] describing it, so anything drawn can be logged
//! and replayed later without the input that originally triggered it.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// One primitive drawing operation, or an ordered group of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Instruction {
    /// Circular arc around `(x, y)`; angles in radians.
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    },
    /// Clears a rectangle to transparent. Dimensions are always resolved.
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BeginPath,
    ClosePath,
    Stroke,
    Fill,
    Save,
    Restore,
    LineWidth {
        width: f64,
    },
    StrokeStyle {
        color: Color,
    },
    FillStyle {
        color: Color,
    },
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    /// Compound shape treated as a single replayable unit. Groups may nest.
    Group {
        instructions: Vec<Instruction>,
    },
}

impl Instruction {
    /// Wraps instructions into a group.
    pub fn group(instructions: Vec<Instruction>) -> Self {
        Instruction::Group { instructions }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Instruction::Group { .. })
    }

    /// Direct members of a group; empty for primitives.
    pub fn members(&self) -> &[Instruction] {
        match self {
            Instruction::Group { instructions } => instructions,
            _ => &[],
        }
    }

    /// Number of primitive operations, descending into nested groups.
    pub fn primitive_count(&self) -> usize {
        match self {
            Instruction::Group { instructions } => {
                instructions.iter().map(Instruction::primitive_count).sum()
            }
            _ => 1,
        }
    }

    /// Primitive operations in execution order, with all grouping removed.
    pub fn flatten(&self) -> Vec<&Instruction> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into<'a>(&'a self, out: &mut Vec<&'a Instruction>) {
        match self {
            Instruction::Group { instructions } => {
                for instruction in instructions {
                    instruction.flatten_into(out);
                }
            }
            primitive => out.push(primitive),
        }
    }
}

/// A value paired with the moment it was finished.
///
/// `timestamp_ms` is milliseconds since the session clock origin; only the
/// differences between timestamps matter for replay.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TimeStamped<T> {
    pub payload: T,
    pub timestamp_ms: u64,
}

impl<T> TimeStamped<T> {
    pub fn new(payload: T, timestamp_ms: u64) -> Self {
        Self {
            payload,
            timestamp_ms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_group() -> Instruction {
        Instruction::group(vec![
            Instruction::LineWidth { width: 2.0 },
            Instruction::group(vec![Instruction::BeginPath, Instruction::Stroke]),
            Instruction::Fill,
        ])
    }

    #[test]
    fn primitive_count_descends_into_nested_groups() {
        assert_eq!(sample_group().primitive_count(), 4);
        assert_eq!(Instruction::Stroke.primitive_count(), 1);
    }

    #[test]
    fn flatten_keeps_execution_order() {
        let group = sample_group();
        let flat = group.flatten();
        assert_eq!(
            flat,
            vec![
                &Instruction::LineWidth { width: 2.0 },
                &Instruction::BeginPath,
                &Instruction::Stroke,
                &Instruction::Fill,
            ]
        );
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(Instruction::MoveTo { x: 1.0, y: 2.0 }).unwrap();
        assert_eq!(json["type"], "moveTo");
        assert_eq!(json["x"], 1.0);

        let parsed: Instruction = serde_json::from_value(serde_json::to_value(sample_group()).unwrap()).unwrap();
        assert_eq!(parsed, sample_group());
    }
}
