//! Drawing primitives, the instruction model and render backends.
//!
//! This module defines the drawing vocabulary of the board:
//! - [`Instruction`]: serializable record of one drawing operation (or a group)
//! - [`DrawingSurface`]: performs operations and returns their instructions
//! - [`RenderContext`]: boundary to a concrete 2D context
//! - [`CairoCanvas`] and [`MemoryCanvas`]: the two bundled contexts

pub mod cairo_canvas;
pub mod color;
pub mod instruction;
pub mod memory;
pub mod shapes;
pub mod surface;

// Re-export commonly used types at module level
pub use cairo_canvas::CairoCanvas;
pub use color::{Color, random_color};
pub use instruction::{Instruction, TimeStamped};
pub use memory::MemoryCanvas;
pub use shapes::{CircleSpec, ShapeStyle};
pub use surface::{DrawingSurface, RenderContext};
