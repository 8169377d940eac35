//! Bubble chart layout engine.
//!
//! Records are sized by a square-root [`chart::ValueScale`], scattered over
//! the canvas and animated by a cooling force simulation toward either the
//! canvas center or one anchor per group.

pub mod chart;
pub mod config;
pub mod records;
pub mod util;

pub use chart::{BubbleChart, ChartSnapshot, LayoutMode};
pub use config::ChartConfig;
pub use records::{Record, RecordError, load_records};
