//! Brick Core
//!
//! Frame-local data model for the brick shape classifier: colours, shape
//! types, regions of interest and the per-frame shape collection.

pub mod report;
pub mod shapes;

pub use report::{FrameEvent, FrameReport, StrategyKind};
pub use shapes::{Color, ColoredShape, Family, RegionGroups, Roi, ShapeCollection, ShapeType};
