//! Shape records and the enumerations they are keyed by

pub mod collection;
pub mod color;
pub mod kind;
pub mod roi;
pub mod shape;

pub use collection::{CollectionStats, RegionGroups, ShapeCollection};
pub use color::Color;
pub use kind::{Family, ShapeType};
pub use roi::Roi;
pub use shape::ColoredShape;
