//! Numbered, timestamped listing of a frame's shapes

use brick_core::ShapeCollection;
use std::fmt::Write;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Local time when the offset is known, UTC otherwise
pub fn timestamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string())
}

pub fn format_listing(shapes: &ShapeCollection, timestamp: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[{}] {} shape(s)", timestamp, shapes.len());
    for (i, shape) in shapes.iter().enumerate() {
        let _ = write!(out, "  {:>2}. {}", i + 1, shape);
        if let Some(angle) = shape.angle {
            let _ = write!(out, ", {:.1} deg", angle);
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_core::{Color, ColoredShape, Roi, ShapeType};

    #[test]
    fn test_listing_numbers_shapes() {
        let mut first = ColoredShape::new(Roi::new(25, 25, 50, 50), Color::Blue);
        first.position = Some((0.5, 0.5));
        first.assign_classification(ShapeType::OneByFour, Some(90.0)).unwrap();
        let second = ColoredShape::new(Roi::new(0, 0, 10, 10), Color::Red);

        let listing = format_listing(&ShapeCollection::from_vec(vec![first, second]), "T");

        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines[0], "[T] 2 shape(s)");
        assert_eq!(lines[1], "   1. BLUE 1x4 Brick at (0.50, 0.50), 90.0 deg");
        assert!(lines[2].starts_with("   2. RED undefined Brick"));
    }

    #[test]
    fn test_timestamp_not_empty() {
        assert!(!timestamp().is_empty());
    }
}
