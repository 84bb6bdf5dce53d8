use serde::{Deserialize, Serialize};
use std::fmt;

use super::kind::Family;

/// Brick colour, one per segmentation pass.
///
/// Declaration order is the iteration order of every per-colour table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Blue,
    Green,
    Red,
    Yellow,
}

impl Color {
    pub const ALL: [Color; 4] = [Color::Blue, Color::Green, Color::Red, Color::Yellow];

    /// Upper-case display name
    pub fn name(&self) -> &'static str {
        match self {
            Color::Blue => "BLUE",
            Color::Green => "GREEN",
            Color::Red => "RED",
            Color::Yellow => "YELLOW",
        }
    }

    /// Lower-case name used in template file names
    pub fn file_stem(&self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Green => "green",
            Color::Red => "red",
            Color::Yellow => "yellow",
        }
    }

    /// The only family of shape types this colour is ever classified into
    pub fn family(&self) -> Family {
        match self {
            Color::Blue | Color::Yellow => Family::Narrow,
            Color::Red | Color::Green => Family::Wide,
        }
    }

    /// BGR drawing colour
    pub fn bgr(&self) -> (u8, u8, u8) {
        match self {
            Color::Blue => (255, 0, 0),
            Color::Green => (0, 255, 0),
            Color::Red => (0, 0, 255),
            Color::Yellow => (0, 255, 255),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_families_are_disjoint_per_color() {
        assert_eq!(Color::Blue.family(), Family::Narrow);
        assert_eq!(Color::Yellow.family(), Family::Narrow);
        assert_eq!(Color::Red.family(), Family::Wide);
        assert_eq!(Color::Green.family(), Family::Wide);
    }

    #[test]
    fn test_names() {
        assert_eq!(Color::Yellow.to_string(), "YELLOW");
        assert_eq!(Color::Red.file_stem(), "red");
    }
}
