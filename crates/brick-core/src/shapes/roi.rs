use serde::{Deserialize, Serialize};

/// Axis-aligned region of interest in image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Roi {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Roi {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Pixel area of the box (`width * height`)
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Integer centre of the box
    pub fn center(&self) -> (i32, i32) {
        (self.x + self.width / 2, self.y + self.height / 2)
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_uses_integer_halves() {
        let roi = Roi::new(10, 20, 5, 7);
        assert_eq!(roi.center(), (12, 23));
        assert_eq!(roi.area(), 35);
        assert_eq!((roi.right(), roi.bottom()), (15, 27));
    }
}
