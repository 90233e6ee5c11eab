//! Rectangles.

use cgmath::{Point2, Vector2};

/// A rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Rectangle origin.
    pub origin: Point2<f64>,

    /// Rectangle size.
    pub size: Vector2<f64>,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(origin: Point2<f64>, size: Vector2<f64>) -> Rect {
        Rect { origin, size }
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.x
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.y
    }
}

#[test]
fn test_rect_edges() {
    let rect = Rect::new(Point2::new(10., 20.), Vector2::new(100., 50.));
    assert_eq!(rect.max_x(), 110.);
    assert_eq!(rect.max_y(), 70.);
    assert_eq!(rect.min_x(), 10.);
    assert_eq!(rect.min_y(), 20.);
}
