//! Axis-aligned rectangle used for hitboxes and drawing

use glam::DVec2;

/// A rectangle defined by its top-left corner and size
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Check if point is inside (right and bottom edges excluded)
    pub fn contains(&self, point: DVec2) -> bool {
        point.x >= self.left()
            && point.x < self.right()
            && point.y >= self.top()
            && point.y < self.bottom()
    }

    /// Open-interval overlap on both axes: rectangles sharing only an edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        let horizontal = self.left() < other.right() && self.right() > other.left();
        let vertical = self.top() < other.bottom() && self.bottom() > other.top();
        horizontal && vertical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 60.0);
        assert_eq!(r.center(), DVec2::new(25.0, 40.0));
    }

    #[test]
    fn identical_rects_overlap() {
        let r = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(r.overlaps(&r));
    }

    #[test]
    fn shared_edge_is_not_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.overlaps(&right));
        assert!(!right.overlaps(&a));
        assert!(!a.overlaps(&below));
    }

    #[test]
    fn one_axis_is_not_enough() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let far_below = Rect::new(5.0, 50.0, 10.0, 10.0);
        assert!(!a.overlaps(&far_below));
        assert!(a.overlaps(&Rect::new(9.5, 9.5, 1.0, 1.0)));
    }

    #[test]
    fn contains_excludes_far_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(DVec2::new(0.0, 0.0)));
        assert!(!r.contains(DVec2::new(10.0, 5.0)));
    }
}
