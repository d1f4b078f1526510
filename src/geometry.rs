// =============================================================================
// GEOMETRY.RS — Rectangle primitives for the scene layer
//
// Every drawable in the scene has rectangular bounds; hit-testing against
// points (mouse clicks) and other rectangles (overlap checks) both go
// through `Rect`.
// =============================================================================

use glam::Vec2;

/// An axis-aligned rectangle in screen pixels, top-left anchored.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f32 { self.x }
    pub fn top(&self) -> f32 { self.y }
    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// True if `(px, py)` falls inside this rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges
    /// exclusive, so adjacent rectangles never both claim a shared edge.
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.left() && px < self.right() && py >= self.top() && py < self.bottom()
    }

    /// True if this rectangle and `other` overlap by any positive area.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contains_interior_point() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(15.0, 15.0));
    }

    #[test]
    fn contains_is_left_top_inclusive_right_bottom_exclusive() {
        let r = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(r.contains(10.0, 10.0));
        assert!(!r.contains(30.0, 15.0));
        assert!(!r.contains(15.0, 30.0));
    }

    #[test]
    fn intersects_overlapping() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn intersects_disjoint() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn edge_touching_rects_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
    }

    #[test]
    fn center_of_rect() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        let c = r.center();
        assert_eq!(c.x, 25.0);
        assert_eq!(c.y, 40.0);
    }
}
