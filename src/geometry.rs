use serde::{Deserialize, Serialize};

/// Integer size measured in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    #[serde(rename = "w")]
    pub width: u16,
    #[serde(rename = "h")]
    pub height: u16,
}

impl Size {
    pub const fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Rectangle anchored within a breakpoint's column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    #[serde(rename = "w")]
    pub width: u16,
    #[serde(rename = "h")]
    pub height: u16,
}

impl Rect {
    pub const fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_size(x: u16, y: u16, size: Size) -> Self {
        Self::new(x, y, size.width, size.height)
    }

    pub fn bottom(&self) -> u16 {
        self.y.saturating_add(self.height)
    }

    pub fn right(&self) -> u16 {
        self.x.saturating_add(self.width)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Strict interior intersection test. Rectangles that merely share an
    /// edge do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_detects_intersection() {
        let a = Rect::new(0, 0, 4, 3);
        let b = Rect::new(2, 1, 4, 3);
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn touching_edges_do_not_overlap() {
        let a = Rect::new(0, 0, 4, 3);
        let right = Rect::new(4, 0, 4, 3);
        let below = Rect::new(0, 3, 4, 3);
        assert!(!a.overlaps(&right));
        assert!(!right.overlaps(&a));
        assert!(!a.overlaps(&below));
        assert!(!below.overlaps(&a));
    }

    #[test]
    fn disjoint_rects_do_not_overlap() {
        let a = Rect::new(0, 0, 2, 2);
        let b = Rect::new(10, 10, 2, 2);
        assert!(!a.overlaps(&b));
        assert!(!b.overlaps(&a));
    }

    #[test]
    fn containment_counts_as_overlap() {
        let outer = Rect::new(0, 0, 10, 10);
        let inner = Rect::new(3, 3, 2, 2);
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }
}
