//! Float placement and the per-area float band registry.
//!
//! Floated boxes are removed from normal stacking and registered here in
//! page-absolute coordinates. Line boxes and cleared blocks query the
//! registry for horizontal insets and clearance. The registry is reset for
//! every new area; floats never carry across an area boundary.

use quire_style::flow::{Clear, Float};
use quire_types::geometry::{Rect, Size};

#[derive(Debug)]
pub struct FloatContext {
    /// The area content box, page-absolute.
    content: Rect,
    left: Vec<Rect>,
    right: Vec<Rect>,
}

impl FloatContext {
    pub fn new(content: Rect) -> Self {
        Self {
            content,
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    pub fn content(&self) -> Rect {
        self.content
    }

    pub fn has_floats(&self) -> bool {
        !self.left.is_empty() || !self.right.is_empty()
    }

    /// Horizontal inset from the content left edge for the band
    /// `[y, y + height)`.
    pub fn left_inset(&self, y: f32, height: f32) -> f32 {
        let band = Rect::new(self.content.x, y, self.content.width, height.max(0.01));
        self.left
            .iter()
            .filter(|r| r.overlaps_vertically(&band))
            .map(|r| r.right() - self.content.x)
            .fold(0.0, f32::max)
    }

    /// Horizontal inset from the content right edge for the band
    /// `[y, y + height)`.
    pub fn right_inset(&self, y: f32, height: f32) -> f32 {
        let band = Rect::new(self.content.x, y, self.content.width, height.max(0.01));
        self.right
            .iter()
            .filter(|r| r.overlaps_vertically(&band))
            .map(|r| self.content.right() - r.x)
            .fold(0.0, f32::max)
    }

    /// The absolute Y at which content clearing the given side(s) may start,
    /// given it would otherwise start at `y`.
    pub fn clearance(&self, clear: Clear, y: f32) -> f32 {
        let bottom_of = |rects: &[Rect]| rects.iter().map(Rect::bottom).fold(y, f32::max);
        match clear {
            Clear::None => y,
            Clear::Left => bottom_of(&self.left),
            Clear::Right => bottom_of(&self.right),
            Clear::Both => bottom_of(&self.left).max(bottom_of(&self.right)),
        }
    }

    /// The bottom of the lowest registered float, or the top of the content
    /// box when there are none.
    pub fn lowest_bottom(&self) -> f32 {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(Rect::bottom)
            .fold(self.content.y, f32::max)
    }

    /// The next Y below `y` at which some float ends, if any. Used to step
    /// down when a band is too narrow.
    fn next_relief_y(&self, y: f32) -> Option<f32> {
        self.left
            .iter()
            .chain(self.right.iter())
            .map(Rect::bottom)
            .filter(|&b| b > y + 0.01)
            .fold(None, |acc: Option<f32>, b| {
                Some(acc.map_or(b, |a| a.min(b)))
            })
    }

    /// Places a float of `size` on `side`, starting no higher than `y`, and
    /// registers it. Floats stack side by side while the band has room, then
    /// drop below the shallowest obstructing float.
    pub fn place(&mut self, side: Float, size: Size, mut y: f32) -> Rect {
        // One step per registered float bounds the search.
        for _ in 0..=(self.left.len() + self.right.len()) {
            let li = self.left_inset(y, size.height);
            let ri = self.right_inset(y, size.height);
            let available = self.content.width - li - ri;
            if size.width <= available + 0.01 {
                break;
            }
            match self.next_relief_y(y) {
                Some(next) => y = next,
                // Wider than the content box: place at the current band and
                // let it overflow.
                None => break,
            }
        }

        let li = self.left_inset(y, size.height);
        let ri = self.right_inset(y, size.height);
        let x = match side {
            Float::Right => self.content.right() - ri - size.width,
            _ => self.content.x + li,
        };

        let rect = Rect::new(x, y, size.width, size.height);
        match side {
            Float::Right => self.right.push(rect),
            _ => self.left.push(rect),
        }
        rect
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn content() -> Rect {
        Rect::new(0.0, 0.0, 400.0, 600.0)
    }

    #[test]
    fn left_float_insets_overlapping_bands_only() {
        let mut floats = FloatContext::new(content());
        floats.place(Float::Left, Size::new(100.0, 50.0), 0.0);

        assert_eq!(floats.left_inset(10.0, 10.0), 100.0);
        assert_eq!(floats.left_inset(60.0, 10.0), 0.0);
        assert_eq!(floats.right_inset(10.0, 10.0), 0.0);
    }

    #[test]
    fn floats_stack_then_drop_below() {
        let mut floats = FloatContext::new(content());
        let a = floats.place(Float::Left, Size::new(150.0, 40.0), 0.0);
        let b = floats.place(Float::Left, Size::new(150.0, 40.0), 0.0);
        // Third does not fit beside the first two (300 used of 400).
        let c = floats.place(Float::Left, Size::new(200.0, 40.0), 0.0);

        assert_eq!(a.x, 0.0);
        assert_eq!(b.x, 150.0);
        assert_eq!(c.y, 40.0);
        assert_eq!(c.x, 0.0);
    }

    #[test]
    fn right_float_hugs_right_edge() {
        let mut floats = FloatContext::new(content());
        let r = floats.place(Float::Right, Size::new(120.0, 30.0), 0.0);
        assert_eq!(r.right(), 400.0);
        assert_eq!(floats.right_inset(0.0, 30.0), 120.0);
    }

    #[test]
    fn clearance_skips_past_the_requested_side() {
        let mut floats = FloatContext::new(content());
        floats.place(Float::Left, Size::new(100.0, 80.0), 0.0);
        floats.place(Float::Right, Size::new(100.0, 120.0), 0.0);

        assert_eq!(floats.clearance(Clear::Left, 10.0), 80.0);
        assert_eq!(floats.clearance(Clear::Right, 10.0), 120.0);
        assert_eq!(floats.clearance(Clear::Both, 10.0), 120.0);
        assert_eq!(floats.clearance(Clear::None, 10.0), 10.0);
    }

    #[test]
    fn oversized_float_is_placed_anyway() {
        let mut floats = FloatContext::new(content());
        let r = floats.place(Float::Left, Size::new(500.0, 40.0), 0.0);
        assert_eq!(r.y, 0.0);
        assert_eq!(r.width, 500.0);
    }
}
