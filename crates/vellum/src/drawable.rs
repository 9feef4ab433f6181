//! The drawable: a positioned group of items with a tracked size.
//!
//! A drawable owns its items and a declared size. Rendering can grow the
//! size (text measures wider than declared) but never shrinks it, so the
//! rectangle stays valid for clearing between animation cycles.

use vellum_core::geometry::{Insets, Point, Size};

use crate::item::Item;
use crate::surface::Surface;

/// A positioned group of items.
#[derive(Debug, Default)]
pub struct Drawable {
    origin: Point,
    size: Size,
    margin: Insets,
    items: Vec<Item>,
}

impl Drawable {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    /// Sets the origin.
    pub fn with_origin(mut self, origin: Point) -> Self {
        self.origin = origin;
        self
    }

    /// Sets the margin used by box layout.
    pub fn with_margin(mut self, margin: Insets) -> Self {
        self.margin = margin;
        self
    }

    /// Sets the items to render, replacing any previous ones.
    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.items = items;
        self
    }

    /// Returns the top-left origin
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the current size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the layout margin
    pub fn margin(&self) -> Insets {
        self.margin
    }

    /// Returns the items
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.origin = origin;
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn set_margin(&mut self, margin: Insets) {
        self.margin = margin;
    }

    pub fn set_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }

    pub fn push_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Size including the layout margin.
    pub fn extent(&self) -> Size {
        self.size.add_padding(self.margin)
    }

    /// Clears this drawable's rectangle plus `guard` pixels on every side.
    pub fn clear(&self, surface: &mut dyn Surface, guard: f32) {
        surface.clear_rect(
            Point::new(self.origin.x() - guard, self.origin.y() - guard),
            Size::new(
                self.size.width() + 2.0 * guard,
                self.size.height() + 2.0 * guard,
            ),
        );
    }

    pub(crate) fn take_items(&mut self) -> Vec<Item> {
        std::mem::take(&mut self.items)
    }

    pub(crate) fn restore_items(&mut self, items: Vec<Item>) {
        self.items = items;
    }
}

#[cfg(test)]
mod tests {
    use crate::surface::recording::{RecordingSurface, SurfaceOp};

    use super::*;

    #[test]
    fn test_clear_includes_guard() {
        let drawable = Drawable::new(Size::new(100.0, 50.0)).with_origin(Point::new(10.0, 20.0));
        let mut surface = RecordingSurface::new();
        drawable.clear(&mut surface, 2.0);
        assert_eq!(
            surface.ops(),
            &[SurfaceOp::ClearRect {
                origin: Point::new(8.0, 18.0),
                size: Size::new(104.0, 54.0),
            }]
        );
    }

    #[test]
    fn test_extent_adds_margin() {
        let drawable =
            Drawable::new(Size::new(10.0, 10.0)).with_margin(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(drawable.extent(), Size::new(16.0, 14.0));
    }
}
