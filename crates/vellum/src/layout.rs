//! Box container layout.
//!
//! [`BoxLayout`] positions a row or column of drawables: children are
//! placed sequentially along the main axis, separated by `spacing`, each
//! honoring its own margin; the cross axis aligns every child inside the
//! tallest (or widest) extent.

use serde::Deserialize;
use vellum_core::geometry::{Point, Size};

use crate::drawable::Drawable;

/// Main-axis direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
}

/// Cross-axis placement of each child inside the container's extent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

/// A sequential box container.
#[derive(Debug, Clone, Copy)]
pub struct BoxLayout {
    orientation: Orientation,
    alignment: Alignment,
    spacing: f32,
}

impl BoxLayout {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            alignment: Alignment::default(),
            spacing: 0.0,
        }
    }

    /// Sets the cross-axis alignment.
    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the gap between consecutive children.
    pub fn with_spacing(mut self, spacing: f32) -> Self {
        self.spacing = spacing;
        self
    }

    /// Returns the main-axis direction
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Returns the cross-axis alignment
    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    /// Returns the gap between children
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    /// Positions `children` starting at `origin` and returns the total
    /// size of the arrangement, margins and spacing included.
    pub fn arrange(&self, children: &mut [Drawable], origin: Point) -> Size {
        let cross = children
            .iter()
            .map(|child| match self.orientation {
                Orientation::Horizontal => child.extent().height(),
                Orientation::Vertical => child.extent().width(),
            })
            .fold(0.0f32, f32::max);

        let mut main = 0.0;
        for (index, child) in children.iter_mut().enumerate() {
            if index > 0 {
                main += self.spacing;
            }
            let extent = child.extent();
            let margin = child.margin();
            match self.orientation {
                Orientation::Horizontal => {
                    let cross_offset = self.cross_offset(cross, extent.height());
                    child.set_origin(Point::new(
                        origin.x() + main + margin.left(),
                        origin.y() + cross_offset + margin.top(),
                    ));
                    main += extent.width();
                }
                Orientation::Vertical => {
                    let cross_offset = self.cross_offset(cross, extent.width());
                    child.set_origin(Point::new(
                        origin.x() + cross_offset + margin.left(),
                        origin.y() + main + margin.top(),
                    ));
                    main += extent.height();
                }
            }
        }

        match self.orientation {
            Orientation::Horizontal => Size::new(main, cross),
            Orientation::Vertical => Size::new(cross, main),
        }
    }

    fn cross_offset(&self, cross: f32, extent: f32) -> f32 {
        match self.alignment {
            Alignment::Start => 0.0,
            Alignment::Center => (cross - extent) / 2.0,
            Alignment::End => cross - extent,
        }
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use vellum_core::geometry::Insets;

    use super::*;

    fn child(width: f32, height: f32) -> Drawable {
        Drawable::new(Size::new(width, height))
    }

    #[test]
    fn test_horizontal_row() {
        let layout = BoxLayout::new(Orientation::Horizontal).with_spacing(4.0);
        let mut children = vec![child(10.0, 20.0), child(30.0, 8.0)];
        let total = layout.arrange(&mut children, Point::new(5.0, 5.0));

        assert_eq!(children[0].origin(), Point::new(5.0, 5.0));
        assert_eq!(children[1].origin(), Point::new(19.0, 5.0));
        assert_eq!(total, Size::new(44.0, 20.0));
    }

    #[test]
    fn test_vertical_column_centered() {
        let layout =
            BoxLayout::new(Orientation::Vertical).with_alignment(Alignment::Center);
        let mut children = vec![child(10.0, 10.0), child(30.0, 10.0)];
        let total = layout.arrange(&mut children, Point::default());

        assert_eq!(children[0].origin(), Point::new(10.0, 0.0));
        assert_eq!(children[1].origin(), Point::new(0.0, 10.0));
        assert_eq!(total, Size::new(30.0, 20.0));
    }

    #[test]
    fn test_margins_offset_and_expand() {
        let layout = BoxLayout::new(Orientation::Horizontal);
        let mut children = vec![
            child(10.0, 10.0).with_margin(Insets::uniform(2.0)),
            child(10.0, 10.0),
        ];
        let total = layout.arrange(&mut children, Point::default());

        // First child sits inside its margin; second follows the full
        // marginal extent.
        assert_eq!(children[0].origin(), Point::new(2.0, 2.0));
        assert_eq!(children[1].origin(), Point::new(14.0, 0.0));
        assert_approx_eq!(f32, total.width(), 24.0);
        assert_approx_eq!(f32, total.height(), 14.0);
    }

    #[test]
    fn test_end_alignment() {
        let layout = BoxLayout::new(Orientation::Horizontal).with_alignment(Alignment::End);
        let mut children = vec![child(10.0, 20.0), child(10.0, 8.0)];
        layout.arrange(&mut children, Point::default());

        assert_eq!(children[0].origin(), Point::new(0.0, 0.0));
        assert_eq!(children[1].origin(), Point::new(10.0, 12.0));
    }

    #[test]
    fn test_empty_container() {
        let layout = BoxLayout::new(Orientation::Vertical);
        let total = layout.arrange(&mut [], Point::default());
        assert_eq!(total, Size::default());
    }
}
