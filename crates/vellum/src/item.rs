//! The declarative item model.
//!
//! An [`Item`] is one drawing instruction: a shape, text run, or image
//! placement ([`ItemKind`]) plus the paint attributes shared by every kind
//! (fill, stroke, shadow, rotation) and the per-item hooks. Items carry no
//! drawing logic themselves; the renderer interprets them against a
//! [`Surface`].
//!
//! ## Examples
//!
//! ```
//! use vellum::item::{Item, RectangleItem, Stroke};
//! use vellum_core::color::Color;
//! use vellum_core::geometry::{Point, Size};
//!
//! let rect = Item::from(RectangleItem::new(Point::new(10.0, 10.0), Size::new(80.0, 40.0)))
//!     .with_fill(Color::new("tomato").unwrap())
//!     .with_stroke(Stroke::new(Color::new("black").unwrap(), 2.0));
//! assert!(rect.stroke().is_some());
//! ```

use std::fmt;

use vellum_core::color::Color;
use vellum_core::font::FontSpec;
use vellum_core::geometry::{Point, Size};
use vellum_core::gradient::Gradient;

use crate::error::Error;
use crate::image::DecodedImage;
use crate::surface::{Surface, TextAlign};
use crate::text::VerticalAlign;

/// Stroke attributes: outline color and line width.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    color: Color,
    width: f32,
}

impl Stroke {
    pub fn new(color: Color, width: f32) -> Self {
        Self { color, width }
    }

    /// Returns the stroke color
    pub fn color(&self) -> &Color {
        &self.color
    }

    /// Returns the line width in pixels
    pub fn width(&self) -> f32 {
        self.width
    }
}

/// Drop shadow attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Shadow {
    offset_x: f32,
    offset_y: f32,
    blur: f32,
    color: Color,
}

impl Shadow {
    pub fn new(offset_x: f32, offset_y: f32, blur: f32, color: Color) -> Self {
        Self {
            offset_x,
            offset_y,
            blur,
            color,
        }
    }

    /// Returns the horizontal offset
    pub fn offset_x(&self) -> f32 {
        self.offset_x
    }

    /// Returns the vertical offset
    pub fn offset_y(&self) -> f32 {
        self.offset_y
    }

    /// Returns the blur radius
    pub fn blur(&self) -> f32 {
        self.blur
    }

    /// Returns the shadow color
    pub fn color(&self) -> &Color {
        &self.color
    }
}

/// Fill: either a solid color or a gradient descriptor resolved at draw
/// time against the item's own box.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Color(Color),
    Gradient(Gradient),
}

/// A text run anchored at `position`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    text: String,
    font: FontSpec,
    position: Point,
    align: TextAlign,
    vertical_align: VerticalAlign,
    line_height: Option<f32>,
}

impl TextItem {
    pub fn new(text: impl Into<String>, font: FontSpec, position: Point) -> Self {
        Self {
            text: text.into(),
            font,
            position,
            align: TextAlign::default(),
            vertical_align: VerticalAlign::default(),
            line_height: None,
        }
    }

    /// Sets the horizontal alignment.
    pub fn with_align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Sets the vertical alignment.
    pub fn with_vertical_align(mut self, vertical_align: VerticalAlign) -> Self {
        self.vertical_align = vertical_align;
        self
    }

    /// Sets an explicit line height, shifting the run up by that amount.
    pub fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Returns the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the font selection
    pub fn font(&self) -> &FontSpec {
        &self.font
    }

    /// Returns the anchor position
    pub fn position(&self) -> Point {
        self.position
    }

    /// Returns the horizontal alignment
    pub fn align(&self) -> TextAlign {
        self.align
    }

    /// Returns the vertical alignment
    pub fn vertical_align(&self) -> VerticalAlign {
        self.vertical_align
    }

    /// Returns the explicit line height, if set
    pub fn line_height(&self) -> Option<f32> {
        self.line_height
    }
}

/// A straight line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineItem {
    from: Point,
    to: Point,
}

impl LineItem {
    pub fn new(from: Point, to: Point) -> Self {
        Self { from, to }
    }

    /// Returns the start point
    pub fn from_point(&self) -> Point {
        self.from
    }

    /// Returns the end point
    pub fn to_point(&self) -> Point {
        self.to
    }
}

/// A circle described by center and radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OvalItem {
    center: Point,
    radius: f32,
}

impl OvalItem {
    pub fn new(center: Point, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Returns the center
    pub fn center(&self) -> Point {
        self.center
    }

    /// Returns the radius
    pub fn radius(&self) -> f32 {
        self.radius
    }
}

/// An axis-aligned rectangle, optionally with rounded corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectangleItem {
    origin: Point,
    size: Size,
    corner_radii: Option<[f32; 4]>,
}

impl RectangleItem {
    pub fn new(origin: Point, size: Size) -> Self {
        Self {
            origin,
            size,
            corner_radii: None,
        }
    }

    /// Sets per-corner radii, clockwise from top-left. Radii of all zeros
    /// are equivalent to a plain rectangle.
    pub fn with_corner_radii(mut self, radii: [f32; 4]) -> Self {
        self.corner_radii = Some(radii);
        self
    }

    /// Returns the top-left origin
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the size
    pub fn size(&self) -> Size {
        self.size
    }

    /// Returns the corner radii, if rounded
    pub fn corner_radii(&self) -> Option<[f32; 4]> {
        self.corner_radii
    }

    /// Corner radii with the all-zero case normalized away, so plain and
    /// zero-rounded rectangles take the same draw path.
    pub(crate) fn effective_radii(&self) -> Option<[f32; 4]> {
        self.corner_radii
            .filter(|radii| radii.iter().any(|&radius| radius != 0.0))
    }
}

/// Where an image item's pixels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Fetched and decoded through the image backend, cached by name and
    /// requested dimensions.
    Url(String),
    /// An already decoded image, drawn directly and never cached.
    Decoded(DecodedImage),
}

/// An image placement.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    source: ImageSource,
    origin: Point,
    size: Option<Size>,
    color_filter: Option<Color>,
}

impl ImageItem {
    pub fn new(source: ImageSource, origin: Point) -> Self {
        Self {
            source,
            origin,
            size: None,
            color_filter: None,
        }
    }

    /// Shorthand for a URL-sourced image.
    pub fn from_url(url: impl Into<String>, origin: Point) -> Self {
        Self::new(ImageSource::Url(url.into()), origin)
    }

    /// Sets explicit draw dimensions; without them the image draws at its
    /// natural size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets a tint applied over the image's opaque pixels.
    pub fn with_color_filter(mut self, color: Color) -> Self {
        self.color_filter = Some(color);
        self
    }

    /// Returns the pixel source
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Returns the top-left origin
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Returns the requested dimensions, if any
    pub fn size(&self) -> Option<Size> {
        self.size
    }

    /// Returns the tint color, if any
    pub fn color_filter(&self) -> Option<&Color> {
        self.color_filter.as_ref()
    }
}

/// The closed set of drawable kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Text(TextItem),
    Line(LineItem),
    Oval(OvalItem),
    Rectangle(RectangleItem),
    Image(ImageItem),
}

impl ItemKind {
    /// The point rotation pivots around.
    pub(crate) fn rotation_center(&self) -> Point {
        match self {
            Self::Text(text) => text.position(),
            Self::Line(line) => line.from_point().midpoint(line.to_point()),
            Self::Oval(oval) => oval.center(),
            Self::Rectangle(rect) => rect.origin().center_of(rect.size()),
            Self::Image(image) => image.origin().center_of(image.size().unwrap_or_default()),
        }
    }

    /// The box gradient geometry is computed against.
    pub(crate) fn paint_box(&self) -> Size {
        match self {
            Self::Text(_) => Size::default(),
            Self::Line(line) => {
                let delta = line.to_point().sub_point(line.from_point());
                Size::new(delta.x().abs(), delta.y().abs())
            }
            Self::Oval(oval) => Size::new(oval.radius() * 2.0, oval.radius() * 2.0),
            Self::Rectangle(rect) => rect.size(),
            Self::Image(image) => image.size().unwrap_or_default(),
        }
    }

    /// The top-left corner of the paint box in surface coordinates.
    pub(crate) fn paint_anchor(&self) -> Point {
        match self {
            Self::Text(text) => text.position(),
            Self::Line(line) => line.from_point().min(line.to_point()),
            Self::Oval(oval) => {
                Point::new(oval.center().x() - oval.radius(), oval.center().y() - oval.radius())
            }
            Self::Rectangle(rect) => rect.origin(),
            Self::Image(image) => image.origin(),
        }
    }
}

impl From<TextItem> for ItemKind {
    fn from(item: TextItem) -> Self {
        Self::Text(item)
    }
}

impl From<LineItem> for ItemKind {
    fn from(item: LineItem) -> Self {
        Self::Line(item)
    }
}

impl From<OvalItem> for ItemKind {
    fn from(item: OvalItem) -> Self {
        Self::Oval(item)
    }
}

impl From<RectangleItem> for ItemKind {
    fn from(item: RectangleItem) -> Self {
        Self::Rectangle(item)
    }
}

impl From<ImageItem> for ItemKind {
    fn from(item: ImageItem) -> Self {
        Self::Image(item)
    }
}

/// One drawing instruction: a kind plus shared paint attributes and hooks.
pub struct Item {
    pub(crate) kind: ItemKind,
    pub(crate) fill: Option<Fill>,
    pub(crate) stroke: Option<Stroke>,
    pub(crate) shadow: Option<Shadow>,
    pub(crate) rotation_degrees: Option<f32>,
    pub(crate) after_draw: Option<Box<dyn FnMut(&mut dyn Surface)>>,
    pub(crate) on_image_loaded: Option<Box<dyn FnOnce()>>,
}

impl Item {
    pub fn new(kind: ItemKind) -> Self {
        Self {
            kind,
            fill: None,
            stroke: None,
            shadow: None,
            rotation_degrees: None,
            after_draw: None,
            on_image_loaded: None,
        }
    }

    /// Sets a solid fill color.
    pub fn with_fill(mut self, color: Color) -> Self {
        self.fill = Some(Fill::Color(color));
        self
    }

    /// Sets a gradient fill, resolved against this item's box at draw time.
    pub fn with_gradient(mut self, gradient: Gradient) -> Self {
        self.fill = Some(Fill::Gradient(gradient));
        self
    }

    /// Sets the stroke attributes.
    pub fn with_stroke(mut self, stroke: Stroke) -> Self {
        self.stroke = Some(stroke);
        self
    }

    /// Sets the drop shadow.
    pub fn with_shadow(mut self, shadow: Shadow) -> Self {
        self.shadow = Some(shadow);
        self
    }

    /// Sets a rotation, in degrees, about the item's center.
    pub fn with_rotation(mut self, degrees: f32) -> Self {
        self.rotation_degrees = Some(degrees);
        self
    }

    /// Sets a hook invoked against the surface after this item draws,
    /// while any rotation transform is still applied.
    pub fn with_after_draw(mut self, hook: impl FnMut(&mut dyn Surface) + 'static) -> Self {
        self.after_draw = Some(Box::new(hook));
        self
    }

    /// Sets a one-shot hook fired when this item's image becomes drawable
    /// (cache hit or decode completion). Ignored for non-image items.
    pub fn with_on_image_loaded(mut self, hook: impl FnOnce() + 'static) -> Self {
        self.on_image_loaded = Some(Box::new(hook));
        self
    }

    /// Returns the item kind
    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Returns the fill, if any
    pub fn fill(&self) -> Option<&Fill> {
        self.fill.as_ref()
    }

    /// Returns the stroke attributes, if any
    pub fn stroke(&self) -> Option<&Stroke> {
        self.stroke.as_ref()
    }

    /// Returns the shadow, if any
    pub fn shadow(&self) -> Option<&Shadow> {
        self.shadow.as_ref()
    }

    /// Returns the rotation in degrees, if any
    pub fn rotation_degrees(&self) -> Option<f32> {
        self.rotation_degrees
    }

    /// Shadow blur radius, zero when no shadow is set. Text layout expands
    /// the measured box by this amount on both sides.
    pub(crate) fn shadow_blur(&self) -> f32 {
        self.shadow.as_ref().map_or(0.0, Shadow::blur)
    }

    /// Checks every numeric field before any drawing happens, so a bad
    /// descriptor cannot leave partial state on the surface.
    pub(crate) fn validate(&self) -> Result<(), Error> {
        if let Some(stroke) = &self.stroke {
            if !stroke.width.is_finite() || stroke.width < 0.0 {
                return Err(Error::configuration(
                    "stroke.width",
                    format!("must be finite and non-negative, got {}", stroke.width),
                ));
            }
        }
        if let Some(shadow) = &self.shadow {
            if !shadow.offset_x.is_finite() || !shadow.offset_y.is_finite() {
                return Err(Error::configuration(
                    "shadow.offset",
                    "offsets must be finite",
                ));
            }
            if !shadow.blur.is_finite() || shadow.blur < 0.0 {
                return Err(Error::configuration(
                    "shadow.blur",
                    format!("must be finite and non-negative, got {}", shadow.blur),
                ));
            }
        }
        if let Some(degrees) = self.rotation_degrees {
            if !degrees.is_finite() {
                return Err(Error::configuration("rotation", "must be finite"));
            }
        }
        if let Some(Fill::Gradient(gradient)) = &self.fill {
            Self::validate_gradient(gradient)?;
        }
        match &self.kind {
            ItemKind::Text(text) => {
                let size = text.font().size();
                if !size.is_finite() || size <= 0.0 {
                    return Err(Error::configuration(
                        "text.font.size",
                        format!("must be finite and positive, got {size}"),
                    ));
                }
                if let Some(line_height) = text.line_height() {
                    if !line_height.is_finite() {
                        return Err(Error::configuration("text.line_height", "must be finite"));
                    }
                }
            }
            ItemKind::Line(line) => {
                let finite = |point: Point| point.x().is_finite() && point.y().is_finite();
                if !finite(line.from_point()) || !finite(line.to_point()) {
                    return Err(Error::configuration(
                        "line.endpoints",
                        "coordinates must be finite",
                    ));
                }
            }
            ItemKind::Oval(oval) => {
                if !oval.radius().is_finite() || oval.radius() < 0.0 {
                    return Err(Error::configuration(
                        "oval.radius",
                        format!("must be finite and non-negative, got {}", oval.radius()),
                    ));
                }
            }
            ItemKind::Rectangle(rect) => {
                let size = rect.size();
                if !size.width().is_finite()
                    || !size.height().is_finite()
                    || size.width() < 0.0
                    || size.height() < 0.0
                {
                    return Err(Error::configuration(
                        "rectangle.size",
                        "dimensions must be finite and non-negative",
                    ));
                }
                if let Some(radii) = rect.corner_radii() {
                    if radii.iter().any(|&radius| !radius.is_finite() || radius < 0.0) {
                        return Err(Error::configuration(
                            "rectangle.corner_radii",
                            "radii must be finite and non-negative",
                        ));
                    }
                }
            }
            ItemKind::Image(image) => {
                if let Some(size) = image.size() {
                    if !size.width().is_finite()
                        || !size.height().is_finite()
                        || size.width() < 0.0
                        || size.height() < 0.0
                    {
                        return Err(Error::configuration(
                            "image.size",
                            "dimensions must be finite and non-negative",
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_gradient(gradient: &Gradient) -> Result<(), Error> {
        match gradient {
            Gradient::Linear(linear) => {
                if !linear.angle_degrees().is_finite() {
                    return Err(Error::configuration("gradient.angle", "must be finite"));
                }
            }
            Gradient::Radial(radial) => {
                if !radial.start_radius().is_finite()
                    || !radial.end_radius().is_finite()
                    || radial.start_radius() < 0.0
                    || radial.end_radius() < 0.0
                {
                    return Err(Error::configuration(
                        "gradient.radius",
                        "radii must be finite and non-negative",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl From<TextItem> for Item {
    fn from(item: TextItem) -> Self {
        Self::new(ItemKind::Text(item))
    }
}

impl From<LineItem> for Item {
    fn from(item: LineItem) -> Self {
        Self::new(ItemKind::Line(item))
    }
}

impl From<OvalItem> for Item {
    fn from(item: OvalItem) -> Self {
        Self::new(ItemKind::Oval(item))
    }
}

impl From<RectangleItem> for Item {
    fn from(item: RectangleItem) -> Self {
        Self::new(ItemKind::Rectangle(item))
    }
}

impl From<ImageItem> for Item {
    fn from(item: ImageItem) -> Self {
        Self::new(ItemKind::Image(item))
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("kind", &self.kind)
            .field("fill", &self.fill)
            .field("stroke", &self.stroke)
            .field("shadow", &self.shadow)
            .field("rotation_degrees", &self.rotation_degrees)
            .field("after_draw", &self.after_draw.as_ref().map(|_| "..."))
            .field("on_image_loaded", &self.on_image_loaded.as_ref().map(|_| "..."))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use vellum_core::font::FontFamily;

    use super::*;

    fn color(name: &str) -> Color {
        Color::new(name).unwrap()
    }

    #[test]
    fn test_rotation_centers() {
        let line = ItemKind::from(LineItem::new(Point::new(0.0, 0.0), Point::new(10.0, 20.0)));
        assert_eq!(line.rotation_center(), Point::new(5.0, 10.0));

        let rect = ItemKind::from(RectangleItem::new(
            Point::new(10.0, 10.0),
            Size::new(40.0, 20.0),
        ));
        assert_eq!(rect.rotation_center(), Point::new(30.0, 20.0));

        let oval = ItemKind::from(OvalItem::new(Point::new(7.0, 8.0), 3.0));
        assert_eq!(oval.rotation_center(), Point::new(7.0, 8.0));
    }

    #[test]
    fn test_paint_box_and_anchor() {
        let oval = ItemKind::from(OvalItem::new(Point::new(10.0, 10.0), 4.0));
        assert_eq!(oval.paint_box(), Size::new(8.0, 8.0));
        assert_eq!(oval.paint_anchor(), Point::new(6.0, 6.0));

        let line = ItemKind::from(LineItem::new(Point::new(10.0, 2.0), Point::new(4.0, 8.0)));
        assert_eq!(line.paint_box(), Size::new(6.0, 6.0));
        assert_eq!(line.paint_anchor(), Point::new(4.0, 2.0));
    }

    #[test]
    fn test_effective_radii_normalizes_zeros() {
        let plain = RectangleItem::new(Point::default(), Size::new(10.0, 10.0));
        assert_eq!(plain.effective_radii(), None);

        let zeroed = plain.with_corner_radii([0.0; 4]);
        assert_eq!(zeroed.effective_radii(), None);

        let rounded = RectangleItem::new(Point::default(), Size::new(10.0, 10.0))
            .with_corner_radii([2.0, 0.0, 0.0, 0.0]);
        assert_eq!(rounded.effective_radii(), Some([2.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn test_validate_rejects_bad_stroke() {
        let item = Item::from(OvalItem::new(Point::default(), 5.0))
            .with_stroke(Stroke::new(color("black"), -1.0));
        let err = item.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration { field: "stroke.width", .. }
        ));
    }

    #[test]
    fn test_validate_rejects_non_finite_font_size() {
        let item = Item::from(TextItem::new(
            "hi",
            FontSpec::new(FontFamily::Arial, f32::NAN),
            Point::default(),
        ));
        let err = item.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration { field: "text.font.size", .. }
        ));
    }

    #[test]
    fn test_validate_accepts_well_formed_item() {
        let item = Item::from(RectangleItem::new(Point::default(), Size::new(10.0, 10.0)))
            .with_fill(color("rebeccapurple"))
            .with_shadow(Shadow::new(1.0, 1.0, 2.0, color("black")))
            .with_rotation(45.0);
        assert!(item.validate().is_ok());
    }

    #[test]
    fn test_shadow_blur_defaults_to_zero() {
        let item = Item::from(OvalItem::new(Point::default(), 1.0));
        assert_approx_eq!(f32, item.shadow_blur(), 0.0);
        let shadowed = item.with_shadow(Shadow::new(0.0, 0.0, 3.0, color("gray")));
        assert_approx_eq!(f32, shadowed.shadow_blur(), 3.0);
    }
}
