//! The drawing surface abstraction.
//!
//! [`Surface`] is the narrow, object-safe seam between the renderer and
//! whatever actually rasterizes: a window backend, an offscreen bitmap, or
//! the [`recording`] surface used in tests. The renderer never touches
//! pixels itself; it emits calls against this trait in a canvas-like
//! imperative vocabulary (paths, transforms, fill/stroke state).
//!
//! Gradients cross the seam fully resolved: the renderer converts a
//! gradient descriptor into a [`Paint`] with absolute endpoint coordinates,
//! so backends never see angles or relative centers.

use vellum_core::color::Color;
use vellum_core::font::FontSpec;
use vellum_core::geometry::{Point, Size};

use crate::image::{DecodedImage, ImageHandle};
use crate::item::Shadow;

pub mod recording;

/// One stop of a resolved gradient ramp.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorStop {
    offset: f32,
    color: Color,
}

impl ColorStop {
    /// Creates a stop at `offset` (0.0 to 1.0 along the ramp).
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }

    /// Returns the offset along the ramp
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Returns the stop color
    pub fn color(&self) -> &Color {
        &self.color
    }
}

/// A resolved linear gradient in absolute surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearPaint {
    start: Point,
    end: Point,
    stops: Vec<ColorStop>,
}

impl LinearPaint {
    pub fn new(start: Point, end: Point, stops: Vec<ColorStop>) -> Self {
        Self { start, end, stops }
    }

    /// Returns the axis start point
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the axis end point
    pub fn end(&self) -> Point {
        self.end
    }

    /// Returns the color stops
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

/// A resolved radial gradient in absolute surface coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialPaint {
    start_center: Point,
    start_radius: f32,
    end_center: Point,
    end_radius: f32,
    stops: Vec<ColorStop>,
}

impl RadialPaint {
    pub fn new(
        start_center: Point,
        start_radius: f32,
        end_center: Point,
        end_radius: f32,
        stops: Vec<ColorStop>,
    ) -> Self {
        Self {
            start_center,
            start_radius,
            end_center,
            end_radius,
            stops,
        }
    }

    /// Returns the inner circle center
    pub fn start_center(&self) -> Point {
        self.start_center
    }

    /// Returns the inner circle radius
    pub fn start_radius(&self) -> f32 {
        self.start_radius
    }

    /// Returns the outer circle center
    pub fn end_center(&self) -> Point {
        self.end_center
    }

    /// Returns the outer circle radius
    pub fn end_radius(&self) -> f32 {
        self.end_radius
    }

    /// Returns the color stops
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

/// Fill paint, fully resolved for the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(Color),
    Linear(LinearPaint),
    Radial(RadialPaint),
}

/// Horizontal anchoring of drawn text relative to its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical anchoring of drawn text relative to its position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

/// Pixel compositing rule for subsequent draws.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeMode {
    #[default]
    SourceOver,
    /// New pixels land only where existing pixels are opaque. Used for
    /// tinting decoded images through an offscreen pass.
    SourceAtop,
}

/// The rasterization seam.
///
/// Implementations hold mutable drawing state the way a canvas context
/// does: the current path, transform stack, fill/stroke paint, font and
/// shadow settings. `save`/`restore` snapshot and pop that state.
pub trait Surface {
    // Path construction.
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Point);
    fn line_to(&mut self, point: Point);
    /// Appends a circular arc around `center`; angles are in radians.
    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32);
    /// Appends an arc tangent to the lines through the current point,
    /// `control`, and `end`.
    fn arc_to(&mut self, control: Point, end: Point, radius: f32);
    fn close_path(&mut self);

    // Painting the current path.
    fn fill(&mut self);
    fn stroke(&mut self);

    // Rectangle shorthands.
    fn fill_rect(&mut self, origin: Point, size: Size);
    fn stroke_rect(&mut self, origin: Point, size: Size);
    fn clear_rect(&mut self, origin: Point, size: Size);

    // Text.
    fn fill_text(&mut self, text: &str, position: Point);
    /// Returns the advance width of `text` under the current font.
    fn measure_text(&mut self, text: &str) -> f32;

    // Images.
    fn draw_image(&mut self, image: ImageHandle, position: Point);
    fn draw_image_scaled(&mut self, image: ImageHandle, position: Point, size: Size);

    // Transform stack.
    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, offset: Point);
    /// Rotates the coordinate system by `radians` about the current origin.
    fn rotate(&mut self, radians: f32);

    // Drawing state.
    fn set_fill_paint(&mut self, paint: &Paint);
    fn set_stroke_color(&mut self, color: &Color);
    fn set_line_width(&mut self, width: f32);
    /// Selects the font used by subsequent text calls. Backends format
    /// the canvas font string via [`FontSpec::to_font_string`].
    fn set_font(&mut self, font: &FontSpec);
    fn set_text_align(&mut self, align: TextAlign);
    fn set_text_baseline(&mut self, baseline: TextBaseline);
    fn set_shadow(&mut self, shadow: &Shadow);
    fn clear_shadow(&mut self);
    fn set_composite_mode(&mut self, mode: CompositeMode);

    /// Creates an offscreen surface of the given size, sharing this
    /// surface's image namespace.
    fn create_offscreen(&mut self, size: Size) -> Box<dyn OffscreenSurface>;
}

/// A surface whose finished contents can be turned into a drawable image.
pub trait OffscreenSurface: Surface {
    /// Finalizes the offscreen contents as an image usable with
    /// [`Surface::draw_image`].
    fn into_image(self: Box<Self>) -> DecodedImage;
}
