//! A surface that records draw calls instead of rasterizing.
//!
//! Every [`Surface`] method appends a [`SurfaceOp`] to an in-order log that
//! tests assert against. Text measurement uses a fixed-advance heuristic
//! (0.6 of the font size per character) so layout arithmetic stays
//! deterministic without a font rasterizer.

use std::cell::Cell;
use std::rc::Rc;

use vellum_core::color::Color;
use vellum_core::font::FontSpec;
use vellum_core::geometry::{Point, Size};

use crate::image::{DecodedImage, ImageHandle};
use crate::item::Shadow;
use crate::surface::{CompositeMode, OffscreenSurface, Paint, Surface, TextAlign, TextBaseline};

const ADVANCE_PER_CHAR: f32 = 0.6;

/// One recorded surface call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceOp {
    BeginPath,
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
    ArcTo {
        control: Point,
        end: Point,
        radius: f32,
    },
    ClosePath,
    Fill,
    Stroke,
    FillRect {
        origin: Point,
        size: Size,
    },
    StrokeRect {
        origin: Point,
        size: Size,
    },
    ClearRect {
        origin: Point,
        size: Size,
    },
    FillText {
        text: String,
        position: Point,
    },
    DrawImage {
        image: ImageHandle,
        position: Point,
    },
    DrawImageScaled {
        image: ImageHandle,
        position: Point,
        size: Size,
    },
    Save,
    Restore,
    Translate(Point),
    Rotate(f32),
    SetFillPaint(Paint),
    SetStrokeColor(Color),
    SetLineWidth(f32),
    SetFont(FontSpec),
    SetTextAlign(TextAlign),
    SetTextBaseline(TextBaseline),
    SetShadow(Shadow),
    ClearShadow,
    SetCompositeMode(CompositeMode),
    CreateOffscreen(Size),
}

/// A [`Surface`] implementation that logs calls for inspection.
#[derive(Debug)]
pub struct RecordingSurface {
    ops: Vec<SurfaceOp>,
    font_size: f32,
    next_image_id: Rc<Cell<u64>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self {
            ops: Vec::new(),
            font_size: 0.0,
            next_image_id: Rc::new(Cell::new(1)),
        }
    }

    /// Returns the recorded calls in order
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Removes and returns the recorded calls, leaving the log empty.
    pub fn take_ops(&mut self) -> Vec<SurfaceOp> {
        std::mem::take(&mut self.ops)
    }

    /// Mints a decoded image in this surface's image namespace, as a
    /// backend that had decoded `size` pixels would.
    pub fn register_image(&mut self, size: Size) -> DecodedImage {
        DecodedImage::new(self.mint_handle(), size)
    }

    fn mint_handle(&self) -> ImageHandle {
        let id = self.next_image_id.get();
        self.next_image_id.set(id + 1);
        ImageHandle::new(id)
    }
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Surface for RecordingSurface {
    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn move_to(&mut self, point: Point) {
        self.ops.push(SurfaceOp::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.ops.push(SurfaceOp::LineTo(point));
    }

    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32) {
        self.ops.push(SurfaceOp::Arc {
            center,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn arc_to(&mut self, control: Point, end: Point, radius: f32) {
        self.ops.push(SurfaceOp::ArcTo {
            control,
            end,
            radius,
        });
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn fill(&mut self) {
        self.ops.push(SurfaceOp::Fill);
    }

    fn stroke(&mut self) {
        self.ops.push(SurfaceOp::Stroke);
    }

    fn fill_rect(&mut self, origin: Point, size: Size) {
        self.ops.push(SurfaceOp::FillRect { origin, size });
    }

    fn stroke_rect(&mut self, origin: Point, size: Size) {
        self.ops.push(SurfaceOp::StrokeRect { origin, size });
    }

    fn clear_rect(&mut self, origin: Point, size: Size) {
        self.ops.push(SurfaceOp::ClearRect { origin, size });
    }

    fn fill_text(&mut self, text: &str, position: Point) {
        self.ops.push(SurfaceOp::FillText {
            text: text.to_string(),
            position,
        });
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        ADVANCE_PER_CHAR * self.font_size * text.chars().count() as f32
    }

    fn draw_image(&mut self, image: ImageHandle, position: Point) {
        self.ops.push(SurfaceOp::DrawImage { image, position });
    }

    fn draw_image_scaled(&mut self, image: ImageHandle, position: Point, size: Size) {
        self.ops.push(SurfaceOp::DrawImageScaled {
            image,
            position,
            size,
        });
    }

    fn save(&mut self) {
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(SurfaceOp::Restore);
    }

    fn translate(&mut self, offset: Point) {
        self.ops.push(SurfaceOp::Translate(offset));
    }

    fn rotate(&mut self, radians: f32) {
        self.ops.push(SurfaceOp::Rotate(radians));
    }

    fn set_fill_paint(&mut self, paint: &Paint) {
        self.ops.push(SurfaceOp::SetFillPaint(paint.clone()));
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.ops.push(SurfaceOp::SetStrokeColor(color.clone()));
    }

    fn set_line_width(&mut self, width: f32) {
        self.ops.push(SurfaceOp::SetLineWidth(width));
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.font_size = font.size();
        self.ops.push(SurfaceOp::SetFont(font.clone()));
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.ops.push(SurfaceOp::SetTextAlign(align));
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.ops.push(SurfaceOp::SetTextBaseline(baseline));
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.ops.push(SurfaceOp::SetShadow(shadow.clone()));
    }

    fn clear_shadow(&mut self) {
        self.ops.push(SurfaceOp::ClearShadow);
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.ops.push(SurfaceOp::SetCompositeMode(mode));
    }

    fn create_offscreen(&mut self, size: Size) -> Box<dyn OffscreenSurface> {
        self.ops.push(SurfaceOp::CreateOffscreen(size));
        Box::new(RecordingOffscreen {
            inner: RecordingSurface {
                ops: Vec::new(),
                font_size: 0.0,
                next_image_id: Rc::clone(&self.next_image_id),
            },
            size,
        })
    }
}

/// Offscreen variant of the recording surface. Shares the parent's image
/// namespace so handles minted here stay unique across the whole run.
#[derive(Debug)]
pub struct RecordingOffscreen {
    inner: RecordingSurface,
    size: Size,
}

impl RecordingOffscreen {
    /// Returns the calls recorded against this offscreen
    pub fn ops(&self) -> &[SurfaceOp] {
        self.inner.ops()
    }
}

impl Surface for RecordingOffscreen {
    fn begin_path(&mut self) {
        self.inner.begin_path();
    }

    fn move_to(&mut self, point: Point) {
        self.inner.move_to(point);
    }

    fn line_to(&mut self, point: Point) {
        self.inner.line_to(point);
    }

    fn arc(&mut self, center: Point, radius: f32, start_angle: f32, end_angle: f32) {
        self.inner.arc(center, radius, start_angle, end_angle);
    }

    fn arc_to(&mut self, control: Point, end: Point, radius: f32) {
        self.inner.arc_to(control, end, radius);
    }

    fn close_path(&mut self) {
        self.inner.close_path();
    }

    fn fill(&mut self) {
        self.inner.fill();
    }

    fn stroke(&mut self) {
        self.inner.stroke();
    }

    fn fill_rect(&mut self, origin: Point, size: Size) {
        self.inner.fill_rect(origin, size);
    }

    fn stroke_rect(&mut self, origin: Point, size: Size) {
        self.inner.stroke_rect(origin, size);
    }

    fn clear_rect(&mut self, origin: Point, size: Size) {
        self.inner.clear_rect(origin, size);
    }

    fn fill_text(&mut self, text: &str, position: Point) {
        self.inner.fill_text(text, position);
    }

    fn measure_text(&mut self, text: &str) -> f32 {
        self.inner.measure_text(text)
    }

    fn draw_image(&mut self, image: ImageHandle, position: Point) {
        self.inner.draw_image(image, position);
    }

    fn draw_image_scaled(&mut self, image: ImageHandle, position: Point, size: Size) {
        self.inner.draw_image_scaled(image, position, size);
    }

    fn save(&mut self) {
        self.inner.save();
    }

    fn restore(&mut self) {
        self.inner.restore();
    }

    fn translate(&mut self, offset: Point) {
        self.inner.translate(offset);
    }

    fn rotate(&mut self, radians: f32) {
        self.inner.rotate(radians);
    }

    fn set_fill_paint(&mut self, paint: &Paint) {
        self.inner.set_fill_paint(paint);
    }

    fn set_stroke_color(&mut self, color: &Color) {
        self.inner.set_stroke_color(color);
    }

    fn set_line_width(&mut self, width: f32) {
        self.inner.set_line_width(width);
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.inner.set_font(font);
    }

    fn set_text_align(&mut self, align: TextAlign) {
        self.inner.set_text_align(align);
    }

    fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.inner.set_text_baseline(baseline);
    }

    fn set_shadow(&mut self, shadow: &Shadow) {
        self.inner.set_shadow(shadow);
    }

    fn clear_shadow(&mut self) {
        self.inner.clear_shadow();
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) {
        self.inner.set_composite_mode(mode);
    }

    fn create_offscreen(&mut self, size: Size) -> Box<dyn OffscreenSurface> {
        self.inner.create_offscreen(size)
    }
}

impl OffscreenSurface for RecordingOffscreen {
    fn into_image(self: Box<Self>) -> DecodedImage {
        DecodedImage::new(self.inner.mint_handle(), self.size)
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;
    use vellum_core::font::FontFamily;

    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut surface = RecordingSurface::new();
        surface.begin_path();
        surface.move_to(Point::new(1.0, 2.0));
        surface.line_to(Point::new(3.0, 4.0));
        surface.stroke();

        assert_eq!(
            surface.ops(),
            &[
                SurfaceOp::BeginPath,
                SurfaceOp::MoveTo(Point::new(1.0, 2.0)),
                SurfaceOp::LineTo(Point::new(3.0, 4.0)),
                SurfaceOp::Stroke,
            ]
        );
    }

    #[test]
    fn test_measure_text_heuristic() {
        let mut surface = RecordingSurface::new();
        surface.set_font(&FontSpec::new(FontFamily::Arial, 20.0));
        assert_approx_eq!(f32, surface.measure_text("AB"), 24.0);
        assert_approx_eq!(f32, surface.measure_text(""), 0.0);
    }

    #[test]
    fn test_offscreen_handles_are_unique() {
        let mut surface = RecordingSurface::new();
        let first = surface.register_image(Size::new(8.0, 8.0));
        let offscreen = surface.create_offscreen(Size::new(16.0, 16.0));
        let image = offscreen.into_image();
        assert_ne!(first.handle(), image.handle());
        assert_approx_eq!(f32, image.size().width(), 16.0);
    }

    #[test]
    fn test_take_ops_drains() {
        let mut surface = RecordingSurface::new();
        surface.save();
        assert_eq!(surface.take_ops(), vec![SurfaceOp::Save]);
        assert!(surface.ops().is_empty());
    }
}
