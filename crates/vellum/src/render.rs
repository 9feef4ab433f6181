//! Per-item render dispatch.
//!
//! The renderer walks a drawable's items in declaration order and
//! interprets each against the surface: rotation transform, fill paint
//! resolution, shadow scoping, the kind-specific geometry, stroking, and
//! the per-item hooks. It also drains finished image loads at the start of
//! each pass and folds text measurements back into the drawable's size.
//!
//! A configuration error aborts the pass for the whole drawable before the
//! offending item draws anything; surface state pushed for earlier items
//! is unwound on the way out.

use std::f32::consts::TAU;

use log::{debug, warn};
use vellum_core::geometry::{Point, Size};
use vellum_core::gradient::Gradient;

use crate::drawable::Drawable;
use crate::error::Error;
use crate::image::{
    CachedImage, DecodedImage, DeferredDraw, ImageBackend, ImageCache, ImageHandle, ImageKey,
    InFlight, name_from_url,
};
use crate::item::{Fill, Item, ItemKind, RectangleItem};
use crate::surface::{
    ColorStop, CompositeMode, LinearPaint, Paint, RadialPaint, Surface, TextBaseline,
};
use crate::text::{TextLayout, TextMetricsEstimate};

/// Renders drawables against a surface, an image cache, and an image
/// backend. Borrows all three; construct one per pass or hold it across
/// passes, whichever suits the host.
pub struct Renderer<'a> {
    surface: &'a mut dyn Surface,
    images: &'a mut ImageCache,
    backend: &'a mut dyn ImageBackend,
}

impl<'a> Renderer<'a> {
    pub fn new(
        surface: &'a mut dyn Surface,
        images: &'a mut ImageCache,
        backend: &'a mut dyn ImageBackend,
    ) -> Self {
        Self {
            surface,
            images,
            backend,
        }
    }

    /// Returns the underlying surface
    pub fn surface(&mut self) -> &mut dyn Surface {
        &mut *self.surface
    }

    /// Renders every item of `drawable` in declaration order.
    ///
    /// Finished image loads from earlier passes draw first, with the
    /// parameters captured when they were requested. Afterwards the
    /// drawable's size grows to cover any text that measured wider or
    /// taller than declared.
    pub fn render(&mut self, drawable: &mut Drawable) -> Result<(), Error> {
        self.complete_pending_images();

        debug!(items = drawable.items().len(); "rendering drawable");
        let mut items = drawable.take_items();
        let mut measured = Size::default();
        let mut outcome = Ok(());
        for item in &mut items {
            if let Err(error) = self.render_item(drawable, item, &mut measured) {
                outcome = Err(error);
                break;
            }
        }
        drawable.restore_items(items);
        outcome?;

        drawable.set_size(drawable.size().max(measured));
        Ok(())
    }

    /// Renders `drawable` onto a fresh offscreen surface sized to it and
    /// returns the result as a drawable image.
    pub fn render_to_image(&mut self, drawable: &mut Drawable) -> Result<DecodedImage, Error> {
        let mut offscreen = self.surface.create_offscreen(drawable.size());
        {
            let mut renderer =
                Renderer::new(offscreen.as_mut(), &mut *self.images, &mut *self.backend);
            renderer.render(drawable)?;
        }
        Ok(offscreen.into_image())
    }

    /// Draws every finished image load and moves it into the cache.
    /// Failed loads are reported and dropped.
    pub fn complete_pending_images(&mut self) {
        for finished in self.images.take_finished() {
            match finished.result {
                Ok(decoded) => {
                    debug!(name = finished.key.name(); "image decode finished");
                    self.draw_deferred(decoded.handle(), &finished.draw);
                    self.images.insert(
                        finished.key,
                        CachedImage::new(decoded.handle(), finished.draw.requested),
                    );
                    if let Some(hook) = finished.on_loaded {
                        hook();
                    }
                }
                Err(error) => {
                    warn!(name = finished.key.name(), error:err = error; "image decode failed");
                }
            }
        }
    }

    fn render_item(
        &mut self,
        drawable: &mut Drawable,
        item: &mut Item,
        measured: &mut Size,
    ) -> Result<(), Error> {
        item.validate()?;

        let rotated = item.rotation_degrees.is_some();
        if let Some(degrees) = item.rotation_degrees {
            self.surface.save();
            self.surface.translate(item.kind.rotation_center());
            self.surface.rotate(degrees.to_radians());
        }

        let shadowed = item.shadow.is_some();
        let outcome = self.draw_item(drawable, item, measured, rotated);

        // Shadow and transform state must not leak into the next item,
        // even when the draw bails early.
        if shadowed {
            self.surface.clear_shadow();
        }
        if rotated {
            self.surface.restore();
        }
        outcome
    }

    fn draw_item(
        &mut self,
        drawable: &mut Drawable,
        item: &mut Item,
        measured: &mut Size,
        rotated: bool,
    ) -> Result<(), Error> {
        if let Some(fill) = &item.fill {
            let paint = resolve_paint(fill, &item.kind);
            self.surface.set_fill_paint(&paint);
        }
        if let Some(shadow) = &item.shadow {
            self.surface.set_shadow(shadow);
        }

        let mut self_stroked = false;
        match &item.kind {
            ItemKind::Text(text) => {
                self.surface.set_font(text.font());
                self.surface.set_text_baseline(TextBaseline::Alphabetic);
                let width = self.surface.measure_text(text.text());
                let metrics = TextMetricsEstimate::from_font(text.font());
                let blur = item.shadow_blur();
                let layout = TextLayout::compute(
                    text.position().y(),
                    metrics,
                    text.vertical_align(),
                    text.line_height(),
                    blur,
                );
                self.surface.set_text_align(text.align());
                self.surface
                    .fill_text(text.text(), Point::new(text.position().x(), layout.baseline_y()));

                // The drawable's origin snaps to the measured text box so
                // clearing covers glyphs that extend past the anchor.
                let half_ascent = metrics.ascent() / 2.0;
                drawable.set_origin(Point::new(
                    text.position().x() - half_ascent,
                    layout.bounding_top() - blur - half_ascent,
                ));
                *measured = Size::new(width + metrics.ascent(), metrics.height() + 2.0 * blur);
            }
            ItemKind::Line(line) => {
                self.surface.begin_path();
                self.surface.move_to(line.from_point());
                self.surface.line_to(line.to_point());
            }
            ItemKind::Oval(oval) => {
                self.surface.begin_path();
                self.surface.arc(oval.center(), oval.radius(), 0.0, TAU);
                self.surface.close_path();
                self.surface.fill();
            }
            ItemKind::Rectangle(rect) => match rect.effective_radii() {
                Some(radii) => self.fill_rounded_rect(rect, radii),
                None => {
                    self.surface.fill_rect(rect.origin(), rect.size());
                    if let Some(stroke) = &item.stroke {
                        self.surface.set_line_width(stroke.width());
                        self.surface.set_stroke_color(stroke.color());
                        self.surface.stroke_rect(rect.origin(), rect.size());
                        self_stroked = true;
                    }
                }
            },
            ItemKind::Image(_) => {
                self.draw_image_item(item, rotated);
            }
        }

        if !self_stroked {
            if let Some(stroke) = &item.stroke {
                self.surface.set_line_width(stroke.width());
                self.surface.set_stroke_color(stroke.color());
                self.surface.stroke();
            }
        }

        if let Some(hook) = item.after_draw.as_mut() {
            hook(&mut *self.surface);
        }

        Ok(())
    }

    fn fill_rounded_rect(&mut self, rect: &RectangleItem, radii: [f32; 4]) {
        let [top_left, top_right, bottom_right, bottom_left] = radii;
        let origin = rect.origin();
        let size = rect.size();
        let right = origin.x() + size.width();
        let bottom = origin.y() + size.height();

        self.surface.begin_path();
        self.surface.move_to(Point::new(right - top_right, origin.y()));
        self.surface.arc_to(
            Point::new(right, origin.y()),
            Point::new(right, origin.y() + top_right),
            top_right,
        );
        self.surface.line_to(Point::new(right, bottom - bottom_right));
        self.surface.arc_to(
            Point::new(right, bottom),
            Point::new(right - bottom_right, bottom),
            bottom_right,
        );
        self.surface.line_to(Point::new(origin.x() + bottom_left, bottom));
        self.surface.arc_to(
            Point::new(origin.x(), bottom),
            Point::new(origin.x(), bottom - bottom_left),
            bottom_left,
        );
        self.surface.line_to(Point::new(origin.x(), origin.y() + top_left));
        self.surface.arc_to(
            Point::new(origin.x(), origin.y()),
            Point::new(origin.x() + top_left, origin.y()),
            top_left,
        );
        self.surface.close_path();
        self.surface.fill();
    }

    fn draw_image_item(&mut self, item: &mut Item, rotated: bool) {
        let ItemKind::Image(image) = &item.kind else {
            return;
        };
        match image.source() {
            crate::item::ImageSource::Decoded(decoded) => {
                let handle = decoded.handle();
                match image.size() {
                    Some(size) => {
                        let position = scaled_draw_position(image.origin(), size, rotated);
                        match image.color_filter() {
                            Some(filter) => {
                                let tinted =
                                    tint_image(&mut *self.surface, handle, size, filter);
                                self.surface.draw_image(tinted, position);
                            }
                            None => self.surface.draw_image_scaled(handle, position, size),
                        }
                    }
                    None => self.surface.draw_image(handle, image.origin()),
                }
                if let Some(hook) = item.on_image_loaded.take() {
                    hook();
                }
            }
            crate::item::ImageSource::Url(url) => {
                let name = name_from_url(url);
                let key = ImageKey::new(name, image.size());
                let cached = self.images.get(&key).copied();
                match cached {
                    Some(entry) => {
                        debug!(name; "image cache hit");
                        match entry.size() {
                            Some(size) => {
                                let position =
                                    scaled_draw_position(image.origin(), size, rotated);
                                match image.color_filter() {
                                    Some(filter) => {
                                        let tinted = tint_image(
                                            &mut *self.surface,
                                            entry.handle(),
                                            size,
                                            filter,
                                        );
                                        self.surface.draw_image(tinted, position);
                                    }
                                    None => self
                                        .surface
                                        .draw_image_scaled(entry.handle(), position, size),
                                }
                            }
                            None => self.surface.draw_image(entry.handle(), image.origin()),
                        }
                        if let Some(hook) = item.on_image_loaded.take() {
                            hook();
                        }
                    }
                    None => {
                        debug!(name; "image cache miss, requesting decode");
                        let load = self.backend.load(url);
                        self.images.push_in_flight(InFlight {
                            key,
                            load,
                            draw: DeferredDraw {
                                position: image.origin(),
                                requested: image.size(),
                                rotation_degrees: item.rotation_degrees,
                                rotation_center: item.kind.rotation_center(),
                                color_filter: image.color_filter().cloned(),
                            },
                            on_loaded: item.on_image_loaded.take(),
                        });
                    }
                }
            }
        }
    }

    /// Replays a deferred image draw with its captured parameters.
    fn draw_deferred(&mut self, handle: ImageHandle, draw: &DeferredDraw) {
        let rotated = draw.rotation_degrees.is_some();
        if let Some(degrees) = draw.rotation_degrees {
            self.surface.save();
            self.surface.translate(draw.rotation_center);
            self.surface.rotate(degrees.to_radians());
        }
        match draw.requested {
            Some(size) => {
                let position = scaled_draw_position(draw.position, size, rotated);
                match &draw.color_filter {
                    Some(filter) => {
                        let tinted = tint_image(&mut *self.surface, handle, size, filter);
                        self.surface.draw_image(tinted, position);
                    }
                    None => self.surface.draw_image_scaled(handle, position, size),
                }
            }
            None => self.surface.draw_image(handle, draw.position),
        }
        if rotated {
            self.surface.restore();
        }
    }
}

/// A rotated image draws centered on the pivot, so its position becomes
/// the negative half extent in the rotated frame.
fn scaled_draw_position(origin: Point, size: Size, rotated: bool) -> Point {
    if rotated {
        Point::new(-size.width() / 2.0, -size.height() / 2.0)
    } else {
        origin
    }
}

/// Tints an image by compositing the filter color over its opaque pixels
/// in an offscreen pass.
fn tint_image(
    surface: &mut dyn Surface,
    handle: ImageHandle,
    size: Size,
    filter: &vellum_core::color::Color,
) -> ImageHandle {
    let mut offscreen = surface.create_offscreen(size);
    offscreen.draw_image_scaled(handle, Point::default(), size);
    offscreen.set_composite_mode(CompositeMode::SourceAtop);
    offscreen.set_fill_paint(&Paint::Solid(filter.clone()));
    offscreen.fill_rect(Point::default(), size);
    offscreen.into_image().handle()
}

/// Resolves a fill into backend paint, computing gradient geometry
/// against the item's own box.
fn resolve_paint(fill: &Fill, kind: &ItemKind) -> Paint {
    match fill {
        Fill::Color(color) => Paint::Solid(color.clone()),
        Fill::Gradient(Gradient::Linear(linear)) => {
            let axis = linear.axis(kind.paint_box()).translate(kind.paint_anchor());
            let mut stops = vec![ColorStop::new(0.0, linear.start_color().clone())];
            if let Some(center) = linear.center_color() {
                stops.push(ColorStop::new(0.5, center.clone()));
            }
            stops.push(ColorStop::new(1.0, linear.end_color().clone()));
            Paint::Linear(LinearPaint::new(axis.start(), axis.end(), stops))
        }
        Fill::Gradient(Gradient::Radial(radial)) => {
            let mut stops = vec![ColorStop::new(0.0, radial.start_color().clone())];
            if let Some(center) = radial.center_color() {
                stops.push(ColorStop::new(0.5, center.clone()));
            }
            stops.push(ColorStop::new(1.0, radial.end_color().clone()));
            Paint::Radial(RadialPaint::new(
                radial.start_center(),
                radial.start_radius(),
                radial.end_center(),
                radial.end_radius(),
                stops,
            ))
        }
    }
}
