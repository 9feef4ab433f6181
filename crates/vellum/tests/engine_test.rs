//! End-to-end tests driving the public API: renderer, image pipeline, and
//! animation scheduler against the recording surface.

use std::cell::Cell;
use std::ops::ControlFlow;
use std::rc::Rc;
use std::time::Duration;

use float_cmp::assert_approx_eq;

use vellum::animate::{AnimationState, Animator, ScheduleMode, Scene, StopPolicy};
use vellum::color::Color;
use vellum::config::EngineConfig;
use vellum::drawable::Drawable;
use vellum::font::{FontFamily, FontSpec};
use vellum::geometry::{Point, Size};
use vellum::image::{
    DecodedImage, ImageBackend, ImageCache, ImageHandle, ImageLoad, LoadCompletion,
};
use vellum::item::{ImageItem, Item, OvalItem, RectangleItem, Shadow, TextItem};
use vellum::render::Renderer;
use vellum::surface::recording::{RecordingSurface, SurfaceOp};

fn color(name: &str) -> Color {
    Color::new(name).unwrap()
}

/// Backend that counts load requests and lets the test resolve them.
#[derive(Default)]
struct CountingBackend {
    requests: Vec<(String, Option<LoadCompletion>)>,
}

impl CountingBackend {
    fn resolve_all(&mut self, image: DecodedImage) {
        for (_, completion) in &mut self.requests {
            if let Some(completion) = completion.take() {
                completion.complete(Ok(image));
            }
        }
    }
}

impl ImageBackend for CountingBackend {
    fn load(&mut self, url: &str) -> ImageLoad {
        let (load, completion) = ImageLoad::pending();
        self.requests.push((url.to_string(), Some(completion)));
        load
    }
}

#[test]
fn text_item_measures_through_the_whole_pipeline() {
    let mut surface = RecordingSurface::new();
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let mut drawable = Drawable::new(Size::default()).with_items(vec![Item::from(
        TextItem::new(
            "AB",
            FontSpec::new(FontFamily::Arial, 20.0),
            Point::new(10.0, 100.0),
        ),
    )
    .with_fill(color("black"))]);

    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();

    // Arial at 20px: ascent 15.6, descent 0.6. The recording surface
    // measures 0.6 * 20 * 2 = 24 of advance, padded by the ascent.
    assert_approx_eq!(f32, drawable.size().height(), 16.2);
    assert_approx_eq!(f32, drawable.size().width(), 39.6);

    // The baseline lands below the descent-adjusted anchor.
    assert!(surface.ops().iter().any(|op| matches!(
        op,
        SurfaceOp::FillText { text, position }
            if text == "AB" && (position.y() - 115.0).abs() < 1e-3
    )));
}

#[test]
fn repeated_draws_reuse_one_decode() {
    let mut surface = RecordingSurface::new();
    let decoded = surface.register_image(Size::new(64.0, 64.0));
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let item = || {
        Item::from(
            ImageItem::from_url("https://cdn.example.com/sprites/star.png", Point::new(4.0, 4.0))
                .with_size(Size::new(32.0, 32.0)),
        )
    };

    // First pass misses and requests a decode.
    let mut drawable = Drawable::new(Size::default()).with_items(vec![item()]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert_eq!(backend.requests.len(), 1);

    // Host finishes the decode; the next pass draws the deferred image,
    // caches it, and the item itself now hits.
    backend.resolve_all(decoded);
    let mut drawable = Drawable::new(Size::default()).with_items(vec![item()]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert_eq!(backend.requests.len(), 1);
    assert_eq!(images.len(), 1);

    // Third pass: pure cache hit, zero new decode requests.
    let mut drawable = Drawable::new(Size::default()).with_items(vec![item()]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert_eq!(backend.requests.len(), 1);

    // Same name at other dimensions is a distinct cache entry.
    let mut drawable = Drawable::new(Size::default()).with_items(vec![Item::from(
        ImageItem::from_url("https://cdn.example.com/sprites/star.png", Point::new(4.0, 4.0))
            .with_size(Size::new(48.0, 48.0)),
    )]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert_eq!(backend.requests.len(), 2);
}

#[test]
fn cached_image_draws_at_requested_dimensions() {
    let mut surface = RecordingSurface::new();
    // Natural size 64x64, requested 32x32: the cache remembers the request.
    let decoded = surface.register_image(Size::new(64.0, 64.0));
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let item = || {
        Item::from(
            ImageItem::from_url("a/star.png", Point::new(0.0, 0.0))
                .with_size(Size::new(32.0, 32.0)),
        )
    };
    let mut drawable = Drawable::new(Size::default()).with_items(vec![item()]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    backend.resolve_all(decoded);

    surface.take_ops();
    let mut drawable = Drawable::new(Size::default()).with_items(vec![item()]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();

    let scaled_draws = surface
        .ops()
        .iter()
        .filter(|op| {
            matches!(op, SurfaceOp::DrawImageScaled { size, .. }
                if *size == Size::new(32.0, 32.0))
        })
        .count();
    // Deferred draw plus the cache hit in the same pass.
    assert_eq!(scaled_draws, 2);
}

#[test]
fn shadow_never_leaks_to_the_next_item() {
    let mut surface = RecordingSurface::new();
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let mut drawable = Drawable::new(Size::default()).with_items(vec![
        Item::from(RectangleItem::new(Point::default(), Size::new(10.0, 10.0)))
            .with_fill(color("red"))
            .with_shadow(Shadow::new(2.0, 2.0, 4.0, color("gray"))),
        Item::from(OvalItem::new(Point::new(30.0, 5.0), 5.0)).with_fill(color("blue")),
    ]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();

    let ops = surface.ops();
    let set_shadow = ops
        .iter()
        .position(|op| matches!(op, SurfaceOp::SetShadow(_)))
        .unwrap();
    let clear_shadow = ops
        .iter()
        .position(|op| *op == SurfaceOp::ClearShadow)
        .unwrap();
    let second_item_start = ops
        .iter()
        .rposition(|op| matches!(op, SurfaceOp::SetFillPaint(_)))
        .unwrap();
    assert!(set_shadow < clear_shadow);
    assert!(clear_shadow < second_item_start);
}

#[test]
fn rotation_transform_is_always_popped() {
    let mut surface = RecordingSurface::new();
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let mut drawable = Drawable::new(Size::default()).with_items(vec![
        Item::from(RectangleItem::new(Point::default(), Size::new(10.0, 10.0)))
            .with_fill(color("green"))
            .with_rotation(30.0),
        // Invalid item aborts the pass after the rotated one drew.
        Item::from(OvalItem::new(Point::default(), f32::NAN)).with_rotation(10.0),
    ]);
    let result = Renderer::new(&mut surface, &mut images, &mut backend).render(&mut drawable);
    assert!(result.is_err());

    let saves = surface
        .ops()
        .iter()
        .filter(|op| **op == SurfaceOp::Save)
        .count();
    let restores = surface
        .ops()
        .iter()
        .filter(|op| **op == SurfaceOp::Restore)
        .count();
    assert_eq!(saves, restores);
}

#[test]
fn zero_corner_radii_matches_plain_rectangle() {
    let render = |item: Item| {
        let mut surface = RecordingSurface::new();
        let mut images = ImageCache::new();
        let mut backend = CountingBackend::default();
        let mut drawable = Drawable::new(Size::default()).with_items(vec![item]);
        Renderer::new(&mut surface, &mut images, &mut backend)
            .render(&mut drawable)
            .unwrap();
        surface.take_ops()
    };

    let plain = render(
        Item::from(RectangleItem::new(Point::new(3.0, 3.0), Size::new(20.0, 10.0)))
            .with_fill(color("teal")),
    );
    let zeroed = render(
        Item::from(
            RectangleItem::new(Point::new(3.0, 3.0), Size::new(20.0, 10.0))
                .with_corner_radii([0.0, 0.0, 0.0, 0.0]),
        )
        .with_fill(color("teal")),
    );
    assert_eq!(plain, zeroed);
}

#[test]
fn animation_runs_n_plus_one_cycles_in_both_modes() {
    for mode in [
        ScheduleMode::Interval(Duration::from_millis(16)),
        ScheduleMode::FrameDriven,
    ] {
        let builds = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&builds);
        let scene = Scene::new(Drawable::new(Size::new(20.0, 20.0)), move |drawable| {
            counter.set(counter.get() + 1);
            drawable.set_items(vec![
                Item::from(OvalItem::new(Point::new(10.0, 10.0), 4.0))
                    .with_fill(color("orange")),
            ]);
        });

        let steps = Cell::new(3usize);
        let mut animator = Animator::new(scene, mode).with_transform(move |_| {
            if steps.get() > 0 {
                steps.set(steps.get() - 1);
                true
            } else {
                false
            }
        });

        let mut surface = RecordingSurface::new();
        let mut images = ImageCache::new();
        let mut backend = CountingBackend::default();
        loop {
            let mut renderer = Renderer::new(&mut surface, &mut images, &mut backend);
            if let ControlFlow::Break(()) = animator.tick(&mut renderer).unwrap() {
                break;
            }
        }

        assert_eq!(builds.get(), 4, "mode {mode:?}");
        assert_eq!(animator.state(), AnimationState::Done);
    }
}

#[test]
fn strict_stop_policy_skips_the_final_frame() {
    let builds = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&builds);
    let scene = Scene::new(Drawable::new(Size::new(20.0, 20.0)), move |_| {
        counter.set(counter.get() + 1);
    });

    let steps = Cell::new(2usize);
    let mut animator = Animator::new(scene, ScheduleMode::Interval(Duration::from_millis(16)))
        .with_transform(move |_| {
            if steps.get() > 0 {
                steps.set(steps.get() - 1);
                true
            } else {
                false
            }
        })
        .with_config(EngineConfig::default().with_stop_policy(StopPolicy::SkipFinalFrame));

    let mut surface = RecordingSurface::new();
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();
    loop {
        let mut renderer = Renderer::new(&mut surface, &mut images, &mut backend);
        if let ControlFlow::Break(()) = animator.tick(&mut renderer).unwrap() {
            break;
        }
    }

    assert_eq!(builds.get(), 2);
}

#[test]
fn stopped_animator_stays_stopped() {
    let scene = Scene::new(Drawable::new(Size::new(10.0, 10.0)), |_| {});
    let mut animator = Animator::new(scene, ScheduleMode::FrameDriven).with_transform(|_| true);

    let mut surface = RecordingSurface::new();
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let mut renderer = Renderer::new(&mut surface, &mut images, &mut backend);
    assert!(animator.tick(&mut renderer).unwrap().is_continue());

    animator.stop();
    let mut renderer = Renderer::new(&mut surface, &mut images, &mut backend);
    assert!(animator.tick(&mut renderer).unwrap().is_break());
    assert_eq!(animator.state(), AnimationState::Stopped);
}

#[test]
fn on_image_loaded_fires_exactly_once() {
    let mut surface = RecordingSurface::new();
    let decoded = surface.register_image(Size::new(16.0, 16.0));
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let fired = Rc::new(Cell::new(0usize));
    let hook = Rc::clone(&fired);
    let mut drawable = Drawable::new(Size::default()).with_items(vec![Item::from(
        ImageItem::from_url("icons/check.png", Point::default()),
    )
    .with_on_image_loaded(move || hook.set(hook.get() + 1))]);

    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert_eq!(fired.get(), 0);

    backend.resolve_all(decoded);
    Renderer::new(&mut surface, &mut images, &mut backend).complete_pending_images();
    assert_eq!(fired.get(), 1);

    // Later passes have nothing left to fire.
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert_eq!(fired.get(), 1);
}

#[test]
fn render_to_image_produces_a_drawable_handle() {
    let mut surface = RecordingSurface::new();
    let mut images = ImageCache::new();
    let mut backend = CountingBackend::default();

    let mut badge = Drawable::new(Size::new(24.0, 24.0)).with_items(vec![
        Item::from(OvalItem::new(Point::new(12.0, 12.0), 10.0)).with_fill(color("gold")),
    ]);
    let image = Renderer::new(&mut surface, &mut images, &mut backend)
        .render_to_image(&mut badge)
        .unwrap();
    assert_eq!(image.size(), Size::new(24.0, 24.0));
    assert_ne!(image.handle(), ImageHandle::new(0));

    // The finished image is usable as an ordinary item source.
    let mut drawable = Drawable::new(Size::new(100.0, 100.0)).with_items(vec![Item::from(
        ImageItem::new(vellum::item::ImageSource::Decoded(image), Point::new(10.0, 10.0)),
    )]);
    Renderer::new(&mut surface, &mut images, &mut backend)
        .render(&mut drawable)
        .unwrap();
    assert!(surface.ops().contains(&SurfaceOp::DrawImage {
        image: image.handle(),
        position: Point::new(10.0, 10.0),
    }));
}
