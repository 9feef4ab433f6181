//! Vellum - A declarative 2D rendering engine with an animation scheduler.
//!
//! Drawing is described as data: a [`drawable::Drawable`] holds a list of
//! [`item::Item`]s (shapes, text runs, image placements) that the
//! [`render::Renderer`] interprets against a caller-supplied
//! [`surface::Surface`]. Image decoding, timers, and rasterization all
//! live on the host side of those seams, so the engine itself is
//! deterministic and testable against the recording surface.
//!
//! # Examples
//!
//! ```
//! use vellum::drawable::Drawable;
//! use vellum::image::ImageCache;
//! use vellum::item::{Item, OvalItem};
//! use vellum::render::Renderer;
//! use vellum::surface::recording::RecordingSurface;
//! use vellum::color::Color;
//! use vellum::geometry::{Point, Size};
//!
//! # struct NoImages;
//! # impl vellum::image::ImageBackend for NoImages {
//! #     fn load(&mut self, url: &str) -> vellum::image::ImageLoad {
//! #         vellum::image::ImageLoad::failed(vellum::image::ImageError::Cancelled {
//! #             url: url.to_string(),
//! #         })
//! #     }
//! # }
//! let mut surface = RecordingSurface::new();
//! let mut images = ImageCache::new();
//! let mut backend = NoImages;
//!
//! let mut drawable = Drawable::new(Size::new(40.0, 40.0)).with_items(vec![
//!     Item::from(OvalItem::new(Point::new(20.0, 20.0), 10.0))
//!         .with_fill(Color::new("tomato").unwrap()),
//! ]);
//!
//! let mut renderer = Renderer::new(&mut surface, &mut images, &mut backend);
//! renderer.render(&mut drawable).unwrap();
//! assert!(!surface.ops().is_empty());
//! ```

pub mod animate;
pub mod config;
pub mod drawable;
pub mod image;
pub mod item;
pub mod layout;
pub mod render;
pub mod surface;
pub mod text;

mod error;

pub use vellum_core::{color, font, geometry, gradient};

pub use error::Error;
