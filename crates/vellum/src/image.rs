//! Image loading and the decoded-image cache.
//!
//! Decoding is asynchronous and host-driven: the renderer asks an
//! [`ImageBackend`] for an [`ImageLoad`], the host completes the load
//! through the paired [`LoadCompletion`] whenever its decoder finishes,
//! and the renderer drains finished loads at the start of the next render
//! pass. A drained image draws with the parameters captured when it was
//! requested, then lands in the [`ImageCache`].
//!
//! Cache entries are keyed by image name plus the *requested* draw
//! dimensions, so the same pixels drawn at two sizes occupy two entries
//! and decode twice. Two items requesting the same missing image within
//! one pass also issue two loads; the cache only deduplicates after the
//! first completion lands.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;
use vellum_core::color::Color;
use vellum_core::geometry::{Point, Size};

/// An opaque backend identifier for decoded pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageHandle(u64);

impl ImageHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the backend identifier
    pub fn id(self) -> u64 {
        self.0
    }
}

/// A decoded image: a handle plus its natural pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodedImage {
    handle: ImageHandle,
    size: Size,
}

impl DecodedImage {
    pub fn new(handle: ImageHandle, size: Size) -> Self {
        Self { handle, size }
    }

    /// Returns the backend handle
    pub fn handle(self) -> ImageHandle {
        self.handle
    }

    /// Returns the natural dimensions
    pub fn size(self) -> Size {
        self.size
    }
}

/// Image backend failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    #[error("image decode failed for '{url}': {reason}")]
    Decode { url: String, reason: String },

    #[error("image load cancelled for '{url}'")]
    Cancelled { url: String },
}

enum LoadState {
    Pending,
    Done(Result<DecodedImage, ImageError>),
    Taken,
}

/// The renderer's half of an asynchronous image load.
pub struct ImageLoad {
    state: Rc<RefCell<LoadState>>,
}

impl ImageLoad {
    /// Creates a load that the host resolves later through the returned
    /// completion handle.
    pub fn pending() -> (Self, LoadCompletion) {
        let state = Rc::new(RefCell::new(LoadState::Pending));
        (
            Self {
                state: Rc::clone(&state),
            },
            LoadCompletion { state },
        )
    }

    /// Creates an already resolved load. Useful for backends with decoded
    /// pixels on hand.
    pub fn ready(image: DecodedImage) -> Self {
        Self {
            state: Rc::new(RefCell::new(LoadState::Done(Ok(image)))),
        }
    }

    /// Creates an already failed load.
    pub fn failed(error: ImageError) -> Self {
        Self {
            state: Rc::new(RefCell::new(LoadState::Done(Err(error)))),
        }
    }

    /// Takes the result if the load has finished. Returns it at most once.
    pub(crate) fn poll(&self) -> Option<Result<DecodedImage, ImageError>> {
        let mut state = self.state.borrow_mut();
        match &*state {
            LoadState::Pending | LoadState::Taken => None,
            LoadState::Done(_) => match std::mem::replace(&mut *state, LoadState::Taken) {
                LoadState::Done(result) => Some(result),
                _ => None,
            },
        }
    }
}

impl fmt::Debug for ImageLoad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.state.borrow() {
            LoadState::Pending => "Pending",
            LoadState::Done(_) => "Done",
            LoadState::Taken => "Taken",
        };
        f.debug_tuple("ImageLoad").field(&state).finish()
    }
}

/// The host's half of an asynchronous image load.
pub struct LoadCompletion {
    state: Rc<RefCell<LoadState>>,
}

impl LoadCompletion {
    /// Resolves the load. A completion can only fire once; consuming it
    /// enforces that.
    pub fn complete(self, result: Result<DecodedImage, ImageError>) {
        let mut state = self.state.borrow_mut();
        if matches!(&*state, LoadState::Pending) {
            *state = LoadState::Done(result);
        }
    }
}

/// Source of decoded images. The engine never fetches or decodes itself.
pub trait ImageBackend {
    /// Starts fetching and decoding `url`. May return an already resolved
    /// load if the pixels are at hand.
    fn load(&mut self, url: &str) -> ImageLoad;
}

/// Cache key: image name plus the requested draw dimensions.
///
/// Dimensions participate bit-exactly, so a 32.0x32.0 request and a
/// 32.5x32.0 request are distinct entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageKey {
    name: String,
    width_bits: Option<u32>,
    height_bits: Option<u32>,
}

impl ImageKey {
    pub fn new(name: impl Into<String>, requested: Option<Size>) -> Self {
        Self {
            name: name.into(),
            width_bits: requested.map(|size| size.width().to_bits()),
            height_bits: requested.map(|size| size.height().to_bits()),
        }
    }

    /// Returns the image name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A cache entry: the decoded handle plus the dimensions it was requested
/// at. `None` means the image draws at its natural size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedImage {
    handle: ImageHandle,
    size: Option<Size>,
}

impl CachedImage {
    pub fn new(handle: ImageHandle, size: Option<Size>) -> Self {
        Self { handle, size }
    }

    /// Returns the decoded handle
    pub fn handle(self) -> ImageHandle {
        self.handle
    }

    /// Returns the requested draw dimensions
    pub fn size(self) -> Option<Size> {
        self.size
    }
}

/// Draw parameters captured at request time, replayed when the decode
/// completes.
#[derive(Debug, Clone)]
pub(crate) struct DeferredDraw {
    pub(crate) position: Point,
    pub(crate) requested: Option<Size>,
    pub(crate) rotation_degrees: Option<f32>,
    pub(crate) rotation_center: Point,
    pub(crate) color_filter: Option<Color>,
}

pub(crate) struct InFlight {
    pub(crate) key: ImageKey,
    pub(crate) load: ImageLoad,
    pub(crate) draw: DeferredDraw,
    pub(crate) on_loaded: Option<Box<dyn FnOnce()>>,
}

/// A finished load, detached from the in-flight list.
pub(crate) struct FinishedLoad {
    pub(crate) key: ImageKey,
    pub(crate) result: Result<DecodedImage, ImageError>,
    pub(crate) draw: DeferredDraw,
    pub(crate) on_loaded: Option<Box<dyn FnOnce()>>,
}

/// Decoded-image cache plus the list of loads still in flight.
#[derive(Default)]
pub struct ImageCache {
    entries: HashMap<ImageKey, CachedImage>,
    in_flight: Vec<InFlight>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a cache entry.
    pub fn get(&self, key: &ImageKey) -> Option<&CachedImage> {
        self.entries.get(key)
    }

    /// Inserts a cache entry, replacing any previous one under `key`.
    pub fn insert(&mut self, key: ImageKey, image: CachedImage) {
        self.entries.insert(key, image);
    }

    /// Returns the number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are cached
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of loads still in flight
    pub fn pending_loads(&self) -> usize {
        self.in_flight.len()
    }

    pub(crate) fn push_in_flight(&mut self, in_flight: InFlight) {
        self.in_flight.push(in_flight);
    }

    /// Detaches every in-flight load whose result is available, preserving
    /// request order.
    pub(crate) fn take_finished(&mut self) -> Vec<FinishedLoad> {
        let mut finished = Vec::new();
        let mut still_pending = Vec::new();
        for in_flight in self.in_flight.drain(..) {
            match in_flight.load.poll() {
                Some(result) => finished.push(FinishedLoad {
                    key: in_flight.key,
                    result,
                    draw: in_flight.draw,
                    on_loaded: in_flight.on_loaded,
                }),
                None => still_pending.push(in_flight),
            }
        }
        self.in_flight = still_pending;
        finished
    }
}

impl fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries)
            .field("pending_loads", &self.in_flight.len())
            .finish()
    }
}

/// The cache name of a URL-sourced image: everything after the last slash.
pub(crate) fn name_from_url(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(id: u64) -> DecodedImage {
        DecodedImage::new(ImageHandle::new(id), Size::new(32.0, 32.0))
    }

    #[test]
    fn test_name_from_url() {
        assert_eq!(name_from_url("https://example.com/img/star.png"), "star.png");
        assert_eq!(name_from_url("star.png"), "star.png");
        assert_eq!(name_from_url("dir/"), "");
    }

    #[test]
    fn test_key_distinguishes_dimensions() {
        let a = ImageKey::new("star.png", Some(Size::new(32.0, 32.0)));
        let b = ImageKey::new("star.png", Some(Size::new(32.5, 32.0)));
        let c = ImageKey::new("star.png", None);
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ImageKey::new("star.png", Some(Size::new(32.0, 32.0))));
    }

    #[test]
    fn test_pending_load_resolves_once() {
        let (load, completion) = ImageLoad::pending();
        assert!(load.poll().is_none());

        completion.complete(Ok(decoded(1)));
        let result = load.poll();
        assert!(matches!(result, Some(Ok(image)) if image.handle() == ImageHandle::new(1)));
        assert!(load.poll().is_none());
    }

    #[test]
    fn test_ready_and_failed_loads() {
        let ready = ImageLoad::ready(decoded(2));
        assert!(matches!(ready.poll(), Some(Ok(_))));

        let failed = ImageLoad::failed(ImageError::Cancelled {
            url: "x.png".to_string(),
        });
        assert!(matches!(failed.poll(), Some(Err(ImageError::Cancelled { .. }))));
    }

    #[test]
    fn test_take_finished_keeps_pending() {
        let mut cache = ImageCache::new();
        let (pending, _completion) = ImageLoad::pending();
        let draw = DeferredDraw {
            position: Point::default(),
            requested: None,
            rotation_degrees: None,
            rotation_center: Point::default(),
            color_filter: None,
        };
        cache.push_in_flight(InFlight {
            key: ImageKey::new("a.png", None),
            load: pending,
            draw: draw.clone(),
            on_loaded: None,
        });
        cache.push_in_flight(InFlight {
            key: ImageKey::new("b.png", None),
            load: ImageLoad::ready(decoded(3)),
            draw,
            on_loaded: None,
        });

        let finished = cache.take_finished();
        assert_eq!(finished.len(), 1);
        assert_eq!(finished[0].key.name(), "b.png");
        assert_eq!(cache.pending_loads(), 1);
    }
}
