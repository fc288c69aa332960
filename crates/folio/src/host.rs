//! Capabilities the embedding environment hands to a [`crate::Page`].

use folio_core::motion::RevealKey;
use folio_core::{MemoryStorage, Storage};
use std::cell::RefCell;
use std::rc::Rc;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    #[error("clipboard access denied")]
    Denied,
    #[error("clipboard unavailable")]
    Unavailable,
}

pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// Records every write. Clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    writes: Rc<RefCell<Vec<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn writes(&self) -> Vec<String> {
        self.writes.borrow().clone()
    }

    pub fn last(&self) -> Option<String> {
        self.writes.borrow().last().cloned()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.writes.borrow_mut().push(text.to_string());
        Ok(())
    }
}

/// A clipboard the user never granted.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeniedClipboard;

impl Clipboard for DeniedClipboard {
    fn write_text(&mut self, _text: &str) -> Result<(), ClipboardError> {
        Err(ClipboardError::Denied)
    }
}

pub trait Viewport {
    /// Width and height of the visible area.
    fn size(&self) -> (f64, f64);
    /// Viewport-relative top of a reveal target, if it has been laid out.
    fn top_of(&self, key: RevealKey) -> Option<f64>;
    fn scroll_y(&self) -> f64 {
        0.0
    }
}

/// Fixed-size viewport without real layout. Unless explicit tops are given, every target is
/// reported at the top of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessViewport {
    pub width: f64,
    pub height: f64,
    tops: Option<Vec<f64>>,
}

impl Default for HeadlessViewport {
    fn default() -> Self {
        Self::new(1280.0, 900.0)
    }
}

impl HeadlessViewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            tops: None,
        }
    }

    /// Per-key tops; keys past the end have no known position.
    pub fn with_tops(mut self, tops: Vec<f64>) -> Self {
        self.tops = Some(tops);
        self
    }
}

impl Viewport for HeadlessViewport {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn top_of(&self, key: RevealKey) -> Option<f64> {
        match &self.tops {
            Some(tops) => tops.get(key).copied(),
            None => Some(0.0),
        }
    }
}

pub struct Host {
    pub storage: Box<dyn Storage>,
    pub clipboard: Box<dyn Clipboard>,
    pub viewport: Box<dyn Viewport>,
    pub prefers_reduced_motion: bool,
    /// Address of the document, used for copied heading links and the boot fragment.
    pub location: Option<Url>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("prefers_reduced_motion", &self.prefers_reduced_motion)
            .field("location", &self.location.as_ref().map(Url::as_str))
            .finish_non_exhaustive()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::headless()
    }
}

impl Host {
    pub fn headless() -> Self {
        Self {
            storage: Box::new(MemoryStorage::new()),
            clipboard: Box::new(MemoryClipboard::new()),
            viewport: Box::new(HeadlessViewport::default()),
            prefers_reduced_motion: false,
            location: None,
        }
    }

    pub fn with_storage(mut self, storage: impl Storage + 'static) -> Self {
        self.storage = Box::new(storage);
        self
    }

    pub fn with_clipboard(mut self, clipboard: impl Clipboard + 'static) -> Self {
        self.clipboard = Box::new(clipboard);
        self
    }

    pub fn with_viewport(mut self, viewport: impl Viewport + 'static) -> Self {
        self.viewport = Box::new(viewport);
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.prefers_reduced_motion = reduced;
        self
    }

    pub fn with_location(mut self, location: Url) -> Self {
        self.location = Some(location);
        self
    }
}
