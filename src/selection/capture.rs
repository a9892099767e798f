//! Global pointer capture scoped to an active drag
//!
//! Once a drag starts, pointer moves and releases anywhere in the window
//! must reach the image that owns the drag. The capture is an RAII guard:
//! it is acquired on entering the dragging state and released when the
//! guard is dropped, so no route outlives the gesture.

use std::cell::Cell;
use std::rc::Rc;

/// Window-level router deciding which image receives global pointer events
#[derive(Clone, Debug, Default)]
pub struct PointerRouter {
    owner: Rc<Cell<Option<usize>>>,
}

impl PointerRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route global pointer events to `image_index` until the guard drops
    ///
    /// Returns `None` while another image holds the capture.
    pub fn acquire(&self, image_index: usize) -> Option<PointerCapture> {
        if self.owner.get().is_some() {
            return None;
        }
        self.owner.set(Some(image_index));
        log::debug!("Pointer captured by image {image_index}");
        Some(PointerCapture {
            owner: Rc::clone(&self.owner),
            image_index,
        })
    }

    /// Image currently receiving global pointer events
    pub fn owner(&self) -> Option<usize> {
        self.owner.get()
    }
}

/// Guard holding the global pointer route for one image
#[derive(Debug)]
pub struct PointerCapture {
    owner: Rc<Cell<Option<usize>>>,
    image_index: usize,
}

impl PointerCapture {
    pub fn image_index(&self) -> usize {
        self.image_index
    }
}

impl Drop for PointerCapture {
    fn drop(&mut self) {
        if self.owner.get() == Some(self.image_index) {
            self.owner.set(None);
            log::debug!("Pointer released by image {}", self.image_index);
        }
    }
}
