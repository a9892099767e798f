//! Region selection: coordinate mapping and drag tracking

pub mod capture;
pub mod drag;
pub mod mapper;

pub use capture::{PointerCapture, PointerRouter};
pub use drag::{DragEvent, DragTracker, MIN_REGION_SIZE};
pub use mapper::CoordinateMapper;
