//! Region selection and coordinate normalization for manga page annotation
//!
//! Pointer drags over a displayed page become rectangles in the page's
//! native pixel space, are stored per page, sent to a recognition and
//! translation backend, and mapped back to screen space for overlays.

pub mod collaborator;
pub mod config;
pub mod domain;
pub mod regions;
pub mod render;
pub mod selection;
pub mod surface;

pub use collaborator::{HttpSubmitter, RecognitionResult, RegionSubmitter};
pub use config::MangaLensConfig;
pub use domain::{AnnotatedRegion, BoundingBox, Point, Region, ScreenRect, Size};
pub use selection::{CoordinateMapper, DragEvent, DragTracker};
pub use surface::{SelectionSurface, Session, Submission, SubmissionOutcome};
