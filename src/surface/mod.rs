//! Selection surfaces: live drag preview, stored overlays and detail popups
//!
//! This module contains:
//! - The per-image surface composing mapping, dragging and overlays
//! - The multi-image session and its submission plumbing
//! - Popup placement and overlay render models

pub mod overlay;
pub mod popup;
pub mod selection_surface;
pub mod session;

pub use overlay::OverlayBox;
pub use popup::{DetailPopup, PopupPlacement, PopupSide, PopupStyle, place_popup};
pub use selection_surface::SelectionSurface;
pub use session::{CommitHook, Session, Submission, SubmissionOutcome};
