//! Annotated region types
//!
//! All regions store coordinates in image space.

use super::geometry::Region;

/// Progress of the recognition request for one region
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RegionStatus {
    #[default]
    Pending,
    Done,
    Failed(String),
}

/// A committed region plus the text the collaborator produced for it
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnnotatedRegion {
    pub region: Region,
    /// Empty until the collaborator responds
    pub text: String,
    pub status: RegionStatus,
}

impl AnnotatedRegion {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            text: String::new(),
            status: RegionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RegionStatus::Pending
    }
}
