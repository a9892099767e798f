//! Committed regions and the text gathered for them

pub mod store;
pub mod transcript;

pub use store::RegionStore;
pub use transcript::Transcript;
