//! Per-image, append-only storage of committed regions
//!
//! A region's identity is its index inside its image's sequence. Entries
//! are never removed or reordered, so an index captured at submission time
//! still names the same region when the result arrives.

use crate::domain::{AnnotatedRegion, Region, RegionStatus};

#[derive(Clone, Debug, Default)]
pub struct RegionStore {
    images: Vec<Vec<AnnotatedRegion>>,
}

impl RegionStore {
    /// Store with an empty sequence for each of `image_count` images
    pub fn with_images(image_count: usize) -> Self {
        Self {
            images: vec![Vec::new(); image_count],
        }
    }

    /// Drop every region and start over with `image_count` empty sequences
    pub fn reset(&mut self, image_count: usize) {
        self.images.clear();
        self.images.resize_with(image_count, Vec::new);
    }

    /// Append a region with empty text; returns its index within the image
    pub fn append(&mut self, image_index: usize, region: Region) -> Option<usize> {
        let Some(regions) = self.images.get_mut(image_index) else {
            log::warn!("Cannot store region for unknown image {image_index}");
            return None;
        };
        regions.push(AnnotatedRegion::new(region));
        Some(regions.len() - 1)
    }

    /// Overwrite the text of an existing entry and mark it done
    ///
    /// Returns false if the entry does not exist.
    pub fn set_text(&mut self, image_index: usize, region_index: usize, text: String) -> bool {
        match self.entry_mut(image_index, region_index) {
            Some(entry) => {
                entry.text = text;
                entry.status = RegionStatus::Done;
                true
            }
            None => false,
        }
    }

    /// Record a failed recognition; the text is left untouched
    pub fn mark_failed(&mut self, image_index: usize, region_index: usize, error: String) -> bool {
        match self.entry_mut(image_index, region_index) {
            Some(entry) => {
                entry.status = RegionStatus::Failed(error);
                true
            }
            None => false,
        }
    }

    /// Regions of one image in insertion order
    pub fn regions(&self, image_index: usize) -> &[AnnotatedRegion] {
        self.images
            .get(image_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn get(&self, image_index: usize, region_index: usize) -> Option<&AnnotatedRegion> {
        self.images.get(image_index)?.get(region_index)
    }

    /// Number of regions still waiting for the collaborator, across all images
    pub fn pending_count(&self) -> usize {
        self.images
            .iter()
            .flatten()
            .filter(|r| r.is_pending())
            .count()
    }

    fn entry_mut(&mut self, image_index: usize, region_index: usize) -> Option<&mut AnnotatedRegion> {
        let entry = self
            .images
            .get_mut(image_index)
            .and_then(|regions| regions.get_mut(region_index));
        if entry.is_none() {
            log::warn!("No stored region {region_index} on image {image_index}");
        }
        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_returns_insertion_index_per_image() {
        let mut store = RegionStore::with_images(2);
        assert_eq!(store.append(0, Region::new(0, 0, 10, 10)), Some(0));
        assert_eq!(store.append(1, Region::new(5, 5, 10, 10)), Some(0));
        assert_eq!(store.append(0, Region::new(20, 20, 10, 10)), Some(1));

        assert_eq!(store.regions(0).len(), 2);
        assert_eq!(store.regions(1).len(), 1);
        assert_eq!(store.regions(0)[1].region, Region::new(20, 20, 10, 10));
        assert!(store.regions(0).iter().all(|r| r.text.is_empty()));
        assert_eq!(store.pending_count(), 3);
    }

    #[test]
    fn test_append_to_unknown_image() {
        let mut store = RegionStore::with_images(1);
        assert_eq!(store.append(3, Region::new(0, 0, 10, 10)), None);
        assert!(store.regions(3).is_empty());
    }

    #[test]
    fn test_set_text_and_failure() {
        let mut store = RegionStore::with_images(1);
        store.append(0, Region::new(0, 0, 10, 10));
        store.append(0, Region::new(0, 0, 20, 20));

        assert!(store.set_text(0, 1, "hello".to_string()));
        assert!(store.mark_failed(0, 0, "backend down".to_string()));

        let first = store.get(0, 0).unwrap();
        assert_eq!(first.text, "");
        assert_eq!(first.status, RegionStatus::Failed("backend down".to_string()));
        let second = store.get(0, 1).unwrap();
        assert_eq!(second.text, "hello");
        assert_eq!(second.status, RegionStatus::Done);
        assert_eq!(store.pending_count(), 0);
    }

    #[test]
    fn test_set_text_on_missing_entry() {
        let mut store = RegionStore::with_images(1);
        assert!(!store.set_text(0, 0, "x".to_string()));
        assert!(!store.set_text(4, 0, "x".to_string()));
        assert!(!store.mark_failed(0, 2, "x".to_string()));
    }

    #[test]
    fn test_reset_clears_all_images() {
        let mut store = RegionStore::with_images(2);
        store.append(0, Region::new(0, 0, 10, 10));
        store.reset(3);
        assert!(store.regions(0).is_empty());
        assert_eq!(store.append(2, Region::new(0, 0, 10, 10)), Some(0));
        assert_eq!(store.append(3, Region::new(0, 0, 10, 10)), None);
    }
}
