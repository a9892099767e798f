//! Multi-image selection session
//!
//! Owns one [`SelectionSurface`] per image, the shared [`RegionStore`], the
//! window-level pointer router and the single active detail popup. All
//! methods run on the UI thread; the only asynchronous work is the
//! [`Submission`] future, which owns everything it needs and is applied
//! back through [`Session::apply`].

use crate::collaborator::{HttpSubmitter, RecognitionResult, RegionSubmitter};
use crate::config::MangaLensConfig;
use crate::domain::{ActiveDetail, AnnotatedRegion, BoundingBox, Region, ScreenRect, Size};
use crate::regions::{RegionStore, Transcript};
use crate::selection::{DragEvent, MIN_REGION_SIZE, PointerRouter};

use super::overlay::OverlayBox;
use super::popup::{DetailPopup, PopupStyle, place_popup};
use super::selection_surface::SelectionSurface;

/// Notification fired for every committed region: `(image_index, region)`
pub type CommitHook = Box<dyn FnMut(usize, Region)>;

/// A committed region on its way to the collaborator
///
/// Carries the exact `(image_index, region_index)` it was stored under so
/// its result is routed back there no matter when it resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub generation: u64,
    pub image_index: usize,
    pub region_index: usize,
    pub image_source: String,
    pub region: Region,
}

impl Submission {
    /// Run the submission; never touches session state
    pub async fn send<S: RegionSubmitter>(self, submitter: &S) -> SubmissionOutcome {
        let result = submitter.submit(&self.image_source, self.region).await;
        SubmissionOutcome {
            submission: self,
            result,
        }
    }
}

/// A resolved submission, ready to be applied with [`Session::apply`]
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub submission: Submission,
    pub result: anyhow::Result<RecognitionResult>,
}

pub struct Session {
    surfaces: Vec<SelectionSurface>,
    store: RegionStore,
    transcript: Transcript,
    router: PointerRouter,
    selection_mode: bool,
    active_detail: Option<ActiveDetail>,
    /// Bumped whenever the image list changes
    generation: u64,
    popup_style: PopupStyle,
    on_region_committed: Option<CommitHook>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(PopupStyle::default())
    }
}

impl Session {
    pub fn new(popup_style: PopupStyle) -> Self {
        Self {
            surfaces: Vec::new(),
            store: RegionStore::default(),
            transcript: Transcript::default(),
            router: PointerRouter::new(),
            selection_mode: false,
            active_detail: None,
            generation: 0,
            popup_style,
            on_region_committed: None,
        }
    }

    pub fn from_config(config: &MangaLensConfig) -> Self {
        Self::new(PopupStyle {
            width: config.popup_width,
            gap: config.popup_gap,
            ..PopupStyle::default()
        })
    }

    /// Install the hook notified of every committed region
    pub fn set_commit_hook(&mut self, hook: impl FnMut(usize, Region) + 'static) {
        self.on_region_committed = Some(Box::new(hook));
    }

    /// Replace the displayed images; every stored region is dropped and
    /// results still in flight for the old images will be ignored
    pub fn set_images<I, S>(&mut self, sources: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        // Old surfaces go first so their pointer captures are released
        self.surfaces.clear();
        self.surfaces = sources.into_iter().map(SelectionSurface::new).collect();
        self.store.reset(self.surfaces.len());
        self.active_detail = None;
        self.generation += 1;
        log::info!(
            "Image list changed: {} images (generation {})",
            self.surfaces.len(),
            self.generation
        );
    }

    pub fn image_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self, image_index: usize) -> Option<&SelectionSurface> {
        self.surfaces.get(image_index)
    }

    pub fn update_layout(&mut self, image_index: usize, bounds: BoundingBox) -> bool {
        match self.surfaces.get_mut(image_index) {
            Some(surface) => {
                surface.update_layout(bounds);
                true
            }
            None => false,
        }
    }

    pub fn set_natural_size(&mut self, image_index: usize, natural: Size) -> bool {
        match self.surfaces.get_mut(image_index) {
            Some(surface) => {
                surface.set_natural_size(natural);
                true
            }
            None => false,
        }
    }

    pub fn selection_mode(&self) -> bool {
        self.selection_mode
    }

    /// Switch selection mode; turning it off drops any drag in progress
    /// but leaves stored regions alone
    pub fn set_selection_mode(&mut self, enabled: bool) {
        self.selection_mode = enabled;
        if !enabled {
            for surface in &mut self.surfaces {
                surface.cancel_drag();
            }
        }
        log::debug!("Selection mode {}", if enabled { "on" } else { "off" });
    }

    /// Pointer pressed over an image
    pub fn pointer_down(&mut self, image_index: usize, screen_x: f32, screen_y: f32) -> DragEvent {
        if !self.selection_mode {
            return DragEvent::Ignored;
        }
        let Some(surface) = self.surfaces.get_mut(image_index) else {
            return DragEvent::Ignored;
        };
        let Some(capture) = self.router.acquire(image_index) else {
            log::debug!("Pointer already captured, ignoring press on image {image_index}");
            return DragEvent::Ignored;
        };
        surface.pointer_down(screen_x, screen_y, capture)
    }

    /// Pointer moved anywhere in the window
    pub fn pointer_move(&mut self, screen_x: f32, screen_y: f32) -> DragEvent {
        match self.captured_surface() {
            Some(surface) => surface.pointer_move(screen_x, screen_y),
            None => DragEvent::Ignored,
        }
    }

    /// Pointer released anywhere in the window
    ///
    /// A committed drag is stored right away and returned as a
    /// [`Submission`] for the caller to send.
    pub fn pointer_up(&mut self) -> Option<Submission> {
        let image_index = self.router.owner()?;
        let event = self.surfaces.get_mut(image_index)?.pointer_up();
        match event {
            DragEvent::Committed(region) => self.commit(image_index, region),
            _ => None,
        }
    }

    fn captured_surface(&mut self) -> Option<&mut SelectionSurface> {
        let image_index = self.router.owner()?;
        self.surfaces.get_mut(image_index)
    }

    /// Store a region and prepare its submission
    ///
    /// Regions not larger than the selection threshold, or outside the
    /// image's natural bounds, are rejected before reaching the store.
    pub fn commit(&mut self, image_index: usize, region: Region) -> Option<Submission> {
        if !region.exceeds(MIN_REGION_SIZE) {
            log::debug!("Rejecting region below selection threshold: {region:?}");
            return None;
        }
        let surface = self.surfaces.get(image_index)?;
        let natural = surface.handle().natural;
        if !natural.is_empty() && !region.fits_within(natural) {
            log::warn!(
                "Rejecting region {region:?} outside {}x{} image {image_index}",
                natural.width,
                natural.height
            );
            return None;
        }
        let image_source = surface.source().to_string();

        let region_index = self.store.append(image_index, region)?;
        log::info!("Region {region_index} committed on image {image_index}: {region:?}");
        if let Some(hook) = self.on_region_committed.as_mut() {
            hook(image_index, region);
        }

        Some(Submission {
            generation: self.generation,
            image_index,
            region_index,
            image_source,
            region,
        })
    }

    /// Apply a resolved submission to the region that spawned it
    ///
    /// Returns false if the result was dropped (stale image list or
    /// missing entry). Failures keep the region with empty text.
    pub fn apply(&mut self, outcome: SubmissionOutcome) -> bool {
        let SubmissionOutcome { submission, result } = outcome;
        let Submission {
            generation,
            image_index,
            region_index,
            ..
        } = submission;

        if generation != self.generation {
            log::warn!(
                "Dropping result for region {region_index} of image {image_index}: image list changed"
            );
            return false;
        }

        match result {
            Ok(result) => {
                let applied = self.store.set_text(image_index, region_index, result.joined());
                if applied {
                    self.transcript.push(&result);
                }
                applied
            }
            Err(err) => {
                log::error!("Recognition failed for region {region_index} of image {image_index}: {err:#}");
                self.store
                    .mark_failed(image_index, region_index, format!("{err:#}"))
            }
        }
    }

    pub fn store(&self) -> &RegionStore {
        &self.store
    }

    pub fn regions(&self, image_index: usize) -> &[AnnotatedRegion] {
        self.store.regions(image_index)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Drop the backend's translation context and, once it confirms, the
    /// local transcript; on failure the transcript is kept
    pub async fn clear_translation_context(&mut self, submitter: &HttpSubmitter) -> anyhow::Result<()> {
        submitter.clear_cache().await?;
        self.clear_transcript();
        Ok(())
    }

    /// Live drag rectangle for an image, relative to the image element
    pub fn preview(&self, image_index: usize) -> Option<ScreenRect> {
        self.surfaces.get(image_index)?.preview()
    }

    /// Overlay boxes for an image's stored regions
    pub fn overlays(&self, image_index: usize) -> Vec<OverlayBox<'_>> {
        let Some(surface) = self.surfaces.get(image_index) else {
            return Vec::new();
        };
        let active_region = self
            .active_detail
            .filter(|detail| detail.image_index == image_index)
            .map(|detail| detail.region_index);
        surface.overlays(self.store.regions(image_index), active_region)
    }

    pub fn active_detail(&self) -> Option<ActiveDetail> {
        self.active_detail
    }

    /// Toggle the detail popup of a stored region
    pub fn click_overlay(&mut self, image_index: usize, region_index: usize) -> Option<ActiveDetail> {
        if self.store.get(image_index, region_index).is_some() {
            self.active_detail = ActiveDetail::toggle(
                self.active_detail,
                ActiveDetail::new(image_index, region_index),
            );
        }
        self.active_detail
    }

    /// Toggle the popup of whichever region is under a viewport point
    pub fn click_at(&mut self, image_index: usize, screen_x: f32, screen_y: f32) -> Option<ActiveDetail> {
        let hit = self
            .surfaces
            .get(image_index)
            .and_then(|surface| surface.hit_test(self.store.regions(image_index), screen_x, screen_y));
        match hit {
            Some(region_index) => self.click_overlay(image_index, region_index),
            None => self.active_detail,
        }
    }

    pub fn close_detail(&mut self) {
        self.active_detail = None;
    }

    /// The open detail popup, placed to stay inside the viewport
    pub fn detail_popup(&self, viewport_width: f32, viewport_height: f32) -> Option<DetailPopup<'_>> {
        let detail = self.active_detail?;
        let surface = self.surfaces.get(detail.image_index)?;
        let stored = self.store.get(detail.image_index, detail.region_index)?;
        let anchor = surface.region_in_viewport(stored);
        Some(DetailPopup {
            image_index: detail.image_index,
            region_index: detail.region_index,
            text: &stored.text,
            status: &stored.status,
            placement: place_popup(anchor, self.popup_style, viewport_width, viewport_height),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;

    use anyhow::anyhow;
    use futures::StreamExt;
    use futures::stream::FuturesUnordered;
    use tokio::sync::oneshot;

    use super::*;
    use crate::domain::RegionStatus;
    use crate::surface::PopupSide;

    /// Submitter whose responses are released by the test, keyed by region x
    #[derive(Default)]
    struct ManualSubmitter {
        pending: RefCell<HashMap<u32, oneshot::Receiver<anyhow::Result<RecognitionResult>>>>,
    }

    impl ManualSubmitter {
        fn expect(&self, x: u32) -> oneshot::Sender<anyhow::Result<RecognitionResult>> {
            let (tx, rx) = oneshot::channel();
            self.pending.borrow_mut().insert(x, rx);
            tx
        }
    }

    impl RegionSubmitter for ManualSubmitter {
        async fn submit(&self, _image_source: &str, region: Region) -> anyhow::Result<RecognitionResult> {
            let rx = self
                .pending
                .borrow_mut()
                .remove(&region.x)
                .ok_or_else(|| anyhow!("unexpected region {region:?}"))?;
            rx.await.map_err(|_| anyhow!("response dropped"))?
        }
    }

    /// 1000x2000 page rendered at half scale, two of them
    fn session() -> Session {
        let mut session = Session::default();
        session.set_images(["/uploads/p1.png", "/uploads/p2.png"]);
        for index in 0..2 {
            session.set_natural_size(index, Size::new(1000, 2000));
            session.update_layout(index, BoundingBox::new(0.0, 0.0, 500.0, 1000.0));
        }
        session.set_selection_mode(true);
        session
    }

    fn drag(session: &mut Session, image: usize, from: (f32, f32), to: (f32, f32)) -> Option<Submission> {
        session.pointer_down(image, from.0, from.1);
        session.pointer_move(to.0, to.1);
        session.pointer_up()
    }

    #[test]
    fn test_drag_commits_and_stores_immediately() {
        let mut session = session();
        let committed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&committed);
        session.set_commit_hook(move |image, region| sink.borrow_mut().push((image, region)));

        let submission = drag(&mut session, 0, (100.0, 100.0), (160.0, 140.0)).unwrap();
        let expected = Region::new(200, 200, 120, 80);
        assert_eq!(submission.region, expected);
        assert_eq!(submission.image_index, 0);
        assert_eq!(submission.region_index, 0);
        assert_eq!(submission.image_source, "/uploads/p1.png");

        let stored = &session.regions(0)[0];
        assert_eq!(stored.region, expected);
        assert_eq!(stored.text, "");
        assert_eq!(stored.status, RegionStatus::Pending);
        assert_eq!(*committed.borrow(), vec![(0, expected)]);
        // The transcript only grows once a result is applied
        assert!(session.transcript().is_empty());
    }

    #[test]
    fn test_click_without_drag_stores_nothing() {
        let mut session = session();
        assert!(drag(&mut session, 0, (100.0, 100.0), (100.0, 100.0)).is_none());
        assert!(session.regions(0).is_empty());
    }

    #[test]
    fn test_pointer_ignored_when_selection_mode_off() {
        let mut session = session();
        session.set_selection_mode(false);
        assert_eq!(session.pointer_down(0, 10.0, 10.0), DragEvent::Ignored);
        assert!(session.pointer_up().is_none());
        assert!(session.regions(0).is_empty());
    }

    #[test]
    fn test_selection_mode_off_mid_drag_discards_gesture() {
        let mut session = session();
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        session.set_commit_hook(move |_, _| *counter.borrow_mut() += 1);

        session.pointer_down(1, 10.0, 10.0);
        session.pointer_move(200.0, 200.0);
        assert!(session.preview(1).is_some());

        session.set_selection_mode(false);
        assert!(session.preview(1).is_none());
        assert!(session.pointer_up().is_none());

        session.set_selection_mode(true);
        assert!(session.pointer_up().is_none());
        assert!(session.regions(1).is_empty());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_selection_mode_off_keeps_stored_regions() {
        let mut session = session();
        drag(&mut session, 0, (10.0, 10.0), (100.0, 100.0)).unwrap();
        session.set_selection_mode(false);
        assert_eq!(session.regions(0).len(), 1);
    }

    #[test]
    fn test_global_moves_route_to_dragging_image_only() {
        let mut session = session();
        session.pointer_down(0, 10.0, 10.0);
        // a press on the other image while dragging is ignored
        assert_eq!(session.pointer_down(1, 50.0, 50.0), DragEvent::Ignored);
        // moving far outside the page still updates, clamped to the edge
        session.pointer_move(-300.0, 5000.0);
        let submission = session.pointer_up().unwrap();
        assert_eq!(submission.image_index, 0);
        assert_eq!(submission.region, Region::new(0, 20, 20, 1980));
        assert!(session.regions(1).is_empty());
    }

    #[test]
    fn test_commit_rejects_invalid_regions() {
        let mut session = session();
        assert!(session.commit(0, Region::new(0, 0, 5, 50)).is_none());
        assert!(session.commit(0, Region::new(990, 0, 20, 50)).is_none());
        assert!(session.commit(7, Region::new(0, 0, 50, 50)).is_none());
        assert!(session.regions(0).is_empty());
    }

    #[tokio::test]
    async fn test_out_of_order_results_reach_their_own_regions() {
        let mut session = session();
        let submitter = ManualSubmitter::default();

        let first = session.commit(0, Region::new(10, 10, 50, 50)).unwrap();
        let second = session.commit(0, Region::new(300, 300, 50, 50)).unwrap();
        let release_first = submitter.expect(10);
        let release_second = submitter.expect(300);

        let mut in_flight = FuturesUnordered::new();
        in_flight.push(first.send(&submitter));
        in_flight.push(second.send(&submitter));

        release_second
            .send(Ok(RecognitionResult::new("二番", "Second")))
            .unwrap();
        let outcome = in_flight.next().await.unwrap();
        assert_eq!(outcome.submission.region_index, 1);
        assert!(session.apply(outcome));
        assert_eq!(session.regions(0)[0].text, "");
        assert_eq!(session.regions(0)[1].text, "二番\nSecond");

        release_first
            .send(Ok(RecognitionResult::new("こんにちは", "Hello")))
            .unwrap();
        let outcome = in_flight.next().await.unwrap();
        assert!(session.apply(outcome));
        assert_eq!(session.regions(0)[0].text, "こんにちは\nHello");
        assert_eq!(session.regions(0)[1].text, "二番\nSecond");

        assert_eq!(session.transcript().raw(), "二番\nこんにちは\n");
        assert_eq!(session.transcript().translated(), "Second\nHello\n");
    }

    #[tokio::test]
    async fn test_submissions_across_images_are_independent() {
        let mut session = session();
        let submitter = ManualSubmitter::default();

        let on_first = session.commit(0, Region::new(10, 10, 50, 50)).unwrap();
        let on_second = session.commit(1, Region::new(20, 20, 50, 50)).unwrap();
        assert_eq!(on_second.region_index, 0);

        submitter
            .expect(20)
            .send(Ok(RecognitionResult::new("b", "B")))
            .unwrap();
        submitter
            .expect(10)
            .send(Ok(RecognitionResult::new("a", "A")))
            .unwrap();

        assert!(session.apply(on_second.send(&submitter).await));
        assert!(session.apply(on_first.send(&submitter).await));
        assert_eq!(session.regions(0)[0].text, "a\nA");
        assert_eq!(session.regions(1)[0].text, "b\nB");
    }

    #[tokio::test]
    async fn test_rejected_submission_keeps_region() {
        let mut session = session();
        let submitter = ManualSubmitter::default();
        let submission = session.commit(0, Region::new(10, 10, 50, 50)).unwrap();
        submitter
            .expect(10)
            .send(Err(anyhow!("connection refused")))
            .unwrap();

        let outcome = submission.send(&submitter).await;
        assert!(session.apply(outcome));

        let stored = &session.regions(0)[0];
        assert_eq!(stored.text, "");
        assert_eq!(stored.status, RegionStatus::Failed("connection refused".to_string()));
        assert!(session.transcript().is_empty());
        assert!(session.overlays(0)[0].has_error());
    }

    #[test]
    fn test_results_after_image_change_are_dropped() {
        let mut session = session();
        let submission = session.commit(0, Region::new(10, 10, 50, 50)).unwrap();
        session.set_images(["/uploads/other.png"]);
        session.set_natural_size(0, Size::new(1000, 2000));
        session.commit(0, Region::new(10, 10, 50, 50)).unwrap();

        let outcome = SubmissionOutcome {
            submission,
            result: Ok(RecognitionResult::new("old", "Old")),
        };
        assert!(!session.apply(outcome));
        assert_eq!(session.regions(0)[0].text, "");
    }

    #[test]
    fn test_image_change_releases_active_drag() {
        let mut session = session();
        session.pointer_down(0, 10.0, 10.0);
        session.set_images(["/uploads/a.png"]);
        session.set_natural_size(0, Size::new(100, 100));
        session.update_layout(0, BoundingBox::new(0.0, 0.0, 100.0, 100.0));
        assert!(matches!(session.pointer_down(0, 1.0, 1.0), DragEvent::Started(_)));
    }

    #[test]
    fn test_overlay_click_toggles_single_detail() {
        let mut session = session();
        drag(&mut session, 0, (10.0, 10.0), (100.0, 100.0)).unwrap();
        drag(&mut session, 1, (10.0, 10.0), (100.0, 100.0)).unwrap();

        assert_eq!(session.click_overlay(0, 0), Some(ActiveDetail::new(0, 0)));
        assert!(session.overlays(0)[0].active);
        assert!(!session.overlays(1)[0].active);

        assert_eq!(session.click_overlay(1, 0), Some(ActiveDetail::new(1, 0)));
        assert!(!session.overlays(0)[0].active);

        assert_eq!(session.click_overlay(1, 0), None);
        // unknown region leaves the state alone
        assert_eq!(session.click_overlay(1, 5), None);
    }

    #[test]
    fn test_click_at_hit_tests_overlays() {
        let mut session = session();
        drag(&mut session, 0, (10.0, 10.0), (100.0, 100.0)).unwrap();
        assert_eq!(session.click_at(0, 50.0, 50.0), Some(ActiveDetail::new(0, 0)));
        assert_eq!(session.click_at(0, 400.0, 400.0), Some(ActiveDetail::new(0, 0)));
        assert_eq!(session.click_at(0, 50.0, 50.0), None);
    }

    #[test]
    fn test_detail_popup_stays_on_screen() {
        let mut session = session();
        drag(&mut session, 0, (400.0, 100.0), (490.0, 150.0)).unwrap();
        session.click_overlay(0, 0);

        let popup = session.detail_popup(600.0, 800.0).unwrap();
        assert_eq!(popup.region_index, 0);
        assert_eq!(popup.placement.side, PopupSide::Left);
        assert!(popup.placement.left >= 0.0);
        assert!(popup.placement.left + 320.0 <= 600.0);

        session.close_detail();
        assert!(session.detail_popup(600.0, 800.0).is_none());
    }
}
