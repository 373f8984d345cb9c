//! Labeling session state
//!
//! Owns the loaded screenshot, how it is laid out on the canvas, the live
//! selection, the current crop and the saved elements. UI callbacks share it
//! through `Rc<RefCell<Session>>`.

use chrono::{Local, NaiveDateTime};
use image::RgbaImage;
use log::{debug, info};
use std::path::Path;

use super::config::Config;
use crate::capture::{AdbScreenSource, CommandMatcher, ScreenSource, TemplateMatcher};
use crate::error::{LabelerError, Result};
use crate::selection::{
    crop, CanvasPoint, DisplayTransform, SelectionGesture, SelectionMachine, SourceBox,
};
use crate::store::{
    identifier_for, validate_name, ElementRecord, ElementStore, NameTranslator,
    PlaceholderTranslator, StorageLayout,
};

pub struct Session {
    config: Config,
    source: Option<RgbaImage>,
    transform: DisplayTransform,
    selection: SelectionMachine,
    cropped: Option<RgbaImage>,
    store: ElementStore,
    screen: Box<dyn ScreenSource>,
    matcher: Box<dyn TemplateMatcher>,
    translator: Box<dyn NameTranslator>,
    busy: bool,
}

impl Session {
    /// Session wired to adb, the external matcher and the placeholder
    /// identifier
    pub fn new(config: Config) -> Self {
        let screen = AdbScreenSource::from_config(&config);
        let matcher = CommandMatcher::new(config.matcher_program.clone());
        let translator = PlaceholderTranslator::new(config.placeholder_identifier.clone());
        Self::with_collaborators(
            config,
            Box::new(screen),
            Box::new(matcher),
            Box::new(translator),
        )
    }

    pub fn with_collaborators(
        config: Config,
        screen: Box<dyn ScreenSource>,
        matcher: Box<dyn TemplateMatcher>,
        translator: Box<dyn NameTranslator>,
    ) -> Self {
        let store = ElementStore::new(StorageLayout::new(config.input_dir()));
        let selection = SelectionMachine::new(config.min_selection_side);
        Self {
            config,
            source: None,
            transform: DisplayTransform::default(),
            selection,
            cropped: None,
            store,
            screen,
            matcher,
            translator,
            busy: false,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn source(&self) -> Option<&RgbaImage> {
        self.source.as_ref()
    }

    pub fn transform(&self) -> &DisplayTransform {
        &self.transform
    }

    pub fn cropped(&self) -> Option<&RgbaImage> {
        self.cropped.as_ref()
    }

    pub fn elements(&self) -> &[ElementRecord] {
        self.store.records()
    }

    /// Rectangle to draw on the canvas
    pub fn visual_selection(&self) -> Option<SelectionGesture> {
        self.selection.visual()
    }

    #[cfg(test)]
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark a blocking capture as in flight. Fails when one already is.
    pub fn try_begin_busy(&mut self) -> Result<()> {
        if self.busy {
            return Err(LabelerError::Busy);
        }
        self.busy = true;
        Ok(())
    }

    pub fn end_busy(&mut self) {
        self.busy = false;
    }

    /// Replace the screenshot and refit it to the canvas
    pub fn load_source(&mut self, image: RgbaImage) {
        self.transform = DisplayTransform::fit(
            self.config.canvas_width,
            self.config.canvas_height,
            image.width(),
            image.height(),
        );
        debug!(
            "Loaded {}x{} source, scale {:.4}",
            image.width(),
            image.height(),
            self.transform.scale_factor()
        );
        self.source = Some(image);
        self.selection.reset();
        self.cropped = None;
    }

    pub fn load_source_file(&mut self, path: &Path) -> Result<()> {
        let image = image::open(path)
            .map_err(|e| LabelerError::image(path, e))?
            .to_rgba8();
        self.load_source(image);
        Ok(())
    }

    /// Take a fresh device screenshot and show it
    pub fn capture(&mut self) -> Result<()> {
        let path = self.screen.capture()?;
        self.load_source_file(&path)?;
        info!("Screenshot loaded from {:?}", path);
        Ok(())
    }

    pub fn press(&mut self, x: f64, y: f64) {
        if self.source.is_none() {
            return;
        }
        let point = self.transform.clamp(CanvasPoint::new(x, y));
        self.selection.press(point);
        self.cropped = None;
    }

    pub fn drag(&mut self, x: f64, y: f64) {
        let point = self.transform.clamp(CanvasPoint::new(x, y));
        self.selection.drag(point);
    }

    /// Finish the drag. Returns the new crop when the selection was kept,
    /// a rejected selection leaves no crop behind.
    pub fn release(&mut self, x: f64, y: f64) -> Option<&RgbaImage> {
        let point = self.transform.clamp(CanvasPoint::new(x, y));
        let source_box = self
            .selection
            .release(point)
            .and_then(|gesture| self.transform.source_box(&gesture));

        self.cropped = match (source_box, self.source.as_ref()) {
            (Some(source_box), Some(source)) => Some(crop(source, &source_box)),
            _ => None,
        };
        self.cropped.as_ref()
    }

    /// Source box of the finalized selection
    pub fn selected_box(&self) -> Option<SourceBox> {
        let gesture = self.selection.finalized()?;
        self.transform.source_box(&gesture)
    }

    pub fn save(&mut self, display_name: &str) -> Result<&ElementRecord> {
        self.save_at(display_name, &Local::now().naive_local())
    }

    /// Save the current selection under `display_name`, timestamped `at`.
    /// The crop is recomputed from the stored gesture.
    pub fn save_at(&mut self, display_name: &str, at: &NaiveDateTime) -> Result<&ElementRecord> {
        let display_name = validate_name(display_name)?;
        let source = self.source.as_ref().ok_or(LabelerError::NoSource)?;
        let source_box = self.selected_box().ok_or(LabelerError::NoSelection)?;

        let identifier = identifier_for(
            self.translator.as_ref(),
            display_name,
            &self.config.placeholder_identifier,
        );
        self.store
            .save(display_name, &identifier, source, &source_box, at)
    }

    pub fn delete(&mut self, index: usize) -> Result<ElementRecord> {
        self.store.delete(index)
    }

    /// Capture a fresh screenshot and look for the element in it. On a match
    /// the matcher's result image replaces the current source.
    pub fn verify(&mut self, index: usize) -> Result<()> {
        let template = self.store.get(index)?.absolute_path.clone();
        let screenshot = self.screen.capture()?;

        let outcome = self.matcher.find(&screenshot, &template)?;
        let Some(region_image) = outcome.region_image else {
            info!("No match for {:?} ({})", template, outcome.status);
            return Err(LabelerError::NotFound);
        };

        info!("Matched {:?} ({})", template, outcome.status);
        self.load_source_file(&region_image)
    }

    pub fn export_snippet(&self, index: usize) -> Result<String> {
        self.store.export_snippet(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::matcher::MatchOutcome;
    use chrono::NaiveDate;
    use image::Rgba;
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    struct FakeScreen {
        path: PathBuf,
        calls: Rc<Cell<u32>>,
    }

    impl ScreenSource for FakeScreen {
        fn capture(&self) -> Result<PathBuf> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.path.clone())
        }
    }

    struct BrokenScreen;

    impl ScreenSource for BrokenScreen {
        fn capture(&self) -> Result<PathBuf> {
            Err(LabelerError::external("adb", "no devices/emulators found"))
        }
    }

    /// Matches only when the template still exists
    struct FakeMatcher {
        result: PathBuf,
    }

    impl TemplateMatcher for FakeMatcher {
        fn find(&self, _screenshot: &Path, template: &Path) -> Result<MatchOutcome> {
            if template.exists() {
                Ok(MatchOutcome {
                    status: "0.98".to_string(),
                    region_image: Some(self.result.clone()),
                })
            } else {
                Ok(MatchOutcome::not_found("0.0"))
            }
        }
    }

    struct Fixture {
        dir: tempfile::TempDir,
        session: Session,
        captures: Rc<Cell<u32>>,
    }

    fn phone_screenshot() -> RgbaImage {
        RgbaImage::from_fn(1080, 2400, |x, y| {
            Rgba([(x % 251) as u8, (y % 241) as u8, ((x + y) % 239) as u8, 255])
        })
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let screenshot = dir.path().join("screenshot.png");
        phone_screenshot().save(&screenshot).unwrap();
        let result = dir.path().join("result.png");
        RgbaImage::from_pixel(200, 100, Rgba([1, 2, 3, 255]))
            .save(&result)
            .unwrap();

        let config = Config {
            data_dir: dir.path().join("data"),
            ..Config::default()
        };
        let captures = Rc::new(Cell::new(0));
        let session = Session::with_collaborators(
            config,
            Box::new(FakeScreen {
                path: screenshot,
                calls: captures.clone(),
            }),
            Box::new(FakeMatcher { result }),
            Box::new(PlaceholderTranslator::new("button")),
        );

        Fixture {
            dir,
            session,
            captures,
        }
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 20)
            .unwrap()
            .and_hms_opt(8, 0, 1)
            .unwrap()
    }

    fn select(session: &mut Session, from: (f64, f64), to: (f64, f64)) -> bool {
        session.press(from.0, from.1);
        session.drag((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0);
        session.release(to.0, to.1).is_some()
    }

    #[test]
    fn test_capture_fits_canvas() {
        let mut f = fixture();
        f.session.capture().unwrap();

        assert_eq!(f.captures.get(), 1);
        assert!((f.session.transform().scale_factor() - 1000.0 / 2400.0).abs() < 1e-12);
        assert_eq!(f.session.transform().display_size(), (450, 1000));
    }

    #[test]
    fn test_release_produces_crop_in_source_space() {
        let mut f = fixture();
        f.session.capture().unwrap();

        assert!(select(&mut f.session, (50.0, 50.0), (150.0, 150.0)));
        let b = f.session.selected_box().unwrap();
        assert_eq!(b.as_tuple(), (120, 120, 360, 360));
        assert_eq!(f.session.cropped().unwrap().dimensions(), (240, 240));
    }

    #[test]
    fn test_save_recomputes_identical_crop() {
        let mut f = fixture();
        f.session.capture().unwrap();
        select(&mut f.session, (50.0, 50.0), (150.0, 150.0));
        let at_release = f.session.cropped().unwrap().clone();

        let record = f.session.save_at("登录按钮", &at()).unwrap();
        assert_eq!(record.image, at_release);

        let on_disk = image::open(&record.absolute_path).unwrap().to_rgba8();
        assert_eq!(on_disk, at_release);
        assert_eq!(
            record.relative_path,
            PathBuf::from("element_image/2025/01/080001_button.png")
        );
        assert!(record
            .absolute_path
            .starts_with(f.dir.path().join("data").join("input")));
    }

    #[test]
    fn test_small_selection_never_saved() {
        let mut f = fixture();
        f.session.capture().unwrap();

        assert!(!select(&mut f.session, (50.0, 50.0), (300.0, 65.0)));
        assert!(f.session.cropped().is_none());
        assert!(f.session.visual_selection().is_none());

        let result = f.session.save_at("tiny", &at());
        assert!(matches!(result, Err(LabelerError::NoSelection)));
        assert!(f.session.elements().is_empty());
    }

    #[test]
    fn test_rejected_selection_discards_previous_one() {
        let mut f = fixture();
        f.session.capture().unwrap();
        assert!(select(&mut f.session, (50.0, 50.0), (150.0, 150.0)));
        assert!(f.session.cropped().is_some());
        assert!(!select(&mut f.session, (10.0, 10.0), (15.0, 15.0)));

        assert!(f.session.cropped().is_none());
        assert!(f.session.selected_box().is_none());
        assert!(matches!(
            f.session.save_at("stale", &at()),
            Err(LabelerError::NoSelection)
        ));
    }

    #[test]
    fn test_new_press_clears_previous_crop() {
        let mut f = fixture();
        f.session.capture().unwrap();
        assert!(select(&mut f.session, (50.0, 50.0), (150.0, 150.0)));

        f.session.press(10.0, 10.0);
        assert!(f.session.cropped().is_none());
        assert!(f.session.release(12.0, 12.0).is_none());
        assert!(f.session.cropped().is_none());
    }

    #[test]
    fn test_blank_name_rejected_without_side_effects() {
        let mut f = fixture();
        f.session.capture().unwrap();
        select(&mut f.session, (50.0, 50.0), (150.0, 150.0));

        for name in ["", "   "] {
            assert!(matches!(
                f.session.save_at(name, &at()),
                Err(LabelerError::Validation)
            ));
        }
        assert!(f.session.elements().is_empty());
        assert!(!f.dir.path().join("data").join("input").exists());
    }

    #[test]
    fn test_save_without_source() {
        let mut f = fixture();
        assert!(matches!(
            f.session.save_at("name", &at()),
            Err(LabelerError::NoSource)
        ));
    }

    #[test]
    fn test_drag_outside_canvas_is_clamped() {
        let mut f = fixture();
        f.session.capture().unwrap();

        assert!(select(&mut f.session, (400.0, 900.0), (800.0, 1400.0)));
        let b = f.session.selected_box().unwrap();
        assert_eq!((b.right, b.bottom), (1080, 2400));
    }

    #[test]
    fn test_verify_match_replaces_source() {
        let mut f = fixture();
        f.session.capture().unwrap();
        select(&mut f.session, (50.0, 50.0), (150.0, 150.0));
        f.session.save_at("ok", &at()).unwrap();

        f.session.verify(0).unwrap();

        assert_eq!(f.captures.get(), 2);
        assert_eq!(f.session.source().unwrap().dimensions(), (200, 100));
        assert!((f.session.transform().scale_factor() - 470.0 / 200.0).abs() < 1e-12);
        assert!(f.session.visual_selection().is_none());
        assert!(f.session.cropped().is_none());
    }

    #[test]
    fn test_verify_deleted_file_reports_not_found() {
        let mut f = fixture();
        f.session.capture().unwrap();
        select(&mut f.session, (50.0, 50.0), (150.0, 150.0));
        let path = f.session.save_at("ok", &at()).unwrap().absolute_path.clone();
        std::fs::remove_file(&path).unwrap();

        let before = f.session.source().unwrap().dimensions();
        assert!(matches!(f.session.verify(0), Err(LabelerError::NotFound)));
        assert_eq!(f.session.source().unwrap().dimensions(), before);
        assert!(f.session.selected_box().is_some());
    }

    #[test]
    fn test_capture_failure_surfaces_external_error() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_path_buf(),
            ..Config::default()
        };
        let mut session = Session::with_collaborators(
            config,
            Box::new(BrokenScreen),
            Box::new(CommandMatcher::new("unused")),
            Box::new(PlaceholderTranslator::new("button")),
        );

        assert!(matches!(
            session.capture(),
            Err(LabelerError::ExternalTool { .. })
        ));
        assert!(session.source().is_none());
    }

    #[test]
    fn test_delete_and_snippet() {
        let mut f = fixture();
        f.session.capture().unwrap();
        select(&mut f.session, (50.0, 50.0), (150.0, 150.0));
        f.session.save_at("ok", &at()).unwrap();

        let snippet = f.session.export_snippet(0).unwrap();
        assert!(snippet.starts_with("button = click_image("));

        let removed = f.session.delete(0).unwrap();
        assert!(!removed.absolute_path.exists());
        assert!(f.session.elements().is_empty());
        assert!(f.session.delete(0).is_err());
    }

    #[test]
    fn test_busy_flag() {
        let mut f = fixture();
        f.session.try_begin_busy().unwrap();
        assert!(f.session.is_busy());
        assert!(matches!(f.session.try_begin_busy(), Err(LabelerError::Busy)));
        f.session.end_busy();
        assert!(f.session.try_begin_busy().is_ok());
    }
}
