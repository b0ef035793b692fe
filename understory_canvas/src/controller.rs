// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use understory_fit::{
    FrameSource, Height, ResizeSignal, ResizeWatcher, TransitionController, TransitionSpec,
    Viewport, ZoomConfig, ZoomLimits, auto_root_height, measure,
};

use crate::store::Dispatcher;
use crate::ui::{UiState, UnknownPresetError, ViewportPreset};
use crate::update::{self, Fit};

/// How automatic recomputes treat a zoom the user picked explicitly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum AutoZoomPolicy {
    /// In auto height mode every recompute re-applies the auto zoom, replacing
    /// a manual zoom on the next resize or sidebar toggle.
    #[default]
    AlwaysFit,
    /// After an explicit zoom, recomputes keep it and only re-derive the root
    /// height. The next preset or height-mode change returns to fitting, and so
    /// does undoing the zoom.
    PreserveManual,
}

/// Canvas configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default, rename_all = "camelCase")
)]
pub struct CanvasOptions {
    /// Re-fit after the user picks a viewport preset.
    pub zoom_on_viewport_change: bool,
    /// Whether recomputes override an explicit zoom.
    pub auto_zoom_policy: AutoZoomPolicy,
    /// Range for explicit zoom.
    pub zoom_limits: ZoomLimits,
    /// Timing for animated changes.
    pub transition: TransitionSpec,
}

impl Default for CanvasOptions {
    fn default() -> Self {
        Self {
            zoom_on_viewport_change: true,
            auto_zoom_policy: AutoZoomPolicy::default(),
            zoom_limits: ZoomLimits::default(),
            transition: TransitionSpec::default(),
        }
    }
}

/// Events that re-fit the canvas to its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecomputeTrigger {
    /// The frame was mounted.
    Mount,
    /// The left sidebar was shown or hidden.
    LeftSideBarToggled,
    /// The right sidebar was shown or hidden.
    RightSideBarToggled,
    /// The ambient layout surface changed size.
    Resize,
}

/// Style of the content root, for the render layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RootStyle {
    /// Unscaled width.
    pub width: f64,
    /// Unscaled height.
    pub height: f64,
    /// Scale applied as a transform.
    pub zoom: f64,
    /// Transition to use for this paint, if any.
    pub transition: Option<TransitionSpec>,
}

/// What the viewport controls need to render.
#[derive(Clone, Copy, Debug)]
pub struct ControlsModel<'a> {
    /// The fit-to-frame zoom, offered as a choice.
    pub auto_zoom: f64,
    /// The viewport currently applied.
    pub current: Viewport,
    /// Presets to offer.
    pub presets: &'a [ViewportPreset],
    /// Range for the zoom control.
    pub zoom_limits: ZoomLimits,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Sidebars {
    left: bool,
    right: bool,
}

impl Sidebars {
    fn of(ui: &UiState) -> Self {
        Self {
            left: ui.left_side_bar_visible,
            right: ui.right_side_bar_visible,
        }
    }
}

/// Keeps a content surface fitted to its frame.
///
/// The controller owns the frame handle, the resize watcher, the transition
/// flag and the locally derived root height and auto zoom. Application state
/// is reached only through a [`Dispatcher`].
///
/// Recomputation happens on mount, when either sidebar is toggled, and when
/// the ambient [`ResizeSignal`] fires. Hosts call [`CanvasController::sync`]
/// after state changes and layout passes; user input goes through
/// [`CanvasController::set_viewport`], [`CanvasController::set_zoom`] and
/// [`CanvasController::set_height_mode`].
///
/// ```rust
/// use kurbo::{Rect, Size};
/// use understory_canvas::{
///     CanvasController, CanvasOptions, Dispatcher, SharedFrame, UiState, UiStore,
/// };
/// use understory_fit::{BoxModel, ResizeSignal};
///
/// let body = ResizeSignal::new();
/// let frame = SharedFrame::attached(BoxModel::new(Rect::new(0.0, 0.0, 180.0, 640.0)));
/// let mut store = UiStore::new(UiState::default());
/// let mut canvas = CanvasController::new(CanvasOptions::default());
///
/// canvas.mount(frame.clone(), &body, &mut store);
/// // The default 360px viewport is scaled to the 180px frame.
/// assert_eq!(canvas.zoom_config(store.ui()).zoom, 0.5);
/// assert_eq!(canvas.root_height(), 1280.0);
///
/// // The window grows; the host updates the frame layout and notifies.
/// frame.set(BoxModel::new(Rect::new(0.0, 0.0, 360.0, 640.0)));
/// body.notify(Size::new(1200.0, 640.0));
/// canvas.sync(&mut store);
/// assert_eq!(canvas.zoom_config(store.ui()).zoom, 1.0);
/// ```
#[derive(Debug)]
pub struct CanvasController<F> {
    frame: Option<F>,
    options: CanvasOptions,
    transition: TransitionController,
    fit: Rc<Cell<Fit>>,
    watcher: Option<ResizeWatcher>,
    sidebars: Option<Sidebars>,
    manual_zoom: Option<f64>,
}

impl<F> CanvasController<F> {
    /// Creates an unmounted controller.
    #[must_use]
    pub fn new(options: CanvasOptions) -> Self {
        Self {
            frame: None,
            options,
            transition: TransitionController::new(options.transition),
            fit: Rc::new(Cell::new(Fit::default())),
            watcher: None,
            sidebars: None,
            manual_zoom: None,
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &CanvasOptions {
        &self.options
    }

    /// Returns `true` between [`CanvasController::mount`] and
    /// [`CanvasController::unmount`].
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.frame.is_some()
    }

    /// Returns the transition state machine.
    #[must_use]
    pub fn transition(&self) -> &TransitionController {
        &self.transition
    }

    /// Returns the unscaled height allocated to the content root.
    #[must_use]
    pub fn root_height(&self) -> f64 {
        self.fit.get().root_height
    }

    /// Returns the last computed fit-to-frame zoom.
    #[must_use]
    pub fn auto_zoom(&self) -> f64 {
        self.fit.get().auto_zoom
    }

    /// Returns the configuration currently in effect for `ui`.
    ///
    /// A fixed height in `ui` is reported as the root height even before the
    /// next [`CanvasController::sync`].
    #[must_use]
    pub fn zoom_config(&self, ui: &UiState) -> ZoomConfig {
        let fit = self.fit.get();
        ZoomConfig {
            zoom: ui.viewports.current.zoom,
            auto_zoom: fit.auto_zoom,
            root_height: self.root_height_for(ui),
        }
    }

    /// Returns the style for the content root.
    #[must_use]
    pub fn root_style(&self, ui: &UiState) -> RootStyle {
        let current = &ui.viewports.current;
        RootStyle {
            width: current.width,
            height: self.root_height_for(ui),
            zoom: current.zoom,
            transition: self.transition.current(),
        }
    }

    /// Returns the controls model, or `None` when controls are hidden.
    #[must_use]
    pub fn controls<'a>(&self, ui: &'a UiState) -> Option<ControlsModel<'a>> {
        ui.viewports.controls_visible.then(|| ControlsModel {
            auto_zoom: self.auto_zoom(),
            current: ui.viewports.current,
            presets: &ui.viewports.options,
            zoom_limits: self.options.zoom_limits,
        })
    }

    /// Stops observing resizes and releases the frame.
    pub fn unmount(&mut self) {
        if self.frame.take().is_some() {
            log::debug!("canvas unmounted");
        }
        self.watcher = None;
        self.sidebars = None;
    }

    fn root_height_for(&self, ui: &UiState) -> f64 {
        ui.viewports
            .current
            .height
            .fixed_px()
            .unwrap_or_else(|| self.root_height())
    }

    fn set_root_height(&self, root_height: f64) {
        let mut fit = self.fit.get();
        fit.root_height = root_height;
        self.fit.set(fit);
    }
}

impl<F> CanvasController<F>
where
    F: FrameSource + Clone + 'static,
{
    /// Attaches the frame, starts observing `signal`, and fits once.
    ///
    /// Mounting again first releases the previous frame and watcher.
    pub fn mount<D: Dispatcher + ?Sized>(&mut self, frame: F, signal: &ResizeSignal, host: &mut D) {
        self.unmount();
        self.frame = Some(frame);
        self.watcher = Some(signal.observe());
        self.sidebars = Some(Sidebars::of(host.ui()));
        self.trigger(RecomputeTrigger::Mount, host);
    }

    /// Reacts to state and layout changes since the last call.
    ///
    /// - A sidebar visibility change or a pending resize re-fits once.
    /// - The root height is brought in line with the applied viewport,
    ///   however it changed (zoom control, undo/redo, a replaced state): a
    ///   fixed height is used as is, an auto height is re-derived from the
    ///   measured frame and the current zoom.
    pub fn sync<D: Dispatcher + ?Sized>(&mut self, host: &mut D) {
        if self.frame.is_none() {
            return;
        }
        let now = Sidebars::of(host.ui());
        let before = self.sidebars.unwrap_or(now);
        self.sidebars = Some(now);

        let mut trigger = if before.left != now.left {
            Some(RecomputeTrigger::LeftSideBarToggled)
        } else if before.right != now.right {
            Some(RecomputeTrigger::RightSideBarToggled)
        } else {
            None
        };
        if let Some(size) = self.watcher.as_mut().and_then(ResizeWatcher::take) {
            log::trace!("ambient surface resized to {}x{}", size.width, size.height);
            trigger = trigger.or(Some(RecomputeTrigger::Resize));
        }
        if let Some(trigger) = trigger {
            self.trigger(trigger, host);
        }

        let current = host.ui().viewports.current;
        match current.height.fixed_px() {
            Some(px) => self.set_root_height(px),
            None => self.constrain_height(current.zoom),
        }
    }

    /// Re-fits after an ambient resize reported outside the [`ResizeSignal`].
    pub fn handle_resize<D: Dispatcher + ?Sized>(&mut self, host: &mut D) {
        self.trigger(RecomputeTrigger::Resize, host);
    }

    /// Applies a user-chosen viewport size, keeping the current zoom.
    ///
    /// Animated and recorded in history. With
    /// [`CanvasOptions::zoom_on_viewport_change`] the canvas is then re-fitted.
    pub fn set_viewport<D: Dispatcher + ?Sized>(
        &mut self,
        width: f64,
        height: Height,
        host: &mut D,
    ) {
        let height = height.sanitized();
        log::debug!("viewport changed to {width}x{height}");
        self.transition.request_animated();
        self.manual_zoom = None;
        host.dispatch(update::set_viewport_preset(width, height));

        if let Some(px) = height.fixed_px() {
            self.set_root_height(px);
        }
        if self.options.zoom_on_viewport_change {
            self.recompute(host);
        } else if height.fixed_px().is_none() {
            self.constrain_height(host.ui().viewports.current.zoom);
        }
    }

    /// Applies the preset labelled `label` from the configured options.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPresetError`] and changes nothing when no preset
    /// carries `label`.
    pub fn select_preset<D: Dispatcher + ?Sized>(
        &mut self,
        label: &str,
        host: &mut D,
    ) -> Result<(), UnknownPresetError> {
        let preset = host.ui().viewports.preset(label)?;
        let (width, height) = (preset.width, preset.height);
        self.set_viewport(width, height, host);
        Ok(())
    }

    /// Applies a user-chosen zoom, clamped into the configured limits.
    ///
    /// Animated and recorded in history. A fixed root height is left alone;
    /// an auto root height follows the new zoom.
    pub fn set_zoom<D: Dispatcher + ?Sized>(&mut self, zoom: f64, host: &mut D) {
        let limits = self.options.zoom_limits;
        let zoom = limits.clamp(zoom);
        log::debug!("zoom changed to {zoom}");
        self.transition.request_animated();
        self.manual_zoom = Some(zoom);
        host.dispatch(update::set_zoom(zoom, limits));

        if host.ui().viewports.current.height.fixed_px().is_none() {
            self.constrain_height(zoom);
        }
    }

    /// Switches between auto and fixed height.
    ///
    /// A fixed height becomes the root height directly and keeps the zoom;
    /// auto height re-fits.
    pub fn set_height_mode<D: Dispatcher + ?Sized>(&mut self, height: Height, host: &mut D) {
        let height = height.sanitized();
        log::debug!("height mode changed to {height}");
        self.transition.request_animated();
        self.manual_zoom = None;
        host.dispatch(update::set_height_mode(height));

        match height.fixed_px() {
            Some(px) => self.set_root_height(px),
            None => self.recompute(host),
        }
    }

    fn trigger<D: Dispatcher + ?Sized>(&mut self, trigger: RecomputeTrigger, host: &mut D) {
        self.transition.request_instant();
        log::debug!("re-fitting canvas: {trigger:?}");
        self.recompute(host);
    }

    fn recompute<D: Dispatcher + ?Sized>(&self, host: &mut D) {
        let Some(frame) = self.frame.as_ref() else {
            return;
        };
        if !measure(Some(frame)).is_ready() {
            log::trace!("frame not measurable; skipping re-fit");
            return;
        }
        let manual_zoom = self
            .manual_zoom
            .filter(|_| self.options.auto_zoom_policy == AutoZoomPolicy::PreserveManual);
        host.dispatch(update::recompute_auto(
            frame.clone(),
            Rc::clone(&self.fit),
            manual_zoom,
        ));
    }

    fn constrain_height(&self, zoom: f64) {
        let frame_box = measure(self.frame.as_ref());
        if frame_box.is_ready() {
            self.set_root_height(auto_root_height(frame_box.height, zoom));
        }
    }
}

#[cfg(test)]
mod tests {
    use kurbo::{Rect, Size};
    use understory_fit::{BoxModel, Height, ResizeSignal, Transition};

    use super::{AutoZoomPolicy, CanvasController, CanvasOptions};
    use crate::frame::SharedFrame;
    use crate::store::{Dispatcher, UiStore};
    use crate::ui::UiState;

    fn frame(width: f64, height: f64) -> SharedFrame {
        SharedFrame::attached(BoxModel::new(Rect::new(0.0, 0.0, width, height)))
    }

    fn store_with_width(width: f64) -> UiStore {
        let mut ui = UiState::default();
        ui.viewports.current.width = width;
        UiStore::new(ui)
    }

    #[test]
    fn unmount_releases_watcher() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::new(CanvasOptions::default());
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);
        assert!(canvas.is_mounted());
        assert_eq!(signal.observer_count(), 1);

        canvas.mount(frame(500.0, 800.0), &signal, &mut store);
        assert_eq!(signal.observer_count(), 1);

        canvas.unmount();
        assert!(!canvas.is_mounted());
        assert_eq!(signal.observer_count(), 0);
    }

    #[test]
    fn sync_before_mount_is_a_no_op() {
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::<SharedFrame>::new(CanvasOptions::default());
        canvas.sync(&mut store);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn manual_zoom_in_auto_mode_follows_frame_height() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::new(CanvasOptions::default());
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);

        canvas.set_zoom(2.0, &mut store);
        assert_eq!(store.ui().viewports.current.zoom, 2.0);
        assert_eq!(canvas.root_height(), 400.0);
        assert_eq!(canvas.transition().state(), Transition::Animated);
    }

    #[test]
    fn always_fit_replaces_manual_zoom_on_resize() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::new(CanvasOptions::default());
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);
        canvas.set_zoom(2.0, &mut store);

        signal.notify(Size::new(1.0, 1.0));
        canvas.sync(&mut store);
        assert_eq!(store.ui().viewports.current.zoom, 0.5);
        assert_eq!(canvas.root_height(), 1600.0);
    }

    #[test]
    fn preserve_manual_keeps_zoom_on_resize() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let options = CanvasOptions {
            auto_zoom_policy: AutoZoomPolicy::PreserveManual,
            ..CanvasOptions::default()
        };
        let mut canvas = CanvasController::new(options);
        let frame = frame(500.0, 800.0);
        canvas.mount(frame.clone(), &signal, &mut store);
        canvas.set_zoom(2.0, &mut store);

        frame.set(BoxModel::new(Rect::new(0.0, 0.0, 500.0, 600.0)));
        signal.notify(Size::new(1.0, 1.0));
        canvas.sync(&mut store);
        assert_eq!(store.ui().viewports.current.zoom, 2.0);
        assert_eq!(canvas.root_height(), 300.0);
        assert_eq!(canvas.auto_zoom(), 0.5);

        // A preset change returns to fitting.
        canvas.set_viewport(1000.0, Height::Auto, &mut store);
        assert_eq!(store.ui().viewports.current.zoom, 0.5);
    }

    #[test]
    fn preset_without_refit_keeps_zoom_and_fills_height() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let options = CanvasOptions {
            zoom_on_viewport_change: false,
            ..CanvasOptions::default()
        };
        let mut canvas = CanvasController::new(options);
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);

        canvas.set_viewport(250.0, Height::Auto, &mut store);
        assert_eq!(store.ui().viewports.current.width, 250.0);
        assert_eq!(store.ui().viewports.current.zoom, 0.5);
        assert_eq!(canvas.root_height(), 1600.0);

        canvas.set_viewport(250.0, Height::Fixed(300.0), &mut store);
        assert_eq!(canvas.root_height(), 300.0);
    }

    #[test]
    fn height_mode_switch() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::new(CanvasOptions::default());
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);

        canvas.set_height_mode(Height::Fixed(450.0), &mut store);
        assert_eq!(store.ui().viewports.current.height, Height::Fixed(450.0));
        assert_eq!(canvas.root_height(), 450.0);
        assert_eq!(store.ui().viewports.current.zoom, 0.5);

        canvas.set_height_mode(Height::Auto, &mut store);
        assert_eq!(store.ui().viewports.current.height, Height::Auto);
        assert_eq!(canvas.root_height(), 1600.0);
    }

    #[test]
    fn controls_model_follows_visibility() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::new(CanvasOptions::default());
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);

        let controls = canvas.controls(store.ui()).unwrap();
        assert_eq!(controls.auto_zoom, 0.5);
        assert_eq!(controls.presets.len(), 3);

        let mut hidden = store.ui().clone();
        hidden.viewports.controls_visible = false;
        assert!(canvas.controls(&hidden).is_none());
    }

    #[test]
    fn root_style_carries_transition_only_after_user_change() {
        let signal = ResizeSignal::new();
        let mut store = store_with_width(1000.0);
        let mut canvas = CanvasController::new(CanvasOptions::default());
        canvas.mount(frame(500.0, 800.0), &signal, &mut store);

        let style = canvas.root_style(store.ui());
        assert_eq!(style.width, 1000.0);
        assert_eq!(style.height, 1600.0);
        assert_eq!(style.zoom, 0.5);
        assert!(style.transition.is_none());

        canvas.set_zoom(1.0, &mut store);
        assert!(canvas.root_style(store.ui()).transition.is_some());
    }
}
