// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Viewport update operations.
//!
//! Every change to the viewport part of [`UiState`](crate::UiState) goes
//! through one of these constructors, so numeric input is sanitized in one
//! place and the history flag is always set deliberately. User-driven
//! operations are recorded in history; the automatic recompute is not.

use std::cell::Cell;
use std::rc::Rc;

use understory_fit::{
    FrameSource, Height, Viewport, ZoomLimits, compute, compute_preserving_zoom, measure,
};

use crate::store::SetUi;

/// Replaces the viewport width and height, keeping the current zoom.
#[must_use]
pub fn set_viewport_preset(width: f64, height: Height) -> SetUi {
    SetUi::update(move |ui| {
        let mut next = ui.clone();
        let zoom = next.viewports.current.zoom;
        next.viewports.current = Viewport::new(width, height).with_zoom(zoom);
        next
    })
}

/// Replaces the zoom only, clamped into `limits`.
#[must_use]
pub fn set_zoom(zoom: f64, limits: ZoomLimits) -> SetUi {
    let zoom = limits.clamp(zoom);
    SetUi::update(move |ui| {
        let mut next = ui.clone();
        next.viewports.current.zoom = zoom;
        next
    })
}

/// Switches between auto and fixed height, keeping width and zoom.
#[must_use]
pub fn set_height_mode(height: Height) -> SetUi {
    let height = height.sanitized();
    SetUi::update(move |ui| {
        let mut next = ui.clone();
        next.viewports.current.height = height;
        next
    })
}

/// Locally held results of the last fit: not part of the UI state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Fit {
    pub(crate) root_height: f64,
    pub(crate) auto_zoom: f64,
}

impl Default for Fit {
    fn default() -> Self {
        Self {
            root_height: 0.0,
            auto_zoom: 1.0,
        }
    }
}

/// Re-fits the current viewport to the frame as measured when the update applies.
///
/// Writes the applied zoom into the UI state and publishes root height and
/// auto zoom through `fit`. Leaves the state untouched if the frame is not
/// ready at apply time.
///
/// `manual_zoom` is kept instead of the auto zoom only while the state still
/// holds exactly that zoom, so an undone manual zoom is fitted again.
pub(crate) fn recompute_auto<F>(frame: F, fit: Rc<Cell<Fit>>, manual_zoom: Option<f64>) -> SetUi
where
    F: FrameSource + 'static,
{
    SetUi::update(move |ui| {
        let frame_box = measure(Some(&frame));
        if !frame_box.is_ready() {
            log::trace!("frame not measurable at apply time; keeping viewport");
            return ui.clone();
        }
        let current = &ui.viewports.current;
        let preserve_zoom = manual_zoom.is_some_and(|z| z.to_bits() == current.zoom.to_bits());
        let config = if preserve_zoom {
            compute_preserving_zoom(current, frame_box)
        } else {
            compute(current, frame_box)
        };
        fit.set(Fit {
            root_height: config.root_height,
            auto_zoom: config.auto_zoom,
        });
        let mut next = ui.clone();
        next.viewports.current.zoom = config.zoom;
        next
    })
    .without_history()
}
