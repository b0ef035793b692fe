// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use crate::measure::FrameBox;
use crate::viewport::Viewport;

/// Zoom and height derived from a requested viewport and a measured frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomConfig {
    /// The zoom that should be applied now.
    pub zoom: f64,
    /// The zoom that makes the viewport width exactly fill the frame width.
    ///
    /// Always reported, so controls can offer "fit" as a choice even when it is
    /// not applied.
    pub auto_zoom: f64,
    /// Height to allocate for the content surface before zoom is applied.
    pub root_height: f64,
}

/// Computes the zoom configuration for `viewport` inside `frame`.
///
/// - In [`Height::Auto`](crate::Height::Auto) mode the auto zoom is applied and the root height is
///   chosen so that `root_height * zoom` equals the frame height.
/// - In [`Height::Fixed`](crate::Height::Fixed) mode the viewport's explicit zoom and height are kept.
///
/// This is a pure function of its inputs.
///
/// ```rust
/// use understory_fit::{FrameBox, Height, Viewport, compute};
///
/// let viewport = Viewport::new(1000.0, Height::Auto);
/// let config = compute(&viewport, FrameBox::new(500.0, 800.0));
/// assert_eq!(config.auto_zoom, 0.5);
/// assert_eq!(config.zoom, 0.5);
/// assert_eq!(config.root_height, 1600.0);
/// ```
#[must_use]
pub fn compute(viewport: &Viewport, frame: FrameBox) -> ZoomConfig {
    let auto_zoom = auto_zoom(viewport.width, frame.width);
    match viewport.height.fixed_px() {
        Some(px) => ZoomConfig {
            zoom: positive_or_one(viewport.zoom),
            auto_zoom,
            root_height: px,
        },
        None => {
            // Without a frame width the ratio means nothing; keep what was set.
            let zoom = if frame.width > 0.0 {
                auto_zoom
            } else {
                positive_or_one(viewport.zoom)
            };
            ZoomConfig {
                zoom,
                auto_zoom,
                root_height: auto_root_height(frame.height, zoom),
            }
        }
    }
}

/// Like [`compute`], but keeps the viewport's zoom in [`Height::Auto`](crate::Height::Auto) mode.
///
/// The root height is still derived from the frame and the kept zoom, so the
/// surface fills the available vertical space.
#[must_use]
pub fn compute_preserving_zoom(viewport: &Viewport, frame: FrameBox) -> ZoomConfig {
    let mut config = compute(viewport, frame);
    if viewport.height.fixed_px().is_none() {
        config.zoom = positive_or_one(viewport.zoom);
        config.root_height = auto_root_height(frame.height, config.zoom);
    }
    config
}

/// Returns the zoom that fits `viewport_width` into `frame_width`.
///
/// Falls back to `1.0` whenever either width is not positive.
#[must_use]
pub fn auto_zoom(viewport_width: f64, frame_width: f64) -> f64 {
    if viewport_width > 0.0 && frame_width > 0.0 {
        positive_or_one(frame_width / viewport_width)
    } else {
        1.0
    }
}

/// Returns the unscaled height that fills `frame_height` at `zoom`.
#[must_use]
pub fn auto_root_height(frame_height: f64, zoom: f64) -> f64 {
    let frame_height = if frame_height.is_finite() {
        frame_height.max(0.0)
    } else {
        0.0
    };
    frame_height / positive_or_one(zoom)
}

/// Allowed range for explicit zoom values.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "(f64, f64)", into = "(f64, f64)")
)]
pub struct ZoomLimits {
    min: f64,
    max: f64,
}

impl ZoomLimits {
    /// Default limits: `[0.01, 10.0]`.
    pub const DEFAULT: Self = Self {
        min: 0.01,
        max: 10.0,
    };

    /// Creates zoom limits.
    ///
    /// The bounds are normalized so that `min <= max`. Non-positive or
    /// non-finite bounds fall back to the matching default bound.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        let min = if min.is_finite() && min > 0.0 {
            min
        } else {
            Self::DEFAULT.min
        };
        let max = if max.is_finite() && max > 0.0 {
            max
        } else {
            Self::DEFAULT.max
        };
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Returns the minimum zoom.
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Returns the maximum zoom.
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamps `zoom` into the range.
    ///
    /// NaN, infinite and non-positive inputs are treated as `1.0` first.
    #[must_use]
    pub fn clamp(&self, zoom: f64) -> f64 {
        positive_or_one(zoom).clamp(self.min, self.max)
    }
}

impl From<(f64, f64)> for ZoomLimits {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<ZoomLimits> for (f64, f64) {
    fn from(limits: ZoomLimits) -> Self {
        (limits.min, limits.max)
    }
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn positive_or_one(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 1.0 }
}
