// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::{Insets, Rect, Size};

/// Box-model description of a container element.
///
/// Only the parts needed for content-box measurement are tracked: the border
/// box and the border/padding insets inside it. Margins sit outside the border
/// box and never contribute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoxModel {
    /// Border box in the host's layout coordinates.
    pub border_box: Rect,
    /// Border widths on each edge.
    pub border: Insets,
    /// Padding on each edge.
    pub padding: Insets,
}

impl BoxModel {
    /// Creates a box model with no border and no padding.
    #[must_use]
    pub fn new(border_box: Rect) -> Self {
        Self {
            border_box,
            border: Insets::ZERO,
            padding: Insets::ZERO,
        }
    }

    /// Returns this box model with the given border insets.
    #[must_use]
    pub fn with_border(mut self, border: Insets) -> Self {
        self.border = border;
        self
    }

    /// Returns this box model with the given padding insets.
    #[must_use]
    pub fn with_padding(mut self, padding: Insets) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the content box: the border box shrunk by border and padding.
    ///
    /// When the insets exceed the border box the content box collapses to zero
    /// size at the inner edge instead of turning inside out.
    #[must_use]
    pub fn content_box(&self) -> Rect {
        let b = self.border_box.abs();
        let x0 = b.x0 + self.border.x0 + self.padding.x0;
        let y0 = b.y0 + self.border.y0 + self.padding.y0;
        let x1 = b.x1 - self.border.x1 - self.padding.x1;
        let y1 = b.y1 - self.border.y1 - self.padding.y1;
        Rect::new(x0, y0, x1.max(x0), y1.max(y0))
    }
}

/// A measurable container handle.
///
/// Implemented by whatever the host uses to refer to the frame element. The
/// handle may exist before the element is attached to layout; in that case
/// [`FrameSource::box_model`] returns `None`.
pub trait FrameSource {
    /// Returns the current box model, or `None` when the element is not attached.
    fn box_model(&self) -> Option<BoxModel>;
}

impl FrameSource for BoxModel {
    fn box_model(&self) -> Option<BoxModel> {
        Some(*self)
    }
}

impl<T: FrameSource + ?Sized> FrameSource for &T {
    fn box_model(&self) -> Option<BoxModel> {
        (**self).box_model()
    }
}

/// Measured content-box dimensions of the frame, in pixels.
///
/// A `FrameBox` is a snapshot: it is produced by [`measure`] and is only
/// meaningful for the computation that requested it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameBox {
    /// Content-box width.
    pub width: f64,
    /// Content-box height.
    pub height: f64,
}

impl FrameBox {
    /// The measurement of a frame that is not attached.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Creates a frame box, mapping negative or non-finite dimensions to zero.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Returns `true` when both dimensions are positive.
    ///
    /// Zero dimensions mean the frame is unmounted or invisible, and callers
    /// should skip work that depends on the measurement.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Returns the dimensions as a [`Size`].
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl From<Size> for FrameBox {
    fn from(size: Size) -> Self {
        Self::new(size.width, size.height)
    }
}

/// Measures the content box of `frame`.
///
/// Returns [`FrameBox::ZERO`] when there is no handle yet or the handle is not
/// attached; this never fails.
///
/// ```rust
/// use kurbo::{Insets, Rect};
/// use understory_fit::{BoxModel, FrameBox, measure};
///
/// let frame = BoxModel::new(Rect::new(0.0, 0.0, 520.0, 820.0))
///     .with_padding(Insets::uniform(10.0));
/// assert_eq!(measure(Some(&frame)), FrameBox::new(500.0, 800.0));
/// assert_eq!(measure::<BoxModel>(None), FrameBox::ZERO);
/// ```
#[must_use]
pub fn measure<F: FrameSource + ?Sized>(frame: Option<&F>) -> FrameBox {
    match frame.and_then(F::box_model) {
        Some(model) => FrameBox::from(model.content_box().size()),
        None => FrameBox::ZERO,
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}
