// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Fit: viewport-fit primitives for embedded content surfaces.
//!
//! A content surface (a page preview, a document, a canvas) is rendered at a
//! requested width inside a frame whose size is decided by the surrounding
//! layout. This crate computes how that surface should be scaled and sized so
//! that it fits, and provides the small pieces of state needed to keep the
//! fit current:
//!
//! - [`measure`] reads the content box of a frame through the [`FrameSource`]
//!   seam, returning [`FrameBox::ZERO`] while the frame is not attached.
//! - [`compute`] derives a [`ZoomConfig`] (applied zoom, auto zoom, root
//!   height) from a [`Viewport`] and a [`FrameBox`].
//! - [`TransitionController`] decides whether the next size change animates.
//! - [`ResizeSignal`] / [`ResizeWatcher`] deliver coalesced ambient layout
//!   changes.
//!
//! It does **not** own any UI state, rendering backend, or event loop.
//! Orchestration (when to recompute, how results reach application state)
//! lives in `understory_canvas`.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_fit::{BoxModel, Height, Viewport, compute, measure};
//!
//! // A 500x800 frame showing a 1000px wide page.
//! let frame = BoxModel::new(Rect::new(0.0, 0.0, 500.0, 800.0));
//! let viewport = Viewport::new(1000.0, Height::Auto);
//!
//! let config = compute(&viewport, measure(Some(&frame)));
//! assert_eq!(config.zoom, 0.5);
//! // The unscaled root is twice as tall as the frame, so once scaled it
//! // fills the frame exactly.
//! assert_eq!(config.root_height, 1600.0);
//! ```
//!
//! ## Height modes
//!
//! [`Height::Auto`] applies the auto zoom and derives the root height from
//! the frame. [`Height::Fixed`] keeps the explicit zoom and height; the auto
//! zoom is still reported so controls can offer it.
//!
//! ## Degenerate input
//!
//! Nothing here panics on odd numbers. Zero or negative widths, unattached
//! frames, NaN and infinities all fold into safe defaults (zoom `1.0`, zero
//! dimensions) so that a bad measurement only ever produces a cosmetic glitch
//! that the next measurement corrects.
//!
//! ## Features
//!
//! - `std` (default) / `libm`: forwarded to Kurbo.
//! - `serde`: `Serialize`/`Deserialize` for [`Viewport`], [`Height`],
//!   [`ZoomLimits`] and [`TransitionSpec`]. [`Height`] uses the number-or-`"auto"`
//!   form.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod measure;
mod resize;
mod transition;
mod viewport;
mod zoom;

pub use measure::{BoxModel, FrameBox, FrameSource, measure};
pub use resize::{ResizeSignal, ResizeWatcher};
pub use transition::{Easing, Transition, TransitionController, TransitionProperty, TransitionSpec};
pub use viewport::{Height, ParseHeightError, Viewport, sanitize_dimension};
pub use zoom::{
    ZoomConfig, ZoomLimits, auto_root_height, auto_zoom, compute, compute_preserving_zoom,
};
