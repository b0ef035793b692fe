// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Canvas: keeps an embedded content surface fitted to its frame.
//!
//! The surface is rendered at a requested [`Viewport`] width inside a frame
//! sized by the surrounding layout. [`CanvasController`] re-fits it when it
//! is mounted, when either sidebar is toggled, and when the ambient layout
//! surface is resized, and applies the user's own viewport, zoom and height
//! choices.
//!
//! The controller does not own application state. It reads and writes the
//! [`UiState`] slice through a [`Dispatcher`], sending [`SetUi`] requests that
//! carry either a replacement or an updater closure plus a history flag.
//! User choices are recorded in undo history; automatic re-fits are not.
//! [`UiStore`] is a ready-made dispatcher with undo/redo and optional batching.
//!
//! Size changes the user asked for animate; automatic ones apply instantly.
//! [`CanvasController::root_style`] reports which, along with the width,
//! height and zoom the render layer should apply to the content root.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_canvas::{
//!     CanvasController, CanvasOptions, Dispatcher, Height, SharedFrame, UiState, UiStore,
//! };
//! use understory_fit::{BoxModel, ResizeSignal};
//!
//! let body = ResizeSignal::new();
//! let frame = SharedFrame::attached(BoxModel::new(Rect::new(0.0, 0.0, 640.0, 480.0)));
//! let mut store = UiStore::new(UiState::default());
//! let mut canvas = CanvasController::new(CanvasOptions::default());
//! canvas.mount(frame, &body, &mut store);
//!
//! // The user picks a fixed 1280x720 viewport.
//! canvas.set_viewport(1280.0, Height::Fixed(720.0), &mut store);
//! let style = canvas.root_style(store.ui());
//! assert_eq!(style.width, 1280.0);
//! assert_eq!(style.height, 720.0);
//! assert!(style.transition.is_some());
//!
//! // It is one undo step.
//! assert!(store.undo());
//! assert_eq!(store.ui().viewports.current.width, 360.0);
//! ```
//!
//! ## Features
//!
//! - `serde` (default): `Serialize`/`Deserialize` for [`UiState`] (camelCase
//!   field names) and [`CanvasOptions`].

mod controller;
mod frame;
mod store;
mod ui;
mod update;

pub use controller::{
    AutoZoomPolicy, CanvasController, CanvasOptions, ControlsModel, RecomputeTrigger, RootStyle,
};
pub use frame::SharedFrame;
pub use store::{ApplyMode, Dispatcher, SetUi, UiStore, UiUpdate, UiUpdater};
pub use ui::{UiState, UnknownPresetError, ViewportPreset, ViewportState};
pub use update::{set_height_mode, set_viewport_preset, set_zoom};

pub use understory_fit::{Height, Transition, TransitionSpec, Viewport, ZoomConfig, ZoomLimits};
