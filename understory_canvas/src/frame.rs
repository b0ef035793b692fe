// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::cell::Cell;
use std::rc::Rc;

use understory_fit::{BoxModel, FrameSource};

/// Cloneable handle to a frame element's box model.
///
/// The host writes the latest layout with [`SharedFrame::set`]; every clone
/// (including the ones captured by pending state updates) measures the same
/// element. A fresh handle is detached until the first `set`.
#[derive(Clone, Debug, Default)]
pub struct SharedFrame {
    model: Rc<Cell<Option<BoxModel>>>,
}

impl SharedFrame {
    /// Creates a detached handle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle already attached with `model`.
    #[must_use]
    pub fn attached(model: BoxModel) -> Self {
        let frame = Self::new();
        frame.set(model);
        frame
    }

    /// Records the element's current layout.
    pub fn set(&self, model: BoxModel) {
        self.model.set(Some(model));
    }

    /// Marks the element as no longer attached to layout.
    pub fn detach(&self) {
        self.model.set(None);
    }

    /// Returns `true` while the element is attached.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.model.get().is_some()
    }
}

impl FrameSource for SharedFrame {
    fn box_model(&self) -> Option<BoxModel> {
        self.model.get()
    }
}
