// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch protocol between the canvas and the application state.
//!
//! The canvas never owns [`UiState`]. It reads the latest state through
//! [`Dispatcher::ui`] and requests changes with [`Dispatcher::dispatch`]. A
//! request is either a full replacement or an updater closure applied to the
//! state current at apply time, plus a flag saying whether the change belongs
//! in undo history. Hosts may apply requests immediately or batch them;
//! [`UiStore`] implements both.

use std::collections::VecDeque;
use std::fmt;

use crate::ui::UiState;

/// Updater applied to the state current at apply time.
pub type UiUpdater = Box<dyn FnOnce(&UiState) -> UiState>;

/// New UI state, or how to derive it.
pub enum UiUpdate {
    /// Replace the state wholesale.
    Replace(UiState),
    /// Derive the next state from the state current at apply time.
    Update(UiUpdater),
}

impl fmt::Debug for UiUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace(ui) => f.debug_tuple("Replace").field(ui).finish(),
            Self::Update(_) => f.write_str("Update(..)"),
        }
    }
}

/// A request to change the UI state.
#[derive(Debug)]
pub struct SetUi {
    /// The change.
    pub ui: UiUpdate,
    /// Whether the change is an undo/redo boundary.
    pub record_history: bool,
}

impl SetUi {
    /// A replacement recorded in history.
    #[must_use]
    pub fn replace(ui: UiState) -> Self {
        Self {
            ui: UiUpdate::Replace(ui),
            record_history: true,
        }
    }

    /// An updater recorded in history.
    #[must_use]
    pub fn update(f: impl FnOnce(&UiState) -> UiState + 'static) -> Self {
        Self {
            ui: UiUpdate::Update(Box::new(f)),
            record_history: true,
        }
    }

    /// Returns this request with history recording turned off.
    #[must_use]
    pub fn without_history(mut self) -> Self {
        self.record_history = false;
        self
    }

    /// Resolves the request against `current`.
    #[must_use]
    pub fn apply(self, current: &UiState) -> UiState {
        match self.ui {
            UiUpdate::Replace(ui) => ui,
            UiUpdate::Update(f) => f(current),
        }
    }
}

/// Access to application UI state for the canvas.
pub trait Dispatcher {
    /// Returns the latest applied state.
    fn ui(&self) -> &UiState;

    /// Requests a change. It may be applied now or later.
    fn dispatch(&mut self, action: SetUi);
}

/// When a [`UiStore`] applies dispatched requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ApplyMode {
    /// Apply inside [`Dispatcher::dispatch`].
    #[default]
    Immediate,
    /// Queue until [`UiStore::flush`].
    Batched,
}

/// In-memory UI state with undo/redo history.
///
/// ```rust
/// use understory_canvas::{Dispatcher, SetUi, UiState, UiStore};
///
/// let mut store = UiStore::new(UiState::default());
/// store.dispatch(SetUi::update(|ui| {
///     let mut next = ui.clone();
///     next.left_side_bar_visible = true;
///     next
/// }));
/// assert!(store.ui().left_side_bar_visible);
///
/// assert!(store.undo());
/// assert!(!store.ui().left_side_bar_visible);
/// ```
#[derive(Debug, Default)]
pub struct UiStore {
    state: UiState,
    mode: ApplyMode,
    pending: VecDeque<SetUi>,
    undo: Vec<UiState>,
    redo: Vec<UiState>,
    revision: u64,
}

impl UiStore {
    /// Creates a store applying requests immediately.
    #[must_use]
    pub fn new(state: UiState) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    /// Returns this store with the given apply mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ApplyMode) -> Self {
        self.mode = mode;
        self
    }

    /// Returns the apply mode.
    #[must_use]
    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Changes the apply mode. Switching to [`ApplyMode::Immediate`] flushes.
    pub fn set_mode(&mut self, mode: ApplyMode) {
        self.mode = mode;
        if mode == ApplyMode::Immediate {
            self.flush();
        }
    }

    /// Applies all queued requests in dispatch order.
    ///
    /// Returns how many requests were applied.
    pub fn flush(&mut self) -> usize {
        let mut applied = 0;
        while let Some(action) = self.pending.pop_front() {
            self.apply(action);
            applied += 1;
        }
        applied
    }

    /// Returns the number of queued requests.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Counts applied requests that changed the state.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of entries available to [`UiStore::undo`].
    #[must_use]
    pub fn history_len(&self) -> usize {
        self.undo.len()
    }

    /// Returns `true` if [`UiStore::undo`] would do something.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Returns `true` if [`UiStore::redo`] would do something.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Restores the state before the last recorded change.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.undo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state, previous);
        self.redo.push(current);
        self.revision += 1;
        true
    }

    /// Re-applies the last undone change.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.redo.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state, next);
        self.undo.push(current);
        self.revision += 1;
        true
    }

    fn apply(&mut self, action: SetUi) {
        let record = action.record_history;
        let next = action.apply(&self.state);
        if next == self.state {
            return;
        }
        let previous = std::mem::replace(&mut self.state, next);
        if record {
            self.undo.push(previous);
            self.redo.clear();
        }
        self.revision += 1;
    }
}

impl Dispatcher for UiStore {
    fn ui(&self) -> &UiState {
        &self.state
    }

    fn dispatch(&mut self, action: SetUi) {
        match self.mode {
            ApplyMode::Immediate => self.apply(action),
            ApplyMode::Batched => self.pending.push_back(action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplyMode, Dispatcher, SetUi, UiStore};
    use crate::ui::UiState;

    fn toggle_left() -> SetUi {
        SetUi::update(|ui| {
            let mut next = ui.clone();
            next.left_side_bar_visible = !next.left_side_bar_visible;
            next
        })
    }

    #[test]
    fn history_only_records_flagged_changes() {
        let mut store = UiStore::new(UiState::default());
        store.dispatch(toggle_left().without_history());
        assert!(store.ui().left_side_bar_visible);
        assert_eq!(store.history_len(), 0);

        store.dispatch(toggle_left());
        assert!(!store.ui().left_side_bar_visible);
        assert_eq!(store.history_len(), 1);
        assert_eq!(store.revision(), 2);
    }

    #[test]
    fn unchanged_results_are_not_recorded() {
        let mut store = UiStore::new(UiState::default());
        store.dispatch(SetUi::replace(UiState::default()));
        assert_eq!(store.history_len(), 0);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn undo_redo_round_trip() {
        let mut store = UiStore::new(UiState::default());
        store.dispatch(toggle_left());
        assert!(store.undo());
        assert!(!store.ui().left_side_bar_visible);
        assert!(store.can_redo());
        assert!(store.redo());
        assert!(store.ui().left_side_bar_visible);
        assert!(!store.redo());

        store.undo();
        store.dispatch(SetUi::replace(UiState {
            right_side_bar_visible: true,
            ..UiState::default()
        }));
        assert!(!store.can_redo());
    }

    #[test]
    fn batched_updaters_see_state_at_apply_time() {
        let mut store = UiStore::new(UiState::default()).with_mode(ApplyMode::Batched);
        store.dispatch(toggle_left());
        store.dispatch(toggle_left());
        store.dispatch(toggle_left());
        assert!(!store.ui().left_side_bar_visible);
        assert_eq!(store.pending(), 3);

        assert_eq!(store.flush(), 3);
        assert!(store.ui().left_side_bar_visible);
        assert_eq!(store.pending(), 0);
    }

    #[test]
    fn switching_to_immediate_flushes() {
        let mut store = UiStore::new(UiState::default()).with_mode(ApplyMode::Batched);
        store.dispatch(toggle_left());
        store.set_mode(ApplyMode::Immediate);
        assert!(store.ui().left_side_bar_visible);
        assert_eq!(store.mode(), ApplyMode::Immediate);
    }
}
