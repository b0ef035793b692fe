// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The slice of application UI state the canvas reads and writes.

use std::fmt;

use understory_fit::{Height, Viewport};

/// A named viewport choice offered by the viewport controls.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewportPreset {
    /// Label shown in the controls and used for lookup.
    pub label: String,
    /// Content width in pixels.
    pub width: f64,
    /// Content height.
    #[cfg_attr(feature = "serde", serde(default))]
    pub height: Height,
}

impl ViewportPreset {
    /// Creates a preset.
    #[must_use]
    pub fn new(label: impl Into<String>, width: f64, height: Height) -> Self {
        Self {
            label: label.into(),
            width,
            height,
        }
    }

    /// The default small / medium / large presets, all with auto height.
    #[must_use]
    pub fn defaults() -> Vec<Self> {
        vec![
            Self::new("Small", 360.0, Height::Auto),
            Self::new("Medium", 768.0, Height::Auto),
            Self::new("Large", 1280.0, Height::Auto),
        ]
    }
}

/// Viewport part of the UI state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct ViewportState {
    /// The viewport currently applied to the canvas.
    pub current: Viewport,
    /// Whether viewport controls are shown.
    pub controls_visible: bool,
    /// Presets offered by the controls.
    pub options: Vec<ViewportPreset>,
}

impl ViewportState {
    /// Looks up a preset by label.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownPresetError`] when no option carries `label`.
    pub fn preset(&self, label: &str) -> Result<&ViewportPreset, UnknownPresetError> {
        self.options
            .iter()
            .find(|p| p.label == label)
            .ok_or_else(|| UnknownPresetError {
                label: label.to_owned(),
            })
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        let options = ViewportPreset::defaults();
        let current = options
            .first()
            .map(|p| Viewport::new(p.width, p.height))
            .unwrap_or_default();
        Self {
            current,
            controls_visible: true,
            options,
        }
    }
}

/// The application UI state, as far as the canvas is concerned.
///
/// Hosts usually keep a larger state object; they either embed this type or
/// mirror these fields through their [`Dispatcher`](crate::Dispatcher)
/// implementation.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct UiState {
    /// Viewport selection and presets.
    pub viewports: ViewportState,
    /// Whether the left sidebar is shown.
    pub left_side_bar_visible: bool,
    /// Whether the right sidebar is shown.
    pub right_side_bar_visible: bool,
}

/// Error returned when a preset label is not among the configured options.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownPresetError {
    /// The label that was requested.
    pub label: String,
}

impl fmt::Display for UnknownPresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no viewport preset labelled {:?}", self.label)
    }
}

impl std::error::Error for UnknownPresetError {}

#[cfg(test)]
mod tests {
    use understory_fit::Height;

    use super::{UiState, ViewportState};

    #[test]
    fn default_state_starts_on_first_preset() {
        let state = ViewportState::default();
        assert_eq!(state.current.width, 360.0);
        assert_eq!(state.current.height, Height::Auto);
        assert_eq!(state.current.zoom, 1.0);
        assert_eq!(state.options.len(), 3);
    }

    #[test]
    fn preset_lookup() {
        let state = ViewportState::default();
        assert_eq!(state.preset("Medium").map(|p| p.width), Ok(768.0));
        let err = state.preset("Huge").unwrap_err();
        assert_eq!(err.label, "Huge");
        assert_eq!(err.to_string(), "no viewport preset labelled \"Huge\"");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn ui_state_uses_host_field_names() {
        let json = r#"{
            "viewports": {
                "current": { "width": 1280, "height": "auto", "zoom": 1 },
                "controlsVisible": false,
                "options": [
                    { "label": "Desktop", "width": 1280 },
                    { "label": "Banner", "width": 1280, "height": 300 }
                ]
            },
            "leftSideBarVisible": true,
            "rightSideBarVisible": false
        }"#;
        let ui: UiState = serde_json::from_str(json).unwrap();
        assert!(ui.left_side_bar_visible);
        assert!(!ui.viewports.controls_visible);
        assert_eq!(ui.viewports.options[0].height, Height::Auto);
        assert_eq!(ui.viewports.options[1].height, Height::Fixed(300.0));

        let value = serde_json::to_value(&ui).unwrap();
        assert_eq!(value["viewports"]["current"]["height"], "auto");
        assert_eq!(value["rightSideBarVisible"], false);
    }
}
