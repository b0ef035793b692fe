// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::time::Duration;

/// Whether the next size/zoom change animates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Transition {
    /// Apply the next change with a short transition.
    Animated,
    /// Apply the next change immediately.
    #[default]
    Instant,
}

/// Easing curve used for animated size changes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum Easing {
    /// Constant speed.
    Linear,
    /// Slow start.
    EaseIn,
    /// Slow end.
    #[default]
    EaseOut,
    /// Slow start and end.
    EaseInOut,
}

impl Easing {
    /// Returns the CSS timing-function keyword.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

/// Properties of the content root that animate together.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionProperty {
    /// Unscaled width.
    Width,
    /// Unscaled height.
    Height,
    /// Zoom, applied as a scale transform.
    Transform,
}

impl TransitionProperty {
    /// All animated properties, in render order.
    pub const ALL: [Self; 3] = [Self::Width, Self::Height, Self::Transform];

    /// Returns the CSS property name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Transform => "transform",
        }
    }
}

/// Timing of an animated size change.
///
/// The [`fmt::Display`] form is a CSS `transition` value covering every
/// [`TransitionProperty`]:
///
/// ```rust
/// use understory_fit::TransitionSpec;
///
/// assert_eq!(
///     TransitionSpec::default().to_string(),
///     "width 150ms ease-out, height 150ms ease-out, transform 150ms ease-out",
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitionSpec {
    /// How long the transition runs.
    pub duration: Duration,
    /// Easing curve.
    pub easing: Easing,
}

impl TransitionSpec {
    /// Default duration of an animated size change.
    pub const DEFAULT_DURATION: Duration = Duration::from_millis(150);
}

impl Default for TransitionSpec {
    fn default() -> Self {
        Self {
            duration: Self::DEFAULT_DURATION,
            easing: Easing::default(),
        }
    }
}

impl fmt::Display for TransitionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.duration.as_millis();
        for (i, property) in TransitionProperty::ALL.into_iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{} {ms}ms {}", property.as_str(), self.easing.as_str())?;
        }
        Ok(())
    }
}

/// Two-state machine deciding whether the next size/zoom change animates.
///
/// Automatic recomputation (resize, sidebar toggles) calls
/// [`TransitionController::request_instant`] before applying its result;
/// deliberate user changes call [`TransitionController::request_animated`].
///
/// ```rust
/// use understory_fit::{Transition, TransitionController};
///
/// let mut transition = TransitionController::default();
/// assert_eq!(transition.state(), Transition::Instant);
/// assert!(transition.current().is_none());
///
/// transition.request_animated();
/// assert!(transition.current().is_some());
///
/// transition.request_instant();
/// assert!(transition.current().is_none());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransitionController {
    state: Transition,
    spec: TransitionSpec,
}

impl TransitionController {
    /// Creates a controller in the [`Transition::Instant`] state.
    #[must_use]
    pub fn new(spec: TransitionSpec) -> Self {
        Self {
            state: Transition::Instant,
            spec,
        }
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> Transition {
        self.state
    }

    /// Returns `true` when the next change animates.
    #[must_use]
    pub fn is_animated(&self) -> bool {
        self.state == Transition::Animated
    }

    /// Marks the next change as a deliberate user change.
    pub fn request_animated(&mut self) {
        self.state = Transition::Animated;
    }

    /// Marks the next change as automatic.
    pub fn request_instant(&mut self) {
        self.state = Transition::Instant;
    }

    /// Returns the configured timing, regardless of state.
    #[must_use]
    pub fn spec(&self) -> TransitionSpec {
        self.spec
    }

    /// Returns the transition the render layer should apply, if any.
    #[must_use]
    pub fn current(&self) -> Option<TransitionSpec> {
        match self.state {
            Transition::Animated => Some(self.spec),
            Transition::Instant => None,
        }
    }
}
