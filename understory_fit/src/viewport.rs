// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use core::num::ParseFloatError;
use core::str::FromStr;

/// Requested height of the content surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Height {
    /// Derive the height from the available space and the current zoom.
    #[default]
    Auto,
    /// A fixed height in pixels, before zoom is applied.
    Fixed(f64),
}

impl Height {
    /// Interprets a pixel value as a height.
    ///
    /// Zero, negative and non-finite values select [`Height::Auto`], mirroring
    /// hosts that store "no height" as `0`.
    #[must_use]
    pub fn from_px(px: f64) -> Self {
        if px.is_finite() && px > 0.0 {
            Self::Fixed(px)
        } else {
            Self::Auto
        }
    }

    /// Returns `true` for [`Height::Auto`].
    #[must_use]
    pub fn is_auto(&self) -> bool {
        matches!(self, Self::Auto)
    }

    /// Returns the fixed pixel height, if any.
    ///
    /// A `Fixed` value that was constructed directly with a degenerate number
    /// reports `None`, the same as `Auto`.
    #[must_use]
    pub fn fixed_px(&self) -> Option<f64> {
        match *self {
            Self::Fixed(px) if px.is_finite() && px > 0.0 => Some(px),
            _ => None,
        }
    }

    /// Returns this height with degenerate fixed values folded into `Auto`.
    #[must_use]
    pub fn sanitized(self) -> Self {
        match self.fixed_px() {
            Some(px) => Self::Fixed(px),
            None => Self::Auto,
        }
    }
}

impl From<Option<f64>> for Height {
    fn from(px: Option<f64>) -> Self {
        px.map_or(Self::Auto, Self::from_px)
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Fixed(px) => write!(f, "{px}px"),
        }
    }
}

/// Error returned when parsing a [`Height`] from text fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseHeightError {
    source: ParseFloatError,
}

impl fmt::Display for ParseHeightError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid viewport height: {}", self.source)
    }
}

impl core::error::Error for ParseHeightError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        Some(&self.source)
    }
}

impl FromStr for Height {
    type Err = ParseHeightError;

    /// Parses `"auto"` (any case), a bare number, or a number with a `px` suffix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        let digits = s.strip_suffix("px").unwrap_or(s).trim_end();
        digits
            .parse::<f64>()
            .map(Self::from_px)
            .map_err(|source| ParseHeightError { source })
    }
}

/// The requested display size for the content surface.
///
/// `width` and the fixed variant of `height` are in unscaled content pixels;
/// `zoom` is the scale applied when rendering (`1.0` is 100%).
///
/// Deserialized viewports are sanitized like [`Viewport::new`]: a missing
/// `height` is auto, and a missing, zero, negative or non-finite `zoom` is `1`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(from = "serde_impls::ViewportFields")
)]
pub struct Viewport {
    /// Requested content width in pixels.
    pub width: f64,
    /// Requested content height.
    pub height: Height,
    /// Scale factor applied to the content surface.
    pub zoom: f64,
}

impl Viewport {
    /// Creates a viewport at 100% zoom.
    ///
    /// Negative or non-finite widths are stored as `0`.
    #[must_use]
    pub fn new(width: f64, height: Height) -> Self {
        Self {
            width: sanitize_dimension(width),
            height: height.sanitized(),
            zoom: 1.0,
        }
    }

    /// Returns this viewport with the given zoom.
    ///
    /// The zoom is not clamped here; see [`crate::ZoomLimits`].
    #[must_use]
    pub fn with_zoom(mut self, zoom: f64) -> Self {
        self.zoom = zoom;
        self
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(360.0, Height::Auto)
    }
}

/// Maps negative and non-finite pixel dimensions to `0`.
#[must_use]
pub fn sanitize_dimension(px: f64) -> f64 {
    if px.is_finite() && px > 0.0 { px } else { 0.0 }
}

#[cfg(feature = "serde")]
mod serde_impls {
    use core::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Height, Viewport};

    /// Wire form of [`Viewport`], before sanitizing.
    #[derive(Deserialize)]
    pub(super) struct ViewportFields {
        width: f64,
        #[serde(default)]
        height: Height,
        #[serde(default = "unit_zoom")]
        zoom: f64,
    }

    fn unit_zoom() -> f64 {
        1.0
    }

    impl From<ViewportFields> for Viewport {
        fn from(fields: ViewportFields) -> Self {
            let zoom = if fields.zoom.is_finite() && fields.zoom > 0.0 {
                fields.zoom
            } else {
                1.0
            };
            Self::new(fields.width, fields.height).with_zoom(zoom)
        }
    }

    impl Serialize for Height {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            match self.fixed_px() {
                Some(px) => serializer.serialize_f64(px),
                None => serializer.serialize_str("auto"),
            }
        }
    }

    impl<'de> Deserialize<'de> for Height {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_any(HeightVisitor)
        }
    }

    struct HeightVisitor;

    impl Visitor<'_> for HeightVisitor {
        type Value = Height;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a pixel height or \"auto\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Height, E> {
            Ok(Height::from_px(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Height, E> {
            Ok(Height::from_px(v as f64))
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Height, E> {
            Ok(Height::from_px(v as f64))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Height, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Height, E> {
            Ok(Height::Auto)
        }

        fn visit_none<E: de::Error>(self) -> Result<Height, E> {
            Ok(Height::Auto)
        }
    }
}
