//! Strongly-typed primitives shared by the style table and the converters.
//!
//! Raw `f64` is fine for geometry (it lives in `glam::DVec2`), but the style
//! values carry rules of their own: the stroke-width sentinel, the opacity
//! range, hex colors. Those rules live on the types.

use std::fmt;
use std::str::FromStr;

/// Error type for invalid numeric values
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    /// Value is NaN
    NaN,
    /// Value is infinite
    Infinite,
    /// Value is negative when non-negative required
    Negative,
    /// Value is outside the closed range it must live in
    OutOfRange { min: f64, max: f64 },
}

impl fmt::Display for NumericError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericError::NaN => write!(f, "value is NaN"),
            NumericError::Infinite => write!(f, "value is infinite"),
            NumericError::Negative => write!(f, "value is negative"),
            NumericError::OutOfRange { min, max } => {
                write!(f, "value is outside [{}, {}]", min, max)
            }
        }
    }
}

impl std::error::Error for NumericError {}

fn check_finite(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else {
        Ok(val)
    }
}

/// An sRGB color written as `#RRGGBB` in both dialects.
///
/// Only the channel values are kept, so output spelling is normalized:
/// `#00aeef` displays as `#00AEEF` and `#0ae` as `#00AAEE`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color { r: 0, g: 0, b: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

/// Error returned when a color literal is not `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(pub String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid hex color: {:?}", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |digits: &str| u8::from_str_radix(digits, 16).map_err(|_| err());
        match hex.len() {
            6 => Ok(Color {
                r: channel(&hex[0..2])?,
                g: channel(&hex[2..4])?,
                b: channel(&hex[4..6])?,
            }),
            // #abc -> #aabbcc
            3 => Ok(Color {
                r: channel(&hex[0..1])? * 17,
                g: channel(&hex[1..2])? * 17,
                b: channel(&hex[2..3])? * 17,
            }),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Rotation angle in whole or fractional degrees.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stroke width of a style class, already multiplied by the stroke scale.
///
/// A stored value of exactly `1.0` means "not specified": shapes fall back to
/// their own default width. A source width that scales to exactly 1 is
/// therefore indistinguishable from an absent one.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct StrokeWidth(f64);

impl StrokeWidth {
    pub const UNSET: StrokeWidth = StrokeWidth(1.0);

    /// Validate a scaled width (rejects NaN, infinite and negative values).
    pub fn try_new(val: f64) -> Result<Self, NumericError> {
        let val = check_finite(val)?;
        if val < 0.0 {
            Err(NumericError::Negative)
        } else {
            Ok(StrokeWidth(val))
        }
    }

    #[inline]
    pub fn is_unset(self) -> bool {
        self.0 == Self::UNSET.0
    }

    /// The stored width, or `default` when this is the unset sentinel.
    #[inline]
    pub fn or(self, default: f64) -> f64 {
        if self.is_unset() { default } else { self.0 }
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Default for StrokeWidth {
    fn default() -> Self {
        Self::UNSET
    }
}

/// Opacity in `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct Opacity(f64);

impl Opacity {
    pub const OPAQUE: Opacity = Opacity(1.0);

    pub fn try_new(val: f64) -> Result<Self, NumericError> {
        let val = check_finite(val)?;
        if (0.0..=1.0).contains(&val) {
            Ok(Opacity(val))
        } else {
            Err(NumericError::OutOfRange { min: 0.0, max: 1.0 })
        }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.0 >= 1.0
    }

    #[inline]
    pub fn raw(self) -> f64 {
        self.0
    }
}

impl Default for Opacity {
    fn default() -> Self {
        Self::OPAQUE
    }
}

impl fmt::Display for Opacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
