//! Style Table: class name to style, plus the single resolution policy
//!
//! Illustrator emits one CSS rule per distinct style and refers to it from
//! each shape's `class` attribute:
//!
//! ```text
//! .st0{fill:#FFFFFF;stroke:#39B54A;stroke-width:2;stroke-miterlimit:10;}
//! ```
//!
//! Parsing is lenient per key: an unparsable value drops only that key and
//! records a [`Warning`]. [`ResolvedStyle`] is where every shape kind gets its
//! fill, stroke width and opacity defaults, so no shape re-implements them.

use std::collections::HashMap;

use crate::convert::defaults::{SHAPE_STROKE_WIDTH, STROKE_SCALE};
use crate::element::Attributes;
use crate::errors::{ConvertError, Warning};
use crate::log::{debug, warn};
use crate::parse::{self, RawDeclaration};
use crate::types::{Color, Opacity, StrokeWidth};

/// Fill of a style class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// `fill:none`
    None,
    Color(Color),
}

/// One parsed style rule. Never mutated once the table holds it.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleClass {
    pub name: String,
    /// `None` when the rule has no `fill` key; resolved to black downstream.
    pub fill: Option<Fill>,
    pub stroke: Option<Color>,
    /// Already multiplied by [`STROKE_SCALE`].
    pub stroke_width: StrokeWidth,
    pub stroke_miter_limit: u32,
    pub opacity: Opacity,
}

impl StyleClass {
    /// A class with every field at its default.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fill: None,
            stroke: None,
            stroke_width: StrokeWidth::UNSET,
            stroke_miter_limit: 0,
            opacity: Opacity::OPAQUE,
        }
    }

    /// Parse one rule, pushing a warning for every key that is skipped.
    ///
    /// Only a rule that is not `.name{...}` at all is an error.
    pub fn parse(rule: &str, warnings: &mut Vec<Warning>) -> Result<Self, ConvertError> {
        let raw = parse::style_rule(rule)?;
        let mut class = StyleClass::new(raw.name);

        for declaration in &raw.declarations {
            let applied = match declaration {
                RawDeclaration::Pair(key, value) => class.apply(key, value),
                RawDeclaration::Malformed(text) => Err(class.unreadable(text)),
            };
            if let Err(warning) = applied {
                warn!(%warning, "style key skipped");
                warnings.push(warning);
            }
        }
        debug!(class = %class.name, "parsed style rule");
        Ok(class)
    }

    /// `stroke-width 2`: the key is the leading word, the rest its value.
    fn unreadable(&self, text: &str) -> Warning {
        let (key, value) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        Warning::MalformedStyleKey {
            class: self.name.clone(),
            key: key.to_string(),
            value: value.trim().to_string(),
        }
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), Warning> {
        let malformed = || Warning::MalformedStyleKey {
            class: self.name.clone(),
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "fill" => {
                self.fill = Some(if value == "none" {
                    Fill::None
                } else {
                    Fill::Color(value.parse().map_err(|_| malformed())?)
                });
            }
            "stroke" => {
                // `stroke:none` is the same as leaving the stroke unset.
                if value != "none" {
                    self.stroke = Some(value.parse().map_err(|_| malformed())?);
                }
            }
            "stroke-width" => {
                let width = parse::style_number(value).ok_or_else(malformed)?;
                self.stroke_width =
                    StrokeWidth::try_new(width * STROKE_SCALE).map_err(|_| malformed())?;
            }
            "stroke-miterlimit" => {
                let limit = parse::style_number(value).ok_or_else(malformed)?;
                if limit < 0.0 || limit.fract() != 0.0 || limit > u32::MAX as f64 {
                    return Err(malformed());
                }
                self.stroke_miter_limit = limit as u32;
            }
            "opacity" => {
                let opacity = parse::style_number(value).ok_or_else(malformed)?;
                self.opacity = Opacity::try_new(opacity).map_err(|_| malformed())?;
            }
            _ => {
                return Err(Warning::UnknownStyleKey {
                    class: self.name.clone(),
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// All style classes of one document, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    classes: HashMap<String, StyleClass>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class. A later rule with the same name replaces the earlier one.
    pub fn insert(&mut self, class: StyleClass) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn resolve(&self, name: &str) -> Option<&StyleClass> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// The style a shape refers to: the first token of its `class` attribute.
pub fn class_reference(attrs: &Attributes) -> Option<&str> {
    attrs.get("class")?.split_whitespace().next()
}

/// Paint of a styled shape. Present only when the shape names a known class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paint {
    pub stroke: Option<Color>,
    /// A class without a `fill` key fills black.
    pub fill: Fill,
}

/// Fully resolved style: no class references left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedStyle {
    /// `None` when the shape has no class (or names an unknown one).
    pub paint: Option<Paint>,
    /// Output stroke width.
    pub stroke_width: f64,
    pub opacity: Opacity,
}

impl ResolvedStyle {
    /// Apply the defaulting rules shared by rectangles, circles, ellipses
    /// and lines.
    ///
    /// The width is the class width unless it is the unset sentinel, in which
    /// case the shape default applies; either way it is scaled once more by
    /// [`STROKE_SCALE`].
    pub fn resolve(class: Option<&StyleClass>) -> Self {
        let base_width = class.map_or(SHAPE_STROKE_WIDTH, |c| c.stroke_width.or(SHAPE_STROKE_WIDTH));
        Self {
            paint: class.map(|c| Paint {
                stroke: c.stroke,
                fill: c.fill.unwrap_or(Fill::Color(Color::BLACK)),
            }),
            stroke_width: base_width * STROKE_SCALE,
            opacity: class.map_or(Opacity::OPAQUE, |c| c.opacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(rule: &str) -> (StyleClass, Vec<Warning>) {
        let mut warnings = Vec::new();
        let class = StyleClass::parse(rule, &mut warnings).unwrap();
        (class, warnings)
    }

    // ==================== Rule parsing tests ====================

    #[test]
    fn parse_full_rule() {
        let (class, warnings) =
            parse(".st0{fill:#FFFFFF;stroke:#39B54A;stroke-width:2;stroke-miterlimit:10;}");
        assert!(warnings.is_empty());
        assert_eq!(class.name, "st0");
        assert_eq!(class.fill, Some(Fill::Color(Color::rgb(0xFF, 0xFF, 0xFF))));
        assert_eq!(class.stroke, Some(Color::rgb(0x39, 0xB5, 0x4A)));
        assert!((class.stroke_width.raw() - 0.64).abs() < 1e-12);
        assert_eq!(class.stroke_miter_limit, 10);
        assert_eq!(class.opacity, Opacity::OPAQUE);
    }

    #[test]
    fn absent_keys_keep_defaults() {
        let (class, warnings) = parse(".st1{fill:none;stroke:#000000;}");
        assert!(warnings.is_empty());
        assert_eq!(class.fill, Some(Fill::None));
        assert_eq!(class.stroke, Some(Color::BLACK));
        assert!(class.stroke_width.is_unset());
        assert_eq!(class.stroke_miter_limit, 0);
        assert_eq!(class.opacity, Opacity::OPAQUE);
    }

    #[test]
    fn malformed_key_only_skips_that_key() {
        let (class, warnings) = parse(".st2{fill:#FF0000;stroke-width:thick;opacity:0.5;}");
        assert_eq!(class.fill, Some(Fill::Color(Color::rgb(0xFF, 0, 0))));
        assert!(class.stroke_width.is_unset());
        assert_eq!(class.opacity.raw(), 0.5);
        assert_eq!(
            warnings,
            vec![Warning::MalformedStyleKey {
                class: "st2".into(),
                key: "stroke-width".into(),
                value: "thick".into(),
            }]
        );
    }

    #[test]
    fn out_of_range_values_are_malformed() {
        let (class, warnings) =
            parse(".st3{opacity:1.5;stroke-miterlimit:-4;stroke-width:-1;fill:#12;}");
        assert_eq!(class, StyleClass::new("st3"));
        assert_eq!(warnings.len(), 4);
        assert!(
            warnings
                .iter()
                .all(|w| matches!(w, Warning::MalformedStyleKey { .. }))
        );
    }

    #[test]
    fn unreadable_declaration_only_skips_itself() {
        let (class, warnings) = parse(".st0{fill:#FFFFFF;stroke-width 2;}");
        assert_eq!(class.fill, Some(Fill::Color(Color::rgb(0xFF, 0xFF, 0xFF))));
        assert!(class.stroke_width.is_unset());
        assert_eq!(
            warnings,
            vec![Warning::MalformedStyleKey {
                class: "st0".into(),
                key: "stroke-width".into(),
                value: "2".into(),
            }]
        );
    }

    #[test]
    fn unknown_keys_are_reported() {
        let (class, warnings) = parse(".st4{fill-rule:evenodd;clip-rule:evenodd;fill:#00AEEF;}");
        assert_eq!(class.fill, Some(Fill::Color(Color::rgb(0x00, 0xAE, 0xEF))));
        assert_eq!(
            warnings,
            vec![
                Warning::UnknownStyleKey { class: "st4".into(), key: "fill-rule".into() },
                Warning::UnknownStyleKey { class: "st4".into(), key: "clip-rule".into() },
            ]
        );
    }

    #[test]
    fn stroke_none_leaves_stroke_unset() {
        let (class, warnings) = parse(".st5{fill:#231F20;stroke:none;}");
        assert!(warnings.is_empty());
        assert_eq!(class.stroke, None);
    }

    #[test]
    fn malformed_rule_is_an_error() {
        let mut warnings = Vec::new();
        assert!(matches!(
            StyleClass::parse("st0{fill:none}", &mut warnings),
            Err(ConvertError::InvalidAttribute { .. })
        ));
    }

    // ==================== Table tests ====================

    #[test]
    fn table_resolves_by_name() {
        let mut table = StyleTable::new();
        assert!(table.is_empty());
        table.insert(parse(".st0{fill:none;}").0);
        table.insert(parse(".st1{stroke:#FFFFFF;}").0);
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("st0").map(|c| c.fill), Some(Some(Fill::None)));
        assert!(table.resolve("st9").is_none());
    }

    #[test]
    fn class_reference_uses_first_token() {
        let attrs = Attributes::new().with("class", "st3 st7");
        assert_eq!(class_reference(&attrs), Some("st3"));
        assert_eq!(class_reference(&Attributes::new()), None);
        assert_eq!(class_reference(&Attributes::new().with("class", "  ")), None);
    }

    // ==================== Resolution tests ====================

    #[test]
    fn no_class_resolves_to_unstyled_default_width() {
        let style = ResolvedStyle::resolve(None);
        assert_eq!(style.paint, None);
        assert!((style.stroke_width - 0.32 * 0.32).abs() < 1e-12);
        assert!(style.opacity.is_opaque());
    }

    #[test]
    fn class_without_fill_resolves_to_black() {
        let (class, _) = parse(".st0{stroke:#39B54A;}");
        let style = ResolvedStyle::resolve(Some(&class));
        assert_eq!(
            style.paint,
            Some(Paint {
                stroke: Some(Color::rgb(0x39, 0xB5, 0x4A)),
                fill: Fill::Color(Color::BLACK),
            })
        );
    }

    #[test]
    fn explicit_width_is_scaled_again() {
        let (class, _) = parse(".st0{stroke-width:2;}");
        let style = ResolvedStyle::resolve(Some(&class));
        assert!((style.stroke_width - 0.64 * 0.32).abs() < 1e-12);

        let (unset, _) = parse(".st1{fill:none;}");
        let style = ResolvedStyle::resolve(Some(&unset));
        assert!((style.stroke_width - 0.32 * 0.32).abs() < 1e-12);
    }
}
